//! Dealroom - deal-scoped conversations from the terminal
//!
//! This is the main entry point for the Dealroom command-line client.

use clap::{Parser, Subcommand};
use deals::{DealsError, FetchError};
use log::error;
use std::process::ExitCode;

mod commands;
mod render;

#[derive(Parser)]
#[command(name = "dealroom")]
#[command(about = "Browse and start deal conversations")]
struct Cli {
    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in and store a session token
    Login {
        #[arg(long, short = 'e')]
        email: String,
        #[arg(long, short = 'p')]
        password: String,
    },

    /// Forget the stored session token
    Logout,

    /// Show the signed-in user
    Whoami,

    /// List deals
    Deals,

    /// List threads of a deal, most recently active first
    Threads {
        /// Deal ID (defaults to the first deal)
        #[arg(long, short = 'd')]
        deal: Option<String>,
        /// Only show threads whose subject, messages or senders contain this
        #[arg(long, short = 's')]
        search: Option<String>,
    },

    /// Show the messages of a thread
    Messages {
        /// Thread ID
        #[arg(long, short = 't')]
        thread: String,
        /// Deal ID (defaults to the first deal)
        #[arg(long, short = 'd')]
        deal: Option<String>,
    },

    /// Start a new thread in a deal
    NewThread {
        /// Deal ID (defaults to the first deal)
        #[arg(long, short = 'd')]
        deal: Option<String>,
        #[arg(long, short = 's')]
        subject: String,
        /// First message of the thread
        #[arg(long, short = 'm')]
        message: String,
    },
}

fn main() -> ExitCode {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    // Bootstrap config directory
    if let Err(e) = config::init() {
        error!("Failed to initialize config directory: {}", e);
    }

    let cli = Cli::parse();
    let output = render::Output { json: cli.json };
    let is_login = matches!(cli.command, Commands::Login { .. });

    let result = match cli.command {
        Commands::Login { email, password } => commands::login(&email, &password),
        Commands::Logout => commands::logout(),
        Commands::Whoami => commands::whoami(output),
        Commands::Deals => commands::deals(output),
        Commands::Threads { deal, search } => {
            commands::threads(deal.as_deref(), search.as_deref(), output)
        }
        Commands::Messages { thread, deal } => commands::messages(&thread, deal.as_deref(), output),
        Commands::NewThread {
            deal,
            subject,
            message,
        } => commands::new_thread(deal.as_deref(), &subject, &message, output),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            if show_login_hint(is_login, &e) {
                eprintln!("Your session is missing or expired. Run `dealroom login` to sign in again.");
            }
            ExitCode::FAILURE
        }
    }
}

/// Suggest signing in again, except when signing in is what just failed
fn show_login_hint(is_login: bool, error: &anyhow::Error) -> bool {
    !is_login && requires_reauth(error)
}

fn requires_reauth(error: &anyhow::Error) -> bool {
    error
        .chain()
        .any(|cause| {
            cause
                .downcast_ref::<DealsError>()
                .is_some_and(DealsError::requires_reauth)
                || cause
                    .downcast_ref::<FetchError>()
                    .is_some_and(FetchError::requires_reauth)
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_hint_for_expired_session() {
        let error = anyhow::Error::new(FetchError::Unauthorized).context("Failed to list deals");
        assert!(show_login_hint(false, &error));
    }

    #[test]
    fn test_no_login_hint_when_login_fails() {
        let error = anyhow::Error::new(FetchError::Unauthorized);
        assert!(!show_login_hint(true, &error));
    }

    #[test]
    fn test_no_login_hint_for_other_errors() {
        let error = anyhow::Error::new(FetchError::transport("connection refused"));
        assert!(!show_login_hint(false, &error));
    }
}
