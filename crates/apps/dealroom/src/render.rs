//! Plain-text and JSON output

use anyhow::Result;
use chrono::{DateTime, Local, Utc};
use deals::{Deal, Message, Thread, User};
use serde_json::json;

/// How command results are printed
#[derive(Debug, Clone, Copy)]
pub struct Output {
    pub json: bool,
}

impl Output {
    pub fn user(self, user: &User) -> Result<()> {
        if self.json {
            return print_json(user);
        }
        println!("{}", user.full_name());
        if let Some(role) = &user.role {
            println!("Role:   {}", role);
        }
        if let Some(access) = &user.access {
            println!("Access: {}", access);
        }
        Ok(())
    }

    pub fn deals(self, deals: &[Deal]) -> Result<()> {
        if self.json {
            return print_json(deals);
        }
        if deals.is_empty() {
            println!("No deals");
        }
        for deal in deals {
            println!("{:>8}  {}", deal.id, deal.display_name());
        }
        Ok(())
    }

    pub fn threads(self, threads: &[&Thread]) -> Result<()> {
        if self.json {
            return print_json(threads);
        }
        if threads.is_empty() {
            println!("No threads");
        }
        for thread in threads {
            println!("{}", thread_line(thread));
        }
        Ok(())
    }

    pub fn messages(self, messages: &[Message]) -> Result<()> {
        if self.json {
            return print_json(messages);
        }
        if messages.is_empty() {
            println!("No messages");
        }
        for message in messages {
            println!(
                "[{}] {}  {}",
                message.sender.avatar_initial(),
                message.sender.label(),
                format_date(message.created_at)
            );
            for line in message.content_or_placeholder().lines() {
                println!("    {}", line);
            }
            println!();
        }
        Ok(())
    }

    pub fn created(self, thread: &Thread) -> Result<()> {
        if self.json {
            return print_json(&json!({ "created": thread }));
        }
        println!("Created thread {}: {}", thread.id, thread.subject_or_placeholder());
        Ok(())
    }
}

/// Title line shown above a listing in text mode
pub fn heading(output: Output, title: &str) {
    if !output.json {
        println!("== {} ==", title);
    }
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn thread_line(thread: &Thread) -> String {
    format!(
        "{:>8}  {:<12}  {}",
        thread.id,
        format_date(thread.last_message_date),
        thread.subject_or_placeholder()
    )
}

/// Local time: today as time, older as date
fn format_date(timestamp: Option<DateTime<Utc>>) -> String {
    let Some(timestamp) = timestamp else {
        return "-".to_string();
    };
    let local = timestamp.with_timezone(&Local);
    let now = Utc::now().with_timezone(&Local);

    if local.date_naive() == now.date_naive() {
        local.format("%H:%M").to_string()
    } else {
        local.format("%b %d, %Y").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_missing_date_renders_dash() {
        assert_eq!(format_date(None), "-");
    }

    #[test]
    fn test_thread_line_uses_subject_placeholder() {
        let thread = Thread::new(7, 1, "  ", Some(Utc.with_ymd_and_hms(2020, 1, 15, 12, 0, 0).unwrap()));
        let line = thread_line(&thread);
        assert!(line.contains("No subject"));
        assert!(line.contains("2020"));
    }
}
