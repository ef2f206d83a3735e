//! Subcommand implementations
//!
//! Every deal-scoped command drives a [`Session`] the way an interactive
//! front end would: pick the deal, wait for its threads, then act.

use anyhow::{Context, Result, anyhow, bail};
use deals::{
    Backend, ClientConfig, CollabClient, DealsError, FetchError, SelectionState, Session, ThreadId,
    TokenStore,
};
use std::sync::Arc;

use crate::render::{self, Output};

fn open_client() -> Result<CollabClient> {
    let config = ClientConfig::load().context("Failed to load client configuration")?;
    let tokens = TokenStore::default_location()?;
    Ok(CollabClient::new(config, tokens))
}

/// Turn the first surfaced failure into an error
fn check(failures: Vec<FetchError>) -> Result<()> {
    match failures.into_iter().next() {
        Some(e) => Err(DealsError::from(e).into()),
        None => Ok(()),
    }
}

/// Start a session with `deal_id` (or the first deal) current and its threads loaded
fn open_deal(deal_id: Option<&str>) -> Result<Session> {
    let mut session = Session::new(Arc::new(open_client()?));
    session.load_deals();
    check(session.wait_idle())?;

    if let Some(deal_id) = deal_id {
        let deal = session
            .workspace()
            .deals()
            .iter()
            .find(|d| d.id.as_str() == deal_id)
            .cloned()
            .ok_or_else(|| anyhow!("No deal with id {}", deal_id))?;
        session.set_current_deal(deal);
        check(session.wait_idle())?;
    }

    if session.workspace().current_deal().is_none() {
        bail!("No deals available for this account");
    }
    Ok(session)
}

pub fn login(email: &str, password: &str) -> Result<()> {
    let client = open_client()?;
    client.login(email, password)?;
    println!("Signed in as {}", email);
    Ok(())
}

pub fn logout() -> Result<()> {
    let client = open_client()?;
    if client.logout()? {
        println!("Signed out");
    } else {
        println!("Not signed in");
    }
    Ok(())
}

pub fn whoami(output: Output) -> Result<()> {
    let user = open_client()?.current_user().map_err(DealsError::from)?;
    output.user(&user)
}

pub fn deals(output: Output) -> Result<()> {
    let deals = open_client()?.list_deals().map_err(DealsError::from)?;
    output.deals(&deals)
}

pub fn threads(deal_id: Option<&str>, search: Option<&str>, output: Output) -> Result<()> {
    let mut session = open_deal(deal_id)?;
    if let Some(term) = search {
        session.set_search_term(term);
    }

    let workspace = session.workspace();
    if let Some(deal) = workspace.current_deal() {
        render::heading(output, deal.display_name());
    }
    output.threads(&workspace.visible_threads())
}

pub fn messages(thread: &str, deal_id: Option<&str>, output: Output) -> Result<()> {
    let mut session = open_deal(deal_id)?;
    session.select_thread(ThreadId::from(thread));
    check(session.wait_idle())?;

    let workspace = session.workspace();
    if let Some(listed) = workspace.thread_list().get(&ThreadId::from(thread)) {
        render::heading(output, listed.subject_or_placeholder());
    }
    output.messages(workspace.messages())
}

pub fn new_thread(deal_id: Option<&str>, subject: &str, message: &str, output: Output) -> Result<()> {
    let mut session = open_deal(deal_id)?;
    session.begin_compose();
    session
        .submit_new_thread(subject, message)
        .map_err(DealsError::from)?;
    check(session.wait_idle())?;

    let workspace = session.workspace();
    let SelectionState::Thread(created) = workspace.selection() else {
        bail!("The new thread was not added to the current deal");
    };

    let thread = workspace
        .thread_list()
        .get(created)
        .context("Created thread missing from the thread list")?;
    output.created(thread)
}
