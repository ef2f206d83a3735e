//! Session runtime
//!
//! Owns a [`DealWorkspace`] and runs its requests on worker threads.
//! Completions come back over one channel and are applied only by the
//! session owner, so the workspace never needs a lock.

use log::{debug, error, warn};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};

use crate::backend::Backend;
use crate::error::{FetchError, ValidationError};
use crate::models::{Deal, ThreadId};
use crate::workspace::{Completion, DealWorkspace, Request};

/// Single-owner driver for a [`DealWorkspace`]
pub struct Session {
    backend: Arc<dyn Backend>,
    workspace: DealWorkspace,
    sender: Sender<Completion>,
    receiver: Receiver<Completion>,
    in_flight: usize,
}

impl Session {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        let (sender, receiver) = mpsc::channel();
        Self {
            backend,
            workspace: DealWorkspace::new(),
            sender,
            receiver,
            in_flight: 0,
        }
    }

    pub fn workspace(&self) -> &DealWorkspace {
        &self.workspace
    }

    /// Number of dispatched requests whose completion has not been applied
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    pub fn load_deals(&mut self) {
        let request = self.workspace.load_deals();
        self.dispatch(request);
    }

    pub fn set_current_deal(&mut self, deal: Deal) {
        if let Some(request) = self.workspace.set_current_deal(deal) {
            self.dispatch(request);
        }
    }

    pub fn refresh_threads(&mut self) {
        if let Some(request) = self.workspace.refresh_threads() {
            self.dispatch(request);
        }
    }

    pub fn select_thread(&mut self, thread_id: ThreadId) {
        let request = self.workspace.select_thread(thread_id);
        self.dispatch(request);
    }

    pub fn retry_messages(&mut self) {
        if let Some(request) = self.workspace.retry_messages() {
            self.dispatch(request);
        }
    }

    pub fn close_thread(&mut self) {
        self.workspace.close_thread();
    }

    pub fn begin_compose(&mut self) {
        self.workspace.begin_compose();
    }

    pub fn cancel_compose(&mut self) {
        self.workspace.cancel_compose();
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.workspace.set_search_term(term);
    }

    /// Validate and send a new thread for the current deal
    pub fn submit_new_thread(&mut self, subject: &str, initial_message: &str) -> Result<(), ValidationError> {
        let request = self.workspace.submit(subject, initial_message)?;
        self.dispatch(request);
        Ok(())
    }

    /// Apply whatever completions have already arrived, without blocking.
    /// Returns the failures the user should see.
    pub fn pump(&mut self) -> Vec<FetchError> {
        let mut failures = Vec::new();
        loop {
            match self.receiver.try_recv() {
                Ok(completion) => self.handle(completion, &mut failures),
                Err(TryRecvError::Empty) => break,
                // The session holds a sender, so the channel cannot close
                Err(TryRecvError::Disconnected) => break,
            }
        }
        failures
    }

    /// Block until every dispatched request, follow-ups included, has been
    /// applied. Returns the failures the user should see.
    pub fn wait_idle(&mut self) -> Vec<FetchError> {
        let mut failures = Vec::new();
        while self.in_flight > 0 {
            match self.receiver.recv() {
                Ok(completion) => self.handle(completion, &mut failures),
                Err(_) => break,
            }
        }
        failures
    }

    fn handle(&mut self, completion: Completion, failures: &mut Vec<FetchError>) {
        self.in_flight = self.in_flight.saturating_sub(1);
        match self.workspace.apply(completion) {
            Ok(Some(follow_up)) => self.dispatch(follow_up),
            Ok(None) => {}
            Err(e) => failures.push(e),
        }
    }

    /// Run `request` on a worker thread
    fn dispatch(&mut self, request: Request) {
        debug!("Dispatching {:?}", request);
        let backend = Arc::clone(&self.backend);
        let sender = self.sender.clone();
        let fallback = request.clone();

        let spawned = std::thread::Builder::new()
            .name("dealroom-request".into())
            .spawn(move || {
                let completion = run_guarded(request, backend.as_ref());
                if sender.send(completion).is_err() {
                    warn!("Session dropped before a request completed");
                }
            });

        match spawned {
            Ok(_) => self.in_flight += 1,
            Err(e) => {
                // No worker available: run inline so the completion is not lost
                error!("Failed to spawn request worker: {}", e);
                let completion = run_guarded(fallback, self.backend.as_ref());
                self.in_flight += 1;
                if self.sender.send(completion).is_err() {
                    self.in_flight -= 1;
                }
            }
        }
    }
}

/// Execute `request`, turning a panicking backend into a failed completion
/// so the session still sees the request finish
fn run_guarded(request: Request, backend: &dyn Backend) -> Completion {
    let ticket = request.clone();
    match panic::catch_unwind(AssertUnwindSafe(|| request.execute(backend))) {
        Ok(completion) => completion,
        Err(_) => {
            error!("Request worker panicked on {:?}", ticket);
            ticket.fail(FetchError::transport("request worker panicked"))
        }
    }
}
