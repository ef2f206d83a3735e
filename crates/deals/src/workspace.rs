//! Deal workspace: wires the state owners together
//!
//! User actions produce [`Request`]s. Whoever owns the workspace runs them
//! against a [`Backend`] (on any thread) and hands the resulting
//! [`Completion`] back to [`DealWorkspace::apply`]. Relevance checks happen
//! there, so results that arrive late are dropped instead of clobbering
//! newer state.

use log::{info, warn};

use crate::backend::Backend;
use crate::error::{FetchError, ValidationError};
use crate::models::{Deal, Message, Thread, ThreadId};
use crate::state::{
    CreateThreadRequest, DealChange, DealContext, LoadOutcome, MessageFetcher, MessageRequest,
    NewThreadWorkflow, SelectionState, ThreadListCache, ThreadListRequest,
    ThreadSelectionController,
};

/// A backend call the workspace wants made
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    /// Deals available to the user, for the deal picker
    Deals,
    Threads(ThreadListRequest),
    Messages(MessageRequest),
    CreateThread(CreateThreadRequest),
}

impl Request {
    /// Perform the call. Blocking; run it off the owner's thread.
    pub fn execute(self, backend: &dyn Backend) -> Completion {
        match self {
            Self::Deals => Completion::Deals {
                result: backend.list_deals(),
            },
            Self::Threads(request) => {
                let result = backend.list_threads(&request.deal_id);
                Completion::Threads { request, result }
            }
            Self::Messages(request) => {
                let result = backend.list_messages(&request.thread_id);
                Completion::Messages { request, result }
            }
            Self::CreateThread(request) => {
                let result = backend.create_thread(&request.new_thread);
                Completion::CreateThread { request, result }
            }
        }
    }

    /// Completion reporting `error` without calling the backend
    pub fn fail(self, error: FetchError) -> Completion {
        match self {
            Self::Deals => Completion::Deals { result: Err(error) },
            Self::Threads(request) => Completion::Threads {
                request,
                result: Err(error),
            },
            Self::Messages(request) => Completion::Messages {
                request,
                result: Err(error),
            },
            Self::CreateThread(request) => Completion::CreateThread {
                request,
                result: Err(error),
            },
        }
    }
}

/// A finished backend call paired with the request that started it
#[derive(Debug)]
pub enum Completion {
    Deals {
        result: Result<Vec<Deal>, FetchError>,
    },
    Threads {
        request: ThreadListRequest,
        result: Result<Vec<Thread>, FetchError>,
    },
    Messages {
        request: MessageRequest,
        result: Result<Vec<Message>, FetchError>,
    },
    CreateThread {
        request: CreateThreadRequest,
        result: Result<Thread, FetchError>,
    },
}

/// Conversation state for the deal the user is looking at
#[derive(Debug, Default)]
pub struct DealWorkspace {
    deals: Vec<Deal>,
    context: DealContext,
    threads: ThreadListCache,
    selection: ThreadSelectionController,
    messages: MessageFetcher,
    compose: NewThreadWorkflow,
}

impl DealWorkspace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch the deal list; the first deal becomes current if none is
    pub fn load_deals(&self) -> Request {
        Request::Deals
    }

    /// Switch deals. Returns the thread load to run, or `None` when the
    /// deal id did not change.
    pub fn set_current_deal(&mut self, deal: Deal) -> Option<Request> {
        let change = self.context.set_current_deal(deal)?;
        Some(self.on_deal_changed(change))
    }

    /// Reload the current deal's threads
    pub fn refresh_threads(&mut self) -> Option<Request> {
        let deal_id = self.context.current_deal_id()?.clone();
        Some(Request::Threads(self.threads.load_for_deal(deal_id)))
    }

    /// Open a thread and load its messages
    pub fn select_thread(&mut self, thread_id: ThreadId) -> Request {
        self.selection.select_thread(thread_id.clone());
        Request::Messages(self.messages.load_messages(thread_id))
    }

    /// Reload messages of the open thread
    pub fn retry_messages(&mut self) -> Option<Request> {
        let thread_id = self.selection.state().thread_id()?.clone();
        Some(Request::Messages(self.messages.load_messages(thread_id)))
    }

    /// Back out of the open thread
    pub fn close_thread(&mut self) {
        self.selection.clear();
        self.messages.clear();
    }

    pub fn begin_compose(&mut self) {
        self.selection.begin_compose();
        self.messages.clear();
    }

    pub fn cancel_compose(&mut self) {
        self.selection.cancel_compose();
    }

    /// Keep the form draft in sync with what the user typed
    pub fn update_draft(&mut self, subject: impl Into<String>, body: impl Into<String>) {
        self.compose.set_subject(subject);
        self.compose.set_body(body);
    }

    /// Validate the form and build the create request for the current deal
    pub fn submit(&mut self, subject: &str, initial_message: &str) -> Result<Request, ValidationError> {
        let request = self
            .compose
            .submit(subject, initial_message, self.context.current_deal_id())?;
        Ok(Request::CreateThread(request))
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.threads.set_search_term(term);
    }

    /// Apply a finished call.
    ///
    /// Returns a follow-up request when the result calls for one (a new
    /// thread's messages, the first deal's threads). Failures that still
    /// matter to the user are returned; stale ones are not.
    pub fn apply(&mut self, completion: Completion) -> Result<Option<Request>, FetchError> {
        match completion {
            Completion::Deals { result } => {
                self.deals = result.inspect_err(|e| warn!("Failed to load deals: {}", e))?;
                info!("Loaded {} deals", self.deals.len());
                if self.context.current_deal().is_some() {
                    return Ok(None);
                }
                match self.deals.first().cloned() {
                    Some(first) => Ok(self.set_current_deal(first)),
                    None => Ok(None),
                }
            }
            Completion::Threads { request, result } => {
                let outcome = self
                    .threads
                    .apply_threads(&request, result)
                    .inspect_err(|e| warn!("Failed to load threads for deal {}: {}", request.deal_id, e))?;
                if let LoadOutcome::Applied(count) = outcome {
                    info!("Loaded {} threads for deal {}", count, request.deal_id);
                }
                Ok(None)
            }
            Completion::Messages { request, result } => {
                self.messages
                    .apply_messages(&request, result, self.selection.state())
                    .inspect_err(|e| {
                        warn!("Failed to load messages for thread {}: {}", request.thread_id, e)
                    })?;
                Ok(None)
            }
            Completion::CreateThread { request, result } => {
                let created = self
                    .compose
                    .apply_created(
                        &request,
                        result,
                        self.context.current_deal_id(),
                        &mut self.threads,
                        &mut self.selection,
                    )
                    .inspect_err(|e| warn!("Failed to create thread: {}", e))?;
                Ok(created.map(|thread_id| Request::Messages(self.messages.load_messages(thread_id))))
            }
        }
    }

    /// Deals returned by the last deal list load
    pub fn deals(&self) -> &[Deal] {
        &self.deals
    }

    pub fn current_deal(&self) -> Option<&Deal> {
        self.context.current_deal()
    }

    /// Threads matching the search term, most recently active first
    pub fn visible_threads(&self) -> Vec<&Thread> {
        self.threads.filtered()
    }

    /// Bumped whenever the underlying thread list changes
    pub fn threads_version(&self) -> u64 {
        self.threads.version()
    }

    pub fn thread_list(&self) -> &ThreadListCache {
        &self.threads
    }

    pub fn selection(&self) -> &SelectionState {
        self.selection.state()
    }

    /// Messages of the open thread, oldest first
    pub fn messages(&self) -> &[Message] {
        self.messages.messages()
    }

    pub fn messages_loading(&self) -> bool {
        self.messages.is_loading()
    }

    pub fn threads_loading(&self) -> bool {
        self.threads.is_loading()
    }

    pub fn compose(&self) -> &NewThreadWorkflow {
        &self.compose
    }

    /// Deliver a deal change to each owner, thread list first
    fn on_deal_changed(&mut self, change: DealChange) -> Request {
        let request = self.threads.load_for_deal(change.current);
        self.selection.on_deal_changed();
        self.messages.clear();
        self.compose.reset();
        Request::Threads(request)
    }
}
