//! New-thread form: draft, validation and create completion

use log::{debug, info, warn};

use super::{ThreadListCache, ThreadSelectionController};
use crate::api::NewThread;
use crate::error::{FetchError, ValidationError};
use crate::models::{DealId, Thread, ThreadId};

/// Ticket for an in-flight create
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateThreadRequest {
    pub new_thread: NewThread,
    /// Submit this request came from; only the latest may clear the in-flight guard
    pub generation: u64,
}

impl CreateThreadRequest {
    pub fn deal_id(&self) -> &DealId {
        &self.new_thread.deal_id
    }
}

/// Draft of the new-thread form and the single create it may have in flight
#[derive(Debug, Default)]
pub struct NewThreadWorkflow {
    subject: String,
    body: String,
    submitting: bool,
    generation: u64,
}

impl NewThreadWorkflow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_subject(&mut self, subject: impl Into<String>) {
        self.subject = subject.into();
    }

    pub fn set_body(&mut self, body: impl Into<String>) {
        self.body = body.into();
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Record the input as the draft, validate it and build the create request.
    ///
    /// Values are sent as typed; trimming only decides emptiness.
    pub fn submit(
        &mut self,
        subject: &str,
        initial_message: &str,
        deal_id: Option<&DealId>,
    ) -> Result<CreateThreadRequest, ValidationError> {
        self.subject = subject.to_string();
        self.body = initial_message.to_string();

        if self.submitting {
            return Err(ValidationError::SubmitInFlight);
        }
        if subject.trim().is_empty() {
            return Err(ValidationError::EmptySubject);
        }
        if initial_message.trim().is_empty() {
            return Err(ValidationError::EmptyMessage);
        }
        let deal_id = deal_id.ok_or(ValidationError::NoDealSelected)?;

        self.submitting = true;
        self.generation += 1;
        debug!("Creating thread {:?} in deal {}", subject, deal_id);
        Ok(CreateThreadRequest {
            new_thread: NewThread {
                subject: subject.to_string(),
                initial_message: initial_message.to_string(),
                deal_id: deal_id.clone(),
            },
            generation: self.generation,
        })
    }

    /// Apply a finished create.
    ///
    /// On success the draft is cleared, the thread is prepended to `cache`
    /// and then selected; returns the new thread's id. Returns `Ok(None)` when
    /// the deal changed while the request was in flight. A failure leaves the
    /// draft and selection untouched.
    pub fn apply_created(
        &mut self,
        request: &CreateThreadRequest,
        result: Result<Thread, FetchError>,
        current_deal: Option<&DealId>,
        cache: &mut ThreadListCache,
        selection: &mut ThreadSelectionController,
    ) -> Result<Option<ThreadId>, FetchError> {
        if request.generation == self.generation {
            self.submitting = false;
        }

        if current_deal != Some(request.deal_id()) {
            debug!("Discarding created thread for deal {}", request.deal_id());
            return Ok(None);
        }

        let mut thread = result?;
        thread
            .deal_id
            .get_or_insert_with(|| request.deal_id().clone());
        let thread_id = thread.id.clone();

        self.subject.clear();
        self.body.clear();
        if !cache.insert_new(thread) {
            warn!("Created thread {} does not belong to deal {}", thread_id, request.deal_id());
            return Ok(None);
        }
        selection.select_thread(thread_id.clone());
        info!("Created thread {} in deal {}", thread_id, request.deal_id());
        Ok(Some(thread_id))
    }

    /// Drop the draft; an in-flight create will be discarded on completion
    pub fn reset(&mut self) {
        self.subject.clear();
        self.body.clear();
        self.submitting = false;
    }
}
