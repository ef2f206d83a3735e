//! In-memory backend implementation
//!
//! Behaves like the collaboration server for tests and offline demos:
//! assigns ids, scopes threads to deals, and can be told to fail.

use chrono::Utc;
use log::debug;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Mutex, RwLock};

use super::Backend;
use crate::api::NewThread;
use crate::error::FetchError;
use crate::models::{Deal, DealId, Message, MessageId, Thread, ThreadId};

/// In-memory implementation of [`Backend`]
///
/// Uses maps behind `RwLock`s so it can be shared with worker threads.
pub struct InMemoryBackend {
    deals: RwLock<Vec<Deal>>,
    threads: RwLock<HashMap<DealId, Vec<Thread>>>,
    messages: RwLock<HashMap<ThreadId, Vec<Message>>>,
    next_id: AtomicU64,
    authorized: AtomicBool,
    /// Errors returned by the next calls, oldest first
    failures: Mutex<VecDeque<FetchError>>,
}

fn poisoned<T>(_: T) -> FetchError {
    FetchError::transport("in-memory backend lock poisoned")
}

impl Default for InMemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryBackend {
    /// Create a new empty backend
    pub fn new() -> Self {
        Self {
            deals: RwLock::new(Vec::new()),
            threads: RwLock::new(HashMap::new()),
            messages: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
            authorized: AtomicBool::new(true),
            failures: Mutex::new(VecDeque::new()),
        }
    }

    /// Register a deal
    pub fn add_deal(&self, deal: Deal) -> Result<(), FetchError> {
        let mut threads = self.threads.write().map_err(poisoned)?;
        threads.entry(deal.id.clone()).or_default();
        self.deals.write().map_err(poisoned)?.push(deal);
        Ok(())
    }

    /// Add an existing thread under its deal. Embedded messages are also
    /// served from `list_messages`.
    pub fn add_thread(&self, thread: Thread) -> Result<(), FetchError> {
        let deal_id = thread
            .deal_id
            .clone()
            .ok_or_else(|| FetchError::transport("thread has no deal_id"))?;
        self.reserve_id(thread.id.as_str());
        if let Some(embedded) = &thread.messages {
            self.messages
                .write()
                .map_err(poisoned)?
                .insert(thread.id.clone(), embedded.clone());
        }
        self.threads
            .write()
            .map_err(poisoned)?
            .entry(deal_id)
            .or_default()
            .push(thread);
        Ok(())
    }

    /// Replace the messages served for a thread
    pub fn set_messages(&self, thread_id: &ThreadId, messages: Vec<Message>) -> Result<(), FetchError> {
        self.messages
            .write()
            .map_err(poisoned)?
            .insert(thread_id.clone(), messages);
        Ok(())
    }

    /// Make the next server-assigned id equal `id`
    pub fn set_next_id(&self, id: u64) {
        self.next_id.store(id, Ordering::SeqCst);
    }

    /// Simulate a missing or expired credential for every call
    pub fn set_authorized(&self, authorized: bool) {
        self.authorized.store(authorized, Ordering::SeqCst);
    }

    /// Make the next call fail with `error`
    pub fn fail_next(&self, error: FetchError) {
        if let Ok(mut failures) = self.failures.lock() {
            failures.push_back(error);
        }
    }

    /// Keep server-assigned ids clear of ids inserted by hand
    fn reserve_id(&self, id: &str) {
        if let Ok(n) = id.parse::<u64>() {
            self.next_id.fetch_max(n.saturating_add(1), Ordering::SeqCst);
        }
    }

    fn check_call(&self) -> Result<(), FetchError> {
        if !self.authorized.load(Ordering::SeqCst) {
            return Err(FetchError::Unauthorized);
        }
        match self.failures.lock().map_err(poisoned)?.pop_front() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    fn allocate_id(&self) -> String {
        self.next_id.fetch_add(1, Ordering::SeqCst).to_string()
    }
}

impl Backend for InMemoryBackend {
    fn list_deals(&self) -> Result<Vec<Deal>, FetchError> {
        self.check_call()?;
        Ok(self.deals.read().map_err(poisoned)?.clone())
    }

    fn list_threads(&self, deal_id: &DealId) -> Result<Vec<Thread>, FetchError> {
        self.check_call()?;
        let threads = self.threads.read().map_err(poisoned)?;
        let list = threads
            .get(deal_id)
            .ok_or_else(|| FetchError::not_found(format!("deal {}", deal_id)))?;
        debug!("In-memory backend serving {} threads for deal {}", list.len(), deal_id);
        Ok(list.clone())
    }

    fn list_messages(&self, thread_id: &ThreadId) -> Result<Vec<Message>, FetchError> {
        self.check_call()?;
        if let Some(messages) = self.messages.read().map_err(poisoned)?.get(thread_id) {
            return Ok(messages.clone());
        }
        let known = self
            .threads
            .read()
            .map_err(poisoned)?
            .values()
            .flatten()
            .any(|t| &t.id == thread_id);
        if known {
            Ok(Vec::new())
        } else {
            Err(FetchError::not_found(format!("thread {}", thread_id)))
        }
    }

    fn create_thread(&self, new_thread: &NewThread) -> Result<Thread, FetchError> {
        self.check_call()?;
        if !self.threads.read().map_err(poisoned)?.contains_key(&new_thread.deal_id) {
            return Err(FetchError::not_found(format!("deal {}", new_thread.deal_id)));
        }

        let now = Utc::now();
        let thread_id = ThreadId::new(self.allocate_id());
        let first = Message::builder(MessageId::new(self.allocate_id()))
            .thread_id(thread_id.clone())
            .content(new_thread.initial_message.clone())
            .created_at(now)
            .build();
        let thread = Thread::new(
            thread_id,
            new_thread.deal_id.clone(),
            new_thread.subject.clone(),
            Some(now),
        )
        .with_messages(vec![first]);

        self.add_thread(thread.clone())?;
        Ok(thread)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backend_with_deal() -> InMemoryBackend {
        let backend = InMemoryBackend::new();
        backend.add_deal(Deal::new("1", "Acme renewal")).unwrap();
        backend
    }

    #[test]
    fn test_list_threads_unknown_deal_is_not_found() {
        let backend = backend_with_deal();
        let err = backend.list_threads(&DealId::from(99)).unwrap_err();
        assert!(matches!(err, FetchError::NotFound { .. }));
    }

    #[test]
    fn test_create_thread_assigns_id_and_first_message() {
        let backend = backend_with_deal();
        backend.set_next_id(42);

        let created = backend
            .create_thread(&NewThread {
                subject: "Kickoff".into(),
                initial_message: "Let's start".into(),
                deal_id: DealId::from(1),
            })
            .unwrap();

        assert_eq!(created.id, ThreadId::from(42));
        assert!(created.belongs_to(&DealId::from(1)));
        let messages = backend.list_messages(&created.id).unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].content, "Let's start");
        assert_eq!(backend.list_threads(&DealId::from(1)).unwrap().len(), 1);
    }

    #[test]
    fn test_manual_ids_are_reserved() {
        let backend = backend_with_deal();
        backend
            .add_thread(Thread::new("10", "1", "Existing", None))
            .unwrap();
        assert_eq!(backend.allocate_id(), "11");
    }

    #[test]
    fn test_max_manual_id_does_not_overflow() {
        let backend = backend_with_deal();
        backend
            .add_thread(Thread::new(u64::MAX.to_string(), "1", "Edge", None))
            .unwrap();
        assert_eq!(backend.list_threads(&DealId::from(1)).unwrap().len(), 1);
    }

    #[test]
    fn test_injected_failures() {
        let backend = backend_with_deal();
        backend.fail_next(FetchError::transport("boom"));

        assert!(backend.list_deals().is_err());
        assert!(backend.list_deals().is_ok());

        backend.set_authorized(false);
        assert_eq!(backend.list_deals().unwrap_err(), FetchError::Unauthorized);
    }

    #[test]
    fn test_known_thread_without_messages_is_empty() {
        let backend = backend_with_deal();
        backend
            .add_thread(Thread::new("5", "1", "Quiet", None))
            .unwrap();
        assert!(backend.list_messages(&ThreadId::from(5)).unwrap().is_empty());
        assert!(backend.list_messages(&ThreadId::from(6)).is_err());
    }
}
