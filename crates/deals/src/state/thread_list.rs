//! Thread list for the current deal, with a search-filtered view

use log::{debug, warn};

use super::LoadOutcome;
use crate::error::FetchError;
use crate::models::{DealId, Thread, ThreadId};
use crate::search;

/// Ticket for an in-flight thread list load
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreadListRequest {
    pub deal_id: DealId,
}

/// Authoritative thread list for exactly one deal at a time
///
/// Loaded lists are kept most-recently-active first. `version` increases
/// whenever the base list changes so a UI can tell when to re-render.
#[derive(Debug, Default)]
pub struct ThreadListCache {
    deal_id: Option<DealId>,
    threads: Vec<Thread>,
    /// Threads created locally since the scope was set; survive a wholesale reload
    inserted: Vec<ThreadId>,
    search_term: String,
    /// Indices into `threads` matching `search_term`
    visible: Vec<usize>,
    version: u64,
    pending: usize,
}

impl ThreadListCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start loading threads for `deal_id`.
    ///
    /// Switching to a different deal discards the previous list at once,
    /// before any response arrives.
    pub fn load_for_deal(&mut self, deal_id: DealId) -> ThreadListRequest {
        if self.deal_id.as_ref() != Some(&deal_id) {
            if !self.threads.is_empty() {
                self.threads.clear();
                self.version += 1;
            }
            self.inserted.clear();
            self.pending = 0;
            self.deal_id = Some(deal_id.clone());
            self.refilter();
        }
        self.pending += 1;
        debug!("Loading threads for deal {}", deal_id);
        ThreadListRequest { deal_id }
    }

    /// Apply a finished load.
    ///
    /// A result for a deal that is no longer in scope is dropped, whether it
    /// succeeded or failed. A failure for the current deal is returned and
    /// leaves the list as it was.
    pub fn apply_threads(
        &mut self,
        request: &ThreadListRequest,
        result: Result<Vec<Thread>, FetchError>,
    ) -> Result<LoadOutcome, FetchError> {
        if self.deal_id.as_ref() != Some(&request.deal_id) {
            debug!("Discarding stale thread list for deal {}", request.deal_id);
            return Ok(LoadOutcome::Stale);
        }
        self.pending = self.pending.saturating_sub(1);

        let mut threads = result?;
        threads.retain_mut(|thread| match &thread.deal_id {
            None => {
                thread.deal_id = Some(request.deal_id.clone());
                true
            }
            Some(owner) if owner == &request.deal_id => true,
            Some(owner) => {
                warn!(
                    "Dropping thread {} of deal {} from deal {} list",
                    thread.id, owner, request.deal_id
                );
                false
            }
        });
        Thread::sort_by_recency(&mut threads);

        // Keep locally created threads the response does not know about yet
        let mut merged: Vec<Thread> = self
            .inserted
            .iter()
            .rev()
            .filter(|id| !threads.iter().any(|t| &t.id == *id))
            .filter_map(|id| self.get(id).cloned())
            .collect();
        self.inserted.retain(|id| merged.iter().any(|t| &t.id == id));
        merged.extend(threads);

        self.threads = merged;
        self.version += 1;
        self.refilter();
        Ok(LoadOutcome::Applied(self.threads.len()))
    }

    /// Update the search term and recompute the filtered view
    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.search_term = term.into();
        self.refilter();
    }

    /// Prepend a newly created thread.
    ///
    /// Refused (returns `false`) unless the thread belongs to the deal in scope.
    pub fn insert_new(&mut self, thread: Thread) -> bool {
        let Some(scope) = &self.deal_id else {
            warn!("Ignoring new thread {}: no deal in scope", thread.id);
            return false;
        };
        if !thread.belongs_to(scope) {
            warn!("Ignoring new thread {}: not part of deal {}", thread.id, scope);
            return false;
        }

        self.threads.retain(|t| t.id != thread.id);
        self.inserted.push(thread.id.clone());
        self.threads.insert(0, thread);
        self.version += 1;
        self.refilter();
        true
    }

    /// Threads matching the search term, in list order
    pub fn filtered(&self) -> Vec<&Thread> {
        self.visible.iter().map(|&i| &self.threads[i]).collect()
    }

    /// The full, unfiltered list
    pub fn threads(&self) -> &[Thread] {
        &self.threads
    }

    pub fn get(&self, thread_id: &ThreadId) -> Option<&Thread> {
        self.threads.iter().find(|t| &t.id == thread_id)
    }

    pub fn contains(&self, thread_id: &ThreadId) -> bool {
        self.get(thread_id).is_some()
    }

    /// Deal the list is scoped to
    pub fn deal_id(&self) -> Option<&DealId> {
        self.deal_id.as_ref()
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn is_loading(&self) -> bool {
        self.pending > 0
    }

    fn refilter(&mut self) {
        self.visible = search::filter_indices(&self.threads, &self.search_term);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn thread(id: i64, deal: i64, subject: &str, day: u32) -> Thread {
        Thread::new(
            id,
            deal,
            subject,
            Some(Utc.with_ymd_and_hms(2024, 9, day, 12, 0, 0).unwrap()),
        )
    }

    fn loaded(deal: i64, threads: Vec<Thread>) -> ThreadListCache {
        let mut cache = ThreadListCache::new();
        let request = cache.load_for_deal(DealId::from(deal));
        cache.apply_threads(&request, Ok(threads)).unwrap();
        cache
    }

    fn ids(cache: &ThreadListCache) -> Vec<String> {
        cache.filtered().iter().map(|t| t.id.to_string()).collect()
    }

    #[test]
    fn test_load_sorts_most_recent_first() {
        let cache = loaded(1, vec![thread(1, 1, "Old", 1), thread(2, 1, "New", 9)]);
        assert_eq!(ids(&cache), vec!["2", "1"]);
        assert!(!cache.is_loading());
        assert_eq!(cache.version(), 1);
    }

    #[test]
    fn test_stale_response_is_discarded() {
        let mut cache = ThreadListCache::new();
        let first = cache.load_for_deal(DealId::from(1));
        let second = cache.load_for_deal(DealId::from(2));

        cache.apply_threads(&second, Ok(vec![thread(20, 2, "B", 2)])).unwrap();
        let outcome = cache
            .apply_threads(&first, Ok(vec![thread(10, 1, "A", 3)]))
            .unwrap();

        assert_eq!(outcome, LoadOutcome::Stale);
        assert_eq!(ids(&cache), vec!["20"]);
    }

    #[test]
    fn test_stale_failure_is_silent() {
        let mut cache = ThreadListCache::new();
        let first = cache.load_for_deal(DealId::from(1));
        cache.load_for_deal(DealId::from(2));

        let outcome = cache.apply_threads(&first, Err(FetchError::transport("timeout")));
        assert_eq!(outcome, Ok(LoadOutcome::Stale));
    }

    #[test]
    fn test_failure_keeps_list() {
        let mut cache = loaded(1, vec![thread(1, 1, "A", 1)]);
        let retry = cache.load_for_deal(DealId::from(1));

        let err = cache
            .apply_threads(&retry, Err(FetchError::transport("503")))
            .unwrap_err();
        assert!(matches!(err, FetchError::Transport { .. }));
        assert_eq!(ids(&cache), vec!["1"]);
        assert!(!cache.is_loading());
    }

    #[test]
    fn test_deal_switch_discards_list_immediately() {
        let mut cache = loaded(1, vec![thread(1, 1, "A", 1)]);
        let version = cache.version();

        cache.load_for_deal(DealId::from(2));
        assert!(cache.filtered().is_empty());
        assert!(cache.is_loading());
        assert!(cache.version() > version);
    }

    #[test]
    fn test_foreign_threads_dropped_and_unscoped_stamped() {
        let mut unscoped = thread(3, 1, "Unscoped", 2);
        unscoped.deal_id = None;
        let cache = loaded(1, vec![thread(1, 1, "Mine", 1), thread(2, 9, "Foreign", 5), unscoped]);

        assert_eq!(ids(&cache), vec!["3", "1"]);
        assert!(cache.threads().iter().all(|t| t.belongs_to(&DealId::from(1))));
    }

    #[test]
    fn test_search_does_not_mutate_base_list() {
        let mut cache = loaded(1, vec![thread(1, 1, "Renewal", 2), thread(2, 1, "Intro", 1)]);
        let version = cache.version();

        cache.set_search_term("intro");
        assert_eq!(ids(&cache), vec!["2"]);
        assert_eq!(cache.threads().len(), 2);
        assert_eq!(cache.version(), version);

        cache.set_search_term("");
        assert_eq!(ids(&cache), vec!["1", "2"]);
    }

    #[test]
    fn test_insert_new_prepends() {
        let mut cache = loaded(1, vec![thread(1, 1, "Newest loaded", 20)]);
        assert!(cache.insert_new(thread(42, 1, "Kickoff", 1)));
        assert_eq!(ids(&cache), vec!["42", "1"]);
        assert_eq!(cache.version(), 2);
    }

    #[test]
    fn test_insert_new_refuses_other_deal() {
        let mut cache = loaded(1, vec![]);
        assert!(!cache.insert_new(thread(42, 2, "Elsewhere", 1)));
        assert!(cache.filtered().is_empty());
    }

    #[test]
    fn test_inserted_thread_survives_older_reload() {
        let mut cache = loaded(1, vec![thread(1, 1, "A", 1)]);
        let reload = cache.load_for_deal(DealId::from(1));
        cache.insert_new(thread(42, 1, "Kickoff", 2));

        // Response computed before the thread was created
        cache.apply_threads(&reload, Ok(vec![thread(1, 1, "A", 1)])).unwrap();
        assert_eq!(ids(&cache), vec!["42", "1"]);
    }
}
