//! Thread search filter
//!
//! A plain case-insensitive substring match over what the thread list
//! already holds; nothing is fetched to answer a search.

use crate::models::Thread;

/// Normalized search term; `None` means "match everything"
pub fn normalize_term(term: &str) -> Option<String> {
    if term.trim().is_empty() {
        None
    } else {
        Some(term.to_lowercase())
    }
}

/// Whether `thread` matches an already lowercased, non-empty `needle`.
///
/// Matches the subject, then embedded message content and sender display
/// names. Threads without embedded messages match on subject only.
pub fn thread_matches(thread: &Thread, needle: &str) -> bool {
    if thread.subject.to_lowercase().contains(needle) {
        return true;
    }

    let Some(messages) = &thread.messages else {
        return false;
    };
    messages.iter().any(|message| {
        message.content.to_lowercase().contains(needle)
            || message
                .sender
                .display_name()
                .is_some_and(|name| name.to_lowercase().contains(needle))
    })
}

/// Indices of the threads matching `term`, in list order
pub fn filter_indices(threads: &[Thread], term: &str) -> Vec<usize> {
    match normalize_term(term) {
        None => (0..threads.len()).collect(),
        Some(needle) => threads
            .iter()
            .enumerate()
            .filter(|(_, thread)| thread_matches(thread, &needle))
            .map(|(i, _)| i)
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Message;

    fn sample() -> Vec<Thread> {
        vec![
            Thread::new("1", "1", "Renewal Q3", None),
            Thread::new("2", "1", "Intro call", None).with_messages(vec![
                Message::builder("m1")
                    .content("budget approved")
                    .sender_name("Ana Lee")
                    .build(),
            ]),
            Thread::new("3", "1", "Pricing", None).with_messages(vec![
                Message::builder("m2")
                    .content("see attached")
                    .person("Bo", "Chen")
                    .build(),
            ]),
        ]
    }

    #[test]
    fn test_subject_match_is_case_insensitive() {
        assert_eq!(filter_indices(&sample(), "renewal"), vec![0]);
        assert_eq!(filter_indices(&sample(), "RENEWAL"), vec![0]);
    }

    #[test]
    fn test_content_and_sender_match() {
        assert_eq!(filter_indices(&sample(), "budget"), vec![1]);
        assert_eq!(filter_indices(&sample(), "ana"), vec![1]);
        assert_eq!(filter_indices(&sample(), "bo chen"), vec![2]);
    }

    #[test]
    fn test_empty_and_blank_terms_match_all() {
        assert_eq!(filter_indices(&sample(), ""), vec![0, 1, 2]);
        assert_eq!(filter_indices(&sample(), "   "), vec![0, 1, 2]);
    }

    #[test]
    fn test_lazy_thread_matches_subject_only() {
        let lazy = Thread::new("4", "1", "Contract", None);
        assert!(thread_matches(&lazy, "contract"));
        assert!(!thread_matches(&lazy, "budget"));
    }

    #[test]
    fn test_no_match() {
        assert!(filter_indices(&sample(), "invoice").is_empty());
    }
}
