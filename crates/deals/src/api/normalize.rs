//! Backend payload normalization
//!
//! Converts wire payloads into domain models. Timestamps are parsed
//! leniently; a value that cannot be read becomes `None` instead of failing
//! the whole response.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde_json::Value;

use super::wire::{MessagePayload, ThreadPayload};
use crate::models::{Message, Sender, Thread};

/// Epoch values above this are taken as milliseconds
const EPOCH_MILLIS_THRESHOLD: i64 = 100_000_000_000;

const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Normalize a thread payload
pub fn normalize_thread(payload: ThreadPayload) -> Thread {
    let mut messages = payload
        .messages
        .map(|list| list.into_iter().map(normalize_message).collect::<Vec<_>>());
    if let Some(list) = messages.as_mut() {
        Message::sort_for_display(list);
    }

    Thread {
        id: payload.id,
        deal_id: payload.deal_id,
        subject: payload.subject.unwrap_or_default(),
        last_message_date: payload.last_message_date.as_ref().and_then(parse_timestamp),
        messages,
    }
}

/// Normalize a message payload
pub fn normalize_message(payload: MessagePayload) -> Message {
    Message {
        id: payload.id,
        thread_id: payload.thread_id,
        content: payload.content.unwrap_or_default(),
        sender: Sender::from_parts(payload.first_name, payload.last_name, payload.sender_name),
        created_at: payload.created_at.as_ref().and_then(parse_timestamp),
    }
}

/// Parse a timestamp from a JSON string or epoch number
pub fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => parse_timestamp_str(s),
        Value::Number(n) => {
            let n = n.as_i64()?;
            if n.unsigned_abs() >= EPOCH_MILLIS_THRESHOLD.unsigned_abs() {
                Utc.timestamp_millis_opt(n).single()
            } else {
                Utc.timestamp_opt(n, 0).single()
            }
        }
        _ => None,
    }
}

fn parse_timestamp_str(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DealId, ThreadId, UNKNOWN_SENDER};
    use serde_json::json;

    fn expected() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 10, 1, 12, 30, 0).unwrap()
    }

    #[test]
    fn test_parse_rfc3339() {
        assert_eq!(parse_timestamp(&json!("2024-10-01T12:30:00Z")), Some(expected()));
        assert_eq!(
            parse_timestamp(&json!("2024-10-01T14:30:00+02:00")),
            Some(expected())
        );
    }

    #[test]
    fn test_parse_http_date() {
        assert_eq!(
            parse_timestamp(&json!("Tue, 01 Oct 2024 12:30:00 GMT")),
            Some(expected())
        );
    }

    #[test]
    fn test_parse_naive_as_utc() {
        assert_eq!(parse_timestamp(&json!("2024-10-01T12:30:00")), Some(expected()));
        assert_eq!(
            parse_timestamp(&json!("2024-10-01 12:30:00.000000")),
            Some(expected())
        );
    }

    #[test]
    fn test_parse_epoch() {
        let secs = expected().timestamp();
        assert_eq!(parse_timestamp(&json!(secs)), Some(expected()));
        assert_eq!(parse_timestamp(&json!(secs * 1000)), Some(expected()));
        assert_eq!(parse_timestamp(&json!(i64::MIN)), None);
    }

    #[test]
    fn test_unparseable_is_none() {
        assert_eq!(parse_timestamp(&json!("next tuesday")), None);
        assert_eq!(parse_timestamp(&json!("")), None);
        assert_eq!(parse_timestamp(&Value::Null), None);
    }

    #[test]
    fn test_normalize_thread_with_embedded_messages() {
        let payload: ThreadPayload = serde_json::from_value(json!({
            "id": 11,
            "deal_id": 3,
            "subject": "Intro call",
            "last_message_date": "2024-10-01T12:30:00Z",
            "messages": [
                {"id": 2, "content": "second", "sender_name": "Ana Lee", "created_at": "2024-10-01T12:30:00Z"},
                {"id": 1, "content": "first", "first_name": "Bo", "last_name": "Chen", "created_at": "2024-09-30T08:00:00Z"}
            ]
        }))
        .unwrap();

        let thread = normalize_thread(payload);
        assert_eq!(thread.id, ThreadId::from(11));
        assert_eq!(thread.deal_id, Some(DealId::from(3)));
        assert_eq!(thread.last_message_date, Some(expected()));

        let messages = thread.messages.unwrap();
        assert_eq!(messages[0].content, "first");
        assert_eq!(messages[0].sender.label(), "Bo Chen");
        assert_eq!(messages[1].sender.label(), "Ana Lee");
    }

    #[test]
    fn test_normalize_sparse_payloads() {
        let thread: ThreadPayload =
            serde_json::from_value(json!({"id": "t-1", "subject": null})).unwrap();
        let thread = normalize_thread(thread);
        assert_eq!(thread.subject, "");
        assert!(thread.deal_id.is_none());
        assert!(thread.messages.is_none());

        let message: MessagePayload = serde_json::from_value(json!({"id": 5})).unwrap();
        let message = normalize_message(message);
        assert_eq!(message.sender.label(), UNKNOWN_SENDER);
        assert!(message.created_at.is_none());
    }
}
