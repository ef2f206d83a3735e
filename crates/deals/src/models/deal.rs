//! Deal model: the sales opportunity that scopes every thread

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::id::opaque_id;

opaque_id!(
    /// Unique identifier for a deal
    DealId
);

/// A sales opportunity record
///
/// Identity is `id`. Fields other than `id` and `deal_name` are kept
/// verbatim in `extra`; the engine never interprets them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deal {
    pub id: DealId,
    #[serde(default)]
    pub deal_name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Deal {
    pub fn new(id: impl Into<DealId>, deal_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            deal_name: deal_name.into(),
            extra: Map::new(),
        }
    }

    /// Name to show in a deal picker
    pub fn display_name(&self) -> &str {
        if self.deal_name.trim().is_empty() {
            self.id.as_str()
        } else {
            &self.deal_name
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deal_keeps_unknown_fields() {
        let json = r#"{"id": 3, "deal_name": "Acme renewal", "stage": "proposal", "amount": 12000}"#;
        let deal: Deal = serde_json::from_str(json).unwrap();

        assert_eq!(deal.id, DealId::from(3));
        assert_eq!(deal.deal_name, "Acme renewal");
        assert_eq!(deal.extra.get("stage"), Some(&Value::from("proposal")));
        assert_eq!(deal.extra.len(), 2);
    }

    #[test]
    fn test_display_name_falls_back_to_id() {
        let deal = Deal::new("9", "  ");
        assert_eq!(deal.display_name(), "9");
    }
}
