//! Opaque identifiers assigned by the collaboration backend
//!
//! The backend hands out ids as JSON integers in some places and strings in
//! others. Both shapes deserialize into the same newtype; integer-shaped ids
//! serialize back as integers so request bodies keep the server's shape.

use serde::{Deserialize, Deserializer, Serializer};

/// Either wire shape of a backend identifier
#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Int(i64),
    Text(String),
}

pub(crate) fn deserialize_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match RawId::deserialize(deserializer)? {
        RawId::Int(n) => n.to_string(),
        RawId::Text(s) => s,
    })
}

pub(crate) fn serialize_id<S: Serializer>(raw: &str, serializer: S) -> Result<S::Ok, S::Error> {
    match raw.parse::<i64>() {
        Ok(n) if n.to_string() == raw => serializer.serialize_i64(n),
        _ => serializer.serialize_str(raw),
    }
}

macro_rules! opaque_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl From<i64> for $name {
            fn from(n: i64) -> Self {
                Self(n.to_string())
            }
        }

        impl From<i32> for $name {
            fn from(n: i32) -> Self {
                Self(n.to_string())
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                $crate::models::id::serialize_id(&self.0, serializer)
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                $crate::models::id::deserialize_id(deserializer).map(Self)
            }
        }
    };
}

pub(crate) use opaque_id;

opaque_id!(
    /// Unique identifier for a thread
    ThreadId
);

opaque_id!(
    /// Unique identifier for a message
    MessageId
);
