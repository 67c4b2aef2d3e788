//! Core message types shared across the memory subsystem
//!
//! This module defines the fundamental conversation record exchanged between
//! the buffer, the stores, and the language model interface. The wire format
//! is kept deliberately small and stable: `{role, content, metadata?}`, with
//! roles serialized lowercase so that remote histories stay readable by other
//! consumers of the key-value service.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// A single conversation record. Messages are immutable once appended;
/// ordering is by insertion only and no timestamps are load-bearing.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Message {
    pub role: Role,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<HashMap<String, Value>>,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            metadata: None,
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    /// Attaches a metadata map. Unknown keys survive a serialization
    /// round-trip untouched.
    pub fn with_metadata(mut self, metadata: HashMap<String, Value>) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn roles_serialize_lowercase() {
        let message = Message::user("hi");
        let wire = serde_json::to_string(&message).unwrap();
        assert_eq!(wire, r#"{"role":"user","content":"hi"}"#);
    }

    #[test]
    fn metadata_round_trips_unknown_fields() {
        let mut metadata = HashMap::new();
        metadata.insert("tag".to_string(), json!(1));
        metadata.insert("source".to_string(), json!({"channel": "web"}));
        let message = Message::user("hi").with_metadata(metadata);

        let wire = serde_json::to_string(&message).unwrap();
        let decoded: Message = serde_json::from_str(&wire).unwrap();
        assert_eq!(decoded, message);
        assert_eq!(decoded.metadata.unwrap()["source"]["channel"], json!("web"));
    }

    #[test]
    fn equality_is_structural() {
        assert_eq!(Message::user("a"), Message::user("a"));
        assert_ne!(Message::user("a"), Message::assistant("a"));
    }
}
