//! Conversation history storage and context window management.
//!
//! Provides the history store abstraction the rest of the platform talks to,
//! its in-process and Redis-backed implementations, and the self-summarizing
//! buffer that keeps long dialogues inside a model's context window. Stores
//! are keyed implicitly by owner; isolation across sessions comes from the
//! registry handing each session its own store.

pub mod estimator;
pub mod in_process;
pub mod remote;
pub mod session;
pub mod sliding_window;
pub mod summary_buffer;

use crate::core_types::{Message, Role};
use crate::errors::ConvoyError;
use async_trait::async_trait;
use serde::Serialize;

pub use in_process::InProcessHistory;
pub use remote::RemoteHistory;
pub use session::SessionRegistry;
pub use sliding_window::SlidingWindowMemory;
pub use summary_buffer::SummaryBufferMemory;

/// Append-only conversation history, read as ordered snapshots.
///
/// Implementations guarantee total-ordered appends, atomic idempotent clear,
/// and snapshots that reflect every append ordered-before the read.
#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// Appends at the tail. Must not partially append.
    async fn append(&self, message: Message) -> Result<(), ConvoyError>;
    /// Returns a snapshot the caller may iterate without holding locks.
    async fn messages(&self) -> Result<Vec<Message>, ConvoyError>;
    /// Atomically replaces the history. On failure the prior state must
    /// remain observable.
    async fn set_messages(&self, messages: Vec<Message>) -> Result<(), ConvoyError>;
    /// Removes all messages for this owner. Idempotent.
    async fn clear(&self) -> Result<(), ConvoyError>;
    fn kind(&self) -> StoreKind;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreKind {
    InProcess,
    Remote,
}

#[derive(Debug, Clone, Serialize)]
pub struct MemoryStats {
    pub message_count: usize,
    pub summary_count: usize,
    pub rounds: usize,
    pub kind: StoreKind,
}

/// Number of completed conversation rounds in `messages`, where one round is
/// one user message followed by one assistant message.
pub fn round_count(messages: &[Message]) -> usize {
    let users = messages.iter().filter(|m| m.role == Role::User).count();
    let assistants = messages
        .iter()
        .filter(|m| m.role == Role::Assistant)
        .count();
    users.min(assistants)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_count_is_min_of_user_and_assistant() {
        let messages = vec![
            Message::system("summary so far"),
            Message::user("u1"),
            Message::assistant("a1"),
            Message::user("u2"),
        ];
        assert_eq!(round_count(&messages), 1);
        assert_eq!(round_count(&[]), 0);
    }

    #[test]
    fn store_kind_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&StoreKind::InProcess).unwrap(),
            r#""in_process""#
        );
        assert_eq!(
            serde_json::to_string(&StoreKind::Remote).unwrap(),
            r#""remote""#
        );
    }
}
