//! Volatile in-process history store.
//!
//! The simplest backing: an ordered vector behind a mutex so concurrent
//! appends land in a well-defined total order. Snapshots are defensive
//! copies. No persistence; process exit loses all state.

use crate::core_types::Message;
use crate::errors::ConvoyError;
use crate::memory::{HistoryStore, StoreKind};
use async_trait::async_trait;
use std::sync::{Mutex, MutexGuard};

#[derive(Default)]
pub struct InProcessHistory {
    messages: Mutex<Vec<Message>>,
}

impl InProcessHistory {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Vec<Message>>, ConvoyError> {
        self.messages
            .lock()
            .map_err(|_| ConvoyError::StoreUnavailable("history mutex poisoned".to_string()))
    }
}

#[async_trait]
impl HistoryStore for InProcessHistory {
    async fn append(&self, message: Message) -> Result<(), ConvoyError> {
        self.lock()?.push(message);
        Ok(())
    }

    async fn messages(&self) -> Result<Vec<Message>, ConvoyError> {
        Ok(self.lock()?.clone())
    }

    async fn set_messages(&self, messages: Vec<Message>) -> Result<(), ConvoyError> {
        *self.lock()? = messages;
        Ok(())
    }

    async fn clear(&self) -> Result<(), ConvoyError> {
        self.lock()?.clear();
        Ok(())
    }

    fn kind(&self) -> StoreKind {
        StoreKind::InProcess
    }
}
