//! Fixed-size sliding window history store.
//!
//! The simplest retention strategy: keep only the N most recent messages,
//! evicting from the front on append. Zero computational overhead and a
//! guaranteed bound on context size, at the cost of losing early context
//! entirely. Useful where recency dominates relevance and no LLM should be
//! involved in retention at all.

use crate::core_types::Message;
use crate::errors::ConvoyError;
use crate::memory::{HistoryStore, StoreKind};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};

pub struct SlidingWindowMemory {
    messages: Mutex<VecDeque<Message>>,
    max_messages: usize,
}

impl SlidingWindowMemory {
    pub fn new(max_messages: usize) -> Self {
        Self {
            messages: Mutex::new(VecDeque::with_capacity(max_messages)),
            max_messages,
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, VecDeque<Message>>, ConvoyError> {
        self.messages
            .lock()
            .map_err(|_| ConvoyError::StoreUnavailable("window mutex poisoned".to_string()))
    }
}

#[async_trait]
impl HistoryStore for SlidingWindowMemory {
    async fn append(&self, message: Message) -> Result<(), ConvoyError> {
        let mut messages = self.lock()?;
        if messages.len() >= self.max_messages {
            messages.pop_front();
        }
        messages.push_back(message);
        Ok(())
    }

    async fn messages(&self) -> Result<Vec<Message>, ConvoyError> {
        Ok(self.lock()?.iter().cloned().collect())
    }

    async fn set_messages(&self, messages: Vec<Message>) -> Result<(), ConvoyError> {
        let mut window: VecDeque<Message> = messages.into();
        while window.len() > self.max_messages {
            window.pop_front();
        }
        *self.lock()? = window;
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
