//! Self-summarizing conversation buffer.
//!
//! Presents the history store interface while transparently compressing old
//! conversation rounds into a single LLM-written system message. Compression
//! runs on read, not on write: appends stay cheap, ordered, and lossless up
//! to the next read boundary, and an LLM outage degrades to plain truncation
//! that heals itself on a later read.
//!
//! The hybrid strategy keeps the best of both worlds: a compact synthesis of
//! strategic context up front, with the most recent rounds verbatim so the
//! assistant retains precise recall of the immediate exchange.

use crate::config::MemoryConfig;
use crate::core_types::{Message, Role};
use crate::errors::ConvoyError;
use crate::llm::{Summarizer, LLM};
use crate::memory::estimator::estimate_tokens;
use crate::memory::{round_count, HistoryStore, MemoryStats, StoreKind};
use async_trait::async_trait;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

/// Fraction of the token budget that triggers compression.
const TOKEN_PRESSURE_RATIO: f64 = 0.8;

pub struct SummaryBufferMemory {
    store: Arc<dyn HistoryStore>,
    summarizer: Summarizer,
    max_tokens: usize,
    summary_threshold: usize,
    keep_recent: usize,
    summaries: Mutex<Vec<String>>,
    // Serializes compression per buffer; appends never take this lock.
    compression: tokio::sync::Mutex<()>,
}

impl SummaryBufferMemory {
    pub fn new(
        store: Arc<dyn HistoryStore>,
        llm: Arc<dyn LLM>,
        config: &MemoryConfig,
    ) -> Result<Self, ConvoyError> {
        config.validate()?;
        let summarizer =
            Summarizer::new(llm).with_timeout(Duration::from_secs(config.llm_timeout_secs));
        Ok(Self {
            store,
            summarizer,
            max_tokens: config.max_tokens,
            summary_threshold: config.summary_threshold,
            keep_recent: config.keep_recent,
            summaries: Mutex::new(Vec::new()),
            compression: tokio::sync::Mutex::new(()),
        })
    }

    /// Snapshot of the summary ledger: one entry per compression, in order.
    pub fn summaries(&self) -> Vec<String> {
        self.summaries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub async fn stats(&self) -> Result<MemoryStats, ConvoyError> {
        let messages = self.store.messages().await?;
        let summary_count = self
            .summaries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len();
        Ok(MemoryStats {
            message_count: messages.len(),
            summary_count,
            rounds: round_count(&messages),
            kind: self.store.kind(),
        })
    }

    fn should_compress(&self, messages: &[Message]) -> bool {
        if round_count(messages) > self.summary_threshold {
            return true;
        }
        let pressure_budget = (self.max_tokens as f64 * TOKEN_PRESSURE_RATIO) as usize;
        estimate_tokens(messages) > pressure_budget
    }

    async fn manage_context(&self, history: Vec<Message>) -> Vec<Message> {
        if !self.should_compress(&history) {
            return history;
        }

        let Some(start) = tail_rounds(&history, self.keep_recent) else {
            // Not enough rounds on record to carve a tail; keep everything.
            return history;
        };
        let (old, recent) = history.split_at(start);

        if !old.is_empty() && old.iter().all(|m| m.role == Role::System) {
            // The prefix is a previous compression; summarizing a summary
            // only drifts.
            return history;
        }

        // Token pressure can fire while the kept tail already spans the whole
        // history. There is no prefix to drop then, so the full transcript is
        // summarized and fronted instead.
        let to_summarize = if old.is_empty() { recent } else { old };

        log::info!(
            "compressing history: {} messages, {} kept verbatim, ~{} tokens",
            history.len(),
            recent.len(),
            estimate_tokens(&history)
        );

        match self.summarizer.summarize(to_summarize).await {
            Some(summary) => {
                self.summaries
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .push(summary.content.clone());

                let mut compressed = Vec::with_capacity(recent.len() + 1);
                compressed.push(summary);
                compressed.extend_from_slice(recent);

                if let Err(e) = self.store.set_messages(compressed.clone()).await {
                    log::warn!("failed to persist compressed history: {}", e);
                }
                compressed
            }
            None => {
                // Truncation is presentational only: nothing is written back,
                // so a later read can retry with a working summarizer.
                let keep = (2 * self.keep_recent).min(history.len());
                history[history.len() - keep..].to_vec()
            }
        }
    }
}

#[async_trait]
impl HistoryStore for SummaryBufferMemory {
    async fn append(&self, message: Message) -> Result<(), ConvoyError> {
        self.store.append(message).await
    }

    async fn messages(&self) -> Result<Vec<Message>, ConvoyError> {
        let _compressing = self.compression.lock().await;
        let history = self.store.messages().await?;
        Ok(self.manage_context(history).await)
    }

    async fn set_messages(&self, messages: Vec<Message>) -> Result<(), ConvoyError> {
        self.store.set_messages(messages).await
    }

    async fn clear(&self) -> Result<(), ConvoyError> {
        self.store.clear().await?;
        self.summaries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        Ok(())
    }

    fn kind(&self) -> StoreKind {
        self.store.kind()
    }
}

/// Index of the first message of the last `rounds` conversation rounds,
/// scanning from the tail and counting user messages. `None` when the
/// history holds fewer user messages than requested.
fn tail_rounds(messages: &[Message], rounds: usize) -> Option<usize> {
    let mut collected = 0;
    for (idx, message) in messages.iter().enumerate().rev() {
        if message.role == Role::User {
            collected += 1;
            if collected == rounds {
                return Some(idx);
            }
        }
    }
    None
}
