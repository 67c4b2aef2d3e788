//! LLM-based conversation summarization
//!
//! The summarizer is the only memory-core component that talks to the LLM.
//! It renders the messages to be compressed as a transcript, asks for a short
//! prose synthesis, and degrades to `None` on any failure so the buffer can
//! fall back to plain truncation. Retries, if any, belong to the LLM layer.

use crate::core_types::Message;
use crate::llm::LLM;
use log::warn;
use std::sync::Arc;
use std::time::Duration;

const SUMMARIZATION_PROMPT: &str = "Summarize the conversation below in at most 200 words of prose. \
Preserve named entities, decisions that were made, and facts that were stated. \
Write a single flowing paragraph; do not use bullet points.\n\n\
CONVERSATION:\n{transcript}\n\nSUMMARY:";

const DEFAULT_LLM_TIMEOUT: Duration = Duration::from_secs(30);

pub struct Summarizer {
    llm: Arc<dyn LLM>,
    timeout: Duration,
}

impl Summarizer {
    pub fn new(llm: Arc<dyn LLM>) -> Self {
        Self {
            llm,
            timeout: DEFAULT_LLM_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Produce a single system message synthesizing `messages`, or `None` if
    /// the LLM call failed, timed out, or returned an empty completion.
    pub async fn summarize(&self, messages: &[Message]) -> Option<Message> {
        if messages.is_empty() {
            return None;
        }

        let transcript = messages
            .iter()
            .map(|m| format!("{:?}: {}", m.role, m.content))
            .collect::<Vec<String>>()
            .join("\n");
        let prompt = SUMMARIZATION_PROMPT.replace("{transcript}", &transcript);

        let request = self.llm.complete(vec![Message::system(prompt)]);
        match tokio::time::timeout(self.timeout, request).await {
            Ok(Ok(content)) => {
                let content = content.trim();
                if content.is_empty() {
                    warn!("summarization returned an empty completion, falling back");
                    None
                } else {
                    Some(Message::system(content))
                }
            }
            Ok(Err(e)) => {
                warn!("summarization LLM call failed: {}, falling back", e);
                None
            }
            Err(_) => {
                warn!(
                    "summarization timed out after {:?}, falling back",
                    self.timeout
                );
                None
            }
        }
    }
}
