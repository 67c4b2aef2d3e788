//! Language model interface and HTTP client implementation.
//!
//! The memory core consumes exactly one external capability: turning a list
//! of messages into a completion string. Everything provider-specific lives
//! behind the [`LLM`] trait so the buffer stays testable with a scripted
//! in-process mock.

use crate::core_types::Message;
use crate::errors::ConvoyError;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub mod summarizer;

pub use summarizer::Summarizer;

#[async_trait]
pub trait LLM: Send + Sync {
    async fn complete(&self, messages: Vec<Message>) -> Result<String, ConvoyError>;
}

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP client for an OpenAI-style chat completions endpoint.
pub struct HttpLLMClient {
    pub endpoint_url: String,
    client: Client,
}

impl HttpLLMClient {
    pub fn new(endpoint_url: String) -> Result<Self, ConvoyError> {
        Self::with_timeout(endpoint_url, DEFAULT_REQUEST_TIMEOUT)
    }

    pub fn with_timeout(endpoint_url: String, timeout: Duration) -> Result<Self, ConvoyError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ConvoyError::LLMError(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self {
            endpoint_url,
            client,
        })
    }
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    messages: &'a [Message],
}

#[derive(Deserialize)]
struct CompletionResponse {
    content: Option<String>,
}

#[async_trait]
impl LLM for HttpLLMClient {
    async fn complete(&self, messages: Vec<Message>) -> Result<String, ConvoyError> {
        let request_url = format!("{}/v1/chat/completions", self.endpoint_url);
        log::debug!(
            "HttpLLMClient sending {} messages to {}",
            messages.len(),
            request_url
        );

        let response = self
            .client
            .post(&request_url)
            .json(&CompletionRequest {
                messages: &messages,
            })
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "unreadable error body".to_string());
            let err_msg = format!("LLM API request failed with status {}: {}", status, error_text);
            log::error!("{}", err_msg);
            return Err(ConvoyError::LLMError(err_msg));
        }

        let completion: CompletionResponse = response.json().await.map_err(|e| {
            let err_msg = format!("failed to parse LLM response JSON: {}", e);
            log::error!("{}", err_msg);
            ConvoyError::LLMError(err_msg)
        })?;

        completion
            .content
            .ok_or_else(|| ConvoyError::LLMError("completion contained no content".to_string()))
    }
}
