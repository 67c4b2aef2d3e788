//! Error types for failure handling across the memory core
//!
//! A single unified error hierarchy keeps the propagation policy legible:
//! store outages surface to writers so they can retry or fall back, while
//! read-side degradation (summarizer faults, undecodable elements) is handled
//! inside the buffer and never reaches the caller as an error.

use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum ConvoyError {
    #[error("history store unavailable: {0}")]
    StoreUnavailable(String),
    #[error("message serialization failed: {0}")]
    SerializationError(String),
    #[error("configuration error: {0}")]
    ConfigError(String),
    #[error("LLM interaction failed: {0}")]
    LLMError(String),
}

impl From<serde_json::Error> for ConvoyError {
    fn from(err: serde_json::Error) -> Self {
        ConvoyError::SerializationError(err.to_string())
    }
}

impl From<redis::RedisError> for ConvoyError {
    fn from(err: redis::RedisError) -> Self {
        ConvoyError::StoreUnavailable(err.to_string())
    }
}

impl From<reqwest::Error> for ConvoyError {
    fn from(err: reqwest::Error) -> Self {
        ConvoyError::LLMError(err.to_string())
    }
}
