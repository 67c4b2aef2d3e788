//! Configuration types for the memory subsystem
//!
//! The configuration follows a layered approach where every field carries a
//! sensible default, so a minimal YAML file (or none at all) yields a working
//! in-process setup and a single `remote_url` line upgrades it to the shared
//! Redis backing.

pub mod loader;

pub use loader::ConfigLoader;

use crate::errors::ConvoyError;
use serde::{Deserialize, Serialize};

/// Settings for context window management and the store backing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryConfig {
    /// Soft token budget for the context window.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: usize,
    /// Conversation rounds before compression may fire.
    #[serde(default = "default_summary_threshold")]
    pub summary_threshold: usize,
    /// Rounds kept verbatim after compression.
    #[serde(default = "default_keep_recent")]
    pub keep_recent: usize,
    /// Remote store key expiry, refreshed on every write.
    #[serde(default = "default_ttl_seconds")]
    pub ttl_seconds: u64,
    /// Remote store key prefix; the session id is appended.
    #[serde(default = "default_kv_prefix")]
    pub kv_prefix: String,
    /// Redis connection URL. When present the registry selects the remote
    /// store; otherwise histories stay in process memory.
    #[serde(default)]
    pub remote_url: Option<String>,
    /// Socket timeout for remote store operations, in seconds.
    #[serde(default = "default_io_timeout_secs")]
    pub io_timeout_secs: u64,
    /// Deadline for a single summarization call, in seconds.
    #[serde(default = "default_llm_timeout_secs")]
    pub llm_timeout_secs: u64,
}

fn default_max_tokens() -> usize {
    4000
}

fn default_summary_threshold() -> usize {
    10
}

fn default_keep_recent() -> usize {
    4
}

fn default_ttl_seconds() -> u64 {
    604_800
}

fn default_kv_prefix() -> String {
    "chat:".to_string()
}

fn default_io_timeout_secs() -> u64 {
    5
}

fn default_llm_timeout_secs() -> u64 {
    30
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            max_tokens: default_max_tokens(),
            summary_threshold: default_summary_threshold(),
            keep_recent: default_keep_recent(),
            ttl_seconds: default_ttl_seconds(),
            kv_prefix: default_kv_prefix(),
            remote_url: None,
            io_timeout_secs: default_io_timeout_secs(),
            llm_timeout_secs: default_llm_timeout_secs(),
        }
    }
}

impl MemoryConfig {
    /// Validate the configuration bounds.
    pub fn validate(&self) -> Result<(), ConvoyError> {
        if self.max_tokens < 256 {
            return Err(ConvoyError::ConfigError(format!(
                "max_tokens must be at least 256, got {}",
                self.max_tokens
            )));
        }
        if self.summary_threshold < 2 {
            return Err(ConvoyError::ConfigError(format!(
                "summary_threshold must be at least 2, got {}",
                self.summary_threshold
            )));
        }
        if self.keep_recent < 1 {
            return Err(ConvoyError::ConfigError(
                "keep_recent must be at least 1".to_string(),
            ));
        }
        if self.keep_recent >= self.summary_threshold {
            return Err(ConvoyError::ConfigError(format!(
                "keep_recent ({}) must be smaller than summary_threshold ({})",
                self.keep_recent, self.summary_threshold
            )));
        }
        Ok(())
    }
}
