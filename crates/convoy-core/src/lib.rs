//! Conversation memory core for the Convoy assistant platform.
//!
//! This crate provides the memory subsystem that keeps long dialogues inside
//! a model's context window while preserving recoverable history. The design
//! centers on a self-summarizing buffer that transparently compresses old
//! conversation rounds into an LLM-written synthesis on read, leaving writes
//! cheap and ordered.
//!
//! # Architecture Overview
//!
//! The crate is organized around a few small subsystems:
//!
//! - **History stores**: an append-only store abstraction with in-process and
//!   Redis-backed implementations, keyed per session
//! - **Self-summarizing buffer**: wraps any store and compresses history once
//!   a round or token threshold is crossed
//! - **Session registry**: lazily constructs one buffer per session id and
//!   selects the concrete store backing from configuration
//! - **Language model integration**: the narrow completion interface the
//!   summarizer calls, with an HTTP client implementation
//! - **Configuration system**: YAML-loadable settings with validated bounds

pub mod config;
pub mod core_types;
pub mod errors;
pub mod llm;
pub mod memory;

pub use config::MemoryConfig;
pub use core_types::{Message, Role};
pub use errors::ConvoyError;
pub use llm::LLM;
pub use memory::session::SessionRegistry;
pub use memory::summary_buffer::SummaryBufferMemory;
pub use memory::{HistoryStore, MemoryStats, StoreKind};

#[cfg(test)]
pub mod test_utils;
