//! Context window estimation for compression decisions
//!
//! A deliberately cheap heuristic: the estimate only ever feeds a comparison
//! against the configured token budget, so absolute accuracy does not matter
//! as long as the result is deterministic and monotonic in content length.
//! Never calls the LLM.

use crate::core_types::Message;

/// Estimate the token footprint of `messages`.
///
/// Rough approximation: 2 characters per token.
pub fn estimate_tokens(messages: &[Message]) -> usize {
    let chars: usize = messages.iter().map(|m| m.content.len()).sum();
    chars / 2
}
