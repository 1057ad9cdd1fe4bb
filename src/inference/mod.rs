//! Text/vision generation backend, reachable only as request/response.
//!
//! The core never sees transport errors: `generate` collapses every failure into
//! an empty string, and callers check `is_available` first so a dead backend
//! short-circuits to a fallback judgment instead of stalling a cycle.

pub mod ollama;

#[cfg(test)]
pub(crate) mod mock;

use async_trait::async_trait;

pub use ollama::{InferenceError, OllamaClient};

#[async_trait]
pub trait InferenceBackend: Send + Sync {
    /// Run one prompt with optional image attachments (raw encoded bytes).
    /// Returns an empty string when the backend could not answer.
    async fn generate(&self, prompt: &str, images: &[Vec<u8>]) -> String;

    /// Cheap liveness probe.
    async fn is_available(&self) -> bool;
}
