//! Generation Backend Trait
//!
//! Trait definition for LLM generation backends. This abstraction allows the
//! composer to work with different providers (Gemini, a local server, mocks)
//! without changing orchestration logic.
//!
//! # Design Philosophy
//!
//! The trait is deliberately narrow: one prompt in, one text payload out.
//! Streaming, chat history, and tool use are out of scope for courtesy
//! message drafting. Implementations handle provider-specific details
//! (endpoints, auth headers, response shapes) and surface failures as
//! [`BackendError`] so the orchestrator can classify them.

use async_trait::async_trait;
use thiserror::Error;

/// Failure surfaced by a generation backend.
///
/// The `Display` text matters: quota classification scans it for upstream
/// markers when the structured status is not enough (see
/// `generation::classify`).
#[derive(Debug, Error)]
pub enum BackendError {
    /// The provider answered with a non-success HTTP status
    #[error("HTTP {status}: {body}")]
    Http {
        /// HTTP status code
        status: u16,
        /// Response body, verbatim
        body: String,
    },

    /// The request never produced a response (connect, timeout, TLS, ...)
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The provider answered but the payload carried no text
    #[error("empty response from model")]
    EmptyResponse,
}

/// Generation backend trait
///
/// Implement this trait to add support for different LLM providers.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Get the backend name (e.g., "Gemini")
    fn name(&self) -> &str;

    /// Send a prompt to the given model and wait for the complete text.
    ///
    /// A successful return carries the raw model output; the orchestrator
    /// decides whether it is usable. Failures carry enough detail for
    /// quota-vs-transient classification.
    async fn generate(&self, model: &str, prompt: &str) -> Result<String, BackendError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_error_display_carries_status_and_body() {
        let err = BackendError::Http {
            status: 429,
            body: "Resource has been exhausted".to_string(),
        };
        let rendered = err.to_string();
        assert!(rendered.contains("429"));
        assert!(rendered.contains("Resource has been exhausted"));
    }

    #[test]
    fn test_empty_response_display() {
        let err = BackendError::EmptyResponse;
        assert_eq!(err.to_string(), "empty response from model");
    }
}
