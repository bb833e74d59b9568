//! LLM Backend Abstraction
//!
//! Trait seam and provider implementations for the generation capability.
//! The engine only ever sees [`GenerationBackend`]; provider-specific wire
//! details live in the implementations.

pub mod gemini;
pub mod traits;

pub use gemini::GeminiBackend;
pub use traits::{BackendError, GenerationBackend};
