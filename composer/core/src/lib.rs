//! Composer Core - Quota-Aware LLM Content Composition
//!
//! This crate provides the content-generation core for the courtesy
//! messaging system, completely independent of any delivery channel. It can
//! sit behind a mailer, a LinkedIn connector, or run headless for testing.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                   Delivery Collaborators                     │
//! │   (Gmail sender, LinkedIn sender, CLI -- external, not here) │
//! └──────────────────────────────┬───────────────────────────────┘
//!                                │ generate(recipient, context)
//! ┌──────────────────────────────┼───────────────────────────────┐
//! │                      COMPOSER CORE                           │
//! │  ┌───────────────────────────┴──────────────────────────┐    │
//! │  │                   ComposerEngine                     │    │
//! │  │  ┌───────────┐  ┌──────────┐  ┌───────────────────┐  │    │
//! │  │  │  Quota    │  │  Prompt  │  │     Backend       │  │    │
//! │  │  │  Tracker  │  │  Builder │  │  (Gemini / mock)  │  │    │
//! │  │  └───────────┘  └──────────┘  └───────────────────┘  │    │
//! │  └──────────────────────────────────────────────────────┘    │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Key Types
//!
//! - [`ComposerEngine`]: the generation orchestrator; its `generate` call
//!   never fails outward
//! - [`QuotaTracker`]: per-model cooldown bookkeeping after quota hits
//! - [`GenerationBackend`]: trait seam for LLM providers
//! - [`GeminiBackend`]: Gemini REST implementation of the seam
//! - [`MessageContent`]: the `{subject, body}` payload shape
//! - [`ComposerConfig`]: configuration loaded from env or TOML
//!
//! # Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use composer_core::{ComposerConfig, ComposerEngine, GeminiBackend, GenerationBackend};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = ComposerConfig::from_env();
//!     let backend = config.api_key.as_deref().map(|key| {
//!         Arc::new(GeminiBackend::new(key, config.generation.request_timeout()))
//!             as Arc<dyn GenerationBackend>
//!     });
//!
//!     let engine = ComposerEngine::new(&config, backend);
//!     let content = engine.generate("Jane Doe", "our scheduled meeting").await;
//!     println!("{content}");
//! }
//! ```

pub mod backend;
pub mod config;
pub mod generation;

pub use backend::{BackendError, GeminiBackend, GenerationBackend};
pub use config::{ComposerConfig, GenerationConfig, SenderInfo};
pub use generation::{ComposerEngine, FailureKind, MessageContent, QuotaTracker};
