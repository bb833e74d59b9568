//! Content Generation
//!
//! The algorithmic core of the composer: the orchestration engine that walks
//! the model preference list, the quota tracker that decides which models are
//! currently usable, failure classification at the backend boundary, prompt
//! construction, and the `{subject, body}` content shape with its
//! deterministic fallback.

pub mod classify;
pub mod content;
pub mod engine;
pub mod prompt;
pub mod quota;
pub mod test_utils;

pub use classify::{classify, FailureKind};
pub use content::MessageContent;
pub use engine::ComposerEngine;
pub use quota::QuotaTracker;
