//! Failure Classification
//!
//! Decides whether a backend failure is quota exhaustion (model-scoped,
//! recoverable after a cooldown) or transient (attempt-scoped, just try the
//! next model). A structured HTTP 429 is quota; otherwise the rendered error
//! is scanned for the markers the upstream service actually emits. The
//! substring scan is the real contract with the provider, so it lives here
//! at the boundary rather than being folded into the backend.

use crate::backend::BackendError;

/// Substrings that identify a quota/rate-limit failure in rendered errors
const QUOTA_MARKERS: &[&str] = &["429", "ResourceExhausted", "RESOURCE_EXHAUSTED", "Quota"];

/// How a backend failure should be handled
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FailureKind {
    /// Quota/rate-limit exhaustion: record a cooldown for the model
    Quota,
    /// Anything else: skip to the next model without marking cooldown
    Transient,
}

/// Classify a backend failure
#[must_use]
pub fn classify(err: &BackendError) -> FailureKind {
    if let BackendError::Http { status: 429, .. } = err {
        return FailureKind::Quota;
    }

    let rendered = err.to_string();
    if QUOTA_MARKERS.iter().any(|marker| rendered.contains(marker)) {
        FailureKind::Quota
    } else {
        FailureKind::Transient
    }
}
