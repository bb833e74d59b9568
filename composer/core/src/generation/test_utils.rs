//! Generation Test Utilities
//!
//! Mock infrastructure for exercising the engine without real LLM calls.
//! The [`MockBackend`] supports per-model scripted outcomes, request history
//! tracking, and simulated quota failures for cooldown/fallback testing.
//!
//! # Usage
//!
//! ```ignore
//! use composer_core::generation::test_utils::{MockBackend, MockOutcome};
//!
//! let backend = MockBackend::new();
//! backend.script("m1", vec![MockOutcome::QuotaExhausted]);
//! backend.script("m2", vec![MockOutcome::Success("{\"subject\":\"S\",\"body\":\"B\"}".into())]);
//!
//! // After the test, verify which models were called
//! assert_eq!(backend.request_count("m1"), 1);
//! ```

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::backend::{BackendError, GenerationBackend};

/// Scripted result for one mock generation attempt
#[derive(Clone, Debug)]
pub enum MockOutcome {
    /// Return this text as a successful generation
    Success(String),
    /// Fail with an HTTP 429 quota error
    QuotaExhausted,
    /// Fail with a non-quota server error carrying this message
    Failure(String),
}

impl MockOutcome {
    /// A success outcome with a valid `{subject, body}` payload naming the model
    #[must_use]
    pub fn default_success(model: &str) -> Self {
        Self::Success(format!(
            "{{\"subject\":\"From {model}\",\"body\":\"Drafted by {model}\"}}"
        ))
    }
}

/// Captured request for test verification
#[derive(Clone, Debug)]
pub struct ModelCall {
    /// Model the engine asked for
    pub model: String,
    /// Full prompt it sent
    pub prompt: String,
}

/// Mock generation backend with scripted per-model outcomes.
///
/// Outcomes queued via [`script`](Self::script) are consumed in order; once a
/// model's queue is empty, attempts fall back to the model's
/// [`always`](Self::always) outcome, or to a default valid success payload
/// when nothing is configured.
#[derive(Default)]
pub struct MockBackend {
    /// Per-model queues of scripted outcomes
    scripts: Mutex<HashMap<String, VecDeque<MockOutcome>>>,
    /// Per-model outcome used when the script queue is empty
    always: Mutex<HashMap<String, MockOutcome>>,
    /// Every request the engine made, in order
    history: Mutex<Vec<ModelCall>>,
}

impl MockBackend {
    /// Create a mock backend with no scripts (every attempt succeeds)
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue outcomes for a model, consumed one per attempt
    pub fn script(&self, model: &str, outcomes: Vec<MockOutcome>) {
        let mut scripts = self.scripts.lock().unwrap();
        scripts.entry(model.to_string()).or_default().extend(outcomes);
    }

    /// Set the outcome used once a model's script queue is exhausted
    pub fn always(&self, model: &str, outcome: MockOutcome) {
        let mut always = self.always.lock().unwrap();
        always.insert(model.to_string(), outcome);
    }

    /// All requests made so far, in order
    #[must_use]
    pub fn calls(&self) -> Vec<ModelCall> {
        self.history.lock().unwrap().clone()
    }

    /// Models called so far, in order, with repeats
    #[must_use]
    pub fn models_called(&self) -> Vec<String> {
        self.history
            .lock()
            .unwrap()
            .iter()
            .map(|c| c.model.clone())
            .collect()
    }

    /// Number of requests made for one model
    #[must_use]
    pub fn request_count(&self, model: &str) -> usize {
        self.history
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.model == model)
            .count()
    }

    /// Pick the next outcome for a model
    fn next_outcome(&self, model: &str) -> MockOutcome {
        let mut scripts = self.scripts.lock().unwrap();
        if let Some(queue) = scripts.get_mut(model) {
            if let Some(outcome) = queue.pop_front() {
                return outcome;
            }
        }
        drop(scripts);

        let always = self.always.lock().unwrap();
        always
            .get(model)
            .cloned()
            .unwrap_or_else(|| MockOutcome::default_success(model))
    }
}

#[async_trait]
impl GenerationBackend for MockBackend {
    fn name(&self) -> &'static str {
        "Mock"
    }

    async fn generate(&self, model: &str, prompt: &str) -> Result<String, BackendError> {
        self.history.lock().unwrap().push(ModelCall {
            model: model.to_string(),
            prompt: prompt.to_string(),
        });

        match self.next_outcome(model) {
            MockOutcome::Success(text) => Ok(text),
            MockOutcome::QuotaExhausted => Err(BackendError::Http {
                status: 429,
                body: "Resource has been exhausted (e.g. check quota).".to_string(),
            }),
            MockOutcome::Failure(message) => Err(BackendError::Http {
                status: 500,
                body: message,
            }),
        }
    }
}
