//! Generation Orchestrator
//!
//! The main entry point for content generation. Walks the ordered model
//! preference list under guidance of the [`QuotaTracker`], retries across a
//! bounded number of cycles, and degrades to deterministic fallback content
//! when nothing succeeds.
//!
//! # Contract
//!
//! [`ComposerEngine::generate`] never fails outward. Callers dispatching
//! real messages must not lose a batch run because one draft could not be
//! generated, so every failure category is absorbed: quota errors become
//! cooldowns, transient errors skip to the next model, and total exhaustion
//! resolves to the fallback template.
//!
//! # Waiting
//!
//! Inter-cycle waits are `tokio::time::sleep`, so a paused-time test runtime
//! drives the whole retry schedule without wall-clock delays. Worst case the
//! call blocks for `max_cycles x max(cooldown window, cycle pause)`; callers
//! needing a hard bound should wrap the call in their own timeout.

use std::sync::Arc;

use tokio::time::{sleep, Duration, Instant};
use tracing::{debug, info, warn};

use crate::backend::GenerationBackend;
use crate::config::ComposerConfig;

use super::classify::{classify, FailureKind};
use super::content::MessageContent;
use super::prompt::build_prompt;
use super::quota::QuotaTracker;

/// Extra wait added on top of the shortest remaining cooldown, so the
/// earliest entry has definitely expired when the next cycle starts
const COOLDOWN_WAIT_SLACK: Duration = Duration::from_secs(1);

/// The generation orchestrator
pub struct ComposerEngine {
    /// Generation capability; `None` means unconfigured (immediate fallback)
    backend: Option<Arc<dyn GenerationBackend>>,

    /// Ordered model preference list, first = most preferred
    models: Vec<String>,

    /// Per-model cooldown state, owned here for the process lifetime
    quota: QuotaTracker,

    /// Sender display name for prompts and fallback content
    sender_name: String,

    /// Base instruction prepended to every prompt
    base_prompt: String,

    /// Maximum full passes over the model list
    max_cycles: u32,

    /// Pause between cycles when at least one model was attempted
    cycle_pause: Duration,
}

impl ComposerEngine {
    /// Create an engine from configuration and an optional backend
    #[must_use]
    pub fn new(config: &ComposerConfig, backend: Option<Arc<dyn GenerationBackend>>) -> Self {
        Self {
            backend,
            models: config.models.clone(),
            quota: QuotaTracker::new(config.generation.cooldown()),
            sender_name: config.sender.name.clone(),
            base_prompt: config.base_prompt.clone(),
            max_cycles: config.generation.max_cycles,
            cycle_pause: config.generation.cycle_pause(),
        }
    }

    /// The engine's quota tracker (cooldown state inspection)
    #[must_use]
    pub fn quota(&self) -> &QuotaTracker {
        &self.quota
    }

    /// Generate message content for a recipient.
    ///
    /// Returns either genuine model output (verbatim, expected to decode as
    /// a `{subject, body}` object - see [`MessageContent::parse`]) or the
    /// fallback template in the same shape. Never an error.
    pub async fn generate(&self, recipient_name: &str, context: &str) -> String {
        let prompt = build_prompt(&self.base_prompt, recipient_name, context, &self.sender_name);

        let Some(backend) = &self.backend else {
            info!("No generation backend configured. Using fallback content.");
            return self.fallback(recipient_name, context);
        };

        if self.models.is_empty() {
            info!("Model list is empty. Using fallback content.");
            return self.fallback(recipient_name, context);
        }

        for cycle in 1..=self.max_cycles {
            if cycle > 1 {
                debug!(cycle, max_cycles = self.max_cycles, "Starting next cycle through models");
            }

            let mut attempted = 0usize;
            let mut in_cooldown = 0usize;

            for model in &self.models {
                let now = Instant::now().into_std();
                if !self.quota.is_available_at(model, now) {
                    let remaining = self
                        .quota
                        .remaining_cooldown_at(model, now)
                        .unwrap_or_default();
                    debug!(
                        model = %model,
                        remaining_secs = remaining.as_secs(),
                        "Model in cooldown. Skipping."
                    );
                    in_cooldown += 1;
                    continue;
                }

                debug!(model = %model, backend = backend.name(), "Attempting generation");
                attempted += 1;

                match backend.generate(model, &prompt).await {
                    Ok(text) if !text.trim().is_empty() => {
                        info!(model = %model, "Generated content");
                        return text;
                    }
                    Ok(_) => {
                        // Whitespace-only output: transient, no cooldown mark
                        warn!(model = %model, "Empty response from model. Trying next model.");
                    }
                    Err(err) => match classify(&err) {
                        FailureKind::Quota => {
                            self.quota.record_exhaustion_at(model, now);
                            warn!(
                                model = %model,
                                cooldown_secs = self.quota.window().as_secs(),
                                "Quota exceeded. Marked for cooldown."
                            );
                        }
                        FailureKind::Transient => {
                            warn!(model = %model, error = %err, "Generation failed. Trying next model.");
                        }
                    },
                }
            }

            let final_cycle = cycle == self.max_cycles;

            if attempted == 0 && in_cooldown == self.models.len() {
                if final_cycle {
                    info!("All models in cooldown on final cycle.");
                    break;
                }
                // Wait until the first model comes out of cooldown
                let wait = self
                    .quota
                    .min_remaining_at(Instant::now().into_std())
                    .unwrap_or(self.quota.window())
                    + COOLDOWN_WAIT_SLACK;
                info!(wait_secs = wait.as_secs(), "All models in cooldown. Waiting for quota reset.");
                sleep(wait).await;
            } else if attempted > 0 && !final_cycle {
                debug!(
                    pause_secs = self.cycle_pause.as_secs(),
                    "All available models tried. Pausing before next cycle."
                );
                sleep(self.cycle_pause).await;
            }
        }

        warn!(
            cycles = self.max_cycles,
            "All models failed. Using fallback content."
        );
        self.fallback(recipient_name, context)
    }

    /// Serialize the fixed-template fallback for this engine's sender
    fn fallback(&self, recipient_name: &str, context: &str) -> String {
        MessageContent::fallback(recipient_name, context, &self.sender_name).to_json()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::test_utils::MockBackend;

    fn engine_with(backend: Option<Arc<dyn GenerationBackend>>, models: &[&str]) -> ComposerEngine {
        let mut config = ComposerConfig::new();
        config.models = models.iter().map(|m| (*m).to_string()).collect();
        config.sender.name = "Sam".to_string();
        ComposerEngine::new(&config, backend)
    }

    #[tokio::test]
    async fn test_unconfigured_backend_falls_back_immediately() {
        let engine = engine_with(None, &["m1"]);
        let out = engine.generate("Jane", "ctx").await;

        let content = MessageContent::parse(&out).unwrap();
        assert_eq!(content.subject, "Hello Jane");
    }

    #[tokio::test]
    async fn test_prompt_carries_recipient_context_and_sender() {
        let mock = Arc::new(MockBackend::new());
        let engine = engine_with(Some(mock.clone() as Arc<dyn GenerationBackend>), &["m1"]);
        engine.generate("Jane Doe", "the quarterly review").await;

        let calls = mock.calls();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].prompt.contains("Recipient Name: Jane Doe"));
        assert!(calls[0].prompt.contains("Context: the quarterly review"));
        assert!(calls[0].prompt.contains("Sender Name: Sam"));
    }

    #[tokio::test]
    async fn test_empty_model_list_never_invokes_backend() {
        let mock = Arc::new(MockBackend::new());
        let engine = engine_with(Some(mock.clone() as Arc<dyn GenerationBackend>), &[]);
        let out = engine.generate("Jane", "ctx").await;

        assert!(MessageContent::parse(&out).is_some());
        assert!(mock.calls().is_empty());
    }
}
