//! Composer Configuration
//!
//! Configuration for the composition engine: sender identity, the ordered
//! model preference list, the base prompt, and generation tuning. Loadable
//! from a TOML file or from environment variables, with sensible defaults
//! for every field.
//!
//! # Environment Variables
//!
//! - `GEMINI_API_KEY`: API key for the Gemini backend (absent = unconfigured,
//!   engine falls back immediately)
//! - `COMPOSER_MODELS`: comma-separated model preference list
//! - `LLM_PROMPT`: base instruction prepended to every prompt
//! - `SENDER_NAME` / `SENDER_EMAIL`: sender identity used in prompts and
//!   fallback content

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default base instruction when `LLM_PROMPT` is not set
pub const DEFAULT_BASE_PROMPT: &str = "Draft a professional email.";

/// Default model preference list, most preferred first
fn default_models() -> Vec<String> {
    vec![
        "gemini-2.5-flash".to_string(),
        "gemini-2.5-flash-lite".to_string(),
        "gemini-2.0-flash".to_string(),
    ]
}

fn default_base_prompt() -> String {
    DEFAULT_BASE_PROMPT.to_string()
}

// ============================================================================
// Sender
// ============================================================================

/// Identity of the person the messages are written on behalf of
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SenderInfo {
    /// Display name, embedded in prompts and fallback content
    pub name: String,
    /// Email address (used by delivery collaborators, opaque here)
    pub email: String,
}

impl Default for SenderInfo {
    fn default() -> Self {
        Self {
            name: "Samer Attrah".to_string(),
            email: "samiratra95@gmail.com".to_string(),
        }
    }
}

// ============================================================================
// Generation Tuning
// ============================================================================

/// Tuning knobs for the retry/cooldown loop
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Seconds a model stays in cooldown after a quota hit
    pub cooldown_secs: u64,

    /// Maximum full passes over the model list before falling back
    pub max_cycles: u32,

    /// Seconds to pause between cycles when at least one model was attempted
    pub cycle_pause_secs: u64,

    /// Per-request HTTP timeout in seconds
    pub request_timeout_secs: u64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            cooldown_secs: 60,
            max_cycles: 3,
            cycle_pause_secs: 3,
            request_timeout_secs: 30,
        }
    }
}

impl GenerationConfig {
    /// Cooldown window after a quota hit
    #[must_use]
    pub fn cooldown(&self) -> Duration {
        Duration::from_secs(self.cooldown_secs)
    }

    /// Pause between cycles after a pass with failed attempts
    #[must_use]
    pub fn cycle_pause(&self) -> Duration {
        Duration::from_secs(self.cycle_pause_secs)
    }

    /// Per-request HTTP timeout
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

// ============================================================================
// Composer Configuration
// ============================================================================

/// Top-level configuration for the composition engine
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ComposerConfig {
    /// Sender identity
    pub sender: SenderInfo,

    /// Ordered model preference list (first = most preferred)
    #[serde(default = "default_models")]
    pub models: Vec<String>,

    /// Base instruction prepended to every prompt
    #[serde(default = "default_base_prompt")]
    pub base_prompt: String,

    /// Retry/cooldown tuning
    pub generation: GenerationConfig,

    /// Gemini API key; `None` means no generation capability is configured
    pub api_key: Option<String>,
}

impl ComposerConfig {
    /// Build configuration from environment variables over defaults
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::new();

        if let Ok(key) = std::env::var("GEMINI_API_KEY") {
            if !key.trim().is_empty() {
                config.api_key = Some(key);
            }
        }
        if let Ok(models) = std::env::var("COMPOSER_MODELS") {
            config.models = parse_model_list(&models);
        }
        if let Ok(prompt) = std::env::var("LLM_PROMPT") {
            if !prompt.trim().is_empty() {
                config.base_prompt = prompt;
            }
        }
        if let Ok(name) = std::env::var("SENDER_NAME") {
            if !name.trim().is_empty() {
                config.sender.name = name;
            }
        }
        if let Ok(email) = std::env::var("SENDER_EMAIL") {
            if !email.trim().is_empty() {
                config.sender.email = email;
            }
        }

        config.normalize();
        config
    }

    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&raw)?;
        config.normalize();
        Ok(config)
    }

    /// Default configuration
    #[must_use]
    pub fn new() -> Self {
        Self {
            sender: SenderInfo::default(),
            models: default_models(),
            base_prompt: default_base_prompt(),
            generation: GenerationConfig::default(),
            api_key: None,
        }
    }

    /// Drop blank model entries and trim the rest
    fn normalize(&mut self) {
        self.models = self
            .models
            .iter()
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty())
            .collect();
    }
}

impl Default for ComposerConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Split a comma-separated model list, dropping blanks
fn parse_model_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(String::from)
        .collect()
}
