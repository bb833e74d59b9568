//! Composer Demo
//!
//! Headless demonstration of the composition engine: drafts one courtesy
//! message for a sample recipient and prints the parsed result. No contacts
//! are loaded and nothing is sent.
//!
//! # Usage
//!
//! ```bash
//! # With a real Gemini key
//! GEMINI_API_KEY=... composer-demo
//!
//! # Without a key: exercises the fallback path
//! composer-demo
//!
//! # With verbose logging
//! RUST_LOG=debug composer-demo
//! ```
//!
//! # Environment Variables
//!
//! - `GEMINI_API_KEY`: Gemini API key (absent = fallback content)
//! - `COMPOSER_MODELS`: comma-separated model preference list
//! - `LLM_PROMPT`: base instruction for the prompt
//! - `SENDER_NAME` / `SENDER_EMAIL`: sender identity
//! - `RUST_LOG`: log level (trace, debug, info, warn, error)

use std::sync::Arc;

use tracing::info;

use composer_core::{ComposerConfig, ComposerEngine, GeminiBackend, GenerationBackend, MessageContent};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("composer_core=info".parse()?)
                .add_directive("composer_demo=info".parse()?),
        )
        .with_target(true)
        .init();

    let config = ComposerConfig::from_env();

    let backend = config.api_key.as_deref().map(|key| {
        Arc::new(GeminiBackend::new(key, config.generation.request_timeout()))
            as Arc<dyn GenerationBackend>
    });

    info!(
        models = ?config.models,
        backend_configured = backend.is_some(),
        "Starting composer demo"
    );

    let engine = ComposerEngine::new(&config, backend);

    let recipient = "Jane Doe";
    let context = "our scheduled meeting for next week";
    let raw = engine.generate(recipient, context).await;

    match MessageContent::parse(&raw) {
        Some(content) => {
            println!("Subject: {}", content.subject);
            println!();
            println!("{}", content.body);
        }
        None => {
            // Model ignored the format instruction; show what it produced
            println!("{raw}");
        }
    }

    Ok(())
}
