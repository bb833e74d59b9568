//! Gemini Backend Implementation
//!
//! Generation backend for the Google Gemini REST API.
//!
//! # Gemini API
//!
//! The API exposes one endpoint per model:
//! - `POST /v1beta/models/{model}:generateContent` - batch completion
//!
//! Authentication is an `x-goog-api-key` header. The response nests the
//! generated text under `candidates[0].content.parts[].text`; quota
//! exhaustion comes back as HTTP 429 with a `RESOURCE_EXHAUSTED` status in
//! the body, which the classifier in `generation::classify` picks up from
//! the error text.

use std::time::Duration;

use async_trait::async_trait;

use super::traits::{BackendError, GenerationBackend};

/// Default API root for the Gemini REST API
const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Gemini backend client
#[derive(Clone)]
pub struct GeminiBackend {
    /// API key sent with every request
    api_key: String,
    /// API root (overridable for self-hosted proxies and tests)
    base_url: String,
    /// HTTP client
    http_client: reqwest::Client,
}

impl GeminiBackend {
    /// Create a new Gemini backend with the given request timeout
    pub fn new(api_key: impl Into<String>, timeout: Duration) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            http_client: reqwest::Client::builder()
                .timeout(timeout)
                .build()
                .expect("Failed to create HTTP client"),
        }
    }

    /// Override the API root (proxy or test server)
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Get generateContent endpoint URL for a model
    fn generate_url(&self, model: &str) -> String {
        format!("{}/models/{}:generateContent", self.base_url, model)
    }
}

#[async_trait]
impl GenerationBackend for GeminiBackend {
    fn name(&self) -> &'static str {
        "Gemini"
    }

    async fn generate(&self, model: &str, prompt: &str) -> Result<String, BackendError> {
        let url = self.generate_url(model);

        let json_request = serde_json::json!({
            "contents": [{
                "parts": [{ "text": prompt }]
            }]
        });

        let response = self
            .http_client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&json_request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(BackendError::Http { status, body });
        }

        let data: serde_json::Value = response.json().await?;
        extract_text(&data)
    }
}

/// Pull the generated text out of a generateContent response body.
///
/// Concatenates all parts of the first candidate. A response without any
/// text (safety-blocked, truncated, malformed) is an `EmptyResponse`.
fn extract_text(data: &serde_json::Value) -> Result<String, BackendError> {
    let text: String = data
        .get("candidates")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("content"))
        .and_then(|c| c.get("parts"))
        .and_then(|p| p.as_array())
        .map(|parts| {
            parts
                .iter()
                .filter_map(|p| p.get("text").and_then(|t| t.as_str()))
                .collect()
        })
        .unwrap_or_default();

    if text.is_empty() {
        Err(BackendError::EmptyResponse)
    } else {
        Ok(text)
    }
}
