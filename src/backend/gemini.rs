//! Gemini `generateContent` adapter for the conversation backend.
//!
//! Talks to the Google Generative Language REST API. No streaming: replies
//! are short, and the orchestrator speaks them whole.

use super::ConversationBackend;
use crate::config::BackendConfig;
use crate::emotion::EmotionLabel;
use crate::error::{AssistantError, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};

/// Persona preamble prepended to every prompt.
const PERSONA_PROMPT: &str = "You are a warm, supportive mental-health companion. \
     Reply in one or two short sentences, conversational and kind. \
     Never diagnose; suggest professional help for anything serious.";

/// Conversation backend using the Gemini HTTP API.
pub struct GeminiBackend {
    client: reqwest::Client,
    base_url: String,
    model: String,
    /// Resolved API key. `None` means degraded mode: every request fails
    /// fast and the orchestrator falls back to a static reply.
    api_key: Option<String>,
}

impl GeminiBackend {
    /// Create a backend, resolving the API key from the environment.
    ///
    /// A missing or placeholder key is not fatal (a warning is logged by
    /// the config layer); requests will fail fast until a key is provided.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &BackendConfig) -> Result<Self> {
        let api_key = config.resolve_api_key();
        Self::with_api_key(config, api_key)
    }

    /// Create a backend with an explicit API key (or none).
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn with_api_key(config: &BackendConfig, api_key: Option<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| AssistantError::Backend(format!("cannot build HTTP client: {e}")))?;

        info!(
            "conversation backend configured: {} model={} key={}",
            config.base_url,
            config.model,
            if api_key.is_some() { "set" } else { "absent" }
        );

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_owned(),
            model: config.model.clone(),
            api_key,
        })
    }

    async fn generate(&self, prompt: String) -> Result<String> {
        let key = self
            .api_key
            .as_deref()
            .ok_or_else(|| AssistantError::Backend("no API key configured".into()))?;

        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );
        let body = serde_json::json!({
            "contents": [{ "parts": [{ "text": prompt }] }]
        });

        debug!("requesting completion from {url}");
        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AssistantError::Backend(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(AssistantError::Backend(format!(
                "API returned {status}: {}",
                detail.chars().take(200).collect::<String>()
            )));
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| AssistantError::Backend(format!("malformed response: {e}")))?;

        parsed
            .first_text()
            .map(|t| t.trim().to_owned())
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AssistantError::Backend("response contained no text".into()))
    }
}

#[async_trait]
impl ConversationBackend for GeminiBackend {
    async fn generate_reply(&self, message: &str, emotion: EmotionLabel) -> Result<String> {
        let prompt = format!(
            "{PERSONA_PROMPT}\n\n\
             The user currently appears {emotion} based on their facial expression.\n\
             User message: {message}"
        );
        self.generate(prompt).await
    }

    async fn generate_emotion_reply(
        &self,
        label: EmotionLabel,
        confidence: f32,
    ) -> Result<String> {
        let prompt = format!(
            "{PERSONA_PROMPT}\n\n\
             The user hasn't said anything, but their facial expression reads as {label} \
             (confidence {:.0}%). Offer one brief, gentle, unprompted check-in that \
             acknowledges how they seem to be feeling.",
            confidence * 100.0
        );
        self.generate(prompt).await
    }
}

// ── Response shape ──────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

impl GenerateContentResponse {
    fn first_text(&self) -> Option<&str> {
        self.candidates
            .iter()
            .filter_map(|c| c.content.as_ref())
            .flat_map(|c| c.parts.iter())
            .find_map(|p| p.text.as_deref())
    }
}
