//! Configuration types for the emotion-aware assistant pipeline.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::warn;

/// Top-level configuration for the assistant.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistantConfig {
    /// Emotion sensing and smoothing settings.
    pub emotion: EmotionConfig,
    /// Unsolicited-response gate settings.
    pub gate: GateConfig,
    /// Chat log settings.
    pub chat: ChatConfig,
    /// Conversation backend (LLM API) settings.
    pub backend: BackendConfig,
    /// Speech synthesis settings.
    pub voice: VoiceConfig,
}

/// Emotion sensing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmotionConfig {
    /// Camera polling interval in milliseconds.
    pub poll_interval_ms: u64,
    /// Number of recent raw samples used to stabilize predictions.
    pub smoothing_window: usize,
    /// Minimum classifier confidence for a frame to count as a real
    /// emotion reading. Classifications below this are demoted to
    /// `unknown` before smoothing.
    ///
    /// Independent of [`GateConfig::trigger_threshold`], which decides
    /// whether a *stabilized* emotion warrants an unsolicited response.
    pub smoothing_threshold: f32,
}

impl Default for EmotionConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 2_000,
            smoothing_window: 5,
            smoothing_threshold: 0.6,
        }
    }
}

/// Response gate configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    /// Minimum stabilized confidence (exclusive) to consider responding.
    pub trigger_threshold: f32,
    /// Probability of actually responding once the threshold and
    /// neutral-suppression rules pass. Keeps the assistant from reacting
    /// to every qualifying frame.
    pub throttle_probability: f64,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            trigger_threshold: 0.7,
            throttle_probability: 0.1,
        }
    }
}

/// Chat log configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// Maximum number of retained chat messages. Oldest are evicted first.
    pub history_limit: usize,
    /// Fixed assistant greeting appended at startup.
    pub greeting: String,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            history_limit: 20,
            greeting: "Hello! I'm your mental health assistant. How are you feeling today?"
                .to_owned(),
        }
    }
}

/// Conversation backend configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Model name within the Gemini API.
    pub model: String,
    /// Base URL of the API server. Overridable for local proxies and tests.
    pub base_url: String,
    /// Environment variable holding the API key.
    pub api_key_env: String,
    /// Request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            model: "gemini-1.5-flash".to_owned(),
            base_url: "https://generativelanguage.googleapis.com".to_owned(),
            api_key_env: "GEMINI_API_KEY".to_owned(),
            request_timeout_secs: 15,
        }
    }
}

/// Placeholder value shipped in example configs; never a real key.
const PLACEHOLDER_API_KEY: &str = "your_gemini_api_key_here";

impl BackendConfig {
    /// Resolve the API key from the configured environment variable.
    ///
    /// Returns `None` (with a warning) when the variable is unset, empty,
    /// or still the placeholder. A missing key is not fatal: the assistant
    /// runs in degraded mode with static fallback replies.
    pub fn resolve_api_key(&self) -> Option<String> {
        match std::env::var(&self.api_key_env) {
            Ok(key) if !key.trim().is_empty() && key != PLACEHOLDER_API_KEY => Some(key),
            Ok(_) => {
                warn!(
                    "{} is empty or a placeholder; conversation backend disabled",
                    self.api_key_env
                );
                None
            }
            Err(_) => {
                warn!(
                    "{} is not set; conversation backend disabled",
                    self.api_key_env
                );
                None
            }
        }
    }
}

/// Speech synthesis configuration, handed to the synthesizer adapter.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VoiceConfig {
    /// Speech rate in words per minute.
    pub speech_rate: u32,
    /// Playback volume in `[0, 1]`.
    pub volume: f32,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            speech_rate: 150,
            volume: 0.9,
        }
    }
}

impl AssistantConfig {
    /// Load configuration from a TOML file, falling back to defaults for missing fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| crate::error::AssistantError::Config(e.to_string()))
    }

    /// Save configuration to a TOML file, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or the config cannot be serialized.
    pub fn save_to_file(&self, path: &std::path::Path) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::AssistantError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Returns the default config file path: `~/.config/solace/config.toml`.
    pub fn default_config_path() -> PathBuf {
        if let Some(config) = std::env::var_os("XDG_CONFIG_HOME") {
            PathBuf::from(config).join("solace").join("config.toml")
        } else if let Some(home) = std::env::var_os("HOME") {
            PathBuf::from(home)
                .join(".config")
                .join("solace")
                .join("config.toml")
        } else {
            PathBuf::from("/tmp/solace-config/config.toml")
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = AssistantConfig::default();
        assert!(config.emotion.poll_interval_ms > 0);
        assert!(config.emotion.smoothing_window > 0);
        assert!(config.gate.throttle_probability > 0.0 && config.gate.throttle_probability <= 1.0);
        assert!(config.chat.history_limit > 0);
        assert!(!config.chat.greeting.is_empty());
        assert!(!config.backend.model.is_empty());
        assert!(config.backend.request_timeout_secs > 0);
        assert!(config.voice.volume >= 0.0 && config.voice.volume <= 1.0);
    }

    #[test]
    fn thresholds_are_independent() {
        // The smoothing-relevant threshold and the trigger threshold serve
        // different purposes and must stay separately configurable.
        let toml_str = r#"
[emotion]
smoothing_threshold = 0.5

[gate]
trigger_threshold = 0.8
"#;
        let config: AssistantConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.emotion.smoothing_threshold, 0.5);
        assert_eq!(config.gate.trigger_threshold, 0.8);
    }

    #[test]
    fn defaults_match_reference_settings() {
        let config = AssistantConfig::default();
        assert_eq!(config.emotion.poll_interval_ms, 2_000);
        assert_eq!(config.emotion.smoothing_window, 5);
        assert_eq!(config.emotion.smoothing_threshold, 0.6);
        assert_eq!(config.gate.trigger_threshold, 0.7);
        assert_eq!(config.gate.throttle_probability, 0.1);
        assert_eq!(config.chat.history_limit, 20);
        assert_eq!(config.voice.speech_rate, 150);
    }

    #[test]
    fn partial_toml_uses_defaults() {
        let toml_str = "[gate]\nthrottle_probability = 1.0\n";
        let config: AssistantConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.gate.throttle_probability, 1.0);
        assert_eq!(config.gate.trigger_threshold, 0.7);
        assert_eq!(config.emotion.smoothing_window, 5);
    }

    #[test]
    fn save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = AssistantConfig::default();
        config.emotion.poll_interval_ms = 500;
        config.chat.history_limit = 7;
        config.save_to_file(&path).unwrap();

        let loaded = AssistantConfig::from_file(&path).unwrap();
        assert_eq!(loaded.emotion.poll_interval_ms, 500);
        assert_eq!(loaded.chat.history_limit, 7);
        assert_eq!(loaded.gate.trigger_threshold, 0.7);
    }

    #[test]
    fn placeholder_key_is_rejected() {
        let config = BackendConfig {
            api_key_env: "SOLACE_TEST_PLACEHOLDER_KEY".to_owned(),
            ..BackendConfig::default()
        };
        // SAFETY: test-local variable name, not read concurrently.
        unsafe { std::env::set_var("SOLACE_TEST_PLACEHOLDER_KEY", PLACEHOLDER_API_KEY) };
        assert!(config.resolve_api_key().is_none());
        unsafe { std::env::remove_var("SOLACE_TEST_PLACEHOLDER_KEY") };
    }

    #[test]
    fn missing_key_is_none() {
        let config = BackendConfig {
            api_key_env: "SOLACE_TEST_MISSING_KEY".to_owned(),
            ..BackendConfig::default()
        };
        assert!(config.resolve_api_key().is_none());
    }
}
