//! Conversation backend boundary.
//!
//! The language model lives behind this trait; the orchestrator treats
//! every failure as recoverable and degrades to [`FALLBACK_REPLY`].

mod gemini;

pub use gemini::GeminiBackend;

use crate::emotion::EmotionLabel;
use crate::error::Result;
use async_trait::async_trait;

/// Static reply used when the backend is unreachable or misconfigured.
pub const FALLBACK_REPLY: &str =
    "I'm having trouble reaching my language service right now, but I'm still here with you. \
     Tell me more about how you're feeling.";

/// External, network-bound conversation generator.
///
/// Two distinct prompt paths: free-text user input (with the current
/// stabilized emotion as context) and unsolicited emotion check-ins
/// (keyed by label and confidence, no user text).
#[async_trait]
pub trait ConversationBackend: Send + Sync {
    /// Generate a reply to a user message, given the current emotion context.
    ///
    /// # Errors
    ///
    /// Returns an error on network, auth, or quota failure. Callers must
    /// treat this as recoverable.
    async fn generate_reply(&self, message: &str, emotion: EmotionLabel) -> Result<String>;

    /// Generate an unprompted check-in for a detected emotion.
    ///
    /// # Errors
    ///
    /// Returns an error on network, auth, or quota failure. Callers must
    /// treat this as recoverable.
    async fn generate_emotion_reply(&self, label: EmotionLabel, confidence: f32)
    -> Result<String>;
}
