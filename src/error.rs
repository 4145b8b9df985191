//! Error types for the solace pipeline.

/// Top-level error type for the emotion-aware assistant.
#[derive(Debug, thiserror::Error)]
pub enum AssistantError {
    /// Camera device or frame acquisition error.
    #[error("camera error: {0}")]
    Camera(String),

    /// Emotion classification error.
    #[error("vision error: {0}")]
    Vision(String),

    /// Speech-to-text transcription error.
    #[error("STT error: {0}")]
    Stt(String),

    /// Text-to-speech synthesis error.
    #[error("TTS error: {0}")]
    Tts(String),

    /// Conversation backend error (network, auth, quota).
    #[error("backend error: {0}")]
    Backend(String),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, AssistantError>;
