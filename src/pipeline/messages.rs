//! Message types passed between pipeline stages.
//!
//! Every producer (camera worker, voice worker, typed input) delivers a
//! tagged [`PipelineEvent`] to the orchestrator loop; the loop in turn
//! emits [`UiEvent`]s over the presentation channel. No worker ever
//! mutates shared state directly.

use crate::chat::ChatMessage;
use crate::emotion::{EmotionLabel, RawEmotionSample};

/// Where a piece of user input came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputOrigin {
    /// Typed into the interface.
    Typed,
    /// Transcribed from speech.
    Voice,
}

/// One event consumed by the orchestrator loop.
#[derive(Debug, Clone)]
pub enum PipelineEvent {
    /// A raw emotion classification from the camera worker.
    RawSample(RawEmotionSample),
    /// A transcribed utterance from the voice worker.
    Transcript(String),
    /// Text typed by the user.
    UserText(String),
}

/// Events delivered to the presentation surface.
///
/// The surface drains these on its own single-affinity thread; each event
/// is a complete value, so readers never observe a partial update.
#[derive(Debug, Clone)]
pub enum UiEvent {
    /// A message was appended to the chat log.
    Message(ChatMessage),
    /// The stabilized emotion state changed.
    EmotionIndicator {
        /// Stabilized label.
        label: EmotionLabel,
        /// Stabilized confidence.
        confidence: f32,
    },
}
