//! Solace: real-time emotion-aware conversational assistant pipeline.
//!
//! A continuously running visual-emotion sensor produces noisy per-frame
//! classifications; these are smoothed, gated, and selectively used to
//! drive a conversation loop that also accepts typed and spoken input.
//!
//! # Architecture
//!
//! Independent stages connected by async channels:
//! - **Camera worker**: polls frames and the external emotion classifier
//! - **Smoother**: majority-votes a sliding window into a stable state
//! - **Gate**: decides whether a stabilized emotion warrants an
//!   unsolicited check-in (confidence floor, neutral suppression,
//!   probabilistic throttle)
//! - **Orchestrator**: single owner of the chat log; mediates gated
//!   emotion events, typed input, and voice transcripts through the
//!   external conversation backend
//! - **Voice worker / synthesis queue**: speech-to-text in, spoken
//!   replies out
//!
//! The presentation surface and all model engines are external
//! collaborators behind traits.

pub mod backend;
pub mod capture;
pub mod chat;
pub mod config;
pub mod emotion;
pub mod error;
pub mod pipeline;
pub mod vision;
pub mod voice;

pub use backend::{ConversationBackend, FALLBACK_REPLY, GeminiBackend};
pub use capture::{CaptureLifecycle, LifecycleState};
pub use chat::{ChatLog, ChatMessage, Role};
pub use config::AssistantConfig;
pub use emotion::{
    EmotionLabel, EmotionSmoother, GateReason, RawEmotionSample, ResponseDecision, ResponseGate,
    SmoothedEmotionState,
};
pub use error::{AssistantError, Result};
pub use pipeline::coordinator::PipelineCoordinator;
pub use pipeline::messages::{InputOrigin, PipelineEvent, UiEvent};
