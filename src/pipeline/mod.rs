//! The emotion-signal and conversation pipeline.

pub mod coordinator;
pub mod messages;
pub mod orchestrator;
