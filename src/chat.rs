//! Chat log: an append-only, capped sequence of conversation messages.
//!
//! The log has exactly one logical writer (the conversation orchestrator).
//! Readers only ever observe whole messages forwarded over the presentation
//! channel, never partial updates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Who produced a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// User input typed into the interface.
    UserText,
    /// User input transcribed from speech.
    UserVoice,
    /// Assistant response.
    Assistant,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UserText => write!(f, "user_text"),
            Self::UserVoice => write!(f, "user_voice"),
            Self::Assistant => write!(f, "assistant"),
        }
    }
}

/// A single conversation message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Who sent the message.
    pub sender: Role,
    /// Message text.
    pub text: String,
    /// When the message was appended to the log.
    pub timestamp: DateTime<Utc>,
}

/// Append-only chat log with a retention cap.
///
/// Once the cap is exceeded the oldest entries are evicted; eviction never
/// reorders or rewrites the remaining entries.
#[derive(Debug)]
pub struct ChatLog {
    messages: VecDeque<ChatMessage>,
    capacity: usize,
}

impl ChatLog {
    /// Create a log retaining at most `capacity` messages.
    pub fn new(capacity: usize) -> Self {
        Self {
            messages: VecDeque::with_capacity(capacity.min(64)),
            capacity: capacity.max(1),
        }
    }

    /// Append a message, evicting the oldest entries past the cap.
    ///
    /// Returns a clone of the appended message so the caller can forward
    /// it to the presentation surface.
    pub fn push(&mut self, sender: Role, text: impl Into<String>) -> ChatMessage {
        let message = ChatMessage {
            sender,
            text: text.into(),
            timestamp: Utc::now(),
        };
        self.messages.push_back(message.clone());
        while self.messages.len() > self.capacity {
            let _ = self.messages.pop_front();
        }
        message
    }

    /// Number of retained messages.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Whether the log is empty.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Iterate over retained messages, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &ChatMessage> {
        self.messages.iter()
    }
}
