//! Speech-to-text and speech-synthesis boundaries.
//!
//! Both engines are external collaborators behind small synchronous
//! interfaces, called only from the blocking pool.

use crate::error::Result;

/// Continuously-listening transcription producer.
pub trait SpeechToText: Send + Sync {
    /// Block until the next utterance boundary and return its transcript.
    ///
    /// Returns `Ok(None)` when the engine heard nothing usable (silence,
    /// unintelligible audio); the listen worker simply tries again.
    ///
    /// # Errors
    ///
    /// Returns an error if the microphone or recognizer fails. Errors are
    /// logged and listening continues; only `stop()` ends the worker.
    fn next_utterance(&self) -> Result<Option<String>>;
}

/// On-demand speech synthesis consumer.
///
/// Calls block until playback completes. Overlapping requests are
/// serialized by the pipeline's synthesis queue, so implementations never
/// see concurrent `speak` calls.
pub trait SpeechSynthesizer: Send + Sync {
    /// Synthesize and play the given text.
    ///
    /// # Errors
    ///
    /// Returns an error if synthesis or playback fails.
    fn speak(&self, text: &str) -> Result<()>;
}
