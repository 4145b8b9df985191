//! Camera and emotion-classifier boundaries.
//!
//! Frame acquisition and classification are external collaborators. The
//! classifier is synchronous and potentially slow; the camera stage runs
//! both calls on the blocking pool, never on the presentation path.

use crate::emotion::EmotionLabel;
use crate::error::Result;

/// An opaque captured video frame.
///
/// The pipeline never inspects pixel data; it only carries frames from the
/// source to the classifier.
#[derive(Debug, Clone, Default)]
pub struct Frame {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Raw pixel bytes in whatever layout the source and classifier agree on.
    pub data: Vec<u8>,
}

/// Source of camera frames.
///
/// Implementations may block on frame acquisition; they are only ever
/// called from the blocking pool.
pub trait FrameSource: Send + Sync {
    /// Acquire the next frame.
    ///
    /// # Errors
    ///
    /// Returns an error if the device is unavailable or the read fails.
    fn next_frame(&self) -> Result<Frame>;
}

/// Maps a frame to an `(emotion, confidence)` pair.
///
/// Implementations should report no-face frames as
/// ([`EmotionLabel::Unknown`], 0.0) rather than erroring.
pub trait EmotionClassifier: Send + Sync {
    /// Classify one frame.
    ///
    /// # Errors
    ///
    /// Returns an error if inference fails.
    fn classify(&self, frame: &Frame) -> Result<(EmotionLabel, f32)>;
}
