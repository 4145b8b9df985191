//! Emotion data types shared across the sensing pipeline.

mod gate;
mod smoother;

pub use gate::{GateReason, ResponseDecision, ResponseGate};
pub use smoother::EmotionSmoother;

use crate::vision::Frame;
use serde::{Deserialize, Serialize};

/// Closed set of emotion classes produced by the visual classifier.
///
/// `Unknown` covers low-confidence readings and frames with no detectable
/// face; it never drives an unsolicited response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmotionLabel {
    Happy,
    Sad,
    Angry,
    Neutral,
    Surprised,
    Fearful,
    Disgusted,
    Unknown,
}

impl EmotionLabel {
    /// Parse a classifier label string. Unrecognized labels map to `Unknown`.
    pub fn parse(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "happy" => Self::Happy,
            "sad" => Self::Sad,
            "angry" => Self::Angry,
            "neutral" => Self::Neutral,
            "surprised" | "surprise" => Self::Surprised,
            "fearful" | "fear" => Self::Fearful,
            "disgusted" | "disgust" => Self::Disgusted,
            _ => Self::Unknown,
        }
    }

    /// Stable lowercase name, as used in prompts and the UI indicator.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Happy => "happy",
            Self::Sad => "sad",
            Self::Angry => "angry",
            Self::Neutral => "neutral",
            Self::Surprised => "surprised",
            Self::Fearful => "fearful",
            Self::Disgusted => "disgusted",
            Self::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for EmotionLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One classifier output per camera polling tick, before smoothing.
///
/// Ephemeral: superseded by the next sample, never persisted.
#[derive(Debug, Clone)]
pub struct RawEmotionSample {
    /// Classified emotion for this frame.
    pub label: EmotionLabel,
    /// Classifier confidence in `[0, 1]`.
    pub confidence: f32,
    /// The frame the classification was made on.
    pub frame: Frame,
}

/// Stabilized emotion belief derived from the smoothing window.
///
/// Valid until the next raw sample arrives. Written only by the smoother;
/// read by the response gate and the presentation surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SmoothedEmotionState {
    /// Majority label across the window.
    pub label: EmotionLabel,
    /// Mean confidence of the window samples matching the winning label.
    pub confidence: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_known_labels() {
        assert_eq!(EmotionLabel::parse("happy"), EmotionLabel::Happy);
        assert_eq!(EmotionLabel::parse("SAD"), EmotionLabel::Sad);
        assert_eq!(EmotionLabel::parse("surprise"), EmotionLabel::Surprised);
        assert_eq!(EmotionLabel::parse("fear"), EmotionLabel::Fearful);
        assert_eq!(EmotionLabel::parse("disgust"), EmotionLabel::Disgusted);
    }

    #[test]
    fn parse_unrecognized_is_unknown() {
        assert_eq!(EmotionLabel::parse("confused"), EmotionLabel::Unknown);
        assert_eq!(EmotionLabel::parse(""), EmotionLabel::Unknown);
    }

    #[test]
    fn display_round_trips() {
        for label in [
            EmotionLabel::Happy,
            EmotionLabel::Sad,
            EmotionLabel::Angry,
            EmotionLabel::Neutral,
            EmotionLabel::Surprised,
            EmotionLabel::Fearful,
            EmotionLabel::Disgusted,
        ] {
            assert_eq!(EmotionLabel::parse(label.as_str()), label);
        }
    }
}
