//! Decision logic for unsolicited emotion-driven responses.
//!
//! The gate converts a stabilized emotion into a yes/no trigger. Three
//! rules, in order: confidence floor, neutral suppression, probabilistic
//! throttle. The throttle is deliberately stateless (no cooldown memory):
//! each qualifying evaluation triggers independently with probability `p`.

use super::{EmotionLabel, SmoothedEmotionState};
use crate::config::GateConfig;
use rand::Rng;

/// Why the gate decided the way it did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateReason {
    /// All rules passed; respond now.
    Triggered,
    /// No face / low-confidence frame dominates the window.
    NoSignal,
    /// Stabilized confidence at or below the trigger threshold.
    LowConfidence,
    /// Neutral never warrants an unsolicited response.
    NeutralSuppressed,
    /// Rules passed but the throttle said not this time.
    Throttled,
}

/// Transient per-evaluation decision. Not stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResponseDecision {
    /// Whether an unsolicited response should be generated.
    pub should_respond: bool,
    /// Which rule produced the decision.
    pub reason: GateReason,
}

impl ResponseDecision {
    fn no(reason: GateReason) -> Self {
        Self {
            should_respond: false,
            reason,
        }
    }
}

/// Gate deciding whether a stabilized emotion triggers a response.
///
/// Pure given its source of randomness; callers pass the RNG so tests can
/// seed it.
#[derive(Debug)]
pub struct ResponseGate {
    trigger_threshold: f32,
    throttle_probability: f64,
}

impl ResponseGate {
    /// Create a gate from configuration.
    pub fn new(config: &GateConfig) -> Self {
        Self {
            trigger_threshold: config.trigger_threshold,
            throttle_probability: config.throttle_probability,
        }
    }

    /// Evaluate one stabilized state.
    ///
    /// Confidence at or below the threshold never triggers (`<=` is the
    /// contract boundary). Neutral and unknown never trigger regardless of
    /// confidence. Otherwise the throttle triggers with independent
    /// probability `p` per evaluation.
    pub fn evaluate<R: Rng>(
        &self,
        state: &SmoothedEmotionState,
        rng: &mut R,
    ) -> ResponseDecision {
        if state.label == EmotionLabel::Unknown {
            return ResponseDecision::no(GateReason::NoSignal);
        }
        if state.confidence <= self.trigger_threshold {
            return ResponseDecision::no(GateReason::LowConfidence);
        }
        if state.label == EmotionLabel::Neutral {
            return ResponseDecision::no(GateReason::NeutralSuppressed);
        }
        if rng.gen_range(0.0..1.0) < self.throttle_probability {
            ResponseDecision {
                should_respond: true,
                reason: GateReason::Triggered,
            }
        } else {
            ResponseDecision::no(GateReason::Throttled)
        }
    }
}
