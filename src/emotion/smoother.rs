//! Sliding-window smoothing of noisy per-frame emotion classifications.
//!
//! The camera produces one raw classification per polling tick; single
//! frames are noisy (blinks, motion blur, transient expressions). The
//! smoother keeps a bounded FIFO of the most recent samples and derives a
//! stabilized state by majority vote, so the rest of the pipeline sees a
//! slowly-changing belief instead of frame-to-frame jitter.

use super::{EmotionLabel, RawEmotionSample, SmoothedEmotionState};
use std::collections::VecDeque;

/// A window entry. Frames are dropped at ingest; the stabilized state is
/// derivable solely from labels and confidences.
#[derive(Debug, Clone, Copy)]
struct WindowSample {
    label: EmotionLabel,
    confidence: f32,
}

/// Majority-vote stabilizer over a bounded window of raw samples.
///
/// Pure data transformation: no blocking, no locks, safe to call from the
/// capture path.
#[derive(Debug)]
pub struct EmotionSmoother {
    window: VecDeque<WindowSample>,
    capacity: usize,
}

impl EmotionSmoother {
    /// Create a smoother with the given window size (clamped to ≥ 1).
    pub fn new(window_size: usize) -> Self {
        let capacity = window_size.max(1);
        Self {
            window: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Ingest one raw sample and recompute the stabilized state.
    ///
    /// The oldest sample is evicted when the window is full. Returns the
    /// new state on every call; `None` is only possible before the first
    /// sample (the window always changes when non-empty).
    pub fn ingest(&mut self, sample: &RawEmotionSample) -> Option<SmoothedEmotionState> {
        if self.window.len() == self.capacity {
            let _ = self.window.pop_front();
        }
        self.window.push_back(WindowSample {
            label: sample.label,
            confidence: sample.confidence,
        });
        self.current()
    }

    /// The stabilized state for the current window contents.
    ///
    /// Winning label is the majority label; ties break by highest mean
    /// confidence among the tied labels, then by most-recent occurrence.
    /// The stabilized confidence is the mean confidence of the samples
    /// matching the winning label.
    pub fn current(&self) -> Option<SmoothedEmotionState> {
        if self.window.is_empty() {
            return None;
        }

        // Per-label tally: (count, confidence sum, last occurrence index).
        let mut tally: Vec<(EmotionLabel, usize, f32, usize)> = Vec::new();
        for (idx, sample) in self.window.iter().enumerate() {
            match tally.iter_mut().find(|(label, ..)| *label == sample.label) {
                Some((_, count, sum, last)) => {
                    *count += 1;
                    *sum += sample.confidence;
                    *last = idx;
                }
                None => tally.push((sample.label, 1, sample.confidence, idx)),
            }
        }

        let winner = tally
            .iter()
            .max_by(|(_, count_a, sum_a, last_a), (_, count_b, sum_b, last_b)| {
                let mean_a = sum_a / *count_a as f32;
                let mean_b = sum_b / *count_b as f32;
                count_a
                    .cmp(count_b)
                    .then(mean_a.total_cmp(&mean_b))
                    .then(last_a.cmp(last_b))
            })?;

        let (label, count, sum, _) = *winner;
        Some(SmoothedEmotionState {
            label,
            confidence: sum / count as f32,
        })
    }

    /// Number of samples currently in the window.
    pub fn len(&self) -> usize {
        self.window.len()
    }

    /// Whether the window is empty (startup).
    pub fn is_empty(&self) -> bool {
        self.window.is_empty()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use super::*;
    use crate::vision::Frame;

    fn sample(label: EmotionLabel, confidence: f32) -> RawEmotionSample {
        RawEmotionSample {
            label,
            confidence,
            frame: Frame::default(),
        }
    }

    #[test]
    fn empty_window_yields_none() {
        let smoother = EmotionSmoother::new(5);
        assert!(smoother.current().is_none());
    }

    #[test]
    fn every_ingest_returns_a_state() {
        let mut smoother = EmotionSmoother::new(5);
        let state = smoother.ingest(&sample(EmotionLabel::Happy, 0.8));
        assert!(state.is_some());
    }

    #[test]
    fn window_never_exceeds_capacity() {
        let mut smoother = EmotionSmoother::new(5);
        for i in 0..23 {
            smoother.ingest(&sample(EmotionLabel::Happy, 0.5 + (i % 5) as f32 * 0.01));
            assert!(smoother.len() <= 5);
        }
        assert_eq!(smoother.len(), 5);
    }

    #[test]
    fn oldest_sample_is_evicted_first() {
        let mut smoother = EmotionSmoother::new(3);
        smoother.ingest(&sample(EmotionLabel::Sad, 0.9));
        smoother.ingest(&sample(EmotionLabel::Happy, 0.8));
        smoother.ingest(&sample(EmotionLabel::Happy, 0.8));
        // Fourth ingest evicts the lone sad sample.
        let state = smoother.ingest(&sample(EmotionLabel::Happy, 0.8)).unwrap();
        assert_eq!(state.label, EmotionLabel::Happy);
        assert!((state.confidence - 0.8).abs() < 1e-6);
    }

    #[test]
    fn strict_majority_wins_regardless_of_confidence() {
        let mut smoother = EmotionSmoother::new(5);
        smoother.ingest(&sample(EmotionLabel::Sad, 0.99));
        smoother.ingest(&sample(EmotionLabel::Happy, 0.1));
        smoother.ingest(&sample(EmotionLabel::Happy, 0.1));
        let state = smoother.ingest(&sample(EmotionLabel::Happy, 0.1)).unwrap();
        assert_eq!(state.label, EmotionLabel::Happy);
    }

    #[test]
    fn tie_breaks_by_higher_mean_confidence() {
        // 2x2 split: A=happy [0.9, 0.5] (mean 0.7), B=sad [0.6, 0.6] (mean 0.6).
        // A wins on mean confidence.
        let mut smoother = EmotionSmoother::new(4);
        smoother.ingest(&sample(EmotionLabel::Happy, 0.9));
        smoother.ingest(&sample(EmotionLabel::Sad, 0.6));
        smoother.ingest(&sample(EmotionLabel::Happy, 0.5));
        let state = smoother.ingest(&sample(EmotionLabel::Sad, 0.6)).unwrap();
        assert_eq!(state.label, EmotionLabel::Happy);
        assert!((state.confidence - 0.7).abs() < 1e-6);
    }

    #[test]
    fn tie_with_equal_mean_breaks_by_recency() {
        let mut smoother = EmotionSmoother::new(4);
        smoother.ingest(&sample(EmotionLabel::Happy, 0.8));
        smoother.ingest(&sample(EmotionLabel::Happy, 0.8));
        smoother.ingest(&sample(EmotionLabel::Sad, 0.8));
        // Equal count (2 vs 2) and equal mean (0.8): sad occurred most recently.
        let state = smoother.ingest(&sample(EmotionLabel::Sad, 0.8)).unwrap();
        assert_eq!(state.label, EmotionLabel::Sad);
    }

    #[test]
    fn confidence_is_mean_of_winning_label_only() {
        // Four happy samples (0.8, 0.9, 0.85, 0.75) and one sad: the sad
        // confidence must not dilute the mean.
        let mut smoother = EmotionSmoother::new(5);
        smoother.ingest(&sample(EmotionLabel::Happy, 0.8));
        smoother.ingest(&sample(EmotionLabel::Happy, 0.9));
        smoother.ingest(&sample(EmotionLabel::Sad, 0.3));
        smoother.ingest(&sample(EmotionLabel::Happy, 0.85));
        let state = smoother.ingest(&sample(EmotionLabel::Happy, 0.75)).unwrap();
        assert_eq!(state.label, EmotionLabel::Happy);
        assert!((state.confidence - 0.825).abs() < 1e-6);
    }

    #[test]
    fn single_sample_window_tracks_latest() {
        let mut smoother = EmotionSmoother::new(1);
        smoother.ingest(&sample(EmotionLabel::Happy, 0.9));
        let state = smoother.ingest(&sample(EmotionLabel::Angry, 0.6)).unwrap();
        assert_eq!(state.label, EmotionLabel::Angry);
        assert!((state.confidence - 0.6).abs() < 1e-6);
    }
}
