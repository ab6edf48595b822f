//! Consistency tracking
//!
//! Watches the coefficient of variation of recent delays. A human lands in a
//! band around CV 0.35: below it the output looks robotic, above it erratic.
//! The tracker produces a corrective multiplier that nudges the stream back
//! into the band, and a score callers can read off `get_stats`.

use std::collections::VecDeque;

use crate::session::ActionKind;

const HISTORY_CAP: usize = 50;
const MIN_SAMPLES: usize = 5;
const CV_LOW: f64 = 0.2;
const CV_HIGH: f64 = 0.5;
const CV_TARGET: f64 = 0.35;

/// Mean and coefficient of variation of a sample
pub(crate) fn coefficient_of_variation(samples: impl Iterator<Item = f64> + Clone) -> Option<f64> {
    let count = samples.clone().count();
    if count == 0 {
        return None;
    }
    let mean = samples.clone().sum::<f64>() / count as f64;
    if mean == 0.0 || !mean.is_finite() {
        return None;
    }
    let variance = samples.map(|v| (v - mean) * (v - mean)).sum::<f64>() / count as f64;
    let cv = variance.sqrt() / mean;
    cv.is_finite().then_some(cv)
}

#[derive(Debug, Clone)]
pub struct ConsistencyTracker {
    recent_delays: VecDeque<f64>,
    recent_kinds: VecDeque<ActionKind>,
    score: f64,
    adjustment: f64,
}

impl ConsistencyTracker {
    pub fn new() -> Self {
        Self {
            recent_delays: VecDeque::with_capacity(HISTORY_CAP),
            recent_kinds: VecDeque::with_capacity(HISTORY_CAP),
            score: 1.0,
            adjustment: 1.0,
        }
    }

    /// Append a pre-correction delay and recompute the adjustment factor
    pub fn observe(&mut self, kind: ActionKind, delay_ms: f64) -> f64 {
        if self.recent_delays.len() == HISTORY_CAP {
            self.recent_delays.pop_front();
            self.recent_kinds.pop_front();
        }
        self.recent_delays.push_back(delay_ms);
        self.recent_kinds.push_back(kind);

        if self.recent_delays.len() < MIN_SAMPLES {
            self.adjustment = 1.0;
            return self.adjustment;
        }

        if let Some(cv) = coefficient_of_variation(self.recent_delays.iter().copied()) {
            self.adjustment = if cv < CV_LOW {
                1.3 // too robotic: inject variance
            } else if cv > CV_HIGH {
                0.8 // too erratic: dampen
            } else {
                1.0
            };
            self.score = (1.0 - (cv - CV_TARGET).abs()).clamp(0.0, 1.0);
        }
        self.adjustment
    }

    pub fn adjustment(&self) -> f64 {
        self.adjustment
    }

    pub fn score(&self) -> f64 {
        self.score
    }

    pub fn sample_count(&self) -> usize {
        self.recent_delays.len()
    }

    /// How many of the tracked actions were of the given kind
    pub fn kind_count(&self, kind: ActionKind) -> usize {
        self.recent_kinds.iter().filter(|&&k| k == kind).count()
    }

    pub fn reset(&mut self) {
        self.recent_delays.clear();
        self.recent_kinds.clear();
        self.score = 1.0;
        self.adjustment = 1.0;
    }
}

impl Default for ConsistencyTracker {
    fn default() -> Self {
        Self::new()
    }
}
