//! Anomaly detection over recent actions
//!
//! The engine watches its own output the way a detector on the other side
//! would: metronome-regular intervals, machine-gun bursts, and repeated
//! identical delays all get flagged so the pipeline can correct them before
//! they accumulate into a signature.

use std::collections::{HashMap, VecDeque};

use crate::fingerprint::consistency::coefficient_of_variation;
use crate::session::ActionKind;

const HISTORY_CAP: usize = 100;
const DETECT_WINDOW: usize = 10;
const REGULAR_CV: f64 = 0.1;
const BURST_GAP_MS: u64 = 500;
const BURST_GAP_COUNT: usize = 7;
const REPEAT_COUNT: usize = 5;

/// Pattern classes the detector can flag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anomaly {
    /// Inter-action intervals nearly identical
    RegularIntervals,
    /// Most recent gaps shorter than a human could manage
    BurstPattern,
    /// The same rounded delay keeps coming back
    RepeatedDelays,
}

/// One timed action, as recorded for detection
#[derive(Debug, Clone, Copy)]
pub struct ActionRecord {
    pub kind: ActionKind,
    pub delay_ms: f64,
    pub at: u64,
}

#[derive(Debug, Clone)]
pub struct AnomalyDetector {
    history: VecDeque<ActionRecord>,
}

impl AnomalyDetector {
    pub fn new() -> Self {
        Self {
            history: VecDeque::with_capacity(HISTORY_CAP),
        }
    }

    pub fn record(&mut self, kind: ActionKind, delay_ms: f64, at: u64) {
        if self.history.len() == HISTORY_CAP {
            self.history.pop_front();
        }
        self.history.push_back(ActionRecord { kind, delay_ms, at });
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    /// Classify the last `DETECT_WINDOW` actions; priority order is
    /// regular intervals, then bursts, then repeated delays.
    pub fn detect(&self) -> Option<Anomaly> {
        if self.history.len() < DETECT_WINDOW {
            return None;
        }
        let recent: Vec<&ActionRecord> = self
            .history
            .iter()
            .skip(self.history.len() - DETECT_WINDOW)
            .collect();

        let gaps: Vec<u64> = recent
            .windows(2)
            .map(|w| w[1].at.saturating_sub(w[0].at))
            .collect();

        if let Some(cv) = coefficient_of_variation(gaps.iter().map(|&g| g as f64)) {
            if cv < REGULAR_CV {
                return Some(Anomaly::RegularIntervals);
            }
        }

        let short_gaps = gaps.iter().filter(|&&g| g < BURST_GAP_MS).count();
        if short_gaps >= BURST_GAP_COUNT {
            return Some(Anomaly::BurstPattern);
        }

        let mut rounded: HashMap<i64, usize> = HashMap::new();
        for r in &recent {
            *rounded.entry(r.delay_ms.round() as i64).or_default() += 1;
        }
        if rounded.values().any(|&n| n > REPEAT_COUNT) {
            return Some(Anomaly::RepeatedDelays);
        }

        None
    }

    pub fn reset(&mut self) {
        self.history.clear();
    }
}

impl Default for AnomalyDetector {
    fn default() -> Self {
        Self::new()
    }
}
