//! Cognitive load model
//!
//! Focus drains while the operator is engaged and recovers over idle gaps;
//! fatigue accumulates past an onset threshold; emotion drifts at random.
//! The three combine into one timing multiplier.

use crate::config::CognitiveConfig;
use crate::dist::RandomSource;
use crate::session::{Emotion, SessionState};

pub struct CognitiveEngine {
    config: CognitiveConfig,
}

impl CognitiveEngine {
    pub fn new(config: CognitiveConfig) -> Self {
        Self { config }
    }

    pub fn set_config(&mut self, config: CognitiveConfig) {
        self.config = config;
    }

    /// Advance focus/fatigue/emotion for one action at `now`
    pub fn update(&self, state: &mut SessionState, now: u64, rng: &mut dyn RandomSource) {
        let c = &self.config;

        if state.idle_ms(now) > c.idle_recovery_ms {
            state.focus = (state.focus + c.focus_recovery_rate).min(1.0);
        } else {
            state.focus = (state.focus - c.focus_decay_rate).max(c.focus_floor);
        }

        if c.fatigue_enabled {
            let age = state.session_age_ms(now);
            if age > c.fatigue_onset_ms && c.max_session_ms > c.fatigue_onset_ms {
                let progress = (age - c.fatigue_onset_ms) as f64
                    / (c.max_session_ms - c.fatigue_onset_ms) as f64;
                state.fatigue = (progress * c.max_fatigue).min(c.max_fatigue);
            }
        }

        if rng.chance(c.emotion_shift_chance) {
            let next = Emotion::ALL[rng.index(Emotion::ALL.len())];
            if next != state.emotion {
                tracing::debug!("emotion shift: {:?} -> {:?}", state.emotion, next);
                state.emotion = next;
            }
        }
    }

    /// Combined multiplier from the current levels, guarded to 1.0
    pub fn multiplier(&self, state: &SessionState) -> f64 {
        let c = &self.config;
        let focus_part = 1.0 + (1.0 - state.focus) * 0.5;
        let fatigue_part = 1.0 + state.fatigue * (c.fatigue_typing_effect - 1.0);
        let out = focus_part * fatigue_part * state.emotion.multiplier();
        if out.is_finite() && out > 0.0 {
            out
        } else {
            1.0
        }
    }
}
