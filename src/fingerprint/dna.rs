//! Behavioral DNA
//!
//! A session-unique bundle of randomized multipliers generated once at
//! session start and immutable afterward. It gives every session a stable
//! "typing personality" that stays consistent across thousands of actions,
//! the way one human differs from another.

use smallvec::SmallVec;

use crate::dist::{gaussian, RandomSource};

/// Pause habit for the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PauseTendency {
    Frequent,
    Rare,
    Rhythmic,
    Erratic,
    Clustered,
}

impl PauseTendency {
    const ALL: [PauseTendency; 5] = [
        PauseTendency::Frequent,
        PauseTendency::Rare,
        PauseTendency::Rhythmic,
        PauseTendency::Erratic,
        PauseTendency::Clustered,
    ];

    /// Scale applied to the typing simulator's mid-word pause chance
    pub fn pause_chance_factor(self) -> f64 {
        match self {
            PauseTendency::Frequent => 1.8,
            PauseTendency::Rare => 0.4,
            PauseTendency::Rhythmic => 1.0,
            PauseTendency::Erratic => 1.4,
            PauseTendency::Clustered => 1.2,
        }
    }
}

/// Overall response pacing habit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseStyle {
    Quick,
    Slow,
    Variable,
    Consistent,
}

impl ResponseStyle {
    const ALL: [ResponseStyle; 4] = [
        ResponseStyle::Quick,
        ResponseStyle::Slow,
        ResponseStyle::Variable,
        ResponseStyle::Consistent,
    ];
}

/// Session-stable randomized traits
#[derive(Debug, Clone)]
pub struct BehavioralDna {
    /// Ordered per-action rhythm multipliers, indexed modulo length
    pub typing_rhythm: SmallVec<[f64; 16]>,
    pub pause_pattern: PauseTendency,
    pub response_style: ResponseStyle,
    /// Hourly activity multipliers, 24 slots
    pub activity_curve: [f64; 24],
    pub seed: u64,
}

impl BehavioralDna {
    /// Generate a fresh DNA bundle for a new session
    pub fn generate(rng: &mut dyn RandomSource) -> Self {
        let rhythm_len = 8 + rng.index(9); // 8..=16
        let mut typing_rhythm = SmallVec::new();
        for _ in 0..rhythm_len {
            typing_rhythm.push(rng.range(0.85, 1.2));
        }

        let mut activity_curve = [1.0; 24];
        for (hour, slot) in activity_curve.iter_mut().enumerate() {
            // nights lean slow, the rest of the day wobbles around 1.0
            let base = if hour < 6 { 1.15 } else { 0.95 };
            *slot = base + rng.range(-0.1, 0.15);
        }

        let seed = (rng.uniform() * u32::MAX as f64) as u64;

        Self {
            typing_rhythm,
            pause_pattern: PauseTendency::ALL[rng.index(PauseTendency::ALL.len())],
            response_style: ResponseStyle::ALL[rng.index(ResponseStyle::ALL.len())],
            activity_curve,
            seed,
        }
    }

    /// Rhythm multiplier for the nth action
    pub fn rhythm_at(&self, action_index: u64) -> f64 {
        if self.typing_rhythm.is_empty() {
            return 1.0;
        }
        self.typing_rhythm[(action_index % self.typing_rhythm.len() as u64) as usize]
    }

    /// Response-style factor; the variable styles draw fresh per call
    pub fn style_factor(&self, rng: &mut dyn RandomSource) -> f64 {
        match self.response_style {
            ResponseStyle::Quick => 0.85,
            ResponseStyle::Slow => 1.2,
            ResponseStyle::Variable => gaussian(rng, 1.0, 0.2),
            ResponseStyle::Consistent => gaussian(rng, 1.0, 0.05),
        }
    }

    /// Activity-curve multiplier for the given hour
    pub fn activity_at(&self, hour: u32) -> f64 {
        self.activity_curve[(hour % 24) as usize]
    }
}
