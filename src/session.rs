//! Per-session mutable state
//!
//! One `SessionState` lives inside each engine instance. Every public
//! operation mutates it; `reset` clears the counters but the chosen
//! device/personality profiles stay with the engine.

use serde::Serialize;

use crate::dist::RandomSource;

/// Variance reshuffle interval
const VARIANCE_REFRESH_MS: u64 = 300_000;

/// Outbound action categories the engine times
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Send,
    Read,
    React,
    Typing,
    Unsend,
    Edit,
    Other,
}

/// Current emotional state; each state scales response timing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Emotion {
    Neutral,
    Engaged,
    Distracted,
    Tired,
    Excited,
}

impl Emotion {
    pub const ALL: [Emotion; 5] = [
        Emotion::Neutral,
        Emotion::Engaged,
        Emotion::Distracted,
        Emotion::Tired,
        Emotion::Excited,
    ];

    /// Timing multiplier for this state
    pub fn multiplier(self) -> f64 {
        match self {
            Emotion::Neutral => 1.0,
            Emotion::Engaged => 0.85,
            Emotion::Distracted => 1.25,
            Emotion::Tired => 1.35,
            Emotion::Excited => 0.9,
        }
    }
}

/// Coarse session lifecycle stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    Warmup,
    Active,
    Cooldown,
}

/// Mutable session counters and cognitive levels
#[derive(Debug, Clone)]
pub struct SessionState {
    pub started_at: u64,
    pub last_action_at: u64,
    pub action_count: u64,
    pub message_count: u64,
    /// 1.0 = fully focused
    pub focus: f64,
    /// 0.0 = fresh, grows toward the configured cap
    pub fatigue: f64,
    pub emotion: Emotion,
    /// Session-wide variance multiplier, reshuffled periodically
    pub timing_variance: f64,
    pub last_variance_refresh: u64,
    /// Character length of the last incoming message, fed by the host
    pub last_incoming_len: usize,
}

impl SessionState {
    pub fn new(now: u64) -> Self {
        Self {
            started_at: now,
            last_action_at: now,
            action_count: 0,
            message_count: 0,
            focus: 1.0,
            fatigue: 0.0,
            emotion: Emotion::Neutral,
            timing_variance: 1.0,
            last_variance_refresh: now,
            last_incoming_len: 0,
        }
    }

    /// Clear counters and cognitive levels; profiles are owned by the engine
    pub fn reset(&mut self, now: u64) {
        *self = Self::new(now);
    }

    pub fn session_age_ms(&self, now: u64) -> u64 {
        now.saturating_sub(self.started_at)
    }

    pub fn idle_ms(&self, now: u64) -> u64 {
        now.saturating_sub(self.last_action_at)
    }

    /// Record one completed action
    pub fn record_action(&mut self, now: u64, is_message: bool) {
        self.action_count += 1;
        if is_message {
            self.message_count += 1;
        }
        self.last_action_at = now;
    }

    /// Reshuffle the session variance multiplier on its interval.
    ///
    /// The variance sits in [0.85, 1.25] so a whole session leans slightly
    /// fast or slow, shifting every few minutes.
    pub fn refresh_variance(&mut self, now: u64, rng: &mut dyn RandomSource) {
        if now.saturating_sub(self.last_variance_refresh) >= VARIANCE_REFRESH_MS {
            self.timing_variance = rng.range(0.85, 1.25);
            self.last_variance_refresh = now;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dist::SeededRandom;

    #[test]
    fn record_and_reset() {
        let mut state = SessionState::new(1_000);
        state.record_action(2_000, true);
        state.record_action(3_000, false);
        assert_eq!(state.action_count, 2);
        assert_eq!(state.message_count, 1);
        assert_eq!(state.last_action_at, 3_000);
        assert_eq!(state.idle_ms(5_000), 2_000);

        state.reset(10_000);
        assert_eq!(state.action_count, 0);
        assert_eq!(state.message_count, 0);
        assert_eq!(state.focus, 1.0);
        assert_eq!(state.fatigue, 0.0);
        assert_eq!(state.started_at, 10_000);
    }

    #[test]
    fn variance_refresh_honors_interval() {
        let mut state = SessionState::new(0);
        let mut rng = SeededRandom::new(3);

        state.refresh_variance(1_000, &mut rng);
        assert_eq!(state.timing_variance, 1.0);

        state.refresh_variance(VARIANCE_REFRESH_MS, &mut rng);
        assert_ne!(state.timing_variance, 1.0);
        assert!(state.timing_variance >= 0.85 && state.timing_variance < 1.25);
        assert_eq!(state.last_variance_refresh, VARIANCE_REFRESH_MS);
    }

    #[test]
    fn emotions_cover_fast_and_slow() {
        assert!(Emotion::Engaged.multiplier() < 1.0);
        assert!(Emotion::Tired.multiplier() > 1.0);
        assert_eq!(Emotion::Neutral.multiplier(), 1.0);
    }
}
