//! Generic per-action delay synthesis
//!
//! Log-normal base scaled by an action-type table and the multiplier stack,
//! with an extra cooldown when a burst is in progress.

use crate::config::ActionConfig;
use crate::dist::{clamp, log_normal, RandomSource};
use crate::session::ActionKind;
use crate::sim::StackMultipliers;

pub struct ActionSimulator {
    config: ActionConfig,
}

impl ActionSimulator {
    pub fn new(config: ActionConfig) -> Self {
        Self { config }
    }

    pub fn set_config(&mut self, config: ActionConfig) {
        self.config = config;
    }

    fn kind_multiplier(&self, kind: ActionKind) -> f64 {
        let c = &self.config;
        match kind {
            ActionKind::Send => c.send_multiplier,
            ActionKind::Read => c.read_multiplier,
            ActionKind::React => c.react_multiplier,
            ActionKind::Typing => c.typing_multiplier,
            _ => c.default_multiplier,
        }
    }

    /// Raw action delay before the fingerprint pipeline
    pub fn raw_duration(
        &self,
        kind: ActionKind,
        burst_detected: bool,
        stack: &StackMultipliers,
        rng: &mut dyn RandomSource,
    ) -> f64 {
        let c = &self.config;
        let mut total = log_normal(rng, c.base_median_ms, c.sigma)
            * self.kind_multiplier(kind)
            * stack.full();

        if burst_detected {
            total += rng.range_ms(c.burst_penalty_ms.0, c.burst_penalty_ms.1) as f64;
        }

        total
    }

    /// Documented clamp range, applied after the fingerprint pipeline
    pub fn clamp_final(&self, ms: f64) -> u64 {
        clamp(ms, self.config.min_ms as f64, self.config.max_ms as f64).round() as u64
    }
}
