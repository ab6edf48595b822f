//! Pattern breaking
//!
//! Long-run statistical regularity is what detectors tune for, so on a
//! schedule the engine deliberately breaks its own rhythm: a timed window of
//! exaggerated variance, occasionally with a long exponential tail pause.

use crate::config::FingerprintConfig;
use crate::dist::{exponential, gaussian, sanitize, RandomSource, SAFE_DELAY_MS};

#[derive(Debug, Clone)]
pub struct PatternBreaker {
    last_break_at: u64,
    in_break: bool,
    break_end: u64,
}

impl PatternBreaker {
    pub fn new() -> Self {
        Self {
            last_break_at: 0,
            in_break: false,
            break_end: 0,
        }
    }

    /// Advance the schedule; returns whether break mode is active at `now`
    pub fn update(&mut self, now: u64, config: &FingerprintConfig, rng: &mut dyn RandomSource) -> bool {
        if self.in_break && now >= self.break_end {
            self.in_break = false;
            tracing::debug!("pattern break ended");
        }

        if !self.in_break
            && now.saturating_sub(self.last_break_at) >= config.break_interval_ms
        {
            self.last_break_at = now;
            if rng.chance(config.break_chance) {
                self.in_break = true;
                self.break_end = now + config.break_duration_ms;
                tracing::debug!("pattern break for {}ms", config.break_duration_ms);
            }
        }

        self.in_break
    }

    pub fn in_break(&self) -> bool {
        self.in_break
    }

    /// Apply break-mode variance (heavier spread, occasional long tail)
    pub fn shape(&self, delay_ms: f64, rng: &mut dyn RandomSource) -> f64 {
        if !self.in_break {
            return delay_ms;
        }
        let mut out = delay_ms * gaussian(rng, 1.4, 0.35).abs();
        if rng.chance(0.15) {
            out += exponential(rng, 0.0008); // mean 1.25s tail
        }
        sanitize(out, SAFE_DELAY_MS)
    }

    pub fn reset(&mut self) {
        self.last_break_at = 0;
        self.in_break = false;
        self.break_end = 0;
    }
}

impl Default for PatternBreaker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dist::SeededRandom;

    struct AlwaysLow;
    impl RandomSource for AlwaysLow {
        fn uniform(&mut self) -> f64 {
            0.01
        }
    }

    struct AlwaysHigh;
    impl RandomSource for AlwaysHigh {
        fn uniform(&mut self) -> f64 {
            0.99
        }
    }

    #[test]
    fn break_activates_on_interval_when_chance_hits() {
        let config = FingerprintConfig::default();
        let mut b = PatternBreaker::new();
        let mut rng = AlwaysLow; // chance always hits

        // before the interval elapses nothing happens
        assert!(!b.update(config.break_interval_ms - 1, &config, &mut rng));
        // on the interval the break activates
        assert!(b.update(config.break_interval_ms, &config, &mut rng));
        assert!(b.in_break());
    }

    #[test]
    fn break_never_activates_when_chance_misses() {
        let config = FingerprintConfig::default();
        let mut b = PatternBreaker::new();
        let mut rng = AlwaysHigh;

        for i in 0..20 {
            assert!(!b.update(i * config.break_interval_ms, &config, &mut rng));
        }
    }

    #[test]
    fn break_expires_after_duration() {
        let config = FingerprintConfig::default();
        let mut b = PatternBreaker::new();
        let mut rng = AlwaysLow;

        let start = config.break_interval_ms;
        assert!(b.update(start, &config, &mut rng));
        assert!(b.update(start + config.break_duration_ms - 1, &config, &mut rng));
        // past the end, and the next interval is still far off
        assert!(!b.update(start + config.break_duration_ms, &config, &mut rng));
        assert!(!b.in_break());
    }

    #[test]
    fn shape_is_identity_outside_break() {
        let b = PatternBreaker::new();
        let mut rng = SeededRandom::new(4);
        assert_eq!(b.shape(1_000.0, &mut rng), 1_000.0);
    }

    #[test]
    fn shape_output_is_finite_in_break() {
        let config = FingerprintConfig::default();
        let mut b = PatternBreaker::new();
        let mut low = AlwaysLow;
        b.update(config.break_interval_ms, &config, &mut low);
        assert!(b.in_break());

        let mut rng = SeededRandom::new(4);
        for _ in 0..500 {
            let v = b.shape(1_000.0, &mut rng);
            assert!(v.is_finite() && v >= 0.0);
        }
    }
}
