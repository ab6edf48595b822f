//! Simulated clock drift
//!
//! A bounded random walk standing in for the slow skew of a human's device
//! clock and reaction baseline, plus a fixed table of sub-100ms micro
//! variations indexed off wall time. Both feed additive offsets into the
//! delay pipeline.

use crate::dist::RandomSource;

const MICRO_SLOTS: usize = 50;

#[derive(Debug, Clone)]
pub struct TemporalState {
    /// Current drift in milliseconds, |drift| <= max
    drift: f64,
    /// Walk direction, +1 or -1
    direction: f64,
    /// Step size per update
    velocity: f64,
    last_update: u64,
    micro: [f64; MICRO_SLOTS],
}

impl TemporalState {
    pub fn new(rng: &mut dyn RandomSource) -> Self {
        let mut micro = [0.0; MICRO_SLOTS];
        for slot in micro.iter_mut() {
            *slot = rng.range(-40.0, 40.0);
        }
        Self {
            drift: 0.0,
            direction: if rng.chance(0.5) { 1.0 } else { -1.0 },
            velocity: rng.range(2.0, 12.0),
            last_update: 0,
            micro,
        }
    }

    /// Advance the walk; at most one step per elapsed wall-clock second
    pub fn update(&mut self, now: u64, max_drift: f64, rng: &mut dyn RandomSource) {
        if now.saturating_sub(self.last_update) < 1_000 {
            return;
        }
        self.last_update = now;

        self.drift += self.direction * self.velocity;

        // reverse at the bound, or spontaneously with small probability
        if self.drift.abs() >= max_drift {
            self.drift = self.drift.clamp(-max_drift, max_drift);
            self.direction = -self.direction;
        } else if rng.chance(0.05) {
            self.direction = -self.direction;
            self.velocity = rng.range(2.0, 12.0);
        }
    }

    pub fn drift(&self) -> f64 {
        self.drift
    }

    /// Additive offset: drift plus the micro variation for this instant
    pub fn offset(&self, now: u64) -> f64 {
        self.drift + self.micro[((now / 100) % MICRO_SLOTS as u64) as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dist::SeededRandom;

    #[test]
    fn drift_stays_bounded() {
        let mut rng = SeededRandom::new(9);
        let mut t = TemporalState::new(&mut rng);

        for i in 0..10_000u64 {
            t.update(i * 1_000, 500.0, &mut rng);
            assert!(t.drift().abs() <= 500.0, "drift {} escaped", t.drift());
        }
    }

    #[test]
    fn update_is_rate_limited_to_one_per_second() {
        let mut rng = SeededRandom::new(9);
        let mut t = TemporalState::new(&mut rng);

        t.update(1_000, 500.0, &mut rng);
        let after_first = t.drift();
        // sub-second calls are ignored
        t.update(1_500, 500.0, &mut rng);
        t.update(1_999, 500.0, &mut rng);
        assert_eq!(t.drift(), after_first);

        t.update(2_000, 500.0, &mut rng);
        assert_ne!(t.drift(), after_first);
    }

    #[test]
    fn micro_variation_selection_cycles() {
        let mut rng = SeededRandom::new(9);
        let t = TemporalState::new(&mut rng);

        // slots repeat every MICRO_SLOTS * 100 ms
        let period = (MICRO_SLOTS as u64) * 100;
        assert_eq!(t.offset(0), t.offset(period));
        assert_eq!(t.offset(1_234), t.offset(1_234 + period));
    }

    #[test]
    fn offsets_are_finite_and_small() {
        let mut rng = SeededRandom::new(9);
        let mut t = TemporalState::new(&mut rng);
        for i in 0..1_000u64 {
            t.update(i * 1_000, 500.0, &mut rng);
            let off = t.offset(i * 1_000);
            assert!(off.is_finite());
            assert!(off.abs() <= 540.0);
        }
    }
}
