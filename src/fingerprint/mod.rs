//! Fingerprint / Anti-Detection Layer
//!
//! All the session-stable randomized traits and the corrective passes that
//! keep the delay stream looking like one consistent human:
//! - Behavioral DNA (per-session rhythm, style, activity curve)
//! - Entropy pool (pre-drawn variation reservoir)
//! - Temporal drift (bounded clock-skew walk + micro variations)
//! - Consistency tracker (CV band correction)
//! - Anomaly detector (self-monitoring over recent actions)
//! - Pattern breaker (scheduled bursts of extra variance)
//!
//! `finalize` composes them over a raw delay in a fixed stage order; every
//! stage boundary is sanitized so no NaN/Infinity survives to the next one.

pub mod anomaly;
pub mod breaker;
pub mod consistency;
pub mod dna;
pub mod entropy;
pub mod temporal;

pub use anomaly::{Anomaly, AnomalyDetector};
pub use breaker::PatternBreaker;
pub use consistency::ConsistencyTracker;
pub use dna::{BehavioralDna, PauseTendency, ResponseStyle};
pub use entropy::{EntropyCategory, EntropyPool};
pub use temporal::TemporalState;

use crate::config::FingerprintConfig;
use crate::dist::{exponential, gaussian, lerp, sanitize, weibull, RandomSource, SAFE_DELAY_MS};
use crate::session::{ActionKind, SessionPhase};

/// Minimum delay the pipeline will ever emit
const MIN_DELAY_MS: f64 = 10.0;

/// Per-call context snapshot handed to `finalize`
#[derive(Debug, Clone, Copy)]
pub struct PipelineCtx {
    pub now_ms: u64,
    pub hour: u32,
    pub action_count: u64,
    pub session_age_ms: u64,
    pub fatigue: f64,
}

pub struct FingerprintEngine {
    config: FingerprintConfig,
    dna: BehavioralDna,
    entropy: EntropyPool,
    temporal: TemporalState,
    consistency: ConsistencyTracker,
    detector: AnomalyDetector,
    breaker: PatternBreaker,
}

impl FingerprintEngine {
    pub fn new(config: FingerprintConfig, rng: &mut dyn RandomSource) -> Self {
        let entropy = EntropyPool::new(config.entropy_pool_size, config.entropy_refresh_ms);
        Self {
            dna: BehavioralDna::generate(rng),
            entropy,
            temporal: TemporalState::new(rng),
            consistency: ConsistencyTracker::new(),
            detector: AnomalyDetector::new(),
            breaker: PatternBreaker::new(),
            config,
        }
    }

    pub fn set_config(&mut self, config: FingerprintConfig) {
        self.config = config;
    }

    pub fn dna(&self) -> &BehavioralDna {
        &self.dna
    }

    /// Run the full corrective pipeline over a raw delay.
    ///
    /// Stage order is fixed: anomaly correction, DNA modulation, pattern
    /// breaking, entropy injection, temporal offset, session-phase
    /// multiplier, consistency correction. Returns integer milliseconds,
    /// floored at 10ms.
    pub fn finalize(
        &mut self,
        raw_ms: f64,
        kind: ActionKind,
        ctx: &PipelineCtx,
        rng: &mut dyn RandomSource,
    ) -> u64 {
        let mut delay = sanitize(raw_ms, SAFE_DELAY_MS);

        // 1. anomaly correction: at most one, in priority order
        if let Some(anomaly) = self.detector.detect() {
            tracing::debug!("correcting {:?}", anomaly);
            delay = match anomaly {
                Anomaly::RegularIntervals => delay + gaussian(rng, 0.0, delay * 0.3).abs(),
                Anomaly::BurstPattern => delay + exponential(rng, 0.002),
                Anomaly::RepeatedDelays => delay + gaussian(rng, 150.0, 100.0),
            };
            delay = sanitize(delay, SAFE_DELAY_MS);
        }

        // 2. behavioral-DNA modulation
        delay *= self.dna.rhythm_at(ctx.action_count);
        delay *= self.dna.style_factor(rng);
        delay *= self.dna.activity_at(ctx.hour);
        delay = sanitize(delay, SAFE_DELAY_MS);

        // 3. pattern breaking and per-call stealth adjustments
        self.breaker.update(ctx.now_ms, &self.config, rng);
        delay = self.breaker.shape(delay, rng);
        if rng.chance(self.config.slowdown_chance) {
            delay *= 1.5;
        }
        if rng.chance(self.config.speedup_chance) {
            delay *= 0.7;
        }
        if rng.chance(self.config.hesitation_chance) {
            delay += weibull(rng, 800.0, 1.5);
        }
        delay = sanitize(delay, SAFE_DELAY_MS);

        // 4. entropy injection
        let entropy = self.entropy.draw(kind.into(), ctx.now_ms, rng);
        delay += entropy * delay * 0.1;
        delay = sanitize(delay, SAFE_DELAY_MS);

        // 5. temporal offset
        self.temporal.update(ctx.now_ms, self.config.drift_max_ms, rng);
        delay += self.temporal.offset(ctx.now_ms);
        delay = sanitize(delay, SAFE_DELAY_MS);

        // 6. session-phase multiplier
        delay *= self.phase_multiplier(ctx);
        delay = sanitize(delay, SAFE_DELAY_MS);

        // 7. consistency correction over the pre-correction delay
        let adjustment = self.consistency.observe(kind, delay);
        delay = sanitize(delay * adjustment, SAFE_DELAY_MS);

        let out = delay.max(MIN_DELAY_MS).round() as u64;
        tracing::trace!("finalize {:?}: {:.0}ms -> {}ms", kind, raw_ms, out);
        out
    }

    /// Record a completed action into the anomaly history
    pub fn record_action(&mut self, kind: ActionKind, delay_ms: f64, now: u64) {
        self.detector.record(kind, delay_ms, now);
    }

    /// Coarse lifecycle phase; warmup wins over cooldown
    pub fn session_phase(&self, ctx: &PipelineCtx) -> SessionPhase {
        if ctx.session_age_ms < self.config.warmup_ms {
            SessionPhase::Warmup
        } else if ctx.fatigue > self.config.cooldown_fatigue_threshold {
            SessionPhase::Cooldown
        } else {
            SessionPhase::Active
        }
    }

    fn phase_multiplier(&self, ctx: &PipelineCtx) -> f64 {
        match self.session_phase(ctx) {
            SessionPhase::Warmup => {
                let progress = if self.config.warmup_ms == 0 {
                    1.0
                } else {
                    ctx.session_age_ms as f64 / self.config.warmup_ms as f64
                };
                lerp(1.5, 1.3, progress)
            }
            SessionPhase::Cooldown => 1.3,
            SessionPhase::Active => 1.0,
        }
    }

    pub fn consistency_score(&self) -> f64 {
        self.consistency.score()
    }

    pub fn consistency_adjustment(&self) -> f64 {
        self.consistency.adjustment()
    }

    pub fn drift_ms(&self) -> f64 {
        self.temporal.drift()
    }

    pub fn entropy_len(&self) -> usize {
        self.entropy.len()
    }

    pub fn anomaly(&self) -> Option<Anomaly> {
        self.detector.detect()
    }

    pub fn in_pattern_break(&self) -> bool {
        self.breaker.in_break()
    }

    /// New DNA, empty histories; used by the engine's `reset`
    pub fn reset(&mut self, rng: &mut dyn RandomSource) {
        self.dna = BehavioralDna::generate(rng);
        self.temporal = TemporalState::new(rng);
        self.entropy.reset();
        self.consistency.reset();
        self.detector.reset();
        self.breaker.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dist::SeededRandom;

    fn ctx(now_ms: u64) -> PipelineCtx {
        PipelineCtx {
            now_ms,
            hour: 14,
            action_count: 0,
            session_age_ms: 600_000, // past warmup
            fatigue: 0.1,
        }
    }

    fn engine(seed: u64) -> (FingerprintEngine, SeededRandom) {
        let mut rng = SeededRandom::new(seed);
        let engine = FingerprintEngine::new(FingerprintConfig::default(), &mut rng);
        (engine, rng)
    }

    #[test]
    fn finalize_is_finite_and_floored() {
        let (mut fp, mut rng) = engine(1);
        for i in 0..500u64 {
            let c = PipelineCtx {
                action_count: i,
                ..ctx(i * 2_500)
            };
            let out = fp.finalize(1_000.0, ActionKind::Send, &c, &mut rng);
            assert!(out >= 10, "delay {out} under floor");
            assert!(out < 600_000, "delay {out} exploded");
        }
    }

    #[test]
    fn finalize_swallows_garbage_input() {
        let (mut fp, mut rng) = engine(2);
        for bad in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY, -500.0] {
            let out = fp.finalize(bad, ActionKind::Other, &ctx(10_000), &mut rng);
            assert!(out >= 10);
            assert!(out < 600_000);
        }
    }

    #[test]
    fn warmup_slows_the_session_start() {
        let (mut fp, _) = engine(3);
        let early = PipelineCtx {
            session_age_ms: 0,
            ..ctx(0)
        };
        let late = ctx(1_000_000);
        assert_eq!(fp.session_phase(&early), SessionPhase::Warmup);
        assert_eq!(fp.session_phase(&late), SessionPhase::Active);
        assert!(fp.phase_multiplier(&early) > fp.phase_multiplier(&late));
    }

    #[test]
    fn cooldown_when_fatigued() {
        let (fp, _) = engine(4);
        let tired = PipelineCtx {
            fatigue: 0.9,
            ..ctx(1_000_000)
        };
        assert_eq!(fp.session_phase(&tired), SessionPhase::Cooldown);
        assert_eq!(fp.phase_multiplier(&tired), 1.3);
    }

    #[test]
    fn warmup_wins_over_cooldown() {
        let (fp, _) = engine(5);
        let both = PipelineCtx {
            session_age_ms: 0,
            fatigue: 0.9,
            ..ctx(0)
        };
        assert_eq!(fp.session_phase(&both), SessionPhase::Warmup);
    }

    #[test]
    fn regular_history_gets_corrected_upward_on_average() {
        let (mut fp, mut rng) = engine(6);

        // metronome history
        for i in 0..10u64 {
            fp.record_action(ActionKind::Send, 1_000.0, i * 2_000);
        }
        assert_eq!(fp.anomaly(), Some(Anomaly::RegularIntervals));

        // corrections only add variance on top of the raw value
        let mut above = 0;
        for _ in 0..50 {
            if fp.finalize(1_000.0, ActionKind::Send, &ctx(30_000), &mut rng) > 600 {
                above += 1;
            }
        }
        assert!(above > 25);
    }

    #[test]
    fn reset_regenerates_traits() {
        let (mut fp, mut rng) = engine(7);
        let before = fp.dna().typing_rhythm.clone();
        for i in 0..20u64 {
            fp.record_action(ActionKind::Send, 500.0, i * 1_000);
        }
        fp.reset(&mut rng);
        assert_eq!(fp.anomaly(), None);
        assert_eq!(fp.entropy_len(), 0);
        assert_eq!(fp.consistency_score(), 1.0);
        // overwhelmingly likely to differ
        assert_ne!(before, fp.dna().typing_rhythm);
    }
}
