//! Behavior engine façade
//!
//! One `BehaviorEngine` per account session. The engine owns every piece of
//! state from the data model, computes a delay for each outbound action, and
//! optionally performs the suspension itself. Planning (`plan_*`) is pure
//! state-machine work with no sleeping, so hosts that want their own timeout
//! or cancellation race can await the returned durations externally.

use std::future::Future;
use std::time::Duration;

use serde::Serialize;
use tokio::time::sleep;

use crate::circadian::CircadianEngine;
use crate::clock::{Clock, SystemClock};
use crate::cognitive::CognitiveEngine;
use crate::config::{EngineConfig, EngineOverrides};
use crate::dist::{clamp, OsRandom, RandomSource};
use crate::error::Result;
use crate::fingerprint::{FingerprintEngine, PipelineCtx};
use crate::profile::{
    device_profile, personality_profile, DeviceProfile, PersonalityProfile,
};
use crate::ratelimit::{RateLimiter, RateStatus};
use crate::session::{ActionKind, Emotion, SessionPhase, SessionState};
use crate::sim::{
    ActionSimulator, AttachmentKind, ReadingSimulator, StackMultipliers, TypingSimulator,
};

/// Phase durations for one send-message flow
#[derive(Debug, Clone, Copy, Default)]
pub struct SendPlan {
    /// Glance at the thread before composing
    pub pre_read: Duration,
    /// Thinking pause, tiered by message length
    pub thinking: Duration,
    /// Simulated typing time (indicator is on for this span)
    pub typing: Duration,
    /// Occasional extra pause inside the sleep window
    pub night_pause: Duration,
    /// Hover between finishing typing and pressing send
    pub post_pause: Duration,
}

impl SendPlan {
    pub fn total(&self) -> Duration {
        self.pre_read + self.thinking + self.typing + self.night_pause + self.post_pause
    }

    pub fn is_noop(&self) -> bool {
        self.total().is_zero()
    }
}

/// Read-only snapshot for the control plane
#[derive(Debug, Clone, Serialize)]
pub struct EngineStats {
    pub uptime_ms: u64,
    pub action_count: u64,
    pub message_count: u64,
    pub minute_window: usize,
    pub hour_window: usize,
    pub burst_window: usize,
    pub minute_ratio: f64,
    pub hour_ratio: f64,
    pub rate_warning: bool,
    pub rate_critical: bool,
    pub burst_detected: bool,
    pub rate_multiplier: f64,
    pub focus: f64,
    pub fatigue: f64,
    pub emotion: Emotion,
    pub circadian_multiplier: f64,
    pub cognitive_multiplier: f64,
    pub timing_variance: f64,
    pub device_profile: String,
    pub personality_profile: String,
    pub session_phase: SessionPhase,
    pub consistency_score: f64,
    pub entropy_pool_size: usize,
    pub clock_drift_ms: f64,
    pub is_sleep_time: bool,
    pub pattern_anomaly_detected: bool,
}

/// Behavioral timing engine for one session
pub struct BehaviorEngine {
    config: EngineConfig,
    device: &'static DeviceProfile,
    personality: &'static PersonalityProfile,
    state: SessionState,
    circadian: CircadianEngine,
    cognitive: CognitiveEngine,
    limiter: RateLimiter,
    fingerprint: FingerprintEngine,
    typing: TypingSimulator,
    reading: ReadingSimulator,
    action: ActionSimulator,
    /// Session typing speed, drawn once from the device range
    session_wpm: f64,
    rng: Box<dyn RandomSource>,
    clock: Box<dyn Clock>,
}

impl BehaviorEngine {
    /// Create an engine with default config, entropy randomness, system clock
    pub fn new() -> Self {
        match Self::with_config(EngineConfig::default()) {
            Ok(engine) => engine,
            Err(_) => unreachable!("default config references catalog profiles"),
        }
    }

    /// Create an engine with custom config
    pub fn with_config(config: EngineConfig) -> Result<Self> {
        Self::with_parts(config, Box::new(OsRandom::new()), Box::new(SystemClock))
    }

    /// Create an engine with injected randomness and clock
    pub fn with_parts(
        config: EngineConfig,
        mut rng: Box<dyn RandomSource>,
        clock: Box<dyn Clock>,
    ) -> Result<Self> {
        let device = device_profile(&config.device_profile)?;
        let personality = personality_profile(&config.personality_profile)?;
        let now = clock.now_ms();

        let session_wpm = rng.range(device.typing_speed_wpm.0, device.typing_speed_wpm.1);
        let fingerprint = FingerprintEngine::new(config.fingerprint.clone(), &mut *rng);

        tracing::debug!(
            "session start: device={} personality={} wpm={:.0}",
            device.name,
            personality.name,
            session_wpm
        );

        Ok(Self {
            state: SessionState::new(now),
            circadian: CircadianEngine::new(config.circadian.clone()),
            cognitive: CognitiveEngine::new(config.cognitive.clone()),
            limiter: RateLimiter::new(config.rate_limit.clone()),
            typing: TypingSimulator::new(config.typing.clone()),
            reading: ReadingSimulator::new(config.reading.clone()),
            action: ActionSimulator::new(config.action.clone()),
            fingerprint,
            device,
            personality,
            session_wpm,
            config,
            rng,
            clock,
        })
    }

    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.config.enabled = enabled;
    }

    // ---- full simulation engines -------------------------------------------

    /// Full typing-engine delay for a message (records a typing action)
    pub fn plan_typing(&mut self, message: &str) -> Duration {
        if !self.config.enabled {
            return Duration::ZERO;
        }
        let now = self.prepare();
        let (stack, _) = self.sample_stack(now);
        let pause_factor = self
            .fingerprint
            .dna()
            .pause_pattern
            .pause_chance_factor();

        let raw = self.typing.raw_duration(
            message,
            self.session_wpm,
            self.device.typo_rate,
            self.state.fatigue,
            pause_factor,
            self.personality.response_time_multiplier,
            &stack,
            &mut *self.rng,
        );
        let ctx = self.ctx(now);
        let shaped = self
            .fingerprint
            .finalize(raw, ActionKind::Typing, &ctx, &mut *self.rng);
        let delay = self.typing.clamp_final(shaped as f64);

        self.finish(ActionKind::Typing, delay, now, false);
        Duration::from_millis(delay)
    }

    /// Full reading-engine delay for a message (records a read action)
    pub fn plan_reading(&mut self, content: &str, attachments: &[AttachmentKind]) -> Duration {
        if !self.config.enabled {
            return Duration::ZERO;
        }
        let now = self.prepare();
        let (stack, _) = self.sample_stack(now);

        let raw = self.reading.raw_duration(
            content,
            attachments,
            self.personality.read_receipt_delay_factor,
            &stack,
            &mut *self.rng,
        );
        let ctx = self.ctx(now);
        let shaped = self
            .fingerprint
            .finalize(raw, ActionKind::Read, &ctx, &mut *self.rng);
        let delay = self.reading.clamp_final(shaped as f64);

        self.finish(ActionKind::Read, delay, now, false);
        Duration::from_millis(delay)
    }

    /// Full generic action delay (records the action)
    pub fn plan_action_delay(&mut self, kind: ActionKind) -> Duration {
        if !self.config.enabled {
            return Duration::ZERO;
        }
        let now = self.prepare();
        let (stack, status) = self.sample_stack(now);

        let raw =
            self.action
                .raw_duration(kind, status.burst_detected, &stack, &mut *self.rng);
        let ctx = self.ctx(now);
        let shaped = self.fingerprint.finalize(raw, kind, &ctx, &mut *self.rng);
        let delay = self.action.clamp_final(shaped as f64);

        self.finish(kind, delay, now, false);
        Duration::from_millis(delay)
    }

    // ---- orchestrated flows ------------------------------------------------

    /// Plan the phases of a send-message flow (records a message action)
    pub fn plan_send_message(&mut self, body: &str) -> SendPlan {
        if !self.config.enabled {
            return SendPlan::default();
        }
        let now = self.prepare();
        let hour = self.clock.local_hour();
        let weekend = self.clock.is_weekend();
        let circadian = self.circadian.multiplier(hour, weekend);
        let flow = self.config.send_flow.clone();

        let pre_read = self.rng.range_ms(flow.pre_read_ms.0, flow.pre_read_ms.1);

        let thinking = {
            let len = body.chars().count();
            let typing_cfg = &self.config.typing;
            let mut tier = if len < typing_cfg.short_len {
                0
            } else if len > typing_cfg.long_len {
                2
            } else {
                1
            };
            // replying to a long incoming message takes extra thought
            if self.state.last_incoming_len > typing_cfg.long_len {
                tier = (tier + 1).min(2);
            }
            let range = match tier {
                0 => flow.think_short_ms,
                1 => flow.think_medium_ms,
                _ => flow.think_long_ms,
            };
            self.rng.range_ms(range.0, range.1)
        };

        let typing = {
            let chars = body.chars().count() as f64;
            let words = body.split_whitespace().count() as f64;
            let mut t = chars * 60_000.0 / (self.session_wpm * 5.0);
            t += words * self.rng.range(60.0, 180.0);
            t = clamp(t, flow.typing_min_ms as f64, flow.typing_max_ms as f64);
            (t * circadian) as u64
        };

        let night_pause = if self.circadian.is_sleep_time(hour)
            && self.rng.chance(flow.night_pause_chance)
        {
            self.rng.range_ms(flow.night_pause_ms.0, flow.night_pause_ms.1)
        } else {
            0
        };

        let post_pause = self.rng.range_ms(flow.post_pause_ms.0, flow.post_pause_ms.1);

        let plan = SendPlan {
            pre_read: Duration::from_millis(pre_read),
            thinking: Duration::from_millis(thinking),
            typing: Duration::from_millis(typing),
            night_pause: Duration::from_millis(night_pause),
            post_pause: Duration::from_millis(post_pause),
        };

        self.finish(
            ActionKind::Send,
            plan.total().as_millis() as u64,
            now,
            true,
        );
        plan
    }

    /// Sequence the send flow, sleeping through each phase
    pub async fn before_send_message(&mut self, thread_id: &str, body: &str) {
        self.before_send_message_with(thread_id, body, |_| std::future::ready(Ok(())))
            .await
    }

    /// Sequence the send flow, toggling a typing indicator around the typing
    /// phase. Indicator failures are swallowed; the delays still elapse.
    pub async fn before_send_message_with<F, Fut>(
        &mut self,
        thread_id: &str,
        body: &str,
        mut indicator: F,
    ) where
        F: FnMut(bool) -> Fut,
        Fut: Future<Output = Result<()>>,
    {
        let plan = self.plan_send_message(body);
        if plan.is_noop() {
            return;
        }

        sleep(plan.pre_read).await;
        sleep(plan.thinking).await;

        if let Err(e) = indicator(true).await {
            tracing::warn!("typing indicator on failed for {}: {}", thread_id, e);
        }
        sleep(plan.typing).await;
        sleep(plan.night_pause).await;
        if let Err(e) = indicator(false).await {
            tracing::warn!("typing indicator off failed for {}: {}", thread_id, e);
        }

        sleep(plan.post_pause).await;
    }

    /// Inline mark-as-read delay (records a read action).
    ///
    /// Deliberately simpler than `plan_reading`: linear per-word and
    /// per-attachment costs with their own constants.
    pub fn plan_mark_as_read(&mut self, content: &str, attachments: &[AttachmentKind]) -> Duration {
        if !self.config.enabled {
            return Duration::ZERO;
        }
        let now = self.prepare();
        let c = &self.config.mark_read;

        let words = content.split_whitespace().count() as u64;
        let base = words * c.per_word_ms + attachments.len() as u64 * c.per_attachment_ms;
        let base = base.clamp(c.min_ms, c.max_ms) as f64;

        let circadian = self
            .circadian
            .multiplier(self.clock.local_hour(), self.clock.is_weekend());
        let delay = (base * circadian) as u64;

        self.finish(ActionKind::Read, delay, now, false);
        Duration::from_millis(delay)
    }

    /// Await the mark-as-read delay
    pub async fn before_mark_as_read(&mut self, content: &str, attachments: &[AttachmentKind]) {
        let delay = self.plan_mark_as_read(content, attachments);
        sleep(delay).await;
    }

    /// Quick fixed-range delay for small actions (records the action)
    pub fn plan_quick_action(&mut self, kind: ActionKind) -> Duration {
        if !self.config.enabled {
            return Duration::ZERO;
        }
        let now = self.prepare();
        let c = &self.config.quick_action;
        let (lo, hi) = match kind {
            ActionKind::React => c.react_ms,
            ActionKind::Unsend => c.unsend_ms,
            ActionKind::Edit => c.edit_ms,
            _ => c.default_ms,
        };
        let circadian = self
            .circadian
            .multiplier(self.clock.local_hour(), self.clock.is_weekend());
        let delay = (self.rng.range_ms(lo, hi) as f64 * circadian) as u64;

        self.finish(kind, delay, now, false);
        Duration::from_millis(delay)
    }

    /// Await the quick-action delay
    pub async fn before_action(&mut self, kind: ActionKind) {
        let delay = self.plan_quick_action(kind);
        sleep(delay).await;
    }

    // ---- host surface ------------------------------------------------------

    /// Feed the length of an incoming message; biases the next send's
    /// thinking pause toward the long tier.
    pub fn record_incoming(&mut self, char_len: usize) {
        self.state.last_incoming_len = char_len;
    }

    /// Read-only snapshot; repeated calls without intervening actions differ
    /// only in wall-clock-derived fields.
    pub fn get_stats(&self) -> EngineStats {
        let now = self.clock.now_ms();
        let hour = self.clock.local_hour();
        let rate = self.limiter.peek(now);
        let ctx = self.ctx(now);

        EngineStats {
            uptime_ms: self.state.session_age_ms(now),
            action_count: self.state.action_count,
            message_count: self.state.message_count,
            minute_window: rate.minute_count,
            hour_window: rate.hour_count,
            burst_window: rate.burst_count,
            minute_ratio: rate.minute_ratio,
            hour_ratio: rate.hour_ratio,
            rate_warning: rate.warning,
            rate_critical: rate.critical,
            burst_detected: rate.burst_detected,
            rate_multiplier: rate.multiplier,
            focus: self.state.focus,
            fatigue: self.state.fatigue,
            emotion: self.state.emotion,
            circadian_multiplier: self.circadian.multiplier(hour, self.clock.is_weekend()),
            cognitive_multiplier: self.cognitive.multiplier(&self.state),
            timing_variance: self.state.timing_variance,
            device_profile: self.device.name.to_string(),
            personality_profile: self.personality.name.to_string(),
            session_phase: self.fingerprint.session_phase(&ctx),
            consistency_score: self.fingerprint.consistency_score(),
            entropy_pool_size: self.fingerprint.entropy_len(),
            clock_drift_ms: self.fingerprint.drift_ms(),
            is_sleep_time: self.circadian.is_sleep_time(hour),
            pattern_anomaly_detected: self.fingerprint.anomaly().is_some(),
        }
    }

    /// Clear session, cognitive, rate-limit, and fingerprint state; the
    /// device/personality selection survives until `configure` changes it.
    pub fn reset(&mut self) {
        let now = self.clock.now_ms();
        self.state.reset(now);
        self.limiter.reset();
        self.fingerprint.reset(&mut *self.rng);
        self.session_wpm = self
            .rng
            .range(self.device.typing_speed_wpm.0, self.device.typing_speed_wpm.1);
        tracing::debug!("session reset");
    }

    /// Shallow-merge overrides into the live config; profile changes are
    /// validated before anything is applied.
    pub fn configure(&mut self, overrides: EngineOverrides) -> Result<()> {
        let device = match &overrides.device_profile {
            Some(name) => Some(device_profile(name)?),
            None => None,
        };
        let personality = match &overrides.personality_profile {
            Some(name) => Some(personality_profile(name)?),
            None => None,
        };

        self.config.apply(overrides);

        if let Some(device) = device {
            self.device = device;
            self.session_wpm = self
                .rng
                .range(device.typing_speed_wpm.0, device.typing_speed_wpm.1);
        }
        if let Some(personality) = personality {
            self.personality = personality;
        }

        self.circadian.set_config(self.config.circadian.clone());
        self.cognitive.set_config(self.config.cognitive.clone());
        self.limiter.set_config(self.config.rate_limit.clone());
        self.fingerprint.set_config(self.config.fingerprint.clone());
        self.typing.set_config(self.config.typing.clone());
        self.reading.set_config(self.config.reading.clone());
        self.action.set_config(self.config.action.clone());
        Ok(())
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    // ---- internals ---------------------------------------------------------

    /// Per-action housekeeping: variance reshuffle + cognitive update
    fn prepare(&mut self) -> u64 {
        let now = self.clock.now_ms();
        self.state.refresh_variance(now, &mut *self.rng);
        self.cognitive.update(&mut self.state, now, &mut *self.rng);
        now
    }

    fn sample_stack(&mut self, now: u64) -> (StackMultipliers, RateStatus) {
        let status = self.limiter.status(now);
        let stack = StackMultipliers {
            circadian: self
                .circadian
                .multiplier(self.clock.local_hour(), self.clock.is_weekend()),
            cognitive: self.cognitive.multiplier(&self.state),
            rate_limit: status.multiplier,
            variance: self.state.timing_variance,
        };
        (stack, status)
    }

    fn ctx(&self, now: u64) -> PipelineCtx {
        PipelineCtx {
            now_ms: now,
            hour: self.clock.local_hour(),
            action_count: self.state.action_count,
            session_age_ms: self.state.session_age_ms(now),
            fatigue: self.state.fatigue,
        }
    }

    fn finish(&mut self, kind: ActionKind, delay_ms: u64, now: u64, is_message: bool) {
        self.limiter.record(now);
        self.fingerprint.record_action(kind, delay_ms as f64, now);
        self.state.record_action(now, is_message);
    }
}

impl Default for BehaviorEngine {
    fn default() -> Self {
        Self::new()
    }
}
