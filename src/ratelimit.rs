//! Sliding-window rate limiting
//!
//! Three independent windows (minute, hour, burst) with lazy pruning. The
//! limiter never rejects an action; it reports pressure and a throttle
//! multiplier that the delay pipeline folds in.

use std::collections::VecDeque;

use crate::config::RateLimitConfig;

const MINUTE_MS: u64 = 60_000;
const HOUR_MS: u64 = 3_600_000;

/// Snapshot of the current rate pressure
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateStatus {
    pub minute_count: usize,
    pub hour_count: usize,
    pub burst_count: usize,
    pub minute_ratio: f64,
    pub hour_ratio: f64,
    pub burst_detected: bool,
    pub warning: bool,
    pub critical: bool,
    pub multiplier: f64,
}

pub struct RateLimiter {
    config: RateLimitConfig,
    minute: VecDeque<u64>,
    hour: VecDeque<u64>,
    burst: VecDeque<u64>,
}

fn prune(window: &mut VecDeque<u64>, now: u64, age_ms: u64) {
    while let Some(&front) = window.front() {
        if now.saturating_sub(front) > age_ms {
            window.pop_front();
        } else {
            break;
        }
    }
}

fn count_within(window: &VecDeque<u64>, now: u64, age_ms: u64) -> usize {
    window
        .iter()
        .filter(|&&t| now.saturating_sub(t) <= age_ms)
        .count()
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            minute: VecDeque::new(),
            hour: VecDeque::new(),
            burst: VecDeque::new(),
        }
    }

    pub fn set_config(&mut self, config: RateLimitConfig) {
        self.config = config;
    }

    /// Record one action timestamp into all three windows
    pub fn record(&mut self, now: u64) {
        self.minute.push_back(now);
        self.hour.push_back(now);
        self.burst.push_back(now);
    }

    /// Prune and compute the current pressure
    pub fn status(&mut self, now: u64) -> RateStatus {
        prune(&mut self.minute, now, MINUTE_MS);
        prune(&mut self.hour, now, HOUR_MS);
        prune(&mut self.burst, now, self.config.burst_window_ms);
        self.compute(
            self.minute.len(),
            self.hour.len(),
            self.burst.len(),
        )
    }

    /// Compute pressure without mutating the windows (stats path)
    pub fn peek(&self, now: u64) -> RateStatus {
        self.compute(
            count_within(&self.minute, now, MINUTE_MS),
            count_within(&self.hour, now, HOUR_MS),
            count_within(&self.burst, now, self.config.burst_window_ms),
        )
    }

    pub fn reset(&mut self) {
        self.minute.clear();
        self.hour.clear();
        self.burst.clear();
    }

    fn compute(&self, minute_count: usize, hour_count: usize, burst_count: usize) -> RateStatus {
        let c = &self.config;
        let minute_ratio = if c.max_per_minute > 0 {
            minute_count as f64 / c.max_per_minute as f64
        } else {
            0.0
        };
        let hour_ratio = if c.max_per_hour > 0 {
            hour_count as f64 / c.max_per_hour as f64
        } else {
            0.0
        };

        let worst = minute_ratio.max(hour_ratio);
        let burst_detected = burst_count >= c.burst_threshold;
        let warning = worst >= c.warning_ratio;
        let critical = worst >= c.critical_ratio;

        // critical > warning > burst precedence
        let multiplier = if critical {
            c.critical_multiplier
        } else if warning {
            c.warning_multiplier
        } else if burst_detected {
            c.burst_multiplier
        } else {
            1.0
        };

        if critical {
            tracing::debug!(
                "rate pressure critical: minute {minute_count} hour {hour_count}"
            );
        }

        RateStatus {
            minute_count,
            hour_count,
            burst_count,
            minute_ratio,
            hour_ratio,
            burst_detected,
            warning,
            critical,
            multiplier,
        }
    }
}
