//! Circadian activity shaping
//!
//! Maps the local hour (and weekday) to an activity multiplier. Inside the
//! sleep window a human is slow or absent; inside the peak window slightly
//! faster than baseline.

use crate::config::CircadianConfig;

pub struct CircadianEngine {
    config: CircadianConfig,
}

/// Whether `hour` falls inside [start, end), wrapping midnight when needed
fn in_window(hour: u32, start: u32, end: u32) -> bool {
    let hour = hour % 24;
    if start == end {
        return false;
    }
    if start < end {
        hour >= start && hour < end
    } else {
        hour >= start || hour < end
    }
}

impl CircadianEngine {
    pub fn new(config: CircadianConfig) -> Self {
        Self { config }
    }

    pub fn set_config(&mut self, config: CircadianConfig) {
        self.config = config;
    }

    /// Activity multiplier for the given hour; sleep beats peak
    pub fn multiplier(&self, hour: u32, weekend: bool) -> f64 {
        let c = &self.config;
        let base = if in_window(hour, c.sleep_start, c.sleep_end) {
            c.sleep_multiplier
        } else if in_window(hour, c.peak_start, c.peak_end) {
            c.peak_multiplier
        } else {
            1.0
        };
        if weekend {
            base * c.weekend_multiplier
        } else {
            base
        }
    }

    /// Sleep-window flag, exposed separately for callers that gate activity
    pub fn is_sleep_time(&self, hour: u32) -> bool {
        in_window(hour, self.config.sleep_start, self.config.sleep_end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> CircadianEngine {
        CircadianEngine::new(CircadianConfig::default())
    }

    #[test]
    fn default_windows() {
        // sleep [23,7), peak [10,20)
        let e = engine();
        assert_eq!(e.multiplier(2, false), 2.0);
        assert_eq!(e.multiplier(14, false), 0.9);
        assert_eq!(e.multiplier(21, false), 1.0);
    }

    #[test]
    fn wrap_around_midnight() {
        let e = engine();
        assert!(e.is_sleep_time(23));
        assert!(e.is_sleep_time(0));
        assert!(e.is_sleep_time(6));
        assert!(!e.is_sleep_time(7));
        assert!(!e.is_sleep_time(12));
    }

    #[test]
    fn weekend_scaling() {
        let e = engine();
        let weekday = e.multiplier(21, false);
        let weekend = e.multiplier(21, true);
        assert!(weekend > weekday);
    }

    #[test]
    fn empty_window_never_matches() {
        let mut e = engine();
        e.set_config(CircadianConfig {
            sleep_start: 4,
            sleep_end: 4,
            ..Default::default()
        });
        assert!(!e.is_sleep_time(4));
    }
}
