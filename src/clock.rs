//! Wall-clock abstraction
//!
//! The engine never reads system time directly; it goes through `Clock` so
//! tests can pin the hour, fake weekends, and advance time without sleeping.

use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{Datelike, Local, Timelike, Weekday};

/// Monotonically increasing wall clock injected through the engine constructor
pub trait Clock: Send {
    /// Milliseconds since an arbitrary epoch
    fn now_ms(&self) -> u64;

    /// Local hour of day, 0..=23
    fn local_hour(&self) -> u32;

    /// Whether the local date is a Saturday or Sunday
    fn is_weekend(&self) -> bool;
}

/// Real clock backed by `chrono::Local`
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        Local::now().timestamp_millis().max(0) as u64
    }

    fn local_hour(&self) -> u32 {
        Local::now().hour()
    }

    fn is_weekend(&self) -> bool {
        matches!(Local::now().weekday(), Weekday::Sat | Weekday::Sun)
    }
}

/// Hand-driven clock for tests.
///
/// Clone handles share state, so a test can keep one handle and give the
/// other to the engine:
///
/// ```
/// use ghostpace::clock::{Clock, ManualClock};
///
/// let clock = ManualClock::new(0, 14);
/// let handle = clock.clone();
/// handle.advance(2_000);
/// assert_eq!(clock.now_ms(), 2_000);
/// ```
#[derive(Debug, Clone)]
pub struct ManualClock {
    inner: Arc<ManualInner>,
}

#[derive(Debug)]
struct ManualInner {
    ms: AtomicU64,
    hour: AtomicU32,
    weekend: AtomicBool,
}

impl ManualClock {
    pub fn new(start_ms: u64, hour: u32) -> Self {
        Self {
            inner: Arc::new(ManualInner {
                ms: AtomicU64::new(start_ms),
                hour: AtomicU32::new(hour % 24),
                weekend: AtomicBool::new(false),
            }),
        }
    }

    /// Move time forward
    pub fn advance(&self, ms: u64) {
        self.inner.ms.fetch_add(ms, Ordering::Relaxed);
    }

    /// Pin the local hour
    pub fn set_hour(&self, hour: u32) {
        self.inner.hour.store(hour % 24, Ordering::Relaxed);
    }

    /// Pin the weekend flag
    pub fn set_weekend(&self, weekend: bool) {
        self.inner.weekend.store(weekend, Ordering::Relaxed);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.inner.ms.load(Ordering::Relaxed)
    }

    fn local_hour(&self) -> u32 {
        self.inner.hour.load(Ordering::Relaxed)
    }

    fn is_weekend(&self) -> bool {
        self.inner.weekend.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_advances_through_shared_handle() {
        let clock = ManualClock::new(1_000, 9);
        let handle = clock.clone();

        handle.advance(500);
        assert_eq!(clock.now_ms(), 1_500);

        handle.set_hour(23);
        assert_eq!(clock.local_hour(), 23);

        handle.set_hour(26);
        assert_eq!(clock.local_hour(), 2);
    }

    #[test]
    fn system_clock_is_sane() {
        let clock = SystemClock;
        assert!(clock.now_ms() > 0);
        assert!(clock.local_hour() < 24);
    }
}
