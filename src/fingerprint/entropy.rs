//! Entropy pool
//!
//! A pre-drawn reservoir of small signed variations, consumed one entry per
//! finalized delay. Refilled wholesale on an interval or on first use, and
//! recycled when every entry has been consumed.

use crate::dist::RandomSource;
use crate::session::ActionKind;

/// Categories entropy entries are tagged with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntropyCategory {
    Typing,
    Reading,
    Action,
    Generic,
}

impl From<ActionKind> for EntropyCategory {
    fn from(kind: ActionKind) -> Self {
        match kind {
            ActionKind::Typing | ActionKind::Send => EntropyCategory::Typing,
            ActionKind::Read => EntropyCategory::Reading,
            ActionKind::React | ActionKind::Unsend | ActionKind::Edit => EntropyCategory::Action,
            ActionKind::Other => EntropyCategory::Generic,
        }
    }
}

#[derive(Debug, Clone)]
struct EntropyEntry {
    value: f64,
    category: EntropyCategory,
    consumed: bool,
}

pub struct EntropyPool {
    entries: Vec<EntropyEntry>,
    cursor: usize,
    last_refresh: u64,
    size: usize,
    refresh_ms: u64,
}

const CATEGORIES: [EntropyCategory; 4] = [
    EntropyCategory::Typing,
    EntropyCategory::Reading,
    EntropyCategory::Action,
    EntropyCategory::Generic,
];

impl EntropyPool {
    pub fn new(size: usize, refresh_ms: u64) -> Self {
        Self {
            entries: Vec::new(),
            cursor: 0,
            last_refresh: 0,
            size: size.max(4),
            refresh_ms,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Refill wholesale when empty (first use) or past the refresh interval
    fn ensure_fresh(&mut self, now: u64, rng: &mut dyn RandomSource) {
        if !self.entries.is_empty() && now.saturating_sub(self.last_refresh) < self.refresh_ms {
            return;
        }
        self.entries.clear();
        for i in 0..self.size {
            self.entries.push(EntropyEntry {
                value: rng.range(-1.0, 1.0),
                category: CATEGORIES[i % CATEGORIES.len()],
                consumed: false,
            });
        }
        self.cursor = 0;
        self.last_refresh = now;
        tracing::trace!("entropy pool refilled with {} entries", self.size);
    }

    /// Draw one unused entry for the category, scanning from the cursor.
    ///
    /// Fallback order: any unused entry, then a wholesale un-consume and the
    /// entry under the cursor, so the pool can never run dry.
    pub fn draw(&mut self, category: EntropyCategory, now: u64, rng: &mut dyn RandomSource) -> f64 {
        self.ensure_fresh(now, rng);

        let n = self.entries.len();
        let from_cursor = |offset: usize| (self.cursor + offset) % n;
        let pick = (0..n)
            .map(from_cursor)
            .find(|&i| !self.entries[i].consumed && self.entries[i].category == category)
            .or_else(|| (0..n).map(from_cursor).find(|&i| !self.entries[i].consumed));

        let idx = match pick {
            Some(idx) => idx,
            None => {
                for e in &mut self.entries {
                    e.consumed = false;
                }
                self.cursor
            }
        };

        self.entries[idx].consumed = true;
        self.cursor = (idx + 1) % n;
        self.entries[idx].value
    }

    pub fn reset(&mut self) {
        self.entries.clear();
        self.cursor = 0;
        self.last_refresh = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dist::SeededRandom;

    #[test]
    fn first_draw_fills_the_pool() {
        let mut pool = EntropyPool::new(16, 300_000);
        let mut rng = SeededRandom::new(2);
        assert!(pool.is_empty());

        let v = pool.draw(EntropyCategory::Typing, 1_000, &mut rng);
        assert!((-1.0..1.0).contains(&v));
        assert_eq!(pool.len(), 16);
    }

    #[test]
    fn draws_are_bounded_and_never_run_dry() {
        let mut pool = EntropyPool::new(8, u64::MAX);
        let mut rng = SeededRandom::new(2);

        // far more draws than entries: wraps via the un-consume path
        for _ in 0..50 {
            let v = pool.draw(EntropyCategory::Action, 1_000, &mut rng);
            assert!((-1.0..1.0).contains(&v));
        }
        assert_eq!(pool.len(), 8);
    }

    #[test]
    fn interval_refresh_replaces_entries() {
        let mut pool = EntropyPool::new(8, 1_000);
        let mut rng = SeededRandom::new(2);

        let first = pool.draw(EntropyCategory::Generic, 0, &mut rng);
        // same instant: no refresh, a different entry comes back consumed
        let _ = pool.draw(EntropyCategory::Generic, 10, &mut rng);

        // past the interval: wholesale refill
        let refreshed = pool.draw(EntropyCategory::Generic, 5_000, &mut rng);
        assert!(first.is_finite() && refreshed.is_finite());
    }

    #[test]
    fn category_mapping_from_action_kind() {
        assert_eq!(EntropyCategory::from(ActionKind::Send), EntropyCategory::Typing);
        assert_eq!(EntropyCategory::from(ActionKind::Read), EntropyCategory::Reading);
        assert_eq!(EntropyCategory::from(ActionKind::React), EntropyCategory::Action);
        assert_eq!(EntropyCategory::from(ActionKind::Other), EntropyCategory::Generic);
    }
}
