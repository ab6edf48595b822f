//! Typing duration synthesis
//!
//! Walks the message one character at a time the way a typist would produce
//! it: punctuation and symbols cost more than lowercase letters, word
//! boundaries carry their own pauses, long words slow the cadence, and the
//! whole thing starts with a thinking pause sized to the message.

use crate::config::TypingConfig;
use crate::dist::{clamp, log_normal, RandomSource};
use crate::sim::StackMultipliers;

pub struct TypingSimulator {
    config: TypingConfig,
}

impl TypingSimulator {
    pub fn new(config: TypingConfig) -> Self {
        Self { config }
    }

    pub fn set_config(&mut self, config: TypingConfig) {
        self.config = config;
    }

    /// Base per-character delay for a typing speed, 5 chars per word
    fn base_char_delay(wpm: f64) -> f64 {
        let wpm = if wpm.is_finite() && wpm > 0.0 { wpm } else { 40.0 };
        60_000.0 / (wpm * 5.0)
    }

    fn char_multiplier(&self, ch: char) -> f64 {
        let c = &self.config;
        if ch.is_ascii_punctuation() {
            c.punctuation_multiplier
        } else if ch.is_uppercase() {
            c.capital_multiplier
        } else if ch.is_ascii_digit() {
            c.digit_multiplier
        } else if !ch.is_alphanumeric() && !ch.is_whitespace() {
            c.symbol_multiplier
        } else {
            1.0
        }
    }

    /// Raw typing duration before the fingerprint pipeline.
    ///
    /// `pause_factor` comes from the session DNA's pause tendency;
    /// `response_multiplier` from the personality profile.
    #[allow(clippy::too_many_arguments)]
    pub fn raw_duration(
        &self,
        message: &str,
        wpm: f64,
        typo_rate: f64,
        fatigue: f64,
        pause_factor: f64,
        response_multiplier: f64,
        stack: &StackMultipliers,
        rng: &mut dyn RandomSource,
    ) -> f64 {
        let c = &self.config;
        let base = Self::base_char_delay(wpm);

        let mut total = 0.0;
        for ch in message.chars() {
            let jitter = rng.range(-c.char_jitter_ms, c.char_jitter_ms);
            total += base * self.char_multiplier(ch) + jitter;
        }

        for word in message.split_whitespace() {
            let mut word_delay =
                rng.range_ms(c.word_delay_ms.0, c.word_delay_ms.1) as f64;
            if word.chars().count() >= c.long_word_len {
                word_delay *= c.long_word_factor;
            }
            total += word_delay;

            if rng.chance(c.midword_pause_chance * pause_factor) {
                total += rng.range_ms(c.midword_pause_ms.0, c.midword_pause_ms.1) as f64;
            }
        }

        total += self.thinking_pause(message.chars().count(), rng);
        total += self.typo_correction(message.chars().count(), typo_rate, fatigue);

        total * stack.full() * response_multiplier
    }

    /// Upfront hesitation before the first keystroke, tiered by length
    fn thinking_pause(&self, len: usize, rng: &mut dyn RandomSource) -> f64 {
        let c = &self.config;
        let median = if len < c.short_len {
            c.think_median_short_ms
        } else if len > c.long_len {
            c.think_median_long_ms
        } else {
            c.think_median_medium_ms
        };
        log_normal(rng, median, c.think_sigma)
    }

    /// Expected time spent backspacing over typos
    fn typo_correction(&self, len: usize, typo_rate: f64, fatigue: f64) -> f64 {
        let expected_typos = len as f64 * typo_rate.max(0.0);
        expected_typos * self.config.typo_correction_ms * (1.0 + fatigue.max(0.0))
    }

    /// Documented clamp range, applied after the fingerprint pipeline
    pub fn clamp_final(&self, ms: f64) -> u64 {
        clamp(ms, self.config.min_ms as f64, self.config.max_ms as f64).round() as u64
    }
}
