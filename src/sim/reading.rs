//! Reading duration synthesis
//!
//! Word-count driven with a complexity multiplier from average word length,
//! an occasional re-read, and per-attachment viewing time. This is the full
//! model; `before_mark_as_read` deliberately uses its own simpler inline
//! formula with different constants.

use crate::config::ReadingConfig;
use crate::dist::{clamp, smooth_step, RandomSource};
use crate::sim::StackMultipliers;

/// Attachment types with distinct viewing costs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachmentKind {
    Image,
    Video,
    Audio,
    File,
    Sticker,
}

pub struct ReadingSimulator {
    config: ReadingConfig,
}

impl ReadingSimulator {
    pub fn new(config: ReadingConfig) -> Self {
        Self { config }
    }

    pub fn set_config(&mut self, config: ReadingConfig) {
        self.config = config;
    }

    /// Raw reading duration before the fingerprint pipeline.
    ///
    /// `read_factor` is the personality's read-receipt delay factor. The
    /// configured minimum applies to the base duration, before any scaling.
    pub fn raw_duration(
        &self,
        content: &str,
        attachments: &[AttachmentKind],
        read_factor: f64,
        stack: &StackMultipliers,
        rng: &mut dyn RandomSource,
    ) -> f64 {
        let c = &self.config;

        let words: Vec<&str> = content.split_whitespace().collect();
        let mut total = words.len() as f64 / c.words_per_minute.max(1.0) * 60_000.0;

        if !words.is_empty() {
            let avg_len =
                words.iter().map(|w| w.chars().count()).sum::<usize>() as f64 / words.len() as f64;
            // short words read fast, nine-letter-plus vocabulary slows to 1.5x
            total *= 0.75 + smooth_step(3.0, 9.0, avg_len) * 0.75;
        }

        if rng.chance(c.reread_chance) {
            total *= 2.0;
        }

        for attachment in attachments {
            let (lo, hi) = match attachment {
                AttachmentKind::Image => c.image_ms,
                AttachmentKind::Video => c.video_ms,
                AttachmentKind::Audio => c.audio_ms,
                AttachmentKind::File => c.file_ms,
                AttachmentKind::Sticker => c.sticker_ms,
            };
            total += rng.range_ms(lo, hi) as f64;
        }

        total += c.scan_delay_ms as f64;
        total = total.max(c.min_ms as f64);

        total * stack.reading() * read_factor
    }

    /// Documented cap, applied after the fingerprint pipeline
    pub fn clamp_final(&self, ms: f64) -> u64 {
        clamp(ms, self.config.min_ms as f64, self.config.max_ms as f64).round() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dist::SeededRandom;

    fn neutral_stack() -> StackMultipliers {
        StackMultipliers {
            circadian: 1.0,
            cognitive: 1.0,
            rate_limit: 1.0,
            variance: 1.0,
        }
    }

    /// Source that never triggers the re-read chance
    struct NoReread;
    impl RandomSource for NoReread {
        fn uniform(&mut self) -> f64 {
            0.999
        }
    }

    fn sim() -> ReadingSimulator {
        ReadingSimulator::new(ReadingConfig::default())
    }

    #[test]
    fn empty_message_returns_exactly_the_minimum() {
        let s = sim();
        let mut rng = NoReread;
        let d = s.raw_duration("", &[], 1.0, &neutral_stack(), &mut rng);
        assert_eq!(d, ReadingConfig::default().min_ms as f64);
    }

    #[test]
    fn more_words_take_longer() {
        let s = sim();
        let mut rng = NoReread;
        let stack = neutral_stack();
        let short = s.raw_duration(
            &"word ".repeat(20),
            &[],
            1.0,
            &stack,
            &mut rng,
        );
        let long = s.raw_duration(&"word ".repeat(200), &[], 1.0, &stack, &mut rng);
        assert!(long > short);
    }

    #[test]
    fn long_words_slow_the_pace() {
        let s = sim();
        let mut rng = NoReread;
        let stack = neutral_stack();
        let simple = s.raw_duration(&"cat ".repeat(100), &[], 1.0, &stack, &mut rng);
        let dense = s.raw_duration(&"extraordinarily ".repeat(100), &[], 1.0, &stack, &mut rng);
        assert!(dense > simple);
    }

    #[test]
    fn attachments_add_viewing_time() {
        let s = sim();
        let stack = neutral_stack();
        let mut rng = SeededRandom::new(8);
        let bare = s.raw_duration("a few words here", &[], 1.0, &stack, &mut rng);
        let mut rng = SeededRandom::new(8);
        let with_video = s.raw_duration(
            "a few words here",
            &[AttachmentKind::Video, AttachmentKind::Image],
            1.0,
            &stack,
            &mut rng,
        );
        assert!(with_video > bare + 4_000.0);
    }

    #[test]
    fn reread_doubles_the_text_time() {
        let s = sim();
        let stack = neutral_stack();

        struct AlwaysReread;
        impl RandomSource for AlwaysReread {
            fn uniform(&mut self) -> f64 {
                0.0
            }
        }

        let text = "some ordinary words to read ".repeat(30);
        let mut rng = NoReread;
        let once = s.raw_duration(&text, &[], 1.0, &stack, &mut rng);
        let mut rng = AlwaysReread;
        let twice = s.raw_duration(&text, &[], 1.0, &stack, &mut rng);
        assert!(twice > once * 1.5);
    }

    #[test]
    fn read_factor_scales_linearly() {
        let s = sim();
        let stack = neutral_stack();
        let text = "enough words that the base time clears the minimum floor easily ".repeat(10);
        let mut rng = NoReread;
        let base = s.raw_duration(&text, &[], 1.0, &stack, &mut rng);
        let slow = s.raw_duration(&text, &[], 1.6, &stack, &mut rng);
        assert!((slow / base - 1.6).abs() < 1e-9);
    }

    #[test]
    fn clamp_final_caps_at_a_minute() {
        let s = sim();
        assert_eq!(s.clamp_final(1e9), 60_000);
        assert_eq!(s.clamp_final(100.0), 800);
    }
}
