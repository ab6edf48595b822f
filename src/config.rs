//! Layered engine configuration
//!
//! Every sub-engine exposes its knobs as a serde-deserializable struct with
//! documented defaults. Hosts supply partial config (JSON/TOML) and the
//! engine merges it over the defaults; `EngineOverrides` replaces whole
//! sub-sections at a time (shallow merge), never individual fields.

use serde::{Deserialize, Serialize};

/// Top-level engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Master switch; when false every public operation is a no-op
    pub enabled: bool,
    /// Device profile name from the catalog
    pub device_profile: String,
    /// Personality profile name from the catalog
    pub personality_profile: String,
    pub circadian: CircadianConfig,
    pub cognitive: CognitiveConfig,
    pub rate_limit: RateLimitConfig,
    pub fingerprint: FingerprintConfig,
    pub typing: TypingConfig,
    pub reading: ReadingConfig,
    pub action: ActionConfig,
    pub send_flow: SendFlowConfig,
    pub mark_read: MarkReadConfig,
    pub quick_action: QuickActionConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            device_profile: "desktop".into(),
            personality_profile: "casual".into(),
            circadian: CircadianConfig::default(),
            cognitive: CognitiveConfig::default(),
            rate_limit: RateLimitConfig::default(),
            fingerprint: FingerprintConfig::default(),
            typing: TypingConfig::default(),
            reading: ReadingConfig::default(),
            action: ActionConfig::default(),
            send_flow: SendFlowConfig::default(),
            mark_read: MarkReadConfig::default(),
            quick_action: QuickActionConfig::default(),
        }
    }
}

/// Partial configuration; present sections replace the live ones wholesale
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineOverrides {
    pub enabled: Option<bool>,
    pub device_profile: Option<String>,
    pub personality_profile: Option<String>,
    pub circadian: Option<CircadianConfig>,
    pub cognitive: Option<CognitiveConfig>,
    pub rate_limit: Option<RateLimitConfig>,
    pub fingerprint: Option<FingerprintConfig>,
    pub typing: Option<TypingConfig>,
    pub reading: Option<ReadingConfig>,
    pub action: Option<ActionConfig>,
    pub send_flow: Option<SendFlowConfig>,
    pub mark_read: Option<MarkReadConfig>,
    pub quick_action: Option<QuickActionConfig>,
}

impl EngineConfig {
    /// Shallow-merge overrides into this config
    pub fn apply(&mut self, overrides: EngineOverrides) {
        if let Some(v) = overrides.enabled {
            self.enabled = v;
        }
        if let Some(v) = overrides.device_profile {
            self.device_profile = v;
        }
        if let Some(v) = overrides.personality_profile {
            self.personality_profile = v;
        }
        if let Some(v) = overrides.circadian {
            self.circadian = v;
        }
        if let Some(v) = overrides.cognitive {
            self.cognitive = v;
        }
        if let Some(v) = overrides.rate_limit {
            self.rate_limit = v;
        }
        if let Some(v) = overrides.fingerprint {
            self.fingerprint = v;
        }
        if let Some(v) = overrides.typing {
            self.typing = v;
        }
        if let Some(v) = overrides.reading {
            self.reading = v;
        }
        if let Some(v) = overrides.action {
            self.action = v;
        }
        if let Some(v) = overrides.send_flow {
            self.send_flow = v;
        }
        if let Some(v) = overrides.mark_read {
            self.mark_read = v;
        }
        if let Some(v) = overrides.quick_action {
            self.quick_action = v;
        }
    }
}

/// Wall-clock hour windows and their activity multipliers
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CircadianConfig {
    /// Sleep window [start, end), hours; may wrap midnight
    pub sleep_start: u32,
    pub sleep_end: u32,
    /// Peak window [start, end), hours; may wrap midnight
    pub peak_start: u32,
    pub peak_end: u32,
    /// Multiplier inside the sleep window (slower)
    pub sleep_multiplier: f64,
    /// Multiplier inside the peak window (faster)
    pub peak_multiplier: f64,
    /// Extra multiplier on Saturday/Sunday
    pub weekend_multiplier: f64,
}

impl Default for CircadianConfig {
    fn default() -> Self {
        Self {
            sleep_start: 23,
            sleep_end: 7,
            peak_start: 10,
            peak_end: 20,
            sleep_multiplier: 2.0,
            peak_multiplier: 0.9,
            weekend_multiplier: 1.1,
        }
    }
}

/// Focus, fatigue, and emotion dynamics
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CognitiveConfig {
    /// Idle gap after which focus recovers instead of decaying
    pub idle_recovery_ms: u64,
    /// Focus gained per recovering action
    pub focus_recovery_rate: f64,
    /// Focus lost per action while engaged
    pub focus_decay_rate: f64,
    /// Focus never drops below this
    pub focus_floor: f64,
    pub fatigue_enabled: bool,
    /// Session age at which fatigue starts accumulating
    pub fatigue_onset_ms: u64,
    /// Session length at which fatigue reaches its cap
    pub max_session_ms: u64,
    /// Fatigue cap
    pub max_fatigue: f64,
    /// Typing slowdown at full fatigue (1.4 = 40% slower)
    pub fatigue_typing_effect: f64,
    /// Per-action chance of an emotion transition
    pub emotion_shift_chance: f64,
}

impl Default for CognitiveConfig {
    fn default() -> Self {
        Self {
            idle_recovery_ms: 60_000,
            focus_recovery_rate: 0.05,
            focus_decay_rate: 0.01,
            focus_floor: 0.2,
            fatigue_enabled: true,
            fatigue_onset_ms: 1_800_000,
            max_session_ms: 14_400_000,
            max_fatigue: 0.85,
            fatigue_typing_effect: 1.4,
            emotion_shift_chance: 0.02,
        }
    }
}

/// Sliding-window rate limiting
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RateLimitConfig {
    pub max_per_minute: usize,
    pub max_per_hour: usize,
    /// Burst detection window
    pub burst_window_ms: u64,
    /// Actions inside the burst window that count as a burst
    pub burst_threshold: usize,
    /// Window ratio at which the warning multiplier kicks in
    pub warning_ratio: f64,
    /// Window ratio at which the critical multiplier kicks in
    pub critical_ratio: f64,
    pub warning_multiplier: f64,
    pub critical_multiplier: f64,
    pub burst_multiplier: f64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_per_minute: 20,
            max_per_hour: 400,
            burst_window_ms: 10_000,
            burst_threshold: 5,
            warning_ratio: 0.7,
            critical_ratio: 0.9,
            warning_multiplier: 2.0,
            critical_multiplier: 3.0,
            burst_multiplier: 1.5,
        }
    }
}

/// Anti-detection pipeline knobs
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FingerprintConfig {
    /// Entropy pool size
    pub entropy_pool_size: usize,
    /// Wholesale pool refresh interval
    pub entropy_refresh_ms: u64,
    /// Clock drift bound in milliseconds
    pub drift_max_ms: f64,
    /// Pattern-break scheduling interval
    pub break_interval_ms: u64,
    /// Chance a due break actually activates
    pub break_chance: f64,
    /// Break mode duration
    pub break_duration_ms: u64,
    /// Per-call stealth adjustments
    pub slowdown_chance: f64,
    pub speedup_chance: f64,
    pub hesitation_chance: f64,
    /// Warmup phase length from session start
    pub warmup_ms: u64,
    /// Fatigue level at which the session enters cooldown
    pub cooldown_fatigue_threshold: f64,
}

impl Default for FingerprintConfig {
    fn default() -> Self {
        Self {
            entropy_pool_size: 64,
            entropy_refresh_ms: 300_000,
            drift_max_ms: 500.0,
            break_interval_ms: 300_000,
            break_chance: 0.2,
            break_duration_ms: 30_000,
            slowdown_chance: 0.03,
            speedup_chance: 0.03,
            hesitation_chance: 0.05,
            warmup_ms: 180_000,
            cooldown_fatigue_threshold: 0.7,
        }
    }
}

/// Character-level typing synthesis
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TypingConfig {
    /// Per-character-category multipliers over the base char delay
    pub punctuation_multiplier: f64,
    pub capital_multiplier: f64,
    pub digit_multiplier: f64,
    pub symbol_multiplier: f64,
    /// Uniform jitter added per character, +/- this many ms
    pub char_jitter_ms: f64,
    /// Word-boundary delay range
    pub word_delay_ms: (u64, u64),
    /// Words at or above this length get the amplified word delay
    pub long_word_len: usize,
    pub long_word_factor: f64,
    /// Per-word chance of a mid-typing pause
    pub midword_pause_chance: f64,
    pub midword_pause_ms: (u64, u64),
    /// Log-normal thinking-pause medians by message length tier
    pub think_median_short_ms: f64,
    pub think_median_medium_ms: f64,
    pub think_median_long_ms: f64,
    pub think_sigma: f64,
    /// Tier boundaries in characters
    pub short_len: usize,
    pub long_len: usize,
    /// Correction time charged per expected typo
    pub typo_correction_ms: f64,
    pub min_ms: u64,
    pub max_ms: u64,
}

impl Default for TypingConfig {
    fn default() -> Self {
        Self {
            punctuation_multiplier: 1.6,
            capital_multiplier: 1.25,
            digit_multiplier: 1.4,
            symbol_multiplier: 1.8,
            char_jitter_ms: 25.0,
            word_delay_ms: (80, 250),
            long_word_len: 8,
            long_word_factor: 1.5,
            midword_pause_chance: 0.03,
            midword_pause_ms: (300, 1_200),
            think_median_short_ms: 800.0,
            think_median_medium_ms: 2_000.0,
            think_median_long_ms: 4_500.0,
            think_sigma: 0.6,
            short_len: 20,
            long_len: 120,
            typo_correction_ms: 900.0,
            min_ms: 500,
            max_ms: 120_000,
        }
    }
}

/// Word/attachment reading synthesis (full model)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReadingConfig {
    pub words_per_minute: f64,
    /// Chance the whole message is read twice
    pub reread_chance: f64,
    /// Fixed scanning delay added to every read
    pub scan_delay_ms: u64,
    pub min_ms: u64,
    pub max_ms: u64,
    /// Per-attachment viewing ranges
    pub image_ms: (u64, u64),
    pub video_ms: (u64, u64),
    pub audio_ms: (u64, u64),
    pub file_ms: (u64, u64),
    pub sticker_ms: (u64, u64),
}

impl Default for ReadingConfig {
    fn default() -> Self {
        Self {
            words_per_minute: 240.0,
            reread_chance: 0.08,
            scan_delay_ms: 350,
            min_ms: 800,
            max_ms: 60_000,
            image_ms: (1_500, 4_000),
            video_ms: (3_000, 10_000),
            audio_ms: (2_000, 8_000),
            file_ms: (1_000, 2_500),
            sticker_ms: (400, 1_200),
        }
    }
}

/// Generic per-action-type delay (full model)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ActionConfig {
    /// Log-normal base median
    pub base_median_ms: f64,
    pub sigma: f64,
    pub send_multiplier: f64,
    pub read_multiplier: f64,
    pub react_multiplier: f64,
    pub typing_multiplier: f64,
    pub default_multiplier: f64,
    /// Extra uniform cooldown when a burst is currently detected
    pub burst_penalty_ms: (u64, u64),
    pub min_ms: u64,
    pub max_ms: u64,
}

impl Default for ActionConfig {
    fn default() -> Self {
        Self {
            base_median_ms: 500.0,
            sigma: 0.5,
            send_multiplier: 1.0,
            read_multiplier: 0.8,
            react_multiplier: 1.2,
            typing_multiplier: 0.5,
            default_multiplier: 1.0,
            burst_penalty_ms: (500, 2_000),
            min_ms: 100,
            max_ms: 30_000,
        }
    }
}

/// Phase constants for the send-message flow
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SendFlowConfig {
    /// Pre-read delay before composing starts
    pub pre_read_ms: (u64, u64),
    /// Thinking-pause ranges by message length tier
    pub think_short_ms: (u64, u64),
    pub think_medium_ms: (u64, u64),
    pub think_long_ms: (u64, u64),
    /// Simplified typing duration clamp
    pub typing_min_ms: u64,
    pub typing_max_ms: u64,
    /// Extra pause chance and range while in the sleep window
    pub night_pause_chance: f64,
    pub night_pause_ms: (u64, u64),
    /// Pause between typing and the actual send
    pub post_pause_ms: (u64, u64),
}

impl Default for SendFlowConfig {
    fn default() -> Self {
        Self {
            pre_read_ms: (300, 900),
            think_short_ms: (500, 1_500),
            think_medium_ms: (1_200, 3_500),
            think_long_ms: (2_500, 7_000),
            typing_min_ms: 500,
            typing_max_ms: 8_000,
            night_pause_chance: 0.08,
            night_pause_ms: (2_000, 8_000),
            post_pause_ms: (200, 600),
        }
    }
}

/// Inline mark-as-read formula, intentionally simpler than `ReadingConfig`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkReadConfig {
    pub per_word_ms: u64,
    pub per_attachment_ms: u64,
    pub min_ms: u64,
    pub max_ms: u64,
}

impl Default for MarkReadConfig {
    fn default() -> Self {
        Self {
            per_word_ms: 220,
            per_attachment_ms: 1_500,
            min_ms: 600,
            max_ms: 5_000,
        }
    }
}

/// Fixed base ranges for the quick `before_action` path
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QuickActionConfig {
    pub react_ms: (u64, u64),
    pub unsend_ms: (u64, u64),
    pub edit_ms: (u64, u64),
    pub default_ms: (u64, u64),
}

impl Default for QuickActionConfig {
    fn default() -> Self {
        Self {
            react_ms: (300, 1_000),
            unsend_ms: (400, 1_500),
            edit_ms: (600, 2_000),
            default_ms: (300, 800),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let c = EngineConfig::default();
        assert!(c.enabled);
        assert_eq!(c.device_profile, "desktop");
        assert_eq!(c.circadian.sleep_start, 23);
        assert_eq!(c.circadian.sleep_multiplier, 2.0);
        assert_eq!(c.rate_limit.warning_ratio, 0.7);
        assert_eq!(c.rate_limit.critical_ratio, 0.9);
        assert_eq!(c.fingerprint.break_interval_ms, 300_000);
        assert_eq!(c.fingerprint.break_chance, 0.2);
        assert_eq!(c.typing.min_ms, 500);
        assert_eq!(c.typing.max_ms, 120_000);
        assert_eq!(c.action.min_ms, 100);
        assert_eq!(c.action.max_ms, 30_000);
    }

    #[test]
    fn overrides_replace_whole_sections() {
        let mut config = EngineConfig::default();
        let overrides = EngineOverrides {
            enabled: Some(false),
            rate_limit: Some(RateLimitConfig {
                max_per_minute: 5,
                ..Default::default()
            }),
            ..Default::default()
        };
        config.apply(overrides);

        assert!(!config.enabled);
        assert_eq!(config.rate_limit.max_per_minute, 5);
        // untouched sections keep their defaults
        assert_eq!(config.typing.min_ms, 500);
    }

    #[test]
    fn partial_json_deserializes_over_defaults() {
        let json = r#"{
            "device_profile": "mobile",
            "circadian": { "sleep_start": 1, "sleep_end": 9 }
        }"#;
        let config: EngineConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.device_profile, "mobile");
        assert_eq!(config.circadian.sleep_start, 1);
        // field-level serde default inside a supplied section
        assert_eq!(config.circadian.peak_start, 10);
        assert!(config.enabled);
    }

    #[test]
    fn overrides_deserialize_sparse() {
        let json = r#"{ "personality_profile": "reserved" }"#;
        let o: EngineOverrides = serde_json::from_str(json).unwrap();
        assert_eq!(o.personality_profile.as_deref(), Some("reserved"));
        assert!(o.typing.is_none());
    }
}
