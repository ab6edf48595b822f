//! Device and personality profiles
//!
//! Static catalogs chosen once at session start. A device profile fixes the
//! mechanical envelope (typing speed, response latency); a personality
//! profile fixes the habits layered on top (response multipliers, emoji
//! usage, tolerance for leaving typos in).

use crate::error::{Error, Result};

/// Mechanical device envelope, immutable after session start
#[derive(Debug, Clone, Copy)]
pub struct DeviceProfile {
    pub name: &'static str,
    /// Typing speed range in words per minute
    pub typing_speed_wpm: (f64, f64),
    /// Probability of a typo per character
    pub typo_rate: f64,
    /// Relative scroll speed, 1.0 = desktop baseline
    pub scroll_speed: f64,
    /// Response delay range in milliseconds
    pub response_delay_ms: (u64, u64),
    /// Plausible session length range in milliseconds
    pub session_length_ms: (u64, u64),
    /// Chance the operator is multitasking on any given action
    pub multitask_chance: f64,
}

/// Behavioral habits, immutable after session start
#[derive(Debug, Clone, Copy)]
pub struct PersonalityProfile {
    pub name: &'static str,
    /// Scales every response delay
    pub response_time_multiplier: f64,
    /// Bias toward longer (>1) or shorter (<1) messages
    pub message_length_bias: f64,
    /// Emoji frequency, 0..1
    pub emoji_usage: f64,
    /// Chance a typo is left uncorrected
    pub typo_tolerance: f64,
    /// Scales the delay before read receipts go out
    pub read_receipt_delay_factor: f64,
}

pub const DEVICE_PROFILES: &[DeviceProfile] = &[
    DeviceProfile {
        name: "desktop",
        typing_speed_wpm: (55.0, 85.0),
        typo_rate: 0.02,
        scroll_speed: 1.0,
        response_delay_ms: (800, 4_000),
        session_length_ms: (1_800_000, 10_800_000),
        multitask_chance: 0.25,
    },
    DeviceProfile {
        name: "laptop",
        typing_speed_wpm: (45.0, 75.0),
        typo_rate: 0.025,
        scroll_speed: 0.9,
        response_delay_ms: (1_000, 5_000),
        session_length_ms: (1_200_000, 7_200_000),
        multitask_chance: 0.35,
    },
    DeviceProfile {
        name: "mobile",
        typing_speed_wpm: (25.0, 45.0),
        typo_rate: 0.045,
        scroll_speed: 1.4,
        response_delay_ms: (500, 3_000),
        session_length_ms: (300_000, 2_400_000),
        multitask_chance: 0.55,
    },
    DeviceProfile {
        name: "tablet",
        typing_speed_wpm: (30.0, 50.0),
        typo_rate: 0.04,
        scroll_speed: 1.2,
        response_delay_ms: (700, 3_500),
        session_length_ms: (600_000, 3_600_000),
        multitask_chance: 0.45,
    },
];

pub const PERSONALITY_PROFILES: &[PersonalityProfile] = &[
    PersonalityProfile {
        name: "professional",
        response_time_multiplier: 1.1,
        message_length_bias: 1.3,
        emoji_usage: 0.05,
        typo_tolerance: 0.1,
        read_receipt_delay_factor: 0.8,
    },
    PersonalityProfile {
        name: "casual",
        response_time_multiplier: 1.0,
        message_length_bias: 0.9,
        emoji_usage: 0.4,
        typo_tolerance: 0.5,
        read_receipt_delay_factor: 1.0,
    },
    PersonalityProfile {
        name: "enthusiastic",
        response_time_multiplier: 0.7,
        message_length_bias: 1.1,
        emoji_usage: 0.7,
        typo_tolerance: 0.6,
        read_receipt_delay_factor: 0.6,
    },
    PersonalityProfile {
        name: "reserved",
        response_time_multiplier: 1.5,
        message_length_bias: 0.7,
        emoji_usage: 0.1,
        typo_tolerance: 0.2,
        read_receipt_delay_factor: 1.6,
    },
];

/// Look up a device profile by name
pub fn device_profile(name: &str) -> Result<&'static DeviceProfile> {
    DEVICE_PROFILES
        .iter()
        .find(|p| p.name == name)
        .ok_or_else(|| Error::UnknownDeviceProfile(name.to_string()))
}

/// Look up a personality profile by name
pub fn personality_profile(name: &str) -> Result<&'static PersonalityProfile> {
    PERSONALITY_PROFILES
        .iter()
        .find(|p| p.name == name)
        .ok_or_else(|| Error::UnknownPersonalityProfile(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_lookup() {
        let desktop = device_profile("desktop").unwrap();
        assert_eq!(desktop.name, "desktop");
        assert!(desktop.typing_speed_wpm.0 < desktop.typing_speed_wpm.1);

        let pro = personality_profile("professional").unwrap();
        assert!(pro.response_time_multiplier > 1.0);

        assert!(device_profile("smartwatch").is_err());
        assert!(personality_profile("chaotic").is_err());
    }

    #[test]
    fn catalogs_are_sane() {
        for p in DEVICE_PROFILES {
            assert!(p.typing_speed_wpm.0 > 0.0);
            assert!(p.typo_rate >= 0.0 && p.typo_rate < 0.2);
            assert!(p.response_delay_ms.0 < p.response_delay_ms.1);
        }
        for p in PERSONALITY_PROFILES {
            assert!(p.response_time_multiplier > 0.0);
            assert!(p.emoji_usage >= 0.0 && p.emoji_usage <= 1.0);
        }
    }
}
