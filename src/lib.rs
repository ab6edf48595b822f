//! # Ghostpace
//!
//! Human-behavior timing and anti-detection engine for messaging automation.
//!
//! Ghostpace computes, for every outbound action (send, read, react, type), a
//! delay and a set of side-effect decisions designed to mimic human timing
//! variability: no regular intervals, no identical delays, no superhuman
//! speed, no 24/7 activity. Transport and protocol layers stay outside; they
//! call in before each action and honor the returned delay.
//!
//! ## Features
//!
//! - **Behavioral DNA** - Session-stable rhythm, style, and activity traits
//! - **Layered pipeline** - Circadian, cognitive, rate-limit, fingerprint
//!   stages composed into one millisecond value, NaN-safe throughout
//! - **Self-monitoring** - The engine flags and corrects its own output when
//!   it starts looking too regular or too erratic
//! - **Deterministic tests** - Injectable clock and uniform source
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ghostpace::BehaviorEngine;
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut engine = BehaviorEngine::new();
//!
//!     // Suspends for a human-plausible composing flow, then returns
//!     engine.before_send_message("thread-42", "hey, running late!").await;
//!
//!     // Read receipt pacing
//!     engine.before_mark_as_read("see you at 8?", &[]).await;
//!
//!     let stats = engine.get_stats();
//!     println!("{} actions this session", stats.action_count);
//! }
//! ```
//!
//! ## Planning without sleeping
//!
//! ```rust
//! use ghostpace::{BehaviorEngine, ActionKind};
//!
//! let mut engine = BehaviorEngine::new();
//! let plan = engine.plan_send_message("on my way");
//! // host owns the waiting (and any cancellation race)
//! let total = plan.total();
//! # let _ = total;
//! let reaction = engine.plan_action_delay(ActionKind::React);
//! # let _ = reaction;
//! ```

pub mod circadian;
pub mod clock;
pub mod cognitive;
pub mod config;
pub mod dist;
pub mod engine;
pub mod error;
pub mod fingerprint;
pub mod profile;
pub mod ratelimit;
pub mod session;
pub mod sim;

// Re-exports
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{EngineConfig, EngineOverrides};
pub use dist::{OsRandom, RandomSource, SeededRandom};
pub use engine::{BehaviorEngine, EngineStats, SendPlan};
pub use error::{Error, Result};
pub use profile::{DeviceProfile, PersonalityProfile};
pub use session::{ActionKind, Emotion, SessionPhase};
pub use sim::AttachmentKind;
