#![forbid(unsafe_code)]
#![deny(warnings)]
#![cfg_attr(not(test), deny(clippy::all))]

//! # chessclock
//!
//! A two-player chess clock: independent countdowns, exactly one running at a time,
//! Fischer increment after each move, pause/resume, and beeps as time runs low.
//!
//! ## Features
//!
//! - **Turn/timer state machine** driven by real timestamps, immune to tick jitter
//! - **Fischer increment** (never on the opening move)
//! - **Low-time alerts** that fire once per threshold crossing
//! - **Display formatting** with hundredths in the final minute
//! - **Tokio driver** that arms its ticker only while a clock is running
//! - **Pluggable alert sinks** built on `tower::Service`
//!
//! ## Quick Start
//!
//! ```rust
//! use chessclock::{AlertKind, ClockEngine, GameConfig, ManualClock, Player, Turn};
//!
//! let mut clock = ClockEngine::start(GameConfig::from_millis(60_000, 2_000))
//!     .with_clock(ManualClock::new());
//! clock.end_turn_at(Player::Top, 0); // opening move, no increment
//!
//! let update = clock.tick(31_000);
//! assert_eq!(update.alerts, vec![AlertKind::ShortBeep]); // under 30 s
//! assert_eq!(update.state.remaining.bottom, 29_000);
//!
//! clock.end_turn_at(Player::Bottom, 31_000);
//! assert_eq!(clock.snapshot().remaining.bottom, 31_000);
//! assert_eq!(clock.snapshot().turn, Turn::Top);
//! ```

pub mod alert;
pub mod clock;
pub mod config;
pub mod driver;
pub mod engine;
pub mod error;
pub mod format;
pub mod prelude;
pub mod presets;
pub mod sink;
pub mod state;
pub mod view;

// Re-exports
pub use alert::{AlertKind, AlertPolicy, DANGER_THRESHOLD_MS, FINAL_COUNTDOWN_SECONDS};
pub use clock::{Clock, ManualClock, MonotonicClock, TokioClock};
pub use config::{GameConfig, GameConfigBuilder};
pub use driver::{ClockDriver, ClockHandle, DriverConfig};
pub use engine::{ClockEngine, ClockUpdate, RestartOutcome};
pub use error::{ConfigError, DriverError};
pub use format::{format_remaining, Remaining};
pub use sink::{
    emit_best_effort, AlertSink, LogSink, MemorySink, MulticastSink, NullSink, StreamingSink,
};
pub use state::{ClockState, Player, RemainingTime, Turn};
pub use view::{PlayerView, Shade};
