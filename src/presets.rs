//! Ready-made time controls.
//!
//! The picker offers a fixed grid of initial times and increments; these constants are that
//! grid, plus a few named controls for hosts that skip the picker.
//!
//! ```rust
//! use chessclock::presets;
//!
//! let cfg = presets::blitz();
//! assert_eq!(cfg.to_string(), "5+3");
//! assert_eq!(presets::all_choices().count(), 49);
//! ```
//!
//! ## Available Presets
//!
//! - [`bullet`]: 1 minute, no increment
//! - [`blitz`]: 5 minutes + 3 seconds (the picker's default)
//! - [`rapid`]: 15 minutes + 10 seconds
//! - [`classical`]: 30 minutes + 15 seconds

use crate::config::GameConfig;

/// Initial-time choices offered by the picker, in minutes.
pub const TIME_CHOICES_MINUTES: [u64; 7] = [1, 2, 3, 5, 10, 15, 30];

/// Increment choices offered by the picker, in seconds.
pub const INCREMENT_CHOICES_SECONDS: [u64; 7] = [0, 1, 2, 3, 5, 10, 15];

/// Picker preselection: 5 minutes.
pub const DEFAULT_MINUTES: u64 = 5;

/// Picker preselection: 3 seconds.
pub const DEFAULT_INCREMENT_SECONDS: u64 = 3;

const fn minutes_plus_seconds(minutes: u64, seconds: u64) -> GameConfig {
    GameConfig::from_millis(minutes * 60_000, seconds * 1_000)
}

/// 1+0.
pub fn bullet() -> GameConfig {
    minutes_plus_seconds(1, 0)
}

/// 5+3.
pub fn blitz() -> GameConfig {
    minutes_plus_seconds(DEFAULT_MINUTES, DEFAULT_INCREMENT_SECONDS)
}

/// 15+10.
pub fn rapid() -> GameConfig {
    minutes_plus_seconds(15, 10)
}

/// 30+15, the longest control on the picker.
pub fn classical() -> GameConfig {
    minutes_plus_seconds(30, 15)
}

/// Every combination on the picker grid, time-major.
pub fn all_choices() -> impl Iterator<Item = GameConfig> {
    TIME_CHOICES_MINUTES.into_iter().flat_map(|minutes| {
        INCREMENT_CHOICES_SECONDS
            .into_iter()
            .map(move |seconds| minutes_plus_seconds(minutes, seconds))
    })
}

/// Whether `config` is one of the picker's combinations.
pub fn is_picker_choice(config: &GameConfig) -> bool {
    all_choices().any(|c| c == *config)
}
