//! Countdown display formatting.

use std::fmt;

/// Below this many milliseconds the display gains a hundredths field.
pub const HUNDREDTHS_BELOW_MS: u64 = 60_000;

/// Format remaining milliseconds as `MM:SS`, adding `.CC` hundredths once the clock is
/// inside its final minute.
///
/// Minutes are not wrapped into hours.
///
/// ```
/// use chessclock::format_remaining;
/// assert_eq!(format_remaining(65_000), "01:05");
/// assert_eq!(format_remaining(59_999), "00:59.99");
/// assert_eq!(format_remaining(9_876), "00:09.87");
/// ```
pub fn format_remaining(ms: u64) -> String {
    Remaining(ms).to_string()
}

/// `Display` adapter over a remaining-time value, for writing without an intermediate
/// `String`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Remaining(pub u64);

impl fmt::Display for Remaining {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ms = self.0;
        let total_seconds = ms / 1_000;
        let minutes = total_seconds / 60;
        let seconds = total_seconds % 60;
        write!(f, "{:02}:{:02}", minutes, seconds)?;
        if ms < HUNDREDTHS_BELOW_MS {
            write!(f, ".{:02}", (ms / 10) % 100)?;
        }
        Ok(())
    }
}
