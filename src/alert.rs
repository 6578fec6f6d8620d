//! Audible alerts and the policy deciding when low time should beep.
//!
//! The policy compares the remaining time before and after a single tick, so each
//! threshold fires exactly once per crossing without any cached "already beeped" flags.

use std::fmt;

/// Remaining time below which the clock is in danger (and beeps once on entry).
pub const DANGER_THRESHOLD_MS: u64 = 30_000;

/// Whole-second count below which every second change beeps.
pub const FINAL_COUNTDOWN_SECONDS: u64 = 6;

/// An alert for the host to play. Fire and forget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum AlertKind {
    /// A player ended their turn.
    Move,
    /// Entered the danger zone, or one of the final seconds ticked away.
    ShortBeep,
    /// Time expired.
    LongBeep,
}

impl fmt::Display for AlertKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AlertKind::Move => "move",
            AlertKind::ShortBeep => "short_beep",
            AlertKind::LongBeep => "long_beep",
        };
        f.write_str(name)
    }
}

/// Thresholds for low-time alerts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlertPolicy {
    danger_threshold_ms: u64,
    countdown_seconds: u64,
}

impl Default for AlertPolicy {
    fn default() -> Self {
        Self::new(DANGER_THRESHOLD_MS, FINAL_COUNTDOWN_SECONDS)
    }
}

impl AlertPolicy {
    pub fn new(danger_threshold_ms: u64, countdown_seconds: u64) -> Self {
        Self { danger_threshold_ms, countdown_seconds }
    }

    pub fn danger_threshold_ms(&self) -> u64 {
        self.danger_threshold_ms
    }

    pub fn countdown_seconds(&self) -> u64 {
        self.countdown_seconds
    }

    /// Whether `remaining_ms` is inside the danger zone.
    pub fn in_danger(&self, remaining_ms: u64) -> bool {
        remaining_ms < self.danger_threshold_ms
    }

    /// Alerts produced by one countdown step from `old_ms` to `new_ms`.
    ///
    /// - At most one `ShortBeep` per step, even when the danger crossing and a final-second
    ///   change coincide.
    /// - `new_ms == 0` always yields `LongBeep`, which replaces the final-second beep for
    ///   that step.
    ///
    /// ```
    /// use chessclock::{AlertKind, AlertPolicy};
    /// let policy = AlertPolicy::default();
    /// assert_eq!(policy.evaluate(31_000, 29_000), vec![AlertKind::ShortBeep]);
    /// assert_eq!(policy.evaluate(6_500, 5_500), vec![AlertKind::ShortBeep]);
    /// assert_eq!(policy.evaluate(500, 0), vec![AlertKind::LongBeep]);
    /// assert!(policy.evaluate(45_000, 44_000).is_empty());
    /// ```
    pub fn evaluate(&self, old_ms: u64, new_ms: u64) -> Vec<AlertKind> {
        let mut alerts = Vec::new();
        let expired = new_ms == 0;

        let crossed_danger =
            old_ms >= self.danger_threshold_ms && new_ms < self.danger_threshold_ms;
        let old_seconds = old_ms / 1_000;
        let new_seconds = new_ms / 1_000;
        let countdown_tick = new_seconds < old_seconds && new_seconds < self.countdown_seconds;

        if crossed_danger || (countdown_tick && !expired) {
            alerts.push(AlertKind::ShortBeep);
        }
        if expired {
            alerts.push(AlertKind::LongBeep);
        }
        alerts
    }
}

/// [`AlertPolicy::evaluate`] with the default thresholds.
pub fn evaluate(old_ms: u64, new_ms: u64) -> Vec<AlertKind> {
    AlertPolicy::default().evaluate(old_ms, new_ms)
}

#[cfg(test)]
mod tests {
    use super::*;
    use AlertKind::*;

    #[test]
    fn quiet_above_danger() {
        assert!(evaluate(300_000, 299_968).is_empty());
        assert!(evaluate(30_500, 30_000).is_empty());
    }

    #[test]
    fn danger_crossing_beeps_once() {
        assert_eq!(evaluate(31_000, 29_000), vec![ShortBeep]);
        assert_eq!(evaluate(30_000, 29_999), vec![ShortBeep]);
        // Already inside: no repeat.
        assert!(evaluate(29_999, 29_000).is_empty());
    }

    #[test]
    fn final_seconds_beep_on_each_second_change() {
        assert!(evaluate(7_000, 6_000).is_empty());
        assert_eq!(evaluate(6_500, 5_500), vec![ShortBeep]);
        assert_eq!(evaluate(6_000, 5_999), vec![ShortBeep]);
        assert!(evaluate(5_999, 5_001).is_empty());
        assert_eq!(evaluate(1_000, 999), vec![ShortBeep]);
    }

    #[test]
    fn stepping_through_the_last_seconds_beeps_five_times_then_long() {
        let mut alerts = Vec::new();
        let mut old: u64 = 6_010;
        while old > 0 {
            let new = old.saturating_sub(16);
            alerts.extend(evaluate(old, new));
            old = new;
        }
        let short = alerts.iter().filter(|a| **a == ShortBeep).count();
        let long = alerts.iter().filter(|a| **a == LongBeep).count();
        assert_eq!(short, 6, "one beep entering each of 5,4,3,2,1,0 seconds");
        assert_eq!(long, 1);
        assert_eq!(alerts.last(), Some(&LongBeep));
    }

    #[test]
    fn zero_always_long_beeps() {
        assert_eq!(evaluate(500, 0), vec![LongBeep]);
        assert_eq!(evaluate(0, 0), vec![LongBeep]);
    }

    #[test]
    fn both_short_conditions_still_give_one_beep() {
        assert_eq!(evaluate(31_000, 4_000), vec![ShortBeep]);
    }

    #[test]
    fn huge_jump_to_zero_keeps_danger_beep() {
        assert_eq!(evaluate(120_000, 0), vec![ShortBeep, LongBeep]);
    }

    #[test]
    fn custom_thresholds() {
        let policy = AlertPolicy::new(10_000, 3);
        assert!(policy.in_danger(9_999));
        assert!(!policy.in_danger(10_000));
        assert_eq!(policy.evaluate(10_000, 9_000), vec![ShortBeep]);
        assert!(policy.evaluate(4_000, 3_000).is_empty());
        assert_eq!(policy.evaluate(3_000, 2_900), vec![ShortBeep]);
    }

    #[test]
    fn display_names() {
        assert_eq!(Move.to_string(), "move");
        assert_eq!(ShortBeep.to_string(), "short_beep");
        assert_eq!(LongBeep.to_string(), "long_beep");
    }
}
