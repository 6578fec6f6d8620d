//! Error types for clock configuration and the async driver.
//!
//! The engine itself never fails: out-of-turn or stale intents are ignored rather than
//! reported. Errors only arise when building a time control or talking to a driver task
//! that has gone away.

use thiserror::Error;

/// Errors produced when validating or parsing a time control.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A duration does not fit in the millisecond range used by the engine.
    #[error("{field} is too large to represent in milliseconds")]
    Overflow {
        /// Which part of the time control overflowed.
        field: &'static str,
    },
    /// A `"<minutes>+<seconds>"` string could not be parsed.
    #[error("invalid time control {input:?}: {reason}")]
    Parse {
        /// The rejected input.
        input: String,
        /// What was wrong with it.
        reason: &'static str,
    },
}

/// Errors returned by a [`ClockHandle`](crate::driver::ClockHandle).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DriverError {
    /// The driver task has stopped; no further commands are accepted.
    #[error("clock driver has stopped")]
    Closed,
}

impl ConfigError {
    pub(crate) fn parse(input: &str, reason: &'static str) -> Self {
        ConfigError::Parse { input: input.to_string(), reason }
    }

    /// Check if this error came from parsing a time-control string.
    pub fn is_parse(&self) -> bool {
        matches!(self, Self::Parse { .. })
    }
}
