//! Time-control configuration.

use crate::error::ConfigError;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Initial time and Fischer increment for one game. Fixed once the game starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameConfig {
    initial_time_ms: u64,
    increment_ms: u64,
}

impl GameConfig {
    /// Create a config from durations, rejecting values outside the millisecond range.
    ///
    /// # Examples
    /// ```
    /// use chessclock::GameConfig;
    /// use std::time::Duration;
    /// let cfg = GameConfig::new(Duration::from_secs(300), Duration::from_secs(3)).unwrap();
    /// assert_eq!(cfg.initial_time_ms(), 300_000);
    /// assert_eq!(cfg.increment_ms(), 3_000);
    /// ```
    pub fn new(initial: Duration, increment: Duration) -> Result<Self, ConfigError> {
        Ok(Self {
            initial_time_ms: to_millis(initial, "initial time")?,
            increment_ms: to_millis(increment, "increment")?,
        })
    }

    pub const fn from_millis(initial_time_ms: u64, increment_ms: u64) -> Self {
        Self { initial_time_ms, increment_ms }
    }

    /// The picker's units: whole minutes of initial time, whole seconds of increment.
    pub fn from_minutes_seconds(minutes: u64, seconds: u64) -> Result<Self, ConfigError> {
        let initial = minutes
            .checked_mul(60_000)
            .ok_or(ConfigError::Overflow { field: "initial time" })?;
        let increment =
            seconds.checked_mul(1_000).ok_or(ConfigError::Overflow { field: "increment" })?;
        Ok(Self::from_millis(initial, increment))
    }

    pub fn builder() -> GameConfigBuilder {
        GameConfigBuilder::default()
    }

    pub fn initial_time_ms(&self) -> u64 {
        self.initial_time_ms
    }

    pub fn increment_ms(&self) -> u64 {
        self.increment_ms
    }

    pub fn initial_time(&self) -> Duration {
        Duration::from_millis(self.initial_time_ms)
    }

    pub fn increment(&self) -> Duration {
        Duration::from_millis(self.increment_ms)
    }
}

/// Five minutes plus three seconds, the picker's preselected control.
impl Default for GameConfig {
    fn default() -> Self {
        Self::from_millis(5 * 60_000, 3_000)
    }
}

fn to_millis(d: Duration, field: &'static str) -> Result<u64, ConfigError> {
    u64::try_from(d.as_millis()).map_err(|_| ConfigError::Overflow { field })
}

/// Builder for [`GameConfig`]. Unset fields fall back to the default control.
#[derive(Debug, Clone, Default)]
pub struct GameConfigBuilder {
    initial: Option<Duration>,
    increment: Option<Duration>,
}

impl GameConfigBuilder {
    pub fn initial(mut self, initial: Duration) -> Self {
        self.initial = Some(initial);
        self
    }

    pub fn increment(mut self, increment: Duration) -> Self {
        self.increment = Some(increment);
        self
    }

    pub fn build(self) -> Result<GameConfig, ConfigError> {
        let defaults = GameConfig::default();
        GameConfig::new(
            self.initial.unwrap_or_else(|| defaults.initial_time()),
            self.increment.unwrap_or_else(|| defaults.increment()),
        )
    }
}

/// Renders as `"<minutes>+<seconds>"` when both parts are whole, otherwise in
/// milliseconds (`"90500ms+250ms"`).
impl fmt::Display for GameConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.initial_time_ms % 60_000 == 0 && self.increment_ms % 1_000 == 0 {
            write!(f, "{}+{}", self.initial_time_ms / 60_000, self.increment_ms / 1_000)
        } else {
            write!(f, "{}ms+{}ms", self.initial_time_ms, self.increment_ms)
        }
    }
}

/// Parses the usual `"<minutes>+<seconds>"` notation; the increment may be omitted.
///
/// ```
/// use chessclock::GameConfig;
/// let cfg: GameConfig = "3+2".parse().unwrap();
/// assert_eq!(cfg, GameConfig::from_millis(180_000, 2_000));
/// let cfg: GameConfig = "10".parse().unwrap();
/// assert_eq!(cfg.increment_ms(), 0);
/// ```
impl FromStr for GameConfig {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ConfigError::parse(s, "empty input"));
        }
        let (minutes, seconds) = match trimmed.split_once('+') {
            Some((m, inc)) => (m.trim(), Some(inc.trim())),
            None => (trimmed, None),
        };
        let minutes: u64 =
            minutes.parse().map_err(|_| ConfigError::parse(s, "minutes is not a number"))?;
        let seconds: u64 = match seconds {
            Some(inc) => {
                inc.parse().map_err(|_| ConfigError::parse(s, "increment is not a number"))?
            }
            None => 0,
        };
        Self::from_minutes_seconds(minutes, seconds)
    }
}
