//! Convenient re-exports for hosts embedding the clock.
pub use crate::{
    alert::{AlertKind, AlertPolicy},
    clock::{Clock, MonotonicClock, TokioClock},
    config::GameConfig,
    driver::{ClockDriver, ClockHandle, DriverConfig},
    engine::{ClockEngine, ClockUpdate, RestartOutcome},
    error::{ConfigError, DriverError},
    format::format_remaining,
    sink::{AlertSink, LogSink, MemorySink},
    state::{ClockState, Player, Turn},
    view::{PlayerView, Shade},
};
