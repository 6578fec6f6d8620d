//! Async host loop for a [`ClockEngine`].
//!
//! A single tokio task owns the engine, so every intent and tick is applied serially in
//! arrival order and no locking is needed. The periodic ticker only exists while a turn is
//! running and unpaused; it is dropped on `Begin`, `End`, and pause, and re-armed when play
//! resumes. Every new snapshot is published on a `watch` channel (one writer, any number of
//! readers). Alerts are queued to a separate playback task that feeds the configured
//! [`AlertSink`] in order, so a slow sink never delays a tick or a command.

use crate::alert::AlertKind;
use crate::config::GameConfig;
use crate::engine::{ClockEngine, RestartOutcome};
use crate::error::DriverError;
use crate::sink::{emit_best_effort, AlertSink};
use crate::state::{ClockState, Player};
use std::time::Duration;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::time::{Instant, Interval, MissedTickBehavior};

/// Default tick cadence, fine enough for a smooth hundredths display.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(32);

const DEFAULT_COMMAND_CAPACITY: usize = 64;

/// Driver tuning.
#[derive(Debug, Clone)]
pub struct DriverConfig {
    tick_interval: Duration,
    command_capacity: usize,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self { tick_interval: DEFAULT_TICK_INTERVAL, command_capacity: DEFAULT_COMMAND_CAPACITY }
    }
}

impl DriverConfig {
    /// Tick cadence. Zero is bumped to one millisecond.
    pub fn tick_interval(mut self, interval: Duration) -> Self {
        self.tick_interval = interval.max(Duration::from_millis(1));
        self
    }

    /// Bound on queued, unprocessed commands.
    pub fn command_capacity(mut self, capacity: usize) -> Self {
        self.command_capacity = capacity.max(1);
        self
    }

    pub fn interval(&self) -> Duration {
        self.tick_interval
    }

    pub fn capacity(&self) -> usize {
        self.command_capacity
    }
}

enum Command {
    EndTurn { player: Player, reply: oneshot::Sender<ClockState> },
    SetPaused { paused: bool, reply: oneshot::Sender<ClockState> },
    TogglePause { reply: oneshot::Sender<ClockState> },
    RequestRestart { reply: oneshot::Sender<RestartOutcome> },
    Restart { config: Option<GameConfig>, reply: oneshot::Sender<ClockState> },
    Shutdown { reply: oneshot::Sender<ClockState> },
}

/// Spawns the host loop.
pub struct ClockDriver;

impl ClockDriver {
    /// Spawn the driver task on the current tokio runtime.
    ///
    /// Ticks read the engine's own [`Clock`](crate::Clock); pair the engine with
    /// [`TokioClock`](crate::TokioClock) when tests run on paused tokio time.
    pub fn spawn<S>(engine: ClockEngine, sink: S, config: DriverConfig) -> ClockHandle
    where
        S: AlertSink,
        S::Future: Send + 'static,
    {
        let (tx, rx) = mpsc::channel(config.command_capacity);
        let (state_tx, state_rx) = watch::channel(*engine.snapshot());
        let (alert_tx, alert_rx) = mpsc::unbounded_channel();
        tokio::spawn(play(sink, alert_rx));
        tokio::spawn(run(engine, rx, state_tx, alert_tx, config.tick_interval));
        ClockHandle { tx, state: state_rx }
    }
}

/// Cloneable handle to a running driver.
#[derive(Debug, Clone)]
pub struct ClockHandle {
    tx: mpsc::Sender<Command>,
    state: watch::Receiver<ClockState>,
}

impl ClockHandle {
    /// Latest published snapshot.
    pub fn snapshot(&self) -> ClockState {
        *self.state.borrow()
    }

    /// Receiver that wakes on every published snapshot.
    pub fn subscribe(&self) -> watch::Receiver<ClockState> {
        self.state.clone()
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }

    pub async fn end_turn(&self, player: Player) -> Result<ClockState, DriverError> {
        self.request(|reply| Command::EndTurn { player, reply }).await
    }

    pub async fn set_paused(&self, paused: bool) -> Result<ClockState, DriverError> {
        self.request(|reply| Command::SetPaused { paused, reply }).await
    }

    pub async fn toggle_pause(&self) -> Result<ClockState, DriverError> {
        self.request(|reply| Command::TogglePause { reply }).await
    }

    /// Pause on the first request during play, reset otherwise.
    pub async fn request_restart(&self) -> Result<RestartOutcome, DriverError> {
        self.request(|reply| Command::RequestRestart { reply }).await
    }

    /// Unconditional reset, optionally with a new time control.
    pub async fn restart(&self, config: Option<GameConfig>) -> Result<ClockState, DriverError> {
        self.request(|reply| Command::Restart { config, reply }).await
    }

    /// Stop the driver and return the final snapshot.
    pub async fn shutdown(&self) -> Result<ClockState, DriverError> {
        self.request(|reply| Command::Shutdown { reply }).await
    }

    async fn request<T>(
        &self,
        make: impl FnOnce(oneshot::Sender<T>) -> Command,
    ) -> Result<T, DriverError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx.send(make(reply_tx)).await.map_err(|_| DriverError::Closed)?;
        reply_rx.await.map_err(|_| DriverError::Closed)
    }
}

async fn run(
    mut engine: ClockEngine,
    mut rx: mpsc::Receiver<Command>,
    state_tx: watch::Sender<ClockState>,
    alerts: mpsc::UnboundedSender<AlertKind>,
    period: Duration,
) {
    tracing::info!(
        config = %engine.config(),
        period_ms = period.as_millis() as u64,
        "Clock driver started"
    );
    let mut ticker: Option<Interval> = None;

    loop {
        sync_ticker(&engine, &mut ticker, period);

        tokio::select! {
            cmd = rx.recv() => {
                match cmd {
                    None => break,
                    Some(Command::Shutdown { reply }) => {
                        let _ = reply.send(*engine.snapshot());
                        break;
                    }
                    Some(cmd) => apply(&mut engine, cmd, &state_tx, &alerts),
                }
            }
            _ = next_tick(&mut ticker) => {
                let now = engine.now_millis();
                let update = engine.tick(now);
                state_tx.send_replace(update.state);
                dispatch(&alerts, update.alerts);
            }
        }
    }

    tracing::info!(turn = %engine.snapshot().turn, "Clock driver stopped");
}

/// Apply a command, publish the new snapshot, queue any alerts, then answer the caller.
fn apply(
    engine: &mut ClockEngine,
    cmd: Command,
    state_tx: &watch::Sender<ClockState>,
    alerts: &mpsc::UnboundedSender<AlertKind>,
) {
    // Inert intents leave the state alone and must not wake subscribers.
    let publish = |engine: &ClockEngine| {
        let next = *engine.snapshot();
        state_tx.send_if_modified(|current| {
            let changed = *current != next;
            *current = next;
            changed
        });
    };
    match cmd {
        Command::EndTurn { player, reply } => {
            let update = engine.end_turn(player);
            publish(engine);
            dispatch(alerts, update.alerts);
            let _ = reply.send(update.state);
        }
        Command::SetPaused { paused, reply } => {
            let state = engine.set_paused(paused);
            publish(engine);
            let _ = reply.send(state);
        }
        Command::TogglePause { reply } => {
            let state = engine.toggle_pause();
            publish(engine);
            let _ = reply.send(state);
        }
        Command::RequestRestart { reply } => {
            let outcome = engine.request_restart();
            publish(engine);
            let _ = reply.send(outcome);
        }
        Command::Restart { config, reply } => {
            let state = match config {
                Some(config) => engine.restart_with(config),
                None => engine.restart(),
            };
            publish(engine);
            let _ = reply.send(state);
        }
        Command::Shutdown { reply } => {
            let _ = reply.send(*engine.snapshot());
        }
    }
}

fn dispatch(queue: &mpsc::UnboundedSender<AlertKind>, alerts: Vec<AlertKind>) {
    for alert in alerts {
        // Only fails once the playback task is gone, and then nobody is listening.
        let _ = queue.send(alert);
    }
}

/// Play queued alerts one at a time until the driver drops its end of the queue.
async fn play<S>(sink: S, mut queue: mpsc::UnboundedReceiver<AlertKind>)
where
    S: AlertSink,
    S::Future: Send + 'static,
{
    while let Some(alert) = queue.recv().await {
        emit_best_effort(sink.clone(), alert).await;
    }
}

/// Arm the ticker for active play, drop it otherwise.
fn sync_ticker(engine: &ClockEngine, ticker: &mut Option<Interval>, period: Duration) {
    match (engine.is_running(), ticker.is_some()) {
        (true, false) => {
            let mut interval = tokio::time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            *ticker = Some(interval);
            tracing::debug!(turn = %engine.snapshot().turn, "Clock ticker armed");
        }
        (false, true) => {
            *ticker = None;
            tracing::debug!(turn = %engine.snapshot().turn, "Clock ticker stopped");
        }
        _ => {}
    }
}

async fn next_tick(ticker: &mut Option<Interval>) {
    match ticker {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending().await,
    }
}
