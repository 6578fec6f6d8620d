//! Turn/timer state machine.
//!
//! [`ClockEngine`] owns the [`ClockState`] and is the only thing that mutates it. It never
//! schedules itself: the host calls [`ClockEngine::tick`] with real timestamps, and elapsed
//! time is measured from those timestamps rather than counted in ticks, so a late tick just
//! reports a larger delta.
//!
//! Every intent is permissive. Ending a turn out of order, pausing before the first move,
//! or ticking after the game ended leaves the state untouched and produces no alerts.
//! Reaching zero is the one transition that is never skipped: it always ends the game and
//! always yields [`AlertKind::LongBeep`].

use crate::alert::{AlertKind, AlertPolicy};
use crate::clock::{Clock, MonotonicClock};
use crate::config::GameConfig;
use crate::state::{ClockState, Player, Turn};
use std::sync::Arc;

/// Result of an intent that can produce alerts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClockUpdate {
    /// State after the intent was applied.
    pub state: ClockState,
    /// Alerts to play, in order.
    pub alerts: Vec<AlertKind>,
}

/// What [`ClockEngine::request_restart`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum RestartOutcome {
    /// The game was running; it is now paused and a second request will reset it.
    Paused,
    /// The clock was reset to `Begin`.
    Reset,
}

/// Two-player clock with Fischer increment.
#[derive(Debug, Clone)]
pub struct ClockEngine {
    config: GameConfig,
    policy: AlertPolicy,
    state: ClockState,
    clock: Arc<dyn Clock>,
}

impl ClockEngine {
    /// Start a game in `Begin` with both timers at the configured initial time.
    ///
    /// # Examples
    /// ```
    /// use chessclock::{ClockEngine, GameConfig, Player, Turn};
    /// let mut engine = ClockEngine::start(GameConfig::from_millis(300_000, 3_000));
    /// engine.end_turn_at(Player::Top, 0);
    /// assert_eq!(engine.snapshot().turn, Turn::Bottom);
    /// ```
    pub fn start(config: GameConfig) -> Self {
        Self::with_clock_arc(config, Arc::new(MonotonicClock::default()))
    }

    /// Override the time source used by intents that read the current time
    /// (`end_turn`, `set_paused`, restarts). Re-stamps the current state.
    pub fn with_clock<C: Clock + 'static>(self, clock: C) -> Self {
        Self::with_clock_arc(self.config, Arc::new(clock)).with_alert_policy(self.policy)
    }

    /// Like [`with_clock`](Self::with_clock) for an already shared clock.
    pub fn with_clock_arc(config: GameConfig, clock: Arc<dyn Clock>) -> Self {
        let state = ClockState::initial(&config, clock.now_millis());
        Self { config, policy: AlertPolicy::default(), state, clock }
    }

    /// Replace the low-time alert thresholds.
    pub fn with_alert_policy(mut self, policy: AlertPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Current snapshot. Read-only; mutate through the intent methods.
    pub fn snapshot(&self) -> &ClockState {
        &self.state
    }

    /// Time control of the current game.
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Thresholds used to decide when ticks beep.
    pub fn alert_policy(&self) -> &AlertPolicy {
        &self.policy
    }

    /// Time source behind the non-`_at` intents.
    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    /// Current time according to the engine's clock.
    pub fn now_millis(&self) -> u64 {
        self.clock.now_millis()
    }

    /// A timer is counting down (in play and not paused).
    pub fn is_running(&self) -> bool {
        self.state.is_running()
    }

    /// Advance the countdown to `now`.
    ///
    /// Outside active play this only records the timestamp. Timestamps earlier than the
    /// last one are treated as no elapsed time.
    pub fn tick(&mut self, now: u64) -> ClockUpdate {
        let alerts = self.advance(now);
        self.update(alerts)
    }

    /// Charge the running player for the time since the last tick and end the game if
    /// their timer hits zero.
    fn advance(&mut self, now: u64) -> Vec<AlertKind> {
        let player = match self.state.turn.player() {
            Some(player) if !self.state.is_paused => player,
            _ => {
                self.state.last_tick_at = self.state.last_tick_at.max(now);
                return Vec::new();
            }
        };

        let delta = now.saturating_sub(self.state.last_tick_at);
        self.state.last_tick_at = self.state.last_tick_at.max(now);

        let old = self.state.remaining[player];
        let new = old.saturating_sub(delta);
        let alerts = self.policy.evaluate(old, new);
        self.state.remaining[player] = new;
        tracing::trace!(player = %player, delta_ms = delta, remaining_ms = new, "Clock tick");

        if new == 0 {
            self.state.turn = Turn::End;
            self.state.expired = Some(player);
            tracing::warn!(player = %player, "Clock → end (time expired)");
        }

        alerts
    }

    /// End `player`'s turn using the engine clock for the rebase timestamp.
    pub fn end_turn(&mut self, player: Player) -> ClockUpdate {
        let now = self.clock.now_millis();
        self.end_turn_at(player, now)
    }

    /// End `player`'s turn at `now`.
    ///
    /// Legal in `Begin` (for either player) or on the player's own turn, while unpaused.
    /// The mover is first charged for the time since the last tick; a move that lands at or
    /// after their zero point is rejected and the game ends instead. The opening move never
    /// earns increment. The opponent's countdown starts at `now`.
    pub fn end_turn_at(&mut self, player: Player, now: u64) -> ClockUpdate {
        if !self.state.can_end_turn(player) {
            tracing::debug!(
                player = %player,
                turn = %self.state.turn,
                paused = self.state.is_paused,
                "Clock: end_turn ignored"
            );
            return self.update(Vec::new());
        }

        let mut alerts = self.advance(now);
        if self.state.is_over() {
            tracing::debug!(player = %player, "Clock: end_turn rejected, flag fell first");
            return self.update(alerts);
        }

        let increment = self.config.increment_ms();
        if self.state.turn != Turn::Begin && increment > 0 {
            let remaining = &mut self.state.remaining[player];
            *remaining = remaining.saturating_add(increment);
        }

        let next = player.opponent();
        self.state.turn = next.turn();
        tracing::info!(
            moved = %player,
            running = %next,
            remaining_ms = self.state.remaining[player],
            "Clock → running"
        );

        alerts.push(AlertKind::Move);
        self.update(alerts)
    }

    /// Pause or resume using the engine clock.
    pub fn set_paused(&mut self, paused: bool) -> ClockState {
        let now = self.clock.now_millis();
        self.set_paused_at(paused, now)
    }

    /// Pause or resume at `now`. Ignored in `Begin` and `End`.
    ///
    /// Resuming rebases the countdown to `now`, so time spent paused is never charged even
    /// if the host stopped ticking meanwhile.
    pub fn set_paused_at(&mut self, paused: bool, now: u64) -> ClockState {
        if !self.state.turn.is_in_play() {
            tracing::debug!(turn = %self.state.turn, paused, "Clock: set_paused ignored");
            return self.state;
        }
        if self.state.is_paused == paused {
            return self.state;
        }

        self.state.is_paused = paused;
        self.state.last_tick_at = self.state.last_tick_at.max(now);
        if paused {
            tracing::info!(turn = %self.state.turn, "Clock → paused");
        } else {
            tracing::info!(turn = %self.state.turn, "Clock → resumed");
        }
        self.state
    }

    /// Flip the pause flag.
    pub fn toggle_pause(&mut self) -> ClockState {
        let paused = !self.state.is_paused;
        self.set_paused(paused)
    }

    /// Reset to `Begin` with the current config.
    pub fn restart(&mut self) -> ClockState {
        let now = self.clock.now_millis();
        self.restart_at(None, now)
    }

    /// Reset to `Begin` with a new config.
    pub fn restart_with(&mut self, config: GameConfig) -> ClockState {
        let now = self.clock.now_millis();
        self.restart_at(Some(config), now)
    }

    /// Reset at `now`, optionally switching config. Legal in any state.
    pub fn restart_at(&mut self, config: Option<GameConfig>, now: u64) -> ClockState {
        if let Some(config) = config {
            self.config = config;
        }
        self.state = ClockState::initial(&self.config, now);
        tracing::info!(config = %self.config, "Clock → reset");
        self.state
    }

    /// Host-level restart gate using the engine clock.
    pub fn request_restart(&mut self) -> RestartOutcome {
        let now = self.clock.now_millis();
        self.request_restart_at(now)
    }

    /// The first request during active, unpaused play only pauses; any request while
    /// paused, ended, or not yet started resets.
    pub fn request_restart_at(&mut self, now: u64) -> RestartOutcome {
        if self.state.is_running() {
            self.set_paused_at(true, now);
            RestartOutcome::Paused
        } else {
            self.restart_at(None, now);
            RestartOutcome::Reset
        }
    }

    fn update(&self, alerts: Vec<AlertKind>) -> ClockUpdate {
        ClockUpdate { state: self.state, alerts }
    }
}
