//! Players, turns, and the clock snapshot.

use crate::config::GameConfig;
use std::fmt;
use std::ops::{Index, IndexMut};

/// One of the two fixed seats. Never renumbered during a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Player {
    Top,
    Bottom,
}

impl Player {
    pub const BOTH: [Player; 2] = [Player::Top, Player::Bottom];

    pub fn opponent(self) -> Player {
        match self {
            Player::Top => Player::Bottom,
            Player::Bottom => Player::Top,
        }
    }

    /// The turn in which this player's timer runs.
    pub fn turn(self) -> Turn {
        match self {
            Player::Top => Turn::Top,
            Player::Bottom => Turn::Bottom,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Player::Top => f.pad("top"),
            Player::Bottom => f.pad("bottom"),
        }
    }
}

/// Whose timer may run, or a sentinel for "not started" and "game over".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Turn {
    /// Configured, no move made yet. Either player may open.
    Begin,
    Top,
    Bottom,
    /// A timer reached zero. Terminal until restart.
    End,
}

impl Turn {
    /// The player whose timer is running, if any.
    pub fn player(self) -> Option<Player> {
        match self {
            Turn::Top => Some(Player::Top),
            Turn::Bottom => Some(Player::Bottom),
            Turn::Begin | Turn::End => None,
        }
    }

    /// True for `Top` and `Bottom`.
    pub fn is_in_play(self) -> bool {
        self.player().is_some()
    }

    /// Whether `player` may end the turn, ignoring pause.
    pub fn may_move(self, player: Player) -> bool {
        self == Turn::Begin || self == player.turn()
    }
}

impl fmt::Display for Turn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Turn::Begin => "begin",
            Turn::Top => "top",
            Turn::Bottom => "bottom",
            Turn::End => "end",
        };
        f.write_str(name)
    }
}

/// Remaining milliseconds per player. Never negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RemainingTime {
    pub top: u64,
    pub bottom: u64,
}

impl RemainingTime {
    pub fn uniform(ms: u64) -> Self {
        Self { top: ms, bottom: ms }
    }

    pub fn get(&self, player: Player) -> u64 {
        self[player]
    }
}

impl Index<Player> for RemainingTime {
    type Output = u64;

    fn index(&self, player: Player) -> &u64 {
        match player {
            Player::Top => &self.top,
            Player::Bottom => &self.bottom,
        }
    }
}

impl IndexMut<Player> for RemainingTime {
    fn index_mut(&mut self, player: Player) -> &mut u64 {
        match player {
            Player::Top => &mut self.top,
            Player::Bottom => &mut self.bottom,
        }
    }
}

/// Full clock snapshot. Only [`ClockEngine`](crate::ClockEngine) mutates it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClockState {
    pub turn: Turn,
    pub remaining: RemainingTime,
    pub is_paused: bool,
    /// Timestamp (ms) of the last tick or countdown rebase.
    pub last_tick_at: u64,
    /// Who ran out of time. Set together with `Turn::End`.
    pub expired: Option<Player>,
}

impl ClockState {
    /// Fresh state for a new game: `Begin`, unpaused, both timers at the initial time.
    pub fn initial(config: &GameConfig, now: u64) -> Self {
        Self {
            turn: Turn::Begin,
            remaining: RemainingTime::uniform(config.initial_time_ms()),
            is_paused: false,
            last_tick_at: now,
            expired: None,
        }
    }

    /// A timer is counting down right now.
    pub fn is_running(&self) -> bool {
        self.turn.is_in_play() && !self.is_paused
    }

    pub fn is_over(&self) -> bool {
        self.turn == Turn::End
    }

    /// Whether `player` may end their turn now.
    pub fn can_end_turn(&self, player: Player) -> bool {
        !self.is_paused && self.turn.may_move(player)
    }

    /// The player who ran out of time, once the game is over.
    pub fn flagged(&self) -> Option<Player> {
        self.expired
    }
}
