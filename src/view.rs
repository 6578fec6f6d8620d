//! Per-player presentation data derived from a snapshot.
//!
//! Hosts render from these instead of re-deriving turn/pause/danger rules themselves.

use crate::alert::AlertPolicy;
use crate::engine::ClockEngine;
use crate::format::format_remaining;
use crate::state::{ClockState, Player, Turn};

/// How a player's half of the clock should look.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Shade {
    /// Not this player's turn.
    Waiting,
    /// This player's turn, but the clock is paused.
    Paused,
    /// This player's turn and remaining time is below the danger threshold.
    Danger,
    /// This player's turn.
    Running,
}

/// What a host needs to draw one player.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlayerView {
    pub player: Player,
    pub remaining_ms: u64,
    /// Formatted remaining time.
    pub display: String,
    /// True for both players before the first move.
    pub is_turn: bool,
    /// Whether a tap on this player's side would be accepted.
    pub can_end_turn: bool,
    pub shade: Shade,
}

impl PlayerView {
    pub fn new(state: &ClockState, policy: &AlertPolicy, player: Player) -> Self {
        let remaining_ms = state.remaining[player];
        let is_turn = state.turn == Turn::Begin || state.turn == player.turn();
        let shade = if !is_turn {
            Shade::Waiting
        } else if state.is_paused {
            Shade::Paused
        } else if policy.in_danger(remaining_ms) {
            Shade::Danger
        } else {
            Shade::Running
        };

        Self {
            player,
            remaining_ms,
            display: format_remaining(remaining_ms),
            is_turn,
            can_end_turn: state.can_end_turn(player),
            shade,
        }
    }
}

impl ClockEngine {
    /// Presentation data for `player` from the current snapshot.
    pub fn view(&self, player: Player) -> PlayerView {
        PlayerView::new(self.snapshot(), self.alert_policy(), player)
    }
}
