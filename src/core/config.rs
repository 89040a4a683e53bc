//! Game configuration types.
//!
//! A table is configured at startup by providing:
//! - `GameConfig`: turn structure numbers and session pacing
//! - `GameMode`: who sits at the table (local, vs AI, networked)
//!
//! Defaults reproduce the standard rules: three actions per turn, five card
//! opening hands, three complete sets to win.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::error::ConfigError;
use super::state::MultiplayerRole;

/// Rule and pacing configuration.
///
/// ## Example
///
/// ```
/// use property_deal::core::GameConfig;
///
/// let config = GameConfig::default()
///     .with_actions_per_turn(2)
///     .with_sets_to_win(4);
///
/// assert_eq!(config.actions_per_turn, 2);
/// assert_eq!(config.turn_draw, 2);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Moves a player may make per turn.
    pub actions_per_turn: u8,

    /// Cards dealt to each player at game start.
    pub opening_hand: usize,

    /// Cards drawn at turn start when the hand is empty.
    pub empty_hand_draw: usize,

    /// Cards drawn at turn start otherwise.
    pub turn_draw: usize,

    /// Complete property sets needed to win.
    pub sets_to_win: usize,

    /// Delay before a new turn draws automatically, in milliseconds.
    pub auto_draw_delay_ms: u64,

    /// Pause between applied AI moves, in milliseconds.
    pub ai_move_delay_ms: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            actions_per_turn: 3,
            opening_hand: 5,
            empty_hand_draw: 5,
            turn_draw: 2,
            sets_to_win: 3,
            auto_draw_delay_ms: 800,
            ai_move_delay_ms: 1500,
        }
    }
}

impl GameConfig {
    /// Create the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations under which no game could progress.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.actions_per_turn == 0 {
            return Err(ConfigError::Invalid("actions_per_turn must be at least 1"));
        }
        if self.sets_to_win == 0 {
            return Err(ConfigError::Invalid("sets_to_win must be at least 1"));
        }
        if self.empty_hand_draw == 0 {
            return Err(ConfigError::Invalid("empty_hand_draw must be at least 1"));
        }
        Ok(())
    }

    /// Set moves per turn.
    #[must_use]
    pub fn with_actions_per_turn(mut self, actions: u8) -> Self {
        self.actions_per_turn = actions;
        self
    }

    /// Set the opening hand size.
    #[must_use]
    pub fn with_opening_hand(mut self, cards: usize) -> Self {
        self.opening_hand = cards;
        self
    }

    /// Set turn-start draw counts (empty hand, otherwise).
    #[must_use]
    pub fn with_draws(mut self, empty_hand: usize, regular: usize) -> Self {
        self.empty_hand_draw = empty_hand;
        self.turn_draw = regular;
        self
    }

    /// Set the number of complete sets that wins.
    #[must_use]
    pub fn with_sets_to_win(mut self, sets: usize) -> Self {
        self.sets_to_win = sets;
        self
    }

    /// Set both session delays.
    #[must_use]
    pub fn with_delays(mut self, auto_draw: Duration, ai_move: Duration) -> Self {
        self.auto_draw_delay_ms = auto_draw.as_millis() as u64;
        self.ai_move_delay_ms = ai_move.as_millis() as u64;
        self
    }

    /// Delay before the automatic turn-start draw.
    #[must_use]
    pub fn auto_draw_delay(&self) -> Duration {
        Duration::from_millis(self.auto_draw_delay_ms)
    }

    /// Pause between applied AI moves.
    #[must_use]
    pub fn ai_move_delay(&self) -> Duration {
        Duration::from_millis(self.ai_move_delay_ms)
    }
}

/// Who is playing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameMode {
    /// Human in seat 0 against the scripted AI in seat 1.
    VsAi,
    /// Pass-and-play on one device.
    LocalTwoPlayer,
    /// Peer-to-peer game; the role says which seat is ours.
    Networked(MultiplayerRole),
}

impl GameMode {
    /// Display names for seat 0 and seat 1.
    #[must_use]
    pub fn player_names(self) -> (&'static str, &'static str) {
        match self {
            GameMode::VsAi => ("Player 1", "Computer"),
            GameMode::LocalTwoPlayer => ("Player 1", "Player 2"),
            GameMode::Networked(_) => ("Host", "Guest"),
        }
    }

    /// Whether seat 1 is driven by the AI.
    #[must_use]
    pub fn second_seat_is_ai(self) -> bool {
        matches!(self, GameMode::VsAi)
    }

    /// The replication role, if networked.
    #[must_use]
    pub fn role(self) -> Option<MultiplayerRole> {
        match self {
            GameMode::Networked(role) => Some(role),
            _ => None,
        }
    }
}
