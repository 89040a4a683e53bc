//! Core engine types: players, state, moves, RNG, configuration, errors.
//!
//! This module contains the building blocks every other module works on.
//! The rules that move cards between containers live in `zones`, `effects`
//! and `rules`.

pub mod action;
pub mod config;
pub mod error;
pub mod player;
pub mod rng;
pub mod state;

pub use action::{Move, MoveKind};
pub use config::{GameConfig, GameMode};
pub use error::{ConfigError, LedgerError, RuleViolation, SuggestionError, SyncError};
pub use player::{PlayerId, PlayerMap, SEAT_COUNT};
pub use rng::GameRng;
pub use state::{GameState, MultiplayerRole, Phase, Player, OPENING_LOG};
