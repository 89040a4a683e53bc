//! # property-deal
//!
//! Rules engine for a two-player property-trading card game: bank money,
//! lay properties into colour sets, play action cards that draw, collect
//! debts or steal, and win by completing three sets.
//!
//! ## Design Principles
//!
//! 1. **Values, not mutation**: every engine entry point takes a
//!    `&GameState` and returns the next one. A refused move returns the
//!    input unchanged.
//!
//! 2. **Persistent Data Structures**: O(1) state clones via `im`, so
//!    deriving the next state never disturbs the previous one.
//!
//! 3. **Untrusted Inputs**: AI suggestions and replicated snapshots are
//!    validated before they touch the game.
//!
//! ## Modules
//!
//! - `core`: Seats, state, moves, RNG, configuration, errors
//! - `cards`: Card definitions and the standard catalog
//! - `zones`: Property ledger (colour sets)
//! - `effects`: Debt settlement and action resolution
//! - `rules`: Turn state machine and the `RulesEngine` trait
//! - `ai`: Move suggestions and the AI turn driver
//! - `sync`: Snapshot replication for networked play
//! - `session`: Caller-owned game session tying it together

pub mod core;
pub mod cards;
pub mod zones;
pub mod effects;
pub mod rules;
pub mod ai;
pub mod sync;
pub mod session;

// Re-export commonly used types
pub use crate::core::{
    PlayerId, PlayerMap,
    GameRng,
    GameConfig, GameMode,
    Move, MoveKind,
    GameState, MultiplayerRole, Phase, Player,
    RuleViolation, SyncError, SuggestionError,
};

pub use crate::cards::{ActionKind, Card, CardCatalog, CardId, CardKind, PropertyColor};

pub use crate::zones::PropertySet;

pub use crate::effects::{settle_debt, resolve_action, Settlement, ResolveResult};

pub use crate::rules::{DealRules, GameResult, RulesEngine};

pub use crate::ai::{run_ai_turn, AiTurn, GreedySuggester, MoveSuggester, SuggestedMove};

pub use crate::sync::{ChannelEvent, ReplicationAdapter, ReplicationChannel, SyncMessage};

pub use crate::session::Session;
