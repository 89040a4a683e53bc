//! Error types.
//!
//! Refused moves are not failures from the caller's point of view: the public
//! engine entry points hand back the unchanged state. `RuleViolation` exists
//! so the `try_*` entry points and diagnostics can say *why*.

use thiserror::Error;

use super::action::MoveKind;
use super::state::Phase;
use crate::cards::{CardId, CardKind};

/// Why a turn transition or move was refused.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum RuleViolation {
    #[error("expected phase {expected:?}, game is in {actual:?}")]
    WrongPhase { expected: Phase, actual: Phase },
    #[error("no actions remaining this turn")]
    NoActionsRemaining,
    #[error("game is already over")]
    GameOver,
    #[error("{0} is not in the active player's hand")]
    CardNotInHand(CardId),
    #[error("{card} is a {kind:?} card and cannot be played as {play:?}")]
    WrongCardType {
        card: CardId,
        kind: CardKind,
        play: MoveKind,
    },
}

/// Property ledger lookups that found nothing to take.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("no property set at index {0}")]
    NoSuchSet(usize),
    #[error("property set at index {0} is empty")]
    EmptySet(usize),
}

/// Configuration loading failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(&'static str),
}

/// Replication channel and snapshot codec failures.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("snapshot JSON codec: {0}")]
    Json(#[from] serde_json::Error),
    #[error("snapshot binary codec: {0}")]
    Binary(#[from] bincode::Error),
    #[error("replication channel is not open")]
    ChannelClosed,
    #[error("malformed snapshot: {0}")]
    Malformed(String),
    #[error("transport failure: {0}")]
    Transport(String),
}

/// Move-suggestion service failures.
#[derive(Debug, Error)]
pub enum SuggestionError {
    #[error("suggestion service unavailable: {0}")]
    Unavailable(String),
    #[error("suggestion payload is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),
}
