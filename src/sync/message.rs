//! Replication wire format.
//!
//! A networked game replicates by whole snapshot: after every local mutation
//! the mutating side sends `{"type": "STATE_UPDATE", "state": {...}}` and the
//! receiver replaces its copy. There is no merge; the last message wins.

use serde::{Deserialize, Serialize};

use crate::core::{GameState, SyncError};

/// Message exchanged over a replication channel.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SyncMessage {
    /// Full snapshot after a mutation.
    StateUpdate { state: GameState },
}

impl SyncMessage {
    /// Wrap a snapshot.
    #[must_use]
    pub fn state_update(state: GameState) -> Self {
        SyncMessage::StateUpdate { state }
    }

    /// The carried snapshot.
    #[must_use]
    pub fn into_state(self) -> GameState {
        match self {
            SyncMessage::StateUpdate { state } => state,
        }
    }

    /// Encode as JSON text.
    pub fn to_json(&self) -> Result<String, SyncError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decode from JSON text.
    pub fn from_json(json: &str) -> Result<Self, SyncError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Encode a snapshot with the compact binary codec.
pub fn encode_snapshot(state: &GameState) -> Result<Vec<u8>, SyncError> {
    Ok(bincode::serialize(state)?)
}

/// Decode a snapshot written by `encode_snapshot`.
pub fn decode_snapshot(bytes: &[u8]) -> Result<GameState, SyncError> {
    Ok(bincode::deserialize(bytes)?)
}
