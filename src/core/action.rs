//! Move representation: a kind plus the card it plays.
//!
//! Every player intent is one of:
//! - "Bank card X" / "Deploy card X as property" / "Play card X as action"
//! - "End turn"
//!
//! The wire names match the move-suggestion contract
//! (`BANK`, `PROPERTY`, `ACTION_PLAY`, `END_TURN`).

use serde::{Deserialize, Serialize};

use crate::cards::CardId;

/// How a card from hand is played.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MoveKind {
    /// Put the card in the bank for its face value.
    Bank,
    /// Lay a property or wildcard into its colour set.
    Property,
    /// Resolve an action card's effect.
    ActionPlay,
}

impl MoveKind {
    /// All kinds, in the order a UI lists them.
    pub const ALL: [MoveKind; 3] = [MoveKind::Bank, MoveKind::Property, MoveKind::ActionPlay];
}

/// A complete player intent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Move {
    /// Play a card from hand.
    Play { kind: MoveKind, card: CardId },
    /// Hand the turn to the other player.
    EndTurn,
}

impl Move {
    /// Shorthand for a play move.
    #[must_use]
    pub const fn play(kind: MoveKind, card: CardId) -> Self {
        Move::Play { kind, card }
    }

    /// The card this move references, if any.
    #[must_use]
    pub fn card(&self) -> Option<CardId> {
        match self {
            Move::Play { card, .. } => Some(*card),
            Move::EndTurn => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_kind_wire_names() {
        assert_eq!(serde_json::to_string(&MoveKind::Bank).unwrap(), "\"BANK\"");
        assert_eq!(serde_json::to_string(&MoveKind::Property).unwrap(), "\"PROPERTY\"");
        assert_eq!(serde_json::to_string(&MoveKind::ActionPlay).unwrap(), "\"ACTION_PLAY\"");
    }

    #[test]
    fn test_move_card() {
        assert_eq!(Move::play(MoveKind::Bank, CardId::new(4)).card(), Some(CardId::new(4)));
        assert_eq!(Move::EndTurn.card(), None);
    }
}
