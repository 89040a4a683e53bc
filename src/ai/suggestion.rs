//! Move suggestions: the contract with whatever picks the AI's moves.
//!
//! A suggester looks at a snapshot and returns an ordered batch of moves in
//! the wire shape `{"action": "BANK", "cardId": "card-12"}` or
//! `{"action": "END_TURN"}`. Suggestions are untrusted: the driver
//! re-validates every one against the live state before applying it.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cards::{ActionEffect, CardId, CardKind};
use crate::core::{GameState, Move, MoveKind, SuggestionError};
use crate::rules::RulesEngine;
use crate::zones;

/// Card reference as a suggester sent it: the display form or a bare number.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawCardId {
    Text(String),
    Number(u64),
}

impl RawCardId {
    /// Parse into a card id, if it is one.
    #[must_use]
    pub fn parse(&self) -> Option<CardId> {
        match self {
            RawCardId::Text(text) => text.parse().ok(),
            RawCardId::Number(n) => u32::try_from(*n).ok().map(CardId::new),
        }
    }
}

/// One suggested move, exactly as received.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestedMove {
    /// `BANK`, `PROPERTY`, `ACTION_PLAY` or `END_TURN`.
    pub action: String,

    /// Card to play, for play moves.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card_id: Option<RawCardId>,
}

/// What a suggested move means, once read.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Suggestion {
    /// Stop playing and end the turn.
    EndTurn,
    /// Play a card.
    Play(MoveKind, CardId),
    /// Unknown action or unusable card reference.
    Unreadable,
}

impl SuggestedMove {
    /// An end-turn suggestion.
    #[must_use]
    pub fn end_turn() -> Self {
        Self {
            action: "END_TURN".to_string(),
            card_id: None,
        }
    }

    /// A play suggestion.
    #[must_use]
    pub fn play(kind: MoveKind, card: CardId) -> Self {
        let action = match kind {
            MoveKind::Bank => "BANK",
            MoveKind::Property => "PROPERTY",
            MoveKind::ActionPlay => "ACTION_PLAY",
        };
        Self {
            action: action.to_string(),
            card_id: Some(RawCardId::Text(card.to_string())),
        }
    }

    /// The suggestion for an engine move.
    #[must_use]
    pub fn from_move(mv: &Move) -> Self {
        match *mv {
            Move::Play { kind, card } => Self::play(kind, card),
            Move::EndTurn => Self::end_turn(),
        }
    }

    /// Read the suggestion.
    #[must_use]
    pub fn interpret(&self) -> Suggestion {
        let kind = match self.action.trim().to_ascii_uppercase().as_str() {
            "END_TURN" => return Suggestion::EndTurn,
            "BANK" => MoveKind::Bank,
            "PROPERTY" => MoveKind::Property,
            "ACTION_PLAY" => MoveKind::ActionPlay,
            _ => return Suggestion::Unreadable,
        };
        match self.card_id.as_ref().and_then(RawCardId::parse) {
            Some(card) => Suggestion::Play(kind, card),
            None => Suggestion::Unreadable,
        }
    }
}

/// Parse a suggestion batch from JSON.
///
/// The payload must be an array. Elements that are not move objects are
/// dropped here; elements with unknown actions survive and are skipped by
/// the driver.
pub fn parse_suggestions(json: &str) -> Result<Vec<SuggestedMove>, SuggestionError> {
    let raw: Vec<serde_json::Value> = serde_json::from_str(json)?;
    let total = raw.len();
    let moves: Vec<SuggestedMove> = raw
        .into_iter()
        .filter_map(|value| serde_json::from_value(value).ok())
        .collect();
    if moves.len() < total {
        debug!(dropped = total - moves.len(), "dropped malformed suggestions");
    }
    Ok(moves)
}

/// Source of AI move batches.
pub trait MoveSuggester {
    /// Suggest an ordered batch of moves for the active player.
    fn suggest(&mut self, state: &GameState) -> Result<Vec<SuggestedMove>, SuggestionError>;
}

impl<F> MoveSuggester for F
where
    F: FnMut(&GameState) -> Result<Vec<SuggestedMove>, SuggestionError>,
{
    fn suggest(&mut self, state: &GameState) -> Result<Vec<SuggestedMove>, SuggestionError> {
        self(state)
    }
}

/// Built-in suggester that plays by simple priorities.
///
/// Plans a whole turn against a scratch copy of the state:
/// 1. a property that completes a set
/// 2. any other property
/// 3. an action card with an effect worth playing
/// 4. the most valuable money card to the bank
///
/// then ends the turn.
#[derive(Clone, Debug)]
pub struct GreedySuggester<R> {
    rules: R,
}

impl<R: RulesEngine> GreedySuggester<R> {
    /// Create a suggester over a rules engine.
    pub fn new(rules: R) -> Self {
        Self { rules }
    }

    fn score(&self, state: &GameState, mv: &Move) -> Option<u32> {
        let Move::Play { kind, card } = *mv else {
            return None;
        };
        let player = state.active();
        let held = player.hand.iter().find(|c| c.id == card)?;
        match kind {
            MoveKind::Property => {
                let color = held.set_color();
                let count = player
                    .properties
                    .iter()
                    .find(|s| s.color() == color)
                    .map_or(0, |s| s.len());
                Some(if color.completes_with(count + 1) { 400 } else { 300 })
            }
            MoveKind::ActionPlay => {
                let effect = held.action.map_or(ActionEffect::Inert, |a| a.effect());
                let opponent = state.opponent();
                match effect {
                    ActionEffect::StealProperty if zones::first_incomplete_set(opponent).is_some() => Some(250),
                    ActionEffect::Collect(_) if opponent.bank_total() + opponent.property_total() > 0 => {
                        Some(240)
                    }
                    ActionEffect::Draw(_) if !state.deck.is_empty() => Some(230),
                    _ => None,
                }
            }
            MoveKind::Bank if held.kind == CardKind::Money => Some(100 + held.value),
            MoveKind::Bank => None,
        }
    }
}

impl<R: RulesEngine> MoveSuggester for GreedySuggester<R> {
    fn suggest(&mut self, state: &GameState) -> Result<Vec<SuggestedMove>, SuggestionError> {
        let mut scratch = state.clone();
        let mut batch = Vec::new();

        while scratch.actions_remaining > 0 && !scratch.is_over() {
            let best = self
                .rules
                .legal_moves(&scratch)
                .into_iter()
                .filter_map(|mv| self.score(&scratch, &mv).map(|s| (s, mv)))
                .max_by_key(|(s, _)| *s);

            let Some((_, mv)) = best else {
                break;
            };
            match self.rules.apply_move(&scratch, &mv) {
                Ok(next) => {
                    batch.push(SuggestedMove::from_move(&mv));
                    scratch = next;
                }
                Err(_) => break,
            }
        }

        batch.push(SuggestedMove::end_turn());
        Ok(batch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interpret_wire_forms() {
        let moves = parse_suggestions(
            r#"[
                {"action": "BANK", "cardId": "card-3"},
                {"action": "PROPERTY", "cardId": "17"},
                {"action": "ACTION_PLAY", "cardId": 4},
                {"action": "END_TURN"}
            ]"#,
        )
        .unwrap();

        let read: Vec<_> = moves.iter().map(SuggestedMove::interpret).collect();
        assert_eq!(
            read,
            vec![
                Suggestion::Play(MoveKind::Bank, CardId::new(3)),
                Suggestion::Play(MoveKind::Property, CardId::new(17)),
                Suggestion::Play(MoveKind::ActionPlay, CardId::new(4)),
                Suggestion::EndTurn,
            ]
        );
    }

    #[test]
    fn test_interpret_garbage() {
        let moves = parse_suggestions(
            r#"[
                {"action": "STEAL_EVERYTHING", "cardId": "card-1"},
                {"action": "BANK"},
                {"action": "BANK", "cardId": "the red one"},
                {"cardId": "card-1"},
                42
            ]"#,
        )
        .unwrap();

        // The last two are not move objects at all
        assert_eq!(moves.len(), 3);
        assert!(moves.iter().all(|m| m.interpret() == Suggestion::Unreadable));
    }

    #[test]
    fn test_parse_rejects_non_array() {
        assert!(matches!(
            parse_suggestions(r#"{"action": "END_TURN"}"#),
            Err(SuggestionError::Malformed(_))
        ));
    }

    #[test]
    fn test_round_trip_from_move() {
        let mv = Move::play(MoveKind::ActionPlay, CardId::new(9));
        let suggested = SuggestedMove::from_move(&mv);
        assert_eq!(suggested.interpret(), Suggestion::Play(MoveKind::ActionPlay, CardId::new(9)));

        let json = serde_json::to_string(&suggested).unwrap();
        assert_eq!(json, r#"{"action":"ACTION_PLAY","cardId":"card-9"}"#);
    }
}
