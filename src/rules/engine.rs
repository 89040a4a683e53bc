//! Turn and action state machine.
//!
//! Phases run `StartTurn → PlayPhase → StartTurn` (next player) with
//! `GameOver` reachable from `PlayPhase` whenever a move completes the
//! winning set count.
//!
//! Every entry point takes the current `GameState` by reference and returns
//! the next one. A refused call returns a clone of its input, which is O(1)
//! with persistent containers and compares equal to it: nothing is ever half
//! applied. The `try_*` variants report the reason instead.

use tracing::{debug, info};

use crate::cards::{CardCatalog, CardId};
use crate::core::{GameConfig, GameMode, GameRng, GameState, Move, MoveKind, Phase, PlayerId, RuleViolation};
use crate::effects::resolve_action;
use crate::zones;

/// Result of a finished game.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameResult {
    /// Single winner.
    Winner(PlayerId),
}

impl GameResult {
    /// Check if a seat won.
    #[must_use]
    pub fn is_winner(&self, player: PlayerId) -> bool {
        match self {
            GameResult::Winner(p) => *p == player,
        }
    }
}

/// Rules engine trait.
///
/// The seam the session and the AI driver program against.
pub trait RulesEngine {
    /// Get the game configuration.
    fn config(&self) -> &GameConfig;

    /// Every move the active player could make right now.
    ///
    /// Empty outside `PlayPhase`.
    fn legal_moves(&self, state: &GameState) -> Vec<Move>;

    /// Apply a move, producing the next state.
    fn apply_move(&self, state: &GameState, mv: &Move) -> Result<GameState, RuleViolation>;

    /// Check if the game is over.
    ///
    /// Returns `Some(result)` if the game has ended, `None` if it continues.
    fn is_terminal(&self, state: &GameState) -> Option<GameResult>;
}

/// The property-trading rules.
#[derive(Clone, Debug)]
pub struct DealRules {
    config: GameConfig,
    catalog: CardCatalog,
}

impl Default for DealRules {
    fn default() -> Self {
        Self::new(GameConfig::default())
    }
}

impl DealRules {
    /// Rules over the standard deck.
    #[must_use]
    pub fn new(config: GameConfig) -> Self {
        Self::with_catalog(config, CardCatalog::standard())
    }

    /// Rules over a custom deck.
    #[must_use]
    pub fn with_catalog(config: GameConfig, catalog: CardCatalog) -> Self {
        Self { config, catalog }
    }

    /// The deck games are dealt from.
    #[must_use]
    pub fn catalog(&self) -> &CardCatalog {
        &self.catalog
    }

    /// Shuffle and deal a new game.
    #[must_use]
    pub fn new_game(&self, mode: GameMode, rng: &mut GameRng) -> GameState {
        let state = GameState::new_game(&self.config, mode, &self.catalog, rng);
        info!(?mode, seed = rng.seed(), deck = state.deck.len(), "game dealt");
        state
    }

    // === Turn Transitions ===

    /// Draw for the active player and open the play phase.
    ///
    /// Five cards from an empty hand, otherwise two. No-op outside `StartTurn`.
    #[must_use]
    pub fn start_turn(&self, state: &GameState) -> GameState {
        self.try_start_turn(state).unwrap_or_else(|why| refused(state, &why))
    }

    /// `start_turn`, reporting why it was refused.
    pub fn try_start_turn(&self, state: &GameState) -> Result<GameState, RuleViolation> {
        if state.is_over() {
            return Err(RuleViolation::GameOver);
        }
        expect_phase(state, Phase::StartTurn)?;

        let mut next = state.clone();
        let seat = next.active_player;
        let count = if next.players[seat].hand.is_empty() {
            self.config.empty_hand_draw
        } else {
            self.config.turn_draw
        };
        let drawn = next.draw(seat, count).len();

        next.actions_remaining = self.config.actions_per_turn;
        next.phase = Phase::PlayPhase;
        let name = &next.players[seat].name;
        let line = format!("{name} draws {drawn} cards.");
        next.push_log(line);

        debug!(%seat, drawn, deck = next.deck.len(), "turn started");
        Ok(next)
    }

    /// Hand the turn to the other player. No-op outside `PlayPhase`.
    #[must_use]
    pub fn end_turn(&self, state: &GameState) -> GameState {
        self.try_end_turn(state).unwrap_or_else(|why| refused(state, &why))
    }

    /// `end_turn`, reporting why it was refused.
    pub fn try_end_turn(&self, state: &GameState) -> Result<GameState, RuleViolation> {
        expect_phase(state, Phase::PlayPhase)?;

        let mut next = state.clone();
        next.active_player = state.active_player.opponent();
        next.actions_remaining = self.config.actions_per_turn;
        next.phase = Phase::StartTurn;
        let line = format!("Turn change: {}'s turn.", next.active().name);
        next.push_log(line);

        info!(seat = %next.active_player, "turn change");
        Ok(next)
    }

    // === Moves ===

    /// Check whether a move is legal without applying it.
    pub fn check_move(&self, state: &GameState, kind: MoveKind, card: CardId) -> Result<(), RuleViolation> {
        if state.is_over() {
            return Err(RuleViolation::GameOver);
        }
        expect_phase(state, Phase::PlayPhase)?;
        if state.actions_remaining == 0 {
            return Err(RuleViolation::NoActionsRemaining);
        }

        let player = state.active();
        let held = player
            .hand
            .iter()
            .find(|c| c.id == card)
            .ok_or(RuleViolation::CardNotInHand(card))?;

        let fits = match kind {
            MoveKind::Bank | MoveKind::ActionPlay => true,
            MoveKind::Property => held.kind.is_placeable(),
        };
        if !fits {
            return Err(RuleViolation::WrongCardType {
                card,
                kind: held.kind,
                play: kind,
            });
        }
        Ok(())
    }

    /// Play a card from the active player's hand.
    ///
    /// Illegal moves (wrong phase, no actions left, card not in hand, wrong
    /// card type, game over) return the state unchanged.
    #[must_use]
    pub fn execute_move(&self, state: &GameState, kind: MoveKind, card: CardId) -> GameState {
        self.try_execute_move(state, kind, card)
            .unwrap_or_else(|why| refused(state, &why))
    }

    /// `execute_move`, reporting why it was refused.
    pub fn try_execute_move(&self, state: &GameState, kind: MoveKind, card: CardId) -> Result<GameState, RuleViolation> {
        self.check_move(state, kind, card)?;

        let mut next = state.clone();
        let seat = next.active_player;
        let played = next.players[seat]
            .take_from_hand(card)
            .ok_or(RuleViolation::CardNotInHand(card))?;

        match kind {
            MoveKind::Bank => {
                let player = &mut next.players[seat];
                let line = format!("{} banked {} ({}M).", player.name, played.name, played.value);
                player.bank.push_back(played);
                next.push_log(line);
            }
            MoveKind::Property => {
                let player = &mut next.players[seat];
                let line = format!("{} deployed {}.", player.name, played.name);
                zones::add_to_set(player, played);
                next.push_log(line);
            }
            MoveKind::ActionPlay => {
                resolve_action(&mut next, played);
            }
        }

        next.actions_remaining -= 1;
        self.check_win(&mut next);

        debug!(%seat, ?kind, %card, actions_left = next.actions_remaining, "move applied");
        Ok(next)
    }

    /// Declare the active player the winner if they hold enough complete
    /// sets. Returns whether they won.
    pub fn check_win(&self, state: &mut GameState) -> bool {
        let player = state.active();
        let sets = player.complete_sets();
        if sets < self.config.sets_to_win {
            return false;
        }

        let name = player.name.clone();
        info!(winner = %name, sets, "game over");
        state.push_log(format!("{name} wins with {sets} complete sets!"));
        state.winner = Some(name);
        state.phase = Phase::GameOver;
        true
    }
}

impl RulesEngine for DealRules {
    fn config(&self) -> &GameConfig {
        &self.config
    }

    fn legal_moves(&self, state: &GameState) -> Vec<Move> {
        if state.is_over() || state.phase != Phase::PlayPhase {
            return vec![];
        }

        let mut moves = Vec::new();
        if state.actions_remaining > 0 {
            for card in state.active().hand.iter() {
                for kind in MoveKind::ALL {
                    if self.check_move(state, kind, card.id).is_ok() {
                        moves.push(Move::play(kind, card.id));
                    }
                }
            }
        }
        moves.push(Move::EndTurn);
        moves
    }

    fn apply_move(&self, state: &GameState, mv: &Move) -> Result<GameState, RuleViolation> {
        match *mv {
            Move::Play { kind, card } => self.try_execute_move(state, kind, card),
            Move::EndTurn => self.try_end_turn(state),
        }
    }

    fn is_terminal(&self, state: &GameState) -> Option<GameResult> {
        // The winner is always the player whose move ended the game
        state.winner.as_ref().map(|_| GameResult::Winner(state.active_player))
    }
}

fn expect_phase(state: &GameState, expected: Phase) -> Result<(), RuleViolation> {
    if state.phase == expected {
        Ok(())
    } else {
        Err(RuleViolation::WrongPhase {
            expected,
            actual: state.phase,
        })
    }
}

fn refused(state: &GameState, why: &RuleViolation) -> GameState {
    debug!(reason = %why, "ignored");
    state.clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{ActionKind, Card, PropertyColor};

    fn playing(hand: Vec<Card>) -> GameState {
        let rules = DealRules::default();
        let deck = (500..520).map(|i| Card::money(CardId::new(i), 1)).collect();
        let mut state = GameState::deal(&rules.config, GameMode::LocalTwoPlayer, deck);
        state.players[PlayerId::FIRST].hand = hand.into_iter().collect();
        rules.start_turn(&state)
    }

    #[test]
    fn test_game_result_is_winner() {
        let result = GameResult::Winner(PlayerId::SECOND);
        assert!(!result.is_winner(PlayerId::FIRST));
        assert!(result.is_winner(PlayerId::SECOND));
    }

    #[test]
    fn test_check_move_reasons() {
        let rules = DealRules::default();
        let state = playing(vec![Card::money(CardId::new(1), 1)]);

        assert_eq!(
            rules.check_move(&state, MoveKind::Property, CardId::new(1)),
            Err(RuleViolation::WrongCardType {
                card: CardId::new(1),
                kind: crate::cards::CardKind::Money,
                play: MoveKind::Property,
            })
        );
        assert_eq!(
            rules.check_move(&state, MoveKind::Bank, CardId::new(2)),
            Err(RuleViolation::CardNotInHand(CardId::new(2)))
        );
        assert_eq!(rules.check_move(&state, MoveKind::Bank, CardId::new(1)), Ok(()));
    }

    #[test]
    fn test_legal_moves_per_card_kind() {
        let rules = DealRules::default();
        let state = playing(vec![
            Card::money(CardId::new(1), 1),
            Card::property(CardId::new(2), "Whitehall", PropertyColor::Pink, 2),
            Card::action(CardId::new(3), ActionKind::PassGo),
        ]);

        let moves = rules.legal_moves(&state);

        assert!(moves.contains(&Move::play(MoveKind::Bank, CardId::new(1))));
        assert!(!moves.contains(&Move::play(MoveKind::Property, CardId::new(1))));
        assert!(moves.contains(&Move::play(MoveKind::Property, CardId::new(2))));
        assert!(moves.contains(&Move::play(MoveKind::ActionPlay, CardId::new(3))));
        assert!(moves.contains(&Move::play(MoveKind::ActionPlay, CardId::new(1))));
        assert!(moves.contains(&Move::play(MoveKind::ActionPlay, CardId::new(2))));
        assert_eq!(moves.last(), Some(&Move::EndTurn));
        // Five cards (two drawn at turn start), each bankable and playable as an
        // action, one property, end turn
        assert_eq!(moves.len(), 12);
    }

    #[test]
    fn test_legal_moves_outside_play_phase() {
        let rules = DealRules::default();
        let deck = (0..20).map(|i| Card::money(CardId::new(i), 1)).collect();
        let state = GameState::deal(rules.config(), GameMode::LocalTwoPlayer, deck);
        assert!(rules.legal_moves(&state).is_empty());
    }

    #[test]
    fn test_apply_move_end_turn() {
        let rules = DealRules::default();
        let state = playing(vec![]);
        let next = rules.apply_move(&state, &Move::EndTurn).unwrap();
        assert_eq!(next.active_player, PlayerId::SECOND);
        assert_eq!(next.phase, Phase::StartTurn);
    }
}
