//! AI turn driver.
//!
//! An `AiTurn` holds one batch of suggestions and feeds them to the engine
//! one at a time. Each `step` looks at the live state it is given, so the
//! effects of earlier moves in the batch are visible to later checks. The
//! batch stops early when actions run out, the game is won, or the
//! suggester asks to end the turn.
//!
//! A caller may abandon the turn between steps; `finish` always ends the
//! AI's turn, whether the batch ran dry, stopped early or never arrived.

use std::collections::VecDeque;
use std::time::Duration;

use tracing::{debug, warn};

use super::suggestion::{MoveSuggester, SuggestedMove, Suggestion};
use crate::core::{GameState, Move, PlayerId};
use crate::rules::RulesEngine;

/// Cooperative pause between applied AI moves.
pub trait Pacer {
    /// Wait for `delay`.
    fn pause(&mut self, delay: Duration);
}

/// Blocks the calling thread.
#[derive(Clone, Copy, Debug, Default)]
pub struct ThreadPacer;

impl Pacer for ThreadPacer {
    fn pause(&mut self, delay: Duration) {
        std::thread::sleep(delay);
    }
}

/// Never waits.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoPause;

impl Pacer for NoPause {
    fn pause(&mut self, _delay: Duration) {}
}

/// Why a batch stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StopReason {
    /// Every suggestion was consumed.
    BatchExhausted,
    /// No actions left this turn.
    NoActions,
    /// Someone has won.
    GameOver,
    /// The suggester asked to end the turn.
    EndTurnRequested,
    /// It is no longer the AI's turn.
    NotOurTurn,
}

/// Outcome of one step.
#[derive(Clone, Debug, PartialEq)]
pub enum AiStep {
    /// A suggestion was applied, giving this state.
    Applied { state: GameState, mv: Move },
    /// A suggestion was stale or unreadable and ignored.
    Skipped(SuggestedMove),
    /// The batch is over.
    Done(StopReason),
}

/// One AI turn's worth of suggestions.
#[derive(Clone, Debug)]
pub struct AiTurn {
    seat: PlayerId,
    pending: VecDeque<SuggestedMove>,
    applied: usize,
    stopped: Option<StopReason>,
}

impl AiTurn {
    /// Ask the suggester for a batch. A failing suggester yields an empty
    /// batch, so the turn still ends normally.
    pub fn plan<S: MoveSuggester + ?Sized>(suggester: &mut S, state: &GameState) -> Self {
        let batch = match suggester.suggest(state) {
            Ok(batch) => batch,
            Err(err) => {
                warn!(error = %err, "move suggestion failed, ending turn");
                Vec::new()
            }
        };
        Self::from_batch(state.active_player, batch)
    }

    /// A turn for `seat` from an already fetched batch.
    #[must_use]
    pub fn from_batch(seat: PlayerId, batch: Vec<SuggestedMove>) -> Self {
        Self {
            seat,
            pending: batch.into(),
            applied: 0,
            stopped: None,
        }
    }

    /// The seat this turn plays for.
    #[must_use]
    pub fn seat(&self) -> PlayerId {
        self.seat
    }

    /// Moves applied so far.
    #[must_use]
    pub fn applied(&self) -> usize {
        self.applied
    }

    /// Suggestions not yet looked at.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.pending.len()
    }

    /// Take the next suggestion and apply it to `live` if it still holds.
    pub fn step<R: RulesEngine + ?Sized>(&mut self, rules: &R, live: &GameState) -> AiStep {
        if let Some(reason) = self.stopped {
            return AiStep::Done(reason);
        }
        if let Some(reason) = self.blocked(live) {
            return self.stop(reason);
        }
        let Some(suggested) = self.pending.pop_front() else {
            return self.stop(StopReason::BatchExhausted);
        };

        let (kind, card) = match suggested.interpret() {
            Suggestion::EndTurn => return self.stop(StopReason::EndTurnRequested),
            Suggestion::Unreadable => {
                debug!(?suggested, "unreadable suggestion skipped");
                return AiStep::Skipped(suggested);
            }
            Suggestion::Play(kind, card) => (kind, card),
        };

        if !live.players[self.seat].has_in_hand(card) {
            debug!(%card, "stale suggestion skipped");
            return AiStep::Skipped(suggested);
        }

        let mv = Move::play(kind, card);
        match rules.apply_move(live, &mv) {
            Ok(state) => {
                self.applied += 1;
                AiStep::Applied { state, mv }
            }
            Err(why) => {
                debug!(%card, reason = %why, "illegal suggestion skipped");
                AiStep::Skipped(suggested)
            }
        }
    }

    /// End the AI's turn on `live`. Leaves a finished game untouched.
    pub fn finish<R: RulesEngine + ?Sized>(self, rules: &R, live: &GameState) -> GameState {
        debug!(seat = %self.seat, applied = self.applied, skipped_tail = self.pending.len(), "ai turn finished");
        if live.active_player != self.seat {
            return live.clone();
        }
        rules.apply_move(live, &Move::EndTurn).unwrap_or_else(|_| live.clone())
    }

    fn blocked(&self, live: &GameState) -> Option<StopReason> {
        if live.is_over() {
            Some(StopReason::GameOver)
        } else if live.active_player != self.seat {
            Some(StopReason::NotOurTurn)
        } else if live.actions_remaining == 0 {
            Some(StopReason::NoActions)
        } else {
            None
        }
    }

    fn stop(&mut self, reason: StopReason) -> AiStep {
        self.stopped = Some(reason);
        AiStep::Done(reason)
    }
}

/// Play a whole AI turn: one suggestion round, validated moves with a pause
/// after each, then end the turn.
pub fn run_ai_turn<R, S, P>(rules: &R, state: &GameState, suggester: &mut S, pacer: &mut P) -> GameState
where
    R: RulesEngine + ?Sized,
    S: MoveSuggester + ?Sized,
    P: Pacer + ?Sized,
{
    let delay = rules.config().ai_move_delay();
    let mut turn = AiTurn::plan(suggester, state);
    let mut live = state.clone();

    loop {
        match turn.step(rules, &live) {
            AiStep::Applied { state, .. } => {
                live = state;
                pacer.pause(delay);
            }
            AiStep::Skipped(_) => {}
            AiStep::Done(_) => break,
        }
    }

    turn.finish(rules, &live)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{Card, CardId};
    use crate::core::{GameConfig, GameMode, MoveKind, Phase, SuggestionError};
    use crate::rules::DealRules;

    fn ai_to_play() -> (DealRules, GameState) {
        let rules = DealRules::default();
        let deck = (0..30).map(|i| Card::money(CardId::new(i), 1 + i % 3)).collect();
        let dealt = GameState::deal(rules.config(), GameMode::VsAi, deck);
        let state = rules.start_turn(&rules.end_turn(&rules.start_turn(&dealt)));
        assert_eq!(state.active_player, PlayerId::SECOND);
        assert_eq!(state.phase, Phase::PlayPhase);
        (rules, state)
    }

    #[derive(Default)]
    struct CountingPacer(usize);

    impl Pacer for CountingPacer {
        fn pause(&mut self, _delay: Duration) {
            self.0 += 1;
        }
    }

    #[test]
    fn test_stops_on_end_turn_request() {
        let (rules, state) = ai_to_play();
        let card = state.active().hand[0].id;
        let mut turn = AiTurn::from_batch(
            PlayerId::SECOND,
            vec![
                SuggestedMove::end_turn(),
                SuggestedMove::play(MoveKind::Bank, card),
            ],
        );

        assert_eq!(turn.step(&rules, &state), AiStep::Done(StopReason::EndTurnRequested));
        assert_eq!(turn.step(&rules, &state), AiStep::Done(StopReason::EndTurnRequested));
        assert_eq!(turn.remaining(), 1);
    }

    #[test]
    fn test_stale_card_is_skipped() {
        let (rules, state) = ai_to_play();
        let card = state.active().hand[0].id;
        let mut turn = AiTurn::from_batch(
            PlayerId::SECOND,
            vec![
                SuggestedMove::play(MoveKind::Bank, card),
                SuggestedMove::play(MoveKind::Bank, card),
            ],
        );

        let AiStep::Applied { state: after, .. } = turn.step(&rules, &state) else {
            panic!("first suggestion should apply");
        };
        assert!(matches!(turn.step(&rules, &after), AiStep::Skipped(_)));
        assert_eq!(turn.applied(), 1);
    }

    #[test]
    fn test_run_ai_turn_pauses_between_applied_moves_and_ends_turn() {
        let (rules, state) = ai_to_play();
        let hand: Vec<_> = state.active().hand.iter().map(|c| c.id).collect();
        let mut batch: Vec<_> = hand.iter().map(|&c| SuggestedMove::play(MoveKind::Bank, c)).collect();
        batch.insert(1, SuggestedMove::play(MoveKind::Bank, CardId::new(999)));

        let mut suggester = move |_: &GameState| -> Result<Vec<SuggestedMove>, SuggestionError> { Ok(batch.clone()) };
        let mut pacer = CountingPacer::default();
        let after = run_ai_turn(&rules, &state, &mut suggester, &mut pacer);

        // Three actions, then the budget stops the batch
        assert_eq!(pacer.0, 3);
        assert_eq!(after.players[PlayerId::SECOND].bank.len(), 3);
        assert_eq!(after.active_player, PlayerId::FIRST);
        assert_eq!(after.phase, Phase::StartTurn);
    }

    #[test]
    fn test_suggester_failure_still_ends_turn() {
        let (rules, state) = ai_to_play();
        let mut failing = |_: &GameState| -> Result<Vec<SuggestedMove>, SuggestionError> {
            Err(SuggestionError::Unavailable("timeout".into()))
        };

        let after = run_ai_turn(&rules, &state, &mut failing, &mut NoPause);

        assert_eq!(after.active_player, PlayerId::FIRST);
        assert_eq!(after.players[PlayerId::SECOND].hand, state.players[PlayerId::SECOND].hand);
    }

    #[test]
    fn test_finish_leaves_won_game_alone() {
        let (rules, mut state) = ai_to_play();
        state.winner = Some("Computer".into());
        state.phase = Phase::GameOver;

        let turn = AiTurn::from_batch(PlayerId::SECOND, vec![]);
        assert_eq!(turn.finish(&rules, &state), state);
    }

    #[test]
    fn test_config_delay_used() {
        let rules = DealRules::new(GameConfig::default().with_delays(Duration::ZERO, Duration::from_millis(1)));
        assert_eq!(rules.config().ai_move_delay(), Duration::from_millis(1));
    }
}
