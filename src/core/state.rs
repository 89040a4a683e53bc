//! Game state: the aggregate root.
//!
//! ## Player
//!
//! A seat's three card containers:
//! - `hand` (draw order)
//! - `bank` (liquid value, most recent last)
//! - `properties` (at most one `PropertySet` per colour)
//!
//! ## GameState
//!
//! Both players, the shared draw and discard piles, turn bookkeeping, the
//! in-game log (newest first) and the winner.
//!
//! Every container is an `im::Vector`, so cloning a state is O(1) and the
//! engine can derive a new state from an old one without disturbing it.
//! Field names follow the replication snapshot format.

use im::Vector;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::config::{GameConfig, GameMode};
use super::player::{PlayerId, PlayerMap, SEAT_COUNT};
use super::rng::GameRng;
use crate::cards::{Card, CardCatalog, CardId};
use crate::zones::{self, PropertySet};

/// Log line recorded when a game is dealt.
pub const OPENING_LOG: &str = "Game started! Master the market.";

/// Turn phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Phase {
    /// Waiting for the active player's draw.
    StartTurn,
    /// Active player is spending actions.
    PlayPhase,
    /// Someone won. Terminal.
    GameOver,
}

/// Which end of a networked game this copy belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MultiplayerRole {
    /// Deals the game and controls seat 0.
    Host,
    /// Joins with a room code and controls seat 1.
    Joiner,
}

impl MultiplayerRole {
    /// The seat this role controls.
    #[must_use]
    pub const fn seat(self) -> PlayerId {
        match self {
            MultiplayerRole::Host => PlayerId::FIRST,
            MultiplayerRole::Joiner => PlayerId::SECOND,
        }
    }
}

/// One seat at the table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    /// Stable seat tag (`p1`, `p2`).
    pub id: String,

    /// Display name.
    pub name: String,

    /// Cards in hand, in draw order.
    pub hand: Vector<Card>,

    /// Banked cards, most recent last.
    pub bank: Vector<Card>,

    /// Property sets, in the order they were started.
    pub properties: Vector<PropertySet>,

    /// Driven by the AI.
    #[serde(rename = "isAI")]
    pub is_ai: bool,
}

impl Player {
    /// Create an empty-handed player.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, is_ai: bool) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            hand: Vector::new(),
            bank: Vector::new(),
            properties: Vector::new(),
            is_ai,
        }
    }

    /// Position of a card in hand.
    #[must_use]
    pub fn hand_position(&self, card: CardId) -> Option<usize> {
        self.hand.iter().position(|c| c.id == card)
    }

    /// Whether a card is in hand.
    #[must_use]
    pub fn has_in_hand(&self, card: CardId) -> bool {
        self.hand_position(card).is_some()
    }

    /// Remove a card from hand.
    pub fn take_from_hand(&mut self, card: CardId) -> Option<Card> {
        let pos = self.hand_position(card)?;
        Some(self.hand.remove(pos))
    }

    /// Face value of the bank.
    #[must_use]
    pub fn bank_total(&self) -> u32 {
        self.bank.iter().map(|c| c.value).sum()
    }

    /// Face value of all laid properties.
    #[must_use]
    pub fn property_total(&self) -> u32 {
        self.properties
            .iter()
            .flat_map(|s| s.cards().iter())
            .map(|c| c.value)
            .sum()
    }

    /// Number of property cards laid.
    #[must_use]
    pub fn property_card_count(&self) -> usize {
        self.properties.iter().map(PropertySet::len).sum()
    }

    /// Number of complete property sets.
    #[must_use]
    pub fn complete_sets(&self) -> usize {
        zones::complete_set_count(self)
    }
}

/// The whole game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    /// Both seats, index 0 and 1.
    pub players: PlayerMap<Player>,

    /// Whose turn it is.
    #[serde(rename = "activePlayerIndex")]
    pub active_player: PlayerId,

    /// Draw pile; the front is the top.
    pub deck: Vector<Card>,

    /// Played action cards.
    pub discard_pile: Vector<Card>,

    /// Turn phase.
    pub phase: Phase,

    /// Moves left this turn.
    pub actions_remaining: u8,

    /// Human-readable history, newest first.
    pub logs: Vector<String>,

    /// Name of the winner once the game is over.
    pub winner: Option<String>,

    /// Set for networked games.
    #[serde(default)]
    pub multiplayer_role: Option<MultiplayerRole>,
}

impl GameState {
    /// Deal a new game from an already shuffled deck.
    ///
    /// Seat 0 receives the first `opening_hand` cards, seat 1 the next.
    #[must_use]
    pub fn deal(config: &GameConfig, mode: GameMode, deck: Vec<Card>) -> Self {
        let (first, second) = mode.player_names();
        let players = PlayerMap::from_pair(
            Player::new("p1", first, false),
            Player::new("p2", second, mode.second_seat_is_ai()),
        );

        let mut state = Self {
            players,
            active_player: PlayerId::FIRST,
            deck: deck.into_iter().collect(),
            discard_pile: Vector::new(),
            phase: Phase::StartTurn,
            actions_remaining: config.actions_per_turn,
            logs: Vector::unit(OPENING_LOG.to_string()),
            winner: None,
            multiplayer_role: mode.role(),
        };

        for seat in PlayerId::all() {
            state.draw(seat, config.opening_hand);
        }

        state
    }

    /// Shuffle a catalog and deal a new game.
    #[must_use]
    pub fn new_game(config: &GameConfig, mode: GameMode, catalog: &CardCatalog, rng: &mut GameRng) -> Self {
        Self::deal(config, mode, catalog.shuffled(rng))
    }

    /// A seat's player.
    #[must_use]
    pub fn player(&self, seat: PlayerId) -> &Player {
        &self.players[seat]
    }

    /// The player whose turn it is.
    #[must_use]
    pub fn active(&self) -> &Player {
        &self.players[self.active_player]
    }

    /// The player waiting for their turn.
    #[must_use]
    pub fn opponent(&self) -> &Player {
        &self.players[self.active_player.opponent()]
    }

    /// Record a log line as the newest entry.
    pub fn push_log(&mut self, line: impl Into<String>) {
        self.logs.push_front(line.into());
    }

    /// Move up to `count` cards from the top of the deck into a hand.
    ///
    /// Draws what remains when the deck runs short.
    pub fn draw(&mut self, seat: PlayerId, count: usize) -> SmallVec<[CardId; 5]> {
        let mut drawn = SmallVec::new();
        for _ in 0..count {
            let Some(card) = self.deck.pop_front() else {
                break;
            };
            drawn.push(card.id);
            self.players[seat].hand.push_back(card);
        }
        drawn
    }

    /// Whether the game has been won.
    #[must_use]
    pub fn is_over(&self) -> bool {
        self.winner.is_some() || self.phase == Phase::GameOver
    }

    /// Whether the local side may act, given the role this copy belongs to.
    ///
    /// Local games always may; networked games only on their own seat.
    #[must_use]
    pub fn is_my_turn(&self, role: Option<MultiplayerRole>) -> bool {
        role.map_or(true, |r| r.seat() == self.active_player)
    }

    /// Every card in the game, wherever it sits.
    pub fn all_cards(&self) -> impl Iterator<Item = &Card> {
        let held = self.players.iter().flat_map(|(_, p)| {
            p.hand
                .iter()
                .chain(p.bank.iter())
                .chain(p.properties.iter().flat_map(|s| s.cards().iter()))
        });
        self.deck.iter().chain(self.discard_pile.iter()).chain(held)
    }

    /// Structural checks for a state that arrived from outside.
    pub fn check_shape(&self) -> Result<(), String> {
        if self.players.len() != SEAT_COUNT {
            return Err(format!("expected {SEAT_COUNT} players, got {}", self.players.len()));
        }
        if self.active_player.index() >= SEAT_COUNT {
            return Err(format!("active player {} out of range", self.active_player.0));
        }
        for (seat, player) in self.players.iter() {
            if let Some(set) = player.properties.iter().find(|s| s.is_empty()) {
                return Err(format!("{seat} holds an empty {:?} set", set.color()));
            }
            let mut colors: Vec<_> = player.properties.iter().map(PropertySet::color).collect();
            colors.sort();
            colors.dedup();
            if colors.len() != player.properties.len() {
                return Err(format!("{seat} holds two sets of one colour"));
            }
        }
        Ok(())
    }

    /// Recompute every set's completion flag. Used on incoming snapshots.
    pub fn refresh_sets(&mut self) {
        for (_, player) in self.players.iter_mut() {
            for set in player.properties.iter_mut() {
                set.refresh();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::PropertyColor;

    fn cash_deck(n: u32) -> Vec<Card> {
        (0..n).map(|i| Card::money(CardId::new(i), 1)).collect()
    }

    #[test]
    fn test_deal() {
        let state = GameState::deal(&GameConfig::default(), GameMode::LocalTwoPlayer, cash_deck(20));

        assert_eq!(state.players[PlayerId::FIRST].hand.len(), 5);
        assert_eq!(state.players[PlayerId::SECOND].hand.len(), 5);
        assert_eq!(state.deck.len(), 10);
        assert_eq!(state.phase, Phase::StartTurn);
        assert_eq!(state.active_player, PlayerId::FIRST);
        assert_eq!(state.actions_remaining, 3);
        assert_eq!(state.logs, Vector::unit(OPENING_LOG.to_string()));

        // Seat 0 takes the top five
        let first: Vec<_> = state.players[PlayerId::FIRST].hand.iter().map(|c| c.id.raw()).collect();
        assert_eq!(first, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_deal_names_by_mode() {
        let vs_ai = GameState::deal(&GameConfig::default(), GameMode::VsAi, cash_deck(10));
        assert!(vs_ai.players[PlayerId::SECOND].is_ai);
        assert_eq!(vs_ai.players[PlayerId::SECOND].name, "Computer");
        assert_eq!(vs_ai.multiplayer_role, None);

        let hosted = GameState::deal(
            &GameConfig::default(),
            GameMode::Networked(MultiplayerRole::Host),
            cash_deck(10),
        );
        assert_eq!(hosted.players[PlayerId::FIRST].name, "Host");
        assert_eq!(hosted.multiplayer_role, Some(MultiplayerRole::Host));
    }

    #[test]
    fn test_draw_short_deck() {
        let mut state = GameState::deal(&GameConfig::default(), GameMode::LocalTwoPlayer, cash_deck(11));
        assert_eq!(state.deck.len(), 1);

        let drawn = state.draw(PlayerId::FIRST, 2);
        assert_eq!(drawn.len(), 1);
        assert!(state.deck.is_empty());
        assert_eq!(state.players[PlayerId::FIRST].hand.len(), 6);

        assert!(state.draw(PlayerId::FIRST, 2).is_empty());
    }

    #[test]
    fn test_take_from_hand() {
        let mut player = Player::new("p1", "A", false);
        player.hand.push_back(Card::money(CardId::new(1), 2));
        player.hand.push_back(Card::money(CardId::new(2), 3));

        assert_eq!(player.take_from_hand(CardId::new(1)).map(|c| c.value), Some(2));
        assert!(player.take_from_hand(CardId::new(1)).is_none());
        assert_eq!(player.hand.len(), 1);
    }

    #[test]
    fn test_is_my_turn() {
        let state = GameState::deal(&GameConfig::default(), GameMode::LocalTwoPlayer, cash_deck(10));
        assert!(state.is_my_turn(None));
        assert!(state.is_my_turn(Some(MultiplayerRole::Host)));
        assert!(!state.is_my_turn(Some(MultiplayerRole::Joiner)));
    }

    #[test]
    fn test_clone_is_independent() {
        let original = GameState::deal(&GameConfig::default(), GameMode::LocalTwoPlayer, cash_deck(12));
        let mut next = original.clone();
        next.draw(PlayerId::FIRST, 2);
        next.push_log("drew");

        assert_eq!(original.deck.len(), 2);
        assert_eq!(original.logs.len(), 1);
        assert_eq!(next.deck.len(), 0);
        assert_eq!(next.logs.front().map(String::as_str), Some("drew"));
    }

    #[test]
    fn test_check_shape_rejects_duplicate_colours() {
        let mut state = GameState::deal(&GameConfig::default(), GameMode::LocalTwoPlayer, cash_deck(10));
        assert!(state.check_shape().is_ok());

        let card = Card::property(CardId::new(99), "Whitehall", PropertyColor::Pink, 2);
        let set = PropertySet::with_card(card);
        state.players[PlayerId::FIRST].properties.push_back(set.clone());
        state.players[PlayerId::FIRST].properties.push_back(set);

        assert!(state.check_shape().is_err());
    }
}
