//! Property ledger: colour-grouped property holdings.
//!
//! A player's `properties` is a list of `PropertySet`s with these invariants:
//! - at most one set per colour
//! - no empty set persists; a set is dropped when its last card leaves
//! - `is_complete` is recomputed on every push and pop
//!
//! Within a set the most recently added card is the "top" and is the one
//! that leaves first when the set pays a debt or is stolen from.

use im::Vector;
use serde::{Deserialize, Serialize};

use crate::cards::{Card, PropertyColor};
use crate::core::{LedgerError, Player};

/// Cards of one colour held by one player.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertySet {
    color: PropertyColor,
    cards: Vector<Card>,
    is_complete: bool,
}

impl PropertySet {
    /// An empty set of a colour. Only useful as a builder start; the ledger
    /// never stores an empty set.
    #[must_use]
    pub fn new(color: PropertyColor) -> Self {
        Self {
            color,
            cards: Vector::new(),
            is_complete: false,
        }
    }

    /// A set started by one card, keyed by that card's colour.
    #[must_use]
    pub fn with_card(card: Card) -> Self {
        let mut set = Self::new(card.set_color());
        set.push(card);
        set
    }

    /// Set colour.
    #[must_use]
    pub fn color(&self) -> PropertyColor {
        self.color
    }

    /// Cards, oldest first.
    #[must_use]
    pub fn cards(&self) -> &Vector<Card> {
        &self.cards
    }

    /// Number of cards.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// True when no cards remain.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Whether the set has reached its colour's size.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.is_complete
    }

    /// The most recently added card.
    #[must_use]
    pub fn top(&self) -> Option<&Card> {
        self.cards.back()
    }

    /// Append a card and recompute completion.
    pub fn push(&mut self, card: Card) {
        self.cards.push_back(card);
        self.refresh();
    }

    /// Remove the most recently added card and recompute completion.
    pub fn pop(&mut self) -> Option<Card> {
        let card = self.cards.pop_back();
        self.refresh();
        card
    }

    /// Recompute `is_complete` from the card count.
    pub fn refresh(&mut self) {
        self.is_complete = self.color.completes_with(self.cards.len());
    }
}

/// Lay a card into the owner's set for its colour, creating the set if needed.
///
/// Colourless cards go to the `Any` set. Returns the index of the set.
pub fn add_to_set(player: &mut Player, card: Card) -> usize {
    let color = card.set_color();
    match player.properties.iter().position(|s| s.color == color) {
        Some(index) => {
            player.properties[index].push(card);
            index
        }
        None => {
            player.properties.push_back(PropertySet::with_card(card));
            player.properties.len() - 1
        }
    }
}

/// Take the top card of a set, dropping the set if it empties.
pub fn remove_top_of(player: &mut Player, set_index: usize) -> Result<Card, LedgerError> {
    let set = player
        .properties
        .get_mut(set_index)
        .ok_or(LedgerError::NoSuchSet(set_index))?;
    let card = set.pop().ok_or(LedgerError::EmptySet(set_index))?;
    if set.is_empty() {
        player.properties.remove(set_index);
    }
    Ok(card)
}

/// Move the top card of one player's set into the receiver's matching set.
pub fn transfer_top_of(from: &mut Player, set_index: usize, to: &mut Player) -> Result<Card, LedgerError> {
    let card = remove_top_of(from, set_index)?;
    add_to_set(to, card.clone());
    Ok(card)
}

/// Index of the first set holding any card.
#[must_use]
pub fn first_nonempty_set(player: &Player) -> Option<usize> {
    player.properties.iter().position(|s| !s.is_empty())
}

/// Index of the first set that is not complete. Complete sets are protected
/// from single-card theft.
#[must_use]
pub fn first_incomplete_set(player: &Player) -> Option<usize> {
    player.properties.iter().position(|s| !s.is_complete && !s.is_empty())
}

/// Number of complete sets a player holds.
#[must_use]
pub fn complete_set_count(player: &Player) -> usize {
    player.properties.iter().filter(|s| s.is_complete).count()
}
