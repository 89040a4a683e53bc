//! Card catalog: the fixed multiset of cards a game is played with.
//!
//! The catalog assigns every card a unique sequential `CardId` and provides
//! fast lookup by id. `shuffled` hands out the draw pile for a new game.

use rustc_hash::FxHashMap;

use super::definition::{ActionKind, Card, CardId, CardKind, PropertyColor};
use crate::core::GameRng;

/// Money denominations and copies.
const MONEY: [(u32, usize); 6] = [(10, 1), (5, 2), (4, 3), (3, 3), (2, 5), (1, 6)];

/// Property name, colour, face value, copies.
const PROPERTIES: [(&str, PropertyColor, u32, usize); 10] = [
    ("Old Kent Road", PropertyColor::Brown, 1, 2),
    ("The Angel Islington", PropertyColor::LightBlue, 1, 3),
    ("Whitehall", PropertyColor::Pink, 2, 3),
    ("Bow Street", PropertyColor::Orange, 2, 3),
    ("Fleet Street", PropertyColor::Red, 3, 3),
    ("Leicester Square", PropertyColor::Yellow, 3, 3),
    ("Bond Street", PropertyColor::Green, 4, 3),
    ("Park Lane", PropertyColor::DarkBlue, 4, 2),
    ("King's Cross Station", PropertyColor::Railroad, 2, 4),
    ("Water Works", PropertyColor::Utility, 2, 2),
];

/// Two-colour wildcards: name, primary, secondary, face value.
const WILDS: [(&str, PropertyColor, PropertyColor, u32); 2] = [
    ("Dark Blue/Green Wild", PropertyColor::DarkBlue, PropertyColor::Green, 4),
    ("Light Blue/Brown Wild", PropertyColor::LightBlue, PropertyColor::Brown, 1),
];

/// Every card in a game, with lookup by id.
///
/// ## Example
///
/// ```
/// use property_deal::cards::{CardCatalog, CardKind};
///
/// let catalog = CardCatalog::standard();
/// assert_eq!(catalog.count_of(CardKind::Money), 20);
///
/// let first = catalog.iter().next().unwrap();
/// assert_eq!(catalog.get(first.id), Some(first));
/// ```
#[derive(Clone, Debug, Default)]
pub struct CardCatalog {
    cards: Vec<Card>,
    index: FxHashMap<CardId, usize>,
}

impl CardCatalog {
    /// Create an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The standard deck: 20 money, 34 action, 28 property, 2 wild.
    #[must_use]
    pub fn standard() -> Self {
        let mut catalog = Self::new();

        for (value, copies) in MONEY {
            for _ in 0..copies {
                catalog.push_with(|id| Card::money(id, value));
            }
        }

        for action in ActionKind::ALL {
            for _ in 0..action.copies() {
                catalog.push_with(|id| Card::action(id, action));
            }
        }

        for (name, color, value, copies) in PROPERTIES {
            for _ in 0..copies {
                catalog.push_with(|id| Card::property(id, name, color, value));
            }
        }

        for (name, primary, secondary, value) in WILDS {
            catalog.push_with(|id| Card::wild(id, name, Some(primary), Some(secondary), value));
        }

        catalog
    }

    /// Add a card built from the next free id. Returns that id.
    pub fn push_with(&mut self, build: impl FnOnce(CardId) -> Card) -> CardId {
        let id = CardId::new(self.cards.len() as u32);
        let card = build(id);
        debug_assert_eq!(card.id, id, "catalog card must keep its assigned id");
        self.index.insert(id, self.cards.len());
        self.cards.push(card);
        id
    }

    /// Get a card by id.
    #[must_use]
    pub fn get(&self, id: CardId) -> Option<&Card> {
        self.index.get(&id).map(|&i| &self.cards[i])
    }

    /// Check if a card id belongs to this catalog.
    #[must_use]
    pub fn contains(&self, id: CardId) -> bool {
        self.index.contains_key(&id)
    }

    /// Number of cards.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Check if the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Iterate in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter()
    }

    /// Number of cards of a kind.
    #[must_use]
    pub fn count_of(&self, kind: CardKind) -> usize {
        self.cards.iter().filter(|c| c.kind == kind).count()
    }

    /// Number of property cards of a colour, wildcards counted by primary.
    #[must_use]
    pub fn count_of_color(&self, color: PropertyColor) -> usize {
        self.cards
            .iter()
            .filter(|c| c.kind.is_placeable() && c.set_color() == color)
            .count()
    }

    /// A Fisher–Yates shuffled copy of every card.
    #[must_use]
    pub fn shuffled(&self, rng: &mut GameRng) -> Vec<Card> {
        let mut deck = self.cards.clone();
        rng.shuffle(&mut deck);
        deck
    }
}
