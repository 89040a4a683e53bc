//! Card definitions - immutable card data.
//!
//! A `Card` is created once by the catalog and never mutated afterwards; it
//! only moves between containers (deck, hand, bank, property set, discard).
//!
//! Action cards carry an `ActionKind`, a closed enumeration whose effect is
//! looked up by `match`, never by comparing display names.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Unique identifier of one physical card in a game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardId(pub u32);

impl CardId {
    /// Create a new card ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "card-{}", self.0)
    }
}

impl FromStr for CardId {
    type Err = std::num::ParseIntError;

    /// Accepts both the display form (`card-12`) and the bare number (`12`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let digits = s.strip_prefix("card-").unwrap_or(s);
        digits.parse().map(CardId)
    }
}

/// What a card is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CardKind {
    Money,
    Property,
    Action,
    Rent,
    Wild,
}

impl CardKind {
    /// Can be laid into a property set.
    #[must_use]
    pub fn is_placeable(self) -> bool {
        matches!(self, CardKind::Property | CardKind::Wild)
    }
}

/// Property colour. `Any` groups colourless wildcards and never completes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PropertyColor {
    Brown,
    LightBlue,
    Pink,
    Orange,
    Red,
    Yellow,
    Green,
    DarkBlue,
    Railroad,
    Utility,
    Any,
}

impl PropertyColor {
    /// The ten real colours, in board order.
    pub const REAL: [PropertyColor; 10] = [
        PropertyColor::Brown,
        PropertyColor::LightBlue,
        PropertyColor::Pink,
        PropertyColor::Orange,
        PropertyColor::Red,
        PropertyColor::Yellow,
        PropertyColor::Green,
        PropertyColor::DarkBlue,
        PropertyColor::Railroad,
        PropertyColor::Utility,
    ];

    /// Cards needed for a complete set. `None` for `Any`, which never completes.
    #[must_use]
    pub const fn set_size(self) -> Option<usize> {
        match self {
            PropertyColor::Brown | PropertyColor::DarkBlue | PropertyColor::Utility => Some(2),
            PropertyColor::LightBlue
            | PropertyColor::Pink
            | PropertyColor::Orange
            | PropertyColor::Red
            | PropertyColor::Yellow
            | PropertyColor::Green => Some(3),
            PropertyColor::Railroad => Some(4),
            PropertyColor::Any => None,
        }
    }

    /// Whether `count` cards of this colour make a complete set.
    #[must_use]
    pub fn completes_with(self, count: usize) -> bool {
        self.set_size().is_some_and(|size| count >= size)
    }
}

/// What resolving an action card does.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActionEffect {
    /// Actor draws this many cards.
    Draw(usize),
    /// Opponent pays the actor this much.
    Collect(u32),
    /// Take the top card of the opponent's first incomplete set.
    StealProperty,
    /// Discarded without effect.
    Inert,
}

/// The ten action card identities.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionKind {
    DealBreaker,
    SlyDeal,
    ForceDeal,
    JustSayNo,
    DebtCollector,
    ItsMyBirthday,
    PassGo,
    House,
    Hotel,
    DoubleTheRent,
}

impl ActionKind {
    /// Every action card identity.
    pub const ALL: [ActionKind; 10] = [
        ActionKind::DealBreaker,
        ActionKind::SlyDeal,
        ActionKind::ForceDeal,
        ActionKind::JustSayNo,
        ActionKind::DebtCollector,
        ActionKind::ItsMyBirthday,
        ActionKind::PassGo,
        ActionKind::House,
        ActionKind::Hotel,
        ActionKind::DoubleTheRent,
    ];

    /// Effect resolved when played.
    #[must_use]
    pub const fn effect(self) -> ActionEffect {
        match self {
            ActionKind::PassGo => ActionEffect::Draw(2),
            ActionKind::DebtCollector => ActionEffect::Collect(5),
            ActionKind::ItsMyBirthday => ActionEffect::Collect(2),
            ActionKind::SlyDeal => ActionEffect::StealProperty,
            ActionKind::DealBreaker
            | ActionKind::ForceDeal
            | ActionKind::JustSayNo
            | ActionKind::House
            | ActionKind::Hotel
            | ActionKind::DoubleTheRent => ActionEffect::Inert,
        }
    }

    /// Printed name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            ActionKind::DealBreaker => "Deal Breaker",
            ActionKind::SlyDeal => "Sly Deal",
            ActionKind::ForceDeal => "Force Deal",
            ActionKind::JustSayNo => "Just Say No",
            ActionKind::DebtCollector => "Debt Collector",
            ActionKind::ItsMyBirthday => "It's My Birthday",
            ActionKind::PassGo => "Pass Go",
            ActionKind::House => "House",
            ActionKind::Hotel => "Hotel",
            ActionKind::DoubleTheRent => "Double The Rent",
        }
    }

    /// Printed rules text.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            ActionKind::DealBreaker => "Steal a complete set from any player.",
            ActionKind::SlyDeal => "Steal a single property from any player.",
            ActionKind::ForceDeal => "Swap a property with another player.",
            ActionKind::JustSayNo => "Counter any action card.",
            ActionKind::DebtCollector => "Collect 5M from one player.",
            ActionKind::ItsMyBirthday => "Collect 2M from all players.",
            ActionKind::PassGo => "Draw 2 extra cards.",
            ActionKind::House => "Add onto any full set to raise its rent.",
            ActionKind::Hotel => "Add onto a full set with a house to raise its rent.",
            ActionKind::DoubleTheRent => "Play with a rent card to double it.",
        }
    }

    /// Bank value.
    #[must_use]
    pub const fn value(self) -> u32 {
        match self {
            ActionKind::DealBreaker => 7,
            ActionKind::JustSayNo | ActionKind::Hotel => 4,
            ActionKind::SlyDeal | ActionKind::ForceDeal | ActionKind::DebtCollector | ActionKind::House => 3,
            ActionKind::ItsMyBirthday => 2,
            ActionKind::PassGo | ActionKind::DoubleTheRent => 1,
        }
    }

    /// Copies in a standard deck.
    #[must_use]
    pub const fn copies(self) -> usize {
        match self {
            ActionKind::PassGo => 10,
            ActionKind::DealBreaker | ActionKind::Hotel | ActionKind::DoubleTheRent => 2,
            _ => 3,
        }
    }
}

/// One physical card.
///
/// Field names follow the snapshot wire format (`type`, `secondaryColor`).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    /// Unique within a game.
    pub id: CardId,

    /// Display name.
    pub name: String,

    /// Card kind.
    #[serde(rename = "type")]
    pub kind: CardKind,

    /// Face value in millions.
    pub value: u32,

    /// Primary colour for properties and wildcards.
    #[serde(default)]
    pub color: Option<PropertyColor>,

    /// Second colour of a two-colour wildcard.
    #[serde(default)]
    pub secondary_color: Option<PropertyColor>,

    /// Rules text.
    #[serde(default)]
    pub description: Option<String>,

    /// Action identity, for action cards.
    #[serde(default)]
    pub action: Option<ActionKind>,
}

impl Card {
    /// A money card worth `value`.
    #[must_use]
    pub fn money(id: CardId, value: u32) -> Self {
        Self {
            id,
            name: format!("{value}M"),
            kind: CardKind::Money,
            value,
            color: None,
            secondary_color: None,
            description: None,
            action: None,
        }
    }

    /// An action card.
    #[must_use]
    pub fn action(id: CardId, action: ActionKind) -> Self {
        Self {
            id,
            name: action.name().to_string(),
            kind: CardKind::Action,
            value: action.value(),
            color: None,
            secondary_color: None,
            description: Some(action.description().to_string()),
            action: Some(action),
        }
    }

    /// A property card.
    #[must_use]
    pub fn property(id: CardId, name: impl Into<String>, color: PropertyColor, value: u32) -> Self {
        Self {
            id,
            name: name.into(),
            kind: CardKind::Property,
            value,
            color: Some(color),
            secondary_color: None,
            description: None,
            action: None,
        }
    }

    /// A wildcard. Sets with its primary colour; `None` means colourless.
    #[must_use]
    pub fn wild(
        id: CardId,
        name: impl Into<String>,
        primary: Option<PropertyColor>,
        secondary: Option<PropertyColor>,
        value: u32,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            kind: CardKind::Wild,
            value,
            color: primary,
            secondary_color: secondary,
            description: None,
            action: None,
        }
    }

    /// The set this card joins when laid or transferred.
    #[must_use]
    pub fn set_color(&self) -> PropertyColor {
        self.color.unwrap_or(PropertyColor::Any)
    }
}
