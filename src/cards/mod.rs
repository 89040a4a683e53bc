//! Card system: definitions and the catalog.
//!
//! ## Key Types
//!
//! - `CardId`: Identifier of one physical card
//! - `CardKind`: Money, property, action, rent or wildcard
//! - `PropertyColor`: Colour groups and their set sizes
//! - `ActionKind`: Closed set of action identities with their effects
//! - `Card`: Immutable card data
//! - `CardCatalog`: The deck a game is dealt from

pub mod catalog;
pub mod definition;

pub use catalog::CardCatalog;
pub use definition::{ActionEffect, ActionKind, Card, CardId, CardKind, PropertyColor};
