//! Effects that move value between players.
//!
//! - `settlement`: paying a debt, bank first then property
//! - `resolver`: resolving a played action card

pub mod resolver;
pub mod settlement;

pub use resolver::{resolve_action, ResolveResult};
pub use settlement::{settle_debt, Settlement};
