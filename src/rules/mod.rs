//! Rules engine: turn structure, move dispatch and win detection.
//!
//! `DealRules` is the only implementation; the session and the AI driver
//! talk to it through the `RulesEngine` trait plus its inherent turn
//! transition methods.

pub mod engine;

pub use engine::{DealRules, GameResult, RulesEngine};
