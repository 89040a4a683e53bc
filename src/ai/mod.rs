//! AI move application.
//!
//! - `suggestion`: the untrusted move-suggestion contract and a built-in
//!   greedy suggester
//! - `driver`: applies one batch of suggestions as the AI's turn

pub mod driver;
pub mod suggestion;

pub use driver::{run_ai_turn, AiStep, AiTurn, NoPause, Pacer, StopReason, ThreadPacer};
pub use suggestion::{parse_suggestions, GreedySuggester, MoveSuggester, RawCardId, SuggestedMove, Suggestion};
