//! Card holdings that have structure beyond a plain list.
//!
//! Hands, banks, the deck and the discard pile are ordered `im::Vector`s on
//! `GameState`. Property holdings need grouping by colour and completion
//! tracking, handled by the ledger.

pub mod ledger;

pub use ledger::{
    add_to_set, complete_set_count, first_incomplete_set, first_nonempty_set, remove_top_of,
    transfer_top_of, PropertySet,
};
