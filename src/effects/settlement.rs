//! Debt settlement: how a payer discharges a monetary obligation.
//!
//! Payment order is fixed:
//! 1. Bank cards, most recently banked first, each moved whole into the
//!    payee's bank. No change is given: a 5M card paid against a 2M debt
//!    settles it with 3M lost to the payer.
//! 2. Property cards, taken from the top of the first non-empty set and
//!    re-homed into the payee's matching set.
//!
//! Settlement stops as soon as the debt is covered or the payer has nothing
//! left. Running out is a normal outcome, not an error.

use im::Vector;
use smallvec::SmallVec;
use tracing::debug;

use crate::cards::CardId;
use crate::core::Player;
use crate::zones;

/// What a settlement moved.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settlement {
    /// Amount owed.
    pub requested: u32,
    /// Face value handed over (may exceed `requested`).
    pub paid: u32,
    /// Cards moved, in payment order.
    pub cards: SmallVec<[CardId; 4]>,
}

impl Settlement {
    /// Whether the debt was covered.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.paid >= self.requested
    }

    /// Amount left unpaid.
    #[must_use]
    pub fn shortfall(&self) -> u32 {
        self.requested.saturating_sub(self.paid)
    }
}

/// Pay `amount` from `payer` to `payee`, bank first, then property.
///
/// Each card moved adds a line to the front of `log`.
pub fn settle_debt(payer: &mut Player, payee: &mut Player, amount: u32, log: &mut Vector<String>) -> Settlement {
    let mut settlement = Settlement {
        requested: amount,
        paid: 0,
        cards: SmallVec::new(),
    };
    let mut remaining = i64::from(amount);

    while remaining > 0 {
        let Some(card) = payer.bank.pop_back() else {
            break;
        };
        remaining -= i64::from(card.value);
        settlement.paid += card.value;
        settlement.cards.push(card.id);
        log.push_front(format!("{} paid {} ({}M) from bank.", payer.name, card.name, card.value));
        payee.bank.push_back(card);
    }

    while remaining > 0 {
        let Some(index) = zones::first_nonempty_set(payer) else {
            break;
        };
        let Ok(card) = zones::transfer_top_of(payer, index, payee) else {
            break;
        };
        remaining -= i64::from(card.value);
        settlement.paid += card.value;
        settlement.cards.push(card.id);
        log.push_front(format!("{} surrendered {} to settle debt.", payer.name, card.name));
    }

    debug!(
        payer = %payer.name,
        payee = %payee.name,
        requested = settlement.requested,
        paid = settlement.paid,
        cards = settlement.cards.len(),
        "debt settled"
    );

    settlement
}
