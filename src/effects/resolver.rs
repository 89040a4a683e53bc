//! Action card resolution.
//!
//! `resolve_action` applies a played action card's effect for the active
//! player. The effect is taken from the card's `ActionKind`; the card itself
//! always ends up on the discard pile.

use tracing::debug;

use super::settlement::{settle_debt, Settlement};
use crate::cards::{ActionEffect, Card, CardId};
use crate::core::GameState;
use crate::zones;

/// What resolving an action did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResolveResult {
    /// Actor drew this many cards.
    Drew(usize),
    /// Opponent paid the actor.
    Collected(Settlement),
    /// Actor took this property from the opponent.
    Stole(CardId),
    /// Steal had no eligible target.
    NothingToSteal,
    /// Card has no effect in play.
    NoEffect,
}

/// Resolve `card` for the active player. The card must already be out of
/// the actor's hand.
pub fn resolve_action(state: &mut GameState, card: Card) -> ResolveResult {
    let actor = state.active_player;
    let victim = actor.opponent();
    let actor_name = state.players[actor].name.clone();

    let effect = card.action.map_or(ActionEffect::Inert, |a| a.effect());

    let result = match effect {
        ActionEffect::Draw(count) => {
            let drawn = state.draw(actor, count).len();
            state.push_log(format!("{actor_name} played {}: +{drawn} cards.", card.name));
            ResolveResult::Drew(drawn)
        }
        ActionEffect::Collect(amount) => {
            state.push_log(format!("{actor_name} played {} for {amount}M.", card.name));
            let (payer, payee) = state.players.pair_mut(victim, actor);
            ResolveResult::Collected(settle_debt(payer, payee, amount, &mut state.logs))
        }
        ActionEffect::StealProperty => {
            let (target, thief) = state.players.pair_mut(victim, actor);
            let stolen = zones::first_incomplete_set(target)
                .and_then(|index| zones::transfer_top_of(target, index, thief).ok());
            match stolen {
                Some(taken) => {
                    state.push_log(format!("{actor_name} stole {} with {}.", taken.name, card.name));
                    ResolveResult::Stole(taken.id)
                }
                None => {
                    state.push_log(format!("{actor_name} played {} but found nothing to steal.", card.name));
                    ResolveResult::NothingToSteal
                }
            }
        }
        ActionEffect::Inert => {
            state.push_log(format!("{actor_name} played {}.", card.name));
            ResolveResult::NoEffect
        }
    };

    debug!(card = %card.id, name = %card.name, ?result, "action resolved");
    state.discard_pile.push_back(card);
    result
}
