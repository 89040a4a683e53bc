//! Game session: the caller-owned home of the current game.
//!
//! A `Session` holds the current `GameState` (or none, at the menu), the
//! rules, the shuffle RNG and, for networked play, the replication adapter.
//! Every local mutation goes through the engine and, when it changed
//! anything, is published to the peer as a full snapshot. Incoming
//! snapshots replace the local copy wholesale.
//!
//! Timing is left to the caller: `auto_draw_due` says when the current
//! state wants an automatic `start_turn`, and `ai_to_move` says when the AI
//! should take its turn.

use std::time::Duration;

use tracing::{debug, info, warn};

use crate::ai::{run_ai_turn, MoveSuggester, Pacer};
use crate::cards::CardId;
use crate::core::{GameMode, GameRng, GameState, MoveKind, MultiplayerRole, Phase, RuleViolation};
use crate::rules::{DealRules, RulesEngine};
use crate::sync::{ChannelEvent, ReplicationAdapter, ReplicationChannel};

/// Status shown to a host waiting for a guest.
pub const STATUS_WAITING_FOR_GUEST: &str = "Waiting for an opponent to join...";
/// Status shown to a guest waiting for the first snapshot.
pub const STATUS_WAITING_FOR_HOST: &str = "Waiting for the host to deal...";
/// Status shown once the peer connects.
pub const STATUS_CONNECTED: &str = "Connected! Starting game...";
/// Status shown after the peer goes away.
pub const STATUS_CONNECTION_LOST: &str = "Connection lost.";

/// Replication adapter over any boxed channel.
pub type Replication = ReplicationAdapter<Box<dyn ReplicationChannel>>;

/// One player's view of a game, from menu to game over.
pub struct Session {
    rules: DealRules,
    rng: GameRng,
    state: Option<GameState>,
    status: Option<String>,
    role: Option<MultiplayerRole>,
    replication: Option<Replication>,
}

impl Session {
    /// A session at the menu.
    #[must_use]
    pub fn new(rules: DealRules, rng: GameRng) -> Self {
        Self {
            rules,
            rng,
            state: None,
            status: None,
            role: None,
            replication: None,
        }
    }

    /// A networked session waiting on `channel`.
    ///
    /// The host deals when the channel opens; the guest waits for the
    /// host's first snapshot.
    pub fn networked<C>(rules: DealRules, rng: GameRng, role: MultiplayerRole, channel: C) -> Self
    where
        C: ReplicationChannel + 'static,
    {
        let status = match role {
            MultiplayerRole::Host => STATUS_WAITING_FOR_GUEST,
            MultiplayerRole::Joiner => STATUS_WAITING_FOR_HOST,
        };
        info!(?role, "networked session waiting");
        Self {
            role: Some(role),
            status: Some(status.to_string()),
            replication: Some(ReplicationAdapter::new(Box::new(channel))),
            ..Self::new(rules, rng)
        }
    }

    /// The rules in force.
    #[must_use]
    pub fn rules(&self) -> &DealRules {
        &self.rules
    }

    /// The current game, if one is running.
    #[must_use]
    pub fn state(&self) -> Option<&GameState> {
        self.state.as_ref()
    }

    /// The latest status message.
    #[must_use]
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// This side's role in a networked game.
    #[must_use]
    pub fn role(&self) -> Option<MultiplayerRole> {
        self.role
    }

    /// The replication adapter, for networked sessions.
    pub fn replication(&self) -> Option<&Replication> {
        self.replication.as_ref()
    }

    /// Whether this side may act on the current state.
    #[must_use]
    pub fn is_my_turn(&self) -> bool {
        self.state.as_ref().is_some_and(|s| s.is_my_turn(self.role))
    }

    // === Lifecycle ===

    /// Shuffle and deal a new game, replacing any current one.
    ///
    /// In a networked session the mode is always the networked one for this
    /// side's role.
    pub fn new_game(&mut self, mode: GameMode) -> &GameState {
        let mode = self.role.map_or(mode, GameMode::Networked);
        let state = self.rules.new_game(mode, &mut self.rng);
        self.commit(state)
    }

    /// Leave the game and go back to the menu.
    ///
    /// Drops the game, the status and any network link.
    pub fn return_to_menu(&mut self) {
        info!("returned to menu");
        self.state = None;
        self.status = None;
        self.role = None;
        self.replication = None;
    }

    // === Local Actions ===

    /// Draw for the active player. No-op unless it is this side's turn to
    /// start.
    pub fn start_turn(&mut self) -> bool {
        self.mutate(|rules, state| rules.try_start_turn(state))
    }

    /// End the active player's turn. No-op unless it is this side's turn.
    pub fn end_turn(&mut self) -> bool {
        self.mutate(|rules, state| rules.try_end_turn(state))
    }

    /// Play a card. No-op unless it is this side's turn and the move is
    /// legal.
    pub fn play(&mut self, kind: MoveKind, card: CardId) -> bool {
        self.mutate(|rules, state| rules.try_execute_move(state, kind, card))
    }

    /// Delay after which the current state wants an automatic draw, if it
    /// does.
    #[must_use]
    pub fn auto_draw_due(&self) -> Option<Duration> {
        let state = self.state.as_ref()?;
        let due = state.phase == Phase::StartTurn && !state.is_over() && state.is_my_turn(self.role);
        due.then(|| self.rules.config().auto_draw_delay())
    }

    /// Whether the AI should take its turn now.
    #[must_use]
    pub fn ai_to_move(&self) -> bool {
        self.state
            .as_ref()
            .is_some_and(|s| s.phase == Phase::PlayPhase && !s.is_over() && s.active().is_ai)
    }

    /// Let the AI play its turn. Returns whether it ran.
    ///
    /// The turn always ends, even when the suggester fails.
    pub fn play_ai_turn<S, P>(&mut self, suggester: &mut S, pacer: &mut P) -> bool
    where
        S: MoveSuggester + ?Sized,
        P: Pacer + ?Sized,
    {
        if !self.ai_to_move() {
            return false;
        }
        let Some(state) = self.state.as_ref() else {
            return false;
        };
        let next = run_ai_turn(&self.rules, state, suggester, pacer);
        self.commit(next);
        true
    }

    // === Replication ===

    /// Handle every pending channel event. Returns how many were handled.
    pub fn pump(&mut self) -> usize {
        let mut handled = 0;
        while let Some(event) = self.replication.as_mut().and_then(Replication::poll) {
            self.handle_event(event);
            handled += 1;
        }
        handled
    }

    /// Handle one channel event.
    pub fn handle_event(&mut self, event: ChannelEvent) {
        match event {
            ChannelEvent::Opened => {
                info!(role = ?self.role, "peer connected");
                self.status = Some(STATUS_CONNECTED.to_string());
                if let Some(role @ MultiplayerRole::Host) = self.role {
                    self.new_game(GameMode::Networked(role));
                }
            }
            ChannelEvent::Message(message) => {
                let Some(replication) = self.replication.as_mut() else {
                    return;
                };
                match replication.accept(message) {
                    Ok(state) => {
                        debug!(phase = ?state.phase, active = %state.active_player, "snapshot replaced local state");
                        self.state = Some(state);
                    }
                    Err(err) => warn!(error = %err, "snapshot rejected"),
                }
            }
            ChannelEvent::Closed => self.connection_lost(STATUS_CONNECTION_LOST.to_string()),
            ChannelEvent::Error(reason) => self.connection_lost(format!("Error: {reason}")),
        }
    }

    fn connection_lost(&mut self, status: String) {
        warn!(%status, "network game discarded");
        self.state = None;
        self.role = None;
        self.replication = None;
        self.status = Some(status);
    }

    // === Internals ===

    fn mutate<F>(&mut self, step: F) -> bool
    where
        F: FnOnce(&DealRules, &GameState) -> Result<GameState, RuleViolation>,
    {
        let Some(state) = self.state.as_ref() else {
            debug!("no game in progress");
            return false;
        };
        if !state.is_my_turn(self.role) {
            debug!(role = ?self.role, active = %state.active_player, "not this side's turn");
            return false;
        }
        match step(&self.rules, state) {
            Ok(next) => {
                self.commit(next);
                true
            }
            Err(why) => {
                debug!(reason = %why, "ignored");
                false
            }
        }
    }

    fn commit(&mut self, next: GameState) -> &GameState {
        if let Some(replication) = self.replication.as_mut() {
            if let Err(err) = replication.publish(&next) {
                warn!(error = %err, "snapshot publish failed");
            }
        }
        self.state.insert(next)
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("state", &self.state)
            .field("status", &self.status)
            .field("role", &self.role)
            .field("networked", &self.replication.is_some())
            .finish_non_exhaustive()
    }
}
