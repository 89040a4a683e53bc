//! Replication adapter over a message channel.
//!
//! The transport (peer-to-peer data channel, socket, in-process pipe) sits
//! behind `ReplicationChannel`. The adapter publishes snapshots only while
//! the channel is open, and validates incoming snapshots before they may
//! replace the local copy.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use tracing::{debug, warn};

use super::message::SyncMessage;
use crate::core::{GameState, SyncError};

/// Lifecycle and data signals from a channel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ChannelEvent {
    /// The peer connected.
    Opened,
    /// The peer went away.
    Closed,
    /// The transport failed.
    Error(String),
    /// A message arrived.
    Message(SyncMessage),
}

/// A bidirectional message channel to the other side of a networked game.
pub trait ReplicationChannel {
    /// Whether messages can currently be sent.
    fn is_open(&self) -> bool;

    /// Send a message to the peer.
    fn send(&mut self, message: &SyncMessage) -> Result<(), SyncError>;

    /// Next pending event, if any.
    fn poll(&mut self) -> Option<ChannelEvent>;
}

impl<C: ReplicationChannel + ?Sized> ReplicationChannel for Box<C> {
    fn is_open(&self) -> bool {
        (**self).is_open()
    }

    fn send(&mut self, message: &SyncMessage) -> Result<(), SyncError> {
        (**self).send(message)
    }

    fn poll(&mut self) -> Option<ChannelEvent> {
        (**self).poll()
    }
}

/// Publishes and accepts whole-state snapshots.
#[derive(Debug)]
pub struct ReplicationAdapter<C> {
    channel: C,
    published: u64,
    received: u64,
}

impl<C: ReplicationChannel> ReplicationAdapter<C> {
    /// Wrap a channel.
    pub fn new(channel: C) -> Self {
        Self {
            channel,
            published: 0,
            received: 0,
        }
    }

    /// The underlying channel.
    pub fn channel(&self) -> &C {
        &self.channel
    }

    /// The underlying channel, mutably.
    pub fn channel_mut(&mut self) -> &mut C {
        &mut self.channel
    }

    /// Whether publishing would reach the peer.
    pub fn is_open(&self) -> bool {
        self.channel.is_open()
    }

    /// Snapshots sent so far.
    pub fn published(&self) -> u64 {
        self.published
    }

    /// Snapshots accepted so far.
    pub fn received(&self) -> u64 {
        self.received
    }

    /// Send the full state to the peer.
    ///
    /// Returns `Ok(false)` without sending while the channel is not open.
    pub fn publish(&mut self, state: &GameState) -> Result<bool, SyncError> {
        if !self.channel.is_open() {
            return Ok(false);
        }
        self.channel.send(&SyncMessage::state_update(state.clone()))?;
        self.published += 1;
        debug!(n = self.published, phase = ?state.phase, "snapshot published");
        Ok(true)
    }

    /// Validate an incoming message and produce the state that replaces the
    /// local copy.
    pub fn accept(&mut self, message: SyncMessage) -> Result<GameState, SyncError> {
        let mut state = message.into_state();
        state.check_shape().map_err(SyncError::Malformed)?;
        state.refresh_sets();
        self.received += 1;
        debug!(n = self.received, phase = ?state.phase, "snapshot accepted");
        Ok(state)
    }

    /// Next channel event.
    pub fn poll(&mut self) -> Option<ChannelEvent> {
        self.channel.poll()
    }
}

#[derive(Debug)]
enum Frame {
    Opened,
    Closed,
    Error(String),
    Data(String),
}

#[derive(Debug, Default)]
struct Link {
    open: bool,
    failure: Option<String>,
    inboxes: [VecDeque<Frame>; 2],
}

/// One end of an in-process channel pair.
///
/// Messages cross as JSON text, so both ends exercise the real wire codec.
#[derive(Debug)]
pub struct MemoryChannel {
    link: Rc<RefCell<Link>>,
    side: usize,
}

impl MemoryChannel {
    /// Two connected, not yet open, ends.
    #[must_use]
    pub fn pair() -> (Self, Self) {
        let link = Rc::new(RefCell::new(Link::default()));
        (
            Self {
                link: Rc::clone(&link),
                side: 0,
            },
            Self { link, side: 1 },
        )
    }

    /// Open the link; both ends see `Opened`.
    pub fn open(&self) {
        let mut link = self.link.borrow_mut();
        link.open = true;
        link.failure = None;
        for inbox in &mut link.inboxes {
            inbox.push_back(Frame::Opened);
        }
    }

    /// Close the link; the other end sees `Closed`.
    pub fn close(&self) {
        let mut link = self.link.borrow_mut();
        link.open = false;
        link.inboxes[1 - self.side].push_back(Frame::Closed);
    }

    /// Fail the link; the other end sees `Error` and later sends report it.
    pub fn fail(&self, reason: impl Into<String>) {
        let reason = reason.into();
        let mut link = self.link.borrow_mut();
        link.open = false;
        link.failure = Some(reason.clone());
        link.inboxes[1 - self.side].push_back(Frame::Error(reason));
    }

    /// Inject raw text as if the peer had sent it.
    pub fn inject_raw(&self, text: impl Into<String>) {
        self.link.borrow_mut().inboxes[self.side].push_back(Frame::Data(text.into()));
    }

    /// Frames waiting on this end.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.link.borrow().inboxes[self.side].len()
    }
}

impl ReplicationChannel for MemoryChannel {
    fn is_open(&self) -> bool {
        self.link.borrow().open
    }

    fn send(&mut self, message: &SyncMessage) -> Result<(), SyncError> {
        let text = message.to_json()?;
        let mut link = self.link.borrow_mut();
        if let Some(reason) = &link.failure {
            return Err(SyncError::Transport(reason.clone()));
        }
        if !link.open {
            return Err(SyncError::ChannelClosed);
        }
        link.inboxes[1 - self.side].push_back(Frame::Data(text));
        Ok(())
    }

    fn poll(&mut self) -> Option<ChannelEvent> {
        loop {
            let frame = self.link.borrow_mut().inboxes[self.side].pop_front()?;
            return Some(match frame {
                Frame::Opened => ChannelEvent::Opened,
                Frame::Closed => ChannelEvent::Closed,
                Frame::Error(reason) => ChannelEvent::Error(reason),
                Frame::Data(text) => match SyncMessage::from_json(&text) {
                    Ok(message) => ChannelEvent::Message(message),
                    Err(err) => {
                        warn!(error = %err, "dropping undecodable frame");
                        continue;
                    }
                },
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{Card, CardId, PropertyColor};
    use crate::core::{GameConfig, GameMode, MultiplayerRole, PlayerId};
    use crate::zones::PropertySet;

    fn snapshot() -> GameState {
        let deck = (0..12).map(|i| Card::money(CardId::new(i), 1)).collect();
        GameState::deal(&GameConfig::default(), GameMode::Networked(MultiplayerRole::Host), deck)
    }

    #[test]
    fn test_publish_only_when_open() {
        let (host, _guest) = MemoryChannel::pair();
        let mut adapter = ReplicationAdapter::new(host);

        assert!(!adapter.publish(&snapshot()).unwrap());
        assert_eq!(adapter.published(), 0);

        adapter.channel().open();
        assert!(adapter.publish(&snapshot()).unwrap());
        assert_eq!(adapter.published(), 1);
    }

    #[test]
    fn test_snapshot_crosses_the_link() {
        let (host, guest) = MemoryChannel::pair();
        host.open();
        let mut host = ReplicationAdapter::new(host);
        let mut guest = ReplicationAdapter::new(guest);

        let state = snapshot();
        host.publish(&state).unwrap();

        assert_eq!(guest.poll(), Some(ChannelEvent::Opened));
        let Some(ChannelEvent::Message(message)) = guest.poll() else {
            panic!("expected a snapshot");
        };
        assert_eq!(guest.accept(message).unwrap(), state);
        assert_eq!(guest.poll(), None);
    }

    #[test]
    fn test_accept_rejects_empty_set() {
        let (_, guest) = MemoryChannel::pair();
        let mut adapter = ReplicationAdapter::new(guest);

        let mut state = snapshot();
        state.players[PlayerId::FIRST]
            .properties
            .push_back(PropertySet::new(PropertyColor::Red));

        assert!(matches!(
            adapter.accept(SyncMessage::state_update(state)),
            Err(SyncError::Malformed(_))
        ));
        assert_eq!(adapter.received(), 0);
    }

    #[test]
    fn test_close_and_garbage() {
        let (host, mut guest) = MemoryChannel::pair();
        host.open();
        guest.inject_raw("not json");
        host.close();

        // The garbage frame is dropped
        assert_eq!(guest.poll(), Some(ChannelEvent::Opened));
        assert_eq!(guest.poll(), Some(ChannelEvent::Closed));
        assert_eq!(guest.pending(), 0);
        assert!(!guest.is_open());
        assert!(matches!(
            guest.send(&SyncMessage::state_update(snapshot())),
            Err(SyncError::ChannelClosed)
        ));
    }

    #[test]
    fn test_failed_link_reports_transport_error() {
        let (mut host, guest) = MemoryChannel::pair();
        host.open();
        guest.fail("peer reset");

        assert_eq!(host.poll(), Some(ChannelEvent::Opened));
        assert_eq!(host.poll(), Some(ChannelEvent::Error("peer reset".into())));
        assert!(matches!(
            host.send(&SyncMessage::state_update(snapshot())),
            Err(SyncError::Transport(reason)) if reason == "peer reset"
        ));

        host.open();
        assert!(host.send(&SyncMessage::state_update(snapshot())).is_ok());
    }
}
