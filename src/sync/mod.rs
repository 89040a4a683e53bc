//! Networked play by whole-snapshot replication.
//!
//! - `message`: the `STATE_UPDATE` wire message and snapshot codecs
//! - `adapter`: publishing and accepting snapshots over a channel

pub mod adapter;
pub mod message;

pub use adapter::{ChannelEvent, MemoryChannel, ReplicationAdapter, ReplicationChannel};
pub use message::{decode_snapshot, encode_snapshot, SyncMessage};
