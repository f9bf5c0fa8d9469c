//! Room transport abstraction.
//!
//! A room is split into an inbound [`EventSource`], drained once per frame,
//! and an outbound [`MessageSink`]. Both speak typed [`SyncMessage`]s; the
//! wire codec lives behind the concrete transport.

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::Mutex;
use uuid::Uuid;

use crate::protocol::SyncMessage;

/// Inbound room event.
#[derive(Debug, Clone, PartialEq)]
pub enum RoomEvent<P> {
    /// The signaling server assigned us an id.
    Connected { local_id: P },
    /// The room was torn down locally or by the server.
    Disconnected,
    PeerJoined(P),
    PeerLeft(P),
    Message { from: P, message: SyncMessage },
}

/// Delivery target of an outbound message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target<P> {
    /// Every currently connected peer.
    All,
    Peer(P),
}

/// A message queued for sending.
#[derive(Debug, Clone, PartialEq)]
pub struct Outbound<P> {
    pub target: Target<P>,
    pub message: SyncMessage,
}

impl<P> Outbound<P> {
    pub fn broadcast(message: SyncMessage) -> Self {
        Self {
            target: Target::All,
            message,
        }
    }

    pub fn to(peer: P, message: SyncMessage) -> Self {
        Self {
            target: Target::Peer(peer),
            message,
        }
    }
}

/// Inbound half of a room. Each call yields the events that arrived since
/// the previous call; events are never replayed.
pub trait EventSource<P> {
    fn drain_events(&mut self) -> Vec<RoomEvent<P>>;
}

/// Outbound half of a room. Delivery is best-effort.
pub trait MessageSink<P> {
    fn send(&mut self, outbound: Outbound<P>);
}

/// A room over uuid peer ids that can live in an ECS resource.
pub trait RoomTransport: EventSource<Uuid> + MessageSink<Uuid> + Send + Sync {
    fn local_id(&self) -> Option<Uuid>;
}

// ============================================================================
// In-memory room
// ============================================================================

#[derive(Default)]
struct HubState {
    /// Per-member inbox of pending events.
    inboxes: BTreeMap<Uuid, Vec<RoomEvent<Uuid>>>,
}

/// An in-process room. Frames still pass through the wire codec so the
/// behaviour matches a real data channel.
#[derive(Clone, Default)]
pub struct MemoryHub {
    state: Arc<Mutex<HubState>>,
}

impl MemoryHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a member. It sees itself connect, then every existing member
    /// joins; existing members see it join.
    pub fn join(&self) -> MemoryRoom {
        let id = Uuid::new_v4();
        self.join_as(id)
    }

    /// Add a member with a chosen id.
    pub fn join_as(&self, id: Uuid) -> MemoryRoom {
        let mut state = self.state.lock();

        let mut own = vec![RoomEvent::Connected { local_id: id }];
        for (other, inbox) in &mut state.inboxes {
            inbox.push(RoomEvent::PeerJoined(id));
            own.push(RoomEvent::PeerJoined(*other));
        }
        state.inboxes.insert(id, own);

        MemoryRoom {
            id,
            hub: self.clone(),
        }
    }

    fn leave(&self, id: Uuid) {
        let mut state = self.state.lock();
        if state.inboxes.remove(&id).is_none() {
            return;
        }
        for inbox in state.inboxes.values_mut() {
            inbox.push(RoomEvent::PeerLeft(id));
        }
    }

    fn deliver(&self, from: Uuid, outbound: Outbound<Uuid>) {
        let frame = match outbound.message.encode() {
            Ok(frame) => frame,
            Err(e) => {
                tracing::warn!("[room] dropping unencodable message: {}", e);
                return;
            }
        };

        let mut state = self.state.lock();
        let targets: Vec<Uuid> = match outbound.target {
            Target::All => state.inboxes.keys().copied().filter(|id| *id != from).collect(),
            Target::Peer(peer) => vec![peer],
        };

        for target in targets {
            let Some(inbox) = state.inboxes.get_mut(&target) else {
                continue;
            };
            match SyncMessage::decode(&frame) {
                Ok(message) => inbox.push(RoomEvent::Message { from, message }),
                Err(e) => tracing::warn!("[room] dropping malformed frame: {}", e),
            }
        }
    }

    fn drain(&self, id: Uuid) -> Vec<RoomEvent<Uuid>> {
        let mut state = self.state.lock();
        state
            .inboxes
            .get_mut(&id)
            .map(std::mem::take)
            .unwrap_or_default()
    }
}

/// One member's handle on a [`MemoryHub`]. Dropping it leaves the room.
pub struct MemoryRoom {
    id: Uuid,
    hub: MemoryHub,
}

impl MemoryRoom {
    pub fn id(&self) -> Uuid {
        self.id
    }
}

impl Drop for MemoryRoom {
    fn drop(&mut self) {
        self.hub.leave(self.id);
    }
}

impl EventSource<Uuid> for MemoryRoom {
    fn drain_events(&mut self) -> Vec<RoomEvent<Uuid>> {
        self.hub.drain(self.id)
    }
}

impl MessageSink<Uuid> for MemoryRoom {
    fn send(&mut self, outbound: Outbound<Uuid>) {
        self.hub.deliver(self.id, outbound);
    }
}

impl RoomTransport for MemoryRoom {
    fn local_id(&self) -> Option<Uuid> {
        Some(self.id)
    }
}
