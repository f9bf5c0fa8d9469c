//! [`RoomTransport`] backed by `matchbox_socket`.
//!
//! One reliable data channel carries every sync message as a tagged frame.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use matchbox_socket::{PeerId, PeerState, WebRtcSocket};
use orrery_core::room::{EventSource, MessageSink, Outbound, RoomEvent, RoomTransport, Target};
use orrery_core::SyncMessage;
use uuid::Uuid;

const CHANNEL: usize = 0;

/// Wrapper around `WebRtcSocket` that implements Send/Sync for WASM.
///
/// # Safety
/// WASM runs on a single thread, so there are no data races.
struct SocketWrapper(WebRtcSocket);

#[allow(unsafe_code)]
unsafe impl Send for SocketWrapper {}
#[allow(unsafe_code)]
unsafe impl Sync for SocketWrapper {}

pub struct MatchboxRoom {
    socket: SocketWrapper,
    /// Set once the socket's message loop has ended.
    closed: Arc<AtomicBool>,
    local_id: Option<Uuid>,
    closed_reported: bool,
}

impl MatchboxRoom {
    /// Open a reliable socket to `room_url` and drive it on the browser's
    /// event loop.
    pub fn connect(room_url: &str) -> Self {
        tracing::info!("[room] connecting to {}", room_url);
        let (socket, loop_fut) = WebRtcSocket::new_reliable(room_url);

        let closed = Arc::new(AtomicBool::new(false));
        let loop_closed = closed.clone();
        wasm_bindgen_futures::spawn_local(async move {
            match loop_fut.await {
                Ok(()) => tracing::info!("[room] socket closed"),
                Err(e) => tracing::warn!("[room] socket failed: {:?}", e),
            }
            loop_closed.store(true, Ordering::SeqCst);
        });

        Self {
            socket: SocketWrapper(socket),
            closed,
            local_id: None,
            closed_reported: false,
        }
    }
}

impl EventSource<Uuid> for MatchboxRoom {
    fn drain_events(&mut self) -> Vec<RoomEvent<Uuid>> {
        let mut events = Vec::new();
        if self.closed_reported {
            return events;
        }

        // Peers are only reported once we know who we are, so the session
        // always sees Connected first.
        if self.local_id.is_none() {
            if let Some(id) = self.socket.0.id() {
                self.local_id = Some(id.0);
                events.push(RoomEvent::Connected { local_id: id.0 });
            }
        }

        if self.local_id.is_some() {
            for (peer, state) in self.socket.0.update_peers() {
                events.push(match state {
                    PeerState::Connected => RoomEvent::PeerJoined(peer.0),
                    PeerState::Disconnected => RoomEvent::PeerLeft(peer.0),
                });
            }

            for (peer, packet) in self.socket.0.channel_mut(CHANNEL).receive() {
                match SyncMessage::decode(&packet) {
                    Ok(message) => events.push(RoomEvent::Message {
                        from: peer.0,
                        message,
                    }),
                    Err(e) => tracing::warn!("[room] dropping frame from {}: {}", peer, e),
                }
            }
        }

        if self.closed.load(Ordering::SeqCst) {
            self.closed_reported = true;
            events.push(RoomEvent::Disconnected);
        }
        events
    }
}

impl MessageSink<Uuid> for MatchboxRoom {
    fn send(&mut self, outbound: Outbound<Uuid>) {
        if self.closed_reported {
            return;
        }
        let packet: Box<[u8]> = match outbound.message.encode() {
            Ok(frame) => frame.into_boxed_slice(),
            Err(e) => {
                tracing::warn!(
                    "[room] dropping unencodable {}: {}",
                    outbound.message.channel().name(),
                    e
                );
                return;
            }
        };

        let peers: Vec<PeerId> = match outbound.target {
            Target::All => self.socket.0.connected_peers().collect(),
            Target::Peer(id) => vec![PeerId::from(id)],
        };
        let channel = self.socket.0.channel_mut(CHANNEL);
        for peer in peers {
            channel.send(packet.clone(), peer);
        }
    }
}

impl RoomTransport for MatchboxRoom {
    fn local_id(&self) -> Option<Uuid> {
        self.local_id
    }
}
