//! Peer session: connection state, remote players and authority election.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::protocol::PlayerPose;

/// Room connection state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    #[default]
    Disconnected,
    /// Socket opened, waiting for the signaling server to assign an id.
    Connecting,
    Connected,
}

/// How the authoritative peer is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElectionPolicy {
    /// A lone existing peer asserts itself to a newcomer. Authority is never
    /// given up and never re-elected.
    Heuristic,
    /// Authority is re-derived from the earliest known join time on every
    /// membership change.
    #[default]
    EarliestJoin,
}

/// Visual proxy state of a remote participant.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RemotePlayer {
    pub position: [f32; 3],
    pub orientation: [f32; 3],
}

impl RemotePlayer {
    pub fn apply(&mut self, pose: &PlayerPose) {
        self.position = pose.position;
        self.orientation = pose.orientation;
    }
}

/// What the session knows about one remote peer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PeerRecord {
    /// Unix seconds, once the peer has told us via `firstCheck`.
    pub join_time: Option<u64>,
    pub player: RemotePlayer,
}

/// Result of re-deriving authority.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthorityChange {
    Gained,
    Lost,
    Unchanged,
}

#[derive(Debug, Clone)]
pub struct PeerSession<P> {
    state: ConnectionState,
    policy: ElectionPolicy,
    local_id: Option<P>,
    local_join_time: Option<u64>,
    is_authority: bool,
    peers: BTreeMap<P, PeerRecord>,
}

impl<P: Copy + Ord> PeerSession<P> {
    pub fn new(policy: ElectionPolicy) -> Self {
        Self {
            state: ConnectionState::Disconnected,
            policy,
            local_id: None,
            local_join_time: None,
            is_authority: false,
            peers: BTreeMap::new(),
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn policy(&self) -> ElectionPolicy {
        self.policy
    }

    pub fn local_id(&self) -> Option<P> {
        self.local_id
    }

    pub fn local_join_time(&self) -> Option<u64> {
        self.local_join_time
    }

    pub fn is_authority(&self) -> bool {
        self.is_authority
    }

    pub fn is_connected(&self) -> bool {
        self.state == ConnectionState::Connected
    }

    pub fn peers(&self) -> &BTreeMap<P, PeerRecord> {
        &self.peers
    }

    pub fn peer(&self, id: P) -> Option<&PeerRecord> {
        self.peers.get(&id)
    }

    pub fn peer_count(&self) -> usize {
        self.peers.len()
    }

    pub fn begin_connect(&mut self) {
        if self.state == ConnectionState::Disconnected {
            self.state = ConnectionState::Connecting;
        }
    }

    /// Enter `Connected` and stamp the local join time. Only the first call
    /// stamps; later calls are ignored.
    pub fn mark_connected(&mut self, local_id: P, join_time: u64) -> bool {
        if self.state == ConnectionState::Connected {
            return false;
        }
        self.state = ConnectionState::Connected;
        self.local_id = Some(local_id);
        self.local_join_time = Some(join_time);
        true
    }

    /// Forget the room entirely.
    pub fn disconnect(&mut self) {
        self.state = ConnectionState::Disconnected;
        self.local_id = None;
        self.local_join_time = None;
        self.is_authority = false;
        self.peers.clear();
    }

    /// Returns false if the peer was already known.
    pub fn add_peer(&mut self, id: P) -> bool {
        if self.peers.contains_key(&id) {
            return false;
        }
        self.peers.insert(id, PeerRecord::default());
        true
    }

    pub fn remove_peer(&mut self, id: P) -> Option<PeerRecord> {
        self.peers.remove(&id)
    }

    /// Returns false for an unknown peer.
    pub fn record_join_time(&mut self, id: P, join_time: u64) -> bool {
        match self.peers.get_mut(&id) {
            Some(record) => {
                record.join_time = Some(join_time);
                true
            }
            None => false,
        }
    }

    /// Returns false for an unknown peer.
    pub fn update_player(&mut self, id: P, pose: &PlayerPose) -> bool {
        match self.peers.get_mut(&id) {
            Some(record) => {
                record.player.apply(pose);
                true
            }
            None => false,
        }
    }

    /// Take authority unconditionally.
    pub fn claim_authority(&mut self) -> AuthorityChange {
        if self.is_authority {
            AuthorityChange::Unchanged
        } else {
            self.is_authority = true;
            AuthorityChange::Gained
        }
    }

    /// Recompute authority from the earliest known `(join_time, id)`.
    ///
    /// - any known peer that sorts before us revokes authority
    /// - peers with unknown join time block gaining it but never revoke it
    /// - an empty room has no authority
    pub fn rederive_authority(&mut self) -> AuthorityChange {
        let next = self.derive_authority();
        let change = match (self.is_authority, next) {
            (false, true) => AuthorityChange::Gained,
            (true, false) => AuthorityChange::Lost,
            _ => AuthorityChange::Unchanged,
        };
        self.is_authority = next;
        change
    }

    fn derive_authority(&self) -> bool {
        let Some(local_time) = self.local_join_time else {
            return false;
        };
        if self.peers.is_empty() {
            return false;
        }

        let mut any_unknown = false;
        for (id, record) in &self.peers {
            match record.join_time {
                Some(time) if !self.sorts_before(local_time, *id, time) => return false,
                Some(_) => {}
                None => any_unknown = true,
            }
        }

        if any_unknown { self.is_authority } else { true }
    }

    /// Whether the local peer sorts strictly before `(other_time, other_id)`.
    fn sorts_before(&self, local_time: u64, other_id: P, other_time: u64) -> bool {
        match local_time.cmp(&other_time) {
            std::cmp::Ordering::Less => true,
            std::cmp::Ordering::Greater => false,
            std::cmp::Ordering::Equal => self.local_id.is_some_and(|local| local < other_id),
        }
    }
}
