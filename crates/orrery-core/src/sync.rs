//! Sync controller: the event-driven state machine tying the orbit model to
//! the peer session.
//!
//! The controller never touches the network. Room events go in through
//! [`SyncController::handle`], frames through [`SyncController::tick`], and
//! both return the messages to send.

use std::fmt::Debug;
use std::sync::Arc;

use crate::orbit::OrbitModel;
use crate::protocol::{PlayerPose, SyncMessage};
use crate::room::{Outbound, RoomEvent};
use crate::session::{AuthorityChange, ElectionPolicy, PeerSession};
use crate::util::Clock;

pub struct SyncController<P> {
    model: OrbitModel,
    session: PeerSession<P>,
    clock: Arc<dyn Clock>,
    move_send_interval: u32,
    frame: u64,
}

impl<P: Copy + Ord + Debug> SyncController<P> {
    pub fn new(model: OrbitModel, policy: ElectionPolicy, clock: Arc<dyn Clock>) -> Self {
        Self {
            model,
            session: PeerSession::new(policy),
            clock,
            move_send_interval: 1,
            frame: 0,
        }
    }

    /// Send the camera pose every `interval` frames. Zero is treated as one.
    #[must_use]
    pub fn with_move_send_interval(mut self, interval: u32) -> Self {
        self.move_send_interval = interval.max(1);
        self
    }

    pub fn model(&self) -> &OrbitModel {
        &self.model
    }

    pub fn model_mut(&mut self) -> &mut OrbitModel {
        &mut self.model
    }

    pub fn session(&self) -> &PeerSession<P> {
        &self.session
    }

    pub fn is_authority(&self) -> bool {
        self.session.is_authority()
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn begin_connect(&mut self) {
        self.session.begin_connect();
    }

    fn snapshot_message(&self) -> SyncMessage {
        SyncMessage::SendSolar {
            rotations: self.model.snapshot(),
        }
    }

    /// Run one frame: emit the local camera pose, then advance the orbits.
    pub fn tick(&mut self, dt: f64, pose: PlayerPose) -> Vec<Outbound<P>> {
        let mut out = Vec::new();
        if self.session.is_connected() && self.frame % u64::from(self.move_send_interval) == 0 {
            out.push(Outbound::broadcast(SyncMessage::PlayerMove(pose)));
        }
        self.frame += 1;
        self.model.advance(dt);
        out
    }

    /// Apply one room event.
    pub fn handle(&mut self, event: RoomEvent<P>) -> Vec<Outbound<P>> {
        let mut out = Vec::new();
        match event {
            RoomEvent::Connected { local_id } => {
                let join_time = self.clock.unix_seconds();
                if self.session.mark_connected(local_id, join_time) {
                    tracing::info!("[sync] connected as {:?}, join_time={}", local_id, join_time);
                }
            }
            RoomEvent::Disconnected => {
                tracing::info!("[sync] disconnected");
                self.session.disconnect();
            }
            RoomEvent::PeerJoined(peer) => self.on_peer_joined(peer, &mut out),
            RoomEvent::PeerLeft(peer) => self.on_peer_left(peer, &mut out),
            RoomEvent::Message { from, message } => self.on_message(from, message, &mut out),
        }
        out
    }

    fn on_peer_joined(&mut self, peer: P, out: &mut Vec<Outbound<P>>) {
        if !self.session.add_peer(peer) {
            tracing::debug!("[sync] duplicate join for {:?}", peer);
            return;
        }
        tracing::info!(
            "[sync] peer joined: {:?} (peers={})",
            peer,
            self.session.peer_count()
        );

        // An existing authority hands its state straight to the newcomer.
        if self.session.is_authority() {
            out.push(Outbound::to(peer, self.snapshot_message()));
        }

        let Some(join_time) = self.session.local_join_time() else {
            return;
        };
        match self.session.policy() {
            ElectionPolicy::Heuristic => {
                if self.session.peer_count() == 1 {
                    out.push(Outbound::to(peer, SyncMessage::FirstCheck { join_time }));
                }
            }
            ElectionPolicy::EarliestJoin => {
                out.push(Outbound::to(peer, SyncMessage::FirstCheck { join_time }));
                let change = self.session.rederive_authority();
                self.on_authority_change(change, out);
            }
        }
    }

    fn on_peer_left(&mut self, peer: P, out: &mut Vec<Outbound<P>>) {
        if self.session.remove_peer(peer).is_none() {
            return;
        }
        tracing::info!(
            "[sync] peer left: {:?} (peers={})",
            peer,
            self.session.peer_count()
        );

        if self.session.policy() == ElectionPolicy::EarliestJoin {
            let change = self.session.rederive_authority();
            self.on_authority_change(change, out);
        }
    }

    fn on_message(&mut self, from: P, message: SyncMessage, out: &mut Vec<Outbound<P>>) {
        match message {
            SyncMessage::PlayerMove(pose) => {
                if !self.session.update_player(from, &pose) {
                    tracing::trace!("[sync] move from unknown peer {:?}", from);
                }
            }
            SyncMessage::FirstCheck { join_time } => self.on_first_check(from, join_time, out),
            SyncMessage::SendSolar { rotations } => {
                // Last writer wins: no version check.
                match self.model.apply_snapshot(&rotations) {
                    Ok(()) => tracing::debug!("[sync] applied snapshot from {:?}", from),
                    Err(e) => tracing::warn!("[sync] ignoring snapshot from {:?}: {}", from, e),
                }
            }
        }
    }

    fn on_first_check(&mut self, from: P, join_time: u64, out: &mut Vec<Outbound<P>>) {
        let Some(local_time) = self.session.local_join_time() else {
            tracing::warn!("[sync] firstCheck from {:?} before we connected", from);
            return;
        };
        tracing::debug!(
            "[sync] firstCheck from {:?}: theirs={} ours={}",
            from,
            join_time,
            local_time
        );

        match self.session.policy() {
            ElectionPolicy::Heuristic => {
                if join_time > local_time {
                    if self.session.claim_authority() == AuthorityChange::Gained {
                        tracing::info!("[sync] became authority (peers={})", self.session.peer_count());
                    }
                    out.push(Outbound::broadcast(self.snapshot_message()));
                }
            }
            ElectionPolicy::EarliestJoin => {
                if !self.session.record_join_time(from, join_time) {
                    tracing::debug!("[sync] firstCheck from unknown peer {:?}", from);
                    return;
                }
                let change = self.session.rederive_authority();
                self.on_authority_change(change, out);
            }
        }
    }

    fn on_authority_change(&mut self, change: AuthorityChange, out: &mut Vec<Outbound<P>>) {
        match change {
            AuthorityChange::Gained => {
                tracing::info!("[sync] became authority (peers={})", self.session.peer_count());
                out.push(Outbound::broadcast(self.snapshot_message()));
            }
            AuthorityChange::Lost => {
                tracing::info!("[sync] gave up authority to an earlier peer");
            }
            AuthorityChange::Unchanged => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orbit::ORBIT_SPEED_SCALE;
    use crate::room::Target;
    use crate::solar;
    use crate::util::FixedClock;

    fn controller(policy: ElectionPolicy, id: u32, join_time: u64) -> SyncController<u32> {
        let model = OrbitModel::with_random_phases(solar::solar_system(), u64::from(id));
        let mut ctl = SyncController::new(model, policy, Arc::new(FixedClock(join_time)));
        ctl.begin_connect();
        ctl.handle(RoomEvent::Connected { local_id: id });
        ctl
    }

    fn first_check(from: u32, join_time: u64) -> RoomEvent<u32> {
        RoomEvent::Message {
            from,
            message: SyncMessage::FirstCheck { join_time },
        }
    }

    fn send_solar(from: u32, rotations: Vec<f64>) -> RoomEvent<u32> {
        RoomEvent::Message {
            from,
            message: SyncMessage::SendSolar { rotations },
        }
    }

    /// Deliver `out` (sent by `from`) to `to`, returning what `to` sends back.
    fn deliver(
        out: Vec<Outbound<u32>>,
        from: u32,
        to: &mut SyncController<u32>,
        to_id: u32,
    ) -> Vec<Outbound<u32>> {
        let mut replies = Vec::new();
        for o in out {
            if matches!(o.target, Target::Peer(p) if p != to_id) {
                continue;
            }
            replies.extend(to.handle(RoomEvent::Message {
                from,
                message: o.message,
            }));
        }
        replies
    }

    #[test]
    fn test_later_first_check_grants_authority() {
        for policy in [ElectionPolicy::Heuristic, ElectionPolicy::EarliestJoin] {
            let mut a = controller(policy, 1, 100);
            a.handle(RoomEvent::PeerJoined(2));

            let out = a.handle(first_check(2, 200));

            assert!(a.is_authority(), "{policy:?}");
            assert_eq!(
                out,
                vec![Outbound::broadcast(SyncMessage::SendSolar {
                    rotations: a.model().snapshot()
                })]
            );
        }
    }

    #[test]
    fn test_earlier_first_check_does_not_grant_authority() {
        for policy in [ElectionPolicy::Heuristic, ElectionPolicy::EarliestJoin] {
            let mut b = controller(policy, 2, 200);
            b.handle(RoomEvent::PeerJoined(1));

            let out = b.handle(first_check(1, 100));

            assert!(!b.is_authority(), "{policy:?}");
            assert!(out.is_empty());
        }
    }

    #[test]
    fn test_two_peer_join_scenario() {
        for policy in [ElectionPolicy::Heuristic, ElectionPolicy::EarliestJoin] {
            let mut a = controller(policy, 1, 100);
            let mut b = controller(policy, 2, 200);

            // A sees B join with exactly one known peer and asserts itself.
            let from_a = a.handle(RoomEvent::PeerJoined(2));
            assert_eq!(a.session().peer_count(), 1);
            assert_eq!(
                from_a,
                vec![Outbound::to(2, SyncMessage::FirstCheck { join_time: 100 })]
            );

            let from_b = b.handle(RoomEvent::PeerJoined(1));
            assert_eq!(
                from_b,
                vec![Outbound::to(1, SyncMessage::FirstCheck { join_time: 200 })]
            );

            // 100 > 200 is false: B stays a follower.
            assert!(deliver(from_a, 1, &mut b, 2).is_empty());
            assert!(!b.is_authority());

            // 200 > 100: A takes authority and pushes its state.
            let snapshot = deliver(from_b, 2, &mut a, 1);
            assert!(a.is_authority());
            deliver(snapshot, 1, &mut b, 2);
            assert_eq!(b.model().snapshot(), a.model().snapshot());
        }
    }

    #[test]
    fn test_heuristic_skips_first_check_with_two_known_peers() {
        let mut a = controller(ElectionPolicy::Heuristic, 1, 100);
        a.handle(RoomEvent::PeerJoined(2));

        let out = a.handle(RoomEvent::PeerJoined(3));

        assert!(out.is_empty());
    }

    #[test]
    fn test_authority_sends_snapshot_to_newcomer() {
        for policy in [ElectionPolicy::Heuristic, ElectionPolicy::EarliestJoin] {
            let mut a = controller(policy, 1, 100);
            a.handle(RoomEvent::PeerJoined(2));
            a.handle(first_check(2, 200));
            assert!(a.is_authority());

            let out = a.handle(RoomEvent::PeerJoined(3));

            assert_eq!(
                out[0],
                Outbound::to(
                    3,
                    SyncMessage::SendSolar {
                        rotations: a.model().snapshot()
                    }
                )
            );
        }
    }

    #[test]
    fn test_heuristic_never_reelects() {
        let mut b = controller(ElectionPolicy::Heuristic, 2, 200);
        b.handle(RoomEvent::PeerJoined(1));
        b.handle(RoomEvent::PeerJoined(3));
        b.handle(first_check(1, 100));

        let out = b.handle(RoomEvent::PeerLeft(1));

        assert!(out.is_empty());
        assert!(!b.is_authority());
    }

    #[test]
    fn test_earliest_join_reelects_after_authority_leaves() {
        let mut b = controller(ElectionPolicy::EarliestJoin, 2, 200);
        b.handle(RoomEvent::PeerJoined(1));
        b.handle(RoomEvent::PeerJoined(3));
        b.handle(first_check(1, 100));
        b.handle(first_check(3, 300));
        assert!(!b.is_authority());

        let out = b.handle(RoomEvent::PeerLeft(1));

        assert!(b.is_authority());
        assert_eq!(
            out,
            vec![Outbound::broadcast(SyncMessage::SendSolar {
                rotations: b.model().snapshot()
            })]
        );
    }

    #[test]
    fn test_earliest_join_three_peers_converge() {
        let times = [(1_u32, 100_u64), (2, 100), (3, 150)];
        let mut peers: Vec<SyncController<u32>> = times
            .iter()
            .map(|(id, t)| controller(ElectionPolicy::EarliestJoin, *id, *t))
            .collect();

        // Everyone joins everyone at once, then all firstChecks land.
        let mut pending: Vec<(u32, Vec<Outbound<u32>>)> = Vec::new();
        for (i, (id, _)) in times.iter().enumerate() {
            for (other, _) in &times {
                if other != id {
                    let out = peers[i].handle(RoomEvent::PeerJoined(*other));
                    pending.push((*id, out));
                }
            }
        }
        while let Some((from, out)) = pending.pop() {
            for (i, (id, _)) in times.iter().enumerate() {
                if *id == from {
                    continue;
                }
                let replies = deliver(out.clone(), from, &mut peers[i], *id);
                if !replies.is_empty() {
                    pending.push((*id, replies));
                }
            }
        }

        let authorities: Vec<bool> = peers.iter().map(SyncController::is_authority).collect();
        assert_eq!(authorities, vec![true, false, false]);
        let expected = peers[0].model().snapshot();
        assert_eq!(peers[1].model().snapshot(), expected);
        assert_eq!(peers[2].model().snapshot(), expected);
    }

    #[test]
    fn test_last_writer_wins() {
        let mut b = controller(ElectionPolicy::EarliestJoin, 2, 200);
        b.handle(RoomEvent::PeerJoined(1));
        let first = vec![0.1; 8];
        let second = vec![0.9; 8];

        b.handle(send_solar(1, first));
        b.tick(1.0, PlayerPose::default());
        b.handle(send_solar(1, second.clone()));

        assert_eq!(b.model().snapshot(), second);
    }

    #[test]
    fn test_stale_snapshot_rewinds() {
        let mut b = controller(ElectionPolicy::EarliestJoin, 2, 200);
        let stale = b.model().snapshot();
        for _ in 0..100 {
            b.tick(1.0, PlayerPose::default());
        }

        b.handle(send_solar(1, stale.clone()));

        assert_eq!(b.model().snapshot(), stale);
    }

    #[test]
    fn test_mismatched_snapshot_is_ignored() {
        let mut b = controller(ElectionPolicy::EarliestJoin, 2, 200);
        let before = b.model().snapshot();

        let out = b.handle(send_solar(1, vec![1.0, 2.0, 3.0]));

        assert!(out.is_empty());
        assert_eq!(b.model().snapshot(), before);
    }

    #[test]
    fn test_tick_sends_pose_every_frame_when_connected() {
        let mut a = controller(ElectionPolicy::EarliestJoin, 1, 100);
        let pose = PlayerPose {
            position: [1800.0, 0.0, 1800.0],
            orientation: [0.0, 0.5, 0.0],
        };
        let before = a.model().snapshot();

        for _ in 0..3 {
            let out = a.tick(1.0, pose);
            assert_eq!(out, vec![Outbound::broadcast(SyncMessage::PlayerMove(pose))]);
        }

        let mercury = a.model().bodies()[0].orbital_speed_factor;
        let advanced = a.model().snapshot()[0] - before[0];
        assert!((advanced - 3.0 * mercury * ORBIT_SPEED_SCALE).abs() < 1e-12);
    }

    #[test]
    fn test_tick_respects_send_interval() {
        let model = OrbitModel::new(solar::solar_system());
        let mut a: SyncController<u32> =
            SyncController::new(model, ElectionPolicy::EarliestJoin, Arc::new(FixedClock(1)))
                .with_move_send_interval(3);
        a.handle(RoomEvent::Connected { local_id: 1 });

        let sent: usize = (0..9).map(|_| a.tick(1.0, PlayerPose::default()).len()).sum();

        assert_eq!(sent, 3);
    }

    #[test]
    fn test_tick_silent_while_disconnected() {
        let model = OrbitModel::new(solar::solar_system());
        let mut a: SyncController<u32> =
            SyncController::new(model, ElectionPolicy::EarliestJoin, Arc::new(FixedClock(1)));

        assert!(a.tick(1.0, PlayerPose::default()).is_empty());
        assert!(a.model().snapshot()[0] > 0.0);
    }

    #[test]
    fn test_player_move_updates_proxy() {
        let mut a = controller(ElectionPolicy::EarliestJoin, 1, 100);
        a.handle(RoomEvent::PeerJoined(2));
        let pose = PlayerPose {
            position: [3.0, 4.0, 5.0],
            orientation: [0.0, 1.0, 0.0],
        };

        a.handle(RoomEvent::Message {
            from: 2,
            message: SyncMessage::PlayerMove(pose),
        });

        assert_eq!(a.session().peer(2).unwrap().player.position, [3.0, 4.0, 5.0]);

        a.handle(RoomEvent::PeerLeft(2));
        assert!(a.session().peer(2).is_none());
    }

    #[test]
    fn test_first_check_before_connect_is_ignored() {
        let model = OrbitModel::new(solar::solar_system());
        let mut a: SyncController<u32> =
            SyncController::new(model, ElectionPolicy::Heuristic, Arc::new(FixedClock(1)));

        let out = a.handle(first_check(2, 500));

        assert!(out.is_empty());
        assert!(!a.is_authority());
    }
}
