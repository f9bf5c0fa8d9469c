//! Room polling and the per-frame sync tick.

use bevy::prelude::*;

use crate::bevy::components::MainCamera;
use crate::bevy::resources::{OrreryState, RoomLink};
use crate::protocol::PlayerPose;
use crate::room::RoomEvent;
use crate::session::ConnectionState;

/// Orbit speeds are tuned per frame at this rate.
pub const REFERENCE_FRAME_RATE: f64 = 60.0;

/// Drain room events into the controller and send whatever it answers with.
/// A removed [`RoomLink`] disconnects the session.
pub fn poll_room(mut state: ResMut<OrreryState>, room: Option<ResMut<RoomLink>>) {
    let Some(mut room) = room else {
        if state.controller.session().state() != ConnectionState::Disconnected {
            tracing::info!("[sync] room link removed");
            state.controller.handle(RoomEvent::Disconnected);
        }
        return;
    };

    if room.is_added() {
        tracing::info!("[sync] room attached, waiting for id");
        state.controller.begin_connect();
    }

    for event in room.0.drain_events() {
        for outbound in state.controller.handle(event) {
            room.0.send(outbound);
        }
    }
}

/// Advance the orbits and broadcast the local camera pose.
pub fn tick_session(
    time: Res<Time>,
    mut state: ResMut<OrreryState>,
    room: Option<ResMut<RoomLink>>,
    cameras: Query<&Transform, With<MainCamera>>,
) {
    let pose = cameras.single().map(pose_of).unwrap_or_default();
    let dt = time.delta_secs_f64() * REFERENCE_FRAME_RATE;

    let outbound = state.controller.tick(dt, pose);
    if let Some(mut room) = room {
        for message in outbound {
            room.0.send(message);
        }
    }
}

/// Wire pose of a camera transform: translation plus XYZ euler angles.
pub fn pose_of(transform: &Transform) -> PlayerPose {
    let (x, y, z) = transform.rotation.to_euler(EulerRot::XYZ);
    PlayerPose {
        position: transform.translation.to_array(),
        orientation: [x, y, z],
    }
}

/// Inverse of [`pose_of`].
pub fn transform_of(position: [f32; 3], orientation: [f32; 3]) -> Transform {
    let [x, y, z] = orientation;
    Transform::from_translation(Vec3::from_array(position))
        .with_rotation(Quat::from_euler(EulerRot::XYZ, x, y, z))
}
