//! Orbit camera rig and body follow.

use bevy::prelude::*;

use crate::bevy::components::{MainCamera, OrbitCamera};
use crate::bevy::resources::{OrreryState, SelectedBody};

/// Initial eye position of the local camera.
pub const CAMERA_START: Vec3 = Vec3::new(1800.0, 0.0, 1800.0);

/// Spawn the local camera rig looking at the sun. Rendering components are
/// attached separately when a window exists.
pub fn spawn_camera_rig(mut commands: Commands) {
    commands.spawn((
        Name::new("main-camera"),
        MainCamera,
        OrbitCamera::looking_from(CAMERA_START, Vec3::ZERO),
        Transform::from_translation(CAMERA_START).looking_at(Vec3::ZERO, Vec3::Y),
    ));
}

/// Keep the rig centred on the followed body.
///
/// Selecting a body starts following it: the eye stays in place and turns to
/// the new body, then the rig moves along with it. Clearing the selection
/// does not stop following.
pub fn follow_selected_body(
    state: Res<OrreryState>,
    selection: Res<SelectedBody>,
    mut cameras: Query<&mut OrbitCamera, With<MainCamera>>,
) {
    let Ok(mut camera) = cameras.single_mut() else {
        return;
    };

    if let Some(body) = selection.0.selected().and_then(|name| state.model().body(name)) {
        if camera.following.as_deref() != Some(body.name.as_str()) {
            let eye = camera.eye();
            camera.retarget(eye, body.world_position());
            camera.following = Some(body.name.clone());
            tracing::debug!("[camera] following {}", body.name);
        }
    }

    let Some(body) = camera.following.as_deref().and_then(|name| state.model().body(name)) else {
        return;
    };
    camera.focus = body.world_position();
}

/// Write the rig's eye and look direction into the camera transform.
pub fn apply_orbit_camera(mut cameras: Query<(&OrbitCamera, &mut Transform), With<MainCamera>>) {
    for (camera, mut transform) in &mut cameras {
        *transform = Transform::from_translation(camera.eye()).looking_at(camera.focus, Vec3::Y);
    }
}

#[cfg(feature = "windowed")]
pub use input::*;

#[cfg(feature = "windowed")]
mod input {
    use bevy::input::mouse::{MouseMotion, MouseWheel};
    use bevy::prelude::*;

    use crate::bevy::components::{MainCamera, OrbitCamera};

    const ROTATE_SPEED: f32 = 0.005;
    const ZOOM_STEP: f32 = 0.9;

    /// Left drag orbits, wheel zooms.
    pub fn orbit_camera_input(
        mouse_button: Res<ButtonInput<MouseButton>>,
        mut motion: MessageReader<MouseMotion>,
        mut wheel: MessageReader<MouseWheel>,
        mut cameras: Query<&mut OrbitCamera, With<MainCamera>>,
    ) {
        let Ok(mut camera) = cameras.single_mut() else {
            motion.clear();
            wheel.clear();
            return;
        };

        if mouse_button.pressed(MouseButton::Left) {
            let delta: Vec2 = motion.read().map(|m| m.delta).sum();
            if delta != Vec2::ZERO {
                camera.rotate(-delta.x * ROTATE_SPEED, delta.y * ROTATE_SPEED);
            }
        } else {
            motion.clear();
        }

        // Pixel and line deltas differ wildly between browsers; only the sign matters.
        for event in wheel.read() {
            if event.y > 0.0 {
                camera.zoom(ZOOM_STEP);
            } else if event.y < 0.0 {
                camera.zoom(1.0 / ZOOM_STEP);
            }
        }
    }
}
