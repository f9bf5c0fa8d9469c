//! Ray picking and selection.

use bevy::prelude::*;

use crate::bevy::components::RemotePlayerProxy;
use crate::bevy::events::{PickRequest, SelectionChanged};
use crate::bevy::resources::{OrreryState, SelectedBody};
use crate::bevy::systems::remote_players::PROXY_SIZE;
use crate::pick::{self, PickKind, PickTarget};
use crate::solar::SUN_SCALE;

/// Bounding sphere radius of a proxy cube.
const PROXY_PICK_RADIUS: f32 = PROXY_SIZE * 0.5 * 1.732_050_8;

/// Resolve pick rays against bodies, the sun and remote players.
pub fn handle_pick_requests(
    mut requests: MessageReader<PickRequest>,
    state: Res<OrreryState>,
    mut selection: ResMut<SelectedBody>,
    proxies: Query<&Transform, With<RemotePlayerProxy>>,
    mut changed: MessageWriter<SelectionChanged>,
) {
    for request in requests.read() {
        let model = state.model();

        let mut targets = pick::body_targets(model);
        targets.push(PickTarget {
            kind: PickKind::Occluder,
            center: Vec3::ZERO,
            radius: SUN_SCALE,
        });
        targets.extend(proxies.iter().map(|transform| PickTarget {
            kind: PickKind::Occluder,
            center: transform.translation,
            radius: PROXY_PICK_RADIUS,
        }));

        let hit = pick::pick(&request.ray, &targets);
        let selected = selection.0.apply_pick(hit, model).map(str::to_string);
        tracing::debug!("[pick] selected {:?}", selected);
        changed.write(SelectionChanged { selected });
    }
}

#[cfg(feature = "windowed")]
pub use pointer::*;

#[cfg(feature = "windowed")]
mod pointer {
    use bevy::prelude::*;
    use bevy::window::PrimaryWindow;

    use crate::bevy::components::MainCamera;
    use crate::bevy::events::PickRequest;
    use crate::bevy::resources::PointerPress;

    /// Cursor travel (pixels) beyond which a press is an orbit drag, not a click.
    const CLICK_SLOP: f32 = 4.0;

    /// Turn a left click on the canvas into a [`PickRequest`].
    pub fn emit_pick_on_click(
        mouse_button: Res<ButtonInput<MouseButton>>,
        windows: Query<&Window, With<PrimaryWindow>>,
        cameras: Query<(&Camera, &GlobalTransform), With<MainCamera>>,
        mut press: ResMut<PointerPress>,
        mut requests: MessageWriter<PickRequest>,
    ) {
        let Ok(window) = windows.single() else {
            return;
        };
        let cursor = window.cursor_position();

        if mouse_button.just_pressed(MouseButton::Left) {
            press.start = cursor;
        }
        if !mouse_button.just_released(MouseButton::Left) {
            return;
        }

        let (Some(start), Some(cursor)) = (press.start.take(), cursor) else {
            return;
        };
        if start.distance(cursor) > CLICK_SLOP {
            return;
        }

        let Ok((camera, camera_transform)) = cameras.single() else {
            return;
        };
        match camera.viewport_to_world(camera_transform, cursor) {
            Ok(ray) => {
                requests.write(PickRequest { ray });
            }
            Err(e) => tracing::debug!("[pick] no ray for cursor: {:?}", e),
        }
    }
}
