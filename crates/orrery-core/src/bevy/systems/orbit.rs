//! Solar system spawning and orbit transforms.

use bevy::prelude::*;

use crate::bevy::components::{OrbitPivot, PlanetBody, Sun};
use crate::bevy::resources::OrreryState;
use crate::orbit::OrbitBody;
use crate::solar::SUN_SCALE;

/// Spawn the sun and one pivot + body pair per orbiting body.
pub fn spawn_solar_system(mut commands: Commands, state: Res<OrreryState>) {
    commands.spawn((
        Name::new("sun"),
        Sun,
        Transform::from_scale(Vec3::splat(SUN_SCALE)),
    ));

    for (index, body) in state.model().bodies().iter().enumerate() {
        commands
            .spawn((
                Name::new(format!("{}-pivot", body.name)),
                OrbitPivot { index },
                Transform::from_rotation(body.pivot_rotation()),
            ))
            .with_children(|pivot| {
                pivot.spawn((
                    Name::new(body.name.clone()),
                    PlanetBody { index },
                    body_transform(body),
                ));
            });
    }

    tracing::info!("[orbit] spawned {} bodies", state.model().len());
}

/// Body transform relative to its pivot.
pub fn body_transform(body: &OrbitBody) -> Transform {
    Transform {
        translation: Vec3::new(0.0, 0.0, body.orbit_radius),
        rotation: Quat::from_rotation_x(body.axial_tilt as f32),
        scale: Vec3::splat(body.body_scale),
    }
}

/// Copy the model's orbital phases onto the pivots.
pub fn apply_orbit_transforms(
    state: Res<OrreryState>,
    mut pivots: Query<(&OrbitPivot, &mut Transform)>,
) {
    let bodies = state.model().bodies();
    for (pivot, mut transform) in &mut pivots {
        if let Some(body) = bodies.get(pivot.index) {
            transform.rotation = body.pivot_rotation();
        }
    }
}
