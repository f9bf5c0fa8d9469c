//! Meshes, materials, lights and camera rendering.

use bevy::post_process::bloom::Bloom;
use bevy::prelude::*;
use bevy::render::view::Hdr;

use crate::bevy::components::{MainCamera, PlanetBody, RemotePlayerProxy, Sun};
use crate::bevy::resources::OrreryState;
use crate::bevy::systems::remote_players::PROXY_SIZE;

/// Vertical field of view of the main camera, in degrees.
const CAMERA_FOV_DEGREES: f32 = 39.6;
const CAMERA_NEAR: f32 = 0.1;
const CAMERA_FAR: f32 = 10_000.0;

/// Faint warm fill so the night sides of the planets are not pure black.
const AMBIENT_BRIGHTNESS: f32 = 40.0;

/// Shared mesh and material handles.
#[derive(Resource)]
pub struct SceneAssets {
    pub sphere: Handle<Mesh>,
    pub cube: Handle<Mesh>,
    pub sun_material: Handle<StandardMaterial>,
    pub proxy_material: Handle<StandardMaterial>,
}

pub fn setup_scene_assets(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let sphere = meshes.add(Sphere::new(1.0).mesh().uv(48, 24));
    let cube = meshes.add(Cuboid::new(PROXY_SIZE, PROXY_SIZE, PROXY_SIZE));

    let sun_material = materials.add(StandardMaterial {
        base_color: Color::srgb(1.0, 1.0, 0.0),
        emissive: LinearRgba::rgb(6.0, 5.0, 0.5),
        ..default()
    });
    let proxy_material = materials.add(StandardMaterial {
        base_color: Color::WHITE,
        unlit: true,
        ..default()
    });

    commands.insert_resource(SceneAssets {
        sphere,
        cube,
        sun_material,
        proxy_material,
    });

    commands.spawn((
        Name::new("sun-light"),
        PointLight {
            intensity: 4.0e9,
            range: CAMERA_FAR,
            shadows_enabled: false,
            ..default()
        },
        Transform::default(),
    ));
}

/// Give the camera rig an HDR camera with bloom and ambient fill.
pub fn attach_camera_rendering(mut commands: Commands, added: Query<Entity, Added<MainCamera>>) {
    for entity in &added {
        commands.entity(entity).insert((
            Camera3d::default(),
            Hdr,
            Bloom::NATURAL,
            AmbientLight {
                color: Color::srgb(1.0, 1.0, 0.73),
                brightness: AMBIENT_BRIGHTNESS,
                ..default()
            },
            Projection::from(PerspectiveProjection {
                fov: CAMERA_FOV_DEGREES.to_radians(),
                near: CAMERA_NEAR,
                far: CAMERA_FAR,
                ..default()
            }),
        ));
    }
}

pub fn attach_sun_visuals(
    mut commands: Commands,
    assets: Option<Res<SceneAssets>>,
    added: Query<Entity, Added<Sun>>,
) {
    let Some(assets) = assets else {
        return;
    };
    for entity in &added {
        commands.entity(entity).insert((
            Mesh3d(assets.sphere.clone()),
            MeshMaterial3d(assets.sun_material.clone()),
        ));
    }
}

/// Textured sphere per body. Textures load from `textures/<file>`.
pub fn attach_body_visuals(
    mut commands: Commands,
    assets: Option<Res<SceneAssets>>,
    asset_server: Res<AssetServer>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    state: Res<OrreryState>,
    added: Query<(Entity, &PlanetBody), Added<PlanetBody>>,
) {
    let Some(assets) = assets else {
        return;
    };
    for (entity, body) in &added {
        let Some(descriptor) = state.model().bodies().get(body.index) else {
            continue;
        };
        let material = materials.add(StandardMaterial {
            base_color_texture: Some(asset_server.load(format!("textures/{}", descriptor.texture))),
            perceptual_roughness: 1.0,
            metallic: 0.0,
            ..default()
        });
        commands
            .entity(entity)
            .insert((Mesh3d(assets.sphere.clone()), MeshMaterial3d(material)));
    }
}

pub fn attach_proxy_visuals(
    mut commands: Commands,
    assets: Option<Res<SceneAssets>>,
    added: Query<Entity, Added<RemotePlayerProxy>>,
) {
    let Some(assets) = assets else {
        return;
    };
    for entity in &added {
        commands.entity(entity).insert((
            Mesh3d(assets.cube.clone()),
            MeshMaterial3d(assets.proxy_material.clone()),
        ));
    }
}
