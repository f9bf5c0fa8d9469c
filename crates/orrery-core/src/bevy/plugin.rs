//! Bevy plugins for the orrery.
//!
//! Provides:
//! - `OrreryHeadlessPlugin`: Orbit model, room sync, remote players, picking and camera
//!   logic without window or render dependencies
//! - `OrreryUnifiedPlugin`: `OrreryHeadlessPlugin` + meshes, lighting, bloom and pointer input

use std::sync::Arc;

use bevy::prelude::*;

use crate::bevy::events::*;
use crate::bevy::resources::*;
use crate::bevy::systems;
use crate::config::OrreryConfig;
use crate::util::{Clock, SystemClock};

/// Fixed seed for reproducible runs (tests).
pub const DEFAULT_SEED: u64 = 12345;

/// Fresh seed per app, so every peer starts from its own phases until the
/// authority's snapshot arrives.
pub fn entropy_seed() -> u64 {
    rand::random()
}

// ============================================================================
// Headless Plugin (logic only, no rendering/window dependencies)
// ============================================================================

/// Headless plugin containing all orrery logic.
///
/// Use this plugin in tests with `MinimalPlugins`. A room is attached by
/// inserting a [`RoomLink`] resource; without one the orbits still run
/// locally.
///
/// Excluded systems (rendering-dependent):
/// - Mesh, material and light setup
/// - Camera3d / bloom attachment
/// - Pointer input (orbit drag, wheel zoom, click to pick)
pub struct OrreryHeadlessPlugin {
    pub config: OrreryConfig,
    pub seed: u64,
    pub clock: Arc<dyn Clock>,
}

impl Default for OrreryHeadlessPlugin {
    fn default() -> Self {
        Self {
            config: OrreryConfig::default(),
            seed: entropy_seed(),
            clock: Arc::new(SystemClock),
        }
    }
}

impl Plugin for OrreryHeadlessPlugin {
    fn build(&self, app: &mut App) {
        // ====================================================================
        // Resources
        // ====================================================================
        app.insert_resource(OrreryState::new(&self.config, self.seed, self.clock.clone()))
            .insert_resource(RemoteProxies::default())
            .insert_resource(SelectedBody::default());

        // ====================================================================
        // Messages
        // ====================================================================
        app.add_message::<PickRequest>()
            .add_message::<SelectionChanged>();

        // ====================================================================
        // Scene
        // ====================================================================
        app.add_systems(
            Startup,
            (systems::spawn_solar_system, systems::spawn_camera_rig),
        );

        // ====================================================================
        // Sync and simulation
        // ====================================================================
        app.add_systems(
            Update,
            (
                systems::poll_room,
                systems::handle_pick_requests,
                systems::tick_session,
                systems::apply_orbit_transforms,
                systems::sync_remote_players,
                systems::follow_selected_body,
                systems::apply_orbit_camera,
            )
                .chain(),
        );
    }
}

// ============================================================================
// Unified Plugin (headless + rendering)
// ============================================================================

/// Unified plugin for the browser client.
///
/// Includes `OrreryHeadlessPlugin` for all logic, plus systems that require
/// `Window`, `Mesh3d`, `StandardMaterial` and `Camera3d`.
#[cfg(feature = "windowed")]
pub struct OrreryUnifiedPlugin {
    pub config: OrreryConfig,
    pub seed: u64,
}

#[cfg(feature = "windowed")]
impl OrreryUnifiedPlugin {
    pub fn new(config: OrreryConfig) -> Self {
        Self {
            config,
            seed: entropy_seed(),
        }
    }
}

#[cfg(feature = "windowed")]
impl Plugin for OrreryUnifiedPlugin {
    fn build(&self, app: &mut App) {
        // ====================================================================
        // Headless logic
        // ====================================================================
        app.add_plugins(OrreryHeadlessPlugin {
            config: self.config.clone(),
            seed: self.seed,
            clock: Arc::new(SystemClock),
        });

        app.insert_resource(ClearColor(Color::BLACK))
            .insert_resource(PointerPress::default());

        // ====================================================================
        // Rendering
        // ====================================================================
        app.add_systems(Startup, systems::setup_scene_assets);
        app.add_systems(
            Update,
            (
                systems::attach_camera_rendering,
                systems::attach_sun_visuals,
                systems::attach_body_visuals,
                systems::attach_proxy_visuals,
            )
                .after(systems::sync_remote_players),
        );

        // ====================================================================
        // Pointer input, before picks are resolved
        // ====================================================================
        app.add_systems(
            Update,
            (systems::emit_pick_on_click, systems::orbit_camera_input)
                .before(systems::handle_pick_requests),
        );
    }
}
