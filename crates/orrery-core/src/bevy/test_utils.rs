//! Test utilities for headless Bevy integration tests.
//!
//! Provides `TestApp`, a wrapper around `bevy::app::App` that uses
//! `MinimalPlugins` + `OrreryHeadlessPlugin` with a fixed clock and a
//! fixed frame duration.

use std::sync::Arc;
use std::time::Duration;

use bevy::math::Ray3d;
use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;

use crate::bevy::components::{MainCamera, OrbitCamera};
use crate::bevy::events::PickRequest;
use crate::bevy::plugin::{DEFAULT_SEED, OrreryHeadlessPlugin};
use crate::bevy::resources::{OrreryState, RoomLink};
use crate::config::OrreryConfig;
use crate::room::RoomTransport;
use crate::util::FixedClock;

/// A headless Bevy app wrapper for testing.
pub(crate) struct TestApp {
    pub app: App,
}

impl TestApp {
    /// Create a test app whose clock always reads `join_time`.
    pub fn new(join_time: u64) -> Self {
        Self::with_seed(join_time, DEFAULT_SEED)
    }

    pub fn with_seed(join_time: u64, seed: u64) -> Self {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.add_plugins(OrreryHeadlessPlugin {
            config: OrreryConfig::default(),
            seed,
            clock: Arc::new(FixedClock(join_time)),
        });
        // Every frame lasts exactly 1/60 s.
        app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f64(
            1.0 / 60.0,
        )));
        // Run Startup
        app.update();
        Self { app }
    }

    pub fn update(&mut self) {
        self.app.update();
    }

    pub fn update_n(&mut self, n: usize) {
        for _ in 0..n {
            self.app.update();
        }
    }

    /// Connect to a room. Takes effect on the next update.
    pub fn attach(&mut self, room: impl RoomTransport + 'static) {
        self.app.insert_resource(RoomLink::new(room));
    }

    /// Drop the room link, leaving the room.
    pub fn detach(&mut self) {
        self.app.world_mut().remove_resource::<RoomLink>();
    }

    pub fn pick(&mut self, ray: Ray3d) {
        self.app.world_mut().write_message(PickRequest { ray });
    }

    pub fn state(&self) -> &OrreryState {
        self.app.world().resource::<OrreryState>()
    }

    pub fn snapshot(&self) -> Vec<f64> {
        self.state().model().snapshot()
    }

    pub fn main_camera(&mut self) -> OrbitCamera {
        let world = self.app.world_mut();
        let mut query = world.query_filtered::<&OrbitCamera, With<MainCamera>>();
        query.single(world).cloned().expect("main camera rig")
    }
}
