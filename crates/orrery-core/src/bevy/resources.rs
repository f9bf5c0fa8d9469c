//! ECS resources for the orrery.

use std::collections::HashMap;
use std::sync::Arc;

use bevy::prelude::*;
use uuid::Uuid;

use crate::config::OrreryConfig;
use crate::orbit::OrbitModel;
use crate::pick::Selection;
use crate::room::RoomTransport;
use crate::solar;
use crate::sync::SyncController;
use crate::util::Clock;

/// Sync controller owning the orbit model and peer session.
#[derive(Resource)]
pub struct OrreryState {
    pub controller: SyncController<Uuid>,
}

impl OrreryState {
    /// Solar system with seeded random phases, configured from `config`.
    pub fn new(config: &OrreryConfig, seed: u64, clock: Arc<dyn Clock>) -> Self {
        let model = OrbitModel::with_random_phases(solar::solar_system(), seed);
        let controller = SyncController::new(model, config.election, clock)
            .with_move_send_interval(config.move_send_interval);
        Self { controller }
    }

    pub fn model(&self) -> &OrbitModel {
        self.controller.model()
    }
}

/// The room this app is connected to. Absent when running offline.
#[derive(Resource)]
pub struct RoomLink(pub Box<dyn RoomTransport>);

impl RoomLink {
    pub fn new(transport: impl RoomTransport + 'static) -> Self {
        Self(Box::new(transport))
    }
}

/// Proxy entity spawned for each remote peer.
#[derive(Resource, Debug, Default)]
pub struct RemoteProxies(pub HashMap<Uuid, Entity>);

/// The currently selected body.
#[derive(Resource, Debug, Default)]
pub struct SelectedBody(pub Selection);

/// Left-button press tracking, used to tell a click from an orbit drag.
#[derive(Resource, Debug, Default)]
pub struct PointerPress {
    pub start: Option<Vec2>,
}
