//! Bevy integration for the orrery.
//!
//! This module wires the orbit model and peer sync into Bevy ECS:
//! components for pivots, bodies and remote players, resources holding the
//! sync controller and room link, and systems for both headless and
//! windowed runs.

pub mod components;
pub mod events;
pub mod plugin;
pub mod resources;
pub mod systems;

#[cfg(test)]
pub(crate) mod test_utils;

pub use components::*;
pub use events::*;
#[cfg(feature = "windowed")]
pub use plugin::OrreryUnifiedPlugin;
pub use plugin::{DEFAULT_SEED, OrreryHeadlessPlugin};
pub use resources::*;
