//! Systems for the orrery.
//!
//! Organized by functionality:
//! - room_sync: Room polling and the per-frame sync tick
//! - orbit: Solar system spawning and orbit transforms
//! - remote_players: Proxy entities for remote participants
//! - picking: Ray picking and selection
//! - camera: Orbit camera rig and body follow
//! - scene: Meshes, materials, lights and camera rendering (windowed only)

pub mod camera;
pub mod orbit;
pub mod picking;
pub mod remote_players;
pub mod room_sync;
#[cfg(feature = "windowed")]
pub mod scene;

pub use camera::*;
pub use orbit::*;
pub use picking::*;
pub use remote_players::*;
pub use room_sync::*;
#[cfg(feature = "windowed")]
pub use scene::*;
