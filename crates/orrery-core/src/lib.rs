//! Orrery-Live Core Library
//!
//! A shared solar system whose orbital phases are kept in agreement across
//! browser peers in a WebRTC room.
//!
//! - `orbit` / `solar`: the orbit model and the bodies it is built from
//! - `protocol`: wire messages and their channel-tagged codec
//! - `session` / `sync`: peer bookkeeping, authority election and the sync controller
//! - `room`: transport traits and an in-memory room
//! - `bevy`: ECS plugins (headless, and windowed behind the `windowed` feature)

#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::needless_pass_by_value)]

pub mod config;
pub mod error;
pub mod orbit;
pub mod pick;
pub mod protocol;
pub mod room;
pub mod session;
pub mod solar;
pub mod sync;
pub mod util;

// Bevy integration
pub mod bevy;

pub use config::OrreryConfig;
pub use error::{ConfigError, ProtocolError, SnapshotError};
pub use orbit::{ORBIT_SPEED_SCALE, OrbitBody, OrbitModel};
pub use protocol::{Channel, PlayerPose, SyncMessage};
pub use room::{
    EventSource, MemoryHub, MemoryRoom, MessageSink, Outbound, RoomEvent, RoomTransport, Target,
};
pub use session::{ConnectionState, ElectionPolicy, PeerSession};
pub use sync::SyncController;
pub use util::{Clock, FixedClock, SystemClock};
