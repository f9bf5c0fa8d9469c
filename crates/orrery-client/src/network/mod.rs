//! Room transport over a matchbox WebRTC socket.

mod matchbox_room;

pub use matchbox_room::MatchboxRoom;
