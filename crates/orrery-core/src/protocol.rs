//! Sync message protocol.
//!
//! Three logical channels share one ordered data channel. A frame is a
//! one-byte channel tag followed by the postcard-encoded payload.

use serde::{Deserialize, Serialize};

use crate::error::ProtocolError;

/// Channel tags.
pub mod channel_tag {
    pub const PLAYER_MOVE: u8 = 0x01;
    pub const FIRST_CHECK: u8 = 0x02;
    pub const SEND_SOLAR: u8 = 0x03;
}

/// Logical message channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    PlayerMove,
    FirstCheck,
    SendSolar,
}

impl Channel {
    /// Action name shared with other peers.
    pub fn name(self) -> &'static str {
        match self {
            Channel::PlayerMove => "playerMove",
            Channel::FirstCheck => "firstCheck",
            Channel::SendSolar => "sendSolar",
        }
    }

    pub fn tag(self) -> u8 {
        match self {
            Channel::PlayerMove => channel_tag::PLAYER_MOVE,
            Channel::FirstCheck => channel_tag::FIRST_CHECK,
            Channel::SendSolar => channel_tag::SEND_SOLAR,
        }
    }

    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            channel_tag::PLAYER_MOVE => Some(Channel::PlayerMove),
            channel_tag::FIRST_CHECK => Some(Channel::FirstCheck),
            channel_tag::SEND_SOLAR => Some(Channel::SendSolar),
            _ => None,
        }
    }
}

/// A peer's camera pose.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerPose {
    pub position: [f32; 3],
    /// Euler XYZ angles (radians).
    pub orientation: [f32; 3],
}

/// Sync messages.
#[derive(Debug, Clone, PartialEq)]
pub enum SyncMessage {
    /// Camera pose, sent every frame.
    PlayerMove(PlayerPose),
    /// Sender's join time in unix seconds.
    FirstCheck { join_time: u64 },
    /// Full orbital phase snapshot, one entry per body.
    SendSolar { rotations: Vec<f64> },
}

impl SyncMessage {
    pub fn channel(&self) -> Channel {
        match self {
            SyncMessage::PlayerMove(_) => Channel::PlayerMove,
            SyncMessage::FirstCheck { .. } => Channel::FirstCheck,
            SyncMessage::SendSolar { .. } => Channel::SendSolar,
        }
    }

    /// Encode the message to a tagged frame.
    pub fn encode(&self) -> Result<Vec<u8>, ProtocolError> {
        let buf = vec![self.channel().tag()];
        let buf = match self {
            SyncMessage::PlayerMove(pose) => postcard::to_extend(pose, buf)?,
            SyncMessage::FirstCheck { join_time } => postcard::to_extend(join_time, buf)?,
            SyncMessage::SendSolar { rotations } => postcard::to_extend(rotations, buf)?,
        };
        Ok(buf)
    }

    /// Decode a tagged frame.
    pub fn decode(data: &[u8]) -> Result<Self, ProtocolError> {
        let (&tag, payload) = data.split_first().ok_or(ProtocolError::Empty)?;
        let channel = Channel::from_tag(tag).ok_or(ProtocolError::UnknownChannel(tag))?;

        let message = match channel {
            Channel::PlayerMove => SyncMessage::PlayerMove(postcard::from_bytes(payload)?),
            Channel::FirstCheck => SyncMessage::FirstCheck {
                join_time: postcard::from_bytes(payload)?,
            },
            Channel::SendSolar => SyncMessage::SendSolar {
                rotations: postcard::from_bytes(payload)?,
            },
        };
        Ok(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_starts_with_channel_tag() {
        let msg = SyncMessage::FirstCheck { join_time: 1_700_000_000 };
        let encoded = msg.encode().unwrap();

        assert_eq!(encoded[0], channel_tag::FIRST_CHECK);
        assert_eq!(SyncMessage::decode(&encoded).unwrap(), msg);
    }

    #[test]
    fn test_solar_snapshot_survives_codec() {
        let rotations = vec![0.0, 1.5, -3.25, 6.283_185_307_179_586, 1e-12, 42.0, 7.0, 8.0];
        let msg = SyncMessage::SendSolar { rotations: rotations.clone() };

        let decoded = SyncMessage::decode(&msg.encode().unwrap()).unwrap();

        assert_eq!(decoded, SyncMessage::SendSolar { rotations });
    }

    #[test]
    fn test_player_move_frame_size() {
        let msg = SyncMessage::PlayerMove(PlayerPose {
            position: [1800.0, 0.0, 1800.0],
            orientation: [0.0, 0.785, 0.0],
        });
        let encoded = msg.encode().unwrap();

        // Tag + six little-endian f32s.
        assert_eq!(encoded.len(), 1 + 24);
        assert_eq!(SyncMessage::decode(&encoded).unwrap(), msg);
    }

    #[test]
    fn test_decode_rejects_bad_frames() {
        assert!(matches!(SyncMessage::decode(&[]), Err(ProtocolError::Empty)));
        assert!(matches!(
            SyncMessage::decode(&[0x7F, 0, 0]),
            Err(ProtocolError::UnknownChannel(0x7F))
        ));
        assert!(matches!(
            SyncMessage::decode(&[channel_tag::PLAYER_MOVE, 1, 2]),
            Err(ProtocolError::Payload(_))
        ));
    }

    #[test]
    fn test_channel_names() {
        assert_eq!(Channel::PlayerMove.name(), "playerMove");
        assert_eq!(Channel::FirstCheck.name(), "firstCheck");
        assert_eq!(Channel::SendSolar.name(), "sendSolar");
        assert_eq!(Channel::from_tag(Channel::SendSolar.tag()), Some(Channel::SendSolar));
    }
}
