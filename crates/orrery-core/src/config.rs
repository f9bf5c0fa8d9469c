//! Runtime configuration.
//!
//! Every field has a fixed default; the page may override any subset by
//! passing a JSON object when starting the app.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::session::ElectionPolicy;

/// Configuration for the orrery room and sync behaviour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrreryConfig {
    /// Application identifier, scopes rooms to this app.
    pub app_id: String,
    /// Room every visitor joins.
    pub room_id: String,
    /// Base URL of the matchbox signaling server.
    pub signaling_url: String,
    /// How the authoritative peer is chosen.
    pub election: ElectionPolicy,
    /// Send the camera pose every N frames (1 = every frame).
    pub move_send_interval: u32,
    /// `tracing` env-filter directive.
    pub log_filter: String,
    /// DOM id of the canvas Bevy renders into.
    pub canvas_id: String,
}

impl Default for OrreryConfig {
    fn default() -> Self {
        Self {
            app_id: "fraz_solarSystem".to_string(),
            room_id: "publicRoom".to_string(),
            signaling_url: "ws://localhost:3536".to_string(),
            election: ElectionPolicy::default(),
            move_send_interval: 1,
            log_filter: "info,wgpu=error,naga=warn".to_string(),
            canvas_id: "orrery-canvas".to_string(),
        }
    }
}

impl OrreryConfig {
    /// Parse a (possibly partial) JSON override on top of the defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.move_send_interval == 0 {
            return Err(ConfigError::ZeroSendInterval);
        }
        Ok(())
    }

    /// Full signaling URL for this app's room.
    pub fn room_url(&self) -> String {
        format!(
            "{}/{}-{}",
            self.signaling_url.trim_end_matches('/'),
            self.app_id,
            self.room_id
        )
    }
}
