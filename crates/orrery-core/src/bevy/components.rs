//! ECS components for the orrery scene.

use bevy::prelude::*;
use uuid::Uuid;

/// Pivot at the origin carrying one body's orbital rotation.
#[derive(Component, Debug, Clone, Copy)]
pub struct OrbitPivot {
    /// Index into the orbit model.
    pub index: usize,
}

/// The body itself, a child of its [`OrbitPivot`].
#[derive(Component, Debug, Clone, Copy)]
pub struct PlanetBody {
    pub index: usize,
}

/// Marker for the sun.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Sun;

/// Proxy drawn for a remote participant's camera.
#[derive(Component, Debug, Clone, Copy)]
pub struct RemotePlayerProxy {
    pub peer: Uuid,
}

/// Marker for the local camera.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct MainCamera;

/// Orbit-style camera rig: the eye sits on a sphere around `focus`.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct OrbitCamera {
    pub focus: Vec3,
    pub radius: f32,
    /// Angle around Y, measured from +Z towards +X.
    pub yaw: f32,
    /// Elevation above the XZ plane.
    pub pitch: f32,
    /// Name of the body being followed, if any.
    pub following: Option<String>,
}

impl OrbitCamera {
    pub const MIN_RADIUS: f32 = 5.0;
    pub const MAX_RADIUS: f32 = 8000.0;
    pub const PITCH_LIMIT: f32 = std::f32::consts::FRAC_PI_2 - 0.01;

    /// Rig whose eye is at `eye`, looking at `focus`.
    pub fn looking_from(eye: Vec3, focus: Vec3) -> Self {
        let mut camera = Self {
            focus,
            radius: 1.0,
            yaw: 0.0,
            pitch: 0.0,
            following: None,
        };
        camera.retarget(eye, focus);
        camera
    }

    /// Keep the eye where it is and look at a new focus.
    pub fn retarget(&mut self, eye: Vec3, focus: Vec3) {
        let offset = eye - focus;
        let radius = offset.length().max(Self::MIN_RADIUS);
        self.focus = focus;
        self.radius = radius;
        self.yaw = offset.x.atan2(offset.z);
        self.pitch = (offset.y / radius).clamp(-1.0, 1.0).asin();
    }

    pub fn eye(&self) -> Vec3 {
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        self.focus + self.radius * Vec3::new(cos_pitch * sin_yaw, sin_pitch, cos_pitch * cos_yaw)
    }

    pub fn rotate(&mut self, delta_yaw: f32, delta_pitch: f32) {
        self.yaw += delta_yaw;
        self.pitch = (self.pitch + delta_pitch).clamp(-Self::PITCH_LIMIT, Self::PITCH_LIMIT);
    }

    pub fn zoom(&mut self, factor: f32) {
        self.radius = (self.radius * factor).clamp(Self::MIN_RADIUS, Self::MAX_RADIUS);
    }
}
