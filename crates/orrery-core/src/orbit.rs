//! Orbit model: the set of bodies and their current orbital phase.
//!
//! Each body hangs off a pivot at the origin. The pivot is tilted by the
//! orbital plane offset around X and spun by `root_rotation_y` around Y; the
//! body itself sits `orbit_radius` along the pivot's local Z axis.

use std::f64::consts::TAU;

use bevy::math::{Quat, Vec3};
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::error::SnapshotError;

/// Phase advanced per frame per unit of orbital speed.
pub const ORBIT_SPEED_SCALE: f64 = 0.0001;

/// A single orbiting body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrbitBody {
    /// Unique key, also the id of the body's info panel.
    pub name: String,
    pub orbital_speed_factor: f64,
    /// Tilt of the orbital plane around X (radians).
    pub orbital_plane_offset: f64,
    /// Tilt of the body's own axis around X (radians).
    pub axial_tilt: f64,
    /// Current orbital phase around Y (radians). Unbounded.
    pub root_rotation_y: f64,
    /// Distance from the pivot.
    pub orbit_radius: f32,
    /// Uniform scale of the unit sphere mesh.
    pub body_scale: f32,
    /// Texture file name under `textures/`.
    pub texture: String,
}

impl OrbitBody {
    /// Rotation of the body's pivot.
    pub fn pivot_rotation(&self) -> Quat {
        Quat::from_rotation_x(self.orbital_plane_offset as f32)
            * Quat::from_rotation_y(self.root_rotation_y as f32)
    }

    /// World-space centre of the body.
    pub fn world_position(&self) -> Vec3 {
        self.pivot_rotation() * Vec3::new(0.0, 0.0, self.orbit_radius)
    }
}

/// Ordered collection of bodies. Order is creation order and must match on
/// every peer, since snapshots are positional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrbitModel {
    bodies: Vec<OrbitBody>,
}

impl OrbitModel {
    pub fn new(bodies: Vec<OrbitBody>) -> Self {
        Self { bodies }
    }

    /// Build a model whose starting phases are drawn uniformly from `[0, 2π)`.
    pub fn with_random_phases(mut bodies: Vec<OrbitBody>, seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        for body in &mut bodies {
            body.root_rotation_y = rng.random_range(0.0..TAU);
        }
        Self { bodies }
    }

    pub fn bodies(&self) -> &[OrbitBody] {
        &self.bodies
    }

    pub fn body(&self, name: &str) -> Option<&OrbitBody> {
        self.bodies.iter().find(|b| b.name == name)
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.bodies.iter().position(|b| b.name == name)
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Advance every body's phase by `speed * ORBIT_SPEED_SCALE * dt`.
    pub fn advance(&mut self, dt: f64) {
        for body in &mut self.bodies {
            body.root_rotation_y += body.orbital_speed_factor * ORBIT_SPEED_SCALE * dt;
        }
    }

    /// Current phases in creation order.
    pub fn snapshot(&self) -> Vec<f64> {
        self.bodies.iter().map(|b| b.root_rotation_y).collect()
    }

    /// Overwrite every phase from a positional snapshot.
    ///
    /// A length mismatch leaves the model untouched.
    pub fn apply_snapshot(&mut self, values: &[f64]) -> Result<(), SnapshotError> {
        if values.len() != self.bodies.len() {
            return Err(SnapshotError::LengthMismatch {
                expected: self.bodies.len(),
                got: values.len(),
            });
        }
        for (body, value) in self.bodies.iter_mut().zip(values) {
            body.root_rotation_y = *value;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solar;

    #[test]
    fn test_snapshot_order_and_length() {
        let model = OrbitModel::with_random_phases(solar::solar_system(), 7);
        let snapshot = model.snapshot();

        assert_eq!(snapshot.len(), 8);
        for (value, body) in snapshot.iter().zip(model.bodies()) {
            assert_eq!(*value, body.root_rotation_y);
        }
        assert_eq!(model.bodies()[0].name, "mercury");
        assert_eq!(model.bodies()[7].name, "neptune");
    }

    #[test]
    fn test_apply_own_snapshot_is_noop() {
        let mut model = OrbitModel::with_random_phases(solar::solar_system(), 99);
        let before = model.clone();

        let snapshot = model.snapshot();
        model.apply_snapshot(&snapshot).unwrap();

        assert_eq!(model, before);
    }

    #[test]
    fn test_apply_snapshot_length_mismatch() {
        let mut model = OrbitModel::with_random_phases(solar::solar_system(), 1);
        let before = model.snapshot();

        let err = model.apply_snapshot(&[1.0, 2.0]).unwrap_err();

        assert_eq!(err, SnapshotError::LengthMismatch { expected: 8, got: 2 });
        assert_eq!(model.snapshot(), before);
    }

    #[test]
    fn test_advance_is_monotonic() {
        let mut model = OrbitModel::with_random_phases(solar::solar_system(), 3);
        let before = model.snapshot();

        model.advance(0.5);

        for (old, new) in before.iter().zip(model.snapshot()) {
            assert!(new > *old);
        }
    }

    #[test]
    fn test_ten_thousand_frames() {
        let mut model = OrbitModel::new(solar::solar_system());
        for _ in 0..10_000 {
            model.advance(1.0);
        }

        for body in model.bodies() {
            let expected = 10_000.0 * body.orbital_speed_factor * ORBIT_SPEED_SCALE;
            assert!(
                (body.root_rotation_y - expected).abs() < 1e-9,
                "{}: {} != {}",
                body.name,
                body.root_rotation_y,
                expected
            );
        }
    }

    #[test]
    fn test_same_seed_same_phases() {
        let a = OrbitModel::with_random_phases(solar::solar_system(), 42);
        let b = OrbitModel::with_random_phases(solar::solar_system(), 42);
        assert_eq!(a.snapshot(), b.snapshot());
        assert!(a.snapshot().iter().all(|p| (0.0..TAU).contains(p)));
    }

    #[test]
    fn test_world_position() {
        let mut model = OrbitModel::new(solar::solar_system());
        model.apply_snapshot(&[0.0; 8]).unwrap();

        // Earth has no plane offset: phase 0 puts it on +Z.
        let earth = model.body("earth").unwrap();
        assert!(earth.world_position().abs_diff_eq(Vec3::new(0.0, 0.0, 140.0), 1e-4));

        // A quarter turn around Y moves +Z onto +X.
        let mut quarter = vec![0.0; 8];
        quarter[2] = std::f64::consts::FRAC_PI_2;
        model.apply_snapshot(&quarter).unwrap();
        let earth = model.body("earth").unwrap();
        assert!(earth.world_position().abs_diff_eq(Vec3::new(140.0, 0.0, 0.0), 1e-3));
    }
}
