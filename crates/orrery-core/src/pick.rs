//! Ray picking against body spheres and body selection.

use bevy::math::{Ray3d, Vec3};

use crate::orbit::OrbitModel;

/// What a pick target stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickKind {
    /// Index into the orbit model.
    Body(usize),
    /// Something that blocks the ray but cannot be selected (the sun, other players).
    Occluder,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickTarget {
    pub kind: PickKind,
    pub center: Vec3,
    pub radius: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickHit {
    pub kind: PickKind,
    pub distance: f32,
}

/// Distance along the ray to the first intersection with a sphere, if any.
/// A ray starting inside the sphere hits its far side.
pub fn ray_sphere(ray: &Ray3d, center: Vec3, radius: f32) -> Option<f32> {
    let dir: Vec3 = *ray.direction;
    let oc = ray.origin - center;
    let b = oc.dot(dir);
    let c = oc.length_squared() - radius * radius;
    let disc = b * b - c;
    if disc < 0.0 {
        return None;
    }
    let s = disc.sqrt();
    let (near, far) = (-b - s, -b + s);
    if far < 0.0 {
        None
    } else if near >= 0.0 {
        Some(near)
    } else {
        Some(far)
    }
}

/// Nearest target hit by the ray.
pub fn pick(ray: &Ray3d, targets: &[PickTarget]) -> Option<PickHit> {
    targets
        .iter()
        .filter_map(|t| {
            ray_sphere(ray, t.center, t.radius).map(|distance| PickHit {
                kind: t.kind,
                distance,
            })
        })
        .min_by(|a, b| a.distance.total_cmp(&b.distance))
}

/// One sphere per body at its current world position.
pub fn body_targets(model: &OrbitModel) -> Vec<PickTarget> {
    model
        .bodies()
        .iter()
        .enumerate()
        .map(|(index, body)| PickTarget {
            kind: PickKind::Body(index),
            center: body.world_position(),
            radius: body.body_scale,
        })
        .collect()
}

/// The currently selected body, by name. At most one at a time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    selected: Option<String>,
}

impl Selection {
    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Update from a pick. Only a body that is the nearest hit is selected;
    /// anything else clears the selection. Returns the new selection.
    pub fn apply_pick(&mut self, hit: Option<PickHit>, model: &OrbitModel) -> Option<&str> {
        self.selected = match hit.map(|h| h.kind) {
            Some(PickKind::Body(index)) => model.bodies().get(index).map(|b| b.name.clone()),
            Some(PickKind::Occluder) | None => None,
        };
        self.selected()
    }

    pub fn clear(&mut self) {
        self.selected = None;
    }
}
