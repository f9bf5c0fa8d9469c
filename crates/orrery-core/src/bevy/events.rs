//! ECS messages for picking and selection.

use bevy::math::Ray3d;
use bevy::prelude::*;

/// Request to pick whatever lies along a world-space ray.
#[derive(Message, Debug, Clone)]
pub struct PickRequest {
    pub ray: Ray3d,
}

/// Fired after every pick with the resulting selection.
#[derive(Message, Debug, Clone, PartialEq, Eq)]
pub struct SelectionChanged {
    /// Name of the selected body, or `None` when nothing is selected.
    pub selected: Option<String>,
}
