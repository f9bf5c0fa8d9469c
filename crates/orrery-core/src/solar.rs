//! The fixed solar-system catalog.
//!
//! Speeds, distances and scales are chosen for readability, not accuracy.

use crate::orbit::OrbitBody;

/// Uniform scale of the sun sphere.
pub const SUN_SCALE: f32 = 50.0;

/// Orbit radius of the innermost planet.
pub const START_DISTANCE: f32 = 100.0;

/// Catalog row: one planet's orbital and visual parameters.
#[derive(Debug, Clone, Copy)]
pub struct PlanetDescriptor {
    pub name: &'static str,
    /// Added to [`START_DISTANCE`].
    pub distance_offset: f32,
    pub scale: f32,
    pub texture: &'static str,
    pub orbital_speed: f64,
    pub orbit_angle_deg: f64,
    pub axial_tilt_deg: f64,
}

pub const PLANETS: [PlanetDescriptor; 8] = [
    PlanetDescriptor { name: "mercury", distance_offset: 0.0, scale: 1.0, texture: "mercury.jpg", orbital_speed: 47.0, orbit_angle_deg: 7.0, axial_tilt_deg: 0.0 },
    PlanetDescriptor { name: "venus", distance_offset: 20.0, scale: 2.4, texture: "venus.jpg", orbital_speed: 35.0, orbit_angle_deg: 3.0, axial_tilt_deg: 177.0 },
    PlanetDescriptor { name: "earth", distance_offset: 40.0, scale: 2.6, texture: "earth.jpg", orbital_speed: 30.0, orbit_angle_deg: 0.0, axial_tilt_deg: 23.5 },
    PlanetDescriptor { name: "mars", distance_offset: 60.0, scale: 1.3, texture: "mars.jpg", orbital_speed: 24.0, orbit_angle_deg: 1.8, axial_tilt_deg: 25.0 },
    PlanetDescriptor { name: "jupiter", distance_offset: 120.0, scale: 28.6, texture: "jupiter.jpg", orbital_speed: 13.0, orbit_angle_deg: 1.3, axial_tilt_deg: 3.0 },
    PlanetDescriptor { name: "saturn", distance_offset: 210.0, scale: 23.8, texture: "saturn.jpg", orbital_speed: 9.5, orbit_angle_deg: 2.4, axial_tilt_deg: 27.0 },
    PlanetDescriptor { name: "uranus", distance_offset: 280.0, scale: 10.4, texture: "uranus.jpg", orbital_speed: 7.0, orbit_angle_deg: 0.7, axial_tilt_deg: 98.0 },
    PlanetDescriptor { name: "neptune", distance_offset: 330.0, scale: 10.0, texture: "neptune.jpg", orbital_speed: 5.0, orbit_angle_deg: 1.7, axial_tilt_deg: 29.5 },
];

impl PlanetDescriptor {
    pub fn to_body(&self) -> OrbitBody {
        OrbitBody {
            name: self.name.to_string(),
            orbital_speed_factor: self.orbital_speed,
            orbital_plane_offset: self.orbit_angle_deg.to_radians(),
            axial_tilt: self.axial_tilt_deg.to_radians(),
            root_rotation_y: 0.0,
            orbit_radius: START_DISTANCE + self.distance_offset,
            body_scale: self.scale,
            texture: self.texture.to_string(),
        }
    }
}

/// All planets in catalog order, every phase at zero.
pub fn solar_system() -> Vec<OrbitBody> {
    PLANETS.iter().map(PlanetDescriptor::to_body).collect()
}
