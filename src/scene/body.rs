use nalgebra::{Rotation3, Vector3};

use crate::config::{BodyConfig, RingConfig, SunConfig};
use crate::engine::surface::TextureId;

/// Point on a circular orbit of `distance` in the XZ plane.
pub fn orbital_position(distance: f32, angle: f32) -> Vector3<f32> {
    Vector3::new(distance * angle.cos(), 0.0, distance * angle.sin())
}

/// A planet or moon on a fixed circular orbit.
///
/// `offset` is the orbital position in the parent's (tilted) frame. For
/// bodies orbiting the sun it is the world position; moons derive theirs from
/// the parent, see [`Scene::world_position`](super::Scene::world_position).
#[derive(Debug, Clone)]
pub struct CelestialBody {
    config: BodyConfig,
    parent: Option<usize>,
    angle: f32,
    offset: Vector3<f32>,
    pub texture: Option<TextureId>,
}

impl CelestialBody {
    pub fn new(config: BodyConfig, parent: Option<usize>) -> Self {
        let angle = config.initial_angle;
        let offset = orbital_position(config.distance, angle);
        CelestialBody {
            config,
            parent,
            angle,
            offset,
            texture: None,
        }
    }

    /// Advance one frame. The angle grows without bound; `cos`/`sin` wrap it.
    pub fn advance(&mut self, multiplier: f32) {
        self.angle += self.config.speed * multiplier;
        self.offset = orbital_position(self.config.distance, self.angle);
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn config(&self) -> &BodyConfig {
        &self.config
    }

    pub fn parent(&self) -> Option<usize> {
        self.parent
    }

    pub fn angle(&self) -> f32 {
        self.angle
    }

    pub fn radius(&self) -> f32 {
        self.config.radius
    }

    pub fn distance(&self) -> f32 {
        self.config.distance
    }

    pub fn offset(&self) -> Vector3<f32> {
        self.offset
    }

    pub fn rings(&self) -> Option<&RingConfig> {
        self.config.rings.as_ref()
    }

    /// Rotation from the orbital plane into the parent's frame.
    pub fn orbit_frame(&self) -> Rotation3<f32> {
        Rotation3::from_axis_angle(&Vector3::x_axis(), self.config.tilt)
    }
}

/// The central star. Never moves; only spins in place.
#[derive(Debug, Clone)]
pub struct Sun {
    pub config: SunConfig,
    pub texture: Option<TextureId>,
}

impl Sun {
    pub fn new(config: SunConfig) -> Self {
        Sun { config, texture: None }
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn radius(&self) -> f32 {
        self.config.radius
    }
}
