//! Scene state: the sun, every orbiting body and the background stars.

pub mod body;
pub mod stars;

use nalgebra::Vector3;

use crate::config::{ConfigError, OrreryConfig};
use crate::engine::surface::TextureId;

pub use body::{orbital_position, CelestialBody, Sun};
pub use stars::StarField;

/// Something the camera can be pointed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyRef {
    Sun,
    Body(usize),
}

pub struct Scene {
    sun: Sun,
    bodies: Vec<CelestialBody>,
    stars: StarField,
}

impl Scene {
    pub fn from_config(config: &OrreryConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let stars = StarField::generate(&config.stars);
        Self::with_stars(config, stars)
    }

    /// Build the scene around an existing star field.
    pub fn with_stars(config: &OrreryConfig, stars: StarField) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut bodies: Vec<CelestialBody> = Vec::with_capacity(config.bodies.len());
        for body in &config.bodies {
            let parent = match &body.parent {
                Some(name) => Some(bodies.iter().position(|b| b.name() == name).ok_or_else(|| {
                    ConfigError::UnknownParent {
                        body: body.name.clone(),
                        parent: name.clone(),
                    }
                })?),
                None => None,
            };
            bodies.push(CelestialBody::new(body.clone(), parent));
        }

        Ok(Scene {
            sun: Sun::new(config.sun.clone()),
            bodies,
            stars,
        })
    }

    /// Advance every orbit by one frame.
    pub fn advance(&mut self, multiplier: f32) {
        for body in &mut self.bodies {
            body.advance(multiplier);
        }
    }

    /// Exact, case-sensitive name lookup.
    pub fn resolve(&self, name: &str) -> Option<BodyRef> {
        if name == self.sun.name() {
            return Some(BodyRef::Sun);
        }
        self.bodies.iter().position(|b| b.name() == name).map(BodyRef::Body)
    }

    /// World-space center of a body, composing parent offsets.
    pub fn world_position(&self, target: BodyRef) -> Vector3<f32> {
        match target {
            BodyRef::Sun => Vector3::zeros(),
            BodyRef::Body(index) => {
                let body = &self.bodies[index];
                let origin = match body.parent() {
                    Some(parent) => self.world_position(BodyRef::Body(parent)),
                    None => Vector3::zeros(),
                };
                origin + body.orbit_frame() * body.offset()
            }
        }
    }

    pub fn sun(&self) -> &Sun {
        &self.sun
    }

    pub fn bodies(&self) -> &[CelestialBody] {
        &self.bodies
    }

    pub fn stars(&self) -> &StarField {
        &self.stars
    }

    /// Bodies orbiting the sun directly, in list order.
    pub fn primaries(&self) -> impl Iterator<Item = (usize, &CelestialBody)> {
        self.bodies.iter().enumerate().filter(|(_, b)| b.parent().is_none())
    }

    pub fn satellites_of(&self, parent: usize) -> impl Iterator<Item = (usize, &CelestialBody)> {
        self.bodies
            .iter()
            .enumerate()
            .filter(move |(_, b)| b.parent() == Some(parent))
    }

    pub fn body_names(&self) -> Vec<&str> {
        self.bodies.iter().map(CelestialBody::name).collect()
    }

    /// Request a texture for every body that names one. `load` returns `None`
    /// when the request could not even be started; that body keeps drawing
    /// with its fallback color.
    pub fn assign_textures(&mut self, mut load: impl FnMut(&str) -> Option<TextureId>) {
        if let Some(url) = self.sun.config.texture.clone() {
            self.sun.texture = load(&url);
        }
        for body in &mut self.bodies {
            if let Some(url) = body.config().texture.clone() {
                body.texture = load(&url);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StarFieldConfig;

    fn scene() -> Scene {
        let mut config = OrreryConfig::default();
        config.stars = StarFieldConfig { count: 10, seed: Some(1), ..StarFieldConfig::default() };
        Scene::from_config(&config).unwrap()
    }

    #[test]
    fn builds_default_solar_system() {
        let s = scene();
        assert_eq!(s.bodies().len(), 9);
        assert_eq!(s.stars().len(), 10);
        assert_eq!(s.sun().name(), "Sun");
    }

    #[test]
    fn resolves_names_exactly() {
        let s = scene();
        assert_eq!(s.resolve("Sun"), Some(BodyRef::Sun));
        assert!(matches!(s.resolve("Mars"), Some(BodyRef::Body(_))));
        assert_eq!(s.resolve("mars"), None);
        assert_eq!(s.resolve("Pluto"), None);
        assert_eq!(s.resolve(""), None);
    }

    #[test]
    fn primaries_exclude_the_moon() {
        let s = scene();
        let names: Vec<_> = s.primaries().map(|(_, b)| b.name()).collect();
        assert_eq!(names, vec!["Mercury", "Venus", "Earth", "Mars", "Jupiter", "Saturn", "Uranus", "Neptune"]);
    }

    #[test]
    fn moon_is_a_satellite_of_earth() {
        let s = scene();
        let Some(BodyRef::Body(earth)) = s.resolve("Earth") else { panic!("no Earth") };
        let moons: Vec<_> = s.satellites_of(earth).map(|(_, b)| b.name()).collect();
        assert_eq!(moons, vec!["Moon"]);
    }

    #[test]
    fn primary_world_position_is_its_orbit_point() {
        let mut s = scene();
        for _ in 0..37 {
            s.advance(1.0);
        }
        for (i, body) in s.primaries() {
            let expected = orbital_position(body.distance(), body.angle());
            assert_eq!(s.world_position(BodyRef::Body(i)), expected);
        }
    }

    #[test]
    fn moon_world_position_follows_earth() {
        let mut s = scene();
        let Some(BodyRef::Body(earth)) = s.resolve("Earth") else { panic!("no Earth") };
        let Some(BodyRef::Body(moon)) = s.resolve("Moon") else { panic!("no Moon") };

        for _ in 0..25 {
            s.advance(1.0);
            let earth_pos = s.world_position(BodyRef::Body(earth));
            let moon_pos = s.world_position(BodyRef::Body(moon));
            let local = moon_pos - earth_pos;
            assert!((local.norm() - 20.0).abs() < 1e-3);
            let body = &s.bodies()[moon];
            assert!((local - body.orbit_frame() * body.offset()).norm() < 1e-4);
        }
    }

    #[test]
    fn tilted_moon_leaves_the_ecliptic() {
        let mut s = scene();
        let Some(BodyRef::Body(moon)) = s.resolve("Moon") else { panic!("no Moon") };
        let Some(BodyRef::Body(earth)) = s.resolve("Earth") else { panic!("no Earth") };
        // Quarter turn puts the moon on its local Z axis, which the tilt lifts.
        s.advance(std::f32::consts::FRAC_PI_2 / 0.05);
        let local = s.world_position(BodyRef::Body(moon)) - s.world_position(BodyRef::Body(earth));
        assert!(local.y.abs() > 10.0);
    }

    #[test]
    fn sun_sits_at_origin() {
        assert_eq!(scene().world_position(BodyRef::Sun), Vector3::zeros());
    }

    #[test]
    fn assigns_texture_ids_in_request_order() {
        let mut s = scene();
        let mut requested = Vec::new();
        s.assign_textures(|url| {
            requested.push(url.to_string());
            Some(TextureId(requested.len() - 1))
        });
        assert_eq!(requested.len(), 10);
        assert_eq!(s.sun().texture, Some(TextureId(0)));
        assert_eq!(s.bodies()[0].texture, Some(TextureId(1)));
    }

    #[test]
    fn failed_texture_requests_leave_no_handle() {
        let mut s = scene();
        s.assign_textures(|_| None);
        assert!(s.sun().texture.is_none());
        assert!(s.bodies().iter().all(|b| b.texture.is_none()));
    }
}
