//! Scene configuration: the body table, star field and camera setup.
//!
//! Everything here is immutable once the scene is built. The page may supply
//! an override at `assets/orrery.json`; any field it omits keeps its default.

use std::collections::HashSet;
use std::f32::consts::FRAC_PI_4;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("no orbiting bodies configured")]
    Empty,
    #[error("body name `{0}` is used more than once")]
    DuplicateName(String),
    #[error("parent `{parent}` of `{body}` must be declared before it")]
    UnknownParent { body: String, parent: String },
    #[error("body `{0}` has a negative orbital distance")]
    NegativeDistance(String),
    #[error("body `{0}` must have a positive radius")]
    InvalidRadius(String),
    #[error("body `{body}` has a non-finite {field}")]
    NonFinite { body: String, field: &'static str },
    #[error("star radius range [{min}, {max}] is invalid")]
    InvalidStarRange { min: f32, max: f32 },
    #[error("camera: {0}")]
    InvalidCamera(&'static str),
    #[error("invalid configuration: {0}")]
    Parse(String),
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct RingConfig {
    pub radius: f32,
    /// Rotation of the ring plane around the parent's X axis, radians.
    pub tilt: f32,
    pub gray: u8,
    pub weight: f32,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct BodyConfig {
    pub name: String,
    pub distance: f32,
    pub radius: f32,
    /// Radians advanced per frame at a movement multiplier of 1.
    pub speed: f32,
    #[serde(default)]
    pub initial_angle: f32,
    #[serde(default)]
    pub texture: Option<String>,
    /// Name of the body this one orbits. `None` orbits the sun.
    #[serde(default)]
    pub parent: Option<String>,
    /// Rotation of the orbital plane around the parent's X axis, radians.
    #[serde(default)]
    pub tilt: f32,
    #[serde(default)]
    pub rings: Option<RingConfig>,
}

impl BodyConfig {
    fn planet(name: &str, distance: f32, radius: f32, speed: f32, initial_angle: f32, texture: &str) -> Self {
        BodyConfig {
            name: name.to_string(),
            distance,
            radius,
            speed,
            initial_angle,
            texture: Some(texture.to_string()),
            parent: None,
            tilt: 0.0,
            rings: None,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct SunConfig {
    pub name: String,
    pub radius: f32,
    pub texture: Option<String>,
}

impl Default for SunConfig {
    fn default() -> Self {
        SunConfig {
            name: "Sun".to_string(),
            radius: 100.0,
            texture: Some("assets/textures/2k_sun.jpg".to_string()),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct StarFieldConfig {
    pub count: usize,
    pub min_distance: f32,
    pub max_distance: f32,
    pub star_radius: f32,
    /// Fixed seed for a reproducible sky; random when absent.
    pub seed: Option<u64>,
}

impl Default for StarFieldConfig {
    fn default() -> Self {
        StarFieldConfig {
            count: 1300,
            min_distance: 1600.0,
            max_distance: 5000.0,
            star_radius: 3.0,
            seed: None,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct CameraConfig {
    pub eye: [f32; 3],
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        CameraConfig {
            eye: [0.0, 400.0, 1500.0],
            fov_degrees: 60.0,
            near: 1.0,
            far: 15000.0,
        }
    }
}

impl CameraConfig {
    /// Reject setups that would produce a singular projection or view.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.near > 0.0) || !self.near.is_finite() {
            return Err(ConfigError::InvalidCamera("near plane must be positive"));
        }
        if !(self.far > self.near) || !self.far.is_finite() {
            return Err(ConfigError::InvalidCamera("far plane must lie beyond the near plane"));
        }
        if !(self.fov_degrees > 0.0 && self.fov_degrees < 180.0) {
            return Err(ConfigError::InvalidCamera("field of view must be within (0, 180) degrees"));
        }
        let [x, y, z] = self.eye;
        if !(x.is_finite() && y.is_finite() && z.is_finite()) {
            return Err(ConfigError::InvalidCamera("eye position must be finite"));
        }
        // The initial look target is the origin and up is +Y.
        if x.hypot(z) <= f32::EPSILON {
            return Err(ConfigError::InvalidCamera("eye must not sit on the vertical axis"));
        }
        Ok(())
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct OrreryConfig {
    pub sun: SunConfig,
    pub bodies: Vec<BodyConfig>,
    pub stars: StarFieldConfig,
    pub camera: CameraConfig,
}

impl Default for OrreryConfig {
    fn default() -> Self {
        OrreryConfig {
            sun: SunConfig::default(),
            bodies: default_bodies(),
            stars: StarFieldConfig::default(),
            camera: CameraConfig::default(),
        }
    }
}

fn default_bodies() -> Vec<BodyConfig> {
    let mut saturn = BodyConfig::planet("Saturn", 820.0, 38.0, 0.0045, 4.2, "assets/textures/2k_saturn.jpg");
    saturn.rings = Some(RingConfig {
        radius: 100.0,
        tilt: FRAC_PI_4,
        gray: 170,
        weight: 10.0,
    });

    let moon = BodyConfig {
        name: "Moon".to_string(),
        distance: 20.0,
        radius: 3.0,
        speed: 0.05,
        initial_angle: 0.0,
        texture: Some("assets/textures/2k_moon.jpg".to_string()),
        parent: Some("Earth".to_string()),
        tilt: -FRAC_PI_4,
        rings: None,
    };

    vec![
        BodyConfig::planet("Mercury", 160.0, 6.0, 0.024, 0.0, "assets/textures/2k_mercury.jpg"),
        BodyConfig::planet("Venus", 220.0, 12.0, 0.018, 2.1, "assets/textures/2k_venus.jpg"),
        BodyConfig::planet("Earth", 300.0, 13.0, 0.015, 4.4, "assets/textures/2k_earth.jpg"),
        moon,
        BodyConfig::planet("Mars", 390.0, 9.0, 0.012, 1.0, "assets/textures/2k_mars.jpg"),
        BodyConfig::planet("Jupiter", 580.0, 45.0, 0.0065, 5.6, "assets/textures/2k_jupiter.jpg"),
        saturn,
        BodyConfig::planet("Uranus", 1020.0, 25.0, 0.0032, 2.8, "assets/textures/2k_uranus.jpg"),
        BodyConfig::planet("Neptune", 1200.0, 24.0, 0.0025, 0.5, "assets/textures/2k_neptune.jpg"),
    ]
}

impl OrreryConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: OrreryConfig = serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bodies.is_empty() {
            return Err(ConfigError::Empty);
        }
        if !(self.sun.radius > 0.0) {
            return Err(ConfigError::InvalidRadius(self.sun.name.clone()));
        }

        let mut seen: HashSet<&str> = HashSet::new();
        seen.insert(&self.sun.name);
        for body in &self.bodies {
            for (field, value) in [
                ("radius", body.radius),
                ("distance", body.distance),
                ("speed", body.speed),
                ("initial angle", body.initial_angle),
                ("tilt", body.tilt),
            ] {
                if !value.is_finite() {
                    return Err(ConfigError::NonFinite { body: body.name.clone(), field });
                }
            }
            if !(body.radius > 0.0) {
                return Err(ConfigError::InvalidRadius(body.name.clone()));
            }
            if body.distance < 0.0 {
                return Err(ConfigError::NegativeDistance(body.name.clone()));
            }
            if let Some(parent) = &body.parent {
                if parent == &self.sun.name || !seen.contains(parent.as_str()) {
                    return Err(ConfigError::UnknownParent {
                        body: body.name.clone(),
                        parent: parent.clone(),
                    });
                }
            }
            if !seen.insert(&body.name) {
                return Err(ConfigError::DuplicateName(body.name.clone()));
            }
        }

        let stars = &self.stars;
        if !(stars.min_distance > 0.0) || !(stars.max_distance >= stars.min_distance) || !stars.max_distance.is_finite() {
            return Err(ConfigError::InvalidStarRange {
                min: stars.min_distance,
                max: stars.max_distance,
            });
        }
        if !(stars.star_radius > 0.0) || !stars.star_radius.is_finite() {
            return Err(ConfigError::InvalidRadius("stars".to_string()));
        }

        self.camera.validate()
    }
}
