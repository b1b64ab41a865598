use std::f32::consts::TAU;

use nalgebra::{Point3, Vector3};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::config::StarFieldConfig;

/// Background stars: fixed points on a spherical shell around the origin.
#[derive(Debug, Clone)]
pub struct StarField {
    points: Vec<Point3<f32>>,
    star_radius: f32,
}

impl StarField {
    pub fn generate(config: &StarFieldConfig) -> Self {
        let mut rng = match config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };
        Self::generate_with(&mut rng, config)
    }

    pub fn generate_with<R: Rng>(rng: &mut R, config: &StarFieldConfig) -> Self {
        let points = (0..config.count)
            .map(|_| {
                let distance = if config.max_distance > config.min_distance {
                    rng.gen_range(config.min_distance..config.max_distance)
                } else {
                    config.min_distance
                };
                Point3::from(random_unit_vector(rng) * distance)
            })
            .collect();

        StarField {
            points,
            star_radius: config.star_radius,
        }
    }

    pub fn points(&self) -> &[Point3<f32>] {
        &self.points
    }

    pub fn star_radius(&self) -> f32 {
        self.star_radius
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Uniformly distributed direction: uniform height on the axis, uniform
/// azimuth around it (Archimedes' hat-box theorem).
fn random_unit_vector<R: Rng>(rng: &mut R) -> Vector3<f32> {
    let z: f32 = rng.gen_range(-1.0..=1.0);
    let azimuth: f32 = rng.gen_range(0.0..TAU);
    let r = (1.0 - z * z).max(0.0).sqrt();
    Vector3::new(r * azimuth.cos(), r * azimuth.sin(), z)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded(count: usize, seed: u64) -> StarFieldConfig {
        StarFieldConfig {
            count,
            seed: Some(seed),
            ..StarFieldConfig::default()
        }
    }

    #[test]
    fn generates_requested_count() {
        let field = StarField::generate(&seeded(1300, 7));
        assert_eq!(field.len(), 1300);
        assert_eq!(field.star_radius(), 3.0);
    }

    #[test]
    fn stars_lie_within_distance_range() {
        let config = seeded(500, 42);
        let field = StarField::generate(&config);
        for p in field.points() {
            let d = p.coords.norm();
            assert!(d >= config.min_distance - 0.01, "too close: {d}");
            assert!(d <= config.max_distance + 0.01, "too far: {d}");
        }
    }

    #[test]
    fn same_seed_same_sky() {
        let a = StarField::generate(&seeded(50, 1));
        let b = StarField::generate(&seeded(50, 1));
        assert_eq!(a.points(), b.points());

        let c = StarField::generate(&seeded(50, 2));
        assert_ne!(a.points(), c.points());
    }

    #[test]
    fn equal_bounds_produce_fixed_shell() {
        let config = StarFieldConfig {
            count: 20,
            min_distance: 100.0,
            max_distance: 100.0,
            seed: Some(3),
            ..StarFieldConfig::default()
        };
        let field = StarField::generate(&config);
        for p in field.points() {
            assert!((p.coords.norm() - 100.0).abs() < 1e-3);
        }
    }

    #[test]
    fn directions_cover_both_hemispheres() {
        let field = StarField::generate(&seeded(400, 9));
        assert!(field.points().iter().any(|p| p.z > 0.0));
        assert!(field.points().iter().any(|p| p.z < 0.0));
    }

    #[test]
    fn empty_field() {
        let field = StarField::generate(&seeded(0, 1));
        assert!(field.is_empty());
    }
}
