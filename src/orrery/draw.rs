//! Per-frame draw pipeline.
//!
//! Order is fixed: clear, lights, camera, stars, sun, orbit outlines (when
//! enabled), then every planet followed by its rings and satellites.

use std::f32::consts::FRAC_PI_2;

use nalgebra::{Matrix4, Point3, Vector3};

use crate::engine::surface::{
    DirectionalLight, DrawSurface, Lighting, Material, PointLight, Rgb, Stroke, TextureId,
};
use crate::orrery::camera::CameraState;
use crate::scene::{BodyRef, CelestialBody, Scene};

pub const BACKGROUND: Rgb = Rgb::BLACK;
pub const SUN_FALLBACK: Rgb = Rgb::from_rgb8(0xed, 0x66, 0x63);
pub const PLANET_FALLBACK: Rgb = Rgb::from_rgb8(0xe9, 0x3d, 0xc8);
pub const STAR_COLOR: Rgb = Rgb::WHITE;
pub const ORBIT_STROKE: Stroke = Stroke {
    color: Rgb::gray(150),
    weight: 0.5,
};
/// Frames per radian of self-rotation.
pub const SPIN_DIVISOR: f32 = 100.0;

/// Warm directional + point light at the sun, over a bright ambient.
pub fn scene_lighting() -> Lighting {
    let warm = Rgb::from_rgb8(150, 100, 0);
    Lighting {
        ambient: Rgb::from_rgb8(180, 150, 150),
        directional: DirectionalLight {
            color: warm.scaled(0.05),
            direction: Vector3::new(0.0, -1.0, 0.0),
        },
        point: PointLight {
            color: warm,
            position: Point3::origin(),
        },
    }
}

/// Everything the pipeline needs for one frame.
pub struct Frame<'a> {
    pub scene: &'a Scene,
    pub camera: &'a CameraState,
    pub frame: u64,
    pub show_orbits: bool,
}

pub fn draw_frame<S: DrawSurface>(surface: &mut S, frame: &Frame<'_>) {
    surface.clear(BACKGROUND);
    surface.set_lighting(&scene_lighting());
    let projection = frame.camera.projection_matrix(surface.aspect());
    surface.set_camera(&frame.camera.view_matrix(), &projection);

    let spin = frame.frame as f32 / SPIN_DIVISOR;

    draw_stars(surface, frame.scene);
    draw_sun(surface, frame.scene, spin);
    if frame.show_orbits {
        draw_orbits(surface, frame.scene);
    }
    draw_planets(surface, frame.scene, spin);
}

fn material<S: DrawSurface>(surface: &S, texture: Option<TextureId>, fallback: Rgb) -> Material {
    match texture {
        Some(id) if surface.texture_ready(id) => Material::Textured(id),
        _ => Material::Flat(fallback),
    }
}

fn draw_stars<S: DrawSurface>(surface: &mut S, scene: &Scene) {
    let stars = scene.stars();
    let material = Material::Flat(STAR_COLOR);
    for star in stars.points() {
        surface.draw_sphere(&Matrix4::new_translation(&star.coords), stars.star_radius(), &material);
    }
}

fn draw_sun<S: DrawSurface>(surface: &mut S, scene: &Scene, spin: f32) {
    let sun = scene.sun();
    let material = material(surface, sun.texture, SUN_FALLBACK);
    let model = Matrix4::from_euler_angles(0.0, spin, 0.0);
    surface.draw_sphere(&model, sun.radius(), &material);
}

fn draw_orbits<S: DrawSurface>(surface: &mut S, scene: &Scene) {
    // The ring primitive lies in XY; stand it into the XZ orbital plane.
    let model = Matrix4::from_euler_angles(FRAC_PI_2, 0.0, 0.0);
    for (_, body) in scene.primaries() {
        surface.draw_ring(&model, body.distance(), &ORBIT_STROKE);
    }
}

fn draw_planets<S: DrawSurface>(surface: &mut S, scene: &Scene, spin: f32) {
    for (index, _) in scene.primaries() {
        draw_body(surface, scene, index, spin);
    }
}

fn draw_body<S: DrawSurface>(surface: &mut S, scene: &Scene, index: usize, spin: f32) {
    let body = &scene.bodies()[index];
    let center = scene.world_position(BodyRef::Body(index));
    let translation = Matrix4::new_translation(&center);

    let material = material(surface, body.texture, PLANET_FALLBACK);
    let model = translation * Matrix4::from_euler_angles(0.0, spin, 0.0);
    surface.draw_sphere(&model, body.radius(), &material);

    draw_rings(surface, body, &translation);

    for (satellite, _) in scene.satellites_of(index) {
        draw_body(surface, scene, satellite, spin);
    }
}

fn draw_rings<S: DrawSurface>(surface: &mut S, body: &CelestialBody, translation: &Matrix4<f32>) {
    if let Some(rings) = body.rings() {
        let model = translation * Matrix4::from_euler_angles(rings.tilt, 0.0, 0.0);
        let stroke = Stroke {
            color: Rgb::gray(rings.gray),
            weight: rings.weight,
        };
        surface.draw_ring(&model, rings.radius, &stroke);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CameraConfig, OrreryConfig, StarFieldConfig};
    use crate::engine::recording::{DrawCall, RecordingSurface};

    fn scene(stars: usize) -> Scene {
        let mut config = OrreryConfig::default();
        config.stars = StarFieldConfig { count: stars, seed: Some(5), ..StarFieldConfig::default() };
        Scene::from_config(&config).unwrap()
    }

    fn is_orbit_outline(call: &DrawCall) -> bool {
        matches!(call, DrawCall::Ring { stroke, .. } if *stroke == ORBIT_STROKE)
    }

    fn record(scene: &Scene, show_orbits: bool, surface: &mut RecordingSurface) {
        let camera = CameraState::new(&CameraConfig::default());
        draw_frame(
            surface,
            &Frame {
                scene,
                camera: &camera,
                frame: 0,
                show_orbits,
            },
        );
    }

    #[test]
    fn frame_starts_with_clear_lights_camera() {
        let s = scene(3);
        let mut surface = RecordingSurface::new();
        record(&s, true, &mut surface);
        assert_eq!(surface.calls[0], DrawCall::Clear(BACKGROUND));
        assert_eq!(surface.calls[1], DrawCall::Lighting(scene_lighting()));
        assert_eq!(surface.calls[2], DrawCall::Camera);
    }

    #[test]
    fn draw_order_is_stars_sun_orbits_planets() {
        let s = scene(4);
        let mut surface = RecordingSurface::new();
        record(&s, true, &mut surface);

        let calls = &surface.calls[3..];
        // Stars
        for call in &calls[..4] {
            assert!(matches!(call, DrawCall::Sphere { material, .. } if *material == Material::Flat(STAR_COLOR)));
        }
        // Sun
        assert!(matches!(calls[4], DrawCall::Sphere { center, .. } if center.norm() < 1e-4));
        // Orbit outlines, one per planet
        for call in &calls[5..13] {
            assert!(matches!(call, DrawCall::Ring { stroke, .. } if *stroke == ORBIT_STROKE));
        }
        // Planets, Saturn's ring and the moon
        assert_eq!(calls[13..].len(), 8 + 1 + 1);
    }

    #[test]
    fn stars_are_drawn_at_their_points() {
        let s = scene(5);
        let mut surface = RecordingSurface::new();
        record(&s, false, &mut surface);
        let centers: Vec<_> = surface.spheres().take(5).map(|c| match c {
            DrawCall::Sphere { center, radius, .. } => {
                assert_eq!(*radius, 3.0);
                *center
            }
            _ => unreachable!(),
        }).collect();
        for (center, star) in centers.iter().zip(s.stars().points()) {
            assert!((center - star.coords).norm() < 1e-2);
        }
    }

    #[test]
    fn orbit_toggle_controls_outline_count() {
        let s = scene(0);

        let mut shown = RecordingSurface::new();
        record(&s, true, &mut shown);
        let outlines = shown.rings().filter(|c| is_orbit_outline(c)).count();
        assert_eq!(outlines, 8);

        let mut hidden = RecordingSurface::new();
        record(&s, false, &mut hidden);
        let outlines = hidden.rings().filter(|c| is_orbit_outline(c)).count();
        assert_eq!(outlines, 0);
        // Saturn's own ring is independent of the toggle.
        assert_eq!(hidden.rings().count(), 1);
    }

    #[test]
    fn orbit_outlines_match_distances() {
        let s = scene(0);
        let mut surface = RecordingSurface::new();
        record(&s, true, &mut surface);
        let radii: Vec<f32> = surface.rings().filter_map(|c| match c {
            DrawCall::Ring { radius, stroke, center } if *stroke == ORBIT_STROKE => {
                assert!(center.norm() < 1e-4);
                Some(*radius)
            }
            _ => None,
        }).collect();
        let expected: Vec<f32> = s.primaries().map(|(_, b)| b.distance()).collect();
        assert_eq!(radii, expected);
    }

    #[test]
    fn planets_are_drawn_at_world_positions() {
        let s = scene(0);
        let mut surface = RecordingSurface::new();
        record(&s, false, &mut surface);

        // Skip the sun.
        let centers: Vec<_> = surface.spheres().skip(1).map(|c| match c {
            DrawCall::Sphere { center, .. } => *center,
            _ => unreachable!(),
        }).collect();
        let mut expected = Vec::new();
        for (i, _) in s.primaries() {
            expected.push(s.world_position(BodyRef::Body(i)));
            for (m, _) in s.satellites_of(i) {
                expected.push(s.world_position(BodyRef::Body(m)));
            }
        }
        assert_eq!(centers.len(), expected.len());
        for (got, want) in centers.iter().zip(&expected) {
            assert!((got - want).norm() < 1e-2);
        }
    }

    #[test]
    fn moon_follows_earth_and_ring_follows_saturn() {
        let s = scene(0);
        let mut surface = RecordingSurface::new();
        record(&s, false, &mut surface);

        let earth = s.world_position(s.resolve("Earth").unwrap());
        let moon = s.world_position(s.resolve("Moon").unwrap());
        let saturn = s.world_position(s.resolve("Saturn").unwrap());

        let idx_earth = surface.calls.iter().position(|c| matches!(c, DrawCall::Sphere { center, .. } if (center - earth).norm() < 1e-2)).unwrap();
        assert!(matches!(surface.calls[idx_earth + 1], DrawCall::Sphere { center, radius, .. } if (center - moon).norm() < 1e-2 && radius == 3.0));

        let idx_saturn = surface.calls.iter().position(|c| matches!(c, DrawCall::Sphere { center, .. } if (center - saturn).norm() < 1e-2)).unwrap();
        assert!(matches!(surface.calls[idx_saturn + 1], DrawCall::Ring { center, radius, .. } if (center - saturn).norm() < 1e-2 && radius == 100.0));
    }

    #[test]
    fn missing_textures_use_fallback_colors() {
        let mut s = scene(0);
        s.assign_textures(|_| Some(TextureId(0)));
        let mut surface = RecordingSurface::new();
        record(&s, false, &mut surface);

        let mut spheres = surface.spheres();
        assert!(matches!(spheres.next(), Some(DrawCall::Sphere { material, .. }) if *material == Material::Flat(SUN_FALLBACK)));
        assert!(spheres.all(|c| matches!(c, DrawCall::Sphere { material, .. } if *material == Material::Flat(PLANET_FALLBACK))));
    }

    #[test]
    fn loaded_textures_are_used() {
        let mut s = scene(0);
        let mut next = 0;
        s.assign_textures(|_| {
            next += 1;
            Some(TextureId(next - 1))
        });
        // Only the sun and Mercury have arrived.
        let mut surface = RecordingSurface::with_ready([TextureId(0), TextureId(1)]);
        record(&s, false, &mut surface);

        let materials: Vec<_> = surface.spheres().map(|c| match c {
            DrawCall::Sphere { material, .. } => *material,
            _ => unreachable!(),
        }).collect();
        assert_eq!(materials[0], Material::Textured(TextureId(0)));
        assert_eq!(materials[1], Material::Textured(TextureId(1)));
        assert_eq!(materials[2], Material::Flat(PLANET_FALLBACK));
    }

    #[test]
    fn lighting_uses_sun_as_point_source() {
        let lighting = scene_lighting();
        assert_eq!(lighting.point.position, Point3::origin());
        assert_eq!(lighting.directional.direction, Vector3::new(0.0, -1.0, 0.0));
    }
}
