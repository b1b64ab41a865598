//! Backend-neutral drawing contract.
//!
//! The frame pipeline only talks to a [`DrawSurface`]; the WebGL renderer is one
//! implementation, and tests substitute a recording surface to assert on the
//! exact sequence of draw commands.

use nalgebra::{Matrix4, Point3, Vector3};

/// Linear RGB color, each channel in 0.0-1.0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0.0, 0.0, 0.0);
    pub const WHITE: Rgb = Rgb::new(1.0, 1.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Rgb { r, g, b }
    }

    /// Build from 8-bit channels (e.g. a `#rrggbb` color).
    pub const fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Rgb::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0)
    }

    pub const fn gray(level: u8) -> Self {
        Rgb::from_rgb8(level, level, level)
    }

    pub fn scaled(self, factor: f32) -> Self {
        Rgb::new(self.r * factor, self.g * factor, self.b * factor)
    }
}

/// Handle to a texture owned by the drawing backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureId(pub usize);

/// Surface appearance of a sphere.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Material {
    Textured(TextureId),
    /// Flat color, used for stars and for bodies whose texture is not ready.
    Flat(Rgb),
}

/// Outline style for rings and orbit paths.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub color: Rgb,
    pub weight: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalLight {
    pub color: Rgb,
    /// Direction the light travels in (not the direction toward the light).
    pub direction: Vector3<f32>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLight {
    pub color: Rgb,
    pub position: Point3<f32>,
}

/// Complete light rig for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lighting {
    pub ambient: Rgb,
    pub directional: DirectionalLight,
    pub point: PointLight,
}

/// Drawing commands issued by the frame pipeline.
///
/// Every sphere and ring is drawn from a unit primitive: `model` places and
/// orients it, `radius` scales it.
pub trait DrawSurface {
    /// Width / height of the drawable area.
    fn aspect(&self) -> f32;

    /// Whether a texture has finished loading and can be sampled.
    fn texture_ready(&self, texture: TextureId) -> bool;

    fn clear(&mut self, color: Rgb);

    fn set_lighting(&mut self, lighting: &Lighting);

    fn set_camera(&mut self, view: &Matrix4<f32>, projection: &Matrix4<f32>);

    fn draw_sphere(&mut self, model: &Matrix4<f32>, radius: f32, material: &Material);

    /// Draw a circle outline of `radius` in the local XY plane of `model`.
    fn draw_ring(&mut self, model: &Matrix4<f32>, radius: f32, stroke: &Stroke);
}
