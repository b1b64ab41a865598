//! In-memory [`DrawSurface`] that records every command, for tests.

use std::collections::HashSet;

use nalgebra::{Matrix4, Point3, Vector3};

use super::surface::{DrawSurface, Lighting, Material, Rgb, Stroke, TextureId};

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    Clear(Rgb),
    Lighting(Lighting),
    Camera,
    Sphere {
        center: Vector3<f32>,
        radius: f32,
        material: Material,
    },
    Ring {
        center: Vector3<f32>,
        radius: f32,
        stroke: Stroke,
    },
}

#[derive(Default)]
pub struct RecordingSurface {
    pub calls: Vec<DrawCall>,
    pub ready: HashSet<TextureId>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ready(textures: impl IntoIterator<Item = TextureId>) -> Self {
        RecordingSurface {
            calls: Vec::new(),
            ready: textures.into_iter().collect(),
        }
    }

    pub fn spheres(&self) -> impl Iterator<Item = &DrawCall> {
        self.calls
            .iter()
            .filter(|c| matches!(c, DrawCall::Sphere { .. }))
    }

    pub fn rings(&self) -> impl Iterator<Item = &DrawCall> {
        self.calls.iter().filter(|c| matches!(c, DrawCall::Ring { .. }))
    }
}

fn origin_of(model: &Matrix4<f32>) -> Vector3<f32> {
    model.transform_point(&Point3::origin()).coords
}

impl DrawSurface for RecordingSurface {
    fn aspect(&self) -> f32 {
        16.0 / 9.0
    }

    fn texture_ready(&self, texture: TextureId) -> bool {
        self.ready.contains(&texture)
    }

    fn clear(&mut self, color: Rgb) {
        self.calls.push(DrawCall::Clear(color));
    }

    fn set_lighting(&mut self, lighting: &Lighting) {
        self.calls.push(DrawCall::Lighting(*lighting));
    }

    fn set_camera(&mut self, _view: &Matrix4<f32>, _projection: &Matrix4<f32>) {
        self.calls.push(DrawCall::Camera);
    }

    fn draw_sphere(&mut self, model: &Matrix4<f32>, radius: f32, material: &Material) {
        self.calls.push(DrawCall::Sphere {
            center: origin_of(model),
            radius,
            material: *material,
        });
    }

    fn draw_ring(&mut self, model: &Matrix4<f32>, radius: f32, stroke: &Stroke) {
        self.calls.push(DrawCall::Ring {
            center: origin_of(model),
            radius,
            stroke: *stroke,
        });
    }
}
