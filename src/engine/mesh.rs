use std::f32::consts::{PI, TAU};

/// Floats per vertex: position (3), normal (3), texture coordinate (2).
pub const VERTEX_FLOATS: usize = 8;

pub struct Mesh {
    pub vertices: Vec<f32>,
    pub indices: Vec<u16>,
}

impl Mesh {
    /// Unit sphere centered at the origin.
    ///
    /// Texture coordinates follow an equirectangular map: `u` wraps around the
    /// Y axis, `v` runs from the north pole (0) to the south pole (1). The seam
    /// column is duplicated so `u` reaches 1.0 without wrapping.
    pub fn sphere(stacks: u16, slices: u16) -> Self {
        let stacks = stacks.max(2);
        let slices = slices.max(3);
        let mut vertices = Vec::with_capacity((stacks as usize + 1) * (slices as usize + 1) * VERTEX_FLOATS);
        let mut indices = Vec::with_capacity(stacks as usize * slices as usize * 6);

        for stack in 0..=stacks {
            let v = stack as f32 / stacks as f32;
            let polar = v * PI;
            let (ring_radius, y) = (polar.sin(), polar.cos());

            for slice in 0..=slices {
                let u = slice as f32 / slices as f32;
                let azimuth = u * TAU;
                let x = ring_radius * azimuth.cos();
                let z = -ring_radius * azimuth.sin();

                // On a unit sphere the position is also the normal.
                vertices.extend_from_slice(&[x, y, z, x, y, z, u, v]);
            }
        }

        let row = slices + 1;
        for stack in 0..stacks {
            for slice in 0..slices {
                let a = stack * row + slice;
                let b = a + row;
                indices.extend_from_slice(&[a, b, a + 1, a + 1, b, b + 1]);
            }
        }

        Mesh { vertices, indices }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / VERTEX_FLOATS
    }
}

/// Unit circle in the XY plane as a closed line loop (`x, y, z` triples).
pub fn circle(segments: u16) -> Vec<f32> {
    let segments = segments.max(3);
    let mut points = Vec::with_capacity(segments as usize * 3);
    for i in 0..segments {
        let angle = i as f32 * TAU / segments as f32;
        points.extend_from_slice(&[angle.cos(), angle.sin(), 0.0]);
    }
    points
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sphere_vertices_lie_on_unit_sphere() {
        let mesh = Mesh::sphere(12, 16);
        for v in mesh.vertices.chunks(VERTEX_FLOATS) {
            let len = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
            assert!((len - 1.0).abs() < 1e-5, "vertex off the unit sphere: {len}");
            assert_eq!(&v[0..3], &v[3..6]);
        }
    }

    #[test]
    fn sphere_indices_are_in_range() {
        let mesh = Mesh::sphere(24, 24);
        let count = mesh.vertex_count() as u16;
        assert_eq!(mesh.vertex_count(), 25 * 25);
        assert_eq!(mesh.indices.len(), 24 * 24 * 6);
        assert!(mesh.indices.iter().all(|&i| i < count));
    }

    #[test]
    fn sphere_uvs_cover_unit_square() {
        let mesh = Mesh::sphere(8, 8);
        let (mut max_u, mut max_v) = (0.0f32, 0.0f32);
        for v in mesh.vertices.chunks(VERTEX_FLOATS) {
            assert!((0.0..=1.0).contains(&v[6]));
            assert!((0.0..=1.0).contains(&v[7]));
            max_u = max_u.max(v[6]);
            max_v = max_v.max(v[7]);
        }
        assert_eq!(max_u, 1.0);
        assert_eq!(max_v, 1.0);
    }

    #[test]
    fn degenerate_detail_is_clamped() {
        let mesh = Mesh::sphere(0, 0);
        assert_eq!(mesh.vertex_count(), 3 * 4);
    }

    #[test]
    fn circle_points_have_unit_radius() {
        let points = circle(50);
        assert_eq!(points.len(), 150);
        for p in points.chunks(3) {
            assert!(((p[0] * p[0] + p[1] * p[1]).sqrt() - 1.0).abs() < 1e-6);
            assert_eq!(p[2], 0.0);
        }
    }
}
