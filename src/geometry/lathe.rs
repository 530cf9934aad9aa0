use glam::{Mat4, Vec2, Vec3};

use crate::palette::ShapeParams;

use super::{Mesh, MIN_RING_SEGMENTS};

const HEIGHT: f32 = 1.45;
const WIDTH: f32 = 0.7;

/// Radius (x) and height (y) of the wood profile, bottom apex first.
pub(super) fn profile(params: &ShapeParams) -> [Vec2; 6] {
    let h = HEIGHT * params.elongation;
    let w = WIDTH * params.width;
    let tip = h * params.height_bias;
    [
        Vec2::new(0.0, -tip),
        Vec2::new(w * 0.55, -h * 0.72),
        Vec2::new(w, -h * 0.32),
        Vec2::new(w, h * 0.32),
        Vec2::new(w * 0.58, h * 0.72),
        Vec2::new(0.0, tip),
    ]
}

/// Revolves `points` around Y into `segments` slices. The seam column is duplicated.
pub fn revolve(points: &[Vec2], segments: u32) -> Mesh {
    let segments = segments.max(MIN_RING_SEGMENTS);
    let n_points = points.len() as u32;

    let mut vertices = Vec::with_capacity(((segments + 1) * n_points) as usize);
    (0..=segments).for_each(|i| {
        let phi = i as f32 / segments as f32 * std::f32::consts::TAU;
        let (sin, cos) = phi.sin_cos();
        vertices.extend(
            points
                .iter()
                .map(|p| Vec3::new(p.x * sin, p.y, p.x * cos)),
        );
    });

    let mut indices = Vec::with_capacity((segments * n_points.saturating_sub(1) * 6) as usize);
    (0..segments).for_each(|i| {
        for j in 0..n_points.saturating_sub(1) {
            let a = i * n_points + j;
            let b = a + n_points;
            let c = b + 1;
            let d = a + 1;
            indices.extend_from_slice(&[a, b, d, c, d, b]);
        }
    });

    Mesh::indexed(vertices, indices)
}

pub fn generate(params: &ShapeParams) -> Mesh {
    let mut mesh = revolve(&profile(params), params.segments);
    if params.twist > 0.0 {
        mesh.twist(params.twist);
    }
    mesh.transform(Mat4::from_scale(Vec3::new(params.scale_x, 1.0, params.scale_z)));
    mesh
}
