use glam::Vec3;

use crate::palette::ShapeParams;

use super::{Mesh, MIN_RING_SEGMENTS};

struct ApexRing {
    top: f32,
    bottom: f32,
    ring_y: f32,
    radius: f32,
    phase: f32,
}

/// Two apices joined through a ring: vertex 0 is the top apex, the last one the bottom.
fn apex_ring(ring: ApexRing, params: &ShapeParams) -> Mesh {
    let n = params.segments.max(MIN_RING_SEGMENTS);

    let mut vertices = Vec::with_capacity(n as usize + 2);
    vertices.push(Vec3::new(0.0, ring.top, 0.0));
    (0..n).for_each(|i| {
        let angle = std::f32::consts::TAU / n as f32 * i as f32 + ring.phase;
        let (sin, cos) = angle.sin_cos();
        vertices.push(Vec3::new(
            cos * ring.radius * params.scale_x,
            ring.ring_y,
            sin * ring.radius * params.scale_z,
        ));
    });
    vertices.push(Vec3::new(0.0, -ring.bottom, 0.0));

    let bottom = n + 1;
    let mut indices = Vec::with_capacity(n as usize * 6);
    (0..n).for_each(|i| indices.extend_from_slice(&[0, 1 + (i + 1) % n, 1 + i]));
    (0..n).for_each(|i| indices.extend_from_slice(&[bottom, 1 + i, 1 + (i + 1) % n]));

    Mesh::indexed(vertices, indices)
}

/// Tall double cone; the twist rotates the ring instead of shearing it.
pub fn fire(params: &ShapeParams) -> Mesh {
    apex_ring(
        ApexRing {
            top: 1.65 * params.elongation * params.height_bias,
            bottom: 1.15 * params.elongation,
            ring_y: 0.05,
            radius: params.width,
            phase: params.twist,
        },
        params,
    )
}

/// Drop shape: the ring sits a tenth of the way up toward the taller top apex.
pub fn water(params: &ShapeParams) -> Mesh {
    let top = 1.62 * params.elongation * params.height_bias;
    apex_ring(
        ApexRing {
            top,
            bottom: 1.08 * params.elongation,
            ring_y: top * 0.1,
            radius: params.width,
            phase: 0.0,
        },
        params,
    )
}
