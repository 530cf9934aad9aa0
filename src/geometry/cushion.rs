use glam::Vec3;

use crate::palette::ShapeParams;

use super::Mesh;

const SIZE: f32 = 1.5;
const SPHERE_RADIUS: f32 = 1.35;

struct Face {
    u: usize,
    v: usize,
    w: usize,
    u_dir: f32,
    v_dir: f32,
    width: f32,
    height: f32,
    depth: f32,
}

/// One side of a subdivided box, a `segments` × `segments` grid of quads.
fn push_face(face: Face, segments: u32, vertices: &mut Vec<Vec3>, indices: &mut Vec<u32>) {
    let start = vertices.len() as u32;
    let step_u = face.width / segments as f32;
    let step_v = face.height / segments as f32;

    for iy in 0..=segments {
        let y = iy as f32 * step_v - face.height / 2.0;
        for ix in 0..=segments {
            let x = ix as f32 * step_u - face.width / 2.0;
            let mut vertex = Vec3::ZERO;
            vertex[face.u] = x * face.u_dir;
            vertex[face.v] = y * face.v_dir;
            vertex[face.w] = face.depth / 2.0;
            vertices.push(vertex);
        }
    }

    let row = segments + 1;
    for iy in 0..segments {
        for ix in 0..segments {
            let a = start + ix + row * iy;
            let b = start + ix + row * (iy + 1);
            let c = start + ix + 1 + row * (iy + 1);
            let d = start + ix + 1 + row * iy;
            indices.extend_from_slice(&[a, b, d, b, c, d]);
        }
    }
}

pub fn subdivided_box(size: Vec3, segments: u32) -> Mesh {
    let segments = segments.max(1);
    let (x, y, z) = (0, 1, 2);
    let faces = [
        (z, y, x, -1.0, -1.0, size.z, size.y, size.x),
        (z, y, x, 1.0, -1.0, size.z, size.y, -size.x),
        (x, z, y, 1.0, 1.0, size.x, size.z, size.y),
        (x, z, y, 1.0, -1.0, size.x, size.z, -size.y),
        (x, y, z, 1.0, -1.0, size.x, size.y, size.z),
        (x, y, z, -1.0, -1.0, size.x, size.y, -size.z),
    ];

    let per_face = ((segments + 1) * (segments + 1)) as usize;
    let mut vertices = Vec::with_capacity(per_face * 6);
    let mut indices = Vec::with_capacity((segments * segments * 6 * 6) as usize);
    for (u, v, w, u_dir, v_dir, width, height, depth) in faces {
        let face = Face {
            u,
            v,
            w,
            u_dir,
            v_dir,
            width,
            height,
            depth,
        };
        push_face(face, segments, &mut vertices, &mut indices);
    }

    Mesh::indexed(vertices, indices)
}

/// A box pulled toward a sphere: narrow gems stay boxy, wide gems puff out.
pub fn generate(params: &ShapeParams) -> Mesh {
    let segments = params.segments.max(2);
    let size = Vec3::new(
        SIZE * params.scale_x,
        SIZE * params.elongation,
        SIZE * params.scale_z,
    );
    let mut mesh = subdivided_box(size, segments);

    let blend = 1.0 - params.width * 0.3;
    for v in mesh.vertices.iter_mut() {
        let direction = v.try_normalize().unwrap_or(*v);
        *v = *v * (1.0 - blend) + direction * blend * SPHERE_RADIUS;
    }

    if params.twist > 0.0 {
        mesh.twist(params.twist);
    }
    mesh
}
