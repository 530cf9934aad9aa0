use glam::{Mat4, Vec3};

use crate::palette::ShapeParams;

use super::Mesh;

type Triangle = [u32; 3];

mod tetrahedron {
    use glam::Vec3;

    use super::Triangle;

    pub(crate) const VERTICES: &[Vec3] = &[
        Vec3::new(1.0, 1.0, 1.0),
        Vec3::new(-1.0, -1.0, 1.0),
        Vec3::new(-1.0, 1.0, -1.0),
        Vec3::new(1.0, -1.0, -1.0),
    ];

    pub(crate) const TRIANGLES: &[Triangle] = &[[2, 1, 0], [0, 3, 2], [1, 3, 0], [2, 3, 1]];
}

mod octahedron {
    use glam::Vec3;

    use super::Triangle;

    pub(crate) const VERTICES: &[Vec3] = &[
        Vec3::X,
        Vec3::NEG_X,
        Vec3::Y,
        Vec3::NEG_Y,
        Vec3::Z,
        Vec3::NEG_Z,
    ];

    pub(crate) const TRIANGLES: &[Triangle] = &[
        [0, 2, 4],
        [0, 4, 3],
        [0, 3, 5],
        [0, 5, 2],
        [1, 2, 5],
        [1, 5, 3],
        [1, 3, 4],
        [1, 4, 2],
    ];
}

mod icosahedron {
    use glam::Vec3;

    use super::Triangle;

    pub(crate) const X: f32 = 0.525_731_1;
    pub(crate) const Z: f32 = 0.850_650_8;
    pub(crate) const N: f32 = 0.0;

    pub(crate) const VERTICES: &[Vec3] = &[
        Vec3::new(-X, N, Z),
        Vec3::new(X, N, Z),
        Vec3::new(-X, N, -Z),
        Vec3::new(X, N, -Z),
        Vec3::new(N, Z, X),
        Vec3::new(N, Z, -X),
        Vec3::new(N, -Z, X),
        Vec3::new(N, -Z, -X),
        Vec3::new(Z, X, N),
        Vec3::new(-Z, X, N),
        Vec3::new(Z, -X, N),
        Vec3::new(-Z, -X, N),
    ];

    pub(crate) const TRIANGLES: &[Triangle] = &[
        [0, 4, 1],
        [0, 9, 4],
        [9, 5, 4],
        [4, 5, 8],
        [4, 8, 1],
        [8, 10, 1],
        [8, 3, 10],
        [5, 3, 8],
        [5, 2, 3],
        [2, 7, 3],
        [7, 10, 3],
        [7, 6, 10],
        [7, 11, 6],
        [11, 0, 6],
        [0, 1, 6],
        [6, 1, 10],
        [9, 0, 11],
        [9, 11, 2],
        [9, 2, 5],
        [7, 2, 11],
    ];
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Solid {
    Tetrahedron,
    Octahedron,
    Icosahedron { detail: u32 },
}

impl Solid {
    /// More segments pick rounder solids.
    pub fn for_segments(segments: u32) -> Self {
        match segments {
            0..=4 => Solid::Tetrahedron,
            5..=6 => Solid::Octahedron,
            7 => Solid::Icosahedron { detail: 0 },
            8..=11 => Solid::Icosahedron { detail: 1 },
            _ => Solid::Icosahedron { detail: 2 },
        }
    }

    fn base(self) -> (&'static [Vec3], &'static [Triangle], u32) {
        match self {
            Solid::Tetrahedron => (tetrahedron::VERTICES, tetrahedron::TRIANGLES, 0),
            Solid::Octahedron => (octahedron::VERTICES, octahedron::TRIANGLES, 0),
            Solid::Icosahedron { detail } => {
                (icosahedron::VERTICES, icosahedron::TRIANGLES, detail)
            }
        }
    }
}

/// Splits a spherical triangle into `(detail + 1)^2` triangles on the sphere of `radius`.
fn subdivide(a: Vec3, b: Vec3, c: Vec3, detail: u32, radius: f32, out: &mut Vec<Vec3>) {
    let cols = detail as usize + 1;
    let mut grid: Vec<Vec<Vec3>> = Vec::with_capacity(cols + 1);

    for i in 0..=cols {
        let t = i as f32 / cols as f32;
        let left = a.lerp(c, t);
        let right = b.lerp(c, t);
        let rows = cols - i;
        let row = (0..=rows)
            .map(|j| {
                if rows == 0 {
                    left
                } else {
                    left.lerp(right, j as f32 / rows as f32)
                }
            })
            .collect();
        grid.push(row);
    }

    let on_sphere = |v: Vec3| v.normalize_or_zero() * radius;
    for i in 0..cols {
        for j in 0..2 * (cols - i) - 1 {
            let k = j / 2;
            let triangle = if j % 2 == 0 {
                [grid[i][k + 1], grid[i + 1][k], grid[i][k]]
            } else {
                [grid[i][k + 1], grid[i + 1][k + 1], grid[i + 1][k]]
            };
            out.extend(triangle.map(on_sphere));
        }
    }
}

/// A regular solid of `radius` as a triangle soup, every face turned outward.
pub fn polyhedron(solid: Solid, radius: f32) -> Mesh {
    let (vertices, triangles, detail) = solid.base();
    let per_face = ((detail + 1) * (detail + 1) * 3) as usize;
    let mut out = Vec::with_capacity(triangles.len() * per_face);

    for [i0, i1, i2] in triangles.iter().copied() {
        let (a, b, c) = (
            vertices[i0 as usize],
            vertices[i1 as usize],
            vertices[i2 as usize],
        );
        let outward = (b - a).cross(c - a).dot(a + b + c) > 0.0;
        let (b, c) = if outward { (b, c) } else { (c, b) };
        subdivide(a, b, c, detail, radius, &mut out);
    }

    Mesh::soup(out)
}

pub fn generate(params: &ShapeParams) -> Mesh {
    let radius = 1.08 * (params.width * 0.3 + 0.78);
    let mut mesh = polyhedron(Solid::for_segments(params.segments), radius);
    let height = (params.elongation * 0.9 + 0.1) * params.height_bias;
    mesh.transform(Mat4::from_scale(Vec3::new(
        params.scale_x,
        height,
        params.scale_z,
    )));
    mesh
}
