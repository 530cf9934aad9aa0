//! Procedural gem meshes, one construction per [`Archetype`].
//!
//! Every mesh is centered on the origin with its long axis along +Y and triangles wound
//! counter-clockwise when seen from outside.

use glam::{Mat4, Vec3};

use crate::{
    clock::Timer,
    palette::{ShapeOverrides, ShapeParams},
    pillar::{Archetype, PillarCode},
};

mod bipyramid;
mod cushion;
mod lathe;
mod solids;

/// Rings need at least a triangle's worth of vertices to close.
pub const MIN_RING_SEGMENTS: u32 = 3;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub vertices: Vec<Vec3>,
    /// `None` means consecutive vertex triples form the triangles.
    pub indices: Option<Vec<u32>>,
}

impl Mesh {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn indexed(vertices: Vec<Vec3>, indices: Vec<u32>) -> Self {
        Self {
            vertices,
            indices: Some(indices),
        }
    }

    pub fn soup(vertices: Vec<Vec3>) -> Self {
        Self {
            vertices,
            indices: None,
        }
    }

    pub fn triangle_count(&self) -> usize {
        match &self.indices {
            Some(indices) => indices.len() / 3,
            None => self.vertices.len() / 3,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.triangle_count() == 0
    }

    /// Triangles in mesh order. Triangles referencing missing vertices come out as `None`.
    pub fn triangles(&self) -> impl Iterator<Item = Option<[Vec3; 3]>> + '_ {
        let count = self.triangle_count();
        (0..count).map(move |t| {
            let [i0, i1, i2] = match &self.indices {
                Some(indices) => [
                    indices[t * 3] as usize,
                    indices[t * 3 + 1] as usize,
                    indices[t * 3 + 2] as usize,
                ],
                None => [t * 3, t * 3 + 1, t * 3 + 2],
            };
            Some([
                *self.vertices.get(i0)?,
                *self.vertices.get(i1)?,
                *self.vertices.get(i2)?,
            ])
        })
    }

    pub fn transform(&mut self, mat: Mat4) {
        self.vertices
            .iter_mut()
            .for_each(|v| *v = mat.transform_point3(*v));
    }

    /// Rotates every vertex about Y by `y * twist` radians.
    pub fn twist(&mut self, twist: f32) {
        for v in self.vertices.iter_mut() {
            let (sin, cos) = (v.y * twist).sin_cos();
            *v = Vec3::new(v.x * cos - v.z * sin, v.y, v.x * sin + v.z * cos);
        }
    }
}

/// Builds the mesh for an archetype. Missing parameters give an empty mesh.
pub fn build_mesh(archetype: Archetype, params: Option<&ShapeParams>) -> Mesh {
    let Some(params) = params else {
        log::warn!("no shape parameters for {archetype:?}, nothing to draw");
        return Mesh::empty();
    };

    let mesh = match archetype {
        Archetype::Wood => lathe::generate(params),
        Archetype::Fire => bipyramid::fire(params),
        Archetype::Earth => cushion::generate(params),
        Archetype::Metal => solids::generate(params),
        Archetype::Water => bipyramid::water(params),
    };

    log::debug!(
        "built {archetype:?} mesh: {} vertices, {} triangles",
        mesh.vertices.len(),
        mesh.triangle_count()
    );
    mesh
}

/// Resolves archetype and shape from a pillar and builds its mesh.
pub fn build_pillar_mesh(pillar: &PillarCode, overrides: Option<&ShapeOverrides>) -> Mesh {
    let Some(archetype) = pillar.archetype() else {
        log::warn!("unrecognized stem in `{pillar}`, nothing to draw");
        return Mesh::empty();
    };

    let timer = Timer::now(format!("meshing {pillar}"));
    let mesh = build_mesh(archetype, ShapeParams::resolve(pillar, overrides).as_ref());
    timer.print();
    mesh
}
