//! Painter's-algorithm facet renderer.
//!
//! Triangles are projected, sorted far to near and shaded with a synthetic light model
//! that bands the surface into bright, medium and dark facets. Glow and specular
//! overlays are composited on top.

use glam::{Vec2, Vec3};

use crate::{
    geometry::Mesh,
    palette::{Color, PaletteParams},
    projector::Projector,
};

pub mod backend;
pub mod framebuffer;

pub use backend::{
    DrawBackend, DrawCall, GradientStop, LinearGradient, RadialGradient, RecordingBackend,
};
pub use framebuffer::Framebuffer;

/// Below this signed area a triangle is treated as degenerate.
const MIN_AREA: f32 = 1e-6;

const BACK_ALPHA: f32 = 0.45 * 0.6;
const FRONT_ALPHA: f32 = 0.9;
const EDGE_ALPHA: f32 = 0.25;
const EDGE_WIDTH: f32 = 0.8;
const WIREFRAME_WIDTH: f32 = 1.2;
/// Vertical world offset per unit of lift.
const LIFT_WORLD: f32 = 0.5;
/// Upward overlay offset in pixels per unit of lift; overlays rise with the vertices.
const LIFT_PIXELS: f32 = 15.0;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct View {
    pub rotation_x: f32,
    pub rotation_y: f32,
    /// Hover offset; positive raises the gem.
    pub lift: f32,
}

impl View {
    pub fn new(rotation_x: f32, rotation_y: f32) -> Self {
        Self {
            rotation_x,
            rotation_y,
            lift: 0.0,
        }
    }

    pub fn lifted(self, lift: f32) -> Self {
        Self { lift, ..self }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Facing {
    Front,
    Back,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenTriangle {
    pub points: [Vec2; 3],
    /// Mean rotated z of the three vertices.
    pub depth: f32,
    /// Position of the triangle in the source mesh.
    pub index: usize,
    pub facing: Facing,
    /// Finite and with non-zero area.
    pub drawable: bool,
}

impl ScreenTriangle {
    fn classify(points: [Vec2; 3], depth: f32, index: usize) -> Self {
        let [a, b, c] = points;
        let area = (b - a).perp_dot(c - a);
        // Meshes wind counter-clockwise from outside; y-down flips that on screen.
        let facing = if area > 0.0 {
            Facing::Back
        } else {
            Facing::Front
        };
        let finite = points.iter().all(|p| p.is_finite()) && depth.is_finite();
        Self {
            points,
            depth,
            index,
            facing,
            drawable: finite && area.abs() > MIN_AREA,
        }
    }

    pub fn centroid(&self) -> Vec2 {
        (self.points[0] + self.points[1] + self.points[2]) / 3.0
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    pub front: usize,
    pub back: usize,
    /// Classified but not drawn: degenerate, non-finite or with missing vertices.
    pub skipped: usize,
    pub wireframe: bool,
}

impl RenderStats {
    pub fn total(&self) -> usize {
        self.front + self.back
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tier {
    Bright,
    Medium,
    Dark,
}

/// Shading inputs for one front facet.
#[derive(Debug, Clone, Copy, PartialEq)]
struct FacetLight {
    brightness: f32,
    light: f32,
}

impl FacetLight {
    fn new(triangle: &ScreenTriangle, size: f32) -> Self {
        let half = size / 2.0;
        let d = triangle.centroid() - Vec2::splat(half);
        let dist = d.length() / half;
        let angle = d.y.atan2(d.x) / std::f32::consts::PI;
        Self {
            brightness: 0.3 + 0.7 * (1.0 - dist * 0.5),
            light: 0.5 + 0.5 * (angle * 3.0 + triangle.depth * 0.8).sin(),
        }
    }

    fn tier(&self) -> Tier {
        if self.light > 0.65 {
            Tier::Bright
        } else if self.light > 0.35 {
            Tier::Medium
        } else {
            Tier::Dark
        }
    }

    fn sparkle(&self) -> Color {
        let bright = (self.brightness * self.light).max(0.2);
        Color::WHITE.with_alpha((bright * 200.0).round() / 255.0)
    }
}

pub struct FacetRasterizer {
    projector: Projector,
}

impl FacetRasterizer {
    pub fn new(projector: Projector) -> Self {
        Self { projector }
    }

    /// Projects and classifies every mesh triangle, sorted far to near. Ties keep mesh
    /// order.
    pub fn project_triangles(&self, mesh: &Mesh, view: &View) -> Vec<ScreenTriangle> {
        let lift = Vec3::new(0.0, view.lift * LIFT_WORLD, 0.0);
        let mut triangles: Vec<ScreenTriangle> = mesh
            .triangles()
            .enumerate()
            .map(|(index, vertices)| match vertices {
                Some(vertices) => {
                    let projected = vertices.map(|v| {
                        self.projector
                            .project(v + lift, view.rotation_x, view.rotation_y)
                    });
                    let depth = projected.iter().map(|p| p.depth).sum::<f32>() / 3.0;
                    ScreenTriangle::classify(projected.map(|p| p.point()), depth, index)
                }
                None => ScreenTriangle::classify([Vec2::NAN; 3], f32::NAN, index),
            })
            .collect();

        triangles.sort_by(|a, b| a.depth.total_cmp(&b.depth));
        triangles
    }

    /// Draws one frame of `mesh` into `backend`.
    pub fn render(
        &self,
        backend: &mut impl DrawBackend,
        mesh: &Mesh,
        view: &View,
        palette: &PaletteParams,
    ) -> RenderStats {
        backend.clear();
        if mesh.is_empty() {
            return RenderStats::default();
        }

        let triangles = self.project_triangles(mesh, view);
        let mut stats = RenderStats {
            wireframe: palette.is_wireframe(),
            ..Default::default()
        };
        for triangle in &triangles {
            match triangle.facing {
                Facing::Front => stats.front += 1,
                Facing::Back => stats.back += 1,
            }
            if !triangle.drawable {
                stats.skipped += 1;
            }
        }

        let opacity = palette.opacity;
        let drawable = || triangles.iter().filter(|t| t.drawable);

        if stats.wireframe {
            for triangle in drawable() {
                backend.stroke_triangle(
                    triangle.points,
                    palette.highlight_stem,
                    WIREFRAME_WIDTH,
                    opacity,
                );
            }
            return stats;
        }

        let silhouette: Vec<[Vec2; 3]> = drawable()
            .filter(|t| t.facing == Facing::Front)
            .map(|t| t.points)
            .collect();
        backend.clip_to_triangles(&silhouette);

        let overlays = Overlays::new(backend.size(), view.lift, palette);
        backend.radial_glow(&overlays.inner_glow, 0.35 * opacity);

        for triangle in drawable().filter(|t| t.facing == Facing::Back) {
            let [a, _, c] = triangle.points;
            let gradient = LinearGradient::new(
                a,
                c,
                vec![
                    GradientStop::new(0.0, palette.secondary.with_alpha(0.8)),
                    GradientStop::new(1.0, palette.primary.with_alpha(0.53)),
                ],
            );
            backend.fill_triangle(triangle.points, &gradient, BACK_ALPHA * opacity);
        }

        let size = backend.size();
        for triangle in drawable().filter(|t| t.facing == Facing::Front) {
            let light = FacetLight::new(triangle, size);
            let [a, _, c] = triangle.points;
            let gradient = LinearGradient::new(a, c, front_stops(light, palette));
            backend.fill_triangle(triangle.points, &gradient, FRONT_ALPHA * opacity);
            backend.stroke_triangle(
                triangle.points,
                Color::WHITE.with_alpha(0.6),
                EDGE_WIDTH,
                EDGE_ALPHA * opacity,
            );
        }

        backend.radial_glow(&overlays.core, 0.7 * opacity);
        backend.radial_glow(&overlays.rim, 0.6 * opacity);
        backend.radial_glow(&overlays.specular, opacity);
        backend.radial_glow(&overlays.specular_small, opacity);
        backend.reset_clip();

        backend.radial_glow(&overlays.outer_glow, 0.8 * opacity);

        log::trace!(
            "rendered {} front, {} back, {} skipped",
            stats.front,
            stats.back,
            stats.skipped
        );
        stats
    }
}

fn front_stops(light: FacetLight, palette: &PaletteParams) -> Vec<GradientStop> {
    match light.tier() {
        Tier::Bright => vec![
            GradientStop::new(0.0, palette.highlight_branch.with_alpha(1.0)),
            GradientStop::new(0.4, light.sparkle()),
            GradientStop::new(1.0, palette.secondary.with_alpha(0.87)),
        ],
        Tier::Medium => vec![
            GradientStop::new(0.0, palette.secondary.with_alpha(0.93)),
            GradientStop::new(0.5, palette.primary.with_alpha(0.8)),
            GradientStop::new(1.0, palette.highlight_branch.with_alpha(0.6)),
        ],
        Tier::Dark => vec![
            GradientStop::new(0.0, palette.primary.with_alpha(0.8)),
            GradientStop::new(1.0, palette.primary.with_alpha(0.47)),
        ],
    }
}

/// Fixed radial overlays for a surface of `size` pixels.
struct Overlays {
    inner_glow: RadialGradient,
    core: RadialGradient,
    rim: RadialGradient,
    specular: RadialGradient,
    specular_small: RadialGradient,
    outer_glow: RadialGradient,
}

impl Overlays {
    fn new(size: f32, lift: f32, palette: &PaletteParams) -> Self {
        let r = size * 0.47;
        let offset = -lift * LIFT_PIXELS;
        let at = |x: f32, y: f32| Vec2::new(size * x, size * y + offset);
        let center = at(0.5, 0.5);
        let stop = GradientStop::new;
        let clear = Color::TRANSPARENT;
        let white = Color::WHITE;
        let hi = palette.highlight_stem;

        Self {
            inner_glow: RadialGradient::new(
                at(0.38, 0.32),
                0.0,
                center,
                r * 0.85,
                vec![
                    stop(0.0, hi.with_alpha(0.4)),
                    stop(0.35, palette.secondary.with_alpha(0.33)),
                    stop(0.7, palette.primary.with_alpha(0.27)),
                    stop(1.0, clear),
                ],
            ),
            core: RadialGradient::new(
                at(0.4, 0.36),
                0.0,
                center,
                r * 0.7,
                vec![
                    stop(0.0, white.with_alpha(0.6)),
                    stop(0.25, hi.with_alpha(0.53)),
                    stop(0.6, palette.secondary.with_alpha(0.27)),
                    stop(1.0, clear),
                ],
            ),
            rim: RadialGradient::new(
                center,
                r * 0.75,
                center,
                r,
                vec![
                    stop(0.0, clear),
                    stop(0.7, palette.secondary.with_alpha(0.27)),
                    stop(1.0, white.with_alpha(0.53)),
                ],
            ),
            specular: RadialGradient::new(
                at(0.34, 0.28),
                0.0,
                at(0.34, 0.28),
                size * 0.12,
                vec![
                    stop(0.0, white),
                    stop(0.4, white.with_alpha(0.6)),
                    stop(1.0, clear),
                ],
            ),
            specular_small: RadialGradient::new(
                at(0.62, 0.22),
                0.0,
                at(0.62, 0.22),
                size * 0.06,
                vec![stop(0.0, white.with_alpha(0.73)), stop(1.0, clear)],
            ),
            outer_glow: RadialGradient::new(
                center,
                r * 0.6,
                center,
                r * 1.15,
                vec![
                    stop(0.0, clear),
                    stop(0.5, palette.primary.with_alpha(0.09)),
                    stop(0.8, palette.highlight_branch.with_alpha(0.13)),
                    stop(1.0, clear),
                ],
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rasterizer() -> FacetRasterizer {
        FacetRasterizer::new(Projector::new(400.0))
    }

    fn facing_triangle(winding: [Vec3; 3]) -> Mesh {
        Mesh::soup(winding.to_vec())
    }

    #[test]
    fn counter_clockwise_toward_camera_is_front() {
        let mesh = facing_triangle([Vec3::ZERO, Vec3::X, Vec3::Y]);
        let tris = rasterizer().project_triangles(&mesh, &View::default());
        assert_eq!(tris[0].facing, Facing::Front);

        let mesh = facing_triangle([Vec3::ZERO, Vec3::Y, Vec3::X]);
        let tris = rasterizer().project_triangles(&mesh, &View::default());
        assert_eq!(tris[0].facing, Facing::Back);
    }

    #[test]
    fn sorted_far_to_near() {
        let far = [Vec3::new(0.0, 0.0, -1.0), Vec3::new(1.0, 0.0, -1.0), Vec3::new(0.0, 1.0, -1.0)];
        let near = far.map(|v| v + Vec3::Z * 2.0);
        let mid = far.map(|v| v + Vec3::Z);
        let mesh = Mesh::soup([near, far, mid].concat());
        let tris = rasterizer().project_triangles(&mesh, &View::default());
        let order: Vec<usize> = tris.iter().map(|t| t.index).collect();
        assert_eq!(order, vec![1, 2, 0]);
        assert!(tris.windows(2).all(|w| w[0].depth <= w[1].depth));
    }

    #[test]
    fn degenerate_triangles_are_counted_not_drawn() {
        let mesh = Mesh::soup(vec![Vec3::ZERO, Vec3::X, Vec3::X * 2.0]);
        let mut backend = RecordingBackend::new(400.0);
        let stats = rasterizer().render(&mut backend, &mesh, &View::default(), &PaletteParams::neutral());
        assert_eq!(stats.total(), 1);
        assert_eq!(stats.skipped, 1);
        assert_eq!(backend.fills().count(), 0);
    }

    #[test]
    fn missing_vertices_are_skipped() {
        let mesh = Mesh::indexed(vec![Vec3::ZERO, Vec3::X, Vec3::Y], vec![0, 1, 2, 0, 1, 9]);
        let mut backend = RecordingBackend::new(400.0);
        let stats = rasterizer().render(&mut backend, &mesh, &View::default(), &PaletteParams::neutral());
        assert_eq!(stats.total(), 2);
        assert_eq!(stats.skipped, 1);
        assert_eq!(backend.fills().count(), 1);
    }

    #[test]
    fn light_tiers() {
        let light = |light| FacetLight {
            brightness: 1.0,
            light,
        };
        assert_eq!(light(0.9).tier(), Tier::Bright);
        assert_eq!(light(0.65).tier(), Tier::Medium);
        assert_eq!(light(0.36).tier(), Tier::Medium);
        assert_eq!(light(0.35).tier(), Tier::Dark);
        assert_eq!(light(0.0).sparkle().a, (0.2f32 * 200.0).round() / 255.0);
    }

    fn facet_at(centroid: Vec2, depth: f32) -> ScreenTriangle {
        let points = [
            centroid + Vec2::new(-10.0, -10.0),
            centroid + Vec2::new(10.0, -10.0),
            centroid + Vec2::new(0.0, 20.0),
        ];
        ScreenTriangle::classify(points, depth, 0)
    }

    #[test]
    fn light_bands_by_angle_and_depth() {
        let light = FacetLight::new(&facet_at(Vec2::new(300.0, 200.0), 0.0), 400.0);
        assert!((light.brightness - 0.825).abs() < 1e-5);
        assert!((light.light - 0.5).abs() < 1e-5);
        assert_eq!(light.tier(), Tier::Medium);

        // straight below the center: angle 0.5, so sin(1.5 + 0.8 * 0.5)
        let below = FacetLight::new(&facet_at(Vec2::new(200.0, 300.0), 0.5), 400.0);
        assert!((below.brightness - 0.825).abs() < 1e-5);
        assert!((below.light - (0.5 + 0.5 * 1.9f32.sin())).abs() < 1e-5);
        assert_eq!(below.tier(), Tier::Bright);

        let above = FacetLight::new(&facet_at(Vec2::new(200.0, 100.0), 0.0), 400.0);
        assert!((above.light - (0.5 - 0.5 * 1.5f32.sin())).abs() < 1e-5);
        assert_eq!(above.tier(), Tier::Dark);

        let center = FacetLight::new(&facet_at(Vec2::splat(100.0), 0.0), 200.0);
        assert!((center.brightness - 1.0).abs() < 1e-5);
    }

    #[test]
    fn overlays_follow_size_and_lift() {
        let palette = PaletteParams::neutral();
        let close = |a: f32, b: f32| (a - b).abs() < 1e-3;

        let still = Overlays::new(400.0, 0.0, &palette);
        assert!(still.core.outer_center.abs_diff_eq(Vec2::splat(200.0), 1e-3));
        assert!(still.inner_glow.inner_center.abs_diff_eq(Vec2::new(152.0, 128.0), 1e-3));
        assert!(still.specular.outer_center.abs_diff_eq(Vec2::new(136.0, 112.0), 1e-3));
        assert!(close(still.specular.outer_radius, 48.0));
        assert!(close(still.specular_small.outer_radius, 24.0));
        assert!(close(still.rim.inner_radius, 141.0) && close(still.rim.outer_radius, 188.0));
        assert!(close(still.outer_glow.inner_radius, 112.8));
        assert!(close(still.outer_glow.outer_radius, 216.2));

        let small = Overlays::new(200.0, 0.0, &palette);
        assert!(small.specular.outer_center.abs_diff_eq(Vec2::new(68.0, 56.0), 1e-3));
        assert!(close(small.rim.outer_radius, 94.0));

        let lifted = Overlays::new(400.0, 1.0, &palette);
        let up = Vec2::new(0.0, -LIFT_PIXELS);
        for (before, after) in [
            (&still.inner_glow, &lifted.inner_glow),
            (&still.core, &lifted.core),
            (&still.rim, &lifted.rim),
            (&still.specular, &lifted.specular),
            (&still.specular_small, &lifted.specular_small),
            (&still.outer_glow, &lifted.outer_glow),
        ] {
            assert!((after.inner_center - before.inner_center).abs_diff_eq(up, 1e-3));
            assert!((after.outer_center - before.outer_center).abs_diff_eq(up, 1e-3));
            assert_eq!(after.outer_radius, before.outer_radius);
        }
    }

    #[test]
    fn opacity_scales_every_alpha() {
        let mesh = facing_triangle([Vec3::ZERO, Vec3::X, Vec3::Y]);
        let rasterizer = rasterizer();
        let mut full = RecordingBackend::new(400.0);
        let mut half = RecordingBackend::new(400.0);
        let palette = PaletteParams::neutral();
        rasterizer.render(&mut full, &mesh, &View::default(), &palette);
        rasterizer.render(&mut half, &mesh, &View::default(), &palette.faded(0.5));

        let alphas = |backend: &RecordingBackend| -> Vec<f32> {
            backend
                .calls
                .iter()
                .filter_map(|call| match call {
                    DrawCall::Fill { alpha, .. }
                    | DrawCall::Stroke { alpha, .. }
                    | DrawCall::Glow { alpha, .. } => Some(*alpha),
                    _ => None,
                })
                .collect()
        };
        let (full, half) = (alphas(&full), alphas(&half));
        assert_eq!(full.len(), half.len());
        for (f, h) in full.iter().zip(&half) {
            assert!((f * 0.5 - h).abs() < 1e-6);
        }
    }

    #[test]
    fn overlays_clip_to_silhouette_then_release() {
        let mesh = facing_triangle([Vec3::ZERO, Vec3::X, Vec3::Y]);
        let mut backend = RecordingBackend::new(400.0);
        rasterizer().render(&mut backend, &mesh, &View::default(), &PaletteParams::neutral());

        assert_eq!(backend.calls[0], DrawCall::Clear);
        assert_eq!(backend.calls[1], DrawCall::Clip(1));
        let reset = backend
            .calls
            .iter()
            .position(|call| *call == DrawCall::ResetClip)
            .unwrap();
        assert_eq!(reset, backend.calls.len() - 2);
        assert!(matches!(backend.calls.last(), Some(DrawCall::Glow { .. })));
        assert_eq!(backend.glows().count(), 6);
    }

    #[test]
    fn lift_raises_the_gem() {
        let mesh = facing_triangle([Vec3::ZERO, Vec3::X, Vec3::Y]);
        let rasterizer = rasterizer();
        let still = rasterizer.project_triangles(&mesh, &View::default());
        let lifted = rasterizer.project_triangles(&mesh, &View::default().lifted(1.0));
        assert!(lifted[0].centroid().y < still[0].centroid().y);
    }
}
