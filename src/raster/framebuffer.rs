use std::{io::Cursor, path::Path};

use glam::Vec2;
use image::{ImageFormat, RgbaImage};
use tiny_skia::{
    FillRule, Mask, Paint, PathBuilder, Pixmap, Point, Rect, Shader, SpreadMode, Stroke,
    Transform,
};

use crate::{error::GemError, palette::Color};

use super::backend::{DrawBackend, GradientStop, LinearGradient, RadialGradient};

/// Software surface over a `tiny_skia::Pixmap`. Clips are coverage masks.
pub struct Framebuffer {
    pixmap: Pixmap,
    clip: Option<Mask>,
}

fn point(p: Vec2) -> Point {
    Point::from_xy(p.x, p.y)
}

fn skia_color(color: Color, alpha: f32) -> tiny_skia::Color {
    let channel = |c: u8| c as f32 / 255.0;
    let a = (color.a * alpha).clamp(0.0, 1.0);
    tiny_skia::Color::from_rgba(channel(color.r), channel(color.g), channel(color.b), a)
        .unwrap_or(tiny_skia::Color::TRANSPARENT)
}

/// Converts stops with `alpha` folded in. A fully transparent stop takes the hue of the
/// nearest visible stop.
fn skia_stops(stops: &[GradientStop], alpha: f32) -> Vec<tiny_skia::GradientStop> {
    stops
        .iter()
        .enumerate()
        .map(|(i, stop)| {
            let color = if stop.color.is_transparent() {
                stops[i + 1..]
                    .iter()
                    .chain(stops[..i].iter().rev())
                    .find(|s| !s.color.is_transparent())
                    .map_or(stop.color, |s| s.color.with_alpha(0.0))
            } else {
                stop.color
            };
            tiny_skia::GradientStop::new(stop.offset, skia_color(color, alpha))
        })
        .collect()
}

fn linear_shader(gradient: &LinearGradient, alpha: f32) -> Option<Shader<'static>> {
    tiny_skia::LinearGradient::new(
        point(gradient.start),
        point(gradient.end),
        skia_stops(&gradient.stops, alpha),
        SpreadMode::Pad,
        Transform::identity(),
    )
}

/// `tiny_skia` radial gradients start from a point. A gradient whose inner circle has a
/// radius is drawn as a ring around the outer center: offsets are rescaled to start at
/// the inner circle and the first color fills the disc inside it.
fn radial_shader(gradient: &RadialGradient, alpha: f32) -> Option<Shader<'static>> {
    let (r0, r1) = (gradient.inner_radius, gradient.outer_radius);
    if r0 <= 0.0 {
        return tiny_skia::RadialGradient::new(
            point(gradient.inner_center),
            point(gradient.outer_center),
            r1,
            skia_stops(&gradient.stops, alpha),
            SpreadMode::Pad,
            Transform::identity(),
        );
    }
    if !(r1 > r0) {
        return None;
    }

    let inner = r0 / r1;
    let held: Vec<GradientStop> = gradient
        .stops
        .first()
        .map(|first| GradientStop::new(0.0, first.color))
        .into_iter()
        .chain(
            gradient
                .stops
                .iter()
                .map(|stop| GradientStop::new(inner + stop.offset * (1.0 - inner), stop.color)),
        )
        .collect();
    let center = point(gradient.outer_center);
    tiny_skia::RadialGradient::new(
        center,
        center,
        r1,
        skia_stops(&held, alpha),
        SpreadMode::Pad,
        Transform::identity(),
    )
}

fn push_triangle(builder: &mut PathBuilder, [a, b, c]: [Vec2; 3]) {
    builder.move_to(a.x, a.y);
    builder.line_to(b.x, b.y);
    builder.line_to(c.x, c.y);
    builder.close();
}

/// `None` for non-finite corners.
fn triangle_path(triangle: [Vec2; 3]) -> Option<tiny_skia::Path> {
    let mut builder = PathBuilder::new();
    push_triangle(&mut builder, triangle);
    builder.finish()
}

impl Framebuffer {
    pub fn new(size: u32) -> Result<Self, GemError> {
        let pixmap = Pixmap::new(size, size).ok_or(GemError::Surface(size))?;
        Ok(Self { pixmap, clip: None })
    }

    /// Row-major straight-alpha RGBA8 copy of the surface.
    pub fn pixels(&self) -> Vec<u8> {
        self.pixmap
            .pixels()
            .iter()
            .flat_map(|px| {
                let c = px.demultiply();
                [c.red(), c.green(), c.blue(), c.alpha()]
            })
            .collect()
    }

    /// Straight-alpha RGBA at `(x, y)`; transparent outside the surface.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        self.pixmap.pixel(x, y).map_or([0; 4], |px| {
            let c = px.demultiply();
            [c.red(), c.green(), c.blue(), c.alpha()]
        })
    }

    pub fn encode_png(&self) -> Result<Vec<u8>, GemError> {
        let (width, height) = (self.pixmap.width(), self.pixmap.height());
        let image =
            RgbaImage::from_raw(width, height, self.pixels()).ok_or(GemError::Surface(width))?;
        let mut bytes = Vec::new();
        image.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
        Ok(bytes)
    }

    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<(), GemError> {
        std::fs::write(path, self.encode_png()?)?;
        Ok(())
    }

    fn bounds(&self) -> Option<Rect> {
        Rect::from_xywh(
            0.0,
            0.0,
            self.pixmap.width() as f32,
            self.pixmap.height() as f32,
        )
    }
}

impl DrawBackend for Framebuffer {
    fn size(&self) -> f32 {
        self.pixmap.width() as f32
    }

    fn clear(&mut self) {
        self.pixmap.fill(tiny_skia::Color::TRANSPARENT);
        self.clip = None;
    }

    fn fill_triangle(&mut self, triangle: [Vec2; 3], gradient: &LinearGradient, alpha: f32) {
        let (Some(path), Some(shader)) = (triangle_path(triangle), linear_shader(gradient, alpha))
        else {
            return;
        };
        let paint = Paint {
            shader,
            anti_alias: true,
            ..Default::default()
        };
        self.pixmap.fill_path(
            &path,
            &paint,
            FillRule::Winding,
            Transform::identity(),
            self.clip.as_ref(),
        );
    }

    fn stroke_triangle(&mut self, triangle: [Vec2; 3], color: Color, width: f32, alpha: f32) {
        let Some(path) = triangle_path(triangle) else {
            return;
        };
        let mut paint = Paint::default();
        paint.set_color(skia_color(color, alpha));
        paint.anti_alias = true;

        let stroke = Stroke {
            width,
            ..Default::default()
        };
        self.pixmap.stroke_path(
            &path,
            &paint,
            &stroke,
            Transform::identity(),
            self.clip.as_ref(),
        );
    }

    fn radial_glow(&mut self, gradient: &RadialGradient, alpha: f32) {
        let (Some(rect), Some(shader)) = (self.bounds(), radial_shader(gradient, alpha)) else {
            return;
        };
        let paint = Paint {
            shader,
            anti_alias: true,
            ..Default::default()
        };
        self.pixmap
            .fill_rect(rect, &paint, Transform::identity(), self.clip.as_ref());
    }

    fn clip_to_triangles(&mut self, triangles: &[[Vec2; 3]]) {
        let Some(mut mask) = Mask::new(self.pixmap.width(), self.pixmap.height()) else {
            return;
        };
        let mut builder = PathBuilder::new();
        for &[a, b, c] in triangles {
            if !(a.is_finite() && b.is_finite() && c.is_finite()) {
                continue;
            }
            // one orientation for every triangle, so nonzero winding fills the union
            if (b - a).perp_dot(c - a) < 0.0 {
                push_triangle(&mut builder, [a, c, b]);
            } else {
                push_triangle(&mut builder, [a, b, c]);
            }
        }
        if let Some(path) = builder.finish() {
            mask.fill_path(&path, FillRule::Winding, true, Transform::identity());
        }
        self.clip = Some(mask);
    }

    fn reset_clip(&mut self) {
        self.clip = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(color: Color) -> LinearGradient {
        LinearGradient::new(Vec2::ZERO, Vec2::X, vec![GradientStop::new(0.0, color)])
    }

    fn quad_half() -> [Vec2; 3] {
        [Vec2::ZERO, Vec2::new(10.0, 0.0), Vec2::new(0.0, 10.0)]
    }

    fn cover_all() -> [Vec2; 3] {
        [Vec2::new(-1.0, -1.0), Vec2::new(80.0, -1.0), Vec2::new(-1.0, 80.0)]
    }

    #[test]
    fn fills_inside_only() {
        let mut fb = Framebuffer::new(10).unwrap();
        fb.fill_triangle(quad_half(), &solid(Color::rgb(255, 0, 0)), 1.0);
        assert_eq!(fb.pixel(1, 1), [255, 0, 0, 255]);
        assert_eq!(fb.pixel(9, 9), [0, 0, 0, 0]);
    }

    #[test]
    fn source_over_halves() {
        let mut fb = Framebuffer::new(4).unwrap();
        fb.fill_triangle(cover_all(), &solid(Color::WHITE), 1.0);
        fb.fill_triangle(cover_all(), &solid(Color::rgb(0, 0, 0)), 0.5);
        let [r, g, b, a] = fb.pixel(0, 0);
        assert_eq!(a, 255);
        assert!((r as i32 - 128).abs() <= 2, "{r}");
        assert!(r == g && g == b);
    }

    #[test]
    fn clip_masks_glow() {
        let mut fb = Framebuffer::new(10).unwrap();
        fb.clip_to_triangles(&[quad_half()]);
        let glow = RadialGradient::new(
            Vec2::splat(5.0),
            0.0,
            Vec2::splat(5.0),
            100.0,
            vec![GradientStop::new(0.0, Color::WHITE)],
        );
        fb.radial_glow(&glow, 1.0);
        assert_eq!(fb.pixel(1, 1)[3], 255);
        assert_eq!(fb.pixel(9, 9)[3], 0);

        fb.reset_clip();
        fb.radial_glow(&glow, 1.0);
        assert_eq!(fb.pixel(9, 9)[3], 255);
    }

    #[test]
    fn clip_is_the_union_of_either_winding() {
        let mut fb = Framebuffer::new(20).unwrap();
        // overlapping triangles wound in opposite directions
        let upper = [Vec2::ZERO, Vec2::new(20.0, 0.0), Vec2::new(0.0, 20.0)];
        let lower = [Vec2::ZERO, Vec2::new(0.0, 20.0), Vec2::new(20.0, 20.0)];
        fb.clip_to_triangles(&[upper, lower]);
        fb.fill_triangle(cover_all(), &solid(Color::WHITE), 1.0);
        assert_eq!(fb.pixel(2, 10)[3], 255);
        assert_eq!(fb.pixel(15, 2)[3], 255);
        assert_eq!(fb.pixel(17, 18)[3], 255);
        assert_eq!(fb.pixel(18, 3)[3], 0);
    }

    #[test]
    fn clear_drops_pixels_and_clip() {
        let mut fb = Framebuffer::new(4).unwrap();
        fb.fill_triangle(cover_all(), &solid(Color::WHITE), 1.0);
        fb.clip_to_triangles(&[]);
        fb.clear();
        assert!(fb.pixels().iter().all(|&b| b == 0));

        fb.fill_triangle(cover_all(), &solid(Color::WHITE), 1.0);
        assert_eq!(fb.pixel(0, 0), [255, 255, 255, 255]);
        assert_eq!(fb.pixels().len(), 4 * 4 * 4);
    }

    #[test]
    fn strokes_follow_the_edges() {
        let mut fb = Framebuffer::new(20).unwrap();
        let triangle = [Vec2::splat(2.0), Vec2::new(18.0, 2.0), Vec2::new(2.0, 18.0)];
        fb.stroke_triangle(triangle, Color::WHITE, 2.0, 1.0);
        assert!(fb.pixel(10, 2)[3] > 0);
        assert_eq!(fb.pixel(6, 6)[3], 0);
    }

    #[test]
    fn ring_glow_holds_first_color_inside() {
        let mut fb = Framebuffer::new(20).unwrap();
        let ring = RadialGradient::new(
            Vec2::splat(10.0),
            4.0,
            Vec2::splat(10.0),
            8.0,
            vec![
                GradientStop::new(0.0, Color::rgb(255, 0, 0)),
                GradientStop::new(1.0, Color::rgb(0, 0, 255)),
            ],
        );
        fb.radial_glow(&ring, 1.0);

        let [r, _, b, a] = fb.pixel(10, 10);
        assert_eq!(a, 255);
        assert!(r > 250 && b < 5, "{r} {b}");

        let [r, _, b, _] = fb.pixel(19, 10);
        assert!(r < 5 && b > 250, "{r} {b}");

        // (16.5, 10.5) sits about 0.63 of the way from the inner to the outer circle
        let [r, _, b, _] = fb.pixel(16, 10);
        assert!(b > r && r > 40, "{r} {b}");
    }

    #[test]
    fn fade_to_transparent_keeps_hue() {
        let mut fb = Framebuffer::new(20).unwrap();
        let glow = RadialGradient::new(
            Vec2::splat(10.0),
            0.0,
            Vec2::splat(10.0),
            10.0,
            vec![
                GradientStop::new(0.0, Color::WHITE),
                GradientStop::new(1.0, Color::TRANSPARENT),
            ],
        );
        fb.radial_glow(&glow, 1.0);
        let [r, g, b, a] = fb.pixel(15, 10);
        assert!(a > 60 && a < 200, "{a}");
        assert!(r > 240 && g > 240 && b > 240, "{r} {g} {b}");
    }

    #[test]
    fn zero_sized_surface_is_an_error() {
        assert!(matches!(Framebuffer::new(0), Err(GemError::Surface(0))));
    }

    #[test]
    fn png_encodes() {
        let fb = Framebuffer::new(8).unwrap();
        let png = fb.encode_png().unwrap();
        assert_eq!(&png[1..4], b"PNG");
    }

    #[test]
    fn non_finite_triangles_draw_nothing() {
        let mut fb = Framebuffer::new(4).unwrap();
        let bad = [Vec2::new(f32::NAN, 0.0), Vec2::ONE, Vec2::new(3.0, 0.0)];
        fb.fill_triangle(bad, &solid(Color::WHITE), 1.0);
        fb.stroke_triangle(bad, Color::WHITE, 1.0, 1.0);
        assert!(fb.pixels().iter().all(|&b| b == 0));
    }
}
