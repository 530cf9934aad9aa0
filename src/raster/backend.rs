//! The drawing surface the rasterizer paints through.

use glam::Vec2;

use crate::palette::Color;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientStop {
    pub offset: f32,
    pub color: Color,
}

impl GradientStop {
    pub fn new(offset: f32, color: Color) -> Self {
        Self { offset, color }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LinearGradient {
    pub start: Vec2,
    pub end: Vec2,
    pub stops: Vec<GradientStop>,
}

impl LinearGradient {
    pub fn new(start: Vec2, end: Vec2, stops: Vec<GradientStop>) -> Self {
        Self { start, end, stops }
    }
}

/// Two-circle radial gradient with canvas semantics.
#[derive(Debug, Clone, PartialEq)]
pub struct RadialGradient {
    pub inner_center: Vec2,
    pub inner_radius: f32,
    pub outer_center: Vec2,
    pub outer_radius: f32,
    pub stops: Vec<GradientStop>,
}

impl RadialGradient {
    pub fn new(
        inner_center: Vec2,
        inner_radius: f32,
        outer_center: Vec2,
        outer_radius: f32,
        stops: Vec<GradientStop>,
    ) -> Self {
        Self {
            inner_center,
            inner_radius,
            outer_center,
            outer_radius,
            stops,
        }
    }
}

/// A 2D surface with canvas-like fill, stroke and clip operations.
///
/// Every `alpha` argument is a global multiplier on top of the colors' own alpha.
pub trait DrawBackend {
    /// Edge length of the square surface in pixels.
    fn size(&self) -> f32;

    /// Clears to transparent and drops any clip.
    fn clear(&mut self);

    fn fill_triangle(&mut self, triangle: [Vec2; 3], gradient: &LinearGradient, alpha: f32);

    fn stroke_triangle(&mut self, triangle: [Vec2; 3], color: Color, width: f32, alpha: f32);

    /// Paints the gradient over the whole surface, subject to the current clip.
    fn radial_glow(&mut self, gradient: &RadialGradient, alpha: f32);

    /// Restricts subsequent drawing to the union of `triangles`.
    fn clip_to_triangles(&mut self, triangles: &[[Vec2; 3]]);

    fn reset_clip(&mut self);
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    Clear,
    Fill {
        triangle: [Vec2; 3],
        gradient: LinearGradient,
        alpha: f32,
    },
    Stroke {
        triangle: [Vec2; 3],
        color: Color,
        width: f32,
        alpha: f32,
    },
    Glow {
        gradient: RadialGradient,
        alpha: f32,
    },
    Clip(usize),
    ResetClip,
}

/// Keeps every call in order instead of drawing.
#[derive(Debug, Clone)]
pub struct RecordingBackend {
    pub size: f32,
    pub calls: Vec<DrawCall>,
}

impl RecordingBackend {
    pub fn new(size: f32) -> Self {
        Self {
            size,
            calls: Vec::new(),
        }
    }

    pub fn fills(&self) -> impl Iterator<Item = &DrawCall> {
        self.calls
            .iter()
            .filter(|call| matches!(call, DrawCall::Fill { .. }))
    }

    pub fn strokes(&self) -> impl Iterator<Item = &DrawCall> {
        self.calls
            .iter()
            .filter(|call| matches!(call, DrawCall::Stroke { .. }))
    }

    pub fn glows(&self) -> impl Iterator<Item = &DrawCall> {
        self.calls
            .iter()
            .filter(|call| matches!(call, DrawCall::Glow { .. }))
    }
}

impl DrawBackend for RecordingBackend {
    fn size(&self) -> f32 {
        self.size
    }

    fn clear(&mut self) {
        self.calls.push(DrawCall::Clear);
    }

    fn fill_triangle(&mut self, triangle: [Vec2; 3], gradient: &LinearGradient, alpha: f32) {
        self.calls.push(DrawCall::Fill {
            triangle,
            gradient: gradient.clone(),
            alpha,
        });
    }

    fn stroke_triangle(&mut self, triangle: [Vec2; 3], color: Color, width: f32, alpha: f32) {
        self.calls.push(DrawCall::Stroke {
            triangle,
            color,
            width,
            alpha,
        });
    }

    fn radial_glow(&mut self, gradient: &RadialGradient, alpha: f32) {
        self.calls.push(DrawCall::Glow {
            gradient: gradient.clone(),
            alpha,
        });
    }

    fn clip_to_triangles(&mut self, triangles: &[[Vec2; 3]]) {
        self.calls.push(DrawCall::Clip(triangles.len()));
    }

    fn reset_clip(&mut self) {
        self.calls.push(DrawCall::ResetClip);
    }
}
