//! Procedural pillar gems: mesh synthesis per archetype and a faceted painter's-algorithm
//! renderer with synthetic lighting, driven by a frame loop that cross-fades between gems.

pub mod animation;
pub mod clock;
pub mod config;
pub mod error;
pub mod geometry;
pub mod palette;
pub mod pillar;
pub mod presets;
pub mod projector;
pub mod raster;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use animation::{
    AnimationDriver, CancelHandle, FrameOutcome, FrameSlot, GemEntry, GemSequence, RendererState,
};
pub use config::GemConfig;
pub use error::GemError;
pub use geometry::{build_mesh, build_pillar_mesh, Mesh};
pub use palette::{resolve_palette, Color, PaletteOverrides, PaletteParams, ShapeOverrides, ShapeParams};
pub use pillar::{Archetype, Branch, PillarCode, Stem};
pub use projector::{Projected, Projector};
pub use raster::{DrawBackend, FacetRasterizer, Framebuffer, RenderStats, View};
