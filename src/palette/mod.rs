//! Stem/branch lookups: gem colors and the shape coefficients fed to the geometry factory.

use serde::{Deserialize, Serialize};

use crate::pillar::{Branch, PillarCode, Stem};

pub mod color;
mod tables;

pub use color::Color;

/// The four colors a gem is shaded with, plus a cross-fade multiplier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaletteParams {
    pub primary: Color,
    pub secondary: Color,
    pub highlight_stem: Color,
    pub highlight_branch: Color,
    /// Multiplies every alpha the rasterizer draws with.
    pub opacity: f32,
}

impl PaletteParams {
    pub fn neutral() -> Self {
        Self {
            primary: Color::FALLBACK_GRAY,
            secondary: Color::FALLBACK_GRAY,
            highlight_stem: Color::FALLBACK_GRAY,
            highlight_branch: Color::FALLBACK_GRAY,
            opacity: 1.0,
        }
    }

    pub fn faded(self, opacity: f32) -> Self {
        Self {
            opacity: opacity.clamp(0.0, 1.0),
            ..self
        }
    }

    /// Both body colors fully transparent selects the stroked wireframe look.
    pub fn is_wireframe(&self) -> bool {
        self.primary.is_transparent() && self.secondary.is_transparent()
    }
}

impl Default for PaletteParams {
    fn default() -> Self {
        Self::neutral()
    }
}

/// Caller-supplied colors that replace the stem/branch defaults channel by channel.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaletteOverrides {
    pub primary: Option<String>,
    pub secondary: Option<String>,
    pub highlight_stem: Option<String>,
    pub highlight_branch: Option<String>,
}

impl PaletteOverrides {
    /// Same color for both highlight channels.
    pub fn with_highlight(mut self, highlight: impl Into<String>) -> Self {
        let highlight = highlight.into();
        self.highlight_stem = Some(highlight.clone());
        self.highlight_branch = Some(highlight);
        self
    }
}

fn override_or(value: Option<&String>, default: Color) -> Color {
    match value {
        Some(value) => Color::parse(value).unwrap_or_else(|err| {
            log::warn!("palette override rejected: {err}");
            Color::FALLBACK_GRAY
        }),
        None => default,
    }
}

fn table_color(value: &str) -> Color {
    Color::parse(value).unwrap_or(Color::FALLBACK_GRAY)
}

/// Resolves gem colors for a stem/branch pair. Unknown symbols fall back to gray.
pub fn resolve_palette(stem: &str, branch: &str, overrides: &PaletteOverrides) -> PaletteParams {
    let stem_entry = Stem::from_symbol(stem).map(tables::stem_entry);
    let branch_entry = Branch::from_symbol(branch).map(tables::branch_entry);

    if stem_entry.is_none() || branch_entry.is_none() {
        log::warn!("palette lookup missed for `{stem}{branch}`, using neutral gray");
    }

    let (primary, secondary, highlight_stem) = match &stem_entry {
        Some(entry) => (
            table_color(entry.primary),
            table_color(entry.secondary),
            table_color(entry.highlight),
        ),
        None => (
            Color::FALLBACK_GRAY,
            Color::FALLBACK_GRAY,
            Color::FALLBACK_GRAY,
        ),
    };
    let highlight_branch = branch_entry
        .as_ref()
        .map(|entry| table_color(entry.highlight))
        .unwrap_or(Color::FALLBACK_GRAY);

    PaletteParams {
        primary: override_or(overrides.primary.as_ref(), primary),
        secondary: override_or(overrides.secondary.as_ref(), secondary),
        highlight_stem: override_or(overrides.highlight_stem.as_ref(), highlight_stem),
        highlight_branch: override_or(overrides.highlight_branch.as_ref(), highlight_branch),
        opacity: 1.0,
    }
}

pub fn resolve_pillar_palette(pillar: &PillarCode, overrides: &PaletteOverrides) -> PaletteParams {
    resolve_palette(pillar.stem_symbol(), pillar.branch_symbol(), overrides)
}

/// Branch-side shape coefficients.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BranchShape {
    pub elongation: f32,
    pub width: f32,
    pub segments: u32,
    #[serde(default)]
    pub twist: f32,
}

/// Stem-side shape coefficients.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StemShape {
    pub scale_x: f32,
    pub scale_z: f32,
    pub height_bias: f32,
}

impl BranchShape {
    pub fn lookup(branch: Branch) -> Self {
        let entry = tables::branch_entry(branch);
        Self {
            elongation: entry.elongation,
            width: entry.width,
            segments: entry.segments,
            twist: entry.twist,
        }
    }
}

impl StemShape {
    pub fn lookup(stem: Stem) -> Self {
        let entry = tables::stem_entry(stem);
        Self {
            scale_x: entry.scale_x,
            scale_z: entry.scale_z,
            height_bias: entry.height_bias,
        }
    }
}

/// Explicit shape bundles that take the place of the table lookups.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShapeOverrides {
    pub branch: Option<BranchShape>,
    pub stem: Option<StemShape>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeParams {
    pub elongation: f32,
    pub width: f32,
    pub segments: u32,
    pub twist: f32,
    pub scale_x: f32,
    pub scale_z: f32,
    pub height_bias: f32,
}

impl ShapeParams {
    pub fn new(branch: BranchShape, stem: StemShape) -> Self {
        Self {
            elongation: branch.elongation,
            width: branch.width,
            segments: branch.segments,
            twist: branch.twist,
            scale_x: stem.scale_x,
            scale_z: stem.scale_z,
            height_bias: stem.height_bias,
        }
    }

    /// `None` when either half is neither overridden nor found in the tables.
    pub fn resolve(pillar: &PillarCode, overrides: Option<&ShapeOverrides>) -> Option<Self> {
        let branch = overrides
            .and_then(|o| o.branch)
            .or_else(|| pillar.branch().map(BranchShape::lookup));
        let stem = overrides
            .and_then(|o| o.stem)
            .or_else(|| pillar.stem().map(StemShape::lookup));

        match (branch, stem) {
            (Some(branch), Some(stem)) => Some(Self::new(branch, stem)),
            _ => None,
        }
    }
}
