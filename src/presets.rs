//! Ready-made sequences.

use crate::{
    animation::{GemEntry, GemSequence},
    palette::{BranchShape, PaletteOverrides, ShapeOverrides, StemShape},
    pillar::{Branch, PillarCode, Stem},
};

/// Warm stroke color of the forge wireframes.
pub const FORGE_COLOR: &str = "#d4a574";
pub const FORGE_CANVAS_SIZE: u32 = 280;

const UNIT_STEM: StemShape = StemShape {
    scale_x: 1.0,
    scale_z: 1.0,
    height_bias: 1.0,
};

fn forge_entry(stem: Stem, elongation: f32, width: f32, segments: u32) -> GemEntry {
    let shape = ShapeOverrides {
        branch: Some(BranchShape {
            elongation,
            width,
            segments,
            twist: 0.0,
        }),
        stem: Some(UNIT_STEM),
    };
    let palette = PaletteOverrides {
        primary: Some("rgba(0,0,0,0)".into()),
        secondary: Some("rgba(0,0,0,0)".into()),
        ..Default::default()
    }
    .with_highlight(FORGE_COLOR);

    GemEntry::new(PillarCode::from_parts(stem, Branch::Zi))
        .with_palette(palette)
        .with_shape(shape)
}

/// One wireframe per archetype, cycled while a chart is being computed.
pub fn forge_sequence() -> GemSequence {
    GemSequence::new(vec![
        forge_entry(Stem::Jia, 0.83, 1.0, 6),
        forge_entry(Stem::Bing, 0.8, 0.8, 6),
        forge_entry(Stem::Wu, 0.8, 1.0, 2),
        forge_entry(Stem::Geng, 1.0, 0.18, 7),
        forge_entry(Stem::Ren, 0.62, 1.0, 4),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        geometry::build_pillar_mesh,
        palette::{resolve_pillar_palette, Color},
        pillar::Archetype,
    };

    #[test]
    fn forge_covers_every_archetype_in_wireframe() {
        let sequence = forge_sequence();
        let archetypes: Vec<Archetype> = sequence
            .entries()
            .iter()
            .filter_map(|entry| entry.pillar.archetype())
            .collect();
        assert_eq!(archetypes, Archetype::ALL.to_vec());

        for entry in sequence.entries() {
            let palette = resolve_pillar_palette(&entry.pillar, &entry.palette);
            assert!(palette.is_wireframe());
            assert_eq!(palette.highlight_stem, Color::rgb(0xd4, 0xa5, 0x74));
            assert!(!build_pillar_mesh(&entry.pillar, entry.shape.as_ref()).is_empty());
        }
    }
}
