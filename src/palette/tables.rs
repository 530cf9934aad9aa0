use crate::pillar::{Branch, Stem};

pub(crate) struct StemEntry {
    pub primary: &'static str,
    pub secondary: &'static str,
    pub highlight: &'static str,
    pub scale_x: f32,
    pub scale_z: f32,
    pub height_bias: f32,
}

pub(crate) struct BranchEntry {
    pub highlight: &'static str,
    pub elongation: f32,
    pub width: f32,
    pub segments: u32,
    pub twist: f32,
}

const fn stem(
    primary: &'static str,
    secondary: &'static str,
    highlight: &'static str,
    scale_x: f32,
    scale_z: f32,
    height_bias: f32,
) -> StemEntry {
    StemEntry {
        primary,
        secondary,
        highlight,
        scale_x,
        scale_z,
        height_bias,
    }
}

const fn branch(
    highlight: &'static str,
    elongation: f32,
    width: f32,
    segments: u32,
    twist: f32,
) -> BranchEntry {
    BranchEntry {
        highlight,
        elongation,
        width,
        segments,
        twist,
    }
}

pub(crate) const fn stem_entry(stem_: Stem) -> StemEntry {
    match stem_ {
        Stem::Jia => stem("#0d6b3a", "#18a058", "#98eeb8", 0.95, 0.95, 1.1),
        Stem::Yi => stem("#2a8870", "#40b898", "#c8f8f0", 1.05, 1.05, 0.9),
        Stem::Bing => stem("#c01828", "#e83040", "#ffc0b0", 0.92, 0.92, 1.2),
        Stem::Ding => stem("#c05040", "#e08060", "#ffe0d0", 1.02, 1.02, 0.95),
        Stem::Wu => stem("#a86800", "#d09010", "#ffe880", 1.08, 1.08, 0.85),
        Stem::Ji => stem("#c09030", "#e0b850", "#fff5c0", 1.12, 1.12, 0.8),
        Stem::Geng => stem("#5a7080", "#88a0b0", "#eaf2f6", 0.9, 0.9, 1.15),
        Stem::Xin => stem("#c0a870", "#d8c090", "#faf4e0", 1.0, 1.0, 1.0),
        Stem::Ren => stem("#0a1870", "#1428a8", "#f0c020", 0.96, 0.96, 1.05),
        Stem::Gui => stem("#181828", "#282840", "#8878c8", 1.04, 1.04, 0.92),
    }
}

pub(crate) const fn branch_entry(branch_: Branch) -> BranchEntry {
    match branch_ {
        Branch::Zi => branch("#60c8f0", 1.25, 0.72, 6, 0.0),
        Branch::Chou => branch("#a0b8d0", 0.85, 0.9, 6, 0.06),
        Branch::Yin => branch("#40e880", 1.15, 0.68, 6, 0.04),
        Branch::Mao => branch("#88ff60", 1.05, 0.75, 8, 0.0),
        Branch::Chen => branch("#c8e040", 0.9, 0.95, 6, 0.08),
        Branch::Si => branch("#ff9030", 1.3, 0.62, 6, 0.05),
        Branch::Wu => branch("#ff3010", 1.2, 0.65, 6, 0.0),
        Branch::Wei => branch("#ffb820", 0.88, 0.88, 8, 0.07),
        Branch::Shen => branch("#c0e8ff", 1.1, 0.7, 6, 0.03),
        Branch::You => branch("#f0f4ff", 0.95, 0.8, 12, 0.0),
        Branch::Xu => branch("#e8c880", 0.92, 0.92, 6, 0.1),
        Branch::Hai => branch("#7060d0", 1.18, 0.66, 6, 0.02),
    }
}
