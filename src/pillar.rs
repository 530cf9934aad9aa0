use serde::{Deserialize, Serialize};

use crate::error::GemError;

macro_rules! def_symbols {
    (
        $(#[$attr:meta])*
        $vis:vis $name:ident {
            $($variant:ident => $symbol:literal),+
            $(,)?
        }
    ) => {
        #[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
        $(#[$attr])*
        $vis enum $name {
            $($variant),+
        }

        #[allow(dead_code)]
        impl $name {
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            pub fn iter() -> std::slice::Iter<'static, Self> {
                Self::ALL.iter()
            }

            pub const fn symbol(self) -> &'static str {
                match self {
                    $(Self::$variant => $symbol),+
                }
            }

            pub fn from_symbol(symbol: &str) -> Option<Self> {
                match symbol.trim() {
                    $($symbol => Some(Self::$variant),)+
                    _ => None,
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.symbol())
            }
        }
    };
}

def_symbols!(
    /// Heavenly stem.
    pub Stem {
        Jia => "甲",
        Yi => "乙",
        Bing => "丙",
        Ding => "丁",
        Wu => "戊",
        Ji => "己",
        Geng => "庚",
        Xin => "辛",
        Ren => "壬",
        Gui => "癸",
    }
);

def_symbols!(
    /// Earthly branch.
    pub Branch {
        Zi => "子",
        Chou => "丑",
        Yin => "寅",
        Mao => "卯",
        Chen => "辰",
        Si => "巳",
        Wu => "午",
        Wei => "未",
        Shen => "申",
        You => "酉",
        Xu => "戌",
        Hai => "亥",
    }
);

/// Mesh construction strategy, one per element.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Archetype {
    /// Revolved profile.
    Wood,
    /// Bipyramid.
    Fire,
    /// Rounded cuboid.
    Earth,
    /// Regular solid.
    Metal,
    /// Tapered prism.
    Water,
}

impl Archetype {
    pub const ALL: [Archetype; 5] = [
        Archetype::Wood,
        Archetype::Fire,
        Archetype::Earth,
        Archetype::Metal,
        Archetype::Water,
    ];
}

impl Stem {
    pub const fn archetype(self) -> Archetype {
        match self {
            Stem::Jia | Stem::Yi => Archetype::Wood,
            Stem::Bing | Stem::Ding => Archetype::Fire,
            Stem::Wu | Stem::Ji => Archetype::Earth,
            Stem::Geng | Stem::Xin => Archetype::Metal,
            Stem::Ren | Stem::Gui => Archetype::Water,
        }
    }
}

/// A stem/branch symbol pair as produced by the chart calculation.
///
/// The raw symbols are kept as given; the typed accessors return `None` for anything
/// outside the two alphabets.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PillarCode {
    stem: String,
    branch: String,
}

impl PillarCode {
    pub fn new(stem: impl Into<String>, branch: impl Into<String>) -> Self {
        Self {
            stem: stem.into(),
            branch: branch.into(),
        }
    }

    pub fn from_parts(stem: Stem, branch: Branch) -> Self {
        Self::new(stem.symbol(), branch.symbol())
    }

    /// Splits a two-symbol pillar string such as `"甲子"`.
    pub fn parse(pillar: &str) -> Result<Self, GemError> {
        let mut chars = pillar.trim().chars();
        match (chars.next(), chars.next(), chars.next()) {
            (Some(stem), Some(branch), None) => Ok(Self::new(stem, branch)),
            _ => Err(GemError::InvalidPillar(pillar.to_string())),
        }
    }

    pub fn stem_symbol(&self) -> &str {
        &self.stem
    }

    pub fn branch_symbol(&self) -> &str {
        &self.branch
    }

    pub fn stem(&self) -> Option<Stem> {
        Stem::from_symbol(&self.stem)
    }

    pub fn branch(&self) -> Option<Branch> {
        Branch::from_symbol(&self.branch)
    }

    pub fn archetype(&self) -> Option<Archetype> {
        self.stem().map(Stem::archetype)
    }
}

impl std::fmt::Display for PillarCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.stem, self.branch)
    }
}
