use hex_color::HexColor;
use regex::Regex;

lazy_static::lazy_static! {
    static ref RGB_FUNCTION: Regex = Regex::new(
        r"^rgba?\(\s*(\d{1,3})\s*,\s*(\d{1,3})\s*,\s*(\d{1,3})\s*(?:,\s*([0-9]*\.?[0-9]+)\s*)?\)$"
    )
    .expect("rgb() pattern compiles");
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ColorParseError {
    #[error("empty color string")]
    Empty,
    #[error("unrecognized color `{0}`")]
    Unrecognized(String),
}

/// 8-bit RGB with a straight (non-premultiplied) alpha in `0..=1`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Color {
    pub const FALLBACK_GRAY: Color = Color::rgb(128, 128, 128);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const TRANSPARENT: Color = Color {
        r: 0,
        g: 0,
        b: 0,
        a: 0.0,
    };

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Parses `#rgb`, `#rrggbb`, `#rrggbbaa`, bare hex, `rgb(..)` and `rgba(..)`.
    ///
    /// Hex alpha digits are dropped: only the functional `rgba()` form carries alpha.
    pub fn parse(value: &str) -> Result<Self, ColorParseError> {
        let value = value.trim();
        if value.is_empty() {
            return Err(ColorParseError::Empty);
        }

        if value.starts_with("rgb") {
            return Self::parse_function(value);
        }

        let digits = value.strip_prefix('#').unwrap_or(value);
        let digits = match digits.len() {
            8 if digits.is_ascii() => &digits[..6],
            _ => digits,
        };
        HexColor::parse_rgb(&format!("#{digits}"))
            .map(|hex| Self::rgb(hex.r, hex.g, hex.b))
            .map_err(|_| ColorParseError::Unrecognized(value.to_string()))
    }

    fn parse_function(value: &str) -> Result<Self, ColorParseError> {
        let unrecognized = || ColorParseError::Unrecognized(value.to_string());
        let captures = RGB_FUNCTION.captures(value).ok_or_else(unrecognized)?;

        let channel = |i: usize| -> Result<u8, ColorParseError> {
            captures
                .get(i)
                .and_then(|m| m.as_str().parse::<u8>().ok())
                .ok_or_else(unrecognized)
        };
        let alpha = match captures.get(4) {
            Some(m) => m.as_str().parse::<f32>().map_err(|_| unrecognized())?,
            None => 1.0,
        };

        Ok(Self::rgba(channel(1)?, channel(2)?, channel(3)?, alpha.clamp(0.0, 1.0)))
    }

    /// Parses `value` and forces its alpha, degrading to gray on malformed input.
    pub fn parse_or_gray(value: &str, alpha: f32) -> Self {
        match Self::parse(value) {
            Ok(color) => color.with_alpha(alpha),
            Err(err) => {
                log::debug!("color fallback: {err}");
                Self::FALLBACK_GRAY.with_alpha(alpha)
            }
        }
    }

    pub fn with_alpha(self, a: f32) -> Self {
        let a = if a.is_finite() { a.clamp(0.0, 1.0) } else { 0.0 };
        Self { a, ..self }
    }

    pub fn is_transparent(&self) -> bool {
        self.a <= 0.0
    }

    /// Canvas-ready `rgba(r,g,b,a)` string.
    pub fn to_css(&self) -> String {
        format!("rgba({},{},{},{})", self.r, self.g, self.b, self.a)
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::FALLBACK_GRAY
    }
}
