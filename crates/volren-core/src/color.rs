//! Color specifications and their conversion to normalized RGB.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::{Result, VolrenError};

/// A user-facing color: a name, a hex string, a packed integer or components.
///
/// Component triplets may be given either in `0..=1` or in `0..=255`; if any
/// component exceeds 1 the whole triplet is read as bytes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColorSpec {
    /// Packed `0xRRGGBB` integer.
    Packed(u32),
    /// Color name or hex string (`#rgb`, `#rrggbb`, `0xrrggbb`).
    Text(String),
    /// `[r, g, b]` components.
    Components([f32; 3]),
    /// `{ "r": .., "g": .., "b": .. }` components.
    Rgb { r: f32, g: f32, b: f32 },
}

impl Default for ColorSpec {
    fn default() -> Self {
        Self::Packed(0x00_0000)
    }
}

impl From<Vec3> for ColorSpec {
    fn from(rgb: Vec3) -> Self {
        Self::Components(rgb.to_array())
    }
}

impl From<&str> for ColorSpec {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl ColorSpec {
    /// Resolves the color to RGB with every component in `[0, 1]`.
    pub fn to_rgb(&self) -> Result<Vec3> {
        match self {
            Self::Packed(hex) => Ok(unpack_hex(*hex)),
            Self::Text(text) => parse_text(text),
            Self::Components(c) => Ok(normalize_components(Vec3::from_array(*c))),
            Self::Rgb { r, g, b } => Ok(normalize_components(Vec3::new(*r, *g, *b))),
        }
    }
}

fn unpack_hex(hex: u32) -> Vec3 {
    let [_, r, g, b] = hex.to_be_bytes();
    Vec3::new(f32::from(r), f32::from(g), f32::from(b)) / 255.0
}

fn normalize_components(c: Vec3) -> Vec3 {
    let c = if c.max_element() > 1.0 { c / 255.0 } else { c };
    c.clamp(Vec3::ZERO, Vec3::ONE)
}

fn parse_text(text: &str) -> Result<Vec3> {
    let trimmed = text.trim();
    let digits = trimmed
        .strip_prefix('#')
        .or_else(|| trimmed.strip_prefix("0x"))
        .or_else(|| trimmed.strip_prefix("0X"));

    if let Some(digits) = digits {
        return parse_hex_digits(digits).ok_or_else(|| VolrenError::InvalidHexColor(text.into()));
    }

    let name = trimmed.to_ascii_lowercase();
    NAMED_COLORS
        .iter()
        .find(|(candidate, _)| *candidate == name)
        .map(|(_, hex)| unpack_hex(*hex))
        .ok_or_else(|| VolrenError::UnknownColor(text.into()))
}

fn parse_hex_digits(digits: &str) -> Option<Vec3> {
    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let packed = u32::from_str_radix(digits, 16).ok()?;
    match digits.len() {
        6 => Some(unpack_hex(packed)),
        // #rgb shorthand: each nibble is doubled
        3 => {
            let r = (packed >> 8) & 0xf;
            let g = (packed >> 4) & 0xf;
            let b = packed & 0xf;
            Some(unpack_hex(((r * 0x11) << 16) | ((g * 0x11) << 8) | (b * 0x11)))
        }
        _ => None,
    }
}

/// Named colors recognized by [`ColorSpec::Text`].
const NAMED_COLORS: &[(&str, u32)] = &[
    ("white", 0xff_ffff),
    ("black", 0x00_0000),
    ("red", 0xff_0000),
    ("green", 0x00_ff00),
    ("blue", 0x00_00ff),
    ("yellow", 0xff_ff00),
    ("cyan", 0x00_ffff),
    ("magenta", 0xff_00ff),
    ("gray", 0x80_8080),
    ("grey", 0x80_8080),
    ("lightgray", 0xd3_d3d3),
    ("lightgrey", 0xd3_d3d3),
    ("darkgray", 0xa9_a9a9),
    ("darkgrey", 0xa9_a9a9),
    ("orange", 0xff_a500),
    ("purple", 0x80_0080),
    ("violet", 0xee_82ee),
    ("pink", 0xff_c0cb),
    ("brown", 0xa5_2a2a),
    ("navy", 0x00_0080),
    ("teal", 0x00_8080),
    ("olive", 0x80_8000),
    ("maroon", 0x80_0000),
    ("lime", 0x00_ff00),
    ("gold", 0xff_d700),
    ("salmon", 0xfa_8072),
    ("skyblue", 0x87_ceeb),
    ("lightblue", 0xad_d8e6),
    ("darkblue", 0x00_008b),
    ("darkgreen", 0x00_6400),
    ("darkred", 0x8b_0000),
    ("indigo", 0x4b_0082),
    ("turquoise", 0x40_e0d0),
];
