use std::fmt;
use std::str::FromStr;

use egui::Color32;
use serde::{Deserialize, Serialize};

use crate::error::ColorError;

const NAMED_COLORS: &[(&str, [u8; 3])] = &[
    ("black", [0x00, 0x00, 0x00]),
    ("white", [0xff, 0xff, 0xff]),
    ("red", [0xff, 0x00, 0x00]),
    ("green", [0x00, 0x80, 0x00]),
    ("blue", [0x00, 0x00, 0xff]),
    ("yellow", [0xff, 0xff, 0x00]),
    ("cyan", [0x00, 0xff, 0xff]),
    ("magenta", [0xff, 0x00, 0xff]),
    ("gray", [0x80, 0x80, 0x80]),
    ("grey", [0x80, 0x80, 0x80]),
    ("orange", [0xff, 0xa5, 0x00]),
    ("purple", [0x80, 0x00, 0x80]),
    ("brown", [0xa5, 0x2a, 0x2a]),
    ("pink", [0xff, 0xc0, 0xcb]),
];

/// An opaque color that remembers how the user spelled it.
///
/// Commands carry colors as strings (`"#ff0000"`, `"white"`); the spelling is
/// what gets serialized, the parsed triple is what gets painted.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    spelling: String,
    rgb: [u8; 3],
}

impl Color {
    pub fn parse(spelling: &str) -> Result<Self, ColorError> {
        let trimmed = spelling.trim();
        let rgb = match trimmed.strip_prefix('#') {
            Some(hex) => parse_hex(hex),
            None => NAMED_COLORS
                .iter()
                .find(|(name, _)| name.eq_ignore_ascii_case(trimmed))
                .map(|(_, rgb)| *rgb),
        }
        .ok_or_else(|| ColorError::Invalid(spelling.to_owned()))?;

        Ok(Self {
            spelling: trimmed.to_owned(),
            rgb,
        })
    }

    pub fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self {
            spelling: format!("#{r:02x}{g:02x}{b:02x}"),
            rgb: [r, g, b],
        }
    }

    pub fn black() -> Self {
        Self::from_rgb(0, 0, 0)
    }

    pub fn white() -> Self {
        Self::from_rgb(0xff, 0xff, 0xff)
    }

    /// The spelling this color was created from
    pub fn as_str(&self) -> &str {
        &self.spelling
    }

    pub fn rgb(&self) -> [u8; 3] {
        self.rgb
    }

    pub fn to_color32(&self) -> Color32 {
        let [r, g, b] = self.rgb;
        Color32::from_rgb(r, g, b)
    }

    pub fn to_rgba(&self) -> image::Rgba<u8> {
        let [r, g, b] = self.rgb;
        image::Rgba([r, g, b, 0xff])
    }
}

impl From<Color32> for Color {
    fn from(color: Color32) -> Self {
        Self::from_rgb(color.r(), color.g(), color.b())
    }
}

fn parse_hex(hex: &str) -> Option<[u8; 3]> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();
    match hex.len() {
        3 => {
            let mut rgb = [0u8; 3];
            for (slot, i) in rgb.iter_mut().zip(0..3) {
                // "#f80" expands each digit to "ff", "88", "00"
                *slot = channel(&hex[i..=i])? * 0x11;
            }
            Some(rgb)
        }
        6 => Some([
            channel(&hex[0..2])?,
            channel(&hex[2..4])?,
            channel(&hex[4..6])?,
        ]),
        _ => None,
    }
}

impl FromStr for Color {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Color {
    type Error = ColorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.spelling
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.spelling)
    }
}

impl fmt::Debug for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Color({})", self.spelling)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_long_and_short_hex() {
        assert_eq!(Color::parse("#ff0000").unwrap().rgb(), [0xff, 0, 0]);
        assert_eq!(Color::parse("#0000FF").unwrap().rgb(), [0, 0, 0xff]);
        assert_eq!(Color::parse("#f80").unwrap().rgb(), [0xff, 0x88, 0x00]);
    }

    #[test]
    fn parses_names_case_insensitively() {
        assert_eq!(Color::parse("white").unwrap().rgb(), [0xff, 0xff, 0xff]);
        assert_eq!(Color::parse("Black").unwrap().rgb(), [0, 0, 0]);
    }

    #[test]
    fn keeps_spelling() {
        let color = Color::parse("#00FF00").unwrap();
        assert_eq!(color.as_str(), "#00FF00");
        assert_eq!(color.to_string(), "#00FF00");
    }

    #[test]
    fn rejects_garbage() {
        assert!(Color::parse("").is_err());
        assert!(Color::parse("#12").is_err());
        assert!(Color::parse("#gggggg").is_err());
        assert!(Color::parse("chartreuse-ish").is_err());
        assert!(Color::parse("#ff00001").is_err());
    }

    #[test]
    fn round_trips_through_color32() {
        let color = Color::from(Color32::from_rgb(1, 2, 3));
        assert_eq!(color.as_str(), "#010203");
        assert_eq!(color.to_color32(), Color32::from_rgb(1, 2, 3));
    }

    #[test]
    fn serde_validates_spelling() {
        let color: Color = serde_json::from_str("\"#abcdef\"").unwrap();
        assert_eq!(color.rgb(), [0xab, 0xcd, 0xef]);
        assert!(serde_json::from_str::<Color>("\"nope\"").is_err());
        assert_eq!(serde_json::to_string(&color).unwrap(), "\"#abcdef\"");
    }
}
