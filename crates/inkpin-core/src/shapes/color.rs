//! Colors, the default palette and the contrast lookup used for pin labels.

use peniko::Color;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Serializable color representation (RGBA8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SerializableColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

/// Error returned when a hex color string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid hex color: {0}")]
pub struct ColorParseError(pub String);

impl SerializableColor {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    pub const fn black() -> Self {
        Self::rgb(0, 0, 0)
    }

    pub const fn white() -> Self {
        Self::rgb(255, 255, 255)
    }

    pub const fn transparent() -> Self {
        Self::new(0, 0, 0, 0)
    }

    /// Parse `#rgb`, `#rrggbb` or `#rrggbbaa` (the `#` is optional).
    pub fn from_hex(input: &str) -> Result<Self, ColorParseError> {
        let hex = input.trim();
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        let err = || ColorParseError(input.to_string());
        let channel = |range: std::ops::Range<usize>| {
            hex.get(range)
                .and_then(|s| u8::from_str_radix(s, 16).ok())
                .ok_or_else(err)
        };

        match hex.len() {
            3 => Ok(Self::rgb(
                channel(0..1)? * 17,
                channel(1..2)? * 17,
                channel(2..3)? * 17,
            )),
            6 => Ok(Self::rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?)),
            8 => Ok(Self::new(
                channel(0..2)?,
                channel(2..4)?,
                channel(4..6)?,
                channel(6..8)?,
            )),
            _ => Err(err()),
        }
    }

    /// Format as `#RRGGBB`, or `#RRGGBBAA` when not fully opaque.
    pub fn to_hex(&self) -> String {
        if self.a == 255 {
            format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
        } else {
            format!("#{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a)
        }
    }

    /// Perceived brightness in `0.0..=1.0`.
    pub fn luminance(&self) -> f64 {
        (0.299 * self.r as f64 + 0.587 * self.g as f64 + 0.114 * self.b as f64) / 255.0
    }
}

impl fmt::Display for SerializableColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for SerializableColor {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl From<Color> for SerializableColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
            a: rgba.a,
        }
    }
}

impl From<SerializableColor> for Color {
    fn from(color: SerializableColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// Named colors of the default palette.
pub mod palette {
    use super::SerializableColor;

    pub const WHITE: SerializableColor = SerializableColor::rgb(0xFF, 0xFF, 0xFF);
    pub const BLACK: SerializableColor = SerializableColor::rgb(0x00, 0x00, 0x00);
    pub const RED: SerializableColor = SerializableColor::rgb(0xFF, 0x00, 0x00);
    pub const ORANGE: SerializableColor = SerializableColor::rgb(0xFF, 0xA5, 0x00);
    pub const YELLOW: SerializableColor = SerializableColor::rgb(0xFF, 0xFF, 0x00);
    pub const GREEN: SerializableColor = SerializableColor::rgb(0x00, 0xFF, 0x00);
    pub const BLUE: SerializableColor = SerializableColor::rgb(0x00, 0x00, 0xFF);
    pub const PURPLE: SerializableColor = SerializableColor::rgb(0xF1, 0x00, 0xF1);

    /// Palette offered to the user, in display order.
    pub fn default_palette() -> Vec<SerializableColor> {
        vec![WHITE, BLACK, RED, ORANGE, YELLOW, GREEN, BLUE, PURPLE]
    }
}

/// A color and the color that stays readable on top of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContrastPair {
    pub color: SerializableColor,
    pub contrast: SerializableColor,
}

/// Lookup table from a fill color to a readable foreground color.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContrastMap {
    pairs: Vec<ContrastPair>,
}

impl ContrastMap {
    pub fn new(pairs: Vec<ContrastPair>) -> Self {
        Self { pairs }
    }

    /// Set (or replace) the contrast color for `color`.
    pub fn insert(&mut self, color: SerializableColor, contrast: SerializableColor) {
        match self.pairs.iter_mut().find(|p| p.color == color) {
            Some(pair) => pair.contrast = contrast,
            None => self.pairs.push(ContrastPair { color, contrast }),
        }
    }

    /// Contrast color for `color`; colors outside the table fall back to black
    /// on bright fills and white on dark ones.
    pub fn contrast_for(&self, color: SerializableColor) -> SerializableColor {
        self.pairs
            .iter()
            .find(|p| p.color == color)
            .map(|p| p.contrast)
            .unwrap_or_else(|| {
                if color.luminance() > 0.5 {
                    SerializableColor::black()
                } else {
                    SerializableColor::white()
                }
            })
    }
}

impl Default for ContrastMap {
    fn default() -> Self {
        use palette::*;
        let pair = |color, contrast| ContrastPair { color, contrast };
        Self::new(vec![
            pair(WHITE, BLACK),
            pair(BLACK, WHITE),
            pair(PURPLE, WHITE),
            pair(RED, WHITE),
            pair(ORANGE, BLACK),
            pair(YELLOW, BLACK),
            pair(GREEN, BLACK),
            pair(BLUE, WHITE),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex() {
        assert_eq!(SerializableColor::from_hex("#F100F1").unwrap(), palette::PURPLE);
        assert_eq!(SerializableColor::from_hex("fff").unwrap(), palette::WHITE);
        assert_eq!(
            SerializableColor::from_hex("#00000080").unwrap(),
            SerializableColor::new(0, 0, 0, 128)
        );
        assert!(SerializableColor::from_hex("#12345").is_err());
        assert!(SerializableColor::from_hex("#zzzzzz").is_err());
    }

    #[test]
    fn test_to_hex() {
        assert_eq!(palette::ORANGE.to_hex(), "#FFA500");
        assert_eq!(SerializableColor::new(1, 2, 3, 4).to_hex(), "#01020304");
    }

    #[test]
    fn test_contrast_table() {
        let map = ContrastMap::default();
        assert_eq!(map.contrast_for(palette::YELLOW), palette::BLACK);
        assert_eq!(map.contrast_for(palette::PURPLE), palette::WHITE);
    }

    #[test]
    fn test_contrast_fallback() {
        let map = ContrastMap::default();
        assert_eq!(map.contrast_for(SerializableColor::rgb(20, 20, 30)), palette::WHITE);
        assert_eq!(map.contrast_for(SerializableColor::rgb(230, 230, 210)), palette::BLACK);
    }

    #[test]
    fn test_peniko_conversion() {
        let color = SerializableColor::new(10, 20, 30, 40);
        let peniko_color: Color = color.into();
        assert_eq!(SerializableColor::from(peniko_color), color);
    }

    #[test]
    fn test_insert_replaces() {
        let mut map = ContrastMap::default();
        map.insert(palette::RED, palette::BLACK);
        assert_eq!(map.contrast_for(palette::RED), palette::BLACK);
    }
}
