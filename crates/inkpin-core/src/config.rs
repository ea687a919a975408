//! Session configuration.
//!
//! Every field has a default, so a partial JSON document only needs to name
//! the values it changes.

use crate::geometry::MIN_POINT_DISTANCE;
use crate::shapes::{palette, ContrastMap, PinAppearance, SerializableColor};
use crate::tools::ToolKind;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;
use thiserror::Error;

/// Longest label a pin can show.
pub const PIN_LABEL_MAX_LEN: usize = 4;

pub const DEFAULT_FONT_SIZE: SizeRange = SizeRange::new(8.0, 48.0, 16.0);
pub const DEFAULT_STROKE_SIZE: SizeRange = SizeRange::new(1.0, 16.0, 10.0);

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid configuration: {0}")]
    Json(#[from] serde_json::Error),
}

/// An inclusive size range with its default.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SizeRange {
    pub min: f64,
    pub max: f64,
    pub default: f64,
}

impl SizeRange {
    pub const fn new(min: f64, max: f64, default: f64) -> Self {
        Self { min, max, default }
    }

    /// Clamp `value` into the range. NaN falls back to the default.
    pub fn clamp(&self, value: f64) -> f64 {
        if value.is_nan() {
            return self.default;
        }
        value.clamp(self.min, self.max)
    }

    pub fn contains(&self, value: f64) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

/// Pin sizing constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PinConfig {
    /// Unscaled marker width.
    pub base_width: f64,
    /// Unscaled marker height.
    pub base_height: f64,
    /// Label top, as a fraction of the marker height.
    pub text_y_offset: f64,
    pub scale_factor: f64,
    pub scale_coef_per_char: f64,
    pub y_offset_coef_per_char: f64,
    pub center_y_offset_coef: f64,
    pub radius_coef: f64,
    pub appearance: PinAppearance,
}

impl Default for PinConfig {
    fn default() -> Self {
        Self {
            base_width: 14.0,
            base_height: 26.92,
            text_y_offset: 0.58,
            scale_factor: 1.6,
            scale_coef_per_char: 0.5,
            y_offset_coef_per_char: 2.1,
            center_y_offset_coef: 0.74,
            radius_coef: 0.5,
            appearance: PinAppearance::default(),
        }
    }
}

/// Parameters handed to the external image exporter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    /// File name used when the caller gives none.
    pub file_name: String,
    /// Extension appended when the file name lacks one (without the dot).
    pub extension: String,
    pub mime_type: String,
    pub quality: f64,
    pub pixel_ratio: f64,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            file_name: "drawing".to_string(),
            extension: "jpg".to_string(),
            mime_type: "image/jpeg".to_string(),
            quality: 0.9,
            pixel_ratio: 2.0,
        }
    }
}

/// Drawing session configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Minimum distance between recorded pointer positions.
    pub min_point_distance: f64,
    /// Number of snapshots kept for undo/redo.
    pub history_capacity: usize,
    pub default_tool: Option<ToolKind>,
    pub default_color: SerializableColor,
    pub palette: Vec<SerializableColor>,
    pub contrast: ContrastMap,
    pub font_size: SizeRange,
    pub stroke_size: SizeRange,
    pub selected_opacity: f64,
    pub unselected_opacity: f64,
    pub pin: PinConfig,
    pub pin_label_max_len: usize,
    pub text_font_family: String,
    /// Text is raised by `font_size / text_y_offset_coefficient`.
    pub text_y_offset_coefficient: f64,
    /// Hit-test tolerance for pointer presses on shapes.
    pub hit_tolerance: f64,
    /// Attached to every shape created by the session.
    pub custom_metadata: Option<Value>,
    pub export: ExportSettings,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            min_point_distance: MIN_POINT_DISTANCE,
            history_capacity: 50,
            default_tool: None,
            default_color: palette::PURPLE,
            palette: palette::default_palette(),
            contrast: ContrastMap::default(),
            font_size: DEFAULT_FONT_SIZE,
            stroke_size: DEFAULT_STROKE_SIZE,
            selected_opacity: 0.8,
            unselected_opacity: 1.0,
            pin: PinConfig::default(),
            pin_label_max_len: PIN_LABEL_MAX_LEN,
            text_font_family: "Arial".to_string(),
            text_y_offset_coefficient: 2.5,
            hit_tolerance: 4.0,
            custom_metadata: None,
            export: ExportSettings::default(),
        }
    }
}

impl SessionConfig {
    /// Parse and validate a JSON configuration.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        Ok(config.validate())
    }

    /// Load and validate a JSON configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Repair values the session cannot work with.
    pub fn validate(mut self) -> Self {
        if self.history_capacity == 0 {
            log::warn!("history_capacity must be at least 1, using 1");
            self.history_capacity = 1;
        }
        let ranges = [
            ("font_size", &mut self.font_size, DEFAULT_FONT_SIZE),
            ("stroke_size", &mut self.stroke_size, DEFAULT_STROKE_SIZE),
        ];
        for (name, range, fallback) in ranges {
            if !range.min.is_finite() || !range.max.is_finite() {
                log::warn!("{name} range bounds must be finite, using defaults");
                *range = fallback;
            }
            if range.min > range.max {
                log::warn!("{name} range is inverted, swapping bounds");
                std::mem::swap(&mut range.min, &mut range.max);
            }
            if !range.contains(range.default) {
                let clamped = range.clamp(range.default);
                log::warn!("{name} default {} outside range, using {clamped}", range.default);
                range.default = clamped;
            }
        }
        if self.pin_label_max_len > PIN_LABEL_MAX_LEN {
            log::warn!(
                "pin_label_max_len {} exceeds {PIN_LABEL_MAX_LEN}, using {PIN_LABEL_MAX_LEN}",
                self.pin_label_max_len
            );
            self.pin_label_max_len = PIN_LABEL_MAX_LEN;
        }
        if self.min_point_distance < 0.0 {
            log::warn!("min_point_distance must not be negative, using 0");
            self.min_point_distance = 0.0;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SessionConfig::default();
        assert_eq!(config.history_capacity, 50);
        assert_eq!(config.default_color, palette::PURPLE);
        assert!(config.default_tool.is_none());
        assert!((config.font_size.default - 16.0).abs() < f64::EPSILON);
        assert!((config.stroke_size.default - 10.0).abs() < f64::EPSILON);
        assert_eq!(config.export.mime_type, "image/jpeg");
    }

    #[test]
    fn test_partial_json() {
        let config = SessionConfig::from_json(r#"{"history_capacity": 3, "default_tool": "pen"}"#).unwrap();
        assert_eq!(config.history_capacity, 3);
        assert_eq!(config.default_tool, Some(ToolKind::Pen));
        assert!((config.min_point_distance - 10.0).abs() < f64::EPSILON);
        assert!((config.pin.scale_factor - 1.6).abs() < f64::EPSILON);
    }

    #[test]
    fn test_validate_repairs() {
        let config = SessionConfig::from_json(
            r#"{"history_capacity": 0, "font_size": {"min": 8, "max": 48, "default": 100}}"#,
        )
        .unwrap();
        assert_eq!(config.history_capacity, 1);
        assert!((config.font_size.default - 48.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_validate_bounds_pin_label() {
        let config = SessionConfig {
            pin_label_max_len: 10,
            ..SessionConfig::default()
        }
        .validate();
        assert_eq!(config.pin_label_max_len, PIN_LABEL_MAX_LEN);

        let config = SessionConfig::from_json(r#"{"pin_label_max_len": 2}"#).unwrap();
        assert_eq!(config.pin_label_max_len, 2);
    }

    #[test]
    fn test_validate_non_finite_range() {
        let config = SessionConfig {
            stroke_size: SizeRange::new(f64::NAN, 16.0, 10.0),
            font_size: SizeRange::new(8.0, f64::INFINITY, 16.0),
            ..SessionConfig::default()
        }
        .validate();
        assert_eq!(config.stroke_size, DEFAULT_STROKE_SIZE);
        assert_eq!(config.font_size, DEFAULT_FONT_SIZE);
        assert!((config.stroke_size.clamp(40.0) - 16.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_huge_history_capacity_accepted() {
        let config =
            SessionConfig::from_json(r#"{"history_capacity": 18446744073709551615}"#).unwrap();
        assert_eq!(config.history_capacity, usize::MAX);
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            SessionConfig::from_json("{not json"),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            SessionConfig::from_file("/nonexistent/inkpin.json"),
            Err(ConfigError::Io(_))
        ));
    }

    #[test]
    fn test_size_range_clamp() {
        let range = SizeRange::new(1.0, 16.0, 10.0);
        assert!((range.clamp(0.0) - 1.0).abs() < f64::EPSILON);
        assert!((range.clamp(99.0) - 16.0).abs() < f64::EPSILON);
        assert!((range.clamp(f64::NAN) - 10.0).abs() < f64::EPSILON);
    }
}
