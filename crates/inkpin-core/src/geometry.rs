//! Pure geometry used while a gesture is in progress.

use crate::config::PinConfig;
use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

/// Default minimum distance between two recorded pointer positions.
pub const MIN_POINT_DISTANCE: f64 = 10.0;

/// Whether `next` is far enough from `last` to be recorded.
///
/// The first point of a gesture (`last == None`) is always accepted.
pub fn should_add_point(last: Option<Point>, next: Point, min_distance: f64) -> bool {
    match last {
        None => true,
        Some(last) => (next - last).hypot2() >= min_distance * min_distance,
    }
}

/// Ellipse inscribed in the drag box: `(center, radius_x, radius_y)`.
pub fn ellipse_from_drag(start: Point, current: Point) -> (Point, f64, f64) {
    let center = start.midpoint(current);
    let radius_x = (current.x - start.x).abs() / 2.0;
    let radius_y = (current.y - start.y).abs() / 2.0;
    (center, radius_x, radius_y)
}

/// Rectangle spanned by the drag: `(top_left, width, height)`.
pub fn rectangle_from_drag(start: Point, current: Point) -> (Point, f64, f64) {
    let origin = Point::new(start.x.min(current.x), start.y.min(current.y));
    (
        origin,
        (current.x - start.x).abs(),
        (current.y - start.y).abs(),
    )
}

/// Per-character growth factor. A one-character label counts as empty.
fn label_coefficient(label_len: usize) -> f64 {
    if label_len > 1 { label_len as f64 } else { 0.0 }
}

/// Scale applied to the pin marker for a label of `label_len` characters.
pub fn pin_scale(label_len: usize, config: &PinConfig) -> f64 {
    config.scale_factor + label_coefficient(label_len) * config.scale_coef_per_char
}

/// Sizes of a pin group, in group-local coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PinMetrics {
    pub scale: f64,
    pub width: f64,
    pub height: f64,
    /// Top of the label box.
    pub label_y: f64,
    pub center_dot_y: f64,
    pub center_dot_radius: f64,
    /// Group offset; the anchor maps to this local point.
    pub offset: Vec2,
}

impl PinMetrics {
    pub fn compute(label_len: usize, config: &PinConfig) -> Self {
        let k = label_coefficient(label_len);
        let scale = pin_scale(label_len, config);
        let width = config.base_width * scale;
        let height = config.base_height * scale;
        Self {
            scale,
            width,
            height,
            label_y: height * config.text_y_offset + k * config.y_offset_coef_per_char,
            center_dot_y: height * config.center_y_offset_coef,
            center_dot_radius: width / 2.0 - config.appearance.marker_stroke_width
                + config.radius_coef,
            offset: Vec2::new(width / 2.0, scale),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_decimation() {
        let last = Some(Point::new(0.0, 0.0));
        assert!(should_add_point(None, Point::new(0.0, 0.0), MIN_POINT_DISTANCE));
        assert!(!should_add_point(last, Point::new(5.0, 5.0), MIN_POINT_DISTANCE));
        assert!(should_add_point(last, Point::new(6.0, 8.0), MIN_POINT_DISTANCE));
        assert!(should_add_point(last, Point::new(10.0, 0.0), MIN_POINT_DISTANCE));
    }

    #[test]
    fn test_rectangle_from_drag() {
        let (origin, w, h) = rectangle_from_drag(Point::new(100.0, 100.0), Point::new(40.0, 160.0));
        assert_eq!(origin, Point::new(40.0, 100.0));
        assert!((w - 60.0).abs() < f64::EPSILON);
        assert!((h - 60.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_ellipse_from_drag() {
        let (center, rx, ry) = ellipse_from_drag(Point::new(0.0, 0.0), Point::new(40.0, -20.0));
        assert_eq!(center, Point::new(20.0, -10.0));
        assert!((rx - 20.0).abs() < f64::EPSILON);
        assert!((ry - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_pin_scale_single_char_matches_empty() {
        let config = PinConfig::default();
        assert!((pin_scale(0, &config) - 1.6).abs() < f64::EPSILON);
        assert!((pin_scale(1, &config) - 1.6).abs() < f64::EPSILON);
        assert!((pin_scale(2, &config) - 2.6).abs() < f64::EPSILON);
        assert!((pin_scale(4, &config) - 3.6).abs() < f64::EPSILON);
    }

    #[test]
    fn test_pin_metrics() {
        let config = PinConfig::default();
        let m = PinMetrics::compute(2, &config);
        assert!((m.width - 14.0 * 2.6).abs() < 1e-9);
        assert!((m.height - 26.92 * 2.6).abs() < 1e-9);
        assert!((m.label_y - (m.height * 0.58 + 2.0 * 2.1)).abs() < 1e-9);
        assert!((m.center_dot_y - m.height * 0.74).abs() < 1e-9);
        assert!((m.center_dot_radius - (m.width / 2.0 - 1.5 + 0.5)).abs() < 1e-9);
        assert!((m.offset.x - m.width / 2.0).abs() < 1e-9);
        assert!((m.offset.y - 2.6).abs() < 1e-9);
    }
}
