//! Placement of the external text editor opened by the text tool.

use kurbo::{Point, Size};
use serde::{Deserialize, Serialize};

/// Surface quadrant a point falls in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Quadrant {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Quadrant {
    /// Points on the center lines belong to the right/bottom half.
    pub fn of(point: Point, surface: Size) -> Self {
        let top = point.y < surface.height / 2.0;
        let left = point.x < surface.width / 2.0;
        match (top, left) {
            (true, true) => Quadrant::TopLeft,
            (true, false) => Quadrant::TopRight,
            (false, true) => Quadrant::BottomLeft,
            (false, false) => Quadrant::BottomRight,
        }
    }
}

/// Where a pending text will be placed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TextPlacement {
    /// Clicked point in surface coordinates.
    pub at: Point,
    pub quadrant: Quadrant,
}

impl TextPlacement {
    pub fn new(at: Point, surface: Size) -> Self {
        Self {
            at,
            quadrant: Quadrant::of(at, surface),
        }
    }
}

/// Width of an editor able to show `text` at `font_size`.
pub fn text_editor_width(text: &str, font_size: f64) -> f64 {
    let longest = text.split('\n').map(|line| line.chars().count()).max().unwrap_or(0);
    (longest + 3) as f64 * (font_size / 2.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quadrants() {
        let size = Size::new(800.0, 600.0);
        assert_eq!(Quadrant::of(Point::new(10.0, 10.0), size), Quadrant::TopLeft);
        assert_eq!(Quadrant::of(Point::new(400.0, 10.0), size), Quadrant::TopRight);
        assert_eq!(Quadrant::of(Point::new(10.0, 300.0), size), Quadrant::BottomLeft);
        assert_eq!(Quadrant::of(Point::new(799.0, 599.0), size), Quadrant::BottomRight);
    }

    #[test]
    fn test_editor_width() {
        assert!((text_editor_width("", 16.0) - 24.0).abs() < f64::EPSILON);
        assert!((text_editor_width("ab\nabcde", 10.0) - 40.0).abs() < f64::EPSILON);
        // Counts characters, not bytes
        assert!((text_editor_width("ééé", 2.0) - 6.0).abs() < f64::EPSILON);
    }
}
