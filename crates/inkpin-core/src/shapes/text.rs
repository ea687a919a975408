//! Text shape.

use super::{SerializableColor, ShapeId, ShapeStyle, ShapeTrait};
use kurbo::{BezPath, Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// A single or multi-line text label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Text {
    pub(crate) id: ShapeId,
    /// Position (top-left corner of text bounding box).
    pub position: Point,
    /// The text content.
    pub content: String,
    /// Font size in pixels.
    pub font_size: f64,
    /// Font family name handed to the renderer.
    pub font_family: String,
    /// Style properties. Text color is both stroke and fill.
    pub style: ShapeStyle,
    #[serde(default)]
    pub custom_metadata: Option<Value>,
}

impl Text {
    pub const DEFAULT_FONT_SIZE: f64 = 16.0;
    pub const DEFAULT_FONT_FAMILY: &'static str = "Arial";

    /// Create a new text shape.
    pub fn new(position: Point, content: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            position,
            content,
            font_size: Self::DEFAULT_FONT_SIZE,
            font_family: Self::DEFAULT_FONT_FAMILY.to_string(),
            style: ShapeStyle::default(),
            custom_metadata: None,
        }
    }

    /// Create a text whose top edge sits `font_size / y_offset_coefficient`
    /// above the clicked point, so the first line is centered on the click.
    pub fn anchored(click: Point, content: String, font_size: f64, y_offset_coefficient: f64) -> Self {
        let lift = if y_offset_coefficient > 0.0 {
            font_size / y_offset_coefficient
        } else {
            0.0
        };
        Self::new(Point::new(click.x, click.y - lift), content).with_font_size(font_size)
    }

    pub fn with_font_size(mut self, size: f64) -> Self {
        self.font_size = size;
        self
    }

    pub fn with_font_family(mut self, family: impl Into<String>) -> Self {
        self.font_family = family.into();
        self
    }

    /// Set the text color (stroke and fill).
    pub fn with_color(mut self, color: SerializableColor) -> Self {
        self.style = ShapeStyle::stroke(color, self.style.stroke_width).with_fill(color);
        self
    }

    /// Get the text content.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Approximate width based on the longest line and font size.
    fn approximate_width(&self) -> f64 {
        let max_line_len = self
            .content
            .lines()
            .map(|line| line.chars().count())
            .max()
            .unwrap_or(0);
        max_line_len as f64 * self.font_size * 0.55
    }

    /// Approximate height based on font size and number of lines.
    fn approximate_height(&self) -> f64 {
        let line_count = self.content.lines().count().max(1);
        let line_count = if self.content.ends_with('\n') {
            line_count + 1
        } else {
            line_count
        };
        line_count as f64 * self.font_size * 1.2
    }
}

impl ShapeTrait for Text {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn bounds(&self) -> Rect {
        let width = self.approximate_width().max(20.0);
        let height = self.approximate_height();
        Rect::new(
            self.position.x,
            self.position.y,
            self.position.x + width,
            self.position.y + height,
        )
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        self.bounds().inflate(tolerance, tolerance).contains(point)
    }

    fn to_path(&self) -> BezPath {
        // No glyph outlines here; the box stands in for selection rendering.
        let bounds = self.bounds();
        let mut path = BezPath::new();
        path.move_to(Point::new(bounds.x0, bounds.y0));
        path.line_to(Point::new(bounds.x1, bounds.y0));
        path.line_to(Point::new(bounds.x1, bounds.y1));
        path.line_to(Point::new(bounds.x0, bounds.y1));
        path.close_path();
        path
    }

    fn style(&self) -> &ShapeStyle {
        &self.style
    }

    fn translate(&mut self, delta: Vec2) {
        self.position += delta;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_creation() {
        let text = Text::new(Point::new(100.0, 100.0), "Hello".to_string());
        assert_eq!(text.content(), "Hello");
        assert!((text.font_size - Text::DEFAULT_FONT_SIZE).abs() < f64::EPSILON);
        assert_eq!(text.font_family, "Arial");
    }

    #[test]
    fn test_anchored_lifts_by_font_size() {
        let text = Text::anchored(Point::new(10.0, 50.0), "hi".to_string(), 20.0, 2.5);
        assert!((text.position.x - 10.0).abs() < f64::EPSILON);
        assert!((text.position.y - 42.0).abs() < f64::EPSILON);
        assert!((text.font_size - 20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_color_sets_stroke_and_fill() {
        let red = SerializableColor::rgb(255, 0, 0);
        let text = Text::new(Point::ZERO, "a".to_string()).with_color(red);
        assert_eq!(text.style.stroke_color, red);
        assert_eq!(text.style.fill_color, Some(red));
    }

    #[test]
    fn test_multiline_bounds() {
        let text = Text::new(Point::ZERO, "one\ntwo\n".to_string()).with_font_size(10.0);
        let bounds = text.bounds();
        assert!((bounds.height() - 36.0).abs() < 1e-9);
        assert!(text.hit_test(Point::new(5.0, 5.0), 0.0));
        assert!(!text.hit_test(Point::new(5.0, 50.0), 0.0));
    }
}
