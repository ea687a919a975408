//! Shape definitions for the annotation surface.

mod arrow;
mod color;
mod ellipse;
mod line;
mod pen;
mod pin;
mod rectangle;
mod text;

pub use arrow::Arrow;
pub use color::{palette, ColorParseError, ContrastMap, ContrastPair, SerializableColor};
pub use ellipse::Ellipse;
pub use line::Line;
pub use pen::Pen;
pub use pin::{Pin, PinAppearance};
pub use rectangle::Rectangle;
pub use text::Text;

use crate::tools::ToolKind;
use kurbo::{BezPath, Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Unique identifier for shapes.
pub type ShapeId = Uuid;

/// Style properties copied into a shape when it is created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeStyle {
    /// Stroke color.
    pub stroke_color: SerializableColor,
    /// Stroke width.
    pub stroke_width: f64,
    /// Fill color (None = no fill).
    #[serde(default)]
    pub fill_color: Option<SerializableColor>,
}

impl ShapeStyle {
    /// Outline-only style.
    pub fn stroke(color: SerializableColor, width: f64) -> Self {
        Self {
            stroke_color: color,
            stroke_width: width,
            fill_color: None,
        }
    }

    /// Builder-style fill setter.
    pub fn with_fill(mut self, color: SerializableColor) -> Self {
        self.fill_color = Some(color);
        self
    }
}

impl Default for ShapeStyle {
    fn default() -> Self {
        Self::stroke(SerializableColor::black(), 2.0)
    }
}

/// Distance from a point to a line segment (a→b).
pub fn point_to_segment_dist(point: Point, a: Point, b: Point) -> f64 {
    let seg = Vec2::new(b.x - a.x, b.y - a.y);
    let pv = Vec2::new(point.x - a.x, point.y - a.y);
    let len_sq = seg.hypot2();
    if len_sq < f64::EPSILON {
        return pv.hypot();
    }
    let t = (pv.dot(seg) / len_sq).clamp(0.0, 1.0);
    let proj = Point::new(a.x + t * seg.x, a.y + t * seg.y);
    (point - proj).hypot()
}

/// Minimum distance from a point to a polyline (sequence of connected segments).
pub fn point_to_polyline_dist(point: Point, points: &[Point]) -> f64 {
    match points {
        [] => f64::INFINITY,
        [only] => (point - *only).hypot(),
        _ => points
            .windows(2)
            .map(|w| point_to_segment_dist(point, w[0], w[1]))
            .fold(f64::INFINITY, f64::min),
    }
}

/// Bounding box of a point cloud (zero rect when empty).
pub(crate) fn points_bounds(points: &[Point]) -> Rect {
    let Some(first) = points.first() else {
        return Rect::ZERO;
    };
    points
        .iter()
        .skip(1)
        .fold(Rect::from_points(*first, *first), |r, p| r.union_pt(*p))
}

/// Common trait for all shapes.
pub trait ShapeTrait {
    /// Get the unique identifier.
    fn id(&self) -> ShapeId;

    /// Get the bounding box in surface coordinates.
    fn bounds(&self) -> Rect;

    /// Check if a point (in surface coordinates) hits this shape.
    fn hit_test(&self, point: Point, tolerance: f64) -> bool;

    /// Get the path representation for rendering.
    fn to_path(&self) -> BezPath;

    /// Get the style.
    fn style(&self) -> &ShapeStyle;

    /// Move the shape by `delta` without changing its size.
    fn translate(&mut self, delta: Vec2);
}

/// Enum wrapper for all shape types (for serialization).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Pen(Pen),
    Line(Line),
    Arrow(Arrow),
    Ellipse(Ellipse),
    Rectangle(Rectangle),
    Text(Text),
    Pin(Pin),
}

macro_rules! dispatch {
    ($shape:expr, $s:ident => $body:expr) => {
        match $shape {
            Shape::Pen($s) => $body,
            Shape::Line($s) => $body,
            Shape::Arrow($s) => $body,
            Shape::Ellipse($s) => $body,
            Shape::Rectangle($s) => $body,
            Shape::Text($s) => $body,
            Shape::Pin($s) => $body,
        }
    };
}

impl Shape {
    pub fn id(&self) -> ShapeId {
        dispatch!(self, s => s.id())
    }

    /// The tool that produced this shape.
    pub fn tool(&self) -> ToolKind {
        match self {
            Shape::Pen(_) => ToolKind::Pen,
            Shape::Line(_) => ToolKind::Line,
            Shape::Arrow(_) => ToolKind::Arrow,
            Shape::Ellipse(_) => ToolKind::Circle,
            Shape::Rectangle(_) => ToolKind::Rectangle,
            Shape::Text(_) => ToolKind::Text,
            Shape::Pin(_) => ToolKind::Pin,
        }
    }

    pub fn bounds(&self) -> Rect {
        dispatch!(self, s => s.bounds())
    }

    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        dispatch!(self, s => s.hit_test(point, tolerance))
    }

    pub fn to_path(&self) -> BezPath {
        dispatch!(self, s => s.to_path())
    }

    pub fn style(&self) -> &ShapeStyle {
        dispatch!(self, s => s.style())
    }

    pub fn translate(&mut self, delta: Vec2) {
        dispatch!(self, s => s.translate(delta))
    }

    /// Caller-supplied metadata attached at creation time.
    pub fn custom_metadata(&self) -> Option<&Value> {
        dispatch!(self, s => s.custom_metadata.as_ref())
    }

    pub fn set_custom_metadata(&mut self, metadata: Option<Value>) {
        dispatch!(self, s => s.custom_metadata = metadata)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_distance() {
        let d = point_to_segment_dist(Point::new(5.0, 3.0), Point::ZERO, Point::new(10.0, 0.0));
        assert!((d - 3.0).abs() < f64::EPSILON);

        let d = point_to_segment_dist(Point::new(13.0, 4.0), Point::ZERO, Point::new(10.0, 0.0));
        assert!((d - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_polyline_single_point() {
        let d = point_to_polyline_dist(Point::new(3.0, 4.0), &[Point::ZERO]);
        assert!((d - 5.0).abs() < f64::EPSILON);
        assert!(point_to_polyline_dist(Point::ZERO, &[]).is_infinite());
    }

    #[test]
    fn test_tool_of_shape() {
        let rect = Shape::Rectangle(Rectangle::new(Point::ZERO, 10.0, 10.0));
        assert_eq!(rect.tool(), ToolKind::Rectangle);
        let ellipse = Shape::Ellipse(Ellipse::new(Point::ZERO, 1.0, 1.0));
        assert_eq!(ellipse.tool(), ToolKind::Circle);
    }

    #[test]
    fn test_custom_metadata() {
        let mut shape = Shape::Line(Line::new(Point::ZERO, Point::new(1.0, 1.0)));
        assert!(shape.custom_metadata().is_none());
        shape.set_custom_metadata(Some(serde_json::json!({"author": "ana"})));
        assert_eq!(shape.custom_metadata().unwrap()["author"], "ana");
    }

    #[test]
    fn test_serde_roundtrip_preserves_shape() {
        let shape = Shape::Rectangle(Rectangle::new(Point::new(1.0, 2.0), 3.0, 4.0));
        let json = serde_json::to_string(&shape).unwrap();
        let back: Shape = serde_json::from_str(&json).unwrap();
        assert_eq!(shape, back);
    }
}
