//! Freehand pen stroke.

use super::{points_bounds, point_to_polyline_dist, ShapeId, ShapeStyle, ShapeTrait};
use kurbo::{BezPath, Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// An open polyline recorded from pointer samples.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pen {
    pub(crate) id: ShapeId,
    /// Recorded points, oldest first.
    pub points: Vec<Point>,
    /// Style properties.
    pub style: ShapeStyle,
    #[serde(default)]
    pub custom_metadata: Option<Value>,
}

impl Pen {
    /// Start a stroke at `origin`.
    pub fn new(origin: Point) -> Self {
        Self::from_points(vec![origin])
    }

    /// Create from existing points.
    pub fn from_points(points: Vec<Point>) -> Self {
        Self {
            id: Uuid::new_v4(),
            points,
            style: ShapeStyle::default(),
            custom_metadata: None,
        }
    }

    /// Add a point to the path.
    pub fn add_point(&mut self, point: Point) {
        self.points.push(point);
    }

    /// Get the number of points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Check if the path is empty.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

impl ShapeTrait for Pen {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn bounds(&self) -> Rect {
        points_bounds(&self.points)
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        point_to_polyline_dist(point, &self.points) <= tolerance + self.style.stroke_width / 2.0
    }

    fn to_path(&self) -> BezPath {
        let mut path = BezPath::new();
        let Some((first, rest)) = self.points.split_first() else {
            return path;
        };

        path.move_to(*first);
        for point in rest {
            path.line_to(*point);
        }
        path
    }

    fn style(&self) -> &ShapeStyle {
        &self.style
    }

    fn translate(&mut self, delta: Vec2) {
        for point in &mut self.points {
            *point += delta;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pen_starts_with_origin() {
        let pen = Pen::new(Point::new(3.0, 4.0));
        assert_eq!(pen.len(), 1);
        assert!(!pen.is_empty());
    }

    #[test]
    fn test_add_points() {
        let mut pen = Pen::new(Point::ZERO);
        pen.add_point(Point::new(10.0, 10.0));
        assert_eq!(pen.len(), 2);
        assert_eq!(pen.to_path().elements().len(), 2);
    }

    #[test]
    fn test_bounds() {
        let pen = Pen::from_points(vec![
            Point::new(0.0, 0.0),
            Point::new(100.0, 50.0),
            Point::new(50.0, 100.0),
        ]);

        let bounds = pen.bounds();
        assert!((bounds.x0).abs() < f64::EPSILON);
        assert!((bounds.y0).abs() < f64::EPSILON);
        assert!((bounds.x1 - 100.0).abs() < f64::EPSILON);
        assert!((bounds.y1 - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_hit_test() {
        let pen = Pen::from_points(vec![Point::new(0.0, 0.0), Point::new(100.0, 0.0)]);

        assert!(pen.hit_test(Point::new(50.0, 0.0), 5.0));
        assert!(!pen.hit_test(Point::new(50.0, 20.0), 5.0));
    }

    #[test]
    fn test_translate() {
        let mut pen = Pen::from_points(vec![Point::new(1.0, 1.0), Point::new(2.0, 3.0)]);
        pen.translate(Vec2::new(10.0, -1.0));
        assert_eq!(pen.points, vec![Point::new(11.0, 0.0), Point::new(12.0, 2.0)]);
    }
}
