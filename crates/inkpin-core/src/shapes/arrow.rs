//! Arrow shape.

use super::{point_to_segment_dist, ShapeId, ShapeStyle, ShapeTrait};
use kurbo::{BezPath, Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// A line with a filled arrowhead at its end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Arrow {
    pub(crate) id: ShapeId,
    /// Start point.
    pub start: Point,
    /// End point (where the arrowhead points).
    pub end: Point,
    /// Length of the arrowhead along the shaft.
    pub head_size: f64,
    /// Style properties.
    pub style: ShapeStyle,
    #[serde(default)]
    pub custom_metadata: Option<Value>,
}

impl Arrow {
    pub const DEFAULT_HEAD_SIZE: f64 = 10.0;

    /// Create a new arrow.
    pub fn new(start: Point, end: Point) -> Self {
        Self {
            id: Uuid::new_v4(),
            start,
            end,
            head_size: Self::DEFAULT_HEAD_SIZE,
            style: ShapeStyle::default(),
            custom_metadata: None,
        }
    }

    /// Get the direction vector (normalized).
    pub fn direction(&self) -> Vec2 {
        let v = self.end - self.start;
        let len = v.hypot();
        if len < f64::EPSILON {
            Vec2::new(1.0, 0.0)
        } else {
            v / len
        }
    }

    /// Get the length of the arrow shaft.
    pub fn length(&self) -> f64 {
        (self.end - self.start).hypot()
    }

    /// The arrowhead triangle: tip, left corner, right corner.
    pub fn head(&self) -> [Point; 3] {
        let dir = self.direction();
        let perp = Vec2::new(-dir.y, dir.x);
        let back = self.end - dir * self.head_size;
        let half = self.head_size * 0.5;
        [self.end, back + perp * half, back - perp * half]
    }
}

impl ShapeTrait for Arrow {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn bounds(&self) -> Rect {
        let [tip, left, right] = self.head();
        Rect::from_points(self.start, tip)
            .union_pt(left)
            .union_pt(right)
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        if point_to_segment_dist(point, self.start, self.end) <= tolerance + self.style.stroke_width / 2.0 {
            return true;
        }

        // Point in triangle test
        fn sign(p1: Point, p2: Point, p3: Point) -> f64 {
            (p1.x - p3.x) * (p2.y - p3.y) - (p2.x - p3.x) * (p1.y - p3.y)
        }

        let [tip, left, right] = self.head();
        let d1 = sign(point, tip, left);
        let d2 = sign(point, left, right);
        let d3 = sign(point, right, tip);

        let has_neg = (d1 < 0.0) || (d2 < 0.0) || (d3 < 0.0);
        let has_pos = (d1 > 0.0) || (d2 > 0.0) || (d3 > 0.0);

        !(has_neg && has_pos)
    }

    fn to_path(&self) -> BezPath {
        let mut path = BezPath::new();

        // Shaft
        path.move_to(self.start);
        path.line_to(self.end);

        if self.start != self.end {
            let [tip, left, right] = self.head();
            path.move_to(left);
            path.line_to(tip);
            path.line_to(right);
            path.close_path();
        }

        path
    }

    fn style(&self) -> &ShapeStyle {
        &self.style
    }

    fn translate(&mut self, delta: Vec2) {
        self.start += delta;
        self.end += delta;
    }
}
