//! Pin marker: a teardrop marker with a top dot, a colored center dot and a
//! short centered label, anchored at its tip.

use super::{SerializableColor, ShapeId, ShapeStyle, ShapeTrait};
use crate::config::PinConfig;
use crate::geometry::PinMetrics;
use kurbo::{Affine, BezPath, Circle, Point, Rect, Shape as KurboShape, SvgParseError, Vec2};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Marker path data in unscaled marker space (14 x 26.92).
pub const PIN_MARKER_PATH: &str = "M8.26172 13.0381C11.5252 13.6323 13.9998 16.4879 14 19.9229C14 23.7889 10.866 26.9238 7 26.9238C3.13401 26.9238 0 23.7889 0 19.9229C0.000219093 16.4667 2.50542 13.597 5.79883 13.0273L7.03027 0L8.26172 13.0381Z";

/// Fixed presentation of the pin sub-shapes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PinAppearance {
    /// SVG path data of the marker outline.
    pub marker_path: String,
    pub marker_fill: SerializableColor,
    pub marker_stroke: SerializableColor,
    /// Marker outline width; not scaled with the marker.
    pub marker_stroke_width: f64,
    pub top_dot_radius: f64,
    pub top_dot_fill: SerializableColor,
    pub top_dot_y_offset: f64,
    pub label_font_size: f64,
}

impl Default for PinAppearance {
    fn default() -> Self {
        Self {
            marker_path: PIN_MARKER_PATH.to_string(),
            marker_fill: SerializableColor::white(),
            marker_stroke: SerializableColor::rgb(0xCD, 0xCD, 0xCE),
            marker_stroke_width: 1.5,
            top_dot_radius: 3.0,
            top_dot_fill: SerializableColor::rgb(0x00, 0x7A, 0xFF),
            top_dot_y_offset: 2.0,
            label_font_size: 16.0,
        }
    }
}

/// A pin dropped at `anchor`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pin {
    pub(crate) id: ShapeId,
    /// Surface point the group is positioned at.
    pub anchor: Point,
    pub label: String,
    /// Label color, picked for contrast against the center dot.
    pub label_color: SerializableColor,
    /// Derived sizes, fixed at creation.
    pub metrics: PinMetrics,
    pub appearance: PinAppearance,
    /// Stroke color is the center dot fill.
    pub style: ShapeStyle,
    #[serde(default)]
    pub custom_metadata: Option<Value>,
}

impl Pin {
    pub fn new(
        anchor: Point,
        label: impl Into<String>,
        color: SerializableColor,
        label_color: SerializableColor,
        config: &PinConfig,
    ) -> Self {
        let label = label.into();
        let metrics = PinMetrics::compute(label.chars().count(), config);
        Self {
            id: Uuid::new_v4(),
            anchor,
            label,
            label_color,
            metrics,
            appearance: config.appearance.clone(),
            style: ShapeStyle::stroke(color, config.appearance.marker_stroke_width),
            custom_metadata: None,
        }
    }

    /// Color of the center dot.
    pub fn color(&self) -> SerializableColor {
        self.style.stroke_color
    }

    /// Top-left of the pin group in surface coordinates.
    pub fn origin(&self) -> Point {
        self.anchor - self.metrics.offset
    }

    /// Maps unscaled marker space onto the surface.
    pub fn marker_transform(&self) -> Affine {
        Affine::translate(self.origin().to_vec2()) * Affine::scale(self.metrics.scale)
    }

    /// Marker outline in surface coordinates.
    pub fn marker_path(&self) -> Result<BezPath, SvgParseError> {
        let path = BezPath::from_svg(&self.appearance.marker_path)?;
        Ok(self.marker_transform() * path)
    }

    pub fn top_dot(&self) -> Circle {
        let origin = self.origin();
        Circle::new(
            Point::new(
                origin.x + self.metrics.width / 2.0,
                origin.y + self.appearance.top_dot_y_offset,
            ),
            self.appearance.top_dot_radius,
        )
    }

    pub fn center_dot(&self) -> Circle {
        let origin = self.origin();
        Circle::new(
            Point::new(
                origin.x + self.metrics.width / 2.0,
                origin.y + self.metrics.center_dot_y,
            ),
            self.metrics.center_dot_radius.max(0.0),
        )
    }

    /// Label box: centered text spanning the marker width.
    pub fn label_box(&self) -> Rect {
        let origin = self.origin();
        let top = origin.y + self.metrics.label_y;
        Rect::new(
            origin.x,
            top,
            origin.x + self.metrics.width,
            top + self.appearance.label_font_size,
        )
    }
}

impl ShapeTrait for Pin {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn bounds(&self) -> Rect {
        let origin = self.origin();
        Rect::new(
            origin.x,
            origin.y,
            origin.x + self.metrics.width,
            origin.y + self.metrics.height,
        )
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        self.bounds().inflate(tolerance, tolerance).contains(point)
    }

    fn to_path(&self) -> BezPath {
        match self.marker_path() {
            Ok(path) => path,
            Err(err) => {
                log::warn!("Invalid pin marker path: {err}");
                self.bounds().to_path(0.1)
            }
        }
    }

    fn style(&self) -> &ShapeStyle {
        &self.style
    }

    fn translate(&mut self, delta: Vec2) {
        self.anchor += delta;
    }
}
