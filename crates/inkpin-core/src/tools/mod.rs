//! Drawing tools and the per-tool shape factory.
//!
//! Each shape-producing tool has one [`ToolShape`] entry describing how a
//! shape is created at the first pointer position, how it follows the pointer,
//! and whether the finished shape is worth a history entry. The session looks
//! the entry up once per gesture and keeps it for the gesture's lifetime.

use crate::config::SessionConfig;
use crate::geometry::{ellipse_from_drag, rectangle_from_drag};
use crate::shapes::{
    Arrow, Ellipse, Line, Pen, Pin, Rectangle, SerializableColor, Shape, ShapeId, ShapeStyle, Text,
};
use kurbo::Point;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Tool errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ToolError {
    #[error("Unsupported tool: {0}")]
    Unsupported(String),
}

/// Available tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolKind {
    Pen,
    Line,
    Arrow,
    Circle,
    Rectangle,
    Text,
    Pin,
    /// Move existing shapes; never creates one.
    Drag,
}

impl ToolKind {
    pub const ALL: [ToolKind; 8] = [
        ToolKind::Pen,
        ToolKind::Line,
        ToolKind::Arrow,
        ToolKind::Circle,
        ToolKind::Rectangle,
        ToolKind::Text,
        ToolKind::Pin,
        ToolKind::Drag,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ToolKind::Pen => "pen",
            ToolKind::Line => "line",
            ToolKind::Arrow => "arrow",
            ToolKind::Circle => "circle",
            ToolKind::Rectangle => "rectangle",
            ToolKind::Text => "text",
            ToolKind::Pin => "pin",
            ToolKind::Drag => "drag",
        }
    }

    /// Tools whose shape follows the pointer between down and up.
    pub fn is_drawing_tool(&self) -> bool {
        matches!(
            self,
            ToolKind::Pen | ToolKind::Line | ToolKind::Arrow | ToolKind::Circle | ToolKind::Rectangle
        )
    }

    /// Factory entry for this tool.
    pub fn factory(self) -> Result<&'static ToolShape, ToolError> {
        match self {
            ToolKind::Pen => Ok(&PEN),
            ToolKind::Line => Ok(&LINE),
            ToolKind::Arrow => Ok(&ARROW),
            ToolKind::Circle => Ok(&CIRCLE),
            ToolKind::Rectangle => Ok(&RECTANGLE),
            ToolKind::Text => Ok(&TEXT),
            ToolKind::Pin => Ok(&PIN),
            ToolKind::Drag => Err(ToolError::Unsupported(self.name().to_string())),
        }
    }
}

impl fmt::Display for ToolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ToolKind {
    type Err = ToolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase();
        ToolKind::ALL
            .into_iter()
            .find(|tool| tool.name() == name)
            .ok_or_else(|| ToolError::Unsupported(s.to_string()))
    }
}

/// Style read at shape creation time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Style {
    pub color: SerializableColor,
    pub stroke_size: f64,
    pub font_size: f64,
}

impl Style {
    pub fn from_config(config: &SessionConfig) -> Self {
        Self {
            color: config.default_color,
            stroke_size: config.stroke_size.default,
            font_size: config.font_size.default,
        }
    }

    fn stroke(&self) -> ShapeStyle {
        ShapeStyle::stroke(self.color, self.stroke_size)
    }

    /// Stroke with a transparent fill, so presses inside the outline hit.
    fn interior(&self) -> ShapeStyle {
        self.stroke().with_fill(SerializableColor::transparent())
    }
}

/// Tool-specific creation input.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ShapeExtra {
    #[default]
    None,
    Text(String),
    Pin {
        label: String,
        label_color: SerializableColor,
    },
}

/// Everything a factory needs to build a shape.
#[derive(Debug, Clone, Copy)]
pub struct ShapeSeed<'a> {
    pub origin: Point,
    pub style: &'a Style,
    pub extra: &'a ShapeExtra,
    pub config: &'a SessionConfig,
}

/// Per-tool construction, update and commit policy.
#[derive(Debug)]
pub struct ToolShape {
    pub kind: ToolKind,
    pub create: fn(&ShapeSeed<'_>) -> Shape,
    /// Update the live shape from the gesture start and the current pointer.
    pub draw_step: fn(&mut Shape, Point, Point),
    pub should_commit: fn(&Shape) -> bool,
}

static PEN: ToolShape = ToolShape {
    kind: ToolKind::Pen,
    create: create_pen,
    draw_step: pen_step,
    should_commit: pen_should_commit,
};

static LINE: ToolShape = ToolShape {
    kind: ToolKind::Line,
    create: create_line,
    draw_step: segment_step,
    should_commit: always_commit,
};

static ARROW: ToolShape = ToolShape {
    kind: ToolKind::Arrow,
    create: create_arrow,
    draw_step: segment_step,
    should_commit: always_commit,
};

static CIRCLE: ToolShape = ToolShape {
    kind: ToolKind::Circle,
    create: create_ellipse,
    draw_step: ellipse_step,
    should_commit: ellipse_should_commit,
};

static RECTANGLE: ToolShape = ToolShape {
    kind: ToolKind::Rectangle,
    create: create_rectangle,
    draw_step: rectangle_step,
    should_commit: rectangle_should_commit,
};

static TEXT: ToolShape = ToolShape {
    kind: ToolKind::Text,
    create: create_text,
    draw_step: no_step,
    should_commit: always_commit,
};

static PIN: ToolShape = ToolShape {
    kind: ToolKind::Pin,
    create: create_pin,
    draw_step: no_step,
    should_commit: always_commit,
};

fn create_pen(seed: &ShapeSeed<'_>) -> Shape {
    let mut pen = Pen::new(seed.origin);
    pen.style = seed.style.stroke();
    Shape::Pen(pen)
}

fn create_line(seed: &ShapeSeed<'_>) -> Shape {
    let mut line = Line::new(seed.origin, seed.origin);
    line.style = seed.style.stroke();
    Shape::Line(line)
}

fn create_arrow(seed: &ShapeSeed<'_>) -> Shape {
    let mut arrow = Arrow::new(seed.origin, seed.origin);
    arrow.style = seed.style.stroke().with_fill(seed.style.color);
    Shape::Arrow(arrow)
}

fn create_ellipse(seed: &ShapeSeed<'_>) -> Shape {
    let mut ellipse = Ellipse::new(seed.origin, 0.0, 0.0);
    ellipse.style = seed.style.interior();
    Shape::Ellipse(ellipse)
}

fn create_rectangle(seed: &ShapeSeed<'_>) -> Shape {
    let mut rect = Rectangle::new(seed.origin, 0.0, 0.0);
    rect.style = seed.style.interior();
    Shape::Rectangle(rect)
}

fn create_text(seed: &ShapeSeed<'_>) -> Shape {
    let content = match seed.extra {
        ShapeExtra::Text(content) => content.clone(),
        _ => String::new(),
    };
    let text = Text::anchored(
        seed.origin,
        content,
        seed.style.font_size,
        seed.config.text_y_offset_coefficient,
    )
    .with_font_family(seed.config.text_font_family.clone())
    .with_color(seed.style.color);
    Shape::Text(text)
}

fn create_pin(seed: &ShapeSeed<'_>) -> Shape {
    let (label, label_color) = match seed.extra {
        ShapeExtra::Pin { label, label_color } => (
            label.chars().take(seed.config.pin_label_max_len).collect(),
            *label_color,
        ),
        _ => (String::new(), seed.config.contrast.contrast_for(seed.style.color)),
    };
    Shape::Pin(Pin::new(
        seed.origin,
        label,
        seed.style.color,
        label_color,
        &seed.config.pin,
    ))
}

fn pen_step(shape: &mut Shape, _start: Point, current: Point) {
    if let Shape::Pen(pen) = shape {
        pen.add_point(current);
    }
}

fn segment_step(shape: &mut Shape, _start: Point, current: Point) {
    match shape {
        Shape::Line(line) => line.end = current,
        Shape::Arrow(arrow) => arrow.end = current,
        _ => {}
    }
}

fn ellipse_step(shape: &mut Shape, start: Point, current: Point) {
    if let Shape::Ellipse(ellipse) = shape {
        let (center, rx, ry) = ellipse_from_drag(start, current);
        ellipse.set_geometry(center, rx, ry);
    }
}

fn rectangle_step(shape: &mut Shape, start: Point, current: Point) {
    if let Shape::Rectangle(rect) = shape {
        let (origin, width, height) = rectangle_from_drag(start, current);
        rect.set_geometry(origin, width, height);
    }
}

fn no_step(_shape: &mut Shape, _start: Point, _current: Point) {}

fn pen_should_commit(shape: &Shape) -> bool {
    matches!(shape, Shape::Pen(pen) if pen.len() > 1)
}

fn ellipse_should_commit(shape: &Shape) -> bool {
    matches!(shape, Shape::Ellipse(e) if e.radius_x > 0.0 && e.radius_y > 0.0)
}

fn rectangle_should_commit(shape: &Shape) -> bool {
    matches!(shape, Shape::Rectangle(r) if r.width > 0.0 && r.height > 0.0)
}

fn always_commit(_shape: &Shape) -> bool {
    true
}

/// Build a shape for `tool` at `origin`, tagged with the configured metadata.
pub fn create(
    tool: ToolKind,
    origin: Point,
    style: &Style,
    extra: &ShapeExtra,
    config: &SessionConfig,
) -> Result<Shape, ToolError> {
    let factory = tool.factory()?;
    Ok(factory.build(&ShapeSeed {
        origin,
        style,
        extra,
        config,
    }))
}

impl ToolShape {
    /// Create a shape and attach the configured custom metadata.
    pub fn build(&self, seed: &ShapeSeed<'_>) -> Shape {
        let mut shape = (self.create)(seed);
        shape.set_custom_metadata(seed.config.custom_metadata.clone());
        shape
    }
}

/// Whether a finished shape deserves a history entry.
pub fn should_commit(shape: &Shape) -> bool {
    match shape.tool().factory() {
        Ok(factory) => (factory.should_commit)(shape),
        Err(_) => false,
    }
}

/// Gesture state of a drawing session.
#[derive(Debug, Clone, Copy, Default)]
pub enum ToolState {
    #[default]
    Idle,
    /// A shape is following the pointer.
    Drawing {
        shape: ShapeId,
        tool: ToolKind,
        factory: &'static ToolShape,
        start: Point,
        last: Point,
    },
    /// A text placement waits for its content.
    TextPending { at: Point },
}

impl ToolState {
    pub fn is_drawing(&self) -> bool {
        matches!(self, ToolState::Drawing { .. })
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, ToolState::Idle)
    }
}
