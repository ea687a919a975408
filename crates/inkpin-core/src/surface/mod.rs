//! The drawing surface the session renders into.
//!
//! A surface owns the live shapes in z-order together with per-node
//! interaction state (opacity, draggable, bound). The session never holds
//! shapes itself; it addresses them by [`ShapeId`].

mod memory;

pub use memory::{MemorySurface, SurfaceNode};

use crate::history::Snapshot;
use crate::shapes::{Shape, ShapeId};
use kurbo::{Point, Size, Vec2};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Surface errors.
#[derive(Debug, Error)]
pub enum SurfaceError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Unknown shape: {0}")]
    UnknownShape(ShapeId),
}

/// Result type for surface operations.
pub type SurfaceResult<T> = Result<T, SurfaceError>;

/// Serialized form of a surface, back to front.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SurfaceDocument {
    pub shapes: Vec<Shape>,
}

impl SurfaceDocument {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Capture as a history snapshot.
    pub fn to_snapshot(&self) -> SurfaceResult<Snapshot> {
        Ok(Snapshot::captured(self.to_json()?))
    }

    /// Decode a snapshot. `Empty` decodes to an empty document.
    pub fn from_snapshot(snapshot: &Snapshot) -> SurfaceResult<Self> {
        match snapshot.as_str() {
            None => Ok(Self::default()),
            Some(json) => Ok(Self::from_json(json)?),
        }
    }
}

/// Rendering surface consumed by the drawing session.
pub trait Surface {
    /// Whether the surface can be drawn on yet.
    fn is_ready(&self) -> bool {
        true
    }

    fn size(&self) -> Size;

    /// Map a screen position to surface coordinates, `None` if it falls
    /// outside the surface.
    fn resolve_pointer(&self, screen: Point) -> Option<Point>;

    /// Topmost shape under `point`.
    fn shape_at(&self, point: Point, tolerance: f64) -> Option<ShapeId>;

    /// Add a shape on top of the others.
    fn add_shape(&mut self, shape: Shape) -> ShapeId;

    fn remove_shape(&mut self, id: ShapeId) -> Option<Shape>;

    fn shape(&self, id: ShapeId) -> Option<&Shape>;

    fn shape_mut(&mut self, id: ShapeId) -> Option<&mut Shape>;

    /// Ids back to front.
    fn shape_ids(&self) -> Vec<ShapeId>;

    fn clear(&mut self);

    /// Capture every shape.
    fn serialize(&self) -> SurfaceResult<Snapshot>;

    /// Replace all shapes with the snapshot contents. Restored shapes are not
    /// bound; the caller re-binds them.
    fn restore(&mut self, snapshot: &Snapshot) -> SurfaceResult<Vec<ShapeId>>;

    /// Request a redraw.
    fn repaint(&mut self);

    fn set_opacity(&mut self, id: ShapeId, opacity: f64) -> SurfaceResult<()>;

    fn opacity(&self, id: ShapeId) -> Option<f64>;

    fn set_draggable(&mut self, id: ShapeId, draggable: bool) -> SurfaceResult<()>;

    fn is_draggable(&self, id: ShapeId) -> bool;

    /// Attach interaction handling (press selects, drag end commits).
    fn bind(&mut self, id: ShapeId) -> SurfaceResult<()>;

    fn is_bound(&self, id: ShapeId) -> bool;

    /// Drag motion. Only draggable shapes move; returns whether it moved.
    fn translate(&mut self, id: ShapeId, delta: Vec2) -> SurfaceResult<bool>;

    fn contains(&self, id: ShapeId) -> bool {
        self.shape(id).is_some()
    }

    fn is_empty(&self) -> bool {
        self.shape_ids().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::Line;

    #[test]
    fn test_document_snapshot_round_trip() {
        let doc = SurfaceDocument {
            shapes: vec![Shape::Line(Line::new(Point::ZERO, Point::new(3.0, 4.0)))],
        };
        let snapshot = doc.to_snapshot().unwrap();
        assert!(snapshot.as_str().unwrap().starts_with("{\"shapes\":"));
        assert_eq!(SurfaceDocument::from_snapshot(&snapshot).unwrap(), doc);
    }

    #[test]
    fn test_empty_snapshot_decodes_empty() {
        let doc = SurfaceDocument::from_snapshot(&Snapshot::Empty).unwrap();
        assert!(doc.shapes.is_empty());
    }

    #[test]
    fn test_corrupt_snapshot() {
        let err = SurfaceDocument::from_snapshot(&Snapshot::captured("{oops")).unwrap_err();
        assert!(matches!(err, SurfaceError::Serialization(_)));
    }
}
