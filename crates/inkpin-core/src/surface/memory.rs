//! In-memory surface for tests, headless use and script replay.

use super::{Surface, SurfaceDocument, SurfaceError, SurfaceResult};
use crate::history::Snapshot;
use crate::shapes::{Shape, ShapeId};
use kurbo::{Point, Size, Vec2};

/// A shape plus its interaction state.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceNode {
    pub shape: Shape,
    pub opacity: f64,
    pub draggable: bool,
    pub bound: bool,
}

impl SurfaceNode {
    fn new(shape: Shape) -> Self {
        Self {
            shape,
            opacity: 1.0,
            draggable: false,
            bound: false,
        }
    }
}

/// Surface backed by a z-ordered node list.
#[derive(Debug, Clone)]
pub struct MemorySurface {
    nodes: Vec<SurfaceNode>,
    size: Size,
    /// Screen position of the surface's top-left corner.
    origin: Point,
    ready: bool,
    repaints: usize,
}

impl Default for MemorySurface {
    fn default() -> Self {
        Self::new(Size::new(800.0, 600.0))
    }
}

impl MemorySurface {
    pub fn new(size: Size) -> Self {
        Self {
            nodes: Vec::new(),
            size,
            origin: Point::ZERO,
            ready: true,
            repaints: 0,
        }
    }

    /// Place the surface at `origin` in screen space.
    pub fn with_origin(mut self, origin: Point) -> Self {
        self.origin = origin;
        self
    }

    pub fn set_ready(&mut self, ready: bool) {
        self.ready = ready;
    }

    /// Number of repaint requests so far.
    pub fn repaint_count(&self) -> usize {
        self.repaints
    }

    /// Nodes back to front.
    pub fn nodes(&self) -> &[SurfaceNode] {
        &self.nodes
    }

    pub fn node(&self, id: ShapeId) -> Option<&SurfaceNode> {
        self.nodes.iter().find(|n| n.shape.id() == id)
    }

    fn node_mut(&mut self, id: ShapeId) -> SurfaceResult<&mut SurfaceNode> {
        self.nodes
            .iter_mut()
            .find(|n| n.shape.id() == id)
            .ok_or(SurfaceError::UnknownShape(id))
    }
}

impl Surface for MemorySurface {
    fn is_ready(&self) -> bool {
        self.ready
    }

    fn size(&self) -> Size {
        self.size
    }

    fn resolve_pointer(&self, screen: Point) -> Option<Point> {
        let local = screen - self.origin.to_vec2();
        let inside = (0.0..=self.size.width).contains(&local.x)
            && (0.0..=self.size.height).contains(&local.y);
        inside.then_some(local)
    }

    fn shape_at(&self, point: Point, tolerance: f64) -> Option<ShapeId> {
        self.nodes
            .iter()
            .rev()
            .find(|n| n.shape.hit_test(point, tolerance))
            .map(|n| n.shape.id())
    }

    fn add_shape(&mut self, shape: Shape) -> ShapeId {
        let id = shape.id();
        self.nodes.push(SurfaceNode::new(shape));
        id
    }

    fn remove_shape(&mut self, id: ShapeId) -> Option<Shape> {
        let index = self.nodes.iter().position(|n| n.shape.id() == id)?;
        Some(self.nodes.remove(index).shape)
    }

    fn shape(&self, id: ShapeId) -> Option<&Shape> {
        self.node(id).map(|n| &n.shape)
    }

    fn shape_mut(&mut self, id: ShapeId) -> Option<&mut Shape> {
        self.nodes
            .iter_mut()
            .find(|n| n.shape.id() == id)
            .map(|n| &mut n.shape)
    }

    fn shape_ids(&self) -> Vec<ShapeId> {
        self.nodes.iter().map(|n| n.shape.id()).collect()
    }

    fn clear(&mut self) {
        self.nodes.clear();
    }

    fn serialize(&self) -> SurfaceResult<Snapshot> {
        let doc = SurfaceDocument {
            shapes: self.nodes.iter().map(|n| n.shape.clone()).collect(),
        };
        doc.to_snapshot()
    }

    fn restore(&mut self, snapshot: &Snapshot) -> SurfaceResult<Vec<ShapeId>> {
        let doc = SurfaceDocument::from_snapshot(snapshot)?;
        self.nodes = doc.shapes.into_iter().map(SurfaceNode::new).collect();
        Ok(self.shape_ids())
    }

    fn repaint(&mut self) {
        self.repaints += 1;
    }

    fn set_opacity(&mut self, id: ShapeId, opacity: f64) -> SurfaceResult<()> {
        self.node_mut(id)?.opacity = opacity.clamp(0.0, 1.0);
        Ok(())
    }

    fn opacity(&self, id: ShapeId) -> Option<f64> {
        self.node(id).map(|n| n.opacity)
    }

    fn set_draggable(&mut self, id: ShapeId, draggable: bool) -> SurfaceResult<()> {
        self.node_mut(id)?.draggable = draggable;
        Ok(())
    }

    fn is_draggable(&self, id: ShapeId) -> bool {
        self.node(id).is_some_and(|n| n.draggable)
    }

    fn bind(&mut self, id: ShapeId) -> SurfaceResult<()> {
        self.node_mut(id)?.bound = true;
        Ok(())
    }

    fn is_bound(&self, id: ShapeId) -> bool {
        self.node(id).is_some_and(|n| n.bound)
    }

    fn translate(&mut self, id: ShapeId, delta: Vec2) -> SurfaceResult<bool> {
        let node = self.node_mut(id)?;
        if !node.draggable {
            return Ok(false);
        }
        node.shape.translate(delta);
        Ok(true)
    }
}
