//! Single-shape selection.
//!
//! The selected shape is emphasized by lowering its opacity. Only one shape is
//! selected at a time and the selection is held as an id, so a shape removed
//! from the surface must be [`forget`](SelectionManager::forget)-ed explicitly.

use crate::shapes::ShapeId;
use crate::surface::{Surface, SurfaceResult};

pub const SELECTED_OPACITY: f64 = 0.8;
pub const UNSELECTED_OPACITY: f64 = 1.0;

#[derive(Debug, Clone)]
pub struct SelectionManager {
    selected: Option<ShapeId>,
    selected_opacity: f64,
    unselected_opacity: f64,
}

impl Default for SelectionManager {
    fn default() -> Self {
        Self::new(SELECTED_OPACITY, UNSELECTED_OPACITY)
    }
}

impl SelectionManager {
    pub fn new(selected_opacity: f64, unselected_opacity: f64) -> Self {
        Self {
            selected: None,
            selected_opacity,
            unselected_opacity,
        }
    }

    pub fn selected(&self) -> Option<ShapeId> {
        self.selected
    }

    pub fn is_selected(&self, id: ShapeId) -> bool {
        self.selected == Some(id)
    }

    /// Select `id`, releasing the previous selection. Selecting the current
    /// shape again does nothing.
    pub fn select<S: Surface + ?Sized>(&mut self, surface: &mut S, id: ShapeId) -> SurfaceResult<()> {
        if self.is_selected(id) {
            return Ok(());
        }
        self.deselect(surface, false);
        surface.set_opacity(id, self.selected_opacity)?;
        self.selected = Some(id);
        surface.repaint();
        log::debug!("Selected shape {id}");
        Ok(())
    }

    /// Clear the selection and restore the shape's opacity.
    pub fn deselect<S: Surface + ?Sized>(&mut self, surface: &mut S, repaint: bool) {
        let Some(id) = self.selected.take() else {
            return;
        };
        // The node may already be gone after a restore.
        if surface.set_opacity(id, self.unselected_opacity).is_err() {
            log::debug!("Deselected shape {id} is no longer on the surface");
        }
        if repaint {
            surface.repaint();
        }
    }

    /// Drop the selection if it references `id`, without touching the surface.
    pub fn forget(&mut self, id: ShapeId) {
        if self.is_selected(id) {
            self.selected = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{Rectangle, Shape};
    use crate::surface::MemorySurface;
    use kurbo::Point;

    fn surface_with_two() -> (MemorySurface, ShapeId, ShapeId) {
        let mut surface = MemorySurface::default();
        let a = surface.add_shape(Shape::Rectangle(Rectangle::new(Point::ZERO, 10.0, 10.0)));
        let b = surface.add_shape(Shape::Rectangle(Rectangle::new(Point::ZERO, 20.0, 20.0)));
        (surface, a, b)
    }

    #[test]
    fn test_select_sets_opacity() {
        let (mut surface, a, _) = surface_with_two();
        let mut selection = SelectionManager::default();
        selection.select(&mut surface, a).unwrap();
        assert_eq!(selection.selected(), Some(a));
        assert_eq!(surface.opacity(a), Some(SELECTED_OPACITY));
        assert_eq!(surface.repaint_count(), 1);
    }

    #[test]
    fn test_select_again_is_noop() {
        let (mut surface, a, _) = surface_with_two();
        let mut selection = SelectionManager::default();
        selection.select(&mut surface, a).unwrap();
        selection.select(&mut surface, a).unwrap();
        assert_eq!(surface.repaint_count(), 1);
    }

    #[test]
    fn test_select_other_releases_previous() {
        let (mut surface, a, b) = surface_with_two();
        let mut selection = SelectionManager::default();
        selection.select(&mut surface, a).unwrap();
        selection.select(&mut surface, b).unwrap();
        assert_eq!(surface.opacity(a), Some(UNSELECTED_OPACITY));
        assert_eq!(surface.opacity(b), Some(SELECTED_OPACITY));
        assert!(selection.is_selected(b));
    }

    #[test]
    fn test_deselect() {
        let (mut surface, a, _) = surface_with_two();
        let mut selection = SelectionManager::default();
        selection.select(&mut surface, a).unwrap();
        selection.deselect(&mut surface, true);
        assert_eq!(selection.selected(), None);
        assert_eq!(surface.opacity(a), Some(UNSELECTED_OPACITY));
        assert_eq!(surface.repaint_count(), 2);
        // Nothing selected: no repaint either
        selection.deselect(&mut surface, true);
        assert_eq!(surface.repaint_count(), 2);
    }

    #[test]
    fn test_forget_and_missing_shapes() {
        let (mut surface, a, b) = surface_with_two();
        let mut selection = SelectionManager::default();
        selection.select(&mut surface, a).unwrap();
        selection.forget(b);
        assert_eq!(selection.selected(), Some(a));
        surface.remove_shape(a);
        selection.forget(a);
        assert_eq!(selection.selected(), None);

        let missing = uuid::Uuid::new_v4();
        assert!(selection.select(&mut surface, missing).is_err());
        assert_eq!(selection.selected(), None);
    }
}
