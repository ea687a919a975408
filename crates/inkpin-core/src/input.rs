//! Pointer events fed to a drawing session.

use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Pointer event type for unified mouse/touch handling.
///
/// Positions are in screen coordinates; the surface maps them to its own.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PointerEvent {
    Down { position: Point },
    Move { position: Point },
    Up,
    /// The pointer left the surface; ends a gesture like `Up`.
    Leave,
}

impl PointerEvent {
    pub fn position(&self) -> Option<Point> {
        match self {
            PointerEvent::Down { position } | PointerEvent::Move { position } => Some(*position),
            PointerEvent::Up | PointerEvent::Leave => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position() {
        let down = PointerEvent::Down { position: Point::new(1.0, 2.0) };
        assert_eq!(down.position(), Some(Point::new(1.0, 2.0)));
        assert_eq!(PointerEvent::Leave.position(), None);
    }

    #[test]
    fn test_json_shape() {
        let event: PointerEvent =
            serde_json::from_str(r#"{"type": "move", "position": {"x": 3.0, "y": 4.0}}"#).unwrap();
        assert_eq!(event, PointerEvent::Move { position: Point::new(3.0, 4.0) });
        let up: PointerEvent = serde_json::from_str(r#"{"type": "up"}"#).unwrap();
        assert_eq!(up, PointerEvent::Up);
    }
}
