//! inkpin core library
//!
//! Drawing session engine for an annotation surface: tools that build vector
//! shapes from pointer gestures, a single-shape selection, and a bounded
//! undo/redo history of surface snapshots.

pub mod config;
pub mod geometry;
pub mod history;
pub mod input;
pub mod selection;
pub mod session;
pub mod shapes;
pub mod surface;
pub mod text_editor;
pub mod tools;

pub use config::{ConfigError, ExportSettings, PinConfig, SessionConfig, SizeRange};
pub use geometry::{PinMetrics, ellipse_from_drag, pin_scale, rectangle_from_drag, should_add_point};
pub use history::{CircularHistory, Snapshot};
pub use input::PointerEvent;
pub use selection::SelectionManager;
pub use session::{DrawingSession, ExportRequest, SessionError, SessionResult};
pub use shapes::{SerializableColor, Shape, ShapeId, ShapeStyle};
pub use surface::{MemorySurface, Surface, SurfaceDocument, SurfaceError, SurfaceResult};
pub use text_editor::{Quadrant, TextPlacement, text_editor_width};
pub use tools::{ShapeExtra, Style, ToolError, ToolKind, ToolState};
