//! The drawing session: tool and style settings, the gesture state machine,
//! selection and undo/redo on top of a [`Surface`].

use crate::config::SessionConfig;
use crate::geometry::should_add_point;
use crate::history::{CircularHistory, Snapshot};
use crate::input::PointerEvent;
use crate::selection::SelectionManager;
use crate::shapes::{ContrastMap, SerializableColor, ShapeId};
use crate::surface::{Surface, SurfaceError};
use crate::text_editor::TextPlacement;
use crate::tools::{self, ShapeExtra, ShapeSeed, Style, ToolError, ToolKind, ToolState};
use kurbo::{Point, Vec2};
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Session errors.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("No shape selected")]
    NoSelection,
    #[error("Drawing surface is not ready")]
    MissingSurface,
    #[error("A drawing gesture is in progress")]
    GestureInProgress,
    #[error(transparent)]
    Tool(#[from] ToolError),
    #[error(transparent)]
    Surface(#[from] SurfaceError),
}

impl SessionError {
    /// Errors meant for the user rather than the integrator.
    pub fn is_user_facing(&self) -> bool {
        matches!(self, SessionError::NoSelection | SessionError::MissingSurface)
    }
}

/// Result type for session operations.
pub type SessionResult<T> = Result<T, SessionError>;

/// Called with every snapshot committed to history.
pub type CommitObserver = Box<dyn FnMut(&Snapshot)>;
/// Receives user-facing errors.
pub type Notifier = Box<dyn FnMut(&SessionError)>;

/// Everything an image exporter needs; encoding happens elsewhere.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportRequest {
    pub file_name: String,
    pub mime_type: String,
    pub quality: f64,
    pub pixel_ratio: f64,
    pub snapshot: Snapshot,
}

/// Interactive drawing session over a surface.
pub struct DrawingSession<S: Surface> {
    surface: S,
    config: SessionConfig,
    tool: Option<ToolKind>,
    style: Style,
    pin_label: String,
    selection: SelectionManager,
    history: CircularHistory,
    state: ToolState,
    on_commit: Option<CommitObserver>,
    notifier: Option<Notifier>,
}

impl<S: Surface + fmt::Debug> fmt::Debug for DrawingSession<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DrawingSession")
            .field("surface", &self.surface)
            .field("tool", &self.tool)
            .field("style", &self.style)
            .field("pin_label", &self.pin_label)
            .field("selection", &self.selection)
            .field("history", &self.history)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl<S: Surface> DrawingSession<S> {
    pub fn new(surface: S, config: SessionConfig) -> Self {
        let config = config.validate();
        Self {
            surface,
            tool: config.default_tool,
            style: Style::from_config(&config),
            pin_label: String::new(),
            selection: SelectionManager::new(config.selected_opacity, config.unselected_opacity),
            history: CircularHistory::new(config.history_capacity),
            state: ToolState::Idle,
            on_commit: None,
            notifier: None,
            config,
        }
    }

    /// Observe every history commit.
    pub fn with_commit_observer(mut self, observer: impl FnMut(&Snapshot) + 'static) -> Self {
        self.on_commit = Some(Box::new(observer));
        self
    }

    /// Receive user-facing errors such as deleting with nothing selected.
    pub fn with_notifier(mut self, notifier: impl FnMut(&SessionError) + 'static) -> Self {
        self.notifier = Some(Box::new(notifier));
        self
    }

    // --- Accessors ---

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn into_surface(self) -> S {
        self.surface
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn tool(&self) -> Option<ToolKind> {
        self.tool
    }

    pub fn style(&self) -> &Style {
        &self.style
    }

    pub fn color(&self) -> SerializableColor {
        self.style.color
    }

    pub fn stroke_size(&self) -> f64 {
        self.style.stroke_size
    }

    pub fn font_size(&self) -> f64 {
        self.style.font_size
    }

    pub fn pin_label(&self) -> &str {
        &self.pin_label
    }

    pub fn palette(&self) -> &[SerializableColor] {
        &self.config.palette
    }

    pub fn contrast_map(&self) -> &ContrastMap {
        &self.config.contrast
    }

    pub fn selected(&self) -> Option<ShapeId> {
        self.selection.selected()
    }

    pub fn state(&self) -> &ToolState {
        &self.state
    }

    pub fn history(&self) -> &CircularHistory {
        &self.history
    }

    pub fn is_drawing(&self) -> bool {
        self.state.is_drawing()
    }

    // --- Settings ---

    /// Switch tools. Clears the selection, drops a pending text placement
    /// and makes every shape draggable exactly when the new tool is `Drag`.
    pub fn set_tool(&mut self, tool: Option<ToolKind>) -> SessionResult<()> {
        self.ensure_no_gesture()?;
        if matches!(self.state, ToolState::TextPending { .. }) {
            log::debug!("Discarding pending text on tool change");
            self.state = ToolState::Idle;
        }
        self.tool = tool;
        self.selection.deselect(&mut self.surface, false);
        let draggable = tool == Some(ToolKind::Drag);
        for id in self.surface.shape_ids() {
            self.surface.set_draggable(id, draggable)?;
        }
        self.surface.repaint();
        log::debug!("Tool set to {}", tool.map_or("none", |t| t.name()));
        Ok(())
    }

    pub fn set_color(&mut self, color: SerializableColor) {
        self.style.color = color;
    }

    pub fn set_stroke_size(&mut self, size: f64) {
        let clamped = self.config.stroke_size.clamp(size);
        if clamped != size {
            log::warn!("Stroke size {size} out of range, using {clamped}");
        }
        self.style.stroke_size = clamped;
    }

    pub fn set_font_size(&mut self, size: f64) {
        let clamped = self.config.font_size.clamp(size);
        if clamped != size {
            log::warn!("Font size {size} out of range, using {clamped}");
        }
        self.style.font_size = clamped;
    }

    /// Set the label of future pins, truncated to the configured length.
    pub fn set_pin_label(&mut self, label: &str) {
        let max = self.config.pin_label_max_len;
        if label.chars().count() > max {
            log::warn!("Pin label {label:?} longer than {max} characters, truncating");
        }
        self.pin_label = label.chars().take(max).collect();
    }

    pub fn set_palette(&mut self, palette: Vec<SerializableColor>) {
        self.config.palette = palette;
    }

    pub fn set_contrast_map(&mut self, contrast: ContrastMap) {
        self.config.contrast = contrast;
    }

    // --- Pointer events ---

    pub fn handle_pointer(&mut self, event: PointerEvent) -> SessionResult<()> {
        match event {
            PointerEvent::Down { position } => self.pointer_down(position),
            PointerEvent::Move { position } => self.pointer_move(position),
            PointerEvent::Up => self.pointer_up(),
            PointerEvent::Leave => self.pointer_leave(),
        }
    }

    pub fn pointer_down(&mut self, screen: Point) -> SessionResult<()> {
        if !self.surface.is_ready() {
            log::debug!("Pointer down before the surface is ready, ignored");
            return Ok(());
        }
        if self.state.is_drawing() {
            log::warn!("Pointer down during an active gesture, ignored");
            return Ok(());
        }
        let Some(pos) = self.surface.resolve_pointer(screen) else {
            return Ok(());
        };

        // Pressing a shape never draws.
        if let Some(id) = self.surface.shape_at(pos, self.config.hit_tolerance) {
            return self.shape_pressed(id);
        }

        let Some(tool) = self.tool else {
            return Ok(());
        };
        match tool {
            ToolKind::Drag => {
                self.selection.deselect(&mut self.surface, true);
                Ok(())
            }
            ToolKind::Text => {
                self.state = ToolState::TextPending { at: pos };
                log::debug!("Text placement at ({}, {})", pos.x, pos.y);
                Ok(())
            }
            ToolKind::Pin => self.place_pin(pos),
            tool if tool.is_drawing_tool() => self.draw_start(tool, pos),
            _ => Ok(()),
        }
    }

    pub fn pointer_move(&mut self, screen: Point) -> SessionResult<()> {
        let ToolState::Drawing {
            shape,
            factory,
            start,
            last,
            ..
        } = self.state
        else {
            return Ok(());
        };
        let Some(pos) = self.surface.resolve_pointer(screen) else {
            return Ok(());
        };
        if !should_add_point(Some(last), pos, self.config.min_point_distance) {
            return Ok(());
        }
        let Some(live) = self.surface.shape_mut(shape) else {
            log::warn!("Shape {shape} vanished mid-gesture");
            self.state = ToolState::Idle;
            return Err(SurfaceError::UnknownShape(shape).into());
        };
        (factory.draw_step)(live, start, pos);
        if let ToolState::Drawing { last, .. } = &mut self.state {
            *last = pos;
        }
        self.surface.repaint();
        Ok(())
    }

    pub fn pointer_up(&mut self) -> SessionResult<()> {
        self.draw_end()
    }

    pub fn pointer_leave(&mut self) -> SessionResult<()> {
        self.draw_end()
    }

    fn draw_start(&mut self, tool: ToolKind, pos: Point) -> SessionResult<()> {
        let factory = tool.factory()?;
        let shape = factory.build(&ShapeSeed {
            origin: pos,
            style: &self.style,
            extra: &ShapeExtra::None,
            config: &self.config,
        });
        let id = self.surface.add_shape(shape);
        self.surface.bind(id)?;
        self.state = ToolState::Drawing {
            shape: id,
            tool,
            factory,
            start: pos,
            last: pos,
        };
        self.surface.repaint();
        log::debug!("Started {tool} at ({}, {})", pos.x, pos.y);
        Ok(())
    }

    fn draw_end(&mut self) -> SessionResult<()> {
        if !self.state.is_drawing() {
            return Ok(());
        }
        // Commit while the gesture state still names the finished shape.
        let result = self.commit_history_snapshot(true);
        self.state = ToolState::Idle;
        result.map(|_| ())
    }

    fn place_pin(&mut self, pos: Point) -> SessionResult<()> {
        let extra = ShapeExtra::Pin {
            label: self.pin_label.clone(),
            label_color: self.config.contrast.contrast_for(self.style.color),
        };
        let shape = tools::create(ToolKind::Pin, pos, &self.style, &extra, &self.config)?;
        let id = self.surface.add_shape(shape);
        self.surface.bind(id)?;
        self.surface.repaint();
        log::debug!("Placed pin {id}");
        self.commit_history_snapshot(false)?;
        Ok(())
    }

    // --- Text ---

    /// Pending text placement, if the text tool is waiting for content.
    pub fn text_placement(&self) -> Option<TextPlacement> {
        match self.state {
            ToolState::TextPending { at } => Some(TextPlacement::new(at, self.surface.size())),
            _ => None,
        }
    }

    /// Place `text` at the pending placement. Blank text only discards it.
    pub fn commit_text(&mut self, text: &str) -> SessionResult<Option<ShapeId>> {
        let ToolState::TextPending { at } = self.state else {
            return Ok(None);
        };
        self.state = ToolState::Idle;
        if text.trim().is_empty() {
            log::debug!("Blank text discarded");
            return Ok(None);
        }
        let extra = ShapeExtra::Text(text.to_string());
        let shape = tools::create(ToolKind::Text, at, &self.style, &extra, &self.config)?;
        let id = self.surface.add_shape(shape);
        self.surface.bind(id)?;
        self.surface.repaint();
        self.commit_history_snapshot(false)?;
        Ok(Some(id))
    }

    pub fn discard_text(&mut self) {
        if matches!(self.state, ToolState::TextPending { .. }) {
            self.state = ToolState::Idle;
        }
    }

    // --- Shape interaction ---

    /// A bound shape was pressed: select it.
    pub fn shape_pressed(&mut self, id: ShapeId) -> SessionResult<()> {
        if !self.surface.is_bound(id) {
            log::debug!("Press on unbound shape {id} ignored");
            return Ok(());
        }
        self.selection.select(&mut self.surface, id)?;
        Ok(())
    }

    /// Drag motion on a shape; only draggable shapes move.
    pub fn drag_shape(&mut self, id: ShapeId, delta: Vec2) -> SessionResult<bool> {
        let moved = self.surface.translate(id, delta)?;
        if moved {
            self.surface.repaint();
        }
        Ok(moved)
    }

    /// A drag on a bound shape finished: record it and drop the selection.
    pub fn shape_drag_end(&mut self, id: ShapeId) -> SessionResult<()> {
        if !self.surface.is_bound(id) {
            return Ok(());
        }
        self.commit_history_snapshot(false)?;
        self.selection.deselect(&mut self.surface, true);
        Ok(())
    }

    // --- Deletion ---

    /// Remove the selected shape.
    pub fn delete_active(&mut self) -> SessionResult<()> {
        self.ensure_no_gesture()?;
        self.ensure_ready()?;
        let Some(id) = self.selection.selected() else {
            return Err(self.report(SessionError::NoSelection));
        };
        self.surface.remove_shape(id);
        self.selection.forget(id);
        self.surface.repaint();
        log::info!("Deleted shape {id}");
        self.commit_history_snapshot(false)?;
        Ok(())
    }

    /// Remove every shape.
    pub fn delete_all(&mut self) -> SessionResult<()> {
        self.ensure_no_gesture()?;
        self.ensure_ready()?;
        self.selection.deselect(&mut self.surface, false);
        self.surface.clear();
        self.surface.repaint();
        log::info!("Deleted all shapes");
        self.commit_history_snapshot(false)?;
        Ok(())
    }

    // --- History ---

    /// Capture the surface into history.
    ///
    /// With `check_should_commit`, a degenerate shape from the current
    /// gesture produces no entry. Returns whether a snapshot was committed.
    pub fn commit_history_snapshot(&mut self, check_should_commit: bool) -> SessionResult<bool> {
        self.ensure_ready()?;
        if check_should_commit {
            if let ToolState::Drawing { shape, factory, .. } = self.state {
                let eligible = self
                    .surface
                    .shape(shape)
                    .is_some_and(|s| (factory.should_commit)(s));
                if !eligible {
                    log::debug!("Degenerate {} not committed", factory.kind);
                    return Ok(false);
                }
            }
        }
        let snapshot = self.surface.serialize()?;
        self.history.commit(snapshot.clone());
        log::info!(
            "Committed snapshot {}/{}",
            self.history.len(),
            self.history.capacity()
        );
        if let Some(observer) = self.on_commit.as_mut() {
            observer(&snapshot);
        }
        Ok(true)
    }

    /// Commit the current surface regardless of any gesture policy.
    pub fn save_snapshot_now(&mut self) -> SessionResult<Snapshot> {
        self.ensure_no_gesture()?;
        self.commit_history_snapshot(false)?;
        Ok(self.history.current())
    }

    pub fn undo(&mut self) -> SessionResult<()> {
        self.ensure_no_gesture()?;
        self.ensure_ready()?;
        self.history.move_backward();
        let snapshot = self.history.current();
        self.restore(&snapshot)?;
        log::info!("Undo, cursor at {:?}", self.history.cursor());
        Ok(())
    }

    pub fn redo(&mut self) -> SessionResult<()> {
        self.ensure_no_gesture()?;
        self.ensure_ready()?;
        self.history.move_forward();
        let snapshot = self.history.current();
        self.restore(&snapshot)?;
        log::info!("Redo, cursor at {:?}", self.history.cursor());
        Ok(())
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Snapshot at the history cursor.
    pub fn current_snapshot(&self) -> Snapshot {
        self.history.current()
    }

    /// All stored snapshots, oldest first.
    pub fn get_history_dump(&self) -> Vec<Snapshot> {
        self.history.dump_all()
    }

    /// Put the surface into the state of `snapshot`. `None` is a no-op.
    pub fn restore_snapshot(&mut self, snapshot: Option<&Snapshot>) -> SessionResult<()> {
        let Some(snapshot) = snapshot else {
            return Ok(());
        };
        self.ensure_no_gesture()?;
        self.ensure_ready()?;
        self.restore(snapshot)
    }

    fn restore(&mut self, snapshot: &Snapshot) -> SessionResult<()> {
        self.selection.deselect(&mut self.surface, false);
        if snapshot.is_empty() {
            self.surface.clear();
            self.surface.repaint();
            return Ok(());
        }
        let ids = self.surface.restore(snapshot)?;
        let draggable = self.tool == Some(ToolKind::Drag);
        for id in ids {
            self.surface.bind(id)?;
            self.surface.set_draggable(id, draggable)?;
        }
        self.surface.repaint();
        Ok(())
    }

    // --- Export ---

    /// Describe an image export of the current surface.
    pub fn export_request(&mut self, file_name: Option<&str>) -> SessionResult<ExportRequest> {
        self.ensure_ready()?;
        let export = &self.config.export;
        let base = file_name
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(export.file_name.as_str());
        let suffix = format!(".{}", export.extension);
        let file_name = if base.to_ascii_lowercase().ends_with(&suffix.to_ascii_lowercase()) {
            base.to_string()
        } else {
            format!("{base}{suffix}")
        };
        Ok(ExportRequest {
            file_name,
            mime_type: export.mime_type.clone(),
            quality: export.quality,
            pixel_ratio: export.pixel_ratio,
            snapshot: self.surface.serialize()?,
        })
    }

    // --- Helpers ---

    fn ensure_no_gesture(&self) -> SessionResult<()> {
        if self.state.is_drawing() {
            log::warn!("Rejected while a gesture is in progress");
            return Err(SessionError::GestureInProgress);
        }
        Ok(())
    }

    fn ensure_ready(&mut self) -> SessionResult<()> {
        if self.surface.is_ready() {
            Ok(())
        } else {
            Err(self.report(SessionError::MissingSurface))
        }
    }

    /// Forward a user-facing error to the notifier and hand it back.
    fn report(&mut self, err: SessionError) -> SessionError {
        if err.is_user_facing() {
            log::warn!("{err}");
            if let Some(notifier) = self.notifier.as_mut() {
                notifier(&err);
            }
        }
        err
    }
}
