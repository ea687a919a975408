//! Replay scripts: a surface size, an optional session configuration and a
//! list of steps.

use inkpin_core::shapes::{ColorParseError, SerializableColor};
use inkpin_core::{
    DrawingSession, MemorySurface, SessionConfig, SessionError, Snapshot, Surface, ToolError,
    ToolKind,
};
use kurbo::{Point, Size, Vec2};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while replaying a step.
#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("Invalid script: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Tool(#[from] ToolError),
    #[error(transparent)]
    Color(#[from] ColorParseError),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error("No shape at ({x}, {y})")]
    NoShapeAt { x: f64, y: f64 },
}

/// One scripted action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Step {
    /// Select a tool by name; `null` deselects.
    Tool { tool: Option<String> },
    Color { color: String },
    Stroke { size: f64 },
    Font { size: f64 },
    PinLabel { label: String },
    Down { x: f64, y: f64 },
    Move { x: f64, y: f64 },
    Up,
    Leave,
    /// Commit text at the pending placement.
    Text { text: String },
    DiscardText,
    /// Press the shape under a point.
    Press { x: f64, y: f64 },
    /// Press the shape under a point, move it and release.
    Drag { x: f64, y: f64, dx: f64, dy: f64 },
    Undo,
    Redo,
    DeleteActive,
    DeleteAll,
    Snapshot,
}

/// A replay script.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Script {
    pub config: Option<SessionConfig>,
    pub width: f64,
    pub height: f64,
    pub steps: Vec<Step>,
}

impl Default for Script {
    fn default() -> Self {
        Self {
            config: None,
            width: 800.0,
            height: 600.0,
            steps: Vec::new(),
        }
    }
}

/// A step that failed; replay continued after it.
#[derive(Debug, Clone, Serialize)]
pub struct Failure {
    pub index: usize,
    pub step: Step,
    pub error: String,
}

/// Outcome of a replay.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub steps: usize,
    pub failures: Vec<Failure>,
    pub shapes: usize,
    pub history: Vec<Snapshot>,
    pub current: Snapshot,
}

impl Script {
    pub fn from_json(json: &str) -> Result<Self, ScriptError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Run every step against a fresh session.
    pub fn run(&self) -> Report {
        let surface = MemorySurface::new(Size::new(self.width, self.height));
        let config = self.config.clone().unwrap_or_default();
        let mut session = DrawingSession::new(surface, config)
            .with_notifier(|err| log::warn!("Notification: {err}"));

        let mut failures = Vec::new();
        for (index, step) in self.steps.iter().enumerate() {
            log::debug!("Step {index}: {step:?}");
            if let Err(err) = apply(&mut session, step) {
                log::error!("Step {index} failed: {err}");
                failures.push(Failure {
                    index,
                    step: step.clone(),
                    error: err.to_string(),
                });
            }
        }

        Report {
            steps: self.steps.len(),
            failures,
            shapes: session.surface().shape_ids().len(),
            history: session.get_history_dump(),
            current: session.current_snapshot(),
        }
    }
}

fn shape_under(
    session: &DrawingSession<MemorySurface>,
    x: f64,
    y: f64,
) -> Result<inkpin_core::ShapeId, ScriptError> {
    let tolerance = session.config().hit_tolerance;
    session
        .surface()
        .shape_at(Point::new(x, y), tolerance)
        .ok_or(ScriptError::NoShapeAt { x, y })
}

/// Apply a single step.
pub fn apply(session: &mut DrawingSession<MemorySurface>, step: &Step) -> Result<(), ScriptError> {
    match step {
        Step::Tool { tool } => {
            let tool = tool.as_deref().map(str::parse::<ToolKind>).transpose()?;
            session.set_tool(tool)?;
        }
        Step::Color { color } => session.set_color(color.parse::<SerializableColor>()?),
        Step::Stroke { size } => session.set_stroke_size(*size),
        Step::Font { size } => session.set_font_size(*size),
        Step::PinLabel { label } => session.set_pin_label(label),
        Step::Down { x, y } => session.pointer_down(Point::new(*x, *y))?,
        Step::Move { x, y } => session.pointer_move(Point::new(*x, *y))?,
        Step::Up => session.pointer_up()?,
        Step::Leave => session.pointer_leave()?,
        Step::Text { text } => {
            session.commit_text(text)?;
        }
        Step::DiscardText => session.discard_text(),
        Step::Press { x, y } => {
            let id = shape_under(session, *x, *y)?;
            session.shape_pressed(id)?;
        }
        Step::Drag { x, y, dx, dy } => {
            let id = shape_under(session, *x, *y)?;
            session.shape_pressed(id)?;
            session.drag_shape(id, Vec2::new(*dx, *dy))?;
            session.shape_drag_end(id)?;
        }
        Step::Undo => session.undo()?,
        Step::Redo => session.redo()?,
        Step::DeleteActive => session.delete_active()?,
        Step::DeleteAll => session.delete_all()?,
        Step::Snapshot => {
            session.save_snapshot_now()?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_steps() {
        let script = Script::from_json(
            r#"{
                "width": 400,
                "steps": [
                    {"type": "tool", "tool": "rectangle"},
                    {"type": "down", "x": 10, "y": 10},
                    {"type": "move", "x": 60, "y": 80},
                    {"type": "up"},
                    {"type": "pin_label", "label": "A1"}
                ]
            }"#,
        )
        .unwrap();
        assert!((script.width - 400.0).abs() < f64::EPSILON);
        assert!((script.height - 600.0).abs() < f64::EPSILON);
        assert_eq!(script.steps.len(), 5);
        assert_eq!(script.steps[3], Step::Up);
        assert_eq!(
            script.steps[4],
            Step::PinLabel {
                label: "A1".to_string()
            }
        );
    }

    #[test]
    fn test_run_rectangle_and_undo() {
        let script = Script {
            steps: vec![
                Step::Tool { tool: Some("rectangle".to_string()) },
                Step::Down { x: 10.0, y: 10.0 },
                Step::Move { x: 60.0, y: 80.0 },
                Step::Up,
                Step::Undo,
                Step::Redo,
            ],
            ..Script::default()
        };
        let report = script.run();
        assert!(report.failures.is_empty());
        assert_eq!(report.shapes, 1);
        assert_eq!(report.history.len(), 1);
        assert_eq!(report.current, report.history[0]);
    }

    #[test]
    fn test_failures_do_not_stop_replay() {
        let script = Script {
            steps: vec![
                Step::Tool { tool: Some("lasso".to_string()) },
                Step::DeleteActive,
                Step::Color { color: "#zz".to_string() },
                Step::Tool { tool: Some("pin".to_string()) },
                Step::Down { x: 100.0, y: 100.0 },
            ],
            ..Script::default()
        };
        let report = script.run();
        let failed: Vec<usize> = report.failures.iter().map(|f| f.index).collect();
        assert_eq!(failed, vec![0, 1, 2]);
        assert_eq!(report.shapes, 1);
        assert_eq!(report.history.len(), 1);
    }

    #[test]
    fn test_drag_step_moves_and_commits() {
        let script = Script {
            steps: vec![
                Step::Tool { tool: Some("pin".to_string()) },
                Step::Down { x: 100.0, y: 100.0 },
                Step::Tool { tool: Some("drag".to_string()) },
                Step::Drag { x: 100.0, y: 110.0, dx: 50.0, dy: 0.0 },
                Step::Drag { x: 400.0, y: 400.0, dx: 1.0, dy: 1.0 },
            ],
            ..Script::default()
        };
        let report = script.run();
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].index, 4);
        assert_eq!(report.history.len(), 2);
        assert_ne!(report.history[0], report.history[1]);
    }

    #[test]
    fn test_text_steps() {
        let script = Script {
            steps: vec![
                Step::Tool { tool: Some("text".to_string()) },
                Step::Down { x: 50.0, y: 50.0 },
                Step::Text { text: "hello".to_string() },
                Step::Down { x: 300.0, y: 300.0 },
                Step::DiscardText,
                Step::Snapshot,
            ],
            ..Script::default()
        };
        let report = script.run();
        assert!(report.failures.is_empty());
        assert_eq!(report.shapes, 1);
        assert_eq!(report.history.len(), 2);
    }
}
