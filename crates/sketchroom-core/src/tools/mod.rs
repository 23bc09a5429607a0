//! Tool system: the drawing session state machine.
//!
//! `Idle -> Drawing -> Idle` for shapes and the pencil, `Idle -> Typing ->
//! Idle` for text, `Idle -> Erasing -> Idle` for the eraser. The session owns
//! the in-progress preview and freehand buffer and hands back finalized
//! elements; persistence and the element map belong to the canvas.

use crate::geometry::Frame;
use crate::rough::{Primitives, RoughStyle, build_primitives};
use crate::shapes::{
    CanvasElement, FreehandElement, ShapeElement, ShapeKind, StrokeOptions, TextElement, TextMeasure,
    TextOptions,
};
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Available tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ToolKind {
    #[default]
    Selection,
    Panning,
    Eraser,
    Square,
    Circle,
    Triangle,
    Line,
    ArrowedLine,
    Pencil,
    Text,
}

impl ToolKind {
    /// The shape this tool draws, if it is a shape tool.
    pub fn shape_kind(&self) -> Option<ShapeKind> {
        match self {
            ToolKind::Square => Some(ShapeKind::Square),
            ToolKind::Circle => Some(ShapeKind::Circle),
            ToolKind::Triangle => Some(ShapeKind::Triangle),
            ToolKind::Line => Some(ShapeKind::Line),
            ToolKind::ArrowedLine => Some(ShapeKind::ArrowedLine),
            _ => None,
        }
    }
}

/// State of the drawing session.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SessionState {
    /// Waiting for interaction.
    #[default]
    Idle,
    /// A shape or pencil stroke is being dragged out.
    Drawing { start: Point, current: Point },
    /// A text entry is open at `anchor`.
    Typing { anchor: Point },
    /// The eraser is held down.
    Erasing,
}

/// Manages the current tool, its state, and its transient output.
#[derive(Debug, Clone, Default)]
pub struct DrawingSession {
    /// Currently selected tool.
    pub current_tool: ToolKind,
    /// Current state of the tool.
    pub state: SessionState,
    /// Non-persisted primitives for the shape being drawn.
    preview: Option<Primitives>,
    /// Accumulated world points for the pencil.
    freehand_points: Vec<Point>,
}

impl DrawingSession {
    /// Create a new drawing session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the current tool, dropping any in-progress interaction.
    pub fn set_tool(&mut self, tool: ToolKind) {
        self.current_tool = tool;
        self.cancel();
    }

    /// Begin a pointer interaction at a world point.
    ///
    /// The text tool is not handled here; see [`Self::begin_typing`].
    pub fn begin(&mut self, point: Point) {
        match self.current_tool {
            ToolKind::Eraser => self.state = SessionState::Erasing,
            ToolKind::Pencil => {
                self.freehand_points.clear();
                self.freehand_points.push(point);
                self.state = SessionState::Drawing {
                    start: point,
                    current: point,
                };
            }
            tool if tool.shape_kind().is_some() => {
                self.preview = None;
                self.state = SessionState::Drawing {
                    start: point,
                    current: point,
                };
            }
            _ => {}
        }
    }

    /// Update the current interaction.
    pub fn update(&mut self, point: Point, style: &RoughStyle) {
        let SessionState::Drawing { start, current } = &mut self.state else {
            return;
        };
        *current = point;
        if self.current_tool == ToolKind::Pencil {
            self.freehand_points.push(point);
        } else if let Some(kind) = self.current_tool.shape_kind() {
            self.preview = Some(build_primitives(kind, &Frame::from_drag(*start, point), style));
        }
    }

    /// End the interaction and return the finalized element, if any.
    ///
    /// A shape click without any drag produces nothing.
    pub fn end(&mut self, point: Point, style: &RoughStyle, stroke: &StrokeOptions) -> Option<CanvasElement> {
        let state = std::mem::take(&mut self.state);
        self.preview = None;
        let SessionState::Drawing { start, .. } = state else {
            return None;
        };

        if self.current_tool == ToolKind::Pencil {
            let points = std::mem::take(&mut self.freehand_points);
            return Some(CanvasElement::Freehand(FreehandElement::new(points, stroke.clone())));
        }

        let kind = self.current_tool.shape_kind()?;
        let frame = Frame::from_drag(start, point);
        if frame.is_degenerate() {
            return None;
        }
        Some(CanvasElement::Shape(ShapeElement::new(kind, frame, style)))
    }

    /// Cancel the current interaction.
    pub fn cancel(&mut self) {
        self.state = SessionState::Idle;
        self.preview = None;
        self.freehand_points.clear();
    }

    /// Open a text entry at `anchor`. Returns false if one is already open.
    pub fn begin_typing(&mut self, anchor: Point) -> bool {
        if matches!(self.state, SessionState::Typing { .. }) {
            return false;
        }
        self.state = SessionState::Typing { anchor };
        true
    }

    /// Close the text entry. Whitespace-only content is discarded.
    pub fn finish_typing(
        &mut self,
        content: &str,
        font_size: f64,
        line_height: f64,
        measure: &dyn TextMeasure,
    ) -> Option<TextElement> {
        let SessionState::Typing { anchor } = self.state else {
            return None;
        };
        self.state = SessionState::Idle;

        let content = content.trim();
        if content.is_empty() {
            return None;
        }
        let options = TextOptions {
            line_height,
            ..TextOptions::default()
        };
        Some(TextElement::layout(anchor, content.to_string(), options, font_size, measure))
    }

    /// Anchor of the open text entry.
    pub fn typing_anchor(&self) -> Option<Point> {
        match self.state {
            SessionState::Typing { anchor } => Some(anchor),
            _ => None,
        }
    }

    /// Check if a drag is in progress.
    pub fn is_drawing(&self) -> bool {
        matches!(self.state, SessionState::Drawing { .. })
    }

    pub fn is_erasing(&self) -> bool {
        self.state == SessionState::Erasing
    }

    /// Preview primitives of the shape being drawn.
    pub fn preview(&self) -> Option<&Primitives> {
        self.preview.as_ref()
    }

    /// Points of the pencil stroke being drawn.
    pub fn freehand_points(&self) -> &[Point] {
        &self.freehand_points
    }
}
