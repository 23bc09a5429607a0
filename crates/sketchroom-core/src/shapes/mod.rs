//! Canvas element definitions.

mod freehand;
mod shape;
mod text;

pub use freehand::{FreehandElement, StrokeOptions};
pub use shape::ShapeElement;
pub use text::{FontFamily, MonospaceMeasure, TextAlign, TextElement, TextMeasure, TextOptions, TextSize};

use crate::geometry::Frame;
use crate::rough::RoughStyle;
use kurbo::Vec2;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Identifier of an element in the canvas.
///
/// Local optimistic copies are keyed by a pending uuid until the store
/// acknowledges the insert with its authoritative id.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ElementId {
    Pending(Uuid),
    Stored(String),
}

impl ElementId {
    /// Fresh pending id for an optimistic insert.
    pub fn pending() -> Self {
        ElementId::Pending(Uuid::new_v4())
    }

    /// The authoritative id, if the store has assigned one.
    pub fn stored(&self) -> Option<&str> {
        match self {
            ElementId::Stored(id) => Some(id),
            ElementId::Pending(_) => None,
        }
    }
}

impl From<String> for ElementId {
    fn from(id: String) -> Self {
        ElementId::Stored(id)
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementId::Pending(uuid) => write!(f, "pending:{uuid}"),
            ElementId::Stored(id) => f.write_str(id),
        }
    }
}

/// Kinds of hand-drawn shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShapeKind {
    Square,
    Circle,
    Triangle,
    Line,
    ArrowedLine,
}

impl ShapeKind {
    /// Stored type name.
    pub fn name(&self) -> &'static str {
        match self {
            ShapeKind::Square => "Square",
            ShapeKind::Circle => "Circle",
            ShapeKind::Triangle => "Triangle",
            ShapeKind::Line => "Line",
            ShapeKind::ArrowedLine => "ArrowedLine",
        }
    }

    /// Selection padding for this kind. Only squares get a margin.
    pub fn selection_padding(&self, square_padding: f64) -> f64 {
        match self {
            ShapeKind::Square => square_padding,
            _ => 0.0,
        }
    }
}

/// A drawing element on the canvas.
#[derive(Debug, Clone, PartialEq)]
pub enum CanvasElement {
    Shape(ShapeElement),
    Text(TextElement),
    Freehand(FreehandElement),
}

impl CanvasElement {
    /// Stored type name.
    pub fn type_name(&self) -> &'static str {
        match self {
            CanvasElement::Shape(shape) => shape.kind.name(),
            CanvasElement::Text(_) => "Text",
            CanvasElement::Freehand(_) => "Pencil",
        }
    }

    /// Signed bounding frame.
    pub fn frame(&self) -> Frame {
        match self {
            CanvasElement::Shape(shape) => shape.frame(),
            CanvasElement::Text(text) => text.frame(),
            CanvasElement::Freehand(stroke) => stroke.frame(),
        }
    }

    /// Selection padding around the frame.
    pub fn selection_padding(&self, square_padding: f64) -> f64 {
        match self {
            CanvasElement::Shape(shape) => shape.kind.selection_padding(square_padding),
            _ => 0.0,
        }
    }

    /// Translate the element, rebuilding shape primitives.
    pub fn translate(&mut self, delta: Vec2, style: &RoughStyle) {
        match self {
            CanvasElement::Shape(shape) => {
                let mut frame = shape.frame();
                frame.x += delta.x;
                frame.y += delta.y;
                shape.set_frame(frame, style);
            }
            CanvasElement::Text(text) => {
                text.x += delta.x;
                text.y += delta.y;
            }
            CanvasElement::Freehand(stroke) => stroke.translate(delta),
        }
    }

    /// Move the element to a new frame. Freehand points are re-projected and
    /// shapes rebuild their primitives.
    pub fn set_frame(&mut self, frame: Frame, style: &RoughStyle) {
        match self {
            CanvasElement::Shape(shape) => shape.set_frame(frame, style),
            CanvasElement::Text(text) => text.set_frame(frame),
            CanvasElement::Freehand(stroke) => stroke.reproject(frame),
        }
    }

    /// Copy rendered with the deletion style.
    pub fn with_style(&self, style: &RoughStyle) -> Self {
        match self {
            CanvasElement::Shape(shape) => {
                CanvasElement::Shape(ShapeElement::new(shape.kind, shape.frame(), style))
            }
            other => other.clone(),
        }
    }

    pub fn as_shape(&self) -> Option<&ShapeElement> {
        match self {
            CanvasElement::Shape(shape) => Some(shape),
            _ => None,
        }
    }

    pub fn as_freehand(&self) -> Option<&FreehandElement> {
        match self {
            CanvasElement::Freehand(stroke) => Some(stroke),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&TextElement> {
        match self {
            CanvasElement::Text(text) => Some(text),
            _ => None,
        }
    }
}
