//! Hand-drawn shape element.

use super::ShapeKind;
use crate::geometry::Frame;
use crate::rough::{Primitives, RoughStyle, build_primitives};

/// A square, circle, triangle, line, or arrow with its built primitives.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeElement {
    pub kind: ShapeKind,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Hand-drawn outlines, rebuilt whenever the frame changes.
    pub primitives: Primitives,
}

impl ShapeElement {
    /// Create a shape and build its primitives.
    pub fn new(kind: ShapeKind, frame: Frame, style: &RoughStyle) -> Self {
        Self {
            kind,
            x: frame.x,
            y: frame.y,
            width: frame.width,
            height: frame.height,
            primitives: build_primitives(kind, &frame, style),
        }
    }

    pub fn frame(&self) -> Frame {
        Frame::new(self.x, self.y, self.width, self.height)
    }

    /// Replace the frame and rebuild the primitives.
    pub fn set_frame(&mut self, frame: Frame, style: &RoughStyle) {
        *self = Self::new(self.kind, frame, style);
    }
}
