//! Freehand (pencil) stroke element.

use crate::geometry::{Frame, bounding_box};
use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

/// Options for the stroke outline sampler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrokeOptions {
    /// Base stroke diameter.
    pub size: f64,
    /// How much simulated pressure narrows the stroke (0..1).
    pub thinning: f64,
    /// Minimum spacing between sampled points, relative to size (0..1).
    pub smoothing: f64,
    /// How strongly input points are pulled toward the previous point (0..1).
    pub streamline: f64,
}

impl Default for StrokeOptions {
    fn default() -> Self {
        Self {
            size: 10.0,
            thinning: 0.5,
            smoothing: 0.5,
            streamline: 0.5,
        }
    }
}

/// A freehand stroke: an ordered point list in world space.
///
/// `x`, `y`, `width`, `height` stay zero until the stroke is first moved or
/// resized; until then the frame is the points' bounding box.
#[derive(Debug, Clone, PartialEq)]
pub struct FreehandElement {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub points: Vec<Point>,
    pub options: StrokeOptions,
}

impl FreehandElement {
    pub fn new(points: Vec<Point>, options: StrokeOptions) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: 0.0,
            height: 0.0,
            points,
            options,
        }
    }

    fn stored_frame(&self) -> Frame {
        Frame::new(self.x, self.y, self.width, self.height)
    }

    /// Bounding frame used for selection and resizing.
    pub fn frame(&self) -> Frame {
        let stored = self.stored_frame();
        if !stored.is_degenerate() {
            return stored;
        }
        bounding_box(&self.points)
            .map(Frame::from_rect)
            .unwrap_or(stored)
    }

    /// Translate every point and the frame.
    pub fn translate(&mut self, delta: Vec2) {
        let frame = self.frame();
        self.set_stored(Frame::new(frame.x + delta.x, frame.y + delta.y, frame.width, frame.height));
        for p in &mut self.points {
            *p += delta;
        }
    }

    /// Fit the stroke to a new frame:
    /// `new = new_origin + (old - old_origin) * (new_size / old_size)`,
    /// with the scale held at 1 along a zero-size axis.
    pub fn reproject(&mut self, target: Frame) {
        let original = self.frame();
        let scale_x = if original.width == 0.0 { 1.0 } else { target.width / original.width };
        let scale_y = if original.height == 0.0 { 1.0 } else { target.height / original.height };
        for p in &mut self.points {
            *p = Point::new(
                target.x + (p.x - original.x) * scale_x,
                target.y + (p.y - original.y) * scale_y,
            );
        }
        self.set_stored(target);
    }

    fn set_stored(&mut self, frame: Frame) {
        self.x = frame.x;
        self.y = frame.y;
        self.width = frame.width;
        self.height = frame.height;
    }
}
