//! Camera module for pan/zoom transforms.

use kurbo::{Affine, Point, Size, Vec2};
use serde::{Deserialize, Serialize};

/// Smallest zoom factor the camera accepts.
pub const MIN_ZOOM: f64 = 0.1;
/// Largest zoom factor the camera accepts.
pub const MAX_ZOOM: f64 = 20.0;

/// Camera manages the view transform for the canvas.
///
/// Screen space is `world * zoom + offset`. Zoom changes are additive and
/// clamped to `[min_zoom, max_zoom]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    /// Current translation offset (pan), in screen pixels.
    pub offset: Vec2,
    /// Current zoom level (1.0 = 100%).
    pub zoom: f64,
    /// Minimum allowed zoom level
    pub min_zoom: f64,
    /// Maximum allowed zoom level
    pub max_zoom: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            offset: Vec2::ZERO,
            zoom: 1.0,
            min_zoom: MIN_ZOOM,
            max_zoom: MAX_ZOOM,
        }
    }
}

impl Camera {
    /// Create a new camera with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a camera with custom zoom limits.
    pub fn with_limits(min_zoom: f64, max_zoom: f64) -> Self {
        Self {
            min_zoom,
            max_zoom,
            ..Self::default()
        }
    }

    /// Get the affine transform for rendering (world to screen).
    pub fn transform(&self) -> Affine {
        Affine::translate(self.offset) * Affine::scale(self.zoom)
    }

    /// Convert a screen point to world coordinates.
    pub fn screen_to_world(&self, screen_point: Point) -> Point {
        Point::new(
            (screen_point.x - self.offset.x) / self.zoom,
            (screen_point.y - self.offset.y) / self.zoom,
        )
    }

    /// Convert a world point to screen coordinates.
    pub fn world_to_screen(&self, world_point: Point) -> Point {
        Point::new(
            world_point.x * self.zoom + self.offset.x,
            world_point.y * self.zoom + self.offset.y,
        )
    }

    /// Pan the camera by a delta in screen coordinates.
    pub fn pan(&mut self, delta: Vec2) {
        self.offset += delta;
    }

    /// Change zoom by an additive `delta`, keeping the world point under
    /// `origin` (screen space) fixed.
    pub fn zoom_about(&mut self, origin: Point, delta: f64) {
        let new_zoom = (self.zoom + delta).clamp(self.min_zoom, self.max_zoom);
        let world_point = self.screen_to_world(origin);
        self.zoom = new_zoom;
        self.offset = Vec2::new(
            origin.x - world_point.x * new_zoom,
            origin.y - world_point.y * new_zoom,
        );
    }

    /// Zoom about the center of a viewport.
    pub fn zoom_about_center(&mut self, viewport: Size, delta: f64) {
        let center = Point::new(viewport.width / 2.0, viewport.height / 2.0);
        self.zoom_about(center, delta);
    }

    /// Zoom level as a whole percentage, for display.
    pub fn zoom_percent(&self) -> i64 {
        (self.zoom * 100.0).round() as i64
    }

    /// Reset camera to default position and zoom.
    pub fn reset(&mut self) {
        self.offset = Vec2::ZERO;
        self.zoom = 1.0;
    }
}
