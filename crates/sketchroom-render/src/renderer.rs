//! Renderer trait abstraction.

use kurbo::{Affine, BezPath, Point, Size};
use peniko::Color;
use sketchroom_core::canvas::Canvas;
use thiserror::Error;

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RendererError {
    #[error("Render failed: {0}")]
    RenderFailed(String),
    #[error("Surface error: {0}")]
    Surface(String),
}

impl From<std::fmt::Error> for RendererError {
    fn from(e: std::fmt::Error) -> Self {
        RendererError::Surface(e.to_string())
    }
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RendererError>;

/// Context for a single render frame.
pub struct RenderContext<'a> {
    /// The canvas to render.
    pub canvas: &'a Canvas,
    /// Viewport size in pixels.
    pub viewport_size: Size,
    /// Background color.
    pub background_color: Color,
    /// Selection box and handle outline color.
    pub selection_color: Color,
    /// Fill color of text.
    pub text_color: Color,
    /// Fill color of freehand strokes.
    pub ink_color: Color,
}

impl<'a> RenderContext<'a> {
    /// Create a new render context using the canvas viewport size.
    pub fn new(canvas: &'a Canvas) -> Self {
        Self {
            canvas,
            viewport_size: canvas.viewport_size,
            background_color: Color::from_rgba8(255, 255, 255, 255),
            selection_color: Color::from_rgba8(59, 130, 246, 255), // Blue
            text_color: Color::from_rgba8(0, 0, 0, 255),
            ink_color: Color::from_rgba8(0, 0, 0, 255),
        }
    }

    /// Set the viewport size.
    pub fn with_viewport_size(mut self, size: Size) -> Self {
        self.viewport_size = size;
        self
    }

    /// Set the background color.
    pub fn with_background(mut self, color: Color) -> Self {
        self.background_color = color;
        self
    }

    /// Set the selection color.
    pub fn with_selection_color(mut self, color: Color) -> Self {
        self.selection_color = color;
        self
    }

    /// Set the text and freehand ink color.
    pub fn with_ink(mut self, color: Color) -> Self {
        self.text_color = color;
        self.ink_color = color;
        self
    }
}

/// A 2D drawing target.
///
/// Paths and text are given in the coordinate space set by the last
/// [`Surface::set_transform`]; colors are multiplied by the global alpha.
pub trait Surface {
    /// Reset the surface and paint the background.
    fn clear(&mut self, color: Color) -> RenderResult<()>;

    fn set_transform(&mut self, transform: Affine);

    /// Global alpha applied to subsequent drawing.
    fn set_alpha(&mut self, alpha: f64);

    fn stroke_path(&mut self, path: &BezPath, color: Color, width: f64) -> RenderResult<()>;

    fn fill_path(&mut self, path: &BezPath, color: Color) -> RenderResult<()>;

    /// Draw one line of text with its top-left corner at `origin`.
    fn fill_text(&mut self, text: &str, origin: Point, font_family: &str, font_size: f64, color: Color)
    -> RenderResult<()>;
}

/// Trait for rendering backends.
pub trait Renderer {
    /// Build the drawing commands for a frame.
    ///
    /// Called once per frame; each call fully replaces the previous frame.
    fn build_scene(&mut self, ctx: &RenderContext) -> RenderResult<()>;

    /// Get the background color (for clearing).
    fn background_color(&self, ctx: &RenderContext) -> Color {
        ctx.background_color
    }
}
