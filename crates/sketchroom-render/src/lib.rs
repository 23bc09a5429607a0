//! SketchRoom Render Library
//!
//! Renderer abstraction for SketchRoom canvases. A frame is drawn by a
//! single render pass onto any [`Surface`]; the bundled implementation
//! writes SVG.

mod pass;
mod renderer;
pub mod stroke;
mod svg;

pub use pass::render_frame;
pub use renderer::{RenderContext, RenderResult, Renderer, RendererError, Surface};
pub use stroke::{outline_path, stroke_outline};
pub use svg::{SvgRenderer, SvgSurface};
