//! SVG surface and renderer.

use crate::pass::render_frame;
use crate::renderer::{RenderContext, RenderResult, Renderer, Surface};
use kurbo::{Affine, BezPath, Point, Size};
use peniko::Color;
use std::fmt::Write as _;

/// A [`Surface`] that collects SVG markup.
#[derive(Debug, Clone)]
pub struct SvgSurface {
    size: Size,
    body: String,
    transform: Affine,
    alpha: f64,
}

impl SvgSurface {
    pub fn new(size: Size) -> Self {
        Self {
            size,
            body: String::new(),
            transform: Affine::IDENTITY,
            alpha: 1.0,
        }
    }

    pub fn set_size(&mut self, size: Size) {
        self.size = size;
    }

    /// The complete SVG document for everything drawn since the last clear.
    pub fn document(&self) -> String {
        format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">\n{body}</svg>\n",
            w = self.size.width,
            h = self.size.height,
            body = self.body
        )
    }

    fn transform_attr(&self) -> String {
        if self.transform == Affine::IDENTITY {
            return String::new();
        }
        let [a, b, c, d, e, f] = self.transform.as_coeffs();
        format!(" transform=\"matrix({a} {b} {c} {d} {e} {f})\"")
    }

    fn paint(&self, color: Color) -> (String, f64) {
        let rgba = color.to_rgba8();
        let opacity = f64::from(rgba.a) / 255.0 * self.alpha;
        (format!("rgb({},{},{})", rgba.r, rgba.g, rgba.b), opacity)
    }
}

impl Surface for SvgSurface {
    fn clear(&mut self, color: Color) -> RenderResult<()> {
        self.body.clear();
        let (fill, opacity) = self.paint(color);
        writeln!(
            self.body,
            "<rect width=\"100%\" height=\"100%\" fill=\"{fill}\" fill-opacity=\"{opacity}\"/>"
        )?;
        Ok(())
    }

    fn set_transform(&mut self, transform: Affine) {
        self.transform = transform;
    }

    fn set_alpha(&mut self, alpha: f64) {
        self.alpha = alpha.clamp(0.0, 1.0);
    }

    fn stroke_path(&mut self, path: &BezPath, color: Color, width: f64) -> RenderResult<()> {
        let (stroke, opacity) = self.paint(color);
        let transform = self.transform_attr();
        writeln!(
            self.body,
            "<path d=\"{}\"{transform} fill=\"none\" stroke=\"{stroke}\" stroke-opacity=\"{opacity}\" \
             stroke-width=\"{width}\" stroke-linecap=\"round\" stroke-linejoin=\"round\"/>",
            path.to_svg()
        )?;
        Ok(())
    }

    fn fill_path(&mut self, path: &BezPath, color: Color) -> RenderResult<()> {
        let (fill, opacity) = self.paint(color);
        let transform = self.transform_attr();
        writeln!(
            self.body,
            "<path d=\"{}\"{transform} fill=\"{fill}\" fill-opacity=\"{opacity}\"/>",
            path.to_svg()
        )?;
        Ok(())
    }

    fn fill_text(
        &mut self,
        text: &str,
        origin: Point,
        font_family: &str,
        font_size: f64,
        color: Color,
    ) -> RenderResult<()> {
        let (fill, opacity) = self.paint(color);
        let transform = self.transform_attr();
        writeln!(
            self.body,
            "<text x=\"{}\" y=\"{}\"{transform} font-family=\"{}\" font-size=\"{font_size}\" \
             dominant-baseline=\"hanging\" fill=\"{fill}\" fill-opacity=\"{opacity}\" xml:space=\"preserve\">{}</text>",
            origin.x,
            origin.y,
            escape(font_family),
            escape(text)
        )?;
        Ok(())
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Renders canvas frames to SVG documents.
#[derive(Debug, Clone)]
pub struct SvgRenderer {
    surface: SvgSurface,
}

impl SvgRenderer {
    pub fn new() -> Self {
        Self {
            surface: SvgSurface::new(Size::ZERO),
        }
    }

    /// The SVG document of the last built frame.
    pub fn document(&self) -> String {
        self.surface.document()
    }
}

impl Default for SvgRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for SvgRenderer {
    fn build_scene(&mut self, ctx: &RenderContext) -> RenderResult<()> {
        let zoom = ctx.canvas.camera.zoom;
        if !zoom.is_finite() || zoom <= 0.0 {
            return Err(crate::RendererError::RenderFailed(format!("invalid zoom {zoom}")));
        }
        self.surface.set_size(ctx.viewport_size);
        render_frame(ctx, &mut self.surface)?;
        log::debug!("Built SVG frame ({} bytes)", self.surface.body.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sketchroom_core::geometry::Frame;
    use sketchroom_core::rough::RoughStyle;
    use sketchroom_core::shapes::{CanvasElement, ElementId, ShapeElement, ShapeKind, TextElement, TextOptions};
    use sketchroom_core::{Canvas, CanvasConfig};

    #[test]
    fn test_escape() {
        assert_eq!(escape("a<b & \"c\""), "a&lt;b &amp; &quot;c&quot;");
    }

    #[test]
    fn test_surface_alpha_and_transform() {
        let mut surface = SvgSurface::new(Size::new(10.0, 10.0));
        surface.clear(Color::WHITE).unwrap();
        surface.set_alpha(0.5);
        surface.set_transform(Affine::scale(2.0));
        let mut path = BezPath::new();
        path.move_to((0.0, 0.0));
        path.line_to((1.0, 1.0));
        surface.stroke_path(&path, Color::BLACK, 2.0).unwrap();

        let svg = surface.document();
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains("stroke-opacity=\"0.5\""));
        assert!(svg.contains("transform=\"matrix(2 0 0 2 0 0)\""));
        assert!(svg.contains("stroke-width=\"2\""));
    }

    #[test]
    fn test_render_canvas() {
        let mut canvas = Canvas::new(CanvasConfig::default(), "room", "me");
        canvas.set_viewport_size(640.0, 480.0);
        canvas.document.insert(
            ElementId::Stored("s".into()),
            CanvasElement::Shape(ShapeElement::new(
                ShapeKind::Triangle,
                Frame::new(10.0, 10.0, 40.0, 40.0),
                &RoughStyle::default(),
            )),
        );
        canvas.document.insert(
            ElementId::Stored("t".into()),
            CanvasElement::Text(TextElement::new(
                Frame::new(0.0, 0.0, 10.0, 10.0),
                "<hi>".into(),
                TextOptions::default(),
            )),
        );

        let mut renderer = SvgRenderer::new();
        renderer.build_scene(&RenderContext::new(&canvas)).unwrap();
        let first = renderer.document();
        assert!(first.contains("width=\"640\" height=\"480\""));
        assert!(first.contains("&lt;hi&gt;"));
        assert!(first.contains("font-family=\"Excalifont\""));
        assert_eq!(first.matches("<path").count(), 1);

        renderer.build_scene(&RenderContext::new(&canvas)).unwrap();
        assert_eq!(renderer.document(), first);
    }

    #[test]
    fn test_invalid_zoom() {
        let mut canvas = Canvas::new(CanvasConfig::default(), "room", "me");
        canvas.camera.zoom = 0.0;
        let mut renderer = SvgRenderer::new();
        assert!(renderer.build_scene(&RenderContext::new(&canvas)).is_err());
    }
}
