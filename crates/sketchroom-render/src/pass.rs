//! The per-frame render pass.

use crate::renderer::{RenderContext, RenderResult, Surface};
use crate::stroke::{outline_path, stroke_outline};
use kurbo::{Affine, Shape as _};
use peniko::Color;
use sketchroom_core::rough::Primitives;
use sketchroom_core::selection::{get_handles, selection_box};
use sketchroom_core::shapes::{CanvasElement, FreehandElement, TextElement};

/// Draw one frame of `ctx.canvas` onto `surface`.
///
/// Order: background, committed elements in z-order (elements marked by the
/// eraser are skipped, the selected element is drawn from its live draft),
/// elements marked for deletion at reduced alpha, the shape preview, the
/// freehand preview, and finally the selection box with its handles.
/// Rendering the same state twice produces the same output.
pub fn render_frame(ctx: &RenderContext, surface: &mut impl Surface) -> RenderResult<()> {
    let canvas = ctx.canvas;
    surface.set_transform(Affine::IDENTITY);
    surface.set_alpha(1.0);
    surface.clear(ctx.background_color)?;
    surface.set_transform(canvas.camera.transform());

    let selected = canvas.selection.selected_id();
    for (id, element) in canvas.document.iter() {
        if canvas.eraser.is_pending(id) {
            continue;
        }
        let element = match canvas.selection.draft() {
            Some(draft) if selected == Some(id) => draft,
            _ => element,
        };
        draw_element(ctx, surface, element)?;
    }

    if !canvas.eraser.is_empty() {
        surface.set_alpha(canvas.config.pending_alpha);
        for (id, _) in canvas.document.iter() {
            if let Some(marked) = canvas.eraser.pending(id) {
                draw_element(ctx, surface, marked)?;
            }
        }
        surface.set_alpha(1.0);
    }

    if let Some(preview) = canvas.tools.preview() {
        draw_primitives(surface, preview)?;
    }

    let points = canvas.tools.freehand_points();
    if points.len() > 1 {
        let outline = stroke_outline(points, &canvas.config.stroke);
        surface.fill_path(&outline_path(&outline), ctx.ink_color)?;
    }

    if let Some(draft) = canvas.selection.draft() {
        draw_selection(ctx, surface, draft)?;
    }
    Ok(())
}

fn draw_element(ctx: &RenderContext, surface: &mut impl Surface, element: &CanvasElement) -> RenderResult<()> {
    match element {
        CanvasElement::Shape(shape) => draw_primitives(surface, &shape.primitives),
        CanvasElement::Text(text) => draw_text(ctx, surface, text),
        CanvasElement::Freehand(stroke) => draw_freehand(ctx, surface, stroke),
    }
}

fn draw_primitives(surface: &mut impl Surface, primitives: &Primitives) -> RenderResult<()> {
    for primitive in primitives {
        surface.stroke_path(&primitive.path, primitive.stroke_color.into(), primitive.stroke_width)?;
    }
    Ok(())
}

fn draw_text(ctx: &RenderContext, surface: &mut impl Surface, text: &TextElement) -> RenderResult<()> {
    let font_size = text.options.font_size(ctx.canvas.config.font_size);
    for (origin, line) in text.lines() {
        surface.fill_text(line, origin, text.options.font_family.name(), font_size, ctx.text_color)?;
    }
    Ok(())
}

fn draw_freehand(ctx: &RenderContext, surface: &mut impl Surface, stroke: &FreehandElement) -> RenderResult<()> {
    let outline = stroke_outline(&stroke.points, &stroke.options);
    let path = outline_path(&outline);
    if path.elements().is_empty() {
        return Ok(());
    }
    surface.fill_path(&path, ctx.ink_color)
}

/// Selection box plus the eight handles. Widths are divided by zoom so they
/// keep a constant screen size.
fn draw_selection(ctx: &RenderContext, surface: &mut impl Surface, draft: &CanvasElement) -> RenderResult<()> {
    let canvas = ctx.canvas;
    let zoom = canvas.camera.zoom;
    let bounds = selection_box(draft, canvas.config.square_padding);
    surface.stroke_path(&bounds.to_path(0.1), ctx.selection_color, 1.0 / zoom)?;

    for handle in get_handles(draft, zoom, &canvas.config) {
        let path = handle.rect().to_path(0.1);
        surface.fill_path(&path, Color::WHITE)?;
        surface.stroke_path(&path, ctx.selection_color, 1.5 / zoom)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::{BezPath, Point};
    use sketchroom_core::geometry::Frame;
    use sketchroom_core::input::{MouseButton, PointerEvent};
    use sketchroom_core::rough::RoughStyle;
    use sketchroom_core::shapes::{ElementId, ShapeElement, ShapeKind, TextOptions, TextSize};
    use sketchroom_core::tools::ToolKind;
    use sketchroom_core::{Canvas, CanvasConfig};

    /// Records every call as a line of text.
    #[derive(Default)]
    struct RecordingSurface {
        ops: Vec<String>,
        alpha: f64,
    }

    impl Surface for RecordingSurface {
        fn clear(&mut self, _color: Color) -> RenderResult<()> {
            self.ops.clear();
            self.ops.push("clear".into());
            Ok(())
        }

        fn set_transform(&mut self, transform: Affine) {
            self.ops.push(format!("transform {:?}", transform.as_coeffs()));
        }

        fn set_alpha(&mut self, alpha: f64) {
            self.alpha = alpha;
        }

        fn stroke_path(&mut self, _path: &BezPath, color: Color, width: f64) -> RenderResult<()> {
            let rgba = color.to_rgba8();
            self.ops.push(format!("stroke a={} alpha={} w={width}", rgba.a, self.alpha));
            Ok(())
        }

        fn fill_path(&mut self, _path: &BezPath, _color: Color) -> RenderResult<()> {
            self.ops.push(format!("fill alpha={}", self.alpha));
            Ok(())
        }

        fn fill_text(
            &mut self,
            text: &str,
            origin: Point,
            font_family: &str,
            font_size: f64,
            _color: Color,
        ) -> RenderResult<()> {
            self.ops
                .push(format!("text {text} at {},{} {font_size}px {font_family}", origin.x, origin.y));
            Ok(())
        }
    }

    fn canvas() -> Canvas {
        let mut canvas = Canvas::new(CanvasConfig::default(), "room", "me");
        let style = RoughStyle::default();
        canvas.document.insert(
            ElementId::Stored("square".into()),
            CanvasElement::Shape(ShapeElement::new(ShapeKind::Square, Frame::new(0.0, 0.0, 100.0, 100.0), &style)),
        );
        canvas.document.insert(
            ElementId::Stored("text".into()),
            CanvasElement::Text(TextElement::new(
                Frame::new(200.0, 10.0, 50.0, 57.6),
                "a\nb".into(),
                TextOptions::default(),
            )),
        );
        canvas
    }

    fn render(canvas: &Canvas) -> Vec<String> {
        let mut surface = RecordingSurface::default();
        render_frame(&RenderContext::new(canvas), &mut surface).unwrap();
        surface.ops
    }

    #[test]
    fn test_frame_order() {
        let ops = render(&canvas());
        assert_eq!(ops[0], "clear");
        assert!(ops[1].starts_with("transform"));
        assert!(ops[2].starts_with("stroke a=255 alpha=1"));
        assert_eq!(ops[ops.len() - 2], "text a at 200,10 24px Excalifont");
        assert_eq!(ops[ops.len() - 1], "text b at 200,38.8 24px Excalifont");
    }

    #[test]
    fn test_text_size_sets_font_size() {
        let mut canvas = Canvas::new(CanvasConfig::default(), "room", "me");
        canvas.document.insert(
            ElementId::Stored("big".into()),
            CanvasElement::Text(TextElement::new(
                Frame::new(0.0, 0.0, 50.0, 57.6),
                "big".into(),
                TextOptions {
                    size: TextSize::Xl,
                    ..TextOptions::default()
                },
            )),
        );
        let ops = render(&canvas);
        assert_eq!(ops[ops.len() - 1], "text big at 0,0 48px Excalifont");
    }

    #[test]
    fn test_render_is_idempotent() {
        let canvas = canvas();
        assert_eq!(render(&canvas), render(&canvas));
    }

    #[test]
    fn test_pending_deletion_drawn_translucent() {
        let mut canvas = canvas();
        canvas.set_tool(ToolKind::Eraser);
        canvas.handle_pointer(&PointerEvent::Down {
            position: Point::new(0.0, 50.0),
            button: MouseButton::Left,
        });
        canvas.handle_pointer(&PointerEvent::Move {
            position: Point::new(0.0, 50.0),
        });
        let ops = render(&canvas);
        let strokes: Vec<_> = ops.iter().filter(|op| op.starts_with("stroke")).collect();
        assert!(!strokes.is_empty());
        assert!(strokes.iter().all(|op| op.starts_with("stroke a=77 alpha=0.5 w=2")));
    }

    #[test]
    fn test_selection_handles_drawn_last() {
        let mut canvas = canvas();
        canvas.set_tool(ToolKind::Selection);
        canvas.handle_pointer(&PointerEvent::Down {
            position: Point::new(50.0, 50.0),
            button: MouseButton::Left,
        });
        let ops = render(&canvas);
        let fills = ops.iter().filter(|op| op.starts_with("fill")).count();
        assert_eq!(fills, 8);
        assert!(ops.last().unwrap().starts_with("stroke a=255 alpha=1 w=1.5"));
    }

    #[test]
    fn test_freehand_preview() {
        let mut canvas = Canvas::new(CanvasConfig::default(), "room", "me");
        canvas.set_tool(ToolKind::Pencil);
        canvas.handle_pointer(&PointerEvent::Down {
            position: Point::new(0.0, 0.0),
            button: MouseButton::Left,
        });
        assert_eq!(render(&canvas).iter().filter(|op| op.starts_with("fill")).count(), 0);
        canvas.handle_pointer(&PointerEvent::Move {
            position: Point::new(30.0, 10.0),
        });
        canvas.handle_pointer(&PointerEvent::Move {
            position: Point::new(60.0, 5.0),
        });
        assert_eq!(render(&canvas).iter().filter(|op| op.starts_with("fill")).count(), 1);
    }
}
