//! Selection, move, and resize.
//!
//! A single element can be selected. While dragging, edits go to a draft
//! copy built from a drag-start snapshot; the canonical map is only written
//! on commit.

use crate::canvas::CanvasDocument;
use crate::config::CanvasConfig;
use crate::geometry::{Frame, is_inside, rect_contains_inclusive};
use crate::rough::RoughStyle;
use crate::shapes::{CanvasElement, ElementId, ShapeKind};
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// Corner positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

/// Edge positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Edge {
    Top,
    Right,
    Bottom,
    Left,
}

/// Type of resize handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HandleKind {
    Corner(Corner),
    /// Edge midpoint handle.
    Edge(Edge),
}

impl HandleKind {
    /// All handles in hit-test order.
    pub const ALL: [HandleKind; 8] = [
        HandleKind::Corner(Corner::TopLeft),
        HandleKind::Corner(Corner::TopRight),
        HandleKind::Corner(Corner::BottomLeft),
        HandleKind::Corner(Corner::BottomRight),
        HandleKind::Edge(Edge::Top),
        HandleKind::Edge(Edge::Bottom),
        HandleKind::Edge(Edge::Left),
        HandleKind::Edge(Edge::Right),
    ];

    fn moves_left(&self) -> bool {
        matches!(
            self,
            HandleKind::Corner(Corner::TopLeft | Corner::BottomLeft) | HandleKind::Edge(Edge::Left)
        )
    }

    fn moves_right(&self) -> bool {
        matches!(
            self,
            HandleKind::Corner(Corner::TopRight | Corner::BottomRight) | HandleKind::Edge(Edge::Right)
        )
    }

    fn moves_top(&self) -> bool {
        matches!(
            self,
            HandleKind::Corner(Corner::TopLeft | Corner::TopRight) | HandleKind::Edge(Edge::Top)
        )
    }

    fn moves_bottom(&self) -> bool {
        matches!(
            self,
            HandleKind::Corner(Corner::BottomLeft | Corner::BottomRight) | HandleKind::Edge(Edge::Bottom)
        )
    }

    /// Handle on the opposite side horizontally.
    fn mirror_x(self) -> Self {
        match self {
            HandleKind::Corner(Corner::TopLeft) => HandleKind::Corner(Corner::TopRight),
            HandleKind::Corner(Corner::TopRight) => HandleKind::Corner(Corner::TopLeft),
            HandleKind::Corner(Corner::BottomLeft) => HandleKind::Corner(Corner::BottomRight),
            HandleKind::Corner(Corner::BottomRight) => HandleKind::Corner(Corner::BottomLeft),
            HandleKind::Edge(Edge::Left) => HandleKind::Edge(Edge::Right),
            HandleKind::Edge(Edge::Right) => HandleKind::Edge(Edge::Left),
            other => other,
        }
    }

    /// Handle on the opposite side vertically.
    fn mirror_y(self) -> Self {
        match self {
            HandleKind::Corner(Corner::TopLeft) => HandleKind::Corner(Corner::BottomLeft),
            HandleKind::Corner(Corner::BottomLeft) => HandleKind::Corner(Corner::TopLeft),
            HandleKind::Corner(Corner::TopRight) => HandleKind::Corner(Corner::BottomRight),
            HandleKind::Corner(Corner::BottomRight) => HandleKind::Corner(Corner::TopRight),
            HandleKind::Edge(Edge::Top) => HandleKind::Edge(Edge::Bottom),
            HandleKind::Edge(Edge::Bottom) => HandleKind::Edge(Edge::Top),
            other => other,
        }
    }

    /// Map a handle placed on the normalized box to the side of the signed
    /// frame it sits on. A negative width puts `x` on the right.
    fn oriented(self, frame: Frame) -> Self {
        let mut kind = self;
        if frame.width < 0.0 {
            kind = kind.mirror_x();
        }
        if frame.height < 0.0 {
            kind = kind.mirror_y();
        }
        kind
    }

    /// Resize cursor shown while hovering this handle.
    pub fn cursor(&self) -> CursorIcon {
        match self {
            HandleKind::Corner(Corner::TopLeft | Corner::BottomRight) => CursorIcon::NwseResize,
            HandleKind::Corner(Corner::TopRight | Corner::BottomLeft) => CursorIcon::NeswResize,
            HandleKind::Edge(Edge::Top | Edge::Bottom) => CursorIcon::NsResize,
            HandleKind::Edge(Edge::Left | Edge::Right) => CursorIcon::EwResize,
        }
    }
}

/// Pointer cursor requested by the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CursorIcon {
    #[default]
    Default,
    Move,
    NwseResize,
    NeswResize,
    NsResize,
    EwResize,
    Grab,
    Crosshair,
    Text,
}

/// A resize handle: a square whose top-left corner is `position`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Handle {
    pub kind: HandleKind,
    /// Top-left corner in world coordinates.
    pub position: Point,
    /// Edge length in world units.
    pub size: f64,
}

impl Handle {
    pub fn rect(&self) -> Rect {
        Rect::new(
            self.position.x,
            self.position.y,
            self.position.x + self.size,
            self.position.y + self.size,
        )
    }

    /// Check if a world point is on this handle.
    pub fn hit_test(&self, point: Point) -> bool {
        rect_contains_inclusive(self.rect(), point)
    }
}

/// Padded, positive-size selection box of an element.
pub fn selection_box(element: &CanvasElement, square_padding: f64) -> Rect {
    let padding = element.selection_padding(square_padding);
    element.frame().normalized().inflate(padding, padding)
}

/// The eight resize handles of an element. Handles keep a constant size on
/// screen, so their world size shrinks as zoom grows.
pub fn get_handles(element: &CanvasElement, zoom: f64, config: &CanvasConfig) -> [Handle; 8] {
    let bounds = selection_box(element, config.square_padding);
    let size = config.handle_size / zoom;
    let center = bounds.center();
    HandleKind::ALL.map(|kind| {
        let anchor = match kind {
            HandleKind::Corner(Corner::TopLeft) => Point::new(bounds.x0, bounds.y0),
            HandleKind::Corner(Corner::TopRight) => Point::new(bounds.x1, bounds.y0),
            HandleKind::Corner(Corner::BottomLeft) => Point::new(bounds.x0, bounds.y1),
            HandleKind::Corner(Corner::BottomRight) => Point::new(bounds.x1, bounds.y1),
            HandleKind::Edge(Edge::Top) => Point::new(center.x, bounds.y0),
            HandleKind::Edge(Edge::Bottom) => Point::new(center.x, bounds.y1),
            HandleKind::Edge(Edge::Left) => Point::new(bounds.x0, center.y),
            HandleKind::Edge(Edge::Right) => Point::new(bounds.x1, center.y),
        };
        Handle {
            kind,
            position: Point::new(anchor.x - size / 2.0, anchor.y - size / 2.0),
            size,
        }
    })
}

/// First handle under a world point.
pub fn hit_test_handles(handles: &[Handle], point: Point) -> Option<HandleKind> {
    handles.iter().find(|h| h.hit_test(point)).map(|h| h.kind)
}

/// What a drag does to the selected element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragMode {
    Move,
    Resize(HandleKind),
}

/// In-progress drag.
#[derive(Debug, Clone)]
pub struct DragState {
    pub mode: DragMode,
    /// World point where the drag began.
    pub start: Point,
    /// Snapshot of the element at drag start.
    pub original: CanvasElement,
}

/// New frame after dragging `handle` by `delta`. The opposite edge stays put.
/// `handle` names a side of the signed frame, see [`HandleKind::oriented`].
fn resized_frame(frame: Frame, handle: HandleKind, delta: Vec2) -> Frame {
    let mut out = frame;
    if handle.moves_left() {
        out.x += delta.x;
        out.width -= delta.x;
    }
    if handle.moves_right() {
        out.width += delta.x;
    }
    if handle.moves_top() {
        out.y += delta.y;
        out.height -= delta.y;
    }
    if handle.moves_bottom() {
        out.height += delta.y;
    }
    out
}

/// Circle resize: the diameter is the larger delta-adjusted dimension, with
/// the original orientation kept and the anchor edge held fixed.
fn resized_circle_frame(frame: Frame, handle: HandleKind, delta: Vec2) -> Frame {
    let dx = if handle.moves_right() {
        delta.x
    } else if handle.moves_left() {
        -delta.x
    } else {
        0.0
    };
    let dy = if handle.moves_bottom() {
        delta.y
    } else if handle.moves_top() {
        -delta.y
    } else {
        0.0
    };
    let diameter = (frame.width + dx).abs().max((frame.height + dy).abs());
    let width = diameter * frame.width.signum();
    let height = diameter * frame.height.signum();

    let mut out = Frame::new(frame.x, frame.y, width, height);
    if handle.moves_left() {
        out.x = frame.x + (frame.width - width);
    }
    if handle.moves_top() {
        out.y = frame.y + (frame.height - height);
    }
    out
}

/// Apply a drag to the drag-start snapshot and return the new draft.
///
/// Shapes are rebuilt from the new frame, freehand points follow the frame.
pub fn apply_drag(original: &CanvasElement, mode: DragMode, delta: Vec2, style: &RoughStyle) -> CanvasElement {
    let mut draft = original.clone();
    match mode {
        DragMode::Move => draft.translate(delta, style),
        DragMode::Resize(handle) => {
            let frame = original.frame();
            let handle = handle.oriented(frame);
            let target = match original {
                CanvasElement::Shape(shape) if shape.kind == ShapeKind::Circle => {
                    resized_circle_frame(frame, handle, delta)
                }
                _ => resized_frame(frame, handle, delta),
            };
            draft.set_frame(target, style);
        }
    }
    draft
}

/// Selection state for the canvas.
#[derive(Debug, Clone, Default)]
pub struct SelectionEngine {
    selected: Option<ElementId>,
    /// Live copy of the selected element, edited during drags.
    draft: Option<CanvasElement>,
    drag: Option<DragState>,
}

impl SelectionEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected_id(&self) -> Option<&ElementId> {
        self.selected.as_ref()
    }

    /// The selected element as currently drawn (including any drag).
    pub fn draft(&self) -> Option<&CanvasElement> {
        self.draft.as_ref()
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn drag_mode(&self) -> Option<DragMode> {
        self.drag.as_ref().map(|d| d.mode)
    }

    /// Select an element without starting a drag.
    pub fn select(&mut self, id: ElementId, element: CanvasElement) {
        self.selected = Some(id);
        self.draft = Some(element);
        self.drag = None;
    }

    /// Deselect.
    pub fn clear(&mut self) {
        self.selected = None;
        self.draft = None;
        self.drag = None;
    }

    /// Resolve a pointer press: the selected element's handles, then its
    /// padded box, then the topmost element under the pointer, otherwise
    /// deselect. Returns true if something is selected afterwards.
    pub fn pointer_down(&mut self, world: Point, doc: &CanvasDocument, zoom: f64, config: &CanvasConfig) -> bool {
        if let Some(draft) = &self.draft {
            let handles = get_handles(draft, zoom, config);
            if let Some(kind) = hit_test_handles(&handles, world) {
                self.drag = Some(DragState {
                    mode: DragMode::Resize(kind),
                    start: world,
                    original: draft.clone(),
                });
                return true;
            }
            if rect_contains_inclusive(selection_box(draft, config.square_padding), world) {
                self.drag = Some(DragState {
                    mode: DragMode::Move,
                    start: world,
                    original: draft.clone(),
                });
                return true;
            }
        }

        let hit = doc
            .iter_topmost()
            .find(|(_, element)| is_inside(world, element, config.eraser_tolerance));
        match hit {
            Some((id, element)) => {
                log::debug!("Selected {id}");
                self.selected = Some(id.clone());
                self.draft = Some(element.clone());
                self.drag = Some(DragState {
                    mode: DragMode::Move,
                    start: world,
                    original: element.clone(),
                });
                true
            }
            None => {
                self.clear();
                false
            }
        }
    }

    /// Update the draft for the current drag. Returns true if it changed.
    pub fn pointer_move(&mut self, world: Point, style: &RoughStyle) -> bool {
        let Some(drag) = &self.drag else {
            return false;
        };
        let delta = world - drag.start;
        self.draft = Some(apply_drag(&drag.original, drag.mode, delta, style));
        true
    }

    /// End the drag. Returns the id and draft to commit if the element changed.
    pub fn pointer_up(&mut self) -> Option<(ElementId, CanvasElement)> {
        let drag = self.drag.take()?;
        let id = self.selected.clone()?;
        let draft = self.draft.clone()?;
        if draft == drag.original {
            return None;
        }
        Some((id, draft))
    }

    /// Cursor for a non-dragging hover.
    pub fn hover_cursor(&self, world: Point, doc: &CanvasDocument, zoom: f64, config: &CanvasConfig) -> CursorIcon {
        if let Some(draft) = &self.draft {
            let handles = get_handles(draft, zoom, config);
            if let Some(kind) = hit_test_handles(&handles, world) {
                return kind.cursor();
            }
            if rect_contains_inclusive(selection_box(draft, config.square_padding), world) {
                return CursorIcon::Move;
            }
        }
        if doc
            .iter_topmost()
            .any(|(_, element)| is_inside(world, element, config.eraser_tolerance))
        {
            return CursorIcon::Move;
        }
        CursorIcon::Default
    }

    /// Take the selected id for deletion and deselect.
    pub fn delete_selected(&mut self) -> Option<ElementId> {
        let id = self.selected.take();
        self.clear();
        id
    }

    /// Follow an id change made by the sync layer.
    pub fn rekey(&mut self, old: &ElementId, new: &ElementId) {
        if self.selected.as_ref() == Some(old) {
            self.selected = Some(new.clone());
        }
    }

    /// Refresh the draft from the canonical map after a remote change.
    /// Drags in progress keep their draft; a removed element is deselected.
    pub fn refresh(&mut self, doc: &CanvasDocument) {
        let Some(id) = &self.selected else {
            return;
        };
        match doc.get(id) {
            None => self.clear(),
            Some(element) if self.drag.is_none() => self.draft = Some(element.clone()),
            Some(_) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{FreehandElement, ShapeElement, StrokeOptions};

    fn shape(kind: ShapeKind, frame: Frame) -> CanvasElement {
        CanvasElement::Shape(ShapeElement::new(kind, frame, &RoughStyle::default()))
    }

    fn doc_with(elements: Vec<(&str, CanvasElement)>) -> CanvasDocument {
        let mut doc = CanvasDocument::new();
        for (id, element) in elements {
            doc.insert(ElementId::Stored(id.into()), element);
        }
        doc
    }

    #[test]
    fn test_handles_positions() {
        let config = CanvasConfig::default();
        let square = shape(ShapeKind::Square, Frame::new(0.0, 0.0, 100.0, 50.0));
        let handles = get_handles(&square, 2.0, &config);
        // Padded box is (-10,-10)-(110,60), handle size 4 world units.
        let tl = handles[0];
        assert_eq!(tl.kind, HandleKind::Corner(Corner::TopLeft));
        assert!((tl.size - 4.0).abs() < f64::EPSILON);
        assert_eq!(tl.position, Point::new(-12.0, -12.0));
        let right = handles[7];
        assert_eq!(right.kind, HandleKind::Edge(Edge::Right));
        assert_eq!(right.position, Point::new(108.0, 23.0));
    }

    #[test]
    fn test_handle_hit_and_cursor() {
        let config = CanvasConfig::default();
        let circle = shape(ShapeKind::Circle, Frame::new(0.0, 0.0, 40.0, 40.0));
        let handles = get_handles(&circle, 1.0, &config);
        assert_eq!(
            hit_test_handles(&handles, Point::new(41.0, 41.0)),
            Some(HandleKind::Corner(Corner::BottomRight))
        );
        assert_eq!(
            hit_test_handles(&handles, Point::new(20.0, -3.0)),
            Some(HandleKind::Edge(Edge::Top))
        );
        assert_eq!(hit_test_handles(&handles, Point::new(20.0, 20.0)), None);
        assert_eq!(HandleKind::Corner(Corner::TopRight).cursor(), CursorIcon::NeswResize);
        assert_eq!(HandleKind::Edge(Edge::Left).cursor(), CursorIcon::EwResize);
    }

    #[test]
    fn test_resize_corners_and_edges() {
        let frame = Frame::new(10.0, 10.0, 100.0, 50.0);
        let d = Vec2::new(5.0, 7.0);
        assert_eq!(
            resized_frame(frame, HandleKind::Corner(Corner::TopLeft), d),
            Frame::new(15.0, 17.0, 95.0, 43.0)
        );
        assert_eq!(
            resized_frame(frame, HandleKind::Corner(Corner::TopRight), d),
            Frame::new(10.0, 17.0, 105.0, 43.0)
        );
        assert_eq!(
            resized_frame(frame, HandleKind::Corner(Corner::BottomLeft), d),
            Frame::new(15.0, 10.0, 95.0, 57.0)
        );
        assert_eq!(
            resized_frame(frame, HandleKind::Corner(Corner::BottomRight), d),
            Frame::new(10.0, 10.0, 105.0, 57.0)
        );
        assert_eq!(
            resized_frame(frame, HandleKind::Edge(Edge::Top), d),
            Frame::new(10.0, 17.0, 100.0, 43.0)
        );
        assert_eq!(
            resized_frame(frame, HandleKind::Edge(Edge::Bottom), d),
            Frame::new(10.0, 10.0, 100.0, 57.0)
        );
        assert_eq!(
            resized_frame(frame, HandleKind::Edge(Edge::Left), d),
            Frame::new(15.0, 10.0, 95.0, 50.0)
        );
        assert_eq!(
            resized_frame(frame, HandleKind::Edge(Edge::Right), d),
            Frame::new(10.0, 10.0, 105.0, 50.0)
        );
    }

    #[test]
    fn test_circle_resize_keeps_aspect() {
        let frame = Frame::new(0.0, 0.0, 40.0, 40.0);
        let out = resized_circle_frame(frame, HandleKind::Corner(Corner::BottomRight), Vec2::new(10.0, 2.0));
        assert_eq!(out, Frame::new(0.0, 0.0, 50.0, 50.0));

        // Dragging the top-left corner outward keeps the bottom-right fixed.
        let out = resized_circle_frame(frame, HandleKind::Corner(Corner::TopLeft), Vec2::new(-20.0, -5.0));
        assert_eq!(out, Frame::new(-20.0, -20.0, 60.0, 60.0));
        assert_eq!(out.end(), frame.end());
    }

    #[test]
    fn test_circle_resize_negative_orientation() {
        let frame = Frame::new(40.0, 40.0, -40.0, -40.0);
        let out = resized_circle_frame(frame, HandleKind::Edge(Edge::Right), Vec2::new(-10.0, 0.0));
        assert!((out.width + 50.0).abs() < f64::EPSILON);
        assert!((out.height + 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_resize_negative_square_keeps_opposite_corner() {
        let config = CanvasConfig::default();
        let style = RoughStyle::default();
        // Drawn from (100,100) up and to the left.
        let doc = doc_with(vec![("a", shape(ShapeKind::Square, Frame::new(100.0, 100.0, -100.0, -100.0)))]);
        let mut selection = SelectionEngine::new();
        selection.pointer_down(Point::new(50.0, 50.0), &doc, 1.0, &config);
        selection.pointer_up();

        // Visual top-left handle sits at the padded corner (-10,-10).
        assert!(selection.pointer_down(Point::new(-10.0, -10.0), &doc, 1.0, &config));
        assert_eq!(
            selection.drag_mode(),
            Some(DragMode::Resize(HandleKind::Corner(Corner::TopLeft)))
        );
        selection.pointer_move(Point::new(-30.0, -30.0), &style);
        let (_, element) = selection.pointer_up().unwrap();
        assert_eq!(element.frame().normalized(), Rect::new(-20.0, -20.0, 100.0, 100.0));
    }

    #[test]
    fn test_resize_negative_edges() {
        let style = RoughStyle::default();
        let original = shape(ShapeKind::Triangle, Frame::new(100.0, 100.0, -100.0, -50.0));

        let right = apply_drag(&original, DragMode::Resize(HandleKind::Edge(Edge::Right)), Vec2::new(20.0, 0.0), &style);
        assert_eq!(right.frame().normalized(), Rect::new(0.0, 50.0, 120.0, 100.0));

        let top = apply_drag(&original, DragMode::Resize(HandleKind::Edge(Edge::Top)), Vec2::new(0.0, 10.0), &style);
        assert_eq!(top.frame().normalized(), Rect::new(0.0, 60.0, 100.0, 100.0));
    }

    #[test]
    fn test_resize_negative_circle_keeps_opposite_corner() {
        let style = RoughStyle::default();
        let original = shape(ShapeKind::Circle, Frame::new(100.0, 100.0, -100.0, -100.0));
        let resized = apply_drag(
            &original,
            DragMode::Resize(HandleKind::Corner(Corner::TopLeft)),
            Vec2::new(-20.0, -10.0),
            &style,
        );
        assert_eq!(resized.frame().normalized(), Rect::new(-20.0, -20.0, 100.0, 100.0));
        assert!(resized.frame().width < 0.0);
    }

    #[test]
    fn test_apply_drag_rebuilds_shape() {
        let style = RoughStyle::default();
        let original = shape(ShapeKind::Triangle, Frame::new(0.0, 0.0, 30.0, 30.0));
        let moved = apply_drag(&original, DragMode::Move, Vec2::new(10.0, 10.0), &style);
        assert_eq!(moved, shape(ShapeKind::Triangle, Frame::new(10.0, 10.0, 30.0, 30.0)));
    }

    #[test]
    fn test_freehand_resize_reprojects() {
        let style = RoughStyle::default();
        let stroke = CanvasElement::Freehand(FreehandElement::new(
            vec![Point::new(0.0, 0.0), Point::new(10.0, 20.0), Point::new(20.0, 10.0)],
            StrokeOptions::default(),
        ));
        let resized = apply_drag(
            &stroke,
            DragMode::Resize(HandleKind::Corner(Corner::BottomRight)),
            Vec2::new(20.0, 20.0),
            &style,
        );
        let points = &resized.as_freehand().unwrap().points;
        assert_eq!(points[1], Point::new(20.0, 40.0));
        assert_eq!(points[2], Point::new(40.0, 20.0));
    }

    #[test]
    fn test_pointer_down_order() {
        let config = CanvasConfig::default();
        let doc = doc_with(vec![
            ("below", shape(ShapeKind::Square, Frame::new(0.0, 0.0, 100.0, 100.0))),
            ("above", shape(ShapeKind::Square, Frame::new(50.0, 50.0, 100.0, 100.0))),
        ]);
        let mut selection = SelectionEngine::new();

        // Topmost wins on overlap.
        assert!(selection.pointer_down(Point::new(75.0, 75.0), &doc, 1.0, &config));
        assert_eq!(selection.selected_id(), Some(&ElementId::Stored("above".into())));
        assert_eq!(selection.drag_mode(), Some(DragMode::Move));
        selection.pointer_up();

        // Padding around the selected square keeps it selected.
        assert!(selection.pointer_down(Point::new(155.0, 100.0), &doc, 1.0, &config));
        assert_eq!(selection.selected_id(), Some(&ElementId::Stored("above".into())));
        selection.pointer_up();

        // Handle of the selected element wins over the element below.
        assert!(selection.pointer_down(Point::new(40.0, 40.0), &doc, 1.0, &config));
        assert_eq!(
            selection.drag_mode(),
            Some(DragMode::Resize(HandleKind::Corner(Corner::TopLeft)))
        );
        selection.pointer_up();

        // Empty space deselects.
        assert!(!selection.pointer_down(Point::new(500.0, 500.0), &doc, 1.0, &config));
        assert!(selection.selected_id().is_none());
    }

    #[test]
    fn test_drag_and_commit() {
        let config = CanvasConfig::default();
        let style = RoughStyle::default();
        let doc = doc_with(vec![("a", shape(ShapeKind::Square, Frame::new(0.0, 0.0, 50.0, 50.0)))]);
        let mut selection = SelectionEngine::new();
        selection.pointer_down(Point::new(25.0, 25.0), &doc, 1.0, &config);
        selection.pointer_move(Point::new(35.0, 45.0), &style);
        let (id, element) = selection.pointer_up().unwrap();
        assert_eq!(id, ElementId::Stored("a".into()));
        assert_eq!(element.frame(), Frame::new(10.0, 20.0, 50.0, 50.0));
        assert!(!selection.is_dragging());
        assert_eq!(selection.draft(), Some(&element));
    }

    #[test]
    fn test_click_without_move_commits_nothing() {
        let config = CanvasConfig::default();
        let doc = doc_with(vec![("a", shape(ShapeKind::Square, Frame::new(0.0, 0.0, 50.0, 50.0)))]);
        let mut selection = SelectionEngine::new();
        selection.pointer_down(Point::new(25.0, 25.0), &doc, 1.0, &config);
        assert!(selection.pointer_up().is_none());
    }

    #[test]
    fn test_hover_cursor() {
        let config = CanvasConfig::default();
        let doc = doc_with(vec![("a", shape(ShapeKind::Circle, Frame::new(0.0, 0.0, 40.0, 40.0)))]);
        let mut selection = SelectionEngine::new();
        assert_eq!(selection.hover_cursor(Point::new(20.0, 20.0), &doc, 1.0, &config), CursorIcon::Move);
        assert_eq!(selection.hover_cursor(Point::new(90.0, 90.0), &doc, 1.0, &config), CursorIcon::Default);

        selection.pointer_down(Point::new(20.0, 20.0), &doc, 1.0, &config);
        selection.pointer_up();
        assert_eq!(
            selection.hover_cursor(Point::new(0.0, 20.0), &doc, 1.0, &config),
            CursorIcon::EwResize
        );
    }

    #[test]
    fn test_refresh_and_delete() {
        let config = CanvasConfig::default();
        let mut doc = doc_with(vec![("a", shape(ShapeKind::Square, Frame::new(0.0, 0.0, 50.0, 50.0)))]);
        let mut selection = SelectionEngine::new();
        selection.pointer_down(Point::new(25.0, 25.0), &doc, 1.0, &config);
        selection.pointer_up();

        doc.remove(&ElementId::Stored("a".into()));
        selection.refresh(&doc);
        assert!(selection.selected_id().is_none());

        selection.select(ElementId::Stored("b".into()), shape(ShapeKind::Line, Frame::default()));
        assert_eq!(selection.delete_selected(), Some(ElementId::Stored("b".into())));
        assert!(selection.draft().is_none());
    }
}
