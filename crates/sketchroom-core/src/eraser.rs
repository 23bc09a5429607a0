//! Eraser: marks elements under the pointer path for deletion.
//!
//! Marked elements stay in the canonical map and are also copied into a
//! pending map (shapes rebuilt with the deletion style) until the gesture
//! ends, at which point they leave both maps together.

use crate::canvas::CanvasDocument;
use crate::geometry::is_on_border;
use crate::rough::RoughStyle;
use crate::shapes::{CanvasElement, ElementId};
use kurbo::Point;
use std::collections::HashMap;

/// Pending-deletion state of an erase gesture.
#[derive(Debug, Clone, Default)]
pub struct EraserEngine {
    pending: HashMap<ElementId, CanvasElement>,
}

impl EraserEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark every unmarked element whose outline is within `tolerance` of
    /// `world`. Returns the number of newly marked elements.
    pub fn sweep(&mut self, world: Point, doc: &CanvasDocument, tolerance: f64, style: &RoughStyle) -> usize {
        let deletion = style.deletion();
        let mut marked = 0;
        for (id, element) in doc.iter() {
            if self.pending.contains_key(id) || !is_on_border(world, element, tolerance) {
                continue;
            }
            self.pending.insert(id.clone(), element.with_style(&deletion));
            marked += 1;
        }
        marked
    }

    /// Remove every marked element from `doc` and clear the pending map.
    /// Returns the removed ids for a single batched remote delete.
    pub fn finish(&mut self, doc: &mut CanvasDocument) -> Vec<ElementId> {
        let mut removed: Vec<ElementId> = self
            .pending
            .drain()
            .filter_map(|(id, _)| doc.remove(&id).map(|_| id))
            .collect();
        removed.sort_by_key(|id| id.to_string());
        removed
    }

    /// Drop all marks without deleting anything.
    pub fn cancel(&mut self) {
        self.pending.clear();
    }

    pub fn is_pending(&self, id: &ElementId) -> bool {
        self.pending.contains_key(id)
    }

    /// Translucent copy of a marked element.
    pub fn pending(&self, id: &ElementId) -> Option<&CanvasElement> {
        self.pending.get(id)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Follow an id change made by the sync layer.
    pub fn rekey(&mut self, old: &ElementId, new: &ElementId) {
        if let Some(element) = self.pending.remove(old) {
            self.pending.insert(new.clone(), element);
        }
    }

    /// Unmark an element removed by someone else.
    pub fn forget(&mut self, id: &ElementId) {
        self.pending.remove(id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Frame;
    use crate::shapes::{ShapeElement, ShapeKind, TextElement, TextOptions};

    fn id(s: &str) -> ElementId {
        ElementId::Stored(s.into())
    }

    fn doc() -> CanvasDocument {
        let style = RoughStyle::default();
        let mut doc = CanvasDocument::new();
        doc.insert(
            id("square"),
            CanvasElement::Shape(ShapeElement::new(ShapeKind::Square, Frame::new(0.0, 0.0, 100.0, 100.0), &style)),
        );
        doc.insert(
            id("text"),
            CanvasElement::Text(TextElement::new(
                Frame::new(300.0, 300.0, 50.0, 30.0),
                "hi".into(),
                TextOptions::default(),
            )),
        );
        doc.insert(
            id("line"),
            CanvasElement::Shape(ShapeElement::new(ShapeKind::Line, Frame::new(500.0, 0.0, 0.0, 100.0), &style)),
        );
        doc
    }

    #[test]
    fn test_border_marks_interior_does_not() {
        let style = RoughStyle::default();
        let doc = doc();
        let mut eraser = EraserEngine::new();
        assert_eq!(eraser.sweep(Point::new(50.0, 50.0), &doc, 7.0, &style), 0);
        assert!(!eraser.is_pending(&id("square")));
        assert_eq!(eraser.sweep(Point::new(50.0, 0.0), &doc, 7.0, &style), 1);
        assert!(eraser.is_pending(&id("square")));
        // Already marked elements are not marked twice.
        assert_eq!(eraser.sweep(Point::new(50.0, 2.0), &doc, 7.0, &style), 0);
    }

    #[test]
    fn test_pending_copy_uses_deletion_style() {
        let style = RoughStyle::default();
        let doc = doc();
        let mut eraser = EraserEngine::new();
        eraser.sweep(Point::new(0.0, 50.0), &doc, 7.0, &style);
        let copy = eraser.pending(&id("square")).unwrap();
        let prim = copy.as_shape().unwrap().primitives.first();
        assert!((prim.stroke_width - 2.0).abs() < f64::EPSILON);
        assert_eq!(prim.stroke_color.a, 77);
        // Text is copied as-is.
        eraser.sweep(Point::new(320.0, 310.0), &doc, 7.0, &style);
        assert_eq!(eraser.pending(&id("text")), doc.get(&id("text")));
    }

    #[test]
    fn test_finish_removes_only_marked() {
        let style = RoughStyle::default();
        let mut doc = doc();
        let mut eraser = EraserEngine::new();
        eraser.sweep(Point::new(50.0, 0.0), &doc, 7.0, &style);
        eraser.sweep(Point::new(503.0, 50.0), &doc, 7.0, &style);
        let removed = eraser.finish(&mut doc);
        assert_eq!(removed, vec![id("line"), id("square")]);
        assert!(eraser.is_empty());
        assert!(doc.get(&id("square")).is_none());
        assert!(doc.get(&id("line")).is_none());
        assert!(doc.get(&id("text")).is_some());
        assert_eq!(doc.len(), 1);
    }

    #[test]
    fn test_rekey_and_forget() {
        let style = RoughStyle::default();
        let doc = doc();
        let mut eraser = EraserEngine::new();
        eraser.sweep(Point::new(50.0, 0.0), &doc, 7.0, &style);
        eraser.rekey(&id("square"), &id("renamed"));
        assert!(eraser.is_pending(&id("renamed")));
        eraser.forget(&id("renamed"));
        assert!(eraser.is_empty());
    }
}
