//! Canvas document and runtime state.

use crate::camera::Camera;
use crate::collaboration::{AppliedChange, CollaborationManager};
use crate::config::CanvasConfig;
use crate::eraser::EraserEngine;
use crate::input::{Key, KeyEvent, Modifiers, MouseButton, PointerEvent};
use crate::selection::{CursorIcon, SelectionEngine};
use crate::shapes::{CanvasElement, ElementId, TextMeasure};
use crate::tools::{DrawingSession, ToolKind};
use kurbo::{Point, Size, Vec2};
use std::collections::HashMap;

/// The canonical element map with its z-order (back to front).
#[derive(Debug, Clone, Default)]
pub struct CanvasDocument {
    elements: HashMap<ElementId, CanvasElement>,
    z_order: Vec<ElementId>,
}

impl CanvasDocument {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an element. New ids go on top; replaced ones keep
    /// their z position.
    pub fn insert(&mut self, id: ElementId, element: CanvasElement) -> Option<CanvasElement> {
        let previous = self.elements.insert(id.clone(), element);
        if previous.is_none() {
            self.z_order.push(id);
        }
        previous
    }

    /// Remove an element by ID.
    pub fn remove(&mut self, id: &ElementId) -> Option<CanvasElement> {
        let removed = self.elements.remove(id)?;
        self.z_order.retain(|z| z != id);
        Some(removed)
    }

    /// Get an element by ID.
    pub fn get(&self, id: &ElementId) -> Option<&CanvasElement> {
        self.elements.get(id)
    }

    pub fn contains(&self, id: &ElementId) -> bool {
        self.elements.contains_key(id)
    }

    /// Change an element's key in place. Returns false if `old` is absent.
    pub fn rekey(&mut self, old: &ElementId, new: ElementId) -> bool {
        let Some(element) = self.elements.remove(old) else {
            return false;
        };
        if let Some(slot) = self.z_order.iter_mut().find(|z| *z == old) {
            *slot = new.clone();
        }
        self.elements.insert(new, element);
        true
    }

    /// Elements back to front.
    pub fn iter(&self) -> impl Iterator<Item = (&ElementId, &CanvasElement)> + '_ {
        self.z_order
            .iter()
            .filter_map(move |id| self.elements.get(id).map(|element| (id, element)))
    }

    /// Elements front to back, for hit priority.
    pub fn iter_topmost(&self) -> impl Iterator<Item = (&ElementId, &CanvasElement)> + '_ {
        self.z_order
            .iter()
            .rev()
            .filter_map(move |id| self.elements.get(id).map(|element| (id, element)))
    }

    /// Check if the document is empty.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Get the number of elements.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Clear all elements.
    pub fn clear(&mut self) {
        self.elements.clear();
        self.z_order.clear();
    }
}

/// Runtime canvas state: the element map plus every interaction engine.
#[derive(Debug, Clone)]
pub struct Canvas {
    /// Canonical elements.
    pub document: CanvasDocument,
    /// Camera for view transform.
    pub camera: Camera,
    /// Active tool and drawing state.
    pub tools: DrawingSession,
    pub selection: SelectionEngine,
    pub eraser: EraserEngine,
    /// Outgoing writes and incoming notifications.
    pub collaboration: CollaborationManager,
    pub config: CanvasConfig,
    /// Viewport size.
    pub viewport_size: Size,
    /// Cursor requested by the last hover.
    pub cursor: CursorIcon,
    space_held: bool,
    /// Last screen point of an active pan drag.
    pan_anchor: Option<Point>,
}

impl Canvas {
    /// Create an empty canvas for a room and user.
    pub fn new(config: CanvasConfig, room_id: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            document: CanvasDocument::new(),
            camera: Camera::with_limits(config.min_zoom, config.max_zoom),
            tools: DrawingSession::new(),
            selection: SelectionEngine::new(),
            eraser: EraserEngine::new(),
            collaboration: CollaborationManager::new(room_id, user_id),
            config,
            viewport_size: Size::new(800.0, 600.0),
            cursor: CursorIcon::Default,
            space_held: false,
            pan_anchor: None,
        }
    }

    /// Set the viewport size.
    pub fn set_viewport_size(&mut self, width: f64, height: f64) {
        self.viewport_size = Size::new(width, height);
    }

    /// Switch tools, dropping in-progress drawing, erasing, and selection.
    pub fn set_tool(&mut self, tool: ToolKind) {
        self.tools.set_tool(tool);
        self.eraser.cancel();
        self.selection.clear();
        self.cursor = match tool {
            ToolKind::Panning => CursorIcon::Grab,
            ToolKind::Selection => CursorIcon::Default,
            ToolKind::Text => CursorIcon::Text,
            _ => CursorIcon::Crosshair,
        };
    }

    pub fn tool(&self) -> ToolKind {
        self.tools.current_tool
    }

    /// Route a pointer event. Returns true if a redraw is needed.
    ///
    /// Only the primary button starts or ends a gesture.
    pub fn handle_pointer(&mut self, event: &PointerEvent) -> bool {
        match event {
            PointerEvent::Down { position, button } => {
                *button == MouseButton::Left && self.pointer_down(*position)
            }
            PointerEvent::Move { position } => self.pointer_move(*position),
            PointerEvent::Up { position, button } => *button == MouseButton::Left && self.pointer_up(*position),
            PointerEvent::Wheel {
                position,
                delta,
                modifiers,
            } => {
                self.wheel(*position, *delta, *modifiers);
                true
            }
        }
    }

    /// Route a keyboard event. Returns true if a redraw is needed.
    pub fn handle_key(&mut self, event: &KeyEvent) -> bool {
        match event {
            KeyEvent::Pressed(Key::Space) => {
                self.space_held = true;
                false
            }
            KeyEvent::Released(Key::Space) => {
                self.space_held = false;
                self.pan_anchor = None;
                false
            }
            KeyEvent::Pressed(Key::Delete | Key::Backspace) if self.tool() == ToolKind::Selection => {
                self.delete_selected()
            }
            KeyEvent::Pressed(Key::Escape) => {
                self.tools.cancel();
                self.eraser.cancel();
                self.selection.clear();
                true
            }
            _ => false,
        }
    }

    fn pointer_down(&mut self, screen: Point) -> bool {
        if self.space_held || self.tool() == ToolKind::Panning {
            self.pan_anchor = Some(screen);
            self.cursor = CursorIcon::Grab;
            return false;
        }

        let world = self.camera.screen_to_world(screen);
        match self.tool() {
            ToolKind::Selection => {
                self.selection
                    .pointer_down(world, &self.document, self.camera.zoom, &self.config);
                true
            }
            ToolKind::Text => self.tools.begin_typing(world),
            _ => {
                self.tools.begin(world);
                false
            }
        }
    }

    fn pointer_move(&mut self, screen: Point) -> bool {
        if let Some(anchor) = self.pan_anchor {
            self.camera.pan(screen - anchor);
            self.pan_anchor = Some(screen);
            return true;
        }

        let world = self.camera.screen_to_world(screen);
        match self.tool() {
            ToolKind::Selection => {
                if self.selection.is_dragging() {
                    self.selection.pointer_move(world, &self.config.rough)
                } else {
                    self.cursor =
                        self.selection
                            .hover_cursor(world, &self.document, self.camera.zoom, &self.config);
                    false
                }
            }
            ToolKind::Eraser => {
                self.tools.is_erasing()
                    && self.eraser.sweep(
                        world,
                        &self.document,
                        self.config.eraser_tolerance,
                        &self.config.rough,
                    ) > 0
            }
            _ if self.tools.is_drawing() => {
                self.tools.update(world, &self.config.rough);
                true
            }
            _ => false,
        }
    }

    fn pointer_up(&mut self, screen: Point) -> bool {
        if self.pan_anchor.take().is_some() {
            return false;
        }

        let world = self.camera.screen_to_world(screen);
        match self.tool() {
            ToolKind::Selection => self.commit_selection(),
            ToolKind::Eraser => {
                if !self.tools.is_erasing() {
                    return false;
                }
                self.tools.cancel();
                let removed = self.eraser.finish(&mut self.document);
                log::debug!("Erased {} element(s)", removed.len());
                self.collaboration.queue_delete(&removed);
                true
            }
            _ => {
                let was_drawing = self.tools.is_drawing();
                if let Some(element) = self.tools.end(world, &self.config.rough, &self.config.stroke) {
                    self.insert_local(element);
                }
                was_drawing
            }
        }
    }

    fn wheel(&mut self, position: Point, delta: Vec2, modifiers: Modifiers) {
        if modifiers.command() {
            let zoom_delta = if delta.y.abs() > self.config.wheel_zoom_threshold {
                -delta.y.signum() * self.config.wheel_zoom_cap
            } else {
                -delta.y * self.config.wheel_zoom_factor
            };
            self.camera.zoom_about(position, zoom_delta);
        } else if modifiers.shift {
            let scroll = if delta.x.abs() >= delta.y.abs() { delta.x } else { delta.y };
            self.camera.pan(Vec2::new(-scroll, 0.0));
        } else {
            self.camera.pan(-delta);
        }
    }

    /// Write the selection draft into the map and queue its update.
    fn commit_selection(&mut self) -> bool {
        let Some((id, element)) = self.selection.pointer_up() else {
            return false;
        };
        if !self.document.contains(&id) {
            log::debug!("Dropping edit of {id}: element was removed during the drag");
            self.selection.clear();
            return true;
        }
        self.collaboration.queue_update(&id, &element);
        self.document.insert(id, element);
        true
    }

    /// Insert a locally created element under a pending id and queue its
    /// persistence.
    pub fn insert_local(&mut self, element: CanvasElement) -> ElementId {
        let id = ElementId::pending();
        if let ElementId::Pending(temp) = &id {
            self.collaboration.queue_insert(*temp, &element);
        }
        log::debug!("Created {} {id}", element.type_name());
        self.document.insert(id.clone(), element);
        id
    }

    /// Delete the selected element locally and remotely. Returns true if
    /// something was deleted.
    pub fn delete_selected(&mut self) -> bool {
        let Some(id) = self.selection.delete_selected() else {
            return false;
        };
        self.document.remove(&id);
        self.eraser.forget(&id);
        self.collaboration.queue_delete(std::slice::from_ref(&id));
        true
    }

    /// Close the open text entry (focus lost). Blank content is discarded.
    pub fn commit_text(&mut self, content: &str, measure: &dyn TextMeasure) -> Option<ElementId> {
        let text = self
            .tools
            .finish_typing(content, self.config.font_size, self.config.line_height(), measure)?;
        Some(self.insert_local(CanvasElement::Text(text)))
    }

    /// Zoom in one step about the viewport center.
    pub fn zoom_in(&mut self) {
        self.camera.zoom_about_center(self.viewport_size, self.config.zoom_step);
    }

    /// Zoom out one step about the viewport center.
    pub fn zoom_out(&mut self) {
        self.camera.zoom_about_center(self.viewport_size, -self.config.zoom_step);
    }

    /// Reset zoom to 100% and pan to the origin.
    pub fn reset_view(&mut self) {
        self.camera.reset();
    }

    /// Apply queued sync events to the map and keep selection and eraser
    /// state consistent with it. Returns true if anything changed.
    pub fn apply_sync(&mut self) -> bool {
        let changes = self.collaboration.apply(&mut self.document, &self.config.rough);
        for change in &changes {
            match change {
                AppliedChange::Rekeyed { old, new } => {
                    self.selection.rekey(old, new);
                    self.eraser.rekey(old, new);
                }
                AppliedChange::Removed(id) => self.eraser.forget(id),
                AppliedChange::Upserted(_) => {}
            }
        }
        self.selection.refresh(&self.document);
        !changes.is_empty()
    }
}
