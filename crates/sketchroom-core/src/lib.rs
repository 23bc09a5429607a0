//! SketchRoom Core Library
//!
//! Platform-agnostic data structures and interaction logic for the SketchRoom
//! collaborative canvas: geometry, camera, drawing tools, selection, eraser,
//! and the persistence/realtime synchronization layer.

pub mod camera;
pub mod canvas;
pub mod collaboration;
pub mod config;
pub mod eraser;
pub mod geometry;
pub mod input;
pub mod rough;
pub mod selection;
pub mod session;
pub mod shapes;
pub mod storage;
pub mod sync;
pub mod tools;

pub use camera::Camera;
pub use canvas::{Canvas, CanvasDocument};
pub use collaboration::CollaborationManager;
pub use config::CanvasConfig;
pub use eraser::EraserEngine;
pub use input::{Key, KeyEvent, Modifiers, MouseButton, PointerEvent};
pub use rough::{Primitive, Primitives, RoughStyle};
pub use selection::{CursorIcon, SelectionEngine};
pub use session::RoomSession;
pub use shapes::{CanvasElement, ElementId, ShapeKind};
pub use storage::{MemoryStorage, Storage, StorageError};
pub use sync::{ElementPayload, Outbound, StoredRow, SyncEvent};
pub use tools::{DrawingSession, ToolKind};
