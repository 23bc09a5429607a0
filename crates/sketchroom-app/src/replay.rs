//! Input scripts replayed through a room session.
//!
//! A script is a JSON array of steps, e.g.
//!
//! ```json
//! [
//!   { "action": "tool", "tool": "Square" },
//!   { "action": "pointer", "event": "down", "position": { "x": 10, "y": 10 } },
//!   { "action": "pointer", "event": "up", "position": { "x": 90, "y": 60 } },
//!   { "action": "sync" }
//! ]
//! ```

use crate::error::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use sketchroom_core::input::{KeyEvent, PointerEvent};
use sketchroom_core::shapes::MonospaceMeasure;
use sketchroom_core::sync::StoredRow;
use sketchroom_core::tools::ToolKind;
use sketchroom_core::RoomSession;
use std::path::Path;

/// One scripted input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Step {
    Tool { tool: ToolKind },
    Pointer(PointerEvent),
    Key(KeyEvent),
    /// Commit the open text entry with this content.
    Text { content: String },
    ZoomIn,
    ZoomOut,
    ResetView,
    Viewport { width: f64, height: f64 },
    /// Flush writes and apply notifications.
    Sync,
}

/// Counters reported after a replay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplayStats {
    pub steps: usize,
    pub redraws: usize,
    pub syncs: usize,
}

/// Apply every step to the session, then flush once more.
pub async fn replay(session: &mut RoomSession, steps: &[Step]) -> ReplayStats {
    let measure = MonospaceMeasure::default();
    let mut stats = ReplayStats::default();
    for step in steps {
        let canvas = &mut session.canvas;
        let redraw = match step {
            Step::Tool { tool } => {
                canvas.set_tool(*tool);
                true
            }
            Step::Pointer(event) => canvas.handle_pointer(event),
            Step::Key(event) => canvas.handle_key(event),
            Step::Text { content } => canvas.commit_text(content, &measure).is_some(),
            Step::ZoomIn => {
                canvas.zoom_in();
                true
            }
            Step::ZoomOut => {
                canvas.zoom_out();
                true
            }
            Step::ResetView => {
                canvas.reset_view();
                true
            }
            Step::Viewport { width, height } => {
                canvas.set_viewport_size(*width, *height);
                true
            }
            Step::Sync => {
                stats.syncs += 1;
                session.pump().await
            }
        };
        stats.steps += 1;
        if redraw {
            stats.redraws += 1;
        }
    }
    session.pump().await;
    log::info!(
        "Replayed {} step(s), {} redraw(s), zoom {}%",
        stats.steps,
        stats.redraws,
        session.canvas.camera.zoom_percent()
    );
    stats
}

pub fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> AppResult<T> {
    let text = std::fs::read_to_string(path).map_err(|source| AppError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| AppError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Load a row dump, skipping rows that do not decode.
pub fn load_rows(path: &Path) -> AppResult<Vec<StoredRow>> {
    let values: Vec<serde_json::Value> = read_json(path)?;
    let total = values.len();
    let rows: Vec<StoredRow> = values
        .into_iter()
        .filter_map(|value| match StoredRow::from_value(value) {
            Ok(row) => Some(row),
            Err(e) => {
                log::warn!("Skipping malformed row in {}: {e}", path.display());
                None
            }
        })
        .collect();
    log::info!("Loaded {}/{} row(s) from {}", rows.len(), total, path.display());
    Ok(rows)
}
