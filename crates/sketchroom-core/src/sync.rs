//! Wire payloads exchanged with the element store, and sync events.
//!
//! A stored row looks like
//! `{ "id", "room_id", "user_id", "type", "data": { "x", "y", "width", "height", ... } }`
//! where `data` optionally carries `content` (text), `points` (pencil, as
//! `[x, y]` pairs) and `options` (text or pencil options).

use crate::geometry::Frame;
use crate::rough::RoughStyle;
use crate::shapes::{
    CanvasElement, FreehandElement, ShapeElement, ShapeKind, StrokeOptions, TextElement, TextOptions,
};
use crate::storage::{Notification, Storage};
use kurbo::Point;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Errors decoding a wire payload.
#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("Missing field `{field}` for {kind:?}")]
    MissingField { kind: ElementType, field: &'static str },
    #[error("Invalid payload: {0}")]
    Json(#[from] serde_json::Error),
}

/// Element type tag as stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementType {
    Square,
    Circle,
    Triangle,
    Line,
    ArrowedLine,
    Text,
    Pencil,
}

impl From<ShapeKind> for ElementType {
    fn from(kind: ShapeKind) -> Self {
        match kind {
            ShapeKind::Square => ElementType::Square,
            ShapeKind::Circle => ElementType::Circle,
            ShapeKind::Triangle => ElementType::Triangle,
            ShapeKind::Line => ElementType::Line,
            ShapeKind::ArrowedLine => ElementType::ArrowedLine,
        }
    }
}

/// The `data` object of a stored row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementData {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub points: Option<Vec<[f64; 2]>>,
}

impl ElementData {
    fn geometry(frame: Frame) -> Self {
        Self {
            x: frame.x,
            y: frame.y,
            width: frame.width,
            height: frame.height,
            content: None,
            options: None,
            points: None,
        }
    }

    fn frame(&self) -> Frame {
        Frame::new(self.x, self.y, self.width, self.height)
    }
}

/// Type tag plus data: what gets written for an insert or update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementPayload {
    #[serde(rename = "type")]
    pub kind: ElementType,
    pub data: ElementData,
}

impl ElementPayload {
    /// Encode an element for the store.
    pub fn from_element(element: &CanvasElement) -> Self {
        match element {
            CanvasElement::Shape(shape) => Self {
                kind: shape.kind.into(),
                data: ElementData::geometry(shape.frame()),
            },
            CanvasElement::Text(text) => Self {
                kind: ElementType::Text,
                data: ElementData {
                    content: Some(text.content.clone()),
                    options: serde_json::to_value(&text.options).ok(),
                    ..ElementData::geometry(text.frame())
                },
            },
            CanvasElement::Freehand(stroke) => Self {
                kind: ElementType::Pencil,
                data: ElementData {
                    points: Some(stroke.points.iter().map(|p| [p.x, p.y]).collect()),
                    options: serde_json::to_value(&stroke.options).ok(),
                    // Stored metadata as-is; zero until first moved or resized.
                    ..ElementData::geometry(Frame::new(stroke.x, stroke.y, stroke.width, stroke.height))
                },
            },
        }
    }

    /// Decode into a canvas element, building shape primitives with `style`.
    pub fn to_element(&self, style: &RoughStyle) -> Result<CanvasElement, PayloadError> {
        let data = &self.data;
        let shape = |kind: ShapeKind| -> Result<CanvasElement, PayloadError> {
            Ok(CanvasElement::Shape(ShapeElement::new(kind, data.frame(), style)))
        };

        match self.kind {
            ElementType::Square => shape(ShapeKind::Square),
            ElementType::Circle => shape(ShapeKind::Circle),
            ElementType::Triangle => shape(ShapeKind::Triangle),
            ElementType::Line => shape(ShapeKind::Line),
            ElementType::ArrowedLine => shape(ShapeKind::ArrowedLine),
            ElementType::Text => {
                let content = data.content.clone().ok_or(PayloadError::MissingField {
                    kind: self.kind,
                    field: "content",
                })?;
                let options: TextOptions = match &data.options {
                    Some(value) => serde_json::from_value(value.clone())?,
                    None => TextOptions::default(),
                };
                Ok(CanvasElement::Text(TextElement::new(data.frame(), content, options)))
            }
            ElementType::Pencil => {
                let points = data.points.as_ref().ok_or(PayloadError::MissingField {
                    kind: self.kind,
                    field: "points",
                })?;
                let options: StrokeOptions = match &data.options {
                    Some(value) => serde_json::from_value(value.clone())?,
                    None => StrokeOptions::default(),
                };
                let mut stroke =
                    FreehandElement::new(points.iter().map(|[x, y]| Point::new(*x, *y)).collect(), options);
                stroke.x = data.x;
                stroke.y = data.y;
                stroke.width = data.width;
                stroke.height = data.height;
                Ok(CanvasElement::Freehand(stroke))
            }
        }
    }
}

/// A row as held by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredRow {
    pub id: String,
    pub room_id: String,
    pub user_id: String,
    #[serde(flatten)]
    pub payload: ElementPayload,
}

impl StoredRow {
    /// Parse a row out of a notification payload.
    pub fn from_value(value: serde_json::Value) -> Result<Self, PayloadError> {
        Ok(serde_json::from_value(value)?)
    }
}

/// A queued write to the store.
#[derive(Debug, Clone, PartialEq)]
pub enum Outbound {
    /// Persist a new element created under the pending id `temp`.
    Insert { temp: Uuid, payload: ElementPayload },
    /// Overwrite the geometry of a stored element.
    Update { id: String, payload: ElementPayload },
    /// Batched delete by authoritative id.
    Delete { ids: Vec<String> },
}

/// Inbound events, applied to the canvas one at a time in arrival order.
#[derive(Debug, Clone, PartialEq)]
pub enum SyncEvent {
    /// Initial room contents, oldest first.
    Hydrated(Vec<StoredRow>),
    /// The store acknowledged an insert.
    Inserted { temp: Uuid, id: String },
    /// A write failed. `temp` is set for failed inserts.
    WriteFailed { temp: Option<Uuid>, error: String },
    RemoteInsert(serde_json::Value),
    RemoteUpdate(serde_json::Value),
    RemoteDelete { id: String },
}

impl From<Notification> for SyncEvent {
    fn from(notification: Notification) -> Self {
        match notification {
            Notification::Insert(row) => SyncEvent::RemoteInsert(row),
            Notification::Update(row) => SyncEvent::RemoteUpdate(row),
            Notification::Delete { id } => SyncEvent::RemoteDelete { id },
        }
    }
}

/// Send queued writes to the store in order. Failures are logged and
/// reported as events; they never abort the remaining writes.
pub async fn flush(storage: &dyn Storage, room_id: &str, user_id: &str, ops: Vec<Outbound>) -> Vec<SyncEvent> {
    let mut events = Vec::new();
    for op in ops {
        match op {
            Outbound::Insert { temp, payload } => match storage.insert(room_id, user_id, &payload).await {
                Ok(id) => {
                    log::debug!("Stored {:?} as {id}", payload.kind);
                    events.push(SyncEvent::Inserted { temp, id });
                }
                Err(e) => {
                    log::error!("Failed to insert {:?}: {e}", payload.kind);
                    events.push(SyncEvent::WriteFailed {
                        temp: Some(temp),
                        error: e.to_string(),
                    });
                }
            },
            Outbound::Update { id, payload } => {
                if let Err(e) = storage.update(&id, &payload).await {
                    log::error!("Failed to update {id}: {e}");
                    events.push(SyncEvent::WriteFailed {
                        temp: None,
                        error: e.to_string(),
                    });
                }
            }
            Outbound::Delete { ids } => {
                if let Err(e) = storage.delete_by_ids(&ids).await {
                    log::error!("Failed to delete {} element(s): {e}", ids.len());
                    events.push(SyncEvent::WriteFailed {
                        temp: None,
                        error: e.to_string(),
                    });
                }
            }
        }
    }
    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_row_json_shape() {
        let row: StoredRow = serde_json::from_value(json!({
            "id": "42",
            "room_id": "r",
            "user_id": "u",
            "created_at": "2024-01-01T00:00:00Z",
            "type": "ArrowedLine",
            "data": { "x": 1.0, "y": 2.0, "width": 30.0, "height": -4.0 }
        }))
        .unwrap();
        assert_eq!(row.id, "42");
        assert_eq!(row.payload.kind, ElementType::ArrowedLine);
        assert_eq!(row.payload.data.frame(), Frame::new(1.0, 2.0, 30.0, -4.0));

        let value = serde_json::to_value(&row).unwrap();
        assert_eq!(value["type"], "ArrowedLine");
        assert!(value["data"].get("points").is_none());
    }

    #[test]
    fn test_text_payload() {
        let text = TextElement::new(Frame::new(5.0, 6.0, 72.0, 28.8), "hey".into(), TextOptions::default());
        let payload = ElementPayload::from_element(&CanvasElement::Text(text.clone()));
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["type"], "Text");
        assert_eq!(value["data"]["content"], "hey");
        assert_eq!(value["data"]["options"]["alignment"], "Left");
        assert_eq!(value["data"]["options"]["size"], "md");
        assert_eq!(value["data"]["options"]["fontFamily"], "Excalifont");

        let decoded = payload.to_element(&RoughStyle::default()).unwrap();
        assert_eq!(decoded.as_text(), Some(&text));
    }

    #[test]
    fn test_pencil_payload() {
        let stroke = FreehandElement::new(
            vec![Point::new(0.0, 0.0), Point::new(3.0, 4.0)],
            StrokeOptions::default(),
        );
        let payload = ElementPayload::from_element(&CanvasElement::Freehand(stroke.clone()));
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["type"], "Pencil");
        assert_eq!(value["data"]["points"], json!([[0.0, 0.0], [3.0, 4.0]]));
        assert_eq!(value["data"]["width"], 0.0);
        assert_eq!(value["data"]["options"]["thinning"], 0.5);

        let decoded = payload.to_element(&RoughStyle::default()).unwrap();
        assert_eq!(decoded.as_freehand(), Some(&stroke));
    }

    #[test]
    fn test_store_round_trip_rebuilds_elements() {
        use crate::shapes::{TextAlign, TextSize};
        use crate::storage::{MemoryStorage, block_on};

        let style = RoughStyle::default();
        let mut elements: Vec<CanvasElement> = [
            ShapeKind::Square,
            ShapeKind::Circle,
            ShapeKind::Triangle,
            ShapeKind::Line,
            ShapeKind::ArrowedLine,
        ]
        .into_iter()
        .map(|kind| CanvasElement::Shape(ShapeElement::new(kind, Frame::new(10.0, 20.0, 120.0, -45.5), &style)))
        .collect();
        elements.push(CanvasElement::Text(TextElement::new(
            Frame::new(5.0, 6.0, 72.0, 86.4),
            "two\nlines".into(),
            TextOptions {
                line_height: 43.2,
                alignment: TextAlign::Center,
                size: TextSize::Lg,
                ..TextOptions::default()
            },
        )));
        elements.push(CanvasElement::Freehand(FreehandElement::new(
            vec![Point::new(0.0, 0.0), Point::new(12.5, 4.0), Point::new(30.0, -8.25)],
            StrokeOptions::default(),
        )));

        let storage = MemoryStorage::new();
        for element in &elements {
            block_on(storage.insert("room", "u1", &ElementPayload::from_element(element))).unwrap();
        }
        let rows = block_on(storage.query_all("room")).unwrap();
        assert_eq!(rows.len(), 7);
        for (row, element) in rows.iter().zip(&elements) {
            // Go through the wire form as a subscriber would.
            let row = StoredRow::from_value(serde_json::to_value(row).unwrap()).unwrap();
            assert_eq!(&row.payload.to_element(&style).unwrap(), element);
        }
    }

    #[test]
    fn test_malformed_payloads() {
        let style = RoughStyle::default();
        let text = ElementPayload {
            kind: ElementType::Text,
            data: ElementData::geometry(Frame::new(0.0, 0.0, 1.0, 1.0)),
        };
        assert!(matches!(
            text.to_element(&style),
            Err(PayloadError::MissingField { field: "content", .. })
        ));

        let pencil = ElementPayload {
            kind: ElementType::Pencil,
            data: ElementData::geometry(Frame::new(0.0, 0.0, 1.0, 1.0)),
        };
        assert!(pencil.to_element(&style).is_err());

        let missing_geometry = StoredRow::from_value(json!({
            "id": "1", "room_id": "r", "user_id": "u",
            "type": "Square", "data": { "x": 1.0, "y": 2.0 }
        }));
        assert!(missing_geometry.is_err());
    }
}
