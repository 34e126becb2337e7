//! JSON export/import of a whole board.
//!
//! ```json
//! {
//!   "notes": [{ "id", "x", "y", "text", "width", "height", "images", "color" }],
//!   "connections": [{ "id", "from", "to" }],
//!   "exportDate": "2026-10-16T09:30:00.000Z",
//!   "version": "1.0"
//! }
//! ```
//!
//! Import is all-or-nothing: a document is validated and turned into a fresh
//! `Board` before the caller swaps it in, so a rejected import never touches
//! the live board. Connections whose endpoints are not among the imported
//! notes are dropped at import time.

use crate::board::Board;
use crate::config::BoardConfig;
use crate::geometry::{Point, Size};
use crate::id::{ConnectionId, NoteId};
use crate::model::{Connection, Images, Note};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type of JSON serialization, re-exported for downstream crates.
pub type JsonError = serde_json::Error;

/// Format version written on export.
pub const FORMAT_VERSION: &str = "1.0";

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("board file is not valid JSON: {0}")]
    NotJson(#[source] serde_json::Error),
    #[error("board file must be a JSON object")]
    NotAnObject,
    #[error("board file has no `notes` array")]
    MissingNotes,
    #[error("board file has no `connections` array")]
    MissingConnections,
    #[error("board file has a malformed record: {0}")]
    MalformedRecord(#[source] serde_json::Error),
}

impl ImportError {
    /// Message shown to the user when an import is rejected.
    pub fn user_message(&self) -> &'static str {
        match self {
            ImportError::NotJson(_) => "Error reading board file. Please check the file format.",
            _ => "Invalid board file format. Please select a valid sticky notes board file.",
        }
    }
}

/// A note as written to disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoteRecord {
    pub id: NoteId,
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub width: Option<f64>,
    #[serde(default)]
    pub height: Option<f64>,
    #[serde(default)]
    pub images: Option<Images>,
    #[serde(default)]
    pub color: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConnectionRecord {
    pub id: ConnectionId,
    pub from: NoteId,
    pub to: NoteId,
}

/// The exported document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardDocument {
    pub notes: Vec<NoteRecord>,
    pub connections: Vec<ConnectionRecord>,
    #[serde(default)]
    pub export_date: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
}

impl From<&Note> for NoteRecord {
    fn from(note: &Note) -> Self {
        Self {
            id: note.id,
            x: note.position.x,
            y: note.position.y,
            text: note.text.clone(),
            width: Some(note.size.width),
            height: Some(note.size.height),
            images: Some(note.images.clone()),
            color: Some(note.color.clone()),
        }
    }
}

impl From<&Connection> for ConnectionRecord {
    fn from(c: &Connection) -> Self {
        Self {
            id: c.id,
            from: c.from,
            to: c.to,
        }
    }
}

impl NoteRecord {
    fn into_note(self, config: &BoardConfig) -> Note {
        let size = Size::new(
            self.width.unwrap_or(config.default_size.width),
            self.height.unwrap_or(config.default_size.height),
        );
        let color = self
            .color
            .unwrap_or_else(|| config.fallback_color().to_string());
        let mut note = Note::new(self.id, Point::new(self.x, self.y), size, color);
        note.text = self.text;
        note.images = self.images.unwrap_or_default();
        note
    }
}

/// Snapshot the whole board.
pub fn export_document(board: &Board, at: DateTime<Utc>) -> BoardDocument {
    BoardDocument {
        notes: board.notes().map(NoteRecord::from).collect(),
        connections: board.connections().map(ConnectionRecord::from).collect(),
        export_date: Some(at.to_rfc3339_opts(SecondsFormat::Millis, true)),
        version: Some(FORMAT_VERSION.to_string()),
    }
}

/// Serialize an exported document as pretty-printed JSON.
///
/// # Errors
/// Only if serialization itself fails, which a well-formed board never triggers.
pub fn to_json(document: &BoardDocument) -> Result<String, JsonError> {
    serde_json::to_string_pretty(document)
}

/// Suggested download name: `sticky-notes-board-YYYY-MM-DD.json`.
pub fn export_file_name(at: DateTime<Utc>) -> String {
    format!("sticky-notes-board-{}.json", at.format("%Y-%m-%d"))
}

/// Validate and decode a board document.
///
/// # Errors
/// `ImportError` if the text is not JSON, is not an object, lacks a
/// `notes` or `connections` array, or holds a record of the wrong shape.
pub fn parse_document(json: &str) -> Result<BoardDocument, ImportError> {
    let value: serde_json::Value = serde_json::from_str(json).map_err(ImportError::NotJson)?;
    let object = value.as_object().ok_or(ImportError::NotAnObject)?;
    if !object.get("notes").is_some_and(serde_json::Value::is_array) {
        return Err(ImportError::MissingNotes);
    }
    if !object
        .get("connections")
        .is_some_and(serde_json::Value::is_array)
    {
        return Err(ImportError::MissingConnections);
    }
    serde_json::from_value(value).map_err(ImportError::MalformedRecord)
}

/// Build a fresh board from a decoded document.
///
/// Notes with a repeated id keep their first occurrence. Connections that
/// reference a missing note, connect a note to itself, or repeat an existing
/// pair are dropped.
pub fn build_board(document: BoardDocument, config: BoardConfig) -> Board {
    if let Some(version) = document.version.as_deref()
        && version != FORMAT_VERSION
    {
        log::warn!("importing board format {version}, expected {FORMAT_VERSION}");
    }

    let mut board = Board::new(config);
    let mut dropped_notes = 0usize;
    for record in document.notes {
        let id = record.id;
        let note = record.into_note(board.config());
        if !board.insert_note(note) {
            log::warn!("dropping note with duplicate id {id}");
            dropped_notes += 1;
        }
    }

    let mut dropped_connections = 0usize;
    for record in document.connections {
        let connection = Connection {
            id: record.id,
            from: record.from,
            to: record.to,
        };
        if !board.insert_connection(connection) {
            log::warn!(
                "dropping connection {} ({} → {}): dangling, self-referencing, or duplicate",
                record.id,
                record.from,
                record.to
            );
            dropped_connections += 1;
        }
    }

    log::info!(
        "imported {} note(s), {} connection(s); dropped {dropped_notes} note(s), {dropped_connections} connection(s)",
        board.note_count(),
        board.connection_count()
    );
    board
}

/// `parse_document` followed by `build_board`.
///
/// # Errors
/// See `parse_document`.
pub fn import_board(json: &str, config: BoardConfig) -> Result<Board, ImportError> {
    let document = parse_document(json)?;
    Ok(build_board(document, config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 16, 9, 30, 0).unwrap()
    }

    #[test]
    fn export_stamps_date_and_version() {
        let doc = export_document(&Board::default(), at());
        assert_eq!(doc.export_date.as_deref(), Some("2026-10-16T09:30:00.000Z"));
        assert_eq!(doc.version.as_deref(), Some("1.0"));
        let json = to_json(&doc).unwrap();
        assert!(json.contains("\"exportDate\""));
        assert!(json.contains("\"notes\": []"));
    }

    #[test]
    fn file_name_uses_export_day() {
        assert_eq!(export_file_name(at()), "sticky-notes-board-2026-10-16.json");
    }

    #[test]
    fn missing_connections_rejected() {
        let err = parse_document(r#"{ "notes": [] }"#).unwrap_err();
        assert!(matches!(err, ImportError::MissingConnections));
        assert!(err.user_message().starts_with("Invalid board file format"));
    }

    #[test]
    fn non_array_notes_rejected() {
        let err = parse_document(r#"{ "notes": {}, "connections": [] }"#).unwrap_err();
        assert!(matches!(err, ImportError::MissingNotes));
    }

    #[test]
    fn garbage_rejected_as_not_json() {
        let err = parse_document("not json at all").unwrap_err();
        assert!(matches!(err, ImportError::NotJson(_)));
        assert!(err.user_message().starts_with("Error reading board file"));
    }

    #[test]
    fn malformed_note_rejected() {
        let err = parse_document(r#"{ "notes": [{ "id": "a" }], "connections": [] }"#).unwrap_err();
        assert!(matches!(err, ImportError::MalformedRecord(_)));
    }

    #[test]
    fn optional_note_fields_default() {
        let board = import_board(
            r#"{ "notes": [{ "id": "bare", "x": 5, "y": 6 }], "connections": [] }"#,
            BoardConfig::default(),
        )
        .unwrap();
        let note = board.note(NoteId::intern("bare")).unwrap();
        assert_eq!(note.size, Size::new(150.0, 80.0));
        assert_eq!(note.color, "#FFFAA0");
        assert!(note.images.is_empty());
        assert_eq!(note.text, "");
    }

    #[test]
    fn undersized_notes_clamped_on_import() {
        let board = import_board(
            r#"{ "notes": [{ "id": "tiny", "x": 0, "y": 0, "width": 10, "height": 5 }], "connections": [] }"#,
            BoardConfig::default(),
        )
        .unwrap();
        assert_eq!(board.note(NoteId::intern("tiny")).unwrap().size, Size::new(100.0, 60.0));
    }

    #[test]
    fn dangling_and_duplicate_connections_dropped() {
        let json = r#"{
            "notes": [
                { "id": "p", "x": 0, "y": 0 },
                { "id": "q", "x": 300, "y": 0 },
                { "id": "p", "x": 9, "y": 9 }
            ],
            "connections": [
                { "id": "c1", "from": "p", "to": "q" },
                { "id": "c2", "from": "q", "to": "p" },
                { "id": "c3", "from": "p", "to": "gone" },
                { "id": "c4", "from": "q", "to": "q" }
            ]
        }"#;
        let board = import_board(json, BoardConfig::default()).unwrap();
        assert_eq!(board.note_count(), 2);
        assert_eq!(board.note(NoteId::intern("p")).unwrap().position, Point::new(0.0, 0.0));
        let ids: Vec<&str> = board.connections().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["c1"]);
    }
}
