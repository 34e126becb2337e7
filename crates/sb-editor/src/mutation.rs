//! Board mutations.
//!
//! Gestures and host commands are translated into `BoardMutation` values and
//! applied through `BoardController::apply`, the single place the board is
//! written. Each variant maps onto one total `Board` operation.

use sb_core::geometry::Point;
use sb_core::id::{ConnectionId, NoteId};
use sb_core::model::ImageUpload;

#[derive(Debug, Clone, PartialEq)]
pub enum BoardMutation {
    /// Create a note around a board-local point.
    CreateNote { at: Point },
    /// Relative move.
    MoveNote { id: NoteId, dx: f64, dy: f64 },
    ResizeNote { id: NoteId, width: f64, height: f64 },
    SetText { id: NoteId, text: String },
    /// Append an image and grow the note to fit.
    AttachImage { id: NoteId, upload: ImageUpload },
    RemoveImage { id: NoteId, index: usize },
    ClearImages { id: NoteId },
    /// Delete a note and its connections.
    DeleteNote { id: NoteId },
    Connect { from: NoteId, to: NoteId },
    DeleteConnection { id: ConnectionId },
}

impl BoardMutation {
    /// Short label for logs.
    pub fn describe(&self) -> &'static str {
        match self {
            Self::CreateNote { .. } => "create note",
            Self::MoveNote { .. } => "move note",
            Self::ResizeNote { .. } => "resize note",
            Self::SetText { .. } => "edit text",
            Self::AttachImage { .. } => "attach image",
            Self::RemoveImage { .. } => "remove image",
            Self::ClearImages { .. } => "remove all images",
            Self::DeleteNote { .. } => "delete note",
            Self::Connect { .. } => "connect notes",
            Self::DeleteConnection { .. } => "delete connection",
        }
    }
}
