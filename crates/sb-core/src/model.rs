//! Board data model: notes, connections, and image uploads.
//!
//! Notes are the vertices and connections the edges of the board graph
//! (see `board::Board`). Values here are plain data; every mutation goes
//! through `Board` so the size floors and connection uniqueness hold.

use crate::geometry::{Point, Size, connector_anchor};
use crate::id::{ConnectionId, NoteId};
use smallvec::SmallVec;

/// Image payloads attached to a note, in insertion order.
/// Opaque strings embeddable as an image source (typically data URLs).
pub type Images = SmallVec<[String; 1]>;

/// A sticky note.
#[derive(Debug, Clone, PartialEq)]
pub struct Note {
    pub id: NoteId,
    /// Top-left corner, board-local.
    pub position: Point,
    pub size: Size,
    pub text: String,
    pub images: Images,
    /// Palette colour, fixed at creation.
    pub color: String,
}

impl Note {
    pub fn new(id: NoteId, position: Point, size: Size, color: impl Into<String>) -> Self {
        Self {
            id,
            position,
            size,
            text: String::new(),
            images: SmallVec::new(),
            color: color.into(),
        }
    }

    /// Centre of this note's connector handle.
    pub fn anchor(&self) -> Point {
        connector_anchor(self.position, self.size.width)
    }
}

/// An edge between two notes. `from`/`to` record creation order only;
/// uniqueness ignores direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Connection {
    pub id: ConnectionId,
    pub from: NoteId,
    pub to: NoteId,
}

impl Connection {
    pub fn touches(&self, note: NoteId) -> bool {
        self.from == note || self.to == note
    }

    /// Whether this connection joins `a` and `b` in either direction.
    pub fn joins(&self, a: NoteId, b: NoteId) -> bool {
        (self.from == a && self.to == b) || (self.from == b && self.to == a)
    }
}

/// Output of the image-ingestion collaborator: a payload plus the image's
/// intrinsic pixel size.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageUpload {
    /// MIME type reported for the source file (`image/png`, ...).
    pub mime: String,
    pub data: String,
    pub width: f64,
    pub height: f64,
}

impl ImageUpload {
    pub fn new(mime: impl Into<String>, data: impl Into<String>, width: f64, height: f64) -> Self {
        Self {
            mime: mime.into(),
            data: data.into(),
            width,
            height,
        }
    }

    /// Only images with a usable intrinsic size can be attached.
    pub fn is_attachable(&self) -> bool {
        self.mime.starts_with("image/")
            && self.width.is_finite()
            && self.height.is_finite()
            && self.width > 0.0
            && self.height > 0.0
    }

    /// Width / height.
    pub fn aspect_ratio(&self) -> f64 {
        self.width / self.height
    }
}
