//! Input abstraction layer.
//!
//! Normalizes pointer events from the host into a unified `InputEvent` enum
//! consumed by the gesture controller. Coordinates are viewport coordinates;
//! the controller converts them to board-local space.

use sb_core::hit::NoteRegion;
use sb_core::id::{ConnectionId, NoteId};

/// What the pointer was over when the event fired, as reported by the host's
/// hit testing (or `sb_core::hit` for hosts without their own).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerTarget {
    /// Empty board area.
    Board,
    /// A region of a note.
    Note(NoteId, NoteRegion),
    /// A connection line.
    Connection(ConnectionId),
}

/// A normalized input event.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Pointer pressed.
    PointerDown { x: f64, y: f64, target: PointerTarget },

    /// Pointer moved. Tracked gestures follow it off the note.
    PointerMove { x: f64, y: f64 },

    /// Pointer released.
    PointerUp { x: f64, y: f64 },

    /// The tracked pointer was lost (left the surface, capture revoked,
    /// window blurred). Ends any gesture without committing it.
    PointerCancel,

    /// Click (press and release) delivered after `PointerUp`.
    Click { x: f64, y: f64, target: PointerTarget },
}

impl InputEvent {
    pub fn from_pointer_down(x: f64, y: f64, target: PointerTarget) -> Self {
        Self::PointerDown { x, y, target }
    }

    pub fn from_pointer_move(x: f64, y: f64) -> Self {
        Self::PointerMove { x, y }
    }

    pub fn from_pointer_up(x: f64, y: f64) -> Self {
        Self::PointerUp { x, y }
    }

    pub fn from_click(x: f64, y: f64, target: PointerTarget) -> Self {
        Self::Click { x, y, target }
    }
}

impl PointerTarget {
    /// The note this target belongs to, if any.
    pub fn note(&self) -> Option<NoteId> {
        match self {
            Self::Note(id, _) => Some(*id),
            _ => None,
        }
    }
}
