//! Hit testing: point → note region lookup.
//!
//! Walks notes front-to-back (last inserted = topmost) and classifies the
//! point against each note's handles, computed from stored geometry only.

use crate::board::Board;
use crate::geometry::{Point, distance_to_segment};
use crate::id::{ConnectionId, NoteId};
use crate::model::Note;

/// Height of the drag header strip at the top of a note.
pub const HEADER_HEIGHT: f64 = 30.0;
/// Hit radius around the connector anchor.
pub const CONNECTOR_RADIUS: f64 = 8.0;
/// Side of the square resize grip in the bottom-right corner.
pub const RESIZE_GRIP: f64 = 16.0;

/// Which part of a note a point falls on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteRegion {
    /// Bottom-right grip: starts a resize.
    Resize,
    /// Connector circle in the header: starts a connect gesture.
    Connector,
    /// Rest of the header strip: starts a drag.
    Header,
    /// Content area (text and images).
    Body,
}

fn contains(note: &Note, p: Point) -> bool {
    p.x >= note.position.x
        && p.x <= note.position.x + note.size.width
        && p.y >= note.position.y
        && p.y <= note.position.y + note.size.height
}

/// Classify `p` against a single note. Handles win over the header, the
/// header wins over the body.
pub fn region_of(note: &Note, p: Point) -> Option<NoteRegion> {
    if !contains(note, p) {
        return None;
    }
    let right = note.position.x + note.size.width;
    let bottom = note.position.y + note.size.height;
    if p.x >= right - RESIZE_GRIP && p.y >= bottom - RESIZE_GRIP {
        return Some(NoteRegion::Resize);
    }
    if p.distance_to(note.anchor()) <= CONNECTOR_RADIUS {
        return Some(NoteRegion::Connector);
    }
    if p.y <= note.position.y + HEADER_HEIGHT {
        return Some(NoteRegion::Header);
    }
    Some(NoteRegion::Body)
}

/// Find the topmost note at board-local `p` and the region hit.
/// Returns `None` if the point is on empty board.
pub fn hit_test(board: &Board, p: Point) -> Option<(NoteId, NoteRegion)> {
    board
        .notes()
        .rev()
        .find_map(|note| region_of(note, p).map(|region| (note.id, region)))
}

/// Find the connection whose line passes within `tolerance` of `p`.
/// Later connections win, matching paint order.
pub fn connection_at(board: &Board, p: Point, tolerance: f64) -> Option<ConnectionId> {
    let segments: Vec<_> = board.connection_segments().collect();
    segments
        .into_iter()
        .rev()
        .find(|(_, a, b)| distance_to_segment(p, *a, *b) <= tolerance)
        .map(|(id, _, _)| id)
}
