//! Proximity resolution for connect gestures.
//!
//! While a connection line is being dragged, the note whose connector anchor
//! is closest to the pointer (and within the capture radius) is the
//! candidate target. The same lookup decides the outcome on release.

use crate::board::Board;
use crate::geometry::Point;
use crate::id::NoteId;

/// Nearest note whose connector anchor lies within `radius` of `point`
/// (board-local), ignoring `exclude`. Ties go to the earlier note in board
/// order.
pub fn nearest_within(
    board: &Board,
    point: Point,
    exclude: Option<NoteId>,
    radius: f64,
) -> Option<NoteId> {
    let mut best: Option<(NoteId, f64)> = None;
    for note in board.notes() {
        if Some(note.id) == exclude {
            continue;
        }
        let distance = point.distance_to(note.anchor());
        if distance > radius {
            continue;
        }
        if best.is_none_or(|(_, d)| distance < d) {
            best = Some((note.id, distance));
        }
    }
    if let Some((id, distance)) = best {
        log::trace!("proximity: {id} at {distance:.1}");
    }
    best.map(|(id, _)| id)
}

/// `nearest_within` using the board's configured capture radius.
pub fn connection_target(board: &Board, point: Point, source: NoteId) -> Option<NoteId> {
    nearest_within(board, point, Some(source), board.config().capture_radius)
}
