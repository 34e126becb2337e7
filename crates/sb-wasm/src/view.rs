//! Render view-model handed to the JS host.
//!
//! The host draws notes as absolutely positioned elements and connections as
//! SVG lines; this module flattens the board plus the gesture overlay into
//! the plain shape it needs.

use sb_core::board::Board;
use sb_core::geometry::Point;
use sb_editor::gesture::Overlay;
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardView<'a> {
    pub notes: Vec<NoteView<'a>>,
    pub connections: Vec<ConnectionView<'a>>,
    pub pending_line: Option<LineView>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteView<'a> {
    pub id: &'a str,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub text: &'a str,
    pub images: &'a [String],
    pub color: &'a str,
    /// Being dragged or resized; drawn above the others.
    pub active: bool,
    /// Highlighted as the connect target under the pointer.
    pub connect_target: bool,
    pub menu_open: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionView<'a> {
    pub id: &'a str,
    #[serde(flatten)]
    pub line: LineView,
    pub hovered: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LineView {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl LineView {
    fn between(a: Point, b: Point) -> Self {
        Self {
            x1: a.x,
            y1: a.y,
            x2: b.x,
            y2: b.y,
        }
    }
}

pub fn build_view<'a>(board: &'a Board, overlay: &Overlay) -> BoardView<'a> {
    let notes = board
        .notes()
        .map(|note| NoteView {
            id: note.id.as_str(),
            x: note.position.x,
            y: note.position.y,
            width: note.size.width,
            height: note.size.height,
            text: &note.text,
            images: &note.images,
            color: &note.color,
            active: overlay.active_note == Some(note.id),
            connect_target: overlay.hover_target == Some(note.id),
            menu_open: overlay.open_menu == Some(note.id),
        })
        .collect();

    let connections = board
        .connection_segments()
        .map(|(id, from, to)| ConnectionView {
            id: id.as_str(),
            line: LineView::between(from, to),
            hovered: overlay.hovered_connection == Some(id),
        })
        .collect();

    BoardView {
        notes,
        connections,
        pending_line: overlay
            .pending_line
            .map(|(start, end)| LineView::between(start, end)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn view_flattens_notes_and_segments() {
        let mut board = Board::default();
        let a = board.create_note(Point::new(75.0, 30.0), 0.0).id;
        let b = board.create_note(Point::new(575.0, 30.0), 0.0).id;
        let c = board.create_connection(a, b).unwrap();

        let overlay = Overlay {
            hovered_connection: Some(c),
            open_menu: Some(b),
            ..Overlay::default()
        };
        let view = build_view(&board, &overlay);

        assert_eq!(view.notes.len(), 2);
        assert!(view.notes[1].menu_open);
        assert!(!view.notes[0].menu_open);
        assert_eq!(
            view.connections[0].line,
            LineView {
                x1: 125.0,
                y1: 15.0,
                x2: 625.0,
                y2: 15.0
            }
        );
        assert!(view.connections[0].hovered);
        assert_eq!(view.pending_line, None);
    }

    #[test]
    fn view_serializes_flat_connection_lines() {
        let mut board = Board::default();
        let a = board.create_note(Point::new(75.0, 30.0), 0.0).id;
        let b = board.create_note(Point::new(575.0, 30.0), 0.0).id;
        board.create_connection(a, b).unwrap();

        let overlay = Overlay {
            pending_line: Some((Point::new(1.0, 2.0), Point::new(3.0, 4.0))),
            ..Overlay::default()
        };
        let json = serde_json::to_value(build_view(&board, &overlay)).unwrap();
        assert_eq!(json["connections"][0]["x2"], 625.0);
        assert_eq!(json["pendingLine"]["y2"], 4.0);
        assert_eq!(json["notes"][0]["connectTarget"], false);
        assert_eq!(json["notes"][0]["color"], "#FFFAA0");
    }
}
