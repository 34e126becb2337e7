//! Property tests for board invariants (sb-core).

use proptest::prelude::*;
use sb_core::{Board, NoteId, Point};
use std::collections::HashSet;

/// One random edit against a board holding `n` notes (indices wrap).
#[derive(Debug, Clone)]
enum Op {
    Create { x: f64, y: f64 },
    Resize { note: usize, w: f64, h: f64 },
    Connect { from: usize, to: usize },
    Delete { note: usize },
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (-2000.0..2000.0f64, -2000.0..2000.0f64).prop_map(|(x, y)| Op::Create { x, y }),
        (0..16usize, -500.0..800.0f64, -500.0..800.0f64)
            .prop_map(|(note, w, h)| Op::Resize { note, w, h }),
        (0..16usize, 0..16usize).prop_map(|(from, to)| Op::Connect { from, to }),
        (0..16usize).prop_map(|note| Op::Delete { note }),
    ]
}

fn pick(board: &Board, i: usize) -> Option<NoteId> {
    let ids: Vec<NoteId> = board.notes().map(|n| n.id).collect();
    (!ids.is_empty()).then(|| ids[i % ids.len()])
}

fn check_invariants(board: &Board) {
    let ids: HashSet<NoteId> = board.notes().map(|n| n.id).collect();
    assert_eq!(ids.len(), board.note_count(), "note ids must be distinct");

    for note in board.notes() {
        assert!(note.size.width >= 100.0 && note.size.height >= 60.0);
    }

    let mut pairs = HashSet::new();
    for c in board.connections() {
        assert!(ids.contains(&c.from) && ids.contains(&c.to), "orphan connection");
        assert_ne!(c.from, c.to);
        let key = if c.from.as_str() < c.to.as_str() {
            (c.from, c.to)
        } else {
            (c.to, c.from)
        };
        assert!(pairs.insert(key), "two connections between one pair");
    }
}

proptest! {
    #[test]
    fn created_ids_are_distinct(n in 1usize..64) {
        let mut board = Board::default();
        let ids: HashSet<NoteId> = (0..n)
            .map(|i| board.create_note(Point::new(i as f64, 0.0), 0.3).id)
            .collect();
        prop_assert_eq!(ids.len(), n);
    }

    #[test]
    fn resize_never_breaks_floor(w in -1e6..1e6f64, h in -1e6..1e6f64) {
        let mut board = Board::default();
        let id = board.create_note(Point::new(0.0, 0.0), 0.0).id;
        board.resize_note(id, w, h);
        let size = board.note(id).unwrap().size;
        prop_assert!(size.width >= 100.0);
        prop_assert!(size.height >= 60.0);
    }

    #[test]
    fn reverse_connection_is_rejected(x in 0.0..1000.0f64) {
        let mut board = Board::default();
        let a = board.create_note(Point::new(x, 0.0), 0.0).id;
        let b = board.create_note(Point::new(x + 400.0, 0.0), 0.0).id;
        prop_assert!(board.create_connection(a, b).is_some());
        prop_assert!(board.create_connection(b, a).is_none());
        prop_assert_eq!(board.connections().filter(|c| c.joins(a, b)).count(), 1);
    }

    #[test]
    fn random_edit_sequences_keep_invariants(ops in proptest::collection::vec(op(), 1..80)) {
        let mut board = Board::default();
        for op in ops {
            match op {
                Op::Create { x, y } => {
                    board.create_note(Point::new(x, y), 0.5);
                }
                Op::Resize { note, w, h } => {
                    if let Some(id) = pick(&board, note) {
                        board.resize_note(id, w, h);
                    }
                }
                Op::Connect { from, to } => {
                    if let (Some(a), Some(b)) = (pick(&board, from), pick(&board, to)) {
                        board.create_connection(a, b);
                    }
                }
                Op::Delete { note } => {
                    if let Some(id) = pick(&board, note) {
                        board.delete_note(id);
                        prop_assert!(board.connections().all(|c| !c.touches(id)));
                    }
                }
            }
            check_invariants(&board);
        }
    }
}
