//! The board: authoritative store of notes and connections.
//!
//! Backed by an undirected `StableGraph`: notes are vertices, connections are
//! edges. Direction-agnostic duplicate detection is a `find_edge` lookup and
//! note deletion drops incident edges in the same call, so a connection to a
//! missing note is never observable.
//!
//! `petgraph` recycles freed indices, so iteration order is kept in explicit
//! order vectors rather than derived from index order.

use crate::config::BoardConfig;
use crate::fit::fit_for_image;
use crate::geometry::{Point, Size, spawn_top_left};
use crate::id::{ConnectionId, NoteId};
use crate::model::{Connection, ImageUpload, Note};
use petgraph::stable_graph::{EdgeIndex, NodeIndex, StableUnGraph};
use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct Board {
    graph: StableUnGraph<Note, Connection>,

    /// Index from NoteId → NodeIndex for fast lookup.
    id_index: HashMap<NoteId, NodeIndex>,

    /// Index from ConnectionId → EdgeIndex.
    edge_index: HashMap<ConnectionId, EdgeIndex>,

    /// Notes in insertion order (render order: last is topmost).
    note_order: Vec<NodeIndex>,

    /// Connections in insertion order.
    edge_order: Vec<EdgeIndex>,

    config: BoardConfig,
}

impl Default for Board {
    fn default() -> Self {
        Self::new(BoardConfig::default())
    }
}

impl Board {
    /// Create an empty board.
    #[must_use]
    pub fn new(config: BoardConfig) -> Self {
        Self {
            graph: StableUnGraph::default(),
            id_index: HashMap::new(),
            edge_index: HashMap::new(),
            note_order: Vec::new(),
            edge_order: Vec::new(),
            config,
        }
    }

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    // ─── Queries ─────────────────────────────────────────────────────────

    pub fn note(&self, id: NoteId) -> Option<&Note> {
        self.id_index.get(&id).map(|idx| &self.graph[*idx])
    }

    pub fn contains_note(&self, id: NoteId) -> bool {
        self.id_index.contains_key(&id)
    }

    /// Notes in insertion order.
    pub fn notes(&self) -> impl DoubleEndedIterator<Item = &Note> + '_ {
        self.note_order.iter().map(|idx| &self.graph[*idx])
    }

    pub fn note_count(&self) -> usize {
        self.note_order.len()
    }

    /// Connections in insertion order.
    pub fn connections(&self) -> impl Iterator<Item = &Connection> + '_ {
        self.edge_order
            .iter()
            .filter_map(|idx| self.graph.edge_weight(*idx))
    }

    pub fn connection_count(&self) -> usize {
        self.edge_order.len()
    }

    /// The connection joining `a` and `b`, in either direction.
    pub fn connection_between(&self, a: NoteId, b: NoteId) -> Option<&Connection> {
        let (ia, ib) = (self.index_of(a)?, self.index_of(b)?);
        self.graph
            .find_edge(ia, ib)
            .and_then(|e| self.graph.edge_weight(e))
    }

    pub fn is_empty(&self) -> bool {
        self.note_order.is_empty()
    }

    /// Anchor-to-anchor segment for every connection, skipping any whose
    /// endpoint cannot be found.
    pub fn connection_segments(&self) -> impl Iterator<Item = (ConnectionId, Point, Point)> + '_ {
        self.connections().filter_map(|c| {
            let from = self.note(c.from)?;
            let to = self.note(c.to)?;
            Some((c.id, from.anchor(), to.anchor()))
        })
    }

    fn index_of(&self, id: NoteId) -> Option<NodeIndex> {
        self.id_index.get(&id).copied()
    }

    fn note_mut(&mut self, id: NoteId) -> Option<&mut Note> {
        self.id_index
            .get(&id)
            .copied()
            .map(|idx| &mut self.graph[idx])
    }

    // ─── Notes ───────────────────────────────────────────────────────────

    /// Create a note around a board-local click point with the default size.
    /// `color_roll` in `[0, 1)` picks the palette colour.
    pub fn create_note(&mut self, at: Point, color_roll: f64) -> &Note {
        let mut id = NoteId::generate();
        while self.contains_note(id) {
            id = NoteId::generate();
        }
        let position = spawn_top_left(at, self.config.spawn_offset);
        let size = self.config.default_size.at_least(self.config.min_size);
        let color = self.config.pick_color(color_roll).to_string();
        let idx = self.push_note(Note::new(id, position, size, color));
        log::debug!("created note {id} at ({}, {})", position.x, position.y);
        &self.graph[idx]
    }

    /// Insert a fully formed note, e.g. from an imported document.
    /// Returns `false` (and leaves the board unchanged) if the id is taken.
    pub fn insert_note(&mut self, mut note: Note) -> bool {
        if self.contains_note(note.id) {
            return false;
        }
        note.size = note.size.at_least(self.config.min_size);
        self.push_note(note);
        true
    }

    fn push_note(&mut self, note: Note) -> NodeIndex {
        let id = note.id;
        let idx = self.graph.add_node(note);
        self.id_index.insert(id, idx);
        self.note_order.push(idx);
        idx
    }

    /// Offset a note by a relative delta. Missing ids are a no-op.
    pub fn move_note(&mut self, id: NoteId, dx: f64, dy: f64) -> bool {
        match self.note_mut(id) {
            Some(note) => {
                note.position = note.position.translate(dx, dy);
                true
            }
            None => false,
        }
    }

    /// Resize a note, clamping each axis to the minimum size.
    pub fn resize_note(&mut self, id: NoteId, width: f64, height: f64) -> bool {
        let floor = self.config.min_size;
        match self.note_mut(id) {
            Some(note) => {
                note.size = Size::new(width, height).at_least(floor);
                true
            }
            None => false,
        }
    }

    pub fn set_text(&mut self, id: NoteId, text: impl Into<String>) -> bool {
        match self.note_mut(id) {
            Some(note) => {
                note.text = text.into();
                true
            }
            None => false,
        }
    }

    /// Append an image payload without touching the note's size.
    pub fn add_image(&mut self, id: NoteId, payload: impl Into<String>) -> bool {
        match self.note_mut(id) {
            Some(note) => {
                note.images.push(payload.into());
                true
            }
            None => false,
        }
    }

    /// Remove the image at `index`; out-of-range is a no-op.
    pub fn remove_image(&mut self, id: NoteId, index: usize) -> bool {
        match self.note_mut(id) {
            Some(note) if index < note.images.len() => {
                note.images.remove(index);
                true
            }
            _ => false,
        }
    }

    /// Remove every image from a note.
    pub fn clear_images(&mut self, id: NoteId) -> bool {
        match self.note_mut(id) {
            Some(note) if !note.images.is_empty() => {
                note.images.clear();
                true
            }
            _ => false,
        }
    }

    /// Attach an uploaded image and grow the note to fit the image stack.
    ///
    /// Reads the note as it is *now*, so an upload that finishes after other
    /// edits still composes with them. Non-images and missing notes are ignored.
    pub fn attach_image(&mut self, id: NoteId, upload: &ImageUpload) -> bool {
        if !upload.is_attachable() {
            log::debug!("ignoring non-image upload ({}) for {id}", upload.mime);
            return false;
        }
        if !self.add_image(id, upload.data.clone()) {
            return false;
        }
        let Some(note) = self.note(id) else {
            return false;
        };
        let fitted = fit_for_image(
            note.size,
            note.images.len(),
            upload.aspect_ratio(),
            &self.config.image_fit,
        );
        self.resize_note(id, fitted.width, fitted.height)
    }

    /// Remove a note and every connection touching it, in one step.
    pub fn delete_note(&mut self, id: NoteId) -> Option<Note> {
        let idx = self.index_of(id)?;
        let dropped = self.delete_connections_touching(id);
        let note = self.graph.remove_node(idx)?;
        self.id_index.remove(&id);
        self.note_order.retain(|i| *i != idx);
        log::debug!("deleted note {id} and {dropped} connection(s)");
        Some(note)
    }

    // ─── Connections ─────────────────────────────────────────────────────

    /// Connect two notes. Rejected (returns `None`) for self-connections,
    /// missing endpoints, or an existing connection in either direction.
    pub fn create_connection(&mut self, from: NoteId, to: NoteId) -> Option<ConnectionId> {
        if from == to {
            log::debug!("rejecting self-connection on {from}");
            return None;
        }
        if self.connection_between(from, to).is_some() {
            log::debug!("connection {from} ↔ {to} already exists");
            return None;
        }
        let mut id = ConnectionId::generate();
        while self.edge_index.contains_key(&id) {
            id = ConnectionId::generate();
        }
        self.insert_connection(Connection { id, from, to }).then_some(id)
    }

    /// Insert a connection keeping its id. Enforces the same rules as
    /// `create_connection`, plus id uniqueness.
    pub fn insert_connection(&mut self, connection: Connection) -> bool {
        let (Some(a), Some(b)) = (self.index_of(connection.from), self.index_of(connection.to))
        else {
            return false;
        };
        if a == b
            || self.edge_index.contains_key(&connection.id)
            || self.graph.find_edge(a, b).is_some()
        {
            return false;
        }
        let id = connection.id;
        let edge = self.graph.add_edge(a, b, connection);
        self.edge_index.insert(id, edge);
        self.edge_order.push(edge);
        true
    }

    pub fn delete_connection(&mut self, id: ConnectionId) -> Option<Connection> {
        let edge = self.edge_index.remove(&id)?;
        self.edge_order.retain(|e| *e != edge);
        self.graph.remove_edge(edge)
    }

    /// Remove every connection with `note` as an endpoint. Returns how many
    /// were removed.
    pub fn delete_connections_touching(&mut self, note: NoteId) -> usize {
        let Some(idx) = self.index_of(note) else {
            return 0;
        };
        let touching: Vec<ConnectionId> = self
            .graph
            .edges(idx)
            .map(|e| e.weight().id)
            .collect();
        touching
            .into_iter()
            .filter(|id| self.delete_connection(*id).is_some())
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn board_with(positions: &[(f64, f64)]) -> (Board, Vec<NoteId>) {
        let mut board = Board::default();
        let ids = positions
            .iter()
            .map(|&(x, y)| board.create_note(Point::new(x, y), 0.0).id)
            .collect();
        (board, ids)
    }

    #[test]
    fn create_note_uses_spawn_offset_and_default_size() {
        let mut board = Board::default();
        let note = board.create_note(Point::new(300.0, 200.0), 0.5).clone();
        assert_eq!(note.position, Point::new(225.0, 170.0));
        assert_eq!(note.size, Size::new(150.0, 80.0));
        assert_eq!(note.color, "#FFD7D6");
        assert!(note.text.is_empty());
        assert!(note.images.is_empty());
    }

    #[test]
    fn move_is_relative_and_tolerates_missing() {
        let (mut board, ids) = board_with(&[(75.0, 30.0)]);
        assert!(board.move_note(ids[0], 10.0, -5.0));
        assert!(board.move_note(ids[0], 1.0, 1.0));
        assert_eq!(board.note(ids[0]).unwrap().position, Point::new(11.0, -4.0));
        assert!(!board.move_note(NoteId::intern("ghost"), 1.0, 1.0));
    }

    #[test]
    fn resize_clamps_to_floor() {
        let (mut board, ids) = board_with(&[(0.0, 0.0)]);
        board.resize_note(ids[0], -20.0, 10.0);
        assert_eq!(board.note(ids[0]).unwrap().size, Size::new(100.0, 60.0));
        board.resize_note(ids[0], 320.0, 61.0);
        assert_eq!(board.note(ids[0]).unwrap().size, Size::new(320.0, 61.0));
    }

    #[test]
    fn image_removal_out_of_range_is_noop() {
        let (mut board, ids) = board_with(&[(0.0, 0.0)]);
        board.add_image(ids[0], "a");
        board.add_image(ids[0], "b");
        board.add_image(ids[0], "c");
        assert!(!board.remove_image(ids[0], 3));
        assert!(board.remove_image(ids[0], 1));
        let images: Vec<&str> = board.note(ids[0]).unwrap().images.iter().map(String::as_str).collect();
        assert_eq!(images, vec!["a", "c"]);
        assert!(board.clear_images(ids[0]));
        assert!(!board.clear_images(ids[0]));
    }

    #[test]
    fn duplicate_connection_rejected_either_direction() {
        let (mut board, ids) = board_with(&[(0.0, 0.0), (500.0, 0.0)]);
        let (a, b) = (ids[0], ids[1]);
        assert!(board.create_connection(a, b).is_some());
        assert!(board.create_connection(b, a).is_none());
        assert!(board.create_connection(a, b).is_none());
        assert!(board.create_connection(a, a).is_none());
        assert_eq!(board.connection_count(), 1);
    }

    #[test]
    fn connection_to_missing_note_rejected() {
        let (mut board, ids) = board_with(&[(0.0, 0.0)]);
        assert!(board.create_connection(ids[0], NoteId::intern("nowhere")).is_none());
        assert_eq!(board.connection_count(), 0);
    }

    #[test]
    fn delete_note_cascades() {
        let (mut board, ids) = board_with(&[(0.0, 0.0), (200.0, 0.0), (400.0, 0.0)]);
        board.create_connection(ids[0], ids[1]).unwrap();
        board.create_connection(ids[2], ids[0]).unwrap();
        let keep = board.create_connection(ids[1], ids[2]).unwrap();

        let removed = board.delete_note(ids[0]).unwrap();
        assert_eq!(removed.id, ids[0]);
        assert!(!board.contains_note(ids[0]));
        let remaining: Vec<ConnectionId> = board.connections().map(|c| c.id).collect();
        assert_eq!(remaining, vec![keep]);
        assert!(board.delete_note(ids[0]).is_none());
    }

    #[test]
    fn order_survives_index_reuse() {
        let (mut board, ids) = board_with(&[(0.0, 0.0), (10.0, 0.0), (20.0, 0.0)]);
        board.delete_note(ids[0]);
        let fresh = board.create_note(Point::new(30.0, 0.0), 0.0).id;
        let order: Vec<NoteId> = board.notes().map(|n| n.id).collect();
        assert_eq!(order, vec![ids[1], ids[2], fresh]);
    }

    #[test]
    fn attach_image_grows_then_keeps_growing() {
        let (mut board, ids) = board_with(&[(0.0, 0.0)]);
        let upload = ImageUpload::new("image/png", "data:image/png;base64,AAAA", 260.0, 130.0);

        assert!(board.attach_image(ids[0], &upload));
        let first = board.note(ids[0]).unwrap().size;
        assert!(first.height >= 130.0 / 2.0 + 126.0);
        assert!(first.width >= 200.0);

        assert!(board.attach_image(ids[0], &upload));
        let second = board.note(ids[0]).unwrap().size;
        assert!(second.height > first.height);
        assert_eq!(board.note(ids[0]).unwrap().images.len(), 2);
    }

    #[test]
    fn attach_non_image_is_silent_noop() {
        let (mut board, ids) = board_with(&[(0.0, 0.0)]);
        let before = board.note(ids[0]).unwrap().clone();
        let text = ImageUpload::new("application/pdf", "data:application/pdf;base64,AA", 10.0, 10.0);
        assert!(!board.attach_image(ids[0], &text));
        assert_eq!(board.note(ids[0]).unwrap(), &before);
    }

    #[test]
    fn segments_follow_anchors() {
        let (mut board, ids) = board_with(&[(75.0, 30.0), (575.0, 30.0)]);
        board.create_connection(ids[0], ids[1]).unwrap();
        let segments: Vec<_> = board.connection_segments().collect();
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].1, Point::new(125.0, 15.0));
        assert_eq!(segments[0].2, Point::new(625.0, 15.0));
    }
}
