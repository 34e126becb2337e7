//! The board controller: application root that owns the board.
//!
//! Gestures, host commands, finished image uploads and imports all change
//! the board through this struct, and every board write goes through
//! `apply`. Nothing else owns the board.

use crate::capture::PointerCapture;
use crate::gesture::{Gesture, GestureController, Overlay};
use crate::input::{InputEvent, PointerTarget};
use crate::mutation::BoardMutation;
use chrono::Utc;
use sb_core::board::Board;
use sb_core::config::BoardConfig;
use sb_core::document::{self, BoardDocument, ImportError, JsonError};
use sb_core::geometry::Point;
use sb_core::hit::{connection_at, hit_test};
use sb_core::id::{ConnectionId, NoteId};
use sb_core::model::ImageUpload;
use std::rc::Rc;

/// Source of uniform rolls in `[0, 1)` used to pick note colours.
pub type RandomSource = Box<dyn FnMut() -> f64>;

fn default_random() -> RandomSource {
    #[cfg(not(target_arch = "wasm32"))]
    {
        Box::new(rand::random::<f64>)
    }
    #[cfg(target_arch = "wasm32")]
    {
        Box::new(js_sys::Math::random)
    }
}

pub struct BoardController {
    board: Board,
    gestures: GestureController,
    random: RandomSource,
}

impl Default for BoardController {
    fn default() -> Self {
        Self::new(BoardConfig::default())
    }
}

impl BoardController {
    /// Create a controller with an empty board.
    pub fn new(config: BoardConfig) -> Self {
        Self::with_random(config, default_random())
    }

    pub fn with_random(config: BoardConfig, random: RandomSource) -> Self {
        Self {
            board: Board::new(config),
            gestures: GestureController::new(),
            random,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn gesture(&self) -> &Gesture {
        self.gestures.state()
    }

    pub fn overlay(&self) -> Overlay {
        self.gestures.overlay()
    }

    /// Set the board's top-left corner in viewport coordinates.
    pub fn set_origin(&mut self, x: f64, y: f64) {
        self.gestures.set_origin(Point::new(x, y));
    }

    pub fn set_capture(&mut self, capture: Rc<dyn PointerCapture>) {
        self.gestures.set_capture(capture);
    }

    /// Convert a viewport point into board-local coordinates.
    pub fn board_point(&self, x: f64, y: f64) -> Point {
        self.gestures.board_point(x, y)
    }

    /// Resolve what lies under a viewport point: the topmost note region,
    /// else a connection line, else the empty board.
    pub fn target_at(&self, x: f64, y: f64) -> PointerTarget {
        let p = self.board_point(x, y);
        if let Some((id, region)) = hit_test(&self.board, p) {
            return PointerTarget::Note(id, region);
        }
        match connection_at(&self.board, p, self.board.config().connection_tolerance) {
            Some(id) => PointerTarget::Connection(id),
            None => PointerTarget::Board,
        }
    }

    // ─── Input ───────────────────────────────────────────────────────────

    /// Route an input event through the gesture controller and apply the
    /// resulting mutations. Returns `true` if anything visible changed.
    pub fn handle(&mut self, event: &InputEvent) -> bool {
        let before = self.gestures.overlay();
        let mutations = self.gestures.handle(event, &self.board);
        let changed = self.apply_all(mutations);
        changed || self.gestures.overlay() != before
    }

    // ─── Mutations ───────────────────────────────────────────────────────

    /// Apply a list of mutations. Returns `true` if any took effect.
    pub fn apply_all(&mut self, mutations: Vec<BoardMutation>) -> bool {
        mutations
            .into_iter()
            .fold(false, |changed, m| self.apply(m) || changed)
    }

    /// Apply one mutation to the board. Mutations on missing notes or
    /// connections are no-ops and return `false`.
    pub fn apply(&mut self, mutation: BoardMutation) -> bool {
        let label = mutation.describe();
        let changed = match mutation {
            BoardMutation::CreateNote { at } => {
                let roll = (self.random)();
                self.board.create_note(at, roll);
                true
            }
            BoardMutation::MoveNote { id, dx, dy } => self.board.move_note(id, dx, dy),
            BoardMutation::ResizeNote { id, width, height } => {
                self.board.resize_note(id, width, height)
            }
            BoardMutation::SetText { id, text } => self.board.set_text(id, text),
            BoardMutation::AttachImage { id, upload } => {
                let attached = self.board.attach_image(id, &upload);
                if attached {
                    self.gestures.close_menu();
                }
                attached
            }
            BoardMutation::RemoveImage { id, index } => self.board.remove_image(id, index),
            BoardMutation::ClearImages { id } => {
                let cleared = self.board.clear_images(id);
                self.gestures.close_menu();
                cleared
            }
            BoardMutation::DeleteNote { id } => {
                let removed = self.board.delete_note(id).is_some();
                self.gestures.forget_note(id);
                removed
            }
            BoardMutation::Connect { from, to } => {
                match self.board.create_connection(from, to) {
                    Some(id) => {
                        log::info!("connected {from} → {to} ({id})");
                        true
                    }
                    None => false,
                }
            }
            BoardMutation::DeleteConnection { id } => {
                self.gestures.forget_connection(id);
                self.board.delete_connection(id).is_some()
            }
        };
        if !changed {
            log::debug!("{label}: no effect");
        }
        changed
    }

    // ─── Commands ────────────────────────────────────────────────────────

    /// Create a note centred on a viewport point, bypassing click gating.
    pub fn create_note_at(&mut self, x: f64, y: f64) -> Option<NoteId> {
        let at = self.board_point(x, y);
        if !self.apply(BoardMutation::CreateNote { at }) {
            return None;
        }
        self.board.notes().next_back().map(|note| note.id)
    }

    pub fn set_text(&mut self, id: NoteId, text: impl Into<String>) -> bool {
        self.apply(BoardMutation::SetText {
            id,
            text: text.into(),
        })
    }

    /// Completion callback of the image-ingestion collaborator. Applied to
    /// the note as it is now; the note may have moved, grown, or been deleted
    /// since the upload started.
    pub fn attach_image(&mut self, id: NoteId, upload: ImageUpload) -> bool {
        self.apply(BoardMutation::AttachImage { id, upload })
    }

    pub fn remove_image(&mut self, id: NoteId, index: usize) -> bool {
        self.apply(BoardMutation::RemoveImage { id, index })
    }

    pub fn clear_images(&mut self, id: NoteId) -> bool {
        self.apply(BoardMutation::ClearImages { id })
    }

    pub fn delete_note(&mut self, id: NoteId) -> bool {
        self.apply(BoardMutation::DeleteNote { id })
    }

    pub fn connect(&mut self, from: NoteId, to: NoteId) -> bool {
        self.apply(BoardMutation::Connect { from, to })
    }

    pub fn delete_connection(&mut self, id: ConnectionId) -> bool {
        self.apply(BoardMutation::DeleteConnection { id })
    }

    /// Open/close a note's context menu. Unknown notes are ignored.
    pub fn toggle_menu(&mut self, id: NoteId) {
        if self.board.contains_note(id) {
            self.gestures.toggle_menu(id);
        }
    }

    // ─── Export / Import ─────────────────────────────────────────────────

    /// Snapshot the board, stamped with the current time.
    pub fn export(&self) -> BoardDocument {
        document::export_document(&self.board, Utc::now())
    }

    /// Export as pretty JSON.
    ///
    /// # Errors
    /// Only if JSON serialization fails.
    pub fn export_json(&self) -> Result<String, JsonError> {
        let json = document::to_json(&self.export())?;
        log::info!(
            "exported {} note(s), {} connection(s)",
            self.board.note_count(),
            self.board.connection_count()
        );
        Ok(json)
    }

    /// Suggested file name for an export made now.
    pub fn export_file_name(&self) -> String {
        document::export_file_name(Utc::now())
    }

    /// Replace the whole board with an imported document. On failure the
    /// current board and gesture state are left exactly as they were.
    ///
    /// # Errors
    /// `ImportError` when the document fails validation.
    pub fn import_json(&mut self, json: &str) -> Result<(), ImportError> {
        match document::import_board(json, self.board.config().clone()) {
            Ok(board) => {
                self.board = board;
                self.gestures.reset();
                Ok(())
            }
            Err(err) => {
                log::warn!("import rejected: {err}");
                Err(err)
            }
        }
    }
}
