//! Gesture state machine for the board.
//!
//! Arbitrates between the mutually exclusive pointer modes: idle, dragging a
//! note, resizing a note, and dragging out a connection. A gesture can only
//! start from `Idle` and every gesture ends back in `Idle`, on release or
//! cancel. Gestures translate input into `BoardMutation`s; the board itself is
//! only read here.
//!
//! | Pointer-down on   | Gesture     | Move                         | Release                     |
//! |-------------------|-------------|------------------------------|-----------------------------|
//! | note header       | Dragging    | `MoveNote` by relative delta | —                           |
//! | resize grip       | Resizing    | `ResizeNote` from start size | —                           |
//! | connector handle  | Connecting  | track line + hover target    | `Connect` if a target is hit |

use crate::capture::{CaptureGuard, PointerCapture};
use crate::input::{InputEvent, PointerTarget};
use crate::mutation::BoardMutation;
use sb_core::board::Board;
use sb_core::geometry::{Point, Size, to_board};
use sb_core::hit::{NoteRegion, connection_at, hit_test};
use sb_core::id::{ConnectionId, NoteId};
use sb_core::proximity::connection_target;
use std::rc::Rc;

/// The active gesture. Pointer positions are board-local.
#[derive(Debug, Clone, PartialEq)]
pub enum Gesture {
    Idle,
    DraggingNote {
        note: NoteId,
        /// Pointer position minus the note's top-left at grab time. Each move
        /// emits the delta between where this puts the note and where the
        /// note currently is.
        offset: Point,
    },
    ResizingNote {
        note: NoteId,
        start_size: Size,
        start_pointer: Point,
    },
    Connecting {
        source: NoteId,
        /// Fixed end of the pending line (the source's connector anchor).
        line_start: Point,
        /// Free end of the pending line.
        pointer: Point,
        /// Note currently within capture radius, for highlighting.
        hover: Option<NoteId>,
    },
}

/// Transient interaction state the renderer draws on top of the board.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Overlay {
    /// Pending connection line, start → pointer.
    pub pending_line: Option<(Point, Point)>,
    pub hover_target: Option<NoteId>,
    pub hovered_connection: Option<ConnectionId>,
    pub open_menu: Option<NoteId>,
    /// A note is being dragged or resized (raise it above the others).
    pub active_note: Option<NoteId>,
}

pub struct GestureController {
    state: Gesture,

    /// Capture held for the lifetime of the current gesture.
    capture: Option<CaptureGuard>,

    /// Host capture hook, acquired once per gesture.
    capture_target: Option<Rc<dyn PointerCapture>>,

    /// Board top-left in viewport coordinates.
    origin: Point,

    /// Set when a gesture ends on release; swallows the click the host
    /// delivers right after, whatever it lands on.
    gesture_just_finished: bool,

    /// Note whose context menu is open.
    open_menu: Option<NoteId>,

    hovered_connection: Option<ConnectionId>,
}

impl Default for GestureController {
    fn default() -> Self {
        Self::new()
    }
}

impl GestureController {
    pub fn new() -> Self {
        Self {
            state: Gesture::Idle,
            capture: None,
            capture_target: None,
            origin: Point::default(),
            gesture_just_finished: false,
            open_menu: None,
            hovered_connection: None,
        }
    }

    pub fn state(&self) -> &Gesture {
        &self.state
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.state, Gesture::Idle)
    }

    pub fn set_origin(&mut self, origin: Point) {
        self.origin = origin;
    }

    pub fn set_capture(&mut self, capture: Rc<dyn PointerCapture>) {
        self.capture_target = Some(capture);
    }

    /// Convert a viewport point into board-local coordinates.
    pub fn board_point(&self, x: f64, y: f64) -> Point {
        to_board(Point::new(x, y), self.origin)
    }

    pub fn gesture_just_finished(&self) -> bool {
        self.gesture_just_finished
    }

    pub fn open_menu(&self) -> Option<NoteId> {
        self.open_menu
    }

    /// Open or close a note's context menu. Opening one closes any other.
    pub fn toggle_menu(&mut self, note: NoteId) {
        self.open_menu = if self.open_menu == Some(note) {
            None
        } else {
            Some(note)
        };
    }

    pub fn close_menu(&mut self) {
        self.open_menu = None;
    }

    pub fn overlay(&self) -> Overlay {
        let (pending_line, hover_target) = match &self.state {
            Gesture::Connecting {
                line_start,
                pointer,
                hover,
                ..
            } => (Some((*line_start, *pointer)), *hover),
            _ => (None, None),
        };
        let active_note = match &self.state {
            Gesture::DraggingNote { note, .. } | Gesture::ResizingNote { note, .. } => Some(*note),
            _ => None,
        };
        Overlay {
            pending_line,
            hover_target,
            hovered_connection: self.hovered_connection,
            open_menu: self.open_menu,
            active_note,
        }
    }

    /// Handle an input event, returning zero or more mutations.
    pub fn handle(&mut self, event: &InputEvent, board: &Board) -> Vec<BoardMutation> {
        match event {
            InputEvent::PointerDown { x, y, target } => {
                let p = self.board_point(*x, *y);
                self.pointer_down(*target, p, board);
                vec![]
            }
            InputEvent::PointerMove { x, y } => {
                let p = self.board_point(*x, *y);
                self.pointer_move(p, board)
            }
            InputEvent::PointerUp { x, y } => {
                let p = self.board_point(*x, *y);
                self.pointer_up(p, board)
            }
            InputEvent::PointerCancel => {
                if !self.is_idle() {
                    log::debug!("gesture cancelled: {:?}", self.state);
                }
                self.finish();
                vec![]
            }
            InputEvent::Click { x, y, target } => {
                let p = self.board_point(*x, *y);
                self.click(*target, p)
            }
        }
    }

    fn pointer_down(&mut self, target: PointerTarget, p: Point, board: &Board) {
        // Pressing anywhere outside the note with the open menu closes it.
        if self.open_menu.is_some() && target.note() != self.open_menu {
            self.open_menu = None;
        }

        if !self.is_idle() {
            log::debug!("ignoring pointer-down during {:?}", self.state);
            return;
        }

        let PointerTarget::Note(id, region) = target else {
            return;
        };
        let Some(note) = board.note(id) else {
            return;
        };
        let menu_open = self.open_menu == Some(id);

        let next = match region {
            NoteRegion::Header if !menu_open => {
                let (dx, dy) = p.delta_from(note.position);
                Gesture::DraggingNote {
                    note: id,
                    offset: Point::new(dx, dy),
                }
            }
            NoteRegion::Resize => Gesture::ResizingNote {
                note: id,
                start_size: note.size,
                start_pointer: p,
            },
            NoteRegion::Connector if !menu_open => {
                let anchor = note.anchor();
                Gesture::Connecting {
                    source: id,
                    line_start: anchor,
                    pointer: anchor,
                    hover: None,
                }
            }
            _ => return,
        };
        self.begin(next);
    }

    fn pointer_move(&mut self, p: Point, board: &Board) -> Vec<BoardMutation> {
        let min_size = board.config().min_size;
        match &mut self.state {
            Gesture::Idle => {
                // Notes are drawn over connection lines.
                self.hovered_connection = if hit_test(board, p).is_some() {
                    None
                } else {
                    connection_at(board, p, board.config().connection_tolerance)
                };
                vec![]
            }
            Gesture::DraggingNote { note, offset } => {
                let Some(current) = board.note(*note) else {
                    return vec![];
                };
                let target = Point::new(p.x - offset.x, p.y - offset.y);
                let (dx, dy) = target.delta_from(current.position);
                if dx == 0.0 && dy == 0.0 {
                    return vec![];
                }
                log::trace!("drag {note} by ({dx}, {dy})");
                vec![BoardMutation::MoveNote { id: *note, dx, dy }]
            }
            Gesture::ResizingNote {
                note,
                start_size,
                start_pointer,
            } => {
                let (dx, dy) = p.delta_from(*start_pointer);
                let size = Size::new(start_size.width + dx, start_size.height + dy).at_least(min_size);
                log::trace!("resize {note} to {}x{}", size.width, size.height);
                vec![BoardMutation::ResizeNote {
                    id: *note,
                    width: size.width,
                    height: size.height,
                }]
            }
            Gesture::Connecting {
                source,
                pointer,
                hover,
                ..
            } => {
                *pointer = p;
                *hover = connection_target(board, p, *source);
                vec![]
            }
        }
    }

    fn pointer_up(&mut self, p: Point, board: &Board) -> Vec<BoardMutation> {
        let mut mutations = Vec::new();
        if self.is_idle() {
            return mutations;
        }
        if let Gesture::Connecting { source, .. } = self.state {
            match connection_target(board, p, source) {
                Some(target) if board.connection_between(source, target).is_none() => {
                    mutations.push(BoardMutation::Connect {
                        from: source,
                        to: target,
                    });
                }
                Some(target) => log::debug!("{source} and {target} are already connected"),
                None => log::debug!("connect from {source} released on no target"),
            }
        }
        self.gesture_just_finished = true;
        self.finish();
        mutations
    }

    fn click(&mut self, target: PointerTarget, p: Point) -> Vec<BoardMutation> {
        if !self.is_idle() {
            return vec![];
        }
        if self.gesture_just_finished {
            self.gesture_just_finished = false;
            log::debug!("swallowing click at the end of a gesture ({target:?})");
            return vec![];
        }
        match target {
            PointerTarget::Board => vec![BoardMutation::CreateNote { at: p }],
            PointerTarget::Connection(id) => {
                self.hovered_connection = None;
                vec![BoardMutation::DeleteConnection { id }]
            }
            PointerTarget::Note(..) => vec![],
        }
    }

    fn begin(&mut self, gesture: Gesture) {
        log::debug!("gesture start: {gesture:?}");
        self.hovered_connection = None;
        self.state = gesture;
        self.capture = self.capture_target.clone().map(CaptureGuard::acquire);
    }

    /// The single exit path of every gesture. Dropping the guard releases
    /// the pointer capture.
    fn finish(&mut self) {
        self.state = Gesture::Idle;
        self.capture = None;
    }

    /// Abandon any gesture and transient state, e.g. after the board is
    /// replaced by an import.
    pub fn reset(&mut self) {
        self.finish();
        self.gesture_just_finished = false;
        self.open_menu = None;
        self.hovered_connection = None;
    }

    /// Drop references to a note that no longer exists.
    pub fn forget_note(&mut self, id: NoteId) {
        let involved = match &self.state {
            Gesture::DraggingNote { note, .. } | Gesture::ResizingNote { note, .. } => *note == id,
            Gesture::Connecting { source, .. } => *source == id,
            Gesture::Idle => false,
        };
        if involved {
            self.finish();
        } else if let Gesture::Connecting { hover, .. } = &mut self.state
            && *hover == Some(id)
        {
            *hover = None;
        }
        if self.open_menu == Some(id) {
            self.open_menu = None;
        }
    }

    /// Drop a hovered connection that no longer exists.
    pub fn forget_connection(&mut self, id: ConnectionId) {
        if self.hovered_connection == Some(id) {
            self.hovered_connection = None;
        }
    }
}
