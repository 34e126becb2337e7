//! WASM bridge for Sticky Board — exposes the board controller to the
//! browser host.
//!
//! Compiled via `wasm-pack build --target web`. The host forwards pointer
//! events in viewport coordinates, renders from `view_json`, and performs
//! file and image I/O itself, handing results back through `import_json`
//! and `attach_image`.

mod view;

use sb_core::config::BoardConfig;
use sb_core::id::{ConnectionId, NoteId};
use sb_core::model::ImageUpload;
use sb_editor::capture::PointerCapture;
use sb_editor::controller::BoardController;
use sb_editor::input::InputEvent;
use std::cell::Cell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;

/// Element pointer capture for the board surface.
///
/// The pointer id is updated on every pointer-down so the capture taken at
/// gesture start follows the pointer that started it.
struct ElementCapture {
    element: web_sys::Element,
    pointer_id: Cell<i32>,
}

impl PointerCapture for ElementCapture {
    fn acquire(&self) {
        if let Err(err) = self.element.set_pointer_capture(self.pointer_id.get()) {
            log::warn!("pointer capture failed: {err:?}");
        }
    }

    fn release(&self) {
        let pointer_id = self.pointer_id.get();
        if !self.element.has_pointer_capture(pointer_id) {
            return;
        }
        if let Err(err) = self.element.release_pointer_capture(pointer_id) {
            log::debug!("pointer capture release failed: {err:?}");
        }
    }
}

/// The main WASM-facing board controller.
///
/// All interaction from the host goes through this struct. Event handlers
/// return `true` when the view needs to be redrawn.
#[wasm_bindgen]
pub struct BoardCanvas {
    controller: BoardController,
    capture: Option<Rc<ElementCapture>>,
}

impl Default for BoardCanvas {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl BoardCanvas {
    /// Create a board with the stock configuration.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self::from_config(BoardConfig::default())
    }

    /// Create a board from a JSON configuration object. Missing fields take
    /// their defaults.
    pub fn with_config(json: &str) -> Result<BoardCanvas, JsValue> {
        let config = BoardConfig::from_json(json).map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(Self::from_config(config))
    }

    /// Route pointer capture to the board element.
    pub fn attach(&mut self, element: web_sys::Element) {
        let capture = Rc::new(ElementCapture {
            element,
            pointer_id: Cell::new(0),
        });
        self.controller.set_capture(capture.clone());
        self.capture = Some(capture);
    }

    /// Set the board's top-left corner in viewport coordinates. Call when
    /// the board element scrolls or moves.
    pub fn set_origin(&mut self, x: f64, y: f64) {
        self.controller.set_origin(x, y);
    }

    // ─── Pointer events ──────────────────────────────────────────────────

    pub fn handle_pointer_down(&mut self, x: f64, y: f64, pointer_id: i32) -> bool {
        if let Some(capture) = &self.capture {
            capture.pointer_id.set(pointer_id);
        }
        let target = self.controller.target_at(x, y);
        self.controller
            .handle(&InputEvent::from_pointer_down(x, y, target))
    }

    pub fn handle_pointer_move(&mut self, x: f64, y: f64) -> bool {
        self.controller.handle(&InputEvent::from_pointer_move(x, y))
    }

    pub fn handle_pointer_up(&mut self, x: f64, y: f64) -> bool {
        self.controller.handle(&InputEvent::from_pointer_up(x, y))
    }

    /// The pointer was lost (`pointercancel`, `lostpointercapture`, blur).
    pub fn handle_pointer_cancel(&mut self) -> bool {
        self.controller.handle(&InputEvent::PointerCancel)
    }

    pub fn handle_click(&mut self, x: f64, y: f64) -> bool {
        let target = self.controller.target_at(x, y);
        self.controller.handle(&InputEvent::from_click(x, y, target))
    }

    /// CSS cursor for the point under the pointer.
    pub fn cursor_at(&self, x: f64, y: f64) -> String {
        use sb_core::hit::NoteRegion;
        use sb_editor::input::PointerTarget;

        let cursor = match self.controller.target_at(x, y) {
            PointerTarget::Note(_, NoteRegion::Resize) => "nwse-resize",
            PointerTarget::Note(_, NoteRegion::Connector) => "crosshair",
            PointerTarget::Note(_, NoteRegion::Header) => "move",
            PointerTarget::Note(_, NoteRegion::Body) => "text",
            PointerTarget::Connection(_) => "pointer",
            PointerTarget::Board => "default",
        };
        cursor.to_string()
    }

    // ─── Note commands ───────────────────────────────────────────────────

    pub fn set_text(&mut self, note_id: &str, text: &str) -> bool {
        self.controller.set_text(NoteId::intern(note_id), text)
    }

    /// Completion of an image upload the host read as a data URL.
    pub fn attach_image(
        &mut self,
        note_id: &str,
        mime: &str,
        data: &str,
        width: f64,
        height: f64,
    ) -> bool {
        let upload = ImageUpload::new(mime, data, width, height);
        self.controller.attach_image(NoteId::intern(note_id), upload)
    }

    pub fn remove_image(&mut self, note_id: &str, index: usize) -> bool {
        self.controller.remove_image(NoteId::intern(note_id), index)
    }

    pub fn clear_images(&mut self, note_id: &str) -> bool {
        self.controller.clear_images(NoteId::intern(note_id))
    }

    pub fn delete_note(&mut self, note_id: &str) -> bool {
        self.controller.delete_note(NoteId::intern(note_id))
    }

    pub fn delete_connection(&mut self, connection_id: &str) -> bool {
        self.controller
            .delete_connection(ConnectionId::intern(connection_id))
    }

    pub fn toggle_menu(&mut self, note_id: &str) {
        self.controller.toggle_menu(NoteId::intern(note_id));
    }

    // ─── Rendering ───────────────────────────────────────────────────────

    /// Notes, connection segments, and the gesture overlay as JSON.
    pub fn view_json(&self) -> String {
        let overlay = self.controller.overlay();
        let view = view::build_view(self.controller.board(), &overlay);
        serde_json::to_string(&view).unwrap_or_else(|_| "{}".to_string())
    }

    // ─── Export / Import ─────────────────────────────────────────────────

    pub fn export_json(&self) -> String {
        match self.controller.export_json() {
            Ok(json) => json,
            Err(e) => {
                log::error!("export failed: {e}");
                String::new()
            }
        }
    }

    pub fn export_file_name(&self) -> String {
        self.controller.export_file_name()
    }

    /// Replace the board with an imported document. Returns JSON:
    /// `{"ok":true}` or `{"ok":false,"error":"<message for the user>"}`.
    pub fn import_json(&mut self, json: &str) -> String {
        let result = match self.controller.import_json(json) {
            Ok(()) => serde_json::json!({ "ok": true }),
            Err(e) => serde_json::json!({ "ok": false, "error": e.user_message() }),
        };
        result.to_string()
    }
}

impl BoardCanvas {
    fn from_config(config: BoardConfig) -> Self {
        console_error_panic_hook_setup();
        console_logger_setup();

        Self {
            controller: BoardController::new(config),
            capture: None,
        }
    }
}

/// Set the log level forwarded to the browser console
/// (`error`, `warn`, `info`, `debug`, `trace`, or `off`).
#[wasm_bindgen]
pub fn set_log_level(level: &str) {
    match level.parse::<log::LevelFilter>() {
        Ok(filter) => log::set_max_level(filter),
        Err(_) => log::warn!("unknown log level {level:?}"),
    }
}

fn console_error_panic_hook_setup() {
    #[cfg(target_arch = "wasm32")]
    {
        use std::sync::Once;
        static SET_HOOK: Once = Once::new();
        SET_HOOK.call_once(|| {
            std::panic::set_hook(Box::new(|info| {
                let msg = format!("Sticky Board WASM panic: {info}");
                web_sys::console::error_1(&msg.into());
            }));
        });
    }
}

fn console_logger_setup() {
    #[cfg(target_arch = "wasm32")]
    {
        static LOGGER: console::ConsoleLogger = console::ConsoleLogger;
        if log::set_logger(&LOGGER).is_ok() {
            log::set_max_level(log::LevelFilter::Info);
        }
    }
}

#[cfg(target_arch = "wasm32")]
mod console {
    use log::{Level, Metadata, Record};
    use wasm_bindgen::JsValue;

    /// Forwards `log` records to the browser console.
    pub struct ConsoleLogger;

    impl log::Log for ConsoleLogger {
        fn enabled(&self, metadata: &Metadata) -> bool {
            metadata.level() <= log::max_level()
        }

        fn log(&self, record: &Record) {
            if !self.enabled(record.metadata()) {
                return;
            }
            let msg: JsValue = format!("[{}] {}", record.target(), record.args()).into();
            match record.level() {
                Level::Error => web_sys::console::error_1(&msg),
                Level::Warn => web_sys::console::warn_1(&msg),
                Level::Info => web_sys::console::info_1(&msg),
                Level::Debug | Level::Trace => web_sys::console::debug_1(&msg),
            }
        }

        fn flush(&self) {}
    }
}
