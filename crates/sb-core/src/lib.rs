pub mod board;
pub mod config;
pub mod document;
pub mod fit;
pub mod geometry;
pub mod hit;
pub mod id;
pub mod model;
pub mod proximity;

pub use board::Board;
pub use config::{BoardConfig, ConfigError, ImageFitConfig};
pub use document::{BoardDocument, ImportError, export_document, import_board};
pub use geometry::{Point, Size};
pub use hit::{NoteRegion, connection_at, hit_test};
pub use id::{ConnectionId, NoteId};
pub use model::{Connection, ImageUpload, Note};
pub use proximity::{connection_target, nearest_within};
