pub mod capture;
pub mod controller;
pub mod gesture;
pub mod input;
pub mod mutation;

pub use capture::{CaptureGuard, PointerCapture};
pub use controller::{BoardController, RandomSource};
pub use gesture::{Gesture, GestureController, Overlay};
pub use input::{InputEvent, PointerTarget};
pub use mutation::BoardMutation;
