//! Scoped pointer capture.
//!
//! A gesture keeps receiving move/up events after the pointer leaves the
//! element it started on. The host provides a `PointerCapture` (in the
//! browser, element pointer capture); the gesture controller holds a
//! `CaptureGuard` for exactly the lifetime of one gesture, and dropping the
//! guard releases the capture. Every way a gesture can end goes through that
//! drop, so captures cannot leak across gestures.

use std::fmt;
use std::rc::Rc;

/// Host hook that routes pointer events to the board while a gesture runs.
pub trait PointerCapture {
    fn acquire(&self);
    fn release(&self);
}

/// Releases its capture when dropped.
pub struct CaptureGuard {
    target: Rc<dyn PointerCapture>,
}

impl CaptureGuard {
    pub fn acquire(target: Rc<dyn PointerCapture>) -> Self {
        target.acquire();
        Self { target }
    }
}

impl Drop for CaptureGuard {
    fn drop(&mut self) {
        self.target.release();
    }
}

impl fmt::Debug for CaptureGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CaptureGuard")
    }
}


#[cfg(test)]
mod tests {
    use super::testing::CountingCapture;
    use super::*;

    #[test]
    fn guard_releases_once_on_drop() {
        let capture = Rc::new(CountingCapture::default());
        {
            let _guard = CaptureGuard::acquire(capture.clone());
            assert!(capture.held());
        }
        assert_eq!(capture.acquired.get(), 1);
        assert_eq!(capture.released.get(), 1);
    }
}
