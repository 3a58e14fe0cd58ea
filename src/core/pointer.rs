use std::sync::Arc;

use winit::window::{CursorGrabMode, Window};

use crate::error::PointerCaptureError;

/// Exclusive pointer mode used for mouse look
pub trait PointerCapture {
    /// Ask the environment to lock the pointer. May be rejected.
    fn request_capture(&mut self) -> Result<(), PointerCaptureError>;

    /// Release the lock if held. Never fails.
    fn release_capture(&mut self);

    fn is_captured(&self) -> bool;
}

/// Pointer device for hosts without one (headless replay, tests)
#[derive(Debug, Default, Clone, Copy)]
pub struct NoPointer;

impl PointerCapture for NoPointer {
    fn request_capture(&mut self) -> Result<(), PointerCaptureError> {
        Err(PointerCaptureError::Unsupported)
    }

    fn release_capture(&mut self) {}

    fn is_captured(&self) -> bool {
        false
    }
}

/// Cursor grab on a winit window
pub struct WindowPointer {
    window: Arc<Window>,
    captured: bool,
}

impl WindowPointer {
    pub fn new(window: Arc<Window>) -> Self {
        Self { window, captured: false }
    }
}

impl PointerCapture for WindowPointer {
    fn request_capture(&mut self) -> Result<(), PointerCaptureError> {
        // Locked is unsupported on some platforms, Confined is the closest fallback
        self.window
            .set_cursor_grab(CursorGrabMode::Locked)
            .or_else(|_| self.window.set_cursor_grab(CursorGrabMode::Confined))
            .map_err(|e| PointerCaptureError::Rejected(e.to_string()))?;
        self.window.set_cursor_visible(false);
        self.captured = true;
        Ok(())
    }

    fn release_capture(&mut self) {
        if let Err(e) = self.window.set_cursor_grab(CursorGrabMode::None) {
            log::debug!("Cursor release reported: {}", e);
        }
        self.window.set_cursor_visible(true);
        self.captured = false;
    }

    fn is_captured(&self) -> bool {
        self.captured
    }
}
