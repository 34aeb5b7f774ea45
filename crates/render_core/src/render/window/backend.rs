//! Window provider contract
//!
//! Native window and surface creation lives outside the renderer. A
//! [`WindowProvider`] hands out [`NativeWindow`]s; the renderer only shows,
//! hides, binds and presents them, and drains their input events.

/// Requested window size in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VideoMode {
    /// Client area width
    pub width: u32,
    /// Client area height
    pub height: u32,
}

impl VideoMode {
    /// Create a video mode
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Input and surface events reported by a window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderEvent {
    /// The drawable area changed size
    Resize {
        /// New width in pixels
        width: u32,
        /// New height in pixels
        height: u32,
    },
    /// A key changed state
    Keyboard {
        /// Platform key code
        key_code: u32,
        /// Pressed or released
        pressed: bool,
        /// Generated by key repeat
        repeat: bool,
    },
    /// A mouse button changed state
    Mouse {
        /// Button index
        button: u16,
        /// Pressed or released
        pressed: bool,
    },
    /// The cursor moved inside the window
    MouseMove {
        /// Cursor x in pixels
        x: u32,
        /// Cursor y in pixels
        y: u32,
    },
}

/// A native window with a presentable surface
///
/// Dropping the value closes the window.
pub trait NativeWindow {
    /// Make the window visible
    fn show(&mut self);

    /// Hide the window
    fn hide(&mut self);

    /// Make this window's surface current for drawing
    fn bind(&mut self);

    /// Present the finished frame
    fn swap(&mut self);

    /// Current drawable size in pixels
    fn size(&self) -> (u32, u32);

    /// Take every event received since the last call
    fn poll_events(&mut self) -> Vec<RenderEvent>;
}

/// Factory for native windows
pub trait WindowProvider {
    /// Create a window, or `None` if the platform refused
    fn create_window(&mut self, mode: VideoMode, title: &str) -> Option<Box<dyn NativeWindow>>;
}
