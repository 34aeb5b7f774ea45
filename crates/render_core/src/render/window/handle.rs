//! Window render target
//!
//! Wraps a [`NativeWindow`] with the state the renderer keeps per window:
//! its clear colour and whether it is currently shown.

use crate::render::api::{GraphicsBackend, TargetBinding};
use crate::render::window::{NativeWindow, RenderEvent};

/// An on-screen render target
pub struct RenderWindow {
    window: Box<dyn NativeWindow>,
    title: String,
    clear_colour: [f32; 4],
    visible: bool,
}

impl RenderWindow {
    /// Wrap a freshly created native window; windows start hidden
    pub fn new(window: Box<dyn NativeWindow>, title: impl Into<String>, clear_colour: [f32; 4]) -> Self {
        Self {
            window,
            title: title.into(),
            clear_colour,
            visible: false,
        }
    }

    /// Title the window was created with
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Current drawable size in pixels
    pub fn size(&self) -> (u32, u32) {
        self.window.size()
    }

    /// Whether the window is shown
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Show the window
    pub fn show(&mut self) {
        if !self.visible {
            self.window.show();
            self.visible = true;
        }
    }

    /// Hide the window
    pub fn hide(&mut self) {
        if self.visible {
            self.window.hide();
            self.visible = false;
        }
    }

    /// Colour the window is cleared to at the start of each frame
    pub fn clear_colour(&self) -> [f32; 4] {
        self.clear_colour
    }

    /// Change the clear colour
    pub fn set_clear_colour(&mut self, colour: [f32; 4]) {
        self.clear_colour = colour;
    }

    /// Drain pending input and resize events
    pub fn poll_events(&mut self) -> Vec<RenderEvent> {
        self.window.poll_events()
    }

    /// Bind the window surface and clear it
    pub fn begin_render(&mut self, backend: &mut dyn GraphicsBackend) {
        self.window.bind();
        backend.bind_target(TargetBinding::Window);
        backend.clear(self.clear_colour);
    }

    /// Present the frame
    pub fn end_render(&mut self, backend: &mut dyn GraphicsBackend) {
        backend.flush();
        self.window.swap();
    }
}

impl std::fmt::Debug for RenderWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderWindow")
            .field("title", &self.title)
            .field("clear_colour", &self.clear_colour)
            .field("visible", &self.visible)
            .finish_non_exhaustive()
    }
}
