//! Viewport rectangles
//!
//! A viewport restricts a stage's draws to a rectangle of its target, in
//! target pixels. Viewports have their own lifecycle and are only combined
//! with a target when a stage runs.

/// Sub-rectangle of a render target in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Viewport {
    /// Left edge
    pub x: i32,
    /// Bottom edge
    pub y: i32,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl Viewport {
    /// Create a viewport covering the given rectangle
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    /// Replace the rectangle in place
    pub fn set_rect(&mut self, x: i32, y: i32, width: u32, height: u32) {
        *self = Self::new(x, y, width, height);
    }

    /// Whether the rectangle covers no pixels
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Width over height, or 1 for an empty rectangle
    #[allow(clippy::cast_precision_loss)]
    pub fn aspect_ratio(&self) -> f32 {
        if self.is_empty() {
            1.0
        } else {
            self.width as f32 / self.height as f32
        }
    }
}
