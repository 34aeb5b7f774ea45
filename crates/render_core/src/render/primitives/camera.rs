//! # 2D Camera
//!
//! An orthographic camera with interpolated transform state.
//!
//! ## Coordinate System
//! World space is Y-up. The camera's projection maps its orthographic bounds
//! onto normalized device coordinates; the view matrix is the inverse of the
//! camera's own placement, blended between its previous and current logical
//! samples exactly like a render object.

use crate::foundation::math::{orthographic_2d, view_2d, Mat3};
use crate::render::primitives::TransformState;

/// Orthographic bounds of a camera in world units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrthographicBounds {
    /// Left edge
    pub left: f32,
    /// Right edge
    pub right: f32,
    /// Bottom edge
    pub bottom: f32,
    /// Top edge
    pub top: f32,
}

impl Default for OrthographicBounds {
    /// The NDC square, so a fresh camera draws world units one to one
    fn default() -> Self {
        Self {
            left: -1.0,
            right: 1.0,
            bottom: -1.0,
            top: 1.0,
        }
    }
}

/// 2D camera with a projection and a two-sample transform
#[derive(Debug, Clone)]
pub struct Camera {
    bounds: OrthographicBounds,
    projection: Mat3,
    transform: TransformState,
}

impl Camera {
    /// Camera at the origin looking at the NDC square
    pub fn new() -> Self {
        let bounds = OrthographicBounds::default();
        Self {
            bounds,
            projection: orthographic_2d(bounds.left, bounds.right, bounds.bottom, bounds.top),
            transform: TransformState::new(),
        }
    }

    /// Replace the orthographic bounds
    pub fn set_orthographic(&mut self, left: f32, right: f32, bottom: f32, top: f32) {
        self.bounds = OrthographicBounds { left, right, bottom, top };
        self.projection = orthographic_2d(left, right, bottom, top);
    }

    /// Current orthographic bounds
    pub fn bounds(&self) -> OrthographicBounds {
        self.bounds
    }

    /// Projection matrix
    pub fn projection(&self) -> Mat3 {
        self.projection
    }

    /// View matrix blended from the previous (0) to the current (1) sample
    pub fn view(&self, interp: f32) -> Mat3 {
        view_2d(&self.transform.position(interp), &self.transform.rotation(interp))
    }

    /// Projection times view at `interp`
    pub fn view_projection(&self, interp: f32) -> Mat3 {
        self.projection * self.view(interp)
    }

    /// Move the camera
    pub fn set_position(&mut self, x: f32, y: f32, interpolate: bool) {
        self.transform.set_position(x, y, interpolate);
    }

    /// Rotate the camera to `angle` radians
    pub fn set_rotation(&mut self, angle: f32, interpolate: bool) {
        self.transform.set_rotation(angle, interpolate);
    }

    /// Advance the previous sample by one logical tick
    pub fn update_state(&mut self, factor: f32) {
        self.transform.update_state(factor);
    }

    /// Transform samples
    pub fn transform(&self) -> &TransformState {
        &self.transform
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}
