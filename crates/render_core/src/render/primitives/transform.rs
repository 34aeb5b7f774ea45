//! Two-sample transform state
//!
//! Cameras and render objects keep the transform of the current logical tick
//! ("now") and a trailing sample ("prev"). Interpolation happens on two
//! levels:
//!
//! ```text
//! logical tick  ── update_state(f) ──►  prev ← blend(prev, now, f)
//! rendered frame ── matrix(t) ───────►  draw with blend(prev, now, t)
//! ```
//!
//! The tick factor and the frame factor are computed independently; the
//! renderer never assumes they agree.

use crate::foundation::math::{lerp_vec2, slerp_rotation, transform_2d, Mat3, Rotation2, Vec2};

/// Position and rotation sampled at the current and previous logical tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformState {
    position_now: Vec2,
    position_prev: Vec2,
    angle_now: Rotation2,
    angle_prev: Rotation2,
}

impl Default for TransformState {
    fn default() -> Self {
        Self {
            position_now: Vec2::zeros(),
            position_prev: Vec2::zeros(),
            angle_now: Rotation2::identity(),
            angle_prev: Rotation2::identity(),
        }
    }
}

impl TransformState {
    /// Identity transform with both samples equal
    pub fn new() -> Self {
        Self::default()
    }

    /// Move the current sample
    ///
    /// With `interpolate` false the previous sample snaps to the new position,
    /// so the change shows up as a teleport instead of a slide.
    pub fn set_position(&mut self, x: f32, y: f32, interpolate: bool) {
        self.position_now = Vec2::new(x, y);
        if !interpolate {
            self.position_prev = self.position_now;
        }
    }

    /// Rotate the current sample to `angle` radians
    pub fn set_rotation(&mut self, angle: f32, interpolate: bool) {
        self.angle_now = Rotation2::new(angle);
        if !interpolate {
            self.angle_prev = self.angle_now;
        }
    }

    /// Pull the previous sample toward the current one by `factor`
    ///
    /// Position blends linearly, rotation along the shorter arc.
    pub fn update_state(&mut self, factor: f32) {
        let factor = factor.clamp(0.0, 1.0);
        self.position_prev = lerp_vec2(&self.position_prev, &self.position_now, factor);
        self.angle_prev = slerp_rotation(&self.angle_prev, &self.angle_now, factor);
    }

    /// Position blended from prev (0) to now (1)
    pub fn position(&self, interp: f32) -> Vec2 {
        lerp_vec2(&self.position_prev, &self.position_now, interp.clamp(0.0, 1.0))
    }

    /// Rotation blended from prev (0) to now (1)
    pub fn rotation(&self, interp: f32) -> Rotation2 {
        slerp_rotation(&self.angle_prev, &self.angle_now, interp.clamp(0.0, 1.0))
    }

    /// Model matrix at interpolation factor `interp`
    pub fn matrix(&self, interp: f32) -> Mat3 {
        transform_2d(&self.position(interp), &self.rotation(interp))
    }

    /// Current sample position
    pub fn position_now(&self) -> Vec2 {
        self.position_now
    }

    /// Previous sample position
    pub fn position_prev(&self) -> Vec2 {
        self.position_prev
    }

    /// Current sample rotation
    pub fn angle_now(&self) -> Rotation2 {
        self.angle_now
    }

    /// Previous sample rotation
    pub fn angle_prev(&self) -> Rotation2 {
        self.angle_prev
    }
}
