//! Render objects
//!
//! A drawable instance inside a scene. Position and rotation go through
//! [`TransformState`] so that motion can be interpolated between ticks.

use crate::foundation::math::Mat3;
use crate::render::primitives::TransformState;
use crate::render::RenderPropertyId;

/// One drawable instance in a scene
#[derive(Debug, Clone, PartialEq)]
pub struct RenderObject {
    /// Property supplying mesh and texture
    pub property: RenderPropertyId,

    /// Interpolated placement
    pub transform: TransformState,

    /// Depth bias handed to the shader; higher layers draw on top
    pub layer: f32,

    /// Hidden objects are filtered out before drawing
    pub visible: bool,
}

impl RenderObject {
    /// Visible object at the origin on layer 0
    pub fn new(property: RenderPropertyId) -> Self {
        Self {
            property,
            transform: TransformState::new(),
            layer: 0.0,
            visible: true,
        }
    }

    /// Model matrix at interpolation factor `interp`
    pub fn model_matrix(&self, interp: f32) -> Mat3 {
        self.transform.matrix(interp)
    }
}
