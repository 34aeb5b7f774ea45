//! Core primitive types for rendering
//!
//! Cameras and the interpolated transform state shared by cameras and render
//! objects.

pub mod camera;
pub mod transform;

pub use camera::{Camera, OrthographicBounds};
pub use transform::TransformState;
