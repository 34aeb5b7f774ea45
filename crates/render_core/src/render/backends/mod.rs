//! Backend implementations for the render module
//!
//! Only the headless backend ships with the crate. GPU backends implement
//! [`crate::render::GraphicsBackend`] outside it and are handed to
//! [`crate::Renderer::new`].

/// Recording backend and window provider used by tests and the demo
pub mod headless;
