//! Window management subsystem
//!
//! ```text
//! Renderer
//!     │ owns
//! RenderWindow        ← clear colour, visibility (handle.rs)
//!     │ wraps
//! dyn NativeWindow    ← provided by a WindowProvider (backend.rs)
//! ```
//!
//! The renderer never creates platform windows itself. Tests and the demo
//! use the headless provider from [`crate::render::backends::headless`].

pub mod backend;
pub mod handle;

pub use backend::{NativeWindow, RenderEvent, VideoMode, WindowProvider};
pub use handle::RenderWindow;
