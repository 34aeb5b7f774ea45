//! GPU resource wrappers
//!
//! Each wrapper owns exactly one backend handle and is never cloned. Handles
//! are returned to the backend by consuming the wrapper, so a resource can
//! only be released once.

pub mod mesh;
pub mod program;
pub mod texture;

pub use mesh::Mesh;
pub use program::{Program, DEFAULT_FRAGMENT_SHADER, DEFAULT_VERTEX_SHADER};
pub use texture::Texture;
