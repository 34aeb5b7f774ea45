//! Public rendering API
//!
//! The seams between the renderer and the outside world: the graphics backend
//! capability and the data handed across it.

pub mod render_backend;

pub use render_backend::{
    BackendMesh, BackendProgram, BackendRenderTexture, BackendResult, BackendTexture, CompiledProgram,
    DrawCall, GraphicsBackend, Image, ImagePixel, MeshData, TargetBinding, UniformLocations, Vertex2d,
};
pub use crate::render::window::{NativeWindow, RenderEvent, VideoMode, WindowProvider};
