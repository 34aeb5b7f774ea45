//! Backend abstraction traits for the rendering system
//!
//! This module defines the capability a GPU backend must provide to the
//! renderer: program compilation, mesh and texture upload, render-texture
//! creation, target binding and indexed draws. The renderer never issues API
//! calls of its own; it only sequences calls to this trait.

use bytemuck::{Pod, Zeroable};

use crate::foundation::math::Mat3;
use crate::render::{RenderError, Viewport};

/// Result type for backend operations
pub type BackendResult<T> = Result<T, RenderError>;

/// Handle to a mesh stored in the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BackendMesh(pub u64);

/// Handle to a texture stored in the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BackendTexture(pub u64);

/// Handle to a linked shader program stored in the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BackendProgram(pub u64);

/// Handle to an off-screen colour target stored in the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BackendRenderTexture(pub u64);

/// Decoded RGBA8 image handed to [`GraphicsBackend::upload_texture`]
pub type Image = image::RgbaImage;

/// One RGBA8 pixel of an [`Image`]
pub type ImagePixel = image::Rgba<u8>;

/// Vertex layout shared by every 2D mesh
///
/// Matches the default vertex shader: location 0 is the position, location 1
/// the texture coordinate.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, Pod, Zeroable)]
pub struct Vertex2d {
    /// Object-space position
    pub position: [f32; 2],
    /// Texture coordinate
    pub uv: [f32; 2],
}

impl Vertex2d {
    /// Create a vertex from a position and a texture coordinate
    pub const fn new(position: [f32; 2], uv: [f32; 2]) -> Self {
        Self { position, uv }
    }
}

/// Geometry uploaded as one mesh
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    /// Vertex buffer contents
    pub vertices: Vec<Vertex2d>,
    /// Triangle list indices into `vertices`
    pub indices: Vec<u32>,
}

impl MeshData {
    /// Unit quad centred on the origin, two triangles
    pub fn unit_quad() -> Self {
        Self {
            vertices: vec![
                Vertex2d::new([-0.5, -0.5], [0.0, 0.0]),
                Vertex2d::new([0.5, -0.5], [1.0, 0.0]),
                Vertex2d::new([-0.5, 0.5], [0.0, 1.0]),
                Vertex2d::new([0.5, 0.5], [1.0, 1.0]),
            ],
            indices: vec![0, 1, 2, 2, 1, 3],
        }
    }

    /// Raw vertex bytes in upload layout
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Check that every index points at an existing vertex
    pub fn validate(&self) -> BackendResult<()> {
        let vertex_count = self.vertices.len();
        match self.indices.iter().find(|&&index| index as usize >= vertex_count) {
            Some(index) => Err(RenderError::InvalidArgument(format!(
                "mesh index {index} out of range for {vertex_count} vertices"
            ))),
            None => Ok(()),
        }
    }
}

/// Cached uniform locations of a linked program
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UniformLocations {
    /// `mat3 mvp`
    pub mvp: i32,
    /// `sampler2D texture_sampler`
    pub texture_sampler: i32,
    /// `float layer`
    pub layer: i32,
}

/// Result of a successful program link
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompiledProgram {
    /// Backend program object
    pub handle: BackendProgram,
    /// Uniform locations looked up once after linking
    pub uniforms: UniformLocations,
}

/// Colour target a draw pass writes to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetBinding {
    /// Nothing bound
    Unbound,
    /// The default framebuffer of the window whose context is current
    Window,
    /// An off-screen render texture
    RenderTexture(BackendRenderTexture),
}

/// Everything the backend needs to issue one indexed draw
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawCall {
    /// Active program
    pub program: BackendProgram,
    /// Where `mvp`, `layer` and the sampler live in `program`
    pub uniforms: UniformLocations,
    /// Vertex and index buffers
    pub mesh: BackendMesh,
    /// Number of indices to draw
    pub index_count: u32,
    /// Texture bound to unit 0
    pub texture: BackendTexture,
    /// Depth bias written to the `layer` uniform
    pub layer: f32,
    /// Model-view-projection matrix
    pub mvp: Mat3,
}

/// Graphics backend capability consumed by the renderer
///
/// Resource creation is synchronous. Destruction methods take the handle the
/// backend returned at creation; the renderer calls each of them exactly once
/// per handle.
pub trait GraphicsBackend {
    /// Compile and link a program from shader sources
    fn compile_program(&mut self, vertex_src: &str, fragment_src: &str) -> BackendResult<CompiledProgram>;

    /// Release a linked program
    fn destroy_program(&mut self, program: BackendProgram);

    /// Upload a mesh and return its handle
    fn upload_mesh(&mut self, data: &MeshData) -> BackendResult<BackendMesh>;

    /// Replace the contents of an uploaded mesh
    fn update_mesh(&mut self, mesh: BackendMesh, data: &MeshData) -> BackendResult<()>;

    /// Release a mesh
    fn destroy_mesh(&mut self, mesh: BackendMesh);

    /// Upload a texture and return its handle
    fn upload_texture(&mut self, image: &Image) -> BackendResult<BackendTexture>;

    /// Release a texture
    fn destroy_texture(&mut self, texture: BackendTexture);

    /// Create an off-screen colour target
    fn create_render_texture(&mut self, width: u32, height: u32) -> BackendResult<BackendRenderTexture>;

    /// Release an off-screen colour target
    fn destroy_render_texture(&mut self, target: BackendRenderTexture);

    /// Bind the colour target subsequent clears and draws write to
    fn bind_target(&mut self, binding: TargetBinding);

    /// Clear the bound target
    fn clear(&mut self, colour: [f32; 4]);

    /// Restrict drawing to a rectangle of the bound target
    fn set_viewport(&mut self, viewport: &Viewport);

    /// Make a program current and point its sampler at texture unit 0
    fn use_program(&mut self, program: &CompiledProgram);

    /// Bind the call's mesh, texture and uniforms and issue an indexed draw
    fn draw_indexed(&mut self, call: &DrawCall);

    /// Submit queued commands
    fn flush(&mut self);
}
