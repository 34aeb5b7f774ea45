//! Mesh resource
//!
//! Owns one backend mesh handle. The wrapper is move-only; the backend handle
//! is released when the mesh is consumed by [`Mesh::release`].

use crate::render::api::{BackendMesh, BackendResult, GraphicsBackend, MeshData};

/// Uploaded vertex and index buffers
#[derive(Debug)]
pub struct Mesh {
    handle: BackendMesh,
    index_count: u32,
    vertex_count: u32,
}

impl Mesh {
    /// Validate `data` and upload it
    pub fn upload(backend: &mut dyn GraphicsBackend, data: &MeshData) -> BackendResult<Self> {
        data.validate()?;
        let handle = backend.upload_mesh(data)?;
        Ok(Self {
            handle,
            index_count: count(data.indices.len()),
            vertex_count: count(data.vertices.len()),
        })
    }

    /// Replace the geometry in place; the handle stays the same
    pub fn update(&mut self, backend: &mut dyn GraphicsBackend, data: &MeshData) -> BackendResult<()> {
        data.validate()?;
        backend.update_mesh(self.handle, data)?;
        self.index_count = count(data.indices.len());
        self.vertex_count = count(data.vertices.len());
        Ok(())
    }

    /// Backend handle
    pub fn handle(&self) -> BackendMesh {
        self.handle
    }

    /// Number of indices drawn per call
    pub fn index_count(&self) -> u32 {
        self.index_count
    }

    /// Number of uploaded vertices
    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    /// Give the buffers back to the backend
    pub fn release(self, backend: &mut dyn GraphicsBackend) {
        backend.destroy_mesh(self.handle);
    }
}

fn count(len: usize) -> u32 {
    u32::try_from(len).unwrap_or(u32::MAX)
}
