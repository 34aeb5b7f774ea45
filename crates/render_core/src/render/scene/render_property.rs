//! Render properties
//!
//! A property pairs a mesh with a texture. Objects reference properties by
//! id, so swapping the mesh or texture of a property retargets every object
//! that uses it on the next draw.

use crate::render::{MeshId, TextureId};

/// A (mesh, texture) pairing referenced by render objects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderProperty {
    mesh: MeshId,
    texture: TextureId,
}

impl RenderProperty {
    /// Pair a mesh with a texture
    ///
    /// The ids are not checked here; a property naming a destroyed resource
    /// is skipped when drawn.
    pub const fn new(mesh: MeshId, texture: TextureId) -> Self {
        Self { mesh, texture }
    }

    /// Mesh drawn by objects using this property
    pub const fn mesh(&self) -> MeshId {
        self.mesh
    }

    /// Texture sampled by objects using this property
    pub const fn texture(&self) -> TextureId {
        self.texture
    }

    /// Swap the mesh
    pub fn set_mesh(&mut self, mesh: MeshId) {
        self.mesh = mesh;
    }

    /// Swap the texture
    pub fn set_texture(&mut self, texture: TextureId) {
        self.texture = texture;
    }
}
