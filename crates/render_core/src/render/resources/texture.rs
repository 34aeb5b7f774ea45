//! Texture resource

use crate::render::api::{BackendResult, BackendTexture, GraphicsBackend, Image};

/// An uploaded RGBA texture
#[derive(Debug)]
pub struct Texture {
    handle: BackendTexture,
    width: u32,
    height: u32,
}

impl Texture {
    /// Upload a decoded image
    pub fn upload(backend: &mut dyn GraphicsBackend, image: &Image) -> BackendResult<Self> {
        let handle = backend.upload_texture(image)?;
        Ok(Self {
            handle,
            width: image.width(),
            height: image.height(),
        })
    }

    /// Backend handle
    pub fn handle(&self) -> BackendTexture {
        self.handle
    }

    /// Size in pixels
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Give the texture memory back to the backend
    pub fn release(self, backend: &mut dyn GraphicsBackend) {
        backend.destroy_texture(self.handle);
    }
}
