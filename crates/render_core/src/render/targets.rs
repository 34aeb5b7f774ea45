//! Render target registry
//!
//! Windows and render textures live under one [`RenderTargetId`] namespace.
//! The variant is not encoded in the id; it is recovered from the stored
//! [`RenderTarget`] value, so typed lookups of the wrong variant simply miss.

use crate::foundation::collections::IdPool;
use crate::render::api::{BackendRenderTexture, GraphicsBackend, TargetBinding};
use crate::render::window::RenderWindow;
use crate::render::{RenderTargetId, RenderTextureId, RenderWindowId};

/// An off-screen render target
#[derive(Debug)]
pub struct RenderTexture {
    handle: BackendRenderTexture,
    width: u32,
    height: u32,
    clear_colour: [f32; 4],
}

impl RenderTexture {
    /// Wrap a backend render texture
    pub fn new(handle: BackendRenderTexture, width: u32, height: u32, clear_colour: [f32; 4]) -> Self {
        Self {
            handle,
            width,
            height,
            clear_colour,
        }
    }

    /// Backend handle of the colour target
    pub fn handle(&self) -> BackendRenderTexture {
        self.handle
    }

    /// Size in pixels
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Colour the texture is cleared to at the start of each frame
    pub fn clear_colour(&self) -> [f32; 4] {
        self.clear_colour
    }

    /// Change the clear colour
    pub fn set_clear_colour(&mut self, colour: [f32; 4]) {
        self.clear_colour = colour;
    }

    /// Bind the texture as the colour target and clear it
    pub fn begin_render(&mut self, backend: &mut dyn GraphicsBackend) {
        backend.bind_target(TargetBinding::RenderTexture(self.handle));
        backend.clear(self.clear_colour);
    }

    /// Finish the pass and unbind the texture
    pub fn end_render(&mut self, backend: &mut dyn GraphicsBackend) {
        backend.flush();
        backend.bind_target(TargetBinding::Unbound);
    }

    /// Release the backend colour target
    pub fn release(self, backend: &mut dyn GraphicsBackend) {
        backend.destroy_render_texture(self.handle);
    }
}

/// A destination for a draw pass
#[derive(Debug)]
pub enum RenderTarget {
    /// On-screen window
    Window(RenderWindow),
    /// Off-screen texture
    Texture(RenderTexture),
}

impl RenderTarget {
    /// Bind and clear the target
    pub fn begin_render(&mut self, backend: &mut dyn GraphicsBackend) {
        match self {
            Self::Window(window) => window.begin_render(backend),
            Self::Texture(texture) => texture.begin_render(backend),
        }
    }

    /// Present or resolve the finished pass
    pub fn end_render(&mut self, backend: &mut dyn GraphicsBackend) {
        match self {
            Self::Window(window) => window.end_render(backend),
            Self::Texture(texture) => texture.end_render(backend),
        }
    }

    /// Change the clear colour of either variant
    pub fn set_clear_colour(&mut self, colour: [f32; 4]) {
        match self {
            Self::Window(window) => window.set_clear_colour(colour),
            Self::Texture(texture) => texture.set_clear_colour(colour),
        }
    }

    /// Current clear colour
    pub fn clear_colour(&self) -> [f32; 4] {
        match self {
            Self::Window(window) => window.clear_colour(),
            Self::Texture(texture) => texture.clear_colour(),
        }
    }

    /// Release backend resources held by the target
    ///
    /// Windows close when dropped; render textures hand their colour target
    /// back to the backend.
    pub fn release(self, backend: &mut dyn GraphicsBackend) {
        match self {
            Self::Window(window) => drop(window),
            Self::Texture(texture) => texture.release(backend),
        }
    }
}

/// Windows and render textures under one id namespace
#[derive(Debug, Default)]
pub struct RenderTargetRegistry {
    targets: IdPool<RenderTarget>,
}

impl RenderTargetRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a window; on id exhaustion the target is handed back
    pub fn insert_window(&mut self, window: RenderWindow) -> Result<RenderWindowId, RenderTarget> {
        self.targets.insert(RenderTarget::Window(window))
    }

    /// Register a render texture; on id exhaustion the target is handed back
    pub fn insert_texture(&mut self, texture: RenderTexture) -> Result<RenderTextureId, RenderTarget> {
        self.targets.insert(RenderTarget::Texture(texture))
    }

    /// Remove a target of either variant
    pub fn erase(&mut self, id: RenderTargetId) -> Option<RenderTarget> {
        self.targets.remove(id)
    }

    /// Whether `id` names a live target
    pub fn exists(&self, id: RenderTargetId) -> bool {
        self.targets.contains(id)
    }

    /// Look up a target of either variant
    pub fn get(&self, id: RenderTargetId) -> Option<&RenderTarget> {
        self.targets.get(id)
    }

    /// Look up a target of either variant mutably
    pub fn get_mut(&mut self, id: RenderTargetId) -> Option<&mut RenderTarget> {
        self.targets.get_mut(id)
    }

    /// Look up a window; misses if `id` names a render texture
    pub fn get_window(&self, id: RenderWindowId) -> Option<&RenderWindow> {
        match self.targets.get(id)? {
            RenderTarget::Window(window) => Some(window),
            RenderTarget::Texture(_) => None,
        }
    }

    /// Look up a window mutably; misses if `id` names a render texture
    pub fn get_window_mut(&mut self, id: RenderWindowId) -> Option<&mut RenderWindow> {
        match self.targets.get_mut(id)? {
            RenderTarget::Window(window) => Some(window),
            RenderTarget::Texture(_) => None,
        }
    }

    /// Look up a render texture; misses if `id` names a window
    pub fn get_texture(&self, id: RenderTextureId) -> Option<&RenderTexture> {
        match self.targets.get(id)? {
            RenderTarget::Texture(texture) => Some(texture),
            RenderTarget::Window(_) => None,
        }
    }

    /// Look up a render texture mutably; misses if `id` names a window
    pub fn get_texture_mut(&mut self, id: RenderTextureId) -> Option<&mut RenderTexture> {
        match self.targets.get_mut(id)? {
            RenderTarget::Texture(texture) => Some(texture),
            RenderTarget::Window(_) => None,
        }
    }

    /// Number of live targets
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    /// Whether no targets are registered
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Remove every target
    pub fn drain(&mut self) -> impl Iterator<Item = (RenderTargetId, RenderTarget)> {
        self.targets.drain()
    }
}
