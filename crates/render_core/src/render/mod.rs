//! # Rendering System
//!
//! Resource pools, render targets and the per-frame draw machinery of the
//! renderer. The concrete GPU work is delegated to a [`GraphicsBackend`] and
//! native windows come from a [`WindowProvider`]; everything in this module is
//! backend-agnostic bookkeeping on top of those two seams.
//!
//! ## Architecture
//!
//! ```text
//! Renderer (facade, crate::Renderer)
//!     ├── resources     meshes, textures, programs (owned backend handles)
//!     ├── targets       windows + render textures under one id space
//!     ├── viewport      sub-rectangles applied before a stage draws
//!     ├── primitives    cameras and the two-sample transform state
//!     ├── scene         render objects and (mesh, texture) properties
//!     ├── stage         target + viewport + scene + camera + program
//!     ├── scheduler     per-target frame pacing
//!     └── time_window   logical tick window used for interpolation
//! ```
//!
//! ## Identifiers
//!
//! Every pool hands out [`ResourceId`]s independently. A `MeshId` of 3 and a
//! `TextureId` of 3 are unrelated. Windows and render textures share the
//! [`RenderTargetId`] space.

pub mod api;
pub mod backends;
pub mod primitives;
pub mod resources;
pub mod scene;
pub mod scheduler;
pub mod stage;
pub mod stats;
pub mod targets;
pub mod time_window;
pub mod viewport;
pub mod window;

#[cfg(test)]
mod tests;

pub use api::{
    BackendMesh, BackendProgram, BackendRenderTexture, BackendResult, BackendTexture, CompiledProgram,
    DrawCall, GraphicsBackend, Image, MeshData, NativeWindow, RenderEvent, TargetBinding, UniformLocations,
    Vertex2d, VideoMode, WindowProvider,
};
pub use primitives::{Camera, TransformState};
pub use resources::{Mesh, Program, Texture};
pub use scene::{RenderObject, RenderProperty, Scene};
pub use scheduler::FrameScheduler;
pub use stage::RenderStage;
pub use stats::FrameStats;
pub use targets::{RenderTarget, RenderTargetRegistry, RenderTexture};
pub use time_window::TimeWindow;
pub use viewport::Viewport;
pub use window::RenderWindow;

pub use crate::foundation::collections::{ResourceId, INVALID_ID};

use thiserror::Error;

/// Mesh pool identifier
pub type MeshId = ResourceId;
/// Texture pool identifier
pub type TextureId = ResourceId;
/// Program pool identifier
pub type ProgramId = ResourceId;
/// Render property pool identifier
pub type RenderPropertyId = ResourceId;
/// Render object identifier, scoped to one scene
pub type RenderObjectId = ResourceId;
/// Scene pool identifier
pub type RenderSceneId = ResourceId;
/// Render target identifier shared by windows and render textures
pub type RenderTargetId = ResourceId;
/// Render target identifier that is expected to name a window
pub type RenderWindowId = RenderTargetId;
/// Render target identifier that is expected to name a render texture
pub type RenderTextureId = RenderTargetId;
/// Camera pool identifier
pub type RenderCameraId = ResourceId;
/// Stage pool identifier
pub type RenderStageId = ResourceId;
/// Viewport pool identifier
pub type RenderViewportId = ResourceId;

/// The pool an identifier belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    /// Mesh pool
    Mesh,
    /// Texture pool
    Texture,
    /// Program pool
    Program,
    /// Render property pool
    Property,
    /// Scene pool
    Scene,
    /// Objects of one scene
    Object,
    /// Any render target
    RenderTarget,
    /// Render target that must be a window
    Window,
    /// Render target that must be a render texture
    RenderTexture,
    /// Camera pool
    Camera,
    /// Stage pool
    Stage,
    /// Viewport pool
    Viewport,
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Mesh => "mesh",
            Self::Texture => "texture",
            Self::Program => "program",
            Self::Property => "render property",
            Self::Scene => "scene",
            Self::Object => "render object",
            Self::RenderTarget => "render target",
            Self::Window => "window",
            Self::RenderTexture => "render texture",
            Self::Camera => "camera",
            Self::Stage => "stage",
            Self::Viewport => "viewport",
        };
        f.write_str(name)
    }
}

/// High-level rendering error types
///
/// Every create and mutate operation of the renderer reports failures through
/// this type. Draw-time inconsistencies (a stage or object referencing a
/// resource that has since been destroyed) are not errors; they are skipped.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RenderError {
    /// An operation named an id that is absent from its pool
    ///
    /// Recoverable and local: no other resource is affected.
    #[error("{kind} {id} not found")]
    NotFound {
        /// Pool that was searched
        kind: ResourceKind,
        /// Identifier that was not present
        id: ResourceId,
    },

    /// A pool could not take another resource
    #[error("Allocation failed: {0}")]
    AllocationFailure(String),

    /// The graphics backend or window provider reported a failure
    ///
    /// Carries the backend's diagnostic, e.g. a shader compile log.
    #[error("Backend failure: {0}")]
    BackendFailure(String),

    /// A parameter was outside the accepted range
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl RenderError {
    /// Shorthand for a [`RenderError::NotFound`]
    pub fn not_found(kind: ResourceKind, id: ResourceId) -> Self {
        Self::NotFound { kind, id }
    }

    /// Whether this error reports a missing id
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Result type for rendering operations
pub type RenderResult<T> = Result<T, RenderError>;
