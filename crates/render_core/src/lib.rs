//! # Render Core
//!
//! The resource and frame-scheduling core of a plugin-loaded 2D render engine.
//!
//! ## Features
//!
//! - **Id-keyed resource pools**: meshes, textures, programs, properties,
//!   scenes, cameras, viewports and stages, each handing out the smallest
//!   free positive id
//! - **Multiple render targets**: windows and off-screen render textures,
//!   each paced at its own frame rate
//! - **Two-level interpolation**: logical ticks and presented frames run at
//!   independent rates while motion stays smooth
//! - **Backend-agnostic**: GPU work goes through the [`render::GraphicsBackend`]
//!   trait; a recording headless backend ships for tests and tooling
//!
//! ## Quick Start
//!
//! ```rust
//! use std::time::{Duration, Instant};
//! use render_core::prelude::*;
//! use render_core::render::backends::headless::{CommandLog, HeadlessBackend, HeadlessWindowProvider};
//!
//! # fn main() -> Result<(), RenderError> {
//! let log = CommandLog::new();
//! let mut renderer = Renderer::new(
//!     Box::new(HeadlessBackend::new(log.clone())),
//!     Box::new(HeadlessWindowProvider::new(log.clone())),
//! );
//!
//! let window = renderer.create_window(VideoMode::new(800, 600), "demo")?;
//! let mesh = renderer.create_mesh(&MeshData::unit_quad())?;
//! let texture = renderer.create_texture(&Image::new(4, 4))?;
//! let property = renderer.create_property(mesh, texture)?;
//! let scene = renderer.create_scene()?;
//! let object = renderer.create_object(scene, property)?;
//! renderer.set_object_position(scene, object, 0.25, 0.0, false)?;
//!
//! let camera = renderer.create_camera()?;
//! let viewport = renderer.create_viewport()?;
//! renderer.set_viewport_rect(viewport, 0, 0, 800, 600)?;
//! let program = renderer.create_default_program()?;
//! renderer.create_stage(window, viewport, scene, camera, program)?;
//!
//! let start = Instant::now();
//! renderer.set_window_desired_fps_at(window, 60.0, start)?;
//! renderer.step(start + Duration::from_millis(1));
//! assert_eq!(log.draws().len(), 1);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

// Core engine modules
pub mod core;

pub mod config;
pub mod foundation;
pub mod plugins;
pub mod render;

mod engine;

pub use engine::Renderer;

/// Common imports for renderer users
pub mod prelude {
    pub use crate::{
        core::{Config, EngineConfig},
        foundation::math::{Mat3, Rotation2, Vec2},
        plugins::{discover, plugin_name, RendererRegistry},
        render::{
            FrameStats, Image, MeshData, RenderError, RenderEvent, RenderResult, VideoMode, Viewport,
        },
        Renderer,
    };
}
