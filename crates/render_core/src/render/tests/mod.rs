//! Facade-level tests
//!
//! Drive a [`Renderer`] over the headless backend and check behaviour through
//! the recorded command log.

mod engine_properties;

use std::time::{Duration, Instant};

use crate::render::api::{Image, MeshData, VideoMode};
use crate::render::backends::headless::{CommandLog, EventInbox, HeadlessBackend, HeadlessWindowProvider};
use crate::render::{
    MeshId, ProgramId, RenderCameraId, RenderPropertyId, RenderSceneId, RenderStageId, RenderViewportId, RenderWindowId,
    TextureId,
};
use crate::Renderer;

/// A renderer plus handles to observe it
pub(crate) struct Harness {
    pub renderer: Renderer,
    pub log: CommandLog,
    pub inbox: EventInbox,
    pub start: Instant,
}

impl Harness {
    pub fn new() -> Self {
        let log = CommandLog::new();
        let provider = HeadlessWindowProvider::new(log.clone());
        let inbox = provider.inbox();
        let renderer = Renderer::new(Box::new(HeadlessBackend::new(log.clone())), Box::new(provider));
        Self {
            renderer,
            log,
            inbox,
            start: Instant::now(),
        }
    }

    /// `start + millis`
    pub fn at(&self, millis: u64) -> Instant {
        self.start + Duration::from_millis(millis)
    }

    pub fn window(&mut self, title: &str, fps: f32) -> RenderWindowId {
        let id = self.renderer.create_window(VideoMode::new(320, 240), title).unwrap();
        self.renderer.set_window_desired_fps_at(id, fps, self.start).unwrap();
        id
    }

    pub fn mesh(&mut self) -> MeshId {
        self.renderer.create_mesh(&MeshData::unit_quad()).unwrap()
    }

    pub fn texture(&mut self) -> TextureId {
        self.renderer.create_texture(&Image::new(2, 2)).unwrap()
    }

    pub fn property(&mut self) -> RenderPropertyId {
        let mesh = self.mesh();
        let texture = self.texture();
        self.renderer.create_property(mesh, texture).unwrap()
    }
}

/// Ids of one fully wired stage
pub(crate) struct Wiring {
    pub scene: RenderSceneId,
    pub camera: RenderCameraId,
    pub viewport: RenderViewportId,
    pub program: ProgramId,
    pub stage: RenderStageId,
}

/// Scene, camera, viewport and program attached to `target`
pub(crate) fn wire_stage(harness: &mut Harness, target: RenderWindowId) -> Wiring {
    let renderer = &mut harness.renderer;
    let scene = renderer.create_scene().unwrap();
    let camera = renderer.create_camera().unwrap();
    let viewport = renderer.create_viewport().unwrap();
    renderer.set_viewport_rect(viewport, 0, 0, 320, 240).unwrap();
    let program = renderer.create_default_program().unwrap();
    let stage = renderer.create_stage(target, viewport, scene, camera, program).unwrap();
    Wiring {
        scene,
        camera,
        viewport,
        program,
        stage,
    }
}
