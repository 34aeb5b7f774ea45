//! Render stages
//!
//! A stage composes one target, viewport, scene, camera and program. The
//! record only holds ids; everything is resolved again each time the stage
//! runs, so a stage may outlive what it references.
//!
//! ## Draw pass
//!
//! ```text
//! resolve viewport, scene, camera, program ── any missing ──► skip stage
//!   │
//! set viewport, gather visible objects, activate program
//!   │
//! vp = projection * view(t)
//!   │
//! for each object:
//!     property → mesh + texture ── any missing ──► skip object
//!     mvp = vp * model(t)
//!     draw
//! ```

use log::{trace, warn};

use crate::foundation::collections::IdPool;
use crate::render::api::{DrawCall, GraphicsBackend};
use crate::render::{
    Camera, FrameStats, Mesh, Program, RenderCameraId, RenderObject, RenderObjectId, RenderProperty,
    RenderSceneId, RenderTargetId, RenderViewportId, ProgramId, Scene, Texture, Viewport,
};

/// Borrowed view of every pool a stage may read while drawing
#[derive(Clone, Copy)]
pub struct StageResources<'a> {
    /// Mesh pool
    pub meshes: &'a IdPool<Mesh>,
    /// Texture pool
    pub textures: &'a IdPool<Texture>,
    /// Program pool
    pub programs: &'a IdPool<Program>,
    /// Render property pool
    pub properties: &'a IdPool<RenderProperty>,
    /// Scene pool
    pub scenes: &'a IdPool<Scene>,
    /// Camera pool
    pub cameras: &'a IdPool<Camera>,
    /// Viewport pool
    pub viewports: &'a IdPool<Viewport>,
}

/// Composition of target, viewport, scene, camera and program
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderStage {
    /// Target the stage draws into
    pub target: RenderTargetId,
    /// Rectangle of the target
    pub viewport: RenderViewportId,
    /// Objects to draw
    pub scene: RenderSceneId,
    /// Camera looking at the scene
    pub camera: RenderCameraId,
    /// Program used for every draw
    pub program: ProgramId,
}

impl RenderStage {
    /// Compose a stage from ids; nothing is validated until it runs
    pub const fn new(
        target: RenderTargetId,
        viewport: RenderViewportId,
        scene: RenderSceneId,
        camera: RenderCameraId,
        program: ProgramId,
    ) -> Self {
        Self {
            target,
            viewport,
            scene,
            camera,
            program,
        }
    }

    /// Draw the scene into the currently bound target at interpolation `interp`
    ///
    /// Returns false if the stage was skipped. The target must already be
    /// bound and cleared.
    pub fn render(
        &self,
        resources: StageResources<'_>,
        backend: &mut dyn GraphicsBackend,
        interp: f32,
        stats: &mut FrameStats,
    ) -> bool {
        let (Some(viewport), Some(scene), Some(camera), Some(program)) = (
            resources.viewports.get(self.viewport),
            resources.scenes.get(self.scene),
            resources.cameras.get(self.camera),
            resources.programs.get(self.program),
        ) else {
            warn!(
                "Skipping stage: viewport {} scene {} camera {} program {} not all alive",
                self.viewport, self.scene, self.camera, self.program
            );
            stats.stages_skipped += 1;
            return false;
        };

        backend.set_viewport(viewport);

        let mut queue: Vec<(RenderObjectId, &RenderObject)> = Vec::with_capacity(scene.len());
        scene.visit(&mut queue);

        program.activate(backend);
        let uniforms = program.uniforms();
        let view_projection = camera.view_projection(interp);

        for (id, object) in queue {
            let Some((mesh, texture)) = resolve(resources, object) else {
                warn!("Skipping render object {}: property {} is incomplete", id, object.property);
                stats.objects_skipped += 1;
                continue;
            };

            backend.draw_indexed(&DrawCall {
                program: program.handle(),
                uniforms,
                mesh: mesh.handle(),
                index_count: mesh.index_count(),
                texture: texture.handle(),
                layer: object.layer,
                mvp: view_projection * object.model_matrix(interp),
            });
            stats.objects_drawn += 1;
        }

        trace!("Stage on target {} drew scene {}", self.target, self.scene);
        stats.stages_run += 1;
        true
    }
}

fn resolve<'a>(resources: StageResources<'a>, object: &RenderObject) -> Option<(&'a Mesh, &'a Texture)> {
    let property = resources.properties.get(object.property)?;
    let mesh = resources.meshes.get(property.mesh())?;
    let texture = resources.textures.get(property.texture())?;
    Some((mesh, texture))
}
