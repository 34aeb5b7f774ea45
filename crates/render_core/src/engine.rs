//! Renderer facade
//!
//! [`Renderer`] owns every resource pool, the render target registry, the
//! frame scheduler and the logical tick window. All access goes through it:
//! ids are validated here, calls are routed to the right pool and failures
//! come back as [`RenderResult`]s.
//!
//! ## Frame loop
//!
//! ```text
//! caller tick  ──► update_time(prev, now)   blend factor → cameras, scenes
//! caller frame ──► step(tp)
//!                    ├── scheduler: which targets are due at tp
//!                    └── for each due target
//!                          begin_render ─► stages (attach order) ─► end_render
//! ```
//!
//! The two cadences are independent. A caller may tick at 20 Hz and step at
//! whatever rate its display runs; `step` draws every object between its
//! previous and current sample according to where `tp` falls in the latest
//! tick window.

use std::collections::BTreeMap;
use std::time::Instant;

use log::{debug, info, trace};

use crate::core::EngineConfig;
use crate::foundation::collections::IdPool;
use crate::render::api::{GraphicsBackend, Image, MeshData, RenderEvent, VideoMode, WindowProvider};
use crate::render::stage::StageResources;
use crate::render::{
    Camera, FrameScheduler, FrameStats, Mesh, MeshId, Program, ProgramId, RenderCameraId, RenderError,
    RenderObjectId, RenderProperty, RenderPropertyId, RenderResult, RenderSceneId, RenderStage, RenderStageId,
    RenderTargetId, RenderTargetRegistry, RenderTexture, RenderTextureId, RenderViewportId,
    RenderWindow, RenderWindowId, ResourceId, ResourceKind, Scene, Texture, TextureId, TimeWindow, Viewport,
};

/// Pools read by stages while drawing
#[derive(Debug, Default)]
struct ResourcePools {
    meshes: IdPool<Mesh>,
    textures: IdPool<Texture>,
    programs: IdPool<Program>,
    properties: IdPool<RenderProperty>,
    scenes: IdPool<Scene>,
    cameras: IdPool<Camera>,
    viewports: IdPool<Viewport>,
}

impl ResourcePools {
    fn stage_resources(&self) -> StageResources<'_> {
        StageResources {
            meshes: &self.meshes,
            textures: &self.textures,
            programs: &self.programs,
            properties: &self.properties,
            scenes: &self.scenes,
            cameras: &self.cameras,
            viewports: &self.viewports,
        }
    }
}

/// Insert into a pool, mapping id exhaustion to an allocation failure
fn insert<T>(pool: &mut IdPool<T>, item: T, kind: ResourceKind) -> Result<ResourceId, (T, RenderError)> {
    pool.insert(item)
        .map_err(|item| (item, RenderError::AllocationFailure(format!("{kind} ids exhausted"))))
}

/// Insert into a pool that holds no backend resources
fn insert_plain<T>(pool: &mut IdPool<T>, item: T, kind: ResourceKind) -> RenderResult<ResourceId> {
    insert(pool, item, kind).map_err(|(_, error)| error)
}

/// The resource and scheduling core of the engine
///
/// One value owns one complete rendering context. Several renderers can live
/// in one process; they share nothing.
pub struct Renderer {
    backend: Box<dyn GraphicsBackend>,
    window_provider: Box<dyn WindowProvider>,
    config: EngineConfig,

    pools: ResourcePools,
    targets: RenderTargetRegistry,
    stages: IdPool<RenderStage>,
    /// Stages to run per target, in attach order
    target_stages: BTreeMap<RenderTargetId, Vec<RenderStageId>>,

    scheduler: FrameScheduler,
    time: TimeWindow,
    stats: FrameStats,
}

impl Renderer {
    /// Create a renderer with the default configuration
    pub fn new(backend: Box<dyn GraphicsBackend>, window_provider: Box<dyn WindowProvider>) -> Self {
        Self::with_config(backend, window_provider, EngineConfig::default())
    }

    /// Create a renderer with an explicit configuration
    pub fn with_config(
        backend: Box<dyn GraphicsBackend>,
        window_provider: Box<dyn WindowProvider>,
        config: EngineConfig,
    ) -> Self {
        info!("Renderer created");
        Self {
            backend,
            window_provider,
            config,
            pools: ResourcePools::default(),
            targets: RenderTargetRegistry::new(),
            stages: IdPool::new(),
            target_stages: BTreeMap::new(),
            scheduler: FrameScheduler::new(),
            time: TimeWindow::new(Instant::now()),
            stats: FrameStats::default(),
        }
    }

    /// Active configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    // ---- Meshes ----------------------------------------------------------

    /// Upload a mesh
    pub fn create_mesh(&mut self, data: &MeshData) -> RenderResult<MeshId> {
        let mesh = Mesh::upload(self.backend.as_mut(), data)?;
        let id = insert(&mut self.pools.meshes, mesh, ResourceKind::Mesh).map_err(|(mesh, error)| {
            mesh.release(self.backend.as_mut());
            error
        })?;
        debug!("Created mesh {} ({} indices)", id, data.indices.len());
        Ok(id)
    }

    /// Replace a mesh's geometry; properties using it see the change
    pub fn set_mesh_data(&mut self, id: MeshId, data: &MeshData) -> RenderResult<()> {
        let mesh = self
            .pools
            .meshes
            .get_mut(id)
            .ok_or_else(|| RenderError::not_found(ResourceKind::Mesh, id))?;
        mesh.update(self.backend.as_mut(), data)?;
        trace!("Updated mesh {}", id);
        Ok(())
    }

    /// Release a mesh
    ///
    /// Properties still naming it are left alone; their objects are skipped
    /// when drawn.
    pub fn destroy_mesh(&mut self, id: MeshId) -> RenderResult<()> {
        let mesh = self
            .pools
            .meshes
            .remove(id)
            .ok_or_else(|| RenderError::not_found(ResourceKind::Mesh, id))?;
        mesh.release(self.backend.as_mut());
        debug!("Destroyed mesh {}", id);
        Ok(())
    }

    // ---- Textures --------------------------------------------------------

    /// Upload a texture
    pub fn create_texture(&mut self, image: &Image) -> RenderResult<TextureId> {
        let texture = Texture::upload(self.backend.as_mut(), image)?;
        let id = insert(&mut self.pools.textures, texture, ResourceKind::Texture).map_err(|(texture, error)| {
            texture.release(self.backend.as_mut());
            error
        })?;
        debug!("Created texture {} ({}x{})", id, image.width(), image.height());
        Ok(id)
    }

    /// Release a texture
    pub fn destroy_texture(&mut self, id: TextureId) -> RenderResult<()> {
        let texture = self
            .pools
            .textures
            .remove(id)
            .ok_or_else(|| RenderError::not_found(ResourceKind::Texture, id))?;
        texture.release(self.backend.as_mut());
        debug!("Destroyed texture {}", id);
        Ok(())
    }

    // ---- Programs --------------------------------------------------------

    /// Compile and link a program
    pub fn create_program(&mut self, vertex_src: &str, fragment_src: &str) -> RenderResult<ProgramId> {
        let program = Program::compile(self.backend.as_mut(), vertex_src, fragment_src)?;
        self.insert_program(program)
    }

    /// Compile the built-in textured 2D program
    pub fn create_default_program(&mut self) -> RenderResult<ProgramId> {
        let program = Program::compile_default(self.backend.as_mut())?;
        self.insert_program(program)
    }

    fn insert_program(&mut self, program: Program) -> RenderResult<ProgramId> {
        let id = insert(&mut self.pools.programs, program, ResourceKind::Program).map_err(|(program, error)| {
            program.release(self.backend.as_mut());
            error
        })?;
        debug!("Created program {}", id);
        Ok(id)
    }

    /// Release a program
    pub fn destroy_program(&mut self, id: ProgramId) -> RenderResult<()> {
        let program = self
            .pools
            .programs
            .remove(id)
            .ok_or_else(|| RenderError::not_found(ResourceKind::Program, id))?;
        program.release(self.backend.as_mut());
        debug!("Destroyed program {}", id);
        Ok(())
    }

    // ---- Windows ---------------------------------------------------------

    /// Open a hidden window
    ///
    /// The window uses the configured default clear colour and, if the
    /// configuration names one, the default frame rate. Otherwise it is not
    /// drawn until a desired frame rate is set.
    pub fn create_window(&mut self, mode: VideoMode, title: &str) -> RenderResult<RenderWindowId> {
        let native = self
            .window_provider
            .create_window(mode, title)
            .ok_or_else(|| RenderError::BackendFailure(format!("window provider refused \"{title}\"")))?;
        let window = RenderWindow::new(native, title, self.config.default_clear_colour);
        let id = self.targets.insert_window(window).map_err(|target| {
            target.release(self.backend.as_mut());
            RenderError::AllocationFailure("render target ids exhausted".to_string())
        })?;

        if let Some(fps) = self.config.default_fps {
            if let Err(error) = self.scheduler.set_desired_fps(id, fps, Instant::now()) {
                self.targets.erase(id);
                return Err(error);
            }
        }

        debug!("Created window {} \"{}\" {}x{}", id, title, mode.width, mode.height);
        Ok(id)
    }

    /// Pace a window at `fps`, first due now
    pub fn set_window_desired_fps(&mut self, id: RenderWindowId, fps: f32) -> RenderResult<()> {
        self.set_window_desired_fps_at(id, fps, Instant::now())
    }

    /// Pace a window at `fps`, first due at `now`
    pub fn set_window_desired_fps_at(&mut self, id: RenderWindowId, fps: f32, now: Instant) -> RenderResult<()> {
        self.window(id)?;
        self.scheduler.set_desired_fps(id, fps, now)
    }

    /// Show or hide a window
    pub fn set_window_visibility(&mut self, id: RenderWindowId, visible: bool) -> RenderResult<()> {
        let window = self.window_mut(id)?;
        if visible {
            window.show();
        } else {
            window.hide();
        }
        trace!("Window {} visible: {}", id, visible);
        Ok(())
    }

    /// Take the events a window received since the last poll
    pub fn poll_window_events(&mut self, id: RenderWindowId) -> RenderResult<Vec<RenderEvent>> {
        Ok(self.window_mut(id)?.poll_events())
    }

    /// Look up a window
    pub fn window(&self, id: RenderWindowId) -> RenderResult<&RenderWindow> {
        self.targets
            .get_window(id)
            .ok_or_else(|| RenderError::not_found(ResourceKind::Window, id))
    }

    fn window_mut(&mut self, id: RenderWindowId) -> RenderResult<&mut RenderWindow> {
        self.targets
            .get_window_mut(id)
            .ok_or_else(|| RenderError::not_found(ResourceKind::Window, id))
    }

    /// Close a window and forget its pacing and stage bindings
    pub fn destroy_window(&mut self, id: RenderWindowId) -> RenderResult<()> {
        self.window(id)?;
        self.destroy_target(id);
        debug!("Destroyed window {}", id);
        Ok(())
    }

    // ---- Render textures -------------------------------------------------

    /// Create an off-screen render target
    pub fn create_render_texture(&mut self, width: u32, height: u32) -> RenderResult<RenderTextureId> {
        if width == 0 || height == 0 {
            return Err(RenderError::InvalidArgument(format!(
                "render texture size {width}x{height} is empty"
            )));
        }
        let handle = self.backend.create_render_texture(width, height)?;
        let texture = RenderTexture::new(handle, width, height, self.config.default_clear_colour);
        let id = self.targets.insert_texture(texture).map_err(|texture| {
            texture.release(self.backend.as_mut());
            RenderError::AllocationFailure("render target ids exhausted".to_string())
        })?;
        debug!("Created render texture {} ({}x{})", id, width, height);
        Ok(id)
    }

    /// Look up a render texture
    pub fn render_texture(&self, id: RenderTextureId) -> RenderResult<&RenderTexture> {
        self.targets
            .get_texture(id)
            .ok_or_else(|| RenderError::not_found(ResourceKind::RenderTexture, id))
    }

    /// Release a render texture and forget its pacing and stage bindings
    pub fn destroy_render_texture(&mut self, id: RenderTextureId) -> RenderResult<()> {
        self.render_texture(id)?;
        self.destroy_target(id);
        debug!("Destroyed render texture {}", id);
        Ok(())
    }

    // ---- Any render target -----------------------------------------------

    /// Pace a window or render texture at `fps`, first due now
    pub fn set_target_desired_fps(&mut self, id: RenderTargetId, fps: f32) -> RenderResult<()> {
        self.set_target_desired_fps_at(id, fps, Instant::now())
    }

    /// Pace a window or render texture at `fps`, first due at `now`
    pub fn set_target_desired_fps_at(&mut self, id: RenderTargetId, fps: f32, now: Instant) -> RenderResult<()> {
        if !self.targets.exists(id) {
            return Err(RenderError::not_found(ResourceKind::RenderTarget, id));
        }
        self.scheduler.set_desired_fps(id, fps, now)
    }

    /// Change the colour a target is cleared to each frame
    pub fn set_target_clear_colour(&mut self, id: RenderTargetId, colour: [f32; 4]) -> RenderResult<()> {
        self.targets
            .get_mut(id)
            .ok_or_else(|| RenderError::not_found(ResourceKind::RenderTarget, id))?
            .set_clear_colour(colour);
        Ok(())
    }

    fn destroy_target(&mut self, id: RenderTargetId) {
        self.scheduler.remove(id);
        self.target_stages.remove(&id);
        if let Some(target) = self.targets.erase(id) {
            target.release(self.backend.as_mut());
        }
    }

    /// Earliest instant at which any paced target becomes due
    pub fn next_frame_deadline(&self) -> Option<Instant> {
        self.scheduler.next_deadline()
    }

    // ---- Viewports -------------------------------------------------------

    /// Create a zero-sized viewport
    pub fn create_viewport(&mut self) -> RenderResult<RenderViewportId> {
        let id = insert_plain(&mut self.pools.viewports, Viewport::default(), ResourceKind::Viewport)?;
        debug!("Created viewport {}", id);
        Ok(id)
    }

    /// Set a viewport's rectangle in target pixels
    pub fn set_viewport_rect(&mut self, id: RenderViewportId, x: i32, y: i32, width: u32, height: u32) -> RenderResult<()> {
        self.pools
            .viewports
            .get_mut(id)
            .ok_or_else(|| RenderError::not_found(ResourceKind::Viewport, id))?
            .set_rect(x, y, width, height);
        Ok(())
    }

    /// Look up a viewport
    pub fn viewport(&self, id: RenderViewportId) -> RenderResult<&Viewport> {
        self.pools
            .viewports
            .get(id)
            .ok_or_else(|| RenderError::not_found(ResourceKind::Viewport, id))
    }

    /// Remove a viewport
    pub fn destroy_viewport(&mut self, id: RenderViewportId) -> RenderResult<()> {
        self.pools
            .viewports
            .remove(id)
            .ok_or_else(|| RenderError::not_found(ResourceKind::Viewport, id))?;
        debug!("Destroyed viewport {}", id);
        Ok(())
    }

    // ---- Cameras ---------------------------------------------------------

    /// Create a camera at the origin
    pub fn create_camera(&mut self) -> RenderResult<RenderCameraId> {
        let id = insert_plain(&mut self.pools.cameras, Camera::new(), ResourceKind::Camera)?;
        debug!("Created camera {}", id);
        Ok(id)
    }

    /// Move a camera; `interpolate` false teleports it
    pub fn set_camera_position(&mut self, id: RenderCameraId, x: f32, y: f32, interpolate: bool) -> RenderResult<()> {
        self.camera_mut(id)?.set_position(x, y, interpolate);
        Ok(())
    }

    /// Rotate a camera to `angle` radians
    pub fn set_camera_rotation(&mut self, id: RenderCameraId, angle: f32, interpolate: bool) -> RenderResult<()> {
        self.camera_mut(id)?.set_rotation(angle, interpolate);
        Ok(())
    }

    /// Set a camera's orthographic bounds
    pub fn set_camera_orthographic(
        &mut self,
        id: RenderCameraId,
        left: f32,
        right: f32,
        bottom: f32,
        top: f32,
    ) -> RenderResult<()> {
        self.camera_mut(id)?.set_orthographic(left, right, bottom, top);
        Ok(())
    }

    /// Look up a camera
    pub fn camera(&self, id: RenderCameraId) -> RenderResult<&Camera> {
        self.pools
            .cameras
            .get(id)
            .ok_or_else(|| RenderError::not_found(ResourceKind::Camera, id))
    }

    fn camera_mut(&mut self, id: RenderCameraId) -> RenderResult<&mut Camera> {
        self.pools
            .cameras
            .get_mut(id)
            .ok_or_else(|| RenderError::not_found(ResourceKind::Camera, id))
    }

    /// Remove a camera
    pub fn destroy_camera(&mut self, id: RenderCameraId) -> RenderResult<()> {
        self.pools
            .cameras
            .remove(id)
            .ok_or_else(|| RenderError::not_found(ResourceKind::Camera, id))?;
        debug!("Destroyed camera {}", id);
        Ok(())
    }

    // ---- Properties ------------------------------------------------------

    /// Pair an existing mesh with an existing texture
    pub fn create_property(&mut self, mesh: MeshId, texture: TextureId) -> RenderResult<RenderPropertyId> {
        self.require_mesh(mesh)?;
        self.require_texture(texture)?;
        let id = insert_plain(
            &mut self.pools.properties,
            RenderProperty::new(mesh, texture),
            ResourceKind::Property,
        )?;
        debug!("Created property {} (mesh {}, texture {})", id, mesh, texture);
        Ok(id)
    }

    /// Swap the mesh of a property
    pub fn set_property_mesh(&mut self, id: RenderPropertyId, mesh: MeshId) -> RenderResult<()> {
        self.require_mesh(mesh)?;
        self.property_mut(id)?.set_mesh(mesh);
        Ok(())
    }

    /// Swap the texture of a property
    pub fn set_property_texture(&mut self, id: RenderPropertyId, texture: TextureId) -> RenderResult<()> {
        self.require_texture(texture)?;
        self.property_mut(id)?.set_texture(texture);
        Ok(())
    }

    /// Look up a property
    pub fn property(&self, id: RenderPropertyId) -> RenderResult<&RenderProperty> {
        self.pools
            .properties
            .get(id)
            .ok_or_else(|| RenderError::not_found(ResourceKind::Property, id))
    }

    fn property_mut(&mut self, id: RenderPropertyId) -> RenderResult<&mut RenderProperty> {
        self.pools
            .properties
            .get_mut(id)
            .ok_or_else(|| RenderError::not_found(ResourceKind::Property, id))
    }

    /// Remove a property; objects still using it are skipped when drawn
    pub fn destroy_property(&mut self, id: RenderPropertyId) -> RenderResult<()> {
        self.pools
            .properties
            .remove(id)
            .ok_or_else(|| RenderError::not_found(ResourceKind::Property, id))?;
        debug!("Destroyed property {}", id);
        Ok(())
    }

    fn require_mesh(&self, id: MeshId) -> RenderResult<()> {
        if self.pools.meshes.contains(id) {
            Ok(())
        } else {
            Err(RenderError::not_found(ResourceKind::Mesh, id))
        }
    }

    fn require_texture(&self, id: TextureId) -> RenderResult<()> {
        if self.pools.textures.contains(id) {
            Ok(())
        } else {
            Err(RenderError::not_found(ResourceKind::Texture, id))
        }
    }

    // ---- Scenes and objects ----------------------------------------------

    /// Create an empty scene
    pub fn create_scene(&mut self) -> RenderResult<RenderSceneId> {
        let id = insert_plain(&mut self.pools.scenes, Scene::new(), ResourceKind::Scene)?;
        debug!("Created scene {}", id);
        Ok(id)
    }

    /// Look up a scene
    pub fn scene(&self, id: RenderSceneId) -> RenderResult<&Scene> {
        self.pools
            .scenes
            .get(id)
            .ok_or_else(|| RenderError::not_found(ResourceKind::Scene, id))
    }

    fn scene_mut(&mut self, id: RenderSceneId) -> RenderResult<&mut Scene> {
        self.pools
            .scenes
            .get_mut(id)
            .ok_or_else(|| RenderError::not_found(ResourceKind::Scene, id))
    }

    /// Remove a scene and every object in it
    pub fn destroy_scene(&mut self, id: RenderSceneId) -> RenderResult<()> {
        let scene = self
            .pools
            .scenes
            .remove(id)
            .ok_or_else(|| RenderError::not_found(ResourceKind::Scene, id))?;
        debug!("Destroyed scene {} with {} objects", id, scene.len());
        Ok(())
    }

    /// Add an object drawing `property` to a scene
    pub fn create_object(&mut self, scene: RenderSceneId, property: RenderPropertyId) -> RenderResult<RenderObjectId> {
        self.property(property)?;
        self.scene_mut(scene)?.create_object(property)
    }

    /// Remove an object from a scene
    pub fn destroy_object(&mut self, scene: RenderSceneId, object: RenderObjectId) -> RenderResult<()> {
        self.scene_mut(scene)?.destroy_object(object)
    }

    /// Move an object; `interpolate` false teleports it
    pub fn set_object_position(
        &mut self,
        scene: RenderSceneId,
        object: RenderObjectId,
        x: f32,
        y: f32,
        interpolate: bool,
    ) -> RenderResult<()> {
        self.scene_mut(scene)?.set_position(object, x, y, interpolate)
    }

    /// Rotate an object to `angle` radians
    pub fn set_object_rotation(
        &mut self,
        scene: RenderSceneId,
        object: RenderObjectId,
        angle: f32,
        interpolate: bool,
    ) -> RenderResult<()> {
        self.scene_mut(scene)?.set_rotation(object, angle, interpolate)
    }

    /// Show or hide an object
    pub fn set_object_visibility(&mut self, scene: RenderSceneId, object: RenderObjectId, visible: bool) -> RenderResult<()> {
        self.scene_mut(scene)?.set_visible(object, visible)
    }

    /// Change an object's depth layer
    pub fn set_object_layer(&mut self, scene: RenderSceneId, object: RenderObjectId, layer: f32) -> RenderResult<()> {
        self.scene_mut(scene)?.set_layer(object, layer)
    }

    /// Point an object at another property
    pub fn set_object_property(
        &mut self,
        scene: RenderSceneId,
        object: RenderObjectId,
        property: RenderPropertyId,
    ) -> RenderResult<()> {
        self.property(property)?;
        self.scene_mut(scene)?.set_property(object, property)
    }

    // ---- Stages ----------------------------------------------------------

    /// Attach a stage to a target
    ///
    /// Every id must exist now. Stages run in attach order when their target
    /// is drawn; a stage whose references later disappear is skipped.
    pub fn create_stage(
        &mut self,
        target: RenderTargetId,
        viewport: RenderViewportId,
        scene: RenderSceneId,
        camera: RenderCameraId,
        program: ProgramId,
    ) -> RenderResult<RenderStageId> {
        if !self.targets.exists(target) {
            return Err(RenderError::not_found(ResourceKind::RenderTarget, target));
        }
        self.viewport(viewport)?;
        self.scene(scene)?;
        self.camera(camera)?;
        if !self.pools.programs.contains(program) {
            return Err(RenderError::not_found(ResourceKind::Program, program));
        }

        let stage = RenderStage::new(target, viewport, scene, camera, program);
        let id = insert_plain(&mut self.stages, stage, ResourceKind::Stage)?;
        self.target_stages.entry(target).or_default().push(id);
        debug!("Created stage {} on target {}", id, target);
        Ok(id)
    }

    /// Look up a stage
    pub fn stage(&self, id: RenderStageId) -> RenderResult<&RenderStage> {
        self.stages
            .get(id)
            .ok_or_else(|| RenderError::not_found(ResourceKind::Stage, id))
    }

    /// Detach and remove a stage
    pub fn destroy_stage(&mut self, id: RenderStageId) -> RenderResult<()> {
        let stage = self
            .stages
            .remove(id)
            .ok_or_else(|| RenderError::not_found(ResourceKind::Stage, id))?;
        if let Some(attached) = self.target_stages.get_mut(&stage.target) {
            attached.retain(|&other| other != id);
            if attached.is_empty() {
                self.target_stages.remove(&stage.target);
            }
        }
        debug!("Destroyed stage {}", id);
        Ok(())
    }

    // ---- Frame loop ------------------------------------------------------

    /// Move the logical tick window to `[new_prev, new_now]`
    ///
    /// Cameras and scene objects pull their previous samples toward their
    /// current ones by how far `new_prev` lies inside the old window.
    pub fn update_time(&mut self, new_prev: Instant, new_now: Instant) {
        let factor = self.time.advance(new_prev, new_now);
        for camera in self.pools.cameras.values_mut() {
            camera.update_state(factor);
        }
        for scene in self.pools.scenes.values_mut() {
            scene.update_state(factor);
        }
        trace!("Tick window advanced, blend factor {:.3}", factor);
    }

    /// Interpolation factor a frame at `tp` would use
    pub fn interpolation_at(&self, tp: Instant) -> f32 {
        self.time.relative(tp)
    }

    /// Current logical tick window
    pub fn time_window(&self) -> TimeWindow {
        self.time
    }

    /// Draw every target that is due at `tp`
    ///
    /// Never fails: targets, stages and objects whose references are gone
    /// are skipped and counted in [`FrameStats`].
    pub fn step(&mut self, tp: Instant) {
        self.stats.frames_stepped += 1;
        self.scheduler.step_target_times(tp);
        let interp = self.time.relative(tp);

        for target_id in self.scheduler.drain_due() {
            let Some(target) = self.targets.get_mut(target_id) else {
                trace!("Due target {} no longer exists", target_id);
                continue;
            };

            target.begin_render(self.backend.as_mut());
            if let Some(stage_ids) = self.target_stages.get(&target_id) {
                for stage_id in stage_ids {
                    if let Some(stage) = self.stages.get(*stage_id) {
                        stage.render(self.pools.stage_resources(), self.backend.as_mut(), interp, &mut self.stats);
                    }
                }
            }
            target.end_render(self.backend.as_mut());
            self.stats.targets_drawn += 1;
        }
    }

    /// Submit queued backend work
    pub fn flush(&mut self) {
        self.backend.flush();
    }

    /// Counters accumulated by [`Renderer::step`]
    pub fn stats(&self) -> FrameStats {
        self.stats
    }

    /// Zero the frame counters
    pub fn reset_stats(&mut self) {
        self.stats.reset();
    }
}

impl Drop for Renderer {
    fn drop(&mut self) {
        self.target_stages.clear();
        self.stages.drain().for_each(drop);

        let backend = self.backend.as_mut();
        for (_, target) in self.targets.drain() {
            target.release(backend);
        }
        for (_, program) in self.pools.programs.drain() {
            program.release(backend);
        }
        for (_, texture) in self.pools.textures.drain() {
            texture.release(backend);
        }
        for (_, mesh) in self.pools.meshes.drain() {
            mesh.release(backend);
        }
        info!("Renderer released");
    }
}

impl std::fmt::Debug for Renderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Renderer")
            .field("targets", &self.targets.len())
            .field("stages", &self.stages.len())
            .field("time", &self.time)
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}
