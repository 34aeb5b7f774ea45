//! Headless backend
//!
//! A [`GraphicsBackend`] and [`WindowProvider`] that talk to no GPU and no
//! display server. Every call is appended to a shared [`CommandLog`], which
//! makes the renderer's output observable: tests count draws and swaps, and
//! the demo prints frame summaries from it.
//!
//! The log is single-threaded (`Rc<RefCell<..>>`), matching the renderer's
//! threading model.

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::rc::Rc;

use log::{debug, trace};

use crate::render::api::{
    BackendMesh, BackendProgram, BackendRenderTexture, BackendResult, BackendTexture, CompiledProgram, DrawCall,
    GraphicsBackend, Image, MeshData, TargetBinding, UniformLocations,
};
use crate::render::window::{NativeWindow, RenderEvent, VideoMode, WindowProvider};
use crate::render::{RenderError, Viewport};

/// Largest render texture edge the headless backend accepts
pub const MAX_RENDER_TEXTURE_SIZE: u32 = 16_384;

/// One recorded backend or window call
#[derive(Debug, Clone, PartialEq)]
pub enum BackendCommand {
    /// A program was linked
    CompileProgram(BackendProgram),
    /// A program was released
    DestroyProgram(BackendProgram),
    /// A mesh was uploaded
    UploadMesh(BackendMesh),
    /// A mesh was re-uploaded in place
    UpdateMesh(BackendMesh),
    /// A mesh was released
    DestroyMesh(BackendMesh),
    /// A texture was uploaded
    UploadTexture(BackendTexture),
    /// A texture was released
    DestroyTexture(BackendTexture),
    /// An off-screen target was created
    CreateRenderTexture(BackendRenderTexture),
    /// An off-screen target was released
    DestroyRenderTexture(BackendRenderTexture),
    /// The colour target changed
    BindTarget(TargetBinding),
    /// The bound target was cleared
    Clear([f32; 4]),
    /// The viewport changed
    SetViewport(Viewport),
    /// A program became current
    UseProgram(BackendProgram),
    /// An indexed draw was issued
    Draw(DrawCall),
    /// Queued work was submitted
    Flush,
    /// A window was created
    OpenWindow(String),
    /// A window was shown
    ShowWindow(String),
    /// A window was hidden
    HideWindow(String),
    /// A window's surface became current
    BindWindow(String),
    /// A window presented a frame
    SwapWindow(String),
    /// A window was closed
    CloseWindow(String),
}

/// Shared, append-only record of backend calls
#[derive(Debug, Clone, Default)]
pub struct CommandLog {
    commands: Rc<RefCell<Vec<BackendCommand>>>,
}

impl CommandLog {
    /// Create an empty log
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a command
    pub fn push(&self, command: BackendCommand) {
        trace!("headless: {:?}", command);
        self.commands.borrow_mut().push(command);
    }

    /// Copy of every recorded command
    pub fn snapshot(&self) -> Vec<BackendCommand> {
        self.commands.borrow().clone()
    }

    /// Number of recorded commands
    pub fn len(&self) -> usize {
        self.commands.borrow().len()
    }

    /// Whether nothing was recorded
    pub fn is_empty(&self) -> bool {
        self.commands.borrow().is_empty()
    }

    /// Forget every recorded command
    pub fn clear(&self) {
        self.commands.borrow_mut().clear();
    }

    /// Number of commands matching `predicate`
    pub fn count(&self, predicate: impl Fn(&BackendCommand) -> bool) -> usize {
        self.commands.borrow().iter().filter(|command| predicate(command)).count()
    }

    /// Every draw call, in issue order
    pub fn draws(&self) -> Vec<DrawCall> {
        self.commands
            .borrow()
            .iter()
            .filter_map(|command| match command {
                BackendCommand::Draw(call) => Some(*call),
                _ => None,
            })
            .collect()
    }

    /// Frames presented by the window titled `title`
    pub fn swaps(&self, title: &str) -> usize {
        self.count(|command| matches!(command, BackendCommand::SwapWindow(t) if t == title))
    }

    /// Passes drawn into the render texture `handle`
    pub fn texture_passes(&self, handle: BackendRenderTexture) -> usize {
        self.count(|command| *command == BackendCommand::BindTarget(TargetBinding::RenderTexture(handle)))
    }
}

/// Graphics backend that records instead of rendering
#[derive(Debug)]
pub struct HeadlessBackend {
    log: CommandLog,
    next_handle: u64,
    programs: BTreeSet<u64>,
    meshes: BTreeSet<u64>,
    textures: BTreeSet<u64>,
    render_textures: BTreeSet<u64>,
    invalid_releases: usize,
    fail_compiles: bool,
}

impl HeadlessBackend {
    /// Create a backend writing to `log`
    pub fn new(log: CommandLog) -> Self {
        Self {
            log,
            next_handle: 1,
            programs: BTreeSet::new(),
            meshes: BTreeSet::new(),
            textures: BTreeSet::new(),
            render_textures: BTreeSet::new(),
            invalid_releases: 0,
            fail_compiles: false,
        }
    }

    /// Make every following program compile fail
    pub fn set_fail_compiles(&mut self, fail: bool) {
        self.fail_compiles = fail;
    }

    /// The log this backend writes to
    pub fn log(&self) -> &CommandLog {
        &self.log
    }

    /// Programs not yet released
    pub fn live_programs(&self) -> usize {
        self.programs.len()
    }

    /// Meshes not yet released
    pub fn live_meshes(&self) -> usize {
        self.meshes.len()
    }

    /// Textures not yet released
    pub fn live_textures(&self) -> usize {
        self.textures.len()
    }

    /// Render textures not yet released
    pub fn live_render_textures(&self) -> usize {
        self.render_textures.len()
    }

    /// Releases of handles that were unknown or already released
    pub fn invalid_releases(&self) -> usize {
        self.invalid_releases
    }

    fn allocate(&mut self) -> u64 {
        let handle = self.next_handle;
        self.next_handle += 1;
        handle
    }

    fn release(set: &mut BTreeSet<u64>, handle: u64, invalid: &mut usize) {
        if !set.remove(&handle) {
            debug!("headless: release of unknown handle {}", handle);
            *invalid += 1;
        }
    }
}

impl GraphicsBackend for HeadlessBackend {
    fn compile_program(&mut self, vertex_src: &str, fragment_src: &str) -> BackendResult<CompiledProgram> {
        if self.fail_compiles {
            return Err(RenderError::BackendFailure("program link failed".to_string()));
        }
        if vertex_src.trim().is_empty() {
            return Err(RenderError::BackendFailure("vertex shader source is empty".to_string()));
        }
        if fragment_src.trim().is_empty() {
            return Err(RenderError::BackendFailure("fragment shader source is empty".to_string()));
        }

        let handle = BackendProgram(self.allocate());
        self.programs.insert(handle.0);
        self.log.push(BackendCommand::CompileProgram(handle));
        Ok(CompiledProgram {
            handle,
            uniforms: UniformLocations {
                mvp: 0,
                texture_sampler: 1,
                layer: 2,
            },
        })
    }

    fn destroy_program(&mut self, program: BackendProgram) {
        Self::release(&mut self.programs, program.0, &mut self.invalid_releases);
        self.log.push(BackendCommand::DestroyProgram(program));
    }

    fn upload_mesh(&mut self, _data: &MeshData) -> BackendResult<BackendMesh> {
        let handle = BackendMesh(self.allocate());
        self.meshes.insert(handle.0);
        self.log.push(BackendCommand::UploadMesh(handle));
        Ok(handle)
    }

    fn update_mesh(&mut self, mesh: BackendMesh, _data: &MeshData) -> BackendResult<()> {
        if !self.meshes.contains(&mesh.0) {
            return Err(RenderError::BackendFailure(format!("mesh buffer {} does not exist", mesh.0)));
        }
        self.log.push(BackendCommand::UpdateMesh(mesh));
        Ok(())
    }

    fn destroy_mesh(&mut self, mesh: BackendMesh) {
        Self::release(&mut self.meshes, mesh.0, &mut self.invalid_releases);
        self.log.push(BackendCommand::DestroyMesh(mesh));
    }

    fn upload_texture(&mut self, _image: &Image) -> BackendResult<BackendTexture> {
        let handle = BackendTexture(self.allocate());
        self.textures.insert(handle.0);
        self.log.push(BackendCommand::UploadTexture(handle));
        Ok(handle)
    }

    fn destroy_texture(&mut self, texture: BackendTexture) {
        Self::release(&mut self.textures, texture.0, &mut self.invalid_releases);
        self.log.push(BackendCommand::DestroyTexture(texture));
    }

    fn create_render_texture(&mut self, width: u32, height: u32) -> BackendResult<BackendRenderTexture> {
        if width > MAX_RENDER_TEXTURE_SIZE || height > MAX_RENDER_TEXTURE_SIZE {
            return Err(RenderError::BackendFailure(format!(
                "render texture {width}x{height} exceeds {MAX_RENDER_TEXTURE_SIZE}"
            )));
        }
        let handle = BackendRenderTexture(self.allocate());
        self.render_textures.insert(handle.0);
        self.log.push(BackendCommand::CreateRenderTexture(handle));
        Ok(handle)
    }

    fn destroy_render_texture(&mut self, target: BackendRenderTexture) {
        Self::release(&mut self.render_textures, target.0, &mut self.invalid_releases);
        self.log.push(BackendCommand::DestroyRenderTexture(target));
    }

    fn bind_target(&mut self, binding: TargetBinding) {
        self.log.push(BackendCommand::BindTarget(binding));
    }

    fn clear(&mut self, colour: [f32; 4]) {
        self.log.push(BackendCommand::Clear(colour));
    }

    fn set_viewport(&mut self, viewport: &Viewport) {
        self.log.push(BackendCommand::SetViewport(*viewport));
    }

    fn use_program(&mut self, program: &CompiledProgram) {
        self.log.push(BackendCommand::UseProgram(program.handle));
    }

    fn draw_indexed(&mut self, call: &DrawCall) {
        self.log.push(BackendCommand::Draw(*call));
    }

    fn flush(&mut self) {
        self.log.push(BackendCommand::Flush);
    }
}

/// Pending events per window title, shared between a provider and the test
/// or demo that feeds it
#[derive(Debug, Clone, Default)]
pub struct EventInbox {
    pending: Rc<RefCell<BTreeMap<String, Vec<RenderEvent>>>>,
}

impl EventInbox {
    /// Queue `event` for the window titled `title`
    pub fn push(&self, title: &str, event: RenderEvent) {
        self.pending.borrow_mut().entry(title.to_string()).or_default().push(event);
    }

    fn take(&self, title: &str) -> Vec<RenderEvent> {
        self.pending.borrow_mut().remove(title).unwrap_or_default()
    }
}

/// Window provider producing [`HeadlessWindow`]s
#[derive(Debug, Clone)]
pub struct HeadlessWindowProvider {
    log: CommandLog,
    inbox: EventInbox,
    refuse: bool,
}

impl HeadlessWindowProvider {
    /// Create a provider writing window calls to `log`
    pub fn new(log: CommandLog) -> Self {
        Self {
            log,
            inbox: EventInbox::default(),
            refuse: false,
        }
    }

    /// A provider whose every window creation fails
    pub fn refusing(log: CommandLog) -> Self {
        Self {
            refuse: true,
            ..Self::new(log)
        }
    }

    /// Handle for injecting input into windows created by this provider
    pub fn inbox(&self) -> EventInbox {
        self.inbox.clone()
    }
}

impl WindowProvider for HeadlessWindowProvider {
    fn create_window(&mut self, mode: VideoMode, title: &str) -> Option<Box<dyn NativeWindow>> {
        if self.refuse || mode.width == 0 || mode.height == 0 {
            return None;
        }
        self.log.push(BackendCommand::OpenWindow(title.to_string()));
        Some(Box::new(HeadlessWindow {
            title: title.to_string(),
            size: (mode.width, mode.height),
            log: self.log.clone(),
            inbox: self.inbox.clone(),
        }))
    }
}

/// A window that only exists in the command log
#[derive(Debug)]
pub struct HeadlessWindow {
    title: String,
    size: (u32, u32),
    log: CommandLog,
    inbox: EventInbox,
}

impl NativeWindow for HeadlessWindow {
    fn show(&mut self) {
        self.log.push(BackendCommand::ShowWindow(self.title.clone()));
    }

    fn hide(&mut self) {
        self.log.push(BackendCommand::HideWindow(self.title.clone()));
    }

    fn bind(&mut self) {
        self.log.push(BackendCommand::BindWindow(self.title.clone()));
    }

    fn swap(&mut self) {
        self.log.push(BackendCommand::SwapWindow(self.title.clone()));
    }

    fn size(&self) -> (u32, u32) {
        self.size
    }

    fn poll_events(&mut self) -> Vec<RenderEvent> {
        let events = self.inbox.take(&self.title);
        for event in &events {
            if let RenderEvent::Resize { width, height } = *event {
                self.size = (width, height);
            }
        }
        events
    }
}

impl Drop for HeadlessWindow {
    fn drop(&mut self) {
        self.log.push(BackendCommand::CloseWindow(self.title.clone()));
    }
}
