//=========================================================================
// Headless Backend
//=========================================================================
//
// Window-less surface and renderer for tests, tools and embedding.
//
// Architecture:
//   HeadlessController ── Sender<HostEvent> ──> HeadlessSurface
//                                                 └─ EventCollector
//                                                      ↓ poll/wait
//                                                 cursor, size, close flag,
//                                                 key callbacks
//
//   RecordingRenderer ──> RenderLog (Rc<RefCell<Vec<RenderCommand>>>)
//
// The surface changes state only while pumping events, exactly like a
// native window: moving the cursor through the controller is invisible
// until the next `poll_events`/`wait_events`.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::cell::RefCell;
use std::rc::Rc;

use crossbeam_channel::{unbounded, Sender};
use glam::{Vec3, Vec4};
use log::{debug, trace};

//=== Internal Dependencies ===============================================

use crate::core::globals::GlobalContext;
use crate::core::input::KeyInput;
use crate::core::platform_bridge::{
    BackendError, CallbackStatus, EventCollector, GeometryHandle, HostEvent, KeyCallback, ProgramHandle, Renderer,
    ShaderStage, Surface, TickControl,
};
use crate::core::value::Value;

//=========================================================================
// Surface
//=========================================================================

//=== HeadlessController ==================================================

/// Feeds scripted input into a [`HeadlessSurface`].
///
/// Cloneable; the surface closes once every controller is dropped.
#[derive(Debug, Clone)]
pub struct HeadlessController {
    sender: Sender<HostEvent>,
}

impl HeadlessController {
    pub fn move_cursor(&self, x: f64, y: f64) {
        self.send(HostEvent::CursorMoved { x, y });
    }

    pub fn key(&self, input: KeyInput) {
        self.send(HostEvent::Key(input));
    }

    pub fn resize(&self, width: u32, height: u32) {
        self.send(HostEvent::Resized { width, height });
    }

    pub fn request_close(&self) {
        self.send(HostEvent::CloseRequested);
    }

    pub fn send(&self, event: HostEvent) {
        if self.sender.send(event).is_err() {
            trace!(target: "platform", "headless surface gone; event dropped");
        }
    }
}

//=== HeadlessSurface =====================================================

pub struct HeadlessSurface {
    collector: EventCollector,
    cursor: (f64, f64),
    size: (u32, u32),
    should_close: bool,
    key_callbacks: Vec<KeyCallback>,
    presented: u64,
    close_after: Option<u64>,
}

impl HeadlessSurface {
    /// Creates a surface of `width` x `height` pixels with the cursor at
    /// the origin.
    pub fn new(width: u32, height: u32) -> (Self, HeadlessController) {
        let (sender, receiver) = unbounded();
        let surface = Self {
            collector: EventCollector::new(receiver),
            cursor: (0.0, 0.0),
            size: (width, height),
            should_close: false,
            key_callbacks: Vec::new(),
            presented: 0,
            close_after: None,
        };
        debug!(target: "platform", "Headless surface created: {}x{}", width, height);

        (surface, HeadlessController { sender })
    }

    /// Requests close once `frames` frames have been presented.
    pub fn close_after(mut self, frames: u64) -> Self {
        self.close_after = Some(frames);
        self.should_close = frames == 0;
        self
    }

    /// Key callbacks still registered.
    pub fn key_callback_count(&self) -> usize {
        self.key_callbacks.len()
    }

    /// Frames presented so far.
    pub fn presented_frames(&self) -> u64 {
        self.presented
    }

    //--- Internal Helpers -------------------------------------------------

    fn apply(&mut self, control: TickControl) {
        for event in self.collector.take_events() {
            match event {
                HostEvent::CursorMoved { x, y } => self.cursor = (x, y),
                HostEvent::Key(input) => {
                    self.key_callbacks
                        .retain_mut(|callback| callback(input) == CallbackStatus::Keep);
                }
                HostEvent::Resized { width, height } => self.size = (width, height),
                HostEvent::CloseRequested => self.should_close = true,
            }
        }

        if control == TickControl::Exit {
            debug!(target: "platform", "All controllers dropped; closing headless surface");
            self.should_close = true;
        }
    }
}

impl Surface for HeadlessSurface {
    fn poll_events(&mut self) {
        let control = self.collector.poll();
        self.apply(control);
    }

    fn wait_events(&mut self) {
        let control = self.collector.wait();
        self.apply(control);
    }

    fn should_close(&self) -> bool {
        self.should_close
    }

    fn present(&mut self) {
        self.presented += 1;
        if self.close_after.is_some_and(|limit| self.presented >= limit) {
            self.should_close = true;
        }
    }

    fn cursor_position(&self) -> (f64, f64) {
        self.cursor
    }

    fn window_size(&self) -> (u32, u32) {
        self.size
    }

    fn register_key_callback(&mut self, callback: KeyCallback) {
        self.key_callbacks.push(callback);
    }
}

//=========================================================================
// Renderer
//=========================================================================

//=== RenderCommand =======================================================

/// One call made on a [`RecordingRenderer`].
#[derive(Debug, Clone, PartialEq)]
pub enum RenderCommand {
    Clear(Vec4),
    BindProgram(ProgramHandle),
    SetUniform {
        program: ProgramHandle,
        name: String,
        value: Value,
    },
    BindGeometry(GeometryHandle),
    Draw { index_count: u32 },
    CompileProgram(ProgramHandle),
    DeleteProgram(ProgramHandle),
    CreateGeometry {
        geometry: GeometryHandle,
        vertices: usize,
        indices: usize,
    },
    DeleteGeometry(GeometryHandle),
}

/// Shared command log; the renderer appends, tests read.
pub type RenderLog = Rc<RefCell<Vec<RenderCommand>>>;

//=== RecordingRenderer ===================================================

/// Renderer that records every call instead of drawing.
///
/// Programs compile when both sources are non-empty and define `main`.
#[derive(Debug)]
pub struct RecordingRenderer {
    log: RenderLog,
    next_program: u32,
    next_geometry: u32,
}

impl RecordingRenderer {
    pub fn new() -> (Self, RenderLog) {
        let log = RenderLog::default();
        let renderer = Self {
            log: Rc::clone(&log),
            next_program: 1,
            next_geometry: 1,
        };
        (renderer, log)
    }

    fn record(&self, command: RenderCommand) {
        self.log.borrow_mut().push(command);
    }

    fn check_source(stage: ShaderStage, source: &str) -> Result<(), BackendError> {
        if source.trim().is_empty() || !source.contains("void main") {
            return Err(BackendError::ShaderCompile {
                stage,
                log: String::from("missing entry point 'main'"),
            });
        }
        Ok(())
    }
}

impl Renderer for RecordingRenderer {
    fn clear(&mut self, color: Vec4) {
        self.record(RenderCommand::Clear(color));
    }

    fn bind_program(&mut self, program: ProgramHandle) {
        self.record(RenderCommand::BindProgram(program));
    }

    fn set_uniform(&mut self, program: ProgramHandle, name: &str, value: &Value) -> bool {
        self.record(RenderCommand::SetUniform {
            program,
            name: name.to_owned(),
            value: *value,
        });
        true
    }

    fn bind_geometry(&mut self, geometry: GeometryHandle) {
        self.record(RenderCommand::BindGeometry(geometry));
    }

    fn draw(&mut self, index_count: u32) {
        self.record(RenderCommand::Draw { index_count });
    }

    fn compile_program(
        &mut self,
        vertex_source: &str,
        fragment_source: &str,
    ) -> Result<ProgramHandle, BackendError> {
        Self::check_source(ShaderStage::Vertex, vertex_source)?;
        Self::check_source(ShaderStage::Fragment, fragment_source)?;

        let program = ProgramHandle(self.next_program);
        self.next_program += 1;
        self.record(RenderCommand::CompileProgram(program));
        Ok(program)
    }

    fn delete_program(&mut self, program: ProgramHandle) {
        self.record(RenderCommand::DeleteProgram(program));
    }

    fn create_geometry(
        &mut self,
        positions: &[Vec3],
        indices: &[u32],
    ) -> Result<GeometryHandle, BackendError> {
        if indices.iter().any(|&i| i as usize >= positions.len()) {
            return Err(BackendError::ResourceCreation(format!(
                "index out of range for {} vertices",
                positions.len()
            )));
        }

        let geometry = GeometryHandle(self.next_geometry);
        self.next_geometry += 1;
        self.record(RenderCommand::CreateGeometry {
            geometry,
            vertices: positions.len(),
            indices: indices.len(),
        });
        Ok(geometry)
    }

    fn delete_geometry(&mut self, geometry: GeometryHandle) {
        self.record(RenderCommand::DeleteGeometry(geometry));
    }
}

//=== Convenience =========================================================

/// Headless global context plus its input controller and render log.
pub fn context(width: u32, height: u32) -> (GlobalContext, HeadlessController, RenderLog) {
    let (surface, controller) = HeadlessSurface::new(width, height);
    let (renderer, log) = RecordingRenderer::new();
    let global = GlobalContext::new(Box::new(surface), Box::new(renderer));
    (global, controller, log)
}

//=========================================================================
// Unit Tests
//=========================================================================
