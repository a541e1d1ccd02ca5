//=========================================================================
// Engine
//
// Main loop driving traversals of a scene graph.
//
// Architecture:
// ```text
//     EngineBuilder  ──build(global)──>  Engine  ──run(root)──>  traversal count
//         │                                │
//         ├─ with_frequency()              └─ tick(root) per iteration:
//         └─ with_uniform_capacity()          pump → reset → clear → process
//                                              → count → present → sleep
// ```
//
// Loop modes (chosen once, from the frequency):
// - Retained (frequency <= 0): block on input, one traversal per wake.
// - Immediate (frequency > 0): poll input, traverse, sleep the residual
//   of `1 / frequency` seconds.
//
// The loop ends when the surface reports it should close.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::thread;
use std::time::{Duration, Instant};

use glam::Vec4;
use log::{debug, info};

//=== Internal Dependencies ===============================================

use crate::core::error::SceneError;
use crate::core::globals::GlobalContext;
use crate::core::local_context::LocalContext;
use crate::core::node::NodeRef;
use crate::core::platform_bridge::TickControl;

//=== LoopMode ============================================================

/// How the main loop waits between traversals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopMode {
    /// Block until input arrives, then traverse once.
    Retained,

    /// Poll input and traverse once per `period`.
    Immediate { period: Duration },
}

impl LoopMode {
    /// Non-positive (or NaN) frequencies select retained mode.
    ///
    /// Frequencies so low that the period overflows `Duration` sleep for
    /// `Duration::MAX`.
    pub fn from_frequency(frequency: f64) -> Self {
        if frequency > 0.0 && frequency.is_finite() {
            Self::Immediate {
                period: Duration::try_from_secs_f64(1.0 / frequency).unwrap_or(Duration::MAX),
            }
        } else {
            Self::Retained
        }
    }
}

//=== EngineBuilder =======================================================

/// Builder for configuring and constructing an [`Engine`].
///
/// # Default Values
///
/// - **Frequency**: 0.0 (retained mode)
/// - **Uniform capacity**: [`LocalContext::DEFAULT_MAX_UNIFORMS`]
///
/// # Examples
///
/// ```no_run
/// use reactive_scene_graph::core::node::NodeRef;
/// use reactive_scene_graph::engine::EngineBuilder;
/// use reactive_scene_graph::nodes::GroupNode;
/// use reactive_scene_graph::platform::headless;
///
/// let (global, _controller, _log) = headless::context(800, 600);
/// let root = NodeRef::new(GroupNode::new());
///
/// let frames = EngineBuilder::new()
///     .with_frequency(60.0)
///     .build(global)
///     .run(&root)?;
/// # Ok::<(), reactive_scene_graph::core::error::SceneError>(())
/// ```
#[derive(Debug, Clone)]
pub struct EngineBuilder {
    frequency: f64,
    uniform_capacity: usize,
}

impl EngineBuilder {
    pub fn new() -> Self {
        Self {
            frequency: 0.0,
            uniform_capacity: LocalContext::DEFAULT_MAX_UNIFORMS,
        }
    }

    /// Sets the traversal frequency in Hz; `<= 0` selects retained mode.
    ///
    /// Default: 0.0
    pub fn with_frequency(mut self, frequency: f64) -> Self {
        self.frequency = frequency;
        self
    }

    /// Sets the maximum number of uniforms one traversal can accumulate.
    ///
    /// Default: 16
    ///
    /// # Panics
    ///
    /// Panics if `capacity == 0`.
    pub fn with_uniform_capacity(mut self, capacity: usize) -> Self {
        assert!(capacity > 0, "Uniform capacity must be positive");
        self.uniform_capacity = capacity;
        self
    }

    /// Builds the engine around an initialized global context.
    pub fn build(self, global: GlobalContext) -> Engine {
        let mode = LoopMode::from_frequency(self.frequency);
        info!(
            target: "rsg::engine",
            "Building engine ({:?}, uniform capacity: {})",
            mode,
            self.uniform_capacity
        );

        Engine {
            global,
            local: LocalContext::with_capacity(self.uniform_capacity),
            mode,
        }
    }
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

//=== Engine ==============================================================

/// Owns the global context and the per-traversal local context.
pub struct Engine {
    global: GlobalContext,
    local: LocalContext,
    mode: LoopMode,
}

impl Engine {
    //--- Accessors --------------------------------------------------------

    pub fn mode(&self) -> LoopMode {
        self.mode
    }

    pub fn global(&self) -> &GlobalContext {
        &self.global
    }

    /// Needed for node construction and `NodeRef::destroy`.
    pub fn global_mut(&mut self) -> &mut GlobalContext {
        &mut self.global
    }

    pub fn into_global(self) -> GlobalContext {
        self.global
    }

    //--- Execution --------------------------------------------------------

    /// Runs one loop iteration.
    ///
    /// Returns `Exit` without traversing if the surface already asked to
    /// close, and `Exit` after the traversal if the request arrived while
    /// pumping.
    ///
    /// # Errors
    ///
    /// Returns the first error raised while processing `root`.
    pub fn tick(&mut self, root: &NodeRef) -> Result<TickControl, SceneError> {
        iterate(self.mode, root, &mut self.local, &mut self.global)
    }

    /// Ticks until the surface asks to close; returns the final traversal
    /// count.
    pub fn run(&mut self, root: &NodeRef) -> Result<u64, SceneError> {
        info!(target: "rsg::engine", "Starting main loop ({:?})", self.mode);

        while let TickControl::Continue = self.tick(root)? {}

        let count = self.global.traversal_count();
        info!(target: "rsg::engine", "Main loop exited after {} traversals", count);
        Ok(count)
    }
}

//=== Free Function =======================================================

/// Runs the main loop on `root` with a default-capacity local context.
///
/// `frequency <= 0` selects retained mode. Returns the final traversal
/// count.
pub fn main_loop(root: &NodeRef, frequency: f64, global: &mut GlobalContext) -> Result<u64, SceneError> {
    let mode = LoopMode::from_frequency(frequency);
    let mut local = LocalContext::new();
    info!(target: "rsg::engine", "Starting main loop ({:?})", mode);

    while let TickControl::Continue = iterate(mode, root, &mut local, global)? {}

    let count = global.traversal_count();
    info!(target: "rsg::engine", "Main loop exited after {} traversals", count);
    Ok(count)
}

//--- Iteration -----------------------------------------------------------

const CLEAR_COLOR: Vec4 = Vec4::new(0.0, 0.0, 0.0, 1.0);

fn iterate(
    mode: LoopMode,
    root: &NodeRef,
    local: &mut LocalContext,
    global: &mut GlobalContext,
) -> Result<TickControl, SceneError> {
    if global.surface().should_close() {
        return Ok(TickControl::Exit);
    }

    let frame_start = Instant::now();

    //--- Step 1: Pump backend events ----------------------------------
    match mode {
        LoopMode::Retained => global.surface_mut().wait_events(),
        LoopMode::Immediate { .. } => global.surface_mut().poll_events(),
    }

    //--- Step 2: Traverse -----------------------------------------------
    local.reset_to_defaults();
    global.renderer_mut().clear(CLEAR_COLOR);
    root.process(local, global)?;
    global.increment_traversal_count();
    global.surface_mut().present();

    debug!(
        target: "rsg::engine",
        "Traversal {} finished in {:?}",
        global.traversal_count(),
        frame_start.elapsed()
    );

    //--- Step 3: Maintain pacing ----------------------------------------
    if let LoopMode::Immediate { period } = mode {
        let elapsed = frame_start.elapsed();
        if elapsed < period {
            thread::sleep(period - elapsed);
        }
    }

    if global.surface().should_close() {
        Ok(TickControl::Exit)
    } else {
        Ok(TickControl::Continue)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::node::adapters::scale;
    use crate::core::value::Value;
    use crate::nodes::camera::{PROJECTION_UNIFORM, VIEW_UNIFORM};
    use crate::nodes::shader::{BASIC_FRAGMENT_SHADER, BASIC_VERTEX_SHADER};
    use crate::nodes::{CallbackNode, CameraNode, GroupNode, MeshNode, MouseManipulatorNode, Projection, ShaderNode};
    use crate::platform::headless::{self, HeadlessSurface, RecordingRenderer, RenderCommand};
    use glam::Vec3;
    use std::cell::RefCell;
    use std::f32::consts::PI;
    use std::rc::Rc;

    fn closing_after(frames: u64) -> (GlobalContext, headless::HeadlessController, headless::RenderLog) {
        let (surface, controller) = HeadlessSurface::new(64, 64);
        let (renderer, log) = RecordingRenderer::new();
        let global = GlobalContext::new(Box::new(surface.close_after(frames)), Box::new(renderer));
        (global, controller, log)
    }

    fn counter() -> (NodeRef, Rc<RefCell<u32>>) {
        let calls = Rc::new(RefCell::new(0));
        let seen = Rc::clone(&calls);
        let node = NodeRef::new(CallbackNode::new(move |_local, _global| *seen.borrow_mut() += 1));
        (node, calls)
    }

    //=====================================================================
    // LoopMode Tests
    //=====================================================================

    #[test]
    fn non_positive_frequency_is_retained() {
        assert_eq!(LoopMode::from_frequency(0.0), LoopMode::Retained);
        assert_eq!(LoopMode::from_frequency(-5.0), LoopMode::Retained);
        assert_eq!(LoopMode::from_frequency(f64::NAN), LoopMode::Retained);
    }

    #[test]
    fn positive_frequency_is_immediate() {
        assert_eq!(
            LoopMode::from_frequency(50.0),
            LoopMode::Immediate {
                period: Duration::from_millis(20)
            }
        );
    }

    #[test]
    fn tiny_frequency_caps_period() {
        let capped = LoopMode::Immediate { period: Duration::MAX };
        assert_eq!(LoopMode::from_frequency(1e-20), capped);
        assert_eq!(LoopMode::from_frequency(1e-309), capped);
    }

    //=====================================================================
    // EngineBuilder Tests
    //=====================================================================

    #[test]
    fn builder_defaults() {
        let builder = EngineBuilder::new();
        assert_eq!(builder.frequency, 0.0);
        assert_eq!(builder.uniform_capacity, LocalContext::DEFAULT_MAX_UNIFORMS);
    }

    #[test]
    #[should_panic(expected = "Uniform capacity must be positive")]
    fn builder_rejects_zero_capacity() {
        EngineBuilder::new().with_uniform_capacity(0);
    }

    #[test]
    fn builder_applies_settings() {
        let (global, _controller, _log) = headless::context(64, 64);
        let engine = EngineBuilder::new()
            .with_frequency(100.0)
            .with_uniform_capacity(4)
            .build(global);

        assert_eq!(
            engine.mode(),
            LoopMode::Immediate {
                period: Duration::from_millis(10)
            }
        );
        assert_eq!(engine.local.capacity(), 4);
    }

    //=====================================================================
    // Immediate Mode Tests
    //=====================================================================

    #[test]
    fn immediate_runs_until_close() {
        let (global, _controller, log) = closing_after(3);
        let (root, calls) = counter();

        let frames = EngineBuilder::new().with_frequency(1000.0).build(global).run(&root).unwrap();

        assert_eq!(frames, 3);
        assert_eq!(*calls.borrow(), 3);
        let clears = log.borrow().iter().filter(|c| matches!(c, RenderCommand::Clear(_))).count();
        assert_eq!(clears, 3);
    }

    #[test]
    fn immediate_sleeps_between_traversals() {
        let (global, _controller, _log) = closing_after(3);
        let root = NodeRef::new(GroupNode::new());

        let start = Instant::now();
        EngineBuilder::new().with_frequency(50.0).build(global).run(&root).unwrap();

        assert!(start.elapsed() >= Duration::from_millis(40));
    }

    #[test]
    fn local_context_is_reset_each_traversal() {
        let (global, _controller, _log) = closing_after(2);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let record = Rc::clone(&seen);
        let root = NodeRef::new(CallbackNode::new(move |local, _global| {
            record.borrow_mut().push(local.uniform_count());
            local.set_uniform("u_leak", Value::int(1));
        }));

        EngineBuilder::new().with_frequency(1000.0).build(global).run(&root).unwrap();

        assert_eq!(*seen.borrow(), vec![0, 0]);
    }

    #[test]
    fn closed_surface_does_not_traverse() {
        let (global, _controller, _log) = closing_after(0);
        let (root, calls) = counter();
        let mut engine = EngineBuilder::new().with_frequency(1000.0).build(global);

        assert_eq!(engine.tick(&root).unwrap(), TickControl::Exit);
        assert_eq!(*calls.borrow(), 0);
        assert_eq!(engine.global().traversal_count(), 0);
    }

    //=====================================================================
    // Retained Mode Tests
    //=====================================================================

    #[test]
    fn retained_traverses_once_per_wake() {
        let (global, controller, _log) = headless::context(64, 64);
        let (root, calls) = counter();
        let mut engine = EngineBuilder::new().build(global);

        controller.move_cursor(1.0, 1.0);
        controller.move_cursor(2.0, 2.0);
        assert_eq!(engine.tick(&root).unwrap(), TickControl::Continue);
        assert_eq!(*calls.borrow(), 1);

        controller.move_cursor(3.0, 3.0);
        assert_eq!(engine.tick(&root).unwrap(), TickControl::Continue);
        assert_eq!(*calls.borrow(), 2);

        controller.request_close();
        assert_eq!(engine.tick(&root).unwrap(), TickControl::Exit);
        assert_eq!(engine.tick(&root).unwrap(), TickControl::Exit);
        assert_eq!(engine.global().traversal_count(), 3);
    }

    #[test]
    fn main_loop_reports_final_count() {
        let (mut global, controller, _log) = headless::context(64, 64);
        let (root, _calls) = counter();

        controller.move_cursor(5.0, 5.0);
        controller.request_close();
        let frames = main_loop(&root, 0.0, &mut global).unwrap();

        assert_eq!(frames, 1);
        assert_eq!(global.surface().cursor_position(), (5.0, 5.0));
    }

    //=====================================================================
    // Scene Tests
    //=====================================================================

    #[test]
    fn camera_shader_mesh_scene() {
        let (mut global, _controller, log) = closing_after(1);
        let camera = CameraNode::new(
            Vec3::new(0.0, 0.0, 10.0),
            PI,
            0.0,
            45.0,
            1.0,
            0.01,
            100.0,
            Projection::Perspective,
        );
        let (view, projection) = (camera.view_matrix(), camera.projection_matrix());
        let shader = ShaderNode::from_sources(&mut global, BASIC_VERTEX_SHADER, BASIC_FRAGMENT_SHADER).unwrap();
        let program = shader.program();
        let mesh = MeshNode::triangle(&mut global).unwrap();
        let geometry = mesh.geometry().unwrap();

        let observed = Rc::new(RefCell::new(None));
        let record = Rc::clone(&observed);
        let probe = NodeRef::new(CallbackNode::new(move |local, _global| {
            *record.borrow_mut() = Some(local.clone());
        }));

        let mesh = NodeRef::new(mesh);
        let root = NodeRef::new(GroupNode::with_children([
            NodeRef::new(camera),
            NodeRef::new(shader),
            probe,
            mesh.clone(),
        ]));

        let mut engine = EngineBuilder::new().with_frequency(1000.0).build(global);
        assert_eq!(engine.run(&root).unwrap(), 1);

        let local = observed.borrow().clone().unwrap();
        assert_eq!(local.program, program);
        assert_eq!(local.uniform(VIEW_UNIFORM), Some(&Value::Mat4(view)));
        assert_eq!(local.uniform(PROJECTION_UNIFORM), Some(&Value::Mat4(projection)));

        assert!(log.borrow().contains(&RenderCommand::SetUniform {
            program,
            name: VIEW_UNIFORM.into(),
            value: Value::Mat4(view),
        }));
        assert!(log.borrow().contains(&RenderCommand::Draw { index_count: 3 }));

        root.destroy(engine.global_mut());
        assert_eq!(mesh.with(|m: &MeshNode| m.geometry()), Some(None));
        assert!(log.borrow().contains(&RenderCommand::DeleteGeometry(geometry)));
    }

    #[test]
    fn mouse_drives_camera_through_loop() {
        let (global, controller, _log) = headless::context(200, 200);
        let mut engine = EngineBuilder::new().with_frequency(1000.0).build(global);

        let mouse = NodeRef::new(MouseManipulatorNode::new(engine.global()));
        let camera = NodeRef::new(CameraNode::perspective_default(1.0));
        mouse.connect_property_with_adapters("xChange", &camera, "yawChange", vec![scale(0.01)]);
        let root = NodeRef::new(GroupNode::with_children([mouse, camera.clone()]));

        controller.move_cursor(10.0, 0.0);
        engine.tick(&root).unwrap();

        let yaw = camera.with(|c: &CameraNode| c.yaw()).unwrap();
        assert!((yaw - (PI + 0.1)).abs() < 1e-6);
    }
}
