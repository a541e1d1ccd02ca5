//=========================================================================
// Platform Subsystem
//
// Surface implementations behind the `Surface` trait.
//
// Architecture:
// ```text
//  WinitSurface (native window)          HeadlessSurface (scripted)
//  ┌──────────────────────────────┐     ┌─────────────────────────────┐
//  │  EventLoop::pump_app_events  │     │  HeadlessController         │
//  │   ↓                          │     │   ↓ Sender<HostEvent>       │
//  │  WindowState (handler)       │     │  EventCollector             │
//  │   ├─ InputProcessor          │     │   ↓ poll/wait               │
//  │   ├─ cursor / size / close   │     │  cursor / size / close      │
//  │   └─ key callbacks           │     │  key callbacks              │
//  └──────────────────────────────┘     └─────────────────────────────┘
//                 ↑                                   ↑
//                 └──── Engine: poll_events() / wait_events() ────┘
// ```
//
// Key Design Decisions:
// - **Pumped, not run**: the main loop owns control flow, so the native
//   event loop is pumped once per iteration instead of taking over the
//   thread with `run_app`.
// - **Main thread requirement**: winit mandates the main thread on macOS,
//   so the surface is created and pumped on the thread calling `init`.
// - **Close is a flag**: close requests never exit the event loop; the
//   main loop polls `should_close` and stops on its own terms.
//
//=========================================================================

//=== Submodules ==========================================================

pub mod headless;
mod input_processor;

//=== External Crates =====================================================

use std::time::Duration;

use log::*;
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop},
    platform::pump_events::{EventLoopExtPumpEvents, PumpStatus},
    window::{CursorGrabMode, Fullscreen, Window, WindowAttributes, WindowId},
};

//=== Internal Imports ====================================================

use crate::core::platform_bridge::{BackendError, CallbackStatus, KeyCallback, Surface, SurfaceConfig};
use input_processor::InputProcessor;

//=== WinitSurface ========================================================

/// Native window surface driven by winit.
///
/// Not `Send`: it must stay on the thread that created it.
pub struct WinitSurface {
    event_loop: EventLoop<()>,
    state: WindowState,
}

impl WinitSurface {
    /// Pumps needed for the platform to deliver `resumed` after startup.
    const STARTUP_PUMPS: usize = 8;

    /// Opens the window described by `config`.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError`] if the event loop or the window cannot be
    /// created.
    pub fn create(config: &SurfaceConfig) -> Result<Self, BackendError> {
        debug!(target: "platform", "Creating winit event loop");
        let event_loop = EventLoop::new()?;

        let mut surface = Self {
            event_loop,
            state: WindowState::new(config.clone()),
        };

        for _ in 0..Self::STARTUP_PUMPS {
            surface.pump(Some(Duration::ZERO));

            if let Some(err) = surface.state.creation_error.take() {
                return Err(BackendError::WindowCreation(err));
            }
            if surface.state.window.is_some() {
                return Ok(surface);
            }
        }

        Err(BackendError::ResourceCreation(String::from(
            "platform never resumed the application; no window was created",
        )))
    }

    pub fn window(&self) -> Option<&Window> {
        self.state.window.as_ref()
    }

    //--- Internal Helpers -------------------------------------------------

    fn pump(&mut self, timeout: Option<Duration>) {
        if let PumpStatus::Exit(code) = self.event_loop.pump_app_events(timeout, &mut self.state) {
            info!(target: "platform", "Event loop exited with code {}", code);
            self.state.should_close = true;
        }
    }
}

impl Surface for WinitSurface {
    fn poll_events(&mut self) {
        self.pump(Some(Duration::ZERO));
    }

    fn wait_events(&mut self) {
        self.pump(None);
    }

    fn should_close(&self) -> bool {
        self.state.should_close
    }

    fn present(&mut self) {
        if let Some(window) = &self.state.window {
            window.pre_present_notify();
        }
    }

    fn cursor_position(&self) -> (f64, f64) {
        self.state.cursor
    }

    fn window_size(&self) -> (u32, u32) {
        (self.state.size.width, self.state.size.height)
    }

    fn register_key_callback(&mut self, callback: KeyCallback) {
        self.state.key_callbacks.push(callback);
    }
}

//=== WindowState =========================================================

/// Application handler receiving winit events between pumps.
struct WindowState {
    config: SurfaceConfig,

    /// OS window handle (None until `resumed()` called).
    window: Option<Window>,
    creation_error: Option<winit::error::OsError>,

    cursor: (f64, f64),
    size: PhysicalSize<u32>,
    should_close: bool,

    input_processor: InputProcessor,
    key_callbacks: Vec<KeyCallback>,
}

impl WindowState {
    fn new(config: SurfaceConfig) -> Self {
        let size = PhysicalSize::new(config.width, config.height);
        Self {
            config,
            window: None,
            creation_error: None,
            cursor: (0.0, 0.0),
            size,
            should_close: false,
            input_processor: InputProcessor::new(),
            key_callbacks: Vec::new(),
        }
    }

    fn window_attributes(&self) -> WindowAttributes {
        let attrs = WindowAttributes::default()
            .with_title(self.config.title.clone())
            .with_inner_size(PhysicalSize::new(self.config.width, self.config.height));

        if self.config.flags.fullscreen {
            attrs.with_fullscreen(Some(Fullscreen::Borderless(None)))
        } else {
            attrs
        }
    }

    fn hide_cursor(window: &Window) {
        window.set_cursor_visible(false);

        let grabbed = window
            .set_cursor_grab(CursorGrabMode::Locked)
            .or_else(|_| window.set_cursor_grab(CursorGrabMode::Confined));

        if let Err(e) = grabbed {
            warn!(target: "platform", "Cursor grab unavailable: {}", e);
        }
    }
}

//=== Winit Integration ===================================================

impl ApplicationHandler for WindowState {
    /// Called when app becomes active (startup or mobile resume).
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            debug!(target: "platform", "Window already exists (mobile resume?)");
            return;
        }

        match event_loop.create_window(self.window_attributes()) {
            Ok(window) => {
                if self.config.flags.hide_cursor {
                    Self::hide_cursor(&window);
                }
                self.size = window.inner_size();
                info!(
                    target: "platform",
                    "Window created: {}x{} @ {}x DPI",
                    self.size.width,
                    self.size.height,
                    window.scale_factor()
                );
                self.window = Some(window);
            }
            Err(e) => {
                error!(target: "platform", "Window creation failed: {}", e);
                self.creation_error = Some(e);
            }
        }
    }

    fn window_event(&mut self, _event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested | WindowEvent::Destroyed => {
                info!(target: "platform", "Window close requested");
                self.should_close = true;
            }

            WindowEvent::Resized(size) => {
                trace!(target: "platform", "Resized to {}x{}", size.width, size.height);
                self.size = size;
            }

            WindowEvent::ModifiersChanged(state) => {
                trace!(target: "platform::input", "Modifiers changed: {:?}", state);
                self.input_processor.update_modifiers(state.state());
            }

            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = (position.x, position.y);
            }

            WindowEvent::KeyboardInput { event: key_event, .. } => {
                match self.input_processor.process_key_event(&key_event) {
                    Some(input) => {
                        self.key_callbacks
                            .retain_mut(|callback| callback(input) == CallbackStatus::Keep);
                    }
                    None => trace!(target: "platform::input", "Unmapped key ignored"),
                }
            }

            _ => {}
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
