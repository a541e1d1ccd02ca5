//=========================================================================
// Platform Bridge Interface
//=========================================================================
//
// Contract between the scene graph and its backend services.
//
// Components:
// - `Surface`: window + input service (events, close flag, cursor, keys)
// - `Renderer`: drawing service (clear, programs, uniforms, geometry)
// - `SurfaceConfig` / `InitFlags`: display configuration
// - `BackendError`: failures reported by either service
//
// The core only calls through these traits; it never touches a window
// system or graphics API directly.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;
use std::ops::BitOr;
use std::path::PathBuf;

use glam::{Vec3, Vec4};

//=== Internal Dependencies ===============================================

use crate::core::input::KeyInput;
use crate::core::value::Value;

//=== Backend Handles =====================================================

/// Linked shader program owned by the renderer. `NONE` unbinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ProgramHandle(pub u32);

impl ProgramHandle {
    pub const NONE: Self = Self(0);

    pub fn is_none(self) -> bool {
        self == Self::NONE
    }
}

/// Drawable geometry (vertex array + index buffer). `NONE` unbinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct GeometryHandle(pub u32);

impl GeometryHandle {
    pub const NONE: Self = Self(0);

    pub fn is_none(self) -> bool {
        self == Self::NONE
    }
}

//=== InitFlags ===========================================================

/// Feature flags applied when the surface is created.
///
/// Flags compose with `|`:
/// ```rust
/// # use reactive_scene_graph::core::platform_bridge::InitFlags;
/// let flags = InitFlags::FULLSCREEN | InitFlags::HIDE_CURSOR;
/// assert!(flags.fullscreen && flags.hide_cursor);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InitFlags {
    /// Use the primary monitor's resolution instead of the requested size.
    pub fullscreen: bool,

    /// Hide the cursor and grab it inside the surface.
    pub hide_cursor: bool,
}

impl InitFlags {
    pub const NONE: Self = Self {
        fullscreen: false,
        hide_cursor: false,
    };

    pub const FULLSCREEN: Self = Self {
        fullscreen: true,
        hide_cursor: false,
    };

    pub const HIDE_CURSOR: Self = Self {
        fullscreen: false,
        hide_cursor: true,
    };
}

impl BitOr for InitFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self {
            fullscreen: self.fullscreen || rhs.fullscreen,
            hide_cursor: self.hide_cursor || rhs.hide_cursor,
        }
    }
}

//=== SurfaceConfig =======================================================

/// Requested display configuration.
///
/// The negotiated size may differ (fullscreen); query it back through
/// [`Surface::window_size`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurfaceConfig {
    pub width: u32,
    pub height: u32,
    pub title: String,
    pub flags: InitFlags,
}

impl SurfaceConfig {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            title: String::from("RSG"),
            flags: InitFlags::NONE,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_flags(mut self, flags: InitFlags) -> Self {
        self.flags = flags;
        self
    }
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self::new(1024, 768)
    }
}

//=== Surface =============================================================

/// Whether a key callback stays registered after handling an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackStatus {
    Keep,
    Remove,
}

/// Callback invoked by the surface for every keyboard event.
pub type KeyCallback = Box<dyn FnMut(KeyInput) -> CallbackStatus>;

/// Window and input service.
///
/// Implementations: [`crate::platform::WinitSurface`] for a real window,
/// [`crate::platform::headless::HeadlessSurface`] for scripted input.
pub trait Surface {
    /// Processes pending events without blocking.
    fn poll_events(&mut self);

    /// Blocks until at least one event arrives, then processes it and
    /// anything else already pending.
    fn wait_events(&mut self);

    /// Whether the user or the OS asked the surface to close.
    fn should_close(&self) -> bool;

    /// Presents the finished frame.
    fn present(&mut self);

    /// Cursor position in surface pixels, top-left origin.
    fn cursor_position(&self) -> (f64, f64);

    /// Actual surface size in pixels.
    fn window_size(&self) -> (u32, u32);

    /// Registers a callback fired for each key press, repeat and release.
    ///
    /// A callback returning [`CallbackStatus::Remove`] is dropped and never
    /// called again.
    fn register_key_callback(&mut self, callback: KeyCallback);
}

//=== Renderer ============================================================

/// Drawing service.
///
/// Uniform uploads receive the tagged [`Value`]; the implementation picks
/// the typed upload call per variant.
pub trait Renderer {
    fn clear(&mut self, color: Vec4);

    fn bind_program(&mut self, program: ProgramHandle);

    /// Uploads `value` to the uniform named `name` of `program`.
    ///
    /// Returns `false` when the program has no such uniform.
    fn set_uniform(&mut self, program: ProgramHandle, name: &str, value: &Value) -> bool;

    fn bind_geometry(&mut self, geometry: GeometryHandle);

    /// Draws `index_count` indices of the bound geometry as triangles.
    fn draw(&mut self, index_count: u32);

    fn compile_program(
        &mut self,
        vertex_source: &str,
        fragment_source: &str,
    ) -> Result<ProgramHandle, BackendError>;

    fn delete_program(&mut self, program: ProgramHandle);

    fn create_geometry(
        &mut self,
        positions: &[Vec3],
        indices: &[u32],
    ) -> Result<GeometryHandle, BackendError>;

    fn delete_geometry(&mut self, geometry: GeometryHandle);
}

//=== ShaderStage =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Vertex => f.write_str("vertex"),
            Self::Fragment => f.write_str("fragment"),
        }
    }
}

//=== BackendError ========================================================

/// Failures reported by backend services.
///
/// These surface as constructor failures; the core never retries.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("{stage} shader compile error: {log}")]
    ShaderCompile { stage: ShaderStage, log: String },

    #[error("program link error: {0}")]
    ProgramLink(String),

    #[error("resource creation failed: {0}")]
    ResourceCreation(String),

    #[error("failed to read shader source '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("event loop creation failed: {0}")]
    EventLoopCreation(#[from] winit::error::EventLoopError),

    #[error("window creation failed: {0}")]
    WindowCreation(#[from] winit::error::OsError),
}

//=========================================================================
// Unit Tests
//=========================================================================
