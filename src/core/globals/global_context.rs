//=========================================================================
// Global Context
//=========================================================================
//
// Process-wide state shared by every traversal.
//
// Contains:
// - surface: window + input service (events, close flag, cursor, keys)
// - renderer: drawing service (clear, programs, uniforms, geometry)
// - traversal_count: completed traversals, advanced only by the main loop
//
// Nodes receive `&mut GlobalContext` during `process` and `destroy`.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::sync::atomic::{AtomicBool, Ordering};

use log::info;

//=== Internal Dependencies ===============================================

use crate::core::platform_bridge::{BackendError, Renderer, Surface, SurfaceConfig};
use crate::platform::WinitSurface;

//=== Initialization Guard ================================================

static WINDOW_INITIALIZED: AtomicBool = AtomicBool::new(false);

/// Marks the surface as taken.
///
/// # Panics
///
/// Panics if `flag` is already set.
fn claim_surface(flag: &AtomicBool) {
    if flag.swap(true, Ordering::SeqCst) {
        panic!("GlobalContext::init called twice; the surface can only be created once per process");
    }
}

/// Undoes [`claim_surface`] after a failed creation so `init` may be retried.
fn release_surface(flag: &AtomicBool) {
    flag.store(false, Ordering::SeqCst);
}

//=== GlobalContext =======================================================

/// Persistent state owned by the application for the process lifetime.
pub struct GlobalContext {
    surface: Box<dyn Surface>,
    renderer: Box<dyn Renderer>,
    traversal_count: u64,
}

impl GlobalContext {
    /// Wraps already-created backend services.
    ///
    /// Used for headless setups and custom backends; the once-per-process
    /// rule applies only to [`GlobalContext::init`].
    pub fn new(surface: Box<dyn Surface>, renderer: Box<dyn Renderer>) -> Self {
        Self {
            surface,
            renderer,
            traversal_count: 0,
        }
    }

    /// Creates the native window described by `config` and pairs it with
    /// `renderer`.
    ///
    /// # Panics
    ///
    /// Panics when called again after a successful call in the same
    /// process. A call that returned `Err` does not count.
    pub fn init(config: SurfaceConfig, renderer: Box<dyn Renderer>) -> Result<Self, BackendError> {
        claim_surface(&WINDOW_INITIALIZED);

        let surface = match WinitSurface::create(&config) {
            Ok(surface) => surface,
            Err(e) => {
                release_surface(&WINDOW_INITIALIZED);
                return Err(e);
            }
        };
        let (width, height) = surface.window_size();
        info!(target: "rsg::global", "Surface initialized: {}x{} '{}'", width, height, config.title);

        Ok(Self::new(Box::new(surface), renderer))
    }

    //--- Queries ----------------------------------------------------------

    /// Completed traversals so far.
    pub fn traversal_count(&self) -> u64 {
        self.traversal_count
    }

    /// Actual surface size in pixels.
    pub fn screen_size(&self) -> (u32, u32) {
        self.surface.window_size()
    }

    //--- Services ---------------------------------------------------------

    pub fn surface(&self) -> &dyn Surface {
        self.surface.as_ref()
    }

    pub fn surface_mut(&mut self) -> &mut dyn Surface {
        self.surface.as_mut()
    }

    pub fn renderer_mut(&mut self) -> &mut dyn Renderer {
        self.renderer.as_mut()
    }

    //--- Main Loop --------------------------------------------------------

    pub(crate) fn increment_traversal_count(&mut self) {
        self.traversal_count += 1;
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::headless::{HeadlessSurface, RecordingRenderer};

    fn headless() -> GlobalContext {
        let (surface, _controller) = HeadlessSurface::new(640, 480);
        let (renderer, _log) = RecordingRenderer::new();
        GlobalContext::new(Box::new(surface), Box::new(renderer))
    }

    #[test]
    fn new_context_starts_at_zero_traversals() {
        let global = headless();
        assert_eq!(global.traversal_count(), 0);
    }

    #[test]
    fn traversal_count_only_increments() {
        let mut global = headless();
        global.increment_traversal_count();
        global.increment_traversal_count();
        assert_eq!(global.traversal_count(), 2);
    }

    #[test]
    fn screen_size_comes_from_surface() {
        let global = headless();
        assert_eq!(global.screen_size(), (640, 480));
    }

    #[test]
    #[should_panic(expected = "called twice")]
    fn second_claim_panics() {
        let flag = AtomicBool::new(false);
        claim_surface(&flag);
        claim_surface(&flag);
    }

    #[test]
    fn released_claim_can_be_retried() {
        let flag = AtomicBool::new(false);
        claim_surface(&flag);
        release_surface(&flag);
        claim_surface(&flag);
        assert!(flag.load(Ordering::SeqCst));
    }
}
