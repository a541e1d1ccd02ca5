//=========================================================================
// Platform Bridge
//=========================================================================
//
// Bridges backend services (window system, graphics API) with the scene
// graph core.
//
// The core depends only on the traits defined here, so backends can be
// swapped (winit window, headless test harness) without touching nodes.
//
// Components:
// - `interface`: service traits, handles, configuration, errors
// - `event_collector`: channel-side event collection for hosted surfaces
//
//=========================================================================

//=== Module Declarations =================================================

pub(crate) mod event_collector;
pub mod interface;

//=== Public API ==========================================================

pub(crate) use event_collector::EventCollector;
pub use event_collector::{HostEvent, TickControl};
pub use interface::{
    BackendError, CallbackStatus, GeometryHandle, InitFlags, KeyCallback, ProgramHandle, Renderer, ShaderStage,
    Surface, SurfaceConfig,
};
