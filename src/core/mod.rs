//=========================================================================
// Core
//
// Backend-independent scene graph machinery.
//
// Responsibilities:
// - Tagged property values and their type errors
// - Global (process-wide) and local (per-traversal) contexts
// - The node abstraction: trait, shared handle, property tables and
//   reactive connections
// - Input vocabulary and the platform bridge traits that backends
//   implement
//
// Notes:
// Nothing here talks to a window system or graphics API directly; all
// backend work goes through `platform_bridge::{Surface, Renderer}`.
//
//=========================================================================

pub mod error;
pub mod globals;
pub mod input;
pub mod local_context;
pub mod node;
pub mod platform_bridge;
pub mod value;
