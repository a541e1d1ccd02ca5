//=========================================================================
// Prelude
//=========================================================================
//
// Convenience module that re-exports commonly used types and traits.
//
// Usage:
//   use reactive_scene_graph::prelude::*;
//
//=========================================================================

//=== Public API ==========================================================

// Main loop
pub use crate::engine::{main_loop, Engine, EngineBuilder, LoopMode};

// Contexts and values
pub use crate::core::error::{PropertyError, SceneError};
pub use crate::core::globals::GlobalContext;
pub use crate::core::local_context::LocalContext;
pub use crate::core::value::{Value, ValueKind};

// Node abstraction
pub use crate::core::node::{adapter, adapters, Adapter, Node, NodeRef, Notifier};

// Backends
pub use crate::core::input::{KeyAction, KeyCode, KeyInput, Modifiers};
pub use crate::core::platform_bridge::{InitFlags, Renderer, Surface, SurfaceConfig, TickControl};
pub use crate::platform::{headless, WinitSurface};

// Nodes
pub use crate::nodes::*;
