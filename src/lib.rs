//=========================================================================
// Reactive Scene Graph: Library Root
//
// A retained scene graph whose nodes expose named, typed properties that
// can be bound to each other, so that setting one property cascades
// through adapter chains into others.
//
// Responsibilities:
// - `core`: values, contexts, the node abstraction and backend traits
// - `nodes`: concrete node kinds (groups, camera, shader, mesh, input
//   manipulators, debugging sinks)
// - `platform`: winit window surface and the headless test backend
// - `engine`: the main loop
//
// Typical usage:
// ```no_run
// use reactive_scene_graph::prelude::*;
//
// let (global, _controller, _log) = headless::context(800, 600);
// let root = NodeRef::new(GroupNode::new());
// EngineBuilder::new().build(global).run(&root)?;
// ```
//
//=========================================================================

//--- Public Modules ------------------------------------------------------

pub mod core;
pub mod engine;
pub mod nodes;
pub mod platform;
pub mod prelude;

//--- Public Exports ------------------------------------------------------

pub use engine::{main_loop, Engine, EngineBuilder, LoopMode};
