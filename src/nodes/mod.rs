//=========================================================================
// Node Library
//=========================================================================
//
// Concrete scene graph nodes.
//
// Structure:
//   GroupNode                    scoping container
//   CameraNode, ShaderNode,
//   UniformSetterNode            local context writers
//   MeshNode, ScreenNode         drawing
//   Mouse/Trackball/Keyboard     input manipulators (publish via bindings)
//   CallbackNode,
//   PropertyPrinterNode          application hooks and debugging
//
//=========================================================================

//=== Module Declarations =================================================

mod callback;
pub mod camera;
mod group;
mod keyboard;
mod mesh;
mod mouse;
mod property_printer;
mod screen;
pub mod shader;
mod trackball;
mod uniform_setter;

//=== Public API ==========================================================

pub use callback::{Callback, CallbackNode};
pub use camera::{CameraNode, Projection};
pub use group::GroupNode;
pub use keyboard::KeyboardManipulatorNode;
pub use mesh::MeshNode;
pub use mouse::MouseManipulatorNode;
pub use property_printer::PropertyPrinterNode;
pub use screen::ScreenNode;
pub use shader::ShaderNode;
pub use trackball::TrackballManipulatorNode;
pub use uniform_setter::UniformSetterNode;
