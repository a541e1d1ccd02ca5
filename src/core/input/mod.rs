//=========================================================================
// Input Types
//
// Backend-neutral keyboard vocabulary shared by surfaces and
// input manipulator nodes.
//
//=========================================================================

//=== Submodules ==========================================================

pub mod event;

//=== Public API ==========================================================

pub use event::{KeyAction, KeyCode, KeyInput, Modifiers};
