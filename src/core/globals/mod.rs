//=========================================================================
// Global State
//=========================================================================
//
// Process-wide context handed to every node during traversal.
//
// Architecture:
//   GlobalContext: Surface + Renderer + traversal counter
//
//=========================================================================

//=== Module Declarations =================================================

mod global_context;

//=== Public API ==========================================================

pub use global_context::GlobalContext;
