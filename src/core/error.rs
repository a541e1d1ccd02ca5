//=========================================================================
// Scene Errors
//=========================================================================
//
// Recoverable failures raised by property access, cascades and traversal.
//
// Contract violations (double init, self-parenting groups, `add_child`
// on a leaf) are not represented here: they panic at the call site.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::core::platform_bridge::BackendError;
use crate::core::value::TypeMismatch;

//=== PropertyError =======================================================

/// Failure of a `get_property` / `set_property` call or of a cascade step.
///
/// A cascade stops at the first failing step and returns that error; steps
/// that already ran are not rolled back.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PropertyError {
    /// The node does not define a property with this name.
    #[error("unknown property '{name}' on {node}")]
    UnknownProperty { node: &'static str, name: String },

    /// The property exists but has no getter.
    #[error("property '{name}' on {node} is write-only")]
    WriteOnly { node: &'static str, name: String },

    /// The value's variant does not match the property's type.
    #[error(transparent)]
    TypeMismatch(#[from] TypeMismatch),

    /// Nested sets exceeded the cascade bound (usually a cyclic binding).
    #[error("property cascade exceeded {depth} nested sets")]
    CascadeTooDeep { depth: usize },

    /// The node is already borrowed further up the call chain.
    #[error("{node} is busy (re-entrant access during process or cascade)")]
    NodeBusy { node: &'static str },
}

impl PropertyError {
    pub(crate) fn unknown(node: &'static str, name: &str) -> Self {
        Self::UnknownProperty {
            node,
            name: name.to_owned(),
        }
    }
}

//=== SceneError ==========================================================

/// Failure of a traversal or of the main loop.
#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error(transparent)]
    Property(#[from] PropertyError),

    #[error(transparent)]
    Backend(#[from] BackendError),
}

//=========================================================================
// Unit Tests
//=========================================================================
