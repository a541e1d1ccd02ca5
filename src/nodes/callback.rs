//=========================================================================
// Callback Node
//=========================================================================
//
// Runs an application closure during traversal.
//
// The closure sees the scope's local context (and may modify it like any
// other node) plus read access to the global context. Useful for probes,
// per-frame application logic and tests.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;

//=== Internal Dependencies ===============================================

use crate::core::error::SceneError;
use crate::core::globals::GlobalContext;
use crate::core::local_context::LocalContext;
use crate::core::node::{Node, Notifier};

//=== CallbackNode ========================================================

pub type Callback = Box<dyn FnMut(&mut LocalContext, &GlobalContext)>;

pub struct CallbackNode {
    callback: Callback,
}

impl CallbackNode {
    pub fn new(callback: impl FnMut(&mut LocalContext, &GlobalContext) + 'static) -> Self {
        Self {
            callback: Box::new(callback),
        }
    }
}

impl fmt::Debug for CallbackNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackNode").finish_non_exhaustive()
    }
}

impl Node for CallbackNode {
    fn type_name(&self) -> &'static str {
        "CallbackNode"
    }

    fn process(
        &mut self,
        local: &mut LocalContext,
        global: &mut GlobalContext,
        _notifier: &mut Notifier,
    ) -> Result<(), SceneError> {
        (self.callback)(local, global);
        Ok(())
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
