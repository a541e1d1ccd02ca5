//=========================================================================
// Group Node
//=========================================================================
//
// Ordered container implementing the local-context scoping rule.
//
// Traversal:
//   snapshot = local.clone()
//   child[0] → child[1] → … → child[n-1]   (same local, left to right)
//   local = snapshot                        (always, even on error)
//
// A child sees everything its earlier siblings wrote; nothing written
// inside the group is visible after it.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::core::error::SceneError;
use crate::core::globals::GlobalContext;
use crate::core::local_context::LocalContext;
use crate::core::node::{Node, NodeRef, Notifier};

//=== GroupNode ===========================================================

#[derive(Debug, Default)]
pub struct GroupNode {
    children: Vec<NodeRef>,
}

impl GroupNode {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a group owning `children`, in order.
    pub fn with_children(children: impl IntoIterator<Item = NodeRef>) -> Self {
        Self {
            children: children.into_iter().collect(),
        }
    }

    pub fn children(&self) -> &[NodeRef] {
        &self.children
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Appends without the cycle check; use [`NodeRef::add_child`].
    pub(crate) fn push(&mut self, child: NodeRef) {
        self.children.push(child);
    }
}

impl Node for GroupNode {
    fn type_name(&self) -> &'static str {
        "GroupNode"
    }

    fn process(
        &mut self,
        local: &mut LocalContext,
        global: &mut GlobalContext,
        _notifier: &mut Notifier,
    ) -> Result<(), SceneError> {
        if self.children.is_empty() {
            return Ok(());
        }

        let saved = local.clone();
        let result = self.children.iter().try_for_each(|child| child.process(local, global));
        *local = saved;

        result
    }

    fn destroy(&mut self, global: &mut GlobalContext) {
        for child in self.children.drain(..) {
            child.destroy(global);
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
