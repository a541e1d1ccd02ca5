//=========================================================================
// Node Abstraction
//=========================================================================
//
// Polymorphic unit of the scene graph.
//
// Architecture:
//   Node (trait)        capability set: type name, process, properties, destroy
//   NodeRef             shared handle: owns the node + its outgoing connections
//   Property<N>         static name-keyed property tables for concrete nodes
//   PropertyConnection  binding source property → target node property
//
// Nodes never call each other directly while processing. A node that wants
// to publish a value queues it on the `Notifier`; the handle applies the
// queued sets (and their cascades) once the node has finished processing,
// before the traversal moves on to the next node.
//
//=========================================================================

//=== Module Declarations =================================================

pub mod connection;
mod node_ref;
pub mod property;

//=== External Dependencies ===============================================

use std::any::Any;

//=== Internal Dependencies ===============================================

use crate::core::error::{PropertyError, SceneError};
use crate::core::globals::GlobalContext;
use crate::core::local_context::LocalContext;
use crate::core::value::Value;

//=== Public API ==========================================================

pub use connection::{adapter, adapters, Adapter};
pub use node_ref::{NodeRef, MAX_CASCADE_DEPTH};
pub use property::Property;

//=== AsAny ===============================================================

/// Downcasting support for `dyn Node`.
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

//=== Node ================================================================

/// Capability set every scene graph node implements.
///
/// Only `type_name` is required. Defaults: `process` does nothing, every
/// property name is unknown, `destroy` releases nothing.
pub trait Node: AsAny {
    /// Stable diagnostic name of the concrete node kind.
    fn type_name(&self) -> &'static str;

    /// Runs the node for one traversal.
    ///
    /// `local` is the render state of the enclosing scope, `global` the
    /// process-wide state. Values to publish go through `notifier`.
    fn process(
        &mut self,
        _local: &mut LocalContext,
        _global: &mut GlobalContext,
        _notifier: &mut Notifier,
    ) -> Result<(), SceneError> {
        Ok(())
    }

    fn get_property(&self, name: &str) -> Result<Value, PropertyError> {
        Err(PropertyError::unknown(self.type_name(), name))
    }

    /// Applies `value` locally. Cascading to connected nodes is handled by
    /// [`NodeRef::set_property`], not here.
    fn set_property(&mut self, name: &str, _value: Value) -> Result<(), PropertyError> {
        Err(PropertyError::unknown(self.type_name(), name))
    }

    /// Releases backend resources held by the node.
    fn destroy(&mut self, _global: &mut GlobalContext) {}
}

//=== Notifier ============================================================

/// Queue of property sets a node publishes while processing.
///
/// Each entry is applied through [`NodeRef::set_property`] on the
/// publishing node, in queue order, as soon as its `process` returns.
#[derive(Debug, Default)]
pub struct Notifier {
    pending: Vec<(String, Value)>,
}

impl Notifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publishes `value` on the node's own property `name`.
    pub fn notify(&mut self, name: impl Into<String>, value: Value) {
        self.pending.push((name.into(), value));
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub(crate) fn drain(&mut self) -> std::vec::Drain<'_, (String, Value)> {
        self.pending.drain(..)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
