//=========================================================================
// Property Connections
//=========================================================================
//
// Outgoing bindings from a source property to a property of another node.
//
// Architecture:
//   source.set("name", v)
//     └─> for each connection on "name" (registration order):
//           adapters[0] → adapters[1] → … → target.set("targetName", v')
//
// A connection holds its target weakly. Ownership of nodes stays with the
// graph (groups own children); a binding never keeps a node alive.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;
use std::rc::{Rc, Weak};

//=== Internal Dependencies ===============================================

use crate::core::node::node_ref::NodeCell;
use crate::core::value::Value;

//=== Adapter =============================================================

/// Pure transform applied to a value travelling along a connection.
pub type Adapter = Rc<dyn Fn(Value) -> Value>;

/// Wraps a closure as an [`Adapter`].
pub fn adapter(f: impl Fn(Value) -> Value + 'static) -> Adapter {
    Rc::new(f)
}

/// Ready-made adapters.
pub mod adapters {
    use super::{adapter, Adapter};
    use crate::core::value::Value;

    /// Multiplies numeric payloads by `factor`.
    ///
    /// `Int` becomes `Float`; vectors and matrices scale component-wise;
    /// `Pointer` passes through unchanged.
    pub fn scale(factor: f32) -> Adapter {
        adapter(move |value| match value {
            Value::Int(v) => Value::Float(v as f32 * factor),
            Value::Float(v) => Value::Float(v * factor),
            Value::Vec2(v) => Value::Vec2(v * factor),
            Value::Vec3(v) => Value::Vec3(v * factor),
            Value::Vec4(v) => Value::Vec4(v * factor),
            Value::Mat4(m) => Value::Mat4(m * factor),
            Value::Pointer(_) => value,
        })
    }

    /// `Int` → `Float`; anything else unchanged.
    pub fn to_float() -> Adapter {
        adapter(|value| match value {
            Value::Int(v) => Value::Float(v as f32),
            other => other,
        })
    }

    /// `Float` → `Int` (truncating); anything else unchanged.
    pub fn to_int() -> Adapter {
        adapter(|value| match value {
            Value::Float(v) => Value::Int(v as i32),
            other => other,
        })
    }

    /// Arithmetic negation; `Pointer` unchanged.
    pub fn negate() -> Adapter {
        adapter(|value| match value {
            Value::Int(v) => Value::Int(-v),
            Value::Float(v) => Value::Float(-v),
            Value::Vec2(v) => Value::Vec2(-v),
            Value::Vec3(v) => Value::Vec3(-v),
            Value::Vec4(v) => Value::Vec4(-v),
            Value::Mat4(m) => Value::Mat4(-m),
            Value::Pointer(_) => value,
        })
    }
}

//=== PropertyConnection ==================================================

/// One binding registered on a source node.
#[derive(Clone)]
pub(crate) struct PropertyConnection {
    pub(crate) source_property: String,
    pub(crate) target: Weak<NodeCell>,
    pub(crate) target_property: String,
    pub(crate) adapters: Vec<Adapter>,
}

impl PropertyConnection {
    /// Whether this binding links the same (source, target, target name)
    /// triple. Adapters do not participate.
    pub(crate) fn links(&self, source_property: &str, target: &Rc<NodeCell>, target_property: &str) -> bool {
        self.source_property == source_property
            && self.target_property == target_property
            && std::ptr::eq(self.target.as_ptr(), Rc::as_ptr(target))
    }

    /// Runs the adapter chain left to right over `value`.
    pub(crate) fn adapt(&self, value: Value) -> Value {
        self.adapters.iter().fold(value, |v, f| f(v))
    }
}

impl fmt::Debug for PropertyConnection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyConnection")
            .field("source_property", &self.source_property)
            .field("target_property", &self.target_property)
            .field("target_alive", &(self.target.strong_count() > 0))
            .field("adapters", &self.adapters.len())
            .finish()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
