//=========================================================================
// Local Context
//=========================================================================
//
// Per-traversal render state: the active shader program and an ordered,
// capacity-bounded uniform mapping.
//
// Architecture:
//   Engine ── reset_to_defaults() ──> LocalContext (fresh each traversal)
//   GroupNode ── clone() ──> snapshot ── children ──> restore snapshot
//   Nodes ── set_uniform() / program ──> LocalContext
//
// Scoping rule: state written inside a group never leaks to the group's
// later siblings. Within a group, state written by one child is visible
// to every child after it.
//
//=========================================================================

//=== External Dependencies ===============================================

use indexmap::IndexMap;
use log::{debug, trace, warn};

//=== Internal Dependencies ===============================================

use crate::core::platform_bridge::ProgramHandle;
use crate::core::value::Value;

//=== LocalContext ========================================================

/// Transient render state threaded through one traversal.
///
/// `Clone` produces an independent deep copy; mutating the copy never
/// affects the original.
#[derive(Debug, Clone)]
pub struct LocalContext {
    /// Shader program used by subsequent draws. `ProgramHandle::NONE` when
    /// nothing has been bound in the current scope.
    pub program: ProgramHandle,

    uniforms: IndexMap<String, Value>,
    capacity: usize,
}

impl LocalContext {
    /// Uniform capacity used when none is configured.
    pub const DEFAULT_MAX_UNIFORMS: usize = 16;

    /// Creates an empty context with the default uniform capacity.
    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_MAX_UNIFORMS)
    }

    /// Creates an empty context holding at most `capacity` uniforms.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn with_capacity(capacity: usize) -> Self {
        assert!(capacity > 0, "uniform capacity must be greater than 0");

        Self {
            program: ProgramHandle::NONE,
            uniforms: IndexMap::with_capacity(capacity),
            capacity,
        }
    }

    /// Clears the program and every uniform. Capacity is kept.
    pub fn reset_to_defaults(&mut self) {
        self.program = ProgramHandle::NONE;
        self.uniforms.clear();
    }

    //--- Uniforms ---------------------------------------------------------

    /// Inserts or overwrites the uniform `name`.
    ///
    /// - existing name: value replaced in place, position unchanged
    /// - new name below capacity: appended after the existing entries
    /// - new name at capacity: dropped with a warning
    ///
    /// Returns whether the value was stored.
    pub fn set_uniform(&mut self, name: &str, value: Value) -> bool {
        if let Some(slot) = self.uniforms.get_mut(name) {
            trace!(target: "rsg::local_context", "overwrote uniform '{}' = {}", name, value);
            *slot = value;
            return true;
        }

        if self.uniforms.len() >= self.capacity {
            warn!(
                target: "rsg::local_context",
                "uniform capacity ({}) reached, dropping '{}'",
                self.capacity,
                name
            );
            return false;
        }

        self.uniforms.insert(name.to_owned(), value);
        debug!(
            target: "rsg::local_context",
            "inserted uniform '{}' ({}/{})",
            name,
            self.uniforms.len(),
            self.capacity
        );
        true
    }

    pub fn uniform(&self, name: &str) -> Option<&Value> {
        self.uniforms.get(name)
    }

    /// Uniforms in insertion order.
    pub fn uniforms(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.uniforms.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn uniform_count(&self) -> usize {
        self.uniforms.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for LocalContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Equal when program, capacity and the ordered uniform sequence match.
impl PartialEq for LocalContext {
    fn eq(&self, other: &Self) -> bool {
        self.program == other.program
            && self.capacity == other.capacity
            && self.uniforms.len() == other.uniforms.len()
            && self.uniforms.iter().eq(other.uniforms.iter())
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
