//=========================================================================
// Node Handle
//=========================================================================
//
// Shared, reference-counted handle to a node and its outgoing bindings.
//
// Architecture:
//   NodeRef ── Rc ──> NodeCell { node: RefCell<Box<dyn Node>>,
//                                connections: RefCell<Vec<PropertyConnection>> }
//
// Ownership:
//   GroupNode children: strong handles (the tree owns its nodes)
//   PropertyConnection targets: weak handles (bindings never own)
//
// Cascade:
//   set_property(name, v)
//     1. node.set_property(name, v)             (local effect)
//     2. for each connection on `name`, in registration order:
//          v' = adapters(v)  (applied to the original v)
//          target.set_property(target_name, v')  (recursive, depth + 1)
//   The first failing step aborts the cascade. Steps already applied stay.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use log::{debug, trace, warn};

//=== Internal Dependencies ===============================================

use crate::core::error::{PropertyError, SceneError};
use crate::core::globals::GlobalContext;
use crate::core::local_context::LocalContext;
use crate::core::node::connection::{Adapter, PropertyConnection};
use crate::core::node::{Node, Notifier};
use crate::core::value::Value;
use crate::nodes::GroupNode;

//=== Constants ===========================================================

/// Maximum nesting of cascaded sets before a cascade is aborted.
///
/// Reached only by cyclic (or absurdly long) binding chains.
pub const MAX_CASCADE_DEPTH: usize = 64;

//=== NodeCell ============================================================

pub(crate) struct NodeCell {
    type_name: &'static str,
    node: RefCell<Box<dyn Node>>,
    connections: RefCell<Vec<PropertyConnection>>,
}

//=== NodeRef =============================================================

/// Shared handle to a scene graph node.
///
/// Cloning the handle shares the node. The node lives as long as any
/// strong handle (typically its parent group, or the application for the
/// root) exists.
#[derive(Clone)]
pub struct NodeRef {
    cell: Rc<NodeCell>,
}

impl NodeRef {
    //--- Construction -----------------------------------------------------

    pub fn new<N: Node>(node: N) -> Self {
        Self {
            cell: Rc::new(NodeCell {
                type_name: node.type_name(),
                node: RefCell::new(Box::new(node)),
                connections: RefCell::new(Vec::new()),
            }),
        }
    }

    //--- Identity ---------------------------------------------------------

    pub fn type_name(&self) -> &'static str {
        self.cell.type_name
    }

    /// Whether both handles refer to the same node.
    pub fn ptr_eq(&self, other: &NodeRef) -> bool {
        Rc::ptr_eq(&self.cell, &other.cell)
    }

    //--- Typed Access -----------------------------------------------------

    /// Runs `f` on the node if it is a `T`. Returns `None` otherwise.
    ///
    /// # Panics
    ///
    /// Panics if the node is currently mutably borrowed (i.e. called from
    /// inside its own `process` or setter).
    pub fn with<T: Node, R>(&self, f: impl FnOnce(&T) -> R) -> Option<R> {
        let guard = self.cell.node.borrow();
        let node: &dyn Node = &**guard;
        node.as_any().downcast_ref::<T>().map(f)
    }

    /// Mutable counterpart of [`NodeRef::with`]. Bypasses the cascade.
    pub fn with_mut<T: Node, R>(&self, f: impl FnOnce(&mut T) -> R) -> Option<R> {
        let mut guard = self.cell.node.borrow_mut();
        let node: &mut dyn Node = &mut **guard;
        node.as_any_mut().downcast_mut::<T>().map(f)
    }

    //--- Graph Structure --------------------------------------------------

    /// Appends `child` to this group.
    ///
    /// # Panics
    ///
    /// Panics if this node is not a [`GroupNode`], or if `child` is this
    /// node or one of its ancestors.
    pub fn add_child(&self, child: NodeRef) {
        if child.contains(self) {
            panic!(
                "cannot add {} as a child of itself or of one of its descendants",
                child.type_name()
            );
        }

        let added = self.with_mut(|group: &mut GroupNode| group.push(child));
        if added.is_none() {
            panic!("add_child called on {}, which is not a GroupNode", self.type_name());
        }
    }

    /// Whether `needle` is this node or lives in its subtree.
    fn contains(&self, needle: &NodeRef) -> bool {
        if self.ptr_eq(needle) {
            return true;
        }

        self.with(|group: &GroupNode| group.children().iter().any(|c| c.contains(needle)))
            .unwrap_or(false)
    }

    //--- Traversal --------------------------------------------------------

    /// Processes the node, then applies whatever it published.
    pub fn process(&self, local: &mut LocalContext, global: &mut GlobalContext) -> Result<(), SceneError> {
        let mut notifier = Notifier::new();

        {
            let mut guard = self.cell.node.try_borrow_mut().map_err(|_| self.busy())?;
            guard.process(local, global, &mut notifier)?;
        }

        if notifier.is_empty() {
            return Ok(());
        }

        trace!(target: "rsg::node", "{} publishing queued values", self.type_name());
        for (name, value) in notifier.drain() {
            self.set_property(&name, value)?;
        }
        Ok(())
    }

    /// Releases the node's backend resources and drops its bindings.
    ///
    /// Groups destroy their children first.
    pub fn destroy(&self, global: &mut GlobalContext) {
        debug!(target: "rsg::node", "destroying {}", self.type_name());
        self.cell.node.borrow_mut().destroy(global);
        self.cell.connections.borrow_mut().clear();
    }

    //--- Properties -------------------------------------------------------

    pub fn get_property(&self, name: &str) -> Result<Value, PropertyError> {
        let guard = self.cell.node.try_borrow().map_err(|_| self.busy())?;
        guard.get_property(name)
    }

    /// Sets `name` locally, then cascades through every binding on `name`.
    pub fn set_property(&self, name: &str, value: Value) -> Result<(), PropertyError> {
        self.set_property_at_depth(name, value, 0)
    }

    fn set_property_at_depth(&self, name: &str, value: Value, depth: usize) -> Result<(), PropertyError> {
        if depth > MAX_CASCADE_DEPTH {
            warn!(
                target: "rsg::node",
                "cascade aborted at {}.{}: more than {} nested sets",
                self.type_name(),
                name,
                MAX_CASCADE_DEPTH
            );
            return Err(PropertyError::CascadeTooDeep { depth: MAX_CASCADE_DEPTH });
        }

        {
            let mut guard = self.cell.node.try_borrow_mut().map_err(|_| self.busy())?;
            guard.set_property(name, value)?;
        }
        trace!(target: "rsg::node", "{}.{} = {}", self.type_name(), name, value);

        // Snapshot so handlers may connect or disconnect while cascading.
        let outgoing: Vec<PropertyConnection> = self
            .cell
            .connections
            .borrow()
            .iter()
            .filter(|c| c.source_property == name)
            .cloned()
            .collect();

        for connection in outgoing {
            let Some(target) = connection.target.upgrade() else {
                warn!(
                    target: "rsg::node",
                    "skipping binding {}.{} -> {}: target node was dropped",
                    self.type_name(),
                    name,
                    connection.target_property
                );
                continue;
            };

            let target = NodeRef { cell: target };
            target.set_property_at_depth(&connection.target_property, connection.adapt(value), depth + 1)?;
        }
        Ok(())
    }

    //--- Connections ------------------------------------------------------

    /// Binds `name` on this node to `target_property` on `target`.
    ///
    /// Returns `false` (and registers nothing) when the same
    /// (name, target, target_property) binding already exists.
    pub fn connect_property(&self, name: &str, target: &NodeRef, target_property: &str) -> bool {
        self.connect_property_with_adapters(name, target, target_property, Vec::new())
    }

    /// Like [`NodeRef::connect_property`], passing values through
    /// `adapters` left to right on the way.
    pub fn connect_property_with_adapters(
        &self,
        name: &str,
        target: &NodeRef,
        target_property: &str,
        adapters: impl IntoIterator<Item = Adapter>,
    ) -> bool {
        let mut connections = self.cell.connections.borrow_mut();

        if connections.iter().any(|c| c.links(name, &target.cell, target_property)) {
            debug!(
                target: "rsg::node",
                "ignoring duplicate binding {}.{} -> {}.{}",
                self.type_name(),
                name,
                target.type_name(),
                target_property
            );
            return false;
        }

        connections.push(PropertyConnection {
            source_property: name.to_owned(),
            target: Rc::downgrade(&target.cell),
            target_property: target_property.to_owned(),
            adapters: adapters.into_iter().collect(),
        });
        debug!(
            target: "rsg::node",
            "bound {}.{} -> {}.{}",
            self.type_name(),
            name,
            target.type_name(),
            target_property
        );
        true
    }

    /// Removes the binding `name` → `target.target_property`.
    ///
    /// Returns whether a binding was removed.
    pub fn disconnect_property(&self, name: &str, target: &NodeRef, target_property: &str) -> bool {
        let mut connections = self.cell.connections.borrow_mut();
        let before = connections.len();
        connections.retain(|c| !c.links(name, &target.cell, target_property));
        connections.len() != before
    }

    /// Number of outgoing bindings registered on this node.
    pub fn connection_count(&self) -> usize {
        self.cell.connections.borrow().len()
    }

    //--- Internal Helpers -------------------------------------------------

    fn busy(&self) -> PropertyError {
        PropertyError::NodeBusy {
            node: self.type_name(),
        }
    }
}

impl<N: Node> From<N> for NodeRef {
    fn from(node: N) -> Self {
        Self::new(node)
    }
}

impl fmt::Debug for NodeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("type", &self.type_name())
            .field("ptr", &Rc::as_ptr(&self.cell))
            .field("connections", &self.connection_count())
            .finish()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::node::adapters::scale;
    use crate::core::node::adapter;
    use crate::core::node::property::{self, Property};
    use crate::nodes::CallbackNode;

    //=====================================================================
    // Test Nodes
    //=====================================================================

    /// Stores the last value set on `value` and counts the sets.
    #[derive(Default)]
    struct Sink {
        value: Option<Value>,
        sets: usize,
    }

    impl Node for Sink {
        fn type_name(&self) -> &'static str {
            "Sink"
        }

        fn get_property(&self, name: &str) -> Result<Value, PropertyError> {
            property::get(self, SINK_PROPERTIES, name)
        }

        fn set_property(&mut self, name: &str, value: Value) -> Result<(), PropertyError> {
            property::set(self, SINK_PROPERTIES, name, value)
        }
    }

    static SINK_PROPERTIES: &[Property<Sink>] = &[
        Property::read_write(
            "value",
            |s: &Sink| s.value.unwrap_or(Value::int(0)),
            |s: &mut Sink, v| {
                s.value = Some(v);
                s.sets += 1;
                Ok(())
            },
        ),
        Property::pass_through("relay"),
    ];

    fn sink() -> NodeRef {
        NodeRef::new(Sink::default())
    }

    fn sets(node: &NodeRef) -> usize {
        node.with(|s: &Sink| s.sets).unwrap()
    }

    //=====================================================================
    // Cascade Tests
    //=====================================================================

    #[test]
    fn set_without_bindings_is_local() {
        let a = sink();
        a.set_property("value", Value::int(5)).unwrap();
        assert_eq!(a.get_property("value"), Ok(Value::int(5)));
    }

    #[test]
    fn binding_forwards_value() {
        let a = sink();
        let b = sink();
        assert!(a.connect_property("value", &b, "value"));

        a.set_property("value", Value::int(7)).unwrap();

        assert_eq!(b.get_property("value"), Ok(Value::int(7)));
    }

    #[test]
    fn adapter_chain_composes_left_to_right_once() {
        let a = sink();
        let b = sink();
        let f = adapter(|v| Value::int(v.as_int().unwrap() + 1));
        let g = adapter(|v| Value::int(v.as_int().unwrap() * 10));
        a.connect_property_with_adapters("value", &b, "value", vec![f, g]);

        a.set_property("value", Value::int(2)).unwrap();

        assert_eq!(b.get_property("value"), Ok(Value::int(30)));
        assert_eq!(sets(&b), 1);
    }

    #[test]
    fn each_binding_adapts_the_original_value() {
        let a = sink();
        let b = sink();
        let c = sink();
        a.connect_property_with_adapters("value", &b, "value", vec![scale(2.0)]);
        a.connect_property("value", &c, "value");

        a.set_property("value", Value::float(1.5)).unwrap();

        assert_eq!(b.get_property("value"), Ok(Value::float(3.0)));
        assert_eq!(c.get_property("value"), Ok(Value::float(1.5)));
    }

    #[test]
    fn cascade_is_transitive() {
        let a = sink();
        let b = sink();
        let c = sink();
        a.connect_property("value", &b, "value");
        b.connect_property("value", &c, "value");

        a.set_property("value", Value::int(1)).unwrap();

        assert_eq!(c.get_property("value"), Ok(Value::int(1)));
    }

    #[test]
    fn pass_through_property_only_cascades() {
        let a = sink();
        let b = sink();
        a.connect_property("relay", &b, "value");

        a.set_property("relay", Value::int(4)).unwrap();

        assert_eq!(sets(&a), 0);
        assert_eq!(b.get_property("value"), Ok(Value::int(4)));
    }

    #[test]
    fn bindings_fire_in_registration_order() {
        let order = Rc::new(RefCell::new(Vec::new()));
        let a = sink();
        let first = sink();
        let second = sink();

        let log = Rc::clone(&order);
        a.connect_property_with_adapters(
            "value",
            &first,
            "value",
            vec![adapter(move |v| {
                log.borrow_mut().push("first");
                v
            })],
        );
        let log = Rc::clone(&order);
        a.connect_property_with_adapters(
            "value",
            &second,
            "value",
            vec![adapter(move |v| {
                log.borrow_mut().push("second");
                v
            })],
        );

        a.set_property("value", Value::int(1)).unwrap();

        assert_eq!(*order.borrow(), vec!["first", "second"]);
    }

    //=====================================================================
    // Duplicate / Disconnect Tests
    //=====================================================================

    #[test]
    fn duplicate_binding_is_ignored() {
        let a = sink();
        let b = sink();

        assert!(a.connect_property("value", &b, "value"));
        assert!(!a.connect_property("value", &b, "value"));
        assert!(!a.connect_property_with_adapters("value", &b, "value", vec![scale(2.0)]));
        assert_eq!(a.connection_count(), 1);

        a.set_property("value", Value::int(3)).unwrap();
        assert_eq!(sets(&b), 1);
    }

    #[test]
    fn distinct_target_property_is_not_a_duplicate() {
        let a = sink();
        let b = sink();

        assert!(a.connect_property("value", &b, "value"));
        assert!(a.connect_property("value", &b, "relay"));
        assert_eq!(a.connection_count(), 2);
    }

    #[test]
    fn disconnect_removes_binding() {
        let a = sink();
        let b = sink();
        a.connect_property("value", &b, "value");

        assert!(a.disconnect_property("value", &b, "value"));
        assert!(!a.disconnect_property("value", &b, "value"));

        a.set_property("value", Value::int(3)).unwrap();
        assert_eq!(sets(&b), 0);
    }

    #[test]
    fn dropped_target_is_skipped() {
        let a = sink();
        let c = sink();
        {
            let b = sink();
            a.connect_property("value", &b, "value");
        }
        a.connect_property("value", &c, "value");

        assert_eq!(a.set_property("value", Value::int(9)), Ok(()));
        assert_eq!(c.get_property("value"), Ok(Value::int(9)));
    }

    //=====================================================================
    // Failure Tests
    //=====================================================================

    #[test]
    fn unknown_target_property_aborts_cascade() {
        let a = sink();
        let b = sink();
        let c = sink();
        a.connect_property("value", &b, "missing");
        a.connect_property("value", &c, "value");

        let err = a.set_property("value", Value::int(1)).unwrap_err();

        assert_eq!(err, PropertyError::unknown("Sink", "missing"));
        // source keeps its value, later bindings never ran
        assert_eq!(a.get_property("value"), Ok(Value::int(1)));
        assert_eq!(sets(&c), 0);
    }

    #[test]
    fn unknown_source_property_is_reported() {
        let a = sink();
        assert_eq!(
            a.set_property("nope", Value::int(1)),
            Err(PropertyError::unknown("Sink", "nope"))
        );
        assert_eq!(a.get_property("nope"), Err(PropertyError::unknown("Sink", "nope")));
    }

    #[test]
    fn cyclic_bindings_hit_depth_limit() {
        let a = sink();
        let b = sink();
        a.connect_property("value", &b, "value");
        b.connect_property("value", &a, "value");

        let err = a.set_property("value", Value::int(1)).unwrap_err();

        assert_eq!(err, PropertyError::CascadeTooDeep { depth: MAX_CASCADE_DEPTH });
    }

    #[test]
    fn self_binding_on_other_property_is_allowed() {
        let a = sink();
        a.connect_property("relay", &a, "value");

        a.set_property("relay", Value::int(6)).unwrap();

        assert_eq!(a.get_property("value"), Ok(Value::int(6)));
    }

    //=====================================================================
    // Structure Tests
    //=====================================================================

    #[test]
    fn typed_access() {
        let a = sink();
        assert_eq!(a.with(|s: &Sink| s.sets), Some(0));
        assert_eq!(a.with(|_: &GroupNode| ()), None);
        assert_eq!(a.type_name(), "Sink");
    }

    #[test]
    fn clones_share_the_node() {
        let a = sink();
        let alias = a.clone();
        alias.set_property("value", Value::int(2)).unwrap();

        assert!(a.ptr_eq(&alias));
        assert_eq!(a.get_property("value"), Ok(Value::int(2)));
    }

    #[test]
    #[should_panic(expected = "which is not a GroupNode")]
    fn add_child_on_leaf_panics() {
        let leaf = sink();
        leaf.add_child(sink());
    }

    #[test]
    #[should_panic(expected = "child of itself")]
    fn add_group_to_itself_panics() {
        let group = NodeRef::new(GroupNode::new());
        group.add_child(group.clone());
    }

    #[test]
    #[should_panic(expected = "child of itself")]
    fn add_ancestor_as_child_panics() {
        let outer = NodeRef::new(GroupNode::new());
        let inner = NodeRef::new(GroupNode::new());
        outer.add_child(inner.clone());
        inner.add_child(outer.clone());
    }

    #[test]
    fn reentrant_access_during_process_reports_busy() {
        let slot: Rc<RefCell<Option<NodeRef>>> = Rc::new(RefCell::new(None));
        let seen = Rc::new(RefCell::new(None));

        let slot_in_cb = Rc::clone(&slot);
        let seen_in_cb = Rc::clone(&seen);
        let node = NodeRef::new(CallbackNode::new(move |_, _| {
            if let Some(me) = slot_in_cb.borrow().as_ref() {
                *seen_in_cb.borrow_mut() = Some(me.get_property("anything"));
            }
        }));
        *slot.borrow_mut() = Some(node.clone());

        let (mut global, _controller, _log) = crate::platform::headless::context(64, 64);
        node.process(&mut LocalContext::new(), &mut global).unwrap();

        assert_eq!(
            *seen.borrow(),
            Some(Err(PropertyError::NodeBusy { node: "CallbackNode" }))
        );
        slot.borrow_mut().take();
    }
}
