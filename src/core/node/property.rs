//=========================================================================
// Property Tables
//=========================================================================
//
// Name-keyed property descriptors for concrete node types.
//
// Each node kind declares one static table:
//
// ```text
// static PROPERTIES: &[Property<CameraNode>] = &[
//     Property::read_write("fov", get_fov, set_fov),
//     Property::read_only("viewMatrix", get_view),
//     Property::write_only("yawChange", add_yaw),
//     Property::pass_through("xyDelta"),
// ];
// ```
//
// Access rules:
// - unknown name        → PropertyError::UnknownProperty
// - get without getter  → PropertyError::WriteOnly
// - set without setter  → Ok, no local change (the cascade still runs)
//
//=========================================================================

//=== External Dependencies ===============================================

use log::debug;

//=== Internal Dependencies ===============================================

use crate::core::error::PropertyError;
use crate::core::node::Node;
use crate::core::value::{TypeMismatch, Value};

//=== Accessor Types ======================================================

pub type Getter<N> = fn(&N) -> Value;
pub type Setter<N> = fn(&mut N, Value) -> Result<(), TypeMismatch>;

//=== Property ============================================================

/// Descriptor of one named property of node type `N`.
pub struct Property<N> {
    pub name: &'static str,
    pub get: Option<Getter<N>>,
    pub set: Option<Setter<N>>,
}

impl<N> Property<N> {
    pub const fn read_write(name: &'static str, get: Getter<N>, set: Setter<N>) -> Self {
        Self {
            name,
            get: Some(get),
            set: Some(set),
        }
    }

    pub const fn read_only(name: &'static str, get: Getter<N>) -> Self {
        Self {
            name,
            get: Some(get),
            set: None,
        }
    }

    pub const fn write_only(name: &'static str, set: Setter<N>) -> Self {
        Self {
            name,
            get: None,
            set: Some(set),
        }
    }

    /// Property with no storage: setting it only feeds its connections.
    pub const fn pass_through(name: &'static str) -> Self {
        Self {
            name,
            get: None,
            set: None,
        }
    }
}

//=== Table Lookup ========================================================

fn find<'a, N>(table: &'a [Property<N>], name: &str) -> Option<&'a Property<N>> {
    table.iter().find(|p| p.name == name)
}

fn unknown<N: Node>(node: &N, table: &[Property<N>], name: &str) -> PropertyError {
    debug!(
        target: "rsg::node",
        "{} has no property '{}'; known: {:?}",
        node.type_name(),
        name,
        names(table).collect::<Vec<_>>()
    );
    PropertyError::unknown(node.type_name(), name)
}

/// Reads `name` from `node` through its table.
pub fn get<N: Node>(node: &N, table: &[Property<N>], name: &str) -> Result<Value, PropertyError> {
    let property = find(table, name).ok_or_else(|| unknown(node, table, name))?;

    match property.get {
        Some(getter) => Ok(getter(node)),
        None => Err(PropertyError::WriteOnly {
            node: node.type_name(),
            name: name.to_owned(),
        }),
    }
}

/// Writes `value` to `name` on `node` through its table.
pub fn set<N: Node>(node: &mut N, table: &[Property<N>], name: &str, value: Value) -> Result<(), PropertyError> {
    let property = find(table, name).ok_or_else(|| unknown(node, table, name))?;

    if let Some(setter) = property.set {
        setter(node, value)?;
    }
    Ok(())
}

/// Names declared by a table, in declaration order.
fn names<N>(table: &[Property<N>]) -> impl Iterator<Item = &'static str> + '_ {
    table.iter().map(|p| p.name)
}

//=========================================================================
// Unit Tests
//=========================================================================
