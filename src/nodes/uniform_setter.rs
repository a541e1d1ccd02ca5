//=========================================================================
// Uniform Setter Node
//=========================================================================
//
// Pushes a fixed, ordered list of named uniforms into the local context.
//
// Every pair doubles as a property of the same name, so bindings can
// drive individual uniforms (e.g. a mouse delta feeding "u_color").
// The set of names is fixed at construction; a property keeps the value
// kind it was created with.
//
//=========================================================================

//=== External Dependencies ===============================================

use indexmap::IndexMap;

//=== Internal Dependencies ===============================================

use crate::core::error::{PropertyError, SceneError};
use crate::core::globals::GlobalContext;
use crate::core::local_context::LocalContext;
use crate::core::node::{Node, Notifier};
use crate::core::value::Value;

//=== UniformSetterNode ===================================================

#[derive(Debug, Clone)]
pub struct UniformSetterNode {
    uniforms: IndexMap<String, Value>,
}

impl UniformSetterNode {
    /// Creates the node from `(name, value)` pairs, kept in order.
    ///
    /// A repeated name keeps its first position and its last value.
    pub fn new<N: Into<String>>(uniforms: impl IntoIterator<Item = (N, Value)>) -> Self {
        Self {
            uniforms: uniforms.into_iter().map(|(name, value)| (name.into(), value)).collect(),
        }
    }

    pub fn uniforms(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.uniforms.iter().map(|(name, value)| (name.as_str(), value))
    }
}

impl Node for UniformSetterNode {
    fn type_name(&self) -> &'static str {
        "UniformSetterNode"
    }

    fn process(
        &mut self,
        local: &mut LocalContext,
        _global: &mut GlobalContext,
        _notifier: &mut Notifier,
    ) -> Result<(), SceneError> {
        for (name, value) in &self.uniforms {
            local.set_uniform(name, *value);
        }
        Ok(())
    }

    fn get_property(&self, name: &str) -> Result<Value, PropertyError> {
        self.uniforms
            .get(name)
            .copied()
            .ok_or_else(|| PropertyError::unknown(self.type_name(), name))
    }

    fn set_property(&mut self, name: &str, value: Value) -> Result<(), PropertyError> {
        let type_name = self.type_name();
        let slot = self
            .uniforms
            .get_mut(name)
            .ok_or_else(|| PropertyError::unknown(type_name, name))?;

        value.expect_kind(slot.kind())?;
        *slot = value;
        Ok(())
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::node::adapters::scale;
    use crate::core::node::NodeRef;
    use crate::platform::headless;

    fn color_setter() -> UniformSetterNode {
        UniformSetterNode::new([
            ("u_color", Value::vec4(1.0, 0.0, 0.0, 1.0)),
            ("u_scale", Value::float(1.0)),
        ])
    }

    #[test]
    fn process_pushes_pairs_in_order() {
        let (mut global, _controller, _log) = headless::context(64, 64);
        let node = NodeRef::new(color_setter());
        let mut local = LocalContext::new();

        node.process(&mut local, &mut global).unwrap();

        let names: Vec<_> = local.uniforms().map(|(n, _)| n.to_owned()).collect();
        assert_eq!(names, vec!["u_color", "u_scale"]);
        assert_eq!(local.uniform("u_scale"), Some(&Value::float(1.0)));
    }

    #[test]
    fn pairs_are_properties() {
        let mut node = color_setter();
        node.set_property("u_scale", Value::float(2.5)).unwrap();

        assert_eq!(node.get_property("u_scale"), Ok(Value::float(2.5)));
    }

    #[test]
    fn property_keeps_its_kind() {
        let mut node = color_setter();
        let err = node.set_property("u_scale", Value::int(3)).unwrap_err();

        assert!(matches!(err, PropertyError::TypeMismatch(_)));
        assert_eq!(node.get_property("u_scale"), Ok(Value::float(1.0)));
    }

    #[test]
    fn unknown_name_is_not_added() {
        let mut node = color_setter();
        assert_eq!(
            node.set_property("u_other", Value::float(1.0)),
            Err(PropertyError::unknown("UniformSetterNode", "u_other"))
        );
        assert_eq!(node.uniforms().count(), 2);
    }

    #[test]
    fn binding_drives_uniform() {
        let source = NodeRef::new(UniformSetterNode::new([("level", Value::int(0))]));
        let target = NodeRef::new(color_setter());
        source.connect_property_with_adapters("level", &target, "u_scale", vec![scale(0.5)]);

        source.set_property("level", Value::int(6)).unwrap();

        assert_eq!(target.get_property("u_scale"), Ok(Value::float(3.0)));
    }
}
