//=========================================================================
// Trackball Manipulator Node
//=========================================================================
//
// Cursor tracker publishing a float position and its per-sample delta.
//
// Properties:
//   xy        Vec2, read/write (writing repositions the reference point)
//   xyDelta   Vec2, pass-through (only feeds bindings)
//
//=========================================================================

//=== External Dependencies ===============================================

use glam::Vec2;

//=== Internal Dependencies ===============================================

use crate::core::error::{PropertyError, SceneError};
use crate::core::globals::GlobalContext;
use crate::core::local_context::LocalContext;
use crate::core::node::property::{self, Property};
use crate::core::node::{Node, Notifier};
use crate::core::value::Value;

//=== TrackballManipulatorNode ============================================

#[derive(Debug, Clone, PartialEq)]
pub struct TrackballManipulatorNode {
    xy: Vec2,
}

impl TrackballManipulatorNode {
    /// Starts from the current cursor position.
    pub fn new(global: &GlobalContext) -> Self {
        let (x, y) = global.surface().cursor_position();
        Self {
            xy: Vec2::new(x as f32, y as f32),
        }
    }

    pub fn position(&self) -> Vec2 {
        self.xy
    }
}

static TRACKBALL_PROPERTIES: &[Property<TrackballManipulatorNode>] = &[
    Property::read_write(
        "xy",
        |t: &TrackballManipulatorNode| Value::Vec2(t.xy),
        |t: &mut TrackballManipulatorNode, v| {
            t.xy = v.as_vec2()?;
            Ok(())
        },
    ),
    Property::pass_through("xyDelta"),
];

impl Node for TrackballManipulatorNode {
    fn type_name(&self) -> &'static str {
        "TrackballManipulatorNode"
    }

    fn process(
        &mut self,
        _local: &mut LocalContext,
        global: &mut GlobalContext,
        notifier: &mut Notifier,
    ) -> Result<(), SceneError> {
        let (x, y) = global.surface().cursor_position();
        let current = Vec2::new(x as f32, y as f32);
        if current == self.xy {
            return Ok(());
        }

        // "xy" is applied by the publish step, after this returns.
        notifier.notify("xy", Value::Vec2(current));
        notifier.notify("xyDelta", Value::Vec2(current - self.xy));
        Ok(())
    }

    fn get_property(&self, name: &str) -> Result<Value, PropertyError> {
        property::get(self, TRACKBALL_PROPERTIES, name)
    }

    fn set_property(&mut self, name: &str, value: Value) -> Result<(), PropertyError> {
        property::set(self, TRACKBALL_PROPERTIES, name, value)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::node::NodeRef;
    use crate::nodes::UniformSetterNode;
    use crate::platform::headless;

    #[test]
    fn publishes_position_and_delta() {
        let (mut global, controller, _log) = headless::context(200, 200);
        let trackball = NodeRef::new(TrackballManipulatorNode::new(&global));
        let sink = NodeRef::new(UniformSetterNode::new([
            ("u_xy", Value::vec2(0.0, 0.0)),
            ("u_delta", Value::vec2(0.0, 0.0)),
        ]));
        trackball.connect_property("xy", &sink, "u_xy");
        trackball.connect_property("xyDelta", &sink, "u_delta");

        controller.move_cursor(4.0, 6.0);
        global.surface_mut().poll_events();
        trackball.process(&mut LocalContext::new(), &mut global).unwrap();

        controller.move_cursor(5.0, 8.0);
        global.surface_mut().poll_events();
        trackball.process(&mut LocalContext::new(), &mut global).unwrap();

        assert_eq!(trackball.get_property("xy"), Ok(Value::vec2(5.0, 8.0)));
        assert_eq!(sink.get_property("u_xy"), Ok(Value::vec2(5.0, 8.0)));
        assert_eq!(sink.get_property("u_delta"), Ok(Value::vec2(1.0, 2.0)));
    }

    #[test]
    fn writing_xy_moves_reference_point() {
        let (mut global, controller, _log) = headless::context(200, 200);
        let trackball = NodeRef::new(TrackballManipulatorNode::new(&global));
        trackball.set_property("xy", Value::vec2(10.0, 10.0)).unwrap();

        controller.move_cursor(10.0, 10.0);
        global.surface_mut().poll_events();
        trackball.process(&mut LocalContext::new(), &mut global).unwrap();

        // cursor matches the written reference: no movement registered
        assert_eq!(trackball.with(|t: &TrackballManipulatorNode| t.position()), Some(Vec2::new(10.0, 10.0)));
    }

    #[test]
    fn delta_is_not_readable() {
        let (global, _controller, _log) = headless::context(200, 200);
        let trackball = TrackballManipulatorNode::new(&global);
        assert!(matches!(
            trackball.get_property("xyDelta"),
            Err(PropertyError::WriteOnly { .. })
        ));
    }
}
