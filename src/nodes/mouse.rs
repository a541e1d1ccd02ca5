//=========================================================================
// Mouse Manipulator Node
//=========================================================================
//
// Samples the cursor every traversal and publishes position and delta.
//
// Properties (read-only; setting them only feeds their bindings):
//   x, y, xChange, yChange   Int
//   xy, xyChange             Vec2
//
// The delta is measured between consecutive samples, never against a
// fixed interval, so it is valid in both loop modes. Nothing is published
// while the cursor stays put.
//
//=========================================================================

//=== External Dependencies ===============================================

use glam::Vec2;
use log::trace;

//=== Internal Dependencies ===============================================

use crate::core::error::{PropertyError, SceneError};
use crate::core::globals::GlobalContext;
use crate::core::local_context::LocalContext;
use crate::core::node::property::{self, Property};
use crate::core::node::{Node, Notifier};
use crate::core::value::Value;

//=== MouseManipulatorNode ================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MouseManipulatorNode {
    x: i32,
    y: i32,
    x_change: i32,
    y_change: i32,
}

impl MouseManipulatorNode {
    /// Starts from the current cursor position with a zero delta.
    pub fn new(global: &GlobalContext) -> Self {
        let (x, y) = global.surface().cursor_position();
        Self {
            x: x as i32,
            y: y as i32,
            x_change: 0,
            y_change: 0,
        }
    }

    pub fn position(&self) -> (i32, i32) {
        (self.x, self.y)
    }

    pub fn change(&self) -> (i32, i32) {
        (self.x_change, self.y_change)
    }
}

//=== Properties ==========================================================

static MOUSE_PROPERTIES: &[Property<MouseManipulatorNode>] = &[
    Property::read_only("x", |m: &MouseManipulatorNode| Value::Int(m.x)),
    Property::read_only("y", |m: &MouseManipulatorNode| Value::Int(m.y)),
    Property::read_only("xChange", |m: &MouseManipulatorNode| Value::Int(m.x_change)),
    Property::read_only("yChange", |m: &MouseManipulatorNode| Value::Int(m.y_change)),
    Property::read_only("xy", |m: &MouseManipulatorNode| {
        Value::Vec2(Vec2::new(m.x as f32, m.y as f32))
    }),
    Property::read_only("xyChange", |m: &MouseManipulatorNode| {
        Value::Vec2(Vec2::new(m.x_change as f32, m.y_change as f32))
    }),
];

//=== Node ================================================================

impl Node for MouseManipulatorNode {
    fn type_name(&self) -> &'static str {
        "MouseManipulatorNode"
    }

    fn process(
        &mut self,
        _local: &mut LocalContext,
        global: &mut GlobalContext,
        notifier: &mut Notifier,
    ) -> Result<(), SceneError> {
        let (x, y) = global.surface().cursor_position();
        let (x, y) = (x as i32, y as i32);
        if (x, y) == (self.x, self.y) {
            return Ok(());
        }

        self.x_change = x - self.x;
        self.y_change = y - self.y;
        self.x = x;
        self.y = y;
        trace!(
            target: "rsg::node",
            "mouse at ({}, {}), moved ({}, {})",
            self.x,
            self.y,
            self.x_change,
            self.y_change
        );

        for name in ["x", "y", "xy", "xChange", "yChange", "xyChange"] {
            notifier.notify(name, self.get_property(name)?);
        }
        Ok(())
    }

    fn get_property(&self, name: &str) -> Result<Value, PropertyError> {
        property::get(self, MOUSE_PROPERTIES, name)
    }

    fn set_property(&mut self, name: &str, value: Value) -> Result<(), PropertyError> {
        property::set(self, MOUSE_PROPERTIES, name, value)
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
    use crate::nodes::{CameraNode, PropertyPrinterNode};
    use crate::platform::headless;
    use std::f32::consts::PI;

    //=====================================================================
    // Sampling Tests
    //=====================================================================

    #[test]
    fn initial_sample_has_zero_delta() {
        let (mut global, controller, _log) = headless::context(200, 200);
        controller.move_cursor(30.0, 40.0);
        global.surface_mut().poll_events();

        let mouse = MouseManipulatorNode::new(&global);

        assert_eq!(mouse.position(), (30, 40));
        assert_eq!(mouse.change(), (0, 0));
    }

    #[test]
    fn delta_tracks_consecutive_samples() {
        let (mut global, controller, _log) = headless::context(200, 200);
        let mouse = NodeRef::new(MouseManipulatorNode::new(&global));
        let mut local = LocalContext::new();

        controller.move_cursor(10.0, 5.0);
        global.surface_mut().poll_events();
        mouse.process(&mut local, &mut global).unwrap();
        assert_eq!(mouse.get_property("xChange"), Ok(Value::int(10)));

        controller.move_cursor(12.0, 5.0);
        global.surface_mut().poll_events();
        mouse.process(&mut local, &mut global).unwrap();
        assert_eq!(mouse.get_property("xChange"), Ok(Value::int(2)));
        assert_eq!(mouse.get_property("yChange"), Ok(Value::int(0)));
        assert_eq!(mouse.get_property("xy"), Ok(Value::vec2(12.0, 5.0)));
    }

    #[test]
    fn still_cursor_publishes_nothing() {
        let (mut global, _controller, _log) = headless::context(200, 200);
        let mouse = NodeRef::new(MouseManipulatorNode::new(&global));
        let printer = NodeRef::new(PropertyPrinterNode::new());
        mouse.connect_property("x", &printer, "int1");

        mouse.process(&mut LocalContext::new(), &mut global).unwrap();

        assert_eq!(printer.with(|p: &PropertyPrinterNode| p.last("int1")), Some(None));
    }

    //=====================================================================
    // Binding Tests
    //=====================================================================

    #[test]
    fn mouse_delta_turns_camera() {
        let (mut global, controller, _log) = headless::context(200, 200);
        let mouse = NodeRef::new(MouseManipulatorNode::new(&global));
        let camera = NodeRef::new(CameraNode::perspective_default(1.0));
        mouse.connect_property_with_adapters("xChange", &camera, "yawChange", vec![scale(0.01)]);
        let view_before = camera.with(|c: &CameraNode| c.view_matrix()).unwrap();

        controller.move_cursor(10.0, 0.0);
        global.surface_mut().poll_events();
        mouse.process(&mut LocalContext::new(), &mut global).unwrap();

        let (yaw, view) = camera.with(|c: &CameraNode| (c.yaw(), c.view_matrix())).unwrap();
        assert!((yaw - (PI + 0.1)).abs() < 1e-6);
        assert_ne!(view, view_before);
    }

    #[test]
    fn repeated_equal_deltas_each_cascade() {
        let (mut global, controller, _log) = headless::context(200, 200);
        let mouse = NodeRef::new(MouseManipulatorNode::new(&global));
        let camera = NodeRef::new(CameraNode::perspective_default(1.0));
        mouse.connect_property_with_adapters("xChange", &camera, "yawChange", vec![scale(0.01)]);

        for x in [10.0, 20.0] {
            controller.move_cursor(x, 0.0);
            global.surface_mut().poll_events();
            mouse.process(&mut LocalContext::new(), &mut global).unwrap();
        }

        let yaw = camera.with(|c: &CameraNode| c.yaw()).unwrap();
        assert!((yaw - (PI + 0.2)).abs() < 1e-5);
    }
}
