//=========================================================================
// Keyboard Manipulator Node
//=========================================================================
//
// Publishes keyboard transitions as property sets.
//
// Architecture:
//   Surface key callback ── Sender<KeyInput> ──> Receiver<KeyInput>
//                                                   └─> process() drains
//                                                         └─> "keyAction"
//
// The callback only queues; every cascade happens inside `process`, on
// the traversal, in arrival order.
//
// Properties:
//   keyAction    Vec2 (key code, action code), pass-through
//   key, action  Int, read-only (last transition seen)
//
//=========================================================================

//=== External Dependencies ===============================================

use crossbeam_channel::{unbounded, Receiver, Sender};
use log::{debug, trace};

//=== Internal Dependencies ===============================================

use crate::core::error::{PropertyError, SceneError};
use crate::core::globals::GlobalContext;
use crate::core::input::{KeyAction, KeyCode, KeyInput};
use crate::core::local_context::LocalContext;
use crate::core::node::property::{self, Property};
use crate::core::node::{Node, Notifier};
use crate::core::platform_bridge::{CallbackStatus, KeyCallback};
use crate::core::value::Value;

//=== KeyboardManipulatorNode =============================================

#[derive(Debug)]
pub struct KeyboardManipulatorNode {
    receiver: Receiver<KeyInput>,
    key: KeyCode,
    action: KeyAction,
}

impl KeyboardManipulatorNode {
    /// Registers a key callback on the global surface.
    pub fn new(global: &mut GlobalContext) -> Self {
        let (sender, receiver) = unbounded();

        global.surface_mut().register_key_callback(forward_keys(sender));
        debug!(target: "rsg::node", "keyboard manipulator registered");

        Self {
            receiver,
            key: KeyCode::Unidentified,
            action: KeyAction::Release,
        }
    }

    pub fn last_key(&self) -> KeyCode {
        self.key
    }

    pub fn last_action(&self) -> KeyAction {
        self.action
    }
}

/// Queues every key on `sender` until the receiving node is dropped.
fn forward_keys(sender: Sender<KeyInput>) -> KeyCallback {
    Box::new(move |input: KeyInput| {
        if sender.send(input).is_err() {
            trace!(target: "platform::input", "keyboard node gone; unregistering its key callback");
            return CallbackStatus::Remove;
        }
        CallbackStatus::Keep
    })
}

static KEYBOARD_PROPERTIES: &[Property<KeyboardManipulatorNode>] = &[
    Property::pass_through("keyAction"),
    Property::read_only("key", |k: &KeyboardManipulatorNode| Value::Int(k.key.code())),
    Property::read_only("action", |k: &KeyboardManipulatorNode| Value::Int(k.action.code())),
];

impl Node for KeyboardManipulatorNode {
    fn type_name(&self) -> &'static str {
        "KeyboardManipulatorNode"
    }

    fn process(
        &mut self,
        _local: &mut LocalContext,
        _global: &mut GlobalContext,
        notifier: &mut Notifier,
    ) -> Result<(), SceneError> {
        for input in self.receiver.try_iter() {
            self.key = input.key;
            self.action = input.action;
            notifier.notify(
                "keyAction",
                Value::vec2(input.key.code() as f32, input.action.code() as f32),
            );
        }
        Ok(())
    }

    fn get_property(&self, name: &str) -> Result<Value, PropertyError> {
        property::get(self, KEYBOARD_PROPERTIES, name)
    }

    fn set_property(&mut self, name: &str, value: Value) -> Result<(), PropertyError> {
        property::set(self, KEYBOARD_PROPERTIES, name, value)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::node::NodeRef;
    use crate::nodes::PropertyPrinterNode;
    use crate::core::platform_bridge::Surface;
    use crate::platform::headless::{self, HeadlessSurface};

    #[test]
    fn key_events_cascade_in_order() {
        let (mut global, controller, _log) = headless::context(64, 64);
        let keyboard = NodeRef::new(KeyboardManipulatorNode::new(&mut global));
        let printer = NodeRef::new(PropertyPrinterNode::new());
        keyboard.connect_property("keyAction", &printer, "vec2");

        controller.key(KeyInput::new(KeyCode::KeyW, KeyAction::Press));
        controller.key(KeyInput::new(KeyCode::KeyW, KeyAction::Release));
        global.surface_mut().poll_events();
        keyboard.process(&mut LocalContext::new(), &mut global).unwrap();

        // last one wins on the sink
        assert_eq!(
            printer.with(|p: &PropertyPrinterNode| p.last("vec2")),
            Some(Some(Value::vec2(KeyCode::KeyW.code() as f32, 0.0)))
        );
        assert_eq!(keyboard.get_property("key"), Ok(Value::int(KeyCode::KeyW.code())));
        assert_eq!(keyboard.get_property("action"), Ok(Value::int(0)));
    }

    #[test]
    fn no_events_no_cascade() {
        let (mut global, _controller, _log) = headless::context(64, 64);
        let keyboard = NodeRef::new(KeyboardManipulatorNode::new(&mut global));
        let printer = NodeRef::new(PropertyPrinterNode::new());
        keyboard.connect_property("keyAction", &printer, "vec2");

        keyboard.process(&mut LocalContext::new(), &mut global).unwrap();

        assert_eq!(printer.with(|p: &PropertyPrinterNode| p.last("vec2")), Some(None));
        assert_eq!(
            keyboard.with(|k: &KeyboardManipulatorNode| k.last_key()),
            Some(KeyCode::Unidentified)
        );
    }

    #[test]
    fn repeat_is_reported() {
        let (mut global, controller, _log) = headless::context(64, 64);
        let keyboard = NodeRef::new(KeyboardManipulatorNode::new(&mut global));

        controller.key(KeyInput::new(KeyCode::Space, KeyAction::Repeat));
        global.surface_mut().poll_events();
        keyboard.process(&mut LocalContext::new(), &mut global).unwrap();

        assert_eq!(keyboard.get_property("action"), Ok(Value::int(2)));
    }

    #[test]
    fn callback_outlives_node_only_until_next_key() {
        let (sender, receiver) = unbounded();
        let mut callback = forward_keys(sender);
        let press = KeyInput::new(KeyCode::KeyA, KeyAction::Press);

        assert_eq!(callback(press), CallbackStatus::Keep);
        assert_eq!(receiver.try_recv(), Ok(press));

        drop(receiver);
        assert_eq!(callback(press), CallbackStatus::Remove);
    }

    #[test]
    fn dropped_node_is_pruned_from_surface() {
        let (mut surface, controller) = HeadlessSurface::new(64, 64);
        let (sender, receiver) = unbounded();
        surface.register_key_callback(forward_keys(sender));

        controller.key(KeyInput::new(KeyCode::KeyA, KeyAction::Press));
        surface.poll_events();
        assert_eq!(surface.key_callback_count(), 1);

        drop(receiver);
        controller.key(KeyInput::new(KeyCode::KeyA, KeyAction::Release));
        surface.poll_events();
        assert_eq!(surface.key_callback_count(), 0);
    }
}
