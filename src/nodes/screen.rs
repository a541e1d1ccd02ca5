//=========================================================================
// Screen Node
//=========================================================================
//
// Clears the framebuffer with a configurable color.
//
// Properties:
//   clearColor                         Vec4, read/write
//   clearRed / clearGreen / clearBlue  Int, write-only, 1 unit = 0.001
//
//=========================================================================

//=== External Dependencies ===============================================

use glam::Vec4;

//=== Internal Dependencies ===============================================

use crate::core::error::{PropertyError, SceneError};
use crate::core::globals::GlobalContext;
use crate::core::local_context::LocalContext;
use crate::core::node::property::{self, Property};
use crate::core::node::{Node, Notifier};
use crate::core::value::{TypeMismatch, Value};

//=== ScreenNode ==========================================================

#[derive(Debug, Clone, PartialEq)]
pub struct ScreenNode {
    clear_color: Vec4,
}

impl ScreenNode {
    /// Opaque black.
    pub fn new() -> Self {
        Self::with_clear_color(Vec4::new(0.0, 0.0, 0.0, 1.0))
    }

    pub fn with_clear_color(clear_color: Vec4) -> Self {
        Self { clear_color }
    }

    pub fn clear_color(&self) -> Vec4 {
        self.clear_color
    }
}

impl Default for ScreenNode {
    fn default() -> Self {
        Self::new()
    }
}

//=== Properties ==========================================================

const MILLI: f32 = 0.001;

fn set_channel(screen: &mut ScreenNode, value: Value, channel: usize) -> Result<(), TypeMismatch> {
    screen.clear_color[channel] = value.as_int()? as f32 * MILLI;
    Ok(())
}

static SCREEN_PROPERTIES: &[Property<ScreenNode>] = &[
    Property::read_write(
        "clearColor",
        |s: &ScreenNode| Value::Vec4(s.clear_color),
        |s: &mut ScreenNode, v| {
            s.clear_color = v.as_vec4()?;
            Ok(())
        },
    ),
    Property::write_only("clearRed", |s: &mut ScreenNode, v| set_channel(s, v, 0)),
    Property::write_only("clearGreen", |s: &mut ScreenNode, v| set_channel(s, v, 1)),
    Property::write_only("clearBlue", |s: &mut ScreenNode, v| set_channel(s, v, 2)),
];

//=== Node ================================================================

impl Node for ScreenNode {
    fn type_name(&self) -> &'static str {
        "ScreenNode"
    }

    fn process(
        &mut self,
        _local: &mut LocalContext,
        global: &mut GlobalContext,
        _notifier: &mut Notifier,
    ) -> Result<(), SceneError> {
        global.renderer_mut().clear(self.clear_color);
        Ok(())
    }

    fn get_property(&self, name: &str) -> Result<Value, PropertyError> {
        property::get(self, SCREEN_PROPERTIES, name)
    }

    fn set_property(&mut self, name: &str, value: Value) -> Result<(), PropertyError> {
        property::set(self, SCREEN_PROPERTIES, name, value)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
