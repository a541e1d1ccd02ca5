//=========================================================================
// Property Printer Node
//=========================================================================
//
// Debugging sink: logs every value bound into it.
//
// Write-only properties, one per value kind (Int has four channels so
// several integer sources can share one printer):
//   pointer, int1..int4, float, vec2, vec3, vec4, mat4
//
//=========================================================================

//=== External Dependencies ===============================================

use indexmap::IndexMap;
use log::info;

//=== Internal Dependencies ===============================================

use crate::core::error::PropertyError;
use crate::core::node::Node;
use crate::core::value::{Value, ValueKind};

//=== Channels ============================================================

const CHANNELS: &[(&str, ValueKind)] = &[
    ("pointer", ValueKind::Pointer),
    ("int1", ValueKind::Int),
    ("int2", ValueKind::Int),
    ("int3", ValueKind::Int),
    ("int4", ValueKind::Int),
    ("float", ValueKind::Float),
    ("vec2", ValueKind::Vec2),
    ("vec3", ValueKind::Vec3),
    ("vec4", ValueKind::Vec4),
    ("mat4", ValueKind::Mat4),
];

//=== PropertyPrinterNode =================================================

#[derive(Debug, Default)]
pub struct PropertyPrinterNode {
    last: IndexMap<&'static str, Value>,
}

impl PropertyPrinterNode {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last value received on `channel`, if any.
    pub fn last(&self, channel: &str) -> Option<Value> {
        self.last.get(channel).copied()
    }
}

impl Node for PropertyPrinterNode {
    fn type_name(&self) -> &'static str {
        "PropertyPrinterNode"
    }

    fn get_property(&self, name: &str) -> Result<Value, PropertyError> {
        if CHANNELS.iter().any(|(channel, _)| *channel == name) {
            Err(PropertyError::WriteOnly {
                node: self.type_name(),
                name: name.to_owned(),
            })
        } else {
            Err(PropertyError::unknown(self.type_name(), name))
        }
    }

    fn set_property(&mut self, name: &str, value: Value) -> Result<(), PropertyError> {
        let (channel, kind) = CHANNELS
            .iter()
            .find(|(channel, _)| *channel == name)
            .copied()
            .ok_or_else(|| PropertyError::unknown(self.type_name(), name))?;

        value.expect_kind(kind)?;
        info!(target: "rsg::printer", "{} property set to {}", channel, value);
        self.last.insert(channel, value);
        Ok(())
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
