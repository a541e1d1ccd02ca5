//=========================================================================
// Mesh Node
//=========================================================================
//
// Draws indexed triangle geometry with the scope's program and uniforms.
//
// Process:
//   1. bind local.program
//   2. upload every local uniform by name (the renderer picks the typed
//      call per Value variant; Pointer payloads are skipped)
//   3. bind geometry, draw, then unbind geometry and program
//
// Geometry is owned by the node and released by `destroy`.
//
//=========================================================================

//=== External Dependencies ===============================================

use glam::Vec3;
use log::{trace, warn};

//=== Internal Dependencies ===============================================

use crate::core::error::SceneError;
use crate::core::globals::GlobalContext;
use crate::core::local_context::LocalContext;
use crate::core::node::{Node, Notifier};
use crate::core::platform_bridge::{BackendError, GeometryHandle, ProgramHandle};
use crate::core::value::Value;

//=== Built-in Geometry ===================================================

const TRIANGLE_POSITIONS: [Vec3; 3] = [
    Vec3::new(-0.5, -0.5, 0.0),
    Vec3::new(0.0, 0.5, 0.0),
    Vec3::new(0.5, -0.5, 0.0),
];

const TRIANGLE_INDICES: [u32; 3] = [0, 1, 2];

//=== MeshNode ============================================================

#[derive(Debug)]
pub struct MeshNode {
    geometry: Option<GeometryHandle>,
    index_count: u32,
}

impl MeshNode {
    /// Uploads `positions` + `indices` as a new geometry.
    pub fn new(global: &mut GlobalContext, positions: &[Vec3], indices: &[u32]) -> Result<Self, BackendError> {
        let index_count = u32::try_from(indices.len())
            .map_err(|_| BackendError::ResourceCreation(format!("too many indices: {}", indices.len())))?;
        let geometry = global.renderer_mut().create_geometry(positions, indices)?;

        Ok(Self {
            geometry: Some(geometry),
            index_count,
        })
    }

    /// Single triangle centred on the origin in the XY plane.
    pub fn triangle(global: &mut GlobalContext) -> Result<Self, BackendError> {
        Self::new(global, &TRIANGLE_POSITIONS, &TRIANGLE_INDICES)
    }

    pub fn geometry(&self) -> Option<GeometryHandle> {
        self.geometry
    }

    pub fn index_count(&self) -> u32 {
        self.index_count
    }
}

impl Node for MeshNode {
    fn type_name(&self) -> &'static str {
        "MeshNode"
    }

    fn process(
        &mut self,
        local: &mut LocalContext,
        global: &mut GlobalContext,
        _notifier: &mut Notifier,
    ) -> Result<(), SceneError> {
        let Some(geometry) = self.geometry else {
            warn!(target: "rsg::node", "MeshNode processed after destroy; nothing drawn");
            return Ok(());
        };

        let renderer = global.renderer_mut();
        renderer.bind_program(local.program);

        for (name, value) in local.uniforms() {
            if let Value::Pointer(_) = value {
                trace!(target: "rsg::node", "uniform '{}' holds a pointer; not uploadable", name);
                continue;
            }
            if !renderer.set_uniform(local.program, name, value) {
                trace!(target: "rsg::node", "program {} has no uniform '{}'", local.program.0, name);
            }
        }

        renderer.bind_geometry(geometry);
        renderer.draw(self.index_count);

        renderer.bind_geometry(GeometryHandle::NONE);
        renderer.bind_program(ProgramHandle::NONE);
        Ok(())
    }

    fn destroy(&mut self, global: &mut GlobalContext) {
        if let Some(geometry) = self.geometry.take() {
            global.renderer_mut().delete_geometry(geometry);
        }
    }
}

impl Drop for MeshNode {
    fn drop(&mut self) {
        if let Some(geometry) = self.geometry {
            warn!(target: "rsg::node", "MeshNode dropped without destroy; geometry {} leaked", geometry.0);
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
