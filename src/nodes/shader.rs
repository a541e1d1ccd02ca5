//=========================================================================
// Shader Node
//=========================================================================
//
// Makes a shader program the active program of the enclosing scope.
//
// Construction:
//   from_program: wraps an existing program (not owned, never deleted)
//   from_sources: compiles + links in-memory sources (owned)
//   from_files:   reads both sources from disk, then as from_sources
//
// Compile/link/read failures are returned from the constructor.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fs;
use std::path::Path;

use log::{debug, info};

//=== Internal Dependencies ===============================================

use crate::core::error::SceneError;
use crate::core::globals::GlobalContext;
use crate::core::local_context::LocalContext;
use crate::core::node::{Node, Notifier};
use crate::core::platform_bridge::{BackendError, ProgramHandle};

//=== Built-in Sources ====================================================

/// Position-only vertex stage transformed by the camera uniforms.
pub const BASIC_VERTEX_SHADER: &str = r#"#version 330 core
layout (location = 0) in vec3 a_position;

uniform mat4 u_view;
uniform mat4 u_projection;

void main() {
    gl_Position = u_projection * u_view * vec4(a_position, 1.0);
}
"#;

/// Flat color fragment stage (`u_color`, opaque white if unset).
pub const BASIC_FRAGMENT_SHADER: &str = r#"#version 330 core
uniform vec4 u_color = vec4(1.0);

out vec4 frag_color;

void main() {
    frag_color = u_color;
}
"#;

//=== ShaderNode ==========================================================

#[derive(Debug)]
pub struct ShaderNode {
    program: ProgramHandle,
    owned: bool,
}

impl ShaderNode {
    /// Uses an already linked program. The node never deletes it.
    pub fn from_program(program: ProgramHandle) -> Self {
        Self {
            program,
            owned: false,
        }
    }

    /// Compiles and links `vertex_source` + `fragment_source`.
    pub fn from_sources(
        global: &mut GlobalContext,
        vertex_source: &str,
        fragment_source: &str,
    ) -> Result<Self, BackendError> {
        let program = global.renderer_mut().compile_program(vertex_source, fragment_source)?;
        info!(target: "rsg::node", "shader program {} linked", program.0);

        Ok(Self {
            program,
            owned: true,
        })
    }

    /// Reads both shader stages from disk, then compiles and links them.
    pub fn from_files(
        global: &mut GlobalContext,
        vertex_path: impl AsRef<Path>,
        fragment_path: impl AsRef<Path>,
    ) -> Result<Self, BackendError> {
        let vertex_source = read_source(vertex_path.as_ref())?;
        let fragment_source = read_source(fragment_path.as_ref())?;
        Self::from_sources(global, &vertex_source, &fragment_source)
    }

    pub fn program(&self) -> ProgramHandle {
        self.program
    }
}

fn read_source(path: &Path) -> Result<String, BackendError> {
    debug!(target: "rsg::node", "reading shader source {}", path.display());
    fs::read_to_string(path).map_err(|source| BackendError::Io {
        path: path.to_path_buf(),
        source,
    })
}

//=== Node ================================================================

impl Node for ShaderNode {
    fn type_name(&self) -> &'static str {
        "ShaderNode"
    }

    fn process(
        &mut self,
        local: &mut LocalContext,
        _global: &mut GlobalContext,
        _notifier: &mut Notifier,
    ) -> Result<(), SceneError> {
        local.program = self.program;
        Ok(())
    }

    fn destroy(&mut self, global: &mut GlobalContext) {
        if self.owned && !self.program.is_none() {
            global.renderer_mut().delete_program(self.program);
        }
        self.program = ProgramHandle::NONE;
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
