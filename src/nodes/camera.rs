//=========================================================================
// Camera Node
//=========================================================================
//
// Publishes view and projection matrices into the local context.
//
// Orientation is stored as yaw/pitch (radians). The front vector is
//   (cos(pitch)·sin(yaw), sin(pitch), cos(pitch)·cos(yaw))
// so yaw = π looks down -Z, the classic default from (0, 0, 10) at the
// origin.
//
// Matrices are cached and rebuilt by every setter; `process` only copies
// them into "u_view" / "u_projection".
//
//=========================================================================

//=== External Dependencies ===============================================

use std::f32::consts::FRAC_PI_2;

use glam::{Mat4, Vec3};

//=== Internal Dependencies ===============================================

use crate::core::error::{PropertyError, SceneError};
use crate::core::globals::GlobalContext;
use crate::core::local_context::LocalContext;
use crate::core::node::property::{self, Property};
use crate::core::node::{Node, Notifier};
use crate::core::value::{TypeMismatch, Value};

//=== Constants ===========================================================

/// Uniform receiving the view matrix.
pub const VIEW_UNIFORM: &str = "u_view";

/// Uniform receiving the projection matrix.
pub const PROJECTION_UNIFORM: &str = "u_projection";

const PITCH_LIMIT: f32 = FRAC_PI_2 - 0.001;

//=== Projection ==========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Projection {
    Perspective,
    Orthographic,
}

//=== CameraNode ==========================================================

#[derive(Debug, Clone)]
pub struct CameraNode {
    projection: Projection,
    position: Vec3,
    yaw: f32,
    pitch: f32,
    fov_degrees: f32,
    aspect: f32,
    near: f32,
    far: f32,

    // cache
    view: Mat4,
    proj: Mat4,
}

impl CameraNode {
    //--- Construction -----------------------------------------------------

    /// Camera with every parameter given explicitly.
    ///
    /// Angles are in radians except `fov_degrees`; pitch is clamped like
    /// [`CameraNode::set_pitch`]. For orthographic cameras `near`/`far`
    /// bound the view volume along the view axis.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        position: Vec3,
        yaw: f32,
        pitch: f32,
        fov_degrees: f32,
        aspect: f32,
        near: f32,
        far: f32,
        projection: Projection,
    ) -> Self {
        let mut camera = Self {
            projection,
            position,
            yaw,
            pitch: pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT),
            fov_degrees,
            aspect,
            near,
            far,
            view: Mat4::IDENTITY,
            proj: Mat4::IDENTITY,
        };
        camera.recalculate();
        camera
    }

    /// Camera at `position` facing `target`.
    pub fn looking_at(position: Vec3, target: Vec3, aspect: f32, projection: Projection) -> Self {
        let direction = (target - position).normalize_or_zero();
        let (near, far) = match projection {
            Projection::Perspective => (0.01, 100.0),
            Projection::Orthographic => (-100.0, 100.0),
        };

        Self::new(
            position,
            direction.x.atan2(direction.z),
            direction.y.clamp(-1.0, 1.0).asin(),
            45.0,
            aspect,
            near,
            far,
            projection,
        )
    }

    /// Perspective camera at (0, 0, 10) looking at the origin.
    pub fn perspective_default(aspect: f32) -> Self {
        Self::looking_at(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO, aspect, Projection::Perspective)
    }

    /// Orthographic camera at (0, 0, 10) looking at the origin.
    pub fn orthographic_default(aspect: f32) -> Self {
        Self::looking_at(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO, aspect, Projection::Orthographic)
    }

    //--- Accessors --------------------------------------------------------

    pub fn projection(&self) -> Projection {
        self.projection
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    /// Unit vector the camera is facing.
    pub fn front(&self) -> Vec3 {
        Vec3::new(
            self.pitch.cos() * self.yaw.sin(),
            self.pitch.sin(),
            self.pitch.cos() * self.yaw.cos(),
        )
    }

    pub fn view_matrix(&self) -> Mat4 {
        self.view
    }

    pub fn projection_matrix(&self) -> Mat4 {
        self.proj
    }

    //--- Mutation ---------------------------------------------------------

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
        self.recalculate();
    }

    pub fn set_yaw(&mut self, yaw: f32) {
        self.yaw = yaw;
        self.recalculate();
    }

    /// Pitch is clamped just short of straight up / straight down.
    pub fn set_pitch(&mut self, pitch: f32) {
        self.pitch = pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT);
        self.recalculate();
    }

    pub fn set_fov(&mut self, degrees: f32) {
        self.fov_degrees = degrees;
        self.recalculate();
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = aspect;
        self.recalculate();
    }

    pub fn set_clip_planes(&mut self, near: f32, far: f32) {
        self.near = near;
        self.far = far;
        self.recalculate();
    }

    //--- Internal Helpers -------------------------------------------------

    fn recalculate(&mut self) {
        self.view = Mat4::look_to_rh(self.position, self.front(), Vec3::Y);
        self.proj = match self.projection {
            Projection::Perspective => {
                Mat4::perspective_rh_gl(self.fov_degrees.to_radians(), self.aspect, self.near, self.far)
            }
            Projection::Orthographic => {
                let (half_w, half_h) = if self.aspect >= 1.0 {
                    (self.aspect, 1.0)
                } else {
                    (1.0, 1.0 / self.aspect)
                };
                Mat4::orthographic_rh_gl(-half_w, half_w, -half_h, half_h, self.near, self.far)
            }
        };
    }
}

//=== Properties ==========================================================

fn set_float(camera: &mut CameraNode, value: Value, apply: fn(&mut CameraNode, f32)) -> Result<(), TypeMismatch> {
    apply(camera, value.as_float()?);
    Ok(())
}

static CAMERA_PROPERTIES: &[Property<CameraNode>] = &[
    Property::read_write(
        "position",
        |c: &CameraNode| Value::Vec3(c.position),
        |c: &mut CameraNode, v| {
            c.set_position(v.as_vec3()?);
            Ok(())
        },
    ),
    Property::read_write(
        "yaw",
        |c: &CameraNode| Value::Float(c.yaw),
        |c: &mut CameraNode, v| set_float(c, v, CameraNode::set_yaw),
    ),
    Property::read_write(
        "pitch",
        |c: &CameraNode| Value::Float(c.pitch),
        |c: &mut CameraNode, v| set_float(c, v, CameraNode::set_pitch),
    ),
    Property::write_only("yawChange", |c: &mut CameraNode, v| {
        set_float(c, v, |c, delta| c.set_yaw(c.yaw + delta))
    }),
    Property::write_only("pitchChange", |c: &mut CameraNode, v| {
        set_float(c, v, |c, delta| c.set_pitch(c.pitch + delta))
    }),
    Property::read_write(
        "fov",
        |c: &CameraNode| Value::Float(c.fov_degrees),
        |c: &mut CameraNode, v| set_float(c, v, CameraNode::set_fov),
    ),
    Property::read_write(
        "aspect",
        |c: &CameraNode| Value::Float(c.aspect),
        |c: &mut CameraNode, v| set_float(c, v, CameraNode::set_aspect),
    ),
    Property::read_write(
        "near",
        |c: &CameraNode| Value::Float(c.near),
        |c: &mut CameraNode, v| set_float(c, v, |c, near| c.set_clip_planes(near, c.far)),
    ),
    Property::read_write(
        "far",
        |c: &CameraNode| Value::Float(c.far),
        |c: &mut CameraNode, v| set_float(c, v, |c, far| c.set_clip_planes(c.near, far)),
    ),
    Property::read_only("viewMatrix", |c: &CameraNode| Value::Mat4(c.view)),
    Property::read_only("projectionMatrix", |c: &CameraNode| Value::Mat4(c.proj)),
];

//=== Node ================================================================

impl Node for CameraNode {
    fn type_name(&self) -> &'static str {
        "CameraNode"
    }

    fn process(
        &mut self,
        local: &mut LocalContext,
        _global: &mut GlobalContext,
        _notifier: &mut Notifier,
    ) -> Result<(), SceneError> {
        local.set_uniform(VIEW_UNIFORM, Value::Mat4(self.view));
        local.set_uniform(PROJECTION_UNIFORM, Value::Mat4(self.proj));
        Ok(())
    }

    fn get_property(&self, name: &str) -> Result<Value, PropertyError> {
        property::get(self, CAMERA_PROPERTIES, name)
    }

    fn set_property(&mut self, name: &str, value: Value) -> Result<(), PropertyError> {
        property::set(self, CAMERA_PROPERTIES, name, value)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
