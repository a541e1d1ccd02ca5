//=========================================================================
// Value
//=========================================================================
//
// Tagged value carried by node properties, connections and uniforms.
//
// Architecture:
//   Value ── kind() ──> ValueKind
//     └─ as_*() ──> payload | TypeMismatch
//
// Values are plain data: `Copy`, immutable once built, and compared by
// tag + payload. Reading a payload through the wrong accessor is a
// programmer error and surfaces as `TypeMismatch`.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;

use glam::{Mat4, Vec2, Vec3, Vec4};

//=== ValueKind ===========================================================

/// Tag of a [`Value`] variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Int,
    Float,
    Vec2,
    Vec3,
    Vec4,
    Mat4,
    Pointer,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Int => "Int",
            Self::Float => "Float",
            Self::Vec2 => "Vec2",
            Self::Vec3 => "Vec3",
            Self::Vec4 => "Vec4",
            Self::Mat4 => "Mat4",
            Self::Pointer => "Pointer",
        };
        f.write_str(name)
    }
}

//=== TypeMismatch ========================================================

/// A payload was read through an accessor of a different variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("type mismatch: expected {expected}, found {found}")]
pub struct TypeMismatch {
    pub expected: ValueKind,
    pub found: ValueKind,
}

//=== Value ===============================================================

/// Dynamically typed property / uniform value.
///
/// `Pointer` carries an opaque address-sized token. The engine never
/// dereferences it; it only moves it between nodes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    Int(i32),
    Float(f32),
    Vec2(Vec2),
    Vec3(Vec3),
    Vec4(Vec4),
    Mat4(Mat4),
    Pointer(usize),
}

impl Value {
    //--- Construction -----------------------------------------------------

    pub fn int(value: i32) -> Self {
        Self::Int(value)
    }

    pub fn float(value: f32) -> Self {
        Self::Float(value)
    }

    pub fn vec2(x: f32, y: f32) -> Self {
        Self::Vec2(Vec2::new(x, y))
    }

    pub fn vec3(x: f32, y: f32, z: f32) -> Self {
        Self::Vec3(Vec3::new(x, y, z))
    }

    pub fn vec4(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self::Vec4(Vec4::new(x, y, z, w))
    }

    /// Builds a matrix from 16 column-major floats.
    pub fn mat4(cols: [f32; 16]) -> Self {
        Self::Mat4(Mat4::from_cols_array(&cols))
    }

    pub fn pointer(address: usize) -> Self {
        Self::Pointer(address)
    }

    //--- Inspection -------------------------------------------------------

    /// Returns the variant tag.
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Int(_) => ValueKind::Int,
            Self::Float(_) => ValueKind::Float,
            Self::Vec2(_) => ValueKind::Vec2,
            Self::Vec3(_) => ValueKind::Vec3,
            Self::Vec4(_) => ValueKind::Vec4,
            Self::Mat4(_) => ValueKind::Mat4,
            Self::Pointer(_) => ValueKind::Pointer,
        }
    }

    /// Checks the tag without reading the payload.
    pub fn expect_kind(&self, expected: ValueKind) -> Result<(), TypeMismatch> {
        if self.kind() == expected {
            Ok(())
        } else {
            Err(self.mismatch(expected))
        }
    }

    //--- Typed Accessors --------------------------------------------------

    pub fn as_int(&self) -> Result<i32, TypeMismatch> {
        match self {
            Self::Int(v) => Ok(*v),
            _ => Err(self.mismatch(ValueKind::Int)),
        }
    }

    pub fn as_float(&self) -> Result<f32, TypeMismatch> {
        match self {
            Self::Float(v) => Ok(*v),
            _ => Err(self.mismatch(ValueKind::Float)),
        }
    }

    pub fn as_vec2(&self) -> Result<Vec2, TypeMismatch> {
        match self {
            Self::Vec2(v) => Ok(*v),
            _ => Err(self.mismatch(ValueKind::Vec2)),
        }
    }

    pub fn as_vec3(&self) -> Result<Vec3, TypeMismatch> {
        match self {
            Self::Vec3(v) => Ok(*v),
            _ => Err(self.mismatch(ValueKind::Vec3)),
        }
    }

    pub fn as_vec4(&self) -> Result<Vec4, TypeMismatch> {
        match self {
            Self::Vec4(v) => Ok(*v),
            _ => Err(self.mismatch(ValueKind::Vec4)),
        }
    }

    pub fn as_mat4(&self) -> Result<Mat4, TypeMismatch> {
        match self {
            Self::Mat4(v) => Ok(*v),
            _ => Err(self.mismatch(ValueKind::Mat4)),
        }
    }

    pub fn as_pointer(&self) -> Result<usize, TypeMismatch> {
        match self {
            Self::Pointer(v) => Ok(*v),
            _ => Err(self.mismatch(ValueKind::Pointer)),
        }
    }

    //--- Internal Helpers -------------------------------------------------

    fn mismatch(&self, expected: ValueKind) -> TypeMismatch {
        TypeMismatch {
            expected,
            found: self.kind(),
        }
    }
}

//=== Conversions =========================================================

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Int(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Self::Float(v)
    }
}

impl From<Vec2> for Value {
    fn from(v: Vec2) -> Self {
        Self::Vec2(v)
    }
}

impl From<Vec3> for Value {
    fn from(v: Vec3) -> Self {
        Self::Vec3(v)
    }
}

impl From<Vec4> for Value {
    fn from(v: Vec4) -> Self {
        Self::Vec4(v)
    }
}

impl From<Mat4> for Value {
    fn from(v: Mat4) -> Self {
        Self::Mat4(v)
    }
}

//=== Display =============================================================

/// Diagnostic rendering: variant name followed by its payload.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "Int({})", v),
            Self::Float(v) => write!(f, "Float({})", v),
            Self::Vec2(v) => write!(f, "Vec2({}, {})", v.x, v.y),
            Self::Vec3(v) => write!(f, "Vec3({}, {}, {})", v.x, v.y, v.z),
            Self::Vec4(v) => write!(f, "Vec4({}, {}, {}, {})", v.x, v.y, v.z, v.w),
            Self::Mat4(m) => {
                f.write_str("Mat4(")?;
                for (i, c) in m.to_cols_array().iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", c)?;
                }
                f.write_str(")")
            }
            Self::Pointer(p) => write!(f, "Pointer({:#x})", p),
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    //=====================================================================
    // Accessor Tests
    //=====================================================================

    #[test]
    fn accessor_matching_variant_returns_payload() {
        assert_eq!(Value::int(7).as_int(), Ok(7));
        assert_eq!(Value::float(1.5).as_float(), Ok(1.5));
        assert_eq!(Value::vec3(1.0, 2.0, 3.0).as_vec3(), Ok(Vec3::new(1.0, 2.0, 3.0)));
        assert_eq!(Value::pointer(0x10).as_pointer(), Ok(0x10));
    }

    #[test]
    fn accessor_wrong_variant_reports_both_kinds() {
        let err = Value::int(7).as_float().unwrap_err();
        assert_eq!(err.expected, ValueKind::Float);
        assert_eq!(err.found, ValueKind::Int);
    }

    #[test]
    fn mat4_constructor_is_column_major() {
        let mut cols = [0.0; 16];
        cols[12] = 5.0; // translation x lives in the fourth column
        let m = Value::mat4(cols).as_mat4().unwrap();
        assert_eq!(m.w_axis.x, 5.0);
    }

    #[test]
    fn expect_kind_checks_tag_only() {
        assert!(Value::vec2(0.0, 0.0).expect_kind(ValueKind::Vec2).is_ok());
        assert!(Value::vec2(0.0, 0.0).expect_kind(ValueKind::Vec3).is_err());
    }

    //=====================================================================
    // Display Tests
    //=====================================================================

    #[test]
    fn display_names_variant_and_payload() {
        assert_eq!(Value::int(3).to_string(), "Int(3)");
        assert_eq!(Value::vec3(1.0, 2.0, 3.0).to_string(), "Vec3(1, 2, 3)");
        assert_eq!(Value::pointer(16).to_string(), "Pointer(0x10)");
        assert!(Value::Mat4(Mat4::IDENTITY).to_string().starts_with("Mat4(1, 0, 0, 0"));
    }

    #[test]
    fn display_distinguishes_int_and_float() {
        assert_ne!(Value::int(1).to_string(), Value::float(1.0).to_string());
    }
}
