//! Runtime value representation.
//!
//! Values are what live on the operand stack, in local slots and in
//! static fields. A value's kind never changes; every cross-kind step is
//! an explicit conversion performed by the VM.

use std::fmt;

use crate::kind::Kind;
use crate::reference::Reference;

/// A tagged value of exactly one [`Kind`].
#[derive(Debug, Clone)]
pub enum Value {
    Int32(i32),
    Int64(i64),
    Float32(f32),
    Float64(f64),
    Reference(Reference),
}

// Floats compare by bit pattern so that `Value` is `Eq` and fixture
// expectations can name NaN and -0.0 exactly. Numeric comparison with
// IEEE semantics lives in the VM's compare module.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Int32(a), Value::Int32(b)) => a == b,
            (Value::Int64(a), Value::Int64(b)) => a == b,
            (Value::Float32(a), Value::Float32(b)) => a.to_bits() == b.to_bits(),
            (Value::Float64(a), Value::Float64(b)) => a.to_bits() == b.to_bits(),
            (Value::Reference(a), Value::Reference(b)) => a.same_as(b),
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Value {
    /// The null reference value.
    pub fn null() -> Self {
        Value::Reference(Reference::null())
    }

    pub fn kind(&self) -> Kind {
        match self {
            Value::Int32(_) => Kind::Int,
            Value::Int64(_) => Kind::Long,
            Value::Float32(_) => Kind::Float,
            Value::Float64(_) => Kind::Double,
            Value::Reference(_) => Kind::Reference,
        }
    }

    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Value::Int32(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f32(&self) -> Option<f32> {
        match self {
            Value::Float32(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_reference(&self) -> Option<&Reference> {
        match self {
            Value::Reference(r) => Some(r),
            _ => None,
        }
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int32(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int64(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float32(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float64(v)
    }
}

impl From<Reference> for Value {
    fn from(r: Reference) -> Self {
        Value::Reference(r)
    }
}

/// Writes a float the way the assembler reads it back: shortest
/// round-trip digits, `NaN`, `Infinity`, `-Infinity`.
fn write_float(
    f: &mut fmt::Formatter<'_>,
    digits: String,
    is_nan: bool,
    is_inf: bool,
    negative: bool,
    suffix: char,
) -> fmt::Result {
    if is_nan {
        write!(f, "NaN{suffix}")
    } else if is_inf {
        let sign = if negative { "-" } else { "" };
        write!(f, "{sign}Infinity{suffix}")
    } else {
        write!(f, "{digits}{suffix}")
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int32(v) => write!(f, "{v}"),
            Value::Int64(v) => write!(f, "{v}L"),
            Value::Float32(v) => write_float(
                f,
                format!("{v:?}"),
                v.is_nan(),
                v.is_infinite(),
                v.is_sign_negative(),
                'f',
            ),
            Value::Float64(v) => write_float(
                f,
                format!("{v:?}"),
                v.is_nan(),
                v.is_infinite(),
                v.is_sign_negative(),
                'd',
            ),
            Value::Reference(r) => write!(f, "{r}"),
        }
    }
}
