//! Value kinds and array element kinds.

use std::fmt;
use std::str::FromStr;

use crate::error::DecodeError;

/// The kind of a value on the operand stack or in a local slot.
///
/// Narrow integer types (byte, short, char) never appear here: they only
/// exist as array element kinds and are widened to `Int` on load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    /// Two's-complement 32-bit integer.
    Int,
    /// Two's-complement 64-bit integer.
    Long,
    /// IEEE 754 binary32.
    Float,
    /// IEEE 754 binary64.
    Double,
    /// Nullable handle with identity semantics.
    Reference,
}

/// All value kinds, in definition order.
pub const ALL_KINDS: [Kind; 5] = [
    Kind::Int,
    Kind::Long,
    Kind::Float,
    Kind::Double,
    Kind::Reference,
];

impl Kind {
    /// Source-level name of this kind.
    pub fn name(&self) -> &'static str {
        match self {
            Kind::Int => "int",
            Kind::Long => "long",
            Kind::Float => "float",
            Kind::Double => "double",
            Kind::Reference => "reference",
        }
    }

    /// Single-letter field descriptor (`I`, `J`, `F`, `D`, `L`).
    pub fn descriptor(&self) -> char {
        match self {
            Kind::Int => 'I',
            Kind::Long => 'J',
            Kind::Float => 'F',
            Kind::Double => 'D',
            Kind::Reference => 'L',
        }
    }

    /// Kind named by a descriptor letter. Byte, short, char and boolean
    /// descriptors all load as `Int`.
    pub fn from_descriptor(c: char) -> Option<Kind> {
        match c {
            'I' | 'B' | 'S' | 'C' | 'Z' => Some(Kind::Int),
            'J' => Some(Kind::Long),
            'F' => Some(Kind::Float),
            'D' => Some(Kind::Double),
            'L' | '[' => Some(Kind::Reference),
            _ => None,
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Declared element kind of an array, fixed at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    /// Signed 8-bit.
    Byte,
    /// Signed 16-bit.
    Short,
    /// Unsigned 16-bit.
    Char,
    /// Signed 32-bit.
    Int,
    /// Signed 64-bit.
    Long,
    /// binary32.
    Float,
    /// binary64.
    Double,
    /// Reference or null.
    Reference,
}

/// All element kinds, in definition order.
pub const ALL_ELEMENT_KINDS: [ElementKind; 8] = [
    ElementKind::Byte,
    ElementKind::Short,
    ElementKind::Char,
    ElementKind::Int,
    ElementKind::Long,
    ElementKind::Float,
    ElementKind::Double,
    ElementKind::Reference,
];

impl ElementKind {
    /// Source-level name of this element kind.
    pub fn name(&self) -> &'static str {
        match self {
            ElementKind::Byte => "byte",
            ElementKind::Short => "short",
            ElementKind::Char => "char",
            ElementKind::Int => "int",
            ElementKind::Long => "long",
            ElementKind::Float => "float",
            ElementKind::Double => "double",
            ElementKind::Reference => "reference",
        }
    }

    /// The stack kind an element of this kind loads as and is stored from.
    pub fn value_kind(&self) -> Kind {
        match self {
            ElementKind::Byte | ElementKind::Short | ElementKind::Char | ElementKind::Int => {
                Kind::Int
            }
            ElementKind::Long => Kind::Long,
            ElementKind::Float => Kind::Float,
            ElementKind::Double => Kind::Double,
            ElementKind::Reference => Kind::Reference,
        }
    }

    /// The `newarray` element type code, or `None` for reference arrays
    /// (created by `anewarray` instead).
    pub fn type_code(&self) -> Option<u8> {
        match self {
            ElementKind::Char => Some(5),
            ElementKind::Float => Some(6),
            ElementKind::Double => Some(7),
            ElementKind::Byte => Some(8),
            ElementKind::Short => Some(9),
            ElementKind::Int => Some(10),
            ElementKind::Long => Some(11),
            ElementKind::Reference => None,
        }
    }
}

impl TryFrom<u8> for ElementKind {
    type Error = DecodeError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            5 => Ok(ElementKind::Char),
            6 => Ok(ElementKind::Float),
            7 => Ok(ElementKind::Double),
            8 => Ok(ElementKind::Byte),
            9 => Ok(ElementKind::Short),
            10 => Ok(ElementKind::Int),
            11 => Ok(ElementKind::Long),
            _ => Err(DecodeError::InvalidElementKind(value)),
        }
    }
}

impl FromStr for ElementKind {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ALL_ELEMENT_KINDS
            .iter()
            .find(|k| k.name() == s)
            .copied()
            .ok_or_else(|| DecodeError::UnknownElementKind(s.to_string()))
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
