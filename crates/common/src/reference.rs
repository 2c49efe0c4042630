//! Nullable references with identity semantics.

use std::fmt;
use std::sync::Arc;

use crate::array::ArrayCell;
use crate::kind::ElementKind;

/// A heap allocation a [`Reference`] can point at.
#[derive(Debug)]
pub enum Object {
    /// A primitive or reference array.
    Array(ArrayCell),
    /// A string constant.
    String(String),
    /// A class literal, by internal name.
    Class(String),
}

/// A nullable, shareable handle to an [`Object`].
///
/// Two references are equal iff they point at the same allocation or are
/// both null. Contents are never compared.
#[derive(Debug, Clone, Default)]
pub struct Reference(Option<Arc<Object>>);

impl Reference {
    /// The null reference.
    pub fn null() -> Self {
        Reference(None)
    }

    /// Allocate a new object and return the only reference to it.
    pub fn new(object: Object) -> Self {
        Reference(Some(Arc::new(object)))
    }

    /// Allocate a string object.
    pub fn string(s: impl Into<String>) -> Self {
        Reference::new(Object::String(s.into()))
    }

    /// Allocate a class literal object.
    pub fn class(name: impl Into<String>) -> Self {
        Reference::new(Object::Class(name.into()))
    }

    /// Allocate a zero-initialised array.
    pub fn array(kind: ElementKind, len: usize) -> Self {
        Reference::new(Object::Array(ArrayCell::new(kind, len)))
    }

    pub fn is_null(&self) -> bool {
        self.0.is_none()
    }

    /// Identity comparison.
    pub fn same_as(&self, other: &Reference) -> bool {
        match (&self.0, &other.0) {
            (None, None) => true,
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    pub fn object(&self) -> Option<&Object> {
        self.0.as_deref()
    }

    /// The array this reference points at, if any.
    pub fn as_array(&self) -> Option<&ArrayCell> {
        match self.object()? {
            Object::Array(cell) => Some(cell),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self.object()? {
            Object::String(s) => Some(s),
            _ => None,
        }
    }
}

impl PartialEq for Reference {
    fn eq(&self, other: &Self) -> bool {
        self.same_as(other)
    }
}

impl Eq for Reference {}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.object() {
            None => f.write_str("null"),
            Some(Object::String(s)) => write!(f, "{s:?}"),
            Some(Object::Class(name)) => write!(f, "class {name}"),
            Some(Object::Array(cell)) => write!(f, "{}[{}]", cell.kind(), cell.len()),
        }
    }
}
