//! Fixed-length, homogeneously typed array storage.
//!
//! The backing vector is chosen by the declared element kind, so a byte
//! array can only ever hold `i8` values: narrowing happens before a value
//! reaches the storage, never after.

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::kind::ElementKind;
use crate::reference::Reference;

/// Typed backing storage for an [`ArrayCell`].
#[derive(Debug, Clone, PartialEq)]
pub enum ArrayData {
    Byte(Vec<i8>),
    Short(Vec<i16>),
    Char(Vec<u16>),
    Int(Vec<i32>),
    Long(Vec<i64>),
    Float(Vec<f32>),
    Double(Vec<f64>),
    Reference(Vec<Reference>),
}

impl ArrayData {
    /// Zero-filled (or null-filled) storage of `len` elements.
    pub fn zeroed(kind: ElementKind, len: usize) -> Self {
        match kind {
            ElementKind::Byte => ArrayData::Byte(vec![0; len]),
            ElementKind::Short => ArrayData::Short(vec![0; len]),
            ElementKind::Char => ArrayData::Char(vec![0; len]),
            ElementKind::Int => ArrayData::Int(vec![0; len]),
            ElementKind::Long => ArrayData::Long(vec![0; len]),
            ElementKind::Float => ArrayData::Float(vec![0.0; len]),
            ElementKind::Double => ArrayData::Double(vec![0.0; len]),
            ElementKind::Reference => ArrayData::Reference(vec![Reference::null(); len]),
        }
    }

    /// Element kind implied by the storage variant.
    pub fn kind(&self) -> ElementKind {
        match self {
            ArrayData::Byte(_) => ElementKind::Byte,
            ArrayData::Short(_) => ElementKind::Short,
            ArrayData::Char(_) => ElementKind::Char,
            ArrayData::Int(_) => ElementKind::Int,
            ArrayData::Long(_) => ElementKind::Long,
            ArrayData::Float(_) => ElementKind::Float,
            ArrayData::Double(_) => ElementKind::Double,
            ArrayData::Reference(_) => ElementKind::Reference,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ArrayData::Byte(v) => v.len(),
            ArrayData::Short(v) => v.len(),
            ArrayData::Char(v) => v.len(),
            ArrayData::Int(v) => v.len(),
            ArrayData::Long(v) => v.len(),
            ArrayData::Float(v) => v.len(),
            ArrayData::Double(v) => v.len(),
            ArrayData::Reference(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A mutable array that may be shared between execution contexts.
///
/// The declared kind never changes after creation. Length is always read
/// from the storage itself. Each read or write takes the lock for the
/// duration of one element access only; ordering between concurrent
/// writers is left to whoever shares the cell.
#[derive(Debug)]
pub struct ArrayCell {
    kind: ElementKind,
    data: RwLock<ArrayData>,
}

impl ArrayCell {
    /// Create a zero-initialised array.
    pub fn new(kind: ElementKind, len: usize) -> Self {
        Self::from_data(ArrayData::zeroed(kind, len))
    }

    /// Wrap existing storage.
    pub fn from_data(data: ArrayData) -> Self {
        Self {
            kind: data.kind(),
            data: RwLock::new(data),
        }
    }

    /// Declared element kind.
    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    /// Current number of elements. Takes the read lock.
    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Shared access to the storage.
    pub fn read(&self) -> RwLockReadGuard<'_, ArrayData> {
        self.data.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Exclusive access to the storage.
    ///
    /// Element accessors check indices against the storage held by the
    /// guard, so replacing it cannot make them index out of bounds.
    pub fn write(&self) -> RwLockWriteGuard<'_, ArrayData> {
        self.data.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Copy of the current contents.
    pub fn snapshot(&self) -> ArrayData {
        self.read().clone()
    }
}
