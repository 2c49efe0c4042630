//! Local slots and array element access.

use opsem_common::{ArrayCell, ArrayData, ElementKind, Reference, Value};

use crate::convert;
use crate::error::Fault;

/// The local variable slots of one activation.
///
/// Every value occupies one slot, longs and doubles included. Slots are
/// retypeable: a store never checks what the slot held before.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalSlots {
    slots: Vec<Value>,
}

impl LocalSlots {
    /// `len` slots, all holding int 0.
    pub fn new(len: usize) -> Self {
        Self {
            slots: vec![Value::Int32(0); len],
        }
    }

    /// Slots pre-filled with the given values, e.g. call arguments.
    pub fn from_values(values: Vec<Value>) -> Self {
        Self { slots: values }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn load(&self, index: u16) -> Result<Value, Fault> {
        self.slots
            .get(usize::from(index))
            .cloned()
            .ok_or(Fault::OutOfRange {
                index,
                length: self.slots.len(),
            })
    }

    pub fn store(&mut self, index: u16, value: Value) -> Result<(), Fault> {
        let length = self.slots.len();
        let slot = self
            .slots
            .get_mut(usize::from(index))
            .ok_or(Fault::OutOfRange { index, length })?;
        *slot = value;
        Ok(())
    }

    pub fn values(&self) -> &[Value] {
        &self.slots
    }
}

/// Allocate a zero-initialised array of `len` elements.
pub fn new_array(kind: ElementKind, len: usize) -> Reference {
    Reference::array(kind, len)
}

/// Array length as the int `arraylength` pushes.
pub fn array_length(cell: &ArrayCell) -> i32 {
    i32::try_from(cell.len()).unwrap_or(i32::MAX)
}

/// Checked against the storage under the caller's guard, never a cached length.
fn element_index(index: i32, length: usize) -> Result<usize, Fault> {
    usize::try_from(index)
        .ok()
        .filter(|&i| i < length)
        .ok_or(Fault::IndexOutOfRange { index, length })
}

/// Read one element, widened to its stack kind. Byte and short elements
/// sign-extend to int; char elements zero-extend.
pub fn array_load(cell: &ArrayCell, index: i32) -> Result<Value, Fault> {
    let data = cell.read();
    let i = element_index(index, data.len())?;
    let value = match &*data {
        ArrayData::Byte(v) => Value::Int32(i32::from(v[i])),
        ArrayData::Short(v) => Value::Int32(i32::from(v[i])),
        ArrayData::Char(v) => Value::Int32(i32::from(v[i])),
        ArrayData::Int(v) => Value::Int32(v[i]),
        ArrayData::Long(v) => Value::Int64(v[i]),
        ArrayData::Float(v) => Value::Float32(v[i]),
        ArrayData::Double(v) => Value::Float64(v[i]),
        ArrayData::Reference(v) => Value::Reference(v[i].clone()),
    };
    Ok(value)
}

/// Write one element, narrowing ints to the declared element width.
///
/// The index is checked first, then the value's kind against the declared
/// element kind.
pub fn array_store(cell: &ArrayCell, index: i32, value: Value) -> Result<(), Fault> {
    let declared = cell.kind();
    let mut data = cell.write();
    let i = element_index(index, data.len())?;
    match (&mut *data, value) {
        (ArrayData::Byte(v), Value::Int32(x)) => v[i] = convert::to_byte(x),
        (ArrayData::Short(v), Value::Int32(x)) => v[i] = convert::to_short(x),
        (ArrayData::Char(v), Value::Int32(x)) => v[i] = convert::to_char(x),
        (ArrayData::Int(v), Value::Int32(x)) => v[i] = x,
        (ArrayData::Long(v), Value::Int64(x)) => v[i] = x,
        (ArrayData::Float(v), Value::Float32(x)) => v[i] = x,
        (ArrayData::Double(v), Value::Float64(x)) => v[i] = x,
        (ArrayData::Reference(v), Value::Reference(x)) => v[i] = x,
        (_, other) => {
            return Err(Fault::ArrayStore {
                declared,
                found: other.kind(),
            })
        }
    }
    Ok(())
}
