//! Frame state: operand stack, local slots and instruction index.

use opsem_common::{Kind, MethodRef, Opcode, Reference, Value};

use crate::error::ExecError;
use crate::storage::LocalSlots;

/// Default maximum operand stack depth.
pub const MAX_STACK_DEPTH: usize = 4096;

/// Why [`Frame::run`](crate::Frame::run) stopped.
#[derive(Debug, Clone, PartialEq)]
pub enum Control {
    /// A return instruction executed; `None` for `return`.
    Return(Option<Value>),
    /// A conditional branch was taken. `offset` is relative to the branch
    /// instruction at index `at`; resolving it is up to the caller.
    Branch { at: usize, offset: i16 },
    /// `invokestatic` popped its arguments. The caller runs the method and
    /// hands the result back through [`Frame::resume`].
    Invoke { method: MethodRef, args: Vec<Value> },
    /// Ran off the end of the block.
    Continue,
}

/// One activation: its operand stack and local slots.
#[derive(Debug, Clone)]
pub struct Frame {
    pub(crate) stack: Vec<Value>,
    pub(crate) locals: LocalSlots,
    pub(crate) pc: usize,
    pub(crate) max_stack: usize,
}

impl Frame {
    pub fn new(locals: LocalSlots) -> Self {
        Self::with_max_stack(locals, MAX_STACK_DEPTH)
    }

    pub fn with_max_stack(locals: LocalSlots, max_stack: usize) -> Self {
        Self {
            stack: Vec::new(),
            locals,
            pc: 0,
            max_stack,
        }
    }

    /// Index of the next instruction to execute.
    pub fn pc(&self) -> usize {
        self.pc
    }

    /// Continue at another instruction index, e.g. a resolved branch target.
    pub fn jump(&mut self, pc: usize) {
        self.pc = pc;
    }

    pub fn stack(&self) -> &[Value] {
        &self.stack
    }

    pub fn locals(&self) -> &LocalSlots {
        &self.locals
    }

    pub fn locals_mut(&mut self) -> &mut LocalSlots {
        &mut self.locals
    }

    pub fn max_stack(&self) -> usize {
        self.max_stack
    }

    /// Push a value onto the stack, checking for overflow.
    pub fn push(&mut self, value: Value) -> Result<(), ExecError> {
        if self.stack.len() >= self.max_stack {
            return Err(ExecError::StackOverflow { at: self.pc });
        }
        self.stack.push(value);
        Ok(())
    }

    /// Pop a value from the stack.
    pub fn pop(&mut self) -> Result<Value, ExecError> {
        self.stack
            .pop()
            .ok_or(ExecError::StackUnderflow { at: self.pc })
    }

    /// Hand back the result of an [`Control::Invoke`]. Void methods pass
    /// `None`.
    pub fn resume(&mut self, result: Option<Value>) -> Result<(), ExecError> {
        match result {
            Some(value) => self.push(value),
            None => Ok(()),
        }
    }
}

/// The four primitive stack kinds, for typed pops.
pub(crate) trait Primitive: Copy + Into<Value> {
    const KIND: Kind;

    fn from_value(value: &Value) -> Option<Self>;
}

impl Primitive for i32 {
    const KIND: Kind = Kind::Int;

    fn from_value(value: &Value) -> Option<Self> {
        value.as_i32()
    }
}

impl Primitive for i64 {
    const KIND: Kind = Kind::Long;

    fn from_value(value: &Value) -> Option<Self> {
        value.as_i64()
    }
}

impl Primitive for f32 {
    const KIND: Kind = Kind::Float;

    fn from_value(value: &Value) -> Option<Self> {
        value.as_f32()
    }
}

impl Primitive for f64 {
    const KIND: Kind = Kind::Double;

    fn from_value(value: &Value) -> Option<Self> {
        value.as_f64()
    }
}

impl Frame {
    /// Pop a value that must be of the given kind.
    pub(crate) fn pop_kind(&mut self, opcode: Opcode, expected: Kind) -> Result<Value, ExecError> {
        let value = self.pop()?;
        if value.kind() != expected {
            return Err(ExecError::KindMismatch {
                at: self.pc,
                opcode,
                expected,
                found: value.kind(),
            });
        }
        Ok(value)
    }

    pub(crate) fn pop_as<T: Primitive>(&mut self, opcode: Opcode) -> Result<T, ExecError> {
        let value = self.pop()?;
        T::from_value(&value).ok_or(ExecError::KindMismatch {
            at: self.pc,
            opcode,
            expected: T::KIND,
            found: value.kind(),
        })
    }

    pub(crate) fn pop_reference(&mut self, opcode: Opcode) -> Result<Reference, ExecError> {
        match self.pop()? {
            Value::Reference(r) => Ok(r),
            other => Err(ExecError::KindMismatch {
                at: self.pc,
                opcode,
                expected: Kind::Reference,
                found: other.kind(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_pop() {
        let mut frame = Frame::new(LocalSlots::new(0));
        frame.push(Value::Int32(1)).unwrap();
        frame.push(Value::Int64(2)).unwrap();
        assert_eq!(frame.pop(), Ok(Value::Int64(2)));
        assert_eq!(frame.pop(), Ok(Value::Int32(1)));
        assert_eq!(frame.pop(), Err(ExecError::StackUnderflow { at: 0 }));
    }

    #[test]
    fn overflow_at_max_stack() {
        let mut frame = Frame::with_max_stack(LocalSlots::new(0), 2);
        frame.push(Value::Int32(1)).unwrap();
        frame.push(Value::Int32(2)).unwrap();
        assert_eq!(
            frame.push(Value::Int32(3)),
            Err(ExecError::StackOverflow { at: 0 })
        );
        assert_eq!(frame.stack().len(), 2);
    }

    #[test]
    fn default_depth() {
        assert_eq!(Frame::new(LocalSlots::new(0)).max_stack(), MAX_STACK_DEPTH);
    }

    #[test]
    fn typed_pops() {
        let mut frame = Frame::new(LocalSlots::new(0));
        frame.push(Value::Float32(1.5)).unwrap();
        assert_eq!(frame.pop_as::<f32>(Opcode::Fneg), Ok(1.5));

        frame.push(Value::Int64(1)).unwrap();
        assert_eq!(
            frame.pop_as::<i32>(Opcode::Iadd),
            Err(ExecError::KindMismatch {
                at: 0,
                opcode: Opcode::Iadd,
                expected: Kind::Int,
                found: Kind::Long
            })
        );

        frame.push(Value::Int32(0)).unwrap();
        assert!(frame.pop_reference(Opcode::Areturn).is_err());
    }

    #[test]
    fn resume_pushes_result() {
        let mut frame = Frame::new(LocalSlots::new(0));
        frame.resume(None).unwrap();
        assert!(frame.stack().is_empty());
        frame.resume(Some(Value::Int64(5))).unwrap();
        assert_eq!(frame.stack(), &[Value::Int64(5)]);
    }

    #[test]
    fn jump_moves_pc() {
        let mut frame = Frame::new(LocalSlots::new(0));
        frame.jump(9);
        assert_eq!(frame.pc(), 9);
    }
}
