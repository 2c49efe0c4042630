//! Faults and execution errors.
//!
//! [`Fault`] is what the semantics functions themselves report. It is the
//! complete list of ways a well-typed instruction can fail. [`ExecError`]
//! adds the conditions a frame detects while feeding operands to those
//! functions; every variant carries the instruction index (`at`).

use opsem_common::{ElementKind, Kind, Opcode};
use thiserror::Error;

/// Arithmetic faults. Overflow, NaN and infinity are values, not faults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ArithmeticFault {
    /// Integer division or remainder with a zero divisor.
    #[error("divide by zero")]
    DivideByZero,
}

/// Faults raised by instruction semantics.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Fault {
    #[error("arithmetic fault: {0}")]
    Arithmetic(#[from] ArithmeticFault),

    /// Array index outside `[0, length)`.
    #[error("array index {index} out of range (length {length})")]
    IndexOutOfRange { index: i32, length: usize },

    /// Local slot index outside `[0, length)`.
    #[error("local slot {index} out of range (length {length})")]
    OutOfRange { index: u16, length: usize },

    /// Stored value's kind does not fit the array's declared element kind.
    #[error("cannot store {found} into {declared} array")]
    ArrayStore { declared: ElementKind, found: Kind },
}

impl Fault {
    pub const DIVIDE_BY_ZERO: Fault = Fault::Arithmetic(ArithmeticFault::DivideByZero);
}

/// Errors that stop a frame.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecError {
    /// An instruction faulted.
    #[error("{fault} at instruction {at}")]
    Fault { at: usize, fault: Fault },

    /// Pop on an empty operand stack.
    #[error("stack underflow at instruction {at}")]
    StackUnderflow { at: usize },

    /// Push beyond the frame's maximum stack depth.
    #[error("stack overflow at instruction {at}")]
    StackOverflow { at: usize },

    /// Operand of the wrong kind for the instruction.
    #[error("{opcode} expected {expected}, found {found} at instruction {at}")]
    KindMismatch {
        at: usize,
        opcode: Opcode,
        expected: Kind,
        found: Kind,
    },

    /// Array instruction applied to null.
    #[error("null reference at instruction {at}")]
    NullReference { at: usize },

    /// Reference operand that is not an array.
    #[error("{opcode} on non-array reference at instruction {at}")]
    NotAnArray { at: usize, opcode: Opcode },

    /// Array element kind does not match the instruction family.
    #[error("{opcode} on {found} array at instruction {at}")]
    ArrayKindMismatch {
        at: usize,
        opcode: Opcode,
        found: ElementKind,
    },

    /// `newarray`/`anewarray` with a negative length.
    #[error("negative array size {size} at instruction {at}")]
    NegativeArraySize { at: usize, size: i32 },

    /// Operand missing or of the wrong shape for the opcode.
    #[error("malformed operand for {opcode} at instruction {at}")]
    BadOperand { at: usize, opcode: Opcode },

    /// Static field that was never defined.
    #[error("unknown static field '{name}' at instruction {at}")]
    UnknownField { at: usize, name: String },

    /// Static field accessed with a kind other than the one it was defined with.
    #[error("static field '{name}' is {declared}, not {found}, at instruction {at}")]
    FieldKindMismatch {
        at: usize,
        name: String,
        declared: Kind,
        found: Kind,
    },
}

impl ExecError {
    /// Instruction index the error was raised at.
    pub fn at(&self) -> usize {
        match self {
            ExecError::Fault { at, .. }
            | ExecError::StackUnderflow { at }
            | ExecError::StackOverflow { at }
            | ExecError::KindMismatch { at, .. }
            | ExecError::NullReference { at }
            | ExecError::NotAnArray { at, .. }
            | ExecError::ArrayKindMismatch { at, .. }
            | ExecError::NegativeArraySize { at, .. }
            | ExecError::BadOperand { at, .. }
            | ExecError::UnknownField { at, .. }
            | ExecError::FieldKindMismatch { at, .. } => *at,
        }
    }

    /// The underlying fault, if this error is one.
    pub fn fault(&self) -> Option<&Fault> {
        match self {
            ExecError::Fault { fault, .. } => Some(fault),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fault_display_formats() {
        assert_eq!(
            Fault::DIVIDE_BY_ZERO.to_string(),
            "arithmetic fault: divide by zero"
        );
        assert_eq!(
            Fault::IndexOutOfRange {
                index: -1,
                length: 1
            }
            .to_string(),
            "array index -1 out of range (length 1)"
        );
        assert_eq!(
            Fault::OutOfRange {
                index: 4,
                length: 4
            }
            .to_string(),
            "local slot 4 out of range (length 4)"
        );
        assert_eq!(
            Fault::ArrayStore {
                declared: ElementKind::Byte,
                found: Kind::Long
            }
            .to_string(),
            "cannot store long into byte array"
        );
    }

    #[test]
    fn exec_error_display_formats() {
        assert_eq!(
            ExecError::Fault {
                at: 2,
                fault: Fault::DIVIDE_BY_ZERO
            }
            .to_string(),
            "arithmetic fault: divide by zero at instruction 2"
        );
        assert_eq!(
            ExecError::KindMismatch {
                at: 0,
                opcode: Opcode::Iadd,
                expected: Kind::Int,
                found: Kind::Float
            }
            .to_string(),
            "iadd expected int, found float at instruction 0"
        );
        assert_eq!(
            ExecError::StackUnderflow { at: 3 }.to_string(),
            "stack underflow at instruction 3"
        );
    }

    #[test]
    fn at_and_fault_accessors() {
        let e = ExecError::Fault {
            at: 7,
            fault: Fault::DIVIDE_BY_ZERO,
        };
        assert_eq!(e.at(), 7);
        assert_eq!(e.fault(), Some(&Fault::DIVIDE_BY_ZERO));
        assert_eq!(ExecError::NullReference { at: 1 }.fault(), None);
    }
}
