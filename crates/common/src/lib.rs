//! opsem common types.
//!
//! This crate provides the data model shared by the VM, the assembler and
//! the CLI:
//!
//! - [`Value`] — the five value kinds: int, long, float, double, reference
//! - [`Reference`] / [`Object`] — nullable handles compared by identity
//! - [`ArrayCell`] — fixed-length arrays with a declared [`ElementKind`]
//! - [`Opcode`] — the instructions whose semantics the VM implements
//! - [`Instruction`] / [`Operand`] — decoded instructions with resolved operands
//! - [`Block`] — a straight-line instruction sequence
//! - [`DecodeError`] — errors from name and code lookups

pub mod array;
pub mod error;
pub mod instruction;
pub mod kind;
pub mod opcode;
pub mod reference;
pub mod value;

pub use array::{ArrayCell, ArrayData};
pub use error::DecodeError;
pub use instruction::{Block, FieldRef, Instruction, MethodRef, Operand};
pub use kind::{ElementKind, Kind};
pub use opcode::{Opcode, OperandShape};
pub use reference::{Object, Reference};
pub use value::Value;
