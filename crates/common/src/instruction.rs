//! Decoded instructions with already-resolved operands.
//!
//! There is no binary encoding here: constant-pool entries arrive as
//! [`Value`]s, field and method references as names with kinds. Whatever
//! loaded the class did the resolving.

use std::fmt;

use crate::kind::{ElementKind, Kind};
use crate::opcode::Opcode;
use crate::value::Value;

/// A static field, by name and declared kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldRef {
    pub name: String,
    pub kind: Kind,
}

impl FieldRef {
    pub fn new(name: impl Into<String>, kind: Kind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// A static method, by name and signature.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MethodRef {
    pub name: String,
    pub params: Vec<Kind>,
    /// `None` for void methods.
    pub returns: Option<Kind>,
}

impl MethodRef {
    pub fn new(name: impl Into<String>, params: Vec<Kind>, returns: Option<Kind>) -> Self {
        Self {
            name: name.into(),
            params,
            returns,
        }
    }

    /// Method descriptor such as `(JIJ)J`.
    pub fn descriptor(&self) -> String {
        let mut out = String::from("(");
        for kind in &self.params {
            out.push_str(field_descriptor(*kind));
        }
        out.push(')');
        match self.returns {
            Some(kind) => out.push_str(field_descriptor(kind)),
            None => out.push('V'),
        }
        out
    }
}

/// Canonical descriptor text for a kind. References print as `Object`.
pub fn field_descriptor(kind: Kind) -> &'static str {
    match kind {
        Kind::Int => "I",
        Kind::Long => "J",
        Kind::Float => "F",
        Kind::Double => "D",
        Kind::Reference => "Ljava/lang/Object;",
    }
}

/// Parse one field descriptor from the front of `s`, returning the kind
/// and the unconsumed rest. Class names and array dimensions are skipped.
fn take_field_descriptor(s: &str) -> Option<(Kind, &str)> {
    let first = s.chars().next()?;
    match first {
        'L' => {
            let end = s.find(';')?;
            Some((Kind::Reference, &s[end + 1..]))
        }
        '[' => {
            let element = s.trim_start_matches('[');
            let (_, rest) = take_field_descriptor(element)?;
            Some((Kind::Reference, rest))
        }
        c => Some((Kind::from_descriptor(c)?, &s[c.len_utf8()..])),
    }
}

/// Parse a complete field descriptor (`I`, `J`, `Ljava/lang/String;`, ...).
pub fn parse_field_descriptor(s: &str) -> Option<Kind> {
    match take_field_descriptor(s)? {
        (kind, "") => Some(kind),
        _ => None,
    }
}

/// Parse a method descriptor into parameter kinds and return kind.
pub fn parse_method_descriptor(s: &str) -> Option<(Vec<Kind>, Option<Kind>)> {
    let mut rest = s.strip_prefix('(')?;
    let mut params = Vec::new();
    while !rest.starts_with(')') {
        let (kind, tail) = take_field_descriptor(rest)?;
        params.push(kind);
        rest = tail;
    }
    let ret = &rest[1..];
    let returns = if ret == "V" {
        None
    } else {
        Some(parse_field_descriptor(ret)?)
    };
    Some((params, returns))
}

/// The resolved operand of an instruction.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    None,
    /// Local slot index.
    Local(u16),
    /// `bipush`/`sipush` immediate, already sign-extended.
    Immediate(i32),
    /// Materialized constant.
    Constant(Value),
    /// `iinc` slot and delta.
    Increment { index: u16, delta: i16 },
    /// Branch offset relative to the branch instruction.
    Branch(i16),
    ElementKind(ElementKind),
    Field(FieldRef),
    Method(MethodRef),
}

/// A single decoded instruction.
#[derive(Debug, Clone, PartialEq)]
pub struct Instruction {
    pub opcode: Opcode,
    pub operand: Operand,
}

impl Instruction {
    pub fn new(opcode: Opcode, operand: Operand) -> Self {
        Self { opcode, operand }
    }

    /// An instruction with no operand.
    pub fn simple(opcode: Opcode) -> Self {
        Self::new(opcode, Operand::None)
    }
}

impl From<Opcode> for Instruction {
    fn from(opcode: Opcode) -> Self {
        Instruction::simple(opcode)
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let op = self.opcode.mnemonic();
        match &self.operand {
            Operand::None => f.write_str(op),
            Operand::Local(index) => write!(f, "{op} {index}"),
            Operand::Immediate(value) => write!(f, "{op} {value}"),
            Operand::Constant(value) => write!(f, "{op} {value}"),
            Operand::Increment { index, delta } => write!(f, "{op} {index} {delta}"),
            Operand::Branch(offset) => write!(f, "{op} {offset:+}"),
            Operand::ElementKind(kind) => write!(f, "{op} {kind}"),
            Operand::Field(field) => {
                write!(f, "{op} {} {}", field.name, field_descriptor(field.kind))
            }
            Operand::Method(method) => write!(f, "{op} {} {}", method.name, method.descriptor()),
        }
    }
}

/// A straight-line sequence of instructions.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Block {
    pub instructions: Vec<Instruction>,
}

impl Block {
    pub fn new(instructions: Vec<Instruction>) -> Self {
        Self { instructions }
    }

    pub fn get(&self, pc: usize) -> Option<&Instruction> {
        self.instructions.get(pc)
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }
}

impl FromIterator<Instruction> for Block {
    fn from_iter<T: IntoIterator<Item = Instruction>>(iter: T) -> Self {
        Block::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::Reference;

    #[test]
    fn display_forms() {
        assert_eq!(Instruction::simple(Opcode::Iadd).to_string(), "iadd");
        assert_eq!(
            Instruction::new(Opcode::Bipush, Operand::Immediate(-1)).to_string(),
            "bipush -1"
        );
        assert_eq!(
            Instruction::new(Opcode::Ldc2W, Operand::Constant(Value::Int64(3))).to_string(),
            "ldc2_w 3L"
        );
        assert_eq!(
            Instruction::new(
                Opcode::Ldc,
                Operand::Constant(Value::Reference(Reference::string("你好")))
            )
            .to_string(),
            "ldc \"你好\""
        );
        assert_eq!(
            Instruction::new(Opcode::Iinc, Operand::Increment { index: 1, delta: -3 })
                .to_string(),
            "iinc 1 -3"
        );
        assert_eq!(
            Instruction::new(Opcode::IfIcmpne, Operand::Branch(7)).to_string(),
            "if_icmpne +7"
        );
        assert_eq!(
            Instruction::new(Opcode::Newarray, Operand::ElementKind(ElementKind::Byte))
                .to_string(),
            "newarray byte"
        );
        assert_eq!(
            Instruction::new(Opcode::Getstatic, Operand::Field(FieldRef::new("i", Kind::Int)))
                .to_string(),
            "getstatic i I"
        );
    }

    #[test]
    fn method_descriptor_roundtrip() {
        let m = MethodRef::new("foo", vec![Kind::Long, Kind::Int, Kind::Long], Some(Kind::Long));
        assert_eq!(m.descriptor(), "(JIJ)J");
        assert_eq!(
            parse_method_descriptor("(JIJ)J"),
            Some((vec![Kind::Long, Kind::Int, Kind::Long], Some(Kind::Long)))
        );
    }

    #[test]
    fn method_descriptor_with_objects_and_arrays() {
        assert_eq!(
            parse_method_descriptor("(Ljava/lang/String;[[IB)V"),
            Some((vec![Kind::Reference, Kind::Reference, Kind::Int], None))
        );
    }

    #[test]
    fn malformed_descriptors() {
        assert_eq!(parse_method_descriptor("JIJ)J"), None);
        assert_eq!(parse_method_descriptor("(Ljava/lang/String)V"), None);
        assert_eq!(parse_method_descriptor("(I)"), None);
        assert_eq!(parse_field_descriptor("II"), None);
        assert_eq!(parse_field_descriptor("V"), None);
    }

    #[test]
    fn block_collects() {
        let block: Block = [Opcode::Iconst1, Opcode::Ireturn]
            .into_iter()
            .map(Instruction::from)
            .collect();
        assert_eq!(block.len(), 2);
        assert_eq!(block.get(1).map(|i| i.opcode), Some(Opcode::Ireturn));
        assert!(block.get(2).is_none());
    }
}
