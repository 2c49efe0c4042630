//! Constant materialization.
//!
//! Constant-pool entries arrive already resolved to [`Value`]s; this module
//! supplies the implicit constants of the `*const_*` opcodes, widens the
//! `bipush`/`sipush` immediates, and checks that `ldc` variants load the
//! right category of constant.

use opsem_common::{Kind, Opcode, Value};

/// The value an operand-less constant opcode pushes, or `None` if the
/// opcode is not one.
pub fn implicit(opcode: Opcode) -> Option<Value> {
    let value = match opcode {
        Opcode::AconstNull => Value::null(),
        Opcode::IconstM1 => Value::Int32(-1),
        Opcode::Iconst0 => Value::Int32(0),
        Opcode::Iconst1 => Value::Int32(1),
        Opcode::Iconst2 => Value::Int32(2),
        Opcode::Iconst3 => Value::Int32(3),
        Opcode::Iconst4 => Value::Int32(4),
        Opcode::Iconst5 => Value::Int32(5),
        Opcode::Lconst0 => Value::Int64(0),
        Opcode::Lconst1 => Value::Int64(1),
        Opcode::Fconst0 => Value::Float32(0.0),
        Opcode::Fconst1 => Value::Float32(1.0),
        Opcode::Fconst2 => Value::Float32(2.0),
        Opcode::Dconst0 => Value::Float64(0.0),
        Opcode::Dconst1 => Value::Float64(1.0),
        _ => return None,
    };
    Some(value)
}

/// `bipush`: sign-extend a byte to int.
pub fn bipush(v: i8) -> Value {
    Value::Int32(i32::from(v))
}

/// `sipush`: sign-extend a short to int.
pub fn sipush(v: i16) -> Value {
    Value::Int32(i32::from(v))
}

/// Whether a constant of this kind may be loaded by `ldc`/`ldc_w`
/// (`wide == false`) or `ldc2_w` (`wide == true`).
pub fn loadable(kind: Kind, wide: bool) -> bool {
    match kind {
        Kind::Int | Kind::Float | Kind::Reference => !wide,
        Kind::Long | Kind::Double => wide,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use opsem_common::opcode::ALL_OPCODES;

    #[test]
    fn implicit_constants() {
        assert_eq!(implicit(Opcode::AconstNull), Some(Value::null()));
        assert_eq!(implicit(Opcode::IconstM1), Some(Value::Int32(-1)));
        assert_eq!(implicit(Opcode::Iconst5), Some(Value::Int32(5)));
        assert_eq!(implicit(Opcode::Lconst1), Some(Value::Int64(1)));
        assert_eq!(implicit(Opcode::Fconst2), Some(Value::Float32(2.0)));
        assert_eq!(implicit(Opcode::Dconst0), Some(Value::Float64(0.0)));
        assert_eq!(implicit(Opcode::Iadd), None);
        assert_eq!(implicit(Opcode::Bipush), None);
    }

    #[test]
    fn exactly_fifteen_implicit_constants() {
        let count = ALL_OPCODES
            .iter()
            .filter(|op| implicit(**op).is_some())
            .count();
        assert_eq!(count, 15);
    }

    #[test]
    fn pushes_sign_extend() {
        assert_eq!(bipush(127), Value::Int32(127));
        assert_eq!(bipush(-128), Value::Int32(-128));
        assert_eq!(sipush(32767), Value::Int32(32767));
        assert_eq!(sipush(-1), Value::Int32(-1));
    }

    #[test]
    fn ldc_categories() {
        assert!(loadable(Kind::Int, false));
        assert!(loadable(Kind::Float, false));
        assert!(loadable(Kind::Reference, false));
        assert!(!loadable(Kind::Long, false));
        assert!(loadable(Kind::Long, true));
        assert!(loadable(Kind::Double, true));
        assert!(!loadable(Kind::Int, true));
    }
}
