//! opsem instruction semantics.
//!
//! The semantics themselves are plain functions over typed operands:
//! - [`arith`]: wrapping integer arithmetic, IEEE float arithmetic, shifts
//! - [`compare`]: three-way compares with NaN policies, branch conditions
//! - [`convert`]: widening, narrowing and saturating conversions
//! - [`constant`]: implicit constants and `ldc` categories
//! - [`storage`]: local slots and typed array elements
//!
//! [`Frame`] applies decoded instructions to an operand stack and local
//! slots by calling those functions. It executes one straight-line block
//! and stops at the first control event; branch targets and calls are the
//! caller's business. Static fields live in a caller-owned [`StaticFields`].
//!
//! # Usage
//!
//! ```
//! use opsem_common::{Block, Instruction, Opcode, Operand, Value};
//! use opsem_vm::{execute, Control, LocalSlots, StaticFields};
//!
//! let block = Block::new(vec![
//!     Instruction::new(Opcode::Bipush, Operand::Immediate(7)),
//!     Instruction::new(Opcode::Bipush, Operand::Immediate(-2)),
//!     Instruction::simple(Opcode::Idiv),
//!     Instruction::simple(Opcode::Ireturn),
//! ]);
//!
//! let control = execute(&block, LocalSlots::new(0), &StaticFields::new()).unwrap();
//! assert_eq!(control, Control::Return(Some(Value::Int32(-3))));
//! ```

pub mod arith;
pub mod compare;
pub mod constant;
pub mod convert;
pub mod error;
pub mod execute;
pub mod machine;
pub mod statics;
pub mod storage;

pub use compare::{Condition, NanPolicy};
pub use error::{ArithmeticFault, ExecError, Fault};
pub use machine::{Control, Frame, MAX_STACK_DEPTH};
pub use statics::{FieldError, StaticFields};
pub use storage::LocalSlots;

use opsem_common::Block;

/// Run a block in a fresh frame and report how it stopped.
///
/// # Errors
///
/// Returns [`ExecError`] if an instruction faults or its operands do not
/// fit it.
pub fn execute(
    block: &Block,
    locals: LocalSlots,
    statics: &StaticFields,
) -> Result<Control, ExecError> {
    Frame::new(locals).run(block, statics)
}

#[cfg(test)]
mod proptests {
    use super::arith::{FloatArith, IntArith};
    use super::compare::{float_cmp, NanPolicy};
    use super::convert;
    use super::storage;
    use opsem_common::{ElementKind, Value};
    use proptest::prelude::*;
    use std::cmp::Ordering;

    proptest! {
        /// Int addition is addition modulo 2^32.
        #[test]
        fn iadd_is_modular(a in any::<i32>(), b in any::<i32>()) {
            let wide = (i64::from(a) + i64::from(b)) as i32;
            prop_assert_eq!(IntArith::add(a, b), wide);
        }

        /// Division truncates toward zero and rem makes the identity hold.
        #[test]
        fn div_rem_identity(a in any::<i32>(), b in any::<i32>().prop_filter("nonzero", |b| *b != 0)) {
            let q = IntArith::div(a, b).unwrap();
            let r = IntArith::rem(a, b).unwrap();
            prop_assert_eq!(q.wrapping_mul(b).wrapping_add(r), a);
            if a != i32::MIN || b != -1 {
                prop_assert_eq!(i64::from(q), i64::from(a) / i64::from(b));
            }
        }

        #[test]
        fn div_by_zero_always_faults(a in any::<i64>()) {
            prop_assert!(IntArith::div(a, 0).is_err());
            prop_assert!(IntArith::rem(a, 0).is_err());
        }

        #[test]
        fn neg_is_an_involution(a in any::<i32>(), l in any::<i64>()) {
            prop_assert_eq!(IntArith::neg(IntArith::neg(a)), a);
            prop_assert_eq!(IntArith::neg(IntArith::neg(l)), l);
        }

        /// Shift amounts only matter modulo the operand width.
        #[test]
        fn shift_amounts_are_masked(x in any::<i32>(), l in any::<i64>(), n in any::<i32>()) {
            prop_assert_eq!(IntArith::shl(x, 32), IntArith::shl(x, 0));
            prop_assert_eq!(IntArith::shl(l, 64), IntArith::shl(l, 0));
            prop_assert_eq!(IntArith::shr(x, n), IntArith::shr(x, n & 31));
            prop_assert_eq!(IntArith::ushr(l, n), IntArith::ushr(l, n & 63));
        }

        /// NaN on either side yields the policy's ordering.
        #[test]
        fn nan_policies(x in any::<f32>(), d in any::<f64>()) {
            prop_assert_eq!(float_cmp(f32::NAN, x, NanPolicy::Greater), Ordering::Greater);
            prop_assert_eq!(float_cmp(x, f32::NAN, NanPolicy::Less), Ordering::Less);
            prop_assert_eq!(float_cmp(d, f64::NAN, NanPolicy::Greater), Ordering::Greater);
            prop_assert_eq!(float_cmp(f64::NAN, d, NanPolicy::Less), Ordering::Less);
        }

        /// Rust's float-to-int casts saturate the same way.
        #[test]
        fn saturation_matches_as_casts(bits in any::<u32>(), wide in any::<u64>()) {
            let f = f32::from_bits(bits);
            let d = f64::from_bits(wide);
            prop_assert_eq!(convert::f2i(f), f as i32);
            prop_assert_eq!(convert::f2l(f), f as i64);
            prop_assert_eq!(convert::d2i(d), d as i32);
            prop_assert_eq!(convert::d2l(d), d as i64);
        }

        /// Narrowing keeps only the low bits.
        #[test]
        fn narrowing_is_low_bits(x in any::<i32>()) {
            prop_assert_eq!(convert::i2b(x), convert::i2b(x & 0xff));
            prop_assert_eq!(convert::i2b(x), i32::from((x & 0xff) as u8 as i8));
            prop_assert_eq!(convert::i2c(x), x & 0xffff);
            prop_assert_eq!(convert::i2s(x), i32::from(x as u16 as i16));
        }

        /// Float rem keeps the dividend's sign.
        #[test]
        fn frem_sign_follows_dividend(a in -1.0e6f64..1.0e6, b in 1.0f64..1.0e3) {
            let r = FloatArith::rem(a, b);
            prop_assert!(r == 0.0 || r.is_sign_negative() == a.is_sign_negative());
            prop_assert!(r.abs() < b);
        }

        /// A byte element reads back as the sign-extended low byte.
        #[test]
        fn byte_array_round_trip(x in any::<i32>()) {
            let array = storage::new_array(ElementKind::Byte, 1);
            let cell = array.as_array().unwrap();
            storage::array_store(cell, 0, Value::Int32(x)).unwrap();
            prop_assert_eq!(storage::array_load(cell, 0).unwrap(), Value::Int32(convert::i2b(x)));
        }
    }
}
