//! Arithmetic, bitwise and shift semantics.
//!
//! Integer operations wrap modulo 2^32 / 2^64. Division and remainder
//! truncate toward zero and fault only on a zero divisor; `MIN / -1` wraps
//! to `MIN`. Shift amounts are masked to the operand width. Float
//! operations are plain IEEE 754, and never fault.

use crate::error::Fault;

/// Integer semantics shared by `int` and `long`.
pub trait IntArith: Copy {
    /// Mask applied to shift amounts (31 or 63).
    const SHIFT_MASK: u32;

    fn add(self, rhs: Self) -> Self;
    fn sub(self, rhs: Self) -> Self;
    fn mul(self, rhs: Self) -> Self;
    fn div(self, rhs: Self) -> Result<Self, Fault>;
    fn rem(self, rhs: Self) -> Result<Self, Fault>;
    fn neg(self) -> Self;
    fn shl(self, amount: i32) -> Self;
    /// Arithmetic (sign-extending) right shift.
    fn shr(self, amount: i32) -> Self;
    /// Logical (zero-filling) right shift.
    fn ushr(self, amount: i32) -> Self;
    fn and(self, rhs: Self) -> Self;
    fn or(self, rhs: Self) -> Self;
    fn xor(self, rhs: Self) -> Self;
}

macro_rules! int_arith {
    ($t:ty, $unsigned:ty) => {
        impl IntArith for $t {
            const SHIFT_MASK: u32 = <$t>::BITS - 1;

            fn add(self, rhs: Self) -> Self {
                self.wrapping_add(rhs)
            }

            fn sub(self, rhs: Self) -> Self {
                self.wrapping_sub(rhs)
            }

            fn mul(self, rhs: Self) -> Self {
                self.wrapping_mul(rhs)
            }

            fn div(self, rhs: Self) -> Result<Self, Fault> {
                if rhs == 0 {
                    return Err(Fault::DIVIDE_BY_ZERO);
                }
                Ok(self.wrapping_div(rhs))
            }

            fn rem(self, rhs: Self) -> Result<Self, Fault> {
                if rhs == 0 {
                    return Err(Fault::DIVIDE_BY_ZERO);
                }
                Ok(self.wrapping_rem(rhs))
            }

            fn neg(self) -> Self {
                self.wrapping_neg()
            }

            fn shl(self, amount: i32) -> Self {
                self << (amount as u32 & Self::SHIFT_MASK)
            }

            fn shr(self, amount: i32) -> Self {
                self >> (amount as u32 & Self::SHIFT_MASK)
            }

            fn ushr(self, amount: i32) -> Self {
                ((self as $unsigned) >> (amount as u32 & Self::SHIFT_MASK)) as $t
            }

            fn and(self, rhs: Self) -> Self {
                self & rhs
            }

            fn or(self, rhs: Self) -> Self {
                self | rhs
            }

            fn xor(self, rhs: Self) -> Self {
                self ^ rhs
            }
        }
    };
}

int_arith!(i32, u32);
int_arith!(i64, u64);

/// IEEE 754 semantics shared by `float` and `double`.
pub trait FloatArith: Copy {
    fn add(self, rhs: Self) -> Self;
    fn sub(self, rhs: Self) -> Self;
    fn mul(self, rhs: Self) -> Self;
    /// Division by zero yields a signed infinity or NaN.
    fn div(self, rhs: Self) -> Self;
    /// Truncating remainder (C `fmod`): sign of the dividend.
    fn rem(self, rhs: Self) -> Self;
    /// Flips the sign bit, for zeros and NaN too.
    fn neg(self) -> Self;
}

macro_rules! float_arith {
    ($t:ty) => {
        impl FloatArith for $t {
            fn add(self, rhs: Self) -> Self {
                self + rhs
            }

            fn sub(self, rhs: Self) -> Self {
                self - rhs
            }

            fn mul(self, rhs: Self) -> Self {
                self * rhs
            }

            fn div(self, rhs: Self) -> Self {
                self / rhs
            }

            fn rem(self, rhs: Self) -> Self {
                self % rhs
            }

            fn neg(self) -> Self {
                -self
            }
        }
    };
}

float_arith!(f32);
float_arith!(f64);

/// `iinc`: wrapping add of a sign-extended 16-bit delta.
pub fn increment(value: i32, delta: i16) -> i32 {
    value.wrapping_add(i32::from(delta))
}
