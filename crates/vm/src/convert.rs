//! Numeric conversions.
//!
//! Every function is total. Integer narrowing keeps the low-order bits.
//! Float-to-integer conversion truncates toward zero and saturates: NaN
//! becomes 0, anything at or beyond a bound becomes that bound.

/// Saturating truncation of a float to an integer type.
macro_rules! saturate {
    ($name:ident, $from:ty, $to:ty) => {
        pub fn $name(v: $from) -> $to {
            if v.is_nan() {
                0
            } else if v >= <$to>::MAX as $from {
                <$to>::MAX
            } else if v <= <$to>::MIN as $from {
                <$to>::MIN
            } else {
                // In range after the checks above, so the cast is exact
                // truncation.
                v.trunc() as $to
            }
        }
    };
}

saturate!(f2i, f32, i32);
saturate!(f2l, f32, i64);
saturate!(d2i, f64, i32);
saturate!(d2l, f64, i64);

/// Sign-extends.
pub fn i2l(v: i32) -> i64 {
    i64::from(v)
}

/// Round to nearest, ties to even.
pub fn i2f(v: i32) -> f32 {
    v as f32
}

/// Exact.
pub fn i2d(v: i32) -> f64 {
    f64::from(v)
}

/// Keeps the low 32 bits.
pub fn l2i(v: i64) -> i32 {
    v as i32
}

/// Round to nearest, ties to even.
pub fn l2f(v: i64) -> f32 {
    v as f32
}

/// Round to nearest, ties to even.
pub fn l2d(v: i64) -> f64 {
    v as f64
}

/// Exact, NaN stays NaN.
pub fn f2d(v: f32) -> f64 {
    f64::from(v)
}

/// Round to nearest; out-of-range magnitudes become infinities.
pub fn d2f(v: f64) -> f32 {
    v as f32
}

/// Low 8 bits, reinterpreted as signed.
pub fn to_byte(v: i32) -> i8 {
    v as i8
}

/// Low 16 bits, reinterpreted as signed.
pub fn to_short(v: i32) -> i16 {
    v as i16
}

/// Low 16 bits, unsigned.
pub fn to_char(v: i32) -> u16 {
    v as u16
}

/// `i2b`: narrow to byte and sign-extend back to int.
pub fn i2b(v: i32) -> i32 {
    i32::from(to_byte(v))
}

/// `i2c`: narrow to char and zero-extend back to int.
pub fn i2c(v: i32) -> i32 {
    i32::from(to_char(v))
}

/// `i2s`: narrow to short and sign-extend back to int.
pub fn i2s(v: i32) -> i32 {
    i32::from(to_short(v))
}
