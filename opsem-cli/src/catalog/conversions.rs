//! Conversion fixtures: `T op_x2y() { X a = <constant>; return (Y) a; }`.
//!
//! The source values are the extremes each conversion has to handle:
//! the largest int and long, an ordinary fraction, NaN and both infinities.

use opsem_common::Value;

use super::{type_prefix, Fixture};

/// Push `source`, store it in slot 1, load it back, convert, return.
fn convert(name: &str, op: &'static str, source: Value, returns: char) -> Fixture {
    let x = type_prefix(source.kind());
    let push = match source {
        Value::Int64(_) | Value::Float64(_) => "ldc2_w",
        _ => "ldc",
    };
    let code = format!("{push} {source}\n{x}store_1\n{x}load_1\n{op}\n{returns}return\n");
    Fixture::new(name, op, code)
}

pub fn fixtures() -> Vec<Fixture> {
    let int_max = Value::Int32(0x7fff_ffff);
    let long_max = Value::Int64(0x7fff_ffff_ffff_ffff);
    let float = Value::Float32(314.159_26);
    let double = Value::Float64(314.159_26);

    let mut fixtures = vec![
        convert("op_i2l", "i2l", int_max.clone(), 'l').returns(2_147_483_647i64),
        convert("op_i2f", "i2f", int_max.clone(), 'f').returns(2_147_483_648.0f32),
        convert("op_i2d", "i2d", int_max.clone(), 'd').returns(2_147_483_647.0f64),
        convert("op_l2i", "l2i", long_max.clone(), 'i').returns(-1),
        convert("op_l2f", "l2f", long_max.clone(), 'f').returns(9.223_372e18f32),
        convert("op_l2d", "l2d", long_max, 'd').returns(9.223_372_036_854_776e18f64),
        convert("op_f2i", "f2i", float.clone(), 'i').returns(314),
        convert("op_f2l", "f2l", float.clone(), 'l').returns(314i64),
        convert("op_f2d", "f2d", float, 'd').returns(f64::from(314.159_26f32)),
        convert("op_d2i", "d2i", double.clone(), 'i').returns(314),
        convert("op_d2l", "d2l", double.clone(), 'l').returns(314i64),
        convert("op_d2f", "d2f", double, 'f').returns(314.159_26f64 as f32),
    ];

    // 0.0f / 0.0f, 1.0f / 0.0f, -1.0f / 0.0f
    let floats = [
        ("nan", Value::Float32(f32::NAN)),
        ("inf_pos", Value::Float32(f32::INFINITY)),
        ("inf_neg", Value::Float32(f32::NEG_INFINITY)),
    ];
    for (case, source) in floats {
        let f2i = convert(&format!("op_f2i_{case}"), "f2i", source.clone(), 'i');
        let f2l = convert(&format!("op_f2l_{case}"), "f2l", source.clone(), 'l');
        let f2d = convert(&format!("op_f2d_{case}"), "f2d", source, 'd');
        fixtures.extend(match case {
            "nan" => [f2i.returns(0), f2l.returns(0i64), f2d.prints("NaNd")],
            "inf_pos" => [
                f2i.returns(i32::MAX),
                f2l.returns(i64::MAX),
                f2d.returns(f64::INFINITY),
            ],
            _ => [
                f2i.returns(i32::MIN),
                f2l.returns(i64::MIN),
                f2d.returns(f64::NEG_INFINITY),
            ],
        });
    }

    let doubles = [
        ("nan", Value::Float64(f64::NAN)),
        ("inf_pos", Value::Float64(f64::INFINITY)),
        ("inf_neg", Value::Float64(f64::NEG_INFINITY)),
    ];
    for (case, source) in doubles {
        let d2i = convert(&format!("op_d2i_{case}"), "d2i", source.clone(), 'i');
        let d2l = convert(&format!("op_d2l_{case}"), "d2l", source.clone(), 'l');
        let d2f = convert(&format!("op_d2f_{case}"), "d2f", source, 'f');
        fixtures.extend(match case {
            "nan" => [d2i.returns(0), d2l.returns(0i64), d2f.prints("NaNf")],
            "inf_pos" => [
                d2i.returns(i32::MAX),
                d2l.returns(i64::MAX),
                d2f.returns(f32::INFINITY),
            ],
            _ => [
                d2i.returns(i32::MIN),
                d2l.returns(i64::MIN),
                d2f.returns(f32::NEG_INFINITY),
            ],
        });
    }

    // Narrowing: the low bits survive, sign- or zero-extended.
    fixtures.extend([
        convert("op_i2b_pos", "i2b", Value::Int32(0x7fff_ff7f), 'i').returns(0x7f),
        convert("op_i2c_pos", "i2c", Value::Int32(0x7fff_7fff), 'i').returns(0x7fff),
        convert("op_i2s_pos", "i2s", Value::Int32(0x7fff_7fff), 'i').returns(0x7fff),
        convert("op_i2b_neg", "i2b", Value::Int32(0x7fff_ffff), 'i').returns(-1),
        convert("op_i2c_neg", "i2c", Value::Int32(0x7fff_ffff), 'i').returns(0xffff),
        convert("op_i2s_neg", "i2s", Value::Int32(0x7fff_ffff), 'i').returns(-1),
    ]);

    fixtures
}
