//! Arithmetic fixtures: `static T op_xadd(T a, T b) { return a + b; }` and
//! friends, plus the boundary cases each operation has.

use opsem_common::Value;

use super::{type_prefix, Fixture};

/// `xload_0; yload_1; op; xreturn`
fn binary(
    name: &str,
    op: &'static str,
    a: impl Into<Value>,
    b: impl Into<Value>,
) -> Fixture {
    let (a, b) = (a.into(), b.into());
    let x = type_prefix(a.kind());
    let y = type_prefix(b.kind());
    let code = format!("{x}load_0\n{y}load_1\n{op}\n{x}return\n");
    Fixture::new(name, op, code).args(vec![a, b])
}

/// `xload_0; op; xreturn`
fn unary(name: &str, op: &'static str, a: impl Into<Value>) -> Fixture {
    let a = a.into();
    let x = type_prefix(a.kind());
    Fixture::new(name, op, format!("{x}load_0\n{op}\n{x}return\n")).args(vec![a])
}

pub fn fixtures() -> Vec<Fixture> {
    vec![
        binary("op_iadd", "iadd", 5, -1024).returns(-1019),
        binary("op_iadd_overflow", "iadd", i32::MAX, 1).returns(i32::MIN),
        binary("op_ladd", "ladd", 6666i64, 5678i64).returns(12344i64),
        binary("op_ladd_overflow", "ladd", i64::MAX, 1i64).returns(i64::MIN),
        binary("op_fadd", "fadd", 1.5f32, 2.25f32).returns(3.75f32),
        binary("op_dadd", "dadd", 0.1, 0.2).returns(0.1 + 0.2),
        binary("op_isub", "isub", 3, 1027).returns(-1024),
        binary("op_isub_overflow", "isub", i32::MIN, 1).returns(i32::MAX),
        binary("op_lsub", "lsub", 0i64, i64::MIN).returns(i64::MIN),
        binary("op_fsub", "fsub", 1.0f32, 1.0f32).returns(0.0f32),
        binary("op_dsub", "dsub", -0.0, 0.0).returns(-0.0),
        binary("op_imul", "imul", 0x10000, 0x10000).returns(0),
        binary("op_lmul", "lmul", 10_491_438i64, 6666i64).returns(69_935_925_708i64),
        binary("op_fmul", "fmul", f32::INFINITY, 0.0f32).prints("NaNf"),
        binary("op_dmul", "dmul", 1e308, 10.0).returns(f64::INFINITY),
        binary("op_idiv", "idiv", 7, -2).returns(-3),
        binary("op_idiv_min_by_minus_one", "idiv", i32::MIN, -1).returns(i32::MIN),
        binary("op_idiv_by_zero", "idiv", 1, 0).faults("divide by zero"),
        binary("op_ldiv", "ldiv", -7i64, 2i64).returns(-3i64),
        binary("op_ldiv_by_zero", "ldiv", 1i64, 0i64).faults("divide by zero"),
        binary("op_fdiv", "fdiv", 1.0f32, 0.0f32).returns(f32::INFINITY),
        binary("op_ddiv", "ddiv", -1.0, 0.0).returns(f64::NEG_INFINITY),
        binary("op_ddiv_zero_by_zero", "ddiv", 0.0, 0.0).prints("NaNd"),
        binary("op_irem", "irem", 7, -2).returns(1),
        binary("op_irem_negative_dividend", "irem", -7, 2).returns(-1),
        binary("op_irem_by_zero", "irem", 1, 0).faults("divide by zero"),
        binary("op_lrem", "lrem", i64::MIN, -1i64).returns(0i64),
        binary("op_frem", "frem", 5.5f32, 2.0f32).returns(1.5f32),
        binary("op_drem", "drem", -5.5, 2.0).returns(-1.5),
        binary("op_drem_by_zero", "drem", 1.0, 0.0).prints("NaNd"),
        unary("op_ineg", "ineg", i32::MIN).returns(i32::MIN),
        unary("op_lneg", "lneg", 5i64).returns(-5i64),
        unary("op_fneg", "fneg", 0.0f32).returns(-0.0f32),
        unary("op_dneg", "dneg", -1.5).returns(1.5),
        binary("op_ishl", "ishl", 1, 33).returns(2),
        binary("op_lshl", "lshl", 1i64, 65).returns(2i64),
        binary("op_ishr", "ishr", -16, 2).returns(-4),
        binary("op_lshr", "lshr", i64::MIN, 63).returns(-1i64),
        binary("op_iushr", "iushr", -1, 28).returns(15),
        binary("op_lushr", "lushr", -1i64, 60).returns(15i64),
        binary("op_iand", "iand", 0b1100, 0b1010).returns(0b1000),
        binary("op_land", "land", -1i64, 0xffi64).returns(0xffi64),
        binary("op_ior", "ior", 0b1100, 0b1010).returns(0b1110),
        binary("op_lor", "lor", i64::MIN, 1i64).returns(i64::MIN + 1),
        binary("op_ixor", "ixor", -1, 0x0f0f).returns(!0x0f0f),
        binary("op_lxor", "lxor", 0x55i64, 0xffi64).returns(0xaai64),
        Fixture::new("op_iinc", "iinc", "iinc 0 1\niload_0\nireturn\n")
            .args(vec![Value::Int32(41)])
            .returns(42),
        Fixture::new("op_iinc_wraps", "iinc", "iinc 0 1\niload_0\nireturn\n")
            .args(vec![Value::Int32(i32::MAX)])
            .returns(i32::MIN),
        Fixture::new("op_iinc_negative", "iinc", "iinc 0 -300\niload_0\nireturn\n")
            .args(vec![Value::Int32(0)])
            .returns(-300),
    ]
}
