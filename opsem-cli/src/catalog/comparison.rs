//! Branch fixtures. Each method is `if (a <inverse> b) return 0; else
//! return 1024;`, which compiles to the named branch jumping over the
//! `return 0` arm.

use opsem_common::{Reference, Value};

use super::Fixture;

/// Shared tail: fall through to `return 0`, branch to `return 1024`.
const ARMS: &str = "iconst_0\nireturn\nsipush 1024\nireturn\n";

fn int_pair(op: &'static str, a: i32, b: i32) -> Fixture {
    let code = format!("iload_0\niload_1\n{op} +3\n{ARMS}");
    Fixture::new(format!("op_{op}_{a}_{b}"), op, code)
        .args(vec![Value::Int32(a), Value::Int32(b)])
}

fn int_zero(op: &'static str, a: i32) -> Fixture {
    let code = format!("iload_0\n{op} +3\n{ARMS}");
    Fixture::new(format!("op_{op}_{a}"), op, code).args(vec![Value::Int32(a)])
}

/// `xload_0; xload_1; cmp; branch +3` for the three-way compares.
fn three_way(name: &str, cmp: &'static str, branch: &str, a: Value, b: Value) -> Fixture {
    let x = super::type_prefix(a.kind());
    let code = format!("{x}load_0\n{x}load_1\n{cmp}\n{branch} +3\n{ARMS}");
    Fixture::new(name, cmp, code).args(vec![a, b])
}

/// `return a <op> b` for references: `op; iconst_1; ireturn; iconst_0; ireturn`.
fn identity(name: &str, op: &'static str, a: Reference, b: Reference) -> Fixture {
    let code = format!("aload_0\naload_1\n{op} +3\niconst_1\nireturn\niconst_0\nireturn\n");
    Fixture::new(name, op, code).args(vec![a.into(), b.into()])
}

pub fn fixtures() -> Vec<Fixture> {
    let s = Reference::string("你好");
    vec![
        int_pair("if_icmpeq", 3, 3).returns(1024),
        int_pair("if_icmpeq", 3, 4).returns(0),
        int_pair("if_icmpne", 3, 4).returns(1024),
        int_pair("if_icmpne", 3, 3).returns(0),
        int_pair("if_icmplt", -1, 0).returns(1024),
        int_pair("if_icmplt", 0, 0).returns(0),
        int_pair("if_icmpge", 0, 0).returns(1024),
        int_pair("if_icmpge", -1, 0).returns(0),
        int_pair("if_icmpgt", 1, 0).returns(1024),
        int_pair("if_icmpgt", 0, 0).returns(0),
        int_pair("if_icmple", 0, 0).returns(1024),
        int_pair("if_icmple", 1, 0).returns(0),
        int_zero("ifeq", 0).returns(1024),
        int_zero("ifeq", 7).returns(0),
        int_zero("ifne", 7).returns(1024),
        int_zero("ifne", 0).returns(0),
        int_zero("ifgt", 1).returns(1024),
        int_zero("ifgt", 0).returns(0),
        int_zero("ifge", 0).returns(1024),
        int_zero("ifge", -1).returns(0),
        int_zero("iflt", -1).returns(1024),
        int_zero("iflt", 0).returns(0),
        int_zero("ifle", 0).returns(1024),
        int_zero("ifle", 1).returns(0),
        // if (a < b) return 0; else return 1024;
        three_way("op_lcmp_less", "lcmp", "ifge", 1i64.into(), 2i64.into()).returns(0),
        three_way("op_lcmp_equal", "lcmp", "ifge", 2i64.into(), 2i64.into()).returns(1024),
        three_way("op_lcmp_greater", "lcmp", "ifge", i64::MAX.into(), i64::MIN.into())
            .returns(1024),
        three_way("op_fcmpg", "fcmpg", "ifge", 1.0f32.into(), 2.0f32.into()).returns(0),
        three_way("op_fcmpg_nan", "fcmpg", "ifge", f32::NAN.into(), 2.0f32.into()).returns(1024),
        // if (a > b) return 0; else return 1024;
        three_way("op_fcmpl", "fcmpl", "ifle", 2.0f32.into(), 1.0f32.into()).returns(0),
        three_way("op_fcmpl_nan", "fcmpl", "ifle", 2.0f32.into(), f32::NAN.into()).returns(1024),
        three_way("op_dcmpg_nan", "dcmpg", "ifge", f64::NAN.into(), 0.0f64.into()).returns(1024),
        three_way("op_dcmpl_nan", "dcmpl", "ifle", 0.0f64.into(), f64::NAN.into()).returns(1024),
        three_way("op_dcmpl_zeros", "dcmpl", "ifle", 0.0f64.into(), (-0.0f64).into()).returns(1024),
        // return a != b;
        identity("op_if_acmpeq_same", "if_acmpeq", s.clone(), s.clone()).returns(0),
        identity(
            "op_if_acmpeq_equal_text",
            "if_acmpeq",
            s.clone(),
            Reference::string("你好"),
        )
        .returns(1),
        // return a == b;
        identity("op_if_acmpne_same", "if_acmpne", s.clone(), s.clone()).returns(1),
        identity("op_if_acmpne_null", "if_acmpne", Reference::null(), s).returns(0),
        // return a == null;
        Fixture::new(
            "op_ifnonnull",
            "ifnonnull",
            "aload_0\nifnonnull +3\niconst_1\nireturn\niconst_0\nireturn\n",
        )
        .args(vec![Value::null()])
        .returns(1),
        // return a != null;
        Fixture::new(
            "op_ifnull",
            "ifnull",
            "aload_0\nifnull +3\niconst_1\nireturn\niconst_0\nireturn\n",
        )
        .args(vec![Reference::string("x").into()])
        .returns(1),
    ]
}
