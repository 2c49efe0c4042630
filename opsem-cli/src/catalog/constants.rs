//! Constant fixtures: `T op_xconst() { return <constant>; }`.

use opsem_common::Value;

use super::{type_prefix, Fixture};

/// `<push>; xreturn`
fn push(name: &str, instruction: &'static str, text: &str, returns: char) -> Fixture {
    Fixture::new(name, instruction, format!("{text}\n{returns}return\n"))
}

/// A single implicit-constant opcode.
fn implicit(op: &'static str, value: impl Into<Value>) -> Fixture {
    let value = value.into();
    push(&format!("op_{op}"), op, op, type_prefix(value.kind())).returns(value)
}

pub fn fixtures() -> Vec<Fixture> {
    vec![
        implicit("aconst_null", Value::null()),
        push("op_bipush", "bipush", "bipush 127", 'i').returns(127),
        push("op_bipush_negative", "bipush", "bipush -128", 'i').returns(-128),
        push("op_sipush", "sipush", "sipush 32767", 'i').returns(32767),
        push("op_sipush_negative", "sipush", "sipush -32768", 'i').returns(-32768),
        implicit("iconst_m1", -1),
        implicit("iconst_0", 0),
        implicit("iconst_1", 1),
        implicit("iconst_2", 2),
        implicit("iconst_3", 3),
        implicit("iconst_4", 4),
        implicit("iconst_5", 5),
        implicit("fconst_0", 0.0f32),
        implicit("fconst_1", 1.0f32),
        implicit("fconst_2", 2.0f32),
        implicit("lconst_0", 0i64),
        implicit("lconst_1", 1i64),
        implicit("dconst_0", 0.0f64),
        implicit("dconst_1", 1.0f64),
        push("op_ldc_int", "ldc", "ldc 2147483647", 'i').returns(i32::MAX),
        push("op_ldc_float", "ldc", "ldc 3.0f", 'f').returns(3.0f32),
        push("op_ldc_string", "ldc", "ldc \"你好\"", 'a').prints("\"你好\""),
        push("op_ldc_class", "ldc", "ldc class Object", 'a').prints("class Object"),
        push("op_ldc_w_int", "ldc_w", "ldc_w 2147483646", 'i').returns(2_147_483_646),
        push("op_ldc_w_float", "ldc_w", "ldc_w 9.0f", 'f').returns(9.0f32),
        push("op_ldc_w_string", "ldc_w", "ldc_w \"世界\"", 'a').prints("\"世界\""),
        push("op_ldc_w_class", "ldc_w", "ldc_w class Class", 'a').prints("class Class"),
        push("op_ldc2_w_long", "ldc2_w", "ldc2_w 3L", 'l').returns(3i64),
        push("op_ldc2_w_double", "ldc2_w", "ldc2_w 3.0d", 'd').returns(3.0f64),
    ]
}
