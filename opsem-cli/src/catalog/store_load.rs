//! Local slot and array element fixtures.
//!
//! Locals: `{ T a = ...; T b = ...; return b; }` so that the last store and
//! the load hit the slot named in the fixture. Static methods start at
//! slot 0, instance methods at slot 1.
//!
//! Arrays: `{ T[] arr = new T[1]; arr[0] = <x>; return arr[0]; }`.

use opsem_common::Value;

use super::Fixture;

/// Load mnemonics by type (`i l f d a`) and slot (0..=3, then explicit).
const LOADS: [[&str; 5]; 5] = [
    ["iload_0", "iload_1", "iload_2", "iload_3", "iload"],
    ["lload_0", "lload_1", "lload_2", "lload_3", "lload"],
    ["fload_0", "fload_1", "fload_2", "fload_3", "fload"],
    ["dload_0", "dload_1", "dload_2", "dload_3", "dload"],
    ["aload_0", "aload_1", "aload_2", "aload_3", "aload"],
];

fn slot_op(x: char, op: &str, slot: usize) -> String {
    if slot <= 3 {
        format!("{x}{op}_{slot}")
    } else {
        format!("{x}{op} {slot}")
    }
}

/// Store each `(type, push)` in consecutive slots from `first`, then load
/// and return the last one.
fn locals(first: usize, pushes: &[(char, &str)]) -> Fixture {
    let last = first + pushes.len() - 1;
    let mut code = String::new();
    for (i, (x, push)) in pushes.iter().enumerate() {
        code.push_str(&format!("{push}\n{}\n", slot_op(*x, "store", first + i)));
    }
    let (x, _) = pushes[pushes.len() - 1];
    code.push_str(&format!("{}\n{x}return\n", slot_op(x, "load", last)));

    let name = if last <= 3 {
        format!("op_{x}store_{last}_{x}load_{last}")
    } else {
        format!("op_{x}store_{x}load")
    };
    let row = "ilfda".find(x).unwrap_or(4);
    let instruction = LOADS[row][last.min(4)];
    Fixture::new(name, instruction, code)
}

/// `new T[1]`, store `push` at index 0, load it back.
fn element(x: char, kind: &str, push: &str) -> Fixture {
    let create = if kind == "reference" {
        "anewarray".to_string()
    } else {
        format!("newarray {kind}")
    };
    let code = format!(
        "iconst_1\n{create}\nastore_1\naload_1\niconst_0\n{push}\n{x}astore\n\
         aload_1\niconst_0\n{x}aload\n{}return\n",
        if matches!(x, 'b' | 'c' | 's') { 'i' } else { x }
    );
    let name = format!("op_{x}astore_{x}aload");
    let instruction = match x {
        'b' => "bastore",
        'c' => "castore",
        's' => "sastore",
        'i' => "iastore",
        'l' => "lastore",
        'f' => "fastore",
        'd' => "dastore",
        _ => "aastore",
    };
    Fixture::new(name, instruction, code)
}

pub fn fixtures() -> Vec<Fixture> {
    let mut fixtures = Vec::new();

    for (x, minus_one, zero, one, two) in [
        ('i', "iconst_m1", "iconst_0", "iconst_1", "iconst_2"),
        ('f', "ldc -1.0f", "fconst_0", "fconst_1", "fconst_2"),
        ('l', "ldc2_w -1L", "lconst_0", "lconst_1", "ldc2_w 2L"),
        ('d', "ldc2_w -1.0d", "dconst_0", "dconst_1", "ldc2_w 2.0d"),
    ] {
        let cases = [
            locals(0, &[(x, minus_one)]),
            locals(1, &[(x, minus_one)]),
            locals(1, &[('i', "iconst_0"), (x, minus_one)]),
            locals(1, &[(x, one), (x, zero), (x, minus_one)]),
            locals(1, &[(x, two), (x, one), (x, zero), (x, minus_one)]),
        ];
        let expected = match x {
            'i' => Value::Int32(-1),
            'f' => Value::Float32(-1.0),
            'l' => Value::Int64(-1),
            _ => Value::Float64(-1.0),
        };
        fixtures.extend(cases.into_iter().map(|f| f.returns(expected.clone())));
    }

    let null = Value::null();
    fixtures.extend([
        locals(0, &[('a', "aconst_null")]).returns(null.clone()),
        locals(1, &[('a', "aconst_null")]).returns(null.clone()),
        locals(1, &[('i', "iconst_1"), ('a', "aconst_null")]).returns(null.clone()),
        locals(1, &[('i', "iconst_0"), ('i', "iconst_1"), ('a', "aconst_null")])
            .returns(null.clone()),
        locals(
            1,
            &[
                ('i', "iconst_0"),
                ('i', "iconst_1"),
                ('i', "iconst_2"),
                ('a', "aconst_null"),
            ],
        )
        .returns(null.clone()),
    ]);

    fixtures.extend([
        element('b', "byte", "iconst_m1").returns(-1),
        element('s', "short", "iconst_m1").returns(-1),
        element('c', "char", "ldc 65535").returns(0xffff),
        element('i', "int", "iconst_m1").returns(-1),
        element('f', "float", "ldc -1.0f").returns(-1.0f32),
        element('l', "long", "ldc2_w -1L").returns(-1i64),
        element('d', "double", "ldc2_w -1.0d").returns(-1.0f64),
        element('a', "reference", "aconst_null").returns(null),
    ]);

    // Edge cases around the same instructions.
    fixtures.extend([
        Fixture::new(
            "op_bastore_narrows",
            "bastore",
            "iconst_1\nnewarray byte\nastore_1\naload_1\niconst_0\nsipush 383\nbastore\n\
             aload_1\niconst_0\nbaload\nireturn\n",
        )
        .returns(127),
        Fixture::new(
            "op_baload_out_of_range",
            "baload",
            "iconst_1\nnewarray byte\niconst_1\nbaload\nireturn\n",
        )
        .faults("array index 1 out of range (length 1)"),
        Fixture::new(
            "op_iastore_negative_index",
            "iastore",
            "iconst_1\nnewarray int\niconst_m1\niconst_0\niastore\nreturn\n",
        )
        .faults("array index -1 out of range"),
        Fixture::new(
            "op_arraylength",
            "arraylength",
            "bipush 12\nnewarray double\narraylength\nireturn\n",
        )
        .returns(12),
        Fixture::new(
            "op_newarray_negative_size",
            "newarray",
            "iconst_m1\nnewarray long\nareturn\n",
        )
        .faults("negative array size -1"),
        Fixture::new("op_iaload_null", "iaload", "aconst_null\niconst_0\niaload\nireturn\n")
            .faults("null reference"),
        Fixture::new("op_iload_out_of_range", "iload", "iload 200\nireturn\n")
            .faults("local slot 200 out of range"),
    ]);

    fixtures
}
