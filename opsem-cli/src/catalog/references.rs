//! Static field and call fixtures.
//!
//! Static fields are defined on the fixture before its body runs; a
//! static initializer is just a void method that writes them.

use super::Fixture;

/// `static long foo(long z, int p, long q) { int i = 10 * p; long r = i * 1024 + q; return r * z; }`
const FOO: &str = "\
bipush 10
iload_1
imul
istore_3
iload_3
sipush 1024
imul
i2l
lload_2
ladd
lstore 4
lload 4
lload_0
lmul
lreturn
";

/// `int x = 5; long y = foo(6666, 1024, 5678); return y * 10 + x;`
const CALLER: &str = "\
iconst_5
istore_0
sipush 6666
i2l
sipush 1024
sipush 5678
i2l
invokestatic foo (JIJ)J
lstore_1
lload_1
ldc2_w 10L
lmul
iload_0
i2l
ladd
lreturn
";

pub fn fixtures() -> Vec<Fixture> {
    vec![
        // static { i = 100; i *= 10; }
        Fixture::new(
            "op_clinit",
            "putstatic",
            "bipush 100\nputstatic i I\ngetstatic i I\nbipush 10\nimul\nputstatic i I\nreturn\n",
        )
        .static_field("i", 0)
        .leaves_static("i", 1000),
        Fixture::new("op_getstatic", "getstatic", "getstatic i I\nireturn\n")
            .static_field("i", 1000)
            .returns(1000),
        Fixture::new(
            "op_putstatic",
            "putstatic",
            "iconst_2\nputstatic i I\ngetstatic i I\nireturn\n",
        )
        .static_field("i", 1000)
        .returns(2),
        Fixture::new("op_getstatic_long", "getstatic", "getstatic l J\nlreturn\n")
            .static_field("l", i64::MIN)
            .returns(i64::MIN),
        Fixture::new("op_invokestatic", "invokestatic", CALLER)
            .method("foo", FOO)
            .returns(699_359_257_085i64),
        Fixture::new(
            "op_invokestatic_void",
            "invokestatic",
            "invokestatic reset ()V\ngetstatic i I\nireturn\n",
        )
        .method("reset", "iconst_0\nputstatic i I\nreturn\n")
        .static_field("i", 7)
        .returns(0),
        Fixture::new("op_getstatic_unknown", "getstatic", "getstatic j I\nireturn\n")
            .faults("unknown static field 'j'"),
        Fixture::new(
            "op_putstatic_wrong_kind",
            "putstatic",
            "lconst_1\nputstatic i J\nreturn\n",
        )
        .static_field("i", 0)
        .faults("static field 'i' is int, not long"),
    ]
}
