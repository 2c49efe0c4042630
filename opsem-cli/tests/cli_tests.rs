//! Integration tests for the opsem CLI.
//!
//! These tests invoke the `opsem` binary as a subprocess and check
//! exit codes, stdout, and stderr.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

#[allow(deprecated)]
fn opsem() -> Command {
    Command::cargo_bin("opsem").unwrap()
}

/// Helper: write assembly text to a temp file, returning its path.
fn write_block(dir: &TempDir, text: &str) -> PathBuf {
    let path = dir.path().join("block.asm");
    fs::write(&path, text).unwrap();
    path
}

// ---- No-args / help ----

#[test]
fn no_args_prints_usage_and_fails() {
    opsem()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage: opsem"));
}

#[test]
fn help_flag_exits_0() {
    opsem()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("check"))
        .stdout(predicate::str::contains("eval"));
}

#[test]
fn version_flag_exits_0() {
    opsem()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn unknown_command_fails() {
    opsem()
        .arg("frobnicate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("frobnicate"));
}

#[test]
fn too_much_verbosity_exits_1() {
    opsem()
        .args(["-vvvvv", "list"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("verbose"));
}

// ---- List ----

#[test]
fn list_names_fixtures_and_instructions() {
    opsem()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("op_iadd"))
        .stdout(predicate::str::contains("op_invokestatic"))
        .stdout(predicate::str::contains("lcmp"));
}

#[test]
fn list_filter_narrows_output() {
    opsem()
        .args(["list", "--filter", "op_d2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("op_d2f_nan"))
        .stdout(predicate::str::contains("op_iadd").not());
}

// ---- Check ----

#[test]
fn check_whole_catalog_passes() {
    opsem()
        .arg("check")
        .assert()
        .success()
        .stdout(predicate::str::contains(" 0 failed"))
        .stdout(predicate::str::contains("FAIL").not());
}

#[test]
fn check_filtered_fixtures() {
    opsem()
        .args(["check", "--filter", "op_idiv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ok    op_idiv_by_zero"))
        .stdout(predicate::str::contains("3 passed, 0 failed"));
}

#[test]
fn check_with_no_matches_exits_1() {
    opsem()
        .args(["check", "--filter", "no_such_fixture"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("no fixtures match"));
}

// ---- Run ----

#[test]
fn run_returns_value() {
    let dir = TempDir::new().unwrap();
    let path = write_block(&dir, "iload_0\niload_1\nimul\nireturn\n");
    opsem()
        .arg("run")
        .arg(&path)
        .args(["--local", "6", "--local", "-7"])
        .assert()
        .success()
        .stdout("return -42\n");
}

#[test]
fn run_void_return() {
    let dir = TempDir::new().unwrap();
    let path = write_block(&dir, "iconst_1\npop\nreturn\n");
    opsem()
        .arg("run")
        .arg(&path)
        .assert()
        .success()
        .stdout("return void\n");
}

#[test]
fn run_stops_at_taken_branch() {
    let dir = TempDir::new().unwrap();
    let path = write_block(&dir, "lconst_0\nlconst_1\nlcmp\niflt +7\nreturn\n");
    opsem()
        .arg("run")
        .arg(&path)
        .assert()
        .success()
        .stdout("branch +7 at 3\n");
}

#[test]
fn run_stops_at_invoke() {
    let dir = TempDir::new().unwrap();
    let path = write_block(&dir, "iconst_2\nldc2_w 9L\ninvokestatic foo (IJ)V\nreturn\n");
    opsem()
        .arg("run")
        .arg(&path)
        .assert()
        .success()
        .stdout("invoke foo(2, 9L)\n");
}

#[test]
fn run_falls_through() {
    let dir = TempDir::new().unwrap();
    let path = write_block(&dir, "iconst_0\nifne +5\n");
    opsem()
        .arg("run")
        .arg(&path)
        .assert()
        .success()
        .stdout("fallthrough\n");
}

#[test]
fn run_divide_by_zero_exits_3() {
    let dir = TempDir::new().unwrap();
    let path = write_block(&dir, "iconst_1\niconst_0\nidiv\nireturn\n");
    opsem()
        .arg("run")
        .arg(&path)
        .assert()
        .failure()
        .code(3)
        .stderr(predicate::str::contains(
            "arithmetic fault: divide by zero at instruction 2",
        ));
}

#[test]
fn run_max_stack_is_enforced() {
    let dir = TempDir::new().unwrap();
    let path = write_block(&dir, "iconst_1\niconst_2\niconst_3\nreturn\n");
    opsem()
        .arg("run")
        .arg(&path)
        .args(["--max-stack", "2"])
        .assert()
        .failure()
        .code(3)
        .stderr(predicate::str::contains("stack overflow at instruction 2"));
}

#[test]
fn run_assembly_error_exits_1() {
    let dir = TempDir::new().unwrap();
    let path = write_block(&dir, "iconst_1\nfrobnicate\n");
    opsem()
        .arg("run")
        .arg(&path)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("line 2"));
}

#[test]
fn run_missing_file_exits_1() {
    opsem()
        .args(["run", "/nonexistent/block.asm"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("cannot read"));
}

#[test]
fn run_bad_local_exits_1() {
    let dir = TempDir::new().unwrap();
    let path = write_block(&dir, "return\n");
    opsem()
        .arg("run")
        .arg(&path)
        .args(["--local", "twelve"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("invalid value 'twelve'"));
}

// ---- Eval ----

#[test]
fn eval_integer_overflow_wraps() {
    opsem()
        .args(["eval", "iadd", "2147483647", "1"])
        .assert()
        .success()
        .stdout("-2147483648\n");
}

#[test]
fn eval_saturating_conversion() {
    opsem()
        .args(["eval", "d2i", "1e300"])
        .assert()
        .success()
        .stdout("2147483647\n");
}

#[test]
fn eval_nan_compare() {
    opsem()
        .args(["eval", "fcmpl", "NaNf", "1.0f"])
        .assert()
        .success()
        .stdout("-1\n");
}

#[test]
fn eval_instruction_with_operand() {
    opsem()
        .args(["eval", "bipush -5"])
        .assert()
        .success()
        .stdout("-5\n");
}

#[test]
fn eval_return_reports_control() {
    opsem()
        .args(["eval", "lreturn", "5L"])
        .assert()
        .success()
        .stdout("return 5L\n");
}

#[test]
fn eval_fault_exits_3() {
    opsem()
        .args(["eval", "lrem", "1L", "0L"])
        .assert()
        .failure()
        .code(3)
        .stderr(predicate::str::contains("divide by zero"));
}

#[test]
fn eval_kind_mismatch_exits_3() {
    opsem()
        .args(["eval", "iadd", "1", "1L"])
        .assert()
        .failure()
        .code(3)
        .stderr(predicate::str::contains("iadd expected int, found long"));
}

#[test]
fn eval_rejects_multiple_instructions() {
    opsem()
        .args(["eval", "iconst_1\niconst_2"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("exactly one instruction"));
}
