//! CLI command implementations.
//!
//! Each command reports its own errors on stderr and returns the exit
//! code to use on failure:
//! - 1: input, assembly or check failure
//! - 3: execution error

use std::fs;
use std::path::Path;

use opsem_common::Value;
use opsem_vm::{Control, Frame, StaticFields};

use crate::catalog;
use crate::harness::{self, describe, locals_for};

/// Print every fixture matching `filter`: name and instruction under test.
pub fn list(filter: Option<&str>) -> Result<(), i32> {
    let fixtures = catalog::select(filter);
    let width = fixtures.iter().map(|f| f.name.len()).max().unwrap_or(0);
    for fixture in &fixtures {
        println!("{:<width$}  {}", fixture.name, fixture.instruction);
    }
    Ok(())
}

/// Run every fixture matching `filter` and report each outcome.
pub fn check(filter: Option<&str>) -> Result<(), i32> {
    let fixtures = catalog::select(filter);
    if fixtures.is_empty() {
        eprintln!("error: no fixtures match '{}'", filter.unwrap_or_default());
        return Err(1);
    }

    let mut failed = 0;
    for fixture in &fixtures {
        match harness::check(fixture) {
            Ok(()) => println!("ok    {}", fixture.name),
            Err(msg) => {
                failed += 1;
                println!("FAIL  {}: {msg}", fixture.name);
            }
        }
    }

    let passed = fixtures.len() - failed;
    println!();
    println!("{passed} passed, {failed} failed");
    if failed > 0 {
        return Err(1);
    }
    Ok(())
}

/// Assemble a text file and run it once with the given locals.
pub fn run(file: &Path, locals: &[String], max_stack: usize) -> Result<(), i32> {
    let text = fs::read_to_string(file).map_err(|e| {
        eprintln!("error: cannot read '{}': {e}", file.display());
        1
    })?;

    let block = opsem_assembler::assemble(&text).map_err(|e| {
        eprintln!("error: {e}");
        1
    })?;

    let args = parse_values(locals)?;
    log::info!("running {} instructions from {}", block.len(), file.display());

    let mut frame = Frame::with_max_stack(locals_for(args), max_stack);
    match frame.run(&block, &StaticFields::new()) {
        Ok(control) => {
            println!("{}", describe(&control));
            Ok(())
        }
        Err(e) => {
            eprintln!("runtime error: {e}");
            Err(3)
        }
    }
}

/// Push `values`, execute one instruction, print what it left behind.
pub fn eval(instruction: &str, values: &[String]) -> Result<(), i32> {
    let block = opsem_assembler::assemble(instruction).map_err(|e| {
        eprintln!("error: {e}");
        1
    })?;
    let [instr] = block.instructions.as_slice() else {
        eprintln!(
            "error: expected exactly one instruction, found {}",
            block.len()
        );
        return Err(1);
    };

    let mut frame = Frame::new(locals_for(Vec::new()));
    for value in parse_values(values)? {
        frame.push(value).map_err(|e| {
            eprintln!("error: {e}");
            1
        })?;
    }

    match frame.step(instr, &StaticFields::new()) {
        Ok(Control::Continue) => {
            match frame.stack().last() {
                Some(top) => println!("{top}"),
                None => println!("empty stack"),
            }
            Ok(())
        }
        Ok(control) => {
            println!("{}", describe(&control));
            Ok(())
        }
        Err(e) => {
            eprintln!("runtime error: {e}");
            Err(3)
        }
    }
}

fn parse_values(texts: &[String]) -> Result<Vec<Value>, i32> {
    texts
        .iter()
        .map(|text| {
            opsem_assembler::parse_value(text).map_err(|e| {
                eprintln!("error: invalid value '{text}': {e}");
                1
            })
        })
        .collect()
}
