//! Minimal call harness around [`Frame`].
//!
//! The VM stops at every taken branch and every `invokestatic`. This
//! module resolves both: branch offsets become instruction indices, and
//! calls are looked up by name among a fixture's methods and run in a
//! fresh frame.

use std::collections::HashMap;

use opsem_common::{Block, Value};
use opsem_vm::{Control, Frame, LocalSlots, StaticFields};

use crate::catalog::{Expect, Fixture};

/// Local slots every method gets, whatever its arguments.
pub const MIN_LOCALS: usize = 8;

/// Taken branches allowed per frame before a run is abandoned.
pub const JUMP_LIMIT: usize = 10_000;

/// Call depth at which `invokestatic` chains are abandoned.
pub const CALL_DEPTH_LIMIT: usize = 64;

/// Everything a method can call, by name.
#[derive(Debug, Default)]
pub struct Methods {
    blocks: HashMap<String, Block>,
}

impl Methods {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, block: Block) {
        self.blocks.insert(name.into(), block);
    }

    pub fn get(&self, name: &str) -> Option<&Block> {
        self.blocks.get(name)
    }
}

/// Lay `args` out in the first slots, padded to [`MIN_LOCALS`].
pub fn locals_for(args: Vec<Value>) -> LocalSlots {
    let mut values = args;
    if values.len() < MIN_LOCALS {
        values.resize(MIN_LOCALS, Value::Int32(0));
    }
    LocalSlots::from_values(values)
}

/// Run `block` in `frame` to its return, following branches and calls.
///
/// Returns the method's result (`None` for void). Execution errors come
/// back as their message.
pub fn invoke(
    block: &Block,
    frame: &mut Frame,
    methods: &Methods,
    statics: &StaticFields,
) -> Result<Option<Value>, String> {
    call(block, frame, methods, statics, 0)
}

fn call(
    block: &Block,
    frame: &mut Frame,
    methods: &Methods,
    statics: &StaticFields,
    depth: usize,
) -> Result<Option<Value>, String> {
    let mut jumps = 0;
    loop {
        match frame.run(block, statics).map_err(|e| e.to_string())? {
            Control::Return(value) => return Ok(value),
            Control::Branch { at, offset } => {
                jumps += 1;
                if jumps > JUMP_LIMIT {
                    return Err(format!("more than {JUMP_LIMIT} branches taken"));
                }
                let target = branch_target(at, offset, block.len())?;
                log::debug!("branch at {at} to {target}");
                frame.jump(target);
            }
            Control::Invoke { method, args } => {
                if depth >= CALL_DEPTH_LIMIT {
                    return Err(format!("call depth exceeds {CALL_DEPTH_LIMIT}"));
                }
                let callee = methods
                    .get(&method.name)
                    .ok_or_else(|| format!("no method named '{}'", method.name))?;
                log::debug!("invoke {}{}", method.name, method.descriptor());
                let mut inner = Frame::with_max_stack(locals_for(args), frame.max_stack());
                let result = call(callee, &mut inner, methods, statics, depth + 1)?;
                if result.as_ref().map(Value::kind) != method.returns {
                    return Err(format!(
                        "{} returned {}, descriptor says {}",
                        method.name,
                        describe_result(&result),
                        method.descriptor()
                    ));
                }
                frame.resume(result).map_err(|e| e.to_string())?;
            }
            Control::Continue => {
                return Err(format!("fell off the end of the block at {}", frame.pc()))
            }
        }
    }
}

/// Absolute index of a branch at `at` with a relative `offset`.
pub fn branch_target(at: usize, offset: i16, len: usize) -> Result<usize, String> {
    let target = at as i64 + i64::from(offset);
    if target < 0 || target >= len as i64 {
        return Err(format!(
            "branch at {at} to {target} is outside the block (length {len})"
        ));
    }
    Ok(target as usize)
}

fn describe_result(result: &Option<Value>) -> String {
    match result {
        Some(value) => value.kind().to_string(),
        None => "void".to_string(),
    }
}

/// One-line summary of how a frame stopped.
pub fn describe(control: &Control) -> String {
    match control {
        Control::Return(Some(value)) => format!("return {value}"),
        Control::Return(None) => "return void".to_string(),
        Control::Branch { at, offset } => format!("branch {offset:+} at {at}"),
        Control::Invoke { method, args } => {
            let args: Vec<_> = args.iter().map(ToString::to_string).collect();
            format!("invoke {}({})", method.name, args.join(", "))
        }
        Control::Continue => "fallthrough".to_string(),
    }
}

/// Run a fixture and compare the outcome against its expectation.
pub fn check(fixture: &Fixture) -> Result<(), String> {
    let block = opsem_assembler::assemble(&fixture.code).map_err(|e| e.to_string())?;
    let mut methods = Methods::new();
    for (name, code) in &fixture.methods {
        let callee = opsem_assembler::assemble(code).map_err(|e| format!("{name}: {e}"))?;
        methods.insert(*name, callee);
    }
    let statics = StaticFields::new();
    for (name, value) in &fixture.statics {
        statics.define(*name, value.clone());
    }

    let mut frame = Frame::new(locals_for(fixture.args.clone()));
    let outcome = invoke(&block, &mut frame, &methods, &statics);

    match (&fixture.expect, outcome) {
        (Expect::Faults(message), Err(err)) if err.contains(message) => Ok(()),
        (Expect::Faults(message), Err(err)) => {
            Err(format!("expected fault containing '{message}', got '{err}'"))
        }
        (Expect::Faults(message), Ok(result)) => Err(format!(
            "expected fault containing '{message}', got {}",
            returned(&result)
        )),
        (_, Err(err)) => Err(err),
        (Expect::Returns(expected), Ok(Some(value))) if value == *expected => Ok(()),
        (Expect::Prints(expected), Ok(Some(value))) if value.to_string() == *expected => Ok(()),
        (Expect::Void, Ok(None)) => Ok(()),
        (Expect::Static(name, expected), Ok(_)) => match statics.get(name) {
            Ok(value) if value == *expected => Ok(()),
            Ok(value) => Err(format!("expected {name} = {expected}, found {value}")),
            Err(err) => Err(err.to_string()),
        },
        (expect, Ok(result)) => Err(format!(
            "expected {}, got {}",
            expected(expect),
            returned(&result)
        )),
    }
}

fn returned(result: &Option<Value>) -> String {
    match result {
        Some(value) => format!("return {value}"),
        None => "return void".to_string(),
    }
}

fn expected(expect: &Expect) -> String {
    match expect {
        Expect::Returns(value) => format!("return {value}"),
        Expect::Prints(text) => format!("return {text}"),
        Expect::Void => "return void".to_string(),
        Expect::Faults(message) => format!("fault '{message}'"),
        Expect::Static(name, value) => format!("{name} = {value}"),
    }
}
