//! Fixture catalog: small methods exercising each instruction.
//!
//! Every fixture is an assembly block (in the form the compiler emits for
//! a one-line Java method), the arguments it is called with, and what it
//! must produce. `opsem check` runs them all through the engine.

pub mod comparison;
pub mod constants;
pub mod conversions;
pub mod math;
pub mod references;
pub mod store_load;

use opsem_common::{Kind, Value};

/// What a fixture must produce.
#[derive(Debug, Clone)]
pub enum Expect {
    /// Returns exactly this value. Floats compare bitwise, references by
    /// identity (so only `null` is useful here).
    Returns(Value),
    /// Returns a value whose printed form is this text. For string and
    /// class constants, which are fresh objects on every run.
    Prints(&'static str),
    /// Returns from a void method.
    Void,
    /// Fails with an error whose message contains this text.
    Faults(&'static str),
    /// Returns, leaving the static field with this value.
    Static(&'static str, Value),
}

/// A single catalog entry.
#[derive(Debug, Clone)]
pub struct Fixture {
    /// Unique identifier, e.g. `op_iadd` or `op_idiv_by_zero`.
    pub name: String,
    /// The instruction under test.
    pub instruction: &'static str,
    /// Assembly text of the method body.
    pub code: String,
    /// Initial local slots, in order.
    pub args: Vec<Value>,
    /// Methods `invokestatic` may call, by name.
    pub methods: Vec<(&'static str, &'static str)>,
    /// Static fields defined before the body runs.
    pub statics: Vec<(&'static str, Value)>,
    pub expect: Expect,
}

impl Fixture {
    pub fn new(
        name: impl Into<String>,
        instruction: &'static str,
        code: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            instruction,
            code: code.into(),
            args: Vec::new(),
            methods: Vec::new(),
            statics: Vec::new(),
            expect: Expect::Void,
        }
    }

    pub fn args(mut self, args: Vec<Value>) -> Self {
        self.args = args;
        self
    }

    pub fn method(mut self, name: &'static str, code: &'static str) -> Self {
        self.methods.push((name, code));
        self
    }

    pub fn static_field(mut self, name: &'static str, value: impl Into<Value>) -> Self {
        self.statics.push((name, value.into()));
        self
    }

    pub fn returns(mut self, value: impl Into<Value>) -> Self {
        self.expect = Expect::Returns(value.into());
        self
    }

    pub fn prints(mut self, text: &'static str) -> Self {
        self.expect = Expect::Prints(text);
        self
    }

    pub fn faults(mut self, message: &'static str) -> Self {
        self.expect = Expect::Faults(message);
        self
    }

    pub fn leaves_static(mut self, name: &'static str, value: impl Into<Value>) -> Self {
        self.expect = Expect::Static(name, value.into());
        self
    }
}

/// Mnemonic prefix for instructions typed by `kind`: `i`, `l`, `f`, `d`, `a`.
pub(crate) fn type_prefix(kind: Kind) -> char {
    match kind {
        Kind::Int => 'i',
        Kind::Long => 'l',
        Kind::Float => 'f',
        Kind::Double => 'd',
        Kind::Reference => 'a',
    }
}

/// Collect every fixture from every category module.
pub fn all_fixtures() -> Vec<Fixture> {
    let mut fixtures = Vec::new();
    fixtures.extend(math::fixtures());
    fixtures.extend(comparison::fixtures());
    fixtures.extend(conversions::fixtures());
    fixtures.extend(constants::fixtures());
    fixtures.extend(store_load::fixtures());
    fixtures.extend(references::fixtures());
    fixtures
}

/// Fixtures whose name contains `filter`, or all of them.
pub fn select(filter: Option<&str>) -> Vec<Fixture> {
    all_fixtures()
        .into_iter()
        .filter(|f| filter.map_or(true, |pat| f.name.contains(pat)))
        .collect()
}
