//! VM entry point.
//!
//! A [`Vm`] holds configuration only. Each [`Vm::exec`] call verifies the
//! graph, then runs it with a fresh environment, so nothing leaks between
//! executions of the same program. The program itself is borrowed
//! read-only and can be executed any number of times.

use std::collections::BTreeMap;

use cgraph_ir::{BlockId, Program, Value};

use crate::errors::EvalError;
use crate::interpreter::Interpreter;
use crate::verify::verify;

/// Scoping policy for `While` bodies.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum LoopScope {
    /// Bodies run in the enclosing scope; names first assigned in a body
    /// stay visible after the loop.
    #[default]
    Shared,
    /// Each iteration runs in a fresh block scope. Names first assigned in
    /// the body are dropped at the end of the iteration; assignments to
    /// names bound outside the loop still update them.
    PerIteration,
}

/// VM configuration.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct VmConfig {
    /// Scoping policy for loop bodies.
    pub loop_scope: LoopScope,
}

/// Interpreter for program graphs.
#[derive(Clone, Debug, Default)]
pub struct Vm {
    config: VmConfig,
}

impl Vm {
    /// Create a VM with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start configuring a VM.
    pub fn builder() -> VmBuilder {
        VmBuilder::default()
    }

    /// Active configuration.
    pub fn config(&self) -> VmConfig {
        self.config
    }

    /// Execute `root` as the top-level block of `program`.
    ///
    /// Returns the top-level bindings left after execution. Verification
    /// runs first; a structural error is reported before any native binding
    /// is called.
    #[tracing::instrument(level = "debug", skip(self, program))]
    pub fn exec(&self, program: &Program, root: BlockId) -> Result<Bindings, EvalError> {
        verify(program, root)?;
        let mut interpreter = Interpreter::new(program, self.config.loop_scope);
        interpreter.run(root)?;
        let bindings = Bindings::from_env(program, &interpreter);
        tracing::debug!(bindings = bindings.len(), "execution finished");
        Ok(bindings)
    }
}

/// Builder for [`Vm`].
#[derive(Clone, Debug, Default)]
pub struct VmBuilder {
    config: VmConfig,
}

impl VmBuilder {
    /// Set the loop-body scoping policy.
    #[must_use]
    pub fn loop_scope(mut self, loop_scope: LoopScope) -> Self {
        self.config.loop_scope = loop_scope;
        self
    }

    /// Finish building.
    pub fn build(self) -> Vm {
        Vm {
            config: self.config,
        }
    }
}

/// Snapshot of the top-level scope after an execution.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Bindings {
    values: BTreeMap<String, Value>,
}

impl Bindings {
    fn from_env(program: &Program, interpreter: &Interpreter<'_>) -> Self {
        let values = interpreter
            .env()
            .globals()
            .into_iter()
            .map(|(name, value)| (program.name(name).to_string(), value))
            .collect();
        Bindings { values }
    }

    /// Value bound to `name`, if any.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Number of bindings.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no names were bound.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Bindings in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(name, value)| (name.as_str(), value))
    }
}
