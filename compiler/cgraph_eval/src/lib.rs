//! cgraph evaluator - verifies and executes program graphs.
//!
//! # Architecture
//!
//! - [`Vm`]: entry point; verifies a graph, then runs it
//! - [`verify`]: structural checks made before any native call
//! - [`Interpreter`]: tree-walking execution of blocks and expressions
//! - [`Environment`]: scope chain with declare-or-update assignment
//! - [`Operators`]: host arithmetic and comparisons as native bindings

mod diagnostics;
pub mod environment;
mod errors;
pub mod exec;
pub mod interpreter;
mod operators;
mod stack;
mod unary_operators;
mod verify;
mod vm;

pub use diagnostics::CallStack;
pub use environment::{Environment, LocalScope, Scope, ScopeKind};
pub use errors::{
    arity_mismatch, break_outside_loop, cyclic_block, integer_overflow, native_failed,
    return_outside_callable, type_mismatch, undefined_variable, unsealed_callable, EvalBacktrace,
    EvalError, EvalErrorKind, EvalResult,
};
pub use exec::control::{is_truthy, Flow, LoopAction};
pub use interpreter::Interpreter;
pub use operators::{add, div, eq, ge, gt, le, lt, mul, sub, Operators};
pub use stack::ensure_sufficient_stack;
pub use verify::verify;
pub use vm::{Bindings, LoopScope, Vm, VmBuilder, VmConfig};
