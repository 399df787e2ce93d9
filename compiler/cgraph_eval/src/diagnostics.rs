//! Call stack tracking for error backtraces.
//!
//! Each callable invocation pushes a frame and pops it on exit. When an
//! error leaves a callable body, the interpreter snapshots the stack into
//! the error's [`EvalBacktrace`]. There is no depth limit; deep recursion
//! grows the host stack instead (see [`crate::ensure_sufficient_stack`]).

use cgraph_ir::{FuncId, Program};

use crate::errors::EvalBacktrace;

/// Live call stack of the interpreter.
#[derive(Clone, Debug, Default)]
pub struct CallStack {
    frames: Vec<FuncId>,
}

impl CallStack {
    /// Create an empty call stack.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter a callable.
    pub fn push(&mut self, func: FuncId) {
        self.frames.push(func);
    }

    /// Leave the most recent callable.
    pub fn pop(&mut self) {
        debug_assert!(
            !self.frames.is_empty(),
            "CallStack::pop() called on empty stack"
        );
        self.frames.pop();
    }

    /// Current call depth.
    #[inline]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Snapshot the stack, resolving function names through `program`.
    pub fn capture(&self, program: &Program) -> EvalBacktrace {
        EvalBacktrace::new(
            self.frames
                .iter()
                .map(|func| program.name(program.func(*func).name()).to_string())
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgraph_ir::Stmt;

    #[test]
    fn capture_names_frames_outermost_first() {
        let mut program = Program::new();
        let outer = program.func_def("outer", &[]);
        let inner = program.func_def("inner", &[]);
        let (outer_id, inner_id) = (outer.id(), inner.id());
        let _: Stmt = program.seal(outer);
        let _: Stmt = program.seal(inner);

        let mut stack = CallStack::new();
        stack.push(outer_id);
        stack.push(inner_id);
        assert_eq!(stack.depth(), 2);
        assert_eq!(stack.capture(&program).frames(), ["outer", "inner"]);

        stack.pop();
        assert_eq!(stack.capture(&program).frames(), ["outer"]);
    }
}
