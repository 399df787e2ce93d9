//! Structural verification of a program graph.
//!
//! Runs before execution so that a malformed graph fails without any native
//! binding being called. Checks the root block and every function body it
//! can reach, through `FuncDef` statements or through invocations:
//!
//! - `Break` outside a loop and `Return` outside a callable
//! - argument counts of fixed-arity natives and callables
//! - invocations of callables whose definition was never sealed
//! - blocks nested inside themselves
//!
//! Loop depth resets inside function bodies: a `Break` in a body never
//! targets a loop at the definition or call site.
//!
//! Unresolved variables are not checked here. Resolution is dynamic and
//! depends on which scopes are live when the reference is evaluated.

use rustc_hash::FxHashSet;

use cgraph_ir::{
    walk_block, walk_expr, walk_func, walk_stmt, BlockId, Callee, ExprId, ExprKind, FuncId, Program,
    Stmt, Visitor,
};

use crate::errors::{
    break_outside_loop, cyclic_block, return_outside_callable, unsealed_callable, EvalError,
};
use crate::exec::call::{check_arg_count, check_native_arity};

/// Verify the graph rooted at `root`, reporting the first structural error.
#[tracing::instrument(level = "debug", skip_all)]
pub fn verify(program: &Program, root: BlockId) -> Result<(), EvalError> {
    let mut verifier = Verifier::default();
    verifier.visit_block(root, program);
    match verifier.error {
        Some(err) => {
            tracing::debug!(error = %err, "verification failed");
            Err(err)
        }
        None => Ok(()),
    }
}

#[derive(Default)]
struct Verifier {
    loop_depth: usize,
    callable_depth: usize,
    /// Blocks on the current nesting path.
    on_path: FxHashSet<BlockId>,
    /// Function bodies already entered.
    verified_funcs: FxHashSet<FuncId>,
    /// First error found; later ones are not collected.
    error: Option<EvalError>,
}

impl Verifier {
    fn fail(&mut self, err: EvalError) {
        if self.error.is_none() {
            self.error = Some(err);
        }
    }

    fn check_invoke(&mut self, callee: Callee, argc: usize, program: &Program) {
        let result = match callee {
            Callee::Native(id) => {
                let native = program.native(id);
                check_native_arity(native.name(), native.arity(), argc)
            }
            Callee::Callable(id) => {
                let func = program.func(id);
                let name = program.name(func.name());
                if func.is_sealed() {
                    check_arg_count(name, func.params(), argc)
                } else {
                    Err(unsealed_callable(name))
                }
            }
        };
        if let Err(err) = result {
            self.fail(err);
        }
    }
}

impl<'p> Visitor<'p> for Verifier {
    fn visit_block(&mut self, id: BlockId, program: &'p Program) {
        if self.error.is_some() {
            return;
        }
        if !self.on_path.insert(id) {
            self.fail(cyclic_block());
            return;
        }
        walk_block(self, id, program);
        self.on_path.remove(&id);
    }

    fn visit_stmt(&mut self, stmt: &'p Stmt, program: &'p Program) {
        if self.error.is_some() {
            return;
        }
        match stmt {
            Stmt::Break if self.loop_depth == 0 => self.fail(break_outside_loop()),
            Stmt::Return(_) if self.callable_depth == 0 => self.fail(return_outside_callable()),
            Stmt::While { cond, body } => {
                self.visit_expr(*cond, program);
                self.loop_depth += 1;
                self.visit_block(*body, program);
                self.loop_depth -= 1;
            }
            _ => walk_stmt(self, stmt, program),
        }
    }

    fn visit_expr(&mut self, id: ExprId, program: &'p Program) {
        if self.error.is_some() {
            return;
        }
        if let ExprKind::Invoke { callee, args } = program.expr(id) {
            self.check_invoke(*callee, args.len(), program);
            if let Callee::Callable(func) = callee {
                self.visit_func(*func, program);
            }
        }
        walk_expr(self, id, program);
    }

    fn visit_func(&mut self, id: FuncId, program: &'p Program) {
        if self.error.is_some() || !self.verified_funcs.insert(id) {
            return;
        }
        let outer_loops = std::mem::replace(&mut self.loop_depth, 0);
        self.callable_depth += 1;
        walk_func(self, id, program);
        self.callable_depth -= 1;
        self.loop_depth = outer_loops;
    }
}

#[cfg(test)]
mod tests;
