//! Tree-walking interpreter over a program graph.
//!
//! One `Interpreter` exists per execution: it owns a fresh [`Environment`]
//! and call stack and borrows the program read-only. Statements run strictly
//! in block order; loop conditions are re-evaluated before every iteration.
//! Native calls are synchronous from the interpreter's point of view.

mod function_call;
mod scope_guard;

pub use scope_guard::ScopedInterpreter;

use smallvec::SmallVec;

use cgraph_ir::{BlockId, ExprId, ExprKind, Name, Program, Stmt, Value};

use crate::diagnostics::CallStack;
use crate::ensure_sufficient_stack;
use crate::environment::{Environment, ScopeKind};
use crate::errors::{
    break_outside_loop, return_outside_callable, undefined_variable, EvalError, EvalResult,
};
use crate::exec::control::{is_truthy, to_loop_action, Flow, LoopAction};
use crate::unary_operators::evaluate_neg;
use crate::vm::LoopScope;

/// Interpreter state for one execution of a program graph.
pub struct Interpreter<'p> {
    /// The graph being executed.
    pub(crate) program: &'p Program,
    /// Current environment.
    pub(crate) env: Environment,
    /// Scoping policy for loop bodies.
    pub(crate) loop_scope: LoopScope,
    /// Active callable invocations.
    pub(crate) call_stack: CallStack,
}

impl<'p> Interpreter<'p> {
    /// Create an interpreter with an empty top-level environment.
    pub fn new(program: &'p Program, loop_scope: LoopScope) -> Self {
        Interpreter {
            program,
            env: Environment::new(),
            loop_scope,
            call_stack: CallStack::new(),
        }
    }

    /// Execute `root` as the top-level block.
    ///
    /// A `Break` or `Return` that reaches the top level is a structural error.
    pub fn run(&mut self, root: BlockId) -> Result<(), EvalError> {
        match self.exec_block(root)? {
            Flow::Normal => Ok(()),
            Flow::Break => Err(break_outside_loop()),
            Flow::Return(_) => Err(return_outside_callable()),
        }
    }

    /// The environment, for reading bindings after a run.
    pub fn env(&self) -> &Environment {
        &self.env
    }

    /// Execute a block, stopping at the first control transfer.
    pub fn exec_block(&mut self, id: BlockId) -> Result<Flow, EvalError> {
        ensure_sufficient_stack(|| {
            let program = self.program;
            for stmt in program.block(id) {
                let flow = self.exec_stmt(stmt)?;
                if !flow.is_normal() {
                    return Ok(flow);
                }
            }
            Ok(Flow::Normal)
        })
    }

    /// Execute one statement.
    pub fn exec_stmt(&mut self, stmt: &'p Stmt) -> Result<Flow, EvalError> {
        match stmt {
            Stmt::Expr(expr) => {
                self.eval_expr(*expr)?;
                Ok(Flow::Normal)
            }
            Stmt::Assign { target, value } => {
                let value = self.eval_expr(*value)?;
                self.env.assign(*target, value);
                Ok(Flow::Normal)
            }
            Stmt::If { cond, then_block } => self.exec_if(*cond, *then_block),
            Stmt::While { cond, body } => self.exec_while(*cond, *body),
            Stmt::Break => Ok(Flow::Break),
            Stmt::Return(value) => {
                let value = match value {
                    Some(expr) => self.eval_expr(*expr)?,
                    None => Value::Void,
                };
                Ok(Flow::Return(value))
            }
            // Invocations resolve the definition through their handle.
            Stmt::FuncDef(_) => Ok(Flow::Normal),
        }
    }

    fn exec_if(&mut self, cond: ExprId, then_block: BlockId) -> Result<Flow, EvalError> {
        let cond = self.eval_expr(cond)?;
        if is_truthy(&cond)? {
            self.exec_block(then_block)
        } else {
            Ok(Flow::Normal)
        }
    }

    fn exec_while(&mut self, cond: ExprId, body: BlockId) -> Result<Flow, EvalError> {
        let mut iteration: u64 = 0;
        loop {
            let value = self.eval_expr(cond)?;
            if !is_truthy(&value)? {
                return Ok(Flow::Normal);
            }
            iteration += 1;
            tracing::trace!(iteration, "loop iteration");
            let flow = match self.loop_scope {
                LoopScope::Shared => self.exec_block(body)?,
                LoopScope::PerIteration => {
                    self.with_env_scope(ScopeKind::Block, |scoped| scoped.exec_block(body))?
                }
            };
            match to_loop_action(flow) {
                LoopAction::Continue => {}
                LoopAction::Break => return Ok(Flow::Normal),
                LoopAction::Exit(flow) => return Ok(flow),
            }
        }
    }

    /// Evaluate an expression.
    pub fn eval_expr(&mut self, id: ExprId) -> EvalResult {
        ensure_sufficient_stack(|| self.eval_expr_inner(id))
    }

    fn eval_expr_inner(&mut self, id: ExprId) -> EvalResult {
        let program = self.program;
        match program.expr(id) {
            ExprKind::Literal(value) => Ok(value.clone()),
            ExprKind::Var(name) => self.lookup(*name),
            ExprKind::Neg(operand) => {
                let value = self.eval_expr(*operand)?;
                evaluate_neg(&value)
            }
            ExprKind::Invoke { callee, args } => {
                let mut values: SmallVec<[Value; 4]> = SmallVec::with_capacity(args.len());
                for arg in args {
                    values.push(self.eval_expr(*arg)?);
                }
                self.invoke(*callee, values)
            }
        }
    }

    fn lookup(&self, name: Name) -> EvalResult {
        self.env
            .lookup(name)
            .ok_or_else(|| undefined_variable(self.program.name(name)))
    }
}
