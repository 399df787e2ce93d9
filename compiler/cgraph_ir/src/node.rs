//! Node kinds of the program graph.
//!
//! Expressions produce values; statements sequence them. There is no
//! binary-operator node: comparisons and arithmetic are invocations of native
//! bindings that wrap host operators.

use smallvec::SmallVec;

use crate::{BlockId, ExprId, FuncId, Name, NativeId, Value};

/// Argument expressions of an invocation, in call order.
pub type Args = SmallVec<[ExprId; 4]>;

/// Expression node.
#[derive(Clone, Debug)]
pub enum ExprKind {
    /// Host value held by reference; opaque to the IR.
    Literal(Value),
    /// Reference resolved against the environment at evaluation time.
    Var(Name),
    /// Call of a native binding or a callable.
    Invoke { callee: Callee, args: Args },
    /// Arithmetic negation of a scalar.
    Neg(ExprId),
}

/// Target of an invocation.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Callee {
    /// Registered host operation.
    Native(NativeId),
    /// Function definition, resolved when the invocation is evaluated.
    Callable(FuncId),
}

/// Statement node. Blocks hold statements in execution order.
#[derive(Clone, Debug)]
pub enum Stmt {
    /// Evaluate an expression for its side effects and drop the result.
    Expr(ExprId),
    /// Bind the value of `value` to `target` (declare-or-update).
    Assign { target: Name, value: ExprId },
    /// Run `then_block` when `cond` is truthy. There is no else branch.
    If { cond: ExprId, then_block: BlockId },
    /// Re-evaluate `cond` before every run of `body`.
    While { cond: ExprId, body: BlockId },
    /// Leave the nearest enclosing `While`.
    Break,
    /// Leave the nearest enclosing callable, optionally with a value.
    Return(Option<ExprId>),
    /// Definition site of a function; a no-op when executed.
    FuncDef(FuncId),
}

impl Stmt {
    /// Expression statement: evaluate and discard.
    pub fn expr(expr: impl Into<ExprId>) -> Self {
        Stmt::Expr(expr.into())
    }

    /// `target = value`.
    pub fn assign(target: Var, value: impl Into<ExprId>) -> Self {
        Stmt::Assign {
            target: target.name(),
            value: value.into(),
        }
    }

    /// `if cond { then_block }`.
    pub fn if_then(cond: impl Into<ExprId>, then_block: BlockId) -> Self {
        Stmt::If {
            cond: cond.into(),
            then_block,
        }
    }

    /// `while cond { body }`.
    pub fn while_loop(cond: impl Into<ExprId>, body: BlockId) -> Self {
        Stmt::While {
            cond: cond.into(),
            body,
        }
    }

    /// `return value`.
    pub fn ret(value: impl Into<ExprId>) -> Self {
        Stmt::Return(Some(value.into()))
    }

    /// Fixed tag used in dumps and traces.
    pub fn tag(&self) -> &'static str {
        match self {
            Stmt::Expr(_) => "ExprStmt",
            Stmt::Assign { .. } => "Assign",
            Stmt::If { .. } => "If",
            Stmt::While { .. } => "While",
            Stmt::Break => "Break",
            Stmt::Return(_) => "Return",
            Stmt::FuncDef(_) => "FuncDef",
        }
    }
}

/// Handle to a variable reference.
///
/// Carries both the interned name (for assignment targets and parameters)
/// and the expression node that reads it.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Var {
    name: Name,
    expr: ExprId,
}

impl Var {
    pub(crate) fn new(name: Name, expr: ExprId) -> Self {
        Var { name, expr }
    }

    /// The variable's name.
    #[inline]
    pub fn name(self) -> Name {
        self.name
    }

    /// The expression that reads the variable.
    #[inline]
    pub fn expr(self) -> ExprId {
        self.expr
    }
}

impl From<Var> for ExprId {
    fn from(var: Var) -> Self {
        var.expr
    }
}
