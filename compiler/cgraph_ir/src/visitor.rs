//! Read-only traversal of a program graph.
//!
//! A visitor may mutate its own state; the graph stays untouched. Default
//! methods call the matching `walk_*` function, which visits children in
//! execution order. Override `visit_*` to act at specific nodes and call the
//! `walk_*` function to keep descending.
//!
//! Walking never follows an invocation into a callable's body: a callable is
//! late bound, and its body is reached through its `FuncDef` statement.
//!
//! # Example
//!
//! ```
//! use cgraph_ir::{walk_expr, ExprId, ExprKind, Program, Stmt, Visitor};
//!
//! struct CountVars(usize);
//!
//! impl<'p> Visitor<'p> for CountVars {
//!     fn visit_expr(&mut self, id: ExprId, program: &'p Program) {
//!         if let ExprKind::Var(_) = program.expr(id) {
//!             self.0 += 1;
//!         }
//!         walk_expr(self, id, program);
//!     }
//! }
//!
//! let mut p = Program::new();
//! let bb = p.empty_block();
//! let x = p.var("x");
//! let y = p.var("y");
//! p.append(bb, Stmt::assign(x, y));
//!
//! let mut counter = CountVars(0);
//! counter.visit_block(bb, &p);
//! assert_eq!(counter.0, 1);
//! ```

use crate::{BlockId, ExprId, ExprKind, FuncId, Program, Stmt};

/// Graph visitor.
pub trait Visitor<'p> {
    /// Visit a basic block.
    fn visit_block(&mut self, id: BlockId, program: &'p Program) {
        walk_block(self, id, program);
    }

    /// Visit a statement.
    fn visit_stmt(&mut self, stmt: &'p Stmt, program: &'p Program) {
        walk_stmt(self, stmt, program);
    }

    /// Visit an expression.
    fn visit_expr(&mut self, id: ExprId, program: &'p Program) {
        walk_expr(self, id, program);
    }

    /// Visit a function definition reached through its `FuncDef` statement.
    fn visit_func(&mut self, id: FuncId, program: &'p Program) {
        walk_func(self, id, program);
    }
}

/// Visit every statement of a block in order.
pub fn walk_block<'p, V: Visitor<'p> + ?Sized>(visitor: &mut V, id: BlockId, program: &'p Program) {
    for stmt in program.block(id) {
        visitor.visit_stmt(stmt, program);
    }
}

/// Visit the children of a statement.
pub fn walk_stmt<'p, V: Visitor<'p> + ?Sized>(
    visitor: &mut V,
    stmt: &'p Stmt,
    program: &'p Program,
) {
    match stmt {
        Stmt::Expr(expr) | Stmt::Return(Some(expr)) => visitor.visit_expr(*expr, program),
        Stmt::Assign { value, .. } => visitor.visit_expr(*value, program),
        Stmt::If { cond, then_block } => {
            visitor.visit_expr(*cond, program);
            visitor.visit_block(*then_block, program);
        }
        Stmt::While { cond, body } => {
            visitor.visit_expr(*cond, program);
            visitor.visit_block(*body, program);
        }
        Stmt::FuncDef(func) => visitor.visit_func(*func, program),
        Stmt::Break | Stmt::Return(None) => {}
    }
}

/// Visit the operands of an expression.
pub fn walk_expr<'p, V: Visitor<'p> + ?Sized>(visitor: &mut V, id: ExprId, program: &'p Program) {
    match program.expr(id) {
        ExprKind::Invoke { args, .. } => {
            for arg in args {
                visitor.visit_expr(*arg, program);
            }
        }
        ExprKind::Neg(operand) => visitor.visit_expr(*operand, program),
        ExprKind::Literal(_) | ExprKind::Var(_) => {}
    }
}

/// Visit a function body.
pub fn walk_func<'p, V: Visitor<'p> + ?Sized>(visitor: &mut V, id: FuncId, program: &'p Program) {
    visitor.visit_block(program.func(id).body(), program);
}
