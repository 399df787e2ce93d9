//! Structural printer.
//!
//! Walks a program graph read-only and renders one line per node, indented
//! by nesting depth. The printer never evaluates anything: native bindings
//! are not called, variables are printed by name, not resolved, and literals
//! print as a fixed placeholder without reading the wrapped value.
//!
//! ```text
//! BasicBlock
//!   Assign i
//!     Literal <opaque>
//!   While
//!     cond:
//!       Invoke lt
//!         Var i
//!         Literal <opaque>
//!     body:
//!       BasicBlock
//!         Break
//! ```
//!
//! Invocations of callables print the callee's name only. A callable's body
//! is printed once, under its `FuncDef` statement.

use rustc_hash::FxHashSet;

use cgraph_ir::{
    walk_expr, BlockId, ExprId, ExprKind, FuncId, Program, Stmt, Visitor,
};

use crate::emitter::{Emitter, StringEmitter};

/// Printer error.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum PrintError {
    /// A block was reached again while it was still being printed.
    #[error("block {block:?} is nested inside itself")]
    Cycle { block: BlockId },
}

/// Printer configuration.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PrinterConfig {
    /// Spaces per nesting level.
    pub indent: usize,
}

impl Default for PrinterConfig {
    fn default() -> Self {
        PrinterConfig { indent: 2 }
    }
}

/// Accumulating structural printer.
///
/// Each [`Printer::visit`] appends one tree to the output; [`Printer::dump`]
/// returns everything printed so far.
pub struct Printer<'p> {
    program: &'p Program,
    config: PrinterConfig,
    emitter: StringEmitter,
    depth: usize,
    /// Blocks on the current nesting path.
    on_path: FxHashSet<BlockId>,
    error: Option<PrintError>,
}

impl<'p> Printer<'p> {
    /// Create a printer with default configuration.
    pub fn new(program: &'p Program) -> Self {
        Self::with_config(program, PrinterConfig::default())
    }

    /// Create a printer with explicit configuration.
    pub fn with_config(program: &'p Program, config: PrinterConfig) -> Self {
        Printer {
            program,
            config,
            emitter: StringEmitter::new(),
            depth: 0,
            on_path: FxHashSet::default(),
            error: None,
        }
    }

    /// Print the tree rooted at `block`.
    ///
    /// On error nothing from this call is kept in the output.
    pub fn visit(&mut self, block: BlockId) -> Result<(), PrintError> {
        let mark = self.emitter.mark();
        self.depth = 0;
        self.on_path.clear();
        self.error = None;

        let program = self.program;
        self.visit_block(block, program);

        match self.error.take() {
            Some(err) => {
                self.emitter.rewind(mark);
                Err(err)
            }
            None => Ok(()),
        }
    }

    /// Everything printed so far.
    pub fn dump(&self) -> String {
        self.emitter.as_str().to_string()
    }

    fn line(&mut self, text: &str) {
        self.emitter.emit_indent(self.depth * self.config.indent);
        self.emitter.emit(text);
        self.emitter.emit_newline();
    }

    fn nested(&mut self, f: impl FnOnce(&mut Self)) {
        self.depth += 1;
        f(self);
        self.depth -= 1;
    }

    /// `label:` followed by its contents one level deeper.
    fn section(&mut self, label: &str, f: impl FnOnce(&mut Self)) {
        self.line(label);
        self.nested(f);
    }

    fn func_header(&self, id: FuncId) -> String {
        let func = self.program.func(id);
        let params: Vec<&str> = func
            .params()
            .iter()
            .map(|param| self.program.name(*param))
            .collect();
        format!(
            "FuncDef {}({})",
            self.program.name(func.name()),
            params.join(", ")
        )
    }
}

impl<'p> Visitor<'p> for Printer<'p> {
    fn visit_block(&mut self, id: BlockId, program: &'p Program) {
        if self.error.is_some() {
            return;
        }
        if !self.on_path.insert(id) {
            self.error = Some(PrintError::Cycle { block: id });
            return;
        }
        self.line("BasicBlock");
        self.nested(|p| {
            for stmt in program.block(id) {
                p.visit_stmt(stmt, program);
            }
        });
        self.on_path.remove(&id);
    }

    fn visit_stmt(&mut self, stmt: &'p Stmt, program: &'p Program) {
        if self.error.is_some() {
            return;
        }
        match stmt {
            Stmt::Expr(expr) => {
                self.line("ExprStmt");
                self.nested(|p| p.visit_expr(*expr, program));
            }
            Stmt::Assign { target, value } => {
                self.line(&format!("Assign {}", program.name(*target)));
                self.nested(|p| p.visit_expr(*value, program));
            }
            Stmt::If { cond, then_block } => {
                self.line("If");
                self.nested(|p| {
                    p.section("cond:", |p| p.visit_expr(*cond, program));
                    p.section("then:", |p| p.visit_block(*then_block, program));
                });
            }
            Stmt::While { cond, body } => {
                self.line("While");
                self.nested(|p| {
                    p.section("cond:", |p| p.visit_expr(*cond, program));
                    p.section("body:", |p| p.visit_block(*body, program));
                });
            }
            Stmt::Break => self.line("Break"),
            Stmt::Return(value) => {
                self.line("Return");
                if let Some(value) = value {
                    self.nested(|p| p.visit_expr(*value, program));
                }
            }
            Stmt::FuncDef(id) => self.visit_func(*id, program),
        }
    }

    fn visit_expr(&mut self, id: ExprId, program: &'p Program) {
        match program.expr(id) {
            ExprKind::Literal(_) => self.line("Literal <opaque>"),
            ExprKind::Var(name) => self.line(&format!("Var {}", program.name(*name))),
            ExprKind::Invoke { callee, .. } => {
                self.line(&format!("Invoke {}", program.callee_name(*callee)));
                self.nested(|p| walk_expr(p, id, program));
            }
            ExprKind::Neg(_) => {
                self.line("Neg");
                self.nested(|p| walk_expr(p, id, program));
            }
        }
    }

    fn visit_func(&mut self, id: FuncId, program: &'p Program) {
        let header = self.func_header(id);
        self.line(&header);
        self.nested(|p| p.visit_block(program.func(id).body(), program));
    }
}

/// Print the tree rooted at `block` in one call.
pub fn print_block(program: &Program, block: BlockId) -> Result<String, PrintError> {
    let mut printer = Printer::new(program);
    printer.visit(block)?;
    Ok(printer.dump())
}
