//! Program arena and graph builder.
//!
//! All nodes of a staged computation live in one `Program`. Construction is
//! bottom-up and pure: literals, variables and native bindings first, then
//! invocations over them, then statements, blocks and control constructs.
//! Nothing runs until the graph is handed to the VM or the printer.
//!
//! Ids are only meaningful for the `Program` that issued them.

use crate::func::FuncSlot;
use crate::{
    Args, Arity, BlockId, Callee, ExprId, ExprKind, FuncDef, FuncId, Name, NativeFunc,
    NativeId, NativeResult, Stmt, StringInterner, Value, Var,
};

/// A basic block: statements in execution order.
#[derive(Clone, Debug, Default)]
struct Block {
    stmts: Vec<Stmt>,
    /// Function whose body this is, if any.
    owner: Option<FuncId>,
}

/// Arena holding every node of a staged computation.
#[derive(Debug, Default)]
pub struct Program {
    interner: StringInterner,
    exprs: Vec<ExprKind>,
    blocks: Vec<Block>,
    funcs: Vec<FuncSlot>,
    natives: Vec<NativeFunc>,
}

impl Program {
    /// Create an empty program.
    pub fn new() -> Self {
        Self::default()
    }

    // Names

    /// Intern a name.
    pub fn intern(&mut self, s: &str) -> Name {
        self.interner.intern(s)
    }

    /// Resolve a name to its string.
    pub fn name(&self, name: Name) -> &str {
        self.interner.lookup(name)
    }

    /// The program's interner.
    pub fn interner(&self) -> &StringInterner {
        &self.interner
    }

    // Expressions

    fn alloc_expr(&mut self, kind: ExprKind) -> ExprId {
        let id = ExprId::next(self.exprs.len());
        self.exprs.push(kind);
        id
    }

    /// Wrap a host value. Buffers are held by handle, never copied.
    pub fn literal(&mut self, value: impl Into<Value>) -> ExprId {
        self.alloc_expr(ExprKind::Literal(value.into()))
    }

    /// Reference a variable by name.
    ///
    /// Two calls with the same string produce distinct nodes naming the same
    /// variable.
    pub fn var(&mut self, name: &str) -> Var {
        let name = self.intern(name);
        let expr = self.alloc_expr(ExprKind::Var(name));
        Var::new(name, expr)
    }

    /// Invoke a native binding or a callable with argument expressions.
    pub fn invoke(
        &mut self,
        callee: impl Into<Callee>,
        args: impl IntoIterator<Item = ExprId>,
    ) -> ExprId {
        let args: Args = args.into_iter().collect();
        self.alloc_expr(ExprKind::Invoke {
            callee: callee.into(),
            args,
        })
    }

    /// Arithmetic negation.
    pub fn neg(&mut self, operand: impl Into<ExprId>) -> ExprId {
        self.alloc_expr(ExprKind::Neg(operand.into()))
    }

    /// Get an expression node.
    #[inline]
    pub fn expr(&self, id: ExprId) -> &ExprKind {
        &self.exprs[id.index()]
    }

    /// Number of expression nodes.
    pub fn expr_count(&self) -> usize {
        self.exprs.len()
    }

    // Native bindings

    /// Register a native binding.
    pub fn bind_native(&mut self, native: NativeFunc) -> NativeId {
        let id = NativeId::next(self.natives.len());
        self.natives.push(native);
        id
    }

    /// Register a host closure as a native binding.
    pub fn native_fn(
        &mut self,
        name: &str,
        arity: Arity,
        op: impl Fn(&[Value]) -> NativeResult + 'static,
    ) -> NativeId {
        self.bind_native(NativeFunc::new(name, arity, op))
    }

    /// Get a native binding.
    #[inline]
    pub fn native(&self, id: NativeId) -> &NativeFunc {
        &self.natives[id.index()]
    }

    // Blocks

    /// Create an empty basic block.
    pub fn empty_block(&mut self) -> BlockId {
        self.alloc_block(None)
    }

    fn alloc_block(&mut self, owner: Option<FuncId>) -> BlockId {
        let id = BlockId::next(self.blocks.len());
        self.blocks.push(Block {
            stmts: Vec::new(),
            owner,
        });
        id
    }

    /// Append a statement to a block created by [`Program::empty_block`].
    ///
    /// Function bodies are extended through [`FuncDef::append`] instead, so
    /// that a sealed body can no longer change.
    ///
    /// # Panics
    ///
    /// Panics if `block` is a function body.
    pub fn append(&mut self, block: BlockId, stmt: Stmt) {
        assert!(
            self.blocks[block.index()].owner.is_none(),
            "function bodies are appended through FuncDef"
        );
        self.push_stmt(block, stmt);
    }

    pub(crate) fn push_stmt(&mut self, block: BlockId, stmt: Stmt) {
        self.blocks[block.index()].stmts.push(stmt);
    }

    /// Statements of a block, in execution order.
    #[inline]
    pub fn block(&self, id: BlockId) -> &[Stmt] {
        &self.blocks[id.index()].stmts
    }

    /// Number of blocks.
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    // Functions

    /// Start a function definition with positional parameters.
    pub fn func_def(&mut self, name: &str, params: &[Var]) -> FuncDef {
        let id = FuncId::next(self.funcs.len());
        let body = self.alloc_block(Some(id));
        let name = self.intern(name);
        self.funcs.push(FuncSlot {
            name,
            params: params.iter().map(|p| p.name()).collect(),
            body,
            sealed: false,
        });
        FuncDef::new(id, body)
    }

    /// Finish a function definition and return its definition statement.
    pub fn seal(&mut self, def: FuncDef) -> Stmt {
        self.funcs[def.id().index()].sealed = true;
        Stmt::FuncDef(def.id())
    }

    /// Get a function definition.
    #[inline]
    pub fn func(&self, id: FuncId) -> &FuncSlot {
        &self.funcs[id.index()]
    }

    /// Resolve a callee to the name it is printed and reported under.
    pub fn callee_name(&self, callee: Callee) -> &str {
        match callee {
            Callee::Native(id) => self.native(id).name(),
            Callee::Callable(id) => self.name(self.func(id).name()),
        }
    }

    // Helpers

    /// `var = add(var, 1)`.
    pub fn self_inc(&mut self, var: Var, add: NativeId) -> Stmt {
        let one = self.literal(1_i64);
        let sum = self.invoke(add, [var.expr(), one]);
        Stmt::assign(var, sum)
    }
}

impl From<NativeId> for Callee {
    fn from(id: NativeId) -> Self {
        Callee::Native(id)
    }
}

#[cfg(test)]
mod tests;
