//! Function definitions and callable handles.
//!
//! A definition is split in two so that a body can invoke its own function
//! before the body is finished:
//!
//! - [`FuncDef`] is the mutable builder. It owns the right to append to the
//!   body and is consumed by [`Program::seal`](crate::Program::seal).
//! - [`Callable`] is a copyable handle usable in invocations at any time.
//!   The VM resolves it when the invocation is evaluated and rejects
//!   definitions that were never sealed.

use crate::{BlockId, Callee, FuncId, Name, Program, Stmt};

/// Stored state of a function definition.
#[derive(Clone, Debug)]
pub struct FuncSlot {
    pub(crate) name: Name,
    pub(crate) params: Vec<Name>,
    pub(crate) body: BlockId,
    pub(crate) sealed: bool,
}

impl FuncSlot {
    /// Function name.
    pub fn name(&self) -> Name {
        self.name
    }

    /// Parameter names in positional order.
    pub fn params(&self) -> &[Name] {
        &self.params
    }

    /// Body block.
    pub fn body(&self) -> BlockId {
        self.body
    }

    /// Whether the body is complete.
    pub fn is_sealed(&self) -> bool {
        self.sealed
    }
}

/// Builder for a function body. Consumed by sealing.
#[derive(Debug)]
#[must_use = "a function definition must be sealed before it can run"]
pub struct FuncDef {
    id: FuncId,
    body: BlockId,
}

impl FuncDef {
    pub(crate) fn new(id: FuncId, body: BlockId) -> Self {
        FuncDef { id, body }
    }

    /// Handle for invoking this function, valid before and after sealing.
    pub fn callable(&self) -> Callable {
        Callable(self.id)
    }

    /// Id of the definition.
    pub fn id(&self) -> FuncId {
        self.id
    }

    /// Body block, for building nested control flow that needs its id.
    pub fn body(&self) -> BlockId {
        self.body
    }

    /// Append a statement to the body.
    pub fn append(&self, program: &mut Program, stmt: Stmt) {
        program.push_stmt(self.body, stmt);
    }
}

/// Immutable, late-bound handle to a function definition.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Callable(FuncId);

impl Callable {
    /// Id of the definition this handle resolves to.
    pub fn id(self) -> FuncId {
        self.0
    }
}

impl From<Callable> for Callee {
    fn from(callable: Callable) -> Self {
        Callee::Callable(callable.0)
    }
}
