//! cgraph IR - program graph for staged numeric iteration.
//!
//! An iterative numeric algorithm is described once as data and replayed by
//! an interpreter, instead of being run as ordinary code. This crate holds
//! the description: node kinds, the arena they live in, native bindings and
//! function definitions.
//!
//! # Architecture
//!
//! - [`Program`]: arena of expressions, blocks, function definitions and
//!   native bindings, plus the builder methods that create them
//! - [`ExprKind`] / [`Stmt`]: tagged node kinds
//! - [`NativeFunc`]: opaque host operation callable from the graph
//! - [`FuncDef`] / [`Callable`]: mutable definition and late-bound handle
//! - [`Visitor`]: read-only traversal shared by the verifier and printer
//!
//! Execution lives in `cgraph_eval`, printing in `cgraph_fmt`.

mod func;
mod ids;
mod name;
mod native;
mod node;
mod program;
mod value;
pub mod visitor;

pub use func::{Callable, FuncDef, FuncSlot};
pub use ids::{BlockId, ExprId, FuncId, NativeId};
pub use name::{Name, StringInterner};
pub use native::{Arity, NativeError, NativeFn, NativeFunc, NativeResult};
pub use node::{Args, Callee, ExprKind, Stmt, Var};
pub use program::Program;
pub use value::{Buffer, Value};
pub use visitor::{walk_block, walk_expr, walk_func, walk_stmt, Visitor};
