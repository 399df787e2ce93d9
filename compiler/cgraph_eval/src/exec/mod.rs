//! Expression and statement evaluation helpers.
//!
//! The interpreter owns the traversal; these modules hold the pieces of
//! evaluation that do not need the interpreter itself: control-flow signals,
//! truthiness and argument binding.

pub mod call;
pub mod control;
