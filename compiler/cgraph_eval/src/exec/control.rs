//! Control-flow signals and condition truthiness.
//!
//! Executing a statement yields a [`Flow`]. A block stops at the first
//! non-normal signal and forwards it. `While` consumes `Break`, callable
//! invocation consumes `Return`, and the VM's top level rejects whatever is
//! left.

use cgraph_ir::Value;

use crate::errors::{type_mismatch, EvalError};

/// Outcome of executing a statement or block.
#[derive(Clone, Debug, PartialEq)]
pub enum Flow {
    /// Continue with the next statement.
    Normal,
    /// Leave the nearest enclosing loop.
    Break,
    /// Leave the nearest enclosing callable with a value.
    Return(Value),
}

impl Flow {
    /// Check if execution continues normally.
    #[inline]
    pub fn is_normal(&self) -> bool {
        matches!(self, Flow::Normal)
    }
}

/// What a loop does after one run of its body.
#[derive(Clone, Debug, PartialEq)]
pub enum LoopAction {
    /// Re-check the condition.
    Continue,
    /// Stop iterating; the loop completes normally.
    Break,
    /// Stop iterating and propagate the signal to the enclosing construct.
    Exit(Flow),
}

/// Map the body's signal to a loop transition.
#[inline]
pub fn to_loop_action(flow: Flow) -> LoopAction {
    match flow {
        Flow::Normal => LoopAction::Continue,
        Flow::Break => LoopAction::Break,
        ret @ Flow::Return(_) => LoopAction::Exit(ret),
    }
}

/// Condition truthiness, shared by `If` and `While`.
///
/// `false`, integer zero and float zero (either sign) are falsy; other
/// booleans and numbers are truthy. Void and buffers cannot be conditions.
pub fn is_truthy(value: &Value) -> Result<bool, EvalError> {
    match value {
        Value::Bool(b) => Ok(*b),
        Value::Int(n) => Ok(*n != 0),
        Value::Float(x) => Ok(*x != 0.0),
        Value::Void | Value::Buffer(_) => Err(type_mismatch("bool or number", value.type_name())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgraph_ir::Buffer;

    #[test]
    fn normal_body_continues_the_loop() {
        assert_eq!(to_loop_action(Flow::Normal), LoopAction::Continue);
    }

    #[test]
    fn break_stops_the_loop() {
        assert_eq!(to_loop_action(Flow::Break), LoopAction::Break);
    }

    #[test]
    fn return_escapes_the_loop() {
        assert_eq!(
            to_loop_action(Flow::Return(Value::Int(4))),
            LoopAction::Exit(Flow::Return(Value::Int(4)))
        );
    }

    #[test]
    fn truthiness() {
        assert_eq!(is_truthy(&Value::Bool(true)).ok(), Some(true));
        assert_eq!(is_truthy(&Value::Bool(false)).ok(), Some(false));
        assert_eq!(is_truthy(&Value::Int(0)).ok(), Some(false));
        assert_eq!(is_truthy(&Value::Int(-3)).ok(), Some(true));
        assert_eq!(is_truthy(&Value::Float(-0.0)).ok(), Some(false));
        assert_eq!(is_truthy(&Value::Float(1e-12)).ok(), Some(true));
    }

    #[test]
    fn void_and_buffers_are_not_conditions() {
        assert!(is_truthy(&Value::Void).is_err());
        let err = is_truthy(&Value::Buffer(Buffer::zeros(1))).err();
        assert_eq!(
            err.map(|e| e.to_string()),
            Some("type mismatch: expected bool or number, got buffer".to_string())
        );
    }
}
