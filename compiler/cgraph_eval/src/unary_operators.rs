//! Unary operator implementation for the `Neg` node.

use cgraph_ir::Value;

use crate::errors::{integer_overflow, type_mismatch, EvalResult};

/// Negate a scalar.
///
/// Integers use checked negation (`-i64::MIN` is an overflow error); floats
/// follow IEEE negation. Other values cannot be negated.
pub fn evaluate_neg(operand: &Value) -> EvalResult {
    match operand {
        Value::Int(n) => n
            .checked_neg()
            .map(Value::Int)
            .ok_or_else(|| integer_overflow("negation")),
        Value::Float(x) => Ok(Value::Float(-x)),
        Value::Void | Value::Bool(_) | Value::Buffer(_) => {
            Err(type_mismatch("number", operand.type_name()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negates_scalars() {
        assert_eq!(evaluate_neg(&Value::Int(3)).ok(), Some(Value::Int(-3)));
        assert_eq!(evaluate_neg(&Value::Float(0.25)).ok(), Some(Value::Float(-0.25)));
    }

    #[test]
    fn min_int_overflows() {
        let err = evaluate_neg(&Value::Int(i64::MIN)).err();
        assert_eq!(
            err.map(|e| e.to_string()),
            Some("integer overflow in negation".to_string())
        );
    }

    #[test]
    fn rejects_non_numbers() {
        assert!(evaluate_neg(&Value::Bool(true)).is_err());
        assert!(evaluate_neg(&Value::Void).is_err());
    }
}
