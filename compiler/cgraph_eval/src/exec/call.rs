//! Argument checking and parameter binding for invocations.

use cgraph_ir::{Arity, Name, Value};

use crate::environment::Environment;
use crate::errors::{arity_mismatch, EvalError};

/// Check an argument count against a native binding's arity.
#[inline]
pub fn check_native_arity(callee: &str, arity: Arity, got: usize) -> Result<(), EvalError> {
    match arity {
        Arity::Fixed(expected) if expected != got => Err(arity_mismatch(callee, expected, got)),
        _ => Ok(()),
    }
}

/// Check an argument count against a callable's parameter list.
#[inline]
pub fn check_arg_count(callee: &str, params: &[Name], got: usize) -> Result<(), EvalError> {
    if params.len() == got {
        Ok(())
    } else {
        Err(arity_mismatch(callee, params.len(), got))
    }
}

/// Bind evaluated arguments to parameters, positionally, in the current scope.
///
/// The caller has already checked the count.
pub fn bind_parameters(env: &mut Environment, params: &[Name], args: Vec<Value>) {
    for (param, arg) in params.iter().zip(args) {
        env.define(*param, arg);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgraph_ir::StringInterner;

    #[test]
    fn fixed_arity_must_match() {
        assert!(check_native_arity("dot", Arity::Fixed(2), 2).is_ok());
        assert!(check_native_arity("dot", Arity::Fixed(2), 1).is_err());
        assert!(check_native_arity("log", Arity::Variadic, 5).is_ok());
    }

    #[test]
    fn params_bind_positionally() {
        let mut interner = StringInterner::new();
        let a = interner.intern("a");
        let b = interner.intern("b");
        let params = [a, b];
        assert!(check_arg_count("f", &params, 3).is_err());

        let mut env = Environment::new();
        bind_parameters(&mut env, &params, vec![Value::Int(1), Value::Int(2)]);
        assert_eq!(env.lookup(a), Some(Value::Int(1)));
        assert_eq!(env.lookup(b), Some(Value::Int(2)));
    }
}
