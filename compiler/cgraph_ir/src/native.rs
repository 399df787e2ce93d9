//! Native bindings: opaque host operations the graph can invoke.
//!
//! A binding is a name, an arity and a host closure over evaluated argument
//! values. The IR threads values through it and never looks inside. The two
//! call shapes a staged solver needs are "write a computation into an output
//! buffer" (returns `Value::Void`) and "reduce buffers to a scalar".

use std::fmt;
use std::rc::Rc;

use crate::Value;

/// Failure reported by a host operation.
///
/// The interpreter does not interpret the message; it tags it with the
/// binding's name and hands it back to whoever started the execution.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct NativeError {
    message: String,
}

impl NativeError {
    /// Create an error with a message.
    pub fn new(message: impl Into<String>) -> Self {
        NativeError {
            message: message.into(),
        }
    }

    /// The host's message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Result of a host operation.
pub type NativeResult = Result<Value, NativeError>;

/// Host closure signature.
pub type NativeFn = dyn Fn(&[Value]) -> NativeResult;

/// Number of arguments a binding accepts.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Arity {
    /// Exactly this many arguments.
    Fixed(usize),
    /// Any number of arguments; the host checks them itself.
    Variadic,
}

impl Arity {
    /// Check whether `count` arguments satisfy this arity.
    #[inline]
    pub fn accepts(self, count: usize) -> bool {
        match self {
            Arity::Fixed(n) => n == count,
            Arity::Variadic => true,
        }
    }

    /// The fixed argument count, if any.
    pub fn fixed(self) -> Option<usize> {
        match self {
            Arity::Fixed(n) => Some(n),
            Arity::Variadic => None,
        }
    }
}

/// A registered host operation.
#[derive(Clone)]
pub struct NativeFunc {
    name: String,
    arity: Arity,
    op: Rc<NativeFn>,
}

impl NativeFunc {
    /// Wrap a host closure.
    pub fn new(
        name: impl Into<String>,
        arity: Arity,
        op: impl Fn(&[Value]) -> NativeResult + 'static,
    ) -> Self {
        NativeFunc {
            name: name.into(),
            arity,
            op: Rc::new(op),
        }
    }

    /// Binding name, used by the printer and in error messages.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared arity.
    pub fn arity(&self) -> Arity {
        self.arity
    }

    /// Run the host operation. Arity is checked by the caller.
    #[inline]
    pub fn call(&self, args: &[Value]) -> NativeResult {
        (self.op)(args)
    }
}

impl fmt::Debug for NativeFunc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeFunc")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arity_accepts() {
        assert!(Arity::Fixed(2).accepts(2));
        assert!(!Arity::Fixed(2).accepts(3));
        assert!(Arity::Variadic.accepts(0));
        assert_eq!(Arity::Variadic.fixed(), None);
    }

    #[test]
    fn call_threads_values_through() {
        let twice = NativeFunc::new("twice", Arity::Fixed(1), |args| match args {
            [Value::Int(n)] => Ok(Value::Int(n * 2)),
            _ => Err(NativeError::new("twice expects an int")),
        });
        assert_eq!(twice.call(&[Value::Int(21)]), Ok(Value::Int(42)));
        assert_eq!(
            twice.call(&[Value::Void]).map_err(|e| e.to_string()),
            Err("twice expects an int".to_string())
        );
    }
}
