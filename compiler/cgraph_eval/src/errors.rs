//! Evaluation errors.
//!
//! Every failure aborts the current execution; there is no partial-result
//! recovery and nothing is retried. Errors fall into three groups:
//!
//! - structural: misplaced `Break`/`Return`, arity mismatch, unsealed
//!   callable, unresolved variable, cyclic block nesting
//! - value: a condition or operand of the wrong kind
//! - native: a host operation failed; its error is carried unchanged
//!
//! Factory functions are the public way to build errors, so messages live in
//! one place.

use std::fmt;

use cgraph_ir::NativeError;

/// Result of evaluating an expression.
pub type EvalResult = Result<cgraph_ir::Value, EvalError>;

/// Typed error category.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EvalErrorKind {
    // Structural
    #[error("undefined variable: {name}")]
    UndefinedVariable { name: String },
    #[error("`{callee}` expects {expected} argument(s), got {got}")]
    ArityMismatch {
        callee: String,
        expected: usize,
        got: usize,
    },
    #[error("break outside of a loop")]
    BreakOutsideLoop,
    #[error("return outside of a callable")]
    ReturnOutsideCallable,
    #[error("callable `{name}` invoked before its definition was sealed")]
    UnsealedCallable { name: String },
    #[error("block is nested inside itself")]
    CyclicBlock,

    // Value
    #[error("type mismatch: expected {expected}, got {got}")]
    TypeMismatch { expected: &'static str, got: &'static str },
    #[error("integer overflow in {operation}")]
    IntegerOverflow { operation: &'static str },

    // Native
    #[error("native `{name}` failed: {source}")]
    Native {
        name: String,
        #[source]
        source: NativeError,
    },
}

impl EvalErrorKind {
    /// Whether this error describes a malformed graph rather than a runtime
    /// condition.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            EvalErrorKind::UndefinedVariable { .. }
                | EvalErrorKind::ArityMismatch { .. }
                | EvalErrorKind::BreakOutsideLoop
                | EvalErrorKind::ReturnOutsideCallable
                | EvalErrorKind::UnsealedCallable { .. }
                | EvalErrorKind::CyclicBlock
        )
    }
}

/// Snapshot of the callable invocations active when an error occurred,
/// outermost first.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EvalBacktrace {
    frames: Vec<String>,
}

impl EvalBacktrace {
    /// Create a backtrace from frame names.
    pub fn new(frames: Vec<String>) -> Self {
        Self { frames }
    }

    /// Frame names, outermost first.
    pub fn frames(&self) -> &[String] {
        &self.frames
    }

    /// Check if the backtrace is empty.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

impl fmt::Display for EvalBacktrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.frames.is_empty() {
            return Ok(());
        }
        writeln!(f, "call stack:")?;
        for (i, frame) in self.frames.iter().enumerate() {
            writeln!(f, "  {i}: {frame}")?;
        }
        Ok(())
    }
}

/// Evaluation error.
#[derive(Clone, Debug, thiserror::Error)]
#[error("{kind}")]
pub struct EvalError {
    /// Structured error category.
    pub kind: EvalErrorKind,
    /// Callable invocations active at the error site.
    pub trace: EvalBacktrace,
}

impl EvalError {
    fn from_kind(kind: EvalErrorKind) -> Self {
        EvalError {
            kind,
            trace: EvalBacktrace::default(),
        }
    }

    /// Attach a backtrace unless one is already present.
    ///
    /// The innermost capture wins: it sees the deepest call stack.
    #[must_use]
    pub fn with_backtrace(mut self, backtrace: EvalBacktrace) -> Self {
        if self.trace.is_empty() {
            self.trace = backtrace;
        }
        self
    }

    /// The host error, if a native binding failed.
    pub fn native_error(&self) -> Option<&NativeError> {
        match &self.kind {
            EvalErrorKind::Native { source, .. } => Some(source),
            _ => None,
        }
    }
}

// Structural Errors

/// Variable not bound in any visible scope.
#[cold]
pub fn undefined_variable(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::UndefinedVariable {
        name: name.to_string(),
    })
}

/// Wrong number of arguments for a native binding or callable.
#[cold]
pub fn arity_mismatch(callee: &str, expected: usize, got: usize) -> EvalError {
    EvalError::from_kind(EvalErrorKind::ArityMismatch {
        callee: callee.to_string(),
        expected,
        got,
    })
}

/// `Break` with no enclosing loop.
#[cold]
pub fn break_outside_loop() -> EvalError {
    EvalError::from_kind(EvalErrorKind::BreakOutsideLoop)
}

/// `Return` with no enclosing callable.
#[cold]
pub fn return_outside_callable() -> EvalError {
    EvalError::from_kind(EvalErrorKind::ReturnOutsideCallable)
}

/// Invocation of a callable whose definition was never sealed.
#[cold]
pub fn unsealed_callable(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::UnsealedCallable {
        name: name.to_string(),
    })
}

/// A block reachable from itself through nested control flow.
#[cold]
pub fn cyclic_block() -> EvalError {
    EvalError::from_kind(EvalErrorKind::CyclicBlock)
}

// Value Errors

/// Operand or condition of the wrong kind.
#[cold]
pub fn type_mismatch(expected: &'static str, got: &'static str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::TypeMismatch { expected, got })
}

/// Integer result out of range.
#[cold]
pub fn integer_overflow(operation: &'static str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::IntegerOverflow { operation })
}

// Native Errors

/// A host operation reported a failure.
#[cold]
pub fn native_failed(name: &str, source: NativeError) -> EvalError {
    EvalError::from_kind(EvalErrorKind::Native {
        name: name.to_string(),
        source,
    })
}
