//! RAII-style scope guards for Interpreter environment management.
//!
//! The guard ensures `pop_scope()` runs when it is dropped, so a scope pushed
//! for a callable frame or a loop iteration is popped on every exit path:
//! normal completion, `Break`, `Return`, an error, or unwinding.
//!
//! The guard holds `&mut Interpreter` and implements `Deref`/`DerefMut`,
//! allowing transparent access to all interpreter methods.

use std::ops::{Deref, DerefMut};

use super::Interpreter;
use crate::environment::ScopeKind;

/// RAII guard that pops the environment scope it pushed.
pub struct ScopedInterpreter<'guard, 'p> {
    interpreter: &'guard mut Interpreter<'p>,
}

impl Drop for ScopedInterpreter<'_, '_> {
    fn drop(&mut self) {
        self.interpreter.env.pop_scope();
    }
}

impl<'p> Deref for ScopedInterpreter<'_, 'p> {
    type Target = Interpreter<'p>;

    fn deref(&self) -> &Self::Target {
        self.interpreter
    }
}

impl DerefMut for ScopedInterpreter<'_, '_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.interpreter
    }
}

impl<'p> Interpreter<'p> {
    /// Push a scope and return a guard that pops it on drop.
    pub fn scoped(&mut self, kind: ScopeKind) -> ScopedInterpreter<'_, 'p> {
        self.env.push_scope(kind);
        ScopedInterpreter { interpreter: self }
    }

    /// Run `f` inside a new scope of the given kind.
    pub fn with_env_scope<T, F>(&mut self, kind: ScopeKind, f: F) -> T
    where
        F: FnOnce(&mut ScopedInterpreter<'_, 'p>) -> T,
    {
        let mut scoped = self.scoped(kind);
        f(&mut scoped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vm::LoopScope;
    use cgraph_ir::Program;

    #[test]
    fn scope_is_popped_after_closure() {
        let program = Program::new();
        let mut interpreter = Interpreter::new(&program, LoopScope::Shared);
        assert_eq!(interpreter.env.depth(), 1);
        let depth_inside = interpreter.with_env_scope(ScopeKind::Frame, |s| s.env.depth());
        assert_eq!(depth_inside, 2);
        assert_eq!(interpreter.env.depth(), 1);
    }

    #[test]
    fn scope_is_popped_on_error() {
        let program = Program::new();
        let mut interpreter = Interpreter::new(&program, LoopScope::Shared);
        let result: Result<(), &str> =
            interpreter.with_env_scope(ScopeKind::Block, |_| Err("early exit"));
        assert!(result.is_err());
        assert_eq!(interpreter.env.depth(), 1);
    }
}
