//! Environment for variable scoping in the interpreter.
//!
//! Uses a scope stack (not cloning) for efficient scope management.
//!
//! # Scoping rules
//!
//! - Lookup walks from the innermost scope outward through every enclosing
//!   scope, across call boundaries (resolution is dynamic).
//! - Assignment is declare-or-update. It updates a binding visible within the
//!   current frame, otherwise it declares the name in the innermost scope. A
//!   frame is the top-level scope or the scope of one callable invocation,
//!   together with any block scopes pushed inside it. A callee therefore
//!   never overwrites its caller's bindings: it shadows them.

use rustc_hash::FxHashMap;
use std::cell::RefCell;
use std::fmt;
use std::ops::Deref;
use std::rc::Rc;

use cgraph_ir::{Name, Value};

/// Role of a scope in the stack.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScopeKind {
    /// Top-level scope of one execution.
    Global,
    /// Scope of one callable invocation; parameters live here.
    Frame,
    /// Block scope inside a frame (loop body under per-iteration scoping).
    Block,
}

impl ScopeKind {
    /// Whether assignment stops searching at this scope.
    #[inline]
    fn is_frame_root(self) -> bool {
        matches!(self, ScopeKind::Global | ScopeKind::Frame)
    }
}

/// A single-threaded scope wrapper for reference-counted interior mutability.
///
/// Scopes link to their parent, so a child holds a clone of this handle.
///
/// # Thread Safety
/// `LocalScope<T>` is NOT thread-safe. It uses `Rc` internally; the
/// interpreter runs single-threaded.
#[repr(transparent)]
pub struct LocalScope<T>(Rc<RefCell<T>>);

impl<T> LocalScope<T> {
    /// Create a new `LocalScope` wrapping the given value.
    #[inline]
    pub fn new(value: T) -> Self {
        LocalScope(Rc::new(RefCell::new(value)))
    }
}

impl<T> Clone for LocalScope<T> {
    #[inline]
    fn clone(&self) -> Self {
        LocalScope(Rc::clone(&self.0))
    }
}

impl<T: fmt::Debug> fmt::Debug for LocalScope<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("LocalScope").field(&self.0).finish()
    }
}

impl<T> Deref for LocalScope<T> {
    type Target = RefCell<T>;

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// A single scope containing variable bindings.
#[derive(Clone, Debug)]
pub struct Scope {
    bindings: FxHashMap<Name, Value>,
    parent: Option<LocalScope<Scope>>,
    kind: ScopeKind,
}

impl Scope {
    /// Create a new empty scope with no parent.
    pub fn new(kind: ScopeKind) -> Self {
        Scope {
            bindings: FxHashMap::default(),
            parent: None,
            kind,
        }
    }

    /// Create a new scope with a parent.
    pub fn with_parent(parent: LocalScope<Scope>, kind: ScopeKind) -> Self {
        Scope {
            bindings: FxHashMap::default(),
            parent: Some(parent),
            kind,
        }
    }

    /// Role of this scope.
    pub fn kind(&self) -> ScopeKind {
        self.kind
    }

    /// Define (or redefine) a variable in this scope.
    #[inline]
    pub fn define(&mut self, name: Name, value: Value) {
        self.bindings.insert(name, value);
    }

    /// Look up a variable here or in any enclosing scope.
    #[inline]
    pub fn lookup(&self, name: Name) -> Option<Value> {
        if let Some(value) = self.bindings.get(&name) {
            return Some(value.clone());
        }
        if let Some(parent) = &self.parent {
            return parent.borrow().lookup(name);
        }
        None
    }

    /// Update an existing binding within the current frame.
    ///
    /// Hands the value back, leaving every scope untouched, when the name is
    /// not bound between this scope and the nearest frame root.
    pub fn update(&mut self, name: Name, value: Value) -> Result<(), Value> {
        if let Some(slot) = self.bindings.get_mut(&name) {
            *slot = value;
            return Ok(());
        }
        if self.kind.is_frame_root() {
            return Err(value);
        }
        match &self.parent {
            Some(parent) => parent.borrow_mut().update(name, value),
            None => Err(value),
        }
    }

    /// Bindings held directly by this scope.
    pub fn bindings(&self) -> impl Iterator<Item = (Name, &Value)> {
        self.bindings.iter().map(|(name, value)| (*name, value))
    }
}

/// Environment for the interpreter using a scope stack.
///
/// Instead of cloning environments, we maintain a stack of scopes
/// that can be pushed and popped efficiently.
pub struct Environment {
    /// Stack of scopes, with current scope at the top.
    scopes: Vec<LocalScope<Scope>>,
    /// Global scope (always at the bottom).
    global: LocalScope<Scope>,
}

impl Environment {
    /// Create a new environment with an empty global scope.
    pub fn new() -> Self {
        let global = LocalScope::new(Scope::new(ScopeKind::Global));
        Environment {
            scopes: vec![global.clone()],
            global,
        }
    }

    /// Get the current scope depth.
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    /// Push a new scope onto the stack.
    #[inline]
    pub fn push_scope(&mut self, kind: ScopeKind) {
        let parent = self.current_scope().clone();
        let new_scope = LocalScope::new(Scope::with_parent(parent, kind));
        self.scopes.push(new_scope);
    }

    /// Pop the current scope from the stack. The global scope is never popped.
    #[inline]
    pub fn pop_scope(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }

    #[inline]
    fn current_scope(&self) -> &LocalScope<Scope> {
        self.scopes.last().unwrap_or(&self.global)
    }

    /// Define a variable in the current scope.
    #[inline]
    pub fn define(&mut self, name: Name, value: Value) {
        self.current_scope().borrow_mut().define(name, value);
    }

    /// Look up a variable by name.
    #[inline]
    pub fn lookup(&self, name: Name) -> Option<Value> {
        self.current_scope().borrow().lookup(name)
    }

    /// Declare-or-update: update the binding visible in the current frame,
    /// or define it in the current scope.
    #[inline]
    pub fn assign(&mut self, name: Name, value: Value) {
        let mut scope = self.current_scope().borrow_mut();
        if let Err(value) = scope.update(name, value) {
            scope.define(name, value);
        }
    }

    /// Snapshot of the global scope's bindings.
    pub fn globals(&self) -> FxHashMap<Name, Value> {
        self.global
            .borrow()
            .bindings()
            .map(|(name, value)| (name, value.clone()))
            .collect()
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests;
