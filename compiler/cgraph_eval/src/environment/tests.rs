use super::*;
use cgraph_ir::StringInterner;

#[test]
fn test_scope_define_lookup() {
    let mut interner = StringInterner::new();
    let x = interner.intern("x");

    let mut scope = Scope::new(ScopeKind::Global);
    scope.define(x, Value::Int(42));
    assert_eq!(scope.lookup(x), Some(Value::Int(42)));
}

#[test]
fn test_scope_shadowing() {
    let mut interner = StringInterner::new();
    let x = interner.intern("x");

    let parent = LocalScope::new(Scope::new(ScopeKind::Global));
    parent.borrow_mut().define(x, Value::Int(1));

    let mut child = Scope::with_parent(parent.clone(), ScopeKind::Frame);
    child.define(x, Value::Int(2));

    // Child's binding shadows parent's
    assert_eq!(child.lookup(x), Some(Value::Int(2)));
    assert_eq!(parent.borrow().lookup(x), Some(Value::Int(1)));
}

#[test]
fn test_environment_push_pop() {
    let mut interner = StringInterner::new();
    let x = interner.intern("x");

    let mut env = Environment::new();
    env.define(x, Value::Int(1));

    env.push_scope(ScopeKind::Frame);
    env.define(x, Value::Int(2));
    assert_eq!(env.lookup(x), Some(Value::Int(2)));
    assert_eq!(env.depth(), 2);

    env.pop_scope();
    assert_eq!(env.lookup(x), Some(Value::Int(1)));
}

#[test]
fn test_global_scope_is_never_popped() {
    let mut interner = StringInterner::new();
    let x = interner.intern("x");

    let mut env = Environment::new();
    env.assign(x, Value::Int(1));
    env.pop_scope();
    assert_eq!(env.depth(), 1);
    assert_eq!(env.lookup(x), Some(Value::Int(1)));
}

#[test]
fn test_assign_declares_when_unbound() {
    let mut interner = StringInterner::new();
    let x = interner.intern("x");

    let mut env = Environment::new();
    assert_eq!(env.lookup(x), None);
    env.assign(x, Value::Int(7));
    assert_eq!(env.lookup(x), Some(Value::Int(7)));
}

#[test]
fn test_lookup_crosses_frames() {
    let mut interner = StringInterner::new();
    let d = interner.intern("d");

    let mut env = Environment::new();
    env.assign(d, Value::Float(0.5));
    env.push_scope(ScopeKind::Frame);
    assert_eq!(env.lookup(d), Some(Value::Float(0.5)));
}

#[test]
fn test_assign_in_frame_shadows_caller() {
    let mut interner = StringInterner::new();
    let x = interner.intern("x");

    let mut env = Environment::new();
    env.assign(x, Value::Int(1));

    env.push_scope(ScopeKind::Frame);
    env.assign(x, Value::Int(99));
    assert_eq!(env.lookup(x), Some(Value::Int(99)));
    env.pop_scope();

    assert_eq!(env.lookup(x), Some(Value::Int(1)));
}

#[test]
fn test_assign_in_block_updates_enclosing_frame() {
    let mut interner = StringInterner::new();
    let sum = interner.intern("sum");
    let tmp = interner.intern("tmp");

    let mut env = Environment::new();
    env.assign(sum, Value::Int(0));

    env.push_scope(ScopeKind::Block);
    env.assign(sum, Value::Int(10));
    env.assign(tmp, Value::Int(3));
    env.pop_scope();

    assert_eq!(env.lookup(sum), Some(Value::Int(10)));
    assert_eq!(env.lookup(tmp), None);
}

#[test]
fn test_globals_snapshot() {
    let mut interner = StringInterner::new();
    let a = interner.intern("a");
    let b = interner.intern("b");

    let mut env = Environment::new();
    env.assign(a, Value::Int(1));
    env.push_scope(ScopeKind::Frame);
    env.assign(b, Value::Int(2));

    let globals = env.globals();
    assert_eq!(globals.len(), 1);
    assert_eq!(globals.get(&a), Some(&Value::Int(1)));
}
