use super::*;
use crate::Callable;
use pretty_assertions::assert_eq;

fn noop(program: &mut Program) -> NativeId {
    program.native_fn("noop", Arity::Variadic, |_| Ok(Value::Void))
}

#[test]
fn construction_allocates_children_first() {
    let mut p = Program::new();
    let add = noop(&mut p);
    let a = p.literal(1_i64);
    let x = p.var("x");
    let call = p.invoke(add, [a, x.expr()]);
    assert!(a < call);
    assert!(x.expr() < call);
    match p.expr(call) {
        ExprKind::Invoke { callee, args } => {
            assert_eq!(*callee, Callee::Native(add));
            assert_eq!(args.as_slice(), &[a, x.expr()]);
        }
        other => panic!("expected invocation, got {other:?}"),
    }
}

#[test]
fn vars_with_same_string_share_a_name() {
    let mut p = Program::new();
    let first = p.var("iter");
    let second = p.var("iter");
    assert_eq!(first.name(), second.name());
    assert_ne!(first.expr(), second.expr());
    assert_eq!(p.name(first.name()), "iter");
}

#[test]
fn blocks_keep_append_order() {
    let mut p = Program::new();
    let bb = p.empty_block();
    let x = p.var("x");
    let one = p.literal(1_i64);
    let two = p.literal(2_i64);
    p.append(bb, Stmt::assign(x, one));
    p.append(bb, Stmt::assign(x, two));
    p.append(bb, Stmt::Break);
    let tags: Vec<_> = p.block(bb).iter().map(Stmt::tag).collect();
    assert_eq!(tags, ["Assign", "Assign", "Break"]);
}

#[test]
fn callable_is_usable_before_sealing() {
    let mut p = Program::new();
    let n = p.var("n");
    let def = p.func_def("count", &[n]);
    let handle: Callable = def.callable();
    let recursive = p.invoke(handle, [n.expr()]);
    def.append(&mut p, Stmt::ret(recursive));
    assert!(!p.func(handle.id()).is_sealed());

    let stmt = p.seal(def);
    let slot = p.func(handle.id());
    assert!(slot.is_sealed());
    assert_eq!(slot.params(), &[n.name()]);
    assert_eq!(p.block(slot.body()).len(), 1);
    assert!(matches!(stmt, Stmt::FuncDef(id) if id == handle.id()));
    assert_eq!(p.callee_name(handle.into()), "count");
}

#[test]
#[should_panic(expected = "function bodies are appended through FuncDef")]
fn sealed_body_rejects_direct_append() {
    let mut p = Program::new();
    let def = p.func_def("done", &[]);
    let id = def.callable().id();
    p.seal(def);
    let body = p.func(id).body();
    p.append(body, Stmt::Break);
}

#[test]
fn self_inc_adds_one_to_the_variable() {
    let mut p = Program::new();
    let add = noop(&mut p);
    let iter = p.var("iter");
    let stmt = p.self_inc(iter, add);
    let Stmt::Assign { target, value } = stmt else {
        panic!("expected assignment");
    };
    assert_eq!(target, iter.name());
    let ExprKind::Invoke { args, .. } = p.expr(value) else {
        panic!("expected invocation");
    };
    assert!(matches!(p.expr(args[0]), ExprKind::Var(name) if *name == iter.name()));
    assert!(matches!(p.expr(args[1]), ExprKind::Literal(Value::Int(1))));
}
