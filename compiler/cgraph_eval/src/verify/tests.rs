use super::*;
use crate::errors::EvalErrorKind;
use cgraph_ir::{Arity, Value};

fn noop(program: &mut Program, arity: Arity) -> cgraph_ir::NativeId {
    program.native_fn("noop", arity, |_| Ok(Value::Void))
}

fn kind(result: Result<(), EvalError>) -> Option<EvalErrorKind> {
    result.err().map(|e| e.kind)
}

#[test]
fn accepts_well_formed_loop() {
    let mut p = Program::new();
    let body = p.empty_block();
    p.append(body, Stmt::Break);
    let root = p.empty_block();
    let cond = p.literal(true);
    p.append(root, Stmt::while_loop(cond, body));
    assert!(verify(&p, root).is_ok());
}

#[test]
fn rejects_break_outside_loop() {
    let mut p = Program::new();
    let then_bb = p.empty_block();
    p.append(then_bb, Stmt::Break);
    let root = p.empty_block();
    let cond = p.literal(true);
    p.append(root, Stmt::if_then(cond, then_bb));
    assert_eq!(kind(verify(&p, root)), Some(EvalErrorKind::BreakOutsideLoop));
}

#[test]
fn rejects_top_level_return() {
    let mut p = Program::new();
    let root = p.empty_block();
    p.append(root, Stmt::Return(None));
    assert_eq!(
        kind(verify(&p, root)),
        Some(EvalErrorKind::ReturnOutsideCallable)
    );
}

#[test]
fn break_in_body_does_not_target_caller_loop() {
    let mut p = Program::new();
    let def = p.func_def("escape", &[]);
    def.append(&mut p, Stmt::Break);
    let callable = def.callable();
    let def_stmt = p.seal(def);

    let body = p.empty_block();
    let call = p.invoke(callable, []);
    p.append(body, Stmt::expr(call));
    let root = p.empty_block();
    p.append(root, def_stmt);
    let cond = p.literal(true);
    p.append(root, Stmt::while_loop(cond, body));
    assert_eq!(kind(verify(&p, root)), Some(EvalErrorKind::BreakOutsideLoop));
}

#[test]
fn rejects_native_arity_mismatch() {
    let mut p = Program::new();
    let f = noop(&mut p, Arity::Fixed(2));
    let one = p.literal(1_i64);
    let call = p.invoke(f, [one]);
    let root = p.empty_block();
    p.append(root, Stmt::expr(call));
    assert_eq!(
        kind(verify(&p, root)),
        Some(EvalErrorKind::ArityMismatch {
            callee: "noop".to_string(),
            expected: 2,
            got: 1,
        })
    );
}

#[test]
fn variadic_natives_accept_any_count() {
    let mut p = Program::new();
    let f = noop(&mut p, Arity::Variadic);
    let one = p.literal(1_i64);
    let call = p.invoke(f, [one, one, one]);
    let root = p.empty_block();
    p.append(root, Stmt::expr(call));
    assert!(verify(&p, root).is_ok());
}

#[test]
fn rejects_unsealed_callable() {
    let mut p = Program::new();
    let def = p.func_def("pending", &[]);
    let call = p.invoke(def.callable(), []);
    let root = p.empty_block();
    p.append(root, Stmt::expr(call));
    assert_eq!(
        kind(verify(&p, root)),
        Some(EvalErrorKind::UnsealedCallable {
            name: "pending".to_string()
        })
    );
}

#[test]
fn accepts_recursion() {
    let mut p = Program::new();
    let n = p.var("n");
    let def = p.func_def("rec", &[n]);
    let callable = def.callable();
    let inner = p.invoke(callable, [n.expr()]);
    def.append(&mut p, Stmt::ret(inner));
    let def_stmt = p.seal(def);

    let root = p.empty_block();
    p.append(root, def_stmt);
    assert!(verify(&p, root).is_ok());
}

#[test]
fn rejects_self_nested_block() {
    let mut p = Program::new();
    let root = p.empty_block();
    let cond = p.literal(false);
    p.append(root, Stmt::if_then(cond, root));
    assert_eq!(kind(verify(&p, root)), Some(EvalErrorKind::CyclicBlock));
}

#[test]
fn shared_leaf_block_is_not_a_cycle() {
    let mut p = Program::new();
    let leaf = p.empty_block();
    let root = p.empty_block();
    let cond = p.literal(false);
    p.append(root, Stmt::if_then(cond, leaf));
    p.append(root, Stmt::if_then(cond, leaf));
    assert!(verify(&p, root).is_ok());
}
