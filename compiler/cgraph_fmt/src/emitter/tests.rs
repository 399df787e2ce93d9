use super::*;

#[test]
fn string_emitter_newline() {
    let mut emitter = StringEmitter::new();
    emitter.emit("Break");
    emitter.emit_newline();
    emitter.emit("Return");
    assert_eq!(emitter.as_str(), "Break\nReturn");
}

#[test]
fn string_emitter_indentation() {
    let mut emitter = StringEmitter::new();
    emitter.emit("BasicBlock");
    emitter.emit_newline();
    emitter.emit_indent(2);
    emitter.emit("While");
    emitter.emit_newline();
    emitter.emit_indent(4);
    emitter.emit("cond:");
    assert_eq!(emitter.as_str(), "BasicBlock\n  While\n    cond:");
}

#[test]
fn string_emitter_rewind() {
    let mut emitter = StringEmitter::new();
    emitter.emit("kept");
    let mark = emitter.mark();
    emitter.emit(" dropped");
    emitter.emit_newline();
    emitter.rewind(mark);
    assert_eq!(emitter.as_str(), "kept");
}
