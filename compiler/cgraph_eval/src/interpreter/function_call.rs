//! Invocation of native bindings and callables.

use smallvec::SmallVec;

use cgraph_ir::{Callee, FuncId, NativeId, Value};

use super::Interpreter;
use crate::environment::ScopeKind;
use crate::errors::{break_outside_loop, native_failed, unsealed_callable, EvalResult};
use crate::exec::call::{bind_parameters, check_arg_count, check_native_arity};
use crate::exec::control::Flow;

impl Interpreter<'_> {
    /// Invoke a callee with evaluated arguments.
    pub(super) fn invoke(&mut self, callee: Callee, args: SmallVec<[Value; 4]>) -> EvalResult {
        match callee {
            Callee::Native(id) => self.call_native(id, &args),
            Callee::Callable(id) => self.call_callable(id, args),
        }
    }

    fn call_native(&mut self, id: NativeId, args: &[Value]) -> EvalResult {
        let native = self.program.native(id);
        check_native_arity(native.name(), native.arity(), args.len())?;
        tracing::trace!(native = native.name(), argc = args.len(), "native call");
        native
            .call(args)
            .map_err(|source| native_failed(native.name(), source))
    }

    /// Push a frame, bind parameters, run the body, pop the frame.
    ///
    /// Falling off the end of the body yields `Value::Void`.
    #[tracing::instrument(
        level = "debug",
        skip(self, args),
        fields(depth = self.call_stack.depth())
    )]
    fn call_callable(&mut self, id: FuncId, args: SmallVec<[Value; 4]>) -> EvalResult {
        let program = self.program;
        let func = program.func(id);
        let name = program.name(func.name());
        if !func.is_sealed() {
            return Err(unsealed_callable(name));
        }
        check_arg_count(name, func.params(), args.len())?;
        tracing::debug!(callable = name, "invoke");

        self.call_stack.push(id);
        let result = self.with_env_scope(ScopeKind::Frame, |scoped| {
            bind_parameters(&mut scoped.env, func.params(), args.into_vec());
            scoped.exec_block(func.body())
        });
        let result = result
            .and_then(|flow| match flow {
                Flow::Return(value) => Ok(value),
                Flow::Normal => Ok(Value::Void),
                Flow::Break => Err(break_outside_loop()),
            })
            .map_err(|err| err.with_backtrace(self.call_stack.capture(program)));
        self.call_stack.pop();
        result
    }
}
