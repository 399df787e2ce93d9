//! Conjugate-gradient solve staged as a program graph.
//!
//! The graph is built once per system and configuration, then replayed by
//! the VM on every [`StagedCg::run`]. Host kernels do the vector work; the
//! graph only sequences them and carries the scalar recurrences (`alpha`,
//! `beta`, the squared residual norms) between iterations.
//!
//! Staged program, with `r0`, `p0`, `mul_ans` solver-owned buffers and
//! `b`, `v`, `x` the caller's right-hand side, unknown and position:
//!
//! ```text
//! def mul(x) { matvec(mul_ans, x); return mul_ans }
//! axpy(r0, b, -1, mul(v))
//! copy(p0, r0); d = p0
//! r_2 = dot(r0, r0); r_2_init = r_2; r_2_new = r_2; iter = 0
//! if r_2_init > 0 {
//!     while iter < max_iters {
//!         iter = iter + 1
//!         q = mul(d)
//!         alpha = r_2_new / dot(d, q)
//!         axpy(v, v, alpha, d)
//!         axpy(r0, r0, -alpha, q)
//!         r_2 = r_2_new
//!         r_2_new = dot(r0, r0)
//!         if r_2_new <= r_2_init * eps^2 { break }
//!         beta = r_2_new / r_2
//!         axpy(d, r0, beta, d)
//!     }
//! }
//! axpy(x, x, dt, v)    // only with a time step
//! ```

use std::rc::Rc;

use cgraph_eval::{Bindings, Operators, Vm};
use cgraph_fmt::print_block;
use cgraph_ir::{BlockId, Buffer, Callable, Program, Stmt, Value, Var};

use crate::config::CgConfig;
use crate::errors::SolverError;
use crate::kernels::Kernels;
use crate::operator::LinearOperator;

/// The linear system `A v = b`, plus an optional position advanced by
/// `x += dt * v` after the solve.
pub struct CgSystem {
    /// The operator `A`.
    pub operator: Rc<dyn LinearOperator>,
    /// Right-hand side `b`.
    pub rhs: Buffer,
    /// Unknown `v`; its contents are the initial guess and are updated in
    /// place.
    pub solution: Buffer,
    /// Position `x`, required when the configuration has a time step.
    pub position: Option<Buffer>,
}

/// Outcome of one run.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CgReport {
    /// Iterations performed.
    pub iterations: u32,
    /// Squared residual norm at exit.
    pub residual_sq: f64,
    /// Whether the tolerance was reached.
    pub converged: bool,
}

/// A staged conjugate-gradient solve.
pub struct StagedCg {
    program: Program,
    root: BlockId,
    vm: Vm,
    solution: Buffer,
    epsilon: f64,
}

/// Variables of the staged program.
struct Vars {
    d: Var,
    q: Var,
    r_2: Var,
    r_2_init: Var,
    r_2_new: Var,
    alpha: Var,
    beta: Var,
    iter: Var,
}

impl Vars {
    fn new(program: &mut Program) -> Self {
        Vars {
            d: program.var("d"),
            q: program.var("q"),
            r_2: program.var("r_2"),
            r_2_init: program.var("r_2_init"),
            r_2_new: program.var("r_2_new"),
            alpha: program.var("alpha"),
            beta: program.var("beta"),
            iter: program.var("iter"),
        }
    }
}

/// Buffers referenced by literal nodes.
struct Buffers {
    rhs: Buffer,
    solution: Buffer,
    residual: Buffer,
    direction: Buffer,
    mul_ans: Buffer,
}

impl StagedCg {
    /// Stage the solve for `system` under `config`.
    ///
    /// Buffer lengths are checked against the operator here; the graph is
    /// not executed.
    #[tracing::instrument(level = "debug", skip(system), fields(dim = system.operator.dim()))]
    pub fn new(system: CgSystem, config: CgConfig) -> Result<Self, SolverError> {
        let dim = system.operator.dim();
        check_len("rhs", dim, &system.rhs)?;
        check_len("solution", dim, &system.solution)?;
        let position = match (config.dt, system.position) {
            (Some(dt), Some(x)) => {
                check_len("position", dim, &x)?;
                Some((dt, x))
            }
            (Some(_), None) => return Err(SolverError::MissingPosition),
            (None, _) => None,
        };

        let mut program = Program::new();
        let ops = Operators::register(&mut program);
        let kernels = Kernels::register(&mut program, system.operator);
        let vars = Vars::new(&mut program);
        let buffers = Buffers {
            rhs: system.rhs,
            solution: system.solution.clone(),
            residual: Buffer::zeros(dim),
            direction: Buffer::zeros(dim),
            mul_ans: Buffer::zeros(dim),
        };

        let mut stager = Stager {
            program: &mut program,
            ops,
            kernels,
            vars,
            buffers,
        };
        let root = stager.stage(&config, position);
        tracing::debug!(
            exprs = program.expr_count(),
            blocks = program.block_count(),
            "staged conjugate gradient"
        );

        Ok(StagedCg {
            program,
            root,
            vm: Vm::new(),
            solution: system.solution,
            epsilon: config.epsilon,
        })
    }

    /// Execute the staged solve once.
    ///
    /// Each run starts from the current contents of the solution buffer.
    pub fn run(&self) -> Result<CgReport, SolverError> {
        let bindings = self.vm.exec(&self.program, self.root)?;
        let report = report(&bindings, self.epsilon)?;
        tracing::debug!(
            iterations = report.iterations,
            residual_sq = report.residual_sq,
            converged = report.converged,
            "conjugate gradient finished"
        );
        Ok(report)
    }

    /// Print the staged program.
    pub fn dump(&self) -> Result<String, SolverError> {
        Ok(print_block(&self.program, self.root)?)
    }

    /// The solution buffer, updated in place by [`StagedCg::run`].
    pub fn solution(&self) -> &Buffer {
        &self.solution
    }

    /// The staged program.
    pub fn program(&self) -> &Program {
        &self.program
    }

    /// Root block of the staged program.
    pub fn root(&self) -> BlockId {
        self.root
    }
}

fn check_len(buffer: &'static str, expected: usize, got: &Buffer) -> Result<(), SolverError> {
    if got.len() == expected {
        Ok(())
    } else {
        Err(SolverError::DimensionMismatch {
            buffer,
            expected,
            got: got.len(),
        })
    }
}

fn report(bindings: &Bindings, epsilon: f64) -> Result<CgReport, SolverError> {
    let iterations = bindings
        .get("iter")
        .and_then(Value::as_int)
        .and_then(|n| u32::try_from(n).ok())
        .ok_or(SolverError::MissingResult { name: "iter" })?;
    let residual_sq = float(bindings, "r_2_new")?;
    let initial_sq = float(bindings, "r_2_init")?;
    Ok(CgReport {
        iterations,
        residual_sq,
        converged: residual_sq <= initial_sq * epsilon * epsilon,
    })
}

fn float(bindings: &Bindings, name: &'static str) -> Result<f64, SolverError> {
    bindings
        .get(name)
        .and_then(Value::as_f64)
        .ok_or(SolverError::MissingResult { name })
}

/// Builds the staged program into a borrowed arena.
struct Stager<'a> {
    program: &'a mut Program,
    ops: Operators,
    kernels: Kernels,
    vars: Vars,
    buffers: Buffers,
}

impl Stager<'_> {
    fn stage(&mut self, config: &CgConfig, position: Option<(f64, Buffer)>) -> BlockId {
        let root = self.program.empty_block();
        let (mul, mul_def) = self.stage_mul();
        self.program.append(root, mul_def);
        self.stage_setup(root, mul);

        let r_2_init = self.vars.r_2_init;
        let zero = self.program.literal(0.0);
        let nonzero = self.program.invoke(self.ops.gt, [r_2_init.expr(), zero]);
        let guarded = self.program.empty_block();
        let iterate = self.stage_loop(config, mul);
        self.program.append(guarded, iterate);
        self.program.append(root, Stmt::if_then(nonzero, guarded));

        if let Some((dt, x)) = position {
            let x = self.program.literal(x);
            let dt = self.program.literal(dt);
            let v = self.program.literal(self.buffers.solution.clone());
            let advance = self.program.invoke(self.kernels.axpy, [x, x, dt, v]);
            self.program.append(root, Stmt::expr(advance));
        }
        root
    }

    /// `def mul(x) { matvec(mul_ans, x); return mul_ans }`.
    fn stage_mul(&mut self) -> (Callable, Stmt) {
        let x = self.program.var("x");
        let def = self.program.func_def("mul", &[x]);
        let mul_ans = self.program.literal(self.buffers.mul_ans.clone());
        let apply = self.program.invoke(self.kernels.matvec, [mul_ans, x.expr()]);
        def.append(self.program, Stmt::expr(apply));
        def.append(self.program, Stmt::ret(mul_ans));
        let callable = def.callable();
        (callable, self.program.seal(def))
    }

    /// Initial residual, direction and norms.
    fn stage_setup(&mut self, root: BlockId, mul: Callable) {
        let Vars {
            d,
            r_2,
            r_2_init,
            r_2_new,
            iter,
            ..
        } = self.vars;
        let r0 = self.program.literal(self.buffers.residual.clone());
        let b = self.program.literal(self.buffers.rhs.clone());
        let v = self.program.literal(self.buffers.solution.clone());
        let p0 = self.program.literal(self.buffers.direction.clone());
        let minus_one = self.program.literal(-1.0);

        let av = self.program.invoke(mul, [v]);
        let residual = self.program.invoke(self.kernels.axpy, [r0, b, minus_one, av]);
        self.program.append(root, Stmt::expr(residual));
        let copy = self.program.invoke(self.kernels.copy, [p0, r0]);
        self.program.append(root, Stmt::expr(copy));
        self.program.append(root, Stmt::assign(d, p0));

        let norm = self.program.invoke(self.kernels.dot, [r0, r0]);
        self.program.append(root, Stmt::assign(r_2, norm));
        self.program.append(root, Stmt::assign(r_2_init, r_2));
        self.program.append(root, Stmt::assign(r_2_new, r_2));
        let zero = self.program.literal(0_i64);
        self.program.append(root, Stmt::assign(iter, zero));
    }

    /// The iteration loop.
    fn stage_loop(&mut self, config: &CgConfig, mul: Callable) -> Stmt {
        let Vars {
            d,
            q,
            r_2,
            r_2_init,
            r_2_new,
            alpha,
            beta,
            iter,
        } = self.vars;
        let (ops, kernels) = (self.ops, self.kernels);
        let p = &mut *self.program;
        let r0 = p.literal(self.buffers.residual.clone());
        let v = p.literal(self.buffers.solution.clone());

        let body = p.empty_block();
        let inc = p.self_inc(iter, ops.add);
        p.append(body, inc);

        let dq = p.invoke(mul, [d.expr()]);
        p.append(body, Stmt::assign(q, dq));

        let curvature = p.invoke(kernels.dot, [d.expr(), q.expr()]);
        let step = p.invoke(ops.div, [r_2_new.expr(), curvature]);
        p.append(body, Stmt::assign(alpha, step));

        let update_v = p.invoke(kernels.axpy, [v, v, alpha.expr(), d.expr()]);
        p.append(body, Stmt::expr(update_v));
        let neg_alpha = p.neg(alpha);
        let update_r = p.invoke(kernels.axpy, [r0, r0, neg_alpha, q.expr()]);
        p.append(body, Stmt::expr(update_r));

        p.append(body, Stmt::assign(r_2, r_2_new));
        let norm = p.invoke(kernels.dot, [r0, r0]);
        p.append(body, Stmt::assign(r_2_new, norm));

        let eps2 = p.literal(config.epsilon * config.epsilon);
        let threshold = p.invoke(ops.mul, [r_2_init.expr(), eps2]);
        let converged = p.invoke(ops.le, [r_2_new.expr(), threshold]);
        let stop = p.empty_block();
        p.append(stop, Stmt::Break);
        p.append(body, Stmt::if_then(converged, stop));

        let ratio = p.invoke(ops.div, [r_2_new.expr(), r_2.expr()]);
        p.append(body, Stmt::assign(beta, ratio));
        let update_d = p.invoke(kernels.axpy, [d.expr(), r0, beta.expr(), d.expr()]);
        p.append(body, Stmt::expr(update_d));

        let max_iters = p.literal(i64::from(config.max_iters));
        let cond = p.invoke(ops.lt, [iter.expr(), max_iters]);
        Stmt::while_loop(cond, body)
    }
}
