//! Conjugate-gradient solver staged as a cgraph program.
//!
//! [`StagedCg`] builds the iteration once as a program graph over host
//! kernels ([`Kernels`]) and a host [`LinearOperator`], then replays it with
//! the `cgraph_eval` VM.

mod cg;
mod config;
mod errors;
mod kernels;
mod operator;
mod tracing_setup;

pub use cg::{CgReport, CgSystem, StagedCg};
pub use config::CgConfig;
pub use errors::SolverError;
pub use kernels::{axpy, copy, dot, matvec, Kernels};
pub use operator::{DenseMatrix, LinearOperator};
pub use tracing_setup::init_tracing;
