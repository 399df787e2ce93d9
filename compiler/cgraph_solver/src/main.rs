//! Staged conjugate-gradient demo.
//!
//! Solves a small tridiagonal SPD system and prints the staged program,
//! the solution and the residual.

use std::process::ExitCode;
use std::rc::Rc;

use cgraph_ir::Buffer;
use cgraph_solver::{init_tracing, CgConfig, CgSystem, DenseMatrix, StagedCg};

fn main() -> ExitCode {
    init_tracing();

    let args: Vec<String> = std::env::args().collect();
    let mut config = CgConfig::new();
    let mut dim = 8;
    let mut dump = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--dump" => dump = true,
            flag @ ("--dim" | "--max-iters" | "--epsilon") => {
                let Some(value) = args.get(i + 1) else {
                    eprintln!("missing value for {flag}");
                    return ExitCode::FAILURE;
                };
                let parsed = match flag {
                    "--dim" => value.parse::<usize>().map(|n| dim = n).is_ok(),
                    "--max-iters" => value
                        .parse::<u32>()
                        .map(|n| config = config.max_iters(n))
                        .is_ok(),
                    _ => value
                        .parse::<f64>()
                        .map(|e| config = config.epsilon(e))
                        .is_ok(),
                };
                if !parsed {
                    eprintln!("invalid value for {flag}: {value}");
                    return ExitCode::FAILURE;
                }
                i += 1;
            }
            "-h" | "--help" => {
                print_usage();
                return ExitCode::SUCCESS;
            }
            other => {
                eprintln!("unknown argument: {other}");
                print_usage();
                return ExitCode::FAILURE;
            }
        }
        i += 1;
    }

    let system = CgSystem {
        operator: Rc::new(DenseMatrix::tridiagonal(dim, 4.0, -1.0)),
        rhs: Buffer::new(vec![1.0; dim]),
        solution: Buffer::zeros(dim),
        position: None,
    };

    let solver = match StagedCg::new(system, config) {
        Ok(solver) => solver,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::FAILURE;
        }
    };

    if dump {
        match solver.dump() {
            Ok(text) => print!("{text}"),
            Err(err) => {
                eprintln!("error: {err}");
                return ExitCode::FAILURE;
            }
        }
    }

    match solver.run() {
        Ok(report) => {
            println!(
                "iterations: {}, residual^2: {:e}, converged: {}",
                report.iterations, report.residual_sq, report.converged
            );
            println!("solution: {:?}", solver.solution().to_vec());
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error: {err}");
            if let cgraph_solver::SolverError::Eval(eval) = &err {
                eprint!("{}", eval.trace);
            }
            ExitCode::FAILURE
        }
    }
}

fn print_usage() {
    eprintln!("Usage: cgraph-cg [--dim N] [--max-iters N] [--epsilon E] [--dump]");
}
