//! Host kernels bound as natives in the staged solve.
//!
//! Every kernel checks its operand kinds and lengths and reports a
//! `NativeError` instead of panicking. Output buffers may alias inputs
//! (`axpy(v, v, alpha, d)`), so inputs are read in full before the output
//! is written.

use std::rc::Rc;

use cgraph_ir::{Arity, Buffer, NativeError, NativeId, NativeResult, Program, Value};

use crate::operator::LinearOperator;

fn buffer<'a>(kernel: &str, args: &'a [Value], index: usize) -> Result<&'a Buffer, NativeError> {
    args.get(index).and_then(Value::as_buffer).ok_or_else(|| {
        NativeError::new(format!("`{kernel}` expects a buffer as argument {index}"))
    })
}

fn scalar(kernel: &str, args: &[Value], index: usize) -> Result<f64, NativeError> {
    args.get(index).and_then(Value::as_f64).ok_or_else(|| {
        NativeError::new(format!("`{kernel}` expects a number as argument {index}"))
    })
}

fn same_len(kernel: &str, expected: usize, got: usize) -> Result<(), NativeError> {
    if expected == got {
        Ok(())
    } else {
        Err(NativeError::new(format!(
            "`{kernel}` length mismatch: {expected} vs {got}"
        )))
    }
}

/// `axpy(ans, a, k, b)`: `ans = a + k * b`.
pub fn axpy(args: &[Value]) -> NativeResult {
    let ans = buffer("axpy", args, 0)?;
    let a = buffer("axpy", args, 1)?;
    let k = scalar("axpy", args, 2)?;
    let b = buffer("axpy", args, 3)?;
    same_len("axpy", ans.len(), a.len())?;
    same_len("axpy", ans.len(), b.len())?;

    let result: Vec<f64> = a
        .read()
        .iter()
        .zip(b.read().iter())
        .map(|(x, y)| x + k * y)
        .collect();
    *ans.write() = result;
    Ok(Value::Void)
}

/// `dot(a, b)`: inner product.
pub fn dot(args: &[Value]) -> NativeResult {
    let a = buffer("dot", args, 0)?;
    let b = buffer("dot", args, 1)?;
    same_len("dot", a.len(), b.len())?;
    let sum = a.read().iter().zip(b.read().iter()).map(|(x, y)| x * y).sum();
    Ok(Value::Float(sum))
}

/// `copy(dst, src)`.
pub fn copy(args: &[Value]) -> NativeResult {
    let dst = buffer("copy", args, 0)?;
    let src = buffer("copy", args, 1)?;
    same_len("copy", dst.len(), src.len())?;
    let data = src.to_vec();
    *dst.write() = data;
    Ok(Value::Void)
}

/// `matvec(out, x)`: `out = A * x` through the host operator.
pub fn matvec(operator: Rc<dyn LinearOperator>) -> impl Fn(&[Value]) -> NativeResult {
    move |args| {
        let out = buffer("matvec", args, 0)?;
        let x = buffer("matvec", args, 1)?;
        same_len("matvec", operator.dim(), x.len())?;
        same_len("matvec", operator.dim(), out.len())?;

        let input = x.to_vec();
        let mut result = vec![0.0; operator.dim()];
        operator.apply(&input, &mut result);
        *out.write() = result;
        Ok(Value::Void)
    }
}

/// Handles to the kernels registered in one program.
#[derive(Copy, Clone, Debug)]
pub struct Kernels {
    pub axpy: NativeId,
    pub dot: NativeId,
    pub copy: NativeId,
    pub matvec: NativeId,
}

impl Kernels {
    /// Register every kernel in `program`, with `operator` behind `matvec`.
    pub fn register(program: &mut Program, operator: Rc<dyn LinearOperator>) -> Self {
        Kernels {
            axpy: program.native_fn("axpy", Arity::Fixed(4), axpy),
            dot: program.native_fn("dot", Arity::Fixed(2), dot),
            copy: program.native_fn("copy", Arity::Fixed(2), copy),
            matvec: program.native_fn("matvec", Arity::Fixed(2), matvec(operator)),
        }
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests {
    use super::*;
    use crate::operator::DenseMatrix;

    fn buf(data: &[f64]) -> Buffer {
        Buffer::new(data.to_vec())
    }

    #[test]
    fn axpy_writes_output() {
        let ans = Buffer::zeros(3);
        let args = [
            Value::Buffer(ans.clone()),
            Value::Buffer(buf(&[1.0, 2.0, 3.0])),
            Value::Int(2),
            Value::Buffer(buf(&[1.0, 1.0, 1.0])),
        ];
        assert_eq!(axpy(&args), Ok(Value::Void));
        assert_eq!(ans.to_vec(), vec![3.0, 4.0, 5.0]);
    }

    #[test]
    fn axpy_output_may_alias_inputs() {
        let d = buf(&[1.0, 2.0]);
        let r = buf(&[10.0, 20.0]);
        let args = [
            Value::Buffer(d.clone()),
            Value::Buffer(r),
            Value::Float(0.5),
            Value::Buffer(d.clone()),
        ];
        axpy(&args).unwrap();
        assert_eq!(d.to_vec(), vec![10.5, 21.0]);
    }

    #[test]
    fn length_mismatch_is_an_error() {
        let args = [Value::Buffer(buf(&[1.0])), Value::Buffer(buf(&[1.0, 2.0]))];
        assert_eq!(
            dot(&args).map_err(|e| e.to_string()),
            Err("`dot` length mismatch: 1 vs 2".to_string())
        );
    }

    #[test]
    fn wrong_kind_is_an_error() {
        let args = [Value::Int(1), Value::Buffer(buf(&[1.0]))];
        assert!(copy(&args).is_err());
    }

    #[test]
    fn dot_and_copy() {
        let a = buf(&[1.0, 2.0, 3.0]);
        let b = buf(&[4.0, 5.0, 6.0]);
        assert_eq!(
            dot(&[Value::Buffer(a.clone()), Value::Buffer(b.clone())]),
            Ok(Value::Float(32.0))
        );

        copy(&[Value::Buffer(a.clone()), Value::Buffer(b)]).unwrap();
        assert_eq!(a.to_vec(), vec![4.0, 5.0, 6.0]);
    }

    #[test]
    fn register_binds_only_staged_kernels() {
        let mut p = Program::new();
        let op: Rc<dyn LinearOperator> = Rc::new(DenseMatrix::tridiagonal(2, 2.0, 1.0));
        let kernels = Kernels::register(&mut p, op);
        let names: Vec<&str> = [kernels.axpy, kernels.dot, kernels.copy, kernels.matvec]
            .into_iter()
            .map(|id| p.native(id).name())
            .collect();
        assert_eq!(names, ["axpy", "dot", "copy", "matvec"]);

        let next = p.native_fn("next", Arity::Variadic, |_| Ok(Value::Void));
        assert_eq!(next.index(), 4);
    }

    #[test]
    fn matvec_applies_operator() {
        let op: Rc<dyn LinearOperator> = Rc::new(DenseMatrix::tridiagonal(2, 2.0, 1.0));
        let out = Buffer::zeros(2);
        let x = buf(&[1.0, 1.0]);
        matvec(op)(&[Value::Buffer(out.clone()), Value::Buffer(x)]).unwrap();
        assert_eq!(out.to_vec(), vec![3.0, 3.0]);
    }
}
