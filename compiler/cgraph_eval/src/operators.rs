//! Primitive host operators as native bindings.
//!
//! The IR has no binary-operator node. Arithmetic and comparisons in a staged
//! graph are invocations of these bindings, registered once per program with
//! [`Operators::register`].
//!
//! Numeric rules: two integers stay integral (checked, overflow is an
//! error); any float operand promotes both sides to `f64`. Division is
//! always true division and yields a float. Booleans count as 0 and 1.
//! Comparisons yield booleans.

use std::cmp::Ordering;

use cgraph_ir::{Arity, NativeError, NativeId, NativeResult, Program, Value};

/// Scalar operand after promotion.
#[derive(Copy, Clone, Debug)]
enum Num {
    Int(i64),
    Float(f64),
}

fn scalar(op: &str, value: &Value) -> Result<Num, NativeError> {
    match value {
        Value::Int(n) => Ok(Num::Int(*n)),
        Value::Bool(b) => Ok(Num::Int(i64::from(*b))),
        Value::Float(x) => Ok(Num::Float(*x)),
        Value::Void | Value::Buffer(_) => Err(NativeError::new(format!(
            "`{op}` expects scalar operands, got {}",
            value.type_name()
        ))),
    }
}

fn operands(op: &str, args: &[Value]) -> Result<(Num, Num), NativeError> {
    match args {
        [lhs, rhs] => Ok((scalar(op, lhs)?, scalar(op, rhs)?)),
        _ => Err(NativeError::new(format!(
            "`{op}` expects 2 operands, got {}",
            args.len()
        ))),
    }
}

#[expect(
    clippy::cast_precision_loss,
    reason = "mixed int/float arithmetic promotes to f64"
)]
fn as_f64(n: Num) -> f64 {
    match n {
        Num::Int(i) => i as f64,
        Num::Float(x) => x,
    }
}

fn arith(
    op: &'static str,
    args: &[Value],
    int_op: fn(i64, i64) -> Option<i64>,
    float_op: fn(f64, f64) -> f64,
) -> NativeResult {
    match operands(op, args)? {
        (Num::Int(a), Num::Int(b)) => int_op(a, b)
            .map(Value::Int)
            .ok_or_else(|| NativeError::new(format!("integer overflow in `{op}`"))),
        (a, b) => Ok(Value::Float(float_op(as_f64(a), as_f64(b)))),
    }
}

fn compare(op: &'static str, args: &[Value], accept: fn(Ordering) -> bool) -> NativeResult {
    let ordering = match operands(op, args)? {
        (Num::Int(a), Num::Int(b)) => Some(a.cmp(&b)),
        (a, b) => as_f64(a).partial_cmp(&as_f64(b)),
    };
    // NaN compares false under every operator.
    Ok(Value::Bool(ordering.is_some_and(accept)))
}

/// `a + b`.
pub fn add(args: &[Value]) -> NativeResult {
    arith("add", args, i64::checked_add, |a, b| a + b)
}

/// `a - b`.
pub fn sub(args: &[Value]) -> NativeResult {
    arith("sub", args, i64::checked_sub, |a, b| a - b)
}

/// `a * b`.
pub fn mul(args: &[Value]) -> NativeResult {
    arith("mul", args, i64::checked_mul, |a, b| a * b)
}

/// `a / b`, true division.
pub fn div(args: &[Value]) -> NativeResult {
    let (a, b) = operands("div", args)?;
    let divisor = as_f64(b);
    if divisor == 0.0 {
        return Err(NativeError::new("division by zero"));
    }
    Ok(Value::Float(as_f64(a) / divisor))
}

/// `a < b`.
pub fn lt(args: &[Value]) -> NativeResult {
    compare("lt", args, Ordering::is_lt)
}

/// `a <= b`.
pub fn le(args: &[Value]) -> NativeResult {
    compare("le", args, Ordering::is_le)
}

/// `a > b`.
pub fn gt(args: &[Value]) -> NativeResult {
    compare("gt", args, Ordering::is_gt)
}

/// `a >= b`.
pub fn ge(args: &[Value]) -> NativeResult {
    compare("ge", args, Ordering::is_ge)
}

/// `a == b`.
pub fn eq(args: &[Value]) -> NativeResult {
    compare("eq", args, Ordering::is_eq)
}

/// Handles to the primitive operators registered in one program.
#[derive(Copy, Clone, Debug)]
pub struct Operators {
    pub add: NativeId,
    pub sub: NativeId,
    pub mul: NativeId,
    pub div: NativeId,
    pub lt: NativeId,
    pub le: NativeId,
    pub gt: NativeId,
    pub ge: NativeId,
    pub eq: NativeId,
}

impl Operators {
    /// Register every primitive operator in `program`.
    pub fn register(program: &mut Program) -> Self {
        let binary = Arity::Fixed(2);
        Operators {
            add: program.native_fn("add", binary, add),
            sub: program.native_fn("sub", binary, sub),
            mul: program.native_fn("mul", binary, mul),
            div: program.native_fn("div", binary, div),
            lt: program.native_fn("lt", binary, lt),
            le: program.native_fn("le", binary, le),
            gt: program.native_fn("gt", binary, gt),
            ge: program.native_fn("ge", binary, ge),
            eq: program.native_fn("eq", binary, eq),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ints(a: i64, b: i64) -> [Value; 2] {
        [Value::Int(a), Value::Int(b)]
    }

    #[test]
    fn integer_arithmetic_stays_integral() {
        assert_eq!(add(&ints(2, 3)), Ok(Value::Int(5)));
        assert_eq!(sub(&ints(2, 3)), Ok(Value::Int(-1)));
        assert_eq!(mul(&ints(4, 3)), Ok(Value::Int(12)));
    }

    #[test]
    fn mixed_arithmetic_promotes() {
        assert_eq!(
            add(&[Value::Int(1), Value::Float(0.5)]),
            Ok(Value::Float(1.5))
        );
        assert_eq!(
            mul(&[Value::Float(2.0), Value::Bool(true)]),
            Ok(Value::Float(2.0))
        );
    }

    #[test]
    fn division_is_true_division() {
        assert_eq!(div(&ints(1, 2)), Ok(Value::Float(0.5)));
        assert_eq!(
            div(&ints(1, 0)).map_err(|e| e.to_string()),
            Err("division by zero".to_string())
        );
    }

    #[test]
    fn overflow_is_reported() {
        assert!(add(&ints(i64::MAX, 1)).is_err());
    }

    #[test]
    fn comparisons() {
        assert_eq!(lt(&ints(1, 2)), Ok(Value::Bool(true)));
        assert_eq!(le(&ints(2, 2)), Ok(Value::Bool(true)));
        assert_eq!(gt(&ints(2, 2)), Ok(Value::Bool(false)));
        assert_eq!(ge(&[Value::Float(2.5), Value::Int(2)]), Ok(Value::Bool(true)));
        assert_eq!(eq(&[Value::Int(3), Value::Float(3.0)]), Ok(Value::Bool(true)));
        assert_eq!(
            lt(&[Value::Float(f64::NAN), Value::Int(1)]),
            Ok(Value::Bool(false))
        );
    }

    #[test]
    fn buffers_are_rejected() {
        let err = add(&[Value::Int(1), Value::Buffer(cgraph_ir::Buffer::zeros(2))]);
        assert_eq!(
            err.map_err(|e| e.to_string()),
            Err("`add` expects scalar operands, got buffer".to_string())
        );
    }

    #[test]
    fn register_names_bindings() {
        let mut program = Program::new();
        let ops = Operators::register(&mut program);
        assert_eq!(program.native(ops.le).name(), "le");
        assert_eq!(program.native(ops.div).arity(), Arity::Fixed(2));
    }
}
