//! Values threaded through a program graph.
//!
//! The IR never inspects values: literals hold them, variables name them, and
//! native bindings consume and produce them. `Buffer` is the side-effect
//! channel. It is a handle to host-owned storage, so cloning a `Value` that
//! holds a buffer aliases the same memory instead of copying it.

use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::Rc;

/// Runtime value bound to variables and passed to native bindings.
#[derive(Clone)]
pub enum Value {
    /// No value: the result of a callable that falls off the end of its body,
    /// or of a native operation that only writes into a buffer.
    Void,
    /// Boolean value.
    Bool(bool),
    /// Integer scalar.
    Int(i64),
    /// Floating-point scalar.
    Float(f64),
    /// Handle to an externally owned numeric buffer.
    Buffer(Buffer),
}

impl Value {
    /// Short name of the value's kind, for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Void => "void",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Buffer(_) => "buffer",
        }
    }

    /// Numeric view of a scalar; `None` for void and buffers.
    #[expect(
        clippy::cast_precision_loss,
        reason = "scalar promotion to float matches host numeric semantics"
    )]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(n) => Some(*n as f64),
            Value::Float(x) => Some(*x),
            Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            Value::Void | Value::Buffer(_) => None,
        }
    }

    /// Integer view; only `Int` converts.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Buffer view; only `Buffer` converts.
    pub fn as_buffer(&self) -> Option<&Buffer> {
        match self {
            Value::Buffer(buf) => Some(buf),
            _ => None,
        }
    }

    /// Check if this is `Void`.
    #[inline]
    pub fn is_void(&self) -> bool {
        matches!(self, Value::Void)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<Buffer> for Value {
    fn from(buf: Buffer) -> Self {
        Value::Buffer(buf)
    }
}

impl PartialEq for Value {
    /// Scalars compare by value, buffers by identity.
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Void, Value::Void) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Buffer(a), Value::Buffer(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Void => write!(f, "Void"),
            Value::Bool(b) => write!(f, "Bool({b})"),
            Value::Int(n) => write!(f, "Int({n})"),
            Value::Float(x) => write!(f, "Float({x})"),
            Value::Buffer(buf) => write!(f, "Buffer(len={})", buf.len()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Void => write!(f, "void"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(n) => write!(f, "{n}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Buffer(buf) => write!(f, "<buffer of {}>", buf.len()),
        }
    }
}

/// Shared handle to a host-owned `f64` buffer.
///
/// Cloning the handle aliases the storage. The IR holds handles only; it never
/// copies buffer contents. Native bindings read and write through
/// [`Buffer::read`] and [`Buffer::write`].
///
/// # Thread Safety
/// `Buffer` is `!Send`: a graph and its buffers stay on the thread that built
/// them. Running the same graph twice at once is the caller's responsibility
/// to avoid and cannot happen across threads.
#[derive(Clone, Default)]
pub struct Buffer(Rc<RefCell<Vec<f64>>>);

impl Buffer {
    /// Wrap host data in a new buffer.
    pub fn new(data: Vec<f64>) -> Self {
        Buffer(Rc::new(RefCell::new(data)))
    }

    /// A buffer of `len` zeros.
    pub fn zeros(len: usize) -> Self {
        Self::new(vec![0.0; len])
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    /// Check if the buffer has no elements.
    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }

    /// Borrow the contents for reading.
    ///
    /// # Panics
    /// Panics if a [`Buffer::write`] guard for the same storage is alive.
    pub fn read(&self) -> Ref<'_, [f64]> {
        Ref::map(self.0.borrow(), Vec::as_slice)
    }

    /// Borrow the contents for writing.
    ///
    /// # Panics
    /// Panics if any other guard for the same storage is alive.
    pub fn write(&self) -> RefMut<'_, Vec<f64>> {
        self.0.borrow_mut()
    }

    /// Copy the contents out.
    pub fn to_vec(&self) -> Vec<f64> {
        self.0.borrow().clone()
    }

    /// Check whether two handles alias the same storage.
    pub fn ptr_eq(&self, other: &Buffer) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl From<Vec<f64>> for Buffer {
    fn from(data: Vec<f64>) -> Self {
        Buffer::new(data)
    }
}

impl fmt::Debug for Buffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Buffer").field(&&*self.read()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffer_clone_aliases_storage() {
        let a = Buffer::new(vec![1.0, 2.0]);
        let b = a.clone();
        b.write()[0] = 7.0;
        assert_eq!(a.to_vec(), vec![7.0, 2.0]);
        assert!(a.ptr_eq(&b));
    }

    #[test]
    fn buffers_compare_by_identity() {
        let a = Value::Buffer(Buffer::new(vec![1.0]));
        let b = Value::Buffer(Buffer::new(vec![1.0]));
        assert_ne!(a, b);
        assert_eq!(a, a.clone());
    }

    #[test]
    fn buffer_debug_shows_contents() {
        let buf = Buffer::new(vec![1.0, 2.5]);
        assert_eq!(format!("{buf:?}"), "Buffer([1.0, 2.5])");
        assert_eq!(format!("{:?}", Value::Buffer(buf)), "Buffer(len=2)");
    }

    #[test]
    fn scalar_views() {
        assert_eq!(Value::Int(3).as_f64(), Some(3.0));
        assert_eq!(Value::Bool(true).as_f64(), Some(1.0));
        assert_eq!(Value::Void.as_f64(), None);
        assert_eq!(Value::Float(2.5).as_int(), None);
    }

    #[test]
    fn display_hides_buffer_contents() {
        let v = Value::Buffer(Buffer::zeros(3));
        assert_eq!(v.to_string(), "<buffer of 3>");
        assert_eq!(Value::Void.to_string(), "void");
    }
}
