//! Host linear operators.
//!
//! The staged solve only sees `matvec(out, x)`. What the operator is (a
//! dense matrix, a stencil, an element-by-element stiffness assembly) stays
//! on the host side of this trait.

/// Symmetric positive-definite operator applied by the host.
pub trait LinearOperator {
    /// Length of the vectors the operator acts on.
    fn dim(&self) -> usize;

    /// `out = A * x`. Both slices have length [`LinearOperator::dim`].
    fn apply(&self, x: &[f64], out: &mut [f64]);
}

/// Row-major dense square matrix.
#[derive(Clone, Debug, PartialEq)]
pub struct DenseMatrix {
    dim: usize,
    data: Vec<f64>,
}

impl DenseMatrix {
    /// Build from rows. Returns `None` unless every row has `rows.len()`
    /// entries.
    pub fn from_rows(rows: &[Vec<f64>]) -> Option<Self> {
        let dim = rows.len();
        if rows.iter().any(|row| row.len() != dim) {
            return None;
        }
        Some(DenseMatrix {
            dim,
            data: rows.concat(),
        })
    }

    /// The tridiagonal matrix with `diag` on the diagonal and `off` beside
    /// it, a common SPD test system.
    pub fn tridiagonal(dim: usize, diag: f64, off: f64) -> Self {
        let mut data = vec![0.0; dim * dim];
        for i in 0..dim {
            data[i * dim + i] = diag;
            if i + 1 < dim {
                data[i * dim + i + 1] = off;
                data[(i + 1) * dim + i] = off;
            }
        }
        DenseMatrix { dim, data }
    }
}

impl LinearOperator for DenseMatrix {
    fn dim(&self) -> usize {
        self.dim
    }

    fn apply(&self, x: &[f64], out: &mut [f64]) {
        for (row, slot) in self.data.chunks_exact(self.dim).zip(out.iter_mut()) {
            *slot = row.iter().zip(x).map(|(a, b)| a * b).sum();
        }
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests {
    use super::*;

    #[test]
    fn ragged_rows_are_rejected() {
        assert!(DenseMatrix::from_rows(&[vec![1.0, 2.0], vec![3.0]]).is_none());
    }

    #[test]
    fn apply_multiplies() {
        let m = DenseMatrix::from_rows(&[vec![2.0, 1.0], vec![1.0, 3.0]]).unwrap();
        let mut out = [0.0; 2];
        m.apply(&[1.0, 2.0], &mut out);
        assert_eq!(out, [4.0, 7.0]);
    }

    #[test]
    fn tridiagonal_layout() {
        let m = DenseMatrix::tridiagonal(3, 4.0, -1.0);
        let expected = DenseMatrix::from_rows(&[
            vec![4.0, -1.0, 0.0],
            vec![-1.0, 4.0, -1.0],
            vec![0.0, -1.0, 4.0],
        ]);
        assert_eq!(Some(m), expected);
    }
}
