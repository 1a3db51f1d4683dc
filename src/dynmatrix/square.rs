use alloc::vec::Vec;

use num_traits::Float;

use crate::traits::{FloatScalar, Scalar};

use super::DynMatrix;

impl<T: Scalar> DynMatrix<T> {
    /// Sum of diagonal elements.
    ///
    /// ```
    /// use gramqr::DynMatrix;
    /// let m = DynMatrix::from_rows(2, 2, &[1.0, 2.0, 3.0, 4.0]);
    /// assert_eq!(m.trace(), 5.0);
    /// ```
    pub fn trace(&self) -> T {
        let n = self.nrows.min(self.ncols);
        let mut sum = T::zero();
        for i in 0..n {
            sum = sum + self[(i, i)];
        }
        sum
    }

    /// The main diagonal, `min(nrows, ncols)` entries.
    ///
    /// ```
    /// use gramqr::DynMatrix;
    /// let m = DynMatrix::from_rows(2, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    /// assert_eq!(m.diagonal(), vec![1.0, 5.0]);
    /// ```
    pub fn diagonal(&self) -> Vec<T> {
        let n = self.nrows.min(self.ncols);
        (0..n).map(|i| self[(i, i)]).collect()
    }

    /// Check if the matrix is exactly symmetric.
    pub fn is_symmetric(&self) -> bool {
        if !self.is_square() {
            return false;
        }
        let n = self.nrows;
        for i in 0..n {
            for j in (i + 1)..n {
                if self[(i, j)] != self[(j, i)] {
                    return false;
                }
            }
        }
        true
    }

    /// Whether every entry strictly below the main diagonal is exactly zero.
    ///
    /// Applies to rectangular matrices too (upper trapezoidal).
    pub fn is_upper_triangular(&self) -> bool {
        for j in 0..self.ncols {
            for i in (j + 1)..self.nrows {
                if self[(i, j)] != T::zero() {
                    return false;
                }
            }
        }
        true
    }
}

impl<T: FloatScalar> DynMatrix<T> {
    /// Largest absolute entry strictly below the main diagonal.
    ///
    /// Zero for an upper-triangular matrix. After QR iteration this tells how
    /// far the iterate is from triangular form; a 2×2 block left behind by a
    /// complex eigenvalue pair keeps it bounded away from zero.
    ///
    /// ```
    /// use gramqr::DynMatrix;
    /// let m = DynMatrix::from_rows(2, 2, &[1.0_f64, 9.0, -0.5, 4.0]);
    /// assert_eq!(m.subdiagonal_norm(), 0.5);
    /// ```
    pub fn subdiagonal_norm(&self) -> T {
        let mut max = T::zero();
        for j in 0..self.ncols {
            for i in (j + 1)..self.nrows {
                max = Float::max(max, Float::abs(self[(i, j)]));
            }
        }
        max
    }

    /// Determinant via Gaussian elimination with partial pivoting.
    ///
    /// Panics if the matrix is not square.
    ///
    /// ```
    /// use gramqr::DynMatrix;
    /// let m = DynMatrix::from_rows(2, 2, &[3.0_f64, 8.0, 4.0, 6.0]);
    /// assert!((m.det() - (-14.0)).abs() < 1e-12);
    /// ```
    pub fn det(&self) -> T {
        assert!(self.is_square(), "determinant requires a square matrix");
        let n = self.nrows;
        let mut a = self.clone();
        let mut sign = T::one();

        for col in 0..n {
            let mut max_row = col;
            let mut max_val = Float::abs(a[(col, col)]);
            for row in (col + 1)..n {
                let val = Float::abs(a[(row, col)]);
                if val > max_val {
                    max_val = val;
                    max_row = row;
                }
            }

            if max_val < T::epsilon() {
                return T::zero();
            }

            if max_row != col {
                for j in col..n {
                    let tmp = a[(col, j)];
                    a[(col, j)] = a[(max_row, j)];
                    a[(max_row, j)] = tmp;
                }
                sign = -sign;
            }

            let pivot = a[(col, col)];
            for row in (col + 1)..n {
                let factor = a[(row, col)] / pivot;
                for j in (col + 1)..n {
                    let val = a[(col, j)];
                    a[(row, j)] = a[(row, j)] - factor * val;
                }
                a[(row, col)] = T::zero();
            }
        }

        let mut det = sign;
        for i in 0..n {
            det = det * a[(i, i)];
        }
        det
    }
}
