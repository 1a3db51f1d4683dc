use num_traits::Float;

use crate::traits::FloatScalar;

use super::DynMatrix;

/// Dot product of two equal-length slices.
#[inline]
pub(crate) fn dot<T: FloatScalar>(a: &[T], b: &[T]) -> T {
    debug_assert_eq!(a.len(), b.len());
    a.iter()
        .zip(b.iter())
        .fold(T::zero(), |acc, (&x, &y)| acc + x * y)
}

/// Euclidean norm of a slice.
#[inline]
pub(crate) fn norm2<T: FloatScalar>(v: &[T]) -> T {
    Float::sqrt(dot(v, v))
}

impl<T: FloatScalar> DynMatrix<T> {
    /// Inner product of column `i` of `self` with column `j` of `other`.
    ///
    /// Panics if the row counts differ.
    ///
    /// ```
    /// use gramqr::DynMatrix;
    /// let a = DynMatrix::from_rows(2, 2, &[1.0_f64, 3.0, 2.0, 4.0]);
    /// assert_eq!(a.dot_col(0, &a, 1), 11.0);
    /// ```
    pub fn dot_col(&self, i: usize, other: &Self, j: usize) -> T {
        assert_eq!(
            self.nrows, other.nrows,
            "row count mismatch: {} vs {}",
            self.nrows, other.nrows,
        );
        dot(self.col(i), other.col(j))
    }

    /// Euclidean norm of column `j`.
    pub fn col_norm(&self, j: usize) -> T {
        norm2(self.col(j))
    }

    /// Frobenius norm (square root of the sum of squares).
    ///
    /// ```
    /// use gramqr::DynMatrix;
    /// let m = DynMatrix::from_rows(2, 2, &[1.0_f64, 2.0, 3.0, 4.0]);
    /// assert!((m.frobenius_norm() - 30.0_f64.sqrt()).abs() < 1e-12);
    /// ```
    pub fn frobenius_norm(&self) -> T {
        norm2(&self.data)
    }

    /// Max norm: largest absolute entry.
    ///
    /// ```
    /// use gramqr::DynMatrix;
    /// let m = DynMatrix::from_rows(2, 2, &[1.0_f64, -7.0, 3.0, 4.0]);
    /// assert_eq!(m.norm_max(), 7.0);
    /// ```
    pub fn norm_max(&self) -> T {
        self.data
            .iter()
            .fold(T::zero(), |acc, &x| Float::max(acc, Float::abs(x)))
    }
}
