use num_traits::Float;

use crate::linalg::sign::flip_signs;
use crate::linalg::{
    gram_schmidt_with, qr_eigenvalues, EigenEstimate, GramSchmidtOptions, LinalgError, QrIteration,
};
use crate::traits::FloatScalar;

use super::DynMatrix;

// ── GramSchmidtQr ───────────────────────────────────────────────────

/// Gram-Schmidt QR factorization of a dynamically-sized `n × m` matrix
/// (`m >= n`).
///
/// Holds `Q` (`n × n`, orthonormal columns) and `R` (`n × m`, upper
/// triangular in its leading block) with `Q * R = A` up to rounding.
///
/// # Example
///
/// ```
/// use gramqr::DynMatrix;
///
/// let a = DynMatrix::from_rows(3, 3, &[
///     1.0_f64, 1.0, 0.0,
///     1.0, 0.0, 1.0,
///     0.0, 1.0, 1.0,
/// ]);
/// let mut qr = a.gram_schmidt().unwrap();
/// qr.adjust_sign();
///
/// assert!((qr.q()[(0, 0)] - 0.7071).abs() < 1e-4);
/// assert!((qr.r()[(1, 1)] + 1.2247).abs() < 1e-4);
/// assert!(qr.reconstruct().max_abs_diff(&a) < 1e-12);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct GramSchmidtQr<T> {
    q: DynMatrix<T>,
    r: DynMatrix<T>,
}

impl<T: FloatScalar> GramSchmidtQr<T> {
    /// Factorize with classical Gram-Schmidt.
    pub fn new(a: &DynMatrix<T>) -> Result<Self, LinalgError> {
        Self::with_options(a, &GramSchmidtOptions::default())
    }

    /// Factorize with explicit options.
    pub fn with_options(a: &DynMatrix<T>, options: &GramSchmidtOptions<T>) -> Result<Self, LinalgError> {
        let (q, r) = gram_schmidt_with(a, options)?;
        Ok(Self { q, r })
    }

    /// The orthonormal factor.
    #[inline]
    pub fn q(&self) -> &DynMatrix<T> {
        &self.q
    }

    /// The upper-triangular (trapezoidal) factor.
    #[inline]
    pub fn r(&self) -> &DynMatrix<T> {
        &self.r
    }

    /// Split into `(Q, R)`.
    pub fn into_parts(self) -> (DynMatrix<T>, DynMatrix<T>) {
        (self.q, self.r)
    }

    /// Apply the sign convention in place: afterwards every diagonal entry of
    /// `Q` is non-negative. Idempotent. Returns the number of flipped columns.
    pub fn adjust_sign(&mut self) -> usize {
        flip_signs(&mut self.q, &mut self.r)
    }

    /// `Q * R`.
    pub fn reconstruct(&self) -> DynMatrix<T> {
        &self.q * &self.r
    }

    /// `|det(A)|` for square `A`: the product of `|R[i, i]|`.
    ///
    /// Panics if the factorized matrix was not square.
    pub fn abs_det(&self) -> T {
        assert!(self.r.is_square(), "determinant requires a square matrix");
        self.r
            .diagonal()
            .into_iter()
            .fold(T::one(), |acc, d| acc * Float::abs(d))
    }
}

// ── Convenience methods ─────────────────────────────────────────────

impl<T: FloatScalar> DynMatrix<T> {
    /// QR factorization by classical Gram-Schmidt.
    ///
    /// See [`GramSchmidtQr`].
    pub fn gram_schmidt(&self) -> Result<GramSchmidtQr<T>, LinalgError> {
        GramSchmidtQr::new(self)
    }

    /// Start a stepwise QR iteration from this matrix.
    pub fn qr_iteration(&self) -> Result<QrIteration<T>, LinalgError> {
        QrIteration::new(self)
    }

    /// Eigenvalue estimates by unshifted QR iteration.
    ///
    /// See [`qr_eigenvalues`](crate::linalg::qr_eigenvalues).
    ///
    /// ```
    /// use gramqr::DynMatrix;
    /// let a = DynMatrix::from_rows(2, 2, &[4.0_f64, 1.0, 2.0, 3.0]);
    /// let est = a.qr_eigenvalues(1e-12, 500).unwrap();
    /// let s = est.sorted();
    /// assert!((s[0] - 2.0).abs() < 1e-9);
    /// assert!((s[1] - 5.0).abs() < 1e-9);
    /// ```
    pub fn qr_eigenvalues(&self, tol: T, max_iter: usize) -> Result<EigenEstimate<T>, LinalgError> {
        qr_eigenvalues(self, tol, max_iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::linalg::GramSchmidtVariant;

    #[test]
    fn gram_schmidt_wrapper() {
        let a = DynMatrix::from_rows(2, 3, &[1.0_f64, 3.0, 4.0, 2.0, 0.0, 9.0]);
        let mut qr = a.gram_schmidt().unwrap();
        assert!(qr.reconstruct().max_abs_diff(&a) < 1e-12);
        assert_eq!(qr.adjust_sign(), 1);
        assert_eq!(qr.adjust_sign(), 0);
        assert!(qr.q().diagonal().iter().all(|&d| d >= 0.0));
        assert!(qr.reconstruct().max_abs_diff(&a) < 1e-12);

        let (q, r) = qr.into_parts();
        assert_eq!(q.shape(), (2, 2));
        assert_eq!(r.shape(), (2, 3));
    }

    #[test]
    fn wrapper_adjust_sign_matches_free_function() {
        let a = DynMatrix::from_rows(3, 3, &[1.0_f64, 1.0, 0.0, 1.0, 0.0, 1.0, 0.0, 1.0, 1.0]);
        let mut qr = a.gram_schmidt().unwrap();
        let (q, r) = crate::linalg::adjust_sign(qr.q(), qr.r()).unwrap();
        assert_eq!(qr.adjust_sign(), 1);
        assert_eq!(qr.q(), &q);
        assert_eq!(qr.r(), &r);
    }

    #[test]
    fn with_options_modified() {
        let a = DynMatrix::from_rows(2, 2, &[3.0_f64, 1.0, 4.0, 2.0]);
        let opts = GramSchmidtOptions {
            variant: GramSchmidtVariant::Modified,
            rank_tol: Some(1e-12),
        };
        let qr = GramSchmidtQr::with_options(&a, &opts).unwrap();
        assert!(qr.reconstruct().max_abs_diff(&a) < 1e-12);
    }

    #[test]
    fn abs_det_matches_elimination() {
        let a = DynMatrix::from_rows(3, 3, &[6.0_f64, 1.0, 1.0, 4.0, -2.0, 5.0, 2.0, 8.0, 7.0]);
        let qr = a.gram_schmidt().unwrap();
        assert!((qr.abs_det() - a.det().abs()).abs() < 1e-9);
    }

    #[test]
    #[should_panic(expected = "square")]
    fn abs_det_rectangular_panics() {
        let a = DynMatrix::from_rows(2, 3, &[1.0_f64, 0.0, 0.0, 0.0, 1.0, 0.0]);
        let _ = a.gram_schmidt().unwrap().abs_det();
    }

    #[test]
    fn convenience_eigenvalues() {
        let a = DynMatrix::from_rows(2, 2, &[2.0_f64, 1.0, 1.0, 2.0]);
        let est = a.qr_eigenvalues(1e-12, 1000).unwrap();
        assert!(est.converged);
        assert_eq!(est.eigenvalues.len(), 2);

        let mut it = a.qr_iteration().unwrap();
        it.step().unwrap();
        assert_eq!(it.iterations(), 1);
    }
}
