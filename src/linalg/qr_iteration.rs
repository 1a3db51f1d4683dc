use alloc::vec::Vec;

use crate::linalg::gram_schmidt::{gram_schmidt_with, GramSchmidtOptions, GramSchmidtVariant};
use crate::linalg::LinalgError;
use crate::traits::FloatScalar;
use crate::DynMatrix;

/// Stopping rule and factorization choice for [`QrIteration::run`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QrIterationOptions<T> {
    /// Stop once the largest entry-wise change between two iterates is
    /// `<= tol`. Must be positive and finite.
    pub tol: T,
    /// Iteration budget. Must be at least 1.
    pub max_iter: usize,
    /// Gram-Schmidt variant used for each factorization.
    pub variant: GramSchmidtVariant,
}

impl<T: FloatScalar> QrIterationOptions<T> {
    pub fn new(tol: T, max_iter: usize) -> Self {
        Self {
            tol,
            max_iter,
            variant: GramSchmidtVariant::Classical,
        }
    }

    fn validate(&self) -> Result<(), LinalgError> {
        if !(self.tol > T::zero()) || !self.tol.is_finite() {
            return Err(LinalgError::InvalidParameter("tol must be positive and finite"));
        }
        if self.max_iter == 0 {
            return Err(LinalgError::InvalidParameter("max_iter must be at least 1"));
        }
        Ok(())
    }
}

impl<T: FloatScalar> Default for QrIterationOptions<T> {
    /// `tol = max(1e-12, 1000 * epsilon)`, `max_iter = 1000`, classical
    /// Gram-Schmidt.
    fn default() -> Self {
        Self::new(T::default_iteration_tol(), 1000)
    }
}

/// Outcome of a QR iteration run.
///
/// Running out of budget is a normal outcome: `converged` is then `false`
/// and `diff` is the last entry-wise change, still above the tolerance.
#[derive(Debug, Clone, PartialEq)]
pub struct EigenEstimate<T> {
    /// Diagonal of the final iterate, in diagonal order.
    pub eigenvalues: Vec<T>,
    /// Number of QR steps performed.
    pub iterations: usize,
    /// Whether the stopping tolerance was reached.
    pub converged: bool,
    /// Largest entry-wise change of the last step.
    pub diff: T,
}

impl<T: FloatScalar> EigenEstimate<T> {
    /// Eigenvalue estimates sorted ascending. NaNs sort last.
    pub fn sorted(&self) -> Vec<T> {
        let mut v = self.eigenvalues.clone();
        v.sort_by(|a, b| {
            a.partial_cmp(b).unwrap_or_else(|| a.is_nan().cmp(&b.is_nan()))
        });
        v
    }
}

/// Unshifted QR iteration on a square matrix.
///
/// Each [`step`](Self::step) factorizes the current iterate `A_k = Q_k R_k`
/// by Gram-Schmidt (without sign normalization) and replaces it with
/// `A_{k+1} = R_k Q_k = Q_kᵀ A_k Q_k`, so every iterate is similar to the
/// input. For real eigenvalues of distinct magnitude the iterates tend to an
/// upper-triangular matrix with the eigenvalues on the diagonal, ordered by
/// decreasing magnitude.
///
/// Complex conjugate pairs are not resolved: they leave a 2×2 block on the
/// diagonal (see [`DynMatrix::subdiagonal_norm`]). Singular input fails
/// with [`LinalgError::RankDeficient`] on the first step.
///
/// # Example
///
/// ```
/// use gramqr::DynMatrix;
/// use gramqr::linalg::{QrIteration, QrIterationOptions};
///
/// let a = DynMatrix::from_rows(2, 2, &[2.0_f64, 1.0, 1.0, 2.0]);
/// let mut it = QrIteration::new(&a).unwrap();
/// let diff = it.step().unwrap();
/// assert!(diff > 0.0);
/// assert!((it.current().trace() - 4.0).abs() < 1e-12);
///
/// let est = it.run(&QrIterationOptions::default()).unwrap();
/// assert!(est.converged);
/// assert!((est.eigenvalues[0] - 3.0).abs() < 1e-10);
/// assert!((est.eigenvalues[1] - 1.0).abs() < 1e-10);
/// ```
#[derive(Debug, Clone)]
pub struct QrIteration<T> {
    current: DynMatrix<T>,
    iterations: usize,
    factorization: GramSchmidtOptions<T>,
}

impl<T: FloatScalar> QrIteration<T> {
    /// Start from a copy of `a`. Fails with [`LinalgError::NotSquare`].
    pub fn new(a: &DynMatrix<T>) -> Result<Self, LinalgError> {
        Self::with_variant(a, GramSchmidtVariant::Classical)
    }

    /// Start from a copy of `a`, factorizing with the given variant.
    pub fn with_variant(a: &DynMatrix<T>, variant: GramSchmidtVariant) -> Result<Self, LinalgError> {
        if !a.is_square() {
            return Err(LinalgError::NotSquare {
                nrows: a.nrows(),
                ncols: a.ncols(),
            });
        }
        Ok(Self {
            current: a.clone(),
            iterations: 0,
            factorization: GramSchmidtOptions {
                variant,
                rank_tol: None,
            },
        })
    }

    /// The current iterate.
    #[inline]
    pub fn current(&self) -> &DynMatrix<T> {
        &self.current
    }

    /// Total number of steps taken so far.
    #[inline]
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Diagonal of the current iterate.
    pub fn eigenvalues(&self) -> Vec<T> {
        self.current.diagonal()
    }

    /// Consume the iteration, returning the current iterate.
    pub fn into_inner(self) -> DynMatrix<T> {
        self.current
    }

    /// One QR step. Returns `max |A_{k+1} - A_k|`.
    ///
    /// On error the current iterate is left unchanged.
    pub fn step(&mut self) -> Result<T, LinalgError> {
        let (q, r) = gram_schmidt_with(&self.current, &self.factorization)?;
        let next = &r * &q;
        let diff = next.max_abs_diff(&self.current);
        self.current = next;
        self.iterations += 1;
        Ok(diff)
    }

    /// Step until the change drops to `options.tol` or `options.max_iter`
    /// steps have been taken, whichever comes first.
    ///
    /// `options.variant` overrides the variant chosen at construction.
    pub fn run(&mut self, options: &QrIterationOptions<T>) -> Result<EigenEstimate<T>, LinalgError> {
        options.validate()?;
        self.factorization.variant = options.variant;

        let mut diff = T::infinity();
        let mut steps = 0;
        let mut converged = false;
        while steps < options.max_iter {
            diff = self.step()?;
            steps += 1;
            log::trace!("qr iteration {}: diff {:?}", self.iterations, diff);
            if diff <= options.tol {
                converged = true;
                break;
            }
        }

        log::debug!(
            "qr iteration finished after {} steps: converged={}, diff={:?}",
            steps,
            converged,
            diff
        );

        Ok(EigenEstimate {
            eigenvalues: self.eigenvalues(),
            iterations: steps,
            converged,
            diff,
        })
    }
}

/// Eigenvalue estimates of a square matrix by unshifted QR iteration.
///
/// Runs at most `max_iter` steps of [`QrIteration`], stopping early once the
/// largest entry-wise change between iterates is `<= tol`, and returns the
/// diagonal of the last iterate (unsorted).
///
/// # Errors
///
/// - [`LinalgError::NotSquare`] if `a` is not square.
/// - [`LinalgError::InvalidParameter`] if `tol` is not positive and finite,
///   or `max_iter` is zero.
/// - [`LinalgError::RankDeficient`] if an iterate cannot be factorized
///   (singular input).
///
/// Non-convergence is reported through [`EigenEstimate::converged`].
///
/// ```
/// use gramqr::DynMatrix;
/// use gramqr::linalg::qr_eigenvalues;
///
/// let a = DynMatrix::from_rows(3, 3, &[
///     4.0_f64, 1.0, 0.0,
///     1.0, 3.0, 1.0,
///     0.0, 1.0, 2.0,
/// ]);
/// let est = qr_eigenvalues(&a, 1e-12, 1000).unwrap();
/// assert!(est.converged);
/// let s3 = 3.0_f64.sqrt();
/// let expected = [3.0 - s3, 3.0, 3.0 + s3];
/// for (got, want) in est.sorted().iter().zip(expected) {
///     assert!((got - want).abs() < 1e-9);
/// }
/// ```
pub fn qr_eigenvalues<T: FloatScalar>(
    a: &DynMatrix<T>,
    tol: T,
    max_iter: usize,
) -> Result<EigenEstimate<T>, LinalgError> {
    let options = QrIterationOptions::new(tol, max_iter);
    QrIteration::new(a)?.run(&options)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_near(a: f64, b: f64, tol: f64, msg: &str) {
        assert!((a - b).abs() < tol, "{}: {} vs {} (diff {})", msg, a, b, (a - b).abs());
    }

    #[test]
    fn symmetric_2x2() {
        let a = DynMatrix::from_rows(2, 2, &[2.0, 1.0, 1.0, 2.0]);
        let est = qr_eigenvalues(&a, 1e-12, 1000).unwrap();
        assert!(est.converged);
        assert!(est.diff <= 1e-12);
        assert!(est.iterations > 1 && est.iterations < 1000);
        // Diagonal ends up ordered by decreasing magnitude.
        assert_near(est.eigenvalues[0], 3.0, 1e-10, "lambda0");
        assert_near(est.eigenvalues[1], 1.0, 1e-10, "lambda1");
    }

    #[test]
    fn nonsymmetric_real_eigenvalues() {
        // Eigenvalues 5 and 2.
        let a = DynMatrix::from_rows(2, 2, &[4.0, 1.0, 2.0, 3.0]);
        let est = qr_eigenvalues(&a, 1e-12, 1000).unwrap();
        assert!(est.converged);
        let sorted = est.sorted();
        assert_near(sorted[0], 2.0, 1e-9, "lambda_min");
        assert_near(sorted[1], 5.0, 1e-9, "lambda_max");
    }

    #[test]
    fn negative_eigenvalues() {
        // Eigenvalues -4 and 1.
        let a = DynMatrix::from_rows(2, 2, &[-3.0, 2.0, 2.0, 0.0]);
        let est = qr_eigenvalues(&a, 1e-12, 1000).unwrap();
        let sorted = est.sorted();
        assert_near(sorted[0], -4.0, 1e-9, "lambda_min");
        assert_near(sorted[1], 1.0, 1e-9, "lambda_max");
    }

    #[test]
    fn triangular_input_is_a_fixed_point_on_the_diagonal() {
        let a = DynMatrix::from_rows(3, 3, &[3.0, 1.0, 2.0, 0.0, 2.0, 1.0, 0.0, 0.0, 1.0]);
        let est = qr_eigenvalues(&a, 1e-12, 10).unwrap();
        assert!(est.converged);
        assert_eq!(est.iterations, 1);
        assert_eq!(est.eigenvalues, vec![3.0, 2.0, 1.0]);
    }

    #[test]
    fn tiny_eigenvalue_is_not_mistaken_for_singularity() {
        let a = DynMatrix::from_rows(2, 2, &[1.0, 1.0, 0.0, 1e-9]);
        let est = qr_eigenvalues(&a, 1e-12, 100).unwrap();
        assert!(est.converged);
        assert_near(est.eigenvalues[0], 1.0, 1e-12, "lambda0");
        assert_near(est.eigenvalues[1] / 1e-9, 1.0, 1e-6, "lambda1");
    }

    #[test]
    fn budget_exhaustion_is_not_an_error() {
        let a = DynMatrix::from_rows(2, 2, &[2.0, 1.0, 1.0, 3.0]);
        let est = qr_eigenvalues(&a, 1e-12, 1).unwrap();
        assert!(!est.converged);
        assert_eq!(est.iterations, 1);
        assert!(est.diff > 1e-12);
        assert_eq!(est.eigenvalues.len(), 2);
        // Trace is preserved even before convergence.
        assert_near(est.eigenvalues[0] + est.eigenvalues[1], 5.0, 1e-12, "trace");
    }

    #[test]
    fn complex_pair_leaves_2x2_block() {
        // Rotation by 90 degrees: eigenvalues ±i. QR of a rotation is the
        // rotation itself with R = I, so the iteration stalls immediately.
        let a = DynMatrix::from_rows(2, 2, &[0.0, -1.0, 1.0, 0.0]);
        let mut it = QrIteration::new(&a).unwrap();
        let est = it.run(&QrIterationOptions::new(1e-12, 50)).unwrap();
        assert!(est.converged);
        assert_eq!(it.current().subdiagonal_norm(), 1.0);
        assert_eq!(est.eigenvalues, vec![0.0, 0.0]);
    }

    #[test]
    fn step_preserves_trace_and_determinant() {
        let a = DynMatrix::from_rows(3, 3, &[2.0, -1.0, 0.5, 1.0, 3.0, 1.0, 0.0, 2.0, 4.0]);
        let trace = a.trace();
        let det = a.det();
        let mut it = QrIteration::new(&a).unwrap();
        for _ in 0..20 {
            it.step().unwrap();
            assert_near(it.current().trace(), trace, 1e-10, "trace");
            assert_near(it.current().det(), det, 1e-8, "det");
        }
        assert_eq!(it.iterations(), 20);
    }

    #[test]
    fn modified_variant_agrees() {
        let a = DynMatrix::from_rows(3, 3, &[4.0, 1.0, 0.0, 1.0, 3.0, 1.0, 0.0, 1.0, 2.0]);
        let classical = qr_eigenvalues(&a, 1e-12, 1000).unwrap();
        let options = QrIterationOptions {
            variant: GramSchmidtVariant::Modified,
            ..QrIterationOptions::new(1e-12, 1000)
        };
        let modified = QrIteration::new(&a).unwrap().run(&options).unwrap();
        for (c, m) in classical.sorted().iter().zip(modified.sorted()) {
            assert_near(*c, m, 1e-10, "eigenvalue");
        }
    }

    #[test]
    fn not_square() {
        let a = DynMatrix::<f64>::zeros(2, 3);
        assert_eq!(
            qr_eigenvalues(&a, 1e-12, 10).unwrap_err(),
            LinalgError::NotSquare { nrows: 2, ncols: 3 }
        );
        // Shape is checked before parameters.
        assert_eq!(
            qr_eigenvalues(&a, -1.0, 0).unwrap_err(),
            LinalgError::NotSquare { nrows: 2, ncols: 3 }
        );
    }

    #[test]
    fn invalid_parameters() {
        let a = DynMatrix::<f64>::eye(2);
        for tol in [0.0, -1e-3, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                qr_eigenvalues(&a, tol, 10),
                Err(LinalgError::InvalidParameter(_))
            ));
        }
        assert!(matches!(
            qr_eigenvalues(&a, 1e-12, 0),
            Err(LinalgError::InvalidParameter(_))
        ));
    }

    #[test]
    fn singular_input_fails_without_changing_state() {
        let a = DynMatrix::from_rows(2, 2, &[1.0, 2.0, 2.0, 4.0]);
        let mut it = QrIteration::new(&a).unwrap();
        assert_eq!(it.step().unwrap_err(), LinalgError::RankDeficient { column: 1 });
        assert_eq!(it.current(), &a);
        assert_eq!(it.iterations(), 0);
    }

    #[test]
    fn default_options() {
        let opts = QrIterationOptions::<f64>::default();
        assert_eq!(opts.tol, 1e-12);
        assert_eq!(opts.max_iter, 1000);
        assert_eq!(opts.variant, GramSchmidtVariant::Classical);
        let opts32 = QrIterationOptions::<f32>::default();
        assert!(opts32.tol > f32::EPSILON);
    }

    #[test]
    fn sorted_puts_nan_last() {
        let est = EigenEstimate {
            eigenvalues: vec![f64::NAN, 2.0, -1.0],
            iterations: 1,
            converged: false,
            diff: 1.0,
        };
        let s = est.sorted();
        assert_eq!(&s[..2], &[-1.0, 2.0]);
        assert!(s[2].is_nan());
    }

    #[test]
    fn empty_matrix() {
        let a = DynMatrix::<f64>::zeros(0, 0);
        let est = qr_eigenvalues(&a, 1e-12, 5).unwrap();
        assert!(est.converged);
        assert!(est.eigenvalues.is_empty());
    }
}
