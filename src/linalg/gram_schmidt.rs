use alloc::vec;

use crate::dynmatrix::norm::{dot, norm2};
use crate::linalg::LinalgError;
use crate::traits::{FloatScalar, MatrixMut, MatrixRef};
use crate::DynMatrix;

/// Which projection the orthogonalization subtracts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GramSchmidtVariant {
    /// Project the original column: `u_i -= (a_i · e_j) e_j`.
    #[default]
    Classical,
    /// Project the running residual: `u_i -= (u_i · e_j) e_j`.
    ///
    /// Same result in exact arithmetic, loses less orthogonality on
    /// ill-conditioned input.
    Modified,
}

/// Tuning knobs for [`gram_schmidt_with`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GramSchmidtOptions<T> {
    pub variant: GramSchmidtVariant,
    /// Relative tolerance: column `i` is rank-deficient when
    /// `‖u_i‖ <= rank_tol * ‖a_i‖`. `None` uses `16 * n * epsilon` for an
    /// `n`-row input, so only columns that vanish up to rounding are rejected.
    pub rank_tol: Option<T>,
}

impl<T> Default for GramSchmidtOptions<T> {
    fn default() -> Self {
        Self {
            variant: GramSchmidtVariant::Classical,
            rank_tol: None,
        }
    }
}

impl<T> GramSchmidtOptions<T> {
    /// Options selecting the modified variant with the default tolerance.
    pub fn modified() -> Self {
        Self {
            variant: GramSchmidtVariant::Modified,
            rank_tol: None,
        }
    }
}

/// QR factorization by classical Gram-Schmidt.
///
/// `a` is `n × m` with `m >= n`. Returns `(Q, R)` where `Q` is `n × n` with
/// orthonormal columns built from the first `n` columns of `a`, and `R` is
/// `n × m` with `R[i, j] = a_j · q_i` for `j >= i` and exact zeros below the
/// diagonal. `Q * R` reproduces `a` up to rounding.
///
/// No sign convention is applied; see [`adjust_sign`](crate::linalg::adjust_sign).
///
/// # Errors
///
/// - [`LinalgError::ShapeMismatch`] if `a` has fewer columns than rows.
/// - [`LinalgError::RankDeficient`] if one of the first `n` columns is
///   (numerically) spanned by the columns before it.
///
/// # Example
///
/// ```
/// use gramqr::DynMatrix;
/// use gramqr::linalg::gram_schmidt;
///
/// let a = DynMatrix::from_rows(2, 3, &[1.0_f64, 3.0, 4.0, 2.0, 0.0, 9.0]);
/// let (q, r) = gram_schmidt(&a).unwrap();
/// assert_eq!(q.shape(), (2, 2));
/// assert_eq!(r.shape(), (2, 3));
/// assert!((&q * &r).max_abs_diff(&a) < 1e-12);
/// ```
pub fn gram_schmidt<T: FloatScalar>(
    a: &impl MatrixRef<T>,
) -> Result<(DynMatrix<T>, DynMatrix<T>), LinalgError> {
    gram_schmidt_with(a, &GramSchmidtOptions::default())
}

/// QR factorization by Gram-Schmidt with explicit options.
///
/// See [`gram_schmidt`] for the contract.
pub fn gram_schmidt_with<T: FloatScalar>(
    a: &impl MatrixRef<T>,
    options: &GramSchmidtOptions<T>,
) -> Result<(DynMatrix<T>, DynMatrix<T>), LinalgError> {
    let n = a.nrows();
    let m = a.ncols();
    if m < n {
        return Err(LinalgError::ShapeMismatch {
            expected: (n, n),
            got: (n, m),
        });
    }
    let rank_tol = options.rank_tol.unwrap_or_else(|| T::default_rank_tol(n));
    if !(rank_tol >= T::zero()) {
        return Err(LinalgError::InvalidParameter("rank_tol must be non-negative"));
    }

    let mut q = DynMatrix::zeros(n, n);
    let mut u = vec![T::zero(); n];

    for i in 0..n {
        let a_i = a.col_as_slice(i, 0);
        u.copy_from_slice(a_i);

        for j in 0..i {
            let e_j = q.col(j);
            let proj = match options.variant {
                GramSchmidtVariant::Classical => dot(a_i, e_j),
                GramSchmidtVariant::Modified => dot(&u, e_j),
            };
            for (u_k, &e_k) in u.iter_mut().zip(e_j) {
                *u_k = *u_k - proj * e_k;
            }
        }

        let norm = norm2(&u);
        // Also rejects NaN norms and all-zero columns.
        if !(norm > rank_tol * norm2(a_i)) {
            log::debug!(
                "gram-schmidt: column {} residual norm {:?} below tolerance",
                i,
                norm
            );
            return Err(LinalgError::RankDeficient { column: i });
        }

        let inv = T::one() / norm;
        for (q_k, &u_k) in q.col_as_mut_slice(i, 0).iter_mut().zip(&u) {
            *q_k = u_k * inv;
        }
    }

    let mut r = DynMatrix::zeros(n, m);
    for j in 0..m {
        let a_j = a.col_as_slice(j, 0);
        for i in 0..n.min(j + 1) {
            *r.get_mut(i, j) = dot(a_j, q.col(i));
        }
    }

    Ok((q, r))
}
