use crate::linalg::LinalgError;
use crate::traits::{FloatScalar, MatrixMut, MatrixRef};
use crate::DynMatrix;

fn check_shapes<T>(q: &impl MatrixRef<T>, r: &impl MatrixRef<T>) -> Result<(), LinalgError> {
    let n = q.nrows();
    if q.ncols() != n {
        return Err(LinalgError::ShapeMismatch {
            expected: (n, n),
            got: (n, q.ncols()),
        });
    }
    if r.nrows() != n {
        return Err(LinalgError::ShapeMismatch {
            expected: (n, r.ncols()),
            got: (r.nrows(), r.ncols()),
        });
    }
    Ok(())
}

/// Normalize the signs of a QR factorization in place.
///
/// Computes `D = diag(sign(Q[i, i]))` (a zero diagonal entry counts as `+1`)
/// and replaces `Q ← Q D`, `R ← D R`: column `i` of `Q` and row `i` of `R`
/// are negated together whenever `Q[i, i] < 0`. The product `Q R` is
/// unchanged. Afterwards every diagonal entry of `Q` is non-negative, so a
/// second call is a no-op.
///
/// Returns the number of flipped columns.
///
/// # Errors
///
/// [`LinalgError::ShapeMismatch`] if `q` is not square or `r` does not have
/// as many rows as `q`. Nothing is modified in that case.
pub fn adjust_sign_in_place<T: FloatScalar>(
    q: &mut impl MatrixMut<T>,
    r: &mut impl MatrixMut<T>,
) -> Result<usize, LinalgError> {
    check_shapes(&*q, &*r)?;
    Ok(flip_signs(q, r))
}

/// The sign flip itself, for callers whose shapes are already known to agree.
pub(crate) fn flip_signs<T: FloatScalar>(
    q: &mut impl MatrixMut<T>,
    r: &mut impl MatrixMut<T>,
) -> usize {
    debug_assert!(q.nrows() == q.ncols() && r.nrows() == q.nrows());
    let mut flipped = 0;
    for i in 0..q.nrows() {
        if *q.get(i, i) < T::zero() {
            for x in q.col_as_mut_slice(i, 0) {
                *x = -*x;
            }
            for j in 0..r.ncols() {
                let v = r.get_mut(i, j);
                *v = -*v;
            }
            flipped += 1;
        }
    }
    flipped
}

/// Sign-normalized copies of `(q, r)`.
///
/// See [`adjust_sign_in_place`].
///
/// ```
/// use gramqr::DynMatrix;
/// use gramqr::linalg::{adjust_sign, gram_schmidt};
///
/// let a = DynMatrix::from_rows(2, 2, &[1.0_f64, 3.0, 2.0, 0.0]);
/// let (q, r) = gram_schmidt(&a).unwrap();
/// let (q, r) = adjust_sign(&q, &r).unwrap();
/// assert!(q.diagonal().iter().all(|&d| d >= 0.0));
/// assert!((&q * &r).max_abs_diff(&a) < 1e-12);
/// ```
pub fn adjust_sign<T: FloatScalar>(
    q: &DynMatrix<T>,
    r: &DynMatrix<T>,
) -> Result<(DynMatrix<T>, DynMatrix<T>), LinalgError> {
    check_shapes(q, r)?;
    let mut q = q.clone();
    let mut r = r.clone();
    flip_signs(&mut q, &mut r);
    Ok((q, r))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rotation(theta: f64) -> DynMatrix<f64> {
        let (s, c) = theta.sin_cos();
        DynMatrix::from_rows(2, 2, &[c, -s, s, c])
    }

    #[test]
    fn flips_negative_diagonal_columns() {
        // Q with Q[1,1] < 0
        let q = DynMatrix::from_rows(2, 2, &[0.6, 0.8, 0.8, -0.6]);
        let r = DynMatrix::from_rows(2, 3, &[5.0, 1.0, 2.0, 0.0, 3.0, 4.0]);
        let (q2, r2) = adjust_sign(&q, &r).unwrap();

        assert_eq!(q2, DynMatrix::from_rows(2, 2, &[0.6, -0.8, 0.8, 0.6]));
        assert_eq!(r2, DynMatrix::from_rows(2, 3, &[5.0, 1.0, 2.0, -0.0, -3.0, -4.0]));
        assert!((&q2 * &r2).max_abs_diff(&(&q * &r)) < 1e-15);
    }

    #[test]
    fn idempotent() {
        let q = rotation(2.5);
        let r = DynMatrix::from_rows(2, 2, &[2.0, 1.0, 0.0, -1.0]);
        let once = adjust_sign(&q, &r).unwrap();
        let twice = adjust_sign(&once.0, &once.1).unwrap();
        assert_eq!(once, twice);
        assert!(once.0.diagonal().iter().all(|&d| d >= 0.0));
    }

    #[test]
    fn in_place_reports_flips() {
        let mut q = DynMatrix::from_rows(2, 2, &[-1.0, 0.0, 0.0, -1.0]);
        let mut r = DynMatrix::from_rows(2, 2, &[1.0, 2.0, 0.0, 3.0]);
        assert_eq!(adjust_sign_in_place(&mut q, &mut r).unwrap(), 2);
        assert_eq!(q, DynMatrix::eye(2));
        assert_eq!(r, DynMatrix::from_rows(2, 2, &[-1.0, -2.0, -0.0, -3.0]));
        assert_eq!(adjust_sign_in_place(&mut q, &mut r).unwrap(), 0);
    }

    #[test]
    fn zero_diagonal_is_not_flipped() {
        // Permutation matrix: zero diagonal, nothing to flip.
        let q = DynMatrix::from_rows(2, 2, &[0.0, 1.0, 1.0, 0.0]);
        let r = DynMatrix::from_rows(2, 2, &[1.0, 2.0, 0.0, 3.0]);
        let (q2, r2) = adjust_sign(&q, &r).unwrap();
        assert_eq!(q2, q);
        assert_eq!(r2, r);
    }

    #[test]
    fn non_square_q_rejected() {
        let q = DynMatrix::<f64>::zeros(3, 2);
        let r = DynMatrix::<f64>::zeros(3, 3);
        assert_eq!(
            adjust_sign(&q, &r).unwrap_err(),
            LinalgError::ShapeMismatch { expected: (3, 3), got: (3, 2) }
        );
    }

    #[test]
    fn r_row_count_mismatch_rejected() {
        let mut q = DynMatrix::<f64>::eye(2);
        q[(0, 0)] = -1.0;
        let mut r = DynMatrix::<f64>::zeros(3, 4);
        assert_eq!(
            adjust_sign_in_place(&mut q, &mut r).unwrap_err(),
            LinalgError::ShapeMismatch { expected: (2, 4), got: (3, 4) }
        );
        // untouched on error
        assert_eq!(q[(0, 0)], -1.0);
    }
}
