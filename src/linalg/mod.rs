pub(crate) mod gram_schmidt;
pub(crate) mod qr_iteration;
pub(crate) mod sign;

pub use gram_schmidt::{gram_schmidt, gram_schmidt_with, GramSchmidtOptions, GramSchmidtVariant};
pub use qr_iteration::{qr_eigenvalues, EigenEstimate, QrIteration, QrIterationOptions};
pub use sign::{adjust_sign, adjust_sign_in_place};

/// Errors from linear algebra operations.
///
/// Every fallible entry point checks its preconditions before doing any work,
/// so an error never comes with a partially computed result.
///
/// ```
/// use gramqr::DynMatrix;
/// use gramqr::linalg::LinalgError;
///
/// // Second column duplicates the first.
/// let a = DynMatrix::from_rows(2, 2, &[1.0_f64, 1.0, 2.0, 2.0]);
/// assert_eq!(a.gram_schmidt().unwrap_err(), LinalgError::RankDeficient { column: 1 });
///
/// let rect = DynMatrix::<f64>::zeros(2, 3);
/// assert_eq!(
///     rect.qr_eigenvalues(1e-12, 100).unwrap_err(),
///     LinalgError::NotSquare { nrows: 2, ncols: 3 },
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinalgError {
    /// Column `column` vanished during orthogonalization: it is (numerically)
    /// a linear combination of the columns before it.
    RankDeficient { column: usize },
    /// The operation requires a square matrix.
    NotSquare { nrows: usize, ncols: usize },
    /// Operand shapes are incompatible. `expected` is the shape the operation
    /// needed, `got` the shape it received.
    ShapeMismatch {
        expected: (usize, usize),
        got: (usize, usize),
    },
    /// A tolerance or iteration budget is out of range.
    InvalidParameter(&'static str),
}

impl core::fmt::Display for LinalgError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            LinalgError::RankDeficient { column } => {
                write!(f, "rank-deficient input: column {} is linearly dependent", column)
            }
            LinalgError::NotSquare { nrows, ncols } => {
                write!(f, "matrix is not square: {}x{}", nrows, ncols)
            }
            LinalgError::ShapeMismatch { expected, got } => write!(
                f,
                "shape mismatch: expected {}x{}, got {}x{}",
                expected.0, expected.1, got.0, got.1
            ),
            LinalgError::InvalidParameter(msg) => write!(f, "invalid parameter: {}", msg),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for LinalgError {}
