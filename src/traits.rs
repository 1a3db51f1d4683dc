use core::fmt::Debug;
use num_traits::{Float, Num, NumCast, One, Zero};

/// Trait for types that can be used as matrix elements.
///
/// Blanket-implemented for all types satisfying the bounds.
/// Covers `f32`, `f64`, and all integer types.
pub trait Scalar: Copy + PartialEq + Debug + Zero + One + Num {}

impl<T: Copy + PartialEq + Debug + Zero + One + Num> Scalar for T {}

/// Trait for floating-point matrix elements.
///
/// Required by everything that needs `sqrt`, `abs`, or a machine epsilon:
/// norms, Gram-Schmidt orthogonalization, QR iteration.
pub trait FloatScalar: Scalar + Float {
    /// Default relative tolerance below which a Gram-Schmidt residual of an
    /// `n`-row column counts as vanished: `16 * n * epsilon`, the scale of
    /// the rounding error left by projecting out a dependent column.
    #[inline]
    fn default_rank_tol(n: usize) -> Self {
        let scale = <Self as NumCast>::from(16 * n.max(1)).unwrap_or_else(Self::one);
        scale * Self::epsilon()
    }

    /// Default convergence tolerance for QR iteration:
    /// `max(1e-12, 1000 * epsilon)`.
    #[inline]
    fn default_iteration_tol() -> Self {
        let floor = Self::epsilon() * <Self as NumCast>::from(1000.0).unwrap_or_else(Self::one);
        let requested = <Self as NumCast>::from(1e-12).unwrap_or(floor);
        if requested > floor {
            requested
        } else {
            floor
        }
    }
}

impl<T: Scalar + Float> FloatScalar for T {}

/// Read-only access to a matrix-like type.
///
/// Storage is column-major: a column starting at any row is a contiguous
/// slice, which is what the orthogonalization kernels iterate over.
pub trait MatrixRef<T> {
    fn nrows(&self) -> usize;
    fn ncols(&self) -> usize;
    fn get(&self, row: usize, col: usize) -> &T;

    /// Column `col` from `row_start` to the last row, as a contiguous slice.
    fn col_as_slice(&self, col: usize, row_start: usize) -> &[T];
}

/// Mutable access to a matrix-like type.
///
/// Extends `MatrixRef` with mutable element access, enabling
/// in-place algorithms (sign normalization, orthogonalization) to work
/// generically.
pub trait MatrixMut<T>: MatrixRef<T> {
    fn get_mut(&mut self, row: usize, col: usize) -> &mut T;

    /// Mutable counterpart of [`MatrixRef::col_as_slice`].
    fn col_as_mut_slice(&mut self, col: usize, row_start: usize) -> &mut [T];
}
