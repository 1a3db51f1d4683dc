//! # gramqr
//!
//! QR factorization by Gram-Schmidt orthogonalization, a deterministic sign
//! convention for the factors, and unshifted QR iteration for eigenvalue
//! estimates of square matrices. Pure Rust, no-std compatible (needs
//! `alloc`).
//!
//! ## Quick start
//!
//! ```
//! use gramqr::DynMatrix;
//! use gramqr::linalg::{adjust_sign, gram_schmidt};
//!
//! let a = DynMatrix::from_rows(2, 3, &[
//!     1.0_f64, 3.0, 4.0,
//!     2.0, 0.0, 9.0,
//! ]);
//! let (q, r) = gram_schmidt(&a).unwrap();
//! let (q, r) = adjust_sign(&q, &r).unwrap();
//! assert!(q.diagonal().iter().all(|&d| d >= 0.0));
//! assert!((&q * &r).max_abs_diff(&a) < 1e-12);
//!
//! let s = DynMatrix::from_rows(2, 2, &[2.0_f64, 1.0, 1.0, 2.0]);
//! let est = s.qr_eigenvalues(1e-12, 1000).unwrap();
//! assert!(est.converged);
//! assert!((est.eigenvalues[0] - 3.0).abs() < 1e-10);
//! ```
//!
//! ## Modules
//!
//! - [`dynmatrix`] — Heap-allocated `DynMatrix<T>` with runtime dimensions.
//!   Column-major `Vec<T>` storage, so Gram-Schmidt works on contiguous
//!   columns. Products, transpose, norms, diagonal and triangularity checks,
//!   plus the [`GramSchmidtQr`] wrapper and `a.gram_schmidt()` /
//!   `a.qr_eigenvalues(..)` convenience methods.
//!
//! - [`linalg`] — The algorithms as free functions:
//!   [`gram_schmidt`](linalg::gram_schmidt) (classical or modified),
//!   [`adjust_sign`](linalg::adjust_sign) (non-negative diagonal of `Q`),
//!   [`QrIteration`](linalg::QrIteration) /
//!   [`qr_eigenvalues`](linalg::qr_eigenvalues) (unshifted QR iteration),
//!   and the [`LinalgError`](linalg::LinalgError) type.
//!
//! - [`traits`] — Element trait hierarchy:
//!   - [`Scalar`] — all matrix elements (`Copy + PartialEq + Debug + Zero + One + Num`)
//!   - [`FloatScalar`] — real floats, used by every algorithm
//!   - [`MatrixRef`] / [`MatrixMut`] — generic read/write access for algorithms
//!
//! ## Limitations
//!
//! Gram-Schmidt is not as stable as Householder or Givens QR, and nearly
//! dependent columns are rejected with
//! [`LinalgError::RankDeficient`](linalg::LinalgError::RankDeficient).
//! QR iteration is unshifted: it resolves real eigenvalues of distinct
//! magnitude, while complex conjugate pairs remain as 2×2 diagonal blocks.
//!
//! ## Logging
//!
//! Diagnostics go through the [`log`](https://docs.rs/log) facade: `debug`
//! for rank-deficient columns and the outcome of each QR iteration run,
//! `trace` for every iteration step. Install any logger to see them.
//!
//! ## Cargo features
//!
//! | Feature   | Default  | Description |
//! |-----------|----------|-------------|
//! | `std`     | yes      | Hardware FPU via system libm, `std::error::Error` for `LinalgError` |
//! | `libm`    | no       | Pure-Rust software float fallback for `no_std` targets |

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod dynmatrix;
pub mod linalg;
pub mod traits;

pub use dynmatrix::{DynMatrix, GramSchmidtQr};
pub use linalg::LinalgError;
pub use traits::{FloatScalar, MatrixMut, MatrixRef, Scalar};
