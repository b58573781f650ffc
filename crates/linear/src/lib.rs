//! Direct solvers for the two linear system shapes that show up under spline fitting and
//! least-squares approximation: general dense `N×N` systems (Gaussian elimination with partial
//! pivoting) and tridiagonal systems (the Thomas algorithm).
//!
//! Both solvers are pure functions of their inputs. The default entry points work on a private
//! copy of the caller's data; the `solve_in_place` variants are an explicit opt-in that reuse the
//! caller's storage instead.

mod dense;
mod observer;
mod residual;
mod tridiagonal;

pub use dense::{solve_dense, Gauss};
pub use observer::{LogTrace, Observer};
pub use residual::{dense_residual, max_abs, tridiagonal_residual};
pub use tridiagonal::{solve_tridiagonal, Thomas};

use thiserror::Error;

#[cfg(feature = "serde-serialize")]
use nalgebra::RealField;
#[cfg(feature = "serde-serialize")]
use serde::Deserialize;

/// Pivot tolerance used by [`solve_dense`] and [`solve_tridiagonal`]. A pivot is rejected when
/// its magnitude is `<=` the tolerance, so the default only rejects exact zeros.
pub const DEFAULT_PIVOT_TOL: f64 = 0.0;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// Input lengths are inconsistent with each other. Always a caller bug.
    #[error("Dimension mismatch: {what} has length {found}, expected {expected}")]
    DimensionMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },

    /// No usable pivot remained in column `col` after the partial-pivot search.
    #[error("A singular matrix was encountered during Gaussian elimination (col {col})")]
    SingularMatrix { col: usize },

    /// The reduced diagonal vanished at `row` during the forward sweep.
    #[error("A zero pivot was encountered during the tridiagonal forward sweep (row {row})")]
    ZeroPivot { row: usize },

    /// A deserialized solver carried a NaN or infinite pivot tolerance.
    #[error("The pivot tolerance must be finite")]
    InvalidPivotTol,
}

/// Serialized form of [`Gauss`] and [`Thomas`], checked on the way in.
#[cfg(feature = "serde-serialize")]
#[derive(Deserialize)]
pub(crate) struct PivotTolerance<T> {
    pivot_tol: T,
}

#[cfg(feature = "serde-serialize")]
impl<T: RealField + Copy> PivotTolerance<T> {
    /// The tolerance as `with_pivot_tol` would store it; NaN and infinities are rejected.
    pub(crate) fn validate(self) -> Result<T, Error> {
        if self.pivot_tol.is_finite() {
            Ok(self.pivot_tol.abs())
        } else {
            Err(Error::InvalidPivotTol)
        }
    }
}

/// Returns `Err(DimensionMismatch)` unless `found == expected`.
pub(crate) fn check_len(what: &'static str, expected: usize, found: usize) -> Result<(), Error> {
    if expected == found {
        Ok(())
    } else {
        log::debug!("{what}: expected length {expected}, found {found}");
        Err(Error::DimensionMismatch {
            what,
            expected,
            found,
        })
    }
}
