//! Builders that turn data points into a linear system, solve it with the `linear` crate, and
//! wrap the solution as an evaluable model: natural cubic splines (tridiagonal system) and
//! least-squares polynomials (dense normal equations).

use thiserror::Error;

pub mod least_squares;
pub mod spline;

pub use least_squares::Polynomial;
pub use spline::{CubicSpline, Segment};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    #[error("At least {needed} points are required, got {found}")]
    TooFewPoints { needed: usize, found: usize },

    #[error("x has {x_len} values but y has {y_len}")]
    LengthMismatch { x_len: usize, y_len: usize },

    /// The nodes of a spline must be strictly increasing.
    #[error("x values must be strictly increasing (index {index})")]
    NotIncreasing { index: usize },

    /// The spline nodes do not pair up with the segments (`knots == segments + 1`).
    #[error("A spline with {knots} knots cannot have {segments} segments")]
    MalformedSpline { knots: usize, segments: usize },

    /// `t`, `lo` and `hi` are converted to `f64` for display; a value with no `f64`
    /// representation is reported as NaN.
    #[error("The point {t} lies outside the interpolation interval [{lo}, {hi}]")]
    OutOfRange { t: f64, lo: f64, hi: f64 },

    /// The underlying system could not be solved. Never retried.
    #[error(transparent)]
    Linear(#[from] linear::Error),
}

pub(crate) fn check_lengths(x_len: usize, y_len: usize) -> Result<(), Error> {
    if x_len == y_len {
        Ok(())
    } else {
        Err(Error::LengthMismatch { x_len, y_len })
    }
}
