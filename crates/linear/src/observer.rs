use std::fmt::Write;

use log::{log_enabled, trace, Level};
use nalgebra::{Dim, Matrix, RealField, Scalar, Storage, U1};

/// Receives the intermediate state of a solve, for step-by-step display.
///
/// Every method has a no-op default, so an implementor only overrides what it wants to see. The
/// solvers never depend on what an observer does; `()` is the observer used by the plain `solve`
/// entry points.
pub trait Observer<T: Scalar> {
    /// Gaussian elimination step `step` picked `pivot_row` (`!= step`) and swapped it into place.
    fn row_swap(&mut self, _step: usize, _pivot_row: usize) {}

    /// Gaussian elimination step `step` finished: every entry below `mat_a[(step, step)]` is
    /// zero. `mat_a` and `b` are the working copies, not the caller's data.
    fn eliminated<R, C, SA, SB>(
        &mut self,
        _step: usize,
        _mat_a: &Matrix<T, R, C, SA>,
        _b: &Matrix<T, R, U1, SB>,
    ) where
        R: Dim,
        C: Dim,
        SA: Storage<T, R, C>,
        SB: Storage<T, R>,
    {
    }

    /// Thomas forward sweep computed the coefficients `u = U[row]` and `v = V[row]`.
    fn sweep(&mut self, _row: usize, _u: T, _v: T) {}

    /// Thomas back substitution produced `x[row]`.
    fn back_substitution(&mut self, _row: usize, _x: T) {}
}

impl<T: Scalar> Observer<T> for () {}

/// An [`Observer`] that forwards every event to the `log` facade at `trace` level.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogTrace;

impl<T: RealField + Copy> Observer<T> for LogTrace {
    fn row_swap(&mut self, step: usize, pivot_row: usize) {
        trace!("gauss step {step}: swap rows {step} <-> {pivot_row}");
    }

    fn eliminated<R, C, SA, SB>(
        &mut self,
        step: usize,
        mat_a: &Matrix<T, R, C, SA>,
        b: &Matrix<T, R, U1, SB>,
    ) where
        R: Dim,
        C: Dim,
        SA: Storage<T, R, C>,
        SB: Storage<T, R>,
    {
        if !log_enabled!(Level::Trace) {
            return;
        }
        trace!("gauss step {step}:");
        for (i, row) in mat_a.row_iter().enumerate() {
            let mut line = String::new();
            for a_ij in row.iter() {
                let _ = write!(line, "{a_ij:>14.6}");
            }
            trace!("  {line} | {:>14.6}", b[i]);
        }
    }

    fn sweep(&mut self, row: usize, u: T, v: T) {
        trace!("thomas sweep {row}: U={u:.6}, V={v:.6}");
    }

    fn back_substitution(&mut self, row: usize, x: T) {
        trace!("thomas back substitution {row}: x={x:.6}");
    }
}
