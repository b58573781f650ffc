//! Thomas algorithm for tridiagonal systems.
//!
//! The system is given by its three diagonals, all of length `n`:
//!
//! ```text
//! | b[0] c[0]                    | |  x[0]  |   |  d[0]  |
//! | a[1] b[1] c[1]               | |  x[1]  |   |  d[1]  |
//! |      ...  ...  ...           | |  ...   | = |  ...   |
//! |           a[n-1]   b[n-1]    | | x[n-1] |   | d[n-1] |
//! ```
//!
//! `a[0]` and `c[n-1]` lie outside the matrix and are never read.
use log::debug;
use nalgebra::{
    allocator::Allocator, DefaultAllocator, Dim, Matrix, OVector, RealField, Storage, StorageMut,
    U1,
};

#[cfg(feature = "serde-serialize")]
use serde::{Deserialize, Serialize};

use crate::{check_len, Error, Observer, DEFAULT_PIVOT_TOL};

/// Solves the tridiagonal system `(a, b, c) x = d` with the default pivot tolerance. None of the
/// inputs is modified.
pub fn solve_tridiagonal<T, D, SA, SB, SC, SD>(
    a: &Matrix<T, D, U1, SA>,
    b: &Matrix<T, D, U1, SB>,
    c: &Matrix<T, D, U1, SC>,
    d: &Matrix<T, D, U1, SD>,
) -> Result<OVector<T, D>, Error>
where
    T: RealField + Copy,
    D: Dim,
    SA: Storage<T, D>,
    SB: Storage<T, D>,
    SC: Storage<T, D>,
    SD: Storage<T, D>,
    DefaultAllocator: Allocator<T, D>,
{
    Thomas::new().solve(a, b, c, d)
}

/// O(n) forward-elimination / back-substitution solver for tridiagonal systems.
///
/// The forward sweep computes `x[i] = U[i] x[i+1] + V[i]`; a reduced denominator
/// `a[i] U[i-1] + b[i]` with magnitude `<= pivot_tol` fails the solve with `ZeroPivot`. Such a
/// denominator is a property of the matrix, so the failure is final for that input.
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[cfg_attr(
    feature = "serde-serialize",
    serde(
        try_from = "crate::PivotTolerance<T>",
        bound(deserialize = "T: RealField + Copy + Deserialize<'de>")
    )
)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Thomas<T> {
    pivot_tol: T,
}

#[cfg(feature = "serde-serialize")]
impl<T: RealField + Copy> TryFrom<crate::PivotTolerance<T>> for Thomas<T> {
    type Error = Error;

    fn try_from(raw: crate::PivotTolerance<T>) -> Result<Self, Error> {
        Ok(Thomas {
            pivot_tol: raw.validate()?,
        })
    }
}

impl<T: RealField + Copy> Default for Thomas<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: RealField + Copy> Thomas<T> {
    pub fn new() -> Self {
        Thomas {
            pivot_tol: nalgebra::convert(DEFAULT_PIVOT_TOL),
        }
    }

    pub fn with_pivot_tol(pivot_tol: T) -> Self {
        Thomas {
            pivot_tol: pivot_tol.abs(),
        }
    }

    pub fn pivot_tol(&self) -> T {
        self.pivot_tol
    }

    pub fn solve<D, SA, SB, SC, SD>(
        &self,
        a: &Matrix<T, D, U1, SA>,
        b: &Matrix<T, D, U1, SB>,
        c: &Matrix<T, D, U1, SC>,
        d: &Matrix<T, D, U1, SD>,
    ) -> Result<OVector<T, D>, Error>
    where
        D: Dim,
        SA: Storage<T, D>,
        SB: Storage<T, D>,
        SC: Storage<T, D>,
        SD: Storage<T, D>,
        DefaultAllocator: Allocator<T, D>,
    {
        self.solve_observed(a, b, c, d, &mut ())
    }

    /// Like [`Thomas::solve`], reporting the sweep coefficients and the solution to `observer`.
    pub fn solve_observed<D, SA, SB, SC, SD, O>(
        &self,
        a: &Matrix<T, D, U1, SA>,
        b: &Matrix<T, D, U1, SB>,
        c: &Matrix<T, D, U1, SC>,
        d: &Matrix<T, D, U1, SD>,
        observer: &mut O,
    ) -> Result<OVector<T, D>, Error>
    where
        D: Dim,
        SA: Storage<T, D>,
        SB: Storage<T, D>,
        SC: Storage<T, D>,
        SD: Storage<T, D>,
        O: Observer<T>,
        DefaultAllocator: Allocator<T, D>,
    {
        let mut u = c.clone_owned();
        let mut x = d.clone_owned();
        self.solve_in_place(a, b, &mut u, &mut x, observer)?;
        Ok(x)
    }

    /// Solves the system reusing the caller's `c` and `d`.
    ///
    /// On success `c` holds the sweep coefficients `U` and `d` holds the solution `x`. On a
    /// `ZeroPivot` error both are partially overwritten. A `DimensionMismatch` is detected before
    /// anything is written.
    pub fn solve_in_place<D, SA, SB, SC, SD, O>(
        &self,
        a: &Matrix<T, D, U1, SA>,
        b: &Matrix<T, D, U1, SB>,
        c: &mut Matrix<T, D, U1, SC>,
        d: &mut Matrix<T, D, U1, SD>,
        observer: &mut O,
    ) -> Result<(), Error>
    where
        D: Dim,
        SA: Storage<T, D>,
        SB: Storage<T, D>,
        SC: StorageMut<T, D>,
        SD: StorageMut<T, D>,
        O: Observer<T>,
    {
        let n = b.nrows();
        check_len("sub-diagonal", n, a.nrows())?;
        check_len("super-diagonal", n, c.nrows())?;
        check_len("right-hand side", n, d.nrows())?;
        if n == 0 {
            return Ok(());
        }

        // forward sweep: U in c, V in d
        let denom = b[0];
        if !(denom.abs() > self.pivot_tol) {
            debug!("Thomas: zero pivot {denom} in row 0");
            return Err(Error::ZeroPivot { row: 0 });
        }
        c[0] = if n > 1 { -c[0] / denom } else { T::zero() };
        d[0] /= denom;
        observer.sweep(0, c[0], d[0]);

        for i in 1..n {
            let denom = a[i] * c[i - 1] + b[i];
            if !(denom.abs() > self.pivot_tol) {
                debug!("Thomas: zero pivot {denom} in row {i}");
                return Err(Error::ZeroPivot { row: i });
            }
            // c[n-1] lies outside the matrix
            c[i] = if i + 1 < n { -c[i] / denom } else { T::zero() };
            let v_prev = d[i - 1];
            d[i] = (d[i] - a[i] * v_prev) / denom;
            observer.sweep(i, c[i], d[i]);
        }

        // back substitution: x[n-1] = V[n-1], x[i] = U[i] x[i+1] + V[i]
        observer.back_substitution(n - 1, d[n - 1]);
        for i in (0..n - 1).rev() {
            let x_next = d[i + 1];
            d[i] += c[i] * x_next;
            observer.back_substitution(i, d[i]);
        }

        Ok(())
    }
}
