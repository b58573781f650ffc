//! Linear solver for general dense square systems.
//!
use log::debug;
use nalgebra::{
    allocator::Allocator, DefaultAllocator, Dim, Matrix, OVector, RealField, Storage, StorageMut,
    U1,
};

#[cfg(feature = "serde-serialize")]
use serde::{Deserialize, Serialize};

use crate::{check_len, Error, Observer, DEFAULT_PIVOT_TOL};

/// Solves `A x = b` by Gaussian elimination with partial pivoting, using the default pivot
/// tolerance. Neither `mat_a` nor `b` is modified.
pub fn solve_dense<T, R, C, SA, SB>(
    mat_a: &Matrix<T, R, C, SA>,
    b: &Matrix<T, R, U1, SB>,
) -> Result<OVector<T, R>, Error>
where
    T: RealField + Copy,
    R: Dim,
    C: Dim,
    SA: Storage<T, R, C>,
    SB: Storage<T, R>,
    DefaultAllocator: Allocator<T, R, C> + Allocator<T, R>,
{
    Gauss::new().solve(mat_a, b)
}

/// Gaussian elimination with partial (row) pivoting for square systems `A x = b`.
///
/// The only state is the pivot tolerance: after the pivot search in column `k`, the system is
/// reported singular when `|a(k,k)| <= pivot_tol`. The default tolerance is zero, which rejects
/// exact zeros only. Coursework-sized systems with entries of order one are well served by the
/// default; a caller that wants to reject numerically-singular systems should pass a tolerance
/// scaled to the magnitude of its matrix.
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[cfg_attr(
    feature = "serde-serialize",
    serde(
        try_from = "crate::PivotTolerance<T>",
        bound(deserialize = "T: RealField + Copy + Deserialize<'de>")
    )
)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Gauss<T> {
    pivot_tol: T,
}

#[cfg(feature = "serde-serialize")]
impl<T: RealField + Copy> TryFrom<crate::PivotTolerance<T>> for Gauss<T> {
    type Error = Error;

    fn try_from(raw: crate::PivotTolerance<T>) -> Result<Self, Error> {
        Ok(Gauss {
            pivot_tol: raw.validate()?,
        })
    }
}

impl<T: RealField + Copy> Default for Gauss<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: RealField + Copy> Gauss<T> {
    /// Creates a new dense solver with the default pivot tolerance.
    pub fn new() -> Self {
        Gauss {
            pivot_tol: nalgebra::convert(DEFAULT_PIVOT_TOL),
        }
    }

    /// Creates a new dense solver that rejects pivots with `|pivot| <= pivot_tol`.
    pub fn with_pivot_tol(pivot_tol: T) -> Self {
        Gauss {
            pivot_tol: pivot_tol.abs(),
        }
    }

    pub fn pivot_tol(&self) -> T {
        self.pivot_tol
    }

    /// Solves `A x = b` on private copies of `mat_a` and `b`.
    pub fn solve<R, C, SA, SB>(
        &self,
        mat_a: &Matrix<T, R, C, SA>,
        b: &Matrix<T, R, U1, SB>,
    ) -> Result<OVector<T, R>, Error>
    where
        R: Dim,
        C: Dim,
        SA: Storage<T, R, C>,
        SB: Storage<T, R>,
        DefaultAllocator: Allocator<T, R, C> + Allocator<T, R>,
    {
        self.solve_observed(mat_a, b, &mut ())
    }

    /// Like [`Gauss::solve`], reporting every row swap and elimination step to `observer`.
    pub fn solve_observed<R, C, SA, SB, O>(
        &self,
        mat_a: &Matrix<T, R, C, SA>,
        b: &Matrix<T, R, U1, SB>,
        observer: &mut O,
    ) -> Result<OVector<T, R>, Error>
    where
        R: Dim,
        C: Dim,
        SA: Storage<T, R, C>,
        SB: Storage<T, R>,
        O: Observer<T>,
        DefaultAllocator: Allocator<T, R, C> + Allocator<T, R>,
    {
        let mut work = mat_a.clone_owned();
        let mut x = b.clone_owned();
        self.solve_in_place(&mut work, &mut x, observer)?;
        Ok(x)
    }

    /// Solves `A x = b` directly in the caller's storage.
    ///
    /// On success `mat_a` holds the upper triangular factor `U` of the row-permuted system and `b`
    /// holds the solution `x`. On a `SingularMatrix` error both are left partially reduced. A
    /// `DimensionMismatch` is detected before anything is written.
    pub fn solve_in_place<R, C, SA, SB, O>(
        &self,
        mat_a: &mut Matrix<T, R, C, SA>,
        b: &mut Matrix<T, R, U1, SB>,
        observer: &mut O,
    ) -> Result<(), Error>
    where
        R: Dim,
        C: Dim,
        SA: StorageMut<T, R, C>,
        SB: StorageMut<T, R>,
        O: Observer<T>,
    {
        let n = mat_a.nrows();
        check_len("matrix columns", n, mat_a.ncols())?;
        check_len("right-hand side", n, b.nrows())?;

        // forward elimination, i-th step
        for i in 0..n {
            // find the pivot row, first one wins on ties
            let mut max_row = i;
            for k in (i + 1)..n {
                if mat_a[(k, i)].abs() > mat_a[(max_row, i)].abs() {
                    max_row = k;
                }
            }

            if max_row != i {
                mat_a.swap_rows(i, max_row);
                b.swap_rows(i, max_row);
                observer.row_swap(i, max_row);
            }

            // `!(x > tol)` so that a NaN pivot is rejected too
            let pivot = mat_a[(i, i)];
            if !(pivot.abs() > self.pivot_tol) {
                debug!("Gauss: singular matrix, pivot {pivot} in column {i}");
                return Err(Error::SingularMatrix { col: i });
            }

            // row_k = row_k - [a(k,i)/a(i,i)] row_i, k=i+1, ..., n-1
            for k in (i + 1)..n {
                let factor = mat_a[(k, i)] / pivot;
                mat_a[(k, i)] = T::zero();
                if factor == T::zero() {
                    continue;
                }
                for j in (i + 1)..n {
                    let a_ij = mat_a[(i, j)];
                    mat_a[(k, j)] -= factor * a_ij;
                }
                let b_i = b[i];
                b[k] -= factor * b_i;
            }

            observer.eliminated(i, &*mat_a, &*b);
        }

        // Solve Ux = y, store solution x in b
        for i in (0..n).rev() {
            let mut acc = b[i];
            for j in (i + 1)..n {
                acc -= mat_a[(i, j)] * b[j];
            }
            b[i] = acc / mat_a[(i, i)];
        }

        Ok(())
    }
}
