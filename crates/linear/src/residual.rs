//! Residuals `b - A x` for checking a computed solution against the system it came from.
use nalgebra::{
    allocator::Allocator, DefaultAllocator, Dim, Matrix, OVector, RealField, Storage, U1,
};
use num_traits::Zero;

use crate::{check_len, Error};

/// Computes `b - A x` for a dense square system.
pub fn dense_residual<T, R, C, SA, SX, SB>(
    mat_a: &Matrix<T, R, C, SA>,
    x: &Matrix<T, R, U1, SX>,
    b: &Matrix<T, R, U1, SB>,
) -> Result<OVector<T, R>, Error>
where
    T: RealField + Copy,
    R: Dim,
    C: Dim,
    SA: Storage<T, R, C>,
    SX: Storage<T, R>,
    SB: Storage<T, R>,
    DefaultAllocator: Allocator<T, R>,
{
    let n = mat_a.nrows();
    check_len("matrix columns", n, mat_a.ncols())?;
    check_len("solution", n, x.nrows())?;
    check_len("right-hand side", n, b.nrows())?;

    let mut r = b.clone_owned();
    for (i, row) in mat_a.row_iter().enumerate() {
        let ax_i = row
            .iter()
            .zip(x.iter())
            .fold(Zero::zero(), |acc: T, (&a_ij, &x_j)| acc + a_ij * x_j);
        r[i] -= ax_i;
    }
    Ok(r)
}

/// Computes `d - A x` for the tridiagonal `A` given by `(a, b, c)`. `a[0]` and `c[n-1]` are not
/// read.
pub fn tridiagonal_residual<T, D, SA, SB, SC, SD, SX>(
    a: &Matrix<T, D, U1, SA>,
    b: &Matrix<T, D, U1, SB>,
    c: &Matrix<T, D, U1, SC>,
    d: &Matrix<T, D, U1, SD>,
    x: &Matrix<T, D, U1, SX>,
) -> Result<OVector<T, D>, Error>
where
    T: RealField + Copy,
    D: Dim,
    SA: Storage<T, D>,
    SB: Storage<T, D>,
    SC: Storage<T, D>,
    SD: Storage<T, D>,
    SX: Storage<T, D>,
    DefaultAllocator: Allocator<T, D>,
{
    let n = b.nrows();
    check_len("sub-diagonal", n, a.nrows())?;
    check_len("super-diagonal", n, c.nrows())?;
    check_len("right-hand side", n, d.nrows())?;
    check_len("solution", n, x.nrows())?;

    let mut r = d.clone_owned();
    for i in 0..n {
        let mut ax_i = b[i] * x[i];
        if i > 0 {
            ax_i += a[i] * x[i - 1];
        }
        if i + 1 < n {
            ax_i += c[i] * x[i + 1];
        }
        r[i] -= ax_i;
    }
    Ok(r)
}

/// Largest absolute entry of `v`, zero for an empty vector.
pub fn max_abs<T, D, S>(v: &Matrix<T, D, U1, S>) -> T
where
    T: RealField + Copy,
    D: Dim,
    S: Storage<T, D>,
{
    v.iter().fold(T::zero(), |acc, &v_i| acc.max(v_i.abs()))
}
