//! Natural cubic spline interpolation.
//!
//! On each interval `[x_i, x_{i+1}]` the spline is
//!
//! ```text
//! S_i(t) = a_i + b_i (t - x_i) + c_i (t - x_i)^2 + d_i (t - x_i)^3
//! ```
//!
//! with `a_i = y_i`. The `c_i` (half the second derivative at `x_i`) come from a tridiagonal
//! system; the natural boundary conditions pin `c_0 = c_n = 0`.
use log::debug;
use nalgebra::{DVector, Dim, Matrix, RealField, Storage, U1};

#[cfg(feature = "serde-serialize")]
use serde::{Deserialize, Serialize};

use crate::{check_lengths, Error};

/// Coefficients of one spline piece, valid on `[x0, x0 + h]`.
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment<T> {
    pub x0: T,
    pub a: T,
    pub b: T,
    pub c: T,
    pub d: T,
}

impl<T: RealField + Copy> Segment<T> {
    pub fn evaluate(&self, t: T) -> T {
        let dx = t - self.x0;
        self.a + dx * (self.b + dx * (self.c + dx * self.d))
    }
}

#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[cfg_attr(
    feature = "serde-serialize",
    serde(
        try_from = "RawCubicSpline<T>",
        bound(deserialize = "T: RealField + Copy + Deserialize<'de>")
    )
)]
#[derive(Clone, Debug, PartialEq)]
pub struct CubicSpline<T> {
    /// interpolation nodes, strictly increasing
    knots: Vec<T>,
    /// one segment per interval, `knots.len() - 1` of them
    segments: Vec<Segment<T>>,
}

/// Serialized form of [`CubicSpline`], validated before use.
#[cfg(feature = "serde-serialize")]
#[derive(Deserialize)]
struct RawCubicSpline<T> {
    knots: Vec<T>,
    segments: Vec<Segment<T>>,
}

#[cfg(feature = "serde-serialize")]
impl<T: RealField + Copy> TryFrom<RawCubicSpline<T>> for CubicSpline<T> {
    type Error = Error;

    fn try_from(raw: RawCubicSpline<T>) -> Result<Self, Error> {
        let RawCubicSpline { knots, segments } = raw;
        if knots.len() < 2 {
            return Err(Error::TooFewPoints {
                needed: 2,
                found: knots.len(),
            });
        }
        if knots.len() != segments.len() + 1 {
            return Err(Error::MalformedSpline {
                knots: knots.len(),
                segments: segments.len(),
            });
        }
        if let Some(i) = (1..knots.len()).find(|&i| !(knots[i] > knots[i - 1])) {
            return Err(Error::NotIncreasing { index: i });
        }
        Ok(CubicSpline { knots, segments })
    }
}

impl<T: RealField + Copy> CubicSpline<T> {
    /// Builds the natural cubic spline through the points `(x[i], y[i])`.
    ///
    /// # Errors
    ///
    /// * `LengthMismatch` if `x` and `y` differ in length.
    /// * `TooFewPoints` for fewer than two points.
    /// * `NotIncreasing` if the `x` values are not strictly increasing.
    /// * `Linear` if the coefficient system could not be solved.
    pub fn natural<D, SX, SY>(
        x: &Matrix<T, D, U1, SX>,
        y: &Matrix<T, D, U1, SY>,
    ) -> Result<Self, Error>
    where
        D: Dim,
        SX: Storage<T, D>,
        SY: Storage<T, D>,
    {
        check_lengths(x.nrows(), y.nrows())?;
        let m = x.nrows();
        if m < 2 {
            return Err(Error::TooFewPoints {
                needed: 2,
                found: m,
            });
        }
        if let Some(i) = (1..m).find(|&i| !(x[i] > x[i - 1])) {
            debug!("CubicSpline: nodes not increasing at index {i}");
            return Err(Error::NotIncreasing { index: i });
        }

        let n = m - 1;
        let two: T = nalgebra::convert(2.0);
        let three: T = nalgebra::convert(3.0);
        let h: Vec<T> = (0..n).map(|i| x[i + 1] - x[i]).collect();

        // rows 0 and n encode c_0 = c_n = 0
        let mut sub = DVector::zeros(m);
        let mut diag = DVector::zeros(m);
        let mut sup = DVector::zeros(m);
        let mut rhs = DVector::zeros(m);
        diag[0] = T::one();
        diag[n] = T::one();
        for i in 1..n {
            sub[i] = h[i - 1];
            diag[i] = two * (h[i - 1] + h[i]);
            sup[i] = h[i];
            rhs[i] = three * ((y[i + 1] - y[i]) / h[i] - (y[i] - y[i - 1]) / h[i - 1]);
        }

        let c = linear::solve_tridiagonal(&sub, &diag, &sup, &rhs)?;

        let segments = (0..n)
            .map(|i| Segment {
                x0: x[i],
                a: y[i],
                b: (y[i + 1] - y[i]) / h[i] - h[i] * (c[i + 1] + two * c[i]) / three,
                c: c[i],
                d: (c[i + 1] - c[i]) / (three * h[i]),
            })
            .collect();

        Ok(CubicSpline {
            knots: x.iter().copied().collect(),
            segments,
        })
    }

    pub fn knots(&self) -> &[T] {
        &self.knots
    }

    pub fn segments(&self) -> &[Segment<T>] {
        &self.segments
    }

    /// Evaluates the spline at `t`. Both end nodes are inside the interval.
    pub fn evaluate(&self, t: T) -> Result<T, Error> {
        let (lo, hi) = match (self.knots.first(), self.knots.last()) {
            (Some(&lo), Some(&hi)) if !self.segments.is_empty() => (lo, hi),
            _ => {
                return Err(Error::TooFewPoints {
                    needed: 2,
                    found: self.knots.len(),
                })
            }
        };
        if !(t >= lo && t <= hi) {
            return Err(Error::OutOfRange {
                t: nalgebra::try_convert(t).unwrap_or(f64::NAN),
                lo: nalgebra::try_convert(lo).unwrap_or(f64::NAN),
                hi: nalgebra::try_convert(hi).unwrap_or(f64::NAN),
            });
        }

        // last segment whose start is <= t; t == hi belongs to the last segment
        let i = self.knots.partition_point(|&k| k <= t).saturating_sub(1);
        let segment = self
            .segments
            .get(i)
            .or_else(|| self.segments.last())
            .ok_or(Error::MalformedSpline {
                knots: self.knots.len(),
                segments: self.segments.len(),
            })?;
        Ok(segment.evaluate(t))
    }
}
