//! Least-squares polynomial approximation through the normal equations.
use log::debug;
use nalgebra::{DMatrix, DVector, Dim, Matrix, RealField, Storage, U1};

#[cfg(feature = "serde-serialize")]
use serde::{Deserialize, Serialize};

use crate::{check_lengths, Error};

/// A polynomial `c[0] + c[1] t + ... + c[k] t^k`, coefficients in ascending power order.
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct Polynomial<T> {
    coefficients: Vec<T>,
}

impl<T: RealField + Copy> Polynomial<T> {
    pub fn new(coefficients: Vec<T>) -> Self {
        Polynomial { coefficients }
    }

    /// Fits a polynomial of degree `degree` to the points `(x[i], y[i])` in the least-squares
    /// sense.
    ///
    /// The `(degree+1)×(degree+1)` normal equations
    ///
    /// ```text
    /// Σ_k (Σ_i x_i^(j+k)) c_k = Σ_i y_i x_i^j,    j = 0..=degree
    /// ```
    ///
    /// are solved with Gaussian elimination. A singular system (e.g. fewer distinct `x` values
    /// than coefficients) is returned as `Error::Linear`.
    pub fn fit<D, SX, SY>(
        x: &Matrix<T, D, U1, SX>,
        y: &Matrix<T, D, U1, SY>,
        degree: usize,
    ) -> Result<Self, Error>
    where
        D: Dim,
        SX: Storage<T, D>,
        SY: Storage<T, D>,
    {
        check_lengths(x.nrows(), y.nrows())?;
        let p = degree + 1;
        if x.nrows() < p {
            return Err(Error::TooFewPoints {
                needed: p,
                found: x.nrows(),
            });
        }

        // power_sums[k] = Σ x^k, k = 0..=2*degree; moments[j] = Σ y x^j, j = 0..=degree
        let mut power_sums = vec![T::zero(); 2 * degree + 1];
        let mut moments = vec![T::zero(); p];
        for (&x_i, &y_i) in x.iter().zip(y.iter()) {
            let mut pow = T::one();
            for k in 0..power_sums.len() {
                power_sums[k] += pow;
                if k < p {
                    moments[k] += y_i * pow;
                }
                pow *= x_i;
            }
        }

        let mat_a = DMatrix::from_fn(p, p, |j, k| power_sums[j + k]);
        let b = DVector::from_column_slice(&moments);
        let coefficients = linear::solve_dense(&mat_a, &b).map_err(|e| {
            debug!("Polynomial::fit: normal equations of degree {degree} not solvable: {e}");
            e
        })?;

        Ok(Polynomial {
            coefficients: coefficients.iter().copied().collect(),
        })
    }

    pub fn coefficients(&self) -> &[T] {
        &self.coefficients
    }

    pub fn degree(&self) -> usize {
        self.coefficients.len().saturating_sub(1)
    }

    /// Evaluates the polynomial at `t` (Horner's scheme).
    pub fn evaluate(&self, t: T) -> T {
        self.coefficients
            .iter()
            .rev()
            .fold(T::zero(), |acc, &c| acc * t + c)
    }

    /// The deviations `y[i] - p(x[i])`.
    pub fn residuals<D, SX, SY>(
        &self,
        x: &Matrix<T, D, U1, SX>,
        y: &Matrix<T, D, U1, SY>,
    ) -> Result<DVector<T>, Error>
    where
        D: Dim,
        SX: Storage<T, D>,
        SY: Storage<T, D>,
    {
        check_lengths(x.nrows(), y.nrows())?;
        Ok(DVector::from_iterator(
            x.nrows(),
            x.iter().zip(y.iter()).map(|(&x_i, &y_i)| y_i - self.evaluate(x_i)),
        ))
    }

    /// Sum of squared deviations over the points `(x[i], y[i])`.
    pub fn sum_squared_error<D, SX, SY>(
        &self,
        x: &Matrix<T, D, U1, SX>,
        y: &Matrix<T, D, U1, SY>,
    ) -> Result<T, Error>
    where
        D: Dim,
        SX: Storage<T, D>,
        SY: Storage<T, D>,
    {
        Ok(self
            .residuals(x, y)?
            .iter()
            .fold(T::zero(), |acc, &r| acc + r * r))
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use nalgebra::vector;

    use super::*;

    #[test]
    fn test_linear_exact() {
        let x = vector![-1.0, 0.0, 1.0, 2.0, 3.0];
        let y = vector![-4.0, -1.0, 2.0, 5.0, 8.0];
        let p = Polynomial::fit(&x, &y, 1).unwrap();
        assert_eq!(p.degree(), 1);
        assert_relative_eq!(p.coefficients()[0], -1.0, epsilon = 1e-12);
        assert_relative_eq!(p.coefficients()[1], 3.0, epsilon = 1e-12);
        assert!(p.sum_squared_error(&x, &y).unwrap() < 1e-20);
    }

    #[test]
    fn test_quadratic() {
        let x = vector![-2.0, -1.0, 0.0, 1.0, 2.0];
        let y = vector![6.0, 2.0, -1.0, -2.0, -1.0];
        let p = Polynomial::fit(&x, &y, 2).unwrap();
        let c = p.coefficients();
        assert_relative_eq!(c[0], -6.4 / 7.0, epsilon = 1e-12);
        assert_relative_eq!(c[1], -1.8, epsilon = 1e-12);
        assert_relative_eq!(c[2], 6.0 / 7.0, epsilon = 1e-12);

        // the residuals of a least-squares fit are orthogonal to 1 and x
        let r = p.residuals(&x, &y).unwrap();
        assert_relative_eq!(r.sum(), 0.0, epsilon = 1e-12);
        assert_relative_eq!(r.dot(&x), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_evaluate() {
        let p = Polynomial::new(vec![1.0, -2.0, 3.0]);
        assert_eq!(p.evaluate(2.0), 9.0);
        assert_eq!(Polynomial::<f64>::new(vec![]).evaluate(2.0), 0.0);
    }

    #[test]
    fn test_singular_normal_equations() {
        let x = vector![2.0, 2.0, 2.0];
        let y = vector![1.0, 2.0, 3.0];
        assert_eq!(
            Polynomial::fit(&x, &y, 1),
            Err(Error::Linear(linear::Error::SingularMatrix { col: 1 }))
        );
    }

    #[test]
    fn test_too_few_points() {
        let x = vector![0.0, 1.0];
        let y = vector![1.0, 2.0];
        assert_eq!(
            Polynomial::fit(&x, &y, 2),
            Err(Error::TooFewPoints {
                needed: 3,
                found: 2
            })
        );
    }
}
