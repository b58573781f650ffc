//! Residual and agreement checks over families of generated systems.

use approx::assert_relative_eq;
use linear::{
    dense_residual, max_abs, solve_dense, solve_tridiagonal, tridiagonal_residual, Error, Gauss,
    LogTrace, Thomas,
};
use nalgebra::{DMatrix, DVector};

/// Deterministic, well conditioned test data: bounded off-diagonal entries with a dominant
/// diagonal, and a row permutation so that the solver has to pivot.
fn dense_system(n: usize) -> (DMatrix<f64>, DVector<f64>) {
    let mut mat_a = DMatrix::from_fn(n, n, |i, j| ((i * 7 + j * 3) as f64).sin());
    for i in 0..n {
        mat_a[(i, i)] += n as f64 + 1.0;
    }
    // reverse the rows
    let mat_a = DMatrix::from_fn(n, n, |i, j| mat_a[(n - 1 - i, j)]);
    let b = DVector::from_fn(n, |i, _| (i as f64 * 0.37).cos() * 10.0);
    (mat_a, b)
}

fn tridiagonal_system(n: usize) -> (DVector<f64>, DVector<f64>, DVector<f64>, DVector<f64>) {
    let a = DVector::from_fn(n, |i, _| if i == 0 { 0.0 } else { 1.0 + (i as f64).sin() });
    let c = DVector::from_fn(n, |i, _| {
        if i + 1 == n {
            0.0
        } else {
            -1.0 + 0.5 * (i as f64).cos()
        }
    });
    let b = DVector::from_fn(n, |i, _| 4.0 + 0.1 * i as f64);
    let d = DVector::from_fn(n, |i, _| (i as f64) - 3.0);
    (a, b, c, d)
}

fn to_dense(a: &DVector<f64>, b: &DVector<f64>, c: &DVector<f64>) -> DMatrix<f64> {
    let n = b.len();
    DMatrix::from_fn(n, n, |i, j| {
        if i == j {
            b[i]
        } else if i == j + 1 {
            a[i]
        } else if j == i + 1 {
            c[i]
        } else {
            0.0
        }
    })
}

#[test_log::test]
fn dense_residual_is_small() {
    for n in 1..=12 {
        let (mat_a, b) = dense_system(n);
        let x = Gauss::new()
            .solve_observed(&mat_a, &b, &mut LogTrace)
            .unwrap();
        let r = dense_residual(&mat_a, &x, &b).unwrap();
        let scale = 1.0 + max_abs(&b);
        assert!(max_abs(&r) < 1e-9 * scale, "n={n}: residual {r:?}");
    }
}

#[test_log::test]
fn tridiagonal_residual_is_small() {
    for n in 1..=50 {
        let (a, b, c, d) = tridiagonal_system(n);
        let x = Thomas::new()
            .solve_observed(&a, &b, &c, &d, &mut LogTrace)
            .unwrap();
        let r = tridiagonal_residual(&a, &b, &c, &d, &x).unwrap();
        let scale = 1.0 + max_abs(&d);
        assert!(max_abs(&r) < 1e-9 * scale, "n={n}: residual {r:?}");
    }
}

#[test]
fn tridiagonal_matches_dense() {
    let (a, b, c, d) = (
        DVector::from_vec(vec![0.0, 1.0, 1.0]),
        DVector::from_vec(vec![2.0, 2.0, 2.0]),
        DVector::from_vec(vec![1.0, 1.0, 0.0]),
        DVector::from_vec(vec![3.0, 4.0, 3.0]),
    );
    let x_thomas = solve_tridiagonal(&a, &b, &c, &d).unwrap();
    let x_gauss = solve_dense(&to_dense(&a, &b, &c), &d).unwrap();
    assert_relative_eq!(x_thomas, x_gauss, epsilon = 1e-12);

    for n in [2, 5, 10, 20] {
        let (a, b, c, d) = tridiagonal_system(n);
        let x_thomas = solve_tridiagonal(&a, &b, &c, &d).unwrap();
        let x_gauss = solve_dense(&to_dense(&a, &b, &c), &d).unwrap();
        assert_relative_eq!(x_thomas, x_gauss, epsilon = 1e-10);
    }
}

#[test]
fn inputs_are_reusable() {
    let (mat_a, b) = dense_system(5);
    let (mat_a0, b0) = (mat_a.clone(), b.clone());
    let x1 = solve_dense(&mat_a, &b).unwrap();
    let x2 = solve_dense(&mat_a, &b).unwrap();
    assert_eq!(x1, x2);
    assert_eq!(mat_a, mat_a0);
    assert_eq!(b, b0);
}

#[test]
fn in_place_matches_copy() {
    let (mat_a, b) = dense_system(6);
    let x = solve_dense(&mat_a, &b).unwrap();
    let (mut work, mut rhs) = (mat_a.clone(), b.clone());
    Gauss::new()
        .solve_in_place(&mut work, &mut rhs, &mut ())
        .unwrap();
    assert_eq!(x, rhs);

    let (a, b, c, d) = tridiagonal_system(8);
    let x = solve_tridiagonal(&a, &b, &c, &d).unwrap();
    let (mut u, mut rhs) = (c.clone(), d.clone());
    Thomas::new()
        .solve_in_place(&a, &b, &mut u, &mut rhs, &mut ())
        .unwrap();
    assert_eq!(x, rhs);
}

#[test]
fn mismatched_lengths_are_rejected() {
    let (mat_a, _) = dense_system(4);
    let b = DVector::from_element(5, 1.0);
    assert!(matches!(
        solve_dense(&mat_a, &b),
        Err(Error::DimensionMismatch { .. })
    ));

    let (a, b, c, _) = tridiagonal_system(4);
    for len in [3, 5] {
        let d = DVector::from_element(len, 1.0);
        assert_eq!(
            solve_tridiagonal(&a, &b, &c, &d),
            Err(Error::DimensionMismatch {
                what: "right-hand side",
                expected: 4,
                found: len
            })
        );
    }

    let short_c = DVector::from_element(3, 1.0);
    let (_, _, _, d) = tridiagonal_system(4);
    assert_eq!(
        solve_tridiagonal(&a, &b, &short_c, &d),
        Err(Error::DimensionMismatch {
            what: "super-diagonal",
            expected: 4,
            found: 3
        })
    );
}

#[test]
fn mismatched_in_place_leaves_inputs_untouched() {
    let (a, b, mut c, _) = tridiagonal_system(4);
    let mut d = DVector::from_element(5, 1.0);
    let (c0, d0) = (c.clone(), d.clone());
    assert!(matches!(
        Thomas::new().solve_in_place(&a, &b, &mut c, &mut d, &mut ()),
        Err(Error::DimensionMismatch { .. })
    ));
    assert_eq!(c, c0);
    assert_eq!(d, d0);

    let short_a = DVector::from_element(3, 0.5);
    let mut d = DVector::from_element(4, 1.0);
    let d0 = d.clone();
    assert!(matches!(
        Thomas::new().solve_in_place(&short_a, &b, &mut c, &mut d, &mut ()),
        Err(Error::DimensionMismatch { .. })
    ));
    assert_eq!(c, c0);
    assert_eq!(d, d0);

    let (mut mat_a, _) = dense_system(4);
    let mut rhs = DVector::from_element(3, 1.0);
    let (mat_a0, rhs0) = (mat_a.clone(), rhs.clone());
    assert!(matches!(
        Gauss::new().solve_in_place(&mut mat_a, &mut rhs, &mut ()),
        Err(Error::DimensionMismatch { .. })
    ));
    assert_eq!(mat_a, mat_a0);
    assert_eq!(rhs, rhs0);
}
