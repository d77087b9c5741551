//! Ordinary least squares for trend estimation.
//!
//! The projection engine fits a first-degree polynomial to the trailing
//! window of a series:
//!
//! ```text
//! minimize Σ (y_i - (β0 + β1 x_i))^2,   x_i = 0, 1, 2, ...
//! ```
//!
//! and uses `β1` as the per-period trend. Windows are tiny (≤ 4 rows), so the
//! SVD solve is effectively free.

use nalgebra::{DMatrix, DVector};

/// Solve a least squares problem using SVD.
///
/// Returns `None` if the system is too ill-conditioned to solve robustly.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    let svd = x.clone().svd(true, true);

    for &tol in &[1e-10, 1e-8, 1e-6] {
        if let Ok(beta) = svd.solve(y, tol) {
            if beta.iter().all(|v| v.is_finite()) {
                return Some(beta);
            }
        }
    }

    None
}

/// Slope of the OLS line through `(i, ys[i])`.
///
/// Needs at least two points.
pub fn linear_slope(ys: &[f64]) -> Option<f64> {
    if ys.len() < 2 {
        return None;
    }

    let mut design = Vec::with_capacity(ys.len() * 2);
    for i in 0..ys.len() {
        design.push(1.0);
        design.push(i as f64);
    }
    let x = DMatrix::from_row_slice(ys.len(), 2, &design);
    let y = DVector::from_row_slice(ys);

    solve_least_squares(&x, &y).map(|beta| beta[1])
}
