//! Ridge estimator in SVD coordinates.
//!
//! With `X = U·diag(d)·Vᵗ` the ridge coefficients at penalty `λ` are
//!
//! ```text
//! β(λ) = V·diag(d / (d² + λ))·Uᵗy
//! ```
//!
//! and the fitted values are `H(λ)y` with `H(λ) = U·diag(d² / (d² + λ))·Uᵗ`.
//!
//! Numerical notes:
//! - At `λ = 0` a zero singular value gives `0/0`. Such a direction carries no
//!   information about `y`, so its factor is taken to be `0` (pseudo-inverse
//!   convention).

use nalgebra::DVector;

use crate::math::svd::RidgeProblem;

/// Hat-matrix eigenvalue `d² / (d² + λ)`.
pub fn shrinkage(d: f64, lambda: f64) -> f64 {
    let d2 = d * d;
    let denom = d2 + lambda;
    if denom > 0.0 { d2 / denom } else { 0.0 }
}

/// Coefficient weight `d / (d² + λ)`.
pub fn ridge_weight(d: f64, lambda: f64) -> f64 {
    let denom = d * d + lambda;
    if denom > 0.0 { d / denom } else { 0.0 }
}

/// Ridge coefficients `β(λ)` in the original covariate basis.
pub fn coefficients(problem: &RidgeProblem, lambda: f64) -> DVector<f64> {
    let svd = problem.svd();
    let scaled = DVector::from_iterator(
        svd.len(),
        svd.d
            .iter()
            .zip(problem.z().iter())
            .map(|(&d, &z)| ridge_weight(d, lambda) * z),
    );
    &svd.v * scaled
}

/// Ridge prediction at the focus point, `x0ᵗ·V·diag(d / (d² + λ))·Uᵗy`.
pub fn predict_at_focus(problem: &RidgeProblem, lambda: f64) -> f64 {
    problem
        .svd()
        .d
        .iter()
        .zip(problem.w().iter())
        .zip(problem.z().iter())
        .map(|((&d, &w), &z)| w * ridge_weight(d, lambda) * z)
        .sum()
}

/// Effective degrees of freedom `trace(H(λ))`.
pub fn effective_df(problem: &RidgeProblem, lambda: f64) -> f64 {
    problem.svd().d.iter().map(|&d| shrinkage(d, lambda)).sum()
}
