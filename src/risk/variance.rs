//! Plug-in residual variance.
//!
//! ```text
//! OLS:    σ̂² = ‖(I − U₊·U₊ᵗ)y‖² / (n − p)     U₊: columns with d_j above the rank tolerance
//! RLOOCV: σ̂² = ‖(I − H(λ_cv))y‖² / (n − trace H(λ_cv))
//! ```

use nalgebra::DVector;

use crate::domain::PlugIn;
use crate::error::FocusError;
use crate::math::{RidgeProblem, effective_df, shrinkage};

/// Estimate σ̂² for the chosen plug-in.
///
/// `loocv_tuning` is only read for `PlugIn::Rloocv`.
pub fn plug_in_variance(
    problem: &RidgeProblem,
    plug_in: PlugIn,
    loocv_tuning: f64,
) -> Result<f64, FocusError> {
    let svd = problem.svd();
    let n = problem.n() as f64;

    let (factors, denominator): (DVector<f64>, f64) = match plug_in {
        PlugIn::Ols => (
            DVector::from_fn(svd.len(), |j, _| if svd.is_null(j) { 0.0 } else { 1.0 }),
            n - problem.p() as f64,
        ),
        PlugIn::Rloocv => (
            svd.d.map(|d| shrinkage(d, loocv_tuning)),
            n - effective_df(problem, loocv_tuning),
        ),
    };

    if !(denominator > 0.0) {
        return Err(FocusError::DegenerateVariance { denominator });
    }

    let fitted = &svd.u * problem.z().component_mul(&factors);
    let rss = (problem.y() - fitted).norm_squared();
    let sigma2 = rss / denominator;

    log::info!(
        "plug-in variance ({}): rss={rss:.6e} df={denominator:.4} sigma2={sigma2:.6e}",
        plug_in.display_name()
    );
    Ok(sigma2)
}
