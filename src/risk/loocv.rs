//! Closed-form leave-one-out cross-validation risk for ridge regression.
//!
//! ```text
//! R(λ) = (1/n) Σ_i [ ((I − H(λ))y)_i / (1 − H(λ)_ii) ]²
//! ```
//!
//! Only the diagonal of `H(λ)` and the fitted values `H(λ)y` are needed, so we
//! never form the `n × n` hat matrix:
//!
//! - `H_ii = Σ_j U_ij² · s_j`
//! - `(Hy)_i = Σ_j U_ij · s_j · (Uᵗy)_j`
//!
//! with `s_j = d_j² / (d_j² + λ)`.
//!
//! When a leverage complement `1 − H_ii` collapses (near-interpolating fits at
//! small λ) the risk is reported as `+∞`, which the minimizer rejects.

use crate::domain::FocusConfig;
use crate::error::FocusError;
use crate::math::{RidgeProblem, shrinkage};
use crate::optim::{BoundedMinimizer, Bounds, Minimum};

/// Leverage complements at or below this are treated as zero.
const LEVERAGE_EPS: f64 = 1e-12;

#[derive(Debug, Clone, Copy)]
pub struct LoocvRisk<'a> {
    problem: &'a RidgeProblem,
}

impl<'a> LoocvRisk<'a> {
    pub fn new(problem: &'a RidgeProblem) -> Self {
        Self { problem }
    }

    pub fn eval(&self, lambda: f64) -> f64 {
        let svd = self.problem.svd();
        let y = self.problem.y();
        let z = self.problem.z();
        let n = svd.n();

        let s: Vec<f64> = svd.d.iter().map(|&d| shrinkage(d, lambda)).collect();

        let mut total = 0.0;
        for i in 0..n {
            let mut leverage = 0.0;
            let mut fitted = 0.0;
            for (j, &sj) in s.iter().enumerate() {
                let u = svd.u[(i, j)];
                leverage += u * u * sj;
                fitted += u * sj * z[j];
            }

            let complement = 1.0 - leverage;
            if complement <= LEVERAGE_EPS {
                log::trace!("LOOCV leverage complement {complement:.3e} at row {i}, lambda={lambda:.3e}");
                return f64::INFINITY;
            }
            let e = (y[i] - fitted) / complement;
            total += e * e;
        }

        total / n as f64
    }

    /// Single bounded search from `config.loocv_start`.
    pub fn minimize<M>(&self, minimizer: &M, config: &FocusConfig) -> Result<Minimum, FocusError>
    where
        M: BoundedMinimizer + ?Sized,
    {
        let objective = |lambda: f64| self.eval(lambda);
        let m = minimizer.minimize(
            &objective,
            Bounds::non_negative(),
            config.loocv_start,
            config.loocv_tolerance,
        );
        if !m.is_finite() {
            return Err(FocusError::NoFiniteRisk { objective: "LOOCV" });
        }
        if !m.converged {
            log::warn!(
                "LOOCV search stopped after {} iterations without converging; using best iterate lambda={:.6e}",
                m.iterations,
                m.argmin
            );
        }
        Ok(m)
    }
}
