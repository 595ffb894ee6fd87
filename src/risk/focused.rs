//! Asymptotic focused risk at the focus point `x0`.
//!
//! For the ridge estimator at penalty λ the mean squared error of `x0ᵗβ(λ)`
//! splits into squared bias plus variance. Both are written in SVD
//! coordinates (`w = Vᵗx0`, `z = Uᵗy`) and differ only in which pilot
//! estimate of β stands in for the unknown truth inside the bias:
//!
//! ```text
//! ridge plug-in:  bias(λ) = λ · Σ_j w_j · d_j / ((d_j² + λ)(d_j² + λ_cv)) · z_j
//! OLS plug-in:    bias(λ) = λ · Σ_j w_j · 1 / ((d_j² + λ) · d_j) · z_j
//! variance(λ)   = σ̂² · Σ_j w_j² · d_j² / (d_j² + λ)²
//! risk(λ)       = bias(λ)² + variance(λ)
//! ```
//!
//! The sum is not unimodal in general, which is why it is minimized with the
//! multi-start driver.

use crate::domain::{FocusConfig, PlugIn};
use crate::error::FocusError;
use crate::math::RidgeProblem;
use crate::optim::{BoundedMinimizer, Bounds, MultiStartResult, multi_start_minimize};

/// Pilot estimate used inside the squared-bias term.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FocusedVariant {
    /// Unregularized pilot. Only meaningful when `n > p`.
    Ols,
    /// Ridge pilot at the LOOCV-optimal penalty.
    Ridge { loocv_tuning: f64 },
}

impl FocusedVariant {
    pub fn for_plug_in(plug_in: PlugIn, loocv_tuning: f64) -> Self {
        match plug_in {
            PlugIn::Ols => FocusedVariant::Ols,
            PlugIn::Rloocv => FocusedVariant::Ridge { loocv_tuning },
        }
    }
}

/// Focused risk bound to one problem, one σ̂² and one pilot.
#[derive(Debug, Clone, Copy)]
pub struct FocusedRisk<'a> {
    problem: &'a RidgeProblem,
    sigma2: f64,
    variant: FocusedVariant,
}

impl<'a> FocusedRisk<'a> {
    pub fn new(problem: &'a RidgeProblem, sigma2: f64, variant: FocusedVariant) -> Self {
        Self {
            problem,
            sigma2,
            variant,
        }
    }

    /// Bias of `x0ᵗβ(λ)` against the pilot (sign follows the formulas above).
    pub fn bias(&self, lambda: f64) -> f64 {
        let svd = self.problem.svd();
        let w = self.problem.w();
        let z = self.problem.z();

        let mut sum = 0.0;
        for j in 0..svd.len() {
            let d = svd.d[j];
            let d2 = d * d;
            let factor = match self.variant {
                FocusedVariant::Ridge { loocv_tuning } => {
                    let denom = (d2 + lambda) * (d2 + loocv_tuning);
                    if denom > 0.0 { d / denom } else { 0.0 }
                }
                // Null directions carry no OLS information (pseudo-inverse).
                FocusedVariant::Ols if svd.is_null(j) => 0.0,
                FocusedVariant::Ols => 1.0 / ((d2 + lambda) * d),
            };
            sum += w[j] * factor * z[j];
        }
        lambda * sum
    }

    pub fn variance(&self, lambda: f64) -> f64 {
        let svd = self.problem.svd();
        let w = self.problem.w();

        let sum: f64 = svd
            .d
            .iter()
            .zip(w.iter())
            .map(|(&d, &wj)| {
                let d2 = d * d;
                let denom = d2 + lambda;
                if denom > 0.0 { wj * wj * d2 / (denom * denom) } else { 0.0 }
            })
            .sum();
        self.sigma2 * sum
    }

    pub fn eval(&self, lambda: f64) -> f64 {
        let b = self.bias(lambda);
        b * b + self.variance(lambda)
    }

    /// Multi-start search over `config.starts`.
    pub fn minimize<M>(
        &self,
        minimizer: &M,
        config: &FocusConfig,
    ) -> Result<MultiStartResult, FocusError>
    where
        M: BoundedMinimizer + ?Sized,
    {
        let objective = |lambda: f64| self.eval(lambda);
        let result = multi_start_minimize(
            minimizer,
            &objective,
            Bounds::non_negative(),
            &config.starts,
            config.focus_tolerance,
            config.parallel,
        )
        .ok_or(FocusError::NoFiniteRisk { objective: "focused" })?;

        let best = result.best();
        if !best.minimum.converged {
            log::warn!(
                "best focused-risk run (start {:.0e}) hit the iteration cap; using lambda={:.6e}",
                best.start,
                best.minimum.argmin
            );
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use nalgebra::{DMatrix, DVector};
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use rand_distr::{Distribution, Normal};

    use super::*;
    use crate::math::factorize;
    use crate::optim::QuasiNewton;

    struct Fixture {
        x: DMatrix<f64>,
        y: DVector<f64>,
        x0: DVector<f64>,
        problem: RidgeProblem,
    }

    fn fixture(n: usize, p: usize, seed: u64) -> Fixture {
        let mut rng = StdRng::seed_from_u64(seed);
        let normal = Normal::new(0.0, 1.0).unwrap();
        let x = DMatrix::from_fn(n, p, |_, _| normal.sample(&mut rng));
        let y = &x * DVector::from_element(p, 0.7) + DVector::from_fn(n, |_, _| normal.sample(&mut rng));
        let x0 = DVector::from_fn(p, |j, _| if j % 2 == 0 { 1.0 } else { -0.5 });
        let problem = RidgeProblem::new(factorize(&x).unwrap(), y.clone(), &x0).unwrap();
        Fixture { x, y, x0, problem }
    }

    fn ridge_solve(x: &DMatrix<f64>, y: &DVector<f64>, lambda: f64) -> DVector<f64> {
        let p = x.ncols();
        let gram = x.tr_mul(x) + DMatrix::identity(p, p) * lambda;
        gram.lu().solve(&x.tr_mul(y)).unwrap()
    }

    /// bias² and variance from explicit p × p matrices.
    fn brute_force(f: &Fixture, pilot: &DVector<f64>, sigma2: f64, lambda: f64) -> (f64, f64) {
        let p = f.x.ncols();
        let gram = f.x.tr_mul(&f.x);
        let a = (&gram + DMatrix::identity(p, p) * lambda).try_inverse().unwrap();
        let bias = -lambda * f.x0.dot(&(&a * pilot));
        let variance = sigma2 * f.x0.dot(&(&a * &gram * &a * &f.x0));
        (bias * bias, variance)
    }

    #[test]
    fn ols_variant_matches_matrix_formula() {
        let f = fixture(30, 4, 1);
        let risk = FocusedRisk::new(&f.problem, 0.8, FocusedVariant::Ols);
        let pilot = ridge_solve(&f.x, &f.y, 0.0);
        for &lambda in &[0.0, 0.3, 5.0, 400.0] {
            let (b2, var) = brute_force(&f, &pilot, 0.8, lambda);
            let b = risk.bias(lambda);
            assert!((b * b - b2).abs() < 1e-9 * b2.max(1.0), "lambda={lambda}");
            assert!((risk.variance(lambda) - var).abs() < 1e-9 * var.max(1.0));
        }
    }

    #[test]
    fn ridge_variant_matches_matrix_formula_tall_and_wide() {
        for &(n, p) in &[(25, 5), (6, 10)] {
            let f = fixture(n, p, 2);
            let cv = 1.7;
            let risk = FocusedRisk::new(&f.problem, 0.4, FocusedVariant::Ridge { loocv_tuning: cv });
            let pilot = ridge_solve(&f.x, &f.y, cv);
            for &lambda in &[0.2, 3.0, 90.0] {
                let (b2, var) = brute_force(&f, &pilot, 0.4, lambda);
                let b = risk.bias(lambda);
                assert!((b * b - b2).abs() < 1e-9 * b2.max(1.0), "n={n} p={p} lambda={lambda}");
                assert!((risk.variance(lambda) - var).abs() < 1e-9 * var.max(1.0));
            }
        }
    }

    #[test]
    fn risk_is_non_negative_and_finite() {
        let f = fixture(20, 6, 3);
        for variant in [FocusedVariant::Ols, FocusedVariant::Ridge { loocv_tuning: 0.0 }] {
            let risk = FocusedRisk::new(&f.problem, 1.3, variant);
            for k in -6..=9 {
                let lambda = 10f64.powi(k);
                let r = risk.eval(lambda);
                assert!(r.is_finite() && r >= 0.0, "{variant:?} lambda={lambda}: {r}");
            }
            assert!(risk.eval(0.0) >= 0.0);
        }
    }

    #[test]
    fn bias_vanishes_at_zero_and_variance_vanishes_at_infinity() {
        let f = fixture(20, 3, 4);
        let risk = FocusedRisk::new(&f.problem, 2.0, FocusedVariant::Ols);
        assert_eq!(risk.bias(0.0), 0.0);
        assert!(risk.variance(1e12) < 1e-12);

        // Squared bias tends to the squared pilot prediction.
        let pilot = ridge_solve(&f.x, &f.y, 0.0);
        let limit = f.x0.dot(&pilot).powi(2);
        assert!((risk.eval(1e12) - limit).abs() < 1e-6 * limit.max(1.0));
    }

    #[test]
    fn multi_start_beats_every_ladder_value() {
        let f = fixture(40, 5, 5);
        let risk = FocusedRisk::new(&f.problem, 1.0, FocusedVariant::Ols);
        let config = FocusConfig::default();
        let result = risk.minimize(&QuasiNewton::default(), &config).unwrap();
        let best = result.best().minimum;
        assert!(best.argmin >= 0.0);
        for &start in &config.starts {
            assert!(best.value <= risk.eval(start));
        }
        assert_eq!(result.outcomes.len(), config.starts.len());
    }
}
