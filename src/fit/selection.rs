//! Focused tuning-parameter selection.
//!
//! Control flow of one run:
//!
//! 1. validate dimensions (before any numeric work)
//! 2. factorize the design once
//! 3. minimize the LOOCV risk from a single start → `loocv_tuning`
//! 4. estimate the plug-in variance (OLS or ridge at `loocv_tuning`)
//! 5. minimize the focused risk over the start ladder → `focused_tuning`
//! 6. predict at the focus point with both tunings
//! 7. optionally hand the finalized risk curve to the plotters
//!
//! Everything is recomputed per call; nothing is cached between runs.

use nalgebra::{DMatrix, DVector};

use crate::data::SampleData;
use crate::domain::{FocusConfig, PlugIn, TuningResult};
use crate::error::FocusError;
use crate::math::{RidgeProblem, coefficients, factorize, predict_at_focus};
use crate::optim::{BoundedMinimizer, Minimum, MultiStartResult, QuasiNewton};
use crate::plot::{RiskCurve, RiskPlotter};
use crate::risk::{FocusedRisk, FocusedVariant, LoocvRisk, plug_in_variance};

/// Design matrix, response and focus point for one run.
#[derive(Debug, Clone)]
pub struct FocusInputs {
    pub design: DMatrix<f64>,
    pub response: DVector<f64>,
    pub focus: DVector<f64>,
}

impl From<SampleData> for FocusInputs {
    fn from(sample: SampleData) -> Self {
        Self {
            design: sample.design,
            response: sample.response,
            focus: sample.focus,
        }
    }
}

/// Check shapes before any decomposition.
pub fn validate_inputs(inputs: &FocusInputs, plug_in: PlugIn) -> Result<(), FocusError> {
    let (n, p) = inputs.design.shape();
    if n == 0 || p == 0 {
        return Err(FocusError::InvalidDimension(format!(
            "design matrix is {n}x{p}; need at least one row and one column"
        )));
    }
    if inputs.response.len() != n {
        return Err(FocusError::InvalidDimension(format!(
            "response has length {} but the design matrix has {n} rows",
            inputs.response.len()
        )));
    }
    if inputs.focus.len() != p {
        return Err(FocusError::InvalidDimension(format!(
            "focus vector has length {} but the design matrix has {p} columns",
            inputs.focus.len()
        )));
    }
    if plug_in == PlugIn::Ols && p >= n {
        return Err(FocusError::InvalidDimension(format!(
            "OLS plug-in needs more rows than columns, got {n}x{p}; use the ridge plug-in"
        )));
    }
    Ok(())
}

/// Outcome of one selection run.
#[derive(Debug, Clone)]
pub struct FocusSelection {
    problem: RidgeProblem,
    plug_in: PlugIn,
    sigma2: f64,
    loocv: Minimum,
    focused: MultiStartResult,
    result: TuningResult,
    plot_endpoint: f64,
}

impl FocusSelection {
    pub fn result(&self) -> TuningResult {
        self.result
    }

    pub fn plug_in(&self) -> PlugIn {
        self.plug_in
    }

    pub fn sigma2(&self) -> f64 {
        self.sigma2
    }

    pub fn problem(&self) -> &RidgeProblem {
        &self.problem
    }

    pub fn loocv(&self) -> &Minimum {
        &self.loocv
    }

    pub fn focused(&self) -> &MultiStartResult {
        &self.focused
    }

    /// The focused risk exactly as it was minimized.
    pub fn focused_risk(&self) -> FocusedRisk<'_> {
        FocusedRisk::new(
            &self.problem,
            self.sigma2,
            FocusedVariant::for_plug_in(self.plug_in, self.loocv.argmin),
        )
    }

    /// `(bias², variance)` at the focused tuning.
    pub fn focused_decomposition(&self) -> (f64, f64) {
        let risk = self.focused_risk();
        let lambda = self.result.focused_tuning;
        (risk.bias(lambda).powi(2), risk.variance(lambda))
    }

    pub fn focused_coefficients(&self) -> DVector<f64> {
        coefficients(&self.problem, self.result.focused_tuning)
    }

    pub fn loocv_coefficients(&self) -> DVector<f64> {
        coefficients(&self.problem, self.result.loocv_tuning)
    }

    /// `(0, endpoint)` with endpoint `2λ` below the cap and the cap otherwise.
    pub fn plot_domain(&self) -> (f64, f64) {
        (0.0, self.plot_endpoint)
    }

    /// Borrow the focused risk curve in the form plotters consume.
    pub fn with_risk_curve<R>(&self, f: impl FnOnce(&RiskCurve<'_>) -> R) -> R {
        let risk = self.focused_risk();
        let objective = move |lambda: f64| risk.eval(lambda);
        let best = self.focused.best().minimum;
        let curve = RiskCurve {
            label: "Focused risk",
            risk: &objective,
            domain: self.plot_domain(),
            minimum: (best.argmin, best.value),
        };
        f(&curve)
    }

    /// Draw the risk curve with each plotter. Failures are logged, not returned.
    pub fn render(&self, plotters: &[&dyn RiskPlotter]) {
        self.with_risk_curve(|curve| {
            for plotter in plotters {
                if let Err(e) = plotter.render(curve) {
                    log::warn!("risk curve plot failed: {e}");
                }
            }
        });
    }
}

/// Select both tuning parameters with the default quasi-Newton strategy.
pub fn select_tuning(
    inputs: &FocusInputs,
    plug_in: PlugIn,
    config: &FocusConfig,
) -> Result<FocusSelection, FocusError> {
    let minimizer = QuasiNewton::with_max_iterations(config.max_iterations);
    select_tuning_with(inputs, plug_in, config, &minimizer)
}

/// Select both tuning parameters with an injected minimization strategy.
pub fn select_tuning_with<M>(
    inputs: &FocusInputs,
    plug_in: PlugIn,
    config: &FocusConfig,
    minimizer: &M,
) -> Result<FocusSelection, FocusError>
where
    M: BoundedMinimizer + ?Sized,
{
    config.validate()?;
    validate_inputs(inputs, plug_in)?;

    let svd = factorize(&inputs.design)?;
    let problem = RidgeProblem::new(svd, inputs.response.clone(), &inputs.focus)?;

    let loocv = LoocvRisk::new(&problem).minimize(minimizer, config)?;
    let loocv_tuning = loocv.argmin;
    log::info!("LOOCV tuning: lambda={loocv_tuning:.6e} (risk={:.6e})", loocv.value);

    let sigma2 = plug_in_variance(&problem, plug_in, loocv_tuning)?;

    let variant = FocusedVariant::for_plug_in(plug_in, loocv_tuning);
    let focused = FocusedRisk::new(&problem, sigma2, variant).minimize(minimizer, config)?;
    let best = focused.best();
    let focused_tuning = best.minimum.argmin;
    log::info!(
        "focused tuning: lambda={focused_tuning:.6e} (risk={:.6e}, start {:.0e})",
        best.minimum.value,
        best.start
    );

    let result = TuningResult {
        focused_tuning,
        loocv_tuning,
        focused_prediction: predict_at_focus(&problem, focused_tuning),
        loocv_prediction: predict_at_focus(&problem, loocv_tuning),
    };

    Ok(FocusSelection {
        problem,
        plug_in,
        sigma2,
        loocv,
        focused,
        result,
        plot_endpoint: config.plot_endpoint(focused_tuning),
    })
}

/// Full entry point: selection, then plotting when `config.render_curve` is set.
pub fn run_focus(
    inputs: &FocusInputs,
    plug_in: PlugIn,
    config: &FocusConfig,
    plotters: &[&dyn RiskPlotter],
) -> Result<FocusSelection, FocusError> {
    let selection = select_tuning(inputs, plug_in, config)?;
    if config.render_curve {
        selection.render(plotters);
    }
    Ok(selection)
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::data::{SampleConfig, generate_sample};
    use crate::optim::{Bounds, Objective};

    fn scenario(noise_sd: f64) -> FocusInputs {
        let config = SampleConfig {
            n: 50,
            norms: vec![5.0, 4.0, 3.0, 2.0, 1.0],
            beta: vec![1.0; 5],
            noise_sd,
            seed: 2024,
            focus_index: 0,
        };
        generate_sample(&config).unwrap().into()
    }

    #[test]
    fn orthogonal_scenario_recovers_focus_value() {
        let inputs = scenario(1e-3);
        let selection = select_tuning(&inputs, PlugIn::Ols, &FocusConfig::default()).unwrap();
        let r = selection.result();

        assert!(r.focused_tuning.is_finite() && r.focused_tuning >= 0.0);
        assert!(r.loocv_tuning.is_finite() && r.loocv_tuning >= 0.0);
        assert!((r.focused_prediction - 1.0).abs() < 1e-2, "{r:?}");
        assert!((r.loocv_prediction - 1.0).abs() < 1e-2, "{r:?}");
        assert!(selection.sigma2() < 1e-4);
    }

    #[test]
    fn ridge_plug_in_handles_more_columns_than_rows() {
        let sample = generate_sample(&SampleConfig::descending(15, 25, 0.5, 8)).unwrap();
        let selection =
            select_tuning(&sample.into(), PlugIn::Rloocv, &FocusConfig::default()).unwrap();
        let r = selection.result();
        assert!(r.loocv_tuning > 0.0, "interpolation must not win LOOCV");
        for v in [r.focused_tuning, r.loocv_tuning, r.focused_prediction, r.loocv_prediction] {
            assert!(v.is_finite());
        }
    }

    #[test]
    fn ols_with_wide_design_fails_before_factorizing() {
        let sample = generate_sample(&SampleConfig::descending(4, 6, 0.1, 1)).unwrap();
        let err = select_tuning(&sample.into(), PlugIn::Ols, &FocusConfig::default()).unwrap_err();
        assert!(matches!(err, FocusError::InvalidDimension(_)));

        let square = generate_sample(&SampleConfig::descending(5, 5, 0.1, 1)).unwrap();
        let err = select_tuning(&square.into(), PlugIn::Ols, &FocusConfig::default()).unwrap_err();
        assert!(matches!(err, FocusError::InvalidDimension(_)));
    }

    #[test]
    fn mismatched_vectors_are_rejected() {
        let mut inputs = scenario(0.1);
        inputs.response = DVector::zeros(49);
        assert!(matches!(
            validate_inputs(&inputs, PlugIn::Rloocv),
            Err(FocusError::InvalidDimension(_))
        ));

        let mut inputs = scenario(0.1);
        inputs.focus = DVector::zeros(4);
        assert!(matches!(
            validate_inputs(&inputs, PlugIn::Rloocv),
            Err(FocusError::InvalidDimension(_))
        ));
    }

    #[test]
    fn repeated_runs_are_identical() {
        let inputs = scenario(0.3);
        let config = FocusConfig::default();
        let a = select_tuning(&inputs, PlugIn::Rloocv, &config).unwrap();
        let b = select_tuning(&inputs, PlugIn::Rloocv, &config).unwrap();
        assert_eq!(a.result(), b.result());

        let sequential = FocusConfig {
            parallel: false,
            ..config
        };
        let c = select_tuning(&inputs, PlugIn::Rloocv, &sequential).unwrap();
        assert_eq!(a.result(), c.result());
    }

    struct Counting {
        calls: AtomicUsize,
    }

    impl BoundedMinimizer for Counting {
        fn minimize(&self, objective: &Objective<'_>, bounds: Bounds, start: f64, tolerance: f64) -> Minimum {
            self.calls.fetch_add(1, Ordering::SeqCst);
            QuasiNewton::default().minimize(objective, bounds, start, tolerance)
        }
    }

    #[test]
    fn injected_strategy_runs_once_for_loocv_and_once_per_start() {
        let counting = Counting {
            calls: AtomicUsize::new(0),
        };
        let config = FocusConfig::default();
        let inputs = scenario(0.2);
        let with_counting = select_tuning_with(&inputs, PlugIn::Ols, &config, &counting).unwrap();
        assert_eq!(counting.calls.load(Ordering::SeqCst), 1 + config.starts.len());

        let default = select_tuning(&inputs, PlugIn::Ols, &config).unwrap();
        assert_eq!(with_counting.result(), default.result());
    }

    #[derive(Default)]
    struct Recorder {
        seen: RefCell<Vec<(f64, f64)>>,
    }

    impl RiskPlotter for Recorder {
        fn render(&self, curve: &RiskCurve<'_>) -> Result<(), FocusError> {
            self.seen.borrow_mut().push(curve.domain);
            Ok(())
        }
    }

    struct Broken;

    impl RiskPlotter for Broken {
        fn render(&self, _curve: &RiskCurve<'_>) -> Result<(), FocusError> {
            Err(FocusError::Plot("no device".to_string()))
        }
    }

    #[test]
    fn plotters_only_run_when_requested_and_cannot_fail_the_run() {
        let inputs = scenario(0.2);
        let recorder = Recorder::default();

        let quiet = run_focus(&inputs, PlugIn::Ols, &FocusConfig::default(), &[&recorder as &dyn RiskPlotter]).unwrap();
        assert!(recorder.seen.borrow().is_empty());

        let config = FocusConfig {
            render_curve: true,
            ..FocusConfig::default()
        };
        let drawn = run_focus(&inputs, PlugIn::Ols, &config, &[&Broken as &dyn RiskPlotter, &recorder]).unwrap();
        assert_eq!(quiet.result(), drawn.result());

        let seen = recorder.seen.borrow();
        assert_eq!(seen.len(), 1);
        let lambda = drawn.result().focused_tuning;
        assert_eq!(seen[0], (0.0, config.plot_endpoint(lambda)));
    }

    #[test]
    fn decomposition_adds_up_to_minimized_risk() {
        let selection = select_tuning(&scenario(0.5), PlugIn::Rloocv, &FocusConfig::default()).unwrap();
        let (bias_sq, variance) = selection.focused_decomposition();
        let best = selection.focused().best().minimum.value;
        assert!((bias_sq + variance - best).abs() <= 1e-12 * best.max(1.0));

        let beta = selection.focused_coefficients();
        let x0 = DVector::from_row_slice(&[1.0, 0.0, 0.0, 0.0, 0.0]);
        assert!((x0.dot(&beta) - selection.result().focused_prediction).abs() < 1e-12);
    }
}
