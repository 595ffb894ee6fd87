//! Shared domain types.
//!
//! These types are kept small and serializable so they can be used in-memory
//! during selection and exported to JSON afterwards.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::FocusError;

/// Starting values for the focused-risk multi-start search.
///
/// The focused risk can have local minima at very different scales depending
/// on the singular-value spectrum, so the ladder spans six orders of magnitude.
/// These magnitudes are empirical; override them through `FocusConfig::starts`.
pub const DEFAULT_START_LADDER: [f64; 7] = [1e1, 1e2, 1e3, 1e4, 1e5, 1e6, 1e7];

/// Upper limit for the plotting domain endpoint.
pub const DEFAULT_PLOT_ENDPOINT_CAP: f64 = 1e5;

/// Which residual-variance estimate is plugged into the focused risk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PlugIn {
    /// Unregularized least squares. Requires more observations than covariates.
    Ols,
    /// Ridge fit at the LOOCV-optimal tuning parameter.
    Rloocv,
}

impl PlugIn {
    pub fn display_name(self) -> &'static str {
        match self {
            PlugIn::Ols => "OLS",
            PlugIn::Rloocv => "ridge (LOOCV)",
        }
    }
}

/// Tunable constants for a single selection run.
#[derive(Debug, Clone, PartialEq)]
pub struct FocusConfig {
    /// Multi-start ladder for the focused-risk search.
    pub starts: Vec<f64>,
    /// Single start for the LOOCV search.
    pub loocv_start: f64,
    /// Relative convergence tolerance of the LOOCV search.
    pub loocv_tolerance: f64,
    /// Relative convergence tolerance of each focused-risk run.
    pub focus_tolerance: f64,
    /// Iteration cap for every bounded run.
    pub max_iterations: usize,
    /// Plot domain is `[0, 2λ]` below this value and `[0, cap]` otherwise.
    pub plot_endpoint_cap: f64,
    /// Run the multi-start ladder on the rayon pool.
    pub parallel: bool,
    /// Hand the finalized risk curve to the plotting collaborators.
    pub render_curve: bool,
}

impl Default for FocusConfig {
    fn default() -> Self {
        Self {
            starts: DEFAULT_START_LADDER.to_vec(),
            loocv_start: 1.0,
            loocv_tolerance: 1e-8,
            focus_tolerance: 1e-6,
            max_iterations: 200,
            plot_endpoint_cap: DEFAULT_PLOT_ENDPOINT_CAP,
            parallel: true,
            render_curve: false,
        }
    }
}

impl FocusConfig {
    pub fn validate(&self) -> Result<(), FocusError> {
        if self.starts.is_empty() {
            return Err(FocusError::InvalidConfig(
                "start ladder must contain at least one value".to_string(),
            ));
        }
        if let Some(bad) = self.starts.iter().find(|s| !(s.is_finite() && **s >= 0.0)) {
            return Err(FocusError::InvalidConfig(format!(
                "start value {bad} must be finite and non-negative"
            )));
        }
        if !(self.loocv_start.is_finite() && self.loocv_start >= 0.0) {
            return Err(FocusError::InvalidConfig(format!(
                "LOOCV start {} must be finite and non-negative",
                self.loocv_start
            )));
        }
        for (name, tol) in [
            ("loocv_tolerance", self.loocv_tolerance),
            ("focus_tolerance", self.focus_tolerance),
        ] {
            if !(tol.is_finite() && tol > 0.0) {
                return Err(FocusError::InvalidConfig(format!(
                    "{name}={tol} must be finite and > 0"
                )));
            }
        }
        if self.max_iterations == 0 {
            return Err(FocusError::InvalidConfig(
                "max_iterations must be >= 1".to_string(),
            ));
        }
        if !(self.plot_endpoint_cap.is_finite() && self.plot_endpoint_cap > 0.0) {
            return Err(FocusError::InvalidConfig(format!(
                "plot endpoint cap {} must be finite and > 0",
                self.plot_endpoint_cap
            )));
        }
        Ok(())
    }

    /// Right end of the plotting domain for a located focused tuning parameter.
    pub fn plot_endpoint(&self, focused_tuning: f64) -> f64 {
        if focused_tuning < self.plot_endpoint_cap {
            2.0 * focused_tuning
        } else {
            self.plot_endpoint_cap
        }
    }
}

/// The four scalars returned by one selection run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TuningResult {
    pub focused_tuning: f64,
    pub loocv_tuning: f64,
    pub focused_prediction: f64,
    pub loocv_prediction: f64,
}
