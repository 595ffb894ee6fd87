//! Export a selection run to JSON.
//!
//! The file is meant to be easy to consume in downstream scripts: the four
//! headline scalars plus enough context (σ̂², risks, coefficients, plot domain)
//! to reproduce the terminal report.

use std::fs::File;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{PlugIn, TuningResult};
use crate::error::FocusError;
use crate::fit::FocusSelection;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartRecord {
    pub start: f64,
    pub tuning: f64,
    /// `None` when the run never reached a finite value.
    pub risk: Option<f64>,
    pub converged: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultFile {
    pub tool: String,
    pub generated: DateTime<Utc>,
    pub plug_in: PlugIn,
    pub n: usize,
    pub p: usize,
    pub rank: usize,
    pub sigma2: f64,
    pub result: TuningResult,
    pub loocv_risk: f64,
    pub focused_risk: f64,
    pub focused_bias_sq: f64,
    pub focused_variance: f64,
    pub coefficients_focused: Vec<f64>,
    pub coefficients_loocv: Vec<f64>,
    pub plot_domain: (f64, f64),
    pub starts: Vec<StartRecord>,
}

impl ResultFile {
    pub fn from_selection(selection: &FocusSelection) -> Self {
        let problem = selection.problem();
        let (bias_sq, variance) = selection.focused_decomposition();
        Self {
            tool: "focus-ridge".to_string(),
            generated: Utc::now(),
            plug_in: selection.plug_in(),
            n: problem.n(),
            p: problem.p(),
            rank: problem.svd().rank(),
            sigma2: selection.sigma2(),
            result: selection.result(),
            loocv_risk: selection.loocv().value,
            focused_risk: selection.focused().best().minimum.value,
            focused_bias_sq: bias_sq,
            focused_variance: variance,
            coefficients_focused: selection.focused_coefficients().iter().copied().collect(),
            coefficients_loocv: selection.loocv_coefficients().iter().copied().collect(),
            plot_domain: selection.plot_domain(),
            starts: selection
                .focused()
                .outcomes
                .iter()
                .map(|o| StartRecord {
                    start: o.start,
                    tuning: o.minimum.argmin,
                    risk: o.minimum.value.is_finite().then_some(o.minimum.value),
                    converged: o.minimum.converged,
                })
                .collect(),
        }
    }
}

/// Write a selection run to a JSON file.
pub fn write_result_json(path: &Path, selection: &FocusSelection) -> Result<(), FocusError> {
    let file = File::create(path).map_err(|e| {
        FocusError::io(format!("Failed to create result JSON '{}'", path.display()), e)
    })?;
    serde_json::to_writer_pretty(file, &ResultFile::from_selection(selection))?;
    Ok(())
}

/// Read a result JSON file back.
pub fn read_result_json(path: &Path) -> Result<ResultFile, FocusError> {
    let file = File::open(path).map_err(|e| {
        FocusError::io(format!("Failed to open result JSON '{}'", path.display()), e)
    })?;
    Ok(serde_json::from_reader(file)?)
}
