//! Synthetic regression problems with a known truth.
//!
//! When `n >= p` the design has exactly orthogonal columns with prescribed
//! norms, so the singular values are the norms themselves:
//!
//! 1. draw an `n × p` standard normal matrix
//! 2. keep the `Q` factor of its thin QR decomposition (orthonormal columns)
//! 3. scale column `j` by `norms[j]`
//!
//! When `n < p` orthogonality is impossible; columns are normal draws rescaled
//! to the prescribed norms.
//!
//! The response is `Xβ + ε` with `ε ~ N(0, noise_sd²)`, and the focus vector is
//! the unit vector `e_focus_index`.

use nalgebra::{DMatrix, DVector};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand_distr::{Distribution, Normal};

use crate::error::FocusError;

#[derive(Debug, Clone, PartialEq)]
pub struct SampleConfig {
    pub n: usize,
    /// Column norms; the length fixes `p`.
    pub norms: Vec<f64>,
    /// True coefficients, one per column.
    pub beta: Vec<f64>,
    pub noise_sd: f64,
    pub seed: u64,
    pub focus_index: usize,
}

impl SampleConfig {
    /// Norms `p, p − 1, …, 1` and all-ones coefficients.
    pub fn descending(n: usize, p: usize, noise_sd: f64, seed: u64) -> Self {
        Self {
            n,
            norms: (1..=p).rev().map(|k| k as f64).collect(),
            beta: vec![1.0; p],
            noise_sd,
            seed,
            focus_index: 0,
        }
    }

    pub fn p(&self) -> usize {
        self.norms.len()
    }
}

#[derive(Debug, Clone)]
pub struct SampleData {
    pub design: DMatrix<f64>,
    pub response: DVector<f64>,
    pub focus: DVector<f64>,
    pub beta: DVector<f64>,
}

impl SampleData {
    /// Noise-free value at the focus point, `x0ᵗβ`.
    pub fn true_focus_value(&self) -> f64 {
        self.focus.dot(&self.beta)
    }
}

pub fn generate_sample(config: &SampleConfig) -> Result<SampleData, FocusError> {
    let p = config.p();
    if config.n == 0 || p == 0 {
        return Err(FocusError::InvalidConfig(
            "sample needs at least one row and one column".to_string(),
        ));
    }
    if config.beta.len() != p {
        return Err(FocusError::InvalidConfig(format!(
            "{} coefficients given for {p} columns",
            config.beta.len()
        )));
    }
    if config.norms.iter().any(|v| !(v.is_finite() && *v > 0.0)) {
        return Err(FocusError::InvalidConfig(
            "column norms must be finite and > 0".to_string(),
        ));
    }
    if config.focus_index >= p {
        return Err(FocusError::InvalidConfig(format!(
            "focus index {} is out of range for {p} columns",
            config.focus_index
        )));
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    let standard = Normal::new(0.0, 1.0)
        .map_err(|e| FocusError::InvalidConfig(format!("noise distribution error: {e}")))?;
    let noise = Normal::new(0.0, config.noise_sd)
        .map_err(|e| FocusError::InvalidConfig(format!("noise_sd={}: {e}", config.noise_sd)))?;

    let raw = DMatrix::from_fn(config.n, p, |_, _| standard.sample(&mut rng));
    let mut design = if config.n >= p { raw.qr().q() } else { raw };

    for (j, &norm) in config.norms.iter().enumerate() {
        let mut col = design.column_mut(j);
        let current = col.norm();
        if current > 0.0 {
            col *= norm / current;
        }
    }

    let beta = DVector::from_column_slice(&config.beta);
    let eps = DVector::from_fn(config.n, |_, _| noise.sample(&mut rng));
    let response = &design * &beta + eps;

    let mut focus = DVector::zeros(p);
    focus[config.focus_index] = 1.0;

    log::debug!(
        "generated {}x{p} sample (seed={}, noise_sd={})",
        config.n,
        config.seed,
        config.noise_sd
    );

    Ok(SampleData {
        design,
        response,
        focus,
        beta,
    })
}
