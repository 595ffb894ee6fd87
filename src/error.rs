//! Library-wide error type.
//!
//! Every fallible operation returns `FocusError`. The binary maps each variant
//! to a process exit code: `2` for bad input/configuration/IO, `4` for numerical
//! failures.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FocusError {
    #[error("Invalid dimension: {0}")]
    InvalidDimension(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(
        "Plug-in variance is undefined: residual degrees of freedom {denominator:.6e} is not positive."
    )]
    DegenerateVariance { denominator: f64 },

    #[error("SVD did not converge for the {rows}x{cols} design matrix.")]
    SvdNonConvergence { rows: usize, cols: usize },

    #[error("No start produced a finite value while minimizing the {objective} risk.")]
    NoFiniteRisk { objective: &'static str },

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read CSV '{path}': {source}")]
    Csv {
        path: String,
        #[source]
        source: csv::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Plot rendering failed: {0}")]
    Plot(String),
}

impl FocusError {
    pub fn exit_code(&self) -> u8 {
        match self {
            FocusError::InvalidDimension(_)
            | FocusError::InvalidConfig(_)
            | FocusError::Io { .. }
            | FocusError::Csv { .. }
            | FocusError::Json(_) => 2,
            FocusError::DegenerateVariance { .. }
            | FocusError::SvdNonConvergence { .. }
            | FocusError::NoFiniteRisk { .. }
            | FocusError::Plot(_) => 4,
        }
    }

    pub(crate) fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        FocusError::Io {
            context: context.into(),
            source,
        }
    }
}
