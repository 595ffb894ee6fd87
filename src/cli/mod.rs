//! Command-line parsing for the focused ridge tuner.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! selection/math code. `app` maps these structs onto `FocusConfig`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::{DEFAULT_PLOT_ENDPOINT_CAP, PlugIn};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "focus-ridge",
    version,
    about = "Focused tuning of ridge regression at a single prediction point"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Tune ridge regression for a design/response/focus read from CSV files.
    Fit(FitArgs),
    /// Generate a synthetic problem with known truth and tune it.
    Simulate(SimulateArgs),
}

/// Inputs for `fit`.
#[derive(Debug, Args, Clone)]
pub struct FitArgs {
    /// Design matrix CSV (headerless, one row per observation).
    #[arg(long, value_name = "CSV")]
    pub design: PathBuf,

    /// Response vector CSV (single column or single row).
    #[arg(long, value_name = "CSV")]
    pub response: PathBuf,

    /// Focus covariate vector CSV (single column or single row).
    #[arg(long, value_name = "CSV")]
    pub focus: PathBuf,

    #[command(flatten)]
    pub tuning: TuningArgs,

    #[command(flatten)]
    pub output: OutputArgs,
}

/// Inputs for `simulate`.
#[derive(Debug, Args, Clone)]
pub struct SimulateArgs {
    /// Number of observations.
    #[arg(short = 'n', long, default_value_t = 50)]
    pub n: usize,

    /// Number of covariates (column norms p, p-1, ..., 1; all coefficients 1).
    #[arg(short = 'p', long, default_value_t = 5)]
    pub p: usize,

    /// Noise standard deviation.
    #[arg(long, default_value_t = 0.01)]
    pub noise: f64,

    /// Random seed for the synthetic draw.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Covariate index used as the focus direction.
    #[arg(long, default_value_t = 0)]
    pub focus_index: usize,

    #[command(flatten)]
    pub tuning: TuningArgs,

    #[command(flatten)]
    pub output: OutputArgs,
}

/// Options that shape the selection run.
#[derive(Debug, Args, Clone)]
pub struct TuningArgs {
    /// Variance plug-in.
    #[arg(long, value_enum, default_value_t = PlugIn::Ols)]
    pub plug_in: PlugIn,

    /// Comma-separated multi-start ladder for the focused search.
    #[arg(long, value_delimiter = ',', value_name = "LAMBDAS")]
    pub starts: Option<Vec<f64>>,

    /// Iteration cap for every bounded run.
    #[arg(long, default_value_t = 200)]
    pub max_iterations: usize,

    /// Plot domain cap: plots span [0, 2*lambda] below it, [0, cap] above.
    #[arg(long, default_value_t = DEFAULT_PLOT_ENDPOINT_CAP)]
    pub plot_cap: f64,

    /// Run the multi-start ladder sequentially instead of on the thread pool.
    #[arg(long)]
    pub sequential: bool,
}

/// Options that control printing, plotting and exports.
#[derive(Debug, Args, Clone)]
pub struct OutputArgs {
    /// Render an ASCII plot of the focused risk in the terminal.
    #[arg(long)]
    pub plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,

    /// Write the focused risk curve as SVG.
    #[arg(long, value_name = "PATH")]
    pub svg: Option<PathBuf>,

    /// Export the selection run to JSON.
    #[arg(long, value_name = "PATH")]
    pub export: Option<PathBuf>,

    /// Print the per-start table of the focused search.
    #[arg(long)]
    pub show_starts: bool,
}

impl OutputArgs {
    pub fn wants_curve(&self) -> bool {
        self.plot || self.svg.is_some()
    }
}
