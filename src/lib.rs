//! `focus-ridge` library crate.
//!
//! Focused tuning of ridge regression: pick the penalty that minimizes the
//! estimated risk of the prediction at one covariate point, alongside the
//! classical LOOCV choice.
//!
//! The binary (`focus-ridge`) is a thin wrapper around this library so that:
//!
//! - core logic is testable without spawning processes
//! - the selection routine can be driven from other code with an injected
//!   minimizer or plotters

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod fit;
pub mod io;
pub mod math;
pub mod optim;
pub mod plot;
pub mod report;
pub mod risk;
