//! Tuning-parameter selection.
//!
//! Responsibilities:
//!
//! - validate inputs before any numeric work
//! - run the LOOCV and focused-risk searches
//! - package both tunings and predictions, plus the curve for plotting

pub mod selection;

pub use selection::*;
