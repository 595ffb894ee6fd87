//! Reporting utilities: formatted terminal output for a selection run.

pub mod format;

pub use format::*;
