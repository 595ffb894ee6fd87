//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the plug-in variance selector (`PlugIn`)
//! - run configuration (`FocusConfig`)
//! - the four-scalar output record (`TuningResult`)

pub mod types;

pub use types::*;
