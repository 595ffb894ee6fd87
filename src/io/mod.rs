//! Input/output helpers.
//!
//! - CSV ingest of matrix and vectors (`ingest`)
//! - JSON export of a selection run (`export`)

pub mod export;
pub mod ingest;

pub use export::*;
pub use ingest::*;
