//! Linear algebra: the SVD factorization and the ridge estimator built on it.

pub mod ridge;
pub mod svd;

pub use ridge::*;
pub use svd::*;
