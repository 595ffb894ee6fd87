//! Risk functions of the ridge penalty λ.
//!
//! - `variance`: plug-in residual variance σ̂²
//! - `loocv`: closed-form leave-one-out cross-validation risk
//! - `focused`: asymptotic squared bias + variance at the focus point

pub mod focused;
pub mod loocv;
pub mod variance;

pub use focused::*;
pub use loocv::*;
pub use variance::*;
