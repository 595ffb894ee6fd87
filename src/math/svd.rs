//! Singular value decomposition of the design matrix.
//!
//! Every risk formula in this crate is expressed through the thin SVD
//! `X = U·diag(d)·Vᵗ` with `r = min(n, p)` singular triples. We factorize once
//! per run and precompute the two projections the formulas share:
//!
//! - `z = Uᵗy` (response in the left singular basis)
//! - `w = Vᵗx0` (focus point in the right singular basis)
//!
//! With those, predictions and the focused risk are O(r) per evaluation and
//! the LOOCV risk only needs the rows of `U`.

use nalgebra::{DMatrix, DVector};

use crate::error::FocusError;

/// Thin SVD `X = U·diag(d)·Vᵗ`.
#[derive(Debug, Clone)]
pub struct SvdTriple {
    /// `n × r`, orthonormal columns.
    pub u: DMatrix<f64>,
    /// Length `r`, non-negative.
    pub d: DVector<f64>,
    /// `p × r`, orthonormal columns.
    pub v: DMatrix<f64>,
    /// Singular values at or below this are treated as exact zeros.
    rank_tol: f64,
}

impl SvdTriple {
    pub fn n(&self) -> usize {
        self.u.nrows()
    }

    pub fn p(&self) -> usize {
        self.v.nrows()
    }

    /// Number of singular triples, `min(n, p)`.
    pub fn len(&self) -> usize {
        self.d.len()
    }

    pub fn is_empty(&self) -> bool {
        self.d.is_empty()
    }

    pub fn is_null(&self, j: usize) -> bool {
        self.d[j] <= self.rank_tol
    }

    /// Numerical rank of the design matrix.
    pub fn rank(&self) -> usize {
        (0..self.len()).filter(|&j| !self.is_null(j)).count()
    }
}

/// Factorize `x` into its thin SVD.
///
/// Non-convergence of the underlying iteration is fatal.
pub fn factorize(x: &DMatrix<f64>) -> Result<SvdTriple, FocusError> {
    let (n, p) = x.shape();
    let failed = || FocusError::SvdNonConvergence { rows: n, cols: p };

    let svd = x.clone().try_svd(true, true, f64::EPSILON, 0).ok_or_else(failed)?;
    let u = svd.u.ok_or_else(failed)?;
    let v = svd.v_t.ok_or_else(failed)?.transpose();
    let d = svd.singular_values;

    let d_max = d.iter().copied().fold(0.0_f64, f64::max);
    let rank_tol = d_max * n.max(p) as f64 * f64::EPSILON;

    log::debug!(
        "SVD of {n}x{p} design: d_max={d_max:.6e}, d_min={:.6e}",
        d.iter().copied().fold(f64::INFINITY, f64::min)
    );

    Ok(SvdTriple { u, d, v, rank_tol })
}

/// One run's immutable numerical state: the SVD plus shared projections.
#[derive(Debug, Clone)]
pub struct RidgeProblem {
    svd: SvdTriple,
    y: DVector<f64>,
    z: DVector<f64>,
    w: DVector<f64>,
}

impl RidgeProblem {
    /// Bind a response and focus vector to an existing factorization.
    pub fn new(svd: SvdTriple, y: DVector<f64>, x0: &DVector<f64>) -> Result<Self, FocusError> {
        if y.len() != svd.n() {
            return Err(FocusError::InvalidDimension(format!(
                "response has length {} but the design matrix has {} rows",
                y.len(),
                svd.n()
            )));
        }
        if x0.len() != svd.p() {
            return Err(FocusError::InvalidDimension(format!(
                "focus vector has length {} but the design matrix has {} columns",
                x0.len(),
                svd.p()
            )));
        }

        let z = svd.u.tr_mul(&y);
        let w = svd.v.tr_mul(x0);
        Ok(Self { svd, y, z, w })
    }

    pub fn svd(&self) -> &SvdTriple {
        &self.svd
    }

    pub fn y(&self) -> &DVector<f64> {
        &self.y
    }

    /// `Uᵗy`.
    pub fn z(&self) -> &DVector<f64> {
        &self.z
    }

    /// `Vᵗx0`.
    pub fn w(&self) -> &DVector<f64> {
        &self.w
    }

    pub fn n(&self) -> usize {
        self.svd.n()
    }

    pub fn p(&self) -> usize {
        self.svd.p()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn factorize_reconstructs_tall_and_wide_matrices() {
        let tall = DMatrix::from_row_slice(4, 2, &[1.0, 2.0, 0.5, -1.0, 3.0, 0.0, -2.0, 1.5]);
        let wide = tall.transpose();

        for x in [tall, wide] {
            let svd = factorize(&x).unwrap();
            assert_eq!(svd.len(), x.nrows().min(x.ncols()));
            assert!(svd.d.iter().all(|&d| d >= 0.0));

            let rebuilt = &svd.u * DMatrix::from_diagonal(&svd.d) * svd.v.transpose();
            assert!((rebuilt - &x).amax() < 1e-12);
        }
    }

    #[test]
    fn rank_detects_duplicated_column() {
        let x = DMatrix::from_row_slice(3, 2, &[1.0, 1.0, 2.0, 2.0, 3.0, 3.0]);
        let svd = factorize(&x).unwrap();
        assert_eq!(svd.rank(), 1);
    }

    #[test]
    fn problem_rejects_mismatched_lengths() {
        let x = DMatrix::from_row_slice(3, 2, &[1.0, 0.0, 0.0, 1.0, 1.0, 1.0]);
        let svd = factorize(&x).unwrap();

        let short_y = DVector::from_row_slice(&[1.0, 2.0]);
        let x0 = DVector::from_row_slice(&[1.0, 0.0]);
        assert!(matches!(
            RidgeProblem::new(svd.clone(), short_y, &x0),
            Err(FocusError::InvalidDimension(_))
        ));

        let y = DVector::from_row_slice(&[1.0, 2.0, 3.0]);
        let long_x0 = DVector::from_row_slice(&[1.0, 0.0, 0.0]);
        assert!(matches!(
            RidgeProblem::new(svd, y, &long_x0),
            Err(FocusError::InvalidDimension(_))
        ));
    }
}
