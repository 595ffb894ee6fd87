//! Risk-curve plotting.
//!
//! Plotting is a collaborator of the selection routine, never an input to it:
//! the routine finishes every tuning parameter first, then hands each plotter a
//! `RiskCurve` (the bound risk function, the domain `[0, endpoint]` and the
//! located minimum).
//!
//! - `ascii`: fixed-size terminal grid
//! - `svg`: Plotters SVG file

pub mod ascii;
pub mod svg;

pub use ascii::*;
pub use svg::*;

use crate::error::FocusError;
use crate::optim::Objective;

/// Everything a plotter needs to draw one risk curve.
pub struct RiskCurve<'a> {
    pub label: &'a str,
    pub risk: &'a Objective<'a>,
    /// `(0, endpoint)`.
    pub domain: (f64, f64),
    /// `(λ, risk(λ))` at the located minimum.
    pub minimum: (f64, f64),
}

impl RiskCurve<'_> {
    /// Domain actually drawn; a zero-width domain is widened to `[start, start + 1]`.
    pub fn plot_domain(&self) -> (f64, f64) {
        let (start, end) = self.domain;
        if end > start { (start, end) } else { (start, start + 1.0) }
    }

    /// `n` evenly spaced samples over the plot domain, non-finite values dropped.
    pub fn sample(&self, n: usize) -> Vec<(f64, f64)> {
        let n = n.max(2);
        let (start, end) = self.plot_domain();
        (0..n)
            .map(|i| {
                let u = i as f64 / (n as f64 - 1.0);
                let lambda = start + u * (end - start);
                (lambda, (self.risk)(lambda))
            })
            .filter(|&(_, r)| r.is_finite())
            .collect()
    }
}

/// A renderer for a finalized risk curve.
pub trait RiskPlotter {
    fn render(&self, curve: &RiskCurve<'_>) -> Result<(), FocusError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_covers_domain_and_drops_non_finite() {
        let f = |x: f64| if x == 0.0 { f64::INFINITY } else { x * x };
        let curve = RiskCurve {
            label: "test",
            risk: &f,
            domain: (0.0, 4.0),
            minimum: (2.0, 4.0),
        };
        let pts = curve.sample(5);
        assert_eq!(pts.len(), 4);
        assert_eq!(pts[0], (1.0, 1.0));
        assert_eq!(pts[3], (4.0, 16.0));
    }

    #[test]
    fn zero_width_domain_is_widened() {
        let f = |x: f64| x;
        let curve = RiskCurve {
            label: "test",
            risk: &f,
            domain: (0.0, 0.0),
            minimum: (0.0, 0.0),
        };
        assert_eq!(curve.plot_domain(), (0.0, 1.0));
    }
}
