//! Plotters-powered SVG rendering of a risk curve.
//!
//! We draw the sampled curve plus a marker and a vertical guide at the located
//! minimum. No mesh or tick labels: text rendering would pull in font
//! dependencies, and the terminal summary already prints the numbers.

use std::path::PathBuf;

use plotters::prelude::*;

use crate::error::FocusError;
use crate::plot::{RiskCurve, RiskPlotter};

/// Samples drawn along the curve.
const SAMPLES: usize = 400;

#[derive(Debug, Clone)]
pub struct SvgPlotter {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
}

impl SvgPlotter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            width: 800,
            height: 500,
        }
    }
}

fn plot_err<E: std::fmt::Display>(e: E) -> FocusError {
    FocusError::Plot(e.to_string())
}

impl RiskPlotter for SvgPlotter {
    fn render(&self, curve: &RiskCurve<'_>) -> Result<(), FocusError> {
        let points = curve.sample(SAMPLES);
        if points.len() < 2 {
            return Err(FocusError::Plot(format!(
                "{}: fewer than two finite points to draw",
                curve.label
            )));
        }

        let (x0, x1) = curve.plot_domain();
        let (mut y0, mut y1) = points
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &(_, y)| (lo.min(y), hi.max(y)));
        if y1 <= y0 {
            y0 -= 0.5;
            y1 += 0.5;
        }
        let pad = 0.05 * (y1 - y0);
        let (y0, y1) = (y0 - pad, y1 + pad);

        let root = SVGBackend::new(&self.path, (self.width, self.height)).into_drawing_area();
        root.fill(&WHITE).map_err(plot_err)?;

        let mut chart = ChartBuilder::on(&root)
            .margin(10)
            .build_cartesian_2d(x0..x1, y0..y1)
            .map_err(plot_err)?;

        let curve_color = RGBColor(0, 90, 200);
        chart
            .draw_series(LineSeries::new(points.iter().copied(), &curve_color))
            .map_err(plot_err)?;

        let (lambda_min, risk_min) = curve.minimum;
        if lambda_min.is_finite() && risk_min.is_finite() {
            chart
                .draw_series(LineSeries::new(
                    [(lambda_min, y0), (lambda_min, y1)],
                    RED.mix(0.4),
                ))
                .map_err(plot_err)?;
            chart
                .draw_series(std::iter::once(Circle::new((lambda_min, risk_min), 4, RED.filled())))
                .map_err(plot_err)?;
        }

        root.present().map_err(plot_err)?;
        log::info!("wrote {} curve to {}", curve.label, self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_svg_file() {
        let path = std::env::temp_dir().join(format!("focus_ridge_svg_test_{}.svg", std::process::id()));
        let f = |x: f64| (x - 2.0).powi(2) + 0.5;
        let curve = RiskCurve {
            label: "Focused risk",
            risk: &f,
            domain: (0.0, 4.0),
            minimum: (2.0, 0.5),
        };

        SvgPlotter::new(&path).render(&curve).unwrap();
        let body = std::fs::read_to_string(&path).unwrap();
        assert!(body.contains("<svg"));
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn refuses_curve_without_finite_points() {
        let f = |_x: f64| f64::NAN;
        let curve = RiskCurve {
            label: "LOOCV",
            risk: &f,
            domain: (0.0, 1.0),
            minimum: (0.5, f64::NAN),
        };
        let path = std::env::temp_dir().join("focus_ridge_never_written.svg");
        assert!(matches!(SvgPlotter::new(path).render(&curve), Err(FocusError::Plot(_))));
    }
}
