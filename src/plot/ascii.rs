//! ASCII plotting of a risk curve for terminal output.
//!
//! Fixed-size grid, deterministic output:
//! - risk curve: `-` line
//! - located minimum: `*`

use crate::error::FocusError;
use crate::plot::{RiskCurve, RiskPlotter};

/// Prints the curve to stdout.
#[derive(Debug, Clone, Copy)]
pub struct AsciiPlotter {
    pub width: usize,
    pub height: usize,
}

impl RiskPlotter for AsciiPlotter {
    fn render(&self, curve: &RiskCurve<'_>) -> Result<(), FocusError> {
        println!("{}", render_ascii_risk_curve(curve, self.width, self.height));
        Ok(())
    }
}

/// Render a risk curve to a string.
pub fn render_ascii_risk_curve(curve: &RiskCurve<'_>, width: usize, height: usize) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let (x_min, x_max) = curve.plot_domain();
    let points = curve.sample(width);

    let (y_min, y_max) = y_range(&points, curve.minimum).unwrap_or((0.0, 1.0));
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];
    draw_curve(&mut grid, &points, x_min, x_max, y_min, y_max);

    let (lambda_min, risk_min) = curve.minimum;
    if lambda_min.is_finite() && risk_min.is_finite() {
        let x = map_x(lambda_min, x_min, x_max, width);
        let y = map_y(risk_min, y_min, y_max, height);
        grid[y][x] = '*';
    }

    let mut out = String::new();
    out.push_str(&format!(
        "{}: lambda=[{x_min:.3}, {x_max:.3}] | risk=[{y_min:.4e}, {y_max:.4e}] | min at lambda={lambda_min:.4}\n",
        curve.label
    ));
    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }
    out
}

fn y_range(points: &[(f64, f64)], minimum: (f64, f64)) -> Option<(f64, f64)> {
    let mut min_y = f64::INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    for &(_, y) in points.iter().chain(std::iter::once(&minimum)) {
        if y.is_finite() {
            min_y = min_y.min(y);
            max_y = max_y.max(y);
        }
    }
    if min_y.is_finite() && max_y.is_finite() && max_y > min_y {
        Some((min_y, max_y))
    } else if min_y.is_finite() {
        Some((min_y - 0.5, min_y + 0.5))
    } else {
        None
    }
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(1e-12);
    (min - pad, max + pad)
}

fn map_x(x: f64, x_min: f64, x_max: f64, width: usize) -> usize {
    let width = width.max(2);
    let u = ((x - x_min) / (x_max - x_min)).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // Row 0 is the top of the plot.
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

fn draw_curve(grid: &mut [Vec<char>], curve: &[(f64, f64)], x_min: f64, x_max: f64, y_min: f64, y_max: f64) {
    if curve.is_empty() {
        return;
    }
    let height = grid.len();
    let width = grid[0].len();

    let mut prev = None;
    for &(x, y) in curve {
        let px = map_x(x, x_min, x_max, width);
        let py = map_y(y, y_min, y_max, height);
        match prev {
            Some((x0, y0)) => draw_line(grid, x0, y0, px, py, '-'),
            None => grid[py][px] = '-',
        }
        prev = Some((px, py));
    }
}

/// Integer line drawing (Bresenham).
fn draw_line(grid: &mut [Vec<char>], x0: usize, y0: usize, x1: usize, y1: usize, ch: char) {
    let mut x0 = x0 as isize;
    let mut y0 = y0 as isize;
    let x1 = x1 as isize;
    let y1 = y1 as isize;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if y0 >= 0
            && (y0 as usize) < grid.len()
            && x0 >= 0
            && (x0 as usize) < grid[0].len()
            && grid[y0 as usize][x0 as usize] == ' '
        {
            grid[y0 as usize][x0 as usize] = ch;
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plot_golden_snapshot_small() {
        let f = |x: f64| (x - 1.0).abs();
        let curve = RiskCurve {
            label: "Focused risk",
            risk: &f,
            domain: (0.0, 2.0),
            minimum: (1.0, 0.0),
        };

        let txt = render_ascii_risk_curve(&curve, 11, 5);
        let expected = concat!(
            "Focused risk: lambda=[0.000, 2.000] | risk=[-5.0000e-2, 1.0500e0] | min at lambda=1.0000\n",
            "-         -\n",
            " -       - \n",
            "  --   --  \n",
            "    - -    \n",
            "     *     \n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn flat_curve_still_renders() {
        let f = |_x: f64| 3.0;
        let curve = RiskCurve {
            label: "flat",
            risk: &f,
            domain: (0.0, 0.0),
            minimum: (0.0, 3.0),
        };
        let txt = render_ascii_risk_curve(&curve, 10, 5);
        assert!(txt.contains('*'));
        assert_eq!(txt.lines().count(), 6);
    }
}
