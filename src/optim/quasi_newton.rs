//! Projected quasi-Newton search on a bounded interval.
//!
//! Each iteration:
//!
//! 1. estimates the derivative by finite differences (central in the interior,
//!    one-sided at a bound)
//! 2. takes a secant (1-D BFGS) step when the last two gradients show positive
//!    curvature, otherwise a downhill step of twice the previous length (the
//!    first one is as long as the iterate itself, so large starts move)
//! 3. projects the trial point onto the bounds and backtracks until the Armijo
//!    condition holds
//!
//! A run stops when the scaled projected gradient `|g|·max(|x|, 1)` falls
//! below `tolerance · max(|f|, 1)`, or when a secant step improves the
//! objective by less than `tolerance` relative to its value. Fallback steps
//! carry no curvature model, so a small decrease along one is not taken as
//! convergence.
//!
//! Non-finite objective values are rejected: the line search treats them as
//! `+∞`, so the iterate never moves onto them. The current iterate is always
//! the best point seen, so hitting the iteration cap still returns something
//! usable.

use crate::optim::{BoundedMinimizer, Bounds, Minimum, Objective};

/// Relative finite-difference step.
const FD_STEP: f64 = 1e-6;

/// Sufficient-decrease constant for the Armijo test.
const ARMIJO_C1: f64 = 1e-4;

const MAX_BACKTRACKS: usize = 50;

/// Length of the first step, relative to `max(|x|, 1)`, when no curvature is known yet.
const INITIAL_STEP: f64 = 1.0;

#[derive(Debug, Clone, Copy)]
pub struct QuasiNewton {
    pub max_iterations: usize,
}

impl Default for QuasiNewton {
    fn default() -> Self {
        Self { max_iterations: 200 }
    }
}

impl QuasiNewton {
    pub fn with_max_iterations(max_iterations: usize) -> Self {
        Self { max_iterations }
    }
}

struct Evaluator<'a, 'f> {
    objective: &'a Objective<'f>,
    count: usize,
}

impl Evaluator<'_, '_> {
    fn value(&mut self, x: f64) -> f64 {
        self.count += 1;
        let v = (self.objective)(x);
        if v.is_finite() {
            v
        } else {
            log::debug!("rejecting non-finite objective value {v} at x={x:.6e}");
            f64::INFINITY
        }
    }

    fn gradient(&mut self, x: f64, fx: f64, bounds: Bounds) -> Option<f64> {
        let h = FD_STEP * x.abs().max(1.0);
        let can_up = x + h <= bounds.upper;
        let can_down = x - h >= bounds.lower;

        let f_up = if can_up { self.value(x + h) } else { f64::INFINITY };
        let f_down = if can_down { self.value(x - h) } else { f64::INFINITY };

        let g = match (f_up.is_finite(), f_down.is_finite()) {
            (true, true) => (f_up - f_down) / (2.0 * h),
            (true, false) => (f_up - fx) / h,
            (false, true) => (fx - f_down) / h,
            (false, false) => return None,
        };
        g.is_finite().then_some(g)
    }
}

impl BoundedMinimizer for QuasiNewton {
    fn minimize(
        &self,
        objective: &Objective<'_>,
        bounds: Bounds,
        start: f64,
        tolerance: f64,
    ) -> Minimum {
        let mut ev = Evaluator {
            objective,
            count: 0,
        };

        let mut x = bounds.clamp(start);
        let mut fx = ev.value(x);
        if !fx.is_finite() {
            log::debug!("objective is not finite at start {start:.6e}");
            return Minimum {
                argmin: x,
                value: fx,
                iterations: 0,
                evaluations: ev.count,
                converged: false,
            };
        }

        let mut previous: Option<(f64, f64)> = None;
        let mut fallback_step = INITIAL_STEP * x.abs().max(1.0);
        let mut converged = false;
        let mut iterations = 0;

        while iterations < self.max_iterations {
            iterations += 1;

            let Some(g) = ev.gradient(x, fx, bounds) else {
                log::debug!("gradient unavailable at x={x:.6e}; stopping");
                break;
            };

            let blocked_low = x <= bounds.lower && g > 0.0;
            let blocked_high = x >= bounds.upper && g < 0.0;
            let stationary = g.abs() * x.abs().max(1.0) <= tolerance * fx.abs().max(1.0);
            if stationary || blocked_low || blocked_high {
                converged = true;
                break;
            }

            let curvature = previous.and_then(|(xp, gp)| {
                let b = (g - gp) / (x - xp);
                (b.is_finite() && b > 0.0).then_some(b)
            });
            let step = match curvature {
                Some(b) => -g / b,
                None => -g.signum() * fallback_step,
            };

            let mut alpha = 1.0;
            let mut accepted = None;
            for _ in 0..MAX_BACKTRACKS {
                let trial = bounds.clamp(x + alpha * step);
                let dx = trial - x;
                if dx == 0.0 {
                    break;
                }
                let ft = ev.value(trial);
                if ft <= fx + ARMIJO_C1 * g * dx {
                    accepted = Some((trial, ft));
                    break;
                }
                alpha *= 0.5;
            }

            let Some((x_new, f_new)) = accepted else {
                // No descent along the estimated gradient: stationary to working precision.
                converged = true;
                break;
            };

            let decrease = fx - f_new;
            let scale = fx.abs().max(f_new.abs());
            previous = Some((x, g));
            fallback_step = 2.0 * (x_new - x).abs();
            x = x_new;
            fx = f_new;

            if curvature.is_some() && decrease <= tolerance * scale {
                converged = true;
                break;
            }
        }

        log::debug!(
            "bounded search from {start:.3e}: argmin={x:.6e} value={fx:.6e} iterations={iterations} converged={converged}"
        );

        Minimum {
            argmin: x,
            value: fx,
            iterations,
            evaluations: ev.count,
            converged,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(f: &Objective<'_>, start: f64) -> Minimum {
        QuasiNewton::default().minimize(f, Bounds::non_negative(), start, 1e-10)
    }

    #[test]
    fn finds_interior_minimum() {
        let m = run(&|x: f64| (x - 3.0).powi(2) + 1.0, 10.0);
        assert!((m.argmin - 3.0).abs() < 1e-3, "argmin={}", m.argmin);
        assert!((m.value - 1.0).abs() < 1e-6);
    }

    #[test]
    fn stops_at_lower_bound() {
        let m = run(&|x: f64| (x + 1.0).powi(2), 5.0);
        assert_eq!(m.argmin, 0.0);
        assert!(m.converged);
        assert!((m.value - 1.0).abs() < 1e-12);
    }

    #[test]
    fn travels_across_scales() {
        let m = run(&|x: f64| (x / 1000.0 - 5.0).powi(2), 10.0);
        assert!((m.argmin - 5000.0).abs() < 1.0, "argmin={}", m.argmin);
    }

    #[test]
    fn rejects_non_finite_region() {
        let f = |x: f64| if x < 0.5 { f64::NAN } else { (x - 0.2).powi(2) };
        let m = run(&f, 4.0);
        assert!(m.value.is_finite());
        assert!(m.argmin >= 0.5);
        assert!(m.argmin < 0.6, "argmin={}", m.argmin);
    }

    #[test]
    fn non_finite_start_is_reported_not_panicked() {
        let m = run(&|_x: f64| f64::INFINITY, 1.0);
        assert!(!m.is_finite());
        assert!(!m.converged);
        assert_eq!(m.iterations, 0);
    }

    #[test]
    fn large_start_keeps_descending() {
        // Offset and loose tolerance make every early step a tiny relative decrease.
        let f = |x: f64| 1e4 + x.ln().powi(2);
        let m = QuasiNewton::default().minimize(&f, Bounds::non_negative(), 1e4, 1e-6);
        assert!(m.iterations > 1, "iterations={}", m.iterations);
        assert!(m.argmin > 0.5 && m.argmin < 2.0, "argmin={}", m.argmin);
        assert!(m.value < 1e4 + 0.5);
    }

    #[test]
    fn first_step_scales_with_the_start() {
        let m = run(&|x: f64| (x - 2e5).powi(2), 1e5);
        assert!((m.argmin / 2e5 - 1.0).abs() < 1e-6, "argmin={}", m.argmin);
    }

    #[test]
    fn never_worse_than_start() {
        let f = |x: f64| (x.ln() - 2.0).powi(2) * (1.0 + (x / 50.0).sin().abs());
        for &start in &[0.5, 7.0, 300.0] {
            let m = run(&f, start);
            assert!(m.value <= f(start));
        }
    }
}
