//! Bounded univariate minimization.
//!
//! Both tuning-parameter searches (LOOCV and focused risk) go through the same
//! strategy: a `BoundedMinimizer` receives the objective, the feasible interval,
//! a start value and a tolerance, and returns the best point it found.
//!
//! - `QuasiNewton` is the default strategy.
//! - Any function or closure with the same signature is also a strategy, which
//!   keeps tests and alternative searches free of global configuration.
//! - `multistart` runs a strategy from a ladder of starts and keeps the best.

pub mod multistart;
pub mod quasi_newton;

pub use multistart::*;
pub use quasi_newton::*;

/// Objective type shared by every strategy.
pub type Objective<'a> = dyn Fn(f64) -> f64 + Sync + 'a;

/// Closed feasible interval `[lower, upper]`; `upper` may be `+∞`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub lower: f64,
    pub upper: f64,
}

impl Bounds {
    /// `[0, ∞)`, the domain of a ridge penalty.
    pub fn non_negative() -> Self {
        Self {
            lower: 0.0,
            upper: f64::INFINITY,
        }
    }

    pub fn clamp(&self, x: f64) -> f64 {
        x.max(self.lower).min(self.upper)
    }
}

/// Outcome of one bounded run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Minimum {
    pub argmin: f64,
    /// Objective at `argmin`. Non-finite only if the start itself was.
    pub value: f64,
    pub iterations: usize,
    pub evaluations: usize,
    pub converged: bool,
}

impl Minimum {
    /// `true` when this outcome is a usable candidate.
    pub fn is_finite(&self) -> bool {
        self.argmin.is_finite() && self.value.is_finite()
    }
}

/// Injected minimization strategy.
pub trait BoundedMinimizer: Sync {
    fn minimize(
        &self,
        objective: &Objective<'_>,
        bounds: Bounds,
        start: f64,
        tolerance: f64,
    ) -> Minimum;
}

impl<F> BoundedMinimizer for F
where
    F: Fn(&Objective<'_>, Bounds, f64, f64) -> Minimum + Sync,
{
    fn minimize(
        &self,
        objective: &Objective<'_>,
        bounds: Bounds,
        start: f64,
        tolerance: f64,
    ) -> Minimum {
        self(objective, bounds, start, tolerance)
    }
}
