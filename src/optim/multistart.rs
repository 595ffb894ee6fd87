//! Multi-start bounded minimization.
//!
//! The focused risk is not guaranteed unimodal in λ, so we run the bounded
//! search from every value of a fixed start ladder and keep the best run.
//!
//! Determinism:
//! - runs are collected in ladder order (rayon's indexed `collect` preserves it)
//! - the reduction is sequential: smallest finite value wins, ties go to the
//!   earliest start
//!
//! so the parallel completion order never affects the answer.

use rayon::prelude::*;

use crate::optim::{BoundedMinimizer, Bounds, Minimum, Objective};

/// One start of the ladder and where it ended.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StartOutcome {
    pub start: f64,
    pub minimum: Minimum,
}

/// All per-start outcomes plus the index of the winner.
#[derive(Debug, Clone, PartialEq)]
pub struct MultiStartResult {
    pub outcomes: Vec<StartOutcome>,
    pub best_index: usize,
}

impl MultiStartResult {
    pub fn best(&self) -> &StartOutcome {
        &self.outcomes[self.best_index]
    }
}

/// Minimize `objective` from each of `starts`.
///
/// Returns `None` when no run produced a finite value.
pub fn multi_start_minimize<M>(
    minimizer: &M,
    objective: &Objective<'_>,
    bounds: Bounds,
    starts: &[f64],
    tolerance: f64,
    parallel: bool,
) -> Option<MultiStartResult>
where
    M: BoundedMinimizer + ?Sized,
{
    let run = |&start: &f64| StartOutcome {
        start,
        minimum: minimizer.minimize(objective, bounds, start, tolerance),
    };

    let outcomes: Vec<StartOutcome> = if parallel {
        starts.par_iter().map(run).collect()
    } else {
        starts.iter().map(run).collect()
    };

    for o in &outcomes {
        log::debug!(
            "start {:.0e}: argmin={:.6e} value={:.6e} converged={}",
            o.start,
            o.minimum.argmin,
            o.minimum.value,
            o.minimum.converged
        );
    }

    let best_index = best_outcome(&outcomes)?;
    Some(MultiStartResult {
        outcomes,
        best_index,
    })
}

/// Index of the smallest finite value; the first one wins a tie.
pub fn best_outcome(outcomes: &[StartOutcome]) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (i, o) in outcomes.iter().enumerate() {
        if !o.minimum.is_finite() {
            continue;
        }
        match best {
            Some(b) if outcomes[b].minimum.value <= o.minimum.value => {}
            _ => best = Some(i),
        }
    }
    best
}
