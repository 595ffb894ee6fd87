//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the numerical code stays clean and testable
//! - output changes are localized

use crate::fit::FocusSelection;

/// Format the full run summary (problem shape, plug-in, both tunings, predictions).
pub fn format_run_summary(selection: &FocusSelection) -> String {
    let problem = selection.problem();
    let svd = problem.svd();
    let r = selection.result();
    let (bias_sq, variance) = selection.focused_decomposition();

    let mut out = String::new();
    out.push_str("=== focus-ridge - focused ridge tuning ===\n");
    out.push_str(&format!(
        "Design: n={} p={} rank={} | d=[{:.4}, {:.4}]\n",
        problem.n(),
        problem.p(),
        svd.rank(),
        svd.d.min(),
        svd.d.max()
    ));
    out.push_str(&format!(
        "Plug-in: {} | sigma2={:.6e}\n",
        selection.plug_in().display_name(),
        selection.sigma2()
    ));

    out.push_str("\nTuning:\n");
    out.push_str(&format!(
        "  {:<8} lambda={:<14.6e} prediction={:.6}\n",
        "focused", r.focused_tuning, r.focused_prediction
    ));
    out.push_str(&format!(
        "  {:<8} lambda={:<14.6e} prediction={:.6}\n",
        "LOOCV", r.loocv_tuning, r.loocv_prediction
    ));
    out.push_str(&format!(
        "\nFocused risk at optimum: {:.6e} (bias^2={:.6e}, variance={:.6e})\n",
        bias_sq + variance,
        bias_sq,
        variance
    ));
    out.push_str(&format!("LOOCV risk at optimum:   {:.6e}\n", selection.loocv().value));
    out.push_str(&format!(
        "Coefficients (focused): {}\n",
        fmt_vec(selection.focused_coefficients().as_slice())
    ));
    out.push_str(&format!(
        "Coefficients (LOOCV):   {}\n",
        fmt_vec(selection.loocv_coefficients().as_slice())
    ));

    out
}

/// Per-start table for the focused-risk ladder; the winner is starred.
pub fn format_starts(selection: &FocusSelection) -> String {
    let focused = selection.focused();
    let mut out = String::new();
    out.push_str("Multi-start ladder:\n");
    out.push_str(&format!(
        "  {:>8}  {:>14}  {:>14}  {:>5}  {}\n",
        "start", "lambda", "risk", "iters", "converged"
    ));
    for (i, o) in focused.outcomes.iter().enumerate() {
        let chosen = if i == focused.best_index { "*" } else { " " };
        out.push_str(&format!(
            "{chosen} {:>8.0e}  {:>14.6e}  {:>14.6e}  {:>5}  {}\n",
            o.start, o.minimum.argmin, o.minimum.value, o.minimum.iterations, o.minimum.converged
        ));
    }
    out
}

fn fmt_vec(values: &[f64]) -> String {
    let parts: Vec<String> = values.iter().map(|v| format!("{v:.6}")).collect();
    format!("[{}]", parts.join(", "))
}
