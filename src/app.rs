//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - loads CSV inputs or generates a synthetic problem
//! - runs the LOOCV and focused tuning searches
//! - prints reports/plots
//! - writes optional exports

use clap::Parser;

use crate::cli::{Command, OutputArgs};
use crate::error::FocusError;

pub mod pipeline;

/// Entry point for the `focus-ridge` binary.
pub fn run() -> Result<(), FocusError> {
    let cli = crate::cli::Cli::parse();

    match cli.command {
        Command::Fit(args) => {
            let run = pipeline::run_fit(&args)?;
            present(&run, &args.output)
        }
        Command::Simulate(args) => {
            let run = pipeline::run_simulate(&args)?;
            present(&run, &args.output)
        }
    }
}

fn present(run: &pipeline::RunOutput, output: &OutputArgs) -> Result<(), FocusError> {
    let selection = &run.selection;
    println!("{}", crate::report::format_run_summary(selection));

    if let Some(sample) = &run.sample {
        let r = selection.result();
        let truth = sample.true_focus_value();
        println!(
            "Truth at focus: {truth:.6} | error focused={:.3e} LOOCV={:.3e}\n",
            (r.focused_prediction - truth).abs(),
            (r.loocv_prediction - truth).abs()
        );
    }

    if output.show_starts {
        println!("{}", crate::report::format_starts(selection));
    }

    if let Some(path) = &output.export {
        crate::io::write_result_json(path, selection)?;
        log::info!("wrote {}", path.display());
    }

    Ok(())
}
