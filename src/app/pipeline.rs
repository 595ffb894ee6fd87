//! Shared input/selection pipeline for both subcommands.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! inputs (CSV or synthetic) -> config -> selection -> plotters
//!
//! `app` then focuses on presentation (printing and exports).

use crate::cli::{FitArgs, OutputArgs, SimulateArgs, TuningArgs};
use crate::data::{SampleConfig, SampleData, generate_sample};
use crate::domain::FocusConfig;
use crate::error::FocusError;
use crate::fit::{FocusInputs, FocusSelection, run_focus};
use crate::io::{read_matrix_csv, read_vector_csv};
use crate::plot::{AsciiPlotter, RiskPlotter, SvgPlotter};

/// All computed outputs of a single run.
#[derive(Debug)]
pub struct RunOutput {
    pub selection: FocusSelection,
    /// Present for `simulate`, where the truth is known.
    pub sample: Option<SampleData>,
}

/// Map CLI options onto a run configuration.
pub fn focus_config_from_args(tuning: &TuningArgs, output: &OutputArgs) -> FocusConfig {
    let defaults = FocusConfig::default();
    FocusConfig {
        starts: tuning.starts.clone().unwrap_or(defaults.starts),
        max_iterations: tuning.max_iterations,
        plot_endpoint_cap: tuning.plot_cap,
        parallel: !tuning.sequential,
        render_curve: output.wants_curve(),
        ..defaults
    }
}

pub fn load_inputs(args: &FitArgs) -> Result<FocusInputs, FocusError> {
    let inputs = FocusInputs {
        design: read_matrix_csv(&args.design)?,
        response: read_vector_csv(&args.response)?,
        focus: read_vector_csv(&args.focus)?,
    };
    log::info!(
        "loaded design {}x{} from {}",
        inputs.design.nrows(),
        inputs.design.ncols(),
        args.design.display()
    );
    Ok(inputs)
}

pub fn simulate_sample(args: &SimulateArgs) -> Result<SampleData, FocusError> {
    let mut config = SampleConfig::descending(args.n, args.p, args.noise, args.seed);
    config.focus_index = args.focus_index;
    generate_sample(&config)
}

/// Run selection and hand the curve to whichever plotters the output options ask for.
pub fn run_selection(
    inputs: &FocusInputs,
    tuning: &TuningArgs,
    output: &OutputArgs,
) -> Result<FocusSelection, FocusError> {
    let config = focus_config_from_args(tuning, output);

    let ascii = AsciiPlotter {
        width: output.width,
        height: output.height,
    };
    let svg = output.svg.as_ref().map(SvgPlotter::new);

    let mut plotters: Vec<&dyn RiskPlotter> = Vec::new();
    if output.plot {
        plotters.push(&ascii);
    }
    if let Some(svg) = &svg {
        plotters.push(svg);
    }

    run_focus(inputs, tuning.plug_in, &config, &plotters)
}

pub fn run_fit(args: &FitArgs) -> Result<RunOutput, FocusError> {
    let inputs = load_inputs(args)?;
    let selection = run_selection(&inputs, &args.tuning, &args.output)?;
    Ok(RunOutput {
        selection,
        sample: None,
    })
}

pub fn run_simulate(args: &SimulateArgs) -> Result<RunOutput, FocusError> {
    let sample = simulate_sample(args)?;
    let inputs = FocusInputs {
        design: sample.design.clone(),
        response: sample.response.clone(),
        focus: sample.focus.clone(),
    };
    let selection = run_selection(&inputs, &args.tuning, &args.output)?;
    Ok(RunOutput {
        selection,
        sample: Some(sample),
    })
}
