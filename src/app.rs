//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and sets up logging
//! - parses CLI arguments
//! - runs the requested search
//! - prints reports
//! - writes optional exports

use clap::Parser;

use crate::cli::{Command, DataArgs, ForwardArgs, GenerateArgs, SubsetArgs};
use crate::data::SampleConfig;
use crate::domain::DataSource;
use crate::error::AppError;
use crate::fit::{ForwardConfig, SubsetConfig};

pub mod pipeline;

/// Environment variable holding the `env_logger` filter.
pub const LOG_ENV: &str = "REGSEL_LOG";

/// Entry point for the `regsel` binary.
pub fn run() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    let cli = crate::cli::Cli::parse();

    let verbose = match &cli.command {
        Command::Subsets(args) => args.data.verbose,
        Command::Forward(args) => args.data.verbose,
        Command::Generate(_) => false,
    };
    init_logging(verbose);

    match cli.command {
        Command::Subsets(args) => handle_subsets(args),
        Command::Forward(args) => handle_forward(args),
        Command::Generate(args) => handle_generate(args),
    }
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "warn,regsel=info" } else { "warn" };
    // A second init (e.g. from tests) is harmless.
    let _ = env_logger::Builder::from_env(env_logger::Env::default().filter_or(LOG_ENV, default_filter))
        .format_timestamp(None)
        .try_init();
}

fn handle_subsets(args: SubsetArgs) -> Result<(), AppError> {
    let source = data_source_from_args(&args.data);
    let config = subset_config_from_args(&args);
    let run = pipeline::run_subsets(&source, &config)?;

    println!(
        "{}",
        crate::report::format_subset_summary(&run.dataset, &run.selection)
    );

    if let Some(path) = &args.data.export {
        let report = crate::report::subset_report(&run.dataset, &run.selection);
        crate::io::write_report_json(path, &report)?;
    }
    if let Some(path) = &args.export_models {
        crate::io::write_subsets_csv(path, &run.selection, &run.dataset)?;
    }

    Ok(())
}

fn handle_forward(args: ForwardArgs) -> Result<(), AppError> {
    let source = data_source_from_args(&args.data);
    let config = forward_config_from_args(&args);
    let run = pipeline::run_forward(&source, &config)?;

    println!(
        "{}",
        crate::report::format_forward_summary(&run.dataset, &run.outcome, config.stopping_threshold)
    );

    if let Some(path) = &args.data.export {
        let report = crate::report::forward_report(&run.dataset, &run.outcome);
        crate::io::write_report_json(path, &report)?;
    }

    Ok(())
}

fn handle_generate(args: GenerateArgs) -> Result<(), AppError> {
    let config = SampleConfig {
        rows: args.rows,
        features: args.features,
        informative: args.informative,
        noise: args.noise,
        seed: args.seed,
    };
    let dataset = crate::data::generate_dataset(&config)?;
    crate::io::write_dataset_csv(&args.out, &dataset)?;
    println!(
        "Wrote {} rows x {} features to {}",
        dataset.n_rows(),
        dataset.n_features(),
        args.out.display()
    );
    Ok(())
}

pub fn data_source_from_args(args: &DataArgs) -> DataSource {
    DataSource {
        path: args.data.clone(),
        response: args.response.clone(),
        features: args.features.clone(),
    }
}

pub fn subset_config_from_args(args: &SubsetArgs) -> SubsetConfig {
    SubsetConfig {
        criterion: args.criterion,
        on_fit_failure: args.data.on_fit_failure,
        verbose: args.data.verbose,
    }
}

pub fn forward_config_from_args(args: &ForwardArgs) -> ForwardConfig {
    ForwardConfig {
        stopping_threshold: args.threshold,
        on_fit_failure: args.data.on_fit_failure,
        verbose: args.data.verbose,
    }
}
