//! Command-line parsing for the predictor-selection tool.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! selection code. Flags map one-to-one onto the config structs in `fit`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::{FitFailurePolicy, SubsetCriterion};
use crate::fit::DEFAULT_STOPPING_THRESHOLD;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "regsel", version, about = "Predictor selection for OLS linear regression")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fit every subset of predictors and keep the best by Mallow's Cp.
    Subsets(SubsetArgs),
    /// Add predictors one at a time while the partial F-ratio clears a threshold.
    Forward(ForwardArgs),
    /// Write a synthetic dataset with known informative predictors.
    Generate(GenerateArgs),
}

/// Input table options shared by both searches.
#[derive(Debug, Args, Clone)]
pub struct DataArgs {
    /// CSV file with a header row.
    #[arg(short = 'd', long, value_name = "CSV")]
    pub data: PathBuf,

    /// Response column.
    #[arg(short = 'y', long, default_value = "y")]
    pub response: String,

    /// Predictor columns, comma separated (default: every other column).
    #[arg(short = 'f', long, value_delimiter = ',')]
    pub features: Option<Vec<String>>,

    /// What to do when a candidate subset cannot be fit (e.g. collinear columns).
    #[arg(long, value_enum, default_value_t = FitFailurePolicy::Abort)]
    pub on_fit_failure: FitFailurePolicy,

    /// Export the selection report to JSON.
    #[arg(long, value_name = "JSON")]
    pub export: Option<PathBuf>,

    /// Log search progress (per-size counts, rounds, timings).
    #[arg(short = 'v', long)]
    pub verbose: bool,
}

#[derive(Debug, Args, Clone)]
pub struct SubsetArgs {
    #[command(flatten)]
    pub data: DataArgs,

    /// Criterion used to rank subsets.
    #[arg(long, value_enum, default_value_t = SubsetCriterion::Cp)]
    pub criterion: SubsetCriterion,

    /// Export every evaluated subset to CSV.
    #[arg(long = "export-models", value_name = "CSV")]
    pub export_models: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct ForwardArgs {
    #[command(flatten)]
    pub data: DataArgs,

    /// F-ratio a candidate must reach to be added.
    #[arg(short = 't', long, default_value_t = DEFAULT_STOPPING_THRESHOLD)]
    pub threshold: f64,
}

#[derive(Debug, Args, Clone)]
pub struct GenerateArgs {
    /// Output CSV path.
    #[arg(short = 'o', long, value_name = "CSV")]
    pub out: PathBuf,

    /// Number of rows.
    #[arg(short = 'n', long, default_value_t = 100)]
    pub rows: usize,

    /// Number of predictor columns.
    #[arg(short = 'p', long, default_value_t = 6)]
    pub features: usize,

    /// How many of the leading predictors drive the response.
    #[arg(long, default_value_t = 3)]
    pub informative: usize,

    /// Standard deviation of the response noise.
    #[arg(long, default_value_t = 1.0)]
    pub noise: f64,

    /// Random seed.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,
}
