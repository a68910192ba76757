//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the validated input table (`Dataset`)
//! - per-fit and final outputs (`FitResult`, `SelectedModel`)
//! - search configuration enums (`SubsetCriterion`, `FitFailurePolicy`)
//! - the serializable selection report

pub mod dataset;
pub mod types;

pub use dataset::*;
pub use types::*;
