//! Shared domain types.
//!
//! Fit outputs are generic over the solver's model handle so the search code
//! never depends on a concrete OLS implementation. The report types at the
//! bottom are plain data and serializable so they can be exported to JSON.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::fit::criteria;
use crate::math::{FittedModel, OlsModel};

/// One OLS fit on a feature subset.
#[derive(Debug, Clone)]
pub struct FitResult<M = OlsModel> {
    /// Solver-owned model handle.
    pub model: M,
    /// Feature indices (into the dataset) in design-column order.
    pub features: Vec<usize>,
    /// Residual sum of squares.
    pub rss: f64,
    /// Residual degrees of freedom reported by the solver.
    pub df_resid: usize,
}

impl<M> FitResult<M> {
    /// Number of predictors `k` in the fit.
    pub fn n_features(&self) -> usize {
        self.features.len()
    }
}

/// The model a search settles on, with the names of its predictors.
#[derive(Debug, Clone)]
pub struct SelectedModel<M = OlsModel> {
    pub fit: FitResult<M>,
    /// Predictor names in design-column order.
    pub features: Vec<String>,
}

impl<M: FittedModel> SelectedModel<M> {
    /// `(feature, coefficient)` pairs in design-column order.
    pub fn coefficients(&self) -> Vec<NamedCoefficient> {
        self.features
            .iter()
            .zip(self.fit.model.coefficients().iter())
            .map(|(name, &value)| NamedCoefficient {
                feature: name.clone(),
                value,
            })
            .collect()
    }
}

/// Criterion used to rank subsets in the exhaustive search.
///
/// All three share the error-variance estimate `σ̂² = RSS_min / (m - p - 1)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SubsetCriterion {
    /// Mallow's Cp: `(RSS + 2kσ̂²) / m`.
    Cp,
    /// `(RSS + 2kσ̂²) / (mσ̂²)`.
    Aic,
    /// `(RSS + ln(m)kσ̂²) / m`.
    Bic,
}

impl SubsetCriterion {
    pub fn display_name(self) -> &'static str {
        match self {
            SubsetCriterion::Cp => "Mallow's Cp",
            SubsetCriterion::Aic => "AIC",
            SubsetCriterion::Bic => "BIC",
        }
    }

    /// Score a fit with `k` predictors on `m` rows.
    pub fn evaluate(self, rss: f64, k: usize, sigma_squared: f64, m: usize) -> f64 {
        match self {
            SubsetCriterion::Cp => criteria::mallows_cp(rss, k, sigma_squared, m),
            SubsetCriterion::Aic => criteria::aic(rss, k, sigma_squared, m),
            SubsetCriterion::Bic => criteria::bic(rss, k, sigma_squared, m),
        }
    }
}

/// What to do when the solver cannot fit a candidate subset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FitFailurePolicy {
    /// Stop the whole search on the first failed fit.
    Abort,
    /// Record the failure and leave the subset out of the comparison.
    Skip,
}

/// A candidate fit left out under [`FitFailurePolicy::Skip`].
#[derive(Debug, Clone)]
pub struct SkippedFit {
    pub features: Vec<String>,
    pub reason: String,
}

/// Which engine produced a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    AllSubsets,
    Forward,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedCoefficient {
    pub feature: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriterionValue {
    pub name: String,
    /// `None` when the value is not finite (an exact fit has an infinite F),
    /// since JSON has no representation for it.
    pub value: Option<f64>,
}

impl CriterionValue {
    pub fn new(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            value: value.is_finite().then_some(value),
        }
    }
}

/// Exported summary of a finished selection run (JSON).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectionReport {
    pub tool: String,
    pub generated_at: DateTime<Utc>,
    pub strategy: Strategy,
    pub response: String,
    pub n_rows: usize,
    pub n_features: usize,
    /// Selected predictors; empty when forward selection accepted nothing.
    pub selected: Vec<String>,
    pub coefficients: Vec<NamedCoefficient>,
    pub rss: f64,
    /// Absent when no model was fit (empty forward selection).
    pub df_resid: Option<usize>,
    pub criterion: Option<CriterionValue>,
    /// Number of candidate fits the search evaluated.
    pub models_evaluated: usize,
    pub models_skipped: usize,
}

/// Where the table comes from and which columns to use.
#[derive(Debug, Clone)]
pub struct DataSource {
    pub path: PathBuf,
    /// Response column name.
    pub response: String,
    /// Predictor columns in order; `None` means every other column in file order.
    pub features: Option<Vec<String>>,
}
