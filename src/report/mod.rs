//! Reporting: serializable run summaries and formatted terminal output.

pub mod format;

pub use format::*;

use chrono::Utc;

use crate::domain::{CriterionValue, Dataset, SelectionReport, Strategy};
use crate::fit::{ForwardOutcome, SubsetSelection};
use crate::math::FittedModel;

const TOOL: &str = "regsel";

/// Build the exportable report for an exhaustive search.
pub fn subset_report<M: FittedModel>(dataset: &Dataset, selection: &SubsetSelection<M>) -> SelectionReport {
    let best = &selection.best;
    SelectionReport {
        tool: TOOL.to_string(),
        generated_at: Utc::now(),
        strategy: Strategy::AllSubsets,
        response: dataset.response_name().to_string(),
        n_rows: dataset.n_rows(),
        n_features: dataset.n_features(),
        selected: best.features.clone(),
        coefficients: best.coefficients(),
        rss: best.fit.rss,
        df_resid: Some(best.fit.df_resid),
        criterion: Some(CriterionValue::new(
            selection.criterion.display_name(),
            selection.best_criterion,
        )),
        models_evaluated: selection.evaluated.len(),
        models_skipped: selection.skipped.len(),
    }
}

/// Build the exportable report for a forward search.
///
/// The criterion is the F-ratio of the last accepted round, if any.
pub fn forward_report<M: FittedModel>(dataset: &Dataset, outcome: &ForwardOutcome<M>) -> SelectionReport {
    let last_f = outcome
        .rounds
        .iter()
        .rev()
        .find(|r| r.added.is_some())
        .map(|r| CriterionValue::new("partial F", r.best_f));

    SelectionReport {
        tool: TOOL.to_string(),
        generated_at: Utc::now(),
        strategy: Strategy::Forward,
        response: dataset.response_name().to_string(),
        n_rows: dataset.n_rows(),
        n_features: dataset.n_features(),
        selected: outcome.selected.clone(),
        coefficients: outcome
            .model
            .as_ref()
            .map(|m| m.coefficients())
            .unwrap_or_default(),
        rss: outcome.rss(),
        df_resid: outcome.model.as_ref().map(|m| m.fit.df_resid),
        criterion: last_f,
        models_evaluated: outcome.models_evaluated(),
        models_skipped: outcome.skipped.len(),
    }
}
