//! Formatted terminal output.
//!
//! Formatting lives here so the search code stays free of presentation
//! concerns and output changes stay localized.

use std::collections::BTreeMap;

use crate::domain::{Dataset, NamedCoefficient};
use crate::fit::{ForwardOutcome, SubsetSelection};
use crate::math::FittedModel;

/// Summary of an exhaustive search: best subset per size plus the chosen model.
pub fn format_subset_summary<M: FittedModel>(dataset: &Dataset, selection: &SubsetSelection<M>) -> String {
    let mut out = String::new();
    let crit = selection.criterion.display_name();

    out.push_str("=== regsel - all subsets ===\n");
    out.push_str(&format_dataset_line(dataset));
    out.push_str(&format!(
        "Models: evaluated={} skipped={} | sigma^2={:.6}\n",
        selection.evaluated.len(),
        selection.skipped.len(),
        selection.sigma_squared
    ));

    // Best subset at each size, in enumeration order.
    let mut per_size: BTreeMap<usize, usize> = BTreeMap::new();
    for (i, e) in selection.evaluated.iter().enumerate() {
        let k = e.fit.n_features();
        match per_size.get(&k) {
            Some(&j) if selection.evaluated[j].criterion <= e.criterion => {}
            _ => {
                per_size.insert(k, i);
            }
        }
    }

    out.push_str(&format!("\nBest subset per size ({crit}):\n"));
    for (k, i) in &per_size {
        let e = &selection.evaluated[*i];
        let chosen = if e.fit.features == selection.best.fit.features { "*" } else { " " };
        out.push_str(&format!(
            "{chosen} k={k:<3} RSS={:<14.6} {crit}={:<12.6} [{}]\n",
            e.fit.rss,
            e.criterion,
            dataset.names_of(&e.fit.features).join(", ")
        ));
    }
    for skipped in &selection.skipped {
        out.push_str(&format!(
            "  (skipped [{}]) {}\n",
            skipped.features.join(", "),
            skipped.reason
        ));
    }

    out.push_str("\nChosen model:\n");
    out.push_str(&format!("- {crit}: {:.6}\n", selection.best_criterion));
    out.push_str(&format!(
        "- RSS: {:.6} (df_resid={})\n",
        selection.best.fit.rss, selection.best.fit.df_resid
    ));
    out.push_str(&format_coefficients(&selection.best.coefficients()));
    out
}

/// Summary of a forward search: one line per round plus the final model.
pub fn format_forward_summary<M: FittedModel>(
    dataset: &Dataset,
    outcome: &ForwardOutcome<M>,
    threshold: f64,
) -> String {
    let mut out = String::new();

    out.push_str("=== regsel - forward selection ===\n");
    out.push_str(&format_dataset_line(dataset));
    out.push_str(&format!("Stopping threshold: F >= {threshold}\n"));

    out.push_str("\nRounds:\n");
    for round in &outcome.rounds {
        let action = match &round.added {
            Some(name) => format!("added {name}"),
            None => "stop".to_string(),
        };
        out.push_str(&format!(
            "  {:>3}: RSS0={:<14.6} F_max={:<12.4} {action}\n",
            round.round, round.baseline_rss, round.best_f
        ));
    }
    if outcome.rounds.is_empty() {
        out.push_str("  (none)\n");
    }
    for skipped in &outcome.skipped {
        out.push_str(&format!(
            "  (skipped [{}]) {}\n",
            skipped.features.join(", "),
            skipped.reason
        ));
    }

    out.push_str("\nChosen model:\n");
    match &outcome.model {
        Some(model) => {
            out.push_str(&format!("- features: [{}]\n", outcome.selected.join(", ")));
            out.push_str(&format!(
                "- RSS: {:.6} (df_resid={})\n",
                outcome.rss(), model.fit.df_resid
            ));
            out.push_str(&format_coefficients(&model.coefficients()));
        }
        None => {
            out.push_str("- no predictor reached the threshold\n");
            out.push_str(&format!("- RSS of the null model: {:.6}\n", outcome.rss()));
        }
    }
    out
}

fn format_dataset_line(dataset: &Dataset) -> String {
    format!(
        "Data: m={} rows | p={} features | response={}\n",
        dataset.n_rows(),
        dataset.n_features(),
        dataset.response_name()
    )
}

fn format_coefficients(coefs: &[NamedCoefficient]) -> String {
    let width = coefs.iter().map(|c| c.feature.len()).max().unwrap_or(0);
    let mut out = String::from("- coefficients:\n");
    for c in coefs {
        out.push_str(&format!("    {:<width$}  {:>14.6}\n", c.feature, c.value));
    }
    out
}
