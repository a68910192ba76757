//! Result exports.
//!
//! - the selection report as pretty JSON
//! - the full table of evaluated subsets from an exhaustive search as CSV
//! - a dataset as CSV (used by `regsel generate`)
//!
//! Exports are meant to be easy to consume in spreadsheets or downstream scripts.

use std::fs::File;
use std::path::Path;

use crate::domain::{Dataset, SelectionReport};
use crate::error::AppError;
use crate::fit::SubsetSelection;

/// Write a selection report as pretty-printed JSON.
pub fn write_report_json(path: &Path, report: &SelectionReport) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::io(format!("Failed to create report JSON '{}': {e}", path.display())))?;
    serde_json::to_writer_pretty(file, report)
        .map_err(|e| AppError::io(format!("Failed to write report JSON: {e}")))?;
    Ok(())
}

/// Read a report previously written by [`write_report_json`].
pub fn read_report_json(path: &Path) -> Result<SelectionReport, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::io(format!("Failed to open report JSON '{}': {e}", path.display())))?;
    serde_json::from_reader(file).map_err(|e| AppError::validation(format!("Invalid report JSON: {e}")))
}

/// Write one row per evaluated subset: enumeration order, size, features,
/// RSS, residual df, criterion value, and whether it was selected.
pub fn write_subsets_csv<M>(path: &Path, selection: &SubsetSelection<M>, dataset: &Dataset) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_path(path)
        .map_err(|e| AppError::io(format!("Failed to create subsets CSV '{}': {e}", path.display())))?;

    let criterion = format!("{:?}", selection.criterion).to_lowercase();
    writer
        .write_record(["order", "k", "features", "rss", "df_resid", criterion.as_str(), "selected"])
        .map_err(|e| AppError::io(format!("Failed to write subsets CSV header: {e}")))?;

    for e in &selection.evaluated {
        let selected = e.fit.features == selection.best.fit.features;
        writer
            .write_record([
                e.order.to_string(),
                e.fit.n_features().to_string(),
                dataset.names_of(&e.fit.features).join(";"),
                format!("{:.10}", e.fit.rss),
                e.fit.df_resid.to_string(),
                format!("{:.10}", e.criterion),
                selected.to_string(),
            ])
            .map_err(|e| AppError::io(format!("Failed to write subsets CSV row: {e}")))?;
    }

    writer
        .flush()
        .map_err(|e| AppError::io(format!("Failed to flush subsets CSV: {e}")))?;
    Ok(())
}

/// Write a dataset with the features first and the response last.
pub fn write_dataset_csv(path: &Path, dataset: &Dataset) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_path(path)
        .map_err(|e| AppError::io(format!("Failed to create dataset CSV '{}': {e}", path.display())))?;

    let mut header: Vec<&str> = dataset.feature_names().iter().map(String::as_str).collect();
    header.push(dataset.response_name());
    writer
        .write_record(&header)
        .map_err(|e| AppError::io(format!("Failed to write dataset CSV header: {e}")))?;

    for row in 0..dataset.n_rows() {
        let mut record: Vec<String> = (0..dataset.n_features())
            .map(|j| dataset.column(j)[row].to_string())
            .collect();
        record.push(dataset.response()[row].to_string());
        writer
            .write_record(&record)
            .map_err(|e| AppError::io(format!("Failed to write dataset CSV row: {e}")))?;
    }

    writer
        .flush()
        .map_err(|e| AppError::io(format!("Failed to flush dataset CSV: {e}")))?;
    Ok(())
}
