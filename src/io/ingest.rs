//! CSV ingest.
//!
//! Turns a CSV with a header row into a validated [`Dataset`]:
//!
//! - one column is the response, the rest (or an explicit list) are predictors
//! - every used cell must parse as a finite number; there is no missing-value
//!   handling, so the first bad cell is reported with its line and column
//! - columns keep the order given on the command line, or file order

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;

use csv::StringRecord;

use crate::domain::{DataSource, Dataset};
use crate::error::AppError;

/// Open `source.path` and load the requested columns.
pub fn load_dataset(source: &DataSource) -> Result<Dataset, AppError> {
    let file = File::open(&source.path).map_err(|e| {
        AppError::io(format!("Failed to open CSV '{}': {e}", source.path.display()))
    })?;
    read_dataset(file, &source.response, source.features.as_deref())
}

/// Read a dataset from any CSV reader.
pub fn read_dataset<R: Read>(
    reader: R,
    response: &str,
    features: Option<&[String]>,
) -> Result<Dataset, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|e| AppError::validation(format!("Failed to read CSV headers: {e}")))?
        .clone();
    let header_map = build_header_map(&headers)?;

    let response_idx = *header_map
        .get(response)
        .ok_or_else(|| AppError::validation(format!("Missing response column: `{response}`")))?;

    let feature_cols = resolve_feature_columns(&headers, &header_map, response, features)?;

    let mut columns: Vec<Vec<f64>> = vec![Vec::new(); feature_cols.len()];
    let mut y = Vec::new();

    for (idx, result) in reader.records().enumerate() {
        // records() starts after the header, CSV lines are 1-based.
        let line = idx + 2;
        let record =
            result.map_err(|e| AppError::validation(format!("CSV parse error on line {line}: {e}")))?;

        y.push(parse_cell(&record, response_idx, response, line)?);
        for (slot, (name, col)) in columns.iter_mut().zip(&feature_cols) {
            slot.push(parse_cell(&record, *col, name, line)?);
        }
    }

    let names = feature_cols.into_iter().map(|(name, _)| name).collect();
    Ok(Dataset::from_columns(names, columns, y)?.with_response_name(response))
}

fn build_header_map(headers: &StringRecord) -> Result<HashMap<String, usize>, AppError> {
    let mut map = HashMap::with_capacity(headers.len());
    for (idx, raw) in headers.iter().enumerate() {
        let name = normalize_header_name(raw);
        if name.is_empty() {
            return Err(AppError::validation(format!("Empty header name in column {}.", idx + 1)));
        }
        if map.insert(name.clone(), idx).is_some() {
            return Err(AppError::validation(format!("Duplicate column name `{name}`.")));
        }
    }
    Ok(map)
}

fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports sometimes prefix the first header with a UTF-8 BOM.
    name.trim().trim_start_matches('\u{feff}').to_string()
}

fn resolve_feature_columns(
    headers: &StringRecord,
    header_map: &HashMap<String, usize>,
    response: &str,
    features: Option<&[String]>,
) -> Result<Vec<(String, usize)>, AppError> {
    let cols: Vec<(String, usize)> = match features {
        Some(list) => {
            let mut out: Vec<(String, usize)> = Vec::with_capacity(list.len());
            for name in list {
                let name = name.trim();
                if name == response {
                    return Err(AppError::validation(format!(
                        "Column `{name}` is the response and cannot also be a feature."
                    )));
                }
                let idx = *header_map
                    .get(name)
                    .ok_or_else(|| AppError::validation(format!("Missing feature column: `{name}`")))?;
                if out.iter().any(|(_, i)| *i == idx) {
                    return Err(AppError::validation(format!("Feature `{name}` listed twice.")));
                }
                out.push((name.to_string(), idx));
            }
            out
        }
        None => headers
            .iter()
            .enumerate()
            .map(|(idx, raw)| (normalize_header_name(raw), idx))
            .filter(|(name, _)| name != response)
            .collect(),
    };

    if cols.is_empty() {
        return Err(AppError::validation("No feature columns selected."));
    }
    Ok(cols)
}

fn parse_cell(record: &StringRecord, col: usize, name: &str, line: usize) -> Result<f64, AppError> {
    let raw = record
        .get(col)
        .ok_or_else(|| AppError::validation(format!("Line {line}: missing value for `{name}`.")))?;
    let value: f64 = raw.parse().map_err(|_| {
        AppError::validation(format!("Line {line}: `{name}` value `{raw}` is not a number."))
    })?;
    if !value.is_finite() {
        return Err(AppError::validation(format!("Line {line}: `{name}` value `{raw}` is not finite.")));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    const CSV: &str = "\u{feff}a, b ,y,c\n1,2,3,4\n5,6,7,8\n9,10,11,12\n";

    #[test]
    fn uses_all_other_columns_in_file_order() {
        let ds = read_dataset(CSV.as_bytes(), "y", None).unwrap();
        assert_eq!(ds.feature_names(), &["a", "b", "c"]);
        assert_eq!(ds.n_rows(), 3);
        assert_eq!(ds.response_name(), "y");
        assert_eq!(ds.column(2), &[4.0, 8.0, 12.0]);
        assert_eq!(ds.response()[1], 7.0);
    }

    #[test]
    fn honors_explicit_feature_order() {
        let features = vec!["c".to_string(), "a".to_string()];
        let ds = read_dataset(CSV.as_bytes(), "y", Some(&features)).unwrap();
        assert_eq!(ds.feature_names(), &["c", "a"]);
        assert_eq!(ds.column(0), &[4.0, 8.0, 12.0]);
    }

    #[test]
    fn missing_columns_are_validation_errors() {
        let err = read_dataset(CSV.as_bytes(), "z", None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);

        let features = vec!["nope".to_string()];
        let err = read_dataset(CSV.as_bytes(), "y", Some(&features)).unwrap_err();
        assert!(err.message().contains("nope"));

        let features = vec!["y".to_string()];
        assert!(read_dataset(CSV.as_bytes(), "y", Some(&features)).is_err());
    }

    #[test]
    fn bad_cells_report_their_line() {
        let csv = "a,y\n1,2\nx,3\n";
        let err = read_dataset(csv.as_bytes(), "y", None).unwrap_err();
        assert!(err.message().contains("Line 3"), "{err}");

        let csv = "a,y\n1,2\n,3\n";
        assert!(read_dataset(csv.as_bytes(), "y", None).is_err());

        let csv = "a,y\n1,2\nNaN,3\n";
        assert!(read_dataset(csv.as_bytes(), "y", None).is_err());
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let csv = "a,y\n1,2\n3\n";
        assert!(read_dataset(csv.as_bytes(), "y", None).is_err());
    }

    #[test]
    fn header_only_file_has_no_observations() {
        let err = read_dataset("a,y\n".as_bytes(), "y", None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }
}
