//! Shared "load then search" logic.
//!
//! Keeping this in one place keeps the CLI handlers focused on presentation
//! and lets the whole workflow be tested without spawning processes.

use crate::domain::{DataSource, Dataset};
use crate::error::AppError;
use crate::fit::{AllSubsets, ForwardConfig, ForwardOutcome, ForwardSelection, SubsetConfig, SubsetSelection};
use crate::io::load_dataset;

/// Outputs of a `regsel subsets` run.
#[derive(Debug, Clone)]
pub struct SubsetRun {
    pub dataset: Dataset,
    pub selection: SubsetSelection,
}

/// Outputs of a `regsel forward` run.
#[derive(Debug, Clone)]
pub struct ForwardRun {
    pub dataset: Dataset,
    pub outcome: ForwardOutcome,
}

pub fn run_subsets(source: &DataSource, config: &SubsetConfig) -> Result<SubsetRun, AppError> {
    let dataset = load_dataset(source)?;
    let selection = AllSubsets::new(config.clone()).select_best(&dataset)?;
    Ok(SubsetRun { dataset, selection })
}

pub fn run_forward(source: &DataSource, config: &ForwardConfig) -> Result<ForwardRun, AppError> {
    let dataset = load_dataset(source)?;
    let outcome = ForwardSelection::new(&dataset, config.clone())?.run()?;
    Ok(ForwardRun { dataset, outcome })
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::data::{SampleConfig, generate_dataset};
    use crate::domain::Strategy;
    use crate::error::ErrorKind;
    use crate::io::{read_report_json, write_dataset_csv, write_report_json, write_subsets_csv};

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("regsel_{}_{name}", std::process::id()))
    }

    fn write_sample(name: &str) -> PathBuf {
        let config = SampleConfig {
            rows: 120,
            features: 4,
            informative: 2,
            noise: 0.5,
            seed: 7,
        };
        let path = temp_path(name);
        write_dataset_csv(&path, &generate_dataset(&config).unwrap()).unwrap();
        path
    }

    #[test]
    fn subsets_pipeline_end_to_end() {
        let csv = write_sample("subsets.csv");
        let source = DataSource {
            path: csv.clone(),
            response: "y".to_string(),
            features: None,
        };
        let run = run_subsets(&source, &SubsetConfig::default()).unwrap();
        assert_eq!(run.dataset.n_features(), 4);
        assert_eq!(run.selection.evaluated.len(), 15);
        assert!(run.selection.best.features.contains(&"x1".to_string()));
        assert!(run.selection.best.features.contains(&"x2".to_string()));

        let json = temp_path("subsets.json");
        let report = crate::report::subset_report(&run.dataset, &run.selection);
        write_report_json(&json, &report).unwrap();
        let back = read_report_json(&json).unwrap();
        assert_eq!(back.strategy, Strategy::AllSubsets);
        assert_eq!(back.selected, run.selection.best.features);

        let models = temp_path("models.csv");
        write_subsets_csv(&models, &run.selection, &run.dataset).unwrap();
        let text = std::fs::read_to_string(&models).unwrap();
        assert_eq!(text.lines().count(), 16);
        assert!(text.starts_with("order,k,features,rss,df_resid,cp,selected"));

        for path in [csv, json, models] {
            let _ = std::fs::remove_file(path);
        }
    }

    #[test]
    fn forward_pipeline_end_to_end() {
        let csv = write_sample("forward.csv");
        let source = DataSource {
            path: csv.clone(),
            response: "y".to_string(),
            features: Some(vec!["x2".to_string(), "x1".to_string(), "x3".to_string()]),
        };
        let run = run_forward(&source, &ForwardConfig::default()).unwrap();
        assert_eq!(run.dataset.feature_names(), &["x2", "x1", "x3"]);
        assert_eq!(run.outcome.selected.first().map(String::as_str), Some("x1"));
        assert!(run.outcome.selected.contains(&"x2".to_string()));
        let _ = std::fs::remove_file(csv);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let source = DataSource {
            path: temp_path("does_not_exist.csv"),
            response: "y".to_string(),
            features: None,
        };
        let err = run_forward(&source, &ForwardConfig::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
    }
}
