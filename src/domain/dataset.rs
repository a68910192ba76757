//! The validated regression table.

use std::collections::HashSet;

use nalgebra::{DMatrix, DVector};

use crate::error::AppError;

/// Named numeric feature columns plus a response, all of length `m`.
///
/// Construction validates the table once, so the search engines never see a
/// ragged, empty, or non-finite dataset.
#[derive(Debug, Clone)]
pub struct Dataset {
    names: Vec<String>,
    columns: Vec<Vec<f64>>,
    response_name: String,
    response: DVector<f64>,
}

impl Dataset {
    /// Build a dataset from `(name, column)` pairs and a response.
    pub fn new(features: Vec<(String, Vec<f64>)>, response: Vec<f64>) -> Result<Self, AppError> {
        let (names, columns): (Vec<String>, Vec<Vec<f64>>) = features.into_iter().unzip();
        Self::from_columns(names, columns, response)
    }

    pub fn from_columns(
        names: Vec<String>,
        columns: Vec<Vec<f64>>,
        response: Vec<f64>,
    ) -> Result<Self, AppError> {
        if names.len() != columns.len() {
            return Err(AppError::validation(format!(
                "Got {} feature names for {} columns.",
                names.len(),
                columns.len()
            )));
        }
        if columns.is_empty() {
            return Err(AppError::validation("Dataset has no feature columns."));
        }

        let m = response.len();
        if m == 0 {
            return Err(AppError::validation("Dataset has no observations."));
        }
        if let Some(v) = response.iter().find(|v| !v.is_finite()) {
            return Err(AppError::validation(format!("Response contains a non-finite value ({v}).")));
        }

        let mut seen = HashSet::with_capacity(names.len());
        for (name, column) in names.iter().zip(&columns) {
            if name.trim().is_empty() {
                return Err(AppError::validation("Feature names must be non-empty."));
            }
            if !seen.insert(name.as_str()) {
                return Err(AppError::validation(format!("Duplicate feature name `{name}`.")));
            }
            if column.len() != m {
                return Err(AppError::validation(format!(
                    "Feature `{name}` has {} values but the response has {m}.",
                    column.len()
                )));
            }
            if let Some(v) = column.iter().find(|v| !v.is_finite()) {
                return Err(AppError::validation(format!(
                    "Feature `{name}` contains a non-finite value ({v})."
                )));
            }
        }

        Ok(Self {
            names,
            columns,
            response_name: "y".to_string(),
            response: DVector::from_vec(response),
        })
    }

    /// Label the response column (used in reports only).
    pub fn with_response_name(mut self, name: impl Into<String>) -> Self {
        self.response_name = name.into();
        self
    }

    /// Number of observations `m`.
    pub fn n_rows(&self) -> usize {
        self.response.len()
    }

    /// Number of feature columns `p`.
    pub fn n_features(&self) -> usize {
        self.columns.len()
    }

    pub fn feature_names(&self) -> &[String] {
        &self.names
    }

    pub fn feature_name(&self, idx: usize) -> &str {
        &self.names[idx]
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    pub fn column(&self, idx: usize) -> &[f64] {
        &self.columns[idx]
    }

    pub fn response_name(&self) -> &str {
        &self.response_name
    }

    pub fn response(&self) -> &DVector<f64> {
        &self.response
    }

    /// `Σ y²`, the RSS of the intercept-free null model.
    pub fn response_sum_of_squares(&self) -> f64 {
        self.response.norm_squared()
    }

    /// Names for a list of feature indices, in the given order.
    pub fn names_of(&self, features: &[usize]) -> Vec<String> {
        features.iter().map(|&i| self.names[i].clone()).collect()
    }

    /// Materialize the `m × k` design matrix for the given feature indices.
    ///
    /// Columns appear in the order of `features`.
    pub fn design_matrix(&self, features: &[usize]) -> DMatrix<f64> {
        DMatrix::from_fn(self.n_rows(), features.len(), |r, c| {
            self.columns[features[c]][r]
        })
    }
}
