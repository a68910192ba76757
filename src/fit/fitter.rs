//! OLS fit adapter.
//!
//! Given a dataset and an ordered feature subset we:
//! - materialize the sub-design matrix
//! - hand it to the solver
//! - compute RSS from the solver's fitted values
//!
//! and return a [`FitResult`] that keeps the solver's model handle. No
//! coefficients are recomputed here.

use nalgebra::{DMatrix, DVector};

use crate::domain::{Dataset, FitResult};
use crate::error::AppError;
use crate::fit::criteria::{residual_sum_of_squares, snap_rss};
use crate::math::{FittedModel, OlsSolver};

/// Fit OLS on `features` (indices into `dataset`, in design-column order).
pub fn fit_subset<S: OlsSolver>(
    solver: &S,
    dataset: &Dataset,
    features: &[usize],
) -> Result<FitResult<S::Model>, AppError> {
    if features.is_empty() {
        return Err(AppError::validation("Cannot fit an empty feature subset."));
    }
    for (pos, &idx) in features.iter().enumerate() {
        if idx >= dataset.n_features() {
            return Err(AppError::validation(format!(
                "Feature index {idx} out of range (p={}).",
                dataset.n_features()
            )));
        }
        if features[..pos].contains(&idx) {
            return Err(AppError::validation(format!(
                "Feature `{}` appears twice in a subset.",
                dataset.feature_name(idx)
            )));
        }
    }

    let x = dataset.design_matrix(features);
    let (model, rss, df_resid) = fit_design(solver, &x, dataset.response())
        .map_err(|e| {
            AppError::new(
                e.kind(),
                format!("OLS fit on [{}] failed: {e}", dataset.names_of(features).join(", ")),
            )
        })?;

    Ok(FitResult {
        model,
        features: features.to_vec(),
        rss,
        df_resid,
    })
}

/// Fit OLS on an already materialized design matrix.
///
/// Returns the model handle, its RSS and its residual degrees of freedom.
pub fn fit_design<S: OlsSolver>(
    solver: &S,
    x: &DMatrix<f64>,
    y: &DVector<f64>,
) -> Result<(S::Model, f64, usize), AppError> {
    if x.ncols() == 0 {
        return Err(AppError::validation("Design matrix has no columns."));
    }
    if x.nrows() != y.len() {
        return Err(AppError::validation(format!(
            "Design matrix has {} rows but the response has {} values.",
            x.nrows(),
            y.len()
        )));
    }

    let model = solver.fit(x, y)?;
    let fitted = model.fitted_values();
    if fitted.len() != y.len() {
        return Err(AppError::fit_failed(format!(
            "Solver returned {} fitted values for {} observations.",
            fitted.len(),
            y.len()
        )));
    }

    let rss = snap_rss(residual_sum_of_squares(fitted, y), y.norm_squared());
    if !rss.is_finite() {
        return Err(AppError::fit_failed("Non-finite residual sum of squares."));
    }
    let df_resid = model.df_resid();

    Ok((model, rss, df_resid))
}
