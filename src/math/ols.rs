//! Ordinary least squares solver.
//!
//! The selection engines never look inside a fit. They only need three things
//! from it, which is what [`FittedModel`] exposes:
//!
//! - fitted values for the rows of the design matrix
//! - residual degrees of freedom
//! - the coefficient vector (for reporting the selected model)
//!
//! [`SvdSolver`] is the default implementation. It solves
//!
//! ```text
//! minimize Σ (y_i - x_i^T β)^2
//! ```
//!
//! with a thin SVD. The design is used as given (no intercept column is added).
//!
//! A design whose numerical rank is below its column count is rejected rather
//! than solved with a pseudo-inverse: collinear subsets are reported as fit
//! failures and the caller decides whether to abort or skip them.

use nalgebra::{DMatrix, DVector};

use crate::error::AppError;

/// Capability set of a fitted linear model.
pub trait FittedModel {
    /// Predicted values for each row of the design the model was fit on.
    fn fitted_values(&self) -> &DVector<f64>;

    /// Observations minus estimated parameters.
    fn df_resid(&self) -> usize;

    /// Estimated coefficients, one per design column, in column order.
    fn coefficients(&self) -> &DVector<f64>;
}

/// Something that can fit `y ~ X` by least squares.
pub trait OlsSolver {
    type Model: FittedModel;

    fn fit(&self, x: &DMatrix<f64>, y: &DVector<f64>) -> Result<Self::Model, AppError>;
}

/// Result of an [`SvdSolver`] fit.
#[derive(Debug, Clone)]
pub struct OlsModel {
    coefficients: DVector<f64>,
    fitted: DVector<f64>,
    df_resid: usize,
}

impl FittedModel for OlsModel {
    fn fitted_values(&self) -> &DVector<f64> {
        &self.fitted
    }

    fn df_resid(&self) -> usize {
        self.df_resid
    }

    fn coefficients(&self) -> &DVector<f64> {
        &self.coefficients
    }
}

/// Least squares via singular value decomposition.
#[derive(Debug, Clone, Copy, Default)]
pub struct SvdSolver;

impl OlsSolver for SvdSolver {
    type Model = OlsModel;

    fn fit(&self, x: &DMatrix<f64>, y: &DVector<f64>) -> Result<OlsModel, AppError> {
        let (m, k) = x.shape();
        if k == 0 {
            return Err(AppError::fit_failed("Design matrix has no columns."));
        }
        if y.len() != m {
            return Err(AppError::fit_failed(format!(
                "Design matrix has {m} rows but the response has {} values.",
                y.len()
            )));
        }

        let beta = solve_least_squares(x, y)?;
        let fitted = x * &beta;

        Ok(OlsModel {
            coefficients: beta,
            fitted,
            df_resid: m - k,
        })
    }
}

/// Solve a full-rank least squares problem using SVD.
///
/// Singular values at or below `max(m, k) * eps * σ_max` count as zero (the
/// usual matrix-rank cutoff). Returns a fit failure if that leaves fewer than
/// `k` nonzero singular values or the solution is not finite.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Result<DVector<f64>, AppError> {
    let (m, k) = x.shape();
    if k == 0 {
        return Err(AppError::fit_failed("Design matrix has no columns."));
    }
    let svd = x.clone().svd(true, true);

    let sigma_max = svd.singular_values.max();
    let tol = (m.max(k) as f64) * f64::EPSILON * sigma_max;

    let rank = svd.rank(tol);
    if rank < k {
        return Err(AppError::fit_failed(format!(
            "Design matrix is rank deficient (rank {rank} < {k} columns)."
        )));
    }

    let beta = svd
        .solve(y, tol)
        .map_err(|e| AppError::fit_failed(format!("SVD solve failed: {e}")))?;

    if !beta.iter().all(|v| v.is_finite()) {
        return Err(AppError::fit_failed("Least squares solution is not finite."));
    }

    Ok(beta)
}
