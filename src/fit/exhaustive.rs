//! All-subsets selection by Mallow's Cp.
//!
//! For every subset size `k = 1..=p` we fit OLS on each of the `C(p, k)`
//! combinations of predictors and keep every result. Once all sizes are done:
//!
//! 1. `σ̂² = RSS_min / (m - p - 1)`, with `RSS_min` taken over *all* fits
//! 2. each fit is scored (`Cp = (RSS + 2kσ̂²) / m` by default)
//! 3. the minimum score wins; ties go to the earliest fit in enumeration
//!    order (smaller `k` first, then lexicographic over column order)
//!
//! This is `2^p - 1` fits. The cost is inherent to exhaustive search and
//! limits the method to modest `p` (each extra predictor doubles the work and
//! the number of retained fits).

use std::time::Instant;

use log::{debug, info, warn};

use crate::domain::{Dataset, FitFailurePolicy, FitResult, SelectedModel, SkippedFit, SubsetCriterion};
use crate::error::AppError;
use crate::fit::criteria::sigma_squared;
use crate::fit::fitter::fit_subset;
use crate::math::{Combinations, OlsModel, OlsSolver, SvdSolver};

/// Exhaustive search settings.
#[derive(Debug, Clone)]
pub struct SubsetConfig {
    pub criterion: SubsetCriterion,
    pub on_fit_failure: FitFailurePolicy,
    /// Log per-size progress and total elapsed time at info level.
    pub verbose: bool,
}

impl Default for SubsetConfig {
    fn default() -> Self {
        Self {
            criterion: SubsetCriterion::Cp,
            on_fit_failure: FitFailurePolicy::Abort,
            verbose: false,
        }
    }
}

/// One fitted subset and its criterion value.
#[derive(Debug, Clone)]
pub struct EvaluatedSubset<M = OlsModel> {
    /// Position in enumeration order (counts skipped subsets too).
    pub order: usize,
    pub fit: FitResult<M>,
    pub criterion: f64,
}

/// Output of an exhaustive search.
#[derive(Debug, Clone)]
pub struct SubsetSelection<M = OlsModel> {
    pub best: SelectedModel<M>,
    pub best_criterion: f64,
    pub criterion: SubsetCriterion,
    pub sigma_squared: f64,
    /// Every successful fit, in enumeration order.
    pub evaluated: Vec<EvaluatedSubset<M>>,
    /// Subsets left out under [`FitFailurePolicy::Skip`].
    pub skipped: Vec<SkippedFit>,
}

/// Exhaustive subset search engine.
#[derive(Debug, Clone)]
pub struct AllSubsets<S = SvdSolver> {
    solver: S,
    config: SubsetConfig,
}

impl AllSubsets<SvdSolver> {
    pub fn new(config: SubsetConfig) -> Self {
        Self::with_solver(SvdSolver, config)
    }
}

impl<S: OlsSolver> AllSubsets<S>
where
    S::Model: Clone,
{
    pub fn with_solver(solver: S, config: SubsetConfig) -> Self {
        Self { solver, config }
    }

    pub fn config(&self) -> &SubsetConfig {
        &self.config
    }

    /// Fit every non-empty subset and return the best by the configured criterion.
    pub fn select_best(&self, dataset: &Dataset) -> Result<SubsetSelection<S::Model>, AppError> {
        let p = dataset.n_features();
        let m = dataset.n_rows();

        // σ̂² needs m - p - 1 > 0; check before fitting anything.
        if m <= p + 1 {
            return Err(AppError::insufficient_data(format!(
                "All-subsets search needs more than p + 1 = {} observations to estimate the error variance, got m={m}.",
                p + 1
            )));
        }

        let started = Instant::now();
        let mut evaluated: Vec<EvaluatedSubset<S::Model>> = Vec::new();
        let mut skipped = Vec::new();
        let mut order = 0usize;

        for k in 1..=p {
            let tic = Instant::now();
            let fitted_before = evaluated.len();

            for combo in Combinations::new(p, k) {
                let position = order;
                order += 1;

                match fit_subset(&self.solver, dataset, &combo) {
                    Ok(fit) => evaluated.push(EvaluatedSubset {
                        order: position,
                        fit,
                        criterion: f64::NAN,
                    }),
                    Err(e) => match self.config.on_fit_failure {
                        FitFailurePolicy::Abort => return Err(e),
                        FitFailurePolicy::Skip => {
                            warn!("Skipping subset: {e}");
                            skipped.push(SkippedFit {
                                features: dataset.names_of(&combo),
                                reason: e.to_string(),
                            });
                        }
                    },
                }
            }

            let processed = evaluated.len() - fitted_before;
            let secs = tic.elapsed().as_secs_f64();
            if self.config.verbose {
                info!("Processed {processed} models on {k} predictors in {secs:.4} seconds.");
            } else {
                debug!("Processed {processed} models on {k} predictors in {secs:.4} seconds.");
            }
        }

        if evaluated.is_empty() {
            return Err(AppError::fit_failed(format!(
                "None of the {order} candidate subsets could be fitted."
            )));
        }

        let rss_min = evaluated
            .iter()
            .map(|e| e.fit.rss)
            .fold(f64::INFINITY, f64::min);
        let sigma2 = sigma_squared(rss_min, m, p);

        for e in &mut evaluated {
            e.criterion = self
                .config
                .criterion
                .evaluate(e.fit.rss, e.fit.n_features(), sigma2, m);
        }

        let best_idx = select_min_criterion(&evaluated).ok_or_else(|| {
            AppError::fit_failed("No subset produced a finite selection criterion.")
        })?;
        let best_entry = &evaluated[best_idx];
        let best = SelectedModel {
            fit: best_entry.fit.clone(),
            features: dataset.names_of(&best_entry.fit.features),
        };
        let best_criterion = best_entry.criterion;

        let total = started.elapsed().as_secs_f64();
        if self.config.verbose {
            info!("Total elapsed time: {total:.4} seconds.");
        } else {
            debug!("Total elapsed time: {total:.4} seconds.");
        }

        Ok(SubsetSelection {
            best,
            best_criterion,
            criterion: self.config.criterion,
            sigma_squared: sigma2,
            evaluated,
            skipped,
        })
    }
}

/// Index of the minimum criterion; the first one wins ties. NaN never wins.
fn select_min_criterion<M>(evaluated: &[EvaluatedSubset<M>]) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (i, e) in evaluated.iter().enumerate() {
        if e.criterion.is_nan() {
            continue;
        }
        match best {
            Some(b) if e.criterion >= evaluated[b].criterion => {}
            _ => best = Some(i),
        }
    }
    best
}
