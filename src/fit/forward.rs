//! Forward stepwise selection by partial F-ratio.
//!
//! The search keeps an ordered list of selected predictors (initially empty)
//! and repeats an "add-feature round":
//!
//! - `RSS_0` is `Σ y²` while nothing is selected, else the RSS of the current
//!   selection
//! - every remaining predictor is tried as `selected + [candidate]` and scored
//!   with `F = (RSS_0 - RSS_c) / (RSS_c / df_c)`
//! - the largest F wins (strictly larger replaces, so the first candidate in
//!   column order wins ties, and an F of zero or less never wins)
//! - if there is no winner or `F_max < threshold` the search stops, otherwise
//!   the winner is appended and the next round starts
//!
//! Running out of candidates is also a stop. The final model is refit on the
//! selected predictors in selection order.

use log::{debug, info, warn};

use crate::domain::{Dataset, FitFailurePolicy, SelectedModel, SkippedFit};
use crate::error::AppError;
use crate::fit::criteria::partial_f;
use crate::fit::fitter::fit_subset;
use crate::math::{OlsModel, OlsSolver, SvdSolver};

/// F-ratio a candidate must reach to be added.
pub const DEFAULT_STOPPING_THRESHOLD: f64 = 4.0;

/// Forward search settings.
#[derive(Debug, Clone)]
pub struct ForwardConfig {
    pub stopping_threshold: f64,
    pub on_fit_failure: FitFailurePolicy,
    /// Log the selection after every accepted round at info level.
    pub verbose: bool,
}

impl Default for ForwardConfig {
    fn default() -> Self {
        Self {
            stopping_threshold: DEFAULT_STOPPING_THRESHOLD,
            on_fit_failure: FitFailurePolicy::Abort,
            verbose: false,
        }
    }
}

/// Score of one candidate within a round.
#[derive(Debug, Clone)]
pub struct CandidateScore {
    pub feature: String,
    pub rss: f64,
    pub df_resid: usize,
    pub f_ratio: f64,
}

/// Record of one add-feature round.
#[derive(Debug, Clone)]
pub struct ForwardRound {
    /// 1-based round number.
    pub round: usize,
    pub baseline_rss: f64,
    pub candidates: Vec<CandidateScore>,
    /// Largest F seen (0 if no candidate improved on the baseline).
    pub best_f: f64,
    /// Feature added this round; `None` on the terminal round.
    pub added: Option<String>,
}

/// Result of a single transition of the search.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// A feature was appended to the selection.
    Added(String),
    /// No candidate reached the threshold.
    BelowThreshold,
    /// Every feature is already selected.
    Exhausted,
}

impl Step {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Step::Added(_))
    }
}

/// Output of a forward search.
#[derive(Debug, Clone)]
pub struct ForwardOutcome<M = OlsModel> {
    /// Refit on the final selection; `None` when nothing was selected.
    pub model: Option<SelectedModel<M>>,
    /// Selected predictors in selection order.
    pub selected: Vec<String>,
    /// RSS of the empty model, `Σ y²`.
    pub null_rss: f64,
    pub rounds: Vec<ForwardRound>,
    /// Candidates left out under [`FitFailurePolicy::Skip`].
    pub skipped: Vec<SkippedFit>,
}

impl<M> ForwardOutcome<M> {
    /// RSS of the final model, or of the empty model when nothing was selected.
    pub fn rss(&self) -> f64 {
        self.model.as_ref().map_or(self.null_rss, |m| m.fit.rss)
    }

    /// Candidate fits performed across all rounds.
    pub fn models_evaluated(&self) -> usize {
        self.rounds.iter().map(|r| r.candidates.len()).sum()
    }
}

/// Greedy forward selection over one dataset.
#[derive(Debug, Clone)]
pub struct ForwardSelection<'a, S = SvdSolver> {
    dataset: &'a Dataset,
    solver: S,
    config: ForwardConfig,
    selected: Vec<usize>,
    rounds: Vec<ForwardRound>,
    skipped: Vec<SkippedFit>,
}

impl<'a> ForwardSelection<'a, SvdSolver> {
    pub fn new(dataset: &'a Dataset, config: ForwardConfig) -> Result<Self, AppError> {
        Self::with_solver(dataset, SvdSolver, config)
    }
}

impl<'a, S: OlsSolver> ForwardSelection<'a, S> {
    /// Validate the configuration; no fitting happens here.
    pub fn with_solver(dataset: &'a Dataset, solver: S, config: ForwardConfig) -> Result<Self, AppError> {
        if !config.stopping_threshold.is_finite() {
            return Err(AppError::validation(format!(
                "Stopping threshold must be finite, got {}.",
                config.stopping_threshold
            )));
        }
        Ok(Self {
            dataset,
            solver,
            config,
            selected: Vec::new(),
            rounds: Vec::new(),
            skipped: Vec::new(),
        })
    }

    /// Currently selected predictors, in selection order.
    pub fn selected_features(&self) -> Vec<String> {
        self.dataset.names_of(&self.selected)
    }

    pub fn rounds(&self) -> &[ForwardRound] {
        &self.rounds
    }

    /// Run add-feature rounds until a terminal step, then refit.
    pub fn run(mut self) -> Result<ForwardOutcome<S::Model>, AppError> {
        loop {
            let step = self.add_feature()?;
            if step.is_terminal() {
                break;
            }
            let msg = format!("Round {}: {:?}", self.rounds.len(), self.selected_features());
            if self.config.verbose {
                info!("{msg}");
            } else {
                debug!("{msg}");
            }
        }

        let selected = self.selected_features();
        let model = if self.selected.is_empty() {
            None
        } else {
            let fit = fit_subset(&self.solver, self.dataset, &self.selected)?;
            Some(SelectedModel {
                fit,
                features: selected.clone(),
            })
        };

        Ok(ForwardOutcome {
            model,
            selected,
            null_rss: self.dataset.response_sum_of_squares(),
            rounds: self.rounds,
            skipped: self.skipped,
        })
    }

    /// One add-feature round.
    pub fn add_feature(&mut self) -> Result<Step, AppError> {
        let remaining: Vec<usize> = (0..self.dataset.n_features())
            .filter(|idx| !self.selected.contains(idx))
            .collect();
        if remaining.is_empty() {
            return Ok(Step::Exhausted);
        }

        let baseline_rss = if self.selected.is_empty() {
            self.dataset.response_sum_of_squares()
        } else {
            fit_subset(&self.solver, self.dataset, &self.selected)?.rss
        };

        let mut candidates = Vec::with_capacity(remaining.len());
        let mut best: Option<usize> = None;
        let mut best_f = 0.0;

        for idx in remaining {
            let mut features = self.selected.clone();
            features.push(idx);

            let fit = match fit_subset(&self.solver, self.dataset, &features) {
                Ok(fit) => fit,
                Err(e) => match self.config.on_fit_failure {
                    FitFailurePolicy::Abort => return Err(e),
                    FitFailurePolicy::Skip => {
                        warn!("Skipping candidate: {e}");
                        self.skipped.push(SkippedFit {
                            features: self.dataset.names_of(&features),
                            reason: e.to_string(),
                        });
                        continue;
                    }
                },
            };

            let f_ratio = partial_f(baseline_rss, fit.rss, fit.df_resid);
            candidates.push(CandidateScore {
                feature: self.dataset.feature_name(idx).to_string(),
                rss: fit.rss,
                df_resid: fit.df_resid,
                f_ratio,
            });
            if f_ratio > best_f {
                best_f = f_ratio;
                best = Some(idx);
            }
        }

        let round = self.rounds.len() + 1;
        let step = match best {
            Some(idx) if best_f >= self.config.stopping_threshold => {
                self.selected.push(idx);
                Step::Added(self.dataset.feature_name(idx).to_string())
            }
            _ => Step::BelowThreshold,
        };

        self.rounds.push(ForwardRound {
            round,
            baseline_rss,
            candidates,
            best_f,
            added: match &step {
                Step::Added(name) => Some(name.clone()),
                _ => None,
            },
        });

        Ok(step)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::prelude::*;
    use rand::rngs::StdRng;
    use rand_distr::Normal;

    use super::*;
    use crate::error::ErrorKind;

    /// `A` and `C` are noise; `y = 3B` exactly.
    fn perfect_b_dataset() -> Dataset {
        let mut rng = StdRng::seed_from_u64(7);
        let normal = Normal::new(0.0, 1.0).unwrap();
        let m = 20;
        let mut draw = || -> Vec<f64> { (0..m).map(|_| normal.sample(&mut rng)).collect() };
        let a = draw();
        let b = draw();
        let c = draw();
        let y: Vec<f64> = b.iter().map(|v| 3.0 * v).collect();
        Dataset::new(
            vec![("A".to_string(), a), ("B".to_string(), b), ("C".to_string(), c)],
            y,
        )
        .unwrap()
    }

    /// Needs `p >= 2`.
    fn noisy_dataset(p: usize, m: usize, seed: u64) -> Dataset {
        let mut rng = StdRng::seed_from_u64(seed);
        let normal = Normal::new(0.0, 1.0).unwrap();
        let columns: Vec<Vec<f64>> = (0..p)
            .map(|_| (0..m).map(|_| normal.sample(&mut rng)).collect())
            .collect();
        // x2 drives the response; x4 contributes too when present.
        let y: Vec<f64> = (0..m)
            .map(|i| {
                let secondary = if p > 3 { 2.0 * columns[3][i] } else { 0.0 };
                4.0 * columns[1][i] + secondary + 0.5 * normal.sample(&mut rng)
            })
            .collect();
        let features = columns
            .into_iter()
            .enumerate()
            .map(|(j, col)| (format!("x{}", j + 1), col))
            .collect();
        Dataset::new(features, y).unwrap()
    }

    #[test]
    fn selects_perfect_predictor_then_stops() {
        let ds = perfect_b_dataset();
        let outcome = ForwardSelection::new(&ds, ForwardConfig::default())
            .unwrap()
            .run()
            .unwrap();

        assert_eq!(outcome.selected, vec!["B".to_string()]);
        assert_eq!(outcome.rss(), 0.0);
        assert_eq!(outcome.rounds.len(), 2);
        assert_eq!(outcome.rounds[0].added.as_deref(), Some("B"));
        assert!(outcome.rounds[0].best_f.is_infinite());
        assert_eq!(outcome.rounds[1].added, None);

        let model = outcome.model.unwrap();
        assert!((model.coefficients()[0].value - 3.0).abs() < 1e-9);
    }

    #[test]
    fn first_round_baseline_is_sum_of_squared_response() {
        let ds = noisy_dataset(4, 40, 3);
        let outcome = ForwardSelection::new(&ds, ForwardConfig::default())
            .unwrap()
            .run()
            .unwrap();
        assert!((outcome.rounds[0].baseline_rss - ds.response_sum_of_squares()).abs() < 1e-12);
        assert_eq!(outcome.rounds[0].candidates.len(), 4);
    }

    #[test]
    fn picks_strongest_predictor_first() {
        let ds = noisy_dataset(5, 60, 12);
        let outcome = ForwardSelection::new(&ds, ForwardConfig::default())
            .unwrap()
            .run()
            .unwrap();
        assert_eq!(outcome.selected.first().map(String::as_str), Some("x2"));
        assert!(outcome.selected.contains(&"x4".to_string()));
    }

    #[test]
    fn never_selects_a_feature_twice_and_stops_below_threshold() {
        let ds = noisy_dataset(6, 50, 4);
        let config = ForwardConfig::default();
        let threshold = config.stopping_threshold;
        let outcome = ForwardSelection::new(&ds, config).unwrap().run().unwrap();

        let unique: HashSet<&String> = outcome.selected.iter().collect();
        assert_eq!(unique.len(), outcome.selected.len());

        for round in &outcome.rounds {
            match &round.added {
                Some(_) => assert!(round.best_f >= threshold),
                None => assert!(round.best_f < threshold || round.candidates.is_empty()),
            }
        }

        // Selection grows by exactly one per accepted round.
        let accepted = outcome.rounds.iter().filter(|r| r.added.is_some()).count();
        assert_eq!(accepted, outcome.selected.len());
    }

    #[test]
    fn unreachable_threshold_stops_immediately_with_empty_selection() {
        let ds = noisy_dataset(3, 30, 6);
        let config = ForwardConfig {
            stopping_threshold: 1e300,
            ..ForwardConfig::default()
        };
        let outcome = ForwardSelection::new(&ds, config).unwrap().run().unwrap();

        assert!(outcome.selected.is_empty());
        assert!(outcome.model.is_none());
        assert_eq!(outcome.rounds.len(), 1);
        assert!((outcome.rss() - ds.response_sum_of_squares()).abs() < 1e-12);
    }

    #[test]
    fn exhausting_all_features_is_a_stop() {
        let ds = noisy_dataset(2, 30, 8);
        let config = ForwardConfig {
            stopping_threshold: 0.0,
            ..ForwardConfig::default()
        };
        let mut search = ForwardSelection::new(&ds, config).unwrap();

        // Both features improve the fit, so both get added.
        assert!(matches!(search.add_feature().unwrap(), Step::Added(_)));
        assert!(matches!(search.add_feature().unwrap(), Step::Added(_)));
        assert_eq!(search.add_feature().unwrap(), Step::Exhausted);
        assert_eq!(search.rounds().len(), 2);
        assert_eq!(search.selected_features().len(), 2);
    }

    #[test]
    fn non_finite_threshold_is_rejected_up_front() {
        let ds = noisy_dataset(2, 10, 1);
        let config = ForwardConfig {
            stopping_threshold: f64::NAN,
            ..ForwardConfig::default()
        };
        let err = ForwardSelection::new(&ds, config).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn collinear_candidate_handling_follows_policy() {
        let base = noisy_dataset(2, 25, 14);
        let copy = base.column(1).to_vec();
        let ds = Dataset::new(
            vec![
                ("x1".to_string(), base.column(0).to_vec()),
                ("x2".to_string(), base.column(1).to_vec()),
                ("x2_copy".to_string(), copy),
            ],
            base.response().iter().copied().collect(),
        )
        .unwrap();

        // x2 drives the response, so it is added first; then [x2, x2_copy] is singular.
        let err = ForwardSelection::new(&ds, ForwardConfig::default())
            .unwrap()
            .run()
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::FitFailed);

        let config = ForwardConfig {
            on_fit_failure: FitFailurePolicy::Skip,
            ..ForwardConfig::default()
        };
        let outcome = ForwardSelection::new(&ds, config).unwrap().run().unwrap();
        assert_eq!(outcome.selected.first().map(String::as_str), Some("x2"));
        assert!(!outcome.selected.contains(&"x2_copy".to_string()));
        assert!(!outcome.skipped.is_empty());
    }

    #[test]
    fn repeated_runs_are_identical() {
        let ds = noisy_dataset(5, 45, 33);
        let first = ForwardSelection::new(&ds, ForwardConfig::default())
            .unwrap()
            .run()
            .unwrap();
        let second = ForwardSelection::new(&ds, ForwardConfig::default())
            .unwrap()
            .run()
            .unwrap();
        assert_eq!(first.selected, second.selected);
        assert_eq!(first.rss(), second.rss());
    }

    #[test]
    fn interpolating_candidate_with_no_residual_df_never_wins() {
        // m = p = 3: the last round can only interpolate, leaving round-off RSS on zero df.
        let ds = Dataset::new(
            vec![
                ("a".to_string(), vec![1.0, 0.0, 0.0]),
                ("b".to_string(), vec![0.0, 1.0, 0.0]),
                ("c".to_string(), vec![1.0, 1.0, 1e-9]),
            ],
            vec![5.0, 6.0, 0.1],
        )
        .unwrap();
        let outcome = ForwardSelection::new(&ds, ForwardConfig::default())
            .unwrap()
            .run()
            .unwrap();

        assert_eq!(outcome.selected, vec!["c".to_string(), "a".to_string()]);
        assert_eq!(outcome.rounds.len(), 3);
        let last = &outcome.rounds[2];
        assert_eq!(last.added, None);
        assert_eq!(last.best_f, 0.0);
        assert_eq!(last.candidates.len(), 1);
        assert_eq!(last.candidates[0].feature, "b");
        assert_eq!(last.candidates[0].df_resid, 0);
        assert!(!(last.candidates[0].f_ratio > 0.0));
    }

    /// Two identical predictors with a noisy linear response.
    fn twin_columns(first: &str, second: &str) -> Dataset {
        let x = vec![0.3, -1.2, 2.0, 0.7, -0.4, 1.5, -2.1, 0.9, 0.1, -0.8];
        let y: Vec<f64> = x
            .iter()
            .zip([0.2, -0.1, 0.05, -0.3, 0.15, 0.1, -0.2, 0.0, 0.25, -0.05])
            .map(|(v, e)| 2.0 * v + e)
            .collect();
        Dataset::new(vec![(first.to_string(), x.clone()), (second.to_string(), x)], y).unwrap()
    }

    #[test]
    fn equal_f_goes_to_the_earlier_column() {
        // Round 2 can only fit the singular pair, so skipping it ends the search after round 1.
        let config = ForwardConfig {
            on_fit_failure: FitFailurePolicy::Skip,
            ..ForwardConfig::default()
        };

        let ds = twin_columns("u", "v");
        let outcome = ForwardSelection::new(&ds, config.clone()).unwrap().run().unwrap();
        let scores = &outcome.rounds[0].candidates;
        assert_eq!(scores[0].f_ratio, scores[1].f_ratio);
        assert_eq!(outcome.selected, vec!["u".to_string()]);
        assert_eq!(outcome.rounds.len(), 2);
        assert_eq!(outcome.rounds[1].added, None);

        let ds = twin_columns("v", "u");
        let outcome = ForwardSelection::new(&ds, config).unwrap().run().unwrap();
        assert_eq!(outcome.selected, vec!["v".to_string()]);
    }

    #[test]
    fn f_equal_to_threshold_is_accepted() {
        let ds = noisy_dataset(3, 30, 21);
        let mut threshold_config = ForwardConfig {
            stopping_threshold: 0.0,
            ..ForwardConfig::default()
        };
        let mut search = ForwardSelection::new(&ds, threshold_config.clone()).unwrap();
        search.add_feature().unwrap();
        let best_f = search.rounds()[0].best_f;
        assert!(best_f.is_finite() && best_f > 0.0);

        threshold_config.stopping_threshold = best_f;
        let mut search = ForwardSelection::new(&ds, threshold_config.clone()).unwrap();
        assert_eq!(search.add_feature().unwrap(), Step::Added("x2".to_string()));

        threshold_config.stopping_threshold = best_f * (1.0 + 1e-9);
        let mut search = ForwardSelection::new(&ds, threshold_config).unwrap();
        assert_eq!(search.add_feature().unwrap(), Step::BelowThreshold);
        assert!(search.selected_features().is_empty());
    }
}
