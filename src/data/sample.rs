//! Synthetic dataset generation.
//!
//! Features are independent standard normals named `x1..xp`. The response is
//!
//! ```text
//! y = Σ_{j < informative} β_j x_j + ε,   ε ~ N(0, noise²)
//! ```
//!
//! with fixed coefficients `β_j` alternating in sign and shrinking in
//! magnitude, so a selection run has a known right answer. The generator is
//! fully determined by its seed.

use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;

use crate::domain::Dataset;
use crate::error::AppError;

/// Magnitudes for the informative coefficients, reused cyclically.
const COEFFICIENT_MAGNITUDES: [f64; 5] = [3.0, 2.0, 1.5, 1.0, 0.75];

#[derive(Debug, Clone)]
pub struct SampleConfig {
    pub rows: usize,
    pub features: usize,
    /// How many of the leading features drive the response.
    pub informative: usize,
    /// Standard deviation of the additive noise.
    pub noise: f64,
    pub seed: u64,
}

impl Default for SampleConfig {
    fn default() -> Self {
        Self {
            rows: 100,
            features: 6,
            informative: 3,
            noise: 1.0,
            seed: 42,
        }
    }
}

/// True coefficient of informative feature `j` (0-based).
pub fn true_coefficient(j: usize) -> f64 {
    let magnitude = COEFFICIENT_MAGNITUDES[j % COEFFICIENT_MAGNITUDES.len()];
    if j % 2 == 0 { magnitude } else { -magnitude }
}

pub fn generate_dataset(config: &SampleConfig) -> Result<Dataset, AppError> {
    if config.rows == 0 {
        return Err(AppError::validation("Row count must be > 0."));
    }
    if config.features == 0 {
        return Err(AppError::validation("Feature count must be > 0."));
    }
    if config.informative > config.features {
        return Err(AppError::validation(format!(
            "Informative features ({}) cannot exceed total features ({}).",
            config.informative, config.features
        )));
    }
    if !(config.noise.is_finite() && config.noise >= 0.0) {
        return Err(AppError::validation("Noise level must be finite and >= 0."));
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    let standard = Normal::new(0.0, 1.0)
        .map_err(|e| AppError::validation(format!("Feature distribution error: {e}")))?;
    let noise = Normal::new(0.0, config.noise)
        .map_err(|e| AppError::validation(format!("Noise distribution error: {e}")))?;

    let columns: Vec<Vec<f64>> = (0..config.features)
        .map(|_| (0..config.rows).map(|_| standard.sample(&mut rng)).collect())
        .collect();

    let response: Vec<f64> = (0..config.rows)
        .map(|i| {
            let signal: f64 = (0..config.informative)
                .map(|j| true_coefficient(j) * columns[j][i])
                .sum();
            signal + noise.sample(&mut rng)
        })
        .collect();

    let features = columns
        .into_iter()
        .enumerate()
        .map(|(j, col)| (format!("x{}", j + 1), col))
        .collect();

    Ok(Dataset::new(features, response)?.with_response_name("y"))
}
