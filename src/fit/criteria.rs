//! Statistics used to compare candidate models.
//!
//! - RSS = Σ (ŷ_i - y_i)²
//! - σ̂² = RSS_min / (m - p - 1)
//! - Cp = (RSS + 2kσ̂²) / m
//! - AIC = (RSS + 2kσ̂²) / (mσ̂²)
//! - BIC = (RSS + ln(m)kσ̂²) / m
//! - partial F = (RSS_0 - RSS_1) / (RSS_1 / df_1)

use nalgebra::DVector;

/// RSS values below `RSS_ZERO_REL_TOL * Σy²` are treated as an exact fit.
///
/// Without this, subsets that all reproduce the response exactly would be
/// ranked by round-off noise.
pub const RSS_ZERO_REL_TOL: f64 = 1e-20;

/// Σ (fitted - observed)².
pub fn residual_sum_of_squares(fitted: &DVector<f64>, observed: &DVector<f64>) -> f64 {
    fitted
        .iter()
        .zip(observed.iter())
        .map(|(f, y)| {
            let r = f - y;
            r * r
        })
        .sum()
}

/// Snap numerically-zero RSS to exactly zero, relative to `Σy²`.
pub fn snap_rss(rss: f64, response_ss: f64) -> f64 {
    if rss <= RSS_ZERO_REL_TOL * response_ss {
        0.0
    } else {
        rss
    }
}

/// Error-variance estimate from the best RSS over all evaluated subsets.
///
/// Callers must ensure `m > p + 1`.
pub fn sigma_squared(rss_min: f64, m: usize, p: usize) -> f64 {
    rss_min / (m - p - 1) as f64
}

pub fn mallows_cp(rss: f64, k: usize, sigma_squared: f64, m: usize) -> f64 {
    (rss + 2.0 * k as f64 * sigma_squared) / m as f64
}

/// AIC scaled by the error variance.
///
/// With `σ̂² = 0` (some subset fits exactly) the scaling is undefined; the
/// value then falls back to `RSS / m`, which orders subsets like Cp does.
pub fn aic(rss: f64, k: usize, sigma_squared: f64, m: usize) -> f64 {
    if sigma_squared > 0.0 {
        (rss + 2.0 * k as f64 * sigma_squared) / (m as f64 * sigma_squared)
    } else {
        rss / m as f64
    }
}

pub fn bic(rss: f64, k: usize, sigma_squared: f64, m: usize) -> f64 {
    let m_f = m as f64;
    (rss + m_f.ln() * k as f64 * sigma_squared) / m_f
}

/// Partial F-ratio for going from a model with `baseline_rss` to a larger
/// model with `rss` and `df_resid` residual degrees of freedom.
///
/// - no improvement (`rss >= baseline_rss`) gives `0`
/// - an exact larger fit with residual df left and a real improvement gives `+∞`
/// - `df_resid = 0` with leftover RSS gives `0` (the RSS per residual df is
///   `+∞`), so a candidate that merely interpolates never wins
/// - `df_resid = 0` with an exact fit gives `NaN`, which never wins a max
pub fn partial_f(baseline_rss: f64, rss: f64, df_resid: usize) -> f64 {
    let improvement = baseline_rss - rss;
    if !(improvement > 0.0) {
        return 0.0;
    }
    if df_resid == 0 {
        return if rss > 0.0 { 0.0 } else { f64::NAN };
    }
    improvement / (rss / df_resid as f64)
}
