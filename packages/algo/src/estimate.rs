//! Estimate Calculator
//!
//! Point estimate, standard deviation and 95% credible interval of a
//! Beta(alpha, beta) posterior, expressed in percent:
//!
//! - mean = alpha / (alpha + beta)
//! - variance = alpha * beta / ((alpha + beta)^2 * (alpha + beta + 1))
//! - interval = mean +/- 1.96 * sd, clipped to [0, 100]
//!
//! With alpha, beta >= 1 the denominator is at least 3, so no input in the
//! reachable domain divides by zero.

use crate::confidence;
use crate::types::{DisplayEstimate, PosteriorState, PosteriorSummary, Z_95};

/// Posterior mean in percent
pub fn point_estimate_pct(state: &PosteriorState) -> f64 {
    state.alpha / (state.alpha + state.beta) * 100.0
}

/// Posterior variance of the proficiency parameter on the [0, 1] scale
pub fn variance(state: &PosteriorState) -> f64 {
    let sum = state.alpha + state.beta;
    (state.alpha * state.beta) / (sum * sum * (sum + 1.0))
}

/// Posterior standard deviation in percentage points
pub fn std_dev_pct(state: &PosteriorState) -> f64 {
    variance(state).sqrt() * 100.0
}

pub fn summarize(state: &PosteriorState) -> PosteriorSummary {
    let point = point_estimate_pct(state);
    let std_dev = std_dev_pct(state);
    let margin = Z_95 * std_dev;

    PosteriorSummary {
        point_estimate_pct: point,
        std_dev_pct: std_dev,
        ci_lower_pct: (point - margin).max(0.0),
        ci_upper_pct: (point + margin).min(100.0),
    }
}

/// Summary plus confidence label for `sample_count` applied responses
pub fn display_estimate(state: &PosteriorState, sample_count: u64) -> DisplayEstimate {
    let summary = summarize(state);

    DisplayEstimate {
        point_estimate_pct: summary.point_estimate_pct,
        std_dev_pct: summary.std_dev_pct,
        ci_lower_pct: summary.ci_lower_pct,
        ci_upper_pct: summary.ci_upper_pct,
        confidence_label: confidence::classify(sample_count, summary.std_dev_pct),
        sample_count,
    }
}
