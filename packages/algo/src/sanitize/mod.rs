//! Data Sanitization
//!
//! Validation of persisted session records before they are trusted.
//!
//! A record is accepted only if it could have been produced by the
//! accumulator:
//! - alpha and beta are finite and at least 1
//! - the per-kind counts add up to the sample count
//! - alpha + beta == 2 + sample count (within floating-point tolerance)
//! - alpha == 1 + the weight sum implied by the counts (same tolerance)

use crate::response;
use crate::session::{PersistedState, StateError};
use crate::types::{ResponseKind, EPSILON, PRIOR_ALPHA, PRIOR_BETA};

/// Relative tolerance for the evidence and weight-sum checks
const EVIDENCE_TOLERANCE: f64 = 1e-9;

/// 检查数组是否包含无效值 (NaN 或 Inf)
pub fn has_invalid_values(arr: &[f64]) -> bool {
    arr.iter().any(|&x| x.is_nan() || x.is_infinite())
}

/// 校验持久化记录是否满足累加器不变量
pub fn validate_persisted(record: &PersistedState) -> Result<(), StateError> {
    if has_invalid_values(&[record.alpha, record.beta]) {
        return Err(StateError::Invalid(format!(
            "non-finite posterior parameters alpha={} beta={}",
            record.alpha, record.beta
        )));
    }

    if record.alpha < PRIOR_ALPHA || record.beta < PRIOR_BETA {
        return Err(StateError::Invalid(format!(
            "posterior parameters below prior: alpha={} beta={}",
            record.alpha, record.beta
        )));
    }

    let counted = record.counts.total();
    if counted != record.sample_count {
        return Err(StateError::Invalid(format!(
            "counts sum to {counted} but sampleCount is {}",
            record.sample_count
        )));
    }

    let expected = PRIOR_ALPHA + PRIOR_BETA + record.sample_count as f64;
    let actual = record.alpha + record.beta;
    if !within_tolerance(actual, expected) {
        return Err(StateError::Invalid(format!(
            "alpha + beta = {actual} inconsistent with {} responses",
            record.sample_count
        )));
    }

    let weight_sum: f64 = ResponseKind::ALL
        .iter()
        .map(|&kind| record.counts.get(kind) as f64 * response::weight(kind))
        .sum();
    let expected_alpha = PRIOR_ALPHA + weight_sum;
    if !within_tolerance(record.alpha, expected_alpha) {
        return Err(StateError::Invalid(format!(
            "alpha = {} inconsistent with counts (expected {expected_alpha})",
            record.alpha
        )));
    }

    Ok(())
}

fn within_tolerance(actual: f64, expected: f64) -> bool {
    (actual - expected).abs() <= EVIDENCE_TOLERANCE * expected.max(1.0) + EPSILON
}
