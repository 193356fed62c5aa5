//! Confidence Classifier
//!
//! First match wins:
//! 1. fewer than 3 responses -> `VeryLow`
//! 2. sd > 20 -> `Low`
//! 3. sd > 12 -> `Medium`
//! 4. sd > 7 -> `High`
//! 5. otherwise `VeryHigh`
//!
//! `sample_count` is the number of applied responses, not the weight sum.

use crate::types::{
    ConfidenceLevel, HIGH_STD_DEV_PCT, LOW_STD_DEV_PCT, MEDIUM_STD_DEV_PCT, MIN_CONFIDENT_SAMPLES,
};

pub fn classify(sample_count: u64, std_dev_pct: f64) -> ConfidenceLevel {
    if sample_count < MIN_CONFIDENT_SAMPLES {
        ConfidenceLevel::VeryLow
    } else if std_dev_pct > LOW_STD_DEV_PCT {
        ConfidenceLevel::Low
    } else if std_dev_pct > MEDIUM_STD_DEV_PCT {
        ConfidenceLevel::Medium
    } else if std_dev_pct > HIGH_STD_DEV_PCT {
        ConfidenceLevel::High
    } else {
        ConfidenceLevel::VeryHigh
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_few_samples_always_very_low() {
        for sd in [0.0, 5.0, 15.0, 50.0] {
            assert_eq!(classify(0, sd), ConfidenceLevel::VeryLow);
            assert_eq!(classify(1, sd), ConfidenceLevel::VeryLow);
            assert_eq!(classify(2, sd), ConfidenceLevel::VeryLow);
        }
    }

    #[test]
    fn test_thresholds_are_exclusive() {
        assert_eq!(classify(3, 20.5), ConfidenceLevel::Low);
        assert_eq!(classify(3, 20.0), ConfidenceLevel::Medium);
        assert_eq!(classify(3, 12.0), ConfidenceLevel::High);
        assert_eq!(classify(3, 7.0), ConfidenceLevel::VeryHigh);
        assert_eq!(classify(3, 0.0), ConfidenceLevel::VeryHigh);
    }

    #[test]
    fn test_enough_samples_and_tight_spread() {
        assert_eq!(classify(3, 6.9), ConfidenceLevel::VeryHigh);
        assert_eq!(classify(500, 1.0), ConfidenceLevel::VeryHigh);
    }

    #[test]
    fn test_labels_do_not_decrease_as_spread_shrinks() {
        let mut previous = ConfidenceLevel::VeryLow;
        for step in (0..=100).rev() {
            let level = classify(10, step as f64 * 0.5);
            assert!(level >= previous, "sd {} gave {:?} after {:?}", step as f64 * 0.5, level, previous);
            previous = level;
        }
    }
}
