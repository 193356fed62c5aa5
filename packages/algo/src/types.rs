//! Common Types and Constants
//!
//! Shared data structures used across all estimator modules.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ==================== Constants ====================

/// Prior alpha of the uniform Beta(1, 1) prior
pub const PRIOR_ALPHA: f64 = 1.0;

/// Prior beta of the uniform Beta(1, 1) prior
pub const PRIOR_BETA: f64 = 1.0;

/// Two-sided 95% normal quantile used for the credible interval
pub const Z_95: f64 = 1.96;

/// Below this many responses the confidence is always `VeryLow`
pub const MIN_CONFIDENT_SAMPLES: u64 = 3;

/// Standard deviation cutoffs (percentage points) for the confidence labels
pub const LOW_STD_DEV_PCT: f64 = 20.0;
pub const MEDIUM_STD_DEV_PCT: f64 = 12.0;
pub const HIGH_STD_DEV_PCT: f64 = 7.0;

/// Words credited to the vocabulary estimate per response kind
pub const VOCAB_PER_KNOW_SENTENCE: u64 = 150;
pub const VOCAB_PER_KNOW_WORD: u64 = 100;
pub const VOCAB_PER_UNCERTAIN: u64 = 50;

/// Numerical stability epsilon
pub const EPSILON: f64 = 1e-10;

// ==================== Responses ====================

/// Self-reported recall quality for one vocabulary item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ResponseKind {
    /// Learner can use the word in a sentence
    KnowSentence,
    /// Learner recognises the word
    KnowWord,
    Uncertain,
    DontKnow,
}

impl ResponseKind {
    pub const ALL: [ResponseKind; 4] = [
        ResponseKind::KnowSentence,
        ResponseKind::KnowWord,
        ResponseKind::Uncertain,
        ResponseKind::DontKnow,
    ];

    /// Parse a boundary-layer spelling such as `know_sentence`, `knowSentence` or `DONT-KNOW`
    pub fn parse(s: &str) -> Option<Self> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| *c != '_' && *c != '-' && !c.is_whitespace())
            .collect::<String>()
            .to_lowercase();

        match normalized.as_str() {
            "knowsentence" => Some(ResponseKind::KnowSentence),
            "knowword" => Some(ResponseKind::KnowWord),
            "uncertain" => Some(ResponseKind::Uncertain),
            "dontknow" => Some(ResponseKind::DontKnow),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseKind::KnowSentence => "knowSentence",
            ResponseKind::KnowWord => "knowWord",
            ResponseKind::Uncertain => "uncertain",
            ResponseKind::DontKnow => "dontKnow",
        }
    }
}

/// One learner action, produced once by the interaction layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseEvent {
    /// Apply-once key for persistence retries
    pub event_id: Uuid,
    pub word_id: String,
    pub kind: ResponseKind,
    pub timestamp: DateTime<Utc>,
}

impl ResponseEvent {
    pub fn new(word_id: impl Into<String>, kind: ResponseKind) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            word_id: word_id.into(),
            kind,
            timestamp: Utc::now(),
        }
    }
}

// ==================== Posterior ====================

/// Beta(alpha, beta) posterior over the proficiency parameter
///
/// Both fields start at 1 and only ever grow.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PosteriorState {
    pub alpha: f64,
    pub beta: f64,
}

impl PosteriorState {
    pub const PRIOR: PosteriorState = PosteriorState {
        alpha: PRIOR_ALPHA,
        beta: PRIOR_BETA,
    };

    pub fn is_prior(&self) -> bool {
        self.alpha == PRIOR_ALPHA && self.beta == PRIOR_BETA
    }

    /// Effective observation count carried by the posterior (alpha + beta - 2)
    pub fn evidence(&self) -> f64 {
        self.alpha + self.beta - PRIOR_ALPHA - PRIOR_BETA
    }
}

impl Default for PosteriorState {
    fn default() -> Self {
        Self::PRIOR
    }
}

/// Per-kind response tallies, co-maintained with the posterior
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResponseCounts {
    pub know_sentence: u64,
    pub know_word: u64,
    pub uncertain: u64,
    pub dont_know: u64,
}

impl ResponseCounts {
    pub fn get(&self, kind: ResponseKind) -> u64 {
        match kind {
            ResponseKind::KnowSentence => self.know_sentence,
            ResponseKind::KnowWord => self.know_word,
            ResponseKind::Uncertain => self.uncertain,
            ResponseKind::DontKnow => self.dont_know,
        }
    }

    pub fn increment(&mut self, kind: ResponseKind) {
        let slot = match kind {
            ResponseKind::KnowSentence => &mut self.know_sentence,
            ResponseKind::KnowWord => &mut self.know_word,
            ResponseKind::Uncertain => &mut self.uncertain,
            ResponseKind::DontKnow => &mut self.dont_know,
        };
        *slot = slot.saturating_add(1);
    }

    pub fn total(&self) -> u64 {
        ResponseKind::ALL
            .iter()
            .fold(0u64, |acc, kind| acc.saturating_add(self.get(*kind)))
    }
}

// ==================== Estimates ====================

/// Qualitative confidence in the current estimate
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ConfidenceLevel {
    #[serde(rename = "Very Low")]
    VeryLow,
    #[serde(rename = "Low")]
    Low,
    #[serde(rename = "Medium")]
    Medium,
    #[serde(rename = "High")]
    High,
    #[serde(rename = "Very High")]
    VeryHigh,
}

impl ConfidenceLevel {
    pub fn label(&self) -> &'static str {
        match self {
            ConfidenceLevel::VeryLow => "Very Low",
            ConfidenceLevel::Low => "Low",
            ConfidenceLevel::Medium => "Medium",
            ConfidenceLevel::High => "High",
            ConfidenceLevel::VeryHigh => "Very High",
        }
    }
}

impl std::fmt::Display for ConfidenceLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Point estimate, spread and 95% credible interval, all in percent
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PosteriorSummary {
    pub point_estimate_pct: f64,
    pub std_dev_pct: f64,
    pub ci_lower_pct: f64,
    pub ci_upper_pct: f64,
}

/// Display-ready estimate, recomputed on every query
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayEstimate {
    pub point_estimate_pct: f64,
    pub std_dev_pct: f64,
    pub ci_lower_pct: f64,
    pub ci_upper_pct: f64,
    pub confidence_label: ConfidenceLevel,
    pub sample_count: u64,
}

/// Lifecycle phase of a learning session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SessionPhase {
    Prior,
    Updated,
}

#[cfg(test)]
mod tests {
    use super::*;

    // ============ ResponseKind 测试 ============

    #[test]
    fn test_response_kind_parse_spellings() {
        assert_eq!(ResponseKind::parse("know_sentence"), Some(ResponseKind::KnowSentence));
        assert_eq!(ResponseKind::parse("knowSentence"), Some(ResponseKind::KnowSentence));
        assert_eq!(ResponseKind::parse("KNOW-WORD"), Some(ResponseKind::KnowWord));
        assert_eq!(ResponseKind::parse(" uncertain "), Some(ResponseKind::Uncertain));
        assert_eq!(ResponseKind::parse("dont_know"), Some(ResponseKind::DontKnow));
        assert_eq!(ResponseKind::parse("maybe"), None);
        assert_eq!(ResponseKind::parse(""), None);
    }

    #[test]
    fn test_response_kind_as_str_parses_back() {
        for kind in ResponseKind::ALL {
            assert_eq!(ResponseKind::parse(kind.as_str()), Some(kind));
        }
    }

    #[test]
    fn test_response_kind_serde_uses_camel_case() {
        let json = serde_json::to_string(&ResponseKind::DontKnow).unwrap();
        assert_eq!(json, "\"dontKnow\"");
    }

    // ============ ResponseCounts 测试 ============

    #[test]
    fn test_counts_increment_and_total() {
        let mut counts = ResponseCounts::default();
        counts.increment(ResponseKind::KnowWord);
        counts.increment(ResponseKind::KnowWord);
        counts.increment(ResponseKind::DontKnow);

        assert_eq!(counts.get(ResponseKind::KnowWord), 2);
        assert_eq!(counts.get(ResponseKind::DontKnow), 1);
        assert_eq!(counts.get(ResponseKind::KnowSentence), 0);
        assert_eq!(counts.total(), 3);
    }

    #[test]
    fn test_counts_missing_keys_default_to_zero() {
        let counts: ResponseCounts = serde_json::from_str(r#"{"knowWord": 4}"#).unwrap();
        assert_eq!(counts.know_word, 4);
        assert_eq!(counts.total(), 4);
    }

    // ============ ConfidenceLevel 测试 ============

    #[test]
    fn test_confidence_serializes_as_literal_labels() {
        for level in [
            ConfidenceLevel::VeryLow,
            ConfidenceLevel::Low,
            ConfidenceLevel::Medium,
            ConfidenceLevel::High,
            ConfidenceLevel::VeryHigh,
        ] {
            let json = serde_json::to_string(&level).unwrap();
            assert_eq!(json, format!("\"{}\"", level.label()));
        }
    }

    #[test]
    fn test_posterior_default_is_prior() {
        let state = PosteriorState::default();
        assert!(state.is_prior());
        assert_eq!(state.evidence(), 0.0);
    }
}
