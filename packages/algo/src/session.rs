//! Learning Session
//!
//! The single piece of mutable estimator state, scoped to one learner
//! session: the Beta posterior, per-kind counts and the response count.
//!
//! Lifecycle: `new` -> `apply`* -> optional `reset`. Estimates are derived on
//! demand and never stored. Persistence is the caller's concern; this module
//! only provides the record layout and a restore path that falls back to the
//! prior instead of failing.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::sanitize::validate_persisted;
use crate::types::{
    ConfidenceLevel, DisplayEstimate, PosteriorState, ResponseCounts, ResponseEvent, SessionPhase,
};
use crate::{estimate, posterior, response, vocabulary};

// ==================== Errors ====================

#[derive(Debug, Error)]
pub enum StateError {
    #[error("malformed session record: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("invalid session record: {0}")]
    Invalid(String),
}

// ==================== Persisted Layout ====================

/// Record written to and read from the external store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedState {
    pub alpha: f64,
    pub beta: f64,
    #[serde(default)]
    pub counts: ResponseCounts,
    pub sample_count: u64,
}

impl PersistedState {
    /// Parse and validate a stored record
    pub fn decode(raw: &str) -> Result<Self, StateError> {
        let record: PersistedState = serde_json::from_str(raw)?;
        validate_persisted(&record)?;
        Ok(record)
    }

    pub fn encode(&self) -> Result<String, StateError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Export fields handed to the JSON export collaborator
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportPayload {
    /// Point estimate in percent
    pub level: f64,
    pub estimated_vocab: u64,
    pub confidence: ConfidenceLevel,
}

// ==================== Session ====================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LearningSession {
    posterior: PosteriorState,
    counts: ResponseCounts,
    sample_count: u64,
}

impl LearningSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restore from a stored record; missing or bad records yield the prior
    pub fn restore(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return Self::new();
        };

        match PersistedState::decode(raw) {
            Ok(record) => Self::from_persisted(record),
            Err(err) => {
                warn!(error = %err, "discarding stored session state, falling back to prior");
                Self::new()
            }
        }
    }

    /// Build from an already validated record
    pub fn from_persisted(record: PersistedState) -> Self {
        Self {
            posterior: PosteriorState {
                alpha: record.alpha,
                beta: record.beta,
            },
            counts: record.counts,
            sample_count: record.sample_count,
        }
    }

    pub fn to_persisted(&self) -> PersistedState {
        PersistedState {
            alpha: self.posterior.alpha,
            beta: self.posterior.beta,
            counts: self.counts,
            sample_count: self.sample_count,
        }
    }

    /// Apply exactly one response
    pub fn apply(&mut self, event: &ResponseEvent) {
        self.posterior = posterior::update(self.posterior, response::weight(event.kind));
        self.counts.increment(event.kind);
        self.sample_count = self.sample_count.saturating_add(1);
    }

    pub fn reset(&mut self) {
        self.posterior = posterior::reset();
        self.counts = ResponseCounts::default();
        self.sample_count = 0;
    }

    pub fn posterior(&self) -> PosteriorState {
        self.posterior
    }

    pub fn counts(&self) -> &ResponseCounts {
        &self.counts
    }

    pub fn sample_count(&self) -> u64 {
        self.sample_count
    }

    pub fn phase(&self) -> SessionPhase {
        if self.sample_count == 0 {
            SessionPhase::Prior
        } else {
            SessionPhase::Updated
        }
    }

    pub fn estimate(&self) -> DisplayEstimate {
        estimate::display_estimate(&self.posterior, self.sample_count)
    }

    pub fn estimated_vocab(&self) -> u64 {
        vocabulary::estimated_vocab(&self.counts)
    }

    pub fn export(&self) -> ExportPayload {
        let estimate = self.estimate();
        ExportPayload {
            level: estimate.point_estimate_pct,
            estimated_vocab: self.estimated_vocab(),
            confidence: estimate.confidence_label,
        }
    }
}
