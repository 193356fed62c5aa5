//! Session persistence.
//!
//! Each session is one [`StoredSession`] document: the estimator's raw
//! persisted record plus a bounded ledger of the most recently applied
//! event ids. The core record is kept as an opaque string so that a damaged
//! record can still be loaded here and handed to the estimator, which decides
//! to fall back.

mod file;
mod memory;

use std::collections::VecDeque;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use file::FileStore;
pub use memory::MemoryStore;

use crate::config::{Config, StoreBackend};

/// Recent event ids kept for retry detection; older ids are evicted first
pub const MAX_APPLIED_EVENTS: usize = 128;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("corrupt session document: {0}")]
    Corrupt(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredSession {
    /// Encoded `PersistedState` of the estimator
    pub state: String,
    /// Oldest first, at most [`MAX_APPLIED_EVENTS`] entries
    #[serde(default)]
    pub applied_events: VecDeque<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl StoredSession {
    pub fn new(state: String) -> Self {
        let now = Utc::now();
        Self {
            state,
            applied_events: VecDeque::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn has_applied(&self, event_id: &Uuid) -> bool {
        self.applied_events.contains(event_id)
    }

    pub fn record_applied(&mut self, event_id: Uuid) {
        while self.applied_events.len() >= MAX_APPLIED_EVENTS {
            self.applied_events.pop_front();
        }
        self.applied_events.push_back(event_id);
    }
}

pub enum SessionStore {
    Memory(MemoryStore),
    File(FileStore),
}

impl SessionStore {
    pub async fn from_config(config: &Config) -> Result<Self, StoreError> {
        match config.store_backend {
            StoreBackend::Memory => Ok(Self::Memory(MemoryStore::new())),
            StoreBackend::File => Ok(Self::File(FileStore::open(config.data_dir.clone()).await?)),
        }
    }

    pub async fn file(dir: PathBuf) -> Result<Self, StoreError> {
        Ok(Self::File(FileStore::open(dir).await?))
    }

    pub fn backend(&self) -> StoreBackend {
        match self {
            Self::Memory(_) => StoreBackend::Memory,
            Self::File(_) => StoreBackend::File,
        }
    }

    pub async fn load(&self, session_id: Uuid) -> Result<Option<StoredSession>, StoreError> {
        match self {
            Self::Memory(store) => Ok(store.load(session_id)),
            Self::File(store) => store.load(session_id).await,
        }
    }

    pub async fn save(&self, session_id: Uuid, session: &StoredSession) -> Result<(), StoreError> {
        match self {
            Self::Memory(store) => {
                store.save(session_id, session.clone());
                Ok(())
            }
            Self::File(store) => store.save(session_id, session).await,
        }
    }
}
