use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use uuid::Uuid;

use super::{StoreError, StoredSession};

/// One JSON document per session under a data directory
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub async fn open(dir: PathBuf) -> Result<Self, StoreError> {
        tokio::fs::create_dir_all(&dir).await?;
        tracing::info!(dir = %dir.display(), "file session store ready");
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, session_id: Uuid) -> PathBuf {
        self.dir.join(format!("{session_id}.json"))
    }

    pub async fn load(&self, session_id: Uuid) -> Result<Option<StoredSession>, StoreError> {
        let raw = match tokio::fs::read_to_string(self.path_for(session_id)).await {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };

        Ok(Some(serde_json::from_str(&raw)?))
    }

    /// Write to a sibling temp file, then rename over the old document
    pub async fn save(&self, session_id: Uuid, session: &StoredSession) -> Result<(), StoreError> {
        let path = self.path_for(session_id);
        let tmp = self.dir.join(format!("{session_id}.json.tmp"));

        let body = serde_json::to_vec_pretty(session)?;
        tokio::fs::write(&tmp, body).await?;
        tokio::fs::rename(&tmp, &path).await?;
        Ok(())
    }
}
