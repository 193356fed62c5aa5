use std::collections::HashMap;

use parking_lot::RwLock;
use uuid::Uuid;

use super::StoredSession;

#[derive(Debug, Default)]
pub struct MemoryStore {
    sessions: RwLock<HashMap<Uuid, StoredSession>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(&self, session_id: Uuid) -> Option<StoredSession> {
        self.sessions.read().get(&session_id).cloned()
    }

    pub fn save(&self, session_id: Uuid, session: StoredSession) {
        self.sessions.write().insert(session_id, session);
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.sessions.read().len()
    }

    #[cfg(test)]
    fn is_empty(&self) -> bool {
        self.sessions.read().is_empty()
    }
}
