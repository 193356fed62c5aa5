use std::sync::Arc;
use std::time::{Instant, SystemTime};

use crate::services::proficiency::ProficiencyService;
use crate::store::SessionStore;

#[derive(Clone)]
pub struct AppState {
    started_at: Instant,
    started_at_system: SystemTime,
    proficiency: Arc<ProficiencyService>,
}

impl AppState {
    pub fn new(store: SessionStore) -> Self {
        Self {
            started_at: Instant::now(),
            started_at_system: SystemTime::now(),
            proficiency: Arc::new(ProficiencyService::new(store)),
        }
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }

    pub fn started_at_system(&self) -> SystemTime {
        self.started_at_system
    }

    pub fn proficiency(&self) -> Arc<ProficiencyService> {
        Arc::clone(&self.proficiency)
    }
}
