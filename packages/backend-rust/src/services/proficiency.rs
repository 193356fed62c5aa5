use chrono::{DateTime, Duration, Utc};
use tokio::sync::Mutex;
use tracing::{info, warn};
use uuid::Uuid;

use lexiprobe_algo::{LearningSession, ResponseEvent, ResponseKind, StateError};

use crate::store::{SessionStore, StoreError, StoredSession};

const MAX_WORD_ID_LEN: usize = 256;
const TIMESTAMP_FUTURE_LIMIT_MS: i64 = 60 * 60 * 1000;

#[derive(Debug, thiserror::Error)]
pub enum ProficiencyError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    State(#[from] StateError),
}

/// Boundary-layer input before validation
#[derive(Debug, Clone)]
pub struct RecordResponseInput {
    pub event_id: Option<Uuid>,
    pub word_id: String,
    pub kind: ResponseKind,
    pub timestamp: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct ApplyOutcome {
    pub event_id: Uuid,
    /// false when the event id had already been applied
    pub applied: bool,
    pub session: LearningSession,
}

/// Session-scoped estimator state behind the persistence collaborator.
///
/// Every mutation runs load -> ledger check -> apply -> save under one lock,
/// so a retried event is applied at most once.
pub struct ProficiencyService {
    store: SessionStore,
    write_lock: Mutex<()>,
}

impl ProficiencyService {
    pub fn new(store: SessionStore) -> Self {
        Self {
            store,
            write_lock: Mutex::new(()),
        }
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    pub async fn create_session(&self) -> Result<Uuid, ProficiencyError> {
        let session_id = Uuid::new_v4();
        let document = StoredSession::new(LearningSession::new().to_persisted().encode()?);

        let _guard = self.write_lock.lock().await;
        self.store.save(session_id, &document).await?;
        info!(%session_id, "session created");
        Ok(session_id)
    }

    /// Current session, or `None` if nothing was ever stored under this id
    pub async fn session(&self, session_id: Uuid) -> Result<Option<LearningSession>, ProficiencyError> {
        let document = self.load(session_id).await?;
        Ok(document.map(|document| LearningSession::restore(Some(&document.state))))
    }

    pub async fn record_response(
        &self,
        session_id: Uuid,
        input: RecordResponseInput,
    ) -> Result<ApplyOutcome, ProficiencyError> {
        let event = build_event(input)?;

        let _guard = self.write_lock.lock().await;
        let mut document = self.load_or_prior(session_id).await?;
        let mut session = LearningSession::restore(Some(&document.state));

        if document.has_applied(&event.event_id) {
            info!(%session_id, event_id = %event.event_id, "duplicate response ignored");
            return Ok(ApplyOutcome {
                event_id: event.event_id,
                applied: false,
                session,
            });
        }

        session.apply(&event);
        document.state = session.to_persisted().encode()?;
        document.record_applied(event.event_id);
        document.updated_at = Utc::now();
        self.store.save(session_id, &document).await?;

        info!(
            %session_id,
            event_id = %event.event_id,
            word_id = %event.word_id,
            kind = event.kind.as_str(),
            sample_count = session.sample_count(),
            "response applied"
        );

        Ok(ApplyOutcome {
            event_id: event.event_id,
            applied: true,
            session,
        })
    }

    pub async fn reset(&self, session_id: Uuid) -> Result<LearningSession, ProficiencyError> {
        let _guard = self.write_lock.lock().await;
        let mut document = self.load_or_prior(session_id).await?;

        let mut session = LearningSession::restore(Some(&document.state));
        let discarded = session.sample_count();
        session.reset();

        document.state = session.to_persisted().encode()?;
        document.applied_events.clear();
        document.updated_at = Utc::now();
        self.store.save(session_id, &document).await?;

        info!(%session_id, discarded, "session reset to prior");
        Ok(session)
    }

    /// Current document; a corrupt one is replaced by a blank record so that
    /// `LearningSession::restore` falls back to the prior. I/O failures are
    /// returned so the caller never overwrites a document it could not read.
    async fn load(&self, session_id: Uuid) -> Result<Option<StoredSession>, StoreError> {
        match self.store.load(session_id).await {
            Ok(document) => Ok(document),
            Err(StoreError::Corrupt(err)) => {
                warn!(%session_id, error = %err, "corrupt session document, using prior");
                Ok(Some(StoredSession::new(String::new())))
            }
            Err(err) => Err(err),
        }
    }

    async fn load_or_prior(&self, session_id: Uuid) -> Result<StoredSession, ProficiencyError> {
        match self.load(session_id).await? {
            Some(document) => Ok(document),
            None => Ok(StoredSession::new(LearningSession::new().to_persisted().encode()?)),
        }
    }
}

fn build_event(input: RecordResponseInput) -> Result<ResponseEvent, ProficiencyError> {
    let word_id = input.word_id.trim();
    if word_id.is_empty() {
        return Err(ProficiencyError::Validation("wordId 不能为空".to_string()));
    }
    if word_id.len() > MAX_WORD_ID_LEN {
        return Err(ProficiencyError::Validation(format!(
            "wordId 长度不能超过 {MAX_WORD_ID_LEN}"
        )));
    }

    let now = Utc::now();
    let timestamp = input.timestamp.unwrap_or(now);
    if timestamp > now + Duration::milliseconds(TIMESTAMP_FUTURE_LIMIT_MS) {
        return Err(ProficiencyError::Validation("timestamp 不能晚于当前时间".to_string()));
    }

    Ok(ResponseEvent {
        event_id: input.event_id.unwrap_or_else(Uuid::new_v4),
        word_id: word_id.to_string(),
        kind: input.kind,
        timestamp,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn service() -> ProficiencyService {
        ProficiencyService::new(SessionStore::Memory(MemoryStore::new()))
    }

    fn input(kind: ResponseKind) -> RecordResponseInput {
        RecordResponseInput {
            event_id: Some(Uuid::new_v4()),
            word_id: "apple".to_string(),
            kind,
            timestamp: None,
        }
    }

    #[tokio::test]
    async fn test_created_session_is_prior() {
        let service = service();
        let id = service.create_session().await.unwrap();
        let session = service.session(id).await.unwrap().unwrap();
        assert_eq!(session, LearningSession::new());
    }

    #[tokio::test]
    async fn test_unknown_session_is_none() {
        assert!(service().session(Uuid::new_v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_retried_event_applies_once() {
        let service = service();
        let id = service.create_session().await.unwrap();
        let request = input(ResponseKind::KnowSentence);

        let first = service.record_response(id, request.clone()).await.unwrap();
        let second = service.record_response(id, request).await.unwrap();

        assert!(first.applied);
        assert!(!second.applied);
        assert_eq!(second.session.sample_count(), 1);
        assert_eq!(service.session(id).await.unwrap().unwrap().posterior().alpha, 2.0);
    }

    #[tokio::test]
    async fn test_response_on_missing_session_starts_from_prior() {
        let service = service();
        let id = Uuid::new_v4();
        let outcome = service.record_response(id, input(ResponseKind::DontKnow)).await.unwrap();
        assert_eq!(outcome.session.posterior().beta, 2.0);
        assert!(service.session(id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_reset_clears_ledger() {
        let service = service();
        let id = service.create_session().await.unwrap();
        let request = input(ResponseKind::KnowWord);
        service.record_response(id, request.clone()).await.unwrap();

        let session = service.reset(id).await.unwrap();
        assert_eq!(session.sample_count(), 0);

        // 重置后相同事件可再次生效
        let again = service.record_response(id, request).await.unwrap();
        assert!(again.applied);
        assert_eq!(again.session.sample_count(), 1);
    }

    #[tokio::test]
    async fn test_corrupt_state_falls_back_to_prior() {
        let store = MemoryStore::new();
        let id = Uuid::new_v4();
        store.save(id, StoredSession::new("{\"alpha\": \"oops\"}".to_string()));
        let service = ProficiencyService::new(SessionStore::Memory(store));

        let session = service.session(id).await.unwrap().unwrap();
        assert_eq!(session, LearningSession::new());
    }

    #[tokio::test]
    async fn test_unreadable_document_is_not_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::file(dir.path().to_path_buf()).await.unwrap();
        let id = Uuid::new_v4();
        // 目录占位，读取时产生 I/O 错误而非 NotFound
        let path = dir.path().join(format!("{id}.json"));
        std::fs::create_dir(&path).unwrap();
        let service = ProficiencyService::new(store);

        let recorded = service.record_response(id, input(ResponseKind::KnowSentence)).await;
        assert!(matches!(recorded, Err(ProficiencyError::Store(StoreError::Io(_)))));
        let reset = service.reset(id).await;
        assert!(matches!(reset, Err(ProficiencyError::Store(StoreError::Io(_)))));
        assert!(matches!(service.session(id).await, Err(ProficiencyError::Store(StoreError::Io(_)))));

        assert!(path.is_dir());
        assert!(!dir.path().join(format!("{id}.json.tmp")).exists());
    }

    #[test]
    fn test_blank_word_id_rejected() {
        let mut request = input(ResponseKind::Uncertain);
        request.word_id = "   ".to_string();
        assert!(matches!(build_event(request), Err(ProficiencyError::Validation(_))));
    }

    #[test]
    fn test_future_timestamp_rejected() {
        let mut request = input(ResponseKind::Uncertain);
        request.timestamp = Some(Utc::now() + Duration::days(1));
        assert!(matches!(build_event(request), Err(ProficiencyError::Validation(_))));
    }

    #[test]
    fn test_missing_event_id_is_assigned() {
        let mut request = input(ResponseKind::Uncertain);
        request.event_id = None;
        let event = build_event(request).unwrap();
        assert!(!event.event_id.is_nil());
    }
}
