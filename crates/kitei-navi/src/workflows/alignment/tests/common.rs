use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::NaiveDate;
use serde_json::Value;

use crate::config::DemoLoginConfig;
use crate::workflows::alignment::domain::{
    Department, Document, DocumentId, DocumentStatus, Guardrails, Issue, Severity, WeightCategory,
};
use crate::workflows::alignment::fixtures::default_guardrails;
use crate::workflows::alignment::repository::{RepositoryError, SessionRepository};
use crate::workflows::alignment::session::{AlignmentSession, SessionId};
use crate::workflows::alignment::{alignment_router, AlignmentService};

pub(super) const DEMO_EMAIL: &str = "ceo@demo.jp";
pub(super) const DEMO_PASSWORD: &str = "demo1234";

pub(super) fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

/// Reporting day used across the suite; every seeded due date is after it.
pub(super) fn today() -> NaiveDate {
    date(2025, 11, 1)
}

pub(super) fn guardrails() -> Guardrails {
    default_guardrails()
}

pub(super) fn guardrails_with(category: WeightCategory, weight: u8) -> Guardrails {
    let mut guardrails = default_guardrails();
    guardrails.weights.set(category, weight);
    guardrails
}

pub(super) fn issue(clause: &str, problem: &str, severity: Severity) -> Issue {
    Issue {
        clause: clause.to_string(),
        problem: problem.to_string(),
        suggestion: "Rewrite the clause.".to_string(),
        severity,
    }
}

pub(super) fn document(id: &str, status: DocumentStatus, issues: Option<Vec<Issue>>) -> Document {
    Document {
        id: DocumentId::new(id),
        name: format!("Document {id}"),
        dept: Department::Corp,
        owner: "Ito".to_string(),
        due: date(2025, 11, 30),
        status,
        issues,
        last_updated: None,
    }
}

pub(super) fn doc_id(id: &str) -> DocumentId {
    DocumentId::new(id)
}

pub(super) fn seeded_session() -> AlignmentSession {
    AlignmentSession::seeded(SessionId("session-test".to_string()))
}

pub(super) fn session_with(documents: Vec<Document>) -> AlignmentSession {
    AlignmentSession::with_documents(
        SessionId("session-test".to_string()),
        default_guardrails(),
        documents,
    )
}

pub(super) fn partial_weights(entries: &[(WeightCategory, u8)]) -> BTreeMap<WeightCategory, u8> {
    entries.iter().copied().collect()
}

pub(super) fn build_service() -> (AlignmentService<MemorySessions>, Arc<MemorySessions>) {
    let repository = Arc::new(MemorySessions::default());
    let service = AlignmentService::new(repository.clone(), DemoLoginConfig::default());
    (service, repository)
}

pub(super) fn alignment_router_with_service(
    service: AlignmentService<MemorySessions>,
) -> axum::Router {
    alignment_router(Arc::new(service))
}

#[derive(Default, Clone)]
pub(super) struct MemorySessions {
    pub(super) sessions: Arc<Mutex<HashMap<SessionId, AlignmentSession>>>,
}

impl MemorySessions {
    pub(super) fn stored(&self, id: &SessionId) -> Option<AlignmentSession> {
        self.sessions
            .lock()
            .expect("repository mutex poisoned")
            .get(id)
            .cloned()
    }
}

impl SessionRepository for MemorySessions {
    fn insert(&self, session: AlignmentSession) -> Result<AlignmentSession, RepositoryError> {
        let mut guard = self.sessions.lock().expect("repository mutex poisoned");
        if guard.contains_key(session.id()) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(session.id().clone(), session.clone());
        Ok(session)
    }

    fn modify<T, E, F>(&self, id: &SessionId, apply: F) -> Result<T, E>
    where
        F: FnOnce(&mut AlignmentSession) -> Result<T, E>,
        E: From<RepositoryError>,
    {
        let mut guard = self.sessions.lock().expect("repository mutex poisoned");
        let stored = guard.get_mut(id).ok_or(RepositoryError::NotFound)?;
        let mut draft = stored.clone();
        let value = apply(&mut draft)?;
        *stored = draft;
        Ok(value)
    }

    fn fetch(&self, id: &SessionId) -> Result<Option<AlignmentSession>, RepositoryError> {
        let guard = self.sessions.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn remove(&self, id: &SessionId) -> Result<(), RepositoryError> {
        let mut guard = self.sessions.lock().expect("repository mutex poisoned");
        guard.remove(id).map(|_| ()).ok_or(RepositoryError::NotFound)
    }
}

pub(super) struct UnavailableRepository;

impl SessionRepository for UnavailableRepository {
    fn insert(&self, _session: AlignmentSession) -> Result<AlignmentSession, RepositoryError> {
        Err(RepositoryError::Unavailable("session store offline".to_string()))
    }

    fn modify<T, E, F>(&self, _id: &SessionId, _apply: F) -> Result<T, E>
    where
        F: FnOnce(&mut AlignmentSession) -> Result<T, E>,
        E: From<RepositoryError>,
    {
        Err(RepositoryError::Unavailable("session store offline".to_string()).into())
    }

    fn fetch(&self, _id: &SessionId) -> Result<Option<AlignmentSession>, RepositoryError> {
        Err(RepositoryError::Unavailable("session store offline".to_string()))
    }

    fn remove(&self, _id: &SessionId) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("session store offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) async fn read_text_body(response: Response) -> String {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    String::from_utf8(body.to_vec()).expect("utf-8 payload")
}
