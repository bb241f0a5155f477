use chrono::NaiveDate;
use kitei_navi::workflows::alignment::{
    AlignmentSession, RepositoryError, SessionId, SessionRepository, WeightCategory,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Process-local session store; sessions vanish on restart.
#[derive(Default, Clone)]
pub(crate) struct InMemorySessionRepository {
    sessions: Arc<Mutex<HashMap<SessionId, AlignmentSession>>>,
}

impl InMemorySessionRepository {
    fn lock(
        &self,
    ) -> Result<MutexGuard<'_, HashMap<SessionId, AlignmentSession>>, RepositoryError> {
        self.sessions
            .lock()
            .map_err(|_| RepositoryError::Unavailable("session store lock poisoned".to_string()))
    }
}

impl SessionRepository for InMemorySessionRepository {
    fn insert(&self, session: AlignmentSession) -> Result<AlignmentSession, RepositoryError> {
        let mut guard = self.lock()?;
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
        let mut guard = self.lock()?;
        let stored = guard.get_mut(id).ok_or(RepositoryError::NotFound)?;
        // Work on a copy so a failed change leaves the stored session intact.
        let mut draft = stored.clone();
        let value = apply(&mut draft)?;
        *stored = draft;
        Ok(value)
    }

    fn fetch(&self, id: &SessionId) -> Result<Option<AlignmentSession>, RepositoryError> {
        let guard = self.lock()?;
        Ok(guard.get(id).cloned())
    }

    fn remove(&self, id: &SessionId) -> Result<(), RepositoryError> {
        let mut guard = self.lock()?;
        guard.remove(id).map(|_| ()).ok_or(RepositoryError::NotFound)
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

/// Parses `category=weight`, e.g. `transparency=90` or `customerValue=80`.
pub(crate) fn parse_weight(raw: &str) -> Result<(WeightCategory, u8), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected CATEGORY=WEIGHT, got '{raw}'"))?;
    let category: WeightCategory =
        serde_json::from_value(serde_json::Value::String(name.trim().to_string())).map_err(
            |_| {
                format!(
                    "unknown weight category '{}' (expected one of customerValue, speed, quality, transparency, ownership)",
                    name.trim()
                )
            },
        )?;
    let weight = value
        .trim()
        .parse::<u8>()
        .map_err(|err| format!("invalid weight '{value}' ({err})"))?;
    Ok((category, weight))
}
