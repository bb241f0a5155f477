use super::session::{AlignmentSession, SessionId};

/// Storage abstraction so the service can be exercised in isolation.
pub trait SessionRepository: Send + Sync {
    fn insert(&self, session: AlignmentSession) -> Result<AlignmentSession, RepositoryError>;

    /// Runs `apply` against the stored session while holding exclusive access
    /// to it. The change is kept only when `apply` returns `Ok`.
    fn modify<T, E, F>(&self, id: &SessionId, apply: F) -> Result<T, E>
    where
        F: FnOnce(&mut AlignmentSession) -> Result<T, E>,
        E: From<RepositoryError>;

    fn fetch(&self, id: &SessionId) -> Result<Option<AlignmentSession>, RepositoryError>;
    fn remove(&self, id: &SessionId) -> Result<(), RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("session already exists")]
    Conflict,
    #[error("session not found")]
    NotFound,
    #[error("session store unavailable: {0}")]
    Unavailable(String),
}
