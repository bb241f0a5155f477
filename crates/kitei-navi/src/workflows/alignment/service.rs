use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use axum::http::StatusCode;
use chrono::NaiveDate;
use tracing::{info, warn};

use super::domain::{
    AnalysisSummary, CompanyProfileUpdate, DocumentId, GuardrailsUpdate, IssueDecision,
};
use super::policy::{authorize, Action, PolicyViolation, Role};
use super::report::{
    self, export_dashboard_csv, DashboardFilter, DashboardView, EmployeeTask, ExportError,
    ReviewCard,
};
use super::repository::{RepositoryError, SessionRepository};
use super::session::{AlignmentSession, ReviewHandoff, SessionError, SessionId};
use crate::config::DemoLoginConfig;

/// Days added by the "extend deadline" nudge when no explicit value is given.
pub const DEFAULT_DUE_EXTENSION_DAYS: i64 = 7;

static SESSION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_session_id() -> SessionId {
    let id = SESSION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    SessionId(format!("session-{id:06}"))
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("email address or password is incorrect")]
    InvalidCredentials,
}

/// Error raised by the alignment service.
#[derive(Debug, thiserror::Error)]
pub enum AlignmentServiceError {
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error(transparent)]
    Policy(#[from] PolicyViolation),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Export(#[from] ExportError),
}

impl AlignmentServiceError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Auth(_) => StatusCode::UNAUTHORIZED,
            Self::Policy(_) => StatusCode::FORBIDDEN,
            Self::Session(SessionError::EmptySelection)
            | Self::Session(SessionError::DueDateOutOfRange { .. }) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            Self::Session(_) | Self::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
            Self::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
            Self::Repository(RepositoryError::Unavailable(_)) | Self::Export(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

/// Service composing the login gate, role policy and session repository.
///
/// Every mutating call authorizes the session's role for the action and
/// applies the change inside [`SessionRepository::modify`]. Concurrent
/// requests on one session are serialized there.
pub struct AlignmentService<R> {
    repository: Arc<R>,
    credentials: DemoLoginConfig,
}

impl<R> AlignmentService<R>
where
    R: SessionRepository + 'static,
{
    pub fn new(repository: Arc<R>, credentials: DemoLoginConfig) -> Self {
        Self {
            repository,
            credentials,
        }
    }

    /// Checks the demo credentials and opens a freshly seeded CEO session.
    pub fn login(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AlignmentSession, AlignmentServiceError> {
        if email.trim() != self.credentials.email || password != self.credentials.password {
            warn!("rejected login attempt");
            return Err(AuthError::InvalidCredentials.into());
        }

        let session = AlignmentSession::seeded(next_session_id());
        let stored = self.repository.insert(session)?;
        info!(session = %stored.id(), "session opened");
        Ok(stored)
    }

    pub fn logout(&self, id: &SessionId) -> Result<(), AlignmentServiceError> {
        self.repository.remove(id)?;
        info!(session = %id, "session closed");
        Ok(())
    }

    pub fn get(&self, id: &SessionId) -> Result<AlignmentSession, AlignmentServiceError> {
        self.load(id)
    }

    pub fn set_role(
        &self,
        id: &SessionId,
        role: Role,
    ) -> Result<AlignmentSession, AlignmentServiceError> {
        let session = self.repository.modify(
            id,
            |session| -> Result<AlignmentSession, AlignmentServiceError> {
                session.set_role(role);
                Ok(session.clone())
            },
        )?;
        info!(session = %id, role = %role, "role switched");
        Ok(session)
    }

    pub fn onboard(
        &self,
        id: &SessionId,
        update: CompanyProfileUpdate,
        auto_analysis: bool,
    ) -> Result<AnalysisSummary, AlignmentServiceError> {
        self.mutate(id, Action::EditCompanyProfile, |session| {
            session.onboard(update, auto_analysis);
            Ok(session.analysis().clone())
        })
    }

    pub fn revise_analysis(
        &self,
        id: &SessionId,
        analysis: AnalysisSummary,
    ) -> Result<(), AlignmentServiceError> {
        self.mutate(id, Action::EditCompanyProfile, |session| {
            session.replace_analysis(analysis);
            Ok(())
        })
    }

    pub fn approve_analysis(&self, id: &SessionId) -> Result<(), AlignmentServiceError> {
        self.mutate(id, Action::ApproveAnalysis, |session| {
            session.approve_analysis();
            Ok(())
        })
    }

    pub fn update_guardrails(
        &self,
        id: &SessionId,
        update: GuardrailsUpdate,
    ) -> Result<AlignmentSession, AlignmentServiceError> {
        self.mutate(id, Action::EditGuardrails, |session| {
            session.update_guardrails(update);
            Ok(session.clone())
        })
    }

    /// Runs a check over `document_ids` and returns the review cards for them.
    pub fn run_alignment_check(
        &self,
        id: &SessionId,
        document_ids: &[DocumentId],
        today: NaiveDate,
    ) -> Result<Vec<ReviewCard>, AlignmentServiceError> {
        self.mutate(id, Action::RunAlignmentCheck, |session| {
            session.run_alignment_check(document_ids, today)?;
            Ok(report::review_cards(session))
        })
    }

    pub fn review(&self, id: &SessionId) -> Result<Vec<ReviewCard>, AlignmentServiceError> {
        self.read(id, Action::ViewDashboard, report::review_cards)
    }

    pub fn record_decision(
        &self,
        id: &SessionId,
        document_id: &DocumentId,
        clause: &str,
        decision: IssueDecision,
    ) -> Result<(), AlignmentServiceError> {
        self.mutate(id, Action::RecordDecision, |session| {
            session.update_issue_decision(document_id, clause, decision)
        })
    }

    pub fn complete_review(&self, id: &SessionId) -> Result<ReviewHandoff, AlignmentServiceError> {
        self.mutate(id, Action::CompleteReview, |session| Ok(session.complete_review()))
    }

    pub fn apply_proposal(
        &self,
        id: &SessionId,
        document_id: &DocumentId,
    ) -> Result<u8, AlignmentServiceError> {
        self.mutate(id, Action::ApplyProposal, |session| {
            session.apply_proposal(document_id)
        })
    }

    pub fn extend_due_date(
        &self,
        id: &SessionId,
        document_id: &DocumentId,
        days: i64,
    ) -> Result<NaiveDate, AlignmentServiceError> {
        self.mutate(id, Action::ExtendDueDate, |session| {
            session.shift_due_date(document_id, days)
        })
    }

    pub fn dashboard(
        &self,
        id: &SessionId,
        filter: &DashboardFilter,
        today: NaiveDate,
    ) -> Result<DashboardView, AlignmentServiceError> {
        self.read(id, Action::ViewDashboard, |session| {
            report::dashboard(session, filter, today)
        })
    }

    pub fn export_dashboard(
        &self,
        id: &SessionId,
        filter: &DashboardFilter,
        today: NaiveDate,
    ) -> Result<String, AlignmentServiceError> {
        let view = self.read(id, Action::ExportReport, |session| {
            report::dashboard(session, filter, today)
        })?;
        Ok(export_dashboard_csv(&view.rows)?)
    }

    pub fn tasks(&self, id: &SessionId) -> Result<Vec<EmployeeTask>, AlignmentServiceError> {
        self.read(id, Action::ViewDashboard, report::employee_tasks)
    }

    pub fn toggle_task(&self, id: &SessionId, task: &str) -> Result<bool, AlignmentServiceError> {
        self.mutate(id, Action::AcknowledgeTask, |session| session.toggle_task(task))
    }

    fn load(&self, id: &SessionId) -> Result<AlignmentSession, AlignmentServiceError> {
        let session = self
            .repository
            .fetch(id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(session)
    }

    fn read<T>(
        &self,
        id: &SessionId,
        action: Action,
        view: impl FnOnce(&AlignmentSession) -> T,
    ) -> Result<T, AlignmentServiceError> {
        let session = self.load(id)?;
        authorize(session.role(), action)?;
        Ok(view(&session))
    }

    fn mutate<T>(
        &self,
        id: &SessionId,
        action: Action,
        apply: impl FnOnce(&mut AlignmentSession) -> Result<T, SessionError>,
    ) -> Result<T, AlignmentServiceError> {
        self.repository
            .modify(id, |session| -> Result<T, AlignmentServiceError> {
                if let Err(violation) = authorize(session.role(), action) {
                    warn!(
                        session = %id,
                        role = %violation.role,
                        action = ?action,
                        "action denied"
                    );
                    return Err(violation.into());
                }
                Ok(apply(session)?)
            })
    }
}
