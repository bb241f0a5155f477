//! CEO alignment workflow: guardrail-weighted document scoring, the
//! per-session state container, role gating and the report views built on
//! top of them.

pub mod analysis;
pub mod domain;
pub mod fixtures;
pub mod policy;
pub mod report;
pub mod repository;
pub mod router;
pub mod scoring;
pub mod service;
pub mod session;

#[cfg(test)]
mod tests;

pub use analysis::{demo_analysis, generate_analysis_summary};
pub use domain::{
    AnalysisSummary, CompanyProfile, CompanyProfileUpdate, Department, Document, DocumentId,
    DocumentStatus, GuardrailWeights, Guardrails, GuardrailsUpdate, Issue, IssueDecision, Severity,
    WeightCategory,
};
pub use policy::{authorize, is_allowed, Action, PolicyViolation, Role};
pub use report::{
    DashboardFilter, DashboardRow, DashboardView, DueTone, DueWindow, EmployeeTask, ExportError,
    ReviewCard, SessionSnapshot,
};
pub use repository::{RepositoryError, SessionRepository};
pub use router::alignment_router;
pub use scoring::{score_breakdown, score_document, status_from_score, ScoreBreakdown};
pub use service::{AlignmentService, AlignmentServiceError, AuthError};
pub use session::{AlignmentSession, ReviewHandoff, SessionError, SessionId};
