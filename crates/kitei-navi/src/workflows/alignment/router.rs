use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Router,
};
use chrono::{Local, NaiveDate};
use serde::Deserialize;
use serde_json::json;

use super::domain::{
    AnalysisSummary, CompanyProfileUpdate, Department, Document, DocumentId, DocumentStatus,
    Guardrails, GuardrailsUpdate, IssueDecision,
};
use super::policy::Role;
use super::report::{self, DashboardFilter, DueWindow};
use super::repository::SessionRepository;
use super::scoring::score_breakdown;
use super::service::{AlignmentService, AlignmentServiceError, DEFAULT_DUE_EXTENSION_DAYS};
use super::session::SessionId;

/// Router builder exposing the alignment workflow over HTTP.
pub fn alignment_router<R>(service: Arc<AlignmentService<R>>) -> Router
where
    R: SessionRepository + 'static,
{
    Router::new()
        .route("/api/v1/alignment/score", post(score_handler))
        .route("/api/v1/alignment/sessions", post(login_handler::<R>))
        .route(
            "/api/v1/alignment/sessions/:session_id",
            get(snapshot_handler::<R>).delete(logout_handler::<R>),
        )
        .route(
            "/api/v1/alignment/sessions/:session_id/role",
            put(role_handler::<R>),
        )
        .route(
            "/api/v1/alignment/sessions/:session_id/onboarding",
            post(onboarding_handler::<R>),
        )
        .route(
            "/api/v1/alignment/sessions/:session_id/analysis",
            put(revise_analysis_handler::<R>),
        )
        .route(
            "/api/v1/alignment/sessions/:session_id/analysis/approve",
            post(approve_analysis_handler::<R>),
        )
        .route(
            "/api/v1/alignment/sessions/:session_id/guardrails",
            put(guardrails_handler::<R>),
        )
        .route(
            "/api/v1/alignment/sessions/:session_id/checks",
            post(check_handler::<R>),
        )
        .route(
            "/api/v1/alignment/sessions/:session_id/dashboard",
            get(dashboard_handler::<R>),
        )
        .route(
            "/api/v1/alignment/sessions/:session_id/dashboard.csv",
            get(dashboard_export_handler::<R>),
        )
        .route(
            "/api/v1/alignment/sessions/:session_id/review",
            get(review_handler::<R>),
        )
        .route(
            "/api/v1/alignment/sessions/:session_id/review/complete",
            post(complete_review_handler::<R>),
        )
        .route(
            "/api/v1/alignment/sessions/:session_id/documents/:document_id/decisions",
            put(decision_handler::<R>),
        )
        .route(
            "/api/v1/alignment/sessions/:session_id/documents/:document_id/apply",
            post(apply_proposal_handler::<R>),
        )
        .route(
            "/api/v1/alignment/sessions/:session_id/documents/:document_id/extend",
            post(extend_due_date_handler::<R>),
        )
        .route(
            "/api/v1/alignment/sessions/:session_id/tasks",
            get(tasks_handler::<R>),
        )
        .route(
            "/api/v1/alignment/sessions/:session_id/tasks/:task_id/toggle",
            post(toggle_task_handler::<R>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct ScoreRequest {
    guardrails: Guardrails,
    document: Document,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LoginRequest {
    email: String,
    password: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RoleRequest {
    role: Role,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OnboardingRequest {
    #[serde(flatten)]
    profile: CompanyProfileUpdate,
    #[serde(default = "default_auto_analysis")]
    auto_analysis: bool,
}

fn default_auto_analysis() -> bool {
    true
}

#[derive(Debug, Deserialize)]
pub(crate) struct CheckRequest {
    document_ids: Vec<DocumentId>,
    #[serde(default)]
    today: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DashboardQuery {
    #[serde(default)]
    dept: Option<Department>,
    #[serde(default)]
    status: Option<DocumentStatus>,
    #[serde(default)]
    due: DueWindow,
    #[serde(default)]
    prioritize: bool,
    #[serde(default)]
    today: Option<NaiveDate>,
}

impl DashboardQuery {
    fn into_parts(self) -> (DashboardFilter, NaiveDate) {
        let filter = DashboardFilter {
            dept: self.dept,
            status: self.status,
            due: self.due,
            prioritize: self.prioritize,
        };
        (filter, self.today.unwrap_or_else(local_today))
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct DecisionRequest {
    clause: String,
    decision: IssueDecision,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ExtendRequest {
    #[serde(default = "default_extension_days")]
    days: i64,
}

fn default_extension_days() -> i64 {
    DEFAULT_DUE_EXTENSION_DAYS
}

fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

fn error_response(error: AlignmentServiceError) -> Response {
    let payload = json!({
        "error": error.to_string(),
    });
    (error.status_code(), axum::Json(payload)).into_response()
}

pub(crate) async fn score_handler(axum::Json(request): axum::Json<ScoreRequest>) -> Response {
    let breakdown = score_breakdown(&request.guardrails, &request.document);
    (StatusCode::OK, axum::Json(breakdown)).into_response()
}

pub(crate) async fn login_handler<R>(
    State(service): State<Arc<AlignmentService<R>>>,
    axum::Json(request): axum::Json<LoginRequest>,
) -> Response
where
    R: SessionRepository + 'static,
{
    match service.login(&request.email, &request.password) {
        Ok(session) => {
            let view = report::snapshot(&session);
            (StatusCode::CREATED, axum::Json(view)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn logout_handler<R>(
    State(service): State<Arc<AlignmentService<R>>>,
    Path(session_id): Path<String>,
) -> Response
where
    R: SessionRepository + 'static,
{
    match service.logout(&SessionId(session_id)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn snapshot_handler<R>(
    State(service): State<Arc<AlignmentService<R>>>,
    Path(session_id): Path<String>,
) -> Response
where
    R: SessionRepository + 'static,
{
    match service.get(&SessionId(session_id)) {
        Ok(session) => {
            let view = report::snapshot(&session);
            (StatusCode::OK, axum::Json(view)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn role_handler<R>(
    State(service): State<Arc<AlignmentService<R>>>,
    Path(session_id): Path<String>,
    axum::Json(request): axum::Json<RoleRequest>,
) -> Response
where
    R: SessionRepository + 'static,
{
    match service.set_role(&SessionId(session_id), request.role) {
        Ok(session) => {
            let view = report::snapshot(&session);
            (StatusCode::OK, axum::Json(view)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn onboarding_handler<R>(
    State(service): State<Arc<AlignmentService<R>>>,
    Path(session_id): Path<String>,
    axum::Json(request): axum::Json<OnboardingRequest>,
) -> Response
where
    R: SessionRepository + 'static,
{
    let id = SessionId(session_id);
    match service.onboard(&id, request.profile, request.auto_analysis) {
        Ok(analysis) => (StatusCode::OK, axum::Json(analysis)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn revise_analysis_handler<R>(
    State(service): State<Arc<AlignmentService<R>>>,
    Path(session_id): Path<String>,
    axum::Json(analysis): axum::Json<AnalysisSummary>,
) -> Response
where
    R: SessionRepository + 'static,
{
    match service.revise_analysis(&SessionId(session_id), analysis) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn approve_analysis_handler<R>(
    State(service): State<Arc<AlignmentService<R>>>,
    Path(session_id): Path<String>,
) -> Response
where
    R: SessionRepository + 'static,
{
    match service.approve_analysis(&SessionId(session_id)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn guardrails_handler<R>(
    State(service): State<Arc<AlignmentService<R>>>,
    Path(session_id): Path<String>,
    axum::Json(update): axum::Json<GuardrailsUpdate>,
) -> Response
where
    R: SessionRepository + 'static,
{
    match service.update_guardrails(&SessionId(session_id), update) {
        Ok(session) => {
            let view = report::snapshot(&session);
            (StatusCode::OK, axum::Json(view)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn check_handler<R>(
    State(service): State<Arc<AlignmentService<R>>>,
    Path(session_id): Path<String>,
    axum::Json(request): axum::Json<CheckRequest>,
) -> Response
where
    R: SessionRepository + 'static,
{
    let today = request.today.unwrap_or_else(local_today);
    match service.run_alignment_check(&SessionId(session_id), &request.document_ids, today) {
        Ok(cards) => (StatusCode::OK, axum::Json(cards)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn dashboard_handler<R>(
    State(service): State<Arc<AlignmentService<R>>>,
    Path(session_id): Path<String>,
    Query(query): Query<DashboardQuery>,
) -> Response
where
    R: SessionRepository + 'static,
{
    let (filter, today) = query.into_parts();
    match service.dashboard(&SessionId(session_id), &filter, today) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn dashboard_export_handler<R>(
    State(service): State<Arc<AlignmentService<R>>>,
    Path(session_id): Path<String>,
    Query(query): Query<DashboardQuery>,
) -> Response
where
    R: SessionRepository + 'static,
{
    let (filter, today) = query.into_parts();
    match service.export_dashboard(&SessionId(session_id), &filter, today) {
        Ok(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/csv; charset=utf-8")],
            body,
        )
            .into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn review_handler<R>(
    State(service): State<Arc<AlignmentService<R>>>,
    Path(session_id): Path<String>,
) -> Response
where
    R: SessionRepository + 'static,
{
    match service.review(&SessionId(session_id)) {
        Ok(cards) => (StatusCode::OK, axum::Json(cards)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn complete_review_handler<R>(
    State(service): State<Arc<AlignmentService<R>>>,
    Path(session_id): Path<String>,
) -> Response
where
    R: SessionRepository + 'static,
{
    match service.complete_review(&SessionId(session_id)) {
        Ok(handoff) => (StatusCode::OK, axum::Json(handoff)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn decision_handler<R>(
    State(service): State<Arc<AlignmentService<R>>>,
    Path((session_id, document_id)): Path<(String, String)>,
    axum::Json(request): axum::Json<DecisionRequest>,
) -> Response
where
    R: SessionRepository + 'static,
{
    let id = SessionId(session_id);
    let document = DocumentId(document_id);
    match service.record_decision(&id, &document, &request.clause, request.decision) {
        Ok(()) => {
            let payload = json!({
                "document_id": document,
                "clause": request.clause,
                "decision": request.decision,
                "label": request.decision.label(),
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn apply_proposal_handler<R>(
    State(service): State<Arc<AlignmentService<R>>>,
    Path((session_id, document_id)): Path<(String, String)>,
) -> Response
where
    R: SessionRepository + 'static,
{
    let document = DocumentId(document_id);
    match service.apply_proposal(&SessionId(session_id), &document) {
        Ok(score) => {
            let payload = json!({
                "document_id": document,
                "score": score,
                "status": DocumentStatus::Aligned,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn extend_due_date_handler<R>(
    State(service): State<Arc<AlignmentService<R>>>,
    Path((session_id, document_id)): Path<(String, String)>,
    body: Bytes,
) -> Response
where
    R: SessionRepository + 'static,
{
    // An empty body means the default nudge; anything else must parse.
    let days = if body.iter().all(u8::is_ascii_whitespace) {
        DEFAULT_DUE_EXTENSION_DAYS
    } else {
        match serde_json::from_slice::<ExtendRequest>(&body) {
            Ok(request) => request.days,
            Err(err) => {
                let payload = json!({
                    "error": format!("invalid extension request: {err}"),
                });
                return (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response();
            }
        }
    };
    let document = DocumentId(document_id);
    match service.extend_due_date(&SessionId(session_id), &document, days) {
        Ok(due) => {
            let payload = json!({
                "document_id": document,
                "due": due,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn tasks_handler<R>(
    State(service): State<Arc<AlignmentService<R>>>,
    Path(session_id): Path<String>,
) -> Response
where
    R: SessionRepository + 'static,
{
    match service.tasks(&SessionId(session_id)) {
        Ok(tasks) => (StatusCode::OK, axum::Json(tasks)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn toggle_task_handler<R>(
    State(service): State<Arc<AlignmentService<R>>>,
    Path((session_id, task_id)): Path<(String, String)>,
) -> Response
where
    R: SessionRepository + 'static,
{
    match service.toggle_task(&SessionId(session_id), &task_id) {
        Ok(completed) => {
            let payload = json!({
                "task_id": task_id,
                "completed": completed,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}
