use std::sync::Arc;

use axum::http::StatusCode;

use super::common::*;
use crate::config::DemoLoginConfig;
use crate::workflows::alignment::domain::{
    DocumentStatus, GuardrailsUpdate, IssueDecision, WeightCategory,
};
use crate::workflows::alignment::policy::{Action, Role};
use crate::workflows::alignment::report::DashboardFilter;
use crate::workflows::alignment::repository::RepositoryError;
use crate::workflows::alignment::session::{SessionError, SessionId};
use crate::workflows::alignment::{AlignmentService, AlignmentServiceError, AuthError};

#[test]
fn login_with_demo_credentials_opens_a_ceo_session() {
    let (service, repository) = build_service();

    let session = service
        .login(DEMO_EMAIL, DEMO_PASSWORD)
        .expect("demo credentials accepted");

    assert_eq!(session.role(), Role::Ceo);
    assert!(session.id().0.starts_with("session-"));
    assert!(repository.stored(session.id()).is_some());
}

#[test]
fn login_trims_the_email_but_not_the_password() {
    let (service, _) = build_service();

    assert!(service.login("  ceo@demo.jp ", DEMO_PASSWORD).is_ok());
    let err = service
        .login(DEMO_EMAIL, " demo1234")
        .expect_err("password compared verbatim");
    assert!(matches!(
        err,
        AlignmentServiceError::Auth(AuthError::InvalidCredentials)
    ));
    assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
}

#[test]
fn login_honours_configured_credentials() {
    let repository = Arc::new(MemorySessions::default());
    let service = AlignmentService::new(
        repository,
        DemoLoginConfig {
            email: "planner@demo.jp".to_string(),
            password: "s3cret".to_string(),
        },
    );

    assert!(service.login(DEMO_EMAIL, DEMO_PASSWORD).is_err());
    assert!(service.login("planner@demo.jp", "s3cret").is_ok());
}

#[test]
fn logout_discards_the_session() {
    let (service, repository) = build_service();
    let session = service.login(DEMO_EMAIL, DEMO_PASSWORD).expect("login");

    service.logout(session.id()).expect("logout");

    assert!(repository.stored(session.id()).is_none());
    let err = service.get(session.id()).expect_err("session gone");
    assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
}

#[test]
fn guardrail_updates_persist_and_rescore() {
    let (service, repository) = build_service();
    let session = service.login(DEMO_EMAIL, DEMO_PASSWORD).expect("login");

    service
        .update_guardrails(
            session.id(),
            GuardrailsUpdate {
                weights: Some(partial_weights(&[(WeightCategory::CustomerValue, 10)])),
                ..GuardrailsUpdate::default()
            },
        )
        .expect("ceo may edit guardrails");

    let stored = repository.stored(session.id()).expect("persisted");
    assert_eq!(stored.guardrails().weights.get(WeightCategory::CustomerValue), 10);
    // 88 - 8 - round(75 * 0.07) - round(10 * 0.07)
    assert_eq!(stored.score(&doc_id("brand-guide")), Some(74));
}

#[test]
fn non_ceo_roles_cannot_edit_guardrails() {
    let (service, repository) = build_service();
    let session = service.login(DEMO_EMAIL, DEMO_PASSWORD).expect("login");
    service
        .set_role(session.id(), Role::PlanningOffice)
        .expect("role switch");

    let err = service
        .update_guardrails(session.id(), GuardrailsUpdate::default())
        .expect_err("planning office is gated");

    match &err {
        AlignmentServiceError::Policy(violation) => {
            assert_eq!(violation.role, Role::PlanningOffice);
            assert_eq!(violation.action, Action::EditGuardrails);
        }
        other => panic!("expected policy violation, got {other:?}"),
    }
    assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
    let stored = repository.stored(session.id()).expect("persisted");
    assert_eq!(stored.guardrails(), session.guardrails());
}

#[test]
fn planning_office_runs_checks_but_employee_cannot() {
    let (service, _) = build_service();
    let session = service.login(DEMO_EMAIL, DEMO_PASSWORD).expect("login");

    service
        .set_role(session.id(), Role::PlanningOffice)
        .expect("role switch");
    let cards = service
        .run_alignment_check(session.id(), &[doc_id("hr-policy")], today())
        .expect("planning office may check");
    assert_eq!(cards.len(), 1);
    assert_eq!(cards[0].score, 49);

    service
        .set_role(session.id(), Role::Employee)
        .expect("role switch");
    let err = service
        .run_alignment_check(session.id(), &[doc_id("hr-policy")], today())
        .expect_err("employee is gated");
    assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
}

#[test]
fn empty_check_is_rejected_with_reason() {
    let (service, _) = build_service();
    let session = service.login(DEMO_EMAIL, DEMO_PASSWORD).expect("login");

    let err = service
        .run_alignment_check(session.id(), &[], today())
        .expect_err("empty selection");

    assert!(matches!(
        err,
        AlignmentServiceError::Session(SessionError::EmptySelection)
    ));
    assert_eq!(err.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[test]
fn review_round_trip_records_and_forwards_decisions() {
    let (service, repository) = build_service();
    let session = service.login(DEMO_EMAIL, DEMO_PASSWORD).expect("login");
    service
        .run_alignment_check(session.id(), &[doc_id("brand-guide")], today())
        .expect("check");

    service
        .set_role(session.id(), Role::Hr)
        .expect("role switch");
    service
        .record_decision(
            session.id(),
            &doc_id("brand-guide"),
            "Information is shared internally only",
            IssueDecision::Hold,
        )
        .expect("every role records decisions");
    let err = service
        .complete_review(session.id())
        .expect_err("hr cannot forward");
    assert_eq!(err.status_code(), StatusCode::FORBIDDEN);

    service
        .set_role(session.id(), Role::Ceo)
        .expect("role switch");
    let handoff = service.complete_review(session.id()).expect("forward");
    assert_eq!(handoff.held, 1);

    let stored = repository.stored(session.id()).expect("persisted");
    assert!(stored.issue_decisions().is_empty());
}

#[test]
fn unknown_clause_maps_to_not_found() {
    let (service, _) = build_service();
    let session = service.login(DEMO_EMAIL, DEMO_PASSWORD).expect("login");

    let err = service
        .record_decision(
            session.id(),
            &doc_id("brand-guide"),
            "not a clause",
            IssueDecision::Adopt,
        )
        .expect_err("unknown clause");

    assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
}

#[test]
fn proposals_and_extensions_follow_the_policy() {
    let (service, repository) = build_service();
    let session = service.login(DEMO_EMAIL, DEMO_PASSWORD).expect("login");

    let score = service
        .apply_proposal(session.id(), &doc_id("hr-policy"))
        .expect("apply");
    assert_eq!(score, 90);
    let due = service
        .extend_due_date(session.id(), &doc_id("hr-policy"), 7)
        .expect("extend");
    assert_eq!(due, date(2025, 11, 19));

    let stored = repository.stored(session.id()).expect("persisted");
    let hr_policy = stored.document(&doc_id("hr-policy")).expect("seeded");
    assert_eq!(hr_policy.status, DocumentStatus::Aligned);
    assert_eq!(hr_policy.due, date(2025, 11, 19));

    service
        .set_role(session.id(), Role::PlanningOffice)
        .expect("role switch");
    let err = service
        .extend_due_date(session.id(), &doc_id("hr-policy"), 7)
        .expect_err("only the ceo extends deadlines");
    assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
}

#[test]
fn views_are_open_to_every_role() {
    let (service, _) = build_service();
    let session = service.login(DEMO_EMAIL, DEMO_PASSWORD).expect("login");
    service
        .set_role(session.id(), Role::Employee)
        .expect("role switch");

    let dashboard = service
        .dashboard(session.id(), &DashboardFilter::default(), today())
        .expect("dashboard");
    assert_eq!(dashboard.rows.len(), 5);

    let csv = service
        .export_dashboard(session.id(), &DashboardFilter::default(), today())
        .expect("export");
    assert_eq!(csv.lines().count(), 6);

    let tasks = service.tasks(session.id()).expect("tasks");
    assert_eq!(tasks.len(), 6);
    assert!(service
        .toggle_task(session.id(), &tasks[0].id)
        .expect("toggle"));
}

#[test]
fn analysis_approval_is_ceo_only() {
    let (service, repository) = build_service();
    let session = service.login(DEMO_EMAIL, DEMO_PASSWORD).expect("login");

    service
        .set_role(session.id(), Role::Hr)
        .expect("role switch");
    assert!(service.approve_analysis(session.id()).is_err());

    service
        .set_role(session.id(), Role::Ceo)
        .expect("role switch");
    service.approve_analysis(session.id()).expect("approve");
    assert!(repository
        .stored(session.id())
        .expect("persisted")
        .analysis_approved());
}

#[test]
fn unknown_session_maps_to_not_found() {
    let (service, _) = build_service();

    let err = service
        .dashboard(
            &SessionId("session-missing".to_string()),
            &DashboardFilter::default(),
            today(),
        )
        .expect_err("unknown session");

    assert!(matches!(
        err,
        AlignmentServiceError::Repository(RepositoryError::NotFound)
    ));
    assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
}

#[test]
fn repository_outage_maps_to_internal_error() {
    let service =
        AlignmentService::new(Arc::new(UnavailableRepository), DemoLoginConfig::default());

    let err = service
        .login(DEMO_EMAIL, DEMO_PASSWORD)
        .expect_err("store offline");

    assert!(matches!(
        err,
        AlignmentServiceError::Repository(RepositoryError::Unavailable(_))
    ));
    assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
}
