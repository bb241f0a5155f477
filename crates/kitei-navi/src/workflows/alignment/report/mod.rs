mod export;
pub mod views;

pub use export::{export_dashboard_csv, ExportError};
pub use views::{
    DashboardFilter, DashboardRow, DashboardView, DueTone, DueWindow, EmployeeTask, ReviewCard,
    ReviewIssueView, SessionSnapshot,
};

use chrono::NaiveDate;

use super::domain::{Document, DocumentId, Severity};
use super::fixtures::{proposal_sections, CHALLENGE_POOL, INTAKE_OPTIONS, TONE_OPTIONS};
use super::scoring::status_from_score;
use super::session::{AlignmentSession, FALLBACK_SCORE};

/// Score shown on the review screen before a document has been checked.
const REVIEW_FALLBACK_SCORE: u8 = 68;

pub fn task_id(document: &DocumentId, index: usize) -> String {
    format!("{document}-{index}")
}

pub fn snapshot(session: &AlignmentSession) -> SessionSnapshot {
    SessionSnapshot {
        session_id: session.id().clone(),
        role: session.role(),
        role_label: session.role().label(),
        company: session.company().clone(),
        analysis: session.analysis().clone(),
        analysis_approved: session.analysis_approved(),
        guardrails: session.guardrails().clone(),
        tone_options: TONE_OPTIONS.to_vec(),
        challenge_pool: CHALLENGE_POOL.to_vec(),
        intake_options: INTAKE_OPTIONS.to_vec(),
        scores: session.scores().clone(),
        selected_document_ids: session.selected_document_ids().to_vec(),
        issue_decisions: session.issue_decisions().clone(),
    }
}

/// Orders documents mismatched first, then needs revision, under review and
/// aligned; equal statuses fall back to the earliest due date.
pub fn sort_by_priority(documents: &[Document]) -> Vec<Document> {
    let mut sorted = documents.to_vec();
    sorted.sort_by_key(|document| (document.status.priority_rank(), document.due));
    sorted
}

pub fn dashboard(
    session: &AlignmentSession,
    filter: &DashboardFilter,
    today: NaiveDate,
) -> DashboardView {
    let documents = if filter.prioritize {
        sort_by_priority(session.documents())
    } else {
        session.documents().to_vec()
    };

    let rows = documents
        .iter()
        .filter_map(|document| {
            let days_remaining = (document.due - today).num_days();
            if filter.dept.is_some_and(|dept| dept != document.dept)
                || filter.status.is_some_and(|status| status != document.status)
                || !filter.due.admits(days_remaining)
            {
                return None;
            }

            Some(DashboardRow {
                id: document.id.clone(),
                name: document.name.clone(),
                dept: document.dept,
                dept_label: document.dept.label(),
                owner: document.owner.clone(),
                due: document.due,
                days_remaining,
                due_tone: DueTone::from_days_remaining(days_remaining),
                status: document.status,
                status_label: document.status.label(),
                score: session.score(&document.id).unwrap_or(FALLBACK_SCORE),
                last_updated: document.last_updated_or_default(),
                issue_count: document.issues().len(),
            })
        })
        .collect();

    DashboardView {
        today,
        weights: session.guardrails().weights.to_string(),
        rows,
    }
}

/// Cards for the documents picked in the latest alignment check.
pub fn review_cards(session: &AlignmentSession) -> Vec<ReviewCard> {
    session
        .documents()
        .iter()
        .filter(|document| session.selected_document_ids().contains(&document.id))
        .map(|document| {
            let score = session
                .score(&document.id)
                .unwrap_or(REVIEW_FALLBACK_SCORE);
            let issues = document
                .issues()
                .iter()
                .map(|issue| ReviewIssueView {
                    clause: issue.clause.clone(),
                    problem: issue.problem.clone(),
                    suggestion: issue.suggestion.clone(),
                    severity: issue.severity,
                    severity_label: severity_priority(issue.severity),
                    decision: session.decision(&document.id, &issue.clause),
                })
                .collect();

            let headline = format!("alignment {score}% ({})", status_from_score(score).label());
            let (sections, memo) = match proposal_sections(&document.id) {
                Some(sections) => (sections.to_vec(), None),
                None => (
                    Vec::new(),
                    Some(format!(
                        "Drafting the proposed revision. Quick note: {headline}."
                    )),
                ),
            };

            ReviewCard {
                id: document.id.clone(),
                name: document.name.clone(),
                dept: document.dept,
                owner: document.owner.clone(),
                score,
                headline,
                sections,
                memo,
                issues,
            }
        })
        .collect()
}

/// One task per detected issue, across every document.
pub fn employee_tasks(session: &AlignmentSession) -> Vec<EmployeeTask> {
    session
        .documents()
        .iter()
        .flat_map(|document| {
            document
                .issues()
                .iter()
                .enumerate()
                .map(move |(index, issue)| {
                    let id = task_id(&document.id, index);
                    EmployeeTask {
                        completed: session.is_task_completed(&id),
                        id,
                        document_id: document.id.clone(),
                        document_name: document.name.clone(),
                        owner: document.owner.clone(),
                        due: document.due,
                        status_label: document.status.label(),
                        clause: issue.clause.clone(),
                        problem: issue.problem.clone(),
                        priority: severity_priority(issue.severity),
                    }
                })
        })
        .collect()
}

fn severity_priority(severity: Severity) -> &'static str {
    match severity {
        Severity::High => "critical",
        Severity::Mid | Severity::Unspecified => "moderate",
        Severity::Low => "minor",
    }
}
