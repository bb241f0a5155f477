use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::super::domain::{
    AnalysisSummary, CompanyProfile, Department, DocumentId, DocumentStatus, Guardrails,
    IssueDecision, Severity,
};
use super::super::fixtures::{IntakeOption, ProposalSection};
use super::super::policy::Role;
use super::super::session::SessionId;

/// How close a due date is relative to the reporting day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DueTone {
    Overdue,
    DueSoon,
    OnTrack,
}

impl DueTone {
    pub fn from_days_remaining(days: i64) -> Self {
        if days < 0 {
            Self::Overdue
        } else if days <= 7 {
            Self::DueSoon
        } else {
            Self::OnTrack
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Overdue => "overdue",
            Self::DueSoon => "due soon",
            Self::OnTrack => "on track",
        }
    }
}

/// Due-date window filter used by the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DueWindow {
    #[default]
    All,
    /// Due within a week, overdue included.
    DueSoon,
    Overdue,
    NextMonth,
}

impl DueWindow {
    pub fn admits(self, days_remaining: i64) -> bool {
        match self {
            Self::All => true,
            Self::DueSoon => days_remaining <= 7,
            Self::Overdue => days_remaining < 0,
            Self::NextMonth => (0..=31).contains(&days_remaining),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardFilter {
    #[serde(default)]
    pub dept: Option<Department>,
    #[serde(default)]
    pub status: Option<DocumentStatus>,
    #[serde(default)]
    pub due: DueWindow,
    /// Order rows by status severity, then due date.
    #[serde(default)]
    pub prioritize: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardRow {
    pub id: DocumentId,
    pub name: String,
    pub dept: Department,
    pub dept_label: &'static str,
    pub owner: String,
    pub due: NaiveDate,
    pub days_remaining: i64,
    pub due_tone: DueTone,
    pub status: DocumentStatus,
    pub status_label: &'static str,
    pub score: u8,
    pub last_updated: NaiveDate,
    pub issue_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardView {
    pub today: NaiveDate,
    pub weights: String,
    pub rows: Vec<DashboardRow>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewIssueView {
    pub clause: String,
    pub problem: String,
    pub suggestion: String,
    pub severity: Severity,
    pub severity_label: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decision: Option<IssueDecision>,
}

/// One selected document on the review screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewCard {
    pub id: DocumentId,
    pub name: String,
    pub dept: Department,
    pub owner: String,
    pub score: u8,
    /// Score bracket line, e.g. `alignment 74% (needs revision)`.
    pub headline: String,
    pub sections: Vec<ProposalSection>,
    /// Stand-in note while no drafted revision exists.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
    pub issues: Vec<ReviewIssueView>,
}

/// Remediation item on the employee task board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmployeeTask {
    pub id: String,
    pub document_id: DocumentId,
    pub document_name: String,
    pub owner: String,
    pub due: NaiveDate,
    pub status_label: &'static str,
    pub clause: String,
    pub problem: String,
    pub priority: &'static str,
    pub completed: bool,
}

/// Everything a client needs to render the current session.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub session_id: SessionId,
    pub role: Role,
    pub role_label: &'static str,
    pub company: CompanyProfile,
    pub analysis: AnalysisSummary,
    pub analysis_approved: bool,
    pub guardrails: Guardrails,
    pub tone_options: Vec<&'static str>,
    pub challenge_pool: Vec<&'static str>,
    pub intake_options: Vec<IntakeOption>,
    pub scores: BTreeMap<DocumentId, u8>,
    pub selected_document_ids: Vec<DocumentId>,
    pub issue_decisions: BTreeMap<DocumentId, BTreeMap<String, IssueDecision>>,
}
