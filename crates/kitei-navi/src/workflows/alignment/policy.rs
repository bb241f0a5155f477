use serde::{Deserialize, Serialize};
use std::fmt;

/// Views a signed-in user can switch between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    #[default]
    Ceo,
    PlanningOffice,
    Hr,
    Employee,
}

impl Role {
    pub const fn ordered() -> [Self; 4] {
        [Self::Ceo, Self::PlanningOffice, Self::Hr, Self::Employee]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Ceo => "CEO",
            Self::PlanningOffice => "Planning Office",
            Self::Hr => "HR",
            Self::Employee => "Employee",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// State-changing or gated operations a role may attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    EditGuardrails,
    ApproveAnalysis,
    ExtendDueDate,
    RunAlignmentCheck,
    ApplyProposal,
    CompleteReview,
    EditCompanyProfile,
    RecordDecision,
    AcknowledgeTask,
    ViewDashboard,
    ExportReport,
}

impl Action {
    pub const fn label(self) -> &'static str {
        match self {
            Self::EditGuardrails => "edit guardrails",
            Self::ApproveAnalysis => "approve the analysis",
            Self::ExtendDueDate => "extend a due date",
            Self::RunAlignmentCheck => "run an alignment check",
            Self::ApplyProposal => "apply a proposed revision",
            Self::CompleteReview => "forward the review",
            Self::EditCompanyProfile => "edit the company profile",
            Self::RecordDecision => "record an issue decision",
            Self::AcknowledgeTask => "acknowledge a task",
            Self::ViewDashboard => "view the dashboard",
            Self::ExportReport => "export the report",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{role} view cannot {}", .action.label())]
pub struct PolicyViolation {
    pub role: Role,
    pub action: Action,
}

/// Single source of truth for role gating.
pub fn authorize(role: Role, action: Action) -> Result<(), PolicyViolation> {
    if is_allowed(role, action) {
        Ok(())
    } else {
        Err(PolicyViolation { role, action })
    }
}

pub fn is_allowed(role: Role, action: Action) -> bool {
    match action {
        Action::EditGuardrails | Action::ApproveAnalysis | Action::ExtendDueDate => {
            role == Role::Ceo
        }
        Action::RunAlignmentCheck | Action::ApplyProposal | Action::CompleteReview => {
            matches!(role, Role::Ceo | Role::PlanningOffice)
        }
        Action::EditCompanyProfile
        | Action::RecordDecision
        | Action::AcknowledgeTask
        | Action::ViewDashboard
        | Action::ExportReport => true,
    }
}
