//! Static seed data every new session starts from.

use chrono::NaiveDate;
use serde::Serialize;

use super::domain::{
    CompanyProfile, Department, Document, DocumentId, DocumentStatus, GuardrailWeights,
    Guardrails, Issue, Severity,
};

pub const TONE_OPTIONS: [&str; 4] = ["challenging", "humble", "data-driven", "customer-first"];

pub const CHALLENGE_POOL: [&str; 5] = [
    "Mission understanding varies between departments",
    "Policy updates depend on individuals",
    "Speed comes first but quality assurance lags",
    "Leadership direction reaches the front line slowly",
    "How to embed a customer-first mindset",
];

/// A document that can be picked on the intake screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IntakeOption {
    pub id: &'static str,
    pub label: &'static str,
}

pub const INTAKE_OPTIONS: [IntakeOption; 5] = [
    IntakeOption {
        id: "exp-pol",
        label: "Expense policy (expense_policy_v3.pdf)",
    },
    IntakeOption {
        id: "hr-policy",
        label: "Performance review policy (hr_performance_guidelines.docx)",
    },
    IntakeOption {
        id: "sales-script",
        label: "Sales talk script (sales_script_Q4.pptx)",
    },
    IntakeOption {
        id: "brand-guide",
        label: "Marketing brand guide (mk_brand_guidelines.pdf)",
    },
    IntakeOption {
        id: "eng-dod",
        label: "Engineering DoD (eng_DoD.md)",
    },
];

/// One side-by-side passage on the review screen: current wording and the
/// proposed rewrite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProposalSection {
    pub heading: &'static str,
    pub original: &'static str,
    pub proposed: &'static str,
}

static EXPENSE_POLICY_PROPOSAL: [ProposalSection; 3] = [
    ProposalSection {
        heading: "Travel class",
        original: "Domestic trips fly economy; international trips may always use business class.",
        proposed: "Economy class for both domestic and international trips. Exceptions require \
                   prior approval and only apply where customer value is maximized.",
    },
    ProposalSection {
        heading: "Expense claim flow",
        original: "Receipts are submitted together at month end and approved by the 10th of the \
                   following month.",
        proposed: "Receipts are submitted from mobile within 48 hours. Claims close weekly to \
                   shorten approval lead time.",
    },
    ProposalSection {
        heading: "Transparency",
        original: "Approval status is managed inside the finance team and sharing it with \
                   employees is optional.",
        proposed: "Approval status is visible to every employee on the dashboard. Exception \
                   approvals are published with their reasons.",
    },
];

/// Drafted revision for `document`, when one has been prepared.
pub fn proposal_sections(document: &DocumentId) -> Option<&'static [ProposalSection]> {
    match document.as_str() {
        "exp-pol" => Some(&EXPENSE_POLICY_PROPOSAL[..]),
        _ => None,
    }
}

pub fn default_guardrails() -> Guardrails {
    Guardrails {
        mission: "Maximize the potential of working people through technology".to_string(),
        values: vec![
            "customer-first".to_string(),
            "transparency".to_string(),
            "speed".to_string(),
            "ownership".to_string(),
        ],
        tone: vec!["humble".to_string(), "data-driven".to_string()],
        weights: GuardrailWeights::default(),
    }
}

pub fn default_company() -> CompanyProfile {
    CompanyProfile {
        company_name: "DemoTech Inc.".to_string(),
        industry: "SaaS / HR tech".to_string(),
        size: "230".to_string(),
        headquarters: "Shibuya, Tokyo".to_string(),
        challenges: Vec::new(),
    }
}

pub fn seed_documents() -> Vec<Document> {
    vec![
        Document {
            id: DocumentId::new("exp-pol"),
            name: "Expense Policy v3".to_string(),
            dept: Department::Finance,
            owner: "Tanaka".to_string(),
            due: date(2025, 11, 10),
            status: DocumentStatus::NeedsRevision,
            last_updated: Some(date(2025, 10, 22)),
            issues: Some(vec![
                issue(
                    "Business class is allowed by default on business trips",
                    "Conflicts with cost awareness and the emphasis on transparency",
                    "Economy by default. Allow exceptions with prior approval only when customer value is maximized.",
                    Severity::High,
                ),
                issue(
                    "Receipts are submitted together at month end",
                    "Runs against the weighting on rapid turnaround and speed",
                    "Recommend instant mobile submission and propose a weekly close.",
                    Severity::Mid,
                ),
            ]),
        },
        Document {
            id: DocumentId::new("sales-script"),
            name: "Sales Talk Q4".to_string(),
            dept: Department::Sales,
            owner: "Sato".to_string(),
            due: date(2025, 11, 5),
            status: DocumentStatus::Aligned,
            last_updated: Some(date(2025, 10, 18)),
            issues: None,
        },
        Document {
            id: DocumentId::new("eng-dod"),
            name: "Definition of Done".to_string(),
            dept: Department::Engineering,
            owner: "Suzuki".to_string(),
            due: date(2025, 11, 20),
            status: DocumentStatus::UnderReview,
            last_updated: Some(date(2025, 10, 16)),
            issues: Some(vec![issue(
                "Reviews are performed at the author's discretion",
                "An ambiguous quality bar risks bugs reaching production",
                "Make code review mandatory and add transparency checks to the checklist.",
                Severity::Low,
            )]),
        },
        Document {
            id: DocumentId::new("brand-guide"),
            name: "Brand Guidelines".to_string(),
            dept: Department::Marketing,
            owner: "Takahashi".to_string(),
            due: date(2025, 11, 18),
            status: DocumentStatus::Mismatched,
            last_updated: Some(date(2025, 10, 19)),
            issues: Some(vec![issue(
                "Information is shared internally only",
                "Contradicts the transparency-first policy",
                "Publish by default, add a customer-facing Q&A section and clarify the update flow.",
                Severity::Mid,
            )]),
        },
        Document {
            id: DocumentId::new("hr-policy"),
            name: "Performance Review Policy".to_string(),
            dept: Department::HumanResources,
            owner: "Yamamoto".to_string(),
            due: date(2025, 11, 12),
            status: DocumentStatus::NeedsRevision,
            last_updated: Some(date(2025, 10, 21)),
            issues: Some(vec![
                issue(
                    "Managers pick evaluation metrics at will",
                    "Weak sense of ownership and transparency",
                    "Define a metric template and require sharing the reasons behind ratings.",
                    Severity::Mid,
                ),
                issue(
                    "The customer value perspective is optional",
                    "Runs against the customer value weighting",
                    "Give customer value metrics at least 30% of the evaluation.",
                    Severity::High,
                ),
            ]),
        },
    ]
}

fn issue(clause: &str, problem: &str, suggestion: &str, severity: Severity) -> Issue {
    Issue {
        clause: clause.to_string(),
        problem: problem.to_string(),
        suggestion: suggestion.to_string(),
        severity,
    }
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}
