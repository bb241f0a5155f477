use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Weight assumed for a category missing from a weight map.
pub const FALLBACK_WEIGHT: u8 = 60;
pub const MIN_WEIGHT: u8 = 10;
pub const MAX_WEIGHT: u8 = 100;

/// Closed set of guardrail dimensions that carry a weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WeightCategory {
    CustomerValue,
    Speed,
    Quality,
    Transparency,
    Ownership,
}

impl WeightCategory {
    pub const fn ordered() -> [Self; 5] {
        [
            Self::CustomerValue,
            Self::Speed,
            Self::Quality,
            Self::Transparency,
            Self::Ownership,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::CustomerValue => "customer value",
            Self::Speed => "speed",
            Self::Quality => "quality",
            Self::Transparency => "transparency",
            Self::Ownership => "ownership",
        }
    }

    const fn default_weight(self) -> u8 {
        match self {
            Self::CustomerValue => 80,
            Self::Speed => 60,
            Self::Quality => 70,
            Self::Transparency => 75,
            Self::Ownership => 65,
        }
    }
}

/// Per-category weights. Updates merge; they never replace the whole map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GuardrailWeights(BTreeMap<WeightCategory, u8>);

impl GuardrailWeights {
    /// Live weight for `category`, or [`FALLBACK_WEIGHT`] when the key is absent.
    pub fn get(&self, category: WeightCategory) -> u8 {
        self.0.get(&category).copied().unwrap_or(FALLBACK_WEIGHT)
    }

    pub fn set(&mut self, category: WeightCategory, weight: u8) {
        self.0
            .insert(category, weight.clamp(MIN_WEIGHT, MAX_WEIGHT));
    }

    /// Merges a partial map and backfills any category still missing.
    pub fn merge(&mut self, partial: &BTreeMap<WeightCategory, u8>) {
        for (category, weight) in partial {
            self.set(*category, *weight);
        }
        for category in WeightCategory::ordered() {
            self.0.entry(category).or_insert(FALLBACK_WEIGHT);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (WeightCategory, u8)> + '_ {
        self.0.iter().map(|(category, weight)| (*category, *weight))
    }

    pub fn is_complete(&self) -> bool {
        WeightCategory::ordered()
            .iter()
            .all(|category| self.0.contains_key(category))
    }
}

impl Default for GuardrailWeights {
    fn default() -> Self {
        Self(
            WeightCategory::ordered()
                .into_iter()
                .map(|category| (category, category.default_weight()))
                .collect(),
        )
    }
}

impl From<BTreeMap<WeightCategory, u8>> for GuardrailWeights {
    fn from(value: BTreeMap<WeightCategory, u8>) -> Self {
        Self(value)
    }
}

impl fmt::Display for GuardrailWeights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self
            .iter()
            .map(|(category, weight)| format!("{}:{}", category.label(), weight))
            .collect();
        f.write_str(&rendered.join(" / "))
    }
}

/// Mission, values, tone and weights the CEO sets for the organisation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Guardrails {
    pub mission: String,
    pub values: Vec<String>,
    pub tone: Vec<String>,
    pub weights: GuardrailWeights,
}

/// Partial guardrail edit; `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuardrailsUpdate {
    #[serde(default)]
    pub mission: Option<String>,
    #[serde(default)]
    pub values: Option<Vec<String>>,
    #[serde(default)]
    pub tone: Option<Vec<String>>,
    #[serde(default)]
    pub weights: Option<BTreeMap<WeightCategory, u8>>,
}

/// Identifier wrapper for documents under review.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(pub String);

impl DocumentId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Department {
    Engineering,
    Finance,
    Marketing,
    Sales,
    #[serde(rename = "CS")]
    CustomerSuccess,
    #[serde(rename = "HR")]
    HumanResources,
    Corp,
}

impl Department {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Engineering => "Engineering",
            Self::Finance => "Finance",
            Self::Marketing => "Marketing",
            Self::Sales => "Sales",
            Self::CustomerSuccess => "CS",
            Self::HumanResources => "HR",
            Self::Corp => "Corp",
        }
    }
}

/// Coarse alignment bucket shown on every board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    Aligned,
    NeedsRevision,
    Mismatched,
    UnderReview,
}

impl DocumentStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Aligned => "aligned",
            Self::NeedsRevision => "needs revision",
            Self::Mismatched => "mismatched",
            Self::UnderReview => "under review",
        }
    }

    /// Lower ranks surface first on priority-ordered boards.
    pub(crate) const fn priority_rank(self) -> u8 {
        match self {
            Self::Mismatched => 0,
            Self::NeedsRevision => 1,
            Self::UnderReview => 2,
            Self::Aligned => 3,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Mid,
    High,
    #[default]
    #[serde(other)]
    Unspecified,
}

impl Severity {
    pub const fn penalty(self) -> u32 {
        match self {
            Self::High => 15,
            Self::Mid | Self::Unspecified => 8,
            Self::Low => 4,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Mid => "mid",
            Self::Low => "low",
            Self::Unspecified => "unspecified",
        }
    }
}

/// A clause flagged against the guardrails. `clause` is unique per document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub clause: String,
    pub problem: String,
    pub suggestion: String,
    #[serde(default)]
    pub severity: Severity,
}

impl Issue {
    pub(crate) fn mentions(&self, needle: &str) -> bool {
        self.clause.contains(needle)
            || self.problem.contains(needle)
            || self.suggestion.contains(needle)
    }
}

/// Policy or process artifact under alignment review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocumentId,
    pub name: String,
    pub dept: Department,
    pub owner: String,
    pub due: NaiveDate,
    pub status: DocumentStatus,
    /// `None` means the document has not been analysed yet.
    #[serde(default)]
    pub issues: Option<Vec<Issue>>,
    #[serde(default)]
    pub last_updated: Option<NaiveDate>,
}

impl Document {
    pub fn issues(&self) -> &[Issue] {
        self.issues.as_deref().unwrap_or_default()
    }

    pub fn has_issues(&self) -> bool {
        !self.issues().is_empty()
    }

    pub fn issue(&self, clause: &str) -> Option<&Issue> {
        self.issues().iter().find(|issue| issue.clause == clause)
    }

    /// Clauses key the per-document decision map, so none may repeat.
    pub fn has_unique_clauses(&self) -> bool {
        let issues = self.issues();
        issues
            .iter()
            .enumerate()
            .all(|(index, issue)| issues[..index].iter().all(|seen| seen.clause != issue.clause))
    }

    pub fn last_updated_or_default(&self) -> NaiveDate {
        self.last_updated.unwrap_or_else(fallback_last_updated)
    }
}

pub(crate) fn fallback_last_updated() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 10, 15).unwrap_or_default()
}

/// Disposition recorded for a single issue during review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueDecision {
    Adopt,
    Hold,
    Reject,
}

impl IssueDecision {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Adopt => "adopt revision",
            Self::Hold => "hold",
            Self::Reject => "send back",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyProfile {
    pub company_name: String,
    pub industry: String,
    pub size: String,
    pub headquarters: String,
    #[serde(default)]
    pub challenges: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyProfileUpdate {
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub headquarters: Option<String>,
    #[serde(default)]
    pub challenges: Option<Vec<String>>,
}

impl CompanyProfile {
    pub fn apply(&mut self, update: CompanyProfileUpdate) {
        if let Some(company_name) = update.company_name {
            self.company_name = company_name;
        }
        if let Some(industry) = update.industry {
            self.industry = industry;
        }
        if let Some(size) = update.size {
            self.size = size;
        }
        if let Some(headquarters) = update.headquarters {
            self.headquarters = headquarters;
        }
        if let Some(challenges) = update.challenges {
            self.challenges = challenges;
        }
    }
}

/// Preliminary company analysis shown before guardrails are set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisSummary {
    pub company: String,
    pub snapshot: Vec<String>,
    pub culture_keywords: Vec<String>,
    pub risks: Vec<String>,
}
