//! Alignment scoring engine.
//!
//! Every function here is pure: the guardrails are read at call time and
//! nothing is cached, so callers may invoke the engine from any thread.

use serde::Serialize;

use super::domain::{Document, DocumentStatus, Guardrails, Issue, WeightCategory};

pub const BASE_SCORE: u8 = 88;
pub const UNSCORED_REVIEW_SCORE: u8 = 68;
pub const CLEAN_SCORE_CAP: u8 = 95;
pub const CLEAN_BONUS: u8 = 4;
pub const SCORE_FLOOR: u8 = 10;

pub const ALIGNED_THRESHOLD: u8 = 75;
pub const NEEDS_REVISION_THRESHOLD: u8 = 50;

/// Keyword to weight category lookup. Matching is a case-sensitive substring
/// test, so incidental overlaps count.
pub const KEYWORD_TABLE: [(&str, WeightCategory); 6] = [
    ("customer", WeightCategory::CustomerValue),
    ("transparency", WeightCategory::Transparency),
    ("speed", WeightCategory::Speed),
    ("rapid", WeightCategory::Speed),
    ("quality", WeightCategory::Quality),
    ("ownership", WeightCategory::Ownership),
];

/// Where a penalty point came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum PenaltySource {
    Severity,
    Keyword {
        keyword: &'static str,
        category: WeightCategory,
        weight: u8,
    },
}

impl PenaltySource {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Severity => "severity",
            Self::Keyword { keyword, .. } => keyword,
        }
    }
}

/// Discrete contribution to a document penalty, kept for user-facing justifications.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PenaltyComponent {
    pub clause: String,
    pub source: PenaltySource,
    pub points: u32,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreBreakdown {
    pub score: u8,
    pub status: DocumentStatus,
    pub total_penalty: u32,
    pub components: Vec<PenaltyComponent>,
}

/// Scores `document` against `guardrails` on a 10..=100 scale.
pub fn score_document(guardrails: &Guardrails, document: &Document) -> u8 {
    if !document.has_issues() {
        return unscored_or_clean(document);
    }

    let penalty: u32 = document
        .issues()
        .iter()
        .map(|issue| issue_penalty(guardrails, issue))
        .sum();

    floor_score(penalty)
}

/// Same score as [`score_document`], with every contribution itemised.
pub fn score_breakdown(guardrails: &Guardrails, document: &Document) -> ScoreBreakdown {
    let mut components = Vec::new();

    for issue in document.issues() {
        components.push(PenaltyComponent {
            clause: issue.clause.clone(),
            source: PenaltySource::Severity,
            points: issue.severity.penalty(),
            notes: format!("{} severity", issue.severity.label()),
        });

        for (keyword, category) in KEYWORD_TABLE {
            if !issue.mentions(keyword) {
                continue;
            }
            let weight = guardrails.weights.get(category);
            components.push(PenaltyComponent {
                clause: issue.clause.clone(),
                source: PenaltySource::Keyword {
                    keyword,
                    category,
                    weight,
                },
                points: keyword_penalty(weight),
                notes: format!("reflects the {} weight ({weight})", category.label()),
            });
        }
    }

    let total_penalty = components.iter().map(|component| component.points).sum();
    let score = if document.has_issues() {
        floor_score(total_penalty)
    } else {
        unscored_or_clean(document)
    };

    ScoreBreakdown {
        score,
        status: status_from_score(score),
        total_penalty,
        components,
    }
}

/// Maps a score onto its status bracket; both thresholds are inclusive upward.
pub fn status_from_score(score: u8) -> DocumentStatus {
    if score >= ALIGNED_THRESHOLD {
        DocumentStatus::Aligned
    } else if score >= NEEDS_REVISION_THRESHOLD {
        DocumentStatus::NeedsRevision
    } else {
        DocumentStatus::Mismatched
    }
}

fn unscored_or_clean(document: &Document) -> u8 {
    if document.status == DocumentStatus::UnderReview {
        UNSCORED_REVIEW_SCORE
    } else {
        (BASE_SCORE + CLEAN_BONUS).min(CLEAN_SCORE_CAP)
    }
}

fn issue_penalty(guardrails: &Guardrails, issue: &Issue) -> u32 {
    let keyword_total: u32 = KEYWORD_TABLE
        .iter()
        .filter(|(keyword, _)| issue.mentions(keyword))
        .map(|(_, category)| keyword_penalty(guardrails.weights.get(*category)))
        .sum();

    issue.severity.penalty() + keyword_total
}

/// `round(weight * 0.07)` with half-up rounding, in integer arithmetic.
fn keyword_penalty(weight: u8) -> u32 {
    (u32::from(weight) * 7 + 50) / 100
}

fn floor_score(penalty: u32) -> u8 {
    let raw = i64::from(BASE_SCORE) - i64::from(penalty);
    raw.max(i64::from(SCORE_FLOOR)) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_penalty_rounds_half_up() {
        assert_eq!(keyword_penalty(50), 4);
        assert_eq!(keyword_penalty(60), 4);
        assert_eq!(keyword_penalty(65), 5);
        assert_eq!(keyword_penalty(75), 5);
        assert_eq!(keyword_penalty(80), 6);
        assert_eq!(keyword_penalty(100), 7);
        assert_eq!(keyword_penalty(10), 1);
    }

    #[test]
    fn floor_score_never_drops_below_ten() {
        assert_eq!(floor_score(0), 88);
        assert_eq!(floor_score(78), 10);
        assert_eq!(floor_score(500), 10);
    }
}
