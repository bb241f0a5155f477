use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::analysis::{demo_analysis, generate_analysis_summary};
use super::domain::{
    AnalysisSummary, CompanyProfile, CompanyProfileUpdate, Document, DocumentId, DocumentStatus,
    Guardrails, GuardrailsUpdate, IssueDecision,
};
use super::fixtures::{default_company, default_guardrails, seed_documents, TONE_OPTIONS};
use super::policy::Role;
use super::report::task_id;
use super::scoring::{score_document, status_from_score};

/// Score assumed for a document that has never been scored.
pub const FALLBACK_SCORE: u8 = 70;
/// Floor applied when a proposed revision is accepted wholesale.
pub const APPLIED_PROPOSAL_SCORE: u8 = 90;

/// Identifier wrapper for signed-in sessions.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub String);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Rejections raised by session operations. None of these unwind past the caller.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("select at least one document before running an alignment check")]
    EmptySelection,
    #[error("document {0} does not exist in this session")]
    UnknownDocument(DocumentId),
    #[error("document {document} has no issue with clause '{clause}'")]
    UnknownIssue { document: DocumentId, clause: String },
    #[error("task {0} does not exist in this session")]
    UnknownTask(String),
    #[error("moving the due date of {document} by {days} days leaves the calendar range")]
    DueDateOutOfRange { document: DocumentId, days: i64 },
}

/// Outcome of forwarding a finished review to the planning office.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewHandoff {
    pub documents: Vec<DocumentId>,
    pub adopted: usize,
    pub held: usize,
    pub rejected: usize,
    pub undecided: usize,
}

/// Volatile state owned by one signed-in user.
///
/// All guardrail, document, score and decision changes go through the methods
/// below; callers gate them with [`super::policy::authorize`] first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignmentSession {
    id: SessionId,
    role: Role,
    company: CompanyProfile,
    analysis: AnalysisSummary,
    analysis_approved: bool,
    guardrails: Guardrails,
    documents: Vec<Document>,
    scores: BTreeMap<DocumentId, u8>,
    selected_document_ids: Vec<DocumentId>,
    issue_decisions: BTreeMap<DocumentId, BTreeMap<String, IssueDecision>>,
    completed_tasks: BTreeSet<String>,
}

impl AlignmentSession {
    /// Fresh session seeded from the static fixtures.
    pub fn seeded(id: SessionId) -> Self {
        Self::with_documents(id, default_guardrails(), seed_documents())
    }

    pub fn with_documents(id: SessionId, guardrails: Guardrails, documents: Vec<Document>) -> Self {
        debug_assert!(
            documents.iter().all(Document::has_unique_clauses),
            "issue clauses must be unique within a document"
        );
        let scores = documents
            .iter()
            .map(|document| (document.id.clone(), score_document(&guardrails, document)))
            .collect();

        Self {
            id,
            role: Role::default(),
            company: default_company(),
            analysis: demo_analysis(),
            analysis_approved: false,
            guardrails,
            documents,
            scores,
            selected_document_ids: Vec::new(),
            issue_decisions: BTreeMap::new(),
            completed_tasks: BTreeSet::new(),
        }
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn set_role(&mut self, role: Role) {
        self.role = role;
    }

    pub fn company(&self) -> &CompanyProfile {
        &self.company
    }

    pub fn analysis(&self) -> &AnalysisSummary {
        &self.analysis
    }

    pub fn analysis_approved(&self) -> bool {
        self.analysis_approved
    }

    pub fn guardrails(&self) -> &Guardrails {
        &self.guardrails
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn document(&self, id: &DocumentId) -> Option<&Document> {
        self.documents.iter().find(|document| &document.id == id)
    }

    pub fn scores(&self) -> &BTreeMap<DocumentId, u8> {
        &self.scores
    }

    pub fn score(&self, id: &DocumentId) -> Option<u8> {
        self.scores.get(id).copied()
    }

    pub fn selected_document_ids(&self) -> &[DocumentId] {
        &self.selected_document_ids
    }

    pub fn issue_decisions(&self) -> &BTreeMap<DocumentId, BTreeMap<String, IssueDecision>> {
        &self.issue_decisions
    }

    pub fn decision(&self, document: &DocumentId, clause: &str) -> Option<IssueDecision> {
        self.issue_decisions
            .get(document)
            .and_then(|decisions| decisions.get(clause))
            .copied()
    }

    pub fn is_task_completed(&self, task_id: &str) -> bool {
        self.completed_tasks.contains(task_id)
    }

    /// Stores company details and, when requested, regenerates the analysis.
    /// Either way the analysis goes back to awaiting approval.
    pub fn onboard(&mut self, update: CompanyProfileUpdate, auto_analysis: bool) {
        self.company.apply(update);
        if auto_analysis {
            self.analysis = generate_analysis_summary(&self.company);
        }
        self.analysis_approved = false;
        info!(session = %self.id, auto_analysis, "company profile updated");
    }

    pub fn replace_analysis(&mut self, analysis: AnalysisSummary) {
        self.analysis = analysis;
    }

    pub fn approve_analysis(&mut self) {
        self.analysis_approved = true;
    }

    /// Merges `update` into the guardrails and rescores every document.
    ///
    /// Status follows the new score for every document except those still
    /// under review, which only an explicit check may move.
    pub fn update_guardrails(&mut self, update: GuardrailsUpdate) {
        let GuardrailsUpdate {
            mission,
            values,
            tone,
            weights,
        } = update;

        if let Some(mission) = mission {
            self.guardrails.mission = mission;
        }
        if let Some(values) = values {
            self.guardrails.values = values
                .into_iter()
                .filter(|value| !value.trim().is_empty())
                .collect();
        }
        if let Some(tone) = tone {
            self.guardrails.tone = sanitize_tone(tone);
        }
        if let Some(weights) = weights {
            self.guardrails.weights.merge(&weights);
        }

        for document in &mut self.documents {
            let score = score_document(&self.guardrails, document);
            self.scores.insert(document.id.clone(), score);
            if document.status != DocumentStatus::UnderReview {
                document.status = status_from_score(score);
            }
            debug!(session = %self.id, document = %document.id, score, "document rescored");
        }

        info!(
            session = %self.id,
            weights = %self.guardrails.weights,
            "guardrails updated"
        );
    }

    /// Rescores the selected documents and stamps them with `today`.
    ///
    /// Unknown ids are skipped. Returns the ids that were actually checked.
    pub fn run_alignment_check(
        &mut self,
        document_ids: &[DocumentId],
        today: NaiveDate,
    ) -> Result<Vec<DocumentId>, SessionError> {
        if document_ids.is_empty() {
            return Err(SessionError::EmptySelection);
        }

        let mut checked = Vec::new();
        for document in &mut self.documents {
            if !document_ids.contains(&document.id) {
                continue;
            }

            let score = score_document(&self.guardrails, document);
            self.scores.insert(document.id.clone(), score);
            document.last_updated = Some(today);
            let pending_first_pass =
                document.status == DocumentStatus::UnderReview && !document.has_issues();
            if !pending_first_pass {
                document.status = status_from_score(score);
            }
            checked.push(document.id.clone());
        }

        self.selected_document_ids = document_ids.to_vec();
        info!(
            session = %self.id,
            requested = document_ids.len(),
            checked = checked.len(),
            "alignment check completed"
        );
        Ok(checked)
    }

    pub fn update_issue_decision(
        &mut self,
        document_id: &DocumentId,
        clause: &str,
        decision: IssueDecision,
    ) -> Result<(), SessionError> {
        let document = self
            .document(document_id)
            .ok_or_else(|| SessionError::UnknownDocument(document_id.clone()))?;
        if document.issue(clause).is_none() {
            return Err(SessionError::UnknownIssue {
                document: document_id.clone(),
                clause: clause.to_string(),
            });
        }

        self.issue_decisions
            .entry(document_id.clone())
            .or_default()
            .insert(clause.to_string(), decision);
        Ok(())
    }

    /// Clears decisions for one document, or for all when `document_id` is `None`.
    pub fn reset_issue_decisions(&mut self, document_id: Option<&DocumentId>) {
        match document_id {
            Some(id) => {
                self.issue_decisions.remove(id);
            }
            None => self.issue_decisions.clear(),
        }
    }

    /// Tallies decisions on the selected documents, then clears every decision.
    pub fn complete_review(&mut self) -> ReviewHandoff {
        let mut handoff = ReviewHandoff {
            documents: Vec::new(),
            adopted: 0,
            held: 0,
            rejected: 0,
            undecided: 0,
        };

        for id in &self.selected_document_ids {
            let Some(document) = self.document(id) else {
                continue;
            };
            handoff.documents.push(id.clone());
            for issue in document.issues() {
                match self.decision(id, &issue.clause) {
                    Some(IssueDecision::Adopt) => handoff.adopted += 1,
                    Some(IssueDecision::Hold) => handoff.held += 1,
                    Some(IssueDecision::Reject) => handoff.rejected += 1,
                    None => handoff.undecided += 1,
                }
            }
        }

        self.reset_issue_decisions(None);
        info!(
            session = %self.id,
            documents = handoff.documents.len(),
            adopted = handoff.adopted,
            "review forwarded"
        );
        handoff
    }

    pub fn set_document_status(
        &mut self,
        document_id: &DocumentId,
        status: DocumentStatus,
    ) -> Result<(), SessionError> {
        self.document_mut(document_id)?.status = status;
        Ok(())
    }

    /// Moves the due date by `days` (negative pulls it earlier).
    pub fn shift_due_date(
        &mut self,
        document_id: &DocumentId,
        days: i64,
    ) -> Result<NaiveDate, SessionError> {
        let document = self.document_mut(document_id)?;
        let shifted = Duration::try_days(days)
            .and_then(|delta| document.due.checked_add_signed(delta))
            .ok_or_else(|| SessionError::DueDateOutOfRange {
                document: document_id.clone(),
                days,
            })?;
        document.due = shifted;
        Ok(shifted)
    }

    /// Overrides the cached score; values above 100 are clamped.
    pub fn update_alignment_score(
        &mut self,
        document_id: &DocumentId,
        score: u8,
    ) -> Result<(), SessionError> {
        if self.document(document_id).is_none() {
            return Err(SessionError::UnknownDocument(document_id.clone()));
        }
        self.scores.insert(document_id.clone(), score.min(100));
        Ok(())
    }

    /// Accepts the proposed revision: the document becomes aligned and its
    /// score is raised to at least [`APPLIED_PROPOSAL_SCORE`].
    pub fn apply_proposal(&mut self, document_id: &DocumentId) -> Result<u8, SessionError> {
        self.set_document_status(document_id, DocumentStatus::Aligned)?;
        let current = self.score(document_id).unwrap_or(FALLBACK_SCORE);
        let next = current.max(APPLIED_PROPOSAL_SCORE);
        self.update_alignment_score(document_id, next)?;
        info!(session = %self.id, document = %document_id, score = next, "proposal applied");
        Ok(next)
    }

    /// Flips the acknowledgement flag of a remediation task; returns the new state.
    pub fn toggle_task(&mut self, task: &str) -> Result<bool, SessionError> {
        let exists = self.documents.iter().any(|document| {
            (0..document.issues().len()).any(|index| task_id(&document.id, index) == task)
        });
        if !exists {
            return Err(SessionError::UnknownTask(task.to_string()));
        }

        if self.completed_tasks.remove(task) {
            Ok(false)
        } else {
            self.completed_tasks.insert(task.to_string());
            Ok(true)
        }
    }

    fn document_mut(&mut self, document_id: &DocumentId) -> Result<&mut Document, SessionError> {
        self.documents
            .iter_mut()
            .find(|document| &document.id == document_id)
            .ok_or_else(|| SessionError::UnknownDocument(document_id.clone()))
    }
}

fn sanitize_tone(requested: Vec<String>) -> Vec<String> {
    let mut tone: Vec<String> = Vec::new();
    for entry in requested {
        if !TONE_OPTIONS.contains(&entry.as_str()) {
            warn!(tone = %entry, "ignoring tone outside the option list");
            continue;
        }
        if !tone.contains(&entry) {
            tone.push(entry);
        }
    }
    tone
}
