use std::collections::BTreeMap;

use chrono::NaiveDate;
use kitei_navi::workflows::alignment::fixtures::{default_guardrails, seed_documents};
use kitei_navi::workflows::alignment::{
    score_document, status_from_score, AlignmentSession, DocumentId, DocumentStatus,
    GuardrailsUpdate, SessionId, WeightCategory,
};

fn session() -> AlignmentSession {
    AlignmentSession::seeded(SessionId("propagation".to_string()))
}

fn weight_update(category: WeightCategory, weight: u8) -> GuardrailsUpdate {
    let mut weights = BTreeMap::new();
    weights.insert(category, weight);
    GuardrailsUpdate {
        weights: Some(weights),
        ..GuardrailsUpdate::default()
    }
}

#[test]
fn every_weight_sweep_keeps_cache_and_status_consistent() {
    for category in WeightCategory::ordered() {
        for weight in [10, 40, 75, 100] {
            let mut session = session();
            session.update_guardrails(weight_update(category, weight));

            for document in session.documents() {
                let expected = score_document(session.guardrails(), document);
                assert_eq!(session.score(&document.id), Some(expected));
                if document.id.as_str() == "eng-dod" {
                    assert_eq!(document.status, DocumentStatus::UnderReview);
                } else {
                    assert_eq!(document.status, status_from_score(expected));
                }
            }
        }
    }
}

#[test]
fn scores_with_issues_stay_inside_the_penalised_band() {
    let guardrails = default_guardrails();
    for document in seed_documents() {
        let score = score_document(&guardrails, &document);
        if document.has_issues() {
            assert!((10..=87).contains(&score), "{} scored {score}", document.id);
        } else {
            assert_eq!(score, 92);
        }
    }
}

#[test]
fn later_checks_pick_up_the_latest_weights() {
    let mut session = session();
    let today = NaiveDate::from_ymd_opt(2025, 11, 1).expect("valid date");
    let hr_policy = DocumentId::new("hr-policy");

    session
        .run_alignment_check(std::slice::from_ref(&hr_policy), today)
        .expect("check runs");
    let before = session.score(&hr_policy).expect("scored");

    session.update_guardrails(weight_update(WeightCategory::CustomerValue, 10));
    session
        .run_alignment_check(std::slice::from_ref(&hr_policy), today)
        .expect("check runs");
    let after = session.score(&hr_policy).expect("scored");

    assert_eq!(before, 49);
    // customer value drops from 6 to 1 penalty point
    assert_eq!(after, 54);
    assert_eq!(
        session.document(&hr_policy).expect("seeded").status,
        DocumentStatus::NeedsRevision
    );
}
