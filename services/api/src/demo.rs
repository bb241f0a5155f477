use crate::infra::{parse_date, parse_weight, InMemorySessionRepository};
use chrono::{Local, NaiveDate};
use clap::Args;
use kitei_navi::config::DemoLoginConfig;
use kitei_navi::error::AppError;
use kitei_navi::workflows::alignment::fixtures::{default_guardrails, seed_documents};
use kitei_navi::workflows::alignment::report::DashboardFilter;
use kitei_navi::workflows::alignment::{
    score_breakdown, AlignmentService, CompanyProfileUpdate, DocumentId, GuardrailsUpdate,
    IssueDecision, WeightCategory,
};
use std::collections::BTreeMap;
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct ScoreArgs {
    /// Override a guardrail weight, e.g. `--weight transparency=90` (repeatable)
    #[arg(long = "weight", value_parser = parse_weight)]
    pub(crate) weights: Vec<(WeightCategory, u8)>,
    /// Only score these document ids (defaults to every seeded document)
    #[arg(long = "document")]
    pub(crate) documents: Vec<String>,
    /// Print each penalty contribution under its document
    #[arg(long)]
    pub(crate) explain: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Company name used for onboarding and the generated analysis
    #[arg(long)]
    pub(crate) company: Option<String>,
    /// Industry used for onboarding
    #[arg(long)]
    pub(crate) industry: Option<String>,
    /// Headcount or size description used for onboarding
    #[arg(long)]
    pub(crate) size: Option<String>,
    /// Leadership challenge to highlight (repeatable)
    #[arg(long = "challenge")]
    pub(crate) challenges: Vec<String>,
    /// Override a guardrail weight before the check, e.g. `--weight speed=85`
    #[arg(long = "weight", value_parser = parse_weight)]
    pub(crate) weights: Vec<(WeightCategory, u8)>,
    /// Override the reporting date (defaults to today)
    #[arg(long, value_parser = parse_date)]
    pub(crate) today: Option<NaiveDate>,
}

pub(crate) fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let ScoreArgs {
        weights,
        documents,
        explain,
    } = args;

    let overrides: BTreeMap<WeightCategory, u8> = weights.into_iter().collect();
    let mut guardrails = default_guardrails();
    guardrails.weights.merge(&overrides);

    println!("Guardrail weights: {}", guardrails.weights);
    for document in seed_documents()
        .into_iter()
        .filter(|document| documents.is_empty() || documents.contains(&document.id.0))
    {
        let breakdown = score_breakdown(&guardrails, &document);
        println!(
            "- {} ({}): {} -> {}",
            document.name,
            document.id,
            breakdown.score,
            breakdown.status.label()
        );
        if explain {
            for component in &breakdown.components {
                println!(
                    "    -{} [{}] {} ({})",
                    component.points,
                    component.source.label(),
                    component.clause,
                    component.notes
                );
            }
        }
    }

    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        company,
        industry,
        size,
        challenges,
        weights,
        today,
    } = args;
    let today = today.unwrap_or_else(|| Local::now().date_naive());

    let credentials = DemoLoginConfig::default();
    let service = AlignmentService::new(
        Arc::new(InMemorySessionRepository::default()),
        credentials.clone(),
    );

    println!("KiteiNavi alignment demo");
    let session = service.login(&credentials.email, &credentials.password)?;
    let id = session.id().clone();
    println!("- Signed in as {} ({})", credentials.email, session.role());

    let analysis = service.onboard(
        &id,
        CompanyProfileUpdate {
            company_name: company,
            industry,
            size,
            challenges: (!challenges.is_empty()).then_some(challenges),
            ..CompanyProfileUpdate::default()
        },
        true,
    )?;
    println!("\nPreliminary analysis for {}", analysis.company);
    for line in &analysis.snapshot {
        println!("  - {line}");
    }
    println!("  Culture: {}", analysis.culture_keywords.join(", "));
    for risk in &analysis.risks {
        println!("  Risk: {risk}");
    }
    service.approve_analysis(&id)?;

    let weights: BTreeMap<WeightCategory, u8> = weights.into_iter().collect();
    let session = service.update_guardrails(
        &id,
        GuardrailsUpdate {
            weights: (!weights.is_empty()).then_some(weights),
            ..GuardrailsUpdate::default()
        },
    )?;
    let guardrails = session.guardrails();
    println!("\nGuardrails");
    println!("  Mission: {}", guardrails.mission);
    println!("  Values: {}", guardrails.values.join(", "));
    println!("  Tone: {}", guardrails.tone.join(", "));
    println!("  Weights: {}", guardrails.weights);

    let selection: Vec<DocumentId> = session
        .documents()
        .iter()
        .map(|document| document.id.clone())
        .collect();
    let cards = service.run_alignment_check(&id, &selection, today)?;
    println!("\nAlignment review ({} documents, {today})", cards.len());
    for card in &cards {
        println!("- {} [{}] {}", card.name, card.owner, card.headline);
        for section in &card.sections {
            println!("    {}", section.heading);
            println!("      now:      {}", section.original);
            println!("      proposed: {}", section.proposed);
        }
        if let Some(memo) = &card.memo {
            println!("    {memo}");
        }
        for issue in &card.issues {
            println!("    {} | {}: {}", issue.severity_label, issue.clause, issue.problem);
            println!("      proposal: {}", issue.suggestion);
        }
    }

    for card in &cards {
        if let Some(issue) = card.issues.first() {
            service.record_decision(&id, &card.id, &issue.clause, IssueDecision::Adopt)?;
        }
    }
    let handoff = service.complete_review(&id)?;
    println!(
        "\nForwarded to planning office: {} adopted / {} held / {} sent back / {} undecided",
        handoff.adopted, handoff.held, handoff.rejected, handoff.undecided
    );

    let dashboard = service.dashboard(
        &id,
        &DashboardFilter {
            prioritize: true,
            ..DashboardFilter::default()
        },
        today,
    )?;
    println!("\nDashboard (priority order)");
    for row in &dashboard.rows {
        println!(
            "  - {:<28} {:<12} {:<10} due {} ({}) | {}% {}",
            row.name,
            row.dept_label,
            row.owner,
            row.due,
            row.due_tone.label(),
            row.score,
            row.status_label
        );
    }

    service.logout(&id)?;
    Ok(())
}
