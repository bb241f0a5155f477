use super::domain::{AnalysisSummary, CompanyProfile};

const DEMO_COMPANY: &str = "DemoTech Inc.";

const CULTURE_KEYWORDS: [&str; 4] = ["on-the-ground", "team-oriented", "speed", "customer-first"];

const GENERATED_RISKS: [&str; 3] = [
    "Policy communication and operating rules are out of step; interpretation varies by department.",
    "The mission and values that convey leadership intent are not written down.",
    "Rule updates depend on individuals, so transparency and the customer perspective may be lost.",
];

/// Summary shown before the company completes onboarding.
pub fn demo_analysis() -> AnalysisSummary {
    AnalysisSummary {
        company: DEMO_COMPANY.to_string(),
        snapshot: vec![
            "Growing in SaaS/HR tech, deployed at 300 companies, mostly SMB.".to_string(),
            "Teams have wide discretion and a culture that prizes speed.".to_string(),
            "Rebuilding internal controls with overseas expansion in view.".to_string(),
        ],
        culture_keywords: culture_keywords(),
        risks: vec![
            "Latest policy versions are scattered across departments, eroding consistency."
                .to_string(),
            "The expense policy contradicts the customer value and transparency weights."
                .to_string(),
            "Document approval flow is unclear, delaying decisions.".to_string(),
        ],
    }
}

/// Fills the fixed summary templates from `profile`, falling back to demo
/// values for any blank field.
pub fn generate_analysis_summary(profile: &CompanyProfile) -> AnalysisSummary {
    let company = non_blank(&profile.company_name);
    let industry = non_blank(&profile.industry).unwrap_or("SaaS");
    let size = non_blank(&profile.size).unwrap_or("about 200 people");
    let headquarters = non_blank(&profile.headquarters).unwrap_or("Tokyo");
    let challenge = profile
        .challenges
        .first()
        .and_then(|challenge| non_blank(challenge))
        .unwrap_or("mission adoption");

    AnalysisSummary {
        company: company.unwrap_or(DEMO_COMPANY).to_string(),
        snapshot: vec![
            format!(
                "{industry}/{} keeps growing at a scale of {size}.",
                company.unwrap_or("your company")
            ),
            format!("Headquartered in {headquarters}. Leadership is focused on {challenge}."),
            "Teams favour speed and have wide on-the-ground discretion.".to_string(),
        ],
        culture_keywords: culture_keywords(),
        risks: GENERATED_RISKS.iter().map(|risk| risk.to_string()).collect(),
    }
}

fn culture_keywords() -> Vec<String> {
    CULTURE_KEYWORDS
        .iter()
        .map(|keyword| keyword.to_string())
        .collect()
}

fn non_blank(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}
