//! Stage 1: deck analysis, gap identification and research planning

use super::context::PipelineContext;
use super::types::lenient;
use super::types::{AgentType, DeckAnalysis, Priority, ResearchPlan, ResearchTask};
use crate::llm::cost::USD_PER_RESEARCH_TASK;
use crate::llm::{query_json, QueryParams};
use crate::util::text::truncate_chars;
use anyhow::Result;
use serde::Deserialize;
use tracing::{info, warn};

/// Deck text beyond this is not sent to the model
pub const DECK_PROMPT_CHARS: usize = 6000;

const MAX_FOUNDER_TASKS: usize = 3;
const MAX_CLAIM_TASKS: usize = 2;

const ANALYZE_PARAMS: QueryParams = QueryParams::new(0.1, 1000);
const GAPS_PARAMS: QueryParams = QueryParams::new(0.2, 800);

fn build_analysis_prompt(deck_text: &str) -> String {
    format!(
        r#"You are an AI investment analyst. Analyze this pitch deck and extract key information.

PITCH DECK:
{}

Return ONLY valid JSON (no comments, no trailing commas). Use this exact schema:
{{
  "company_name": "",
  "tagline": "",
  "founders": [],
  "stage": "",
  "funding_ask": null,
  "problem": "",
  "solution": "",
  "traction": null,
  "claims": [],
  "team_info": "",
  "competitors_mentioned": [],
  "website": null
}}

Focus on extracting SPECIFIC CLAIMS that can be verified (user counts, revenue, growth rates, partnerships).
Return ONLY valid JSON."#,
        truncate_chars(deck_text, DECK_PROMPT_CHARS)
    )
}

fn build_gaps_prompt(analysis: &DeckAnalysis) -> String {
    format!(
        r#"You are analyzing a startup pitch deck for an investment manager.

EXTRACTED INFO:
{}

Identify CRITICAL information gaps and red flags. Consider:

RED FLAGS (highest priority to investigate):
- Claims without evidence (e.g., "10k users" but no proof)
- Missing team backgrounds (founders with no LinkedIn/history)
- No competitors mentioned (unrealistic)
- Vague metrics ("growing fast" without numbers)
- Funding ask without use of funds

INFORMATION GAPS (important to fill):
- Market size not mentioned
- No financial projections
- Technology/product not explained
- No customer testimonials or case studies

Return a JSON array of gaps, PRIORITIZED by importance for investment decision:
[
  "CRITICAL: Claims 10k users but no traction metrics provided",
  "CRITICAL: Founders not identified - need to verify team exists",
  "HIGH: No competitors mentioned - need to research market landscape",
  "MEDIUM: Financial projections missing"
]

Return 5-8 gaps max. Focus on what would make or break an investment decision.
Return ONLY a valid JSON array."#,
        serde_json::to_string_pretty(analysis).unwrap_or_else(|_| "{}".to_string())
    )
}

#[derive(Deserialize)]
struct GapList(#[serde(deserialize_with = "lenient::text_list")] Vec<String>);

/// Extracts company facts and verifiable claims from the deck text.
///
/// Any failure here stops the pipeline; nothing downstream works without it.
pub async fn analyze_deck(context: &PipelineContext, deck_text: &str) -> Result<DeckAnalysis> {
    let analysis: DeckAnalysis = query_json(
        context.llm(),
        build_analysis_prompt(deck_text),
        ANALYZE_PARAMS,
        "deck analysis",
        &context.cost,
    )
    .await?;

    info!(
        company = analysis.company(),
        founders = analysis.founders.len(),
        claims = analysis.claims.len(),
        "Deck analyzed"
    );

    Ok(analysis)
}

/// Asks the model for the gaps and red flags worth investigating.
/// Returns an empty list if the model call or its parsing fails.
pub async fn identify_gaps(context: &PipelineContext, analysis: &DeckAnalysis) -> Vec<String> {
    match query_json::<GapList>(
        context.llm(),
        build_gaps_prompt(analysis),
        GAPS_PARAMS,
        "gap analysis",
        &context.cost,
    )
    .await
    {
        Ok(GapList(gaps)) => {
            info!(gaps = gaps.len(), "Identified information gaps");
            gaps
        }
        Err(e) => {
            warn!(error = %format!("{:#}", e), "Gap analysis failed, continuing without gaps");
            Vec::new()
        }
    }
}

/// Turns the analysis into an ordered task list. Deterministic: the same
/// analysis always yields the same plan.
pub fn create_research_plan(
    analysis: &DeckAnalysis,
    gaps: Vec<String>,
    cost_so_far: f64,
) -> ResearchPlan {
    let company = analysis.company();
    let mut tasks: Vec<ResearchTask> = Vec::new();

    let mut push = |agent: AgentType, priority: Priority, query: String, context: String, reasoning: &str| {
        tasks.push(ResearchTask {
            task_id: format!("T{:03}", tasks.len() + 1),
            agent,
            priority,
            query,
            context,
            reasoning: reasoning.to_string(),
        });
    };

    if let Some(website) = &analysis.website {
        push(
            AgentType::Research,
            Priority::Critical,
            format!("Verify {} website and company legitimacy", company),
            format!("Website: {}", website),
            "Must confirm company actually exists before further research",
        );
    }

    for founder in analysis.founders.iter().take(MAX_FOUNDER_TASKS) {
        push(
            AgentType::Research,
            Priority::Critical,
            format!("Find LinkedIn profile and background for {}", founder),
            format!("Founder of {}", company),
            "Verify founder exists and has relevant experience",
        );
    }

    for claim in analysis.claims.iter().take(MAX_CLAIM_TASKS) {
        push(
            AgentType::Validator,
            Priority::Critical,
            format!("Verify claim: {}", claim),
            format!("Company: {}", company),
            "Need to validate specific claims made in pitch deck",
        );
    }

    push(
        AgentType::Research,
        Priority::High,
        format!("Find competitors and alternatives to {}", company),
        format!(
            "Industry: {}",
            analysis.problem.as_deref().unwrap_or("Not specified")
        ),
        "Understand market positioning and competitive threats",
    );

    push(
        AgentType::Research,
        Priority::High,
        format!("Find funding history for {} on Crunchbase", company),
        format!(
            "Current stage: {}",
            analysis.stage.as_deref().unwrap_or("Unknown")
        ),
        "Verify funding stage and previous investors",
    );

    push(
        AgentType::Research,
        Priority::Medium,
        format!("Find recent news about {} from 2024-2025", company),
        "Focus on product launches, partnerships, pivots".to_string(),
        "Identify recent developments not in deck",
    );

    let estimated_cost_usd = cost_so_far + tasks.len() as f64 * USD_PER_RESEARCH_TASK;

    ResearchPlan {
        company_name: company.to_string(),
        deck_summary: format!(
            "{} | Stage: {}",
            analysis.tagline.as_deref().unwrap_or("No tagline"),
            analysis.stage.as_deref().unwrap_or("Unknown")
        ),
        critical_gaps: gaps,
        tasks,
        estimated_cost_usd,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{BackendError, MockLLMClient, MockResponse};
    use crate::pipeline::PipelineConfig;
    use crate::web::{MockScraper, MockSearch};
    use serde_json::json;
    use std::sync::Arc;

    fn context_with(llm: Arc<MockLLMClient>) -> PipelineContext {
        PipelineContext::new(
            llm,
            Arc::new(MockSearch::new()),
            Arc::new(MockScraper::new()),
            PipelineConfig::immediate(),
        )
    }

    fn sample_analysis() -> DeckAnalysis {
        DeckAnalysis {
            company_name: Some("Acme Robotics".to_string()),
            tagline: Some("Robots for every warehouse".to_string()),
            founders: vec![
                "Jane Doe".to_string(),
                "John Roe".to_string(),
                "Ann Poe".to_string(),
                "Extra Founder".to_string(),
            ],
            stage: Some("Seed".to_string()),
            problem: Some("Warehouse labor shortage".to_string()),
            claims: vec![
                "10,000 active users".to_string(),
                "$1M ARR".to_string(),
                "Partnership with DHL".to_string(),
            ],
            website: Some("https://acme.example".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_research_plan_full_deck() {
        let plan = create_research_plan(&sample_analysis(), vec!["CRITICAL: gap".to_string()], 0.01);

        let ids: Vec<_> = plan.tasks.iter().map(|t| t.task_id.as_str()).collect();
        assert_eq!(
            ids,
            vec!["T001", "T002", "T003", "T004", "T005", "T006", "T007", "T008", "T009"]
        );

        assert_eq!(plan.tasks[0].query, "Verify Acme Robotics website and company legitimacy");
        assert_eq!(plan.tasks[0].context, "Website: https://acme.example");
        assert_eq!(plan.tasks[1].query, "Find LinkedIn profile and background for Jane Doe");
        assert_eq!(plan.tasks[3].context, "Founder of Acme Robotics");
        assert!(!plan.tasks.iter().any(|t| t.query.contains("Extra Founder")));

        assert_eq!(plan.tasks[4].agent, AgentType::Validator);
        assert_eq!(plan.tasks[4].query, "Verify claim: 10,000 active users");
        assert_eq!(plan.tasks[5].query, "Verify claim: $1M ARR");

        assert_eq!(plan.tasks[6].priority, Priority::High);
        assert_eq!(plan.tasks[6].context, "Industry: Warehouse labor shortage");
        assert_eq!(plan.tasks[7].query, "Find funding history for Acme Robotics on Crunchbase");
        assert_eq!(plan.tasks[7].context, "Current stage: Seed");
        assert_eq!(plan.tasks[8].priority, Priority::Medium);

        assert_eq!(plan.deck_summary, "Robots for every warehouse | Stage: Seed");
        assert_eq!(plan.critical_gaps, vec!["CRITICAL: gap"]);
        assert!((plan.estimated_cost_usd - (0.01 + 9.0 * 0.05)).abs() < 1e-9);
        assert_eq!(plan.research_tasks().count(), 7);
    }

    #[test]
    fn test_research_plan_sparse_deck() {
        let plan = create_research_plan(&DeckAnalysis::default(), Vec::new(), 0.0);

        assert_eq!(plan.company_name, "Unknown");
        assert_eq!(plan.tasks.len(), 3);
        assert_eq!(plan.tasks[0].task_id, "T001");
        assert_eq!(plan.tasks[0].context, "Industry: Not specified");
        assert_eq!(plan.tasks[1].context, "Current stage: Unknown");
        assert_eq!(plan.deck_summary, "No tagline | Stage: Unknown");
    }

    #[test]
    fn test_analysis_prompt_truncates_deck() {
        let long_deck = "x".repeat(DECK_PROMPT_CHARS + 500);
        let prompt = build_analysis_prompt(&long_deck);
        assert!(prompt.contains(&"x".repeat(DECK_PROMPT_CHARS)));
        assert!(!prompt.contains(&"x".repeat(DECK_PROMPT_CHARS + 1)));
    }

    #[tokio::test]
    async fn test_analyze_deck_parses_reply() {
        let llm = Arc::new(MockLLMClient::new());
        llm.add_response(MockResponse::text(
            "```json\n{\"company_name\": \"Acme\", \"founders\": [\"Jane\"], \"claims\": [\"10k users\"],}\n```",
        ));
        let context = context_with(llm.clone());

        let analysis = analyze_deck(&context, "Acme deck text").await.unwrap();
        assert_eq!(analysis.company(), "Acme");
        assert_eq!(analysis.claims, vec!["10k users"]);
        assert!(llm.prompts()[0].contains("Acme deck text"));
        assert!(context.cost.total() > 0.0);
    }

    #[tokio::test]
    async fn test_analyze_deck_failure_is_an_error() {
        let llm = Arc::new(MockLLMClient::new());
        llm.add_response(MockResponse::error(BackendError::AuthenticationError {
            message: "bad key".to_string(),
        }));
        let context = context_with(llm);

        assert!(analyze_deck(&context, "deck").await.is_err());
    }

    #[tokio::test]
    async fn test_identify_gaps() {
        let llm = Arc::new(MockLLMClient::new());
        llm.add_response(MockResponse::json(json!([
            "CRITICAL: No revenue evidence",
            "HIGH: No competitors mentioned"
        ])));
        let context = context_with(llm.clone());

        let gaps = identify_gaps(&context, &sample_analysis()).await;
        assert_eq!(gaps.len(), 2);
        assert!(llm.prompts()[0].contains("Acme Robotics"));
    }

    #[tokio::test]
    async fn test_identify_gaps_failure_yields_empty() {
        let llm = Arc::new(MockLLMClient::new());
        llm.add_response(MockResponse::text("Sorry, I can't do that."));
        let context = context_with(llm);

        assert!(identify_gaps(&context, &sample_analysis()).await.is_empty());
    }
}
