//! Stage 2: web research per task and validation planning

use super::context::PipelineContext;
use super::types::lenient;
use super::types::{
    DeckAnalysis, Evidence, ResearchPlan, ResearchResult, ResearchResults, ResearchStatus,
    ResearchTask, Source, ValidationPlan, ValidationTask,
};
use crate::llm::{query_json, QueryParams};
use crate::progress::ProgressEvent;
use crate::util::text::truncate_chars;
use crate::web::{ScrapeMethod, SearchHit};
use futures_util::stream::{self, StreamExt};
use serde::Deserialize;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Scraped pages shorter than this are treated as failed scrapes
const MIN_SCRAPED_CHARS: usize = 100;
const SOURCE_CONTENT_CHARS: usize = 3000;
const PROMPT_SOURCE_CHARS: usize = 1500;
const PROMPT_SOURCES_CHARS: usize = 6000;
/// Leading words of a claim used to match research queries
const CLAIM_KEYWORDS: usize = 3;

const FINDINGS_PARAMS: QueryParams = QueryParams::new(0.2, 800);

const NO_RESULTS_FLAG: &str = "No search results - company may not exist or have no online presence";

#[derive(Debug, Deserialize)]
struct FindingsReply {
    #[serde(default = "default_summary")]
    summary: String,
    #[serde(default, deserialize_with = "lenient::text_list")]
    key_findings: Vec<String>,
    #[serde(default, deserialize_with = "lenient::text_list")]
    red_flags: Vec<String>,
    #[serde(default, deserialize_with = "lenient::opt_number")]
    confidence_score: Option<f64>,
    #[serde(default, deserialize_with = "lenient::text_list")]
    validation_needed: Vec<String>,
}

fn default_summary() -> String {
    "No analysis available".to_string()
}

impl FindingsReply {
    fn failed() -> Self {
        Self {
            summary: "Analysis failed".to_string(),
            key_findings: Vec::new(),
            red_flags: Vec::new(),
            confidence_score: Some(0.3),
            validation_needed: Vec::new(),
        }
    }
}

fn render_sources(sources: &[Source]) -> String {
    let mut text = String::new();
    for (i, source) in sources.iter().enumerate() {
        text.push_str(&format!("\n### Source {}: {}\n", i + 1, source.title));
        text.push_str(&format!("URL: {}\n", source.url));
        if !source.snippet.is_empty() {
            text.push_str(&format!("Snippet: {}\n", source.snippet));
        }
        if !source.content.is_empty() {
            text.push_str(&format!(
                "Content: {}...\n",
                truncate_chars(&source.content, PROMPT_SOURCE_CHARS)
            ));
        }
        text.push('\n');
    }
    truncate_chars(&text, PROMPT_SOURCES_CHARS).to_string()
}

fn build_findings_prompt(query: &str, context: &str, sources: &[Source]) -> String {
    format!(
        r#"You are a research analyst for a VC firm. Analyze these research findings.

RESEARCH QUERY: {}
CONTEXT: {}

SOURCES FOUND:
{}

Analyze the findings and return a JSON object:
{{
  "summary": "2-3 sentence summary of what was found",
  "key_findings": ["finding 1", "finding 2", "finding 3"],
  "red_flags": ["any concerns or warning signs"],
  "confidence_score": 0.0,
  "validation_needed": ["specific claims that need to be verified"]
}}

"confidence_score" is a number from 0.0 to 1.0: how confident you are in these findings.

Focus on:
- Factual information that answers the query
- Any discrepancies between sources
- Missing information that's expected
- Signs of legitimacy or red flags

Return ONLY valid JSON."#,
        query,
        context,
        render_sources(sources)
    )
}

async fn analyze_findings(
    context: &PipelineContext,
    query: &str,
    task_context: &str,
    sources: &[Source],
) -> FindingsReply {
    match query_json::<FindingsReply>(
        context.llm(),
        build_findings_prompt(query, task_context, sources),
        FINDINGS_PARAMS,
        "research analysis",
        &context.cost,
    )
    .await
    {
        Ok(reply) => {
            if !reply.validation_needed.is_empty() {
                debug!(query, items = ?reply.validation_needed, "Model suggested follow-up validation");
            }
            reply
        }
        Err(e) => {
            warn!(query, error = %format!("{:#}", e), "Research analysis failed");
            FindingsReply::failed()
        }
    }
}

fn source_from(hit: &SearchHit, page: crate::web::ScrapedPage) -> Source {
    if page.success && page.content.chars().count() > MIN_SCRAPED_CHARS {
        Source {
            url: page.url,
            title: page.title,
            snippet: hit.snippet.clone(),
            content: truncate_chars(&page.content, SOURCE_CONTENT_CHARS).to_string(),
            method: page.method,
        }
    } else {
        Source {
            url: hit.url.clone(),
            title: hit.title.clone(),
            snippet: hit.snippet.clone(),
            content: String::new(),
            method: ScrapeMethod::None,
        }
    }
}

/// Searches, scrapes the top hits and has the model summarise them.
///
/// Never fails: an empty search yields a `failed` result without calling the
/// model, and a failed model call yields a low-confidence result.
pub async fn execute_task(context: &PipelineContext, task: &ResearchTask) -> ResearchResult {
    let config = &context.config;

    let hits = match context
        .search
        .search(&task.query, config.search_max_results)
        .await
    {
        Ok(hits) => hits,
        Err(e) => {
            warn!(task = %task.task_id, error = %format!("{:#}", e), "Search failed");
            Vec::new()
        }
    };

    if hits.is_empty() {
        return ResearchResult {
            task_id: task.task_id.clone(),
            query: task.query.clone(),
            status: ResearchStatus::Failed,
            sources: Vec::new(),
            summary: "No information found".to_string(),
            key_findings: Vec::new(),
            red_flags: vec![NO_RESULTS_FLAG.to_string()],
            confidence_score: 0.0,
        };
    }

    let mut sources = Vec::new();
    for (i, hit) in hits.iter().take(config.scrape_top_n).enumerate() {
        if i > 0 && !config.scrape_delay.is_zero() {
            tokio::time::sleep(config.scrape_delay).await;
        }
        debug!(task = %task.task_id, url = %hit.url, "Scraping hit {}", i + 1);
        let page = context.scraper.scrape(&hit.url).await;
        sources.push(source_from(hit, page));
    }

    let findings = analyze_findings(context, &task.query, &task.context, &sources).await;

    ResearchResult {
        task_id: task.task_id.clone(),
        query: task.query.clone(),
        status: if sources.is_empty() {
            ResearchStatus::Partial
        } else {
            ResearchStatus::Success
        },
        sources,
        summary: findings.summary,
        key_findings: findings.key_findings,
        red_flags: findings.red_flags,
        confidence_score: findings.confidence_score.unwrap_or(0.5).clamp(0.0, 1.0),
    }
}

/// Runs every research task of the plan, at most `research_concurrency` at a
/// time. Results come back in plan order.
pub async fn execute_research_plan(
    context: &PipelineContext,
    plan: &ResearchPlan,
) -> ResearchResults {
    let tasks: Vec<&ResearchTask> = plan.research_tasks().collect();
    let total = tasks.len();
    info!(
        company = %plan.company_name,
        tasks = total,
        skipped = plan.tasks.len() - total,
        "Executing research plan"
    );

    let pending: Vec<_> = tasks
        .into_iter()
        .enumerate()
        .map(|(i, task)| async move {
            context.emit(ProgressEvent::TaskStarted {
                task_id: task.task_id.clone(),
                query: task.query.clone(),
                index: i + 1,
                total,
            });
            let start = Instant::now();

            let result = execute_task(context, task).await;

            context.emit(ProgressEvent::TaskComplete {
                task_id: result.task_id.clone(),
                status: result.status.as_str().to_string(),
                sources: result.sources.len(),
                confidence: result.confidence_score,
                duration: start.elapsed(),
            });
            result
        })
        .collect();

    let results: Vec<ResearchResult> = stream::iter(pending)
        .buffered(context.config.research_concurrency.max(1))
        .collect()
        .await;

    ResearchResults {
        company_name: plan.company_name.clone(),
        research_completed_at: chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        tasks_executed: results.len(),
        total_cost: context.cost.total(),
        results,
    }
}

fn claim_evidence(claim: &str, results: &[ResearchResult]) -> Vec<Evidence> {
    let keywords: Vec<String> = claim
        .to_lowercase()
        .split_whitespace()
        .take(CLAIM_KEYWORDS)
        .map(str::to_string)
        .collect();

    results
        .iter()
        .filter(|r| {
            let query = r.query.to_lowercase();
            keywords.iter().any(|k| query.contains(k.as_str()))
        })
        .map(|r| Evidence {
            task_id: r.task_id.clone(),
            query: r.query.clone(),
            findings: r.key_findings.clone(),
            red_flags: None,
            confidence: r.confidence_score,
        })
        .collect()
}

fn founder_evidence(founder: &str, results: &[ResearchResult]) -> Vec<Evidence> {
    let founder = founder.to_lowercase();

    results
        .iter()
        .filter(|r| r.query.to_lowercase().contains(&founder))
        .map(|r| Evidence {
            task_id: r.task_id.clone(),
            query: r.query.clone(),
            findings: r.key_findings.clone(),
            red_flags: Some(r.red_flags.clone()),
            confidence: r.confidence_score,
        })
        .collect()
}

/// Pairs every deck claim, then every founder, with the research that
/// mentions it.
pub fn create_validation_plan(
    company_name: &str,
    results: &[ResearchResult],
    analysis: &DeckAnalysis,
) -> ValidationPlan {
    let claims = analysis
        .claims
        .iter()
        .map(|claim| (claim.clone(), claim_evidence(claim, results)));

    let founders = analysis.founders.iter().map(|founder| {
        (
            format!("Founder {} has relevant background", founder),
            founder_evidence(founder, results),
        )
    });

    let tasks: Vec<ValidationTask> = claims
        .chain(founders)
        .enumerate()
        .map(|(i, (claim, evidence))| ValidationTask {
            validation_id: format!("V{:03}", i + 1),
            claim,
            source: "pitch_deck".to_string(),
            evidence,
            requires_verification: true,
        })
        .collect();

    info!(tasks = tasks.len(), "Created validation plan");
    ValidationPlan::new(company_name, tasks)
}
