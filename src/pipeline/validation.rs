//! Stage 3: claim validation and the overall verdict

use super::context::PipelineContext;
use super::types::lenient;
use super::types::{
    CriticalIssue, DeckAnalysis, Evidence, Severity, ValidationPlan, ValidationReport,
    ValidationResult, ValidationStatus, ValidationSummary, ValidationTask,
};
use crate::llm::{query_json, QueryParams};
use crate::progress::ProgressEvent;
use crate::util::text::{percent, truncate_chars};
use anyhow::{anyhow, Result};
use serde::Deserialize;
use tracing::{info, warn};

const EVIDENCE_FINDINGS: usize = 5;
const EVIDENCE_CHARS: usize = 4000;
/// Critical issues quoted to the model for the overall assessment
const ASSESSMENT_ISSUES: usize = 5;

const CLAIM_PARAMS: QueryParams = QueryParams::new(0.1, 1000);
const ASSESSMENT_PARAMS: QueryParams = QueryParams::new(0.3, 800);

#[derive(Debug, Deserialize)]
struct ClaimReply {
    status: String,
    severity: String,
    #[serde(default, deserialize_with = "lenient::text_list")]
    evidence_for: Vec<String>,
    #[serde(default, deserialize_with = "lenient::text_list")]
    evidence_against: Vec<String>,
    #[serde(default)]
    reasoning: String,
    #[serde(default, deserialize_with = "lenient::opt_number")]
    confidence: Option<f64>,
    #[serde(default)]
    recommendation: String,
}

#[derive(Debug, Deserialize)]
struct AssessmentReply {
    overall_assessment: String,
    investment_recommendation: String,
}

fn format_evidence(evidence: &[Evidence]) -> String {
    if evidence.is_empty() {
        return "No research evidence found for this claim.".to_string();
    }

    let mut text = String::new();
    for (i, item) in evidence.iter().enumerate() {
        text.push_str(&format!("\n--- Evidence {} ---\n", i + 1));
        text.push_str(&format!("Research Query: {}\n", item.query));
        text.push_str(&format!("Confidence: {:.0}%\n", item.confidence * 100.0));

        if !item.findings.is_empty() {
            text.push_str("Findings:\n");
            for finding in item.findings.iter().take(EVIDENCE_FINDINGS) {
                text.push_str(&format!("  • {}\n", finding));
            }
        }

        if let Some(flags) = item.red_flags.as_ref().filter(|f| !f.is_empty()) {
            text.push_str("Red Flags:\n");
            for flag in flags {
                text.push_str(&format!("  ⚠️  {}\n", flag));
            }
        }

        text.push('\n');
    }

    truncate_chars(&text, EVIDENCE_CHARS).to_string()
}

fn build_claim_prompt(task: &ValidationTask) -> String {
    format!(
        r#"You are a fact-checker for an investment firm. Validate this claim against research evidence.

CLAIM TO VERIFY:
"{}"

RESEARCH EVIDENCE:
{}

Analyze whether the claim is supported, contradicted, or unverifiable based on the evidence.

Return a JSON object:
{{
  "status": "verified|contradicted|unverified|suspicious",
  "severity": "critical|high|medium|low",
  "evidence_for": ["specific evidence supporting claim"],
  "evidence_against": ["specific evidence contradicting claim"],
  "reasoning": "detailed explanation of your analysis process",
  "confidence": 0.0,
  "recommendation": "what investor should do about this finding"
}}

IMPORTANT GUIDELINES:
- "verified": Strong evidence supports the claim (>70% confidence)
- "contradicted": Evidence directly conflicts with claim
- "unverified": Not enough evidence to confirm or deny
- "suspicious": Evidence raises concerns even if not direct contradiction

Severity levels:
- "critical": Could be a deal-breaker (false claims, major discrepancies)
- "high": Significant concern requiring investigation
- "medium": Notable issue but not immediately disqualifying
- "low": Minor discrepancy or missing context

"confidence" is a number from 0.0 to 1.0.
Be thorough but fair. Strong claims require strong evidence.
Return ONLY valid JSON."#,
        task.claim,
        format_evidence(&task.evidence)
    )
}

async fn judge_claim(context: &PipelineContext, task: &ValidationTask) -> Result<ValidationResult> {
    let reply: ClaimReply = query_json(
        context.llm(),
        build_claim_prompt(task),
        CLAIM_PARAMS,
        "claim validation",
        &context.cost,
    )
    .await?;

    let status = ValidationStatus::parse(&reply.status)
        .ok_or_else(|| anyhow!("unknown validation status '{}'", reply.status))?;
    let severity = Severity::parse(&reply.severity)
        .ok_or_else(|| anyhow!("unknown severity '{}'", reply.severity))?;

    Ok(ValidationResult {
        validation_id: task.validation_id.clone(),
        claim: task.claim.clone(),
        status,
        severity,
        evidence_for: reply.evidence_for,
        evidence_against: reply.evidence_against,
        reasoning: reply.reasoning,
        confidence: reply.confidence.unwrap_or_default().clamp(0.0, 1.0),
        recommendation: reply.recommendation,
    })
}

/// Judges one claim against its evidence. A failed model call or an
/// unusable reply is recorded as an unverified result, never an error.
pub async fn validate_claim(context: &PipelineContext, task: &ValidationTask) -> ValidationResult {
    match judge_claim(context, task).await {
        Ok(result) => {
            if result.status.is_concern() {
                warn!(
                    claim = %task.validation_id,
                    status = result.status.as_str(),
                    severity = result.severity.as_str(),
                    "Claim raised concerns"
                );
            }
            result
        }
        Err(e) => {
            let message = format!("{:#}", e);
            warn!(claim = %task.validation_id, error = %message, "Validation failed");
            ValidationResult::failed(task, &message)
        }
    }
}

/// Validates claims one after another, pausing between model calls
pub async fn execute_validation_plan(
    context: &PipelineContext,
    plan: &ValidationPlan,
) -> Vec<ValidationResult> {
    let total = plan.validation_tasks.len();
    info!(company = %plan.company_name, claims = total, "Validating claims");

    let mut results = Vec::with_capacity(total);
    for (i, task) in plan.validation_tasks.iter().enumerate() {
        if i > 0 && !context.config.validation_delay.is_zero() {
            tokio::time::sleep(context.config.validation_delay).await;
        }

        let result = validate_claim(context, task).await;
        context.emit(ProgressEvent::ClaimValidated {
            validation_id: result.validation_id.clone(),
            status: result.status.as_str().to_string(),
            severity: result.severity.as_str().to_string(),
            index: i + 1,
            total,
        });
        results.push(result);
    }

    results
}

fn build_assessment_prompt(
    summary: &ValidationSummary,
    issues: &[CriticalIssue],
    analysis: Option<&DeckAnalysis>,
) -> String {
    let company_context = analysis
        .map(|a| {
            format!(
                r#"
COMPANY CONTEXT:
- Name: {}
- Stage: {}
- Problem: {}
- Solution: {}
- Funding Ask: {}
"#,
                a.company(),
                a.stage.as_deref().unwrap_or("Unknown"),
                a.problem.as_deref().unwrap_or("Not specified"),
                a.solution.as_deref().unwrap_or("Not specified"),
                a.funding_ask.as_deref().unwrap_or("Not specified"),
            )
        })
        .unwrap_or_default();

    let quoted: Vec<&CriticalIssue> = issues.iter().take(ASSESSMENT_ISSUES).collect();

    format!(
        r#"You are an investment analyst writing a validation report summary.
{}
VALIDATION RESULTS:
- Total claims checked: {}
- Verified: {} ({:.0}%)
- Contradicted: {}
- Suspicious: {}
- Unverified: {}
- Critical issues found: {}

CRITICAL ISSUES:
{}

Write a JSON report:
{{
  "overall_assessment": "2-3 paragraph assessment of validation findings. Be balanced but honest about concerns.",
  "investment_recommendation": "PASS|PROCEED_WITH_CAUTION|REJECT with brief justification"
}}

Guidelines:
- PASS: Most claims verified, no critical issues, minor concerns are addressable
- PROCEED_WITH_CAUTION: Some concerns but company may still be viable with more diligence
- REJECT: Critical issues like false claims, missing founders, or fundamental problems

Be direct and actionable. VCs need clear recommendations.
Return ONLY valid JSON."#,
        company_context,
        summary.total_claims_checked,
        summary.verified,
        percent(summary.verified, summary.total_claims_checked),
        summary.contradicted,
        summary.suspicious,
        summary.unverified,
        issues.len(),
        serde_json::to_string_pretty(&quoted).unwrap_or_else(|_| "[]".to_string())
    )
}

/// Rule-based assessment used when the model cannot provide one.
/// Returns `(overall_assessment, investment_recommendation)`.
pub fn fallback_assessment(summary: &ValidationSummary, critical_issues: usize) -> (String, String) {
    let recommendation = if summary.contradicted > 0 || critical_issues > 2 {
        "REJECT - Multiple critical issues or contradicted claims"
    } else if summary.suspicious > 0 || critical_issues > 0 {
        "PROCEED_WITH_CAUTION - Some concerns require deeper investigation"
    } else {
        "PASS - Claims appear valid based on available evidence"
    };

    let assessment = format!(
        "Validation checked {} claims. {} were verified, {} were contradicted, and {} could not be verified with available evidence.",
        summary.total_claims_checked, summary.verified, summary.contradicted, summary.unverified
    );

    (assessment, recommendation.to_string())
}

/// Aggregates validation results into the final report with an overall
/// assessment and investment recommendation.
pub async fn generate_report(
    context: &PipelineContext,
    company_name: &str,
    results: Vec<ValidationResult>,
    analysis: Option<&DeckAnalysis>,
) -> ValidationReport {
    let summary = ValidationSummary::from_results(&results);
    let critical_issues: Vec<CriticalIssue> = results
        .iter()
        .filter(|r| r.is_critical_issue())
        .map(CriticalIssue::from)
        .collect();

    let assessment = query_json::<AssessmentReply>(
        context.llm(),
        build_assessment_prompt(&summary, &critical_issues, analysis),
        ASSESSMENT_PARAMS,
        "overall assessment",
        &context.cost,
    )
    .await;

    let (overall_assessment, investment_recommendation) = match assessment {
        Ok(reply) => (reply.overall_assessment, reply.investment_recommendation),
        Err(e) => {
            warn!(error = %format!("{:#}", e), "Assessment failed, using rule-based recommendation");
            fallback_assessment(&summary, critical_issues.len())
        }
    };

    info!(
        company = company_name,
        verified = summary.verified,
        contradicted = summary.contradicted,
        critical_issues = critical_issues.len(),
        "Validation report generated"
    );

    ValidationReport {
        company_name: company_name.to_string(),
        summary,
        critical_issues,
        validation_results: results,
        overall_assessment,
        investment_recommendation,
    }
}
