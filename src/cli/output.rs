//! Output formatting for run summaries
//!
//! Summaries go to stdout in JSON, YAML or a human-readable layout; logs stay
//! on stderr.

use anyhow::{Context, Result};
use serde::Serialize;
use std::fmt::Write;
use std::path::PathBuf;

use crate::pipeline::types::ValidationSummary;
use crate::pipeline::{PipelineOutcome, PipelineState, Recommendation};

/// Red flags and findings shown in the research section
const SUMMARY_ITEMS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// JSON format (machine-readable)
    Json,
    /// YAML format
    Yaml,
    /// Human-readable formatted text
    Human,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlanSummary {
    pub tasks: usize,
    pub critical_gaps: Vec<String>,
    pub estimated_cost_usd: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResearchSummary {
    pub tasks_executed: usize,
    pub red_flags: Vec<String>,
    pub high_confidence_findings: Vec<String>,
    pub claims_to_validate: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ValidationOverview {
    #[serde(flatten)]
    pub counts: ValidationSummary,
    pub critical_issues: usize,
    pub recommendation: Recommendation,
    pub investment_recommendation: String,
}

/// What a single CLI invocation did
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub company_name: String,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancelled_before: Option<String>,
    pub total_cost_usd: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan: Option<PlanSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub research: Option<ResearchSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation: Option<ValidationOverview>,
    pub artifacts: Vec<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_report: Option<PathBuf>,
}

impl RunSummary {
    pub fn from_state(
        state: &PipelineState,
        outcome: &PipelineOutcome,
        total_cost_usd: f64,
        artifacts: Vec<PathBuf>,
    ) -> Self {
        let (status, cancelled_before) = match outcome {
            PipelineOutcome::Completed => ("completed", None),
            PipelineOutcome::Cancelled { phase } => ("cancelled", Some(phase.clone())),
        };

        let plan = state.research_plan.as_ref().map(|plan| PlanSummary {
            tasks: plan.tasks.len(),
            critical_gaps: plan.critical_gaps.clone(),
            estimated_cost_usd: plan.estimated_cost_usd,
        });

        let research = state.research_results.as_ref().map(|results| ResearchSummary {
            tasks_executed: results.tasks_executed,
            red_flags: results.red_flags().into_iter().map(String::from).collect(),
            high_confidence_findings: results
                .high_confidence_findings()
                .into_iter()
                .map(String::from)
                .collect(),
            claims_to_validate: state
                .validation_plan
                .as_ref()
                .map(|p| p.total_tasks)
                .unwrap_or(0),
        });

        let validation = state.report.as_ref().map(|report| ValidationOverview {
            counts: report.summary.clone(),
            critical_issues: report.critical_issues.len(),
            recommendation: report.recommendation(),
            investment_recommendation: report.investment_recommendation.clone(),
        });

        Self {
            company_name: state.company_name().to_string(),
            status,
            cancelled_before,
            total_cost_usd,
            plan,
            research,
            validation,
            artifacts,
            final_report: state.final_report.clone(),
        }
    }
}

fn recommendation_light(recommendation: Recommendation) -> &'static str {
    match recommendation {
        Recommendation::Pass => "🟢",
        Recommendation::ProceedWithCaution => "🟡",
        Recommendation::Reject => "🔴",
    }
}

pub struct OutputFormatter {
    format: OutputFormat,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn format(&self, summary: &RunSummary) -> Result<String> {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(summary)
                .context("Failed to serialize run summary to JSON"),
            OutputFormat::Yaml => {
                serde_yaml::to_string(summary).context("Failed to serialize run summary to YAML")
            }
            OutputFormat::Human => Ok(self.format_human(summary)),
        }
    }

    fn format_human(&self, summary: &RunSummary) -> String {
        let mut out = String::new();

        let _ = writeln!(out, "Company: {}", summary.company_name);
        match &summary.cancelled_before {
            Some(phase) => {
                let _ = writeln!(out, "Status: cancelled before {}", phase);
            }
            None => {
                let _ = writeln!(out, "Status: {}", summary.status);
            }
        }
        let _ = writeln!(out, "Estimated cost: ${:.2}", summary.total_cost_usd);

        if let Some(plan) = &summary.plan {
            let _ = writeln!(out, "\nResearch plan: {} tasks", plan.tasks);
            if !plan.critical_gaps.is_empty() {
                out.push_str("Critical gaps:\n");
                for gap in &plan.critical_gaps {
                    let _ = writeln!(out, "  - {}", gap);
                }
            }
        }

        if let Some(research) = &summary.research {
            let _ = writeln!(
                out,
                "\nResearch: {} tasks executed, {} claims to validate",
                research.tasks_executed, research.claims_to_validate
            );
            if !research.red_flags.is_empty() {
                let _ = writeln!(out, "🚩 Red flags ({}):", research.red_flags.len());
                for flag in research.red_flags.iter().take(SUMMARY_ITEMS) {
                    let _ = writeln!(out, "  - {}", flag);
                }
            }
            if !research.high_confidence_findings.is_empty() {
                out.push_str("✅ High-confidence findings:\n");
                for finding in research.high_confidence_findings.iter().take(SUMMARY_ITEMS) {
                    let _ = writeln!(out, "  - {}", finding);
                }
            }
        }

        if let Some(validation) = &summary.validation {
            let counts = &validation.counts;
            let _ = writeln!(
                out,
                "\nValidation: {} claims, {} verified, {} contradicted, {} suspicious, {} unverified",
                counts.total_claims_checked,
                counts.verified,
                counts.contradicted,
                counts.suspicious,
                counts.unverified
            );
            let _ = writeln!(out, "Critical issues: {}", validation.critical_issues);
            let _ = writeln!(
                out,
                "Recommendation: {} {}",
                recommendation_light(validation.recommendation),
                validation.investment_recommendation
            );
        }

        if !summary.artifacts.is_empty() {
            out.push_str("\nFiles written:\n");
            for path in &summary.artifacts {
                let _ = writeln!(out, "  {}", path.display());
            }
        }

        if let Some(report) = &summary.final_report {
            let _ = writeln!(out, "\nFinal report: {}", report.display());
        }

        out
    }
}
