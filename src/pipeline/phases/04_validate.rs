//! Claim validation. Empty validation plans are an error.

use crate::llm::USD_PER_VALIDATION;
use crate::pipeline::artifacts::write_json;
use crate::pipeline::context::PipelineContext;
use crate::pipeline::phase_trait::WorkflowPhase;
use crate::pipeline::state::PipelineState;
use crate::pipeline::validation::{execute_validation_plan, generate_report};
use crate::progress::ProgressEvent;
use anyhow::{anyhow, bail, Result};
use async_trait::async_trait;

/// Judges every claim against its evidence and writes the validation report
pub struct ValidatePhase;

#[async_trait]
impl WorkflowPhase for ValidatePhase {
    fn name(&self) -> &'static str {
        "ValidatePhase"
    }

    fn confirmation(&self, state: &PipelineState) -> Option<String> {
        let claims = state.validation_plan.as_ref()?.validation_tasks.len();
        if claims == 0 {
            return None;
        }
        Some(format!(
            "{} claims to validate, estimated cost ${:.2}. Proceed with validation?",
            claims,
            claims as f64 * USD_PER_VALIDATION
        ))
    }

    async fn execute(&self, context: &PipelineContext, state: &mut PipelineState) -> Result<()> {
        let plan = state
            .validation_plan
            .as_ref()
            .ok_or_else(|| anyhow!("A validation plan is required before validation"))?;
        if plan.validation_tasks.is_empty() {
            bail!("No validation tasks found in plan");
        }

        let results = execute_validation_plan(context, plan).await;
        let report = generate_report(
            context,
            &plan.company_name,
            results,
            state.analysis.as_ref(),
        )
        .await;

        let path = state.artifacts.validation_report();
        write_json(&path, &report)?;
        context.emit(ProgressEvent::ArtifactWritten { path });

        state.report = Some(report);
        Ok(())
    }
}
