//! Web research over the saved plan, ending in a validation plan.
//!
//! A plan without research tasks is rejected before anything is searched.

use crate::llm::USD_PER_RESEARCH_TASK;
use crate::pipeline::artifacts::write_json;
use crate::pipeline::context::PipelineContext;
use crate::pipeline::phase_trait::WorkflowPhase;
use crate::pipeline::research::{create_validation_plan, execute_research_plan};
use crate::pipeline::state::PipelineState;
use crate::pipeline::types::DeckAnalysis;
use crate::progress::ProgressEvent;
use anyhow::{anyhow, bail, Result};
use async_trait::async_trait;
use tracing::info;

/// Runs the research tasks and derives the validation plan from what they found
pub struct ResearchPhase;

#[async_trait]
impl WorkflowPhase for ResearchPhase {
    fn name(&self) -> &'static str {
        "ResearchPhase"
    }

    fn confirmation(&self, state: &PipelineState) -> Option<String> {
        let tasks = state.research_plan.as_ref()?.research_tasks().count();
        if tasks == 0 {
            return None;
        }
        Some(format!(
            "{} research tasks, estimated cost ${:.2}. Proceed with research?",
            tasks,
            tasks as f64 * USD_PER_RESEARCH_TASK
        ))
    }

    async fn execute(&self, context: &PipelineContext, state: &mut PipelineState) -> Result<()> {
        let plan = state
            .research_plan
            .as_ref()
            .ok_or_else(|| anyhow!("A research plan is required before research"))?;
        if plan.research_tasks().next().is_none() {
            bail!("No research tasks found in plan");
        }

        let results = execute_research_plan(context, plan).await;
        let path = state.artifacts.research_results();
        write_json(&path, &results)?;
        context.emit(ProgressEvent::ArtifactWritten { path });

        let fallback;
        let analysis = match &state.analysis {
            Some(analysis) => analysis,
            None => {
                fallback = DeckAnalysis::minimal(plan.company_name.clone());
                &fallback
            }
        };

        let validation_plan = create_validation_plan(&plan.company_name, &results.results, analysis);
        info!(
            claims = validation_plan.total_tasks,
            red_flags = results.red_flags().len(),
            "Validation plan created"
        );

        let path = state.artifacts.validation_plan();
        write_json(&path, &validation_plan)?;
        context.emit(ProgressEvent::ArtifactWritten { path });

        state.research_results = Some(results);
        state.validation_plan = Some(validation_plan);
        Ok(())
    }
}
