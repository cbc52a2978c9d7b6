//! Deck analysis and research planning

use crate::pipeline::artifacts::write_json;
use crate::pipeline::context::PipelineContext;
use crate::pipeline::extraction::{analyze_deck, create_research_plan, identify_gaps};
use crate::pipeline::phase_trait::WorkflowPhase;
use crate::pipeline::state::PipelineState;
use crate::progress::ProgressEvent;
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use tracing::info;

/// Analyses the deck once, finds the gaps and writes the research plan
pub struct PlanPhase;

#[async_trait]
impl WorkflowPhase for PlanPhase {
    fn name(&self) -> &'static str {
        "PlanPhase"
    }

    async fn execute(&self, context: &PipelineContext, state: &mut PipelineState) -> Result<()> {
        let deck = state
            .deck
            .as_ref()
            .ok_or_else(|| anyhow!("Deck text must be extracted before planning"))?;

        let analysis = analyze_deck(context, &deck.text).await?;
        let path = state.artifacts.deck_analysis();
        write_json(&path, &analysis)?;
        context.emit(ProgressEvent::ArtifactWritten { path });

        let gaps = identify_gaps(context, &analysis).await;
        let plan = create_research_plan(&analysis, gaps, context.cost.total());

        info!(
            company = %plan.company_name,
            tasks = plan.tasks.len(),
            gaps = plan.critical_gaps.len(),
            "Research plan created"
        );

        let path = state.artifacts.research_plan();
        write_json(&path, &plan)?;
        context.emit(ProgressEvent::ArtifactWritten { path });

        state.analysis = Some(analysis);
        state.research_plan = Some(plan);
        Ok(())
    }
}
