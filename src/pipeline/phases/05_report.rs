//! Final markdown report

use crate::pipeline::artifacts::write_text;
use crate::pipeline::context::PipelineContext;
use crate::pipeline::phase_trait::WorkflowPhase;
use crate::pipeline::report::render_markdown;
use crate::pipeline::state::PipelineState;
use crate::progress::ProgressEvent;
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use chrono::Local;

/// Renders the validation report as the final markdown document
pub struct ReportPhase;

#[async_trait]
impl WorkflowPhase for ReportPhase {
    fn name(&self) -> &'static str {
        "ReportPhase"
    }

    async fn execute(&self, context: &PipelineContext, state: &mut PipelineState) -> Result<()> {
        let report = state
            .report
            .as_ref()
            .ok_or_else(|| anyhow!("Validation must finish before the final report"))?;

        let generated_at = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
        let markdown = render_markdown(report, state.analysis.as_ref(), &generated_at)
            .context("Failed to render final report")?;

        let path = state.artifacts.final_report();
        write_text(&path, &markdown)?;
        context.emit(ProgressEvent::ArtifactWritten { path: path.clone() });

        state.final_report = Some(path);
        Ok(())
    }
}
