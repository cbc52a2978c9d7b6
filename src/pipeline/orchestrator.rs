//! Runs a workflow's phases in order, asking for confirmation where a phase
//! carries a cost and stopping at the first failure.

use super::confirm::Confirm;
use super::context::PipelineContext;
use super::phase_trait::WorkflowPhase;
use super::phases::{ExtractPhase, PlanPhase, ReportPhase, ResearchPhase, ValidatePhase};
use super::state::PipelineState;
use crate::progress::ProgressEvent;
use anyhow::{Context, Result};
use std::time::Instant;
use tracing::{debug, info};

/// Which slice of the pipeline a run covers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Workflow {
    /// Deck to final report
    Full,
    /// Deck to research plan
    Plan,
    /// Saved research plan to validation plan
    Research,
    /// Saved validation plan to final report
    Validate,
}

impl Workflow {
    pub fn phases(&self) -> Vec<Box<dyn WorkflowPhase>> {
        match self {
            Workflow::Full => vec![
                Box::new(ExtractPhase),
                Box::new(PlanPhase),
                Box::new(ResearchPhase),
                Box::new(ValidatePhase),
                Box::new(ReportPhase),
            ],
            Workflow::Plan => vec![Box::new(ExtractPhase), Box::new(PlanPhase)],
            Workflow::Research => vec![Box::new(ResearchPhase)],
            Workflow::Validate => vec![Box::new(ValidatePhase), Box::new(ReportPhase)],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineOutcome {
    Completed,
    /// The user declined before the named phase
    Cancelled { phase: String },
}

pub struct PipelineOrchestrator {
    confirm: Box<dyn Confirm>,
}

impl PipelineOrchestrator {
    pub fn new(confirm: Box<dyn Confirm>) -> Self {
        Self { confirm }
    }

    pub async fn execute(
        &self,
        workflow: Workflow,
        context: &PipelineContext,
        state: &mut PipelineState,
    ) -> Result<PipelineOutcome> {
        let start = Instant::now();
        info!(input = %state.input.display(), ?workflow, "Starting pipeline");

        context.emit(ProgressEvent::Started {
            input: state.input.display().to_string(),
        });

        for phase in workflow.phases() {
            let phase_name = phase.name();

            if let Some(prompt) = phase.confirmation(state) {
                if !self.confirm.confirm(&prompt)? {
                    info!("Cancelled by user before {}", phase_name);
                    context.emit(ProgressEvent::Cancelled {
                        stage: phase_name.to_string(),
                    });
                    return Ok(PipelineOutcome::Cancelled {
                        phase: phase_name.to_string(),
                    });
                }
            }

            context.emit(ProgressEvent::StageStarted {
                stage: phase_name.to_string(),
            });

            let phase_start = Instant::now();
            if let Err(e) = phase
                .execute(context, state)
                .await
                .with_context(|| format!("Phase {} failed", phase_name))
            {
                context.emit(ProgressEvent::Failed {
                    error: format!("{:#}", e),
                });
                return Err(e);
            }

            context.emit(ProgressEvent::StageComplete {
                stage: phase_name.to_string(),
                duration: phase_start.elapsed(),
            });

            debug!("Phase {} complete", phase_name);
        }

        info!(
            company = state.company_name(),
            cost = context.cost.total(),
            "Pipeline complete"
        );
        context.emit(ProgressEvent::Completed {
            total_cost: context.cost.total(),
            total_time: start.elapsed(),
        });

        Ok(PipelineOutcome::Completed)
    }
}
