use super::context::PipelineContext;
use super::state::PipelineState;
use anyhow::Result;
use async_trait::async_trait;

#[async_trait]
pub trait WorkflowPhase: Send + Sync {
    fn name(&self) -> &'static str;

    /// Question to put to the user before the phase spends money.
    /// `None` runs the phase without asking.
    fn confirmation(&self, _state: &PipelineState) -> Option<String> {
        None
    }

    async fn execute(&self, context: &PipelineContext, state: &mut PipelineState) -> Result<()>;
}
