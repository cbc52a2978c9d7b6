//! The three-stage due diligence pipeline: plan, research, validate

pub mod artifacts;
pub mod config;
pub mod confirm;
pub mod context;
pub mod extraction;
pub mod orchestrator;
pub mod phase_trait;
pub mod phases;
pub mod report;
pub mod research;
pub mod state;
pub mod types;
pub mod validation;

pub use artifacts::ArtifactPaths;
pub use config::PipelineConfig;
pub use confirm::{AutoConfirm, Confirm, InteractiveConfirm};
pub use context::PipelineContext;
pub use orchestrator::{PipelineOrchestrator, PipelineOutcome, Workflow};
pub use phase_trait::WorkflowPhase;
pub use state::PipelineState;
pub use types::{
    DeckAnalysis, Recommendation, ResearchPlan, ResearchResults, ValidationPlan, ValidationReport,
};
