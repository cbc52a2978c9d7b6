//! Workflow phases, in the order a full run executes them

#[path = "01_extract.rs"]
pub mod extract;
#[path = "02_plan.rs"]
pub mod plan;
#[path = "03_research.rs"]
pub mod research;
#[path = "04_validate.rs"]
pub mod validate;
#[path = "05_report.rs"]
pub mod report;

pub use extract::ExtractPhase;
pub use plan::PlanPhase;
pub use report::ReportPhase;
pub use research::ResearchPhase;
pub use validate::ValidatePhase;
