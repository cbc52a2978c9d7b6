//! Mutable state threaded through the workflow phases

use super::artifacts::{
    read_json, ArtifactPaths, RESEARCH_PLAN_SUFFIX, VALIDATION_PLAN_SUFFIX,
};
use super::types::{
    DeckAnalysis, ResearchPlan, ResearchResults, ValidationPlan, ValidationReport,
};
use crate::deck::DeckText;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Everything produced so far for one deck. Each phase reads what earlier
/// phases left here and fills in its own slot.
#[derive(Debug, Clone)]
pub struct PipelineState {
    pub input: PathBuf,
    pub artifacts: ArtifactPaths,
    pub deck: Option<DeckText>,
    pub analysis: Option<DeckAnalysis>,
    pub research_plan: Option<ResearchPlan>,
    pub research_results: Option<ResearchResults>,
    pub validation_plan: Option<ValidationPlan>,
    pub report: Option<ValidationReport>,
    pub final_report: Option<PathBuf>,
}

impl PipelineState {
    fn empty(input: PathBuf, artifacts: ArtifactPaths) -> Self {
        Self {
            input,
            artifacts,
            deck: None,
            analysis: None,
            research_plan: None,
            research_results: None,
            validation_plan: None,
            report: None,
            final_report: None,
        }
    }

    /// Fresh state for a deck; artifacts go to `output_dir`
    pub fn for_deck(deck_path: &Path, output_dir: &Path) -> Self {
        Self::empty(
            deck_path.to_path_buf(),
            ArtifactPaths::from_deck(deck_path, output_dir),
        )
    }

    /// Resumes from a saved research plan. The deck analysis saved beside it
    /// is picked up when present, otherwise a minimal one is derived from the
    /// plan's company name.
    pub fn from_research_plan(plan_path: &Path) -> Result<Self> {
        let plan: ResearchPlan = read_json(plan_path).context("Failed to load research plan")?;
        let artifacts = ArtifactPaths::from_plan_file(plan_path, RESEARCH_PLAN_SUFFIX);

        let analysis = match load_analysis(&artifacts)? {
            Some(analysis) => analysis,
            None => {
                info!(
                    company = %plan.company_name,
                    "No saved deck analysis found, using company name only"
                );
                DeckAnalysis::minimal(plan.company_name.clone())
            }
        };

        let mut state = Self::empty(plan_path.to_path_buf(), artifacts);
        state.analysis = Some(analysis);
        state.research_plan = Some(plan);
        Ok(state)
    }

    /// Resumes from a saved validation plan; the deck analysis is optional
    pub fn from_validation_plan(plan_path: &Path) -> Result<Self> {
        let plan: ValidationPlan =
            read_json(plan_path).context("Failed to load validation plan")?;
        let artifacts = ArtifactPaths::from_plan_file(plan_path, VALIDATION_PLAN_SUFFIX);
        let analysis = load_analysis(&artifacts)?;

        let mut state = Self::empty(plan_path.to_path_buf(), artifacts);
        state.analysis = analysis;
        state.validation_plan = Some(plan);
        Ok(state)
    }

    pub fn company_name(&self) -> &str {
        if let Some(plan) = &self.research_plan {
            return &plan.company_name;
        }
        if let Some(plan) = &self.validation_plan {
            return &plan.company_name;
        }
        self.analysis
            .as_ref()
            .map(DeckAnalysis::company)
            .unwrap_or("Unknown")
    }
}

fn load_analysis(artifacts: &ArtifactPaths) -> Result<Option<DeckAnalysis>> {
    let path = artifacts.deck_analysis();
    if !path.exists() {
        return Ok(None);
    }
    debug!(path = %path.display(), "Loading saved deck analysis");
    read_json(&path).map(Some)
}
