//! Pipeline context for managing dependencies

use std::sync::Arc;

use crate::llm::{CostTracker, LLMClient};
use crate::progress::{NoOpHandler, ProgressEvent, ProgressHandler};
use crate::web::{PageScraper, WebSearch};

use super::config::PipelineConfig;

/// Context that owns all long-lived pipeline dependencies
pub struct PipelineContext {
    pub llm_client: Arc<dyn LLMClient>,

    pub search: Arc<dyn WebSearch>,

    pub scraper: Arc<dyn PageScraper>,

    /// Running spend estimate across every stage
    pub cost: CostTracker,

    pub progress: Arc<dyn ProgressHandler>,

    pub config: PipelineConfig,
}

impl PipelineContext {
    pub fn new(
        llm_client: Arc<dyn LLMClient>,
        search: Arc<dyn WebSearch>,
        scraper: Arc<dyn PageScraper>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            llm_client,
            search,
            scraper,
            cost: CostTracker::new(),
            progress: Arc::new(NoOpHandler),
            config,
        }
    }

    pub fn with_progress(mut self, progress: Arc<dyn ProgressHandler>) -> Self {
        self.progress = progress;
        self
    }

    pub fn llm(&self) -> &dyn LLMClient {
        self.llm_client.as_ref()
    }

    pub(crate) fn emit(&self, event: ProgressEvent) {
        self.progress.on_progress(&event);
    }
}
