use std::time::Duration;

/// Limits and pacing for the research and validation stages
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub search_max_results: usize,
    pub scrape_top_n: usize,
    pub research_concurrency: usize,
    pub scrape_delay: Duration,
    pub validation_delay: Duration,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            search_max_results: 5,
            scrape_top_n: 3,
            research_concurrency: 2,
            scrape_delay: Duration::from_millis(1000),
            validation_delay: Duration::from_millis(500),
        }
    }
}

impl PipelineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search_max_results(mut self, search_max_results: usize) -> Self {
        self.search_max_results = search_max_results;
        self
    }

    pub fn with_scrape_top_n(mut self, scrape_top_n: usize) -> Self {
        self.scrape_top_n = scrape_top_n;
        self
    }

    pub fn with_research_concurrency(mut self, research_concurrency: usize) -> Self {
        self.research_concurrency = research_concurrency.max(1);
        self
    }

    pub fn with_scrape_delay(mut self, scrape_delay: Duration) -> Self {
        self.scrape_delay = scrape_delay;
        self
    }

    pub fn with_validation_delay(mut self, validation_delay: Duration) -> Self {
        self.validation_delay = validation_delay;
        self
    }

    /// No pauses and one task at a time, for tests against mocks
    pub fn immediate() -> Self {
        Self::default()
            .with_research_concurrency(1)
            .with_scrape_delay(Duration::ZERO)
            .with_validation_delay(Duration::ZERO)
    }
}
