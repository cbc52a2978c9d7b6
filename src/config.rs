//! Configuration management for deckcheck
//!
//! Settings are read from environment variables (a `.env` file in the working
//! directory is loaded first by the binary) with sensible defaults, then CLI
//! flags override individual fields.
//!
//! # Environment Variables
//!
//! - `DECKCHECK_PROVIDER`: genai adapter (openai|anthropic|ollama|gemini|groq|xai) - default: "openai"
//! - `DECKCHECK_MODEL`: model name - default: "anthropic/claude-3.5-haiku"
//! - `DECKCHECK_API_BASE_URL`: OpenAI-compatible endpoint - default: OpenRouter.
//!   Set it to an empty string to use the provider's native endpoint.
//! - `DECKCHECK_API_KEY_ENV`: variable holding the key for the custom endpoint - default: "OPENROUTER_API_KEY"
//! - `DECKCHECK_REQUEST_TIMEOUT`: LLM timeout in seconds - default: "60"
//! - `DECKCHECK_OUTPUT_DIR`: artifact directory - default: "output"
//! - `DECKCHECK_SEARCH_MAX_RESULTS`: search hits per query - default: "5"
//! - `DECKCHECK_SCRAPE_TOP_N`: hits scraped per query - default: "3"
//! - `DECKCHECK_RESEARCH_CONCURRENCY`: research tasks in flight - default: "2"
//! - `DECKCHECK_SCRAPE_DELAY_MS`: pause between scrapes - default: "1000"
//! - `DECKCHECK_VALIDATION_DELAY_MS`: pause between claim validations - default: "500"
//! - `DECKCHECK_LOG_LEVEL`: logging level - default: "info"
//!
//! Without a custom endpoint the provider's own key variable applies
//! (`OPENAI_API_KEY`, `ANTHROPIC_API_KEY`, ...), as resolved by genai.

use crate::llm::{BackendError, GenAIClient, GenAISettings, LLMClient};
use crate::pipeline::PipelineConfig;
use genai::adapter::AdapterKind;
use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_MODEL: &str = "anthropic/claude-3.5-haiku";
pub const DEFAULT_API_BASE_URL: &str = "https://openrouter.ai/api/v1/";
pub const DEFAULT_API_KEY_ENV: &str = "OPENROUTER_API_KEY";
const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;
const DEFAULT_OUTPUT_DIR: &str = "output";
const DEFAULT_SEARCH_MAX_RESULTS: usize = 5;
const DEFAULT_SCRAPE_TOP_N: usize = 3;
const DEFAULT_RESEARCH_CONCURRENCY: usize = 2;
const DEFAULT_SCRAPE_DELAY_MS: u64 = 1000;
const DEFAULT_VALIDATION_DELAY_MS: u64 = 500;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("API key not set. Export {0} (or put it in a .env file)")]
    MissingApiKey(String),

    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),

    #[error("LLM client initialization failed: {0}")]
    BackendInitError(#[from] BackendError),
}

#[derive(Debug, Clone)]
pub struct DeckcheckConfig {
    /// genai adapter used to talk to the model
    pub provider: AdapterKind,

    pub model: String,

    /// Custom endpoint; `None` means the provider's native endpoint
    pub api_base_url: Option<String>,

    /// Variable holding the key for `api_base_url`
    pub api_key_env: String,

    pub request_timeout_secs: u64,

    /// Where intermediate JSON and the final report are written
    pub output_dir: PathBuf,

    pub search_max_results: usize,

    pub scrape_top_n: usize,

    pub research_concurrency: usize,

    pub scrape_delay_ms: u64,

    pub validation_delay_ms: u64,

    pub log_level: String,
}

fn env_parse<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<T>().ok())
        .unwrap_or(default)
}

impl Default for DeckcheckConfig {
    /// Loads from `DECKCHECK_*` environment variables with fallback defaults
    fn default() -> Self {
        let provider = env::var("DECKCHECK_PROVIDER")
            .ok()
            .and_then(|s| AdapterKind::from_lower_str(&s.to_lowercase()))
            .unwrap_or(AdapterKind::OpenAI);

        let model = env::var("DECKCHECK_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        let api_base_url = match env::var("DECKCHECK_API_BASE_URL") {
            Ok(url) if url.trim().is_empty() => None,
            Ok(url) => Some(url.trim().to_string()),
            Err(_) => Some(DEFAULT_API_BASE_URL.to_string()),
        };

        let api_key_env = env::var("DECKCHECK_API_KEY_ENV")
            .unwrap_or_else(|_| DEFAULT_API_KEY_ENV.to_string());

        let output_dir = env::var("DECKCHECK_OUTPUT_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_OUTPUT_DIR));

        let log_level = env::var("DECKCHECK_LOG_LEVEL")
            .unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string())
            .to_lowercase();

        Self {
            provider,
            model,
            api_base_url,
            api_key_env,
            request_timeout_secs: env_parse(
                "DECKCHECK_REQUEST_TIMEOUT",
                DEFAULT_REQUEST_TIMEOUT_SECS,
            ),
            output_dir,
            search_max_results: env_parse(
                "DECKCHECK_SEARCH_MAX_RESULTS",
                DEFAULT_SEARCH_MAX_RESULTS,
            ),
            scrape_top_n: env_parse("DECKCHECK_SCRAPE_TOP_N", DEFAULT_SCRAPE_TOP_N),
            research_concurrency: env_parse(
                "DECKCHECK_RESEARCH_CONCURRENCY",
                DEFAULT_RESEARCH_CONCURRENCY,
            ),
            scrape_delay_ms: env_parse("DECKCHECK_SCRAPE_DELAY_MS", DEFAULT_SCRAPE_DELAY_MS),
            validation_delay_ms: env_parse(
                "DECKCHECK_VALIDATION_DELAY_MS",
                DEFAULT_VALIDATION_DELAY_MS,
            ),
            log_level,
        }
    }
}

impl DeckcheckConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::ValidationFailed(
                "Request timeout must be at least 1 second".to_string(),
            ));
        }
        if self.request_timeout_secs > 600 {
            return Err(ConfigError::ValidationFailed(
                "Request timeout cannot exceed 10 minutes".to_string(),
            ));
        }

        if !(1..=10).contains(&self.search_max_results) {
            return Err(ConfigError::ValidationFailed(format!(
                "Search results per query must be between 1 and 10, got {}",
                self.search_max_results
            )));
        }
        if self.scrape_top_n > self.search_max_results {
            return Err(ConfigError::ValidationFailed(format!(
                "Cannot scrape {} pages from {} search results",
                self.scrape_top_n, self.search_max_results
            )));
        }

        if !(1..=8).contains(&self.research_concurrency) {
            return Err(ConfigError::ValidationFailed(format!(
                "Research concurrency must be between 1 and 8, got {}",
                self.research_concurrency
            )));
        }

        match self.log_level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(ConfigError::ValidationFailed(format!(
                    "Invalid log level: {}. Valid options: trace, debug, info, warn, error",
                    self.log_level
                )))
            }
        }

        Ok(())
    }

    /// Name of the variable the API key is read from, if the provider needs one
    pub fn api_key_var(&self) -> Option<String> {
        if self.api_base_url.is_some() {
            Some(self.api_key_env.clone())
        } else {
            self.provider.default_key_env_name().map(str::to_string)
        }
    }

    /// Reads the API key; `Ok(None)` when the provider needs none
    pub fn api_key(&self) -> Result<Option<String>, ConfigError> {
        match self.api_key_var() {
            Some(var) => match env::var(&var) {
                Ok(value) if !value.trim().is_empty() => Ok(Some(value)),
                _ => Err(ConfigError::MissingApiKey(var)),
            },
            None => Ok(None),
        }
    }

    pub fn check_credentials(&self) -> Result<(), ConfigError> {
        self.api_key().map(|_| ())
    }

    pub fn create_llm_client(&self) -> Result<Arc<dyn LLMClient>, ConfigError> {
        self.check_credentials()?;

        let client = GenAIClient::new(GenAISettings {
            provider: self.provider,
            model: self.model.clone(),
            base_url: self.api_base_url.clone(),
            api_key_env: self.api_key_env.clone(),
            timeout: Duration::from_secs(self.request_timeout_secs),
        })?;

        Ok(Arc::new(client))
    }

    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig::new()
            .with_search_max_results(self.search_max_results)
            .with_scrape_top_n(self.scrape_top_n)
            .with_research_concurrency(self.research_concurrency)
            .with_scrape_delay(Duration::from_millis(self.scrape_delay_ms))
            .with_validation_delay(Duration::from_millis(self.validation_delay_ms))
    }
}

impl fmt::Display for DeckcheckConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Deckcheck Configuration:")?;
        writeln!(f, "  Provider: {}", self.provider.as_str())?;
        writeln!(f, "  Model: {}", self.model)?;
        writeln!(
            f,
            "  Endpoint: {}",
            self.api_base_url.as_deref().unwrap_or("provider default")
        )?;
        writeln!(f, "  Request Timeout: {}s", self.request_timeout_secs)?;
        writeln!(f, "  Output Dir: {}", self.output_dir.display())?;
        writeln!(
            f,
            "  Search: {} results, scrape top {}",
            self.search_max_results, self.scrape_top_n
        )?;
        writeln!(f, "  Research Concurrency: {}", self.research_concurrency)?;
        writeln!(f, "  Log Level: {}", self.log_level)?;
        Ok(())
    }
}
