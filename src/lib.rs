//! deckcheck - automated due diligence for startup pitch decks
//!
//! A deck goes through three stages, each leaving JSON artifacts behind so any
//! stage can be re-run on its own:
//!
//! 1. **Plan**: extract the deck text, have the model analyse it once and
//!    identify information gaps, then derive a deterministic research plan.
//! 2. **Research**: run each task as a web search, scrape the best hits and
//!    have the model summarise findings and red flags.
//! 3. **Validate**: judge every deck claim against the research evidence and
//!    produce a report with an investment recommendation.
//!
//! # Example
//!
//! ```no_run
//! use deckcheck::pipeline::{
//!     AutoConfirm, PipelineContext, PipelineOrchestrator, PipelineState, Workflow,
//! };
//! use deckcheck::web::{DuckDuckGoSearch, HttpScraper};
//! use deckcheck::DeckcheckConfig;
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let config = DeckcheckConfig::default();
//! let context = PipelineContext::new(
//!     config.create_llm_client()?,
//!     Arc::new(DuckDuckGoSearch::new()?),
//!     Arc::new(HttpScraper::new()?),
//!     config.pipeline_config(),
//! );
//!
//! let mut state = PipelineState::for_deck(Path::new("acme.pdf"), &config.output_dir);
//! PipelineOrchestrator::new(Box::new(AutoConfirm))
//!     .execute(Workflow::Full, &context, &mut state)
//!     .await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Project Structure
//!
//! - [`deck`]: text extraction from PDF, PPTX and plain text decks
//! - [`llm`]: model client trait, genai-backed client and a scripted mock
//! - [`web`]: search and scraping behind traits
//! - [`pipeline`]: stages, phases, artifacts and the orchestrator
//! - [`cli`]: the `deckcheck` command line

pub mod cli;
pub mod config;
pub mod deck;
pub mod llm;
pub mod pipeline;
pub mod progress;
pub mod util;
pub mod web;

pub use config::{ConfigError, DeckcheckConfig};
pub use deck::{extract_deck_text, DeckError, DeckText};
pub use llm::{BackendError, LLMClient};
pub use pipeline::{PipelineContext, PipelineOrchestrator, PipelineOutcome, Workflow};
pub use util::{init_default, init_from_env, init_logging, LoggingConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
