//! LLM client abstraction layer
//!
//! A trait-based seam over the language model service so the pipeline can run
//! against a real provider (through `genai`) or a scripted mock.

mod client;
pub mod cost;
mod error;
mod genai;
pub mod json;
mod mock;
mod query;
mod types;

pub use client::LLMClient;
pub use cost::{CostTracker, USD_PER_RESEARCH_TASK, USD_PER_VALIDATION};
pub use error::BackendError;
pub use self::genai::{GenAIClient, GenAISettings};
pub use mock::{MockLLMClient, MockResponse};
pub use query::{query_json, QueryParams};
pub use types::{ChatMessage, LLMRequest, LLMResponse, MessageRole};
