use super::client::LLMClient;
use super::cost::CostTracker;
use super::json::{extract_json, parse_lenient};
use super::types::LLMRequest;
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use std::time::Instant;
use tracing::debug;

/// Sampling parameters for one structured query
#[derive(Debug, Clone, Copy)]
pub struct QueryParams {
    pub temperature: f32,
    pub max_tokens: u32,
}

impl QueryParams {
    pub const fn new(temperature: f32, max_tokens: u32) -> Self {
        Self {
            temperature,
            max_tokens,
        }
    }
}

/// Sends `prompt` as a single user message and parses the reply as JSON.
///
/// The call is charged to `cost` whether or not parsing succeeds.
pub async fn query_json<T: DeserializeOwned>(
    llm_client: &dyn LLMClient,
    prompt: String,
    params: QueryParams,
    purpose: &str,
    cost: &CostTracker,
) -> Result<T> {
    let start = Instant::now();

    let request = LLMRequest::prompt(prompt)
        .with_temperature(params.temperature)
        .with_max_tokens(params.max_tokens);
    let prompt_chars = request.prompt_chars();

    let response = llm_client
        .chat(request)
        .await
        .with_context(|| format!("Failed to call LLM for {}", purpose))?;

    cost.record_call(prompt_chars, params.max_tokens);

    debug!(
        purpose,
        latency_ms = start.elapsed().as_millis() as u64,
        response_chars = response.content.len(),
        "LLM query complete"
    );

    parse_lenient(&response.content).with_context(|| {
        format!(
            "Failed to parse {} response: {}",
            purpose,
            extract_json(&response.content)
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{BackendError, MockLLMClient, MockResponse};
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Verdict {
        status: String,
    }

    #[tokio::test]
    async fn test_query_json_parses_fenced_reply() {
        let client = MockLLMClient::new();
        client.add_response(MockResponse::text("```json\n{\"status\": \"verified\"}\n```"));
        let cost = CostTracker::new();

        let verdict: Verdict = query_json(
            &client,
            "check".to_string(),
            QueryParams::new(0.1, 1000),
            "validation",
            &cost,
        )
        .await
        .unwrap();

        assert_eq!(verdict.status, "verified");
        assert!(cost.total() > 0.0);
    }

    #[tokio::test]
    async fn test_query_json_backend_error_not_charged() {
        let client = MockLLMClient::new();
        client.add_response(MockResponse::error(BackendError::NetworkError {
            message: "connection reset".to_string(),
        }));
        let cost = CostTracker::new();

        let result: Result<Verdict> = query_json(
            &client,
            "check".to_string(),
            QueryParams::new(0.1, 1000),
            "validation",
            &cost,
        )
        .await;

        let err = result.unwrap_err();
        assert!(err.to_string().contains("validation"));
        assert_eq!(cost.total(), 0.0);
    }

    #[tokio::test]
    async fn test_query_json_parse_failure_mentions_purpose() {
        let client = MockLLMClient::new();
        client.add_response(MockResponse::text("I cannot help with that."));
        let cost = CostTracker::new();

        let result: Result<Verdict> = query_json(
            &client,
            "check".to_string(),
            QueryParams::new(0.1, 1000),
            "gap analysis",
            &cost,
        )
        .await;

        assert!(result.unwrap_err().to_string().contains("gap analysis"));
    }
}
