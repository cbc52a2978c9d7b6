//! Deck text extraction

use crate::deck::extract_deck_text;
use crate::pipeline::artifacts::write_text;
use crate::pipeline::context::PipelineContext;
use crate::pipeline::phase_trait::WorkflowPhase;
use crate::pipeline::state::PipelineState;
use crate::progress::ProgressEvent;
use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::info;

/// Pulls the raw text out of the deck file and saves a copy of it
pub struct ExtractPhase;

#[async_trait]
impl WorkflowPhase for ExtractPhase {
    fn name(&self) -> &'static str {
        "ExtractPhase"
    }

    async fn execute(&self, context: &PipelineContext, state: &mut PipelineState) -> Result<()> {
        let input = state.input.clone();
        let deck = tokio::task::spawn_blocking(move || extract_deck_text(&input))
            .await
            .context("Deck extraction task panicked")?
            .with_context(|| format!("Failed to extract text from {}", state.input.display()))?;

        info!(
            format = deck.format.as_str(),
            chars = deck.char_count(),
            "Extracted deck text"
        );

        let path = state.artifacts.extracted_text();
        write_text(&path, &deck.text)?;
        context.emit(ProgressEvent::ArtifactWritten { path });

        state.deck = Some(deck);
        Ok(())
    }
}
