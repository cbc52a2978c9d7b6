//! Command handlers: build the context from config and flags, run the
//! selected workflow and print the summary. Each returns the process exit code.

use anyhow::{Context, Result};
use std::env;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::{debug, error, info};

use super::commands::{CommonArgs, DeckArgs, PlanFileArgs};
use super::output::{OutputFormatter, RunSummary};
use crate::config::DeckcheckConfig;
use crate::pipeline::{
    AutoConfirm, Confirm, InteractiveConfirm, PipelineContext, PipelineOrchestrator,
    PipelineOutcome, PipelineState, Workflow,
};
use crate::progress::{LoggingHandler, ProgressEvent, ProgressHandler};
use crate::web::{DuckDuckGoSearch, HttpScraper};

/// Logs every event and remembers which files were written
#[derive(Default)]
struct CliProgress {
    logging: LoggingHandler,
    written: Mutex<Vec<PathBuf>>,
}

impl CliProgress {
    fn written(&self) -> Vec<PathBuf> {
        self.written.lock().map(|w| w.clone()).unwrap_or_default()
    }
}

impl ProgressHandler for CliProgress {
    fn on_progress(&self, event: &ProgressEvent) {
        self.logging.on_progress(event);
        if let ProgressEvent::ArtifactWritten { path } = event {
            if let Ok(mut written) = self.written.lock() {
                written.push(path.clone());
            }
        }
    }
}

/// Environment config with the command-line overrides applied
pub fn resolve_config(common: &CommonArgs, output_dir: Option<&Path>) -> DeckcheckConfig {
    let defaults = DeckcheckConfig::default();

    // An explicit provider talks to its own endpoint unless one was configured
    let api_base_url = if common.provider.is_some() && env::var("DECKCHECK_API_BASE_URL").is_err()
    {
        None
    } else {
        defaults.api_base_url.clone()
    };

    let config = DeckcheckConfig {
        provider: common.provider.unwrap_or(defaults.provider),
        model: common.model.clone().unwrap_or_else(|| defaults.model.clone()),
        api_base_url,
        request_timeout_secs: common.timeout.unwrap_or(defaults.request_timeout_secs),
        output_dir: output_dir
            .map(Path::to_path_buf)
            .unwrap_or_else(|| defaults.output_dir.clone()),
        ..defaults
    };

    if common.provider.is_some() {
        debug!("Provider explicitly set to: {:?}", config.provider);
    }
    if common.model.is_some() {
        debug!("Model overridden to: {}", config.model);
    }
    config
}

async fn run_workflow(
    workflow: Workflow,
    input: &Path,
    common: &CommonArgs,
    output_dir: Option<&Path>,
) -> Result<RunSummary> {
    if !input.is_file() {
        anyhow::bail!("Input file does not exist: {}", input.display());
    }

    let config = resolve_config(common, output_dir);
    config.validate()?;
    debug!("{}", config);

    let mut state = match workflow {
        Workflow::Full | Workflow::Plan => PipelineState::for_deck(input, &config.output_dir),
        Workflow::Research => PipelineState::from_research_plan(input)?,
        Workflow::Validate => PipelineState::from_validation_plan(input)?,
    };

    let llm = config.create_llm_client()?;
    info!(model = %config.model, provider = config.provider.as_str(), "LLM client ready");

    let progress = Arc::new(CliProgress::default());
    let context = PipelineContext::new(
        llm,
        Arc::new(DuckDuckGoSearch::new().context("Failed to create search client")?),
        Arc::new(HttpScraper::new().context("Failed to create scraper")?),
        config.pipeline_config(),
    )
    .with_progress(progress.clone());

    let confirm: Box<dyn Confirm> = if common.yes {
        Box::new(AutoConfirm)
    } else {
        Box::new(InteractiveConfirm)
    };

    let outcome = PipelineOrchestrator::new(confirm)
        .execute(workflow, &context, &mut state)
        .await?;

    if let PipelineOutcome::Cancelled { phase } = &outcome {
        info!("Run cancelled before {}", phase);
    }

    Ok(RunSummary::from_state(
        &state,
        &outcome,
        context.cost.total(),
        progress.written(),
    ))
}

async fn handle(
    workflow: Workflow,
    input: &Path,
    common: &CommonArgs,
    output_dir: Option<&Path>,
    quiet: bool,
) -> i32 {
    let summary = match run_workflow(workflow, input, common, output_dir).await {
        Ok(summary) => summary,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            return 1;
        }
    };

    if quiet {
        return 0;
    }

    match OutputFormatter::new(common.format.into()).format(&summary) {
        Ok(text) => {
            println!("{}", text);
            0
        }
        Err(e) => {
            error!("Failed to format summary: {:#}", e);
            1
        }
    }
}

pub async fn handle_run(args: &DeckArgs, quiet: bool) -> i32 {
    handle(
        Workflow::Full,
        &args.deck,
        &args.common,
        args.output_dir.as_deref(),
        quiet,
    )
    .await
}

pub async fn handle_plan(args: &DeckArgs, quiet: bool) -> i32 {
    handle(
        Workflow::Plan,
        &args.deck,
        &args.common,
        args.output_dir.as_deref(),
        quiet,
    )
    .await
}

pub async fn handle_research(args: &PlanFileArgs, quiet: bool) -> i32 {
    handle(Workflow::Research, &args.plan, &args.common, None, quiet).await
}

pub async fn handle_validate(args: &PlanFileArgs, quiet: bool) -> i32 {
    handle(Workflow::Validate, &args.plan, &args.common, None, quiet).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::super::commands::OutputFormatArg;
    use genai::adapter::AdapterKind;
    use serial_test::serial;

    fn without_base_url<F: FnOnce()>(f: F) {
        let saved = env::var("DECKCHECK_API_BASE_URL").ok();
        env::remove_var("DECKCHECK_API_BASE_URL");
        f();
        if let Some(value) = saved {
            env::set_var("DECKCHECK_API_BASE_URL", value);
        }
    }

    fn common() -> CommonArgs {
        CommonArgs {
            provider: None,
            model: None,
            timeout: None,
            yes: true,
            format: OutputFormatArg::Human,
        }
    }

    #[test]
    #[serial]
    fn test_resolve_config_applies_overrides() {
        without_base_url(|| {
            let args = CommonArgs {
                model: Some("gpt-4o-mini".to_string()),
                timeout: Some(90),
                ..common()
            };

            let config = resolve_config(&args, Some(Path::new("reports")));
            assert_eq!(config.model, "gpt-4o-mini");
            assert_eq!(config.request_timeout_secs, 90);
            assert_eq!(config.output_dir, PathBuf::from("reports"));
            assert!(config.api_base_url.is_some());
        });
    }

    #[test]
    #[serial]
    fn test_explicit_provider_uses_native_endpoint() {
        without_base_url(|| {
            let args = CommonArgs {
                provider: Some(AdapterKind::Anthropic),
                ..common()
            };

            let config = resolve_config(&args, None);
            assert_eq!(config.provider, AdapterKind::Anthropic);
            assert!(config.api_base_url.is_none());
            assert_eq!(config.api_key_var().as_deref(), Some("ANTHROPIC_API_KEY"));
        });
    }

    #[test]
    fn test_progress_records_artifacts() {
        let progress = CliProgress::default();
        progress.on_progress(&ProgressEvent::ArtifactWritten {
            path: PathBuf::from("out/acme_research_plan.json"),
        });
        progress.on_progress(&ProgressEvent::StageStarted {
            stage: "PlanPhase".to_string(),
        });
        assert_eq!(progress.written(), vec![PathBuf::from("out/acme_research_plan.json")]);
    }

    #[tokio::test]
    async fn test_missing_input_fails() {
        let code = handle(
            Workflow::Plan,
            Path::new("/definitely/not/here.pdf"),
            &common(),
            None,
            true,
        )
        .await;
        assert_eq!(code, 1);
    }
}
