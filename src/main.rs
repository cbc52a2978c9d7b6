use deckcheck::cli::commands::{CliArgs, Commands};
use deckcheck::cli::handlers::{handle_plan, handle_research, handle_run, handle_validate};
use deckcheck::util::logging::{init_logging, json_from_env, parse_level, LoggingConfig};
use deckcheck::VERSION;

use clap::Parser;
use std::env;
use tracing::{debug, Level};

#[tokio::main]
async fn main() {
    // A missing .env is normal; variables may come from the shell
    let dotenv = dotenvy::dotenv();

    let args = CliArgs::parse();
    init_logging_from_args(&args);

    debug!("deckcheck v{} starting", VERSION);
    if let Ok(path) = dotenv {
        debug!("Loaded environment from {}", path.display());
    }
    debug!("Arguments: {:?}", args);

    let exit_code = match &args.command {
        Commands::Run(run_args) => handle_run(run_args, args.quiet).await,
        Commands::Plan(plan_args) => handle_plan(plan_args, args.quiet).await,
        Commands::Research(research_args) => handle_research(research_args, args.quiet).await,
        Commands::Validate(validate_args) => handle_validate(validate_args, args.quiet).await,
    };

    std::process::exit(exit_code);
}

fn init_logging_from_args(args: &CliArgs) {
    let level = if let Some(level_str) = &args.log_level {
        parse_level(level_str)
    } else if args.verbose {
        Level::DEBUG
    } else if args.quiet {
        Level::ERROR
    } else {
        let level_str = env::var("DECKCHECK_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
        parse_level(&level_str)
    };

    init_logging(LoggingConfig::with_level(level).json(json_from_env()));
}
