use clap::{Args, Parser, Subcommand, ValueEnum};
use genai::adapter::AdapterKind;
use std::path::PathBuf;

/// Automated due diligence for startup pitch decks
#[derive(Parser, Debug)]
#[command(
    name = "deckcheck",
    about = "Automated due diligence for startup pitch decks",
    version,
    author,
    long_about = "deckcheck reads a pitch deck, plans web research around the gaps in it, \
                  runs that research and validates every claim against the evidence. \
                  The result is a markdown due diligence report with an investment \
                  recommendation."
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, value_name = "LEVEL", help = "Set logging level")]
    pub log_level: Option<String>,

    #[arg(short = 'v', long, global = true, help = "Verbose logging")]
    pub verbose: bool,

    #[arg(
        short = 'q',
        long,
        global = true,
        conflicts_with = "verbose",
        help = "Quiet mode - suppress non-error output"
    )]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(
        about = "Run the whole pipeline on a deck",
        long_about = "Extracts the deck, plans and runs the research, validates the claims and \
                      writes the final report.\n\n\
                      Examples:\n  \
                      deckcheck run acme.pdf\n  \
                      deckcheck run acme.pptx --yes --output-dir reports"
    )]
    Run(DeckArgs),

    #[command(
        about = "Analyse a deck and write its research plan",
        long_about = "Runs stage 1 only: extraction, deck analysis, gap identification and the \
                      research plan.\n\n\
                      Examples:\n  \
                      deckcheck plan acme.pdf"
    )]
    Plan(DeckArgs),

    #[command(
        about = "Execute a saved research plan",
        long_about = "Runs stage 2 from a *_research_plan.json file. Results and the validation \
                      plan are written next to the plan.\n\n\
                      Examples:\n  \
                      deckcheck research output/acme_research_plan.json"
    )]
    Research(PlanFileArgs),

    #[command(
        about = "Validate claims from a saved validation plan",
        long_about = "Runs stage 3 from a *_validation_plan.json file and writes the validation \
                      report and the final markdown report next to it.\n\n\
                      Examples:\n  \
                      deckcheck validate output/acme_validation_plan.json --yes"
    )]
    Validate(PlanFileArgs),
}

#[derive(Args, Debug, Clone)]
pub struct DeckArgs {
    #[arg(value_name = "DECK", help = "Pitch deck (.pdf, .pptx, .txt or .md)")]
    pub deck: PathBuf,

    #[arg(
        short = 'o',
        long,
        value_name = "DIR",
        help = "Directory for intermediate files and the report"
    )]
    pub output_dir: Option<PathBuf>,

    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Args, Debug, Clone)]
pub struct PlanFileArgs {
    #[arg(value_name = "PLAN_JSON", help = "Plan written by an earlier stage")]
    pub plan: PathBuf,

    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Args, Debug, Clone)]
pub struct CommonArgs {
    #[arg(
        short = 'p',
        long,
        value_parser = parse_adapter_kind,
        help = "LLM provider (defaults to an OpenAI-compatible endpoint)"
    )]
    pub provider: Option<AdapterKind>,

    #[arg(short = 'm', long, value_name = "MODEL", help = "Model name to use")]
    pub model: Option<String>,

    #[arg(long, value_name = "SECONDS", help = "LLM request timeout in seconds")]
    pub timeout: Option<u64>,

    #[arg(short = 'y', long, help = "Skip cost confirmation prompts")]
    pub yes: bool,

    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Summary output format"
    )]
    pub format: OutputFormatArg,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormatArg {
    Json,
    Yaml,
    Human,
}

impl From<OutputFormatArg> for super::output::OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Json => super::output::OutputFormat::Json,
            OutputFormatArg::Yaml => super::output::OutputFormat::Yaml,
            OutputFormatArg::Human => super::output::OutputFormat::Human,
        }
    }
}

fn parse_adapter_kind(s: &str) -> Result<AdapterKind, String> {
    AdapterKind::from_lower_str(&s.to_lowercase()).ok_or_else(|| {
        format!(
            "Invalid provider: {}. Valid options: openai, anthropic, gemini, ollama, xai, groq",
            s
        )
    })
}
