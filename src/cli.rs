use bfi2_scorer::report::OutputFormat;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "bfi2",
    version,
    about = "BFI-2 personality inventory scoring CLI"
)]
pub struct Cli {
    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Score a saved response file
    Score(ScoreCommand),
    /// Score every response file under a directory
    Batch(BatchCommand),
    /// Administer the questionnaire on the terminal, then score it
    Survey(SurveyCommand),
    /// Validate a scoring configuration
    CheckConfig(CheckConfigCommand),
}

#[derive(Args)]
pub struct ScoreCommand {
    pub responses: PathBuf,
    /// Scoring key (TOML or JSON); the built-in BFI-2 key when omitted
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Label for the result; defaults to the file's persona
    #[arg(long)]
    pub persona: Option<String>,
    #[arg(short, long, value_enum, default_value = "md")]
    pub format: ReportFormat,
    /// Write the responses and scored result into the results directory
    #[arg(long)]
    pub save: bool,
}

#[derive(Args)]
pub struct BatchCommand {
    pub dir: PathBuf,
    #[arg(long)]
    pub config: Option<PathBuf>,
    #[arg(short, long, value_enum, default_value = "md")]
    pub format: ReportFormat,
}

#[derive(Args)]
pub struct SurveyCommand {
    #[arg(long)]
    pub persona: Option<String>,
    /// Question catalogue (JSON); the built-in BFI-2 items when omitted
    #[arg(long)]
    pub questions: Option<PathBuf>,
    #[arg(long)]
    pub config: Option<PathBuf>,
    #[arg(short, long, value_enum, default_value = "md")]
    pub format: ReportFormat,
    #[arg(long)]
    pub save: bool,
}

#[derive(Args)]
pub struct CheckConfigCommand {
    pub path: Option<PathBuf>,
}

#[derive(Clone, ValueEnum)]
pub enum ReportFormat {
    Json,
    Md,
}

impl From<ReportFormat> for OutputFormat {
    fn from(value: ReportFormat) -> Self {
        match value {
            ReportFormat::Json => OutputFormat::Json,
            ReportFormat::Md => OutputFormat::Md,
        }
    }
}
