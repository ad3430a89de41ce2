use crate::commands::{run_captured, run_score, CapturedArgs, ScoreArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use fetti_leads::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Fetti Lead Engine",
    about = "Normalize, score, and capture mortgage leads from the command line or over HTTP",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Score a CSV export of leads and print or save the ranked result
    Score(ScoreArgs),
    /// List leads captured through the intake form, newest first
    Captured(CapturedArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Keep captured leads in memory instead of the configured CSV file
    #[arg(long)]
    pub(crate) ephemeral: bool,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Score(args) => run_score(args),
        Command::Captured(args) => run_captured(args),
    }
}
