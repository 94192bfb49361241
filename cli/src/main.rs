use std::path::PathBuf;

use clap::{Parser, Subcommand};
use killfeed_cli::commands::{self, Overrides};
use killfeed_cli::logging::init_logging;

#[derive(Parser)]
#[command(version, about = "Kill feed for the game log")]
struct Cli {
    /// Config file to use instead of the per-user one
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(flatten)]
    overrides: Overrides,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Tail the log and paint the feed (default)
    Run,
    /// Print every kill a log file would put on the feed
    Check {
        #[arg(short, long)]
        path: PathBuf,
    },
    /// Show the resolved configuration
    Config,
}

#[tokio::main]
async fn main() -> Result<(), String> {
    let _log_guard = init_logging();
    let cli = Cli::parse();
    let config = commands::load(cli.config.as_deref(), &cli.overrides)?;

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => commands::run(config).await,
        Commands::Check { path } => commands::check(&config, &path),
        Commands::Config => commands::show_config(&config, cli.config.as_deref()),
    }
}
