//! refreshcast CLI - Refresh duration estimates from refresh history.

use anyhow::Result;
use clap::{Args, CommandFactory, Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod display;

use display::{InputFormat, Output};

#[derive(Parser)]
#[command(name = "refreshcast")]
#[command(about = "Estimate how long the next refresh will take", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Quiet mode (only log errors)
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Estimate the duration of the next refresh
    Estimate {
        #[command(flatten)]
        history: HistoryArgs,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        output: Output,
    },

    /// Show how each past refresh was classified, weighted and filtered
    Explain {
        #[command(flatten)]
        history: HistoryArgs,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        output: Output,
    },

    /// List the fallback baselines used when there is no usable history
    Baselines {
        /// TOML file overriding estimator settings
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        output: Output,
    },
}

/// Inputs shared by the estimating commands.
#[derive(Args)]
pub(crate) struct HistoryArgs {
    /// Refresh history file, or `-` for stdin
    history: PathBuf,

    /// Storage mode of the resource (import, directquery, live, composite)
    #[arg(short, long, default_value = "unknown")]
    storage_mode: String,

    /// Kind of refresh to estimate (manual or scheduled)
    #[arg(short, long, default_value = "manual")]
    kind: String,

    /// Estimation time as RFC 3339. Defaults to now.
    #[arg(long)]
    now: Option<String>,

    /// History format. Defaults from the file extension.
    #[arg(short, long, value_enum)]
    input_format: Option<InputFormat>,

    /// TOML file overriding estimator settings
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    display::init_tracing(cli.verbose, cli.quiet);

    // Show help if no command provided
    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    match command {
        Commands::Estimate { history, output } => commands::estimate::estimate(&history, output),
        Commands::Explain { history, output } => commands::explain::explain(&history, output),
        Commands::Baselines { config, output } => {
            commands::baselines::list_baselines(config.as_deref(), output)
        }
    }
}
