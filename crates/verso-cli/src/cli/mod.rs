//! CLI entry and dispatch.

use anyhow::{Context, Result};
use clap::Parser;
use verso_core::{config, interrupt, logging};

mod commands;

#[derive(Parser)]
#[command(name = "verso")]
#[command(version = "0.1")]
#[command(about = "Iterative code generation with Gemini")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Override the model from config
    #[arg(short, long, global = true)]
    model: Option<String>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Execute a single prompt and print the generated code
    Exec {
        /// The prompt to generate code from
        #[arg(short, long)]
        prompt: String,
    },

    /// Line-oriented REPL (no alternate screen)
    Repl,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(clap::Subcommand)]
enum ConfigCommands {
    /// Show the path to the config file
    Path,
    /// Initialize a default config file (if not present)
    Init,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    interrupt::init();

    // Keep the guard alive so buffered log lines flush on exit.
    let _log_guard = logging::init();

    // one tokio runtime for everything
    let rt = tokio::runtime::Runtime::new().context("create tokio runtime")?;

    rt.block_on(async move { dispatch(cli).await })
}

async fn dispatch(cli: Cli) -> Result<()> {
    let mut config = config::Config::load().context("load config")?;

    if let Some(model) = cli.model.as_deref() {
        let trimmed = model.trim();
        if !trimmed.is_empty() {
            config.model = trimmed.to_string();
        }
    }

    // default to interactive mode
    let Some(command) = cli.command else {
        return commands::chat::run(&config).await;
    };

    match command {
        Commands::Exec { prompt } => commands::exec::run(&prompt, &config).await,
        Commands::Repl => commands::repl::run(&config).await,
        Commands::Config { command } => match command {
            ConfigCommands::Path => {
                commands::config::path();
                Ok(())
            }
            ConfigCommands::Init => commands::config::init(),
        },
    }
}
