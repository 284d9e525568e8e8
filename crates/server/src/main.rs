//! askrelay CLI
//!
//! Main entry point: runs the HTTP relay or answers a single question from
//! the terminal.

mod commands;

use askrelay_core::{config::AppConfig, logging};
use clap::{Parser, Subcommand};
use commands::{AskCommand, ServeCommand};
use std::path::PathBuf;

/// askrelay - streaming question answering with search-grounded tools
#[derive(Parser, Debug)]
#[command(name = "askrelay")]
#[command(about = "Streaming question answering with search-grounded tools", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, env = "ASKRELAY_CONFIG")]
    config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, env = "RUST_LOG")]
    log_level: Option<String>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    no_color: bool,

    /// LLM provider (gemini, mock)
    #[arg(short, long, global = true, env = "ASKRELAY_PROVIDER")]
    provider: Option<String>,

    /// Model identifier
    #[arg(short, long, global = true, env = "ASKRELAY_MODEL")]
    model: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP server
    Serve(ServeCommand),

    /// Answer one question and print the streamed reply
    Ask(AskCommand),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load_from(cli.config.as_deref())?;

    let (host, port) = match &cli.command {
        Commands::Serve(cmd) => (cmd.host.clone(), cmd.port),
        Commands::Ask(_) => (None, None),
    };

    let config = config.with_overrides(
        host,
        port,
        cli.provider,
        cli.model,
        cli.log_level,
        cli.verbose,
        cli.no_color,
    );

    logging::init_logging(config.log_level.as_deref(), config.log_format, config.no_color)?;

    tracing::info!("askrelay starting");
    tracing::debug!("Provider: {}", config.provider);
    tracing::debug!("Model: {}", config.model);
    tracing::debug!("Timezone: {}", config.timezone);

    config.validate()?;

    let command_name = match &cli.command {
        Commands::Serve(_) => "serve",
        Commands::Ask(_) => "ask",
    };
    let _span = tracing::info_span!("command", name = command_name).entered();

    let result = match cli.command {
        Commands::Serve(cmd) => cmd.execute(&config).await,
        Commands::Ask(cmd) => cmd.execute(&config).await.map_err(anyhow::Error::from),
    };

    match &result {
        Ok(_) => tracing::info!("Command completed successfully"),
        Err(e) => tracing::error!("Command failed: {:#}", e),
    }

    result
}
