//! Lecture CLI - search the lecture listing from the command line.
//!
//! Commands:
//! - `lecture search` - Run a listing search and print one page of results
//! - `lecture url` - Encode filters to a URL query, or decode one
//! - `lecture session` - Manage the session fallback read by the next search
//! - `lecture config` - Manage configuration

mod commands;
mod config;
mod context;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use lecture_observability::{init_tracing, LogLevel};

use commands::{ConfigArgs, SearchArgs, SessionArgs, UrlArgs};

/// Lecture CLI - Search and share lecture listing queries
#[derive(Parser)]
#[command(name = "lecture")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use JSON output format
    #[arg(long, global = true)]
    json: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search lectures
    Search(SearchArgs),

    /// Encode or decode listing URL queries
    Url(UrlArgs),

    /// Manage the session search fallback
    Session(SessionArgs),

    /// Manage configuration
    Config(ConfigArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup output formatting
    let output = output::Output::new(cli.verbose, cli.json);

    // Load config
    let config_path = cli.config.as_deref();
    let ctx = match context::Context::load(config_path, output.clone()) {
        Ok(ctx) => ctx,
        Err(e) => {
            output.error(&format!("{:#}", e));
            std::process::exit(1);
        }
    };

    let level = if ctx.output.is_verbose() {
        LogLevel::Debug
    } else {
        ctx.config.logging.level
    };
    if let Err(e) = init_tracing(level, ctx.config.logging.format) {
        ctx.output.debug(&e.to_string());
    }

    // Execute command
    let result = match cli.command {
        Commands::Search(args) => commands::search::run(args, &ctx).await,
        Commands::Url(args) => commands::url::run(args, &ctx).await,
        Commands::Session(args) => commands::session::run(args, &ctx).await,
        Commands::Config(args) => commands::config::run(args, &ctx).await,
    };

    if let Err(e) = result {
        ctx.output.error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}
