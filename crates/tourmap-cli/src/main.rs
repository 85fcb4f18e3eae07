//! `tourmap` command line interface.

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod cache;
mod config;
mod export;
mod fetch;
mod token;

#[derive(Debug, Parser)]
#[command(name = "tourmap", version)]
#[command(about = "Fetch and cache tourism business listings")]
struct Cli {
    /// Log filter used when RUST_LOG is unset
    #[arg(long, global = true, env = "TOURMAP_LOG", default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Search accommodations and restaurants and export them as JSON
    Fetch(fetch::FetchArgs),
    /// Inspect or clear the listing cache
    Cache {
        #[command(subcommand)]
        command: cache::CacheCommands,
    },
    /// Check the API token's format and expiry
    Token(token::TokenArgs),
}

fn init_tracing(level: &str) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(level))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(&cli.log_level)?;

    match cli.command {
        Commands::Fetch(args) => fetch::run(args).await,
        Commands::Cache { command } => cache::run(command).await,
        Commands::Token(args) => token::run(&args),
    }
}
