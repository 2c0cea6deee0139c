//! kennel CLI - dog inventory HTTP backend
//!
//! - `serve`: run the HTTP API (listing, dashboard, admin routes)
//! - `stats`: print inventory statistics straight from the record store

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};

mod commands;
mod tracing_setup;

use tracing_setup::TracingConfig;

#[derive(Parser, Debug)]
#[command(name = "kennel", version, about = "Dog inventory HTTP backend")]
struct Cli {
    /// Enable debug logging
    #[arg(long, global = true, action = ArgAction::SetTrue)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP server
    Serve(commands::serve::ServeArgs),
    /// Print inventory statistics from the record store
    Stats(commands::stats::StatsArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    // .env first so clap's env fallbacks see it; existing variables win
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    tracing_setup::init(&TracingConfig { debug: cli.debug }).ok();

    match cli.command {
        Commands::Serve(args) => commands::run_serve(args).await?,
        Commands::Stats(args) => commands::run_stats(args).await?,
    }

    Ok(())
}
