//! Inventory statistics command

use anyhow::{Context, Result};
use clap::Parser;
use kennel_core::{summarize, DogQuery, Statistics};
use kennel_server::config::{StoreConfig, STORE_KEY_VAR, STORE_URL_VAR};
use kennel_server::store;

/// Arguments for the stats command
#[derive(Parser, Debug)]
pub struct StatsArgs {
    /// Record store URL (http(s)://, postgres:// or memory://)
    #[arg(long, env = STORE_URL_VAR)]
    pub store_url: String,

    /// Record store key
    #[arg(long, env = STORE_KEY_VAR, hide_env_values = true, default_value = "")]
    pub store_key: String,

    /// Print the statistics as JSON
    #[arg(long)]
    pub json: bool,
}

/// Fetch every record and print its statistics
pub async fn run_stats(args: StatsArgs) -> Result<()> {
    let store = store::connect(&StoreConfig::new(args.store_url, args.store_key))
        .await
        .context("Failed to open record store")?;

    let dogs = store
        .select(&DogQuery::all())
        .await
        .context("Failed to fetch dogs")?;
    let stats = summarize(&dogs);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        print!("{}", render_text(&stats));
    }

    Ok(())
}

fn render_text(stats: &Statistics) -> String {
    let mut out = format!(
        "Dogs:            {}\n\
         Unique breeds:   {}\n\
         Inventory value: {:.2}\n\
         Average price:   {:.2}\n",
        stats.total_dogs, stats.unique_breeds, stats.total_inventory_value, stats.average_price
    );

    if !stats.breed_distribution.is_empty() {
        out.push_str("Breeds:\n");
        for (breed, count) in stats.breed_distribution.iter() {
            out.push_str(&format!("  {:<20} {}\n", breed.unwrap_or("(none)"), count));
        }
    }

    out
}
