//! update-lp-aprs: refresh per-network LP APR artifacts.

use clap::{Parser, Subcommand};
use lp_apr::chain::{ExplorerClient, NetworkId};
use lp_apr::config::AppConfig;
use lp_apr::farms::{FarmConfigCache, FarmConfigRegistry};
use lp_apr::update::update_lp_aprs;
use std::time::Instant;
use tracing::{error, info};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()))
        .init();
    let cli = Cli::parse();
    let res = match cli.command.unwrap_or(Command::Update) {
        Command::Update => run_update(),
        Command::Farms => run_farms(),
    };
    if let Err(e) = res {
        error!(error = %e, "an unexpected error occurred");
        std::process::exit(1);
    }
}

#[derive(Parser)]
#[command(name = "update-lp-aprs")]
#[command(author = "gorusys <goru.connector@outlook.com>")]
#[command(about = "Fetch 7-day average LP APRs and write one JSON file per chain")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch and write LP APRs for every configured chain (default).
    Update,
    /// Print the number of served farms (farms with a pid) per chain.
    Farms,
}

fn run_update() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    let client = ExplorerClient::new(config.fetch_config())?;
    let update = config.update_config();
    let rt = tokio::runtime::Runtime::new()?;

    let started = Instant::now();
    let outcomes = rt.block_on(update_lp_aprs(&client, &update));
    let updated = outcomes.iter().filter(|o| o.is_success()).count();
    info!(
        elapsed_ms = started.elapsed().as_millis() as u64,
        updated,
        failed = outcomes.len() - updated,
        requests = client.request_count(),
        "fetch and update lp aprs"
    );
    Ok(())
}

fn run_farms() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    let cache = FarmConfigCache::new(FarmConfigRegistry::from_dir(&config.farms_dir));
    for network in &config.networks {
        let farms = cache.get(*network);
        println!("{}\t{}\t{}", network.chain_id(), network.chain_name(), farms.len());
    }
    let cached = NetworkId::ALL
        .into_iter()
        .filter(|n| cache.is_cached(*n))
        .count();
    info!(cached, "farm config lookup complete");
    Ok(())
}
