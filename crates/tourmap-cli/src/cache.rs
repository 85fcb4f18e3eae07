//! `tourmap cache stats` and `tourmap cache clear`

use std::path::Path;

use clap::Subcommand;
use tourmap::CacheStats;
use tracing::info;

use crate::config::CacheLocation;

#[derive(Debug, Subcommand)]
pub(crate) enum CacheCommands {
    /// Show entry count, stored size and lookup counters
    Stats {
        #[command(flatten)]
        location: CacheLocation,
    },
    /// Delete every cached listing
    Clear {
        #[command(flatten)]
        location: CacheLocation,
    },
}

pub(crate) async fn run(command: CacheCommands) -> anyhow::Result<()> {
    match command {
        CacheCommands::Stats { location } => {
            let stats = location.open(None)?.stats().await?;
            print!("{}", render_stats(&location.cache_path, &stats));
        }
        CacheCommands::Clear { location } => {
            let removed = location.open(None)?.clear_all().await?;
            info!(removed, path = %location.cache_path.display(), "Cache cleared");
            println!("removed {removed} cached searches");
        }
    }
    Ok(())
}

fn render_stats(path: &Path, stats: &CacheStats) -> String {
    format!(
        "cache:   {}\nentries: {}\nsize:    {} bytes\nhits:    {}\nmisses:  {}\nhit rate: {}%\n",
        path.display(),
        stats.entries,
        stats.total_bytes,
        stats.hits,
        stats.misses,
        stats.hit_rate(),
    )
}
