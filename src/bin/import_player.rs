// Detailed per-player import: reads one match-stat CSV, upserts every row,
// then recomputes the player's total from the persisted rows.

use anyhow::{Context, Result};
use footstats::{config::Config, db::RestStore, import};
use std::{env, fs, path::PathBuf};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env_filter).init();

    let args: Vec<String> = env::args().collect();
    let player_name = args.get(1).context("usage: import_player <name> <csv>")?;
    let csv_path = PathBuf::from(args.get(2).context("usage: import_player <name> <csv>")?);

    let config = Config::from_env()?;
    let store = RestStore::new(&config)?;

    let csv = fs::read_to_string(&csv_path)
        .with_context(|| format!("reading {}", csv_path.display()))?;

    let summary = import::import_match_stats(&store, player_name, &csv).await?;
    info!(
        player = %player_name,
        imported = summary.imported,
        skipped = summary.skipped,
        total_points = summary.total_points,
        "import complete"
    );
    Ok(())
}
