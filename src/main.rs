use anyhow::Result;
use footstats::{config::Config, csv::normalize::DEFAULT_SEASON, db::RestStore, import};
use std::{env, path::PathBuf};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .init();
    info!("startup");

    // ─── 2) config & store ───────────────────────────────────────────
    let config = Config::from_env()?;
    let store = RestStore::new(&config)?;

    // ─── 3) arguments ────────────────────────────────────────────────
    let args: Vec<String> = env::args().collect();
    let root = PathBuf::from(args.get(1).map(String::as_str).unwrap_or("data"));
    let season = args.get(2).map(String::as_str).unwrap_or(DEFAULT_SEASON);
    info!(root = %root.display(), season, "importing performance CSVs");

    // ─── 4) walk folders & upsert ────────────────────────────────────
    let summary = import::import_performance_dir(&store, &root, season).await?;
    info!(
        imported = summary.imported,
        skipped = summary.skipped,
        failed = summary.failed,
        "all done"
    );
    Ok(())
}
