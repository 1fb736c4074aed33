// src/import/mod.rs
//
// Orchestration above the parsing core: folder walking, per-file error
// containment, the shared parse-and-upsert path used by both the CLI and the
// HTTP endpoint, and the derived-total reconciliation step.

use crate::csv::normalize::{normalize_aggregate, normalize_match_stat};
use crate::csv::{parse_quoted, parse_strict};
use crate::db::StatStore;
use anyhow::{bail, Context, Result};
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::{error, info};

/// Pause between per-file upsert calls. A crude rate limit against the
/// hosted API, not a correctness mechanism.
const FILE_PACING: Duration = Duration::from_millis(100);

/// Outcome of one parse-and-upsert batch.
#[derive(Debug, Default, PartialEq)]
pub struct BatchOutcome {
    pub imported: usize,
    pub skipped: usize,
}

/// Running counters for a folder walk. One failed unit never stops the walk.
#[derive(Debug, Default, PartialEq)]
pub struct ImportSummary {
    pub imported: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Outcome of one detailed per-player import, including the reconciled total.
#[derive(Debug, PartialEq)]
pub struct MatchImportSummary {
    pub imported: usize,
    pub skipped: usize,
    pub total_points: i64,
}

/// Parse aggregate CSV text and upsert every row for one player. This is the
/// shared core behind both the folder importer and the HTTP endpoint.
pub async fn import_performance_text<S: StatStore>(
    store: &S,
    csv: &str,
    player_name: &str,
    season: &str,
) -> Result<BatchOutcome> {
    let parsed = parse_strict(csv);
    let records: Vec<_> = parsed
        .table
        .rows
        .iter()
        .map(|row| normalize_aggregate(&parsed.table, row, player_name, season))
        .collect();

    store
        .upsert_performances(&records)
        .await
        .with_context(|| format!("upserting performances for {}", player_name))?;

    Ok(BatchOutcome {
        imported: records.len(),
        skipped: parsed.skipped,
    })
}

/// File stem with underscores read as spaces, e.g. `harry_kane.csv` is the
/// player "harry kane".
fn player_name_from(path: &Path) -> Option<String> {
    let stem = path.file_stem()?.to_str()?;
    Some(stem.replace('_', " "))
}

fn sorted_entries(dir: &Path) -> Result<Vec<std::path::PathBuf>> {
    let mut entries: Vec<_> = fs::read_dir(dir)
        .with_context(|| format!("reading directory {}", dir.display()))?
        .filter_map(|e| e.ok().map(|e| e.path()))
        .collect();
    entries.sort();
    Ok(entries)
}

/// Walk `root` one folder at a time and each folder's CSV files one at a
/// time, in sorted order. CSV files directly under `root` are imported too.
/// A failing file is logged and counted; the walk continues.
pub async fn import_performance_dir<S: StatStore>(
    store: &S,
    root: &Path,
    season: &str,
) -> Result<ImportSummary> {
    let mut summary = ImportSummary::default();

    for entry in sorted_entries(root)? {
        if entry.is_dir() {
            info!(folder = %entry.display(), "importing folder");
            let files = match sorted_entries(&entry) {
                Ok(files) => files,
                Err(e) => {
                    error!("{} failed: {:#}", entry.display(), e);
                    summary.failed += 1;
                    continue;
                }
            };
            for file in files {
                import_one_file(store, &file, season, &mut summary).await;
            }
        } else {
            import_one_file(store, &entry, season, &mut summary).await;
        }
    }

    Ok(summary)
}

async fn import_one_file<S: StatStore>(
    store: &S,
    path: &Path,
    season: &str,
    summary: &mut ImportSummary,
) {
    if path.extension().and_then(|e| e.to_str()) != Some("csv") {
        return;
    }
    let player_name = match player_name_from(path) {
        Some(name) => name,
        None => return,
    };

    let outcome = match fs::read_to_string(path) {
        Ok(content) => import_performance_text(store, &content, &player_name, season).await,
        Err(e) => Err(e).with_context(|| format!("reading {}", path.display())),
    };

    match outcome {
        Ok(batch) => {
            info!(
                player = %player_name,
                imported = batch.imported,
                skipped = batch.skipped,
                "imported file"
            );
            summary.imported += batch.imported;
            summary.skipped += batch.skipped;
        }
        Err(e) => {
            error!("{} failed: {:#}", path.display(), e);
            summary.failed += 1;
        }
    }

    tokio::time::sleep(FILE_PACING).await;
}

/// Recompute one player's total from every persisted `points` value and
/// write it back. Always recomputed from the store, never incremented, so
/// re-importing a file leaves the total unchanged.
pub async fn reconcile_player_total<S: StatStore>(store: &S, player_id: &str) -> Result<i64> {
    let total: i64 = store.player_points(player_id).await?.iter().sum();
    store.set_player_total(player_id, total).await?;
    Ok(total)
}

/// Import one player's detailed match-stat CSV: resolve the player by name,
/// parse quote-aware, upsert every normalized row, then reconcile the total.
pub async fn import_match_stats<S: StatStore>(
    store: &S,
    player_name: &str,
    csv: &str,
) -> Result<MatchImportSummary> {
    let player_id = match store.find_player_id(player_name).await? {
        Some(id) => id,
        None => bail!("player not found: {}", player_name),
    };

    let parsed = parse_quoted(csv);
    let mut records = Vec::with_capacity(parsed.rows.len());
    let mut skipped = 0usize;
    for row in &parsed.rows {
        match normalize_match_stat(&player_id, row) {
            Some(record) => records.push(record),
            None => skipped += 1,
        }
    }

    store
        .upsert_match_stats(&records)
        .await
        .with_context(|| format!("upserting match stats for {}", player_name))?;

    let total_points = reconcile_player_total(store, &player_id)
        .await
        .with_context(|| format!("reconciling total for {}", player_name))?;

    Ok(MatchImportSummary {
        imported: records.len(),
        skipped,
        total_points,
    })
}
