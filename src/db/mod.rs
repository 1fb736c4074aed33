// src/db/mod.rs
//
// Storage collaborator for the importers. `StatStore` is the seam the import
// layer talks to; `RestStore` implements it against a PostgREST-style API
// where upserts declare their conflict key in the query string and resolve
// conflicts by overwriting the existing row.

use crate::config::Config;
use crate::model::{MatchStatRecord, PerformanceRecord, PlayerRow};
use anyhow::{bail, Context, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Conflict key for the aggregate performance table.
pub const PERFORMANCE_CONFLICT: &str = "player_name,match_date,season";
/// Conflict key for the detailed match-stat table.
pub const MATCH_STAT_CONFLICT: &str = "player_id,match_date";

#[async_trait::async_trait]
pub trait StatStore: Send + Sync {
    /// Upsert a batch of aggregate records, overwriting on conflict.
    async fn upsert_performances(&self, records: &[PerformanceRecord]) -> Result<()>;

    /// Upsert a batch of detailed records, overwriting on conflict.
    async fn upsert_match_stats(&self, records: &[MatchStatRecord]) -> Result<()>;

    /// Case-insensitive player lookup; `None` when no row matches.
    async fn find_player_id(&self, name: &str) -> Result<Option<String>>;

    /// Every persisted `points` value for one player, for total recomputation.
    async fn player_points(&self, player_id: &str) -> Result<Vec<i64>>;

    /// Write a recomputed total back to the player-pool row.
    async fn set_player_total(&self, player_id: &str, total: i64) -> Result<()>;
}

#[derive(Deserialize)]
struct PointsRow {
    points: Option<i64>,
}

/// REST client for the hosted database.
pub struct RestStore {
    client: Client,
    base_url: String,
    api_key: String,
}

impl RestStore {
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("building HTTP client")?;

        Ok(RestStore {
            client,
            base_url: config.db_url.trim_end_matches('/').to_string(),
            api_key: config.db_key.clone(),
        })
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    fn authed(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        req.header("apikey", &self.api_key)
            .header("Authorization", format!("Bearer {}", self.api_key))
    }

    /// POST a batch to `table` with `on_conflict` set to the composite key.
    /// `resolution=merge-duplicates` asks the API to update conflicting rows
    /// rather than skip them.
    async fn upsert<T: Serialize>(&self, table: &str, conflict: &str, rows: &[T]) -> Result<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let resp = self
            .authed(self.client.post(self.table_url(table)))
            .query(&[("on_conflict", conflict)])
            .header("Prefer", "resolution=merge-duplicates,return=minimal")
            .json(rows)
            .send()
            .await
            .with_context(|| format!("POST {}", table))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            bail!("upsert into {} rejected: {} {}", table, status, body.trim());
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl StatStore for RestStore {
    async fn upsert_performances(&self, records: &[PerformanceRecord]) -> Result<()> {
        self.upsert("player_performances", PERFORMANCE_CONFLICT, records)
            .await
    }

    async fn upsert_match_stats(&self, records: &[MatchStatRecord]) -> Result<()> {
        self.upsert("player_match_stats", MATCH_STAT_CONFLICT, records)
            .await
    }

    async fn find_player_id(&self, name: &str) -> Result<Option<String>> {
        let name_filter = format!("ilike.{}", name);
        let resp = self
            .authed(self.client.get(self.table_url("players")))
            .query(&[("select", "id,name"), ("name", name_filter.as_str())])
            .send()
            .await
            .context("GET players")?
            .error_for_status()
            .context("players lookup")?;

        let rows: Vec<PlayerRow> = resp.json().await.context("decoding players")?;
        Ok(rows.into_iter().next().map(|p| p.id))
    }

    async fn player_points(&self, player_id: &str) -> Result<Vec<i64>> {
        let id_filter = format!("eq.{}", player_id);
        let resp = self
            .authed(self.client.get(self.table_url("player_match_stats")))
            .query(&[("select", "points"), ("player_id", id_filter.as_str())])
            .send()
            .await
            .context("GET match stats")?
            .error_for_status()
            .context("points selection")?;

        let rows: Vec<PointsRow> = resp.json().await.context("decoding points")?;
        Ok(rows.into_iter().map(|r| r.points.unwrap_or(0)).collect())
    }

    async fn set_player_total(&self, player_id: &str, total: i64) -> Result<()> {
        let id_filter = format!("eq.{}", player_id);
        let resp = self
            .authed(self.client.patch(self.table_url("players")))
            .query(&[("id", id_filter.as_str())])
            .header("Prefer", "return=minimal")
            .json(&serde_json::json!({ "total_score": total }))
            .send()
            .await
            .context("PATCH players")?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            bail!("total write-back rejected: {} {}", status, body.trim());
        }
        Ok(())
    }
}
