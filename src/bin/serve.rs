// HTTP variant of the aggregate importer: same parse-and-upsert core as the
// folder walker, fed from a JSON request body instead of a local file.

use anyhow::Result;
use footstats::csv::normalize::DEFAULT_SEASON;
use footstats::db::{RestStore, StatStore};
use footstats::{config::Config, import};
use serde::{Deserialize, Serialize};
use std::{env, sync::Arc};
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};
use warp::{http::StatusCode, reject::Rejection, reply::Reply, Filter};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImportRequest {
    csv_content: String,
    player_name: String,
    season: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ImportResponse {
    success: bool,
    message: String,
    records_processed: usize,
}

#[derive(Serialize)]
struct ErrorResponse {
    success: bool,
    error: String,
}

async fn health_check() -> Result<impl Reply, Rejection> {
    Ok(warp::reply::json(&serde_json::json!({
        "status": "healthy",
        "service": "footstats-import"
    })))
}

/// Any failure terminates this single request with a 400 carrying the error
/// text; there is no retry.
async fn import_csv<S: StatStore>(
    store: Arc<S>,
    req: ImportRequest,
) -> Result<impl Reply, Rejection> {
    let season = req.season.as_deref().unwrap_or(DEFAULT_SEASON);
    info!(player = %req.player_name, season, "import request");

    match import::import_performance_text(
        store.as_ref(),
        &req.csv_content,
        &req.player_name,
        season,
    )
    .await
    {
        Ok(batch) => {
            info!(
                imported = batch.imported,
                skipped = batch.skipped,
                "request processed"
            );
            Ok(warp::reply::with_status(
                warp::reply::json(&ImportResponse {
                    success: true,
                    message: format!(
                        "Imported {} record(s) for {}",
                        batch.imported, req.player_name
                    ),
                    records_processed: batch.imported,
                }),
                StatusCode::OK,
            ))
        }
        Err(e) => {
            warn!("import failed: {:#}", e);
            Ok(warp::reply::with_status(
                warp::reply::json(&ErrorResponse {
                    success: false,
                    error: format!("{:#}", e),
                }),
                StatusCode::BAD_REQUEST,
            ))
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env_filter).init();
    info!("starting import service");

    let config = Config::from_env()?;
    let store = Arc::new(RestStore::new(&config)?);
    let store_filter = warp::any().map(move || store.clone());

    let health = warp::path("health").and(warp::get()).and_then(health_check);

    let import_route = warp::path("import")
        .and(warp::post())
        .and(store_filter)
        .and(warp::body::json())
        .and_then(import_csv);

    // Preflight OPTIONS requests are answered by the CORS layer with 200.
    let cors = warp::cors()
        .allow_any_origin()
        .allow_headers(vec!["content-type", "authorization"])
        .allow_methods(vec!["POST", "OPTIONS"]);

    let routes = health.or(import_route).with(cors);

    let port: u16 = env::var("PORT")
        .unwrap_or_else(|_| "8080".to_string())
        .parse()
        .unwrap_or(8080);
    info!("listening on port {}", port);

    warp::serve(routes).run(([0, 0, 0, 0], port)).await;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_health_check() {
        let result = health_check().await;
        assert!(result.is_ok());
    }

    #[test]
    fn request_body_uses_camel_case() {
        let req: ImportRequest = serde_json::from_str(
            r#"{"csvContent":"Date,Pts_Total\n2025-01-01,7.5","playerName":"Test Player"}"#,
        )
        .unwrap();
        assert_eq!(req.player_name, "Test Player");
        assert!(req.season.is_none());
        assert!(req.csv_content.starts_with("Date"));
    }

    #[test]
    fn responses_use_camel_case() {
        let body = serde_json::to_value(ImportResponse {
            success: true,
            message: "ok".into(),
            records_processed: 2,
        })
        .unwrap();
        assert_eq!(body["recordsProcessed"], 2);
    }
}
