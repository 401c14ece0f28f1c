use std::path::PathBuf;
use std::sync::{Arc, RwLock};
use std::time::Instant;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::catalog::{Catalog, CatalogFilter};
use crate::config::RankerConfig;
use crate::error::{CatalogError, FilterError};
use crate::metrics;
use crate::rank::{Mode, RankedDevice, Ranker};
use crate::record::DeviceRecord;
use crate::scoring::ScoreBreakdown;

#[derive(Clone)]
pub struct AppState {
    ranker: Arc<Ranker>,
    catalog: Arc<RwLock<Catalog>>,
    /// Fixed reload source; `None` re-resolves env/default paths on every reload.
    catalog_path: Option<PathBuf>,
}

impl AppState {
    pub fn new(config: RankerConfig, catalog: Catalog) -> Self {
        metrics::set_catalog_records(catalog.len());
        Self {
            ranker: Arc::new(Ranker::new(config)),
            catalog: Arc::new(RwLock::new(catalog)),
            catalog_path: None,
        }
    }

    pub fn with_catalog_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.catalog_path = Some(path.into());
        self
    }

    pub fn ranker(&self) -> &Ranker {
        &self.ranker
    }

    pub fn catalog_len(&self) -> usize {
        self.catalog.read().map(|c| c.len()).unwrap_or(0)
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/recommendations", get(recommendations))
        .route("/rank", post(rank))
        .route("/score", post(score))
        .route("/admin/reload-catalog", post(admin_reload_catalog))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

/// Errors surfaced to HTTP callers as `{"detail": ...}`.
#[derive(Debug)]
pub enum ApiError {
    Filter(FilterError),
    Catalog(CatalogError),
    StatePoisoned,
}

impl From<FilterError> for ApiError {
    fn from(e: FilterError) -> Self {
        ApiError::Filter(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = match self {
            ApiError::Filter(_) => (StatusCode::BAD_REQUEST, "Invalid filter input.".to_string()),
            ApiError::Catalog(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("catalog reload failed: {e}"),
            ),
            ApiError::StatePoisoned => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "catalog state unavailable".to_string(),
            ),
        };
        (status, Json(json!({ "detail": detail }))).into_response()
    }
}

#[derive(Debug, Default, Deserialize)]
struct ModeQuery {
    #[serde(default)]
    mode: Option<String>,
}

impl ModeQuery {
    fn mode(&self) -> Mode {
        self.mode.as_deref().map(Mode::parse).unwrap_or_default()
    }
}

#[derive(Debug, Default, Deserialize)]
struct RecommendQuery {
    #[serde(default)]
    mode: Option<String>,
    #[serde(default)]
    max_price: Option<String>,
    #[serde(default)]
    brand: Option<String>,
}

fn timed_rank(ranker: &Ranker, records: Vec<DeviceRecord>, mode: Mode) -> Vec<RankedDevice> {
    let started = Instant::now();
    let out = ranker.rank_batch(records, mode);
    metrics::record_rank(mode, started.elapsed());
    out
}

async fn recommendations(
    State(state): State<AppState>,
    Query(q): Query<RecommendQuery>,
) -> Result<Json<Vec<RankedDevice>>, ApiError> {
    let filter = CatalogFilter::from_query(q.max_price.as_deref(), q.brand.as_deref())?;
    let mode = q.mode.as_deref().map(Mode::parse).unwrap_or_default();

    let selected = {
        let guard = state.catalog.read().map_err(|_| ApiError::StatePoisoned)?;
        guard.select(&filter)
    };
    Ok(Json(timed_rank(&state.ranker, selected, mode)))
}

async fn rank(
    State(state): State<AppState>,
    Query(q): Query<ModeQuery>,
    Json(records): Json<Vec<DeviceRecord>>,
) -> Json<Vec<RankedDevice>> {
    Json(timed_rank(&state.ranker, records, q.mode()))
}

#[derive(Debug, Serialize)]
struct ScoreOut {
    raw_score: f64,
    smartbuy_score: f64,
    score_breakdown: ScoreBreakdown,
}

async fn score(
    State(state): State<AppState>,
    Query(q): Query<ModeQuery>,
    Json(record): Json<DeviceRecord>,
) -> Json<ScoreOut> {
    let r = state.ranker.scorer().value_one(&record, q.mode());
    Json(ScoreOut {
        raw_score: r.raw_score,
        smartbuy_score: r.value_score,
        score_breakdown: r.breakdown,
    })
}

#[derive(Debug, Serialize)]
struct ReloadOut {
    records: usize,
    skipped: usize,
}

async fn admin_reload_catalog(State(state): State<AppState>) -> Result<Json<ReloadOut>, ApiError> {
    let loaded = match &state.catalog_path {
        Some(p) => Catalog::load(p),
        None => Catalog::load_default(),
    };
    let fresh = loaded.map_err(|e| {
        warn!(error = %e, "catalog reload failed; keeping current catalog");
        ApiError::Catalog(e)
    })?;

    let out = ReloadOut {
        records: fresh.len(),
        skipped: fresh.skipped(),
    };
    {
        let mut guard = state.catalog.write().map_err(|_| ApiError::StatePoisoned)?;
        *guard = fresh;
    }
    metrics::set_catalog_records(out.records);
    info!(records = out.records, skipped = out.skipped, "catalog reloaded");
    Ok(Json(out))
}
