// src/lib.rs
// Public library surface for the binary, integration tests and embedding callers.

pub mod api;
pub mod catalog;
pub mod config;
pub mod error;
pub mod metrics;
pub mod rank;
pub mod record;
pub mod resolve;
pub mod scoring;

// ---- Re-exports for stable public API ----
pub use crate::api::{router, AppState};
pub use crate::catalog::{Catalog, CatalogFilter};
pub use crate::config::RankerConfig;
pub use crate::error::{CatalogError, ConfigError, FilterError};
pub use crate::rank::{rank_batch, Mode, RankedDevice, Ranker};
pub use crate::record::{DeviceRecord, FieldSource};
pub use crate::scoring::{score_one, value_one, ScoreBreakdown, Scorer, ScoringResult};

use anyhow::Context;
use axum::Router;
use tracing::info;

/// `DEBUG_ROUTES=1` additionally mounts `/metrics`.
pub fn debug_routes_enabled() -> bool {
    std::env::var("DEBUG_ROUTES").ok().is_some_and(|v| v == "1")
}

/// Build the full in-process application from env/config files.
pub async fn app() -> anyhow::Result<Router> {
    let config = config::load_ranker_config().context("loading ranker config")?;
    let catalog = Catalog::load_default().context("loading device catalog")?;
    info!(records = catalog.len(), "ranker ready");

    // Recorder first, so the catalog gauge set by AppState::new is captured.
    let metrics = if debug_routes_enabled() {
        Some(metrics::Metrics::init().context("installing metrics recorder")?)
    } else {
        None
    };

    let mut router = api::router(AppState::new(config, catalog));
    if let Some(m) = metrics {
        router = router.merge(m.router());
    }
    Ok(router)
}
