use std::time::Duration;

use axum::{routing::get, Router};
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;

use crate::rank::Mode;

pub const RANK_REQUESTS_TOTAL: &str = "smartbuy_rank_requests_total";
pub const RANK_DURATION_MS: &str = "smartbuy_rank_duration_ms";
pub const CATALOG_RECORDS: &str = "smartbuy_catalog_records";

static HANDLE: OnceCell<PrometheusHandle> = OnceCell::new();

#[derive(Clone)]
pub struct Metrics {
    pub handle: PrometheusHandle,
}

impl Metrics {
    /// Install the Prometheus recorder (first call only) and return a handle to it.
    pub fn init() -> anyhow::Result<Self> {
        let handle = HANDLE.get_or_try_init(|| {
            // Use default buckets to avoid API differences across crate versions.
            PrometheusBuilder::new().install_recorder()
        })?;
        Ok(Self {
            handle: handle.clone(),
        })
    }

    /// Returns a router exposing `/metrics` with the Prometheus exposition format.
    pub fn router(&self) -> Router {
        let handle = self.handle.clone();
        Router::new().route(
            "/metrics",
            get(move || {
                let h = handle.clone();
                async move { h.render() }
            }),
        )
    }
}

/// One ranking request served: bumps the per-mode counter and records the latency.
pub fn record_rank(mode: Mode, elapsed: Duration) {
    counter!(RANK_REQUESTS_TOTAL, "mode" => mode.as_str()).increment(1);
    histogram!(RANK_DURATION_MS).record(elapsed.as_secs_f64() * 1000.0);
}

pub fn set_catalog_records(n: usize) {
    gauge!(CATALOG_RECORDS).set(n as f64);
}
