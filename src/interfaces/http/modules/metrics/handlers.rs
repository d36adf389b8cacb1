//! Prometheus metrics handler
//!
//! Exposes `GET /metrics` in the Prometheus text format, rendered from the
//! recorder installed at startup.

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use metrics_exporter_prometheus::PrometheusHandle;

#[derive(Clone)]
pub struct MetricsState {
    pub handle: PrometheusHandle,
}

/// `GET /metrics`
pub async fn prometheus_metrics(State(state): State<MetricsState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
        state.handle.render(),
    )
}
