//! API router

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::modules::metrics::{http_metrics_middleware, prometheus_metrics, MetricsState};
use super::modules::request_id::request_id_middleware;
use super::modules::{bikes, bookings, health};
use super::state::AppState;

pub fn create_api_router(state: AppState, prometheus: PrometheusHandle) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        // Catalog
        .route("/api/v1/bikes", get(bikes::list_bikes))
        .route(
            "/api/v1/bikes/{id}/availability",
            get(bikes::bike_availability),
        )
        .route(
            "/api/v1/bikes/{id}/reservations",
            get(bikes::bike_reservations),
        )
        // Booking
        .route("/api/v1/quotes", post(bookings::create_quote))
        .route("/api/v1/bookings", post(bookings::create_booking))
        .route(
            "/api/v1/bookings/{id}/cancel",
            post(bookings::cancel_booking),
        )
        .route(
            "/api/v1/bookings/{id}/complete",
            post(bookings::complete_booking),
        )
        .with_state(state);

    let metrics_routes = Router::new()
        .route("/metrics", get(prometheus_metrics))
        .with_state(MetricsState { handle: prometheus });

    Router::new()
        .route("/health", get(health::health_check))
        .merge(api_routes)
        .merge(metrics_routes)
        .layer(middleware::from_fn(http_metrics_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
