//! Catalog HTTP handlers

use axum::extract::{Path, Query, State};

use crate::domain::{AvailabilityResult, CatalogPage, Reservation};
use crate::interfaces::http::common::{ok, ApiResult};
use crate::interfaces::http::state::AppState;

use super::dto::{CatalogQueryParams, WindowParams};

/// `GET /api/v1/bikes`
pub async fn list_bikes(
    State(state): State<AppState>,
    Query(params): Query<CatalogQueryParams>,
) -> ApiResult<CatalogPage> {
    let criteria = params.to_criteria(state.page_size)?;
    let page = state
        .catalog
        .query(&criteria, params.user_id.as_deref())
        .await?;
    ok(page)
}

/// `GET /api/v1/bikes/{id}/availability?start=..&end=..`
pub async fn bike_availability(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<WindowParams>,
) -> ApiResult<AvailabilityResult> {
    let window = params.window()?;
    let result = state.bookings.availability(&id, &window).await?;
    ok(result)
}

/// `GET /api/v1/bikes/{id}/reservations`
pub async fn bike_reservations(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Vec<Reservation>> {
    let reservations = state.bookings.reservations_for(&id).await?;
    ok(reservations)
}
