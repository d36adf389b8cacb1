//! Booking HTTP handlers

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;

use crate::application::{BookingRejection, BookingRequest, Cancellation, Completion, Quote};
use crate::domain::{RentalWindow, Reservation};
use crate::interfaces::http::common::{ok, ApiError, ApiResponse, ApiResult, ValidatedJson};
use crate::interfaces::http::state::AppState;
use crate::shared::retry_with_backoff;

use super::dto::{CreateBookingRequest, QuoteRequest};

/// `POST /api/v1/bookings`
///
/// Retryable rejections re-run the whole attempt, validation and
/// availability check included.
pub async fn create_booking(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<CreateBookingRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Reservation>>), ApiError> {
    let request = BookingRequest::from(body);

    let reservation = retry_with_backoff(
        state.booking_retry.clone(),
        || state.bookings.run_booking(&request, Utc::now()),
        BookingRejection::is_retryable,
        "run_booking",
    )
    .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::success(reservation))))
}

/// `POST /api/v1/quotes`
pub async fn create_quote(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<QuoteRequest>,
) -> ApiResult<Quote> {
    let window = RentalWindow::new(body.start, body.end)?;
    let quote = state.bookings.quote(&body.resource_id, &window).await?;
    ok(quote)
}

/// `POST /api/v1/bookings/{id}/cancel`
pub async fn cancel_booking(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Cancellation> {
    let cancellation = state.bookings.cancel(&id, Utc::now()).await?;
    ok(cancellation)
}

/// `POST /api/v1/bookings/{id}/complete`
///
/// The bike counts as returned when the request arrives.
pub async fn complete_booking(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Completion> {
    let completion = state.bookings.complete(&id, Utc::now()).await?;
    ok(completion)
}
