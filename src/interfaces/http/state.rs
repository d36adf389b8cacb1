//! Shared handler state

use std::sync::Arc;

use crate::application::{BookingCoordinator, CatalogService};
use crate::shared::RetryConfig;

#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<CatalogService>,
    pub bookings: Arc<BookingCoordinator>,
    /// Page size applied to every catalog query
    pub page_size: u32,
    /// Backoff for booking attempts rejected by a collaborator failure
    pub booking_retry: RetryConfig,
}
