//! Catalog DTOs

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::domain::catalog::{
    parse_category_selector, parse_location_selector, AvailabilityFilter, FilterCriteria,
    PriceRange, SortKey,
};
use crate::domain::{RentalWindow, WindowError};
use crate::interfaces::http::common::ApiError;

/// Query string of `GET /api/v1/bikes`. Every selector accepts `all`.
#[derive(Debug, Default, Deserialize)]
pub struct CatalogQueryParams {
    /// Free-text search over name, category and location
    pub q: Option<String>,
    pub category: Option<String>,
    pub location: Option<String>,
    /// `all`, `lo-hi` or `lo+`
    pub price: Option<String>,
    /// `all`, `available` or `unavailable`
    pub availability: Option<String>,
    #[serde(default)]
    pub favorites_only: bool,
    pub user_id: Option<String>,
    pub sort: Option<String>,
    pub page: Option<u32>,
}

impl CatalogQueryParams {
    pub fn to_criteria(&self, page_size: u32) -> Result<FilterCriteria, ApiError> {
        let mut criteria = FilterCriteria::default();

        if let Some(q) = &self.q {
            criteria = criteria.with_search(q.clone());
        }
        if let Some(category) = self
            .category
            .as_deref()
            .map(parse_category_selector)
            .transpose()?
            .flatten()
        {
            criteria = criteria.with_category(category);
        }
        if let Some(location) = self.location.as_deref().and_then(parse_location_selector) {
            criteria = criteria.with_location(location);
        }
        if let Some(price) = &self.price {
            criteria = criteria.with_price(price.parse::<PriceRange>()?);
        }
        if let Some(availability) = &self.availability {
            criteria = criteria.with_availability(availability.parse::<AvailabilityFilter>()?);
        }
        if self.favorites_only {
            criteria = criteria.favorites_only();
        }
        if let Some(sort) = &self.sort {
            criteria = criteria.sorted_by(sort.parse::<SortKey>()?);
        }

        Ok(criteria.page(self.page.unwrap_or(1), page_size))
    }
}

/// `?start=...&end=...` in RFC 3339
#[derive(Debug, Deserialize)]
pub struct WindowParams {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl WindowParams {
    pub fn window(&self) -> Result<RentalWindow, WindowError> {
        RentalWindow::new(self.start, self.end)
    }
}
