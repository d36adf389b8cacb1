//! Catalog aggregate
//!
//! Contains the CatalogItem entity, query criteria, the
//! filter/sort/paginate pipeline, and the source interfaces.

pub mod criteria;
pub mod model;
pub mod query;
pub mod repository;

pub use criteria::{
    parse_category_selector, parse_location_selector, AvailabilityFilter, CriteriaError,
    FilterCriteria, PriceRange, SortKey, DEFAULT_PAGE_SIZE,
};
pub use model::{BikeCategory, CatalogItem, RateUnit};
pub use query::{filter_sort_paginate, CatalogPage};
pub use repository::{CatalogSource, FavoritesSource};
