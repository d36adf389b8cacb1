pub mod catalog;
pub mod pricing;
pub mod repositories;
pub mod reservation;

// Re-export commonly used types
pub use catalog::{
    filter_sort_paginate, AvailabilityFilter, BikeCategory, CatalogItem, CatalogPage,
    CatalogSource, FavoritesSource, FilterCriteria, PriceRange, RateUnit, SortKey,
};
pub use pricing::{
    compute_price, LateFee, LateReturnPolicy, PriceBreakdown, PriceError, PriceOptions,
};
pub use repositories::SourceProvider;
pub use reservation::{
    check_availability, AvailabilityResult, RentalWindow, Reservation, ReservationSource,
    ReservationStatus, WindowError,
};

pub use crate::shared::{DomainError, DomainResult, StoreError};
