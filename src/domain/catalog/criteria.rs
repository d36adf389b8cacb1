//! Catalog query criteria
//!
//! A `FilterCriteria` is the whole state of one catalog query (search box,
//! dropdowns, sort order, page). It is a plain value: building a new one is
//! how a caller changes the query.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::model::BikeCategory;

/// Sentinel used by every selector that means "do not filter"
pub const ALL: &str = "all";

/// Default number of bikes per catalog page
pub const DEFAULT_PAGE_SIZE: u32 = 12;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CriteriaError {
    #[error("unknown {field} '{value}'")]
    UnknownLabel { field: &'static str, value: String },

    #[error("invalid price range '{0}'")]
    InvalidPriceRange(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    #[default]
    Name,
    PriceLow,
    PriceHigh,
    Category,
    Availability,
}

impl SortKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::PriceLow => "price_low",
            Self::PriceHigh => "price_high",
            Self::Category => "category",
            Self::Availability => "availability",
        }
    }
}

impl FromStr for SortKey {
    type Err = CriteriaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name" => Ok(Self::Name),
            "price_low" => Ok(Self::PriceLow),
            "price_high" => Ok(Self::PriceHigh),
            // the storefront dropdown calls the category sort "type"
            "category" | "type" => Ok(Self::Category),
            "availability" => Ok(Self::Availability),
            other => Err(CriteriaError::UnknownLabel {
                field: "sort key",
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AvailabilityFilter {
    #[default]
    All,
    Available,
    Unavailable,
}

impl AvailabilityFilter {
    pub fn matches(&self, available: bool) -> bool {
        match self {
            Self::All => true,
            Self::Available => available,
            Self::Unavailable => !available,
        }
    }
}

impl FromStr for AvailabilityFilter {
    type Err = CriteriaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            ALL => Ok(Self::All),
            "available" => Ok(Self::Available),
            "unavailable" => Ok(Self::Unavailable),
            other => Err(CriteriaError::UnknownLabel {
                field: "availability",
                value: other.to_string(),
            }),
        }
    }
}

/// Price band over the per-unit rate.
///
/// A band passes `min < rate <= max`; a missing bound is open. Both bounds
/// missing is the `all` band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: Option<Decimal>,
    pub max: Option<Decimal>,
}

impl PriceRange {
    pub const ALL: PriceRange = PriceRange {
        min: None,
        max: None,
    };

    pub fn between(min: Decimal, max: Decimal) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
        }
    }

    pub fn above(min: Decimal) -> Self {
        Self {
            min: Some(min),
            max: None,
        }
    }

    pub fn is_all(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }

    pub fn contains(&self, price: Decimal) -> bool {
        self.min.map_or(true, |lo| lo < price) && self.max.map_or(true, |hi| price <= hi)
    }
}

impl FromStr for PriceRange {
    type Err = CriteriaError;

    /// Parses the storefront labels: `all`, `0-500`, `500-700`, `700+`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s == ALL {
            return Ok(Self::ALL);
        }
        let invalid = || CriteriaError::InvalidPriceRange(s.to_string());

        if let Some(lo) = s.strip_suffix('+') {
            let lo = lo.trim().parse::<Decimal>().map_err(|_| invalid())?;
            return Ok(Self::above(lo));
        }

        let (lo, hi) = s.split_once('-').ok_or_else(invalid)?;
        let lo = lo.trim().parse::<Decimal>().map_err(|_| invalid())?;
        let hi = hi.trim().parse::<Decimal>().map_err(|_| invalid())?;
        if hi < lo {
            return Err(invalid());
        }
        Ok(Self::between(lo, hi))
    }
}

impl fmt::Display for PriceRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.min, self.max) {
            (None, None) => f.write_str(ALL),
            (Some(lo), None) => write!(f, "{}+", lo),
            (lo, Some(hi)) => write!(f, "{}-{}", lo.unwrap_or(Decimal::ZERO), hi),
        }
    }
}

/// All parameters of one catalog query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterCriteria {
    /// Free-text term; empty matches everything
    pub search: String,
    /// `None` is the `all` selector
    pub category: Option<BikeCategory>,
    /// `None` is the `all` selector
    pub location: Option<String>,
    pub price: PriceRange,
    pub availability: AvailabilityFilter,
    pub favorites_only: bool,
    pub sort: SortKey,
    /// 1-based
    pub page: u32,
    pub page_size: u32,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self {
            search: String::new(),
            category: None,
            location: None,
            price: PriceRange::ALL,
            availability: AvailabilityFilter::All,
            favorites_only: false,
            sort: SortKey::Name,
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl FilterCriteria {
    pub fn with_search(mut self, term: impl Into<String>) -> Self {
        self.search = term.into();
        self
    }

    pub fn with_category(mut self, category: BikeCategory) -> Self {
        self.category = Some(category);
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_price(mut self, price: PriceRange) -> Self {
        self.price = price;
        self
    }

    pub fn with_availability(mut self, availability: AvailabilityFilter) -> Self {
        self.availability = availability;
        self
    }

    pub fn favorites_only(mut self) -> Self {
        self.favorites_only = true;
        self
    }

    pub fn sorted_by(mut self, sort: SortKey) -> Self {
        self.sort = sort;
        self
    }

    pub fn page(mut self, page: u32, page_size: u32) -> Self {
        self.page = page;
        self.page_size = page_size;
        self
    }
}

/// Parse a category selector, where `all` (or empty) means no filter.
pub fn parse_category_selector(s: &str) -> Result<Option<BikeCategory>, CriteriaError> {
    let s = s.trim();
    if s.is_empty() || s.eq_ignore_ascii_case(ALL) {
        return Ok(None);
    }
    s.parse::<BikeCategory>()
        .map(Some)
        .map_err(|_| CriteriaError::UnknownLabel {
            field: "category",
            value: s.to_string(),
        })
}

/// Parse a location selector, where `all` (or empty) means no filter.
pub fn parse_location_selector(s: &str) -> Option<String> {
    let s = s.trim();
    if s.is_empty() || s.eq_ignore_ascii_case(ALL) {
        None
    } else {
        Some(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storefront_price_labels() {
        let under = "0-500".parse::<PriceRange>().unwrap();
        assert!(under.contains(Decimal::from(500)));
        assert!(under.contains(Decimal::from(1)));
        assert!(!under.contains(Decimal::from(501)));

        let mid = "500-700".parse::<PriceRange>().unwrap();
        assert!(!mid.contains(Decimal::from(500)));
        assert!(mid.contains(Decimal::from(700)));

        let over = "700+".parse::<PriceRange>().unwrap();
        assert!(!over.contains(Decimal::from(700)));
        assert!(over.contains(Decimal::from(10_000)));

        assert!("all".parse::<PriceRange>().unwrap().is_all());
    }

    #[test]
    fn malformed_price_labels_are_rejected() {
        assert!("cheap".parse::<PriceRange>().is_err());
        assert!("700-500".parse::<PriceRange>().is_err());
        assert!("10-".parse::<PriceRange>().is_err());
    }

    #[test]
    fn price_range_display_round_trips_labels() {
        for label in ["all", "0-500", "500-700", "700+"] {
            assert_eq!(label.parse::<PriceRange>().unwrap().to_string(), label);
        }
    }

    #[test]
    fn sort_key_accepts_type_alias() {
        assert_eq!("type".parse::<SortKey>(), Ok(SortKey::Category));
        assert_eq!("price_high".parse::<SortKey>(), Ok(SortKey::PriceHigh));
        assert!("rating".parse::<SortKey>().is_err());
    }

    #[test]
    fn availability_selector() {
        let f: AvailabilityFilter = "unavailable".parse().unwrap();
        assert!(f.matches(false));
        assert!(!f.matches(true));
        assert!(AvailabilityFilter::All.matches(false));
    }

    #[test]
    fn all_selectors_mean_no_filter() {
        assert_eq!(parse_category_selector("all"), Ok(None));
        assert_eq!(
            parse_category_selector("Cruiser"),
            Ok(Some(BikeCategory::Cruiser))
        );
        assert!(parse_category_selector("boat").is_err());
        assert_eq!(parse_location_selector("ALL"), None);
        assert_eq!(parse_location_selector("Goa"), Some("Goa".to_string()));
    }

    #[test]
    fn default_criteria_is_first_page_by_name() {
        let c = FilterCriteria::default();
        assert_eq!(c.page, 1);
        assert_eq!(c.page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(c.sort, SortKey::Name);
        assert!(c.price.is_all());
    }
}
