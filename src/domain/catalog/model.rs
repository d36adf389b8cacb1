//! Catalog entities

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Category tag of a bike. The set is fixed by the storefront.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BikeCategory {
    Scooter,
    Sports,
    Cruiser,
    Street,
    #[serde(rename = "Electric Scooter", alias = "ElectricScooter")]
    ElectricScooter,
    Commuter,
}

impl BikeCategory {
    pub const ALL: [BikeCategory; 6] = [
        Self::Scooter,
        Self::Sports,
        Self::Cruiser,
        Self::Street,
        Self::ElectricScooter,
        Self::Commuter,
    ];

    /// The tag as shown in the catalog; also the key for sorting and text search.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Scooter => "Scooter",
            Self::Sports => "Sports",
            Self::Cruiser => "Cruiser",
            Self::Street => "Street",
            Self::ElectricScooter => "Electric Scooter",
            Self::Commuter => "Commuter",
        }
    }
}

impl fmt::Display for BikeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BikeCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| !matches!(c, ' ' | '_' | '-'))
            .flat_map(char::to_lowercase)
            .collect();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().replace(' ', "").to_lowercase() == normalized)
            .ok_or_else(|| format!("unknown category '{}'", s))
    }
}

/// Billing unit of a catalog rate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RateUnit {
    Hour,
    #[default]
    Day,
}

impl RateUnit {
    pub fn seconds(&self) -> i64 {
        match self {
            Self::Hour => 3_600,
            Self::Day => 86_400,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hour => "hour",
            Self::Day => "day",
        }
    }
}

impl fmt::Display for RateUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A rentable bike as published in one catalog snapshot.
///
/// The `available` flag is advisory: it only drives catalog filtering.
/// Whether a bike can actually be booked for a window is always derived
/// from its active reservations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct CatalogItem {
    #[validate(length(min = 1, message = "id is required"))]
    pub id: String,
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    pub category: BikeCategory,
    /// Price per `rate_unit`, in whole currency units
    #[validate(custom(function = "validate_positive_rate"))]
    pub rate: Decimal,
    #[serde(default)]
    pub rate_unit: RateUnit,
    pub location: String,
    #[serde(default = "default_available")]
    pub available: bool,
    #[validate(range(min = 0.0, max = 5.0, message = "rating must be between 0 and 5"))]
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub review_count: u32,
    #[serde(default)]
    pub features: BTreeSet<String>,
    #[serde(default)]
    pub is_electric: bool,
    /// Battery charge in percent, electric bikes only
    #[validate(range(max = 100, message = "battery_level must be 0-100"))]
    #[serde(default)]
    pub battery_level: Option<u8>,
}

fn default_available() -> bool {
    true
}

fn validate_positive_rate(rate: &Decimal) -> Result<(), ValidationError> {
    if rate.is_sign_positive() && !rate.is_zero() {
        Ok(())
    } else {
        let mut err = ValidationError::new("positive_rate");
        err.message = Some("rate must be positive".into());
        Err(err)
    }
}

impl CatalogItem {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        category: BikeCategory,
        rate: Decimal,
        location: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category,
            rate,
            rate_unit: RateUnit::Day,
            location: location.into(),
            available: true,
            rating: 0.0,
            review_count: 0,
            features: BTreeSet::new(),
            is_electric: category == BikeCategory::ElectricScooter,
            battery_level: None,
        }
    }

    pub fn with_availability(mut self, available: bool) -> Self {
        self.available = available;
        self
    }

    pub fn with_rate_unit(mut self, unit: RateUnit) -> Self {
        self.rate_unit = unit;
        self
    }
}
