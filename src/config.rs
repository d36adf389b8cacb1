//! Application configuration
//!
//! Read from a TOML file, by default `~/.config/bike-rental/config.toml`.
//! Every section and field has a default, so a partial file (or no file at
//! all) is a valid configuration.

use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::catalog::DEFAULT_PAGE_SIZE;
use crate::domain::pricing::{
    LateReturnPolicy, PriceOptions, DEFAULT_CURRENCY, DEFAULT_DEPOSIT_FRACTION,
    DEFAULT_LATE_FEE_PER_HOUR, DEFAULT_LATE_RETURN_GRACE_MINUTES, DEFAULT_TAX_RATE,
};

/// Environment variable holding an explicit config path
pub const CONFIG_ENV_VAR: &str = "BIKE_RENTAL_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Default config location: `$XDG_CONFIG_HOME/bike-rental/config.toml`
pub fn default_config_path() -> PathBuf {
    dirs_next::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("bike-rental")
        .join("config.toml")
}

/// `BIKE_RENTAL_CONFIG` if set, otherwise [`default_config_path`]
pub fn resolve_config_path() -> PathBuf {
    std::env::var(CONFIG_ENV_VAR)
        .map(PathBuf::from)
        .unwrap_or_else(|_| default_config_path())
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub catalog: CatalogConfig,
    pub pricing: PricingConfig,
    pub booking: BookingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Seconds to wait for in-flight requests on shutdown
    pub shutdown_timeout: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            shutdown_timeout: 10,
        }
    }
}

impl ServerConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// EnvFilter directive; `RUST_LOG` takes precedence
    pub level: String,
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// JSON catalog loaded into the store at startup
    pub seed_path: Option<PathBuf>,
    pub page_size: u32,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            seed_path: Some(PathBuf::from("data/bikes.json")),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingConfig {
    pub currency: String,
    pub tax_rate: Decimal,
    pub deposits_enabled: bool,
    /// Deposit as a fraction of the per-unit rate
    pub deposit_fraction: Decimal,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            currency: DEFAULT_CURRENCY.to_string(),
            tax_rate: DEFAULT_TAX_RATE,
            deposits_enabled: true,
            deposit_fraction: DEFAULT_DEPOSIT_FRACTION,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BookingConfig {
    pub free_cancellation_hours: i64,
    /// Attempts made by the HTTP adapter for retryable rejections
    pub commit_retry_attempts: u32,
    /// Charged per started hour once a return is past the grace period
    pub late_fee_per_hour: Decimal,
    pub late_return_grace_minutes: i64,
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            free_cancellation_hours: 2,
            commit_retry_attempts: 3,
            late_fee_per_hour: DEFAULT_LATE_FEE_PER_HOUR,
            late_return_grace_minutes: DEFAULT_LATE_RETURN_GRACE_MINUTES,
        }
    }
}

impl AppConfig {
    /// Load from `path`. A missing file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Write the config as TOML, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let io_err = |source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        std::fs::write(path, toml::to_string_pretty(self)?).map_err(io_err)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.catalog.page_size == 0 {
            return Err(ConfigError::Invalid(
                "catalog.page_size must be positive".to_string(),
            ));
        }
        if self.pricing.tax_rate < Decimal::ZERO {
            return Err(ConfigError::Invalid(format!(
                "pricing.tax_rate must not be negative, got {}",
                self.pricing.tax_rate
            )));
        }
        if self.pricing.deposit_fraction < Decimal::ZERO
            || self.pricing.deposit_fraction > Decimal::ONE
        {
            return Err(ConfigError::Invalid(format!(
                "pricing.deposit_fraction must be within [0, 1], got {}",
                self.pricing.deposit_fraction
            )));
        }
        if self.pricing.currency.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "pricing.currency is required".to_string(),
            ));
        }
        if self.booking.free_cancellation_hours < 0 {
            return Err(ConfigError::Invalid(
                "booking.free_cancellation_hours must not be negative".to_string(),
            ));
        }
        if self.booking.late_fee_per_hour < Decimal::ZERO {
            return Err(ConfigError::Invalid(format!(
                "booking.late_fee_per_hour must not be negative, got {}",
                self.booking.late_fee_per_hour
            )));
        }
        if self.booking.late_return_grace_minutes < 0 {
            return Err(ConfigError::Invalid(
                "booking.late_return_grace_minutes must not be negative".to_string(),
            ));
        }
        Ok(())
    }

    pub fn price_options(&self) -> PriceOptions {
        PriceOptions {
            tax_rate: self.pricing.tax_rate,
            deposit_fraction: self
                .pricing
                .deposits_enabled
                .then_some(self.pricing.deposit_fraction),
            currency: self.pricing.currency.clone(),
        }
    }

    pub fn late_return_policy(&self) -> LateReturnPolicy {
        LateReturnPolicy {
            fee_per_hour: self.booking.late_fee_per_hour,
            grace: chrono::Duration::minutes(self.booking.late_return_grace_minutes),
        }
    }
}
