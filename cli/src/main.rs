//! Bike rental CLI
//!
//! ```sh
//! # Run the REST service with the default config (~/.config/bike-rental/config.toml)
//! bike-rental serve
//!
//! # Custom config and overrides
//! bike-rental --config /etc/bike-rental/config.toml serve --port 9090 --catalog data/bikes.json
//!
//! # Validate config and catalog without starting
//! bike-rental check
//!
//! # Query the catalog offline
//! bike-rental search --category scooter --price 0-500 --sort price_low
//!
//! # Price a rental offline
//! bike-rental quote --bike 3 --start 2026-03-05T10:00:00Z --end 2026-03-08T10:00:00Z
//! ```

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use tracing::{error, info};

use bike_rental::application::{BookingCoordinator, CatalogService};
use bike_rental::config::AppConfig;
use bike_rental::domain::catalog::{
    parse_category_selector, parse_location_selector, AvailabilityFilter, FilterCriteria,
    PriceRange, SortKey,
};
use bike_rental::domain::RentalWindow;
use bike_rental::server::{build_store, init_tracing, with_catalog_path, ServerHandle};

/// Bike rental storefront: catalog search and reservations.
#[derive(Parser, Debug)]
#[command(name = "bike-rental", version, about)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, env = "BIKE_RENTAL_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Override the seed catalog (JSON).
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the REST service.
    Serve {
        /// Override the listen port.
        #[arg(long)]
        port: Option<u16>,

        /// Override the log level (trace, debug, info, warn, error).
        #[arg(short, long)]
        log_level: Option<String>,
    },

    /// Validate the configuration and seed catalog, then exit.
    Check,

    /// Run one catalog query and print the page as JSON.
    Search {
        /// Free-text term matched against name, category and location.
        #[arg(short, long, default_value = "")]
        query: String,

        #[arg(long, default_value = "all")]
        category: String,

        #[arg(long, default_value = "all")]
        location: String,

        /// `all`, `lo-hi` or `lo+`.
        #[arg(long, default_value = "all")]
        price: String,

        /// `all`, `available` or `unavailable`.
        #[arg(long, default_value = "all")]
        availability: String,

        /// name, price_low, price_high, category or availability.
        #[arg(long, default_value = "name")]
        sort: String,

        #[arg(long, default_value_t = 1)]
        page: u32,
    },

    /// Price a rental window without booking it.
    Quote {
        /// Bike id.
        #[arg(long)]
        bike: String,

        /// Pickup, RFC 3339.
        #[arg(long)]
        start: DateTime<Utc>,

        /// Return, RFC 3339.
        #[arg(long)]
        end: DateTime<Utc>,
    },
}

/// Load the config, apply the log level override, then start tracing.
fn load_config(cli: &Cli, log_level: Option<&str>) -> AppConfig {
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(bike_rental::default_config_path);

    let loaded = AppConfig::load(&config_path);
    let mut config = loaded.as_ref().cloned().unwrap_or_default();
    if let Some(level) = log_level {
        config.logging.level = level.to_string();
    }
    init_tracing(&config);

    match loaded {
        Ok(_) => info!("Configuration loaded from {}", config_path.display()),
        Err(e) => {
            error!("Failed to load config from {}: {}", config_path.display(), e);
            error!("Using default configuration.");
        }
    }

    match &cli.catalog {
        Some(path) => with_catalog_path(config, path),
        None => config,
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match &cli.command {
        Command::Serve { port, log_level } => {
            let mut config = load_config(&cli, log_level.as_deref());
            if let Some(port) = port {
                info!("CLI override: port = {}", port);
                config.server.port = *port;
            }

            let handle = ServerHandle::start(config).await?;
            handle.install_signal_handler();
            info!("Press Ctrl+C to shutdown gracefully.");

            handle.shutdown_signal().wait().await;
            handle.wait().await;
        }

        Command::Check => {
            let config = load_config(&cli, None);
            config.validate()?;
            let store = build_store(&config)?;

            println!("Configuration is valid");
            println!("   Address      : {}", config.server.address());
            println!("   Log level    : {}", config.logging.level);
            println!(
                "   Catalog      : {} ({} bikes)",
                config
                    .catalog
                    .seed_path
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "none".to_string()),
                store.item_count()
            );
            println!("   Page size    : {}", config.catalog.page_size);
            println!(
                "   Pricing      : tax {} / deposit {} / {}",
                config.pricing.tax_rate,
                if config.pricing.deposits_enabled {
                    config.pricing.deposit_fraction.to_string()
                } else {
                    "off".to_string()
                },
                config.pricing.currency
            );
            println!(
                "   Cancellation : free up to {}h before pickup",
                config.booking.free_cancellation_hours
            );
        }

        Command::Search {
            query,
            category,
            location,
            price,
            availability,
            sort,
            page,
        } => {
            let config = load_config(&cli, None);
            let store = build_store(&config)?;
            let service = CatalogService::new(store);

            let mut criteria = FilterCriteria::default()
                .with_search(query.clone())
                .with_price(price.parse::<PriceRange>()?)
                .with_availability(availability.parse::<AvailabilityFilter>()?)
                .sorted_by(sort.parse::<SortKey>()?)
                .page(*page, config.catalog.page_size);
            if let Some(category) = parse_category_selector(category)? {
                criteria = criteria.with_category(category);
            }
            if let Some(location) = parse_location_selector(location) {
                criteria = criteria.with_location(location);
            }

            let result = service.query(&criteria, None).await?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }

        Command::Quote { bike, start, end } => {
            let config = load_config(&cli, None);
            let store = build_store(&config)?;
            let coordinator = BookingCoordinator::new(store, config.price_options());

            let window = RentalWindow::new(*start, *end)?;
            let quote = coordinator.quote(bike, &window).await?;
            println!("{}", serde_json::to_string_pretty(&quote)?);
            println!(
                "Total: {} ({} {} x {})",
                quote.price.format_total(),
                quote.price.units,
                quote.rate_unit,
                quote.price.format_amount(quote.price.rate)
            );
        }
    }

    Ok(())
}
