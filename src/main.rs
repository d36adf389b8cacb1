//! Bike rental REST service.
//!
//! Reads configuration from `BIKE_RENTAL_CONFIG` or
//! `~/.config/bike-rental/config.toml`.

use tracing::{error, info};

use bike_rental::config::AppConfig;
use bike_rental::resolve_config_path;
use bike_rental::server::{init_tracing, ServerHandle};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = resolve_config_path();
    let config = match AppConfig::load(&config_path) {
        Ok(cfg) => {
            init_tracing(&cfg);
            info!("Configuration loaded from {}", config_path.display());
            cfg
        }
        Err(e) => {
            let cfg = AppConfig::default();
            init_tracing(&cfg);
            error!("Failed to load config from {}: {}. Using defaults.", config_path.display(), e);
            cfg
        }
    };

    let handle = ServerHandle::start(config).await?;
    handle.install_signal_handler();
    info!("Press Ctrl+C to shutdown gracefully.");

    handle.shutdown_signal().wait().await;
    handle.wait().await;

    Ok(())
}
