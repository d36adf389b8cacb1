//! Server runtime shared by both binaries.
//!
//! [`ServerHandle`] owns the whole lifecycle: metrics recorder, catalog
//! seeding, application services, the HTTP listener and graceful shutdown.

use std::net::SocketAddr;
use std::path::Path;
use std::sync::{Arc, OnceLock};

use chrono::Duration;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use thiserror::Error;
use tracing::{error, info, warn};

use crate::application::{create_event_bus, BookingCoordinator, CatalogService, SharedEventBus};
use crate::config::{AppConfig, ConfigError};
use crate::infrastructure::{load_catalog, CatalogLoadError, InMemoryStore};
use crate::interfaces::http::{create_api_router, AppState};
use crate::shared::shutdown::{ShutdownCoordinator, ShutdownSignal};
use crate::shared::RetryConfig;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Catalog(#[from] CatalogLoadError),

    #[error("Failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },
}

/// Initialize tracing from the logging section.
///
/// `RUST_LOG` wins over the configured level. Call once per process.
pub fn init_tracing(config: &AppConfig) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level));

    if config.logging.json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

/// The process-wide Prometheus handle.
///
/// The global recorder can only be installed once; later calls reuse it.
/// If another recorder is already installed, metrics still render from a
/// detached recorder so `/metrics` keeps answering.
pub fn prometheus_handle() -> PrometheusHandle {
    static HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

    HANDLE
        .get_or_init(|| match PrometheusBuilder::new().install_recorder() {
            Ok(handle) => {
                info!("Prometheus metrics recorder installed");
                handle
            }
            Err(e) => {
                warn!(error = %e, "Could not install Prometheus recorder, using a detached one");
                PrometheusBuilder::new().build_recorder().handle()
            }
        })
        .clone()
}

/// Build the store, loading the configured seed catalog.
///
/// A configured but missing seed file leaves the catalog empty; a present
/// but invalid one is an error.
pub fn build_store(config: &AppConfig) -> Result<Arc<InMemoryStore>, ServerError> {
    let store = match config.catalog.seed_path.as_deref() {
        Some(path) if path.exists() => InMemoryStore::with_catalog(load_catalog(path)?),
        Some(path) => {
            warn!(path = %path.display(), "Seed catalog not found, starting with an empty catalog");
            InMemoryStore::new()
        }
        None => InMemoryStore::new(),
    };
    Ok(Arc::new(store))
}

/// Wire the application services over `store`.
pub fn build_state(config: &AppConfig, store: Arc<InMemoryStore>, event_bus: SharedEventBus) -> AppState {
    let catalog = Arc::new(CatalogService::new(store.clone()));
    let bookings = Arc::new(
        BookingCoordinator::new(store, config.price_options())
            .with_free_cancellation(Duration::hours(config.booking.free_cancellation_hours))
            .with_late_return(config.late_return_policy())
            .with_event_bus(event_bus),
    );

    AppState {
        catalog,
        bookings,
        page_size: config.catalog.page_size,
        booking_retry: RetryConfig::with_attempts(config.booking.commit_retry_attempts),
    }
}

/// Override the seed catalog path, e.g. from a CLI flag.
pub fn with_catalog_path(mut config: AppConfig, path: &Path) -> AppConfig {
    config.catalog.seed_path = Some(path.to_path_buf());
    config
}

/// Handle to a running server.
pub struct ServerHandle {
    pub store: Arc<InMemoryStore>,
    pub event_bus: SharedEventBus,
    pub config: AppConfig,
    pub local_addr: SocketAddr,

    shutdown: ShutdownCoordinator,
    api_task: tokio::task::JoinHandle<()>,
}

impl ServerHandle {
    /// Validate the config, seed the store, bind and start serving.
    pub async fn start(config: AppConfig) -> Result<Self, ServerError> {
        config.validate()?;
        info!("Starting bike rental service...");

        let prometheus = prometheus_handle();
        let store = build_store(&config)?;
        info!(bikes = store.item_count(), "Catalog ready");

        let event_bus = create_event_bus();
        let state = build_state(&config, store.clone(), event_bus.clone());
        let router = create_api_router(state, prometheus);

        let address = config.server.address();
        let listener = tokio::net::TcpListener::bind(&address)
            .await
            .map_err(|source| ServerError::Bind {
                address: address.clone(),
                source,
            })?;
        let local_addr = listener.local_addr().map_err(|source| ServerError::Bind {
            address: address.clone(),
            source,
        })?;
        info!("REST API listening on http://{}", local_addr);

        let shutdown = ShutdownCoordinator::new(config.server.shutdown_timeout);
        let api_shutdown = shutdown.signal();
        let api_task = tokio::spawn(async move {
            let server = axum::serve(listener, router).with_graceful_shutdown(async move {
                api_shutdown.wait().await;
                info!("REST API received shutdown signal");
            });
            if let Err(e) = server.await {
                error!("REST API server error: {}", e);
            }
        });

        Ok(Self {
            store,
            event_bus,
            config,
            local_addr,
            shutdown,
            api_task,
        })
    }

    pub fn shutdown_signal(&self) -> ShutdownSignal {
        self.shutdown.signal()
    }

    /// Install SIGTERM/SIGINT listeners that trigger shutdown.
    pub fn install_signal_handler(&self) {
        self.shutdown.start_signal_listener();
    }

    pub fn trigger_shutdown(&self) {
        self.shutdown.signal().trigger();
    }

    /// Wait for the server to stop, bounded by `server.shutdown_timeout`.
    pub async fn wait(self) {
        let api_task = self.api_task;
        let finished = self
            .shutdown
            .shutdown_with_cleanup(|| async move {
                if let Err(e) = api_task.await {
                    error!("REST API task panicked: {}", e);
                }
            })
            .await;

        if finished {
            info!("Bike rental service shutdown complete");
        } else {
            warn!("Bike rental service stopped with requests still in flight");
        }
    }

    /// Trigger shutdown and wait for completion.
    pub async fn shutdown(self) {
        self.trigger_shutdown();
        self.wait().await;
    }

    pub fn is_running(&self) -> bool {
        !self.api_task.is_finished()
    }
}
