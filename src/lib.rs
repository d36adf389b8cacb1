//! # Bike Rental Service
//!
//! Catalog search and reservation engine for a bike rental storefront.
//!
//! ## Architecture
//!
//! The project follows Clean Architecture principles:
//!
//! - **domain**: catalog, pricing and reservation entities, the pure
//!   filter/sort/paginate pipeline, the overlap rule and collaborator traits
//! - **application**: `CatalogService`, the `BookingCoordinator` state
//!   machine and the booking event bus
//! - **infrastructure**: in-memory store and JSON catalog seeding
//! - **interfaces**: REST API (axum)
//! - **shared**: error taxonomy, pagination, retry, shutdown
//! - **config** / **server**: TOML configuration and process bootstrap

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod server;
pub mod shared;

pub use config::{default_config_path, resolve_config_path, AppConfig};

pub use application::{
    create_event_bus, BookingCoordinator, BookingRejection, BookingRequest, CatalogService, Event,
    EventBus, SharedEventBus,
};
pub use infrastructure::InMemoryStore;
pub use interfaces::http::create_api_router;
