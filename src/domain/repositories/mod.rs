//! Collaborator access for the application layer
//!
//! `SourceProvider` bundles the per-aggregate sources so services take a
//! single handle and ask for only what they need:
//!
//! ```ignore
//! async fn handle(sources: &dyn SourceProvider) {
//!     let bike = sources.catalog().get_item("bike-1").await?;
//!     let held = sources.reservations().active_reservations_for("bike-1").await?;
//! }
//! ```

use super::catalog::{CatalogSource, FavoritesSource};
use super::reservation::ReservationSource;

pub trait SourceProvider: Send + Sync {
    fn catalog(&self) -> &dyn CatalogSource;
    fn reservations(&self) -> &dyn ReservationSource;
    fn favorites(&self) -> &dyn FavoritesSource;
}
