//! Collaborator implementations and catalog seeding

mod memory;
mod seed;

pub use memory::InMemoryStore;
pub use seed::{load_catalog, parse_catalog, CatalogLoadError};
