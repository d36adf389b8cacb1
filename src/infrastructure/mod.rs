//! Infrastructure layer - external concerns

pub mod storage;

pub use storage::{load_catalog, parse_catalog, CatalogLoadError, InMemoryStore};
