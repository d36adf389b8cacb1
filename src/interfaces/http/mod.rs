//! HTTP REST API
//!
//! - `common`: response envelope, error mapping, validated JSON extractor
//! - `modules`: handlers and DTOs per resource, plus request middleware
//! - `router`: route table

pub mod common;
pub mod modules;
pub mod router;
pub mod state;

pub use common::{ApiError, ApiResponse, ValidatedJson};
pub use router::create_api_router;
pub use state::AppState;
