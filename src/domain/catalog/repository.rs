//! Catalog and favorites source interfaces

use std::collections::HashSet;

use async_trait::async_trait;

use super::model::CatalogItem;
use crate::shared::StoreError;

#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// The full catalog. The returned vector is an owned snapshot; later
    /// catalog changes never show through it.
    async fn list_items(&self) -> Result<Vec<CatalogItem>, StoreError>;

    async fn get_item(&self, id: &str) -> Result<Option<CatalogItem>, StoreError>;
}

#[async_trait]
pub trait FavoritesSource: Send + Sync {
    /// Ids of the bikes `user_id` marked as favorite
    async fn ids_for(&self, user_id: &str) -> Result<HashSet<String>, StoreError>;
}
