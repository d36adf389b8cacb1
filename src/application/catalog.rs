//! Catalog queries with per-user favorites

use std::collections::HashSet;
use std::sync::Arc;

use tracing::debug;

use crate::domain::{filter_sort_paginate, CatalogPage, DomainResult, FilterCriteria, SourceProvider};

pub struct CatalogService {
    sources: Arc<dyn SourceProvider>,
}

impl CatalogService {
    pub fn new(sources: Arc<dyn SourceProvider>) -> Self {
        Self { sources }
    }

    /// Run one catalog query.
    ///
    /// Favorites are loaded only when the criteria ask for them. A
    /// favorites-only query without a user matches nothing.
    pub async fn query(
        &self,
        criteria: &FilterCriteria,
        user_id: Option<&str>,
    ) -> DomainResult<CatalogPage> {
        let items = self.sources.catalog().list_items().await?;

        let favorites = match (criteria.favorites_only, user_id) {
            (true, Some(user_id)) => self.sources.favorites().ids_for(user_id).await?,
            _ => HashSet::new(),
        };

        let page = filter_sort_paginate(&items, criteria, &favorites);
        metrics::counter!("catalog_queries_total").increment(1);
        debug!(
            catalog_size = items.len(),
            matched = page.total,
            returned = page.items.len(),
            page = page.page,
            "Catalog query"
        );

        Ok(page)
    }
}
