//! Filter, sort and paginate a catalog snapshot.
//!
//! The pipeline is a pure function of its inputs. Stages run in a fixed
//! order, each narrowing the previous result:
//!
//! 1. free text over name, category tag and location
//! 2. category
//! 3. location
//! 4. price band
//! 5. availability flag
//! 6. favorites
//! 7. sort (ties broken by id, ascending)
//! 8. page slice

use std::cmp::Ordering;
use std::collections::HashSet;

use super::criteria::{FilterCriteria, SortKey};
use super::model::CatalogItem;
use crate::shared::{page_bounds, PaginatedResult};

/// Page of catalog items plus the number of items that matched the filters.
pub type CatalogPage = PaginatedResult<CatalogItem>;

/// Run the catalog pipeline over `items`.
///
/// `favorites` is only consulted when `criteria.favorites_only` is set; an
/// empty set then matches nothing.
pub fn filter_sort_paginate(
    items: &[CatalogItem],
    criteria: &FilterCriteria,
    favorites: &HashSet<String>,
) -> CatalogPage {
    let term = criteria.search.to_lowercase();

    let mut matched: Vec<&CatalogItem> = items
        .iter()
        .filter(|item| matches_text(item, &term))
        .filter(|item| criteria.category.map_or(true, |c| item.category == c))
        .filter(|item| {
            criteria
                .location
                .as_deref()
                .map_or(true, |loc| item.location == loc)
        })
        .filter(|item| criteria.price.contains(item.rate))
        .filter(|item| criteria.availability.matches(item.available))
        .filter(|item| !criteria.favorites_only || favorites.contains(&item.id))
        .collect();

    matched.sort_by(|a, b| compare(a, b, criteria.sort).then_with(|| a.id.cmp(&b.id)));

    let total = matched.len();
    let range = page_bounds(total, criteria.page, criteria.page_size);
    let page_items = matched[range].iter().map(|item| (*item).clone()).collect();

    PaginatedResult::new(page_items, total, criteria.page, criteria.page_size)
}

fn matches_text(item: &CatalogItem, term: &str) -> bool {
    term.is_empty()
        || item.name.to_lowercase().contains(term)
        || item.category.as_str().to_lowercase().contains(term)
        || item.location.to_lowercase().contains(term)
}

fn compare(a: &CatalogItem, b: &CatalogItem, key: SortKey) -> Ordering {
    match key {
        SortKey::Name => a.name.cmp(&b.name),
        SortKey::PriceLow => a.rate.cmp(&b.rate),
        SortKey::PriceHigh => b.rate.cmp(&a.rate),
        SortKey::Category => a.category.as_str().cmp(b.category.as_str()),
        // available first
        SortKey::Availability => b.available.cmp(&a.available),
    }
}
