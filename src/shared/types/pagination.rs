use serde::Serialize;

/// One page of a larger, already ordered result set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaginatedResult<T> {
    pub items: Vec<T>,
    /// Number of items across all pages
    pub total: usize,
    /// 1-based page number that was requested
    pub page: u32,
    pub page_size: u32,
    pub total_pages: u32,
}

impl<T> PaginatedResult<T> {
    pub fn new(items: Vec<T>, total: usize, page: u32, page_size: u32) -> Self {
        let total_pages = if page_size == 0 {
            0
        } else {
            total.div_ceil(page_size as usize) as u32
        };
        Self {
            items,
            total,
            page,
            page_size,
            total_pages,
        }
    }
}

/// Slice `[ (page-1)*page_size, page*page_size )` out of `items`.
///
/// Page 0, a zero page size and pages past the end all yield an empty page.
pub fn page_bounds(len: usize, page: u32, page_size: u32) -> std::ops::Range<usize> {
    if page == 0 || page_size == 0 {
        return 0..0;
    }
    let size = page_size as usize;
    let start = (page as usize - 1).saturating_mul(size);
    if start >= len {
        return 0..0;
    }
    let end = start.saturating_add(size).min(len);
    start..end
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_pages_rounds_up() {
        let page: PaginatedResult<u8> = PaginatedResult::new(vec![], 25, 1, 12);
        assert_eq!(page.total_pages, 3);
        let page: PaginatedResult<u8> = PaginatedResult::new(vec![], 24, 1, 12);
        assert_eq!(page.total_pages, 2);
        let page: PaginatedResult<u8> = PaginatedResult::new(vec![], 0, 1, 12);
        assert_eq!(page.total_pages, 0);
    }

    #[test]
    fn bounds_cover_last_partial_page() {
        assert_eq!(page_bounds(25, 1, 12), 0..12);
        assert_eq!(page_bounds(25, 3, 12), 24..25);
    }

    #[test]
    fn out_of_range_pages_are_empty() {
        assert!(page_bounds(25, 0, 12).is_empty());
        assert!(page_bounds(25, 4, 12).is_empty());
        assert!(page_bounds(25, u32::MAX, 12).is_empty());
        assert!(page_bounds(25, 1, 0).is_empty());
    }
}
