//! Pagination utilities for repository listings
//!
//! Provides a simple `Pagination` struct, helpers to normalize inputs and the `Page` result.

/// Pagination parameters
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pagination {
    /// 1-based page index
    pub page: u32,
    /// items per page
    pub per_page: u32,
}

pub const MAX_PER_PAGE: u32 = 100;

impl Pagination {
    /// Clamp to sane defaults and convert to a 0-based `u64` index and page size
    pub fn normalize(self) -> (u64, u64) {
        let page = if self.page == 0 { 1 } else { self.page };
        let per_page = self.per_page.clamp(1, MAX_PER_PAGE);
        ((page - 1) as u64, per_page as u64)
    }
}

impl Default for Pagination {
    fn default() -> Self { Self { page: 1, per_page: 20 } }
}

/// One page of an ordered listing.
#[derive(Clone, Debug, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-based, after normalization
    pub page: u32,
    pub per_page: u32,
    pub total_items: u64,
    pub total_pages: u64,
}

impl<T> Page<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            per_page: self.per_page,
            total_items: self.total_items,
            total_pages: self.total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_zero_reads_as_first_page() {
        assert_eq!(Pagination { page: 0, per_page: 5 }.normalize(), Pagination { page: 1, per_page: 5 }.normalize());
    }

    #[test]
    fn per_page_stays_within_bounds() {
        assert_eq!(Pagination { page: 3, per_page: 0 }.normalize(), (2, 1));
        assert_eq!(Pagination { page: 3, per_page: MAX_PER_PAGE + 1 }.normalize(), (2, MAX_PER_PAGE as u64));
        assert_eq!(Pagination::default().normalize(), (0, 20));
    }

    #[test]
    fn map_keeps_counters() {
        let p = Page { items: vec![1, 2], page: 2, per_page: 2, total_items: 4, total_pages: 2 };
        let q = p.map(|x| x * 10);
        assert_eq!(q.items, vec![10, 20]);
        assert_eq!(q.total_items, 4);
        assert_eq!(q.page, 2);
    }
}
