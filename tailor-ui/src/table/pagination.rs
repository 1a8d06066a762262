//! Page window over the visible rows.

use std::ops::Range;

/// Default number of rows per page.
pub const DEFAULT_PAGE_SIZE: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    page_size: usize,
    /// Zero-based page index.
    page: usize,
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl Pagination {
    /// A page size of zero is treated as one.
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            page: 0,
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn set_page_size(&mut self, page_size: usize) {
        self.page_size = page_size.max(1);
        self.page = 0;
    }

    /// Number of pages for `total` rows. Always at least one.
    pub fn page_count(&self, total: usize) -> usize {
        total.div_ceil(self.page_size).max(1)
    }

    /// Jump to `page`, clamped to the last page.
    pub fn go_to(&mut self, page: usize, total: usize) {
        self.page = page.min(self.page_count(total) - 1);
    }

    pub fn next(&mut self, total: usize) -> bool {
        let before = self.page;
        self.go_to(self.page + 1, total);
        self.page != before
    }

    pub fn previous(&mut self) -> bool {
        let before = self.page;
        self.page = self.page.saturating_sub(1);
        self.page != before
    }

    pub fn first(&mut self) {
        self.page = 0;
    }

    /// Pull the current page back into range after the row count shrank.
    pub fn clamp(&mut self, total: usize) {
        self.go_to(self.page, total);
    }

    /// Index range of the current page within `total` rows.
    pub fn window(&self, total: usize) -> Range<usize> {
        let page = self.page.min(self.page_count(total) - 1);
        let start = (page * self.page_size).min(total);
        let end = (start + self.page_size).min(total);
        start..end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_count() {
        let p = Pagination::new(10);
        assert_eq!(p.page_count(0), 1);
        assert_eq!(p.page_count(10), 1);
        assert_eq!(p.page_count(11), 2);
    }

    #[test]
    fn test_window() {
        let mut p = Pagination::new(10);
        p.go_to(2, 25);
        assert_eq!(p.window(25), 20..25);
    }

    #[test]
    fn test_clamp_after_shrink() {
        let mut p = Pagination::new(5);
        p.go_to(3, 20);
        assert_eq!(p.page(), 3);
        p.clamp(7);
        assert_eq!(p.page(), 1);
        assert_eq!(p.window(7), 5..7);
    }

    #[test]
    fn test_next_stops_at_last_page() {
        let mut p = Pagination::new(5);
        assert!(p.next(8));
        assert!(!p.next(8));
        assert!(p.previous());
        assert!(!p.previous());
    }

    #[test]
    fn test_zero_page_size() {
        let p = Pagination::new(0);
        assert_eq!(p.page_size(), 1);
    }
}
