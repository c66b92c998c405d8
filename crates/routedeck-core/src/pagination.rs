// ── Pagination state ──
//
// Pages are 1-based. Every navigation clamps into [1, total_pages], and
// total_pages is never below 1 so an empty listing still has a page.

use serde::{Deserialize, Serialize};

/// Page sizes offered by the console.
pub const PAGE_SIZE_CHOICES: [u32; 4] = [10, 20, 50, 100];
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// `ceil(total / page_size)`, at least 1.
pub fn total_pages(total: u64, page_size: u32) -> u32 {
    let size = u64::from(page_size.max(1));
    let pages = total.div_ceil(size).max(1);
    u32::try_from(pages).unwrap_or(u32::MAX)
}

pub fn is_offered_page_size(size: u32) -> bool {
    PAGE_SIZE_CHOICES.contains(&size)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    page: u32,
    page_size: u32,
    total: u64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            total: 0,
        }
    }
}

impl Pagination {
    /// Start at `page` with an unknown total. Page 0 becomes 1 and a zero
    /// page size falls back to the default.
    pub fn new(page: u32, page_size: u32) -> Self {
        Self {
            page: page.max(1),
            page_size: if page_size == 0 {
                DEFAULT_PAGE_SIZE
            } else {
                page_size
            },
            total: 0,
        }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn total_pages(&self) -> u32 {
        total_pages(self.total, self.page_size)
    }

    /// Clamp an arbitrary page number into range.
    pub fn clamp(&self, page: u32) -> u32 {
        page.clamp(1, self.total_pages())
    }

    /// Record the server-reported total. The current page is left alone so
    /// a short read does not move the cursor.
    pub fn set_total(&mut self, total: u64) {
        self.total = total;
    }

    pub fn go_to(&mut self, page: u32) {
        self.page = self.clamp(page);
    }

    pub fn next(&mut self) {
        self.go_to(self.page.saturating_add(1));
    }

    pub fn previous(&mut self) {
        self.go_to(self.page.saturating_sub(1));
    }

    /// Change the page size; always returns to page 1.
    pub fn set_page_size(&mut self, page_size: u32) {
        if page_size > 0 {
            self.page_size = page_size;
        }
        self.page = 1;
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages()
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }
}
