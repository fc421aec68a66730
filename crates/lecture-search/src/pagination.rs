//! Pagination info reported by the listing API.

use serde::{Deserialize, Serialize};

/// Pagination block of a listing response.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PaginationInfo {
    /// Current page (1-indexed).
    pub current_page: u32,
    /// Total number of pages. The API reports 0 for an empty result set.
    pub total_pages: u32,
    /// Total number of matching lectures.
    pub total_count: u64,
    /// Items per page.
    pub per_page: u32,
}

impl PaginationInfo {
    /// Build pagination info from a page number and totals.
    pub fn new(current_page: u32, per_page: u32, total_count: u64) -> Self {
        let total_pages = if per_page == 0 {
            0
        } else {
            total_count.div_ceil(per_page as u64) as u32
        };

        Self {
            current_page,
            total_pages,
            total_count,
            per_page,
        }
    }

    /// Highest page a user may navigate to. Never below 1.
    pub fn last_page(&self) -> u32 {
        self.total_pages.max(1)
    }

    /// Whether `page` is in `[1, last_page]`.
    pub fn contains(&self, page: u32) -> bool {
        (1..=self.last_page()).contains(&page)
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }

    pub fn has_prev(&self) -> bool {
        self.current_page > 1
    }

    /// Page numbers for a pager window centred on the current page.
    pub fn page_numbers(&self, max_visible: usize) -> Vec<u32> {
        let last = self.last_page();
        if max_visible == 0 {
            return Vec::new();
        }
        if last as usize <= max_visible {
            return (1..=last).collect();
        }

        // A current page past the end pins the window to the last page.
        let current = self.current_page.clamp(1, last);
        let window = max_visible as u32;
        let half = window / 2;
        let start = current.saturating_sub(half).max(1);
        let end = start.saturating_add(window - 1).min(last);
        let start = (end + 1).saturating_sub(window).max(1);

        (start..=end).collect()
    }

    /// 1-indexed position of the first item on this page, or 0 when empty.
    pub fn start_item(&self) -> u64 {
        if self.total_count == 0 {
            0
        } else {
            (self.current_page.saturating_sub(1) as u64) * self.per_page as u64 + 1
        }
    }

    /// 1-indexed position of the last item on this page.
    pub fn end_item(&self) -> u64 {
        (self.current_page as u64 * self.per_page as u64).min(self.total_count)
    }
}
