//! Offset pagination over an in-memory list.

use serde::Serialize;

/// Page window over a filtered list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Pagination {
    /// Current page, 1-based and clamped into range.
    pub page: usize,
    /// Number of pages; at least 1 so an empty list still renders a page.
    pub total_pages: usize,
    /// Number of items across all pages.
    pub total_items: usize,
    pub page_size: usize,
}

impl Pagination {
    /// Compute the window for `requested` (1-based, clamped).
    #[must_use]
    pub fn new(total_items: usize, requested: usize, page_size: usize) -> Self {
        let page_size = page_size.max(1);
        let total_pages = total_items.div_ceil(page_size).max(1);
        Self {
            page: requested.clamp(1, total_pages),
            total_pages,
            total_items,
            page_size,
        }
    }

    /// Index range of the current page within the list.
    #[must_use]
    pub fn range(&self) -> std::ops::Range<usize> {
        let start = (self.page - 1) * self.page_size;
        let end = (start + self.page_size).min(self.total_items);
        start.min(end)..end
    }

    /// 1-based number of the first shown item (0 when empty).
    #[must_use]
    pub fn first_item(&self) -> usize {
        if self.total_items == 0 {
            0
        } else {
            self.range().start + 1
        }
    }

    /// 1-based number of the last shown item.
    #[must_use]
    pub fn last_item(&self) -> usize {
        self.range().end
    }

    /// "Showing X to Y of Z entries".
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "Showing {} to {} of {} entries",
            self.first_item(),
            self.last_item(),
            self.total_items
        )
    }

    #[must_use]
    pub const fn has_previous(&self) -> bool {
        self.page > 1
    }

    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    #[must_use]
    pub const fn previous(&self) -> usize {
        self.page.saturating_sub(1)
    }

    #[must_use]
    pub const fn next(&self) -> usize {
        self.page + 1
    }

    /// All page numbers, for the page links.
    #[must_use]
    pub fn pages(&self) -> Vec<usize> {
        (1..=self.total_pages).collect()
    }

    /// Slice the current page out of `items`.
    #[must_use]
    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        items.get(self.range()).unwrap_or(&[])
    }
}
