//! Page/index navigation state machine.
//!
//! Two flavors of transition operate on the same `(page, index)` state:
//!
//! - fixed-domain transitions for live results, where the neighboring page's
//!   count is not yet known (a previous page is assumed full and the index is
//!   re-clamped once the real count arrives), and
//! - count-aware transitions for the favorites list, whose full length is
//!   always known and whose pages are frequently partial.
//!
//! All bounds maintenance funnels through [`Pager::reclamp`] so the clamping
//! arithmetic exists in exactly one place.

/// Articles per page, fixed by the upstream request limit.
pub const PAGE_SIZE: usize = 3;

/// Current `(page, index)` position. Pages are 1-based, the index is the
/// 0-based position of the displayed article within its page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pager {
    pub page: u32,
    pub index: usize,
}

impl Default for Pager {
    fn default() -> Self {
        Pager { page: 1, index: 0 }
    }
}

/// First list offset covered by `page`.
pub fn page_start(page: u32) -> usize {
    (page.saturating_sub(1) as usize) * PAGE_SIZE
}

/// Number of items actually on `page` for a list of `total` items.
pub fn page_count(total: usize, page: u32) -> usize {
    total.saturating_sub(page_start(page)).min(PAGE_SIZE)
}

/// Highest valid page for a list of `total` items; never below 1.
pub fn max_page(total: usize) -> u32 {
    (total.div_ceil(PAGE_SIZE) as u32).max(1)
}

/// The slice of `items` covered by `page`.
pub fn page_slice<T>(items: &[T], page: u32) -> &[T] {
    let start = page_start(page).min(items.len());
    let end = (start + PAGE_SIZE).min(items.len());
    &items[start..end]
}

impl Pager {
    pub fn reset(&mut self) {
        *self = Pager::default();
    }

    /// Jump to `(1, 0)`; resets the index even when already on page 1.
    pub fn first(&mut self) {
        self.reset();
    }

    /// Direct jump to one of the up-to-three positions on the current page.
    pub fn dot_select(&mut self, i: usize) {
        self.index = i.min(PAGE_SIZE - 1);
    }

    /// Fixed-domain forward step. Returns true when the page changed.
    pub fn advance(&mut self) -> bool {
        if self.index < PAGE_SIZE - 1 {
            self.index += 1;
            false
        } else {
            self.page += 1;
            self.index = 0;
            true
        }
    }

    /// Fixed-domain backward step. Lands on index 2 of the previous page,
    /// assuming it is full; re-clamp once the page's count is known.
    /// Returns true when the page changed.
    pub fn retreat(&mut self) -> bool {
        if self.index > 0 {
            self.index -= 1;
            false
        } else if self.page > 1 {
            self.page -= 1;
            self.index = PAGE_SIZE - 1;
            true
        } else {
            false
        }
    }

    /// Count-aware forward step over a list of `total` items. Stops at the
    /// last item of the last page.
    pub fn advance_within(&mut self, total: usize) {
        let count = page_count(total, self.page);
        if self.index + 1 < count {
            self.index += 1;
        } else if self.page < max_page(total) {
            self.page += 1;
            self.index = 0;
        }
    }

    /// Count-aware backward step; lands on the last actual item of the
    /// previous page, which may be partial.
    pub fn retreat_within(&mut self, total: usize) {
        if self.index > 0 {
            self.index -= 1;
        } else if self.page > 1 {
            self.page -= 1;
            self.index = page_count(total, self.page).saturating_sub(1);
        }
    }

    /// Re-derive the position after the underlying list changed size.
    /// An empty list resets to `(1, 0)`.
    pub fn reclamp(&mut self, total: usize) {
        if total == 0 {
            self.reset();
            return;
        }
        self.page = self.page.min(max_page(total));
        self.index = self
            .index
            .min(page_count(total, self.page).saturating_sub(1));
    }

    /// Clamp only the index to a known count for the current page.
    /// A count of zero resets the index to 0.
    pub fn clamp_index(&mut self, count: usize) {
        self.index = self.index.min(count.saturating_sub(1));
    }
}
