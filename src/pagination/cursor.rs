//! Offset pagination cursor

use serde::Serialize;

/// Offset/size/continuation state driving pagination
///
/// `offset` only ever moves forward by whole pages, so it stays a multiple of
/// `page_size`. Once `has_more` drops to `false` it stays there until
/// [`Cursor::reset`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Cursor {
    offset: u32,
    page_size: u32,
    has_more: bool,
}

impl Cursor {
    /// Create a cursor positioned at the first page
    pub fn new(page_size: u32) -> Self {
        Self {
            offset: 0,
            page_size,
            has_more: true,
        }
    }

    /// Record a completed page of `items_received` entries.
    ///
    /// A full page moves the offset forward by one page. Anything shorter,
    /// including an empty page, marks the listing as exhausted and leaves the
    /// offset where it was. So does a full page whose successor offset would
    /// not fit in a `u32`.
    pub fn advance(&mut self, items_received: usize) {
        if self.page_size == 0 || items_received != self.page_size as usize {
            self.has_more = false;
            return;
        }

        match self.offset.checked_add(self.page_size) {
            Some(next) => self.offset = next,
            None => self.has_more = false,
        }
    }

    /// Whether another page may be requested
    pub fn can_fetch_more(&self) -> bool {
        self.has_more
    }

    /// Rewind to the first page and allow fetching again
    pub fn reset(&mut self) {
        self.offset = 0;
        self.has_more = true;
    }

    /// Offset of the next page to request
    pub fn offset(&self) -> u32 {
        self.offset
    }

    /// Fixed number of entries requested per page
    pub fn page_size(&self) -> u32 {
        self.page_size
    }
}
