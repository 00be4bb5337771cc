//! Aggregator state machine
//!
//! All mutation of the cursor, collection and in-flight guard happens here,
//! synchronously. The actor decides when to call in; this type decides what
//! each call means.

use super::types::{
    AggregatorStats, AggregatorStatus, FetchFailure, PageRequest, PageUpdate, Snapshot,
};
use crate::error::Result;
use crate::listing::Page;
use crate::pagination::Cursor;
use std::sync::Arc;

/// Outcome of applying a response to the state
#[derive(Debug, Clone)]
pub enum Completion {
    /// The page was appended and the cursor advanced
    Appended(PageUpdate),
    /// The fetch failed; collection and cursor are unchanged
    Failed(FetchFailure),
    /// The response belongs to an earlier epoch or no longer matches the
    /// in-flight request, and was dropped
    Stale { epoch: u64 },
}

/// Cursor, collection, in-flight guard and epoch of one aggregator
#[derive(Debug, Clone)]
pub struct FetchState {
    cursor: Cursor,
    collection: Snapshot,
    in_flight: Option<PageRequest>,
    epoch: u64,
    stats: AggregatorStats,
}

impl FetchState {
    pub fn new(page_size: u32) -> Self {
        Self {
            cursor: Cursor::new(page_size),
            collection: Arc::new(Vec::new()),
            in_flight: None,
            epoch: 0,
            stats: AggregatorStats::default(),
        }
    }

    /// Claim the fetch guard and describe the next request.
    ///
    /// Returns `None` while a fetch is in flight or once the listing is
    /// exhausted.
    pub fn begin(&mut self) -> Option<PageRequest> {
        if self.in_flight.is_some() || !self.cursor.can_fetch_more() {
            return None;
        }

        let request = PageRequest {
            epoch: self.epoch,
            page_size: self.cursor.page_size(),
            offset: self.cursor.offset(),
        };
        self.in_flight = Some(request);
        self.stats.requests_issued += 1;
        Some(request)
    }

    /// Apply the response to `request`
    pub fn complete(&mut self, request: PageRequest, result: Result<Page>) -> Completion {
        if self.in_flight != Some(request) {
            self.stats.stale_responses += 1;
            return Completion::Stale {
                epoch: request.epoch,
            };
        }
        self.in_flight = None;

        match result {
            Ok(page) => {
                let page_len = page.count();
                Arc::make_mut(&mut self.collection).extend(page.into_items());
                self.cursor.advance(page_len);

                self.stats.pages_appended += 1;
                self.stats.items_received += page_len as u64;

                Completion::Appended(PageUpdate {
                    snapshot: Arc::clone(&self.collection),
                    page_len,
                    offset: request.offset,
                    has_more: self.cursor.can_fetch_more(),
                })
            }
            Err(error) => {
                self.stats.failed_fetches += 1;
                Completion::Failed(FetchFailure::from_error(&error, request.offset))
            }
        }
    }

    /// Drop everything and start over from the first page.
    ///
    /// Any request still in flight becomes stale.
    pub fn reset(&mut self) {
        self.epoch = self.epoch.wrapping_add(1);
        self.in_flight = None;
        self.cursor.reset();
        self.collection = Arc::new(Vec::new());
    }

    pub fn snapshot(&self) -> Snapshot {
        Arc::clone(&self.collection)
    }

    pub fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    pub fn is_fetching(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn stats(&self) -> AggregatorStats {
        self.stats
    }

    pub fn status(&self) -> AggregatorStatus {
        AggregatorStatus {
            snapshot: self.snapshot(),
            cursor: self.cursor,
            fetching: self.is_fetching(),
            epoch: self.epoch,
            stats: self.stats,
        }
    }
}
