//! Aggregator types
//!
//! Snapshots, notifications and statistics published by the aggregator.

use crate::error::{Error, ErrorKind};
use crate::listing::ServerEntry;
use crate::pagination::Cursor;
use std::sync::Arc;

/// The full ordered collection as of the last completed page
pub type Snapshot = Arc<Vec<ServerEntry>>;

/// A page request handed to the listing client
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// Reset generation this request belongs to
    pub epoch: u64,
    pub page_size: u32,
    pub offset: u32,
}

/// Notification sent after a page has been appended
#[derive(Debug, Clone)]
pub struct PageUpdate {
    /// Everything received so far, in arrival order
    pub snapshot: Snapshot,
    /// Number of entries the page contributed
    pub page_len: usize,
    /// Offset the page was requested at
    pub offset: u32,
    /// Whether another page may exist
    pub has_more: bool,
}

impl PageUpdate {
    /// Entries contributed by this page (the tail of the snapshot)
    pub fn new_items(&self) -> &[ServerEntry] {
        let start = self.snapshot.len().saturating_sub(self.page_len);
        &self.snapshot[start..]
    }
}

/// A fetch that did not produce a page
#[derive(Debug, Clone)]
pub struct FetchFailure {
    pub kind: ErrorKind,
    pub message: String,
    /// Offset of the failed request; the next attempt reuses it
    pub offset: u32,
}

impl FetchFailure {
    pub fn from_error(error: &Error, offset: u32) -> Self {
        Self {
            kind: error.kind(),
            message: error.to_string(),
            offset,
        }
    }
}

impl std::fmt::Display for FetchFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} error at offset {}: {}",
            self.kind, self.offset, self.message
        )
    }
}

impl From<FetchFailure> for Error {
    fn from(failure: FetchFailure) -> Self {
        Error::FetchFailed {
            kind: failure.kind,
            offset: failure.offset,
            message: failure.message,
        }
    }
}

/// Everything a [`ChannelConsumer`](super::ChannelConsumer) forwards
#[derive(Debug, Clone)]
pub enum AggregatorEvent {
    /// A page was appended
    PageAppended(PageUpdate),
    /// A fetch failed; nothing changed
    FetchFailed(FetchFailure),
    /// The collection was cleared
    Reset,
}

impl AggregatorEvent {
    pub fn is_page(&self) -> bool {
        matches!(self, Self::PageAppended(_))
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Self::FetchFailed(_))
    }
}

/// Counters kept across resets
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AggregatorStats {
    pub requests_issued: u64,
    pub pages_appended: u64,
    pub items_received: u64,
    pub failed_fetches: u64,
    pub stale_responses: u64,
}

/// Point-in-time view of the aggregator, published after every change
#[derive(Debug, Clone)]
pub struct AggregatorStatus {
    pub snapshot: Snapshot,
    pub cursor: Cursor,
    /// A fetch is in flight
    pub fetching: bool,
    pub epoch: u64,
    pub stats: AggregatorStats,
}

impl AggregatorStatus {
    pub fn has_more(&self) -> bool {
        self.cursor.can_fetch_more()
    }

    pub fn offset(&self) -> u32 {
        self.cursor.offset()
    }

    /// No fetch in flight and no more pages to request
    pub fn is_exhausted(&self) -> bool {
        !self.fetching && !self.has_more()
    }
}
