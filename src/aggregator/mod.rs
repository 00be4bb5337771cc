//! Fetch aggregator module
//!
//! Incrementally pages through the remote listing and republishes the growing
//! collection after every page.
//!
//! # Overview
//!
//! - [`FetchState`] - synchronous state machine: cursor, collection, in-flight
//!   guard and reset epoch
//! - [`Aggregator`] - tokio task that owns a `FetchState` and drives a
//!   [`ListingClient`](crate::listing::ListingClient)
//! - [`AggregatorHandle`] - cloneable front end: `request_more`, `reset`,
//!   `snapshot`
//! - [`SnapshotConsumer`] - sink notified once per appended page
//!
//! Requests are strictly serialized: while a page is in flight,
//! `request_more()` does nothing. Responses that were requested before the
//! latest `reset()` are discarded.

mod actor;
mod consumer;
mod state;
mod types;

pub use actor::{Aggregator, AggregatorHandle};
pub use consumer::{ChannelConsumer, NoopConsumer, SnapshotConsumer};
pub use state::{Completion, FetchState};
pub use types::{
    AggregatorEvent, AggregatorStats, AggregatorStatus, FetchFailure, PageRequest, PageUpdate,
    Snapshot,
};
