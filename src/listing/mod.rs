//! Remote listing module
//!
//! The listing client fetches one page of servers per call. The aggregator
//! only depends on the [`ListingClient`] trait; [`HttpListingClient`] is the
//! production implementation over HTTP.

mod client;
mod types;

pub use client::{HttpListingClient, ListingClient};
pub use types::{Page, ServerEntry, UNKNOWN_COUNTRY};
