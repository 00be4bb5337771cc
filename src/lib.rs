// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # Server Browser
//!
//! Incremental, paginated fetching of a remote game server listing.
//!
//! A [`aggregator::Aggregator`] owns the pagination cursor, the accumulated
//! collection and the in-flight guard. Callers drive it through a cheap
//! [`aggregator::AggregatorHandle`]: `request_more()` on scroll,
//! `reset()` on refresh. Every completed page is published as an immutable
//! snapshot of everything received so far.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use server_browser::aggregator::{Aggregator, ChannelConsumer, AggregatorEvent};
//! use server_browser::config::AppConfig;
//! use server_browser::listing::HttpListingClient;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> server_browser::Result<()> {
//!     let config = AppConfig::load("server-browser.yaml")?;
//!     let client = HttpListingClient::from_config(&config)?;
//!
//!     let (consumer, mut events) = ChannelConsumer::new();
//!     let handle = Aggregator::spawn(
//!         Arc::new(client),
//!         config.listing.filter.clone(),
//!         config.listing.page_size,
//!         consumer,
//!     );
//!
//!     handle.request_more()?;
//!     while let Some(AggregatorEvent::PageAppended(update)) = events.recv().await {
//!         println!("{} servers so far", update.snapshot.len());
//!         if !update.has_more {
//!             break;
//!         }
//!         handle.request_more()?;
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────┐
//! │                    AggregatorHandle                       │
//! │   request_more()   reset()   snapshot()   subscribe()     │
//! └───────────────────────────────────────────────────────────┘
//!                              │ commands
//! ┌───────────────────────────────────────────────────────────┐
//! │  Aggregator task: FetchState (Cursor, collection, guard)  │
//! └───────────────────────────────────────────────────────────┘
//!                              │ fetch_page()
//! ┌──────────┬───────────┬──────────────┬─────────────────────┐
//! │   Auth   │   HTTP    │    Decode    │      Listing        │
//! ├──────────┼───────────┼──────────────┼─────────────────────┤
//! │ Token    │ GET       │ Dot paths    │ filter + limit +    │
//! │ Env      │ Timeout   │ Fallbacks    │ offset per page     │
//! │ File     │ Rate Limit│              │                     │
//! └──────────┴───────────┴──────────────┴─────────────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Credential providers
pub mod auth;

/// HTTP client with rate limiting
pub mod http;

/// Pagination cursor
pub mod pagination;

/// Response decoding
pub mod decode;

/// Listing client and server entries
pub mod listing;

/// Fetch aggregator
pub mod aggregator;

/// Configuration file
pub mod config;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, ErrorKind, Result};
pub use types::*;

// Re-export commonly used types
pub use aggregator::{Aggregator, AggregatorHandle, SnapshotConsumer};
pub use config::AppConfig;
pub use listing::{HttpListingClient, ListingClient, Page, ServerEntry};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
