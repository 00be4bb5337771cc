//! HTTP client module
//!
//! Provides the transport used to reach the listing endpoint.
//!
//! # Features
//!
//! - **Single attempt**: no automatic retries, failures surface immediately
//! - **Rate Limiting**: Token bucket rate limiter using governor
//! - **Authentication**: Bearer tokens from an injected credential provider

mod client;
mod rate_limit;

pub use client::{HttpClient, HttpClientConfig, HttpClientConfigBuilder, RequestConfig};
pub use rate_limit::{RateLimiter, RateLimiterConfig};
