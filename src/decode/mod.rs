//! Response decoding module
//!
//! Turns a listing response body into a [`Page`](crate::listing::Page).
//!
//! # Overview
//!
//! Decoding is strict at the page level and lenient at the field level:
//! - the body must be JSON and the records path must point at an array of
//!   objects, otherwise the whole page is rejected as malformed
//! - inside each object, missing or mistyped fields fall back to a default
//!   (`""`, `0` or `"unknown"`) instead of failing the page

mod decoders;
mod types;

pub use decoders::{extract_path, PageDecoder};
pub use types::FieldMapping;
