//! Pagination module
//!
//! Offset/limit pagination for the server listing endpoint.
//!
//! # Overview
//!
//! The [`Cursor`] tracks where the next page starts and whether another page
//! may exist. More data is assumed to exist only while every completed page
//! came back full; the first short (or empty) page ends the listing.

mod cursor;

pub use cursor::Cursor;
