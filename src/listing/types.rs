//! Listing data types

use crate::types::JsonObject;
use serde::Serialize;

/// Country code used when the listing does not report one
pub const UNKNOWN_COUNTRY: &str = "unknown";

/// One listed game server
///
/// Fields are passed through as reported; anything missing has already been
/// replaced by its fallback during decoding.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServerEntry {
    pub name: String,
    pub map: String,
    pub players: u32,
    pub max_players: u32,
    pub country: String,
    pub address: String,
    pub port: u16,
    /// The untouched JSON object this entry was decoded from
    #[serde(skip)]
    pub raw: JsonObject,
}

impl Default for ServerEntry {
    fn default() -> Self {
        Self {
            name: String::new(),
            map: String::new(),
            players: 0,
            max_players: 0,
            country: UNKNOWN_COUNTRY.to_string(),
            address: String::new(),
            port: 0,
            raw: JsonObject::new(),
        }
    }
}

impl ServerEntry {
    /// Create an entry with just a name, everything else at its fallback
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Player count as shown in a listing, e.g. `12/64`
    pub fn players_display(&self) -> String {
        format!("{}/{}", self.players, self.max_players)
    }

    /// `address:port`, or the bare address when no port is known
    pub fn socket_address(&self) -> String {
        if self.port == 0 {
            self.address.clone()
        } else {
            format!("{}:{}", self.address, self.port)
        }
    }
}

/// One page of entries returned by the listing endpoint
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    items: Vec<ServerEntry>,
}

impl Page {
    pub fn new(items: Vec<ServerEntry>) -> Self {
        Self { items }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of entries on this page
    pub fn count(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// A page is full when it holds exactly `page_size` entries.
    /// With `page_size == 0` no page is ever full.
    pub fn is_full(&self, page_size: u32) -> bool {
        page_size > 0 && self.items.len() == page_size as usize
    }

    pub fn items(&self) -> &[ServerEntry] {
        &self.items
    }

    pub fn into_items(self) -> Vec<ServerEntry> {
        self.items
    }
}

impl From<Vec<ServerEntry>> for Page {
    fn from(items: Vec<ServerEntry>) -> Self {
        Self::new(items)
    }
}
