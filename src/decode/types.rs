//! Decoder configuration types

use serde::{Deserialize, Serialize};

/// Dot paths locating each server attribute inside a listing record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldMapping {
    pub name: String,
    pub map: String,
    pub players: String,
    pub max_players: String,
    pub country: String,
    pub address: String,
    pub port: String,
}

impl Default for FieldMapping {
    fn default() -> Self {
        Self {
            name: "name".to_string(),
            map: "map".to_string(),
            players: "players".to_string(),
            max_players: "max_players".to_string(),
            country: "country".to_string(),
            address: "ip".to_string(),
            port: "port".to_string(),
        }
    }
}

impl FieldMapping {
    /// Prefix every path, for APIs that nest attributes (e.g. `attributes`)
    #[must_use]
    pub fn nested_under(mut self, prefix: &str) -> Self {
        let prefix = prefix.trim_end_matches('.');
        for path in [
            &mut self.name,
            &mut self.map,
            &mut self.players,
            &mut self.max_players,
            &mut self.country,
            &mut self.address,
            &mut self.port,
        ] {
            *path = format!("{prefix}.{path}");
        }
        self
    }
}
