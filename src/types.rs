//! Common types used throughout the server browser
//!
//! Shared type aliases and small value types used across modules.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// JSON object type
pub type JsonObject = serde_json::Map<String, JsonValue>;

/// Generic key-value map with string keys and values
pub type StringMap = HashMap<String, String>;

/// Fixed listing filter: query parameters sent with every page request.
///
/// Ordered so that requests are reproducible in logs and tests.
pub type Filter = BTreeMap<String, String>;

// ============================================================================
// Output
// ============================================================================

/// How listed servers are rendered by the CLI
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// One JSON object per line
    #[default]
    Json,
    /// Aligned, human-readable columns
    Pretty,
}
