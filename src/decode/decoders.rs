//! Listing page decoder

use super::types::FieldMapping;
use crate::error::{Error, Result};
use crate::listing::{Page, ServerEntry, UNKNOWN_COUNTRY};
use crate::types::JsonObject;
use serde_json::Value;

/// Decodes listing response bodies into pages of [`ServerEntry`]
#[derive(Debug, Clone, Default)]
pub struct PageDecoder {
    /// Dot path to the records array (`None` = the body itself)
    records_path: Option<String>,
    /// Where each attribute lives inside a record
    fields: FieldMapping,
}

impl PageDecoder {
    /// Create a decoder. An empty path or `$` means the body is the array.
    pub fn new(records_path: impl Into<String>, fields: FieldMapping) -> Self {
        let path = records_path.into();
        let records_path = match path.trim() {
            "" | "$" => None,
            p => Some(p.to_string()),
        };
        Self {
            records_path,
            fields,
        }
    }

    /// Decoder for a body that is a bare array of records
    pub fn top_level(fields: FieldMapping) -> Self {
        Self::new("", fields)
    }

    /// Decode a raw response body
    pub fn decode(&self, body: &str) -> Result<Page> {
        let value: Value = serde_json::from_str(body)
            .map_err(|e| Error::malformed(format!("response is not JSON: {e}")))?;
        self.decode_value(&value)
    }

    /// Decode an already-parsed response
    pub fn decode_value(&self, value: &Value) -> Result<Page> {
        let records = match &self.records_path {
            Some(path) => extract_path(value, path)
                .ok_or_else(|| Error::malformed(format!("records path '{path}' not found")))?,
            None => value,
        };

        let Value::Array(records) = records else {
            return Err(Error::malformed(format!(
                "expected an array of records, found {}",
                type_name(records)
            )));
        };

        records
            .iter()
            .enumerate()
            .map(|(index, record)| match record {
                Value::Object(obj) => Ok(self.decode_entry(obj)),
                other => Err(Error::malformed(format!(
                    "record {index} is {}, expected an object",
                    type_name(other)
                ))),
            })
            .collect::<Result<Vec<_>>>()
            .map(Page::new)
    }

    /// Decode one record, substituting fallbacks for missing fields
    pub fn decode_entry(&self, obj: &JsonObject) -> ServerEntry {
        let field = |path: &str| record_field(obj, path);

        ServerEntry {
            name: field(&self.fields.name).and_then(as_text).unwrap_or_default(),
            map: field(&self.fields.map).and_then(as_text).unwrap_or_default(),
            players: field(&self.fields.players).and_then(as_count).unwrap_or(0),
            max_players: field(&self.fields.max_players)
                .and_then(as_count)
                .unwrap_or(0),
            country: field(&self.fields.country)
                .and_then(as_text)
                .filter(|c| !c.is_empty())
                .unwrap_or_else(|| UNKNOWN_COUNTRY.to_string()),
            address: field(&self.fields.address)
                .and_then(as_text)
                .unwrap_or_default(),
            port: field(&self.fields.port)
                .and_then(as_u64)
                .and_then(|p| u16::try_from(p).ok())
                .unwrap_or(0),
            raw: obj.clone(),
        }
    }
}

/// Follow a dot path (`data.servers`, `items.0.name`, `$.data`) into a value
pub fn extract_path<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    let path = path.strip_prefix("$.").unwrap_or(path);
    if path.is_empty() {
        return Some(value);
    }

    path.split('.').try_fold(value, |current, part| match current {
        Value::Object(map) => map.get(part),
        Value::Array(arr) => part.parse::<usize>().ok().and_then(|i| arr.get(i)),
        _ => None,
    })
}

fn record_field<'a>(obj: &'a JsonObject, path: &str) -> Option<&'a Value> {
    let path = path.strip_prefix("$.").unwrap_or(path);
    let (head, rest) = path.split_once('.').unwrap_or((path, ""));
    obj.get(head).and_then(|value| extract_path(value, rest))
}

fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn as_u64(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn as_count(value: &Value) -> Option<u32> {
    as_u64(value).map(|n| u32::try_from(n).unwrap_or(u32::MAX))
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
