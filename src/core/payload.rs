//! Classified responses from the market-data API.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::debug;

/// Key the API uses to report failures inside an otherwise valid JSON body.
pub const ERROR_MARKER: &str = "Error Message";

/// What a market-data request produced.
///
/// Panels match on this instead of inspecting raw JSON shapes, so a failed
/// request and an empty result are always rendered as a message.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// A non-empty JSON array.
    Records(Vec<Value>),
    /// A non-empty JSON object without an error marker.
    Document(Map<String, Value>),
    /// Upstream error marker or a failed request.
    Error(String),
    /// Nothing usable was returned.
    Empty,
}

impl Payload {
    pub fn from_json(value: Value) -> Self {
        match value {
            Value::Array(items) if items.is_empty() => Payload::Empty,
            Value::Array(items) => Payload::Records(items),
            Value::Object(map) => {
                if let Some(message) = map.get(ERROR_MARKER) {
                    let message = match message {
                        Value::String(s) => s.clone(),
                        other => other.to_string(),
                    };
                    Payload::Error(message)
                } else if map.is_empty() {
                    Payload::Empty
                } else {
                    Payload::Document(map)
                }
            }
            _ => Payload::Empty,
        }
    }

    /// Deserializes every record into `T`, skipping the ones that don't fit.
    ///
    /// Returns `None` when the payload is not a list of records.
    pub fn parse_records<T: DeserializeOwned>(&self) -> Option<Vec<T>> {
        let Payload::Records(items) = self else {
            return None;
        };
        let parsed = items
            .iter()
            .filter_map(|item| match serde_json::from_value::<T>(item.clone()) {
                Ok(record) => Some(record),
                Err(e) => {
                    debug!(error = %e, record = %item, "Skipping unreadable record");
                    None
                }
            })
            .collect();
        Some(parsed)
    }
}
