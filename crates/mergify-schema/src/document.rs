//! # Schema Document
//!
//! In-memory JSON Schema: a mapping from string keys to arbitrary JSON
//! values. Immutable once loaded.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::SchemaError;

/// A parsed JSON Schema document.
///
/// Serializes transparently as the underlying JSON object, so the cache
/// file holds exactly the schema as fetched with no wrapper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SchemaDocument(Map<String, Value>);

impl SchemaDocument {
    /// Parse a schema from raw bytes.
    ///
    /// `origin` names the source (URL or cache path) in error messages.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::InvalidDocument`] if the bytes are not JSON
    /// or the top-level value is not an object.
    pub fn from_slice(bytes: &[u8], origin: &str) -> Result<Self, SchemaError> {
        let value: Value =
            serde_json::from_slice(bytes).map_err(|e| SchemaError::InvalidDocument {
                origin: origin.to_string(),
                reason: e.to_string(),
            })?;
        Self::from_value(value, origin)
    }

    /// Wrap an already-parsed JSON value.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::InvalidDocument`] for non-object values.
    pub fn from_value(value: Value, origin: &str) -> Result<Self, SchemaError> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(SchemaError::InvalidDocument {
                origin: origin.to_string(),
                reason: format!("expected a JSON object, found {}", json_kind(&other)),
            }),
        }
    }

    /// Borrow the underlying mapping.
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Look up a top-level keyword (e.g. `"$schema"`, `"properties"`).
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Clone into a `serde_json::Value` for schema compilation.
    pub fn to_value(&self) -> Value {
        Value::Object(self.0.clone())
    }

    /// Serialize to compact JSON bytes.
    pub fn to_vec(&self) -> Vec<u8> {
        // A Map<String, Value> always serializes.
        serde_json::to_vec(&self.0).unwrap_or_default()
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
