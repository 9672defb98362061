//! Strictly-shaped JSON input for write commands.
//!
//! `fq set` accepts a single JSON object for a document path and an array of
//! objects for a collection path. These wrappers reject every other shape at
//! decode time so the command layer never has to inspect raw JSON.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use serde_json::Value as JsonValue;

/// Plain JSON field map of a document.
pub type JsonMap = serde_json::Map<String, JsonValue>;

/// Errors produced while decoding write input.
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    /// Input is not valid JSON, or has the wrong top-level shape.
    #[error("invalid input data: {0}")]
    Json(#[from] serde_json::Error),
}

/// A JSON value that must be an object.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JsonObject(pub JsonMap);

/// A JSON value that must be an array of objects.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JsonArray(pub Vec<JsonMap>);

impl JsonObject {
    /// Decode from raw bytes.
    pub fn from_slice(data: &[u8]) -> Result<Self, DocumentError> {
        Ok(serde_json::from_slice(data)?)
    }

    /// Unwrap into the field map.
    #[must_use]
    pub fn into_inner(self) -> JsonMap {
        self.0
    }
}

impl JsonArray {
    /// Decode from raw bytes.
    pub fn from_slice(data: &[u8]) -> Result<Self, DocumentError> {
        Ok(serde_json::from_slice(data)?)
    }

    /// Unwrap into the list of field maps.
    #[must_use]
    pub fn into_inner(self) -> Vec<JsonMap> {
        self.0
    }
}

fn kind_of(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "bool",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}

impl<'de> Deserialize<'de> for JsonObject {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match JsonValue::deserialize(deserializer)? {
            JsonValue::Object(map) => Ok(Self(map)),
            other => Err(D::Error::custom(format!(
                "expected json object, got {}",
                kind_of(&other)
            ))),
        }
    }
}

impl<'de> Deserialize<'de> for JsonArray {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let items = match JsonValue::deserialize(deserializer)? {
            JsonValue::Array(items) => items,
            other => {
                return Err(D::Error::custom(format!(
                    "expected json array, got {}",
                    kind_of(&other)
                )));
            }
        };

        let mut objects = Vec::with_capacity(items.len());
        for (i, item) in items.into_iter().enumerate() {
            match item {
                JsonValue::Object(map) => objects.push(map),
                _ => {
                    return Err(D::Error::custom(format!(
                        "no json object in array at pos {}",
                        i + 1
                    )));
                }
            }
        }
        Ok(Self(objects))
    }
}
