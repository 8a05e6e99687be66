use crate::domain::errors::RequesterError;
use hyper::body::Bytes;
use serde::Serialize;
use serde_json::{Map, Value};

/// Credentials extracted from an `Authorization` header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Authorization {
    pub scheme: String,
    pub credential: String,
}

impl Authorization {
    /// Splits a header value such as `Bearer abc123` on its first space.
    ///
    /// Returns `None` unless both halves are non-empty.
    pub fn from_header_value(value: &str) -> Option<Self> {
        let (scheme, credential) = value.split_once(' ')?;
        if scheme.is_empty() || credential.is_empty() {
            return None;
        }
        Some(Authorization {
            scheme: scheme.to_string(),
            credential: credential.to_string(),
        })
    }
}

/// Represents a validated JSON object body
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct JsonBody(pub Map<String, Value>);

impl JsonBody {
    /// Creates a new JsonBody from text that must hold a JSON object
    ///
    /// # Arguments
    /// * `json` - The JSON text to parse
    ///
    /// # Returns
    /// * `Ok(JsonBody)` - The parsed object
    /// * `Err(RequesterError::BodyParse)` - If the text is not a JSON object
    pub fn new(json: &str) -> Result<Self, RequesterError> {
        serde_json::from_str::<Map<String, Value>>(json)
            .map(JsonBody)
            .map_err(RequesterError::BodyParse)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Serializes the object into the bytes sent on the wire.
    pub fn to_bytes(&self) -> Result<Bytes, RequesterError> {
        serde_json::to_vec(&self.0)
            .map(Bytes::from)
            .map_err(RequesterError::BodySerialize)
    }
}
