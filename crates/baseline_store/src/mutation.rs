//! Mutation records delivered to subscribers.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A committed mutation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mutation {
    /// Mutation type, `[namespace/]*name`
    #[serde(rename = "type")]
    pub kind: String,
    /// Payload passed to the handlers
    #[serde(default)]
    pub payload: Value,
}

impl Mutation {
    /// Create a new mutation record
    #[must_use]
    pub fn new(kind: impl Into<String>, payload: Value) -> Self {
        Self {
            kind: kind.into(),
            payload,
        }
    }
}
