use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::RelayError;

/// Inbound message body as submitted by the caller.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Submission {
    pub identity: Option<String>,
    pub content: Option<String>,
    pub embeds: Option<Vec<Map<String, Value>>>,
    #[serde(default)]
    pub allow_mentions: bool,
}

impl Submission {
    /// Parse a JSON body. Anything that is not a well-formed object is bad input.
    pub fn parse(body: &[u8]) -> Result<Self, RelayError> {
        serde_json::from_slice(body)
            .map_err(|e| RelayError::Validation(format!("malformed JSON body: {e}")))
    }
}
