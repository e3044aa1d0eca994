use std::fmt;

use crate::error::RelayError;

/// Longest identity accepted, in bytes. Keeps counter keys bounded.
pub const MAX_IDENTITY_LEN: usize = 128;

const UNKNOWN_IDENTITY: &str = "unknown";

/// Key that partitions rate limits and shard selection.
///
/// The caller-supplied value is trusted as-is when present; there is no
/// protection against spoofing.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identity(String);

impl Identity {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Pick the caller-supplied identity, falling back to the network origin.
    pub fn resolve(supplied: Option<&str>, origin: Option<&str>) -> Result<Self, RelayError> {
        let chosen = supplied
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .or_else(|| origin.map(str::trim).filter(|s| !s.is_empty()))
            .unwrap_or(UNKNOWN_IDENTITY);

        if chosen.len() > MAX_IDENTITY_LEN {
            return Err(RelayError::Validation(format!(
                "identity must be at most {MAX_IDENTITY_LEN} bytes"
            )));
        }

        Ok(Self(chosen.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
