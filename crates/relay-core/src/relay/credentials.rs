use crate::error::RelayError;

/// Set of API credentials accepted from callers.
#[derive(Debug, Clone, Default)]
pub struct ApiKeys {
    keys: Vec<String>,
}

impl ApiKeys {
    pub fn new(keys: impl IntoIterator<Item = String>) -> Self {
        Self {
            keys: keys.into_iter().filter(|k| !k.is_empty()).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Accept the presented credential only if it equals a configured key.
    /// With no keys configured every request is refused.
    pub fn verify(&self, presented: Option<&str>) -> Result<(), RelayError> {
        let presented = presented.ok_or(RelayError::Unauthorized)?;
        // No early exit: every key is compared.
        let matched = self
            .keys
            .iter()
            .fold(false, |acc, key| acc | constant_time_eq(key.as_bytes(), presented.as_bytes()));

        if matched {
            Ok(())
        } else {
            Err(RelayError::Unauthorized)
        }
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
