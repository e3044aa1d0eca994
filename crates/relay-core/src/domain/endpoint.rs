use std::fmt;

/// An outbound webhook destination.
///
/// Opaque to the relay. Its position in the configured list is its shard index.
#[derive(Clone, PartialEq, Eq)]
pub struct Endpoint {
    url: String,
}

impl Endpoint {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

// Webhook URLs embed their secret token in the path, so only the origin is
// ever printed.
impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let origin_end = self
            .url
            .match_indices('/')
            .nth(2)
            .map(|(i, _)| i)
            .unwrap_or(self.url.len());
        write!(f, "{}/…", &self.url[..origin_end])
    }
}

impl fmt::Debug for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Endpoint({self})")
    }
}
