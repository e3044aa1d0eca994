use std::fmt;

use serde::Serialize;

/// The two counter families kept per identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WindowKind {
    /// Minute-scale window.
    Short,
    /// Day-scale window.
    Long,
}

impl WindowKind {
    /// Tag used inside counter keys.
    pub fn tag(&self) -> &'static str {
        match self {
            WindowKind::Short => "short",
            WindowKind::Long => "long",
        }
    }
}

impl fmt::Display for WindowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}
