//! Relay error taxonomy.

use std::time::Duration;

use thiserror::Error;

use crate::domain::WindowKind;

/// Every way a relay request can end without a delivery.
///
/// All variants are terminal for the current request and none of them is fatal
/// to the process. The only internal retry is the dispatcher's failover across
/// different endpoints, which ends in [`RelayError::Exhausted`].
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("Missing or invalid API credential")]
    Unauthorized,

    #[error("Invalid input: {0}")]
    Validation(String),

    /// `retry_after` is the time left until the rejecting window rolls over.
    #[error("Rate limit exceeded for the {window} window")]
    RateLimited {
        window: WindowKind,
        retry_after: Duration,
    },

    #[error("Relay misconfigured: {0}")]
    Configuration(String),

    #[error("Counter store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("All {attempts} destination attempts failed")]
    Exhausted { attempts: usize },
}

impl RelayError {
    /// Machine-readable reason code surfaced to callers.
    pub fn reason_code(&self) -> &'static str {
        match self {
            RelayError::Unauthorized => "unauthorized",
            RelayError::Validation(_) => "bad_input",
            RelayError::RateLimited {
                window: WindowKind::Short,
                ..
            } => "rate_limit_short",
            RelayError::RateLimited {
                window: WindowKind::Long,
                ..
            } => "rate_limit_long",
            RelayError::Configuration(_) => "configuration_error",
            RelayError::StoreUnavailable(_) => "store_unavailable",
            RelayError::Exhausted { .. } => "all_destinations_failed",
        }
    }
}
