//! Immutable relay configuration, built once at startup.

use std::str::FromStr;
use std::time::Duration;

use crate::domain::Endpoint;

/// What the limiter does when the counter store cannot be reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreFailurePolicy {
    /// Reject the request.
    #[default]
    FailClosed,
    /// Admit the request without counting it.
    FailOpen,
}

impl FromStr for StoreFailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "closed" | "fail-closed" | "fail_closed" => Ok(Self::FailClosed),
            "open" | "fail-open" | "fail_open" => Ok(Self::FailOpen),
            other => Err(format!("unknown store failure policy: {other}")),
        }
    }
}

/// Quota for one window family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowLimit {
    /// Maximum admitted requests per window.
    pub max_requests: u64,
    /// Window length. Also the TTL of each window's counter.
    pub window: Duration,
}

/// Rate limiter configuration.
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    pub short: WindowLimit,
    pub long: WindowLimit,
    /// Key prefix for counter keys
    pub key_prefix: String,
    pub on_store_failure: StoreFailurePolicy,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            short: WindowLimit {
                max_requests: 12,
                window: Duration::from_secs(60),
            },
            long: WindowLimit {
                max_requests: 500,
                window: Duration::from_secs(86_400),
            },
            key_prefix: "relay".to_string(),
            on_store_failure: StoreFailurePolicy::FailClosed,
        }
    }
}

/// Failover budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchConfig {
    /// Most distinct endpoints tried per request.
    pub max_attempts: usize,
    /// Timeout applied to each outbound attempt on its own.
    pub attempt_timeout: Duration,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            attempt_timeout: Duration::from_secs(3),
        }
    }
}

impl DispatchConfig {
    /// Upper bound on time spent dispatching a single request.
    pub fn latency_budget(&self) -> Duration {
        self.attempt_timeout
            .saturating_mul(u32::try_from(self.max_attempts).unwrap_or(u32::MAX))
    }
}

/// Process-wide relay configuration.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Accepted API credentials.
    pub api_keys: Vec<String>,
    /// Ordered webhook endpoints; the index is the shard number.
    pub endpoints: Vec<Endpoint>,
    pub rate_limit: RateLimitConfig,
    pub dispatch: DispatchConfig,
    /// Content cap, in characters.
    pub max_content_chars: usize,
    /// Display name attached to forwarded messages.
    pub username: String,
    /// Content forwarded when a request carries neither content nor embeds.
    pub empty_content: String,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            api_keys: Vec::new(),
            endpoints: Vec::new(),
            rate_limit: RateLimitConfig::default(),
            dispatch: DispatchConfig::default(),
            max_content_chars: 1900,
            username: "Relay Protector".to_string(),
            empty_content: "No content".to_string(),
        }
    }
}
