//! Application configuration loaded from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use relay_core::domain::Endpoint;
use relay_core::relay::{DispatchConfig, RateLimitConfig, RelayConfig, StoreFailurePolicy, WindowLimit};

#[cfg(feature = "redis")]
use relay_infra::RedisConfig;

/// Largest request body read from a caller.
const DEFAULT_MAX_BODY_BYTES: usize = 64 * 1024;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub max_body_bytes: usize,
    pub relay: RelayConfig,
    #[cfg(feature = "redis")]
    pub redis: RedisConfig,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parse_var("PORT").unwrap_or(8080),
            max_body_bytes: parse_var("RELAY_MAX_BODY_BYTES").unwrap_or(DEFAULT_MAX_BODY_BYTES),
            relay: Self::relay_from_env(),
            #[cfg(feature = "redis")]
            redis: RedisConfig::from_env(),
        }
    }

    fn relay_from_env() -> RelayConfig {
        let defaults = RelayConfig::default();
        let rate_defaults = RateLimitConfig::default();

        // RELAY_WEBHOOK_URLS wins; a lone DISCORD_WEBHOOK_URL is the one-shard setup.
        let endpoints = env::var("RELAY_WEBHOOK_URLS")
            .or_else(|_| env::var("DISCORD_WEBHOOK_URL"))
            .map(|v| split_list(&v).into_iter().map(Endpoint::new).collect())
            .unwrap_or_default();

        let on_store_failure = match env::var("RATE_LIMIT_STORE_FAILURE") {
            Ok(v) => v.parse().unwrap_or_else(|e| {
                tracing::warn!("{e}; failing closed");
                StoreFailurePolicy::FailClosed
            }),
            Err(_) => StoreFailurePolicy::default(),
        };

        RelayConfig {
            api_keys: env::var("RELAY_API_KEYS")
                .map(|v| split_list(&v))
                .unwrap_or_default(),
            endpoints,
            rate_limit: RateLimitConfig {
                short: WindowLimit {
                    max_requests: parse_var("RATE_LIMIT_SHORT_MAX")
                        .unwrap_or(rate_defaults.short.max_requests),
                    window: parse_var("RATE_LIMIT_SHORT_WINDOW_SECS")
                        .map(Duration::from_secs)
                        .unwrap_or(rate_defaults.short.window),
                },
                long: WindowLimit {
                    max_requests: parse_var("RATE_LIMIT_LONG_MAX")
                        .unwrap_or(rate_defaults.long.max_requests),
                    window: parse_var("RATE_LIMIT_LONG_WINDOW_SECS")
                        .map(Duration::from_secs)
                        .unwrap_or(rate_defaults.long.window),
                },
                key_prefix: env::var("RATE_LIMIT_KEY_PREFIX").unwrap_or(rate_defaults.key_prefix),
                on_store_failure,
            },
            dispatch: DispatchConfig {
                max_attempts: parse_var("RELAY_MAX_ATTEMPTS")
                    .filter(|n| *n > 0)
                    .unwrap_or(defaults.dispatch.max_attempts),
                attempt_timeout: parse_var("RELAY_ATTEMPT_TIMEOUT_MS")
                    .map(Duration::from_millis)
                    .unwrap_or(defaults.dispatch.attempt_timeout),
            },
            max_content_chars: parse_var("RELAY_MAX_CONTENT_CHARS")
                .unwrap_or(defaults.max_content_chars),
            username: env::var("RELAY_USERNAME").unwrap_or(defaults.username),
            empty_content: env::var("RELAY_EMPTY_CONTENT").unwrap_or(defaults.empty_content),
        }
    }
}

fn parse_var<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|s| s.trim().parse().ok())
}

/// Split a comma-separated list, dropping blanks.
fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
