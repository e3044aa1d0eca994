//! # Relay Infrastructure
//!
//! Concrete implementations of the ports defined in `relay-core`:
//! counter stores and the outbound webhook transport.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No external dependencies, in-memory counters only
//! - `redis` - Redis-backed counter store shared across relay instances

pub mod counter;
pub mod webhook;

// Re-exports - In-Memory
pub use counter::InMemoryCounterStore;
pub use webhook::HttpWebhookTransport;

// Re-exports - Redis
#[cfg(feature = "redis")]
pub use counter::{RedisConfig, RedisCounterStore};
