//! The relay pipeline: authenticate, admit, pick a shard, dispatch with failover.

mod config;
mod credentials;
mod dispatcher;
mod limiter;
mod service;
pub mod shard;

pub use config::{DispatchConfig, RateLimitConfig, RelayConfig, StoreFailurePolicy, WindowLimit};
pub use credentials::ApiKeys;
pub use dispatcher::{AttemptFailure, DispatchOutcome, Dispatcher};
pub use limiter::{Decision, RateLimiter};
pub use service::{Delivery, InboundRequest, RelayService};
