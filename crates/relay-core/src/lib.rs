//! # Relay Core
//!
//! The domain layer of the relay.
//! Rate limiting, shard selection and failover dispatch, written against ports
//! so that no infrastructure crate is needed to run or test them.

pub mod domain;
pub mod error;
pub mod ports;
pub mod relay;

#[cfg(test)]
mod testutils;

pub use error::RelayError;
pub use relay::{RelayConfig, RelayService};
