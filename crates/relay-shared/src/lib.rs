//! # Relay Shared
//!
//! Wire types returned by the relay's HTTP API.

pub mod dto;
pub mod response;

pub use response::ErrorResponse;
