//! Observability module - request IDs and tracing spans.

mod request_id;

pub use request_id::{RequestId, RequestIdMiddleware};
