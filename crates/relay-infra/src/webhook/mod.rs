//! Outbound webhook transport.

mod http;

pub use http::HttpWebhookTransport;
