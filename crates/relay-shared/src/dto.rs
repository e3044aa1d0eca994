//! Data Transfer Objects - response bodies for the relay API.

use serde::{Deserialize, Serialize};

/// Body returned when a message reached a webhook.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayResponse {
    pub success: bool,
    /// Index of the endpoint that accepted the message.
    pub shard: usize,
    /// HTTP status the accepting endpoint answered with.
    pub downstream_status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

/// Liveness answer on the relay route itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LivenessResponse {
    pub status: String,
    pub message: String,
}

impl LivenessResponse {
    pub fn ok() -> Self {
        Self {
            status: "OK".to_string(),
            message: "API is working".to_string(),
        }
    }
}

/// Service health, with build version.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: String,
}
