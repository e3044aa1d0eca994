//! Error response type (RFC 7807 problem details with a reason code).

use serde::{Deserialize, Serialize};

/// RFC 7807 Problem Details for HTTP APIs, extended with a machine-readable
/// `code` that callers should switch on.
///
/// See: https://datatracker.ietf.org/doc/html/rfc7807
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// A URI reference that identifies the problem type.
    #[serde(rename = "type")]
    pub error_type: String,

    /// A short, human-readable summary of the problem type.
    pub title: String,

    /// The HTTP status code.
    pub status: u16,

    /// Stable reason code, e.g. `rate_limit_short`.
    pub code: String,

    /// A human-readable explanation specific to this occurrence.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,

    /// Request ID for debugging purposes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

impl ErrorResponse {
    pub fn new(status: u16, title: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            error_type: "about:blank".to_string(),
            title: title.into(),
            status,
            code: code.into(),
            detail: None,
            request_id: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }

    pub fn method_not_allowed() -> Self {
        Self::new(405, "Method Not Allowed", "method_not_allowed")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_problem_shape() {
        let body = ErrorResponse::new(429, "Too Many Requests", "rate_limit_short")
            .with_request_id("abc");
        let json = serde_json::to_value(&body).unwrap();

        assert_eq!(json["type"], "about:blank");
        assert_eq!(json["status"], 429);
        assert_eq!(json["code"], "rate_limit_short");
        assert_eq!(json["request_id"], "abc");
        assert!(json.get("detail").is_none());
    }
}
