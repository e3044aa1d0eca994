//! Error handling - RFC 7807 responses carrying a relay reason code.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use relay_core::RelayError;
use relay_shared::ErrorResponse;
use std::fmt;

/// Application-level error type that converts to RFC 7807 responses.
#[derive(Debug)]
pub enum AppError {
    Relay {
        error: RelayError,
        request_id: Option<String>,
    },
    MethodNotAllowed,
}

impl AppError {
    pub fn relay(error: RelayError) -> Self {
        AppError::Relay {
            error,
            request_id: None,
        }
    }

    pub fn with_request_id(mut self, id: impl Into<String>) -> Self {
        if let AppError::Relay { request_id, .. } = &mut self {
            *request_id = Some(id.into());
        }
        self
    }
}

impl From<RelayError> for AppError {
    fn from(err: RelayError) -> Self {
        AppError::relay(err)
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Relay { error, .. } => write!(f, "{}", error),
            AppError::MethodNotAllowed => write!(f, "Method not allowed"),
        }
    }
}

fn title(error: &RelayError) -> &'static str {
    match error {
        RelayError::Unauthorized => "Unauthorized",
        RelayError::Validation(_) => "Bad Request",
        RelayError::RateLimited { .. } => "Too Many Requests",
        RelayError::Configuration(_) => "Relay Not Configured",
        RelayError::StoreUnavailable(_) => "Service Unavailable",
        RelayError::Exhausted { .. } => "All Destinations Failed",
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Relay { error, .. } => match error {
                RelayError::Unauthorized => StatusCode::UNAUTHORIZED,
                RelayError::Validation(_) => StatusCode::BAD_REQUEST,
                RelayError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
                RelayError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
                RelayError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
                RelayError::Exhausted { .. } => StatusCode::BAD_GATEWAY,
            },
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();

        let AppError::Relay { error, request_id } = self
        else {
            return HttpResponse::build(status).json(ErrorResponse::method_not_allowed());
        };

        let mut body = ErrorResponse::new(status.as_u16(), title(error), error.reason_code());
        match error {
            // Internal details stay in the logs.
            RelayError::Configuration(detail) | RelayError::StoreUnavailable(detail) => {
                tracing::error!(code = error.reason_code(), "{}", detail);
            }
            RelayError::Validation(detail) => body = body.with_detail(detail.clone()),
            other => body = body.with_detail(other.to_string()),
        }
        if let Some(id) = request_id {
            body = body.with_request_id(id.clone());
        }

        let mut response = HttpResponse::build(status);
        if let RelayError::RateLimited { retry_after, .. } = error {
            response.insert_header(("Retry-After", retry_after.as_secs().max(1).to_string()));
        }
        response.json(body)
    }
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;
