//! API credential extractor.

use actix_web::{FromRequest, HttpRequest, dev::Payload, http::header};
use std::future::{Ready, ready};

/// Header carrying the API key directly.
pub static API_KEY_HEADER: &str = "x-api-key";

/// Credential presented by the caller, if any.
///
/// Extraction never fails; verification happens in the relay service so that
/// a missing credential and a wrong one produce the same rejection.
///
/// Looks at `x-api-key` first, then `Authorization` (with or without the
/// `Bearer ` scheme).
#[derive(Debug, Clone, Default)]
pub struct ApiCredential(pub Option<String>);

impl ApiCredential {
    pub fn as_deref(&self) -> Option<&str> {
        self.0.as_deref()
    }

    fn from_headers(req: &HttpRequest) -> Option<String> {
        let api_key = req
            .headers()
            .get(API_KEY_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|s| !s.is_empty());

        if let Some(key) = api_key {
            return Some(key.to_string());
        }

        let auth = req.headers().get(header::AUTHORIZATION)?.to_str().ok()?.trim();
        let token = if auth == "Bearer" {
            ""
        } else {
            auth.strip_prefix("Bearer ").unwrap_or(auth).trim()
        };
        (!token.is_empty()).then(|| token.to_string())
    }
}

impl FromRequest for ApiCredential {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Ok(ApiCredential(Self::from_headers(req))))
    }
}
