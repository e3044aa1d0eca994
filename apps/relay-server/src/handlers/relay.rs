//! Relay endpoint.

use actix_web::{HttpRequest, HttpResponse, web};
use futures::StreamExt;

use relay_core::RelayError;
use relay_core::relay::InboundRequest;
use relay_shared::dto::{LivenessResponse, RelayResponse};

use crate::middleware::auth::ApiCredential;
use crate::middleware::error::{AppError, AppResult};
use crate::observability::RequestId;
use crate::state::AppState;

/// GET /api/relay - liveness, touches neither rate limiting nor dispatch.
pub async fn liveness() -> HttpResponse {
    HttpResponse::Ok().json(LivenessResponse::ok())
}

/// Any other verb on /api/relay.
pub async fn method_not_allowed() -> AppResult<HttpResponse> {
    Err(AppError::MethodNotAllowed)
}

/// POST /api/relay - authenticate, rate limit and forward a message.
pub async fn relay(
    req: HttpRequest,
    state: web::Data<AppState>,
    credential: ApiCredential,
    request_id: RequestId,
    payload: web::Payload,
) -> AppResult<HttpResponse> {
    let origin = req
        .connection_info()
        .realip_remote_addr()
        .map(str::to_owned);

    let result = match read_body(payload, state.max_body_bytes).await {
        Ok(body) => {
            state
                .relay
                .handle(InboundRequest {
                    credential: credential.as_deref(),
                    body: &body,
                    origin: origin.as_deref(),
                })
                .await
        }
        // An unauthenticated caller learns nothing about body limits.
        Err(e) => state
            .relay
            .authenticate(credential.as_deref())
            .and(Err(e)),
    };

    match result {
        Ok(delivery) => Ok(HttpResponse::Ok().json(RelayResponse {
            success: true,
            shard: delivery.shard,
            downstream_status: delivery.status,
            request_id: Some(request_id.0),
        })),
        Err(error) => Err(AppError::relay(error).with_request_id(request_id.0)),
    }
}

/// Read the request body, refusing anything over `limit` bytes.
async fn read_body(mut payload: web::Payload, limit: usize) -> Result<web::BytesMut, RelayError> {
    let mut body = web::BytesMut::new();
    while let Some(chunk) = payload.next().await {
        let chunk = chunk.map_err(|e| RelayError::Validation(format!("unreadable body: {e}")))?;
        if body.len() + chunk.len() > limit {
            return Err(RelayError::Validation(format!(
                "body exceeds {limit} bytes"
            )));
        }
        body.extend_from_slice(&chunk);
    }
    Ok(body)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use actix_web::{App, test};
    use async_trait::async_trait;
    use serde_json::Value;

    use relay_core::RelayService;
    use relay_core::domain::{DispatchPayload, Endpoint};
    use relay_core::ports::{SystemClock, TransportError, WebhookTransport};
    use relay_core::relay::{RelayConfig, WindowLimit};
    use relay_infra::InMemoryCounterStore;

    use crate::handlers::configure_routes;
    use crate::observability::RequestIdMiddleware;
    use crate::state::AppState;

    const KEY: &str = "test-key";

    /// Answers every attempt with one fixed status.
    struct FixedStatusTransport {
        status: u16,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl WebhookTransport for FixedStatusTransport {
        async fn send(
            &self,
            _endpoint: &Endpoint,
            _payload: &DispatchPayload,
            _timeout: Duration,
        ) -> Result<u16, TransportError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.status)
        }
    }

    fn state(status: u16, short_limit: u64) -> (AppState, Arc<FixedStatusTransport>) {
        let mut config = RelayConfig {
            api_keys: vec![KEY.to_string()],
            endpoints: vec![
                Endpoint::new("https://hooks.test/0"),
                Endpoint::new("https://hooks.test/1"),
            ],
            ..Default::default()
        };
        config.rate_limit.short = WindowLimit {
            max_requests: short_limit,
            window: Duration::from_secs(3600),
        };

        let transport = Arc::new(FixedStatusTransport {
            status,
            calls: AtomicUsize::new(0),
        });
        let relay = RelayService::new(
            Arc::new(config),
            Arc::new(InMemoryCounterStore::new()),
            transport.clone(),
            Arc::new(SystemClock),
        );

        let state = AppState {
            relay: Arc::new(relay),
            max_body_bytes: 1024,
        };
        (state, transport)
    }

    macro_rules! app {
        ($state:expr) => {
            test::init_service(
                App::new()
                    .wrap(crate::default_headers())
                    .wrap(RequestIdMiddleware)
                    .app_data(actix_web::web::Data::new($state))
                    .configure(configure_routes),
            )
            .await
        };
    }

    fn post(body: impl Into<actix_web::web::Bytes>) -> test::TestRequest {
        test::TestRequest::post()
            .uri("/api/relay")
            .insert_header(("content-type", "application/json"))
            .set_payload(body)
    }

    #[actix_web::test]
    async fn test_get_is_liveness_only() {
        let (state, transport) = state(200, 10);
        let app = app!(state);

        let req = test::TestRequest::get().uri("/api/relay").to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), 200);
        assert_eq!(res.headers().get("access-control-allow-origin").unwrap(), "*");

        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["status"], "OK");
        assert_eq!(transport.calls.load(Ordering::SeqCst), 0);
    }

    #[actix_web::test]
    async fn test_other_methods_not_allowed() {
        let (state, _) = state(200, 10);
        let app = app!(state);

        let req = test::TestRequest::put().uri("/api/relay").to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), 405);

        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["code"], "method_not_allowed");
    }

    #[actix_web::test]
    async fn test_missing_credential_is_401() {
        let (state, transport) = state(200, 10);
        let app = app!(state);

        let res = test::call_service(&app, post(r#"{"content":"hi"}"#).to_request()).await;
        assert_eq!(res.status(), 401);

        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["code"], "unauthorized");
        assert_eq!(transport.calls.load(Ordering::SeqCst), 0);
    }

    #[actix_web::test]
    async fn test_malformed_json_is_400() {
        let (state, _) = state(200, 10);
        let app = app!(state);

        let req = post("{not json").insert_header(("x-api-key", KEY)).to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), 400);

        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["code"], "bad_input");
        assert!(body["request_id"].is_string());
    }

    #[actix_web::test]
    async fn test_oversized_body_is_400_for_authenticated_caller_only() {
        let (state, _) = state(200, 10);
        let app = app!(state);
        let big = format!(r#"{{"content":"{}"}}"#, "x".repeat(2048));

        let res = test::call_service(&app, post(big.clone()).to_request()).await;
        assert_eq!(res.status(), 401);

        let req = post(big).insert_header(("x-api-key", KEY)).to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), 400);
    }

    #[actix_web::test]
    async fn test_delivered_returns_shard() {
        let (state, transport) = state(204, 10);
        let app = app!(state);

        let req = post(r#"{"identity":"u2","content":"hi"}"#)
            .insert_header(("Authorization", format!("Bearer {KEY}")))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), 200);

        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["success"], true);
        // "u2" hashes to shard 0 of 2.
        assert_eq!(body["shard"], 0);
        assert_eq!(body["downstream_status"], 204);
        assert_eq!(transport.calls.load(Ordering::SeqCst), 1);
    }

    #[actix_web::test]
    async fn test_rate_limited_returns_429_with_retry_after() {
        let (state, _) = state(200, 2);
        let app = app!(state);

        for _ in 0..2 {
            let req = post(r#"{"identity":"u1","content":"hi"}"#)
                .insert_header(("x-api-key", KEY))
                .to_request();
            assert_eq!(test::call_service(&app, req).await.status(), 200);
        }

        let req = post(r#"{"identity":"u1","content":"hi"}"#)
            .insert_header(("x-api-key", KEY))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), 429);
        let retry_after: u64 = res
            .headers()
            .get("Retry-After")
            .unwrap()
            .to_str()
            .unwrap()
            .parse()
            .unwrap();
        // Time left in the current hour bucket, never the whole window.
        assert!((1..=3600).contains(&retry_after));

        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["code"], "rate_limit_short");
    }

    #[actix_web::test]
    async fn test_all_destinations_failing_is_502() {
        let (state, transport) = state(503, 10);
        let app = app!(state);

        let req = post(r#"{"content":"hi"}"#)
            .insert_header(("x-api-key", KEY))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), 502);

        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["code"], "all_destinations_failed");
        assert_eq!(transport.calls.load(Ordering::SeqCst), 2);
    }
}
