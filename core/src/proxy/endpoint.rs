//! Proxy handler contract and the request dispatch shared by every endpoint

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    extract::rejection::BytesRejection,
    http::{
        header::{
            ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN, CONTENT_TYPE,
        },
        HeaderMap, HeaderValue, Method, StatusCode,
    },
    response::{IntoResponse, Response},
    routing::{any, MethodRouter},
};
use bytes::Bytes;
use serde::de::DeserializeOwned;
use tracing::Instrument;

use crate::proxy::error::{ProxyError, ProxyResult};

/// A stateless endpoint that forwards one request to one upstream.
#[async_trait]
pub trait ProxyHandler: Send + Sync + 'static {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// The only verb accepted besides `OPTIONS`
    fn method(&self) -> Method;

    /// Decode `body`, call the upstream, and build the success response
    async fn handle(&self, body: Bytes) -> ProxyResult<Response>;
}

/// Run one inbound request through `handler`.
///
/// Preflight is answered before anything else. CORS headers go on every
/// response; every non-preflight response is JSON.
pub async fn dispatch<H: ProxyHandler + ?Sized>(handler: &H, method: Method, body: Bytes) -> Response {
    dispatch_body(handler, method, Ok(body)).await
}

/// Like [`dispatch`], for a body that may already have failed to buffer.
///
/// A body error is only reported once preflight and the verb check pass.
pub async fn dispatch_body<H: ProxyHandler + ?Sized>(
    handler: &H,
    method: Method,
    body: ProxyResult<Bytes>,
) -> Response {
    let span = tracing::info_span!(
        "proxy",
        endpoint = handler.name(),
        request_id = %uuid::Uuid::new_v4().simple()
    );

    async move {
        let allowed = handler.method();

        if method == Method::OPTIONS {
            let mut response = StatusCode::OK.into_response();
            apply_cors(response.headers_mut(), &allowed);
            return response;
        }

        let mut response = if method != allowed {
            ProxyError::MethodNotAllowed.into_response()
        } else {
            let result = match body {
                Ok(body) => handler.handle(body).await,
                Err(e) => Err(e),
            };
            match result {
                Ok(response) => {
                    tracing::info!("{} {} -> {}", method, handler.name(), response.status());
                    response
                }
                Err(e) => e.into_response(),
            }
        };

        response
            .headers_mut()
            .entry(CONTENT_TYPE)
            .or_insert(HeaderValue::from_static("application/json"));
        apply_cors(response.headers_mut(), &allowed);
        response
    }
    .instrument(span)
    .await
}

/// Axum route accepting every verb so `dispatch` owns preflight and 405 handling
pub fn route<H, S>(handler: Arc<H>) -> MethodRouter<S>
where
    H: ProxyHandler,
    S: Clone + Send + Sync + 'static,
{
    any(move |method: Method, body: Result<Bytes, BytesRejection>| {
        let handler = handler.clone();
        async move { dispatch_body(handler.as_ref(), method, body.map_err(body_error)).await }
    })
}

fn body_error(rejection: BytesRejection) -> ProxyError {
    if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ProxyError::PayloadTooLarge(rejection.body_text())
    } else {
        ProxyError::BadRequest(format!("Invalid request body: {}", rejection.body_text()))
    }
}

fn apply_cors(headers: &mut HeaderMap, allowed: &Method) {
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    if let Ok(methods) = HeaderValue::from_str(&format!("{}, OPTIONS", allowed)) {
        headers.insert(ACCESS_CONTROL_ALLOW_METHODS, methods);
    }
    headers.insert(ACCESS_CONTROL_ALLOW_HEADERS, HeaderValue::from_static("Content-Type"));
}

/// Decode an inbound JSON body, mapping failures to 400
pub fn decode_json<T: DeserializeOwned>(body: &[u8]) -> ProxyResult<T> {
    serde_json::from_slice(body).map_err(|e| ProxyError::BadRequest(format!("Invalid request body: {}", e)))
}

/// Treat `None` and `""` alike for required string fields
pub fn require<'a>(value: &'a Option<String>, field: &str) -> ProxyResult<&'a str> {
    match value.as_deref() {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ProxyError::missing_field(field)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::Json;
    use serde::Deserialize;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct EchoHandler {
        calls: AtomicUsize,
    }

    #[derive(Deserialize)]
    struct EchoRequest {
        word: Option<String>,
    }

    #[async_trait]
    impl ProxyHandler for EchoHandler {
        fn name(&self) -> &'static str {
            "echo"
        }

        fn method(&self) -> Method {
            Method::POST
        }

        async fn handle(&self, body: Bytes) -> ProxyResult<Response> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let request: EchoRequest = decode_json(&body)?;
            let word = require(&request.word, "Word")?;
            Ok(Json(serde_json::json!({ "echo": word })).into_response())
        }
    }

    fn echo() -> EchoHandler {
        EchoHandler { calls: AtomicUsize::new(0) }
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn assert_cors(response: &Response, methods: &str) {
        let headers = response.headers();
        assert_eq!(headers[ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        assert_eq!(headers[ACCESS_CONTROL_ALLOW_METHODS], methods);
        assert_eq!(headers[ACCESS_CONTROL_ALLOW_HEADERS], "Content-Type");
    }

    #[tokio::test]
    async fn test_preflight_short_circuits() {
        let handler = echo();
        // Body would be rejected if it were ever decoded
        let response = dispatch(&handler, Method::OPTIONS, Bytes::from_static(b"{not json")).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_cors(&response, "POST, OPTIONS");
        assert_eq!(handler.calls.load(Ordering::SeqCst), 0);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(bytes.is_empty());
    }

    #[tokio::test]
    async fn test_wrong_method_is_405_json() {
        let handler = echo();
        let response = dispatch(&handler, Method::GET, Bytes::new()).await;

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.headers()[CONTENT_TYPE], "application/json");
        assert_cors(&response, "POST, OPTIONS");
        assert_eq!(body_json(response).await["error"], "Method not allowed");
        assert_eq!(handler.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_malformed_json_is_400() {
        let handler = echo();
        let response = dispatch(&handler, Method::POST, Bytes::from_static(b"{\"word\": ")).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        let message = body["error"].as_str().unwrap();
        assert!(message.starts_with("Invalid request body: "), "{}", message);
    }

    #[tokio::test]
    async fn test_missing_and_empty_fields_are_400() {
        let handler = echo();
        for payload in [&b"{}"[..], &b"{\"word\": \"\"}"[..]] {
            let response = dispatch(&handler, Method::POST, Bytes::copy_from_slice(payload)).await;
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
            assert_eq!(body_json(response).await["error"], "Word is required");
        }
    }

    #[tokio::test]
    async fn test_body_error_keeps_json_and_cors() {
        let handler = echo();
        let too_large = Err(ProxyError::PayloadTooLarge("length limit exceeded".into()));
        let response = dispatch_body(&handler, Method::POST, too_large).await;

        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(response.headers()[CONTENT_TYPE], "application/json");
        assert_cors(&response, "POST, OPTIONS");
        assert_eq!(body_json(response).await["error"], "Request body too large: length limit exceeded");
        assert_eq!(handler.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_body_error_does_not_beat_preflight() {
        let handler = echo();
        let too_large = Err(ProxyError::PayloadTooLarge("x".into()));
        let response = dispatch_body(&handler, Method::OPTIONS, too_large).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_cors(&response, "POST, OPTIONS");
    }

    #[tokio::test]
    async fn test_success_gets_cors_and_json() {
        let handler = echo();
        let response = dispatch(&handler, Method::POST, Bytes::from_static(b"{\"word\": \"hi\"}")).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_cors(&response, "POST, OPTIONS");
        assert_eq!(response.headers()[CONTENT_TYPE], "application/json");
        assert_eq!(body_json(response).await, serde_json::json!({ "echo": "hi" }));
    }
}
