use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Every way a proxied request can fail.
///
/// Each variant is terminal for the request. The response body is always
/// `{"error": "<message>"}`.
#[derive(Error, Debug)]
pub enum ProxyError {
    #[error("Method not allowed")]
    MethodNotAllowed,

    /// Malformed body or a missing required field.
    #[error("{0}")]
    BadRequest(String),

    /// Inbound body over the server's size limit.
    #[error("Request body too large: {0}")]
    PayloadTooLarge(String),

    /// A credential required by the upstream is not set.
    #[error("{0} environment variable is not configured")]
    MissingCredential(String),

    #[error("{0}")]
    Internal(String),

    /// The upstream could not be reached or its body could not be read.
    #[error("Failed to connect to {upstream}: {message}")]
    UpstreamUnreachable {
        upstream: &'static str,
        message: String,
    },

    /// The upstream answered with a non-2xx status.
    #[error("{upstream} API error ({status}): {body}")]
    UpstreamError {
        upstream: &'static str,
        status: StatusCode,
        body: String,
    },

    #[error("Failed to parse {upstream} response: {message}: {body}")]
    ResponseParse {
        upstream: &'static str,
        message: String,
        body: String,
    },

    /// The upstream succeeded but had nothing in its result list.
    #[error("{upstream} returned no {items}")]
    EmptyResult {
        upstream: &'static str,
        items: &'static str,
    },
}

impl ProxyError {
    pub fn missing_field(field: &str) -> Self {
        Self::BadRequest(format!("{} is required", field))
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ProxyError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ProxyError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ProxyError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ProxyError::UpstreamError { .. } => StatusCode::BAD_GATEWAY,
            ProxyError::MissingCredential(_)
            | ProxyError::Internal(_)
            | ProxyError::UpstreamUnreachable { .. }
            | ProxyError::ResponseParse { .. }
            | ProxyError::EmptyResult { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.to_string();

        if status.is_server_error() {
            tracing::error!("Request failed ({}): {}", status, message);
        } else {
            tracing::warn!("Request rejected ({}): {}", status, message);
        }

        (status, Json(json!({ "error": message }))).into_response()
    }
}

pub type ProxyResult<T> = std::result::Result<T, ProxyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ProxyError::MethodNotAllowed.status_code(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(ProxyError::missing_field("Text").status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ProxyError::PayloadTooLarge("big".into()).status_code(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(
            ProxyError::MissingCredential("DEEPL_API_KEY".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ProxyError::UpstreamError {
                upstream: "DeepL",
                status: StatusCode::FORBIDDEN,
                body: String::new(),
            }
            .status_code(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            ProxyError::EmptyResult { upstream: "OpenRouter", items: "choices" }.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_messages_carry_diagnostics() {
        let err = ProxyError::UpstreamError {
            upstream: "DeepL",
            status: StatusCode::FORBIDDEN,
            body: "{\"message\":\"Wrong key\"}".into(),
        };
        assert_eq!(err.to_string(), "DeepL API error (403 Forbidden): {\"message\":\"Wrong key\"}");

        let err = ProxyError::MissingCredential("OPENROUTER_API_KEY".into());
        assert_eq!(err.to_string(), "OPENROUTER_API_KEY environment variable is not configured");

        assert_eq!(ProxyError::missing_field("Target language").to_string(), "Target language is required");
    }
}
