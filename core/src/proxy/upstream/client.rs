//! Upstream client for calling OpenRouter and DeepL
//!
//! One attempt per call, no fallback and no retry. The whole body is read
//! before the status is looked at so the connection is released on every path.

use reqwest::{
    header::{HeaderMap, HeaderName, HeaderValue},
    Client, Method, StatusCode,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::time::Duration;

use crate::proxy::config::TimeoutsConfig;
use crate::proxy::error::ProxyError;

const USER_AGENT: &str = concat!("onelink-api/", env!("CARGO_PKG_VERSION"));

/// Outbound request body encoding
#[derive(Debug, Clone)]
pub enum UpstreamBody {
    Empty,
    Json(Value),
    /// Sent as `application/x-www-form-urlencoded`
    Form(Vec<(&'static str, String)>),
}

/// A single request to an upstream, built fresh per inbound request
#[derive(Debug, Clone)]
pub struct UpstreamCall {
    pub method: Method,
    pub url: String,
    pub headers: HeaderMap,
    pub body: UpstreamBody,
}

impl UpstreamCall {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: HeaderMap::new(),
            body: UpstreamBody::Empty,
        }
    }

    /// Add a header, rejecting values that are not valid header text
    pub fn header(mut self, name: &str, value: &str) -> Result<Self, ProxyError> {
        let invalid = |e: String| ProxyError::Internal(format!("Failed to create request: invalid {} header: {}", name, e));
        let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| invalid(e.to_string()))?;
        let header_value = HeaderValue::from_str(value).map_err(|e| invalid(e.to_string()))?;
        self.headers.insert(header_name, header_value);
        Ok(self)
    }

    pub fn body(mut self, body: UpstreamBody) -> Self {
        self.body = body;
        self
    }
}

/// Fully buffered upstream answer
#[derive(Debug, Clone)]
pub struct UpstreamReply {
    pub upstream: &'static str,
    pub status: StatusCode,
    pub body: String,
}

impl UpstreamReply {
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    pub fn ensure_success(self) -> Result<Self, ProxyError> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(ProxyError::UpstreamError {
                upstream: self.upstream,
                status: self.status,
                body: self.body,
            })
        }
    }

    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, ProxyError> {
        serde_json::from_str(&self.body).map_err(|e| ProxyError::ResponseParse {
            upstream: self.upstream,
            message: e.to_string(),
            body: self.body.clone(),
        })
    }
}

#[derive(Clone)]
pub struct UpstreamClient {
    http_client: Client,
}

impl UpstreamClient {
    pub fn new(timeouts: &TimeoutsConfig) -> anyhow::Result<Self> {
        let http_client = Client::builder()
            .connect_timeout(Duration::from_secs(timeouts.connect_timeout))
            .timeout(Duration::from_secs(timeouts.request_timeout))
            .pool_idle_timeout(Duration::from_secs(90))
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self { http_client })
    }

    /// Execute `call` once against the upstream named `upstream`
    pub async fn execute(&self, upstream: &'static str, call: UpstreamCall) -> Result<UpstreamReply, ProxyError> {
        let UpstreamCall { method, url, headers, body } = call;

        tracing::debug!("{} {} -> {}", method, url, upstream);

        let mut request = self.http_client.request(method, &url).headers(headers);
        request = match body {
            UpstreamBody::Empty => request,
            UpstreamBody::Json(value) => request.json(&value),
            UpstreamBody::Form(fields) => request.form(&fields),
        };

        let response = request.send().await.map_err(|e| ProxyError::UpstreamUnreachable {
            upstream,
            message: e.to_string(),
        })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| ProxyError::UpstreamUnreachable {
            upstream,
            message: format!("failed to read response: {}", e),
        })?;

        if !status.is_success() {
            tracing::warn!("Upstream {} returned {}", upstream, status);
        }

        Ok(UpstreamReply { upstream, status, body })
    }
}
