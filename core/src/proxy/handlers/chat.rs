//! Chat handler
//! Handles POST /api/chat by forwarding to OpenRouter

use async_trait::async_trait;
use axum::{
    http::Method,
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::proxy::config::OpenRouterConfig;
use crate::proxy::credentials::{CredentialSource, OPENROUTER_API_KEY};
use crate::proxy::endpoint::{decode_json, require, ProxyHandler};
use crate::proxy::error::{ProxyError, ProxyResult};
use crate::proxy::mappers::openrouter::{build_chat_request, first_reply, ChatCompletionResponse};
use crate::proxy::upstream::client::{UpstreamBody, UpstreamCall, UpstreamClient};

const UPSTREAM: &str = "OpenRouter";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: Option<String>,
    /// Current link-in-bio profile, appended to the system prompt
    pub profile: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatReply {
    pub reply: String,
}

pub struct ChatHandler {
    client: UpstreamClient,
    config: OpenRouterConfig,
    credentials: CredentialSource,
}

impl ChatHandler {
    pub fn new(client: UpstreamClient, config: OpenRouterConfig, credentials: CredentialSource) -> Self {
        Self { client, config, credentials }
    }

    pub async fn chat(&self, request: &ChatRequest) -> ProxyResult<ChatReply> {
        let message = require(&request.message, "Message")?;
        let profile = require(&request.profile, "Profile")?;
        let api_key = self.credentials.resolve(OPENROUTER_API_KEY)?;

        let completion = build_chat_request(&self.config.model, &self.config.system_prompt, profile, message);
        let body: Value = serde_json::to_value(&completion)
            .map_err(|e| ProxyError::Internal(format!("Failed to encode chat request: {}", e)))?;

        let mut call = UpstreamCall::new(Method::POST, self.config.endpoint.as_str())
            .header("authorization", &format!("Bearer {}", api_key))?
            .body(UpstreamBody::Json(body));
        if let Some(referer) = &self.config.referer {
            call = call.header("http-referer", referer)?;
        }
        if let Some(title) = &self.config.title {
            call = call.header("x-title", title)?;
        }

        tracing::info!("Chat request -> {} (model: {})", UPSTREAM, self.config.model);

        let reply = self.client.execute(UPSTREAM, call).await?.ensure_success()?;
        let completion: ChatCompletionResponse = reply.decode()?;

        let text = first_reply(completion).ok_or(ProxyError::EmptyResult {
            upstream: UPSTREAM,
            items: "choices",
        })?;

        Ok(ChatReply { reply: text })
    }
}

#[async_trait]
impl ProxyHandler for ChatHandler {
    fn name(&self) -> &'static str {
        "chat"
    }

    fn method(&self) -> Method {
        Method::POST
    }

    async fn handle(&self, body: Bytes) -> ProxyResult<Response> {
        let request: ChatRequest = decode_json(&body)?;
        let reply = self.chat(&request).await?;
        Ok(Json(reply).into_response())
    }
}
