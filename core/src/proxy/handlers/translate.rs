//! Translate handler
//! Handles POST /api/translate by forwarding to DeepL as a form post

use async_trait::async_trait;
use axum::{
    http::Method,
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::proxy::config::DeepLConfig;
use crate::proxy::credentials::{CredentialSource, DEEPL_API_KEY};
use crate::proxy::endpoint::{decode_json, require, ProxyHandler};
use crate::proxy::error::{ProxyError, ProxyResult};
use crate::proxy::mappers::deepl::{build_translate_form, TranslateResponse};
use crate::proxy::upstream::client::{UpstreamBody, UpstreamCall, UpstreamClient};

pub(crate) const UPSTREAM: &str = "DeepL";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TranslateRequest {
    pub text: Option<String>,
    /// Absent, empty or `auto` lets DeepL detect it
    pub source_lang: Option<String>,
    pub target_lang: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TranslateReply {
    pub translated_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detected_language: Option<String>,
}

pub struct TranslateHandler {
    client: UpstreamClient,
    config: DeepLConfig,
    credentials: CredentialSource,
}

impl TranslateHandler {
    pub fn new(client: UpstreamClient, config: DeepLConfig, credentials: CredentialSource) -> Self {
        Self { client, config, credentials }
    }

    pub async fn translate(&self, request: &TranslateRequest) -> ProxyResult<TranslateReply> {
        let text = require(&request.text, "Text")?;
        let target_lang = require(&request.target_lang, "Target language")?;
        let api_key = self.credentials.resolve(DEEPL_API_KEY)?;

        let form = build_translate_form(text, target_lang, request.source_lang.as_deref());
        let call = UpstreamCall::new(Method::POST, self.config.translate_url())
            .header("authorization", &format!("DeepL-Auth-Key {}", api_key))?
            .body(UpstreamBody::Form(form));

        tracing::info!(
            "Translate request -> {} ({} -> {}, {} chars)",
            UPSTREAM,
            request.source_lang.as_deref().filter(|s| !s.is_empty()).unwrap_or("auto"),
            target_lang,
            text.chars().count()
        );

        let reply = self.client.execute(UPSTREAM, call).await?.ensure_success()?;
        let response: TranslateResponse = reply.decode()?;

        let first = response.translations.into_iter().next().ok_or(ProxyError::EmptyResult {
            upstream: UPSTREAM,
            items: "translations",
        })?;

        Ok(TranslateReply {
            translated_text: first.text,
            detected_language: Some(first.detected_source_language).filter(|l| !l.is_empty()),
        })
    }
}

#[async_trait]
impl ProxyHandler for TranslateHandler {
    fn name(&self) -> &'static str {
        "translate"
    }

    fn method(&self) -> Method {
        Method::POST
    }

    async fn handle(&self, body: Bytes) -> ProxyResult<Response> {
        let request: TranslateRequest = decode_json(&body)?;
        let reply = self.translate(&request).await?;
        Ok(Json(reply).into_response())
    }
}
