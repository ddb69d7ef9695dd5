//! Usage handler
//! Handles GET /api/usage, the DeepL character quota

use async_trait::async_trait;
use axum::{
    http::Method,
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;

use crate::proxy::config::DeepLConfig;
use crate::proxy::credentials::{CredentialSource, DEEPL_API_KEY};
use crate::proxy::endpoint::ProxyHandler;
use crate::proxy::error::ProxyResult;
use crate::proxy::handlers::translate::UPSTREAM;
use crate::proxy::mappers::deepl::Usage;
use crate::proxy::upstream::client::{UpstreamCall, UpstreamClient};

pub struct UsageHandler {
    client: UpstreamClient,
    config: DeepLConfig,
    credentials: CredentialSource,
}

impl UsageHandler {
    pub fn new(client: UpstreamClient, config: DeepLConfig, credentials: CredentialSource) -> Self {
        Self { client, config, credentials }
    }

    /// Current character usage.
    ///
    /// A non-2xx answer from DeepL means "quota unknown" and yields zero usage
    /// instead of an error. Unreachable upstream and unparseable bodies still fail.
    // NOTE: upstream auth and quota errors are swallowed here and the front end
    // renders an empty bar. Confirm with product before making this an error.
    pub async fn usage(&self) -> ProxyResult<Usage> {
        let api_key = self.credentials.resolve(DEEPL_API_KEY)?;

        let call = UpstreamCall::new(Method::GET, self.config.usage_url())
            .header("authorization", &format!("DeepL-Auth-Key {}", api_key))?;

        let reply = self.client.execute(UPSTREAM, call).await?;
        if !reply.is_success() {
            tracing::warn!("{} usage unavailable ({}), reporting zero usage", UPSTREAM, reply.status);
            return Ok(Usage::default());
        }

        reply.decode()
    }
}

#[async_trait]
impl ProxyHandler for UsageHandler {
    fn name(&self) -> &'static str {
        "usage"
    }

    fn method(&self) -> Method {
        Method::GET
    }

    async fn handle(&self, _body: Bytes) -> ProxyResult<Response> {
        let usage = self.usage().await?;
        Ok(Json(usage).into_response())
    }
}
