//! Shared utilities for endpoint tests.

#![allow(dead_code)]

use httpmock::MockServer;
use onelink_core::proxy::config::{DeepLConfig, OpenRouterConfig, ProxyConfig, TimeoutsConfig};
use onelink_core::proxy::credentials::{CredentialSource, DEEPL_API_KEY, OPENROUTER_API_KEY};
use onelink_core::proxy::ProxyServer;
use tokio::net::TcpListener;

pub const CHAT_PATH: &str = "/api/v1/chat/completions";
pub const OPENROUTER_KEY: &str = "or-test-key";
pub const DEEPL_KEY: &str = "deepl-test-key:fx";
pub const SYSTEM_PROMPT: &str = "Persona. Profile: ";

/// Config with every upstream pointed at `upstream`.
pub fn config_for(upstream: &MockServer) -> ProxyConfig {
    config_with_base(&upstream.base_url())
}

pub fn config_with_base(base_url: &str) -> ProxyConfig {
    ProxyConfig {
        openrouter: OpenRouterConfig {
            endpoint: format!("{}{}", base_url, CHAT_PATH),
            model: "test/model:free".to_string(),
            system_prompt: SYSTEM_PROMPT.to_string(),
            ..OpenRouterConfig::default()
        },
        deepl: DeepLConfig {
            base_url: base_url.to_string(),
        },
        timeouts: TimeoutsConfig {
            connect_timeout: 2,
            request_timeout: 5,
        },
    }
}

pub fn credentials() -> CredentialSource {
    CredentialSource::from_pairs([(OPENROUTER_API_KEY, OPENROUTER_KEY), (DEEPL_API_KEY, DEEPL_KEY)])
}

pub fn no_credentials() -> CredentialSource {
    CredentialSource::from_pairs(Vec::<(String, String)>::new())
}

/// Serve the real router on an ephemeral port and return its base URL.
pub async fn spawn_app(config: ProxyConfig, credentials: CredentialSource) -> String {
    let server = ProxyServer::new("127.0.0.1".to_string(), 0, config, credentials).unwrap();
    let app = server.router();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    format!("http://{}", addr)
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}
