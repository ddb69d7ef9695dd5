//! Proxy configuration
//! Upstream endpoints and persona settings injected into every handler

use serde::{Deserialize, Serialize};

const DEFAULT_SYSTEM_PROMPT: &str = "You are an AI assistant for OneLink. You help users optimize their link-in-bio profiles. Here is the current profile context: ";

/// Runtime settings shared by all handlers
#[derive(Debug, Clone, Default)]
pub struct ProxyConfig {
    pub openrouter: OpenRouterConfig,
    pub deepl: DeepLConfig,
    pub timeouts: TimeoutsConfig,
}

/// Chat completion upstream
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenRouterConfig {
    #[serde(default = "default_openrouter_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_model")]
    pub model: String,

    /// Persona prefix; the caller's profile is appended verbatim.
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,

    /// Sent as `HTTP-Referer` for OpenRouter app attribution
    #[serde(default = "default_referer")]
    pub referer: Option<String>,

    /// Sent as `X-Title`
    #[serde(default = "default_title")]
    pub title: Option<String>,
}

impl Default for OpenRouterConfig {
    fn default() -> Self {
        Self {
            endpoint: default_openrouter_endpoint(),
            model: default_model(),
            system_prompt: default_system_prompt(),
            referer: default_referer(),
            title: default_title(),
        }
    }
}

/// Translation upstream
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeepLConfig {
    #[serde(default = "default_deepl_base_url")]
    pub base_url: String,
}

impl Default for DeepLConfig {
    fn default() -> Self {
        Self {
            base_url: default_deepl_base_url(),
        }
    }
}

impl DeepLConfig {
    pub fn translate_url(&self) -> String {
        format!("{}/v2/translate", self.base_url.trim_end_matches('/'))
    }

    pub fn usage_url(&self) -> String {
        format!("{}/v2/usage", self.base_url.trim_end_matches('/'))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeoutsConfig {
    /// Seconds
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout: u64,

    /// Seconds, whole outbound call including body read
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,
}

impl Default for TimeoutsConfig {
    fn default() -> Self {
        Self {
            connect_timeout: default_connect_timeout(),
            request_timeout: default_request_timeout(),
        }
    }
}

fn default_openrouter_endpoint() -> String {
    "https://openrouter.ai/api/v1/chat/completions".to_string()
}

fn default_model() -> String {
    "nvidia/nemotron-3-nano-30b-a3b:free".to_string()
}

fn default_system_prompt() -> String {
    DEFAULT_SYSTEM_PROMPT.to_string()
}

fn default_referer() -> Option<String> {
    Some("https://onelink-demo.vercel.app".to_string())
}

fn default_title() -> Option<String> {
    Some("OneLink Demo".to_string())
}

fn default_deepl_base_url() -> String {
    "https://api-free.deepl.com".to_string()
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_request_timeout() -> u64 {
    30
}
