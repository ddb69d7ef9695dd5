use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::proxy::config::{DeepLConfig, OpenRouterConfig, ProxyConfig, TimeoutsConfig};

/// OneLink API configuration file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub openrouter: OpenRouterConfig,

    #[serde(default)]
    pub deepl: DeepLConfig,

    #[serde(default)]
    pub timeouts: TimeoutsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default)]
    pub allow_lan_access: bool,

    #[serde(default)]
    pub credential_check: CredentialCheck,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            host: default_host(),
            allow_lan_access: false,
            credential_check: CredentialCheck::default(),
        }
    }
}

impl ServerConfig {
    pub fn bind_host(&self) -> &str {
        if self.allow_lan_access {
            "0.0.0.0"
        } else {
            &self.host
        }
    }
}

/// What `start` does when an upstream credential is missing at boot.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CredentialCheck {
    /// Refuse to start.
    Fatal,
    /// Log a warning and serve; affected endpoints answer 500.
    Warn,
    /// No startup check at all, same as a serverless deployment.
    Defer,
}

impl Default for CredentialCheck {
    fn default() -> Self {
        Self::Warn
    }
}

impl std::str::FromStr for CredentialCheck {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "fatal" => Ok(Self::Fatal),
            "warn" => Ok(Self::Warn),
            "defer" => Ok(Self::Defer),
            other => Err(format!("unknown credential check mode: {}", other)),
        }
    }
}

impl Config {
    /// Runtime settings handed to the proxy handlers
    pub fn proxy_config(&self) -> ProxyConfig {
        ProxyConfig {
            openrouter: self.openrouter.clone(),
            deepl: self.deepl.clone(),
            timeouts: self.timeouts.clone(),
        }
    }
}

fn default_port() -> u16 { 8080 }
fn default_host() -> String { "127.0.0.1".to_string() }

/// Get default config file path
pub fn default_config_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("onelink-api")
        .join("config.toml")
}

/// Load config from file, or return defaults if not found.
///
/// Loading order:
/// 1. Specified path (if provided)
/// 2. ./config.toml (if exists)
/// 3. default_config_path() (usually ~/.config/onelink-api/config.toml)
pub fn load_config(path: Option<PathBuf>) -> anyhow::Result<Config> {
    load_config_with_source(path).map(|(config, _)| config)
}

/// Same as [`load_config`], also returning the file the config came from.
///
/// The source is `None` when no file was found and defaults are in use.
pub fn load_config_with_source(path: Option<PathBuf>) -> anyhow::Result<(Config, Option<PathBuf>)> {
    if let Some(config_path) = path {
        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = toml::from_str(&content)?;
            tracing::info!("Loaded config from specified path {:?}", config_path);
            return Ok((config, Some(config_path)));
        } else {
            anyhow::bail!("Specified config file not found: {:?}", config_path);
        }
    }

    let local_config = PathBuf::from("config.toml");
    if local_config.exists() {
        match std::fs::read_to_string(&local_config) {
            Ok(content) => match toml::from_str::<Config>(&content) {
                Ok(config) => {
                    tracing::info!("Loaded config from current directory {:?}", local_config);
                    return Ok((config, Some(local_config)));
                }
                Err(e) => {
                    tracing::error!("Failed to parse ./config.toml: {}. Falling back to default path.", e);
                }
            },
            Err(e) => {
                tracing::error!("Failed to read ./config.toml: {}. Falling back to default path.", e);
            }
        }
    }

    let default_path = default_config_path();
    if default_path.exists() {
        let content = std::fs::read_to_string(&default_path)?;
        let config: Config = toml::from_str(&content)?;
        tracing::info!("Loaded config from default path {:?}", default_path);
        Ok((config, Some(default_path)))
    } else {
        tracing::info!("No config file found, using defaults");
        Ok((Config::default(), None))
    }
}
