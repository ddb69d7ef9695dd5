use std::path::PathBuf;

use onelink_core::config::{load_config, CredentialCheck};
use onelink_core::proxy::credentials::ALL_KEYS;
use onelink_core::proxy::{CredentialSource, ProxyServer};

pub async fn run(
    config_path: Option<PathBuf>,
    port_override: Option<u16>,
    check_override: Option<CredentialCheck>,
) -> anyhow::Result<()> {
    let mut config = load_config(config_path)?;

    if let Some(port) = port_override {
        config.server.port = port;
    }
    if let Some(check) = check_override {
        config.server.credential_check = check;
    }

    tracing::info!("Starting OneLink API...");
    tracing::info!("  Port: {}", config.server.port);
    tracing::info!("  Host: {}", config.server.bind_host());
    tracing::info!("  Chat model: {}", config.openrouter.model);
    tracing::info!("  DeepL: {}", config.deepl.base_url);

    let credentials = CredentialSource::Environment;
    check_credentials(&credentials, config.server.credential_check)?;

    let server = ProxyServer::new(
        config.server.bind_host().to_string(),
        config.server.port,
        config.proxy_config(),
        credentials,
    )?;

    let base = format!("http://{}:{}", config.server.bind_host(), config.server.port);
    tracing::info!("Chat API available at {}/api/chat", base);
    tracing::info!("Translate API available at {}/api/translate", base);
    tracing::info!("Usage API available at {}/api/usage", base);
    tracing::info!("Press Ctrl+C to stop");

    // Run server (blocks until shutdown)
    server.run().await?;

    Ok(())
}

/// Apply the startup policy for missing upstream keys
fn check_credentials(credentials: &CredentialSource, check: CredentialCheck) -> anyhow::Result<()> {
    if check == CredentialCheck::Defer {
        tracing::info!("Credential check deferred to request time");
        return Ok(());
    }

    let missing = credentials.missing(&ALL_KEYS);
    if missing.is_empty() {
        tracing::info!("All upstream credentials are configured");
        return Ok(());
    }

    if check == CredentialCheck::Fatal {
        anyhow::bail!(
            "{} not set. Please set it before running the server.",
            missing.join(", ")
        );
    }

    for key in missing {
        tracing::warn!("{} is not set; requests needing it will fail with 500", key);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatal_names_missing_keys() {
        let credentials = CredentialSource::from_pairs([("DEEPL_API_KEY", "k")]);
        let err = check_credentials(&credentials, CredentialCheck::Fatal).unwrap_err();
        assert!(err.to_string().starts_with("OPENROUTER_API_KEY not set"));
    }

    #[test]
    fn test_warn_and_defer_start_anyway() {
        let credentials = CredentialSource::from_pairs(Vec::<(String, String)>::new());
        assert!(check_credentials(&credentials, CredentialCheck::Warn).is_ok());
        assert!(check_credentials(&credentials, CredentialCheck::Defer).is_ok());
    }

    #[test]
    fn test_fatal_passes_with_all_keys() {
        let credentials = CredentialSource::from_pairs([("DEEPL_API_KEY", "k"), ("OPENROUTER_API_KEY", "o")]);
        assert!(check_credentials(&credentials, CredentialCheck::Fatal).is_ok());
    }
}
