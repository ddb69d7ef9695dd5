use std::path::PathBuf;

use onelink_core::config::load_config_with_source;
use onelink_core::proxy::credentials::ALL_KEYS;
use onelink_core::proxy::CredentialSource;

pub async fn run(config_path: Option<PathBuf>) -> anyhow::Result<()> {
    let (config, source) = load_config_with_source(config_path)?;
    let credentials = CredentialSource::Environment;

    println!("OneLink API Status");
    println!("==================");
    println!();
    println!("Configuration:");
    match source {
        Some(path) => println!("  Config file: {}", path.display()),
        None => println!("  Config file: none (using defaults)"),
    }
    println!();
    println!("Server settings:");
    println!("  Host: {}", config.server.bind_host());
    println!("  Port: {}", config.server.port);
    println!("  Credential check: {:?}", config.server.credential_check);
    println!();
    println!("Upstreams:");
    println!("  OpenRouter: {} ({})", config.openrouter.endpoint, config.openrouter.model);
    println!("  DeepL: {}", config.deepl.base_url);
    println!();

    println!("Credentials:");
    for key in ALL_KEYS {
        let state = if credentials.is_set(key) { "set" } else { "NOT SET" };
        println!("  {:<20} {}", key, state);
    }

    // Check if server is reachable
    println!();
    let host = match config.server.bind_host() {
        "0.0.0.0" => "127.0.0.1",
        other => other,
    };
    let url = format!("http://{}:{}/healthz", host, config.server.port);
    match reqwest::get(&url).await {
        Ok(resp) if resp.status().is_success() => {
            println!("Server: RUNNING ✓");
        }
        _ => {
            println!("Server: NOT RUNNING");
        }
    }

    Ok(())
}
