use std::path::PathBuf;

use onelink_core::config::load_config;
use onelink_core::proxy::handlers::UsageHandler;
use onelink_core::proxy::upstream::client::UpstreamClient;
use onelink_core::proxy::CredentialSource;

pub async fn run(config_path: Option<PathBuf>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let client = UpstreamClient::new(&config.timeouts)?;
    let handler = UsageHandler::new(client, config.deepl.clone(), CredentialSource::Environment);

    let usage = handler.usage().await?;

    println!("\n📊 DeepL usage ({})", config.deepl.base_url);
    println!("{}", "=".repeat(60));

    match usage.used_percent() {
        Some(pct) => {
            let bar_width = 20;
            let filled = ((pct / 100.0 * bar_width as f64) as usize).min(bar_width);
            let bar: String = "█".repeat(filled) + &"░".repeat(bar_width - filled);

            println!("{:<12} {:>12}", "USED", usage.character_count);
            println!("{:<12} {:>12}", "LIMIT", usage.character_limit);
            println!("{:<12} {:>11.1}%  [{}]", "CONSUMED", pct, bar);
        }
        None => {
            println!("  Usage unknown (DeepL did not report a limit)");
        }
    }

    println!();
    Ok(())
}
