pub mod commands;

use clap::{Parser, Subcommand};
use onelink_core::config::CredentialCheck;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "onelink-api")]
#[command(author, version, about = "OneLink API - chat via OpenRouter, translation via DeepL")]
pub struct Cli {
    /// Path to config file (checked in order: local config.toml, ~/.config/onelink-api/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the local API server
    Start {
        /// Port to listen on (overrides config)
        #[arg(short, long)]
        port: Option<u16>,

        /// Startup credential check: fatal, warn or defer (overrides config)
        #[arg(long)]
        credential_check: Option<CredentialCheck>,
    },

    /// Show configuration and whether the server is up
    Status,

    /// Query DeepL character usage
    Usage,
}
